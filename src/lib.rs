//! How tracked members of the European Parliament voted on laws within a
//! EuroVoc theme.
//!
//! The pipeline loads the HowTheyVote.eu vote listing, indexes EuroVoc labels,
//! fetches the detail records of the votes in a chosen theme, joins member
//! ballots into rows for a fixed set of tracked MEPs, and scrapes each law's
//! summary from the Legislative Observatory for the report.

pub mod client;
pub mod config;
pub mod error;
pub mod labels;
pub mod loader;
pub mod pipeline;
pub mod projector;
pub mod report;
pub mod summary;
pub mod theme;
pub mod types;

pub use client::{Fetcher, HttpFetcher, MemoryFetcher};
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use pipeline::VotePipeline;
pub use projector::TRACKED_MEMBER_IDS;
pub use report::{MemberReport, ReportOptions, VoteReport};
pub use types::{
    BallotIcon, Member, MemberVote, MemberVoteRow, Position, Source, Vote, VoteId, VoteListing,
};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::client::{Fetcher, HttpFetcher, MemoryFetcher};
    pub use crate::config::{Config, ConfigBuilder};
    pub use crate::error::{Error, Result};
    pub use crate::pipeline::VotePipeline;
    pub use crate::report::{render_html, render_text, ReportOptions, VoteReport};
    pub use crate::types::{MemberVoteRow, Position, Vote, VoteListing};
}
