use thiserror::Error;

use crate::types::VoteId;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Response from {url} is not valid JSON: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response from {url} does not match the expected schema: {source}")]
    SchemaMismatch {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Vote {vote_id} has no Legislative Observatory procedure file source")]
    SummarySourceNotFound { vote_id: VoteId },

    #[error("Could not find {target} on {url}")]
    ScrapeTargetNotFound { url: String, target: String },

    #[error("No member-vote rows given")]
    NoRows,

    #[error("Pagination did not terminate after {pages} pages")]
    PaginationLimit { pages: u32 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No canned response for {0}")]
    MissingFixture(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}
