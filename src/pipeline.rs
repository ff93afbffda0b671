use crate::client::{query_as, Fetcher, HttpFetcher};
use crate::config::Config;
use crate::error::Result;
use crate::labels::list_labels;
use crate::loader::load_all_votes;
use crate::projector::project;
use crate::report::{build_report, ReportOptions, VoteReport};
use crate::summary::{fetch_summary, fetch_summary_for_vote};
use crate::theme::filter_by_theme;
use crate::types::{MemberVoteRow, Vote, VoteId, VoteListing};

/// Main entry point: the fetch → filter → join → report pipeline over one
/// configuration and one fetcher
pub struct VotePipeline<F: Fetcher> {
    config: Config,
    fetcher: F,
}

impl VotePipeline<HttpFetcher> {
    /// Create a pipeline that talks to the live API
    pub fn from_config(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::new(config, fetcher))
    }
}

impl<F: Fetcher> VotePipeline<F> {
    pub fn new(config: Config, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Every vote in the listing, page order preserved
    pub fn load_all_votes(&self) -> Result<Vec<VoteListing>> {
        load_all_votes(&self.fetcher, &self.config)
    }

    /// Sorted, deduplicated EuroVoc labels across `votes`
    pub fn list_labels(&self, votes: &[VoteListing]) -> Vec<String> {
        list_labels(votes)
    }

    /// Detail records of the votes labelled with `theme`
    pub fn filter_by_theme(&self, theme: &str, votes: &[VoteListing]) -> Result<Vec<Vote>> {
        filter_by_theme(&self.fetcher, &self.config, theme, votes)
    }

    /// Detail record of one vote
    pub fn vote(&self, vote_id: VoteId) -> Result<Vote> {
        query_as(&self.fetcher, &self.config.vote_url(vote_id), &[])
    }

    /// Load the listing and return the tracked members' rows for `theme`
    pub fn theme_rows(&self, theme: &str) -> Result<Vec<MemberVoteRow>> {
        let votes = self.load_all_votes()?;
        self.rows_for_theme(theme, &votes)
    }

    /// Tracked members' rows for `theme` from an already loaded listing
    pub fn rows_for_theme(&self, theme: &str, votes: &[VoteListing]) -> Result<Vec<MemberVoteRow>> {
        let detailed = self.filter_by_theme(theme, votes)?;
        Ok(project(&detailed))
    }

    /// Law summary for the vote shared by `rows`
    pub fn fetch_summary(&self, rows: &[MemberVoteRow]) -> Result<String> {
        fetch_summary(&self.fetcher, &self.config, rows)
    }

    /// Law summary of a vote detail record
    pub fn vote_summary(&self, vote: &Vote) -> Result<String> {
        fetch_summary_for_vote(&self.fetcher, &self.config, vote.id, &vote.sources)
    }

    /// Full report for `theme`
    pub fn report(&self, theme: &str, options: &ReportOptions) -> Result<Vec<VoteReport>> {
        let rows = self.theme_rows(theme)?;
        build_report(&self.fetcher, &self.config, &rows, options)
    }
}
