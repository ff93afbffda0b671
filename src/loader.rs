use crate::client::{query_as, Fetcher};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{VoteListing, VotePage};
use tracing::{debug, info};

/// Load the full vote listing, following `has_next` page by page.
///
/// Pages are numbered from 1. The call whose response has `has_next = false`
/// is the last one made. Votes keep page order, then in-page order. Fails with
/// [`Error::PaginationLimit`] if `config.max_pages` pages were read and the API
/// still reports more.
pub fn load_all_votes<F: Fetcher + ?Sized>(fetcher: &F, config: &Config) -> Result<Vec<VoteListing>> {
    let url = config.votes_url();
    let mut votes = Vec::new();
    let mut page = 1u32;

    loop {
        if page > config.max_pages {
            return Err(Error::PaginationLimit {
                pages: config.max_pages,
            });
        }

        let params = [
            ("page", page.to_string()),
            ("page_size", config.page_size.to_string()),
        ];
        let response: VotePage = query_as(fetcher, &url, &params)?;
        debug!(page, count = response.results.len(), has_next = response.has_next, "loaded vote page");

        votes.extend(response.results);

        if !response.has_next {
            break;
        }
        page += 1;
    }

    info!(pages = page, votes = votes.len(), "loaded vote listing");
    Ok(votes)
}
