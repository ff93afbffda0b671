//! Law summaries scraped from the Legislative Observatory (OEIL).
//!
//! A vote's "Procedure file" source points at an OEIL procedure page. That
//! page carries a `button#summary` whose `onclick` navigates to the summary
//! popup; the popup renders the summary inside `div.ep-a_text`. Any change in
//! that structure surfaces as [`Error::ScrapeTargetNotFound`].

use crate::client::Fetcher;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{MemberVoteRow, Source, VoteId};
use regex::Regex;
use scraper::{Html, Selector};
use std::borrow::Borrow;
use tracing::debug;

const SUMMARY_BUTTON: &str = "button#summary";
const SUMMARY_CONTAINER: &str = "div.ep-a_text";

/// URL of the source named `name`. When several sources share the name the
/// last one wins.
pub fn find_source_url<'a>(sources: &'a [Source], name: &str) -> Option<&'a str> {
    sources
        .iter()
        .rev()
        .find(|source| source.name == name)
        .map(|source| source.url.as_str())
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Config(format!("Invalid selector '{}': {}", css, e)))
}

fn not_found(url: &str, target: &str) -> Error {
    Error::ScrapeTargetNotFound {
        url: url.to_string(),
        target: target.to_string(),
    }
}

/// Pull the summary popup path out of the procedure page's summary button
pub fn extract_summary_path(page_url: &str, html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let button = document
        .select(&selector(SUMMARY_BUTTON)?)
        .next()
        .ok_or_else(|| not_found(page_url, SUMMARY_BUTTON))?;
    let onclick = button
        .value()
        .attr("onclick")
        .ok_or_else(|| not_found(page_url, "summary button onclick"))?;

    let redirect = Regex::new(r#"location\.href\s*=\s*(.+)"#)?;
    let target = redirect
        .captures(onclick)
        .and_then(|caps| caps.get(1))
        .map(|m| {
            m.as_str()
                .trim()
                .trim_end_matches(';')
                .trim_matches(|c| c == '\'' || c == '"')
                .to_string()
        })
        .filter(|path| !path.is_empty())
        .ok_or_else(|| not_found(page_url, "location.href in summary button"))?;

    Ok(target)
}

/// Resolve a popup path against the OEIL host; absolute URLs pass through
pub fn absolute_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Inner markup of the summary text container
pub fn extract_summary_fragment(page_url: &str, html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    document
        .select(&selector(SUMMARY_CONTAINER)?)
        .next()
        .map(|container| container.inner_html())
        .ok_or_else(|| not_found(page_url, SUMMARY_CONTAINER))
}

/// Scrape the law summary for a vote from its sources
pub fn fetch_summary_for_vote<F: Fetcher + ?Sized>(
    fetcher: &F,
    config: &Config,
    vote_id: VoteId,
    sources: &[Source],
) -> Result<String> {
    let procedure_url = find_source_url(sources, &config.summary_source_name)
        .ok_or(Error::SummarySourceNotFound { vote_id })?;

    debug!(vote_id, url = procedure_url, "fetching procedure file");
    let procedure_page = fetcher.fetch_text(procedure_url)?;
    let path = extract_summary_path(procedure_url, &procedure_page)?;

    let summary_url = absolute_url(&config.observatory_base_url, &path);
    debug!(vote_id, url = %summary_url, "fetching summary");
    let summary_page = fetcher.fetch_text(&summary_url)?;

    extract_summary_fragment(&summary_url, &summary_page)
}

/// Scrape the law summary for the vote shared by `rows`.
/// Sources are read from the first row; all rows of a vote carry the same ones.
pub fn fetch_summary<F, R>(fetcher: &F, config: &Config, rows: &[R]) -> Result<String>
where
    F: Fetcher + ?Sized,
    R: Borrow<MemberVoteRow>,
{
    let first = rows.first().ok_or(Error::NoRows)?.borrow();
    fetch_summary_for_vote(fetcher, config, first.vote_id, &first.sources)
}
