//! Report assembly and rendering.
//!
//! [`build_report`] turns member-vote rows into one [`VoteReport`] per vote,
//! scraping the law summary and resolving member photos along the way. The
//! result can be rendered as a standalone HTML page or as plain text.

use crate::client::Fetcher;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::projector::group_by_vote;
use crate::summary::fetch_summary;
use crate::types::{parse_timestamp, BallotIcon, MemberId, MemberVoteRow, Position, VoteId};
use chrono::Utc;
use scraper::Html;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};

/// Everything the renderer shows for one vote
#[derive(Debug, Clone, Serialize)]
pub struct VoteReport {
    pub vote_id: VoteId,
    pub title: String,
    pub timestamp: String,
    /// Raw HTML
    pub facts: Option<String>,
    /// Raw HTML; `None` only when summary failures are tolerated
    pub summary: Option<String>,
    pub members: Vec<MemberReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberReport {
    pub member_id: MemberId,
    pub name: String,
    pub group: Option<String>,
    pub position: Position,
    pub icon: BallotIcon,
    /// Photo URL, or local path when photos were downloaded
    pub photo: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Log summary scrape failures and continue instead of aborting
    pub skip_missing_summaries: bool,
    /// Download member photos into this directory
    pub photos_dir: Option<PathBuf>,
}

/// Fetch a member portrait from the static photo endpoint
pub fn fetch_member_photo<F: Fetcher + ?Sized>(
    fetcher: &F,
    config: &Config,
    member_id: MemberId,
) -> Result<Vec<u8>> {
    fetcher.fetch_bytes(&config.member_photo_url(member_id))
}

/// Resolves and memoises the photo reference of each member for one report
struct PhotoResolver<'a, F: Fetcher + ?Sized> {
    fetcher: &'a F,
    config: &'a Config,
    dir: Option<&'a PathBuf>,
    resolved: HashMap<MemberId, String>,
}

impl<'a, F: Fetcher + ?Sized> PhotoResolver<'a, F> {
    fn resolve(&mut self, member_id: MemberId) -> Result<String> {
        if let Some(photo) = self.resolved.get(&member_id) {
            return Ok(photo.clone());
        }

        let photo = match self.dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                let path = dir.join(format!("{}.jpg", member_id));
                let bytes = fetch_member_photo(self.fetcher, self.config, member_id)?;
                std::fs::write(&path, bytes)?;
                path.to_string_lossy().to_string()
            }
            None => self.config.member_photo_url(member_id),
        };

        self.resolved.insert(member_id, photo.clone());
        Ok(photo)
    }
}

/// Build one report entry per vote, in the order votes first appear in `rows`
pub fn build_report<F: Fetcher + ?Sized>(
    fetcher: &F,
    config: &Config,
    rows: &[MemberVoteRow],
    options: &ReportOptions,
) -> Result<Vec<VoteReport>> {
    let mut photos = PhotoResolver {
        fetcher,
        config,
        dir: options.photos_dir.as_ref(),
        resolved: HashMap::new(),
    };

    let mut reports = Vec::new();
    for (vote_id, vote_rows) in group_by_vote(rows) {
        let first = vote_rows[0];

        let summary = match fetch_summary(fetcher, config, &vote_rows) {
            Ok(summary) => Some(summary),
            Err(e) if options.skip_missing_summaries && is_scrape_failure(&e) => {
                warn!(vote_id, error = %e, "no summary for vote");
                None
            }
            Err(e) => return Err(e),
        };

        let mut members = Vec::with_capacity(vote_rows.len());
        for row in &vote_rows {
            members.push(MemberReport {
                member_id: row.member_id,
                name: row.member_name(),
                group: row.group.clone(),
                position: row.position,
                icon: row.position.icon(),
                photo: photos.resolve(row.member_id)?,
            });
        }

        reports.push(VoteReport {
            vote_id,
            title: first.display_title.clone(),
            timestamp: first.timestamp.clone(),
            facts: first.facts.clone(),
            summary,
            members,
        });
    }

    info!(votes = reports.len(), "built report");
    Ok(reports)
}

/// Failures that `skip_missing_summaries` tolerates: anything on the OEIL side
fn is_scrape_failure(error: &Error) -> bool {
    matches!(
        error,
        Error::SummarySourceNotFound { .. }
            | Error::ScrapeTargetNotFound { .. }
            | Error::Status { .. }
            | Error::Http(_)
    )
}

/// Format an API timestamp for display, falling back to the raw value
pub fn format_timestamp(timestamp: &str) -> String {
    parse_timestamp(timestamp)
        .map(|dt| dt.format("%B %d, %Y at %I:%M %p").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Escape HTML special characters
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Text content of an HTML fragment with whitespace collapsed
fn strip_tags(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    let text: String = parsed.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Plain text rendering for terminals
pub fn render_text(reports: &[VoteReport], theme: &str) -> String {
    let mut out = format!("# {}\n", theme);

    if reports.is_empty() {
        out.push_str("\nNo votes by tracked members for this theme.\n");
        return out;
    }

    for report in reports {
        out.push_str(&format!("\n## {} (vote {})\n", report.title, report.vote_id));
        out.push_str(&format!("Date: {}\n", format_timestamp(&report.timestamp)));
        if let Some(facts) = &report.facts {
            out.push_str(&format!("Facts: {}\n", strip_tags(facts)));
        }
        if let Some(summary) = &report.summary {
            out.push_str(&format!("Summary: {}\n", strip_tags(summary)));
        }
        for member in &report.members {
            let group = member
                .group
                .as_deref()
                .map(|g| format!(" ({})", g))
                .unwrap_or_default();
            out.push_str(&format!(
                "  {} {:<12} {}{}\n",
                member.icon.glyph(),
                member.position.as_str(),
                member.name,
                group
            ));
        }
    }

    out
}

fn render_member_html(member: &MemberReport) -> String {
    let group_html = member
        .group
        .as_deref()
        .map(|g| format!("<span class=\"group\">{}</span>", escape_html(g)))
        .unwrap_or_default();

    format!(
        r#"          <li class="member">
            <img class="photo" src="{}" alt="{}" width="80">
            <div class="member-name">{}{}</div>
            <span class="icon {}" title="{}">{}</span>
          </li>
"#,
        escape_html(&member.photo),
        escape_html(&member.name),
        escape_html(&member.name),
        group_html,
        match member.icon {
            BallotIcon::ThumbsUp => "for",
            BallotIcon::ThumbsDown => "against",
            BallotIcon::Mute => "other",
        },
        member.position.as_str(),
        member.icon.glyph(),
    )
}

/// Standalone HTML page. Facts and summaries are embedded as raw markup.
pub fn render_html(reports: &[VoteReport], theme: &str) -> String {
    let mut items_html = String::new();

    for report in reports {
        let facts_html = report
            .facts
            .as_deref()
            .map(|facts| format!("<div class=\"facts\">{}</div>", facts))
            .unwrap_or_default();

        let summary_html = match &report.summary {
            Some(summary) => format!(
                "<details class=\"summary\"><summary>See explanation</summary>{}</details>",
                summary
            ),
            None => "<p class=\"no-summary\">No summary available.</p>".to_string(),
        };

        let members_html: String = report.members.iter().map(render_member_html).collect();

        items_html.push_str(&format!(
            r#"      <article class="entry" id="vote-{}">
        <header class="entry-header">
          <h2 class="entry-title">{}</h2>
          <time class="entry-date" datetime="{}">{}</time>
        </header>
        <div class="entry-content">
          {}
          {}
        </div>
        <ul class="members">
{}        </ul>
      </article>
"#,
            report.vote_id,
            escape_html(&report.title),
            escape_html(&report.timestamp),
            escape_html(&format_timestamp(&report.timestamp)),
            facts_html,
            summary_html,
            members_html,
        ));
    }

    if reports.is_empty() {
        items_html.push_str("      <p class=\"empty\">No votes by tracked members for this theme.</p>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Votes of the members of the European Parliament: {}</title>
  <style>
    body {{
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
      line-height: 1.6;
      color: #333;
      background: #fafafa;
      margin: 0;
    }}

    .container {{
      max-width: 900px;
      margin: 0 auto;
      padding: 2rem 1rem;
    }}

    .entries {{
      display: flex;
      flex-direction: column;
      gap: 2rem;
    }}

    .entry {{
      background: white;
      border-radius: 8px;
      padding: 2rem;
      box-shadow: 0 1px 3px rgba(0,0,0,0.1);
    }}

    .entry-title {{
      font-size: 1.5rem;
      margin: 0 0 0.5rem;
    }}

    .entry-date {{
      color: #888;
      font-size: 0.9rem;
    }}

    .summary summary {{
      cursor: pointer;
      color: #667eea;
      font-weight: 500;
    }}

    .members {{
      list-style: none;
      padding: 0;
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(180px, 1fr));
      gap: 1rem;
    }}

    .member {{
      display: flex;
      flex-direction: column;
      align-items: center;
      text-align: center;
    }}

    .photo {{
      border-radius: 4px;
      cursor: pointer;
      transition: all .2s ease-in-out;
    }}

    .photo:hover {{
      transform: scale(1.1);
    }}

    .group {{
      display: block;
      color: #888;
      font-size: 0.85rem;
    }}

    .icon {{
      font-size: 2rem;
    }}

    footer {{
      text-align: center;
      padding: 2rem 0;
      color: #888;
      font-size: 0.9rem;
    }}
  </style>
</head>
<body>
  <main class="container">
    <h1>Votes of the members of the European Parliament</h1>
    <p class="theme">EuroVoc theme: <strong>{}</strong></p>
    <div class="entries">
{}    </div>
  </main>

  <footer>
    <p>Generated by ep-votes • Last updated: {}</p>
  </footer>
</body>
</html>
"#,
        escape_html(theme),
        escape_html(theme),
        items_html,
        Utc::now().format("%B %d, %Y at %I:%M %p UTC")
    )
}
