mod common;

use common::*;
use ep_votes::prelude::*;

/// Snapshot of the text report for the single-vote fixture.
/// To update after changing the renderer, run:
///   cargo insta review
#[test]
fn text_report_snapshot() {
    let pipeline = VotePipeline::new(Config::new(), single_vote_fetcher());
    let reports = pipeline
        .report("Environment", &ReportOptions::default())
        .expect("report should build from fixtures");

    let text = render_text(&reports, "Environment");

    insta::assert_snapshot!(text, @r###"
    # Environment

    ## Nature restoration (vote 162214)
    Date: February 27, 2024 at 12:21 PM
    Summary: Binding restoration targets.
      👍 FOR          Ana Example (Greens/European Free Alliance)
    "###);
}

#[test]
fn html_report_embeds_vote_and_members() {
    let pipeline = VotePipeline::new(Config::new(), single_vote_fetcher());
    let reports = pipeline
        .report("Environment", &ReportOptions::default())
        .expect("report should build from fixtures");

    let html = render_html(&reports, "Environment");

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<article class=\"entry\" id=\"vote-162214\">"));
    assert!(html.contains("<h2 class=\"entry-title\">Nature restoration</h2>"));
    assert!(html.contains("<details class=\"summary\"><summary>See explanation</summary><p>Binding restoration targets.</p></details>"));
    assert!(html.contains("<span class=\"icon for\" title=\"FOR\">👍</span>"));
    assert!(!html.contains("Untracked"));
}

#[test]
fn json_report_snapshot() {
    let pipeline = VotePipeline::new(Config::new(), single_vote_fetcher());
    let reports = pipeline
        .report("Environment", &ReportOptions::default())
        .expect("report should build from fixtures");

    insta::assert_json_snapshot!(reports[0].members, @r###"
    [
      {
        "member_id": 197533,
        "name": "Ana Example",
        "group": "Greens/European Free Alliance",
        "position": "FOR",
        "icon": "thumbs_up",
        "photo": "https://howtheyvote.eu/api/static/members/197533.jpg"
      }
    ]
    "###);
}
