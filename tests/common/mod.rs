#![allow(dead_code)]

use ep_votes::MemoryFetcher;
use serde_json::{json, Value};

pub const API: &str = "https://howtheyvote.eu/api";
pub const PROCEDURE_URL: &str =
    "https://oeil.secure.europarl.europa.eu/oeil/popups/ficheprocedure.do?reference=2022/0195(COD)&l=en";
pub const SUMMARY_URL: &str =
    "https://oeil.secure.europarl.europa.eu/oeil/popups/summary.do?id=1765432&t=e&l=en";

pub const PROCEDURE_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
  <h1>2022/0195(COD) Nature restoration</h1>
  <button id="summary" type="button" onclick="location.href='/oeil/popups/summary.do?id=1765432&amp;t=e&amp;l=en'">Summary</button>
</body></html>"#;

pub const SUMMARY_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
  <div class="ep-a_heading"><h2>Summary</h2></div>
  <div class="ep-a_text"><p>Binding restoration targets.</p></div>
</body></html>"#;

pub fn page_key(page: u32) -> String {
    format!("{}/votes?page={}&page_size=200", API, page)
}

pub fn vote_key(id: u64) -> String {
    format!("{}/votes/{}", API, id)
}

pub fn listing(id: u64, labels: &[&str]) -> Value {
    let concepts: Vec<Value> = labels.iter().map(|l| json!({"id": "1", "label": l})).collect();
    json!({
        "id": id,
        "display_title": format!("Vote {}", id),
        "timestamp": "2024-02-27T12:21:08",
        "is_main": true,
        "eurovoc_concepts": concepts
    })
}

pub fn ballot(id: u64, first: &str, last: &str, position: &str) -> Value {
    json!({
        "member": {
            "id": id,
            "first_name": first,
            "last_name": last,
            "country": {"code": "DEU", "label": "Germany"},
            "group": {"code": "GREEN_EFA", "label": "Greens/European Free Alliance"},
            "photo_url": format!("{}/static/members/{}.jpg", API, id)
        },
        "position": position
    })
}

pub fn detail(id: u64, title: &str, ballots: Vec<Value>, sources: Vec<Value>) -> Value {
    json!({
        "id": id,
        "display_title": title,
        "timestamp": "2024-02-27T12:21:08",
        "facts": null,
        "eurovoc_concepts": [{"id": "1", "label": "Environment"}],
        "member_votes": ballots,
        "sources": sources,
        "stats": {"total": {"FOR": 329, "AGAINST": 275, "ABSTENTION": 24}}
    })
}

pub fn procedure_source() -> Value {
    json!({"name": "Procedure file (Legislative Observatory)", "url": PROCEDURE_URL})
}

/// One listing page with a single "Environment" vote carrying one tracked FOR ballot
pub fn single_vote_fetcher() -> MemoryFetcher {
    MemoryFetcher::new()
        .with_json(
            page_key(1),
            json!({"results": [listing(162214, &["Environment", "nature conservation"])], "has_next": false}),
        )
        .with_json(
            vote_key(162214),
            detail(
                162214,
                "Nature restoration",
                vec![
                    ballot(197533, "Ana", "Example", "FOR"),
                    ballot(1, "Untracked", "Member", "AGAINST"),
                ],
                vec![
                    json!({"name": "Plenary session (Results of votes)", "url": "::not-a-url::"}),
                    procedure_source(),
                ],
            ),
        )
        .with_text(PROCEDURE_URL, PROCEDURE_PAGE)
        .with_text(SUMMARY_URL, SUMMARY_PAGE)
}
