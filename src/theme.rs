use crate::client::{query_as, Fetcher};
use crate::config::Config;
use crate::error::Result;
use crate::types::{Vote, VoteId, VoteListing};
use tracing::{debug, info};

/// Ids of the votes labelled with `theme`, in listing order
pub fn resolve_vote_ids(theme: &str, votes: &[VoteListing]) -> Vec<VoteId> {
    votes
        .iter()
        .filter(|vote| vote.has_label(theme))
        .map(|vote| vote.id)
        .collect()
}

/// Fetch the detail record of every vote labelled with `theme`.
///
/// The listing omits member ballots, so this issues one `/votes/{id}` request
/// per matching vote, sequentially.
pub fn filter_by_theme<F: Fetcher + ?Sized>(
    fetcher: &F,
    config: &Config,
    theme: &str,
    votes: &[VoteListing],
) -> Result<Vec<Vote>> {
    let ids = resolve_vote_ids(theme, votes);
    info!(theme, matches = ids.len(), "resolved votes for theme");

    ids.into_iter()
        .map(|id| {
            debug!(vote_id = id, "fetching vote detail");
            query_as(fetcher, &config.vote_url(id), &[])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryFetcher;
    use crate::error::Error;
    use crate::types::EurovocConcept;
    use serde_json::json;

    fn vote(id: u64, labels: &[&str]) -> VoteListing {
        VoteListing {
            id,
            eurovoc_concepts: labels
                .iter()
                .map(|l| EurovocConcept { label: l.to_string() })
                .collect(),
        }
    }

    fn listing() -> Vec<VoteListing> {
        vec![
            vote(1, &["fisheries"]),
            vote(3, &["energy policy", "Environment"]),
            vote(5, &[]),
            vote(7, &["Environment"]),
            vote(9, &["environment"]),
        ]
    }

    #[test]
    fn resolves_matching_ids_in_listing_order() {
        assert_eq!(resolve_vote_ids("Environment", &listing()), vec![3, 7]);
    }

    #[test]
    fn unknown_theme_resolves_to_nothing() {
        assert!(resolve_vote_ids("space", &listing()).is_empty());
    }

    fn detail(id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "display_title": format!("Vote {}", id),
            "timestamp": "2024-01-01T10:00:00",
            "facts": null,
            "eurovoc_concepts": [{"label": "Environment"}],
            "member_votes": [],
            "sources": []
        })
    }

    #[test]
    fn fetches_one_detail_per_match() {
        let fetcher = MemoryFetcher::new()
            .with_json("https://howtheyvote.eu/api/votes/3", detail(3))
            .with_json("https://howtheyvote.eu/api/votes/7", detail(7));

        let votes = filter_by_theme(&fetcher, &Config::new(), "Environment", &listing()).unwrap();
        assert_eq!(votes.iter().map(|v| v.id).collect::<Vec<_>>(), vec![3, 7]);
        assert_eq!(
            fetcher.requests(),
            vec![
                "https://howtheyvote.eu/api/votes/3".to_string(),
                "https://howtheyvote.eu/api/votes/7".to_string(),
            ]
        );
    }

    #[test]
    fn detail_without_ballots_is_a_schema_mismatch() {
        let fetcher = MemoryFetcher::new().with_json(
            "https://howtheyvote.eu/api/votes/7",
            json!({"id": 7, "display_title": "x", "timestamp": "t", "eurovoc_concepts": [], "sources": []}),
        );
        let votes = vec![vote(7, &["Environment"])];
        assert!(matches!(
            filter_by_theme(&fetcher, &Config::new(), "Environment", &votes),
            Err(Error::SchemaMismatch { .. })
        ));
    }
}
