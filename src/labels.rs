use crate::types::VoteListing;
use std::collections::BTreeSet;

/// Every EuroVoc label attached to any vote, deduplicated and sorted ascending
pub fn list_labels(votes: &[VoteListing]) -> Vec<String> {
    votes
        .iter()
        .flat_map(|vote| vote.eurovoc_concepts.iter())
        .map(|concept| concept.label.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EurovocConcept;

    fn vote(id: u64, labels: &[&str]) -> VoteListing {
        VoteListing {
            id,
            eurovoc_concepts: labels
                .iter()
                .map(|l| EurovocConcept { label: l.to_string() })
                .collect(),
        }
    }

    #[test]
    fn labels_are_unique_and_sorted() {
        let votes = vec![
            vote(1, &["fisheries", "Environment"]),
            vote(2, &[]),
            vote(3, &["climate change policy", "Environment"]),
        ];
        assert_eq!(
            list_labels(&votes),
            vec!["Environment", "climate change policy", "fisheries"]
        );
    }

    #[test]
    fn no_concepts_means_no_labels() {
        let votes = vec![vote(1, &[]), vote(2, &[])];
        assert!(list_labels(&votes).is_empty());
        assert!(list_labels(&[]).is_empty());
    }
}
