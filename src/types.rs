use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub type VoteId = u64;
pub type MemberId = u64;

/// One page of the `/votes` listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotePage {
    pub results: Vec<VoteListing>,
    pub has_next: bool,
}

/// A vote as returned by the listing endpoint (no member ballots)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteListing {
    pub id: VoteId,
    pub eurovoc_concepts: Vec<EurovocConcept>,
}

impl VoteListing {
    pub fn has_label(&self, label: &str) -> bool {
        self.eurovoc_concepts.iter().any(|c| c.label == label)
    }
}

/// EuroVoc classification concept attached to a vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EurovocConcept {
    pub label: String,
}

/// Full vote detail record from `/votes/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    pub display_title: String,
    pub timestamp: String,
    /// HTML fragment, absent for many votes
    #[serde(default)]
    pub facts: Option<String>,
    pub eurovoc_concepts: Vec<EurovocConcept>,
    pub member_votes: Vec<MemberVote>,
    pub sources: Vec<Source>,
}

/// External source attached to a vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: String,
}

/// A single member's ballot on a vote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberVote {
    pub member: Member,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub group: Option<Group>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Political group of a member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub label: String,
}

/// Recorded position of a member on a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    For,
    Against,
    Abstention,
    DidNotVote,
    #[serde(other)]
    Other,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::For => "FOR",
            Position::Against => "AGAINST",
            Position::Abstention => "ABSTENTION",
            Position::DidNotVote => "DID_NOT_VOTE",
            Position::Other => "OTHER",
        }
    }

    pub fn icon(&self) -> BallotIcon {
        match self {
            Position::For => BallotIcon::ThumbsUp,
            Position::Against => BallotIcon::ThumbsDown,
            _ => BallotIcon::Mute,
        }
    }
}

/// The three icon states a ballot is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallotIcon {
    ThumbsUp,
    ThumbsDown,
    Mute,
}

impl BallotIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            BallotIcon::ThumbsUp => "👍",
            BallotIcon::ThumbsDown => "👎",
            BallotIcon::Mute => "🔇",
        }
    }
}

/// Denormalised join of one member ballot with its vote's metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberVoteRow {
    pub member_id: MemberId,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub position: Position,
    pub vote_id: VoteId,
    pub display_title: String,
    pub timestamp: String,
    pub facts: Option<String>,
    pub sources: Vec<Source>,
}

impl MemberVoteRow {
    pub fn member_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Parse an API timestamp. The API emits naive ISO 8601 (`2024-04-23T12:06:51`);
/// RFC 3339 with an offset is accepted too.
pub fn parse_timestamp(timestamp: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_decodes_known_and_unknown_values() {
        let positions: Vec<Position> =
            serde_json::from_str(r#"["FOR", "AGAINST", "ABSTENTION", "DID_NOT_VOTE", "PAIRED"]"#)
                .unwrap();
        assert_eq!(
            positions,
            vec![
                Position::For,
                Position::Against,
                Position::Abstention,
                Position::DidNotVote,
                Position::Other,
            ]
        );
    }

    #[test]
    fn position_icons_collapse_to_three_states() {
        assert_eq!(Position::For.icon(), BallotIcon::ThumbsUp);
        assert_eq!(Position::Against.icon(), BallotIcon::ThumbsDown);
        assert_eq!(Position::Abstention.icon(), BallotIcon::Mute);
        assert_eq!(Position::DidNotVote.icon(), BallotIcon::Mute);
        assert_eq!(Position::Other.icon(), BallotIcon::Mute);
    }

    #[test]
    fn vote_detail_tolerates_missing_optional_fields() {
        let json = serde_json::json!({
            "id": 162214,
            "display_title": "Nature restoration",
            "timestamp": "2024-02-27T12:21:08",
            "eurovoc_concepts": [],
            "member_votes": [{
                "member": {"id": 197533, "first_name": "Ana", "last_name": "Pérez"},
                "position": "FOR"
            }],
            "sources": []
        });
        let vote: Vote = serde_json::from_value(json).unwrap();
        assert!(vote.facts.is_none());
        assert!(vote.member_votes[0].member.group.is_none());
    }

    #[test]
    fn parses_naive_and_offset_timestamps() {
        let naive = parse_timestamp("2024-02-27T12:21:08").unwrap();
        assert_eq!(naive.to_string(), "2024-02-27 12:21:08");
        let offset = parse_timestamp("2024-02-27T13:21:08+01:00").unwrap();
        assert_eq!(offset, naive);
        assert!(parse_timestamp("yesterday").is_none());
    }
}
