use crate::types::{MemberId, MemberVoteRow, Vote, VoteId};

/// The MEPs whose ballots the report follows
pub const TRACKED_MEMBER_IDS: [MemberId; 6] = [197533, 131580, 197534, 197694, 135511, 97236];

pub fn is_tracked(member_id: MemberId) -> bool {
    TRACKED_MEMBER_IDS.contains(&member_id)
}

/// Flatten member ballots into one row per (vote, tracked member) pair.
/// Rows follow vote order, then ballot order within a vote.
pub fn project(votes: &[Vote]) -> Vec<MemberVoteRow> {
    let mut rows = Vec::new();
    for vote in votes {
        for ballot in &vote.member_votes {
            let member = &ballot.member;
            if !is_tracked(member.id) {
                continue;
            }
            rows.push(MemberVoteRow {
                member_id: member.id,
                first_name: member.first_name.clone(),
                last_name: member.last_name.clone(),
                group: member.group.as_ref().map(|g| g.label.clone()),
                photo_url: member.photo_url.clone(),
                position: ballot.position,
                vote_id: vote.id,
                display_title: vote.display_title.clone(),
                timestamp: vote.timestamp.clone(),
                facts: vote.facts.clone(),
                sources: vote.sources.clone(),
            });
        }
    }
    rows
}

/// Group rows by vote id, keeping the order in which votes first appear
pub fn group_by_vote(rows: &[MemberVoteRow]) -> Vec<(VoteId, Vec<&MemberVoteRow>)> {
    let mut groups: Vec<(VoteId, Vec<&MemberVoteRow>)> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|(id, _)| *id == row.vote_id) {
            Some((_, members)) => members.push(row),
            None => groups.push((row.vote_id, vec![row])),
        }
    }
    groups
}
