//! Ranked-choice tallying.
//!
//! A slot's winner is the option with the lowest sum of ranks across all
//! ballots (rank 0 is most preferred). Options nobody ranked cannot win
//! unless nobody ranked anything, in which case every option ties. Ties go
//! to the option created first, then to the smallest ID.
//!
//! ```rust
//! use jiff::Timestamp;
//! use tally_core::{
//!     engine::resolve,
//!     models::{Ballot, Day, Occasion, PlanOption, SlotKey},
//! };
//!
//! let at = Timestamp::UNIX_EPOCH;
//! let option = |id: u64| PlanOption {
//!     id,
//!     plan_id: 1,
//!     key: SlotKey::new(Day::Monday, Occasion::Dinner),
//!     label: format!("option {id}"),
//!     notes: None,
//!     chosen: false,
//!     created_at: at,
//! };
//! let ballot = |id: u64, option_id: u64, rank: u32| Ballot {
//!     id,
//!     participant_id: "ana".to_string(),
//!     option_id,
//!     rank,
//!     created_at: at,
//! };
//!
//! let resolution = resolve(&[option(1), option(2)], &[ballot(1, 2, 0), ballot(2, 1, 1)]).unwrap();
//! assert_eq!(resolution.winner, 2);
//! assert!(!resolution.tie_broken);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Ballot, PlanOption};

/// Tally of one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionScore {
    pub option_id: u64,
    /// Sum of ranks, or `None` when no ballot ranked the option.
    pub score: Option<u64>,
    pub ballots: usize,
}

/// Outcome of tallying a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub winner: u64,
    /// Whether more than one option shared the winning score.
    pub tie_broken: bool,
    /// Per-option tallies ordered by option ID.
    pub scores: Vec<OptionScore>,
}

/// Computes the winner among `options` from `ballots`.
///
/// Ballots for options not in `options` are ignored. The result does not
/// depend on the order of either input. Returns `None` when there are no
/// options.
pub fn resolve(options: &[PlanOption], ballots: &[Ballot]) -> Option<Resolution> {
    if options.is_empty() {
        return None;
    }

    let mut tallies: HashMap<u64, (u64, usize)> = HashMap::new();
    for ballot in ballots {
        if options.iter().any(|o| o.id == ballot.option_id) {
            let entry = tallies.entry(ballot.option_id).or_insert((0, 0));
            entry.0 += u64::from(ballot.rank);
            entry.1 += 1;
        }
    }

    let mut scores: Vec<OptionScore> = options
        .iter()
        .map(|o| {
            let tally = tallies.get(&o.id);
            OptionScore {
                option_id: o.id,
                score: tally.map(|(sum, _)| *sum),
                ballots: tally.map_or(0, |(_, count)| *count),
            }
        })
        .collect();
    scores.sort_by_key(|s| s.option_id);
    scores.dedup_by_key(|s| s.option_id);

    let best = scores.iter().filter_map(|s| s.score).min();

    let mut tied: Vec<&PlanOption> = options
        .iter()
        .filter(|o| match best {
            Some(best) => tallies.get(&o.id).map(|(sum, _)| *sum) == Some(best),
            None => true,
        })
        .collect();
    tied.sort_by_key(|o| (o.created_at, o.id));
    tied.dedup_by_key(|o| o.id);

    let winner = tied.first()?.id;

    Some(Resolution {
        winner,
        tie_broken: tied.len() > 1,
        scores,
    })
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::{Day, Occasion, SlotKey};

    fn option(id: u64, created_secs: i64) -> PlanOption {
        PlanOption {
            id,
            plan_id: 1,
            key: SlotKey::new(Day::Monday, Occasion::Dinner),
            label: format!("option {id}"),
            notes: None,
            chosen: false,
            created_at: Timestamp::from_second(created_secs).unwrap(),
        }
    }

    fn ballot(id: u64, participant: &str, option_id: u64, rank: u32) -> Ballot {
        Ballot {
            id,
            participant_id: participant.to_string(),
            option_id,
            rank,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    /// Four participants over A(1), B(2), C(3) giving scores 3, 4 and 5.
    fn three_way_ballots() -> Vec<Ballot> {
        vec![
            ballot(1, "p1", 1, 0),
            ballot(2, "p1", 2, 1),
            ballot(3, "p1", 3, 2),
            ballot(4, "p2", 1, 0),
            ballot(5, "p2", 2, 1),
            ballot(6, "p2", 3, 2),
            ballot(7, "p3", 1, 1),
            ballot(8, "p3", 2, 0),
            ballot(9, "p3", 3, 1),
            ballot(10, "p4", 1, 2),
            ballot(11, "p4", 2, 2),
            ballot(12, "p4", 3, 0),
        ]
    }

    #[test]
    fn test_lowest_score_wins() {
        let options = vec![option(1, 10), option(2, 10), option(3, 10)];
        let resolution = resolve(&options, &three_way_ballots()).unwrap();

        assert_eq!(resolution.winner, 1);
        assert!(!resolution.tie_broken);
        let scores: Vec<Option<u64>> = resolution.scores.iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![Some(3), Some(4), Some(5)]);
        assert!(resolution.scores.iter().all(|s| s.ballots == 4));
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let options = vec![option(1, 10), option(2, 10), option(3, 10)];
        let ballots = three_way_ballots();
        let expected = resolve(&options, &ballots).unwrap();

        let mut reversed_options = options.clone();
        reversed_options.reverse();
        let mut reversed_ballots = ballots.clone();
        reversed_ballots.reverse();
        let mut rotated_ballots = ballots;
        rotated_ballots.rotate_left(5);

        assert_eq!(resolve(&reversed_options, &reversed_ballots).unwrap(), expected);
        assert_eq!(resolve(&options, &rotated_ballots).unwrap(), expected);
    }

    #[test]
    fn test_tie_goes_to_earliest_created() {
        // Option 2 was created first; both score 1
        let options = vec![option(1, 200), option(2, 100)];
        let ballots = vec![ballot(1, "p1", 1, 0), ballot(2, "p2", 2, 0), ballot(3, "p1", 2, 1), ballot(4, "p2", 1, 1)];

        let resolution = resolve(&options, &ballots).unwrap();
        assert_eq!(resolution.winner, 2);
        assert!(resolution.tie_broken);
    }

    #[test]
    fn test_tie_on_creation_time_goes_to_smallest_id() {
        let options = vec![option(9, 100), option(4, 100)];
        let ballots = vec![ballot(1, "p1", 9, 0), ballot(2, "p2", 4, 0)];

        let resolution = resolve(&options, &ballots).unwrap();
        assert_eq!(resolution.winner, 4);
        assert!(resolution.tie_broken);
    }

    #[test]
    fn test_unranked_option_cannot_win() {
        // Option 3 has no ballots; it must not beat option 1 with a score of 2
        let options = vec![option(1, 10), option(2, 10), option(3, 1)];
        let ballots = vec![ballot(1, "p1", 1, 1), ballot(2, "p1", 2, 3), ballot(3, "p2", 1, 1)];

        let resolution = resolve(&options, &ballots).unwrap();
        assert_eq!(resolution.winner, 1);
        assert!(!resolution.tie_broken);
        assert_eq!(resolution.scores[2].score, None);
        assert_eq!(resolution.scores[2].ballots, 0);
    }

    #[test]
    fn test_no_ballots_ties_every_option() {
        let options = vec![option(5, 30), option(6, 20), option(7, 20)];
        let resolution = resolve(&options, &[]).unwrap();

        assert_eq!(resolution.winner, 6);
        assert!(resolution.tie_broken);
    }

    #[test]
    fn test_single_option_without_ballots_is_not_a_tie() {
        let resolution = resolve(&[option(1, 10)], &[]).unwrap();
        assert_eq!(resolution.winner, 1);
        assert!(!resolution.tie_broken);
    }

    #[test]
    fn test_foreign_ballots_are_ignored() {
        let options = vec![option(1, 10), option(2, 10)];
        let ballots = vec![ballot(1, "p1", 2, 0), ballot(2, "p1", 99, 0), ballot(3, "p2", 1, 3)];

        let resolution = resolve(&options, &ballots).unwrap();
        assert_eq!(resolution.winner, 2);
        assert_eq!(resolution.scores.len(), 2);
    }

    #[test]
    fn test_no_options() {
        assert!(resolve(&[], &[ballot(1, "p1", 1, 0)]).is_none());
    }
}
