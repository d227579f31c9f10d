//! Position index model: the ordering invariant over column groups.
//!
//! Every card belongs to exactly one column group, keyed by
//! `(board, priority)`. Within a group the positions of all cards, completed
//! ones included, must form the set `{0, .., n-1}` with no duplicates and no
//! gaps. The reordering logic in `crate::reorder` must leave this invariant
//! satisfied after every mutation; `verify_positions` is the checker it is
//! held to, and `repair_positions` recovers a group that a concurrent write
//! has corrupted.

use crate::domain::card::{BoardId, Card, Priority};
use crate::error::{LaneError, Result};
use std::collections::HashMap;

/// Grouping key for the position invariant. Not a persisted entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnKey {
    pub board: BoardId,
    pub priority: Priority,
}

impl Card {
    /// The column group this card is ordered within
    pub fn column_key(&self) -> ColumnKey {
        ColumnKey {
            board: self.board,
            priority: self.priority,
        }
    }
}

/// Groups cards by column, preserving input order within each group
pub fn group_by_column(cards: &[Card]) -> HashMap<ColumnKey, Vec<&Card>> {
    let mut groups: HashMap<ColumnKey, Vec<&Card>> = HashMap::new();
    for card in cards {
        groups.entry(card.column_key()).or_default().push(card);
    }
    groups
}

/// Checks that every column group is a contiguous zero-based permutation.
///
/// Returns the first violated column with its observed positions.
pub fn verify_positions(cards: &[Card]) -> Result<()> {
    for (key, group) in group_by_column(cards) {
        let mut positions: Vec<u32> = group.iter().map(|c| c.position).collect();
        positions.sort_unstable();

        let dense = positions
            .iter()
            .enumerate()
            .all(|(rank, &pos)| pos == rank as u32);
        if !dense {
            return Err(LaneError::PositionInvariant {
                board: key.board,
                priority: key.priority,
                detail: format!("expected 0..{}, got {:?}", group.len(), positions),
            });
        }
    }
    Ok(())
}

/// Renumbers every column group densely, ordering by current position with
/// card id as the tiebreaker. Used to recover a group corrupted by a
/// concurrent unserialized write; a no-op on groups already satisfying the
/// invariant.
pub fn repair_positions(cards: &mut [Card]) {
    let mut groups: HashMap<ColumnKey, Vec<usize>> = HashMap::new();
    for (idx, card) in cards.iter().enumerate() {
        groups.entry(card.column_key()).or_default().push(idx);
    }

    for indices in groups.into_values() {
        let mut ordered = indices;
        ordered.sort_by_key(|&i| (cards[i].position, cards[i].id));
        for (rank, idx) in ordered.into_iter().enumerate() {
            let rank = rank as u32;
            if cards[idx].position != rank {
                let priority = cards[idx].priority;
                cards[idx].place(priority, rank);
            }
        }
    }
}
