use crate::geometry::{GridGeometry, Hand};
use crate::layout::Cell;

/// How an n-gram fares under the inward-roll walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Roll {
    /// Every step moved toward the hand's centre.
    Inward,
    /// The same boundary column was struck twice in a row.
    Jammed,
    Void,
}

/// True when the n-gram is typed with a fresh finger for every key, stays out
/// of the reach rows and does not span both boundary rows.
pub fn is_conflict_free(geom: &GridGeometry, cells: &[Cell]) -> bool {
    let mut fingers: u64 = 0;
    let mut rows: u64 = 0;

    for &(row, col) in cells {
        if geom.is_reach_row(row) {
            return false;
        }
        let bit = 1u64 << geom.finger(col);
        if fingers & bit != 0 {
            return false;
        }
        fingers |= bit;
        rows |= 1u64 << row;
    }

    match geom.boundary_rows {
        Some((a, b)) => rows & (1u64 << a) == 0 || rows & (1u64 << b) == 0,
        None => true,
    }
}

pub fn roll(geom: &GridGeometry, cells: &[Cell]) -> Roll {
    let Some(&(row, first_col)) = cells.first() else {
        return Roll::Void;
    };
    if geom.is_reach_row(row) {
        return Roll::Void;
    }

    let hand = geom.hand_of(first_col);
    let boundary = geom.boundary_col(hand);
    let mut prev = first_col;

    for &(row, col) in &cells[1..] {
        if geom.is_reach_row(row) || geom.hand_of(col) != hand {
            return Roll::Void;
        }
        let inward = match hand {
            Hand::Left => col > prev,
            Hand::Right => col < prev,
        };
        if !inward {
            if col == prev && col == boundary {
                return Roll::Jammed;
            }
            return Roll::Void;
        }
        prev = col;
    }
    Roll::Inward
}

/// True when the n-gram uses both hands.
pub fn alternates(geom: &GridGeometry, cells: &[Cell]) -> bool {
    match cells.first() {
        Some(&(_, c0)) => {
            let hand = geom.hand_of(c0);
            cells.iter().any(|&(_, c)| geom.hand_of(c) != hand)
        }
        None => false,
    }
}
