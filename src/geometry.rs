use crate::error::{KcResult, KeyClimbError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
}

/// Ergonomic description of the grid the cost model scores against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub rows: usize,
    pub cols: usize,
    /// Finger group of each column (many-to-one).
    pub finger_of_col: Vec<u8>,
    /// Columns below this index are typed by the left hand.
    pub hand_split: usize,
    /// Rows in the top/reach zone.
    pub reach_rows: Vec<usize>,
    /// Using both of these rows in one n-gram voids the finger-conflict bonus.
    #[serde(default)]
    pub boundary_rows: Option<(usize, usize)>,
    /// Per-cell capability, `static_effort[row][col]`. Higher is better.
    pub static_effort: Vec<Vec<i64>>,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self::standard()
    }
}

impl GridGeometry {
    /// 4x8 split grid: row 0 is the reach row, row 2 the home row,
    /// one finger per column, four columns per hand.
    pub fn standard() -> Self {
        Self {
            rows: 4,
            cols: 8,
            finger_of_col: (0..8).collect(),
            hand_split: 4,
            reach_rows: vec![0],
            boundary_rows: Some((1, 3)),
            static_effort: vec![
                vec![0, 1, 1, 0, 0, 1, 1, 0],
                vec![2, 4, 5, 3, 3, 5, 4, 2],
                vec![5, 7, 8, 8, 8, 8, 7, 5],
                vec![1, 3, 4, 4, 4, 4, 3, 1],
            ],
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> KcResult<Self> {
        let content = fs::read_to_string(path)?;
        let geometry: GridGeometry = serde_json::from_str(&content)?;
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn validate(&self) -> KcResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(KeyClimbError::Config("geometry has no cells".into()));
        }
        if self.finger_of_col.len() != self.cols {
            return Err(KeyClimbError::Config(format!(
                "finger_of_col has {} entries for {} columns",
                self.finger_of_col.len(),
                self.cols
            )));
        }
        if self.rows > 64 || self.finger_of_col.iter().any(|&f| f >= 64) {
            return Err(KeyClimbError::Config(
                "at most 64 rows and finger groups 0..64 are supported".into(),
            ));
        }
        if self.hand_split == 0 || self.hand_split >= self.cols {
            return Err(KeyClimbError::Config(format!(
                "hand_split {} must fall strictly inside 0..{}",
                self.hand_split, self.cols
            )));
        }
        if let Some(&r) = self.reach_rows.iter().find(|&&r| r >= self.rows) {
            return Err(KeyClimbError::Config(format!("reach row {} out of range", r)));
        }
        if let Some((a, b)) = self.boundary_rows {
            if a >= self.rows || b >= self.rows || a == b {
                return Err(KeyClimbError::Config(format!(
                    "boundary rows ({}, {}) must be two distinct rows",
                    a, b
                )));
            }
        }
        if self.static_effort.len() != self.rows
            || self.static_effort.iter().any(|r| r.len() != self.cols)
        {
            return Err(KeyClimbError::Config(format!(
                "static_effort must be {}x{}",
                self.rows, self.cols
            )));
        }
        Ok(())
    }

    #[inline(always)]
    pub fn is_reach_row(&self, row: usize) -> bool {
        self.reach_rows.contains(&row)
    }

    #[inline(always)]
    pub fn hand_of(&self, col: usize) -> Hand {
        if col < self.hand_split {
            Hand::Left
        } else {
            Hand::Right
        }
    }

    /// Innermost column of a hand.
    #[inline(always)]
    pub fn boundary_col(&self, hand: Hand) -> usize {
        match hand {
            Hand::Left => self.hand_split - 1,
            Hand::Right => self.hand_split,
        }
    }

    #[inline(always)]
    pub fn finger(&self, col: usize) -> u8 {
        self.finger_of_col[col]
    }

    #[inline(always)]
    pub fn effort(&self, row: usize, col: usize) -> i64 {
        self.static_effort[row][col]
    }
}
