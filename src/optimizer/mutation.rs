use crate::config::SearchParams;
use crate::error::{KcResult, KeyClimbError};
use crate::layout::{Cell, Layout};
use fastrand::Rng;

/// Proposes neighbours by cyclically permuting a few random cells.
#[derive(Debug, Clone)]
pub struct MutationOperator {
    k_min: usize,
    k_max: usize,
    cells: Vec<Cell>,
    local_retries: usize,
    max_draws: usize,
}

impl MutationOperator {
    /// `k` is drawn from `k_min..k_max` (exclusive upper bound) over every cell of the grid.
    pub fn new(rows: usize, cols: usize, k_min: usize, k_max: usize) -> KcResult<Self> {
        if k_min < 2 || k_max <= k_min {
            return Err(KeyClimbError::Config(format!(
                "k range {}..{} must be non-empty and start at 2 or more",
                k_min, k_max
            )));
        }
        Ok(Self {
            k_min,
            k_max,
            cells: (0..rows)
                .flat_map(|r| (0..cols).map(move |c| (r, c)))
                .collect(),
            local_retries: 100,
            max_draws: 64,
        })
    }

    pub fn from_params(params: &SearchParams, rows: usize, cols: usize) -> KcResult<Self> {
        Ok(Self::new(rows, cols, params.k_min, params.k_max)?
            .with_retries(params.local_retries, params.max_draws))
    }

    /// Restricts sampling to `cells`.
    pub fn with_cells(mut self, cells: Vec<Cell>) -> Self {
        self.cells = cells;
        self
    }

    pub fn with_retries(mut self, local_retries: usize, max_draws: usize) -> Self {
        self.local_retries = local_retries.max(1);
        self.max_draws = max_draws.max(1);
        self
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Samples `k` distinct cells. A cell that collides with an earlier pick is
    /// redrawn up to `local_retries` times before the whole draw is abandoned.
    pub fn draw_cells(&self, k: usize, rng: &mut Rng) -> KcResult<Vec<Cell>> {
        if !self.cells.is_empty() {
            'draw: for _ in 0..self.max_draws {
                let mut chosen: Vec<Cell> = Vec::with_capacity(k);
                for _ in 0..k {
                    let mut picked = None;
                    for _ in 0..self.local_retries {
                        let cell = self.cells[rng.usize(..self.cells.len())];
                        if !chosen.contains(&cell) {
                            picked = Some(cell);
                            break;
                        }
                    }
                    match picked {
                        Some(cell) => chosen.push(cell),
                        None => continue 'draw,
                    }
                }
                return Ok(chosen);
            }
        }

        Err(KeyClimbError::ExhaustedRetries {
            attempts: self.max_draws,
            reason: format!(
                "cannot pick {} distinct cells out of {} eligible",
                k,
                self.cells.len()
            ),
        })
    }

    /// A neighbour of `layout`. May equal `layout` when the shuffle is the identity.
    pub fn propose(&self, layout: &Layout, rng: &mut Rng) -> KcResult<Layout> {
        let k = rng.usize(self.k_min..self.k_max);
        let positions = self.draw_cells(k, rng)?;
        let mut order = positions.clone();
        rng.shuffle(&mut order);
        layout.apply_permutation(&positions, &order)
    }
}
