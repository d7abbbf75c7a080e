use crate::error::{KcResult, KeyClimbError};
use fastrand::Rng;
use std::fmt;

/// Grid coordinate as `(row, col)`.
pub type Cell = (usize, usize);

/// Largest grid the byte-indexed [`PositionIndex`] can address.
pub const MAX_CELLS: usize = 255;

const ABSENT: u8 = u8::MAX;

/// An immutable assignment of symbols to grid cells.
///
/// Instances are only produced by [`LayoutRules`] (validated) or by
/// [`Layout::apply_permutation`] (structurally sound, not re-validated).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Layout {
    rows: usize,
    cols: usize,
    blank: u8,
    cells: Box<[u8]>,
}

impl Layout {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn blank(&self) -> u8 {
        self.blank
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn get(&self, (row, col): Cell) -> u8 {
        self.cells[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[u8] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// One string per grid row.
    pub fn row_strings(&self) -> Vec<String> {
        (0..self.rows)
            .map(|r| String::from_utf8_lossy(self.row(r)).into_owned())
            .collect()
    }

    /// Compact single-line form, rows joined by `/`.
    pub fn to_compact(&self) -> String {
        self.row_strings().join("/")
    }

    /// Symbol -> cell lookup table for this layout. Blank cells are not indexed.
    pub fn position_index(&self) -> PositionIndex {
        let mut slots = [ABSENT; 256];
        for (i, &byte) in self.cells.iter().enumerate() {
            if byte == self.blank {
                continue;
            }
            slots[byte as usize] = i as u8;
            if byte.is_ascii_uppercase() {
                slots[byte.to_ascii_lowercase() as usize] = i as u8;
            } else if byte.is_ascii_lowercase() {
                slots[byte.to_ascii_uppercase() as usize] = i as u8;
            }
        }
        PositionIndex {
            slots,
            cols: self.cols,
        }
    }

    /// Returns a new layout where the symbol found at `positions[i]` now sits at `order[i]`.
    ///
    /// `order` must be a rearrangement of `positions`. Blank-count and pinned
    /// region rules are not checked here.
    pub fn apply_permutation(&self, positions: &[Cell], order: &[Cell]) -> KcResult<Layout> {
        if positions.len() != order.len() {
            return Err(KeyClimbError::InvalidPermutation(format!(
                "{} positions but {} targets",
                positions.len(),
                order.len()
            )));
        }

        let mut seen = vec![false; self.cells.len()];
        for &(r, c) in positions {
            if r >= self.rows || c >= self.cols {
                return Err(KeyClimbError::InvalidPermutation(format!(
                    "cell ({}, {}) outside {}x{} grid",
                    r, c, self.rows, self.cols
                )));
            }
            let idx = r * self.cols + c;
            if seen[idx] {
                return Err(KeyClimbError::InvalidPermutation(format!(
                    "cell ({}, {}) listed twice",
                    r, c
                )));
            }
            seen[idx] = true;
        }

        let mut sorted_positions = positions.to_vec();
        let mut sorted_order = order.to_vec();
        sorted_positions.sort_unstable();
        sorted_order.sort_unstable();
        if sorted_positions != sorted_order {
            return Err(KeyClimbError::InvalidPermutation(
                "targets are not a rearrangement of the positions".to_string(),
            ));
        }

        let mut cells = self.cells.clone();
        for (&(fr, fc), &(tr, tc)) in positions.iter().zip(order) {
            cells[tr * self.cols + tc] = self.cells[fr * self.cols + fc];
        }

        Ok(Layout {
            rows: self.rows,
            cols: self.cols,
            blank: self.blank,
            cells,
        })
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.row_strings().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// O(1) symbol -> cell lookups, case-insensitive for ASCII letters.
#[derive(Clone)]
pub struct PositionIndex {
    slots: [u8; 256],
    cols: usize,
}

impl PositionIndex {
    #[inline(always)]
    pub fn get(&self, symbol: u8) -> Option<Cell> {
        match self.slots[symbol as usize] {
            ABSENT => None,
            idx => {
                let idx = idx as usize;
                Some((idx / self.cols, idx % self.cols))
            }
        }
    }
}

/// Symbols that must stay within a set of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub symbols: Vec<u8>,
    pub rows: Vec<usize>,
}

/// Why a grid is not a valid layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Shape { rows: usize, cols: usize },
    Foreign(u8),
    Duplicate(u8),
    Missing(u8),
    BlankCount { found: usize, expected: usize },
    OutsideRegion { symbol: u8, row: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Shape { rows, cols } => write!(f, "grid must be {}x{}", rows, cols),
            Violation::Foreign(b) => write!(f, "symbol '{}' is not in the alphabet", *b as char),
            Violation::Duplicate(b) => write!(f, "symbol '{}' appears more than once", *b as char),
            Violation::Missing(b) => write!(f, "symbol '{}' is missing", *b as char),
            Violation::BlankCount { found, expected } => {
                write!(f, "found {} blanks, expected {}", found, expected)
            }
            Violation::OutsideRegion { symbol, row } => write!(
                f,
                "pinned symbol '{}' sits on row {} outside its region",
                *symbol as char, row
            ),
        }
    }
}

/// Grid shape, alphabet, blank placeholder and pinned regions for one configuration.
#[derive(Debug, Clone)]
pub struct LayoutRules {
    rows: usize,
    cols: usize,
    alphabet: Vec<u8>,
    blank: u8,
    blank_count: usize,
    pins: Vec<Pin>,
}

impl LayoutRules {
    /// The blank count is whatever is left of the grid once every symbol has a cell.
    pub fn new(rows: usize, cols: usize, alphabet: &[u8], blank: u8) -> KcResult<Self> {
        let size = rows * cols;
        if rows == 0 || cols == 0 {
            return Err(KeyClimbError::Config("grid must have at least one cell".into()));
        }
        if size > MAX_CELLS {
            return Err(KeyClimbError::Config(format!(
                "{}x{} grid exceeds {} cells",
                rows, cols, MAX_CELLS
            )));
        }
        if alphabet.len() > size {
            return Err(KeyClimbError::Config(format!(
                "{} symbols do not fit a {}x{} grid",
                alphabet.len(),
                rows,
                cols
            )));
        }

        let mut seen = [false; 256];
        for &b in alphabet {
            if b == blank {
                return Err(KeyClimbError::Config(format!(
                    "blank '{}' cannot also be an alphabet symbol",
                    blank as char
                )));
            }
            if seen[b as usize] {
                return Err(KeyClimbError::Config(format!(
                    "symbol '{}' listed twice in alphabet",
                    b as char
                )));
            }
            // The position index folds ASCII case, so 'a' and 'A' would share a slot.
            let other = if b.is_ascii_uppercase() {
                b.to_ascii_lowercase()
            } else {
                b.to_ascii_uppercase()
            };
            if other != b && seen[other as usize] {
                return Err(KeyClimbError::Config(format!(
                    "symbols '{}' and '{}' differ only in case",
                    other as char, b as char
                )));
            }
            seen[b as usize] = true;
        }

        Ok(Self {
            rows,
            cols,
            alphabet: alphabet.to_vec(),
            blank,
            blank_count: size - alphabet.len(),
            pins: Vec::new(),
        })
    }

    /// Confines `symbols` to `rows`. Regions of different pins must be disjoint.
    pub fn with_pin(mut self, symbols: &[u8], rows: &[usize]) -> KcResult<Self> {
        if symbols.is_empty() {
            return Ok(self);
        }
        if rows.is_empty() {
            return Err(KeyClimbError::Config("pinned region has no rows".into()));
        }
        for &r in rows {
            if r >= self.rows {
                return Err(KeyClimbError::Config(format!(
                    "pinned row {} outside {}-row grid",
                    r, self.rows
                )));
            }
            if self.pins.iter().any(|p| p.rows.contains(&r)) {
                return Err(KeyClimbError::Config(format!(
                    "row {} already belongs to another pinned region",
                    r
                )));
            }
        }
        for &s in symbols {
            if !self.alphabet.contains(&s) {
                return Err(KeyClimbError::Config(format!(
                    "pinned symbol '{}' is not in the alphabet",
                    s as char
                )));
            }
            if self.pins.iter().any(|p| p.symbols.contains(&s)) {
                return Err(KeyClimbError::Config(format!(
                    "symbol '{}' pinned twice",
                    s as char
                )));
            }
        }
        if symbols.len() > rows.len() * self.cols {
            return Err(KeyClimbError::Config(format!(
                "{} pinned symbols do not fit {} row(s)",
                symbols.len(),
                rows.len()
            )));
        }

        let mut rows = rows.to_vec();
        rows.sort_unstable();
        rows.dedup();
        self.pins.push(Pin {
            symbols: symbols.to_vec(),
            rows,
        });
        Ok(self)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn alphabet(&self) -> &[u8] {
        &self.alphabet
    }

    pub fn blank(&self) -> u8 {
        self.blank
    }

    pub fn blank_count(&self) -> usize {
        self.blank_count
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Every cell of the grid in row-major order.
    pub fn all_cells(&self) -> Vec<Cell> {
        (0..self.rows)
            .flat_map(|r| (0..self.cols).map(move |c| (r, c)))
            .collect()
    }

    /// Validates `grid` (one string per row) and wraps it as a [`Layout`].
    pub fn build<S: AsRef<str>>(&self, grid: &[S]) -> KcResult<Layout> {
        if grid.len() != self.rows || grid.iter().any(|r| r.as_ref().len() != self.cols) {
            return Err(KeyClimbError::InvalidLayout(
                Violation::Shape {
                    rows: self.rows,
                    cols: self.cols,
                }
                .to_string(),
            ));
        }

        let cells: Vec<u8> = grid.iter().flat_map(|r| r.as_ref().bytes()).collect();
        let layout = Layout {
            rows: self.rows,
            cols: self.cols,
            blank: self.blank,
            cells: cells.into_boxed_slice(),
        };
        self.check(&layout)?;
        Ok(layout)
    }

    /// Parses rows separated by `/` or newlines.
    pub fn parse(&self, text: &str) -> KcResult<Layout> {
        let rows: Vec<&str> = text
            .split(['/', '\n'])
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect();
        self.build(&rows)
    }

    pub fn check(&self, layout: &Layout) -> KcResult<()> {
        match self.find_violation(layout) {
            None => Ok(()),
            Some(v) => Err(KeyClimbError::InvalidLayout(v.to_string())),
        }
    }

    pub fn is_valid(&self, layout: &Layout) -> bool {
        self.find_violation(layout).is_none()
    }

    pub fn find_violation(&self, layout: &Layout) -> Option<Violation> {
        if layout.rows != self.rows || layout.cols != self.cols || layout.blank != self.blank {
            return Some(Violation::Shape {
                rows: self.rows,
                cols: self.cols,
            });
        }

        let mut allowed = [false; 256];
        for &b in &self.alphabet {
            allowed[b as usize] = true;
        }

        let mut counts = [0u16; 256];
        let mut blanks = 0;
        for &b in layout.cells.iter() {
            if b == self.blank {
                blanks += 1;
            } else if !allowed[b as usize] {
                return Some(Violation::Foreign(b));
            } else {
                counts[b as usize] += 1;
                if counts[b as usize] > 1 {
                    return Some(Violation::Duplicate(b));
                }
            }
        }

        if let Some(&missing) = self.alphabet.iter().find(|&&b| counts[b as usize] == 0) {
            return Some(Violation::Missing(missing));
        }
        if blanks != self.blank_count {
            return Some(Violation::BlankCount {
                found: blanks,
                expected: self.blank_count,
            });
        }

        for pin in &self.pins {
            for &symbol in &pin.symbols {
                if let Some(idx) = layout.cells.iter().position(|&b| b == symbol) {
                    let row = idx / self.cols;
                    if !pin.rows.contains(&row) {
                        return Some(Violation::OutsideRegion { symbol, row });
                    }
                }
            }
        }

        None
    }

    /// A uniformly shuffled layout that honours every pinned region.
    pub fn random(&self, rng: &mut Rng) -> Layout {
        let mut cells = vec![self.blank; self.rows * self.cols];
        let mut taken = vec![false; cells.len()];
        let mut pinned = [false; 256];

        for pin in &self.pins {
            let mut region: Vec<usize> = pin
                .rows
                .iter()
                .flat_map(|&r| (0..self.cols).map(move |c| r * self.cols + c))
                .collect();
            rng.shuffle(&mut region);
            for (&symbol, &idx) in pin.symbols.iter().zip(&region) {
                cells[idx] = symbol;
                taken[idx] = true;
                pinned[symbol as usize] = true;
            }
        }

        let mut pool: Vec<u8> = self
            .alphabet
            .iter()
            .copied()
            .filter(|&b| !pinned[b as usize])
            .collect();
        pool.resize(pool.len() + self.blank_count, self.blank);
        rng.shuffle(&mut pool);

        let free = (0..cells.len()).filter(|&i| !taken[i]);
        for (idx, symbol) in free.zip(pool) {
            cells[idx] = symbol;
        }

        Layout {
            rows: self.rows,
            cols: self.cols,
            blank: self.blank,
            cells: cells.into_boxed_slice(),
        }
    }
}
