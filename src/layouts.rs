use crate::error::KcResult;
use crate::layout::{Layout, LayoutRules};
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// Named starting points for the default 4x8 grid.
#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum KnownLayout {
    Alphabetical,
    Workman,
}

impl KnownLayout {
    pub fn rows(&self) -> [&'static str; 4] {
        match self {
            Self::Alphabetical => ["Q-X-Z---", "ABCDEFGH", "IJKLMNOP", "RSTUVWY'"],
            // Workman-style letter order folded onto four 8-key rows.
            Self::Workman => ["Q-X-Z---", "DRWBJFUP", "SHTGYNEO", "AMCVKLI'"],
        }
    }

    pub fn build(&self, rules: &LayoutRules) -> KcResult<Layout> {
        rules.build(&self.rows())
    }
}

/// Accepts a [`KnownLayout`] name or rows separated by `/`.
pub fn resolve_layout(text: &str, rules: &LayoutRules) -> KcResult<Layout> {
    match KnownLayout::from_str(text.trim()) {
        Ok(known) => known.build(rules),
        Err(_) => rules.parse(text),
    }
}
