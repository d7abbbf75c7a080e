use crate::error::{KcResult, KeyClimbError};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ngram {
    pub gram: Box<[u8]>,
    pub count: u64,
}

/// All n-grams of one length, most frequent first.
#[derive(Debug, Clone, Default)]
pub struct NgramTable {
    n: usize,
    entries: Vec<Ngram>,
}

impl NgramTable {
    pub fn new<I, S>(n: usize, entries: I) -> KcResult<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<[u8]>,
    {
        let mut out = Vec::new();
        for (gram, count) in entries {
            let gram = gram.as_ref();
            if gram.len() != n {
                return Err(KeyClimbError::Config(format!(
                    "'{}' listed in the {}-gram table",
                    String::from_utf8_lossy(gram),
                    n
                )));
            }
            if count > i64::MAX as u64 {
                return Err(KeyClimbError::Config(format!(
                    "count {} for '{}' is too large",
                    count,
                    String::from_utf8_lossy(gram)
                )));
            }
            out.push(Ngram {
                gram: gram.into(),
                count,
            });
        }
        out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.gram.cmp(&b.gram)));
        Ok(Self { n, entries: out })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn entries(&self) -> &[Ngram] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, e| acc.saturating_add(e.count))
    }
}

/// Read-only n-gram counts for n = 1..=max_n.
#[derive(Debug, Clone, Default)]
pub struct FrequencyStore {
    tables: Vec<NgramTable>,
}

impl FrequencyStore {
    /// `tables[i]` must hold the (i + 1)-grams.
    pub fn new(tables: Vec<NgramTable>) -> KcResult<Self> {
        for (i, t) in tables.iter().enumerate() {
            if t.n != i + 1 {
                return Err(KeyClimbError::Config(format!(
                    "table #{} holds {}-grams, expected {}-grams",
                    i,
                    t.n,
                    i + 1
                )));
            }
        }
        Ok(Self { tables })
    }

    /// Groups `(gram, count)` pairs by length. Duplicate grams are summed;
    /// lengths with no entries get an empty table.
    pub fn from_pairs<I, S>(pairs: I) -> KcResult<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut grouped: BTreeMap<usize, BTreeMap<Vec<u8>, u64>> = BTreeMap::new();
        for (gram, count) in pairs {
            let bytes = gram.as_ref().as_bytes().to_vec();
            if bytes.is_empty() {
                return Err(KeyClimbError::Config("empty n-gram".into()));
            }
            // Saturated sums still trip the per-entry limit in `NgramTable::new`.
            let slot = grouped
                .entry(bytes.len())
                .or_default()
                .entry(bytes)
                .or_default();
            *slot = slot.saturating_add(count);
        }

        let max_n = grouped.keys().next_back().copied().unwrap_or(0);
        let mut tables = Vec::with_capacity(max_n);
        for n in 1..=max_n {
            let entries = grouped.remove(&n).unwrap_or_default();
            tables.push(NgramTable::new(n, entries)?);
        }
        Self::new(tables)
    }

    pub fn max_n(&self) -> usize {
        self.tables.len()
    }

    pub fn table(&self, n: usize) -> KcResult<&NgramTable> {
        n.checked_sub(1)
            .and_then(|i| self.tables.get(i))
            .ok_or(KeyClimbError::MissingTable(n))
    }

    pub fn tables(&self) -> &[NgramTable] {
        &self.tables
    }
}

fn parse_header(kind: &str) -> Option<usize> {
    kind.strip_suffix("-gram")?.parse().ok()
}

/// Reads the tab-separated `ngrams-all.tsv` format.
///
/// Each table opens with a `"<n>-gram\t*/*\t..."` header followed by
/// `"<gram>\t<count>\t..."` rows. Tables must appear as 1, 2, 3, ...;
/// reading stops once `max_n` tables are loaded.
pub fn load_ngrams<R: Read>(reader: R, max_n: usize) -> KcResult<FrequencyStore> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut tables: Vec<NgramTable> = Vec::new();
    let mut current: Option<(usize, Vec<(Vec<u8>, u64)>)> = None;
    let mut lines_read = 0;

    for result in rdr.records() {
        let rec = result?;
        lines_read += 1;
        let line = rec.position().map(|p| p.line()).unwrap_or(lines_read);

        let first = rec.get(0).unwrap_or("").trim();
        if first.is_empty() {
            continue;
        }

        if let Some(n) = parse_header(first) {
            let expected = tables.len() + current.as_ref().map_or(1, |_| 2);
            if n != expected {
                return Err(KeyClimbError::Config(format!(
                    "line {}: found {}-gram header, expected {}-gram",
                    line, n, expected
                )));
            }
            if rec.get(1).map(str::trim) != Some("*/*") {
                return Err(KeyClimbError::Config(format!(
                    "line {}: {}-gram header must have '*/*' in its second column",
                    line, n
                )));
            }
            if let Some((prev_n, entries)) = current.take() {
                tables.push(NgramTable::new(prev_n, entries)?);
            }
            if n > max_n {
                break;
            }
            current = Some((n, Vec::new()));
            continue;
        }

        let (n, entries) = current.as_mut().ok_or_else(|| {
            KeyClimbError::Config(format!("line {}: n-gram row before any header", line))
        })?;

        let count: u64 = rec
            .get(1)
            .map(str::trim)
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                KeyClimbError::Config(format!("line {}: missing or invalid count", line))
            })?;

        if first.len() != *n {
            return Err(KeyClimbError::Config(format!(
                "line {}: '{}' is not a {}-gram",
                line, first, n
            )));
        }
        entries.push((first.as_bytes().to_vec(), count));
    }

    if let Some((n, entries)) = current.take() {
        tables.push(NgramTable::new(n, entries)?);
    }

    debug!(
        "Scanned {} lines. Loaded tables: {:?}",
        lines_read,
        tables.iter().map(|t| (t.n(), t.len())).collect::<Vec<_>>()
    );

    FrequencyStore::new(tables)
}

pub fn load_ngrams_from_path<P: AsRef<Path>>(path: P, max_n: usize) -> KcResult<FrequencyStore> {
    let file = File::open(path)?;
    load_ngrams(file, max_n)
}
