use super::loader::{FrequencyStore, Ngram};
use super::metrics::{alternates, is_conflict_free, roll, Roll};
use super::profile::{ProfileWeights, ALTERNATION_MIN_LEN};
use super::types::{Score, ScoreDetails};
use crate::error::{KcResult, KeyClimbError};
use crate::geometry::GridGeometry;
use crate::layout::{Cell, Layout, PositionIndex};

#[inline(always)]
fn resolve(index: &PositionIndex, ngram: &Ngram, buf: &mut Vec<Cell>) -> KcResult<()> {
    buf.clear();
    for &b in ngram.gram.iter() {
        match index.get(b) {
            Some(cell) => buf.push(cell),
            None => {
                return Err(KeyClimbError::UnknownSymbol {
                    symbol: b as char,
                    ngram: String::from_utf8_lossy(&ngram.gram).into_owned(),
                })
            }
        }
    }
    Ok(())
}

/// `acc + count * factor`, failing instead of wrapping when the sum leaves `i64`.
#[inline(always)]
fn add_term(acc: Score, count: i64, factor: i64) -> KcResult<Score> {
    count
        .checked_mul(factor)
        .and_then(|term| acc.checked_add(term))
        .ok_or_else(|| {
            KeyClimbError::Config("score overflows i64; corpus counts are too large".into())
        })
}

/// Total score of `layout`. Pure: same inputs, same result.
pub fn score(
    store: &FrequencyStore,
    geometry: &GridGeometry,
    weights: &ProfileWeights,
    layout: &Layout,
) -> KcResult<Score> {
    Ok(score_details(store, geometry, weights, layout)?.total)
}

/// Every active sub-metric in a single pass over the tables.
pub fn score_details(
    store: &FrequencyStore,
    geometry: &GridGeometry,
    weights: &ProfileWeights,
    layout: &Layout,
) -> KcResult<ScoreDetails> {
    if layout.rows() != geometry.rows || layout.cols() != geometry.cols {
        return Err(KeyClimbError::Config(format!(
            "layout is {}x{} but geometry is {}x{}",
            layout.rows(),
            layout.cols(),
            geometry.rows,
            geometry.cols
        )));
    }

    let index = layout.position_index();
    let mut d = ScoreDetails::default();

    // 1. Strength (monograms)
    if weights.strength != 0 {
        for ngram in store.table(1)?.entries() {
            let b = ngram.gram[0];
            let (row, col) = index.get(b).ok_or_else(|| KeyClimbError::UnknownSymbol {
                symbol: b as char,
                ngram: (b as char).to_string(),
            })?;
            d.strength = add_term(d.strength, ngram.count as i64, geometry.effort(row, col))?;
        }
    }

    // 2. N-gram walks
    let fold_fingers = weights.finger_conflict != 0;
    let fold_rolls = weights.inward_roll != 0;
    let fold_alternation = weights.hand_alternation != 0;

    if fold_fingers || fold_rolls || fold_alternation {
        let first = if fold_fingers || fold_rolls {
            2
        } else {
            ALTERNATION_MIN_LEN
        };
        let mut cells: Vec<Cell> = Vec::with_capacity(weights.max_n);

        for n in first..=weights.max_n {
            let table = store.table(n)?;
            let n_i = n as i64;

            for ngram in table.entries() {
                resolve(&index, ngram, &mut cells)?;
                let count = ngram.count as i64;

                if fold_fingers && is_conflict_free(geometry, &cells) {
                    d.finger_conflict = add_term(d.finger_conflict, count, n_i * n_i)?;
                    d.clean_ngrams = d.clean_ngrams.saturating_add(ngram.count);
                }

                if fold_rolls {
                    match roll(geometry, &cells) {
                        Roll::Inward => {
                            d.inward_roll = add_term(d.inward_roll, count, n_i)?;
                            d.rolled_ngrams = d.rolled_ngrams.saturating_add(ngram.count);
                        }
                        Roll::Jammed => {
                            d.inward_roll = add_term(d.inward_roll, count, -n_i)?;
                            d.jammed_ngrams = d.jammed_ngrams.saturating_add(ngram.count);
                        }
                        Roll::Void => {}
                    }
                }

                if fold_alternation && n >= ALTERNATION_MIN_LEN && alternates(geometry, &cells) {
                    d.hand_alternation = add_term(d.hand_alternation, count, -1)?;
                    d.alternating_ngrams = d.alternating_ngrams.saturating_add(ngram.count);
                }
            }
        }
    }

    let mut total = add_term(0, weights.finger_conflict, d.finger_conflict)?;
    total = add_term(total, weights.inward_roll, d.inward_roll)?;
    total = add_term(total, weights.strength, d.strength)?;
    d.total = add_term(total, weights.hand_alternation, d.hand_alternation)?;

    Ok(d)
}
