mod common;

use common::{default_rules, scorer, workman};
use keyclimb::layout::{Cell, Layout};
use keyclimb::scorer::{ProfileName, ProfileWeights};
use proptest::prelude::*;

// --- STRATEGIES ---

// A permutation of a random subset of the 4x8 grid: (positions, order).
prop_compose! {
    fn arb_permutation()(
        picks in proptest::sample::subsequence((0..32usize).collect::<Vec<_>>(), 0..=8)
    )(
        order in Just(picks.clone()).prop_shuffle(),
        chosen in Just(picks),
    ) -> (Vec<Cell>, Vec<Cell>) {
        let to_cell = |i: usize| (i / 8, i % 8);
        (
            chosen.into_iter().map(to_cell).collect(),
            order.into_iter().map(to_cell).collect(),
        )
    }
}

// Corpus over the default alphabet, lowercase as it comes off disk.
prop_compose! {
    fn arb_corpus()(
        entries in proptest::collection::vec(("[a-z']{1,3}", 1u64..1_000), 1..40)
    ) -> Vec<(String, u64)> {
        entries
    }
}

fn sorted(layout: &Layout) -> Vec<u8> {
    let mut cells = layout.cells().to_vec();
    cells.sort_unstable();
    cells
}

proptest! {
    #[test]
    fn permutation_preserves_multiset((positions, order) in arb_permutation()) {
        let rules = default_rules();
        let layout = workman(&rules);
        let next = layout.apply_permutation(&positions, &order).unwrap();
        prop_assert_eq!(sorted(&next), sorted(&layout));

        for (&from, &to) in positions.iter().zip(&order) {
            prop_assert_eq!(next.get(to), layout.get(from));
        }
    }

    #[test]
    fn random_layouts_are_valid_and_indexed(seed in any::<u64>()) {
        let rules = default_rules();
        let layout = rules.random(&mut fastrand::Rng::with_seed(seed));
        prop_assert!(rules.is_valid(&layout));

        let index = layout.position_index();
        for &symbol in rules.alphabet() {
            let cell = index.get(symbol);
            prop_assert!(cell.is_some());
            prop_assert_eq!(layout.get(cell.unwrap()), symbol);
        }
    }

    #[test]
    fn score_ignores_corpus_order(corpus in arb_corpus(), seed in any::<u64>()) {
        let rules = default_rules();
        let layout = rules.random(&mut fastrand::Rng::with_seed(seed));
        let weights = ProfileWeights::preset(ProfileName::RollStrength);

        let mut pairs: Vec<(&str, u64)> = corpus.iter().map(|(g, c)| (g.as_str(), *c)).collect();
        // Every table up to the profile's max_n has to exist.
        pairs.push(("e", 1));
        pairs.push(("th", 1));
        pairs.push(("the", 1));

        let forward = scorer(&pairs, weights).score(&layout).unwrap();
        pairs.reverse();
        let backward = scorer(&pairs, weights).score(&layout).unwrap();
        prop_assert_eq!(forward, backward);
    }
}
