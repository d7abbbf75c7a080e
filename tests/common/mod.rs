#![allow(dead_code)]

use keyclimb::config::LayoutDefinitions;
use keyclimb::geometry::GridGeometry;
use keyclimb::layout::{Layout, LayoutRules};
use keyclimb::layouts::KnownLayout;
use keyclimb::scorer::{FrequencyStore, ProfileWeights, Scorer};
use std::sync::Arc;

/// Default 4x8 rules: A-Z plus apostrophe, five blanks, Q/X/Z on row 0.
pub fn default_rules() -> LayoutRules {
    LayoutDefinitions::default()
        .to_rules()
        .expect("default rules are valid")
}

pub fn workman(rules: &LayoutRules) -> Layout {
    KnownLayout::Workman.build(rules).expect("workman is valid")
}

pub fn store(pairs: &[(&str, u64)]) -> Arc<FrequencyStore> {
    Arc::new(FrequencyStore::from_pairs(pairs.iter().copied()).expect("valid pairs"))
}

/// Weights with every metric off; tests switch on the ones they probe.
pub fn zero_weights(max_n: usize) -> ProfileWeights {
    ProfileWeights {
        finger_conflict: 0,
        inward_roll: 0,
        strength: 0,
        hand_alternation: 0,
        max_n,
    }
}

pub fn scorer(pairs: &[(&str, u64)], weights: ProfileWeights) -> Scorer {
    Scorer::new(store(pairs), GridGeometry::standard(), weights).expect("scorer builds")
}

/// A small corpus over the default alphabet with tables 1..=3.
pub fn small_corpus() -> Vec<(&'static str, u64)> {
    vec![
        ("e", 120),
        ("t", 90),
        ("a", 80),
        ("o", 75),
        ("n", 70),
        ("s", 60),
        ("h", 55),
        ("r", 50),
        ("q", 1),
        ("th", 40),
        ("he", 35),
        ("in", 30),
        ("er", 28),
        ("an", 25),
        ("st", 20),
        ("oe", 12),
        ("the", 22),
        ("and", 15),
        ("ing", 11),
        ("ent", 9),
    ]
}
