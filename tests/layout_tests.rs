mod common;

use common::{default_rules, workman};
use keyclimb::error::KeyClimbError;
use keyclimb::layout::{LayoutRules, Violation};
use keyclimb::layouts::{resolve_layout, KnownLayout};
use rstest::rstest;
use strum::IntoEnumIterator;

fn sorted_cells(layout: &keyclimb::layout::Layout) -> Vec<u8> {
    let mut cells = layout.cells().to_vec();
    cells.sort_unstable();
    cells
}

#[test]
fn test_known_layouts_are_valid() {
    let rules = default_rules();
    for known in KnownLayout::iter() {
        let layout = known.build(&rules).unwrap();
        assert!(rules.is_valid(&layout), "{} should be valid", known);
    }
    assert_eq!(rules.blank_count(), 5);
}

#[test]
fn test_position_index_inverts_grid() {
    let rules = default_rules();
    let layout = workman(&rules);
    let index = layout.position_index();

    for r in 0..layout.rows() {
        for c in 0..layout.cols() {
            let symbol = layout.get((r, c));
            if symbol == layout.blank() {
                assert_eq!(index.get(symbol), None);
            } else {
                assert_eq!(index.get(symbol), Some((r, c)));
            }
        }
    }
}

#[test]
fn test_position_index_ignores_ascii_case() {
    let rules = default_rules();
    let index = workman(&rules).position_index();
    assert_eq!(index.get(b't'), index.get(b'T'));
    assert_eq!(index.get(b't'), Some((2, 2)));
    assert_eq!(index.get(b'1'), None);
}

#[test]
fn test_permutation_moves_symbols() {
    let rules = default_rules();
    let layout = workman(&rules);

    // D(1,0) -> (1,1), R(1,1) -> (1,2), W(1,2) -> (1,0)
    let positions = [(1, 0), (1, 1), (1, 2)];
    let order = [(1, 1), (1, 2), (1, 0)];
    let next = layout.apply_permutation(&positions, &order).unwrap();

    assert_eq!(next.row_strings()[1], "WDRBJFUP");
    assert_eq!(sorted_cells(&next), sorted_cells(&layout));
    // Source is untouched
    assert_eq!(layout.row_strings()[1], "DRWBJFUP");
}

#[test]
fn test_identity_permutation_is_noop() {
    let rules = default_rules();
    let layout = workman(&rules);
    let cells = [(2, 3), (0, 1), (3, 7)];
    let same = layout.apply_permutation(&cells, &cells).unwrap();
    assert_eq!(same, layout);
}

#[rstest]
#[case(&[(0, 0), (0, 1)], &[(0, 1)])]
#[case(&[(0, 0), (0, 0)], &[(0, 0), (0, 0)])]
#[case(&[(0, 0), (4, 0)], &[(4, 0), (0, 0)])]
#[case(&[(0, 0), (0, 1)], &[(0, 1), (0, 2)])]
fn test_bad_permutations(#[case] positions: &[(usize, usize)], #[case] order: &[(usize, usize)]) {
    let rules = default_rules();
    let layout = workman(&rules);
    assert!(matches!(
        layout.apply_permutation(positions, order),
        Err(KeyClimbError::InvalidPermutation(_))
    ));
}

#[rstest]
#[case::short_row(["Q-X-Z---", "DRWBJFU", "SHTGYNEO", "AMCVKLI'"])]
#[case::duplicate(["Q-X-Z---", "DRWBJFUP", "SHTGYNEO", "AMCVKLID"])]
#[case::foreign(["Q-X-Z---", "DRWBJFUP", "SHTGYNEO", "AMCVKLI1"])]
#[case::too_many_blanks(["Q-X-Z---", "DRWBJFUP", "SHTGYNEO", "AMCVKLI-"])]
#[case::pin_outside(["P-X-Z---", "DRWBJFUQ", "SHTGYNEO", "AMCVKLI'"])]
fn test_build_rejects(#[case] rows: [&str; 4]) {
    let rules = default_rules();
    assert!(matches!(
        rules.build(&rows),
        Err(KeyClimbError::InvalidLayout(_))
    ));
}

#[test]
fn test_violation_reports_pinned_symbol() {
    let rules = default_rules();
    let bad = rules.build(&["P-X-Z---", "DRWBJFUQ", "SHTGYNEO", "AMCVKLI'"]);
    assert!(bad.is_err());

    // Move Q down by permutation and inspect the violation directly.
    let layout = workman(&rules);
    let moved = layout
        .apply_permutation(&[(0, 0), (2, 0)], &[(2, 0), (0, 0)])
        .unwrap();
    assert_eq!(
        rules.find_violation(&moved),
        Some(Violation::OutsideRegion {
            symbol: b'Q',
            row: 2
        })
    );
}

#[test]
fn test_parse_and_resolve() {
    let rules = default_rules();
    let parsed = rules
        .parse("Q-X-Z---/DRWBJFUP/SHTGYNEO/AMCVKLI'")
        .unwrap();
    assert_eq!(parsed, workman(&rules));

    let by_name = resolve_layout("Workman", &rules).unwrap();
    assert_eq!(by_name, parsed);
    assert_eq!(by_name.to_compact(), "Q-X-Z---/DRWBJFUP/SHTGYNEO/AMCVKLI'");
}

#[test]
fn test_random_honours_pins() {
    let rules = default_rules();
    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..50 {
        let layout = rules.random(&mut rng);
        assert!(rules.is_valid(&layout), "{}", layout);
        let top = &layout.row_strings()[0];
        for pinned in ['Q', 'X', 'Z'] {
            assert!(top.contains(pinned), "{} missing from row 0", pinned);
        }
    }
}

#[rstest]
#[case::blank_in_alphabet(2, 2, "AB-", b'-')]
#[case::repeated_symbol(2, 2, "AA", b'-')]
#[case::too_many_symbols(1, 2, "ABC", b'-')]
#[case::empty_grid(0, 4, "A", b'-')]
#[case::same_letter_both_cases(1, 3, "aA'", b'-')]
fn test_rules_reject_bad_config(
    #[case] rows: usize,
    #[case] cols: usize,
    #[case] alphabet: &str,
    #[case] blank: u8,
) {
    assert!(matches!(
        LayoutRules::new(rows, cols, alphabet.as_bytes(), blank),
        Err(KeyClimbError::Config(_))
    ));
}

#[test]
fn test_overlapping_pins_rejected() {
    let rules = LayoutRules::new(2, 4, b"ABCD", b'-')
        .unwrap()
        .with_pin(b"A", &[0])
        .unwrap();
    assert!(rules.clone().with_pin(b"B", &[0]).is_err());
    assert!(rules.clone().with_pin(b"A", &[1]).is_err());
    assert!(rules.with_pin(b"B", &[1]).is_ok());
}

#[test]
fn test_lowercase_alphabet_indexes_both_cases() {
    let rules = LayoutRules::new(1, 4, b"ab'", b'-').unwrap();
    let layout = rules.build(&["ba-'"]).unwrap();
    let index = layout.position_index();

    assert_eq!(index.get(b'a'), Some((0, 1)));
    assert_eq!(index.get(b'A'), Some((0, 1)));
    assert_eq!(index.get(b'b'), Some((0, 0)));
    assert_eq!(index.get(b'\''), Some((0, 3)));
    assert_eq!(index.get(b'-'), None);

    let mixed = LayoutRules::new(1, 3, b"aA'", b'-');
    assert!(matches!(mixed, Err(KeyClimbError::Config(msg)) if msg.contains("case")));
}
