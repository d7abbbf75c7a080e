use keyclimb::error::KeyClimbError;
use keyclimb::scorer::loader::{load_ngrams, load_ngrams_from_path, NgramTable};
use keyclimb::scorer::FrequencyStore;
use rstest::rstest;
use std::fs::File;
use std::io::{Cursor, Write};

const SAMPLE: &str = "\
1-gram\t*/*\t100
e\t60\t0
t\t40\t0

2-gram\t*/*\t70
th\t50\t0
he\t20\t0
3-gram\t*/*\t9
the\t9\t0
";

#[test]
fn test_loads_tables_in_order() {
    let store = load_ngrams(Cursor::new(SAMPLE), 3).unwrap();
    assert_eq!(store.max_n(), 3);

    let bigrams = store.table(2).unwrap();
    assert_eq!(bigrams.n(), 2);
    assert_eq!(bigrams.len(), 2);
    assert_eq!(bigrams.total(), 70);
    // Most frequent first
    assert_eq!(&*bigrams.entries()[0].gram, b"th");
    assert_eq!(bigrams.entries()[0].count, 50);

    assert_eq!(store.table(3).unwrap().entries()[0].count, 9);
}

#[test]
fn test_stops_after_max_n() {
    let store = load_ngrams(Cursor::new(SAMPLE), 2).unwrap();
    assert_eq!(store.max_n(), 2);
    assert!(matches!(store.table(3), Err(KeyClimbError::MissingTable(3))));
}

#[test]
fn test_extra_columns_are_ignored() {
    let data = "1-gram\t*/*\nq\t5\textra\tcolumns\n";
    let store = load_ngrams(Cursor::new(data), 1).unwrap();
    assert_eq!(store.table(1).unwrap().total(), 5);
}

#[rstest]
#[case::row_before_header("th\t5\n")]
#[case::skipped_table("1-gram\t*/*\ne\t1\n3-gram\t*/*\nthe\t1\n")]
#[case::bad_marker("1-gram\tall\ne\t1\n")]
#[case::wrong_length("1-gram\t*/*\nth\t1\n")]
#[case::bad_count("1-gram\t*/*\ne\tmany\n")]
#[case::missing_count("1-gram\t*/*\ne\n")]
fn test_format_errors(#[case] data: &str) {
    let result = load_ngrams(Cursor::new(data), 3);
    assert!(
        matches!(result, Err(KeyClimbError::Config(_))),
        "expected config error for {:?}",
        data
    );
}

#[test]
fn test_error_names_the_line() {
    let data = "1-gram\t*/*\ne\t1\nt\tx\n";
    match load_ngrams(Cursor::new(data), 1) {
        Err(KeyClimbError::Config(msg)) => assert!(msg.contains("line 3"), "{}", msg),
        other => panic!("unexpected {:?}", other.map(|s| s.max_n())),
    }
}

#[test]
fn test_loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ngrams.tsv");
    let mut file = File::create(&path).unwrap();
    write!(file, "{}", SAMPLE).unwrap();

    let store = load_ngrams_from_path(&path, 3).unwrap();
    assert_eq!(store.table(1).unwrap().total(), 100);

    let missing = load_ngrams_from_path(dir.path().join("nope.tsv"), 3);
    assert!(matches!(missing, Err(KeyClimbError::Io(_))));
}

#[test]
fn test_from_pairs_groups_and_sums() {
    let store = FrequencyStore::from_pairs([("ab", 2u64), ("abc", 1), ("ab", 3)]).unwrap();
    assert_eq!(store.max_n(), 3);
    assert!(store.table(1).unwrap().is_empty());
    assert_eq!(store.table(2).unwrap().total(), 5);
    assert_eq!(store.table(2).unwrap().len(), 1);
    assert!(matches!(store.table(0), Err(KeyClimbError::MissingTable(0))));
}

#[test]
fn test_table_rejects_wrong_length() {
    assert!(NgramTable::new(2, [("abc", 1u64)]).is_err());
    assert!(NgramTable::new(1, [("a", u64::MAX)]).is_err());

    let misnumbered = vec![NgramTable::new(2, [("ab", 1u64)]).unwrap()];
    assert!(FrequencyStore::new(misnumbered).is_err());
}

#[test]
fn test_duplicate_counts_past_i64_rejected() {
    let half = i64::MAX as u64 / 2 + 1;
    let result = FrequencyStore::from_pairs([("th", half), ("th", half)]);
    assert!(matches!(result, Err(KeyClimbError::Config(_))));

    let result = FrequencyStore::from_pairs([("th", u64::MAX), ("th", 1)]);
    assert!(matches!(result, Err(KeyClimbError::Config(_))));
}
