use pinfall::pins::{PinConfiguration, SplitDetector};
use rstest::rstest;

fn leave(standing: &[usize]) -> PinConfiguration {
    PinConfiguration::from_standing_pins(standing).unwrap()
}

// --- CLASSIC SPLITS ---
#[rstest]
#[case(&[7, 10])] // Bedposts
#[case(&[4, 6])] // Big ears
#[case(&[7, 9])]
#[case(&[8, 10])]
#[case(&[2, 7])] // Baby split
#[case(&[3, 10])] // Baby split
#[case(&[5, 7])]
#[case(&[4, 6, 7, 10])] // Big four
#[case(&[4, 7, 10])]
#[case(&[2, 8, 10])]
fn test_recognised_splits(#[case] standing: &[usize]) {
    let config = leave(standing);
    assert!(
        SplitDetector::is_split(&config),
        "expected split for {:?}\n{}",
        standing,
        config
    );
}

// --- NOT SPLITS ---
#[rstest]
#[case(&[4, 5])] // Neighbours
#[case(&[2, 4, 5, 8])] // Bucket
#[case(&[7, 8, 9, 10])] // Back row still touches
#[case(&[10])] // Single pin
#[case(&[])] // Cleared
#[case(&[1, 7, 10])] // Headpin standing
#[case(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10])] // Full rack
#[case(&[2, 3, 4, 5, 6, 7, 8, 9, 10])] // Only the headpin down
fn test_non_splits(#[case] standing: &[usize]) {
    let config = leave(standing);
    assert!(
        !SplitDetector::is_split(&config),
        "unexpected split for {:?}\n{}",
        standing,
        config
    );
}

#[rstest]
#[case(&[4, 6, 7, 10], vec![vec![4, 7], vec![6, 10]])]
#[case(&[7, 10], vec![vec![7], vec![10]])]
#[case(&[2, 4, 5, 8], vec![vec![2, 4, 5, 8]])]
fn test_standing_groups(#[case] standing: &[usize], #[case] expected: Vec<Vec<usize>>) {
    assert_eq!(SplitDetector::standing_groups(&leave(standing)), expected);
}

#[test]
fn test_split_survives_serde_flags() {
    let config = leave(&[7, 10]);
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(json, "[0,0,0,0,0,0,1,0,0,1]");
    let back: PinConfiguration = serde_json::from_str(&json).unwrap();
    assert!(back.is_split());
}
