//! Stratified train/test splitting
//!
//! Each class is shuffled with a seeded RNG and a proportional share is held
//! out, so both partitions keep the class balance of the full table and the
//! same input always produces the same split.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::error::{PipelineError, PipelineResult};

/// Minimum rows per class for a stratified split
pub const MIN_ROWS_PER_CLASS: usize = 2;

/// Row indices of the two partitions, each in ascending order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split row indices into train/test sets stratified by a binary target.
///
/// Every class keeps at least one row on each side.
pub fn stratified_split(
    target: &[u8],
    test_size: f64,
    seed: u64,
) -> PipelineResult<TrainTestSplit> {
    if target.is_empty() {
        return Err(PipelineError::malformed("Dataset is empty"));
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PipelineError::malformed(format!(
            "test_size must be between 0 and 1 (exclusive), got {}",
            test_size
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(target.len());
    let mut test = Vec::new();

    for class in [0u8, 1u8] {
        let mut members: Vec<usize> = target
            .iter()
            .enumerate()
            .filter(|(_, &t)| t == class)
            .map(|(i, _)| i)
            .collect();

        if members.len() < MIN_ROWS_PER_CLASS {
            return Err(PipelineError::malformed(format!(
                "The least populated class ({}) has only {} row(s); at least {} rows of each class are required for a stratified split",
                if class == 1 { "Yes" } else { "No" },
                members.len(),
                MIN_ROWS_PER_CLASS
            )));
        }

        members.shuffle(&mut rng);

        let n_test = ((members.len() as f64) * test_size).round() as usize;
        let n_test = n_test.clamp(1, members.len() - 1);

        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();

    tracing::debug!(train = train.len(), test = test.len(), "Stratified split");

    Ok(TrainTestSplit { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balanced_target(n: usize) -> Vec<u8> {
        (0..n).map(|i| (i % 2) as u8).collect()
    }

    #[test]
    fn test_split_sizes() {
        let target = balanced_target(100);
        let split = stratified_split(&target, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 20);
        assert_eq!(split.train.len(), 80);
    }

    #[test]
    fn test_split_preserves_class_ratio() {
        // 30 events, 70 non-events
        let target: Vec<u8> = (0..100).map(|i| if i < 30 { 1 } else { 0 }).collect();
        let split = stratified_split(&target, 0.2, 42).unwrap();

        let test_events = split.test.iter().filter(|&&i| target[i] == 1).count();
        assert_eq!(test_events, 6);
        assert_eq!(split.test.len(), 20);
    }

    #[test]
    fn test_split_is_deterministic() {
        let target = balanced_target(50);
        let a = stratified_split(&target, 0.2, 42).unwrap();
        let b = stratified_split(&target, 0.2, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_partitions_all_rows() {
        let target = balanced_target(37);
        let split = stratified_split(&target, 0.2, 7).unwrap();

        let mut all: Vec<usize> = split.train.iter().chain(split.test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..37).collect::<Vec<_>>());
    }

    #[test]
    fn test_minimum_two_per_class() {
        let target = vec![0, 0, 1, 1];
        let split = stratified_split(&target, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 2);
    }

    #[test]
    fn test_single_class_fails() {
        let target = vec![0u8; 10];
        let err = stratified_split(&target, 0.2, 42).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedDataset { .. }));
        assert!(err.to_string().contains("least populated class"));
    }

    #[test]
    fn test_one_member_class_fails() {
        let target = vec![0, 0, 0, 0, 1];
        assert!(stratified_split(&target, 0.2, 42).is_err());
    }

    #[test]
    fn test_empty_target_fails() {
        assert!(stratified_split(&[], 0.2, 42).is_err());
    }

    #[test]
    fn test_invalid_test_size() {
        let target = balanced_target(10);
        assert!(stratified_split(&target, 0.0, 42).is_err());
        assert!(stratified_split(&target, 1.0, 42).is_err());
    }
}
