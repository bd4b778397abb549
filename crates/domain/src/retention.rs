use serde::{Deserialize, Serialize};

use crate::version::VersionRecord;

/// Number of disabled versions retained per secret when no value is configured.
pub const DEFAULT_KEEP_DISABLED_COUNT: usize = 2;

/// How many of the most recently created disabled versions survive a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    keep_disabled_count: usize,
}

impl RetentionPolicy {
    /// Creates a policy keeping `keep_disabled_count` disabled versions.
    ///
    /// Zero is valid and makes every disabled version eligible for destruction.
    #[must_use]
    pub fn new(keep_disabled_count: usize) -> Self {
        Self {
            keep_disabled_count,
        }
    }

    /// Returns the keep-count.
    #[must_use]
    pub fn keep_disabled_count(&self) -> usize {
        self.keep_disabled_count
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_KEEP_DISABLED_COUNT)
    }
}

/// Sorts versions newest-first by creation time.
///
/// The sort is stable, so versions with identical timestamps keep the order
/// the store returned them in.
pub fn sort_newest_first(versions: &mut [VersionRecord]) {
    versions.sort_by(|left, right| right.create_time().cmp(&left.create_time()));
}

/// Returns the disabled versions beyond the policy's keep-count.
///
/// `disabled_newest_first` must already be ordered newest-first; the result is
/// the suffix after the first `keep_disabled_count` entries.
#[must_use]
pub fn select_for_destruction(
    disabled_newest_first: &[VersionRecord],
    policy: RetentionPolicy,
) -> Vec<VersionRecord> {
    disabled_newest_first
        .iter()
        .skip(policy.keep_disabled_count())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{RetentionPolicy, select_for_destruction, sort_newest_first};
    use crate::secret::VersionName;
    use crate::version::{CreateTime, VersionRecord, VersionState};

    fn disabled(id: &str, seconds: i64) -> VersionRecord {
        VersionRecord::new(
            VersionName::new(format!("projects/p/secrets/s/versions/{id}"))
                .unwrap_or_else(|_| unreachable!()),
            CreateTime::new(seconds, 0).unwrap_or_else(|_| unreachable!()),
            VersionState::Disabled,
        )
    }

    fn newest_first_five() -> Vec<VersionRecord> {
        vec![
            disabled("v5", 50),
            disabled("v4", 40),
            disabled("v3", 30),
            disabled("v2", 20),
            disabled("v1", 10),
        ]
    }

    #[test]
    fn default_policy_keeps_two() {
        assert_eq!(RetentionPolicy::default().keep_disabled_count(), 2);
    }

    #[test]
    fn keep_two_of_five_destroys_oldest_three() {
        let destroyed = select_for_destruction(&newest_first_five(), RetentionPolicy::new(2));
        let names: Vec<&str> = destroyed
            .iter()
            .map(|record| record.name().as_str())
            .collect();

        assert_eq!(
            names,
            vec![
                "projects/p/secrets/s/versions/v3",
                "projects/p/secrets/s/versions/v2",
                "projects/p/secrets/s/versions/v1",
            ]
        );
    }

    #[test]
    fn keep_zero_destroys_everything() {
        let input = newest_first_five();
        let destroyed = select_for_destruction(&input, RetentionPolicy::new(0));
        assert_eq!(destroyed, input);
    }

    #[test]
    fn keep_at_or_above_length_destroys_nothing() {
        let input = newest_first_five();
        assert!(select_for_destruction(&input, RetentionPolicy::new(5)).is_empty());
        assert!(select_for_destruction(&input, RetentionPolicy::new(9)).is_empty());
        assert!(select_for_destruction(&[], RetentionPolicy::new(0)).is_empty());
    }

    #[test]
    fn sort_newest_first_is_stable_on_ties() {
        let mut versions = vec![
            disabled("old", 1),
            disabled("tie-a", 7),
            disabled("new", 9),
            disabled("tie-b", 7),
        ];
        sort_newest_first(&mut versions);

        let names: Vec<&str> = versions
            .iter()
            .map(|record| record.name().as_str().rsplit('/').next().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["new", "tie-a", "tie-b", "old"]);
    }

    proptest! {
        #[test]
        fn destroys_exactly_the_suffix_beyond_keep(
            seconds in prop::collection::vec(0_i64..1_000, 0..32),
            keep in 0_usize..40
        ) {
            let mut seconds = seconds;
            seconds.sort_unstable_by(|left, right| right.cmp(left));
            let input: Vec<VersionRecord> = seconds
                .iter()
                .enumerate()
                .map(|(index, value)| disabled(&index.to_string(), *value))
                .collect();

            let destroyed = select_for_destruction(&input, RetentionPolicy::new(keep));

            prop_assert_eq!(destroyed.len(), input.len().saturating_sub(keep));
            prop_assert_eq!(destroyed.as_slice(), &input[keep.min(input.len())..]);
        }
    }
}
