use crate::version::VersionRecord;

/// Outcome of picking the surviving version among a secret's enabled versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionSelection {
    /// The newest version, or `None` when the input was empty.
    pub latest: Option<VersionRecord>,
    /// Every other input version, in input order.
    pub others: Vec<VersionRecord>,
}

/// Picks the version with the greatest `(seconds, nanos)` creation time and
/// returns it alongside all remaining versions.
///
/// Input order is not trusted for the maximum. When several versions share
/// the exact greatest creation time, the first one encountered in input order
/// wins; a later record only replaces the current pick when strictly newer.
#[must_use]
pub fn select_latest_and_others(versions: Vec<VersionRecord>) -> VersionSelection {
    let Some(latest_index) = versions
        .iter()
        .enumerate()
        .fold(None::<(usize, &VersionRecord)>, |best, (index, version)| {
            match best {
                Some((_, current)) if version.create_time() <= current.create_time() => best,
                _ => Some((index, version)),
            }
        })
        .map(|(index, _)| index)
    else {
        return VersionSelection::default();
    };

    let mut others = versions;
    let latest = others.remove(latest_index);

    VersionSelection {
        latest: Some(latest),
        others,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::select_latest_and_others;
    use crate::secret::VersionName;
    use crate::version::{CreateTime, VersionRecord, VersionState};

    fn enabled(id: &str, seconds: i64, nanos: i32) -> VersionRecord {
        VersionRecord::new(
            VersionName::new(format!("projects/p/secrets/s/versions/{id}"))
                .unwrap_or_else(|_| unreachable!()),
            CreateTime::new(seconds, nanos).unwrap_or_else(|_| unreachable!()),
            VersionState::Enabled,
        )
    }

    fn ids(records: &[VersionRecord]) -> Vec<&str> {
        records
            .iter()
            .map(|record| record.name().as_str().rsplit('/').next().unwrap_or_default())
            .collect()
    }

    #[test]
    fn nanos_break_equal_seconds() {
        let selection = select_latest_and_others(vec![
            enabled("a", 100, 0),
            enabled("b", 100, 5),
            enabled("c", 90, 0),
        ]);

        assert_eq!(
            selection.latest.as_ref().map(|latest| latest.create_time()),
            CreateTime::new(100, 5).ok()
        );
        assert_eq!(ids(&selection.others), vec!["a", "c"]);
    }

    #[test]
    fn empty_input_has_no_latest() {
        let selection = select_latest_and_others(Vec::new());
        assert!(selection.latest.is_none());
        assert!(selection.others.is_empty());
    }

    #[test]
    fn single_version_survives_alone() {
        let selection = select_latest_and_others(vec![enabled("only", 1, 0)]);
        assert!(selection.latest.is_some());
        assert!(selection.others.is_empty());
    }

    #[test]
    fn exact_tie_keeps_first_encountered() {
        let selection = select_latest_and_others(vec![
            enabled("old", 10, 0),
            enabled("first", 50, 7),
            enabled("second", 50, 7),
        ]);

        let latest = selection.latest.unwrap_or_else(|| unreachable!());
        assert!(latest.name().as_str().ends_with("/first"));
        assert_eq!(ids(&selection.others), vec!["old", "second"]);
    }

    #[test]
    fn unordered_input_still_finds_maximum() {
        let selection = select_latest_and_others(vec![
            enabled("1", 1, 0),
            enabled("5", 5, 0),
            enabled("3", 3, 0),
            enabled("4", 4, 999),
        ]);

        let latest = selection.latest.unwrap_or_else(|| unreachable!());
        assert!(latest.name().as_str().ends_with("/5"));
        assert_eq!(selection.others.len(), 3);
    }

    proptest! {
        #[test]
        fn latest_dominates_and_others_are_the_rest(
            stamps in prop::collection::vec((0_i64..6, 0_i32..3), 1..24)
        ) {
            let input: Vec<VersionRecord> = stamps
                .iter()
                .enumerate()
                .map(|(index, (seconds, nanos))| enabled(&index.to_string(), *seconds, *nanos))
                .collect();

            let selection = select_latest_and_others(input.clone());
            let latest = selection.latest.clone();
            prop_assert!(latest.is_some());
            let latest = latest.unwrap_or_else(|| unreachable!());

            prop_assert_eq!(selection.others.len() + 1, input.len());
            for other in &selection.others {
                prop_assert!(latest.create_time() >= other.create_time());
                prop_assert!(other.name() != latest.name());
            }

            let first_max = input
                .iter()
                .find(|record| record.create_time() == latest.create_time());
            prop_assert_eq!(first_max.map(VersionRecord::name), Some(latest.name()));

            let mut rebuilt = selection.others.clone();
            let position = input
                .iter()
                .position(|record| record.name() == latest.name())
                .unwrap_or_default();
            rebuilt.insert(position, latest);
            prop_assert_eq!(rebuilt, input);
        }
    }
}
