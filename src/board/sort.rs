use std::cmp::Ordering;

use super::model::Target;

/// Priority rank descending, then newest `date_added` first.
///
/// Targets without a parseable date sort after dated ones of the same rank.
pub fn compare_targets(a: &Target, b: &Target) -> Ordering {
    b.priority
        .rank()
        .cmp(&a.priority.rank())
        .then_with(|| b.date_added.cmp(&a.date_added))
}

/// Stable in-place sort of a view.
pub fn sort_view(view: &mut [Target]) {
    view.sort_by(compare_targets);
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::board::fallback::sample_targets;
    use crate::board::model::Priority;

    #[test]
    fn rank_then_date_descending() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut view = sample_targets(now);
        view[1].priority = Priority::High;
        sort_view(&mut view);
        let names: Vec<_> = view.iter().map(|t| t.nickname.as_str()).collect();
        assert_eq!(names, vec!["SpeedHacker", "TestPlayer1", "ToxicPlayer99"]);
        for pair in view.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.priority.rank() >= b.priority.rank());
            if a.priority.rank() == b.priority.rank() {
                assert!(a.date_added >= b.date_added);
            }
        }
    }

    #[test]
    fn unknown_priority_sorts_with_medium_and_undated_last() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut view = sample_targets(now);
        for t in view.iter_mut() {
            t.priority = Priority::Medium;
        }
        view[0].priority = Priority::Other("urgent".to_string());
        view[0].date_added = None;
        view[2].date_added = Some(now + Duration::hours(1));
        sort_view(&mut view);
        assert_eq!(view[0].id, 3);
        assert_eq!(view[1].id, 2);
        assert_eq!(view[2].id, 1);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut view = sample_targets(now);
        for t in view.iter_mut() {
            t.priority = Priority::Low;
            t.date_added = Some(now);
        }
        sort_view(&mut view);
        let ids: Vec<_> = view.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
