//! Ordering and filtering of evaluated achievements for the badge grid.
//!
//! Pure views over [`AchievementStatus`] slices: each call returns a new
//! sequence and leaves its input untouched.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::catalog::Category;
use crate::evaluate::AchievementStatus;

/// Filter tab selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    All,
    Only(Category),
}

/// Keep only the statuses matching the selected tab. `All` is a no-op.
pub fn filter_by_category(
    statuses: &[AchievementStatus],
    filter: CategoryFilter,
) -> Vec<AchievementStatus> {
    match filter {
        CategoryFilter::All => statuses.to_vec(),
        CategoryFilter::Only(category) => statuses
            .iter()
            .filter(|s| s.def.category == category)
            .cloned()
            .collect(),
    }
}

/// Order for the badge grid: unlocked before locked, then rarity
/// descending, then progress descending. The sort is stable, so catalog
/// order breaks any remaining ties.
pub fn sort_for_grid(statuses: &[AchievementStatus]) -> Vec<AchievementStatus> {
    let mut sorted = statuses.to_vec();
    sorted.sort_by_key(|s| (!s.unlocked, Reverse(s.def.rarity), Reverse(s.progress)));
    sorted
}

/// Pick the statuses named in a recent-unlock id list, preserving the
/// input order and skipping ids that are locked or unknown.
pub fn recently_unlocked<'a>(
    statuses: &'a [AchievementStatus],
    ids: &[&str],
) -> Vec<&'a AchievementStatus> {
    ids.iter()
        .filter_map(|id| statuses.iter().find(|s| s.unlocked && s.def.id == *id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivitySnapshot;
    use crate::catalog::{default_catalog, validate_catalog, Rarity};
    use crate::evaluate::{evaluate, FixedStamp};
    use chrono::{TimeZone, Utc};

    fn sample_statuses() -> Vec<AchievementStatus> {
        let catalog = validate_catalog(&default_catalog()).unwrap();
        let now = Utc.with_ymd_and_hms(2023, 12, 16, 15, 0, 0).unwrap();
        // Empty snapshot: the no-fee streak and flawless week unlock
        // vacuously, everything else is locked at 0.
        evaluate(
            &catalog,
            &ActivitySnapshot::default(),
            now,
            &mut FixedStamp(now),
        )
    }

    #[test]
    fn all_filter_is_a_no_op() {
        let statuses = sample_statuses();
        let filtered = filter_by_category(&statuses, CategoryFilter::All);
        assert_eq!(filtered, statuses);
    }

    #[test]
    fn category_filter_is_exact() {
        let statuses = sample_statuses();
        let streaks = filter_by_category(&statuses, CategoryFilter::Only(Category::Streak));
        assert_eq!(streaks.len(), 4);
        assert!(streaks.iter().all(|s| s.def.category == Category::Streak));
    }

    #[test]
    fn unlocked_come_before_locked() {
        let sorted = sort_for_grid(&sample_statuses());
        let first_locked = sorted.iter().position(|s| !s.unlocked).unwrap();
        assert!(sorted[..first_locked].iter().all(|s| s.unlocked));
        assert!(sorted[first_locked..].iter().all(|s| !s.unlocked));
    }

    #[test]
    fn rarity_descends_within_each_partition() {
        let sorted = sort_for_grid(&sample_statuses());
        for pair in sorted.windows(2) {
            if pair[0].unlocked == pair[1].unlocked {
                assert!(pair[0].def.rarity >= pair[1].def.rarity);
            }
        }
    }

    #[test]
    fn progress_breaks_rarity_ties() {
        let sorted = sort_for_grid(&sample_statuses());
        for pair in sorted.windows(2) {
            if pair[0].unlocked == pair[1].unlocked && pair[0].def.rarity == pair[1].def.rarity {
                assert!(pair[0].progress >= pair[1].progress);
            }
        }
    }

    #[test]
    fn sorting_an_already_sorted_sequence_is_stable() {
        let once = sort_for_grid(&sample_statuses());
        let twice = sort_for_grid(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn legendary_locked_badges_lead_the_locked_partition() {
        let sorted = sort_for_grid(&sample_statuses());
        let first_locked = sorted.iter().position(|s| !s.unlocked).unwrap();
        assert_eq!(sorted[first_locked].def.rarity, Rarity::Legendary);
    }

    #[test]
    fn recent_unlocks_skip_locked_and_unknown_ids() {
        let statuses = sample_statuses();
        let picks = recently_unlocked(
            &statuses,
            &["consequence-free-week", "reflection-streak-3", "missing"],
        );
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].def.id, "consequence-free-week");
    }
}
