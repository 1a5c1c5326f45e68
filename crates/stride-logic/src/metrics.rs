//! Pure activity metrics behind the achievement criteria.
//!
//! Every function takes the relevant records plus an explicit `now`.
//! Callers sample the clock once per evaluation pass and thread it
//! through, so day-window calculations cannot disagree near midnight.
//! All metrics are total: empty collections yield 0, `false`, or the
//! documented sentinel.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc, Weekday};

use crate::activity::{FeeTransaction, ReflectionEntry, StageProgress};
use crate::wallet;

/// Streak walking stops after a year of lookback.
const STREAK_LOOKBACK_DAYS: i64 = 365;

/// No-fee streak reported when no fee has ever been charged.
pub const NO_FEE_SENTINEL_DAYS: u32 = 30;

/// Reflections before this local hour count as "early".
const EARLY_HOUR: u32 = 8;

/// Gap between reflections that counts as a comeback.
const COMEBACK_GAP_DAYS: i64 = 7;

/// Character count above which a reflection counts as "long".
const LONG_REFLECTION_CHARS: usize = 500;

/// Window for the consequence-free-week check.
const WEEK_DAYS: i64 = 7;

/// Count consecutive calendar days with at least one reflection, walking
/// backward from today. Breaks on the first missing day — including day
/// 0, so a streak is 0 unless there is an entry for today itself.
pub fn reflection_streak(reflections: &[ReflectionEntry], now: DateTime<Utc>) -> u32 {
    let days_with_entries: HashSet<NaiveDate> = reflections
        .iter()
        .map(|r| r.created_at.date_naive())
        .collect();

    let today = now.date_naive();
    let mut streak = 0;
    for offset in 0..STREAK_LOOKBACK_DAYS {
        let day = today - Duration::days(offset);
        if days_with_entries.contains(&day) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Whole days since the most recent fee (negative amount, any status).
/// With no fee on record, returns [`NO_FEE_SENTINEL_DAYS`] rather than an
/// unbounded value.
pub fn no_fee_streak_days(transactions: &[FeeTransaction], now: DateTime<Utc>) -> u32 {
    let last_fee = transactions
        .iter()
        .filter(|t| t.is_fee())
        .map(|t| t.created_at)
        .max();

    match last_fee {
        Some(charged_at) => (now - charged_at).num_days().max(0) as u32,
        None => NO_FEE_SENTINEL_DAYS,
    }
}

/// Number of stages at 100% completion.
pub fn completed_stage_count(stages: &[StageProgress]) -> u32 {
    stages.iter().filter(|s| s.is_complete()).count() as u32
}

/// Total reflections ever written.
pub fn total_reflections(reflections: &[ReflectionEntry]) -> u32 {
    reflections.len() as u32
}

/// True iff no charged fee falls within the last 7 days. Vacuously true
/// on an empty transaction history: a user who has never staked a promise
/// still gets the flawless week. Intentional product behavior.
pub fn consequence_free_week(transactions: &[FeeTransaction], now: DateTime<Utc>) -> bool {
    wallet::has_no_recent_fees(transactions, WEEK_DAYS, now)
}

/// Reflections written before 8 AM.
pub fn early_reflection_count(reflections: &[ReflectionEntry]) -> u32 {
    reflections
        .iter()
        .filter(|r| r.created_at.hour() < EARLY_HOUR)
        .count() as u32
}

/// Reflections written on a Saturday or Sunday.
pub fn weekend_reflection_count(reflections: &[ReflectionEntry]) -> u32 {
    reflections
        .iter()
        .filter(|r| {
            matches!(
                r.created_at.weekday(),
                Weekday::Sat | Weekday::Sun
            )
        })
        .count() as u32
}

/// True iff the user returned after a break: the two most recent
/// reflections are at least 7 whole days apart. Needs two entries.
pub fn had_comeback(reflections: &[ReflectionEntry]) -> bool {
    if reflections.len() < 2 {
        return false;
    }
    let mut timestamps: Vec<DateTime<Utc>> =
        reflections.iter().map(|r| r.created_at).collect();
    timestamps.sort_unstable_by(|a, b| b.cmp(a));

    (timestamps[0] - timestamps[1]).num_days() >= COMEBACK_GAP_DAYS
}

/// Reflections whose content runs past 500 characters (chars, not bytes).
pub fn long_reflection_count(reflections: &[ReflectionEntry]) -> u32 {
    reflections
        .iter()
        .filter(|r| r.content.chars().count() > LONG_REFLECTION_CHARS)
        .count() as u32
}
