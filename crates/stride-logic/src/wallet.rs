//! Pure wallet aggregations: weekly transaction grouping and the
//! recent-fee window check the consequence-free-week criterion rests on.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::{FeeTransaction, TransactionStatus};

/// One Sunday-to-Saturday bucket of wallet activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekGroup {
    /// Sunday opening the week.
    pub week_start: NaiveDate,
    /// Saturday closing the week.
    pub week_end: NaiveDate,
    /// Transactions in this week, newest first.
    pub transactions: Vec<FeeTransaction>,
    /// Signed sum of amounts (fees pull it down, credits up).
    pub total_amount: f64,
    /// Whether any charged fee here has not been re-committed yet.
    pub has_recommit_opportunities: bool,
}

/// Bucket transactions into calendar weeks starting on Sunday, newest
/// week first. Each group's transactions are sorted newest first.
pub fn group_by_week(transactions: &[FeeTransaction]) -> Vec<WeekGroup> {
    let mut buckets: BTreeMap<NaiveDate, Vec<FeeTransaction>> = BTreeMap::new();
    for tx in transactions {
        let date = tx.created_at.date_naive();
        let week_start = date - Duration::days(date.weekday().num_days_from_sunday() as i64);
        buckets.entry(week_start).or_default().push(tx.clone());
    }

    buckets
        .into_iter()
        .rev()
        .map(|(week_start, mut txs)| {
            txs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            let total_amount = txs.iter().map(|t| t.amount).sum();
            let has_recommit_opportunities = txs
                .iter()
                .any(|t| t.is_fee() && !t.recommitted && t.status == TransactionStatus::Charged);
            WeekGroup {
                week_start,
                week_end: week_start + Duration::days(6),
                transactions: txs,
                total_amount,
                has_recommit_opportunities,
            }
        })
        .collect()
}

/// True iff no charged fee (negative amount, `Charged` status) falls
/// within the last `days` days. An empty history passes vacuously.
pub fn has_no_recent_fees(
    transactions: &[FeeTransaction],
    days: i64,
    now: DateTime<Utc>,
) -> bool {
    let cutoff = now - Duration::days(days);
    !transactions.iter().any(|t| {
        t.is_fee() && t.status == TransactionStatus::Charged && t.created_at >= cutoff
    })
}
