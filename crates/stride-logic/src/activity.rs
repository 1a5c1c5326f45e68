//! Activity records: reflections, commitment-fee transactions, and
//! stage progress.
//!
//! These are the read-only inputs to every metric and to the achievement
//! evaluator. The app's data layer owns loading and mutation; this crate
//! only ever borrows an [`ActivitySnapshot`]. Nothing here touches a
//! clock — functions that need "now" take it as a parameter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stage tag on a reflection: one of the five guided stages, or free-form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageTag {
    Stage1,
    Stage2,
    Stage3,
    Stage4,
    Stage5,
    Unguided,
}

/// A single journal entry written by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectionEntry {
    pub id: String,
    pub title: String,
    pub stage: StageTag,
    /// First line shown in list views.
    pub preview: String,
    /// Full free-text body.
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Cadence of the promise a transaction settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromiseType {
    Daily,
    Weekly,
    Other,
}

/// Settlement state of a fee transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Charged,
    Refunded,
    Cancelled,
}

/// One wallet movement tied to a promise.
///
/// Negative amounts are commitment fees charged for a missed promise;
/// positive amounts are credits or refunds for kept ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeTransaction {
    pub id: String,
    pub goal_title: String,
    pub promise_type: PromiseType,
    /// Signed amount in account currency. Negative = fee, positive = credit.
    pub amount: f64,
    pub status: TransactionStatus,
    /// Whether the user re-committed to the goal after this transaction.
    pub recommitted: bool,
    pub created_at: DateTime<Utc>,
}

impl FeeTransaction {
    /// Whether this transaction is a fee (money charged, not credited).
    pub fn is_fee(&self) -> bool {
        self.amount < 0.0
    }
}

/// Progress through one of the five guided transformation stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageProgress {
    /// Stage ordinal, 1–5.
    pub stage: u8,
    /// Completion percentage, 0–100.
    pub completion: u8,
    /// Set once completion reaches 100.
    pub completed_at: Option<DateTime<Utc>>,
    /// Stage N is unlocked only once stage N−1 is fully complete.
    pub unlocked: bool,
}

impl StageProgress {
    pub fn is_complete(&self) -> bool {
        self.completion == 100
    }
}

/// The three read-only activity collections, bundled for injection.
///
/// Everything downstream (metrics, evaluator, wallet views) is a pure
/// projection of a snapshot; there is no mutation path through this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    pub reflections: Vec<ReflectionEntry>,
    pub transactions: Vec<FeeTransaction>,
    pub stages: Vec<StageProgress>,
}
