//! Stage progression invariants and derived views.
//!
//! The journey has exactly five ordered stages. Stage records must be
//! sorted by ordinal, completion stays within 0–100, and stage N is
//! unlocked only once stage N−1 reports 100% completion. Validation
//! collects every violation rather than stopping at the first.

use crate::activity::StageProgress;

/// Number of stages in the guided journey.
pub const STAGE_COUNT: u8 = 5;

/// A stage-data invariant violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// Ordinal outside 1–5.
    UnknownStage(u8),
    /// Records not sorted ascending by ordinal.
    OutOfOrder { index: usize, stage: u8 },
    /// Same ordinal appears twice.
    DuplicateStage(u8),
    /// Completion above 100.
    CompletionOutOfRange { stage: u8, completion: u8 },
    /// Stage marked unlocked while its predecessor is incomplete.
    UnlockedWithoutPredecessor(u8),
    /// Stage marked locked although its predecessor is complete.
    LockedWithPredecessorComplete(u8),
}

/// Validate stage records, returning all violations found.
pub fn validate_stages(stages: &[StageProgress]) -> Vec<StageError> {
    let mut errors = Vec::new();

    let mut prev_ordinal: Option<u8> = None;
    for (index, record) in stages.iter().enumerate() {
        if record.stage < 1 || record.stage > STAGE_COUNT {
            errors.push(StageError::UnknownStage(record.stage));
            continue;
        }
        if let Some(prev) = prev_ordinal {
            if record.stage == prev {
                errors.push(StageError::DuplicateStage(record.stage));
            } else if record.stage < prev {
                errors.push(StageError::OutOfOrder {
                    index,
                    stage: record.stage,
                });
            }
        }
        prev_ordinal = Some(record.stage);

        if record.completion > 100 {
            errors.push(StageError::CompletionOutOfRange {
                stage: record.stage,
                completion: record.completion,
            });
        }
    }

    // Unlock gating against the predecessor's completion.
    for pair in stages.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.stage != prev.stage + 1 {
            continue;
        }
        if next.unlocked && !prev.is_complete() {
            errors.push(StageError::UnlockedWithoutPredecessor(next.stage));
        }
        if !next.unlocked && prev.is_complete() {
            errors.push(StageError::LockedWithPredecessorComplete(next.stage));
        }
    }

    errors
}

/// Derive unlocked flags from completions: stage 1 is always unlocked,
/// stage N unlocks once stage N−1 hits 100. Assumes sorted records.
pub fn recompute_unlocks(stages: &mut [StageProgress]) {
    let mut prev_complete = true;
    for record in stages.iter_mut() {
        record.unlocked = prev_complete;
        prev_complete = record.is_complete();
    }
}

/// Mean completion across all stage records, rounded. 0 when empty.
pub fn overall_progress(stages: &[StageProgress]) -> u8 {
    if stages.is_empty() {
        return 0;
    }
    let total: u32 = stages.iter().map(|s| s.completion as u32).sum();
    ((total as f64 / stages.len() as f64).round()) as u8
}

/// Stages currently reachable by the user.
pub fn unlocked_stages(stages: &[StageProgress]) -> Vec<&StageProgress> {
    stages.iter().filter(|s| s.unlocked).collect()
}
