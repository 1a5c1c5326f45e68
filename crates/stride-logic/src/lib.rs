//! Pure achievement and activity logic for Stride.
//!
//! This crate contains all badge, streak, stage, and wallet logic that is
//! independent of any database, UI, or runtime. Functions take plain data
//! plus an explicit `now` and return results, making them unit-testable
//! and portable across the mobile app shell and headless tooling.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`activity`] | Read-only activity records and the snapshot bundle |
//! | [`stages`] | Stage-unlock invariants, validation, derived progress |
//! | [`metrics`] | Pure metrics: streaks, counts, day-window booleans |
//! | [`catalog`] | Achievement definitions and load-time validation |
//! | [`evaluate`] | Catalog × snapshot → unlocked/progress statuses |
//! | [`presentation`] | Badge-grid filtering and stable ordering |
//! | [`wallet`] | Weekly transaction grouping and fee-window checks |
//!
//! # Evaluation flow
//!
//! Activity snapshot → [`metrics`] → [`evaluate`] (consulting a validated
//! [`catalog::Catalog`]) → [`presentation`] → the display layer, which
//! lives outside this crate. Statuses are recomputed on demand and never
//! stored.

pub mod activity;
pub mod catalog;
pub mod evaluate;
pub mod metrics;
pub mod presentation;
pub mod stages;
pub mod wallet;
