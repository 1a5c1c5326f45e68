//! Stride Headless Validation Harness
//!
//! Runs the pure logic crate against the seed activity snapshot.
//! Everything happens in-process — no DB, no networking, no rendering.
//!
//! Usage:
//!   cargo run -p stride-simtest
//!   cargo run -p stride-simtest -- --verbose

use chrono::{DateTime, Utc};
use serde::Deserialize;
use stride_logic::activity::ActivitySnapshot;
use stride_logic::catalog::{self, CatalogError};
use stride_logic::evaluate::{evaluate, RandomPastStamp};
use stride_logic::presentation::{filter_by_category, sort_for_grid, CategoryFilter};
use stride_logic::{metrics, stages, wallet};

// ── Seed data (fixed snapshot with its own reference clock) ─────────────
const SEED_JSON: &str = include_str!("../../../data/activity_seed.json");

#[derive(Debug, Deserialize)]
struct SeedData {
    /// Reference "now" the seed timestamps were authored against.
    as_of: DateTime<Utc>,
    snapshot: ActivitySnapshot,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Stride Logic Harness ===\n");

    let seed: SeedData = match serde_json::from_str(SEED_JSON) {
        Ok(seed) => seed,
        Err(e) => {
            eprintln!("seed JSON parse error: {e}");
            std::process::exit(1);
        }
    };

    let mut results = Vec::new();

    // 1. Seed snapshot shape and stage invariants
    results.extend(validate_seed(&seed, verbose));

    // 2. Metric sweep against the seed
    results.extend(validate_metrics(&seed, verbose));

    // 3. Catalog validation (including rejection of broken configs)
    results.extend(validate_catalog_rules(verbose));

    // 4. Full evaluation pass
    results.extend(validate_evaluation(&seed, verbose));

    // 5. Presentation filter and sort
    results.extend(validate_presentation(&seed, verbose));

    // 6. Wallet weekly grouping
    results.extend(validate_wallet(&seed, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Seed snapshot ────────────────────────────────────────────────────

fn validate_seed(seed: &SeedData, _verbose: bool) -> Vec<TestResult> {
    println!("--- Seed Snapshot ---");
    let mut results = Vec::new();
    let snapshot = &seed.snapshot;

    results.push(check(
        "seed_collections_populated",
        !snapshot.reflections.is_empty()
            && !snapshot.transactions.is_empty()
            && snapshot.stages.len() == stages::STAGE_COUNT as usize,
        format!(
            "{} reflections, {} transactions, {} stages",
            snapshot.reflections.len(),
            snapshot.transactions.len(),
            snapshot.stages.len()
        ),
    ));

    let violations = stages::validate_stages(&snapshot.stages);
    results.push(check(
        "seed_stage_invariants",
        violations.is_empty(),
        if violations.is_empty() {
            "stage ordering and unlock gating hold".into()
        } else {
            format!("{} violations: {:?}", violations.len(), violations)
        },
    ));

    let overall = stages::overall_progress(&snapshot.stages);
    results.push(check(
        "seed_overall_progress",
        overall == 33,
        format!("overall journey progress {overall}% (expected 33%)"),
    ));

    let unlocked = stages::unlocked_stages(&snapshot.stages).len();
    results.push(check(
        "seed_unlocked_stages",
        unlocked == 2,
        format!("{unlocked} stages unlocked (expected 2)"),
    ));

    results
}

// ── 2. Metrics ──────────────────────────────────────────────────────────

fn validate_metrics(seed: &SeedData, _verbose: bool) -> Vec<TestResult> {
    println!("--- Metrics ---");
    let mut results = Vec::new();
    let snapshot = &seed.snapshot;
    let now = seed.as_of;

    let cases: Vec<(&str, u32, u32)> = vec![
        (
            "reflection_streak",
            metrics::reflection_streak(&snapshot.reflections, now),
            3,
        ),
        (
            "no_fee_streak_days",
            metrics::no_fee_streak_days(&snapshot.transactions, now),
            1,
        ),
        (
            "completed_stage_count",
            metrics::completed_stage_count(&snapshot.stages),
            1,
        ),
        (
            "total_reflections",
            metrics::total_reflections(&snapshot.reflections),
            6,
        ),
        (
            "early_reflection_count",
            metrics::early_reflection_count(&snapshot.reflections),
            2,
        ),
        (
            "weekend_reflection_count",
            metrics::weekend_reflection_count(&snapshot.reflections),
            2,
        ),
        (
            "long_reflection_count",
            metrics::long_reflection_count(&snapshot.reflections),
            1,
        ),
    ];
    for (name, got, want) in cases {
        results.push(check(name, got == want, format!("{got} (expected {want})")));
    }

    let flawless = metrics::consequence_free_week(&snapshot.transactions, now);
    results.push(check(
        "consequence_free_week",
        !flawless,
        format!("{flawless} (fee charged yesterday, expected false)"),
    ));

    let comeback = metrics::had_comeback(&snapshot.reflections);
    results.push(check(
        "had_comeback",
        !comeback,
        format!("{comeback} (latest entries one day apart, expected false)"),
    ));

    results
}

// ── 3. Catalog ──────────────────────────────────────────────────────────

fn validate_catalog_rules(_verbose: bool) -> Vec<TestResult> {
    println!("--- Catalog ---");
    let mut results = Vec::new();

    let defs = catalog::default_catalog();
    match catalog::validate_catalog(&defs) {
        Ok(valid) => {
            results.push(check(
                "catalog_valid",
                valid.len() == defs.len(),
                format!("{} achievements validated", valid.len()),
            ));
        }
        Err(errors) => {
            results.push(check(
                "catalog_valid",
                false,
                format!("built-in catalog rejected: {errors:?}"),
            ));
        }
    }

    // A bad requirement must fail fast at load, not score as locked.
    let mut broken = catalog::default_catalog();
    broken[0].criterion.requirement = "time_travel".into();
    let rejected = matches!(
        catalog::validate_catalog(&broken),
        Err(errors) if errors.iter().any(|e| matches!(e, CatalogError::UnknownCriterion { .. }))
    );
    results.push(check(
        "catalog_rejects_unknown_criterion",
        rejected,
        "unknown requirement surfaced as UnknownCriterion".into(),
    ));

    let mut bad_icon = catalog::default_catalog();
    bad_icon[0].icon = "Unicorn".into();
    let rejected = matches!(
        catalog::validate_catalog(&bad_icon),
        Err(errors) if errors.iter().any(|e| matches!(e, CatalogError::UnknownIcon { .. }))
    );
    results.push(check(
        "catalog_rejects_unknown_icon",
        rejected,
        "unknown icon surfaced as UnknownIcon".into(),
    ));

    results
}

// ── 4. Evaluator ────────────────────────────────────────────────────────

fn validate_evaluation(seed: &SeedData, verbose: bool) -> Vec<TestResult> {
    println!("--- Evaluator ---");
    let mut results = Vec::new();

    let catalog = match catalog::validate_catalog(&catalog::default_catalog()) {
        Ok(c) => c,
        Err(errors) => {
            results.push(check(
                "evaluation_catalog",
                false,
                format!("catalog invalid: {errors:?}"),
            ));
            return results;
        }
    };

    let now = seed.as_of;
    let statuses = evaluate(&catalog, &seed.snapshot, now, &mut RandomPastStamp::new(7));

    if verbose {
        for s in &statuses {
            println!(
                "    {:<24} unlocked={:<5} progress={:>3}% value={}",
                s.def.id, s.unlocked, s.progress, s.current_value
            );
        }
    }

    results.push(check(
        "evaluation_covers_catalog",
        statuses.len() == catalog.len(),
        format!("{} statuses for {} achievements", statuses.len(), catalog.len()),
    ));

    // (id, unlocked, progress, current_value) expectations for the seed.
    let expectations = [
        ("reflection-streak-3", true, 100, 3),
        ("reflection-streak-7", false, 43, 3),
        ("reflection-streak-30", false, 10, 3),
        ("commitment-streak-7", false, 14, 1),
        ("stage-1-complete", true, 100, 1),
        ("stage-3-complete", false, 33, 1),
        ("stage-5-complete", false, 20, 1),
        ("total-reflections-50", false, 12, 6),
        ("consequence-free-week", false, 0, 0),
        ("early-bird", false, 40, 2),
        ("weekend-warrior", false, 20, 2),
        ("comeback-kid", false, 0, 0),
        ("deep-thinker", false, 20, 1),
    ];
    for (id, unlocked, progress, value) in expectations {
        let status = statuses.iter().find(|s| s.def.id == id);
        let passed = status.map_or(false, |s| {
            s.unlocked == unlocked && s.progress == progress && s.current_value == value
        });
        let detail = match status {
            Some(s) => format!(
                "unlocked={} progress={} value={} (expected {}/{}/{})",
                s.unlocked, s.progress, s.current_value, unlocked, progress, value
            ),
            None => "status missing".into(),
        };
        results.push(check(&format!("eval_{id}"), passed, detail));
    }

    results.push(check(
        "unlock_dates_only_on_unlocked",
        statuses.iter().all(|s| s.unlocked == s.date_unlocked.is_some()),
        "date_unlocked present iff unlocked".into(),
    ));

    // Idempotence: stamp seed aside, a rerun must agree everywhere.
    let rerun = evaluate(&catalog, &seed.snapshot, now, &mut RandomPastStamp::new(99));
    let idempotent = statuses.iter().zip(&rerun).all(|(a, b)| {
        a.def.id == b.def.id
            && a.unlocked == b.unlocked
            && a.progress == b.progress
            && a.current_value == b.current_value
    });
    results.push(check(
        "evaluation_idempotent",
        idempotent,
        "rerun matches apart from unlock stamps".into(),
    ));

    results
}

// ── 5. Presentation ─────────────────────────────────────────────────────

fn validate_presentation(seed: &SeedData, _verbose: bool) -> Vec<TestResult> {
    println!("--- Presentation ---");
    let mut results = Vec::new();

    let catalog = catalog::validate_catalog(&catalog::default_catalog()).expect("valid catalog");
    let statuses = evaluate(
        &catalog,
        &seed.snapshot,
        seed.as_of,
        &mut RandomPastStamp::new(7),
    );

    let sorted = sort_for_grid(&statuses);
    let partitioned = sorted
        .windows(2)
        .all(|pair| pair[0].unlocked >= pair[1].unlocked);
    results.push(check(
        "grid_unlocked_first",
        partitioned,
        "unlocked badges precede locked ones".into(),
    ));

    let rarity_ordered = sorted.windows(2).all(|pair| {
        pair[0].unlocked != pair[1].unlocked || pair[0].def.rarity >= pair[1].def.rarity
    });
    results.push(check(
        "grid_rarity_descending",
        rarity_ordered,
        "rarity descends within each partition".into(),
    ));

    let resorted = sort_for_grid(&sorted);
    results.push(check(
        "grid_sort_stable",
        resorted == sorted,
        "re-sorting an ordered grid changes nothing".into(),
    ));

    let streaks = filter_by_category(
        &statuses,
        CategoryFilter::Only(stride_logic::catalog::Category::Streak),
    );
    let all = filter_by_category(&statuses, CategoryFilter::All);
    results.push(check(
        "category_filter",
        streaks.len() == 4 && all.len() == statuses.len(),
        format!("{} streak badges, {} total", streaks.len(), all.len()),
    ));

    results
}

// ── 6. Wallet ───────────────────────────────────────────────────────────

fn validate_wallet(seed: &SeedData, verbose: bool) -> Vec<TestResult> {
    println!("--- Wallet ---");
    let mut results = Vec::new();

    let groups = wallet::group_by_week(&seed.snapshot.transactions);
    if verbose {
        for g in &groups {
            println!(
                "    week {} → {}: {} txs, total {:+.2}, recommit={}",
                g.week_start,
                g.week_end,
                g.transactions.len(),
                g.total_amount,
                g.has_recommit_opportunities
            );
        }
    }

    results.push(check(
        "wallet_week_count",
        groups.len() == 2,
        format!("{} weekly groups (expected 2)", groups.len()),
    ));

    let newest_first = groups.windows(2).all(|p| p[0].week_start > p[1].week_start);
    results.push(check(
        "wallet_weeks_newest_first",
        newest_first,
        "groups ordered by descending week".into(),
    ));

    let totals_ok = groups.len() == 2
        && (groups[0].total_amount - (-20.0)).abs() < 1e-9
        && (groups[1].total_amount - 5.0).abs() < 1e-9;
    results.push(check(
        "wallet_week_totals",
        totals_ok,
        format!(
            "totals {:?} (expected [-20.0, 5.0])",
            groups.iter().map(|g| g.total_amount).collect::<Vec<_>>()
        ),
    ));

    let recommits_ok = groups.iter().all(|g| g.has_recommit_opportunities);
    results.push(check(
        "wallet_recommit_flags",
        recommits_ok,
        "both weeks carry an open recommit opportunity".into(),
    ));

    let sorted_within = groups.iter().all(|g| {
        g.transactions
            .windows(2)
            .all(|p| p[0].created_at >= p[1].created_at)
    });
    results.push(check(
        "wallet_transactions_newest_first",
        sorted_within,
        "transactions within each week sorted newest first".into(),
    ));

    results
}
