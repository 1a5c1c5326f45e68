//! Achievement catalog: definitions, criteria, and load-time validation.
//!
//! Definitions are authored data (in code here, JSON elsewhere): the
//! criterion requirement and the icon are plain strings. [`validate_catalog`]
//! resolves both into closed enums up front, so an unknown criterion or
//! icon is a configuration error surfaced at load time — never silently
//! scored as "locked" or rendered as a missing glyph. The evaluator only
//! accepts a validated [`Catalog`], which makes evaluation itself
//! infallible.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Achievement grouping shown as filter tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Streak,
    Milestone,
    Surprise,
}

/// Display rarity. Ordering matters: `common < rare < epic < legendary`
/// drives the grid sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Unlock rule as authored: a requirement name, the numeric target that
/// must be met or exceeded, and the unit shown next to progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub requirement: String,
    pub target: u32,
    pub unit: String,
}

/// One achievement definition, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDef {
    pub id: String,
    pub category: Category,
    pub title: String,
    pub description: String,
    /// Icon name, resolved to an [`Icon`] during validation.
    pub icon: String,
    pub rarity: Rarity,
    pub criterion: Criterion,
    /// Celebration copy shown when the achievement unlocks.
    pub unlock_message: String,
}

/// Metric dispatch target for a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    ConsecutiveReflections,
    NoFeesStreak,
    StageCompletion,
    TotalReflections,
    ConsequenceFreeWeek,
    EarlyReflections,
    WeekendReflections,
    ComebackAfterBreak,
    LongReflections,
}

impl Requirement {
    /// Resolve a requirement name from authored data.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "consecutive_reflections" => Some(Self::ConsecutiveReflections),
            "no_fees_streak" => Some(Self::NoFeesStreak),
            "stage_completion" => Some(Self::StageCompletion),
            "total_reflections" => Some(Self::TotalReflections),
            "consequence_free_week" => Some(Self::ConsequenceFreeWeek),
            "early_reflections" => Some(Self::EarlyReflections),
            "weekend_reflections" => Some(Self::WeekendReflections),
            "comeback_after_break" => Some(Self::ComebackAfterBreak),
            "long_reflections" => Some(Self::LongReflections),
            _ => None,
        }
    }

    /// Boolean criteria unlock on truth alone; the target is display-only.
    pub fn is_boolean(self) -> bool {
        matches!(self, Self::ConsequenceFreeWeek | Self::ComebackAfterBreak)
    }
}

/// Closed set of badge icons the renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Icon {
    Calendar,
    Flame,
    Crown,
    Shield,
    Eye,
    Puzzle,
    Trophy,
    BookOpen,
    Star,
    Sunrise,
    Mountain,
    RotateCcw,
    Brain,
}

impl Icon {
    /// Resolve an icon name from authored data.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Calendar" => Some(Self::Calendar),
            "Flame" => Some(Self::Flame),
            "Crown" => Some(Self::Crown),
            "Shield" => Some(Self::Shield),
            "Eye" => Some(Self::Eye),
            "Puzzle" => Some(Self::Puzzle),
            "Trophy" => Some(Self::Trophy),
            "BookOpen" => Some(Self::BookOpen),
            "Star" => Some(Self::Star),
            "Sunrise" => Some(Self::Sunrise),
            "Mountain" => Some(Self::Mountain),
            "RotateCcw" => Some(Self::RotateCcw),
            "Brain" => Some(Self::Brain),
            _ => None,
        }
    }
}

/// Catalog configuration error. Fatal at load time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("achievement `{id}`: unknown criterion requirement `{requirement}`")]
    UnknownCriterion { id: String, requirement: String },
    #[error("achievement `{id}`: unknown icon `{icon}`")]
    UnknownIcon { id: String, icon: String },
    #[error("duplicate achievement id `{0}`")]
    DuplicateId(String),
    #[error("achievement `{id}`: target must be positive (got {target})")]
    InvalidTarget { id: String, target: u32 },
}

/// One validated catalog entry: the definition plus its resolved
/// requirement and icon.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub def: AchievementDef,
    pub requirement: Requirement,
    pub icon: Icon,
}

/// A validated, immutable achievement catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.def.id == id)
    }
}

/// Validate authored definitions into a [`Catalog`], returning all
/// configuration errors found.
pub fn validate_catalog(defs: &[AchievementDef]) -> Result<Catalog, Vec<CatalogError>> {
    let mut errors = Vec::new();
    let mut entries = Vec::with_capacity(defs.len());
    let mut seen_ids: Vec<&str> = Vec::with_capacity(defs.len());

    for def in defs {
        if seen_ids.contains(&def.id.as_str()) {
            errors.push(CatalogError::DuplicateId(def.id.clone()));
        } else {
            seen_ids.push(&def.id);
        }

        if def.criterion.target == 0 {
            errors.push(CatalogError::InvalidTarget {
                id: def.id.clone(),
                target: def.criterion.target,
            });
        }

        let requirement = Requirement::parse(&def.criterion.requirement);
        if requirement.is_none() {
            errors.push(CatalogError::UnknownCriterion {
                id: def.id.clone(),
                requirement: def.criterion.requirement.clone(),
            });
        }

        let icon = Icon::parse(&def.icon);
        if icon.is_none() {
            errors.push(CatalogError::UnknownIcon {
                id: def.id.clone(),
                icon: def.icon.clone(),
            });
        }

        if let (Some(requirement), Some(icon)) = (requirement, icon) {
            entries.push(CatalogEntry {
                def: def.clone(),
                requirement,
                icon,
            });
        }
    }

    if errors.is_empty() {
        tracing::debug!(entries = entries.len(), "achievement catalog validated");
        Ok(Catalog { entries })
    } else {
        tracing::warn!(errors = errors.len(), "achievement catalog rejected");
        Err(errors)
    }
}

fn def(
    id: &str,
    category: Category,
    title: &str,
    description: &str,
    icon: &str,
    rarity: Rarity,
    requirement: &str,
    target: u32,
    unit: &str,
    unlock_message: &str,
) -> AchievementDef {
    AchievementDef {
        id: id.into(),
        category,
        title: title.into(),
        description: description.into(),
        icon: icon.into(),
        rarity,
        criterion: Criterion {
            requirement: requirement.into(),
            target,
            unit: unit.into(),
        },
        unlock_message: unlock_message.into(),
    }
}

/// The built-in achievement catalog.
pub fn default_catalog() -> Vec<AchievementDef> {
    use Category::*;
    use Rarity::*;

    vec![
        // Streaks
        def(
            "reflection-streak-3",
            Streak,
            "Reflection Rookie",
            "Complete 3 consecutive days of reflection",
            "Calendar",
            Common,
            "consecutive_reflections",
            3,
            "days",
            "You're building a powerful habit of self-reflection!",
        ),
        def(
            "reflection-streak-7",
            Streak,
            "Weekly Warrior",
            "Complete 7 consecutive days of reflection",
            "Flame",
            Rare,
            "consecutive_reflections",
            7,
            "days",
            "A full week of reflection - you're on fire!",
        ),
        def(
            "reflection-streak-30",
            Streak,
            "Mindful Master",
            "Complete 30 consecutive days of reflection",
            "Crown",
            Legendary,
            "consecutive_reflections",
            30,
            "days",
            "Incredible dedication! You've mastered the art of daily reflection.",
        ),
        def(
            "commitment-streak-7",
            Streak,
            "Promise Keeper",
            "Go 7 days without any commitment fees",
            "Shield",
            Rare,
            "no_fees_streak",
            7,
            "days",
            "Your word is your bond - excellent commitment!",
        ),
        // Milestones
        def(
            "stage-1-complete",
            Milestone,
            "Self-Aware",
            "Complete Stage 1: Awareness",
            "Eye",
            Common,
            "stage_completion",
            1,
            "stage",
            "You've taken the first step toward transformation!",
        ),
        def(
            "stage-3-complete",
            Milestone,
            "Integration Expert",
            "Complete Stage 3: Integration",
            "Puzzle",
            Epic,
            "stage_completion",
            3,
            "stage",
            "You're successfully integrating new patterns into your life!",
        ),
        def(
            "stage-5-complete",
            Milestone,
            "Transformation Master",
            "Complete all 5 transformation stages",
            "Trophy",
            Legendary,
            "stage_completion",
            5,
            "stage",
            "Ultimate achievement! You've completed your transformation journey.",
        ),
        def(
            "total-reflections-50",
            Milestone,
            "Reflection Enthusiast",
            "Write 50 total reflections",
            "BookOpen",
            Rare,
            "total_reflections",
            50,
            "entries",
            "Your commitment to self-reflection is inspiring!",
        ),
        // Surprises
        def(
            "consequence-free-week",
            Surprise,
            "Flawless Week",
            "Complete a full week without any commitment fees",
            "Star",
            Epic,
            "consequence_free_week",
            1,
            "week",
            "Perfect execution! You nailed every commitment this week.",
        ),
        def(
            "early-bird",
            Surprise,
            "Early Bird",
            "Complete 5 reflections before 8 AM",
            "Sunrise",
            Rare,
            "early_reflections",
            5,
            "entries",
            "The early bird catches the worm - and the badge!",
        ),
        def(
            "weekend-warrior",
            Surprise,
            "Weekend Warrior",
            "Complete reflections on 10 weekend days",
            "Mountain",
            Rare,
            "weekend_reflections",
            10,
            "days",
            "You don't take breaks from growth - even on weekends!",
        ),
        def(
            "comeback-kid",
            Surprise,
            "Comeback Kid",
            "Return to reflection after a 7+ day break",
            "RotateCcw",
            Common,
            "comeback_after_break",
            7,
            "days",
            "Welcome back! It takes courage to restart your journey.",
        ),
        def(
            "deep-thinker",
            Surprise,
            "Deep Thinker",
            "Write 5 reflections with over 500 characters",
            "Brain",
            Epic,
            "long_reflections",
            5,
            "entries",
            "Your depth of reflection is truly remarkable!",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_validates_cleanly() {
        let catalog = validate_catalog(&default_catalog()).expect("built-in catalog must be valid");
        assert_eq!(catalog.len(), 13);
        assert!(catalog.get("reflection-streak-3").is_some());
        assert!(catalog.get("nonexistent").is_none());
    }

    #[test]
    fn unknown_criterion_is_a_load_time_error() {
        let mut defs = default_catalog();
        defs[0].criterion.requirement = "time_travel".into();
        let errors = validate_catalog(&defs).unwrap_err();
        assert!(errors.contains(&CatalogError::UnknownCriterion {
            id: "reflection-streak-3".into(),
            requirement: "time_travel".into(),
        }));
    }

    #[test]
    fn unknown_icon_is_a_load_time_error() {
        let mut defs = default_catalog();
        defs[1].icon = "Unicorn".into();
        let errors = validate_catalog(&defs).unwrap_err();
        assert!(errors.contains(&CatalogError::UnknownIcon {
            id: "reflection-streak-7".into(),
            icon: "Unicorn".into(),
        }));
    }

    #[test]
    fn duplicate_ids_and_zero_targets_are_rejected() {
        let mut defs = default_catalog();
        let mut dup = defs[0].clone();
        dup.criterion.target = 0;
        defs.push(dup);

        let errors = validate_catalog(&defs).unwrap_err();
        assert!(errors.contains(&CatalogError::DuplicateId("reflection-streak-3".into())));
        assert!(errors.contains(&CatalogError::InvalidTarget {
            id: "reflection-streak-3".into(),
            target: 0,
        }));
    }

    #[test]
    fn all_errors_are_collected_not_just_the_first() {
        let mut defs = default_catalog();
        defs[0].criterion.requirement = "time_travel".into();
        defs[1].icon = "Unicorn".into();
        let errors = validate_catalog(&defs).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn rarity_ordering_drives_sorting() {
        assert!(Rarity::Common < Rarity::Rare);
        assert!(Rarity::Rare < Rarity::Epic);
        assert!(Rarity::Epic < Rarity::Legendary);
    }

    #[test]
    fn boolean_requirements_are_flagged() {
        assert!(Requirement::ConsequenceFreeWeek.is_boolean());
        assert!(Requirement::ComebackAfterBreak.is_boolean());
        assert!(!Requirement::ConsecutiveReflections.is_boolean());
    }
}
