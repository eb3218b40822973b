//! Rendered records
//!
//! Built fresh for every resolution and never mutated afterwards.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AchievementFlag, DailyCategory, Product};

/// Marker carried by bits whose kind is not modeled.
pub const NOT_IMPLEMENTED_MARKER: &str = "nope";

// ============================================================================
// ACHIEVEMENTS
// ============================================================================

/// An achievement with its prerequisite chain resolved inline.
///
/// Every prerequisite is a full copy of the referenced achievement, which in
/// turn carries its own resolved prerequisites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub requirement: String,
    pub locked_text: String,
    pub flags: Vec<AchievementFlag>,
    pub tiers: Vec<AchievementTier>,
    pub prerequisites: Vec<Achievement>,
    pub bits: Vec<AchievementBit>,
    pub point_cap: Option<i32>,
}

impl Achievement {
    /// Visit this achievement and every nested prerequisite, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Achievement)) {
        visit(self);
        for prerequisite in &self.prerequisites {
            prerequisite.walk(visit);
        }
    }

    /// Number of nodes in the rendered prerequisite tree, this one included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    /// Longest prerequisite chain below this achievement.
    pub fn depth(&self) -> usize {
        self.prerequisites
            .iter()
            .map(|p| p.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementTier {
    pub count: i32,
    pub points: i32,
}

/// Descriptive bit of an achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AchievementBit {
    Text { text: String },
    NotImplemented { msg: String },
}

impl AchievementBit {
    pub fn not_implemented() -> Self {
        AchievementBit::NotImplemented {
            msg: NOT_IMPLEMENTED_MARKER.to_string(),
        }
    }
}

// ============================================================================
// DAILIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCap {
    pub min: i32,
    pub max: i32,
}

/// A daily entry: the resolved achievement plus the daily-specific gates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAchievement {
    pub achievement: Achievement,
    pub level: LevelCap,
    pub required_access: Vec<Product>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAchievements {
    pub pve: Vec<DailyAchievement>,
    pub pvp: Vec<DailyAchievement>,
    pub wvw: Vec<DailyAchievement>,
    pub fractals: Vec<DailyAchievement>,
    pub special: Vec<DailyAchievement>,
}

impl DailyAchievements {
    pub fn category(&self, category: DailyCategory) -> &[DailyAchievement] {
        match category {
            DailyCategory::Pve => &self.pve,
            DailyCategory::Pvp => &self.pvp,
            DailyCategory::Wvw => &self.wvw,
            DailyCategory::Fractals => &self.fractals,
            DailyCategory::Special => &self.special,
        }
    }

    pub fn category_mut(&mut self, category: DailyCategory) -> &mut Vec<DailyAchievement> {
        match category {
            DailyCategory::Pve => &mut self.pve,
            DailyCategory::Pvp => &mut self.pvp,
            DailyCategory::Wvw => &mut self.wvw,
            DailyCategory::Fractals => &mut self.fractals,
            DailyCategory::Special => &mut self.special,
        }
    }

    pub fn len(&self) -> usize {
        DailyCategory::ALL
            .iter()
            .map(|category| self.category(*category).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// MASTERIES AND GROUPS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryLine {
    pub id: u32,
    pub name: String,
    pub requirement: String,
    pub order: i32,
    pub region: String,
    pub background: String,
    pub masteries: Vec<Mastery>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mastery {
    pub name: String,
    pub description: String,
    pub instruction: String,
    pub icon: String,
    pub point_cost: i32,
    pub exp_cost: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementGroup {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub order: i32,
    pub categories: Vec<u32>,
}
