//! Enum types for upstream tokens

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ACHIEVEMENT FLAGS
// ============================================================================

/// Categorical flag attached to an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AchievementFlag {
    Pvp,
    CategoryDisplay,
    MoveToTop,
    IgnoreNearlyComplete,
    Repeatable,
    Hidden,
    RequiresUnlock,
    RepairOnLogin,
    Daily,
    Weekly,
    Monthly,
    Permanent,
}

impl AchievementFlag {
    /// The token as the upstream spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementFlag::Pvp => "Pvp",
            AchievementFlag::CategoryDisplay => "CategoryDisplay",
            AchievementFlag::MoveToTop => "MoveToTop",
            AchievementFlag::IgnoreNearlyComplete => "IgnoreNearlyComplete",
            AchievementFlag::Repeatable => "Repeatable",
            AchievementFlag::Hidden => "Hidden",
            AchievementFlag::RequiresUnlock => "RequiresUnlock",
            AchievementFlag::RepairOnLogin => "RepairOnLogin",
            AchievementFlag::Daily => "Daily",
            AchievementFlag::Weekly => "Weekly",
            AchievementFlag::Monthly => "Monthly",
            AchievementFlag::Permanent => "Permanent",
        }
    }
}

impl fmt::Display for AchievementFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PRODUCTS
// ============================================================================

/// Game product a daily entry may be gated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Product {
    GuildWars2,
    HeartOfThorns,
    PathOfFire,
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Product::GuildWars2 => "GuildWars2",
            Product::HeartOfThorns => "HeartOfThorns",
            Product::PathOfFire => "PathOfFire",
        };
        f.write_str(s)
    }
}

// ============================================================================
// DAILY CATEGORIES
// ============================================================================

/// Category of the daily achievement rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DailyCategory {
    Pve,
    Pvp,
    Wvw,
    Fractals,
    Special,
}

impl DailyCategory {
    /// All categories, in the order their ids are collected for fetching.
    pub const ALL: [DailyCategory; 5] = [
        DailyCategory::Pve,
        DailyCategory::Pvp,
        DailyCategory::Fractals,
        DailyCategory::Wvw,
        DailyCategory::Special,
    ];

    /// Key of this category in the upstream daily payload.
    pub fn key(&self) -> &'static str {
        match self {
            DailyCategory::Pve => "pve",
            DailyCategory::Pvp => "pvp",
            DailyCategory::Wvw => "wvw",
            DailyCategory::Fractals => "fractals",
            DailyCategory::Special => "special",
        }
    }
}

impl fmt::Display for DailyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_tokens_round_trip_through_serde() -> Result<(), serde_json::Error> {
        let flags: Vec<AchievementFlag> =
            serde_json::from_str(r#"["Pvp","IgnoreNearlyComplete","RepairOnLogin"]"#)?;
        assert_eq!(
            flags,
            vec![
                AchievementFlag::Pvp,
                AchievementFlag::IgnoreNearlyComplete,
                AchievementFlag::RepairOnLogin
            ]
        );
        for flag in flags {
            assert_eq!(serde_json::to_string(&flag)?, format!("\"{}\"", flag));
        }
        Ok(())
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let result = serde_json::from_str::<AchievementFlag>(r#""Seasonal""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_daily_category_keys() {
        let keys: Vec<&str> = DailyCategory::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(keys, vec!["pve", "pvp", "fractals", "wvw", "special"]);
    }
}
