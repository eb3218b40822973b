//! Records as the upstream API returns them
//!
//! These mirror the upstream JSON shapes. Fields the upstream sometimes omits
//! default to empty values; nothing here is validated.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AchievementFlag, DailyCategory, Product};

/// Achievement record from `achievements?ids=`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAchievement {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirement: String,
    #[serde(default)]
    pub locked_text: String,
    #[serde(default)]
    pub flags: Vec<AchievementFlag>,
    #[serde(default)]
    pub tiers: Vec<RawTier>,
    #[serde(default)]
    pub prerequisites: Vec<u32>,
    #[serde(default)]
    pub bits: Vec<RawBit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_cap: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTier {
    pub count: i32,
    pub points: i32,
}

/// Descriptive bit. Only `Text` bits are modeled; the rest keep their tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBit {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
}

impl RawBit {
    pub const TEXT: &'static str = "Text";

    pub fn is_text(&self) -> bool {
        self.kind == Self::TEXT
    }
}

// ============================================================================
// DAILY PAYLOAD
// ============================================================================

/// Payload of `achievements/daily` and `achievements/daily/tomorrow`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDailyPayload {
    #[serde(default)]
    pub pve: Vec<RawDailyEntry>,
    #[serde(default)]
    pub pvp: Vec<RawDailyEntry>,
    #[serde(default)]
    pub wvw: Vec<RawDailyEntry>,
    #[serde(default)]
    pub fractals: Vec<RawDailyEntry>,
    #[serde(default)]
    pub special: Vec<RawDailyEntry>,
}

impl RawDailyPayload {
    pub fn entries(&self, category: DailyCategory) -> &[RawDailyEntry] {
        match category {
            DailyCategory::Pve => &self.pve,
            DailyCategory::Pvp => &self.pvp,
            DailyCategory::Wvw => &self.wvw,
            DailyCategory::Fractals => &self.fractals,
            DailyCategory::Special => &self.special,
        }
    }

    /// Achievement ids of every entry, category by category in fetch order.
    pub fn achievement_ids(&self) -> Vec<u32> {
        DailyCategory::ALL
            .iter()
            .flat_map(|category| self.entries(*category).iter().map(|entry| entry.id))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDailyEntry {
    pub id: u32,
    pub level: RawLevel,
    #[serde(default)]
    pub required_access: Option<RawAccess>,
}

impl RawDailyEntry {
    /// Products a player must own to see this entry.
    pub fn products(&self) -> Vec<Product> {
        match &self.required_access {
            Some(access) => access.required_products(),
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLevel {
    pub min: i32,
    pub max: i32,
}

/// Product gate of a daily entry.
///
/// Older payloads list bare product tokens. Newer ones send a single object
/// naming one product and whether the entry is shown to owners or non-owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAccess {
    Products(Vec<Product>),
    Gate {
        product: Product,
        #[serde(default)]
        condition: AccessCondition,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessCondition {
    #[default]
    HasAccess,
    NoAccess,
}

impl RawAccess {
    /// A `NoAccess` gate targets players without the product, so it requires
    /// nothing.
    pub fn required_products(&self) -> Vec<Product> {
        match self {
            RawAccess::Products(products) => products.clone(),
            RawAccess::Gate {
                product,
                condition: AccessCondition::HasAccess,
            } => vec![*product],
            RawAccess::Gate {
                condition: AccessCondition::NoAccess,
                ..
            } => Vec::new(),
        }
    }
}

// ============================================================================
// MASTERIES AND GROUPS
// ============================================================================

/// Mastery line record from `masteries?ids=`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMasteryLine {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub requirement: String,
    pub order: i32,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub levels: Vec<RawMastery>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMastery {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub icon: String,
    pub point_cost: i32,
    pub exp_cost: i64,
}

/// Achievement group record from `achievements/groups?ids=`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAchievementGroup {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub order: i32,
    #[serde(default)]
    pub categories: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_achievement_defaults_for_missing_fields() -> Result<(), serde_json::Error> {
        let raw: RawAchievement = serde_json::from_value(json!({
            "id": 1840,
            "name": "Daily Completionist",
            "flags": ["Pvp", "Daily"],
            "tiers": [{"count": 1, "points": 10}]
        }))?;

        assert_eq!(raw.id, 1840);
        assert!(raw.description.is_empty());
        assert!(raw.prerequisites.is_empty());
        assert!(raw.bits.is_empty());
        assert_eq!(raw.point_cap, None);
        assert_eq!(raw.tiers, vec![RawTier { count: 1, points: 10 }]);
        Ok(())
    }

    #[test]
    fn test_bit_tag_is_read_from_type_key() -> Result<(), serde_json::Error> {
        let bits: Vec<RawBit> = serde_json::from_value(json!([
            {"type": "Text", "text": "Defeat the Shatterer"},
            {"type": "Item", "id": 46742}
        ]))?;

        assert!(bits[0].is_text());
        assert_eq!(bits[0].text.as_deref(), Some("Defeat the Shatterer"));
        assert!(!bits[1].is_text());
        assert_eq!(bits[1].id, Some(46742));
        Ok(())
    }

    fn entry_with_access(access: serde_json::Value) -> Result<RawDailyEntry, serde_json::Error> {
        serde_json::from_value(json!({
            "id": 1984,
            "level": {"min": 1, "max": 80},
            "required_access": access
        }))
    }

    #[test]
    fn test_daily_access_product_list() -> Result<(), serde_json::Error> {
        let entry = entry_with_access(json!(["GuildWars2", "PathOfFire"]))?;
        assert_eq!(entry.products(), vec![Product::GuildWars2, Product::PathOfFire]);
        Ok(())
    }

    #[test]
    fn test_daily_access_single_gate_object() -> Result<(), serde_json::Error> {
        let entry = entry_with_access(json!({"product": "HeartOfThorns", "condition": "HasAccess"}))?;
        assert_eq!(entry.products(), vec![Product::HeartOfThorns]);

        let entry = entry_with_access(json!({"product": "PathOfFire"}))?;
        assert_eq!(entry.products(), vec![Product::PathOfFire]);
        Ok(())
    }

    #[test]
    fn test_daily_access_no_access_gate_requires_nothing() -> Result<(), serde_json::Error> {
        let entry = entry_with_access(json!({"product": "HeartOfThorns", "condition": "NoAccess"}))?;
        assert!(entry.products().is_empty());
        Ok(())
    }

    #[test]
    fn test_daily_access_missing_requires_nothing() -> Result<(), serde_json::Error> {
        let entry: RawDailyEntry = serde_json::from_value(json!({
            "id": 1984,
            "level": {"min": 1, "max": 80}
        }))?;
        assert_eq!(entry.required_access, None);
        assert!(entry.products().is_empty());
        Ok(())
    }

    #[test]
    fn test_daily_payload_collects_ids_in_category_order() -> Result<(), serde_json::Error> {
        let payload: RawDailyPayload = serde_json::from_value(json!({
            "pve": [{"id": 1, "level": {"min": 1, "max": 80}}],
            "pvp": [{"id": 2, "level": {"min": 1, "max": 80}}],
            "wvw": [{"id": 3, "level": {"min": 1, "max": 80}}],
            "fractals": [{"id": 4, "level": {"min": 1, "max": 80}}]
        }))?;

        assert!(payload.special.is_empty());
        assert_eq!(payload.achievement_ids(), vec![1, 2, 4, 3]);
        Ok(())
    }
}
