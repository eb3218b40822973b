//! Daily achievement resolution

use super::Resolver;
use crate::cursor::Cursor;
use crate::entities::{DailyAchievement, DailyAchievements, LevelCap};
use crate::error::CoreResult;
use crate::raw::RawDailyPayload;
use crate::source::fetch_as;
use crate::DailyCategory;

pub const DAILY_ENDPOINT: &str = "achievements/daily";
pub const DAILY_TOMORROW_ENDPOINT: &str = "achievements/daily/tomorrow";

pub fn daily_endpoint(tomorrow: bool) -> &'static str {
    if tomorrow {
        DAILY_TOMORROW_ENDPOINT
    } else {
        DAILY_ENDPOINT
    }
}

impl Resolver {
    /// Today's (or tomorrow's) daily achievements, grouped by category.
    ///
    /// Each entry is the fully resolved achievement overlaid with the daily
    /// level range and product gates.
    pub async fn daily_achievements(&self, tomorrow: bool) -> CoreResult<DailyAchievements> {
        let payload: RawDailyPayload = fetch_as(self.source(), daily_endpoint(tomorrow)).await?;

        let ids = payload.achievement_ids();
        if ids.is_empty() {
            return Ok(DailyAchievements::default());
        }

        let fetched = self
            .fetch_achievement_closure(&ids, Cursor::default())
            .await?;

        let mut dailies = DailyAchievements::default();
        for category in DailyCategory::ALL {
            for entry in payload.entries(category) {
                let Some(achievement) = fetched.index.render_id(entry.id) else {
                    tracing::warn!(
                        category = %category,
                        achievement_id = entry.id,
                        "Daily achievement not returned by upstream"
                    );
                    continue;
                };
                dailies.category_mut(category).push(DailyAchievement {
                    achievement,
                    level: LevelCap {
                        min: entry.level.min,
                        max: entry.level.max,
                    },
                    required_access: entry.products(),
                });
            }
        }

        Ok(dailies)
    }
}
