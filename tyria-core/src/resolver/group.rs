//! Achievement group resolution

use uuid::Uuid;

use super::Resolver;
use crate::entities::AchievementGroup;
use crate::error::CoreResult;
use crate::raw::RawAchievementGroup;
use crate::source::{fetch_as, fetch_batch};

pub const ACHIEVEMENT_GROUPS_ENDPOINT: &str = "achievements/groups";

impl Resolver {
    pub async fn achievement_group_ids(&self) -> CoreResult<Vec<Uuid>> {
        fetch_as(self.source(), ACHIEVEMENT_GROUPS_ENDPOINT).await
    }

    /// Resolve `ids` (every group when empty) in one batch.
    pub async fn achievement_groups(&self, ids: &[Uuid]) -> CoreResult<Vec<AchievementGroup>> {
        let ids = if ids.is_empty() {
            self.achievement_group_ids().await?
        } else {
            ids.to_vec()
        };

        // The upstream spells group ids in upper case.
        let keys: Vec<String> = ids.iter().map(|id| id.to_string().to_uppercase()).collect();
        let groups: Vec<RawAchievementGroup> =
            fetch_batch(self.source(), ACHIEVEMENT_GROUPS_ENDPOINT, &keys).await?;

        Ok(groups
            .into_iter()
            .map(|group| AchievementGroup {
                id: group.id,
                name: group.name,
                description: group.description,
                order: group.order,
                categories: group.categories,
            })
            .collect())
    }
}
