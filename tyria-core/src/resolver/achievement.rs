//! Achievement resolution: batched closure fetch, then render

use std::collections::HashSet;

use super::render::AchievementIndex;
use super::Resolver;
use crate::cursor::Cursor;
use crate::entities::Achievement;
use crate::error::CoreResult;
use crate::raw::RawAchievement;
use crate::source::{fetch_as, fetch_batch};

/// Upstream endpoint of the achievement catalog and batches.
pub const ACHIEVEMENTS_ENDPOINT: &str = "achievements";

/// Outcome of the fetch pass: the records requested at the root, and an index
/// over everything fetched, prerequisites included.
#[derive(Debug, Clone, Default)]
pub struct FetchedAchievements {
    pub roots: Vec<RawAchievement>,
    pub index: AchievementIndex,
}

impl FetchedAchievements {
    /// Render every root record, in upstream order.
    pub fn render_roots(&self) -> Vec<Achievement> {
        self.roots.iter().map(|raw| self.index.render(raw)).collect()
    }
}

impl Resolver {
    /// Every achievement id the upstream knows.
    pub async fn achievement_ids(&self) -> CoreResult<Vec<u32>> {
        fetch_as(self.source(), ACHIEVEMENTS_ENDPOINT).await
    }

    /// Resolve `ids` (the whole catalog when empty) into rendered achievements
    /// with their prerequisite chains nested inline.
    pub async fn achievements(&self, ids: &[u32], cursor: Cursor) -> CoreResult<Vec<Achievement>> {
        let fetched = self.fetch_achievement_closure(ids, cursor).await?;
        Ok(fetched.render_roots())
    }

    /// Fetch the requested achievements and, level by level, every
    /// achievement they transitively name as a prerequisite.
    ///
    /// Each id is requested at most once per call, so the loop ends even when
    /// the upstream graph contains cycles. Only the root set is sliced by the
    /// cursor.
    pub async fn fetch_achievement_closure(
        &self,
        ids: &[u32],
        cursor: Cursor,
    ) -> CoreResult<FetchedAchievements> {
        let ids = if ids.is_empty() {
            self.achievement_ids().await?
        } else {
            ids.to_vec()
        };
        let ids = cursor.apply(ids);

        let roots: Vec<RawAchievement> =
            fetch_batch(self.source(), ACHIEVEMENTS_ENDPOINT, &ids).await?;

        let mut seen: HashSet<u32> = ids.iter().copied().collect();
        seen.extend(roots.iter().map(|r| r.id));

        let mut linked = Vec::new();
        let mut frontier = unseen_prerequisites(&roots, &mut seen);
        let mut depth = 1usize;
        while !frontier.is_empty() {
            tracing::debug!(
                depth,
                count = frontier.len(),
                "Fetching prerequisite achievements"
            );
            let batch: Vec<RawAchievement> =
                fetch_batch(self.source(), ACHIEVEMENTS_ENDPOINT, &frontier).await?;
            frontier = unseen_prerequisites(&batch, &mut seen);
            linked.extend(batch);
            depth += 1;
        }

        let index = AchievementIndex::new(roots.iter().cloned().chain(linked));
        tracing::debug!(
            roots = roots.len(),
            fetched = index.len(),
            "Achievement closure fetched"
        );

        Ok(FetchedAchievements { roots, index })
    }
}

/// Prerequisite ids named by `records` that are not in `seen` yet, in first
/// mention order. Marks them seen.
fn unseen_prerequisites(records: &[RawAchievement], seen: &mut HashSet<u32>) -> Vec<u32> {
    records
        .iter()
        .flat_map(|record| record.prerequisites.iter().copied())
        .filter(|id| seen.insert(*id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockSource;
    use crate::{AchievementBit, UpstreamError};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn record(id: u32, prerequisites: &[u32]) -> Value {
        json!({
            "id": id,
            "name": format!("Achievement {}", id),
            "description": "",
            "requirement": format!("Complete step {}", id),
            "locked_text": "",
            "flags": ["Permanent"],
            "tiers": [{"count": 1, "points": 5}],
            "prerequisites": prerequisites,
        })
    }

    fn resolver_with(records: Vec<Value>) -> (Resolver, Arc<MockSource>) {
        let source = Arc::new(MockSource::new().with_collection(ACHIEVEMENTS_ENDPOINT, records));
        (Resolver::new(source.clone()), source)
    }

    #[tokio::test]
    async fn test_achievement_without_prerequisites() -> CoreResult<()> {
        let (resolver, source) = resolver_with(vec![record(1, &[])]);

        let achievements = resolver.achievements(&[1], Cursor::default()).await?;

        assert_eq!(achievements.len(), 1);
        assert_eq!(achievements[0].requirement, "Complete step 1");
        assert!(achievements[0].prerequisites.is_empty());
        assert_eq!(source.requests(), vec!["achievements?ids=1".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_prerequisite_chain_is_resolved_level_by_level() -> CoreResult<()> {
        let (resolver, source) = resolver_with(vec![
            record(1, &[2]),
            record(2, &[3, 4]),
            record(3, &[]),
            record(4, &[3]),
        ]);

        let achievements = resolver.achievements(&[1], Cursor::default()).await?;

        assert_eq!(achievements.len(), 1);
        let root = &achievements[0];
        assert_eq!(root.prerequisites[0].id, 2);
        let second: Vec<u32> = root.prerequisites[0].prerequisites.iter().map(|a| a.id).collect();
        assert_eq!(second, vec![3, 4]);
        assert_eq!(root.prerequisites[0].prerequisites[1].prerequisites[0].id, 3);
        assert_eq!(
            source.requests(),
            vec![
                "achievements?ids=1".to_string(),
                "achievements?ids=2".to_string(),
                "achievements?ids=3,4".to_string(),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_only_requested_records_are_returned() -> CoreResult<()> {
        let (resolver, _) = resolver_with(vec![record(1, &[2]), record(2, &[])]);

        let achievements = resolver.achievements(&[1], Cursor::default()).await?;

        let ids: Vec<u32> = achievements.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1]);
        Ok(())
    }

    #[tokio::test]
    async fn test_cursor_slices_explicit_ids() -> CoreResult<()> {
        let (resolver, source) = resolver_with(vec![record(1, &[]), record(2, &[])]);

        let sliced = resolver.achievements(&[1, 2], Cursor::new(0, 1)).await?;
        let single = resolver.achievements(&[1], Cursor::default()).await?;

        assert_eq!(sliced, single);
        assert_eq!(source.requests()[0], "achievements?ids=1");
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_ids_use_catalog() -> CoreResult<()> {
        let (resolver, source) = resolver_with(vec![record(7, &[]), record(8, &[7])]);

        let achievements = resolver.achievements(&[], Cursor::default()).await?;

        let ids: Vec<u32> = achievements.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![7, 8]);
        assert_eq!(achievements[1].prerequisites[0].id, 7);
        // The prerequisite was already fetched as a root.
        assert_eq!(
            source.requests(),
            vec!["achievements".to_string(), "achievements?ids=7,8".to_string()]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_ids_yield_empty_result() -> CoreResult<()> {
        let source = Arc::new(MockSource::new().with_response(
            "achievements?ids=999",
            json!({"text": "all ids provided are invalid"}),
        ));
        let resolver = Resolver::new(source);

        let achievements = resolver.achievements(&[999], Cursor::default()).await?;

        assert!(achievements.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_cycle_terminates_and_fetches_each_id_once() -> CoreResult<()> {
        let (resolver, source) = resolver_with(vec![
            record(1, &[2]),
            record(2, &[3]),
            record(3, &[1]),
        ]);

        let achievements = resolver.achievements(&[1], Cursor::default()).await?;

        assert_eq!(source.request_count(), 3);
        assert_eq!(achievements[0].depth(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_bits_are_rendered() -> CoreResult<()> {
        let mut raw = record(5, &[]);
        raw["bits"] = json!([
            {"type": "Text", "text": "Visit the vista"},
            {"type": "Minipet", "id": 12}
        ]);
        let (resolver, _) = resolver_with(vec![raw]);

        let achievements = resolver.achievements(&[5], Cursor::default()).await?;

        assert_eq!(
            achievements[0].bits,
            vec![
                AchievementBit::Text {
                    text: "Visit the vista".to_string()
                },
                AchievementBit::not_implemented(),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_prerequisite_batch_fails_resolution() {
        let source = Arc::new(
            MockSource::new().with_response("achievements?ids=1", json!([record(1, &[2])])),
        );
        let resolver = Resolver::new(source);

        let result = resolver.achievements(&[1], Cursor::default()).await;

        match result {
            Err(UpstreamError::Transport { endpoint, .. }) => assert_eq!(endpoint, "achievements?ids=2"),
            other => panic!("expected transport error, got {:?}", other),
        }
    }
}
