//! Tyria Test Utilities
//!
//! Centralized test infrastructure for the Tyria workspace:
//! - Proptest generators for upstream achievement graphs
//! - Fixtures mirroring upstream JSON payloads
//! - A preloaded mock upstream
//! - Custom assertions for rendered achievement trees

// Re-export the mock upstream from its source crate
pub use tyria_core::MockSource;

// Re-export core types for convenience
pub use tyria_core::{
    Achievement, AchievementBit, CoreResult, Cursor, DailyAchievements,
    DailyCategory, Product, Resolver, UpstreamError, UpstreamSource, ACHIEVEMENTS_ENDPOINT,
    ACHIEVEMENT_GROUPS_ENDPOINT, DAILY_ENDPOINT, DAILY_TOMORROW_ENDPOINT, MASTERIES_ENDPOINT,
};

use serde_json::{json, Value};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for achievement graphs.

    use super::*;
    use proptest::prelude::*;

    /// Prerequisite lists of an acyclic graph of up to `max_nodes` nodes.
    ///
    /// Node `i` may only name nodes with a higher index as prerequisites.
    pub fn arb_acyclic_graph(max_nodes: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
        (1..=max_nodes).prop_flat_map(|size| {
            (0..size)
                .map(move |i| {
                    let later = (i + 1)..size;
                    prop::sample::subsequence(later.collect::<Vec<_>>(), 0..=(size - i - 1).min(3))
                })
                .collect::<Vec<_>>()
        })
    }

    /// Prerequisite lists of an arbitrary graph of up to `max_nodes` nodes; cycles and
    /// self references allowed.
    pub fn arb_cyclic_graph(max_nodes: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
        (1..=max_nodes).prop_flat_map(|size| {
            prop::collection::vec(prop::collection::vec(0..size, 0..=3), size)
        })
    }

    /// An upstream bit: text or one of the unmodeled kinds.
    pub fn arb_bit() -> impl Strategy<Value = Value> {
        prop_oneof![
            "[A-Za-z ]{1,24}".prop_map(|text| json!({"type": "Text", "text": text})),
            (prop::sample::select(vec!["Item", "Minipet", "Skin"]), 1u32..100_000)
                .prop_map(|(kind, id)| json!({"type": kind, "id": id})),
        ]
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Upstream payloads for common testing scenarios.

    use super::*;

    /// Id given to node `index` of a generated graph.
    pub fn node_id(index: usize) -> u32 {
        1000 + index as u32
    }

    /// A minimal upstream achievement record.
    pub fn achievement_record(id: u32, prerequisites: &[u32]) -> Value {
        json!({
            "id": id,
            "name": format!("Achievement {}", id),
            "description": format!("Description of {}", id),
            "requirement": format!("Complete objective {}", id),
            "locked_text": "",
            "flags": ["Permanent"],
            "tiers": [{"count": 1, "points": 5}, {"count": 5, "points": 10}],
            "prerequisites": prerequisites,
        })
    }

    /// Upstream records for a generated prerequisite graph.
    pub fn graph_records(graph: &[Vec<usize>]) -> Vec<Value> {
        graph
            .iter()
            .enumerate()
            .map(|(index, prerequisites)| {
                let ids: Vec<u32> = prerequisites.iter().map(|p| node_id(*p)).collect();
                achievement_record(node_id(index), &ids)
            })
            .collect()
    }

    /// Mock upstream serving a generated graph as the achievement collection.
    pub fn graph_source(graph: &[Vec<usize>]) -> MockSource {
        MockSource::new().with_collection(ACHIEVEMENTS_ENDPOINT, graph_records(graph))
    }

    pub fn daily_entry(id: u32, min: i32, max: i32, access: &[&str]) -> Value {
        json!({
            "id": id,
            "level": {"min": min, "max": max},
            "required_access": access,
        })
    }

    pub fn mastery_line_record(id: u32, name: &str, order: i32) -> Value {
        json!({
            "id": id,
            "name": name,
            "requirement": "Requires ownership of Heart of Thorns.",
            "order": order,
            "background": "https://render.guildwars2.com/file/mastery-bg.png",
            "region": "Maguuma",
            "levels": [
                {
                    "name": "Glide",
                    "description": "Learn to glide.",
                    "instruction": "Gain experience in Maguuma.",
                    "icon": "https://render.guildwars2.com/file/glide.png",
                    "point_cost": 1,
                    "exp_cost": 508000
                },
                {
                    "name": "Updraft Use",
                    "description": "Ride updrafts.",
                    "instruction": "Gain experience in Maguuma.",
                    "icon": "https://render.guildwars2.com/file/updraft.png",
                    "point_cost": 2,
                    "exp_cost": 1016000
                }
            ]
        })
    }

    pub const GROUP_HEART_OF_THORNS: &str = "65B4B678-607E-4D97-B458-076C3E96A810";
    pub const GROUP_STORY: &str = "A4ED8379-5B6B-4ECC-B6E1-70C350C902D2";

    pub fn group_records() -> Vec<Value> {
        vec![
            json!({
                "id": GROUP_HEART_OF_THORNS,
                "name": "Heart of Thorns",
                "description": "Achievements related to Heart of Thorns.",
                "order": 5,
                "categories": [137, 138, 139]
            }),
            json!({
                "id": GROUP_STORY,
                "name": "Story Journal",
                "description": "",
                "order": 1,
                "categories": [199]
            }),
        ]
    }

    /// A small but complete upstream: a three-level prerequisite chain, daily
    /// rotations for today and tomorrow, two mastery lines and two groups.
    ///
    /// Achievements: 1 <- 2 <- 3 (3 requires 2 requires 1), 4 and 5 standalone,
    /// 5 carrying one text and one item bit.
    pub fn gw2_source() -> MockSource {
        let mut bits_record = achievement_record(5, &[]);
        bits_record["bits"] = json!([
            {"type": "Text", "text": "Defeat the Shatterer"},
            {"type": "Item", "id": 46742}
        ]);
        bits_record["point_cap"] = json!(500);

        MockSource::new()
            .with_collection(
                ACHIEVEMENTS_ENDPOINT,
                vec![
                    achievement_record(1, &[]),
                    achievement_record(2, &[1]),
                    achievement_record(3, &[2]),
                    achievement_record(4, &[]),
                    bits_record,
                ],
            )
            .with_response(
                DAILY_ENDPOINT,
                json!({
                    "pve": [daily_entry(3, 1, 80, &["GuildWars2"])],
                    "pvp": [daily_entry(4, 1, 80, &["GuildWars2"])],
                    "wvw": [],
                    "fractals": [daily_entry(5, 80, 80, &["GuildWars2", "HeartOfThorns"])],
                    "special": []
                }),
            )
            .with_response(
                DAILY_TOMORROW_ENDPOINT,
                json!({
                    "pve": [daily_entry(4, 1, 80, &["GuildWars2"])],
                    "pvp": [],
                    "wvw": [daily_entry(2, 11, 80, &["PathOfFire"])],
                    "fractals": [],
                    "special": []
                }),
            )
            .with_collection(
                MASTERIES_ENDPOINT,
                vec![
                    mastery_line_record(1, "Exalted Lore", 0),
                    mastery_line_record(2, "Itzel Lore", 1),
                ],
            )
            .with_collection(ACHIEVEMENT_GROUPS_ENDPOINT, group_records())
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over rendered achievement trees.

    use super::*;

    /// Assert that every node of `achievement` carries exactly the
    /// prerequisites `graph` names for it, minus back-references into the
    /// chain being walked.
    #[track_caller]
    pub fn assert_fully_resolved(achievement: &Achievement, graph: &[Vec<usize>]) {
        let mut path = Vec::new();
        check_node(achievement, graph, &mut path);
    }

    #[track_caller]
    fn check_node(achievement: &Achievement, graph: &[Vec<usize>], path: &mut Vec<u32>) {
        let index = (achievement.id - fixtures::node_id(0)) as usize;
        path.push(achievement.id);

        let expected: Vec<u32> = graph[index]
            .iter()
            .map(|p| fixtures::node_id(*p))
            .filter(|id| !path.contains(id))
            .collect();
        let actual: Vec<u32> = achievement.prerequisites.iter().map(|p| p.id).collect();
        assert_eq!(
            actual, expected,
            "prerequisites of {} are not fully resolved",
            achievement.id
        );

        for prerequisite in &achievement.prerequisites {
            check_node(prerequisite, graph, path);
        }
        path.pop();
    }
}
