//! Top-down render pass from raw records to nested output records

use std::collections::HashMap;

use crate::entities::{Achievement, AchievementBit, AchievementTier};
use crate::raw::{RawAchievement, RawBit, RawTier};

/// Lookup from achievement id to raw record across everything fetched for
/// one resolution.
#[derive(Debug, Clone, Default)]
pub struct AchievementIndex {
    records: HashMap<u32, RawAchievement>,
}

impl AchievementIndex {
    pub fn new(records: impl IntoIterator<Item = RawAchievement>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    pub fn get(&self, id: u32) -> Option<&RawAchievement> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Render the indexed achievement `id`, if the upstream returned it.
    pub fn render_id(&self, id: u32) -> Option<Achievement> {
        self.get(id).map(|raw| self.render(raw))
    }

    /// Render `raw` with its prerequisite chain resolved from this index.
    ///
    /// Prerequisites missing from the index, or that would re-enter the chain
    /// currently being rendered, are left out. Shared prerequisites are copied
    /// under every parent, so output grows with the number of distinct chains.
    /// Rendering stops adding prerequisites once [`MAX_RENDERED_NODES`] records
    /// have been emitted for this root.
    pub fn render(&self, raw: &RawAchievement) -> Achievement {
        RenderPass::new(self, MAX_RENDERED_NODES).visit(raw)
    }
}

/// Upper bound on records emitted when rendering one root achievement.
pub const MAX_RENDERED_NODES: usize = 10_000;

/// Depth-first walk over one root's prerequisite graph.
struct RenderPass<'a> {
    index: &'a AchievementIndex,
    path: Vec<u32>,
    remaining: usize,
    truncated: bool,
}

impl<'a> RenderPass<'a> {
    fn new(index: &'a AchievementIndex, budget: usize) -> Self {
        Self {
            index,
            path: Vec::new(),
            remaining: budget,
            truncated: false,
        }
    }

    fn visit(&mut self, raw: &RawAchievement) -> Achievement {
        self.remaining = self.remaining.saturating_sub(1);
        self.path.push(raw.id);

        let mut prerequisites = Vec::with_capacity(raw.prerequisites.len());
        for &id in &raw.prerequisites {
            if self.remaining == 0 {
                if !self.truncated {
                    tracing::warn!(
                        root_id = self.path.first().copied().unwrap_or(raw.id),
                        achievement_id = raw.id,
                        max_nodes = MAX_RENDERED_NODES,
                        "Render budget exhausted, truncating prerequisite chain"
                    );
                    self.truncated = true;
                }
                break;
            }
            if self.path.contains(&id) {
                tracing::warn!(
                    achievement_id = raw.id,
                    prerequisite_id = id,
                    "Prerequisite cycle detected, dropping back-reference"
                );
                continue;
            }
            match self.index.get(id) {
                Some(prerequisite) => prerequisites.push(self.visit(prerequisite)),
                None => tracing::warn!(
                    achievement_id = raw.id,
                    prerequisite_id = id,
                    "Prerequisite not returned by upstream"
                ),
            }
        }

        self.path.pop();

        Achievement {
            id: raw.id,
            name: raw.name.clone(),
            description: raw.description.clone(),
            requirement: raw.requirement.clone(),
            locked_text: raw.locked_text.clone(),
            flags: raw.flags.clone(),
            tiers: raw.tiers.iter().map(render_tier).collect(),
            prerequisites,
            bits: raw.bits.iter().map(render_bit).collect(),
            point_cap: raw.point_cap,
        }
    }
}

pub fn render_tier(tier: &RawTier) -> AchievementTier {
    AchievementTier {
        count: tier.count,
        points: tier.points,
    }
}

/// `Text` bits keep their text; every other kind becomes the placeholder.
pub fn render_bit(bit: &RawBit) -> AchievementBit {
    if bit.is_text() {
        AchievementBit::Text {
            text: bit.text.clone().unwrap_or_default(),
        }
    } else {
        AchievementBit::not_implemented()
    }
}
