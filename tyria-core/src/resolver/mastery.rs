//! Mastery line resolution

use super::Resolver;
use crate::entities::{Mastery, MasteryLine};
use crate::error::CoreResult;
use crate::raw::{RawMastery, RawMasteryLine};
use crate::source::{fetch_as, fetch_batch};

pub const MASTERIES_ENDPOINT: &str = "masteries";

impl Resolver {
    pub async fn mastery_line_ids(&self) -> CoreResult<Vec<u32>> {
        fetch_as(self.source(), MASTERIES_ENDPOINT).await
    }

    /// Resolve `ids` (every line when empty) in one batch.
    pub async fn mastery_lines(&self, ids: &[u32]) -> CoreResult<Vec<MasteryLine>> {
        let ids = if ids.is_empty() {
            self.mastery_line_ids().await?
        } else {
            ids.to_vec()
        };

        let lines: Vec<RawMasteryLine> = fetch_batch(self.source(), MASTERIES_ENDPOINT, &ids).await?;
        Ok(lines.into_iter().map(render_mastery_line).collect())
    }
}

fn render_mastery_line(line: RawMasteryLine) -> MasteryLine {
    MasteryLine {
        id: line.id,
        name: line.name,
        requirement: line.requirement,
        order: line.order,
        region: line.region,
        background: line.background,
        masteries: line.levels.into_iter().map(render_mastery).collect(),
    }
}

fn render_mastery(mastery: RawMastery) -> Mastery {
    Mastery {
        name: mastery.name,
        description: mastery.description,
        instruction: mastery.instruction,
        icon: mastery.icon,
        point_cost: mastery.point_cost,
        exp_cost: mastery.exp_cost,
    }
}
