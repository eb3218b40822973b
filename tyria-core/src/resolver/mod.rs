//! Resolvers over the upstream API
//!
//! A [`Resolver`] owns nothing but a handle to the upstream source. Every
//! resolution builds its own working set and lookup map, so one resolver can
//! serve any number of concurrent queries.

mod achievement;
mod daily;
mod group;
mod mastery;
mod render;

use std::sync::Arc;

use crate::source::UpstreamSource;

pub use achievement::{FetchedAchievements, ACHIEVEMENTS_ENDPOINT};
pub use daily::{daily_endpoint, DAILY_ENDPOINT, DAILY_TOMORROW_ENDPOINT};
pub use group::ACHIEVEMENT_GROUPS_ENDPOINT;
pub use mastery::MASTERIES_ENDPOINT;
pub use render::{render_bit, render_tier, AchievementIndex, MAX_RENDERED_NODES};

/// Entry point for every query against the upstream.
#[derive(Clone)]
pub struct Resolver {
    source: Arc<dyn UpstreamSource>,
}

impl Resolver {
    pub fn new(source: Arc<dyn UpstreamSource>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &dyn UpstreamSource {
        self.source.as_ref()
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}
