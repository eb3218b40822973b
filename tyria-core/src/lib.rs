//! Tyria Core - Achievement Graph Resolution
//!
//! Fetches achievements, daily rotations, mastery lines and achievement
//! groups from the Guild Wars 2 REST API through an [`UpstreamSource`], and
//! renders them into records whose prerequisite chains are nested inline.
//!
//! This crate holds no HTTP client and no server: the upstream is reached only
//! through the [`UpstreamSource`] trait.

pub mod cursor;
pub mod entities;
pub mod enums;
pub mod error;
pub mod raw;
pub mod resolver;
pub mod source;

pub use cursor::{Cursor, DEFAULT_BATCH_MAX};
pub use entities::{
    Achievement, AchievementBit, AchievementGroup, AchievementTier, DailyAchievement,
    DailyAchievements, LevelCap, Mastery, MasteryLine, NOT_IMPLEMENTED_MARKER,
};
pub use enums::{AchievementFlag, DailyCategory, Product};
pub use error::{CoreResult, UpstreamError};
pub use resolver::{
    daily_endpoint, AchievementIndex, FetchedAchievements, Resolver, ACHIEVEMENTS_ENDPOINT,
    ACHIEVEMENT_GROUPS_ENDPOINT, DAILY_ENDPOINT, DAILY_TOMORROW_ENDPOINT, MASTERIES_ENDPOINT,
};
pub use source::{ids_endpoint, is_invalid_ids_response, MockSource, UpstreamSource, INVALID_IDS_TEXT};
