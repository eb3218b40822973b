//! GraphQL API Routes
//!
//! This module implements the gateway's GraphQL endpoint using async-graphql.
//! Every field is read-only and resolved against the upstream through the
//! shared [`Resolver`].
//!
//! Endpoints:
//! - POST /graphql - Execute GraphQL queries
//! - GET /graphql/playground - GraphiQL playground
//! - GET /graphql/ws - GraphQL over WebSocket

use async_graphql::{
    Context, EmptyMutation, EmptySubscription, Enum, ErrorExtensions, InputObject, Object,
    Result as GqlResult, Schema, SchemaBuilder, SimpleObject, Union,
};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse, GraphQLSubscription};
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use tyria_core::{
    Achievement, AchievementBit, AchievementFlag, AchievementGroup, AchievementTier, Cursor,
    DailyAchievement, DailyAchievements, LevelCap, Mastery, MasteryLine, Product, Resolver,
    UpstreamError, DEFAULT_BATCH_MAX,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

// ============================================================================
// GRAPHQL TYPES
// ============================================================================

/// GraphQL representation of AchievementFlag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(name = "AchievementFlag")]
pub enum GqlAchievementFlag {
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

impl From<AchievementFlag> for GqlAchievementFlag {
    fn from(flag: AchievementFlag) -> Self {
        match flag {
            AchievementFlag::Pvp => GqlAchievementFlag::Pvp,
            AchievementFlag::CategoryDisplay => GqlAchievementFlag::CategoryDisplay,
            AchievementFlag::MoveToTop => GqlAchievementFlag::MoveToTop,
            AchievementFlag::IgnoreNearlyComplete => GqlAchievementFlag::IgnoreNearlyComplete,
            AchievementFlag::Repeatable => GqlAchievementFlag::Repeatable,
            AchievementFlag::Hidden => GqlAchievementFlag::Hidden,
            AchievementFlag::RequiresUnlock => GqlAchievementFlag::RequiresUnlock,
            AchievementFlag::RepairOnLogin => GqlAchievementFlag::RepairOnLogin,
            AchievementFlag::Daily => GqlAchievementFlag::Daily,
            AchievementFlag::Weekly => GqlAchievementFlag::Weekly,
            AchievementFlag::Monthly => GqlAchievementFlag::Monthly,
            AchievementFlag::Permanent => GqlAchievementFlag::Permanent,
        }
    }
}

/// GraphQL representation of Product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(name = "Product")]
pub enum GqlProduct {
    #[graphql(name = "GUILD_WARS_2")]
    GuildWars2,
    HeartOfThorns,
    PathOfFire,
}

impl From<Product> for GqlProduct {
    fn from(product: Product) -> Self {
        match product {
            Product::GuildWars2 => GqlProduct::GuildWars2,
            Product::HeartOfThorns => GqlProduct::HeartOfThorns,
            Product::PathOfFire => GqlProduct::PathOfFire,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "AchievementTier")]
pub struct GqlAchievementTier {
    pub count: i32,
    pub points: i32,
}

impl From<AchievementTier> for GqlAchievementTier {
    fn from(tier: AchievementTier) -> Self {
        Self {
            count: tier.count,
            points: tier.points,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "AchievementTextBit")]
pub struct GqlAchievementTextBit {
    pub text: String,
}

/// Placeholder for bit kinds the gateway does not model.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "AchievementBitNotImplemented")]
pub struct GqlAchievementBitNotImplemented {
    pub msg: String,
}

#[derive(Debug, Clone, Union)]
#[graphql(name = "AchievementBit")]
pub enum GqlAchievementBit {
    Text(GqlAchievementTextBit),
    NotImplemented(GqlAchievementBitNotImplemented),
}

impl From<AchievementBit> for GqlAchievementBit {
    fn from(bit: AchievementBit) -> Self {
        match bit {
            AchievementBit::Text { text } => GqlAchievementBit::Text(GqlAchievementTextBit { text }),
            AchievementBit::NotImplemented { msg } => {
                GqlAchievementBit::NotImplemented(GqlAchievementBitNotImplemented { msg })
            }
        }
    }
}

/// GraphQL representation of an achievement with its prerequisite chain
/// nested inline.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Achievement")]
pub struct GqlAchievement {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub requirement: String,
    pub locked_text: String,
    pub flags: Vec<GqlAchievementFlag>,
    pub tiers: Vec<GqlAchievementTier>,
    pub prerequisites: Vec<GqlAchievement>,
    pub bits: Vec<GqlAchievementBit>,
    pub point_cap: Option<i32>,
}

impl From<Achievement> for GqlAchievement {
    fn from(achievement: Achievement) -> Self {
        Self {
            id: achievement.id,
            name: achievement.name,
            description: achievement.description,
            requirement: achievement.requirement,
            locked_text: achievement.locked_text,
            flags: achievement.flags.into_iter().map(Into::into).collect(),
            tiers: achievement.tiers.into_iter().map(Into::into).collect(),
            prerequisites: achievement.prerequisites.into_iter().map(Into::into).collect(),
            bits: achievement.bits.into_iter().map(Into::into).collect(),
            point_cap: achievement.point_cap,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "LevelCap")]
pub struct GqlLevelCap {
    pub min: i32,
    pub max: i32,
}

impl From<LevelCap> for GqlLevelCap {
    fn from(level: LevelCap) -> Self {
        Self {
            min: level.min,
            max: level.max,
        }
    }
}

/// An achievement as featured in a daily rotation: every achievement field
/// plus the rotation's level range and product gates.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "DailyAchievement")]
pub struct GqlDailyAchievement {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub requirement: String,
    pub locked_text: String,
    pub flags: Vec<GqlAchievementFlag>,
    pub tiers: Vec<GqlAchievementTier>,
    pub prerequisites: Vec<GqlAchievement>,
    pub bits: Vec<GqlAchievementBit>,
    pub point_cap: Option<i32>,
    pub level: GqlLevelCap,
    pub required_access: Vec<GqlProduct>,
}

impl From<DailyAchievement> for GqlDailyAchievement {
    fn from(daily: DailyAchievement) -> Self {
        let achievement = GqlAchievement::from(daily.achievement);
        Self {
            id: achievement.id,
            name: achievement.name,
            description: achievement.description,
            requirement: achievement.requirement,
            locked_text: achievement.locked_text,
            flags: achievement.flags,
            tiers: achievement.tiers,
            prerequisites: achievement.prerequisites,
            bits: achievement.bits,
            point_cap: achievement.point_cap,
            level: daily.level.into(),
            required_access: daily.required_access.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "DailyAchievements")]
pub struct GqlDailyAchievements {
    pub pve: Vec<GqlDailyAchievement>,
    pub pvp: Vec<GqlDailyAchievement>,
    pub wvw: Vec<GqlDailyAchievement>,
    pub fractals: Vec<GqlDailyAchievement>,
    pub special: Vec<GqlDailyAchievement>,
}

impl From<DailyAchievements> for GqlDailyAchievements {
    fn from(dailies: DailyAchievements) -> Self {
        fn convert(list: Vec<DailyAchievement>) -> Vec<GqlDailyAchievement> {
            list.into_iter().map(Into::into).collect()
        }

        Self {
            pve: convert(dailies.pve),
            pvp: convert(dailies.pvp),
            wvw: convert(dailies.wvw),
            fractals: convert(dailies.fractals),
            special: convert(dailies.special),
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Mastery")]
pub struct GqlMastery {
    pub name: String,
    pub description: String,
    pub instruction: String,
    pub icon: String,
    pub point_cost: i32,
    pub exp_cost: i64,
}

impl From<Mastery> for GqlMastery {
    fn from(mastery: Mastery) -> Self {
        Self {
            name: mastery.name,
            description: mastery.description,
            instruction: mastery.instruction,
            icon: mastery.icon,
            point_cost: mastery.point_cost,
            exp_cost: mastery.exp_cost,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "MasteryLine")]
pub struct GqlMasteryLine {
    pub id: u32,
    pub name: String,
    pub requirement: String,
    pub order: i32,
    pub region: String,
    pub background: String,
    pub masteries: Vec<GqlMastery>,
}

impl From<MasteryLine> for GqlMasteryLine {
    fn from(line: MasteryLine) -> Self {
        Self {
            id: line.id,
            name: line.name,
            requirement: line.requirement,
            order: line.order,
            region: line.region,
            background: line.background,
            masteries: line.masteries.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "AchievementGroup")]
pub struct GqlAchievementGroup {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub order: i32,
    pub categories: Vec<u32>,
}

impl From<AchievementGroup> for GqlAchievementGroup {
    fn from(group: AchievementGroup) -> Self {
        Self {
            id: group.id,
            name: group.name,
            description: group.description,
            order: group.order,
            categories: group.categories,
        }
    }
}

// ============================================================================
// INPUT TYPES
// ============================================================================

/// Window over the requested achievement ids.
#[derive(Debug, Clone, Copy, InputObject)]
#[graphql(name = "Cursor")]
pub struct GqlCursor {
    pub offset: i32,
    /// Capped to 200 by default. Higher values will be ignored.
    #[graphql(default = 200)]
    pub max: i32,
}

impl GqlCursor {
    /// Convert to the core cursor, rejecting negative bounds.
    pub fn to_cursor(self) -> Result<Cursor, ApiError> {
        let offset = usize::try_from(self.offset)
            .map_err(|_| ApiError::invalid_range("cursor.offset", 0, i32::MAX))?;
        let max = usize::try_from(self.max)
            .map_err(|_| ApiError::invalid_range("cursor.max", 0, i32::MAX))?;
        Ok(Cursor::new(offset, max))
    }
}

// ============================================================================
// QUERY ROOT
// ============================================================================

fn upstream_error(err: UpstreamError) -> async_graphql::Error {
    ApiError::from(err).extend()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Every achievement id known upstream.
    async fn achievement_ids(&self, ctx: &Context<'_>) -> GqlResult<Vec<u32>> {
        let resolver = ctx.data::<Resolver>()?;
        resolver.achievement_ids().await.map_err(upstream_error)
    }

    /// Achievements with their prerequisite chains resolved. Without ids the
    /// whole catalog is windowed by `cursor`.
    async fn achievement(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] ids: Vec<u32>,
        cursor: Option<GqlCursor>,
    ) -> GqlResult<Vec<GqlAchievement>> {
        let resolver = ctx.data::<Resolver>()?;
        let cursor = match cursor {
            Some(cursor) => cursor.to_cursor().map_err(|e| e.extend())?,
            None => Cursor::new(0, DEFAULT_BATCH_MAX),
        };

        tracing::debug!(
            requested = ids.len(),
            offset = cursor.offset,
            max = cursor.max,
            "Resolving achievements"
        );
        let achievements = resolver
            .achievements(&ids, cursor)
            .await
            .map_err(upstream_error)?;
        Ok(achievements.into_iter().map(Into::into).collect())
    }

    /// Every mastery line id known upstream.
    async fn mastery_line_ids(&self, ctx: &Context<'_>) -> GqlResult<Vec<u32>> {
        let resolver = ctx.data::<Resolver>()?;
        resolver.mastery_line_ids().await.map_err(upstream_error)
    }

    async fn mastery_line(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] ids: Vec<u32>,
    ) -> GqlResult<Vec<GqlMasteryLine>> {
        let resolver = ctx.data::<Resolver>()?;
        let lines = resolver.mastery_lines(&ids).await.map_err(upstream_error)?;
        Ok(lines.into_iter().map(Into::into).collect())
    }

    /// Today's daily achievements, or tomorrow's.
    async fn daily_achievements(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] tomorrow: bool,
    ) -> GqlResult<GqlDailyAchievements> {
        let resolver = ctx.data::<Resolver>()?;
        let dailies = resolver
            .daily_achievements(tomorrow)
            .await
            .map_err(upstream_error)?;
        Ok(dailies.into())
    }

    /// Every achievement group id known upstream.
    async fn achievement_group_ids(&self, ctx: &Context<'_>) -> GqlResult<Vec<Uuid>> {
        let resolver = ctx.data::<Resolver>()?;
        resolver.achievement_group_ids().await.map_err(upstream_error)
    }

    async fn achievement_group(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] ids: Vec<Uuid>,
    ) -> GqlResult<Vec<GqlAchievementGroup>> {
        let resolver = ctx.data::<Resolver>()?;
        let groups = resolver
            .achievement_groups(&ids)
            .await
            .map_err(upstream_error)?;
        Ok(groups.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// SCHEMA & HANDLERS
// ============================================================================

/// The GraphQL schema type.
pub type TyriaSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Schema builder without any context data; enough to export the SDL.
pub fn schema_builder() -> SchemaBuilder<QueryRoot, EmptyMutation, EmptySubscription> {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
}

/// Create the GraphQL schema.
pub fn create_schema(resolver: Resolver) -> TyriaSchema {
    schema_builder().data(resolver).finish()
}

/// Handler for GraphQL requests.
pub async fn graphql_handler(
    State(schema): State<TyriaSchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

/// Handler for GraphiQL playground.
pub async fn graphiql_handler() -> impl IntoResponse {
    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .subscription_endpoint("/graphql/ws")
            .finish(),
    )
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the GraphQL routes router.
pub fn create_router(schema: TyriaSchema) -> Router<AppState> {
    Router::new()
        .route("/", post(graphql_handler))
        .route("/playground", get(graphiql_handler))
        .route_service("/ws", GraphQLSubscription::new(schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tyria_core::{MockSource, ACHIEVEMENTS_ENDPOINT};

    #[test]
    fn test_gql_bit_conversion() {
        let text: GqlAchievementBit = AchievementBit::Text {
            text: "Visit the vista".to_string(),
        }
        .into();
        assert!(matches!(text, GqlAchievementBit::Text(ref bit) if bit.text == "Visit the vista"));

        let other: GqlAchievementBit = AchievementBit::not_implemented().into();
        assert!(matches!(other, GqlAchievementBit::NotImplemented(ref bit) if bit.msg == "nope"));
    }

    #[test]
    fn test_gql_product_conversion() {
        assert_eq!(GqlProduct::from(Product::GuildWars2), GqlProduct::GuildWars2);
        assert_eq!(GqlProduct::from(Product::PathOfFire), GqlProduct::PathOfFire);
    }

    #[test]
    fn test_cursor_rejects_negative_bounds() {
        let cursor = GqlCursor { offset: -1, max: 10 };
        assert!(cursor.to_cursor().is_err());

        let cursor = GqlCursor { offset: 0, max: -5 };
        assert!(cursor.to_cursor().is_err());

        let cursor = GqlCursor { offset: 3, max: 10 };
        assert_eq!(cursor.to_cursor().ok(), Some(Cursor::new(3, 10)));
    }

    #[test]
    fn test_sdl_exposes_query_fields() {
        let sdl = schema_builder().finish().sdl();
        for field in [
            "achievementIds: [Int!]!",
            "masteryLineIds: [Int!]!",
            "dailyAchievements(",
            "achievementGroupIds: [UUID!]!",
            "union AchievementBit = AchievementTextBit | AchievementBitNotImplemented",
            "GUILD_WARS_2",
            "CATEGORY_DISPLAY",
        ] {
            assert!(sdl.contains(field), "SDL is missing `{}`:\n{}", field, sdl);
        }
    }

    #[tokio::test]
    async fn test_nested_prerequisites_query() {
        let source = MockSource::new().with_collection(
            ACHIEVEMENTS_ENDPOINT,
            vec![
                serde_json::json!({"id": 1, "name": "Root", "prerequisites": [2]}),
                serde_json::json!({"id": 2, "name": "Leaf", "bits": [{"type": "Item", "id": 7}]}),
            ],
        );
        let schema = create_schema(Resolver::new(Arc::new(source)));

        let response = schema
            .execute(
                r#"{ achievement(ids: [1]) {
                    id name
                    prerequisites { id name bits { ... on AchievementBitNotImplemented { msg } } }
                } }"#,
            )
            .await;

        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().expect("data is JSON");
        assert_eq!(
            data,
            serde_json::json!({
                "achievement": [{
                    "id": 1,
                    "name": "Root",
                    "prerequisites": [{"id": 2, "name": "Leaf", "bits": [{"msg": "nope"}]}]
                }]
            })
        );
    }
}
