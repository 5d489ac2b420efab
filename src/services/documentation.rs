use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the scoreboard backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::teams::create_team,
        crate::routes::teams::list_teams,
        crate::routes::teams::get_team,
        crate::routes::teams::update_team,
        crate::routes::teams::delete_team,
        crate::routes::teams::reset_stats,
        crate::routes::teams::team_matches,
        crate::routes::matches::create_match,
        crate::routes::matches::list_matches,
        crate::routes::matches::get_match,
        crate::routes::matches::update_match,
        crate::routes::matches::delete_match,
        crate::routes::matches::record_result,
        crate::routes::results::list_results,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::common::ActionResponse,
            crate::dto::team::CreateTeamRequest,
            crate::dto::team::UpdateTeamRequest,
            crate::dto::team::TeamView,
            crate::dto::team::TeamStatsView,
            crate::dto::team::GroupStageView,
            crate::dto::team::TeamBrief,
            crate::dto::team::TeamResetStatus,
            crate::dto::team::TeamResetResult,
            crate::dto::team::ResetStatsResponse,
            crate::dto::matches::CreateMatchRequest,
            crate::dto::matches::UpdateMatchRequest,
            crate::dto::matches::RecordResultRequest,
            crate::dto::matches::MatchSummary,
            crate::dto::matches::MatchDetail,
            crate::dto::results::GoalSide,
            crate::dto::results::GoalEntry,
            crate::dto::results::MatchResult,
            crate::dao::models::MatchStatus,
            crate::dao::models::MatchPhase,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "teams", description = "Team registration, standings and statistics rebuild"),
        (name = "matches", description = "Match scheduling and score entry"),
        (name = "results", description = "Finished match results"),
    )
)]
pub struct ApiDoc;
