use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        common::ActionResponse,
        matches::MatchSummary,
        team::{CreateTeamRequest, ResetStatsResponse, TeamView, TeamsQuery, UpdateTeamRequest},
    },
    error::AppError,
    services::team_service,
    state::SharedState,
};

/// Team registration, standings and statistics maintenance.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/teams", get(list_teams).post(create_team))
        .route("/teams/reset-stats", post(reset_stats))
        .route(
            "/teams/{id}",
            get(get_team).patch(update_team).delete(delete_team),
        )
        .route("/teams/{id}/matches", get(team_matches))
}

/// Register a team into one of the configured groups.
#[utoipa::path(
    post,
    path = "/teams",
    tag = "teams",
    params(("X-Admin-Token" = Option<String>, Header, description = "Admin token, required when configured")),
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = TeamView),
        (status = 400, description = "Invalid payload or unknown group"),
        (status = 409, description = "Team name already taken")
    )
)]
pub async fn create_team(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateTeamRequest>>,
) -> Result<(StatusCode, Json<TeamView>), AppError> {
    let team = team_service::create_team(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// Standings: teams by group points, highest first.
#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    params(TeamsQuery),
    responses((status = 200, description = "Teams sorted by group points", body = [TeamView]))
)]
pub async fn list_teams(
    State(state): State<SharedState>,
    Query(query): Query<TeamsQuery>,
) -> Result<Json<Vec<TeamView>>, AppError> {
    Ok(Json(team_service::list_teams(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = Uuid, Path, description = "Identifier of the team")),
    responses(
        (status = 200, description = "Team", body = TeamView),
        (status = 404, description = "Unknown team")
    )
)]
/// Retrieve a team by its ID.
pub async fn get_team(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamView>, AppError> {
    Ok(Json(team_service::get_team(&state, id).await?))
}

/// Update a team's descriptive fields. Statistics cannot be edited.
#[utoipa::path(
    patch,
    path = "/teams/{id}",
    tag = "teams",
    params(("X-Admin-Token" = Option<String>, Header, description = "Admin token, required when configured"),
    ("id" = Uuid, Path, description = "Identifier of the team")),
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "Team updated", body = TeamView),
        (status = 404, description = "Unknown team"),
        (status = 409, description = "Team name already taken")
    )
)]
pub async fn update_team(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<UpdateTeamRequest>>,
) -> Result<Json<TeamView>, AppError> {
    Ok(Json(team_service::update_team(&state, id, payload).await?))
}

/// Delete a team; its matches are kept.
#[utoipa::path(
    delete,
    path = "/teams/{id}",
    tag = "teams",
    params(("X-Admin-Token" = Option<String>, Header, description = "Admin token, required when configured"),
    ("id" = Uuid, Path, description = "Identifier of the team")),
    responses(
        (status = 200, description = "Team deleted", body = ActionResponse),
        (status = 404, description = "Unknown team")
    )
)]
pub async fn delete_team(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(team_service::delete_team(&state, id).await?))
}

/// Zero every team's statistics and replay the finished matches.
#[utoipa::path(
    post,
    path = "/teams/reset-stats",
    tag = "teams",
    params(("X-Admin-Token" = Option<String>, Header, description = "Admin token, required when configured")),
    responses((status = 200, description = "Per-team rebuild report", body = ResetStatsResponse))
)]
pub async fn reset_stats(
    State(state): State<SharedState>,
) -> Result<Json<ResetStatsResponse>, AppError> {
    Ok(Json(team_service::reset_stats(&state).await?))
}

/// Matches of one team, earliest first.
#[utoipa::path(
    get,
    path = "/teams/{id}/matches",
    tag = "teams",
    params(("id" = Uuid, Path, description = "Identifier of the team")),
    responses(
        (status = 200, description = "Matches of the team", body = [MatchSummary]),
        (status = 404, description = "Unknown team")
    )
)]
pub async fn team_matches(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MatchSummary>>, AppError> {
    Ok(Json(team_service::team_matches(&state, id).await?))
}
