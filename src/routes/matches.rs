use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::matches::{
        CreateMatchRequest, MatchDetail, MatchSummary, MatchesQuery, RecordResultRequest,
        UpdateMatchRequest,
    },
    error::AppError,
    services::match_service,
    state::SharedState,
};

/// Match scheduling, status transitions and score entry.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/matches", get(list_matches).post(create_match))
        .route(
            "/matches/{id}",
            get(get_match).patch(update_match).delete(delete_match),
        )
        .route("/matches/{id}/result", put(record_result))
}

/// Schedule a match between two registered teams.
#[utoipa::path(
    post,
    path = "/matches",
    tag = "matches",
    params(("X-Admin-Token" = Option<String>, Header, description = "Admin token, required when configured")),
    request_body = CreateMatchRequest,
    responses(
        (status = 201, description = "Match scheduled", body = MatchDetail),
        (status = 400, description = "Invalid payload or identical teams"),
        (status = 404, description = "Unknown team")
    )
)]
pub async fn create_match(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateMatchRequest>>,
) -> Result<(StatusCode, Json<MatchDetail>), AppError> {
    let created = match_service::create_match(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List matches by day and stage, earliest first.
#[utoipa::path(
    get,
    path = "/matches",
    tag = "matches",
    params(MatchesQuery),
    responses(
        (status = 200, description = "Matches with team names and images", body = [MatchSummary]),
        (status = 400, description = "Unknown stage or malformed date")
    )
)]
pub async fn list_matches(
    State(state): State<SharedState>,
    Query(query): Query<MatchesQuery>,
) -> Result<Json<Vec<MatchSummary>>, AppError> {
    Ok(Json(match_service::list_matches(&state, query).await?))
}

/// Retrieve a match with both teams fully populated.
#[utoipa::path(
    get,
    path = "/matches/{id}",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Identifier of the match")),
    responses(
        (status = 200, description = "Match", body = MatchDetail),
        (status = 404, description = "Unknown match")
    )
)]
pub async fn get_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MatchDetail>, AppError> {
    Ok(Json(match_service::get_match(&state, id).await?))
}

/// Reschedule a match or move its status forward.
///
/// Setting `finished` reconciles team statistics with the stored score.
#[utoipa::path(
    patch,
    path = "/matches/{id}",
    tag = "matches",
    params(("X-Admin-Token" = Option<String>, Header, description = "Admin token, required when configured"),
    ("id" = Uuid, Path, description = "Identifier of the match")),
    request_body = UpdateMatchRequest,
    responses(
        (status = 200, description = "Match updated", body = MatchDetail),
        (status = 404, description = "Unknown match"),
        (status = 409, description = "Forbidden status transition")
    )
)]
pub async fn update_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<UpdateMatchRequest>>,
) -> Result<Json<MatchDetail>, AppError> {
    Ok(Json(match_service::update_match(&state, id, payload).await?))
}

/// Delete a match that has not been finished.
#[utoipa::path(
    delete,
    path = "/matches/{id}",
    tag = "matches",
    params(("X-Admin-Token" = Option<String>, Header, description = "Admin token, required when configured"),
    ("id" = Uuid, Path, description = "Identifier of the match")),
    responses(
        (status = 204, description = "Match deleted"),
        (status = 404, description = "Unknown match"),
        (status = 409, description = "Match already finished")
    )
)]
pub async fn delete_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    match_service::delete_match(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Record the score of a match; `finished` updates both teams' statistics.
#[utoipa::path(
    put,
    path = "/matches/{id}/result",
    tag = "matches",
    params(("X-Admin-Token" = Option<String>, Header, description = "Admin token, required when configured"),
    ("id" = Uuid, Path, description = "Identifier of the match")),
    request_body = RecordResultRequest,
    responses(
        (status = 200, description = "Score recorded", body = MatchDetail),
        (status = 400, description = "Malformed score"),
        (status = 404, description = "Unknown match or team"),
        (status = 409, description = "Match already finished")
    )
)]
pub async fn record_result(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<RecordResultRequest>>,
) -> Result<Json<MatchDetail>, AppError> {
    Ok(Json(match_service::record_result(&state, id, payload).await?))
}
