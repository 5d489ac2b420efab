use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::results::{MatchResult, ResultsQuery},
    error::AppError,
    services::results_service,
    state::SharedState,
};

/// Routes serving finished results.
pub fn router() -> Router<SharedState> {
    Router::new().route("/results", get(list_results))
}

/// Finished matches of a stage, latest first, with per-goal scorer lines.
#[utoipa::path(
    get,
    path = "/results",
    tag = "results",
    params(ResultsQuery),
    responses(
        (status = 200, description = "Finished matches", body = [MatchResult]),
        (status = 400, description = "Unknown stage")
    )
)]
pub async fn list_results(
    State(state): State<SharedState>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<Vec<MatchResult>>, AppError> {
    Ok(Json(results_service::list_results(&state, query).await?))
}
