use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::{error::AppError, state::SharedState};

/// Swagger UI and OpenAPI document routes.
pub mod docs;
/// Health endpoint.
pub mod health;
/// Match endpoints.
pub mod matches;
/// Finished results endpoint.
pub mod results;
/// Team endpoints.
pub mod teams;

const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = teams::router()
        .merge(matches::router())
        .merge(results::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_token,
        ))
        .merge(health::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}

/// Reject mutating requests lacking the configured admin token.
///
/// Reads stay public, and the gate is open when no token is configured.
async fn require_admin_token(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if req.method().is_safe() {
        return Ok(next.run(req).await);
    }
    let Some(expected) = state.config().admin_token() else {
        return Ok(next.run(req).await);
    };

    let provided = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            AppError::Unauthorized("missing admin token header `X-Admin-Token`".into())
        })?;

    if provided != expected {
        return Err(AppError::Unauthorized("invalid admin token".into()));
    }
    Ok(next.run(req).await)
}
