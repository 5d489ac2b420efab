use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use scoreboard_back::{
    config::AppConfig,
    dao::tournament_store::memory::MemoryTournamentStore,
    routes,
    state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;

const TOKEN: &str = "s3cret";

fn app(config: AppConfig) -> Router {
    routes::router(AppState::with_store(
        config,
        Arc::new(MemoryTournamentStore::new()),
    ))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-admin-token", TOKEN);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let resp = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn create_team(app: &Router, name: &str, group: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/teams",
        Some(json!({"name": name, "group": group})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_owned()
}

async fn create_match(app: &Router, team_a: &str, team_b: &str, phase: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/matches",
        Some(json!({
            "date": "2026-06-14",
            "time": "18:00",
            "teamA": team_a,
            "teamB": team_b,
            "phase": phase,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn healthcheck_reports_backend() {
    let app = app(AppConfig::default());
    let (status, body) = send(&app, "GET", "/healthcheck", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "storage": "memory"}));
}

#[tokio::test]
async fn degraded_state_answers_service_unavailable() {
    let app = routes::router(AppState::new(AppConfig::default()));
    let (status, body) = send(&app, "GET", "/healthcheck", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");

    let (status, _) = send(&app, "GET", "/teams", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn result_submission_updates_standings() {
    let app = app(AppConfig::default());
    let x = create_team(&app, "X", "A").await;
    let y = create_team(&app, "Y", "A").await;
    let id = create_match(&app, &x, &y, "Group Stage").await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/matches/{id}/result"),
        Some(json!({
            "teamAScore": 3,
            "teamBScore": 1,
            "teamAPlayerGoals": ["P1", "P1", "P2"],
            "teamBPlayerGoals": ["P3"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "finished");
    assert_eq!(body["teamA"]["wins"], 1);
    assert_eq!(body["teamB"]["groupStageDetails"]["points"], 0);

    let (status, teams) = send(&app, "GET", "/teams?group=A", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(teams[0]["name"], "X");
    assert_eq!(teams[0]["groupStageDetails"]["points"], 3);
    assert_eq!(teams[0]["goalsScored"], 3);

    let (status, results) = send(&app, "GET", "/results?stage=group", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results[0]["teamA"], "X");
    assert_eq!(results[0]["stage"], "Group Stage");
    assert_eq!(results[0]["goals"].as_array().unwrap().len(), 4);
    assert_eq!(results[0]["goals"][3], json!({"player": "P3", "team": "Y", "side": "B"}));

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/matches/{id}/result"),
        Some(json!({"teamAScore": 3, "teamBScore": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("already finished"));
}

#[tokio::test]
async fn validation_errors_are_bad_requests() {
    let app = app(AppConfig::default());
    let x = create_team(&app, "X", "A").await;
    let y = create_team(&app, "Y", "A").await;

    let (status, _) = send(
        &app,
        "POST",
        "/teams",
        Some(json!({"name": "Z", "group": "Q"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/matches",
        Some(json!({
            "date": "2026-02-30",
            "time": "18:00",
            "teamA": x,
            "teamB": y,
            "phase": "group",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/matches",
        Some(json!({
            "date": "2026-06-14",
            "time": "18:00",
            "teamA": x,
            "teamB": x,
            "phase": "group",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let id = create_match(&app, &x, &y, "semi").await;
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/matches/{id}/result"),
        Some(json!({"teamAScore": -1, "teamBScore": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/matches?stage=Playoffs", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_names_and_missing_records() {
    let app = app(AppConfig::default());
    create_team(&app, "X", "A").await;

    let (status, _) = send(
        &app,
        "POST",
        "/teams",
        Some(json!({"name": "X", "group": "B"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let missing = uuid::Uuid::new_v4();
    let (status, body) = send(&app, "GET", &format!("/teams/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());

    let (status, _) = send(&app, "DELETE", &format!("/matches/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_team_keeps_its_matches_listable() {
    let app = app(AppConfig::default());
    let x = create_team(&app, "X", "A").await;
    let y = create_team(&app, "Y", "A").await;
    let id = create_match(&app, &x, &y, "final").await;

    let (status, _) = send(&app, "DELETE", &format!("/teams/{y}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, matches) = send(&app, "GET", "/matches", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(matches[0]["id"], id.as_str());
    assert_eq!(matches[0]["teamA"]["name"], "X");
    assert!(matches[0]["teamB"].is_null());
    assert_eq!(matches[0]["phaseName"], "Final");

    let (status, _) = send(&app, "DELETE", &format!("/matches/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn deleting_a_finished_match_conflicts() {
    let app = app(AppConfig::default());
    let x = create_team(&app, "X", "A").await;
    let y = create_team(&app, "Y", "A").await;
    let id = create_match(&app, &x, &y, "group").await;
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/matches/{id}/result"),
        Some(json!({"teamAScore": 1, "teamBScore": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "DELETE", &format!("/matches/{id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("finished"));
}

#[tokio::test]
async fn reset_stats_reports_every_team() {
    let app = app(AppConfig::default());
    let x = create_team(&app, "X", "A").await;
    let y = create_team(&app, "Y", "B").await;
    let id = create_match(&app, &x, &y, "quarter").await;
    send(
        &app,
        "PATCH",
        &format!("/matches/{id}"),
        Some(json!({"status": "live"})),
    )
    .await;
    send(
        &app,
        "PUT",
        &format!("/matches/{id}/result"),
        Some(json!({"teamAScore": 0, "teamBScore": 2, "teamBPlayerGoals": ["Q", "Q"]})),
    )
    .await;

    let (status, report) = send(&app, "POST", "/teams/reset-stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["success"], true);
    assert_eq!(report["succeeded"], 2);
    assert_eq!(report["failed"], 0);
    assert_eq!(report["results"][0]["status"], "success");

    let (_, team) = send(&app, "GET", &format!("/teams/{y}"), None).await;
    assert_eq!(team["wins"], 1);
    assert_eq!(team["groupStageDetails"]["playedMatches"], 0);

    let (_, matches) = send(&app, "GET", &format!("/teams/{y}/matches"), None).await;
    assert_eq!(matches.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn admin_token_guards_mutations_only() {
    let app = app(AppConfig::default().with_admin_token(TOKEN));

    let request = Request::builder()
        .method("POST")
        .uri("/teams")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"name": "X", "group": "A"}).to_string()))
        .unwrap();
    let resp = app.clone().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method("POST")
        .uri("/teams")
        .header("x-admin-token", "wrong")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"name": "X", "group": "A"}).to_string()))
        .unwrap();
    let resp = app.clone().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    create_team(&app, "X", "A").await;

    let request = Request::builder().uri("/teams").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn configured_groups_replace_the_defaults() {
    let app = app(AppConfig::default().with_groups(["North", "South"]));
    create_team(&app, "X", "north").await;

    let (status, _) = send(
        &app,
        "POST",
        "/teams",
        Some(json!({"name": "Y", "group": "A"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, teams) = send(&app, "GET", "/teams?group=North", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(teams[0]["group"], "North");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app(AppConfig::default());
    let (status, doc) = send(&app, "GET", "/api-doc/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/matches/{id}/result"].is_object());
}
