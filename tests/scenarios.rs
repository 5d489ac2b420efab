mod common;

use common::{create_team, final_result, memory_state, schedule, team};
use scoreboard_back::{
    dao::models::{GroupStageDetails, MatchPhase, MatchStatus, TeamStats},
    dto::{
        matches::{MatchesQuery, RecordResultRequest, UpdateMatchRequest},
        results::ResultsQuery,
        team::TeamsQuery,
    },
    error::ServiceError,
    services::{match_service, results_service, team_service},
};

#[tokio::test]
async fn tournament_flow_accumulates_and_rebuilds_identically() {
    let (state, store) = memory_state();
    let x = create_team(&state, "X", "A").await;
    let y = create_team(&state, "Y", "a").await;

    // Group match, 3-1.
    let first = schedule(&state, x, y, "2026-06-14", MatchPhase::Group).await;
    match_service::record_result(&state, first, final_result(&["P1", "P1", "P2"], &["P3"]))
        .await
        .unwrap();

    let team_x = team(&store, x).await;
    assert_eq!(
        team_x.stats,
        TeamStats {
            wins: 1,
            draws: 0,
            losses: 0,
            goals_scored: 3,
            goals_accepted: 1,
        }
    );
    assert_eq!(team_x.group_stage.points, 3);
    assert_eq!(team_x.group_stage.played_matches, 1);
    let team_y = team(&store, y).await;
    assert_eq!((team_y.stats.losses, team_y.group_stage.points), (1, 0));
    assert_eq!(team_y.group, "A");

    // Second group match, 2-2.
    let second = schedule(&state, x, y, "2026-06-18", MatchPhase::Group).await;
    match_service::record_result(&state, second, final_result(&["P1", "P2"], &["P3", "P4"]))
        .await
        .unwrap();
    let team_x = team(&store, x).await;
    assert_eq!((team_x.stats.wins, team_x.stats.draws), (1, 1));
    assert_eq!(team_x.group_stage.points, 4);
    assert_eq!(team_x.group_stage.played_matches, 2);

    // Semi final, 1-0 for Y: group counters stay put.
    let semi = schedule(&state, y, x, "2026-06-25", MatchPhase::Semi).await;
    let before = team(&store, y).await.group_stage;
    match_service::record_result(&state, semi, final_result(&["P3"], &[]))
        .await
        .unwrap();
    let team_y = team(&store, y).await;
    assert_eq!(team_y.stats.wins, 1);
    assert_eq!(team_y.group_stage, before);

    // Rebuild reproduces the incremental values.
    let incremental = [team(&store, x).await, team(&store, y).await];
    let report = team_service::reset_stats(&state).await.unwrap();
    assert!(report.success);
    assert_eq!(report.succeeded, 2);
    for expected in incremental {
        let rebuilt = team(&store, expected.id).await;
        assert_eq!(rebuilt.stats, expected.stats);
        assert_eq!(rebuilt.group_stage, expected.group_stage);
    }
}

#[tokio::test]
async fn deleted_team_leaves_a_dangling_but_listable_match() {
    let (state, _store) = memory_state();
    let x = create_team(&state, "X", "A").await;
    let y = create_team(&state, "Y", "A").await;
    let id = schedule(&state, x, y, "2026-06-14", MatchPhase::Group).await;

    team_service::delete_team(&state, y).await.unwrap();

    let listed = match_service::list_matches(&state, MatchesQuery::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].team_a.as_ref().map(|team| team.id), Some(x));
    assert!(listed[0].team_b.is_none());

    let detail = match_service::get_match(&state, id).await.unwrap();
    assert!(detail.team_b.is_none());

    // Finishing it cannot update a missing team.
    let err = match_service::record_result(&state, id, final_result(&["P1"], &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn refinalizing_does_not_double_count() {
    let (state, store) = memory_state();
    let x = create_team(&state, "X", "A").await;
    let y = create_team(&state, "Y", "A").await;
    let id = schedule(&state, x, y, "2026-06-14", MatchPhase::Group).await;

    match_service::record_result(&state, id, final_result(&["P1"], &[]))
        .await
        .unwrap();
    let err = match_service::record_result(&state, id, final_result(&["P1"], &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));

    let err = match_service::update_match(
        &state,
        id,
        UpdateMatchRequest {
            status: Some(MatchStatus::Finished),
            ..UpdateMatchRequest::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));

    assert_eq!(team(&store, x).await.stats.wins, 1);
    assert_eq!(team(&store, y).await.group_stage.played_matches, 1);
}

#[tokio::test]
async fn live_scores_do_not_touch_statistics_until_finished() {
    let (state, store) = memory_state();
    let x = create_team(&state, "X", "A").await;
    let y = create_team(&state, "Y", "A").await;
    let id = schedule(&state, x, y, "2026-06-14", MatchPhase::Group).await;

    let live = match_service::record_result(
        &state,
        id,
        RecordResultRequest {
            status: MatchStatus::Live,
            ..final_result(&["P1"], &[])
        },
    )
    .await
    .unwrap();
    assert_eq!(live.status, MatchStatus::Live);
    assert_eq!(live.team_a_score, 1);
    assert_eq!(team(&store, x).await.stats, TeamStats::default());

    // Finishing through the status change uses the stored score.
    let finished = match_service::update_match(
        &state,
        id,
        UpdateMatchRequest {
            status: Some(MatchStatus::Finished),
            ..UpdateMatchRequest::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(finished.status, MatchStatus::Finished);
    assert_eq!(team(&store, x).await.group_stage.points, 3);
    assert_eq!(team(&store, y).await.stats.losses, 1);
}

#[tokio::test]
async fn status_cannot_move_backwards() {
    let (state, _store) = memory_state();
    let x = create_team(&state, "X", "A").await;
    let y = create_team(&state, "Y", "A").await;
    let id = schedule(&state, x, y, "2026-06-14", MatchPhase::Group).await;

    let to = |status| UpdateMatchRequest {
        status: Some(status),
        ..UpdateMatchRequest::default()
    };
    match_service::update_match(&state, id, to(MatchStatus::Live))
        .await
        .unwrap();
    match_service::update_match(&state, id, to(MatchStatus::Live))
        .await
        .unwrap();
    let err = match_service::update_match(&state, id, to(MatchStatus::Coming))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));
}

#[tokio::test]
async fn identical_teams_are_rejected_at_creation() {
    let (state, _store) = memory_state();
    let x = create_team(&state, "X", "A").await;
    let err = match_service::create_match(
        &state,
        scoreboard_back::dto::matches::CreateMatchRequest {
            date: "2026-06-14".into(),
            time: "18:00".into(),
            team_a: x,
            team_b: x,
            phase: MatchPhase::Group,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn listings_follow_filters_and_ordering() {
    let (state, _store) = memory_state();
    let lions = create_team(&state, "Lions", "A").await;
    let bears = create_team(&state, "Bears", "A").await;
    let owls = create_team(&state, "Owls", "B").await;

    let late = schedule(&state, lions, bears, "2026-06-20", MatchPhase::Group).await;
    let early = schedule(&state, bears, lions, "2026-06-14", MatchPhase::Group).await;
    let knockout = schedule(&state, lions, owls, "2026-06-28", MatchPhase::Quarter).await;

    match_service::record_result(&state, early, final_result(&["B1"], &[]))
        .await
        .unwrap();
    match_service::record_result(&state, late, final_result(&["L1", "L2"], &["B2"]))
        .await
        .unwrap();
    match_service::record_result(&state, knockout, final_result(&["L3"], &[]))
        .await
        .unwrap();

    let group_matches = match_service::list_matches(
        &state,
        MatchesQuery {
            date: None,
            stage: Some("Group Stage".into()),
        },
    )
    .await
    .unwrap();
    let ids: Vec<_> = group_matches.iter().map(|entry| entry.id).collect();
    assert_eq!(ids, [early, late]);

    let results = results_service::list_results(&state, ResultsQuery::default())
        .await
        .unwrap();
    let ids: Vec<_> = results.iter().map(|entry| entry.id).collect();
    assert_eq!(ids, [knockout, late, early]);
    assert_eq!(results[1].goals.len(), 3);
    assert_eq!(results[1].goals[2].team.as_deref(), Some("Bears"));

    let quarter = results_service::list_results(
        &state,
        ResultsQuery {
            stage: Some("Quarterfinals".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(quarter.len(), 1);
    assert_eq!(quarter[0].stage, "Quarter Finals");

    // Lions 3 pts, Bears 3 pts: tie broken by name.
    let standings = team_service::list_teams(
        &state,
        TeamsQuery {
            group: Some("a".into()),
        },
    )
    .await
    .unwrap();
    let names: Vec<_> = standings.iter().map(|team| team.name.as_str()).collect();
    assert_eq!(names, ["Bears", "Lions"]);

    let lions_matches = team_service::team_matches(&state, lions).await.unwrap();
    let ids: Vec<_> = lions_matches.iter().map(|entry| entry.id).collect();
    assert_eq!(ids, [early, late, knockout]);
}

#[tokio::test]
async fn unknown_stage_and_group_are_invalid_input() {
    let (state, _store) = memory_state();
    let err = results_service::list_results(
        &state,
        ResultsQuery {
            stage: Some("Playoffs".into()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    let err = team_service::list_teams(
        &state,
        TeamsQuery {
            group: Some("Z".into()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn team_updates_never_touch_statistics() {
    let (state, store) = memory_state();
    let x = create_team(&state, "X", "A").await;
    let y = create_team(&state, "Y", "A").await;
    let id = schedule(&state, x, y, "2026-06-14", MatchPhase::Group).await;
    match_service::record_result(&state, id, final_result(&["P1"], &[]))
        .await
        .unwrap();

    let request = serde_json::from_str(
        r#"{"name": "Xenon", "group": "b", "captainName": "Kim", "wins": 9}"#,
    )
    .unwrap();
    let updated = team_service::update_team(&state, x, request).await.unwrap();
    assert_eq!(updated.name, "Xenon");
    assert_eq!(updated.group, "B");
    assert_eq!(updated.captain_name.as_deref(), Some("Kim"));

    let stored = team(&store, x).await;
    assert_eq!(stored.stats.wins, 1);
    assert_eq!(
        stored.group_stage,
        GroupStageDetails {
            points: 3,
            played_matches: 1,
            wins: 1,
            draws: 0,
            losses: 0,
            goals_for: 1,
            goals_against: 0,
        }
    );
}

#[tokio::test]
async fn duplicate_team_names_conflict() {
    let (state, _store) = memory_state();
    create_team(&state, "X", "A").await;
    let err = team_service::create_team(
        &state,
        scoreboard_back::dto::team::CreateTeamRequest {
            name: "X".into(),
            group: "B".into(),
            captain_name: None,
            image: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn finished_matches_cannot_be_deleted() {
    let (state, store) = memory_state();
    let x = create_team(&state, "X", "A").await;
    let y = create_team(&state, "Y", "A").await;
    let id = schedule(&state, x, y, "2026-06-14", MatchPhase::Group).await;
    match_service::record_result(&state, id, final_result(&["P1"], &[]))
        .await
        .unwrap();

    let err = match_service::delete_match(&state, id).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));

    // Stats still agree with the finished history.
    let finished = results_service::list_results(&state, ResultsQuery::default())
        .await
        .unwrap();
    assert_eq!(finished.len(), 1);
    let stats = team(&store, x).await.stats;
    assert_eq!(stats.wins + stats.draws + stats.losses, 1);

    // A match still to be played can go.
    let pending = schedule(&state, x, y, "2026-06-18", MatchPhase::Group).await;
    match_service::delete_match(&state, pending).await.unwrap();
    let err = match_service::get_match(&state, pending).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
