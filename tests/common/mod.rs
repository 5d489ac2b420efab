#![allow(dead_code)]

use std::sync::Arc;

use scoreboard_back::{
    config::AppConfig,
    dao::{
        models::{MatchPhase, TeamEntity},
        tournament_store::{TournamentStore, memory::MemoryTournamentStore},
    },
    dto::{
        matches::{CreateMatchRequest, RecordResultRequest},
        team::CreateTeamRequest,
    },
    services::{match_service, team_service},
    state::{AppState, SharedState},
};
use uuid::Uuid;

pub fn memory_state() -> (SharedState, MemoryTournamentStore) {
    let store = MemoryTournamentStore::new();
    let state = AppState::with_store(AppConfig::default(), Arc::new(store.clone()));
    (state, store)
}

pub async fn create_team(state: &SharedState, name: &str, group: &str) -> Uuid {
    team_service::create_team(
        state,
        CreateTeamRequest {
            name: name.into(),
            group: group.into(),
            captain_name: None,
            image: None,
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn schedule(
    state: &SharedState,
    team_a: Uuid,
    team_b: Uuid,
    date: &str,
    phase: MatchPhase,
) -> Uuid {
    match_service::create_match(
        state,
        CreateMatchRequest {
            date: date.into(),
            time: "18:00".into(),
            team_a,
            team_b,
            phase,
        },
    )
    .await
    .unwrap()
    .id
}

pub fn final_result(a: &[&str], b: &[&str]) -> RecordResultRequest {
    RecordResultRequest {
        team_a_score: a.len() as i64,
        team_b_score: b.len() as i64,
        team_a_player_goals: a.iter().map(|name| name.to_string()).collect(),
        team_b_player_goals: b.iter().map(|name| name.to_string()).collect(),
        status: scoreboard_back::dao::models::MatchStatus::Finished,
    }
}

pub async fn team(store: &MemoryTournamentStore, id: Uuid) -> TeamEntity {
    store.find_team(id).await.unwrap().unwrap()
}
