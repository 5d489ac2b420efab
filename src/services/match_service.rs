//! Match scheduling, status transitions and score recording.

use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        models::{MatchEntity, MatchFilter, MatchStatus, WriteBatch},
        tournament_store::TournamentStore,
    },
    dto::{
        matches::{
            CreateMatchRequest, MatchDetail, MatchSummary, MatchesQuery, RecordResultRequest,
            UpdateMatchRequest,
        },
        phase::parse_stage_filter,
        validation::validate_match_date,
    },
    error::ServiceError,
    services::{
        lookup::{TeamLookup, sort_chronologically},
        reconciliation::{self, FinalScore, Finalized},
    },
    state::{
        SharedState,
        lifecycle::{self, StatusChange},
    },
};

async fn load_match(store: &dyn TournamentStore, id: Uuid) -> Result<MatchEntity, ServiceError> {
    store
        .find_match(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("match `{id}` not found")))
}

fn finalized_detail(finalized: Finalized) -> MatchDetail {
    let lookup = TeamLookup::from_teams([finalized.team_a, finalized.team_b]);
    lookup.detail(finalized.entity)
}

async fn detail(store: &dyn TournamentStore, entity: MatchEntity) -> Result<MatchDetail, ServiceError> {
    let lookup = TeamLookup::load(store, std::slice::from_ref(&entity)).await?;
    Ok(lookup.detail(entity))
}

/// Replace a non-finishing match write, guarded on the status read beforehand.
async fn save_guarded(
    store: &dyn TournamentStore,
    entity: MatchEntity,
    read_status: MatchStatus,
) -> Result<(), ServiceError> {
    store
        .commit(WriteBatch::default().with_match(entity, Some(read_status)))
        .await?;
    Ok(())
}

fn score_to_u32(value: i64, field: &str) -> Result<u32, ServiceError> {
    u32::try_from(value)
        .map_err(|_| ServiceError::InvalidInput(format!("{field} must be between 0 and {}", u32::MAX)))
}

/// Schedule a match between two existing, distinct teams.
pub async fn create_match(
    state: &SharedState,
    payload: CreateMatchRequest,
) -> Result<MatchDetail, ServiceError> {
    if payload.team_a == payload.team_b {
        return Err(ServiceError::InvalidInput(
            "teamA and teamB must be different teams".into(),
        ));
    }

    let store = state.require_store().await?;
    let teams = store.find_teams(vec![payload.team_a, payload.team_b]).await?;
    let lookup = TeamLookup::from_teams(teams);
    for id in [payload.team_a, payload.team_b] {
        if lookup.get(id).is_none() {
            return Err(ServiceError::NotFound(format!("team `{id}` not found")));
        }
    }

    let entity = MatchEntity::scheduled(
        payload.date,
        payload.time,
        payload.team_a,
        payload.team_b,
        payload.phase,
    );
    store.insert_match(entity.clone()).await?;
    info!(
        match_id = %entity.id,
        date = %entity.date,
        time = %entity.time,
        phase = entity.phase.as_code(),
        "match scheduled"
    );

    Ok(lookup.detail(entity))
}

/// Matches filtered by day and phase, earliest first.
pub async fn list_matches(
    state: &SharedState,
    query: MatchesQuery,
) -> Result<Vec<MatchSummary>, ServiceError> {
    let phase = parse_stage_filter(query.stage.as_deref())
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;
    let date = query
        .date
        .map(|date| date.trim().to_owned())
        .filter(|date| !date.is_empty());
    if let Some(date) = &date {
        validate_match_date(date).map_err(|_| {
            ServiceError::InvalidInput(format!("date must be `YYYY-MM-DD` (got `{date}`)"))
        })?;
    }

    let store = state.require_store().await?;
    let mut matches = store
        .list_matches(MatchFilter {
            date,
            phase,
            ..MatchFilter::default()
        })
        .await?;
    sort_chronologically(&mut matches);

    let lookup = TeamLookup::load(store.as_ref(), &matches).await?;
    Ok(matches
        .into_iter()
        .map(|entity| lookup.summary(entity))
        .collect())
}

/// Fetch a match with both teams fully populated.
pub async fn get_match(state: &SharedState, id: Uuid) -> Result<MatchDetail, ServiceError> {
    let store = state.require_store().await?;
    let entity = load_match(store.as_ref(), id).await?;
    detail(store.as_ref(), entity).await
}

/// Reschedule and/or move the status forward.
///
/// Moving to `finished` goes through result reconciliation with the stored score.
pub async fn update_match(
    state: &SharedState,
    id: Uuid,
    payload: UpdateMatchRequest,
) -> Result<MatchDetail, ServiceError> {
    let store = state.require_store().await?;
    let mut entity = load_match(store.as_ref(), id).await?;
    let read_status = entity.status;

    let change = match payload.status {
        Some(status) => lifecycle::plan(read_status, status)?,
        None => StatusChange::Unchanged,
    };

    let rescheduled = payload.date.is_some() || payload.time.is_some();
    if let Some(date) = payload.date {
        entity.date = date;
    }
    if let Some(time) = payload.time {
        entity.time = time;
    }

    match change {
        StatusChange::Finalize => {
            let score = FinalScore::from_match(&entity);
            let finalized = reconciliation::finalize_entity(store.as_ref(), entity, score).await?;
            Ok(finalized_detail(finalized))
        }
        StatusChange::Advance | StatusChange::Unchanged => {
            if change == StatusChange::Advance {
                if let Some(status) = payload.status {
                    entity.status = status;
                }
            }
            if change == StatusChange::Advance || rescheduled {
                entity.updated_at = SystemTime::now();
                save_guarded(store.as_ref(), entity.clone(), read_status).await?;
                info!(
                    match_id = %entity.id,
                    status = entity.status.as_str(),
                    date = %entity.date,
                    time = %entity.time,
                    "match updated"
                );
            }
            detail(store.as_ref(), entity).await
        }
    }
}

/// Record a score. A `finished` status reconciles team statistics; any other
/// status stores a live score without touching them.
pub async fn record_result(
    state: &SharedState,
    id: Uuid,
    payload: RecordResultRequest,
) -> Result<MatchDetail, ServiceError> {
    let score = FinalScore {
        team_a_score: score_to_u32(payload.team_a_score, "teamAScore")?,
        team_b_score: score_to_u32(payload.team_b_score, "teamBScore")?,
        team_a_goals: payload.team_a_player_goals,
        team_b_goals: payload.team_b_player_goals,
    };

    let store = state.require_store().await?;
    let mut entity = load_match(store.as_ref(), id).await?;
    let read_status = entity.status;

    match lifecycle::plan(read_status, payload.status)? {
        StatusChange::Finalize => {
            let finalized = reconciliation::finalize_entity(store.as_ref(), entity, score).await?;
            Ok(finalized_detail(finalized))
        }
        StatusChange::Advance | StatusChange::Unchanged => {
            entity.team_a_score = score.team_a_score;
            entity.team_b_score = score.team_b_score;
            entity.team_a_player_goals = score.team_a_goals;
            entity.team_b_player_goals = score.team_b_goals;
            entity.status = payload.status;
            entity.updated_at = SystemTime::now();
            save_guarded(store.as_ref(), entity.clone(), read_status).await?;
            info!(
                match_id = %entity.id,
                status = entity.status.as_str(),
                score = %format!("{}-{}", entity.team_a_score, entity.team_b_score),
                "live score recorded"
            );
            detail(store.as_ref(), entity).await
        }
    }
}

/// Delete a match that has not been finished yet.
///
/// A finished match already counts in both teams' statistics, so deleting it
/// is refused.
pub async fn delete_match(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    let entity = load_match(store.as_ref(), id).await?;
    if entity.status == MatchStatus::Finished {
        return Err(ServiceError::InvalidState(format!(
            "match `{id}` is finished and counts in team statistics; it cannot be deleted"
        )));
    }
    if !store.delete_match(id).await? {
        return Err(ServiceError::NotFound(format!("match `{id}` not found")));
    }
    info!(match_id = %id, "match deleted");
    Ok(())
}
