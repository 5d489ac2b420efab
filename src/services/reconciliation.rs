//! Result reconciliation: finishing a match and folding its score into both
//! teams' statistics inside one store transaction.

use std::time::SystemTime;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::{
        models::{MatchEntity, MatchStatus, TeamEntity, WriteBatch},
        tournament_store::TournamentStore,
    },
    error::ServiceError,
    state::{lifecycle, stats::StatDelta},
};

/// Final score of a match, with one scorer entry per goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalScore {
    /// Goals of team A.
    pub team_a_score: u32,
    /// Goals of team B.
    pub team_b_score: u32,
    /// Scorers of team A.
    pub team_a_goals: Vec<String>,
    /// Scorers of team B.
    pub team_b_goals: Vec<String>,
}

impl FinalScore {
    /// Score currently stored on `entity`, used when a match is finished by a status change.
    pub fn from_match(entity: &MatchEntity) -> Self {
        Self {
            team_a_score: entity.team_a_score,
            team_b_score: entity.team_b_score,
            team_a_goals: entity.team_a_player_goals.clone(),
            team_b_goals: entity.team_b_player_goals.clone(),
        }
    }

    fn warn_on_scorer_mismatch(&self, match_id: Uuid) {
        if self.team_a_goals.len() != self.team_a_score as usize
            || self.team_b_goals.len() != self.team_b_score as usize
        {
            warn!(
                %match_id,
                team_a_score = self.team_a_score,
                team_a_scorers = self.team_a_goals.len(),
                team_b_score = self.team_b_score,
                team_b_scorers = self.team_b_goals.len(),
                "scorer lists do not match the final score"
            );
        }
    }
}

/// Finished match together with both teams as committed.
#[derive(Debug, Clone)]
pub struct Finalized {
    /// Match as stored after finalization.
    pub entity: MatchEntity,
    /// Team A with its updated statistics.
    pub team_a: TeamEntity,
    /// Team B with its updated statistics.
    pub team_b: TeamEntity,
}

/// Finish the match `match_id` with `score`.
pub async fn finalize_match(
    store: &dyn TournamentStore,
    match_id: Uuid,
    score: FinalScore,
) -> Result<Finalized, ServiceError> {
    let Some(entity) = store.find_match(match_id).await? else {
        return Err(ServiceError::NotFound(format!("match `{match_id}` not found")));
    };
    finalize_entity(store, entity, score).await
}

/// Finish an already loaded match.
///
/// `entity.status` must be the status read from the store: the match write is
/// guarded on it, so a concurrent finalization makes this one fail with a
/// conflict and nothing is written. Other fields of `entity` (e.g. a new
/// schedule) are persisted along with the score.
pub async fn finalize_entity(
    store: &dyn TournamentStore,
    mut entity: MatchEntity,
    score: FinalScore,
) -> Result<Finalized, ServiceError> {
    let read_status = entity.status;
    lifecycle::plan(read_status, MatchStatus::Finished)?;

    if entity.team_a == entity.team_b {
        return Err(ServiceError::InvalidState(format!(
            "match `{}` references the same team on both sides",
            entity.id
        )));
    }

    let mut team_a = load_team(store, entity.team_a).await?;
    let mut team_b = load_team(store, entity.team_b).await?;

    score.warn_on_scorer_mismatch(entity.id);

    let now = SystemTime::now();
    entity.team_a_score = score.team_a_score;
    entity.team_b_score = score.team_b_score;
    entity.team_a_player_goals = score.team_a_goals;
    entity.team_b_player_goals = score.team_b_goals;
    entity.status = MatchStatus::Finished;
    entity.updated_at = now;

    let (delta_a, delta_b) = StatDelta::for_match(&entity);
    delta_a.apply(&mut team_a);
    delta_b.apply(&mut team_b);
    team_a.updated_at = now;
    team_b.updated_at = now;

    let batch = WriteBatch::default()
        .with_match(entity.clone(), Some(read_status))
        .with_team_stats(&team_a)
        .with_team_stats(&team_b);
    store.commit(batch).await?;

    info!(
        match_id = %entity.id,
        phase = entity.phase.as_code(),
        team_a = %team_a.name,
        team_b = %team_b.name,
        score = %format!("{}-{}", entity.team_a_score, entity.team_b_score),
        "match finalized"
    );

    Ok(Finalized {
        entity,
        team_a,
        team_b,
    })
}

async fn load_team(store: &dyn TournamentStore, id: Uuid) -> Result<TeamEntity, ServiceError> {
    store
        .find_team(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{id}` not found")))
}
