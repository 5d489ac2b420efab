//! Full recomputation of team statistics from the finished match history.
//!
//! Every team is zeroed and its finished matches replayed, then committed on
//! its own; a team whose history cannot be replayed is reported and skipped
//! without affecting the others.

use std::time::SystemTime;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    dao::{
        models::{MatchFilter, TeamEntity, WriteBatch},
        storage::StorageError,
        tournament_store::TournamentStore,
    },
    dto::team::{ResetStatsResponse, TeamResetResult, TeamResetStatus},
    error::ServiceError,
    state::stats::{ReplayError, StatDelta},
};

/// Failure rebuilding a single team.
#[derive(Debug, Error)]
pub enum TeamRebuildError {
    /// Reading the history or writing the result failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// A finished match could not be applied to the team.
    #[error(transparent)]
    Replay(#[from] ReplayError),
}

/// Zero and replay the statistics of every team.
///
/// Fails as a whole only when the team list itself cannot be read.
pub async fn rebuild_all_stats(
    store: &dyn TournamentStore,
) -> Result<ResetStatsResponse, ServiceError> {
    let teams = store.list_teams().await?;
    info!(teams = teams.len(), "rebuilding team statistics");

    let mut results = Vec::with_capacity(teams.len());
    for team in teams {
        let (team_id, team_name) = (team.id, team.name.clone());
        let entry = match rebuild_team(store, team).await {
            Ok(()) => TeamResetResult {
                team_id,
                team_name,
                status: TeamResetStatus::Success,
                error: None,
            },
            Err(err) => {
                warn!(%team_id, team = %team_name, error = %err, "team statistics rebuild failed");
                TeamResetResult {
                    team_id,
                    team_name,
                    status: TeamResetStatus::Error,
                    error: Some(err.to_string()),
                }
            }
        };
        results.push(entry);
    }

    let failed = results
        .iter()
        .filter(|entry| entry.status == TeamResetStatus::Error)
        .count();
    let succeeded = results.len() - failed;
    info!(succeeded, failed, "team statistics rebuild complete");

    Ok(ResetStatsResponse {
        success: failed == 0,
        succeeded,
        failed,
        results,
    })
}

async fn rebuild_team(
    store: &dyn TournamentStore,
    mut team: TeamEntity,
) -> Result<(), TeamRebuildError> {
    let history = store
        .list_matches(MatchFilter::finished_for_team(team.id))
        .await?;

    team.reset_stats();
    for entity in &history {
        StatDelta::for_team(entity, team.id)?.apply(&mut team);
    }
    team.updated_at = SystemTime::now();

    store
        .commit(WriteBatch::default().with_team_stats(&team))
        .await?;
    Ok(())
}
