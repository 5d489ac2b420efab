//! Process-local store keeping both collections behind a single lock, so a
//! committed batch is observed all-or-nothing by readers.

use std::{sync::Arc, time::SystemTime};

use futures::future::BoxFuture;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dao::{
    models::{MatchEntity, MatchFilter, TeamEntity, TeamProfileUpdate, WriteBatch},
    storage::{StorageError, StorageResult},
    tournament_store::TournamentStore,
};

/// In-memory [`TournamentStore`] used for local runs and tests.
#[derive(Clone, Default)]
pub struct MemoryTournamentStore {
    inner: Arc<RwLock<Collections>>,
}

#[derive(Default)]
struct Collections {
    teams: IndexMap<Uuid, TeamEntity>,
    matches: IndexMap<Uuid, MatchEntity>,
}

impl Collections {
    fn ensure_unique_name(&self, name: &str, exclude: Option<Uuid>) -> StorageResult<()> {
        if self
            .teams
            .values()
            .any(|team| team.name == name && Some(team.id) != exclude)
        {
            return Err(StorageError::conflict(format!(
                "team name `{name}` already exists"
            )));
        }
        Ok(())
    }

    /// Check every precondition of `batch` before touching anything.
    fn validate_batch(&self, batch: &WriteBatch) -> StorageResult<()> {
        for write in &batch.matches {
            let id = write.entity.id;
            let stored = self
                .matches
                .get(&id)
                .ok_or_else(|| StorageError::conflict(format!("match `{id}` no longer exists")))?;
            if let Some(expected) = write.expected_status {
                if stored.status != expected {
                    return Err(StorageError::conflict(format!(
                        "match `{id}` changed status concurrently (expected {}, found {})",
                        expected.as_str(),
                        stored.status.as_str()
                    )));
                }
            }
        }

        for write in &batch.team_stats {
            if !self.teams.contains_key(&write.team_id) {
                return Err(StorageError::conflict(format!(
                    "team `{}` no longer exists",
                    write.team_id
                )));
            }
        }

        Ok(())
    }
}

impl MemoryTournamentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a match without any validation, as a raw document import would.
    #[cfg(test)]
    pub(crate) async fn import_match(&self, entity: MatchEntity) {
        let mut guard = self.inner.write().await;
        guard.matches.insert(entity.id, entity);
    }
}

impl TournamentStore for MemoryTournamentStore {
    fn insert_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut guard = inner.write().await;
            guard.ensure_unique_name(&team.name, None)?;
            guard.teams.insert(team.id, team);
            Ok(())
        })
    }

    fn update_team_profile(
        &self,
        id: Uuid,
        update: TeamProfileUpdate,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut guard = inner.write().await;
            if let Some(name) = &update.name {
                guard.ensure_unique_name(name, Some(id))?;
            }
            let Some(team) = guard.teams.get_mut(&id) else {
                return Ok(None);
            };
            update.apply_to(team);
            team.updated_at = SystemTime::now();
            Ok(Some(team.clone()))
        })
    }

    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.read().await.teams.get(&id).cloned()) })
    }

    fn find_teams(&self, ids: Vec<Uuid>) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let guard = inner.read().await;
            Ok(ids
                .iter()
                .filter_map(|id| guard.teams.get(id).cloned())
                .collect())
        })
    }

    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.read().await.teams.values().cloned().collect()) })
    }

    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.write().await.teams.shift_remove(&id).is_some()) })
    }

    fn insert_match(&self, entity: MatchEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut guard = inner.write().await;
            if guard.matches.contains_key(&entity.id) {
                return Err(StorageError::conflict(format!(
                    "match `{}` already exists",
                    entity.id
                )));
            }
            guard.matches.insert(entity.id, entity);
            Ok(())
        })
    }

    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.read().await.matches.get(&id).cloned()) })
    }

    fn list_matches(
        &self,
        filter: MatchFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let guard = inner.read().await;
            Ok(guard
                .matches
                .values()
                .filter(|entity| filter.matches(entity))
                .cloned()
                .collect())
        })
    }

    fn delete_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.write().await.matches.shift_remove(&id).is_some()) })
    }

    fn commit(&self, batch: WriteBatch) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut guard = inner.write().await;
            guard.validate_batch(&batch)?;

            for write in batch.matches {
                guard.matches.insert(write.entity.id, write.entity);
            }
            for write in batch.team_stats {
                if let Some(team) = guard.teams.get_mut(&write.team_id) {
                    team.stats = write.stats;
                    team.group_stage = write.group_stage;
                    team.updated_at = write.updated_at;
                }
            }
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::{MatchPhase, MatchStatus};

    fn team(name: &str) -> TeamEntity {
        TeamEntity::new(name.into(), "A".into(), None, None)
    }

    #[tokio::test]
    async fn duplicate_team_name_is_a_conflict() {
        let store = MemoryTournamentStore::new();
        store.insert_team(team("Lions")).await.unwrap();

        let err = store.insert_team(team("Lions")).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict { .. }));
        assert_eq!(store.list_teams().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn renaming_onto_existing_name_is_rejected() {
        let store = MemoryTournamentStore::new();
        let lions = team("Lions");
        let tigers = team("Tigers");
        let tigers_id = tigers.id;
        store.insert_team(lions).await.unwrap();
        store.insert_team(tigers).await.unwrap();

        let update = TeamProfileUpdate {
            name: Some("Lions".into()),
            ..TeamProfileUpdate::default()
        };
        let err = store
            .update_team_profile(tigers_id, update)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict { .. }));
    }

    #[tokio::test]
    async fn profile_update_keeps_statistics() {
        let store = MemoryTournamentStore::new();
        let mut lions = team("Lions");
        lions.stats.wins = 4;
        lions.group_stage.points = 12;
        let id = lions.id;
        store.insert_team(lions).await.unwrap();

        let update = TeamProfileUpdate {
            captain_name: Some(Some("Ana".into())),
            ..TeamProfileUpdate::default()
        };
        let updated = store.update_team_profile(id, update).await.unwrap().unwrap();
        assert_eq!(updated.captain_name.as_deref(), Some("Ana"));
        assert_eq!(updated.stats.wins, 4);
        assert_eq!(updated.group_stage.points, 12);
    }

    #[tokio::test]
    async fn failed_guard_leaves_every_document_untouched() {
        let store = MemoryTournamentStore::new();
        let mut lions = team("Lions");
        let tigers = team("Tigers");
        let fixture = MatchEntity::scheduled(
            "2026-06-01".into(),
            "18:00".into(),
            lions.id,
            tigers.id,
            MatchPhase::Group,
        );
        store.insert_team(lions.clone()).await.unwrap();
        store.insert_team(tigers).await.unwrap();
        store.insert_match(fixture.clone()).await.unwrap();

        lions.stats.wins = 1;
        let mut finished = fixture.clone();
        finished.status = MatchStatus::Finished;
        let batch = WriteBatch::default()
            .with_match(finished, Some(MatchStatus::Live))
            .with_team_stats(&lions);

        let err = store.commit(batch).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict { .. }));

        let stored_team = store.find_team(lions.id).await.unwrap().unwrap();
        assert_eq!(stored_team.stats.wins, 0);
        let stored_match = store.find_match(fixture.id).await.unwrap().unwrap();
        assert_eq!(stored_match.status, MatchStatus::Coming);
    }

    #[tokio::test]
    async fn deleting_a_team_keeps_its_matches() {
        let store = MemoryTournamentStore::new();
        let lions = team("Lions");
        let tigers = team("Tigers");
        let fixture = MatchEntity::scheduled(
            "2026-06-01".into(),
            "18:00".into(),
            lions.id,
            tigers.id,
            MatchPhase::Group,
        );
        store.insert_team(lions.clone()).await.unwrap();
        store.insert_team(tigers).await.unwrap();
        store.insert_match(fixture.clone()).await.unwrap();

        assert!(store.delete_team(lions.id).await.unwrap());
        assert!(!store.delete_team(lions.id).await.unwrap());

        let listed = store
            .list_matches(MatchFilter {
                team: Some(lions.id),
                ..MatchFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(listed, vec![fixture]);
    }
}
