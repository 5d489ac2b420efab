/// Process-local backend.
pub mod memory;
/// MongoDB backend.
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{MatchEntity, MatchFilter, TeamEntity, TeamProfileUpdate, WriteBatch};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for teams and matches.
///
/// Every multi-document mutation goes through [`TournamentStore::commit`], which
/// applies its batch atomically: readers observe either all of its writes or none.
pub trait TournamentStore: Send + Sync {
    /// Insert a new team; a duplicate name yields a conflict.
    fn insert_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Update descriptive fields only, returning the stored team or `None` when missing.
    fn update_team_profile(
        &self,
        id: Uuid,
        update: TeamProfileUpdate,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    /// Fetch a team by id.
    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    /// Resolve several team references at once; unknown ids are skipped.
    fn find_teams(&self, ids: Vec<Uuid>) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;
    /// Every stored team, in no particular order.
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;
    /// Delete a team, returning whether it existed. Referencing matches are kept.
    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    /// Insert a new match.
    fn insert_match(&self, entity: MatchEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a match by id.
    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>>;
    /// List matches satisfying `filter`, in no particular order.
    fn list_matches(
        &self,
        filter: MatchFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>>;
    /// Delete a match, returning whether it existed.
    fn delete_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    /// Apply every write of `batch` in one transaction.
    ///
    /// A match write whose status guard does not hold, or a write targeting a
    /// missing document, aborts the whole batch with a conflict.
    fn commit(&self, batch: WriteBatch) -> BoxFuture<'static, StorageResult<()>>;
    /// Check that the backend answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the backend connection in place.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Short backend name reported by the health endpoint.
    fn backend_name(&self) -> &'static str;
}
