use std::{sync::Arc, time::SystemTime};

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, ClientSession, Collection, Database, IndexModel,
    bson::{Bson, DateTime, Document, doc},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
};
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        MATCH_COLLECTION_NAME, MongoMatchDocument, MongoTeamDocument, TEAM_COLLECTION_NAME,
        doc_id, stats_update,
    },
};
use crate::dao::{
    models::{MatchEntity, MatchFilter, TeamEntity, TeamProfileUpdate, WriteBatch},
    storage::StorageResult,
    tournament_store::TournamentStore,
};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// MongoDB-backed [`TournamentStore`]. Batches run inside multi-document
/// transactions, which require a replica set or sharded deployment.
#[derive(Clone)]
pub struct MongoTournamentStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = self.state.read().await.database.clone();
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let connection =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = connection.client;
        guard.database = connection.database;
        Ok(())
    }
}

impl MongoTournamentStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let connection = establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState {
                client: connection.client,
                database: connection.database,
            }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        let team_name = IndexModel::builder()
            .keys(doc! {"name": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("team_name_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();
        database
            .collection::<Document>(TEAM_COLLECTION_NAME)
            .create_index(team_name)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: TEAM_COLLECTION_NAME,
                index: "name",
                source,
            })?;

        let matches = database.collection::<Document>(MATCH_COLLECTION_NAME);
        let indexes = [
            ("match_schedule_idx", "date,time", doc! {"date": 1, "time": 1}),
            ("match_phase_idx", "phase", doc! {"phase": 1, "status": 1}),
            ("match_team_a_idx", "teamA", doc! {"teamA": 1}),
            ("match_team_b_idx", "teamB", doc! {"teamB": 1}),
        ];
        for (name, fields, keys) in indexes {
            let model = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(Some(name.to_owned())).build())
                .build();
            matches
                .create_index(model)
                .await
                .map_err(|source| MongoDaoError::EnsureIndex {
                    collection: MATCH_COLLECTION_NAME,
                    index: fields,
                    source,
                })?;
        }

        Ok(())
    }

    async fn database(&self) -> Database {
        self.inner.state.read().await.database.clone()
    }

    async fn client(&self) -> Client {
        self.inner.state.read().await.client.clone()
    }

    async fn team_collection(&self) -> Collection<MongoTeamDocument> {
        self.database()
            .await
            .collection::<MongoTeamDocument>(TEAM_COLLECTION_NAME)
    }

    async fn match_collection(&self) -> Collection<MongoMatchDocument> {
        self.database()
            .await
            .collection::<MongoMatchDocument>(MATCH_COLLECTION_NAME)
    }

    async fn insert_team(&self, team: TeamEntity) -> MongoResult<()> {
        let id = team.id;
        let name = team.name.clone();
        let document: MongoTeamDocument = team.into();
        self.team_collection()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| {
                if is_duplicate_key(&source) {
                    MongoDaoError::DuplicateTeamName { name }
                } else {
                    MongoDaoError::SaveTeam { id, source }
                }
            })?;
        Ok(())
    }

    async fn update_team_profile(
        &self,
        id: Uuid,
        update: TeamProfileUpdate,
    ) -> MongoResult<Option<TeamEntity>> {
        let mut set = doc! { "updatedAt": DateTime::from_system_time(SystemTime::now()) };
        if let Some(name) = &update.name {
            set.insert("name", name.as_str());
        }
        if let Some(group) = &update.group {
            set.insert("group", group.as_str());
        }
        if let Some(captain_name) = update.captain_name.clone() {
            set.insert("captainName", optional_string(captain_name));
        }
        if let Some(image) = update.image.clone() {
            set.insert("image", optional_string(image));
        }

        let updated = self
            .team_collection()
            .await
            .find_one_and_update(doc_id(id), doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| match update.name {
                Some(name) if is_duplicate_key(&source) => {
                    MongoDaoError::DuplicateTeamName { name }
                }
                _ => MongoDaoError::SaveTeam { id, source },
            })?;

        updated.map(TeamEntity::try_from).transpose()
    }

    async fn find_team(&self, id: Uuid) -> MongoResult<Option<TeamEntity>> {
        self.team_collection()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadTeam { id, source })?
            .map(TeamEntity::try_from)
            .transpose()
    }

    async fn find_teams_matching(&self, filter: Document) -> MongoResult<Vec<TeamEntity>> {
        let documents: Vec<MongoTeamDocument> = self
            .team_collection()
            .await
            .find(filter)
            .await
            .map_err(|source| MongoDaoError::ListTeams { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListTeams { source })?;

        documents.into_iter().map(TeamEntity::try_from).collect()
    }

    async fn delete_team(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .team_collection()
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteTeam { id, source })?;
        Ok(result.deleted_count > 0)
    }

    async fn insert_match(&self, entity: MatchEntity) -> MongoResult<()> {
        let id = entity.id;
        let document: MongoMatchDocument = entity.into();
        self.match_collection()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveMatch { id, source })?;
        Ok(())
    }

    async fn find_match(&self, id: Uuid) -> MongoResult<Option<MatchEntity>> {
        self.match_collection()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadMatch { id, source })?
            .map(MatchEntity::try_from)
            .transpose()
    }

    async fn list_matches(&self, filter: MatchFilter) -> MongoResult<Vec<MatchEntity>> {
        let documents: Vec<MongoMatchDocument> = self
            .match_collection()
            .await
            .find(match_filter_document(&filter))
            .await
            .map_err(|source| MongoDaoError::ListMatches { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListMatches { source })?;

        documents.into_iter().map(MatchEntity::try_from).collect()
    }

    async fn delete_match(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .match_collection()
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteMatch { id, source })?;
        Ok(result.deleted_count > 0)
    }

    async fn commit(&self, batch: WriteBatch) -> MongoResult<()> {
        let client = self.client().await;
        let database = self.database().await;

        let mut session = client
            .start_session()
            .await
            .map_err(|source| MongoDaoError::Transaction {
                stage: "start a session",
                source,
            })?;
        session
            .start_transaction()
            .await
            .map_err(|source| MongoDaoError::Transaction {
                stage: "start the transaction",
                source,
            })?;

        match apply_batch(&database, &mut session, batch).await {
            Ok(()) => session
                .commit_transaction()
                .await
                .map_err(|source| MongoDaoError::Transaction {
                    stage: "commit",
                    source,
                }),
            Err(err) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    warn!(error = %abort_err, "failed to abort MongoDB transaction");
                }
                Err(err)
            }
        }
    }
}

/// Run every write of `batch` within the transaction bound to `session`.
async fn apply_batch(
    database: &Database,
    session: &mut ClientSession,
    batch: WriteBatch,
) -> MongoResult<()> {
    let matches = database.collection::<MongoMatchDocument>(MATCH_COLLECTION_NAME);
    for write in batch.matches {
        let id = write.entity.id;
        let mut filter = doc_id(id);
        if let Some(expected) = write.expected_status {
            filter.insert("status", expected.as_str());
        }
        let document: MongoMatchDocument = write.entity.into();
        let result = matches
            .replace_one(filter, &document)
            .session(&mut *session)
            .await
            .map_err(|source| MongoDaoError::SaveMatch { id, source })?;
        if result.matched_count == 0 {
            return Err(MongoDaoError::StaleWrite {
                collection: MATCH_COLLECTION_NAME,
                id,
            });
        }
    }

    let teams = database.collection::<MongoTeamDocument>(TEAM_COLLECTION_NAME);
    for write in batch.team_stats {
        let id = write.team_id;
        let result = teams
            .update_one(doc_id(id), stats_update(&write))
            .session(&mut *session)
            .await
            .map_err(|source| MongoDaoError::SaveTeam { id, source })?;
        if result.matched_count == 0 {
            return Err(MongoDaoError::StaleWrite {
                collection: TEAM_COLLECTION_NAME,
                id,
            });
        }
    }

    Ok(())
}

fn match_filter_document(filter: &MatchFilter) -> Document {
    let mut document = Document::new();
    if let Some(date) = &filter.date {
        document.insert("date", date.as_str());
    }
    if let Some(phase) = filter.phase {
        document.insert("phase", phase.as_code());
    }
    if let Some(status) = filter.status {
        document.insert("status", status.as_str());
    }
    if let Some(team) = filter.team {
        let team = team.to_string();
        document.insert(
            "$or",
            vec![doc! {"teamA": team.as_str()}, doc! {"teamB": team.as_str()}],
        );
    }
    document
}

fn optional_string(value: Option<String>) -> Bson {
    value.map(Bson::String).unwrap_or(Bson::Null)
}

fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

impl TournamentStore for MongoTournamentStore {
    fn insert_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_team(team).await.map_err(Into::into) })
    }

    fn update_team_profile(
        &self,
        id: Uuid,
        update: TeamProfileUpdate,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .update_team_profile(id, update)
                .await
                .map_err(Into::into)
        })
    }

    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_team(id).await.map_err(Into::into) })
    }

    fn find_teams(&self, ids: Vec<Uuid>) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
            store
                .find_teams_matching(doc! {"_id": {"$in": ids}})
                .await
                .map_err(Into::into)
        })
    }

    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_teams_matching(doc! {}).await.map_err(Into::into) })
    }

    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_team(id).await.map_err(Into::into) })
    }

    fn insert_match(&self, entity: MatchEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_match(entity).await.map_err(Into::into) })
    }

    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_match(id).await.map_err(Into::into) })
    }

    fn list_matches(
        &self,
        filter: MatchFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_matches(filter).await.map_err(Into::into) })
    }

    fn delete_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_match(id).await.map_err(Into::into) })
    }

    fn commit(&self, batch: WriteBatch) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.commit(batch).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}
