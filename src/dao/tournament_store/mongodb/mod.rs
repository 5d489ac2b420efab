mod config;
mod connection;
mod error;
mod models;
mod store;

pub use config::MongoConfig;
pub use store::MongoTournamentStore;

use error::MongoDaoError;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        match err {
            MongoDaoError::DuplicateTeamName { .. } | MongoDaoError::StaleWrite { .. } => {
                StorageError::conflict(err.to_string())
            }
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
