use std::time::Duration;

use mongodb::{Client, Database, bson::doc, options::ClientOptions};
use tokio::time::sleep;
use tracing::debug;

use super::error::{MongoDaoError, MongoResult};

/// Backoff applied while waiting for the first successful ping.
struct PingBackoff {
    attempts: u32,
    delay: Duration,
}

impl PingBackoff {
    const MAX_ATTEMPTS: u32 = 10;
    const MAX_DELAY: Duration = Duration::from_secs(5);

    fn new() -> Self {
        Self {
            attempts: 0,
            delay: Duration::from_millis(250),
        }
    }

    /// Record a failed attempt; `false` once the budget is spent.
    fn register_failure(&mut self) -> bool {
        self.attempts += 1;
        self.attempts < Self::MAX_ATTEMPTS
    }

    async fn wait(&mut self) {
        sleep(self.delay).await;
        self.delay = (self.delay * 2).min(Self::MAX_DELAY);
    }
}

/// Live client plus the database handle the store works against.
pub struct Connection {
    pub client: Client,
    pub database: Database,
}

/// Build a client and wait until the server answers a ping.
pub async fn establish_connection(
    options: &ClientOptions,
    database_name: &str,
) -> MongoResult<Connection> {
    let client = Client::with_options(options.clone())
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(database_name);

    let mut backoff = PingBackoff::new();
    while let Err(source) = database.run_command(doc! { "ping": 1 }).await {
        if !backoff.register_failure() {
            return Err(MongoDaoError::InitialPing {
                attempts: backoff.attempts,
                source,
            });
        }
        debug!(attempts = backoff.attempts, error = %source, "MongoDB not reachable yet");
        backoff.wait().await;
    }

    Ok(Connection { client, database })
}
