//! Application state management

use database::mongodb::{Client, Database, connect_from_config_with_retry};
use domain_products::InMemoryProductRepository;
use eyre::eyre;
use tracing::info;

use crate::config::{Config, StoreKind};

/// The products store chosen at startup.
#[derive(Clone)]
pub enum Store {
    Mongo { client: Client, db: Database },
    Memory(InMemoryProductRepository),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Store,
}

impl AppState {
    /// Open the configured store; MongoDB connections are retried with backoff.
    pub async fn connect(config: Config) -> eyre::Result<Self> {
        let store = match (config.store, &config.mongodb) {
            (StoreKind::Mongodb, Some(mongodb)) => {
                info!(database = %mongodb.database(), "Connecting to MongoDB");
                let client = connect_from_config_with_retry(mongodb, None).await?;
                let db = client.database(mongodb.database());
                Store::Mongo { client, db }
            }
            (StoreKind::Mongodb, None) => {
                return Err(eyre!("PRODUCTS_STORE=mongodb requires MongoDB configuration"));
            }
            (StoreKind::Memory, _) => {
                info!("Using in-memory product store");
                Store::Memory(InMemoryProductRepository::new())
            }
        };

        Ok(Self { config, store })
    }

    pub fn mongo_client(&self) -> Option<Client> {
        match &self.store {
            Store::Mongo { client, .. } => Some(client.clone()),
            Store::Memory(_) => None,
        }
    }
}
