//! Database connectors shared by the services in this workspace.
//!
//! Only MongoDB is wired up today; the retry helpers in [`common`] are
//! backend agnostic.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB client, config and health checks
//! - `config` - `core_config::FromEnv` support for [`mongodb::MongoConfig`]
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{self, MongoConfig};
//! use database::common::RetryConfig;
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "products");
//! let client = mongodb::connect_from_config_with_retry(&config, Some(RetryConfig::new())).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
