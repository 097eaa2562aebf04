//! Configuration for Products API

use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_parse, server::ServerConfig};
use database::mongodb::MongoConfig;
use strum::{Display, EnumString};

pub use core_config::Environment;

/// Backing store for products, from `PRODUCTS_STORE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreKind {
    #[default]
    #[strum(to_string = "mongodb", serialize = "mongo")]
    Mongodb,
    Memory,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: StoreKind,
    /// Only loaded, and only required, for the MongoDB store
    pub mongodb: Option<MongoConfig>,
}

impl FromEnv for Config {
    fn from_env() -> Result<Self, ConfigError> {
        let store: StoreKind = env_parse("PRODUCTS_STORE", StoreKind::default())?;
        let mongodb = match store {
            StoreKind::Mongodb => Some(MongoConfig::from_env()?),
            StoreKind::Memory => None,
        };

        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            store,
            mongodb,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_needs_no_mongodb() {
        temp_env::with_vars(
            [
                ("PRODUCTS_STORE", Some("memory")),
                ("MONGODB_URL", None),
                ("MONGO_URL", None),
                ("PORT", Some("3000")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.store, StoreKind::Memory);
                assert!(config.mongodb.is_none());
                assert_eq!(config.server.port, 3000);
                assert_eq!(config.app.name, "products_api");
            },
        );
    }

    #[test]
    fn test_mongodb_store_is_default_and_requires_url() {
        temp_env::with_vars(
            [
                ("PRODUCTS_STORE", None::<&str>),
                ("MONGODB_URL", None),
                ("MONGO_URL", None),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(matches!(err, ConfigError::MissingEnvVar(_)));
            },
        );
    }

    #[test]
    fn test_mongodb_store_loads_mongo_config() {
        temp_env::with_vars(
            [
                ("PRODUCTS_STORE", Some("MongoDB")),
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("shop")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.store, StoreKind::Mongodb);
                assert_eq!(config.mongodb.unwrap().database, "shop");
            },
        );
    }

    #[test]
    fn test_unknown_store_is_rejected() {
        temp_env::with_var("PRODUCTS_STORE", Some("postgres"), || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == "PRODUCTS_STORE"));
        });
    }
}
