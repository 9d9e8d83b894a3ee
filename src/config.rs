use anyhow::{Context, Result};
use std::env;

pub const MONGO_URL_VAR: &str = "Mongo_URL";
pub const DB_NAME_VAR: &str = "dbName";
pub const COLLECTION_VAR: &str = "Collection";

/// Connection settings, read once and never changed afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub mongo_url: String,
    pub db_name: String,
    pub collection: String,
}

impl Config {
    pub fn new(
        mongo_url: impl Into<String>,
        db_name: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Config {
            mongo_url: mongo_url.into(),
            db_name: db_name.into(),
            collection: collection.into(),
        }
    }

    /// Loads `.env` when present, then reads the three variables.
    ///
    /// Values are taken as-is; an empty string is not an error.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|_| None)
    }

    /// Like [`Config::from_env`], but a value returned by `overrides` wins
    /// over the environment for that variable.
    pub fn from_env_with<F>(overrides: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| overrides(key).or_else(|| env::var(key).ok()))
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key).with_context(|| format!("environment variable {} is not set", key))
        };

        Ok(Config {
            mongo_url: var(MONGO_URL_VAR)?,
            db_name: var(DB_NAME_VAR)?,
            collection: var(COLLECTION_VAR)?,
        })
    }
}
