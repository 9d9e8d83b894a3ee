use async_trait::async_trait;
use bson::Document;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, error};

use crate::config::Config;
use crate::error::{BoxError, RepositoryError, SharedError};

/// Opens a handle to the document store.
#[async_trait]
pub trait Connector: Send + Sync {
    type Store: DocumentStore;

    async fn connect(&self, url: &str, db_name: &str) -> Result<Self::Store, BoxError>;
}

/// An open database session.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in `collection`, in whatever order the store returns them.
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, BoxError>;

    async fn close(self)
    where
        Self: Sized,
    {
    }
}

/// Reads the configured collection through a connection opened on first use.
pub struct Repository<C: Connector> {
    config: Config,
    connector: C,
    store: OnceCell<C::Store>,
    /// Held for the whole connection attempt; keeps the last failure.
    connecting: Mutex<Option<SharedError>>,
    failed_attempts: AtomicU64,
}

impl<C: Connector> Repository<C> {
    pub fn new(config: Config, connector: C) -> Self {
        Repository {
            config,
            connector,
            store: OnceCell::new(),
            connecting: Mutex::new(None),
            failed_attempts: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.store.initialized()
    }

    pub async fn get_all_people(&self) -> Result<Vec<Document>, RepositoryError> {
        let store = self.ensure_connected().await?;
        let people = store
            .find_all(&self.config.collection)
            .await
            .map_err(RepositoryError::Query)?;
        debug!(
            collection = %self.config.collection,
            count = people.len(),
            "fetched people"
        );
        Ok(people)
    }

    /// Shuts the connection down if one was opened.
    pub async fn close(self) {
        if let Some(store) = self.store.into_inner() {
            debug!(db = %self.config.db_name, "closing database connection");
            store.close().await;
        }
    }

    // Callers that queued behind a failed attempt get its error instead of
    // trying again. A call that starts after the failure retries.
    async fn ensure_connected(&self) -> Result<&C::Store, RepositoryError> {
        if let Some(store) = self.store.get() {
            return Ok(store);
        }

        let seen = self.failed_attempts.load(Ordering::SeqCst);
        let mut last_failure = self.connecting.lock().await;

        if let Some(store) = self.store.get() {
            return Ok(store);
        }
        if self.failed_attempts.load(Ordering::SeqCst) != seen {
            if let Some(source) = last_failure.as_ref() {
                return Err(RepositoryError::Connection {
                    source: Arc::clone(source),
                });
            }
        }

        debug!(db = %self.config.db_name, "opening database connection");
        match self
            .connector
            .connect(&self.config.mongo_url, &self.config.db_name)
            .await
        {
            Ok(store) => {
                *last_failure = None;
                Ok(self.store.get_or_init(|| async { store }).await)
            }
            Err(err) => {
                error!(error = %err, "connection to MongoDB failed");
                let source: SharedError = Arc::from(err);
                *last_failure = Some(Arc::clone(&source));
                self.failed_attempts.fetch_add(1, Ordering::SeqCst);
                Err(RepositoryError::Connection { source })
            }
        }
    }
}
