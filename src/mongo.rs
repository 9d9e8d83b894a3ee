// src/mongo.rs
use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use tracing::debug;

use crate::error::BoxError;
use crate::repository::{Connector, DocumentStore};

/// Connects with the official MongoDB driver.
#[derive(Clone, Debug, Default)]
pub struct MongoConnector {
    app_name: Option<String>,
}

impl MongoConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app_name(app_name: impl Into<String>) -> Self {
        MongoConnector {
            app_name: Some(app_name.into()),
        }
    }
}

#[async_trait]
impl Connector for MongoConnector {
    type Store = Database;

    async fn connect(&self, url: &str, db_name: &str) -> Result<Database, BoxError> {
        let mut client_options = ClientOptions::parse(url).await?;
        if self.app_name.is_some() {
            client_options.app_name = self.app_name.clone();
        }
        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // The driver connects lazily; ping so an unreachable server fails here.
        db.run_command(doc! { "ping": 1 }).await?;
        debug!(db = db_name, "connected to MongoDB");

        Ok(db)
    }
}

#[async_trait]
impl DocumentStore for Database {
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, BoxError> {
        let cursor = self.collection::<Document>(collection).find(doc! {}).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs)
    }

    async fn close(self) {
        self.client().clone().shutdown().await;
    }
}
