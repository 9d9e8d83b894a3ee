mod cli;

use crate::cli::Cli;
use anyhow::Result;
use bson::{Bson, Document};
use clap::Parser;
use people_repo::{Connector, MongoConnector, Repository};
use std::io::{self, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Cli::parse();
    let repo = Repository::new(args.config()?, MongoConnector::with_app_name("people-dump"));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    dump(repo, args.pretty, &mut out).await
}

/// Writes every person to `out`, closing the repository whether or not that worked.
async fn dump<C, W>(repo: Repository<C>, pretty: bool, out: &mut W) -> Result<()>
where
    C: Connector,
    W: Write,
{
    let result = match repo.get_all_people().await {
        Ok(people) => {
            info!(count = people.len(), collection = %repo.config().collection, "fetched people");
            write_people(people, pretty, out)
        }
        Err(e) => Err(e.into()),
    };

    repo.close().await;
    result
}

fn write_people<W: Write>(people: Vec<Document>, pretty: bool, out: &mut W) -> Result<()> {
    let json: Vec<serde_json::Value> = people
        .into_iter()
        .map(|doc| Bson::Document(doc).into_relaxed_extjson())
        .collect();

    if pretty {
        serde_json::to_writer_pretty(&mut *out, &json)?;
        writeln!(out)?;
    } else {
        for value in &json {
            serde_json::to_writer(&mut *out, value)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bson::doc;
    use people_repo::{BoxError, Config, DocumentStore};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubConnector {
        docs: Vec<Document>,
        fail_query: bool,
        closes: Arc<AtomicUsize>,
    }

    struct StubStore {
        docs: Vec<Document>,
        fail_query: bool,
        closes: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Connector for StubConnector {
        type Store = StubStore;

        async fn connect(&self, _url: &str, _db_name: &str) -> Result<StubStore, BoxError> {
            Ok(StubStore {
                docs: self.docs.clone(),
                fail_query: self.fail_query,
                closes: self.closes.clone(),
            })
        }
    }

    #[async_trait]
    impl DocumentStore for StubStore {
        async fn find_all(&self, _collection: &str) -> Result<Vec<Document>, BoxError> {
            if self.fail_query {
                return Err("collection dropped".into());
            }
            Ok(self.docs.clone())
        }

        async fn close(self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn repo(
        docs: Vec<Document>,
        fail_query: bool,
    ) -> (Repository<StubConnector>, Arc<AtomicUsize>) {
        let closes = Arc::new(AtomicUsize::new(0));
        let connector = StubConnector {
            docs,
            fail_query,
            closes: closes.clone(),
        };
        let config = Config::new("mongodb://localhost:27017", "directory", "people");
        (Repository::new(config, connector), closes)
    }

    #[tokio::test]
    async fn prints_one_document_per_line_and_closes() {
        let (repo, closes) = repo(vec![doc! { "name": "A" }, doc! { "name": "B" }], false);
        let mut out = Vec::new();

        dump(repo, false, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "{\"name\":\"A\"}\n{\"name\":\"B\"}\n");
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn closes_even_when_the_read_fails() {
        let (repo, closes) = repo(vec![], true);
        let mut out = Vec::new();

        let err = dump(repo, false, &mut out).await.unwrap_err();

        assert_eq!(err.to_string(), "collection dropped");
        assert!(out.is_empty());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }
}
