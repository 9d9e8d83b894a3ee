//! Lazily connected MongoDB repository for the `people` collection.
//!
//! A [`Repository`] owns its configuration and a [`Connector`]. The first call
//! to [`Repository::get_all_people`] opens the connection; every later call
//! reuses it.

pub mod config;
pub mod error;
pub mod mongo;
pub mod repository;

pub use config::Config;
pub use error::{BoxError, RepositoryError, SharedError};
pub use mongo::MongoConnector;
pub use repository::{Connector, DocumentStore, Repository};

/// Repository backed by the real MongoDB driver.
pub type MongoRepository = Repository<MongoConnector>;
