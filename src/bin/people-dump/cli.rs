use anyhow::Result;
use clap::Parser;
use people_repo::config::{COLLECTION_VAR, DB_NAME_VAR, MONGO_URL_VAR};
use people_repo::Config;

/// Print every document in the people collection
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// MongoDB connection string [default: $Mongo_URL]
    #[arg(long)]
    pub mongo_url: Option<String>,

    /// Database name [default: $dbName]
    #[arg(long)]
    pub db_name: Option<String>,

    /// Collection holding the people documents [default: $Collection]
    #[arg(long)]
    pub collection: Option<String>,

    /// Print one pretty JSON array instead of one document per line
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

impl Cli {
    /// Environment configuration with any flags given on the command line on top.
    pub fn config(&self) -> Result<Config> {
        Config::from_env_with(|key| match key {
            MONGO_URL_VAR => self.mongo_url.clone(),
            DB_NAME_VAR => self.db_name.clone(),
            COLLECTION_VAR => self.collection.clone(),
            _ => None,
        })
    }
}
