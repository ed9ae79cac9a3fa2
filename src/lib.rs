pub mod api;
pub mod args;
pub mod error;
pub mod ini;
pub mod locale;
pub mod logging;
pub mod record;
pub mod scanner;
pub mod writer;

use anyhow::{anyhow, Context, Result};

use api::ApiClient;
use args::{Config, Mode};
use record::CollectionRecord;
use scanner::read_local_collections;
use writer::{WriteStats, Writer};

/// Gather the collection records for the configured acquisition mode.
pub fn acquire(config: &Config) -> Result<Vec<CollectionRecord>> {
    match config.mode {
        Mode::Local => read_local_collections(config),
        Mode::Api => {
            let url = config
                .api_url
                .as_deref()
                .ok_or_else(|| anyhow!("API mode needs an API base URL"))?;
            println!("Listing collections via {}", url);
            let records = ApiClient::new(url)?
                .list_collections()
                .context("Failed to list collections via the web API")?;
            println!("Found {} collections", records.len());
            Ok(records)
        }
    }
}

/// Run a whole export and return what was written.
pub fn run(config: &Config) -> Result<WriteStats> {
    let records = acquire(config)?;

    let mut writer = Writer::new(config)?;
    writer.write_all(&records)?;
    writer.print_summary();

    println!();
    println!("Collection data written to {}", config.output_dir.display());
    Ok(writer.stats().clone())
}
