use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::args::Config;
use crate::ini::read_thumbnail_path;
use crate::locale::read_locale_text;
use crate::record::{is_safe_alias, CollectionRecord};

/// Prefix CONTENTdm puts in front of every collection configuration directory.
pub const COLLECTION_DIR_PREFIX: &str = "coll_";

/// Name of the fallback configuration that is not a real collection.
pub const DEFAULT_COLLECTION_DIR_NAME: &str = "default";

/// A collection configuration directory found on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDir {
    pub alias: String,
    pub path: PathBuf,
}

impl CollectionDir {
    pub fn locale_file(&self) -> PathBuf {
        self.path
            .join("resources")
            .join("languages")
            .join(format!("cdm_language_coll_{}.xml", self.alias))
    }

    pub fn ini_file(&self) -> PathBuf {
        self.path.join("config").join("cdm_collection.ini")
    }
}

/// Strip the collection prefix once; names without it are kept whole.
pub fn alias_from_dir_name(name: &str) -> &str {
    name.strip_prefix(COLLECTION_DIR_PREFIX).unwrap_or(name)
}

/// List the collection directories directly under `base_dir`, sorted by name.
pub fn scan_collections(base_dir: &Path) -> Result<Vec<CollectionDir>> {
    // Surface an unreadable base directory as a hard error before walking.
    fs::read_dir(base_dir).with_context(|| {
        format!(
            "Failed to read collection directory: {}",
            base_dir.display()
        )
    })?;

    let mut collections = Vec::new();

    for entry_result in WalkDir::new(base_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                match err.path() {
                    Some(path) => tracing::warn!("Failed to access {}: {}", path.display(), err),
                    None => tracing::warn!("Directory walk error: {}", err),
                }
                continue;
            }
        };

        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::warn!("Skipping non UTF-8 directory name: {}", path.display());
            continue;
        };

        if name == DEFAULT_COLLECTION_DIR_NAME {
            tracing::debug!("Skipping fallback configuration {}", path.display());
            continue;
        }

        let alias = alias_from_dir_name(name);
        if !is_safe_alias(alias) {
            tracing::warn!("Skipping {}: unusable alias {:?}", path.display(), alias);
            continue;
        }

        collections.push(CollectionDir {
            alias: alias.to_string(),
            path: path.to_path_buf(),
        });
    }

    Ok(collections)
}

/// Build one four-field record per collection directory.
///
/// Missing or broken locale and ini files leave empty fields behind; only
/// an unreadable base directory stops the run.
pub fn read_local_collections(config: &Config) -> Result<Vec<CollectionRecord>> {
    println!(
        "Scanning collection directory: {}",
        config.collection_dir.display()
    );
    let dirs = scan_collections(&config.collection_dir)?;
    println!("Found {} collections", dirs.len());

    Ok(dirs
        .iter()
        .map(|dir| read_local_collection(dir, &config.locale))
        .collect())
}

pub fn read_local_collection(dir: &CollectionDir, locale: &str) -> CollectionRecord {
    let text = read_locale_text(&dir.locale_file(), locale);
    let thumbnail = read_thumbnail_path(&dir.ini_file());
    CollectionRecord::from_local(&dir.alias, text.title, text.description, thumbnail)
}
