use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::api::ApiClient;
use crate::args::Config;
use crate::record::{is_safe_alias, CollectionRecord};

/// Manifest file consumed by the migrator.
pub const MANIFEST_FILE_NAME: &str = "collection_data.tsv";

/// Per-collection field configuration snapshot.
pub const FIELD_INFO_FILE_NAME: &str = "CDMFIELDINFO.json";

pub struct Writer {
    output_dir: PathBuf,
    public_html_dir: PathBuf,
    field_info: Option<ApiClient>,
    stats: WriteStats,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteStats {
    pub records: usize,
    pub thumbnails_copied: usize,
    pub thumbnails_missing: usize,
    pub field_info_written: usize,
    pub field_info_failed: usize,
}

impl Writer {
    pub fn new(config: &Config) -> Result<Self> {
        let field_info = match (config.field_info, config.api_url.as_deref()) {
            (true, Some(url)) => Some(ApiClient::new(url)?),
            _ => None,
        };
        Self::with_field_info(&config.output_dir, &config.public_html_dir, field_info)
    }

    pub fn with_field_info(
        output_dir: &Path,
        public_html_dir: &Path,
        field_info: Option<ApiClient>,
    ) -> Result<Self> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

        Ok(Writer {
            output_dir: output_dir.to_path_buf(),
            public_html_dir: public_html_dir.to_path_buf(),
            field_info,
            stats: WriteStats::default(),
        })
    }

    pub fn stats(&self) -> &WriteStats {
        &self.stats
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(MANIFEST_FILE_NAME)
    }

    pub fn write_all(&mut self, records: &[CollectionRecord]) -> Result<()> {
        println!("Output directory: {}", self.output_dir.display());
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Export one collection. Only a failed manifest append is an error.
    pub fn write_record(&mut self, record: &CollectionRecord) -> Result<()> {
        if !is_safe_alias(&record.alias) {
            tracing::warn!("Skipping record with unusable alias {:?}", record.alias);
            return Ok(());
        }

        let collection_dir = self.output_dir.join(&record.alias);

        if record.field_count() > 2 {
            fs::create_dir_all(&collection_dir).with_context(|| {
                format!("Failed to create collection directory: {}", collection_dir.display())
            })?;
        }

        let mut record = record.clone();
        if let Some(thumbnail) = record.thumbnail().map(str::to_string) {
            match self.copy_thumbnail(&collection_dir, &thumbnail) {
                Ok(basename) => {
                    self.stats.thumbnails_copied += 1;
                    record = record.with_thumbnail(basename);
                }
                Err(e) => {
                    self.stats.thumbnails_missing += 1;
                    tracing::warn!("Thumbnail for {} not copied: {:#}", record.alias, e);
                    if let Some(basename) = basename_of(&thumbnail) {
                        record = record.with_thumbnail(basename);
                    }
                }
            }
        }

        if self.field_info.is_some() {
            self.write_field_info(&record.alias, &collection_dir);
        }

        self.append_manifest_line(&record)?;
        self.stats.records += 1;
        println!("✓ Exported: {}", record.alias);
        Ok(())
    }

    fn copy_thumbnail(&self, collection_dir: &Path, thumbnail: &str) -> Result<String> {
        let source = self.public_html_dir.join(thumbnail.trim_start_matches('/'));
        let basename =
            basename_of(thumbnail).ok_or_else(|| anyhow!("No file name in path {}", thumbnail))?;

        if !source.is_file() {
            anyhow::bail!("Source image {} does not exist", source.display());
        }

        let target = collection_dir.join(&basename);
        fs::copy(&source, &target)
            .with_context(|| format!("Failed to copy {} to {}", source.display(), target.display()))?;
        Ok(basename)
    }

    fn write_field_info(&mut self, alias: &str, collection_dir: &Path) {
        let Some(client) = &self.field_info else {
            return;
        };

        let body = match client.fetch_field_info(alias) {
            Ok(body) => body,
            Err(e) => {
                self.stats.field_info_failed += 1;
                tracing::warn!("Field info for {} not fetched: {}", alias, e);
                return;
            }
        };
        if body.trim().is_empty() {
            return;
        }

        let target = collection_dir.join(FIELD_INFO_FILE_NAME);
        let written = fs::create_dir_all(collection_dir).and_then(|()| fs::write(&target, body));
        match written {
            Ok(()) => self.stats.field_info_written += 1,
            Err(e) => {
                self.stats.field_info_failed += 1;
                tracing::warn!("Failed to write {}: {}", target.display(), e);
            }
        }
    }

    // Opened per record so an interrupted run still leaves complete lines.
    fn append_manifest_line(&self, record: &CollectionRecord) -> Result<()> {
        let path = self.manifest_path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open manifest: {}", path.display()))?;
        file.write_all(record.to_tsv_line().as_bytes())
            .with_context(|| format!("Failed to append to manifest: {}", path.display()))
    }

    pub fn print_summary(&self) {
        let stats = &self.stats;

        println!();
        println!("=== EXPORT COMPLETE ===");
        println!("Collections written: {}", stats.records);
        println!("Thumbnails copied: {}", stats.thumbnails_copied);
        if stats.thumbnails_missing > 0 {
            println!("Thumbnails missing: {}", stats.thumbnails_missing);
        }
        if self.field_info.is_some() {
            println!("Field info files: {}", stats.field_info_written);
            if stats.field_info_failed > 0 {
                println!("Field info failures: {}", stats.field_info_failed);
            }
        }
    }
}

fn basename_of(path: &str) -> Option<String> {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
}
