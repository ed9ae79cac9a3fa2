use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ExportError;

pub const DEFAULT_COLLECTION_DIR: &str =
    "/usr/local/Content6/Website/public_html/ui/custom/default/collection";
pub const DEFAULT_PUBLIC_HTML_DIR: &str = "/usr/local/Content6/Website/public_html";
pub const DEFAULT_OUTPUT_DIR: &str = "/tmp/collections";
pub const DEFAULT_LOCALE: &str = "en_US";

/// Where collection records come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Parse the configuration files on the CONTENTdm server itself
    Local,
    /// Ask the CONTENTdm web API (alias and title only)
    Api,
}

/// Command line surface. Every option can also come from the environment
/// or from a TOML file given with `--config`.
#[derive(Debug, Parser)]
#[command(
    name = "cdm_collections",
    version,
    about = "Export CONTENTdm collection metadata for migration"
)]
pub struct Args {
    /// Acquisition mode
    #[arg(long, value_enum, env = "CDM_MODE")]
    pub mode: Option<Mode>,

    /// Directory holding the coll_<alias> configuration directories
    #[arg(long, env = "CDM_COLLECTION_DIR")]
    pub collection_dir: Option<PathBuf>,

    /// Web root that thumbnail paths are relative to
    #[arg(long, env = "CDM_PUBLIC_HTML_DIR")]
    pub public_html_dir: Option<PathBuf>,

    /// Locale used to pick titles and descriptions
    #[arg(long, env = "CDM_LOCALE")]
    pub locale: Option<String>,

    /// CONTENTdm web API base URL, e.g. http://cdm.example.com:81
    #[arg(long, env = "CDM_API_URL")]
    pub api_url: Option<String>,

    /// Output directory
    #[arg(
        short = 'o',
        long = "output-dir",
        visible_alias = "output-directory",
        env = "CDM_OUTPUT_DIR"
    )]
    pub output_dir: Option<PathBuf>,

    /// Also store each collection's field configuration as CDMFIELDINFO.json
    #[arg(long, env = "CDM_FIELD_INFO")]
    pub field_info: bool,

    /// TOML file with any of the options above
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Contents of the optional TOML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub mode: Option<Mode>,
    pub collection_dir: Option<PathBuf>,
    pub public_html_dir: Option<PathBuf>,
    pub locale: Option<String>,
    pub api_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub field_info: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

/// Fully resolved, immutable run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub collection_dir: PathBuf,
    pub public_html_dir: PathBuf,
    pub locale: String,
    pub api_url: Option<String>,
    pub output_dir: PathBuf,
    pub field_info: bool,
}

impl Args {
    /// Merge command line, config file and defaults, then validate.
    pub fn resolve(self) -> Result<Config> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(merge(self, file)?)
    }
}

fn merge(args: Args, file: FileConfig) -> std::result::Result<Config, ExportError> {
    let api_url = args
        .api_url
        .or(file.api_url)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    // An API URL on its own means the operator has no shell access.
    let mode = match args.mode.or(file.mode) {
        Some(mode) => mode,
        None if api_url.is_some() && !args.field_info && file.field_info != Some(true) => {
            Mode::Api
        }
        None => Mode::Local,
    };

    let config = Config {
        mode,
        collection_dir: args
            .collection_dir
            .or(file.collection_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_COLLECTION_DIR)),
        public_html_dir: args
            .public_html_dir
            .or(file.public_html_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_HTML_DIR)),
        locale: args
            .locale
            .or(file.locale)
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
        api_url,
        output_dir: args
            .output_dir
            .or(file.output_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        field_info: args.field_info || file.field_info.unwrap_or(false),
    };

    config.validate()?;
    Ok(config)
}

impl Config {
    fn validate(&self) -> std::result::Result<(), ExportError> {
        if self.mode == Mode::Api && self.api_url.is_none() {
            return Err(ExportError::Config(
                "api mode requires --api-url".to_string(),
            ));
        }
        if self.field_info && self.api_url.is_none() {
            return Err(ExportError::Config(
                "--field-info requires --api-url".to_string(),
            ));
        }
        if self.locale.trim().is_empty() {
            return Err(ExportError::Config("locale must not be empty".to_string()));
        }
        Ok(())
    }
}
