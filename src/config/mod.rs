pub mod resolve;
pub mod settings;

pub use settings::{
    CatalogueSettings, GroupEntry, GroupSource, LayoutSettings, Settings, StageEntry,
};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("group '{group}' must set exactly one of target, packages or pattern")]
    InvalidGroup { group: String },
    #[error("invalid pattern for group '{group}': {source}")]
    InvalidPattern {
        group: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
