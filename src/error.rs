use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum DepvizError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("unresolved graph reference '{name}' (required by '{from}')")]
    UnresolvedReference { name: String, from: String },
    #[error("package '{package}' is claimed by both group '{first}' and group '{second}'")]
    OverlappingGroups {
        package: String,
        first: String,
        second: String,
    },
    #[error("group name '{0}' collides with a package of the same name")]
    GroupNameCollision(String),
    #[error("group '{0}' is supplied more than once")]
    DuplicateGroup(String),
    #[error("catalogue record '{key}' names a different package '{name}'")]
    CatalogueKeyMismatch { key: String, name: String },
    #[error("unknown graph node '{0}'")]
    UnknownNode(String),
    #[error("invalid target '{0}'")]
    InvalidTarget(String),
    #[error("invalid group '{0}', expected NAME=TARGET")]
    InvalidGroupSpec(String),
    #[error("{stage} failed: {message}")]
    Collaborator { stage: String, message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0:#}")]
    Other(#[from] anyhow::Error),
}

impl DepvizError {
    pub fn collaborator(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Collaborator {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DepvizError>;
