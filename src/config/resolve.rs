use std::env;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, Settings};

pub const CONFIG_FILE_NAME: &str = ".depviz.toml";

/// Loads settings from `--config`, then `DEPVIZ_CONFIG`, then the nearest
/// `.depviz.toml` above `start`. No file at all means defaults.
pub fn load_settings(
    start: impl AsRef<Path>,
    config_path: Option<PathBuf>,
) -> Result<Settings, ConfigError> {
    let env_path = env::var_os("DEPVIZ_CONFIG").map(PathBuf::from);
    let mut settings = match resolve_config_path(start.as_ref(), config_path, env_path) {
        Some(path) => load_settings_file(&path)?,
        None => Settings::default(),
    };
    apply_env_overrides(&mut settings);
    Ok(settings)
}

pub fn resolve_config_path(
    start: &Path,
    config_path: Option<PathBuf>,
    env_path: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(config) = config_path {
        return Some(config);
    }

    if let Some(config) = env_path {
        return Some(config);
    }

    find_config_from(start)
}

pub fn load_settings_file(path: &Path) -> Result<Settings, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(engine) = env::var("DEPVIZ_CONTAINER_ENGINE") {
        if !engine.is_empty() {
            settings.catalogue.engine = engine;
        }
    }
}

fn find_config_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|ancestor| ancestor.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}
