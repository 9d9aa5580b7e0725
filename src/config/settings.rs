use std::collections::BTreeMap;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::config::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub catalogue: CatalogueSettings,
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub groups: BTreeMap<String, GroupEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueSettings {
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default = "default_catalogue_timeout")]
    pub timeout_secs: u64,
}

impl Default for CatalogueSettings {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            timeout_secs: default_catalogue_timeout(),
        }
    }
}

impl CatalogueSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutSettings {
    #[serde(default = "default_layout_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_stages")]
    pub stages: Vec<StageEntry>,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_layout_timeout(),
            stages: default_stages(),
        }
    }
}

impl LayoutSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StageEntry {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupEntry {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub packages: Option<Vec<String>>,
    #[serde(default)]
    pub pattern: Option<String>,
}

/// Where the members of a configured group come from.
#[derive(Debug, Clone)]
pub enum GroupSource {
    /// Every package of another system.
    Target(String),
    /// Named packages of the graphed catalogue.
    Packages(Vec<String>),
    /// Packages of the graphed catalogue whose name matches.
    Pattern(Regex),
}

impl GroupEntry {
    pub fn source(&self, group: &str) -> Result<GroupSource, ConfigError> {
        match (&self.target, &self.packages, &self.pattern) {
            (Some(target), None, None) => Ok(GroupSource::Target(target.clone())),
            (None, Some(packages), None) => Ok(GroupSource::Packages(packages.clone())),
            (None, None, Some(pattern)) => Regex::new(pattern)
                .map(GroupSource::Pattern)
                .map_err(|source| ConfigError::InvalidPattern {
                    group: group.to_string(),
                    source,
                }),
            _ => Err(ConfigError::InvalidGroup {
                group: group.to_string(),
            }),
        }
    }
}

fn default_engine() -> String {
    "podman".to_string()
}

fn default_catalogue_timeout() -> u64 {
    300
}

fn default_layout_timeout() -> u64 {
    600
}

fn default_stages() -> Vec<StageEntry> {
    let stage = |program: &str, args: &[&str]| StageEntry {
        program: program.to_string(),
        args: args.iter().map(|arg| arg.to_string()).collect(),
    };
    vec![
        stage(
            "sfdp",
            &["-Goverlap=prism", "-Goutputorder=edgesfirst", "-Gsize=60,60!"],
        ),
        stage("gvmap", &["-e"]),
        stage("neato", &["-n2", "-Ecolor=#44444455", "-Tsvg"]),
    ]
}
