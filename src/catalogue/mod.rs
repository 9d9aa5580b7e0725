use std::path::PathBuf;

use crate::config::CatalogueSettings;
use crate::core::Catalogue;
use crate::error::{DepvizError, Result};

pub mod rpm;
pub mod runner;
pub mod snapshot;
pub mod traits;

pub use traits::CatalogueSource;

/// Where a catalogue is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Installed root of a host or mounted filesystem.
    Root(PathBuf),
    /// Container image reference.
    Image(String),
    /// Previously saved JSON catalogue.
    Snapshot(PathBuf),
}

impl Target {
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if let Some(path) = spec.strip_prefix("snapshot:") {
            return non_empty(spec, path).map(|path| Target::Snapshot(PathBuf::from(path)));
        }
        if let Some(path) = spec.strip_prefix("root:") {
            return non_empty(spec, path).map(|path| Target::Root(PathBuf::from(path)));
        }
        if let Some(image) = spec.strip_prefix("image:") {
            return non_empty(spec, image).map(|image| Target::Image(image.to_string()));
        }
        if spec.is_empty() {
            return Err(DepvizError::InvalidTarget(spec.to_string()));
        }

        let path = PathBuf::from(spec);
        if spec.ends_with(".json") {
            Ok(Target::Snapshot(path))
        } else if path.is_dir() {
            Ok(Target::Root(path))
        } else {
            Ok(Target::Image(spec.to_string()))
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Root(path) => write!(f, "root {}", path.display()),
            Target::Image(image) => write!(f, "image {image}"),
            Target::Snapshot(path) => write!(f, "snapshot {}", path.display()),
        }
    }
}

fn non_empty<'a>(spec: &str, value: &'a str) -> Result<&'a str> {
    if value.is_empty() {
        Err(DepvizError::InvalidTarget(spec.to_string()))
    } else {
        Ok(value)
    }
}

pub fn source_for(
    target: &Target,
    settings: &CatalogueSettings,
    jobs: Option<usize>,
) -> Box<dyn CatalogueSource> {
    match target {
        Target::Root(root) => Box::new(
            rpm::RpmSource::new(runner::HostRunner::new(root.clone(), settings.timeout()))
                .with_jobs(jobs),
        ),
        Target::Image(image) => Box::new(
            rpm::RpmSource::new(runner::ContainerRunner::new(
                settings.engine.clone(),
                image.clone(),
                settings.timeout(),
            ))
            .with_jobs(jobs),
        ),
        Target::Snapshot(path) => Box::new(snapshot::SnapshotSource::new(path.clone())),
    }
}

pub fn load_catalogue(
    target: &Target,
    settings: &CatalogueSettings,
    jobs: Option<usize>,
) -> Result<Catalogue> {
    source_for(target, settings, jobs).load()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::catalogue::{source_for, Target};
    use crate::config::CatalogueSettings;

    #[test]
    fn parses_explicit_prefixes() {
        assert_eq!(
            Target::parse("snapshot:base.txt").expect("snapshot"),
            Target::Snapshot(PathBuf::from("base.txt"))
        );
        assert_eq!(
            Target::parse("root:/mnt/sysroot").expect("root"),
            Target::Root(PathBuf::from("/mnt/sysroot"))
        );
        assert_eq!(
            Target::parse("image:fedora:36").expect("image"),
            Target::Image("fedora:36".to_string())
        );
    }

    #[test]
    fn infers_kind_without_prefix() {
        assert_eq!(
            Target::parse("catalogue.json").expect("snapshot"),
            Target::Snapshot(PathBuf::from("catalogue.json"))
        );
        let dir = std::env::temp_dir();
        assert_eq!(
            Target::parse(dir.to_str().expect("utf-8 temp dir")).expect("root"),
            Target::Root(dir.clone())
        );
        assert_eq!(
            Target::parse("registry.fedoraproject.org/fedora:36").expect("image"),
            Target::Image("registry.fedoraproject.org/fedora:36".to_string())
        );
    }

    #[test]
    fn rejects_empty_targets() {
        assert!(Target::parse("").is_err());
        assert!(Target::parse("root:").is_err());
        assert!(Target::parse("image:").is_err());
    }

    #[test]
    fn describes_selected_source() {
        let settings = CatalogueSettings {
            engine: "docker".to_string(),
            timeout_secs: 5,
        };
        let image = source_for(&Target::Image("fedora:36".to_string()), &settings, None);
        assert_eq!(image.describe(), "docker image fedora:36");
        let root = source_for(&Target::Root(PathBuf::from("/sysroot")), &settings, None);
        assert_eq!(root.describe(), "rpm database in /sysroot");
        let snapshot = source_for(&Target::Snapshot(PathBuf::from("a.json")), &settings, None);
        assert_eq!(snapshot.describe(), "snapshot a.json");
    }
}
