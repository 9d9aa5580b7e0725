use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::catalogue::traits::CatalogueSource;
use crate::core::Catalogue;
use crate::error::Result;

/// Catalogue saved earlier as a JSON object keyed by package name.
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CatalogueSource for SnapshotSource {
    fn describe(&self) -> String {
        format!("snapshot {}", self.path.display())
    }

    fn load(&self) -> Result<Catalogue> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read snapshot {}", self.path.display()))?;
        let catalogue = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse snapshot {}", self.path.display()))?;
        Ok(catalogue)
    }
}

pub fn snapshot_to_string(catalogue: &Catalogue) -> Result<String> {
    Ok(serde_json::to_string_pretty(catalogue)?)
}

pub fn save_snapshot(path: &Path, catalogue: &Catalogue) -> Result<()> {
    fs::write(path, snapshot_to_string(catalogue)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::catalogue::snapshot::{save_snapshot, SnapshotSource};
    use crate::catalogue::traits::CatalogueSource;
    use crate::core::{Catalogue, Package};

    fn unique_temp_path(prefix: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before unix epoch")
            .as_nanos();
        let pid = std::process::id();
        std::env::temp_dir().join(format!("depviz-{prefix}-{pid}-{nanos}.json"))
    }

    #[test]
    fn saved_snapshot_loads_back() {
        let path = unique_temp_path("snapshot-save");
        let mut bash = Package::new("bash", "0", "5.1.16", "2.fc36", "x86_64", 7800);
        bash.requires = vec!["/bin/sh".to_string()];
        bash.requires_resolved = vec!["bash".to_string()];
        let catalogue: Catalogue = vec![bash].into_iter().collect();

        save_snapshot(&path, &catalogue).expect("save snapshot");
        let loaded = SnapshotSource::new(path.clone())
            .load()
            .expect("load snapshot");

        assert_eq!(loaded, catalogue);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn loads_hand_written_snapshot_with_missing_fields() {
        let path = unique_temp_path("snapshot-minimal");
        fs::write(
            &path,
            r#"{"A": {"name": "A", "size": 10, "requires_resolved": ["B"]}, "B": {"name": "B"}}"#,
        )
        .expect("write snapshot");

        let loaded = SnapshotSource::new(path.clone())
            .load()
            .expect("load snapshot");

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("A").expect("A").requires_resolved, vec!["B"]);
        assert_eq!(loaded.get("B").expect("B").size, 0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn reports_unreadable_snapshot() {
        let path = unique_temp_path("snapshot-missing");
        let err = SnapshotSource::new(path).load().expect_err("missing file");
        assert!(err.to_string().contains("failed to read snapshot"));
    }

    #[test]
    fn rejects_snapshot_record_stored_under_another_name() {
        let path = unique_temp_path("snapshot-mismatch");
        fs::write(
            &path,
            r#"{"a": {"name": "b", "size": 1}, "b": {"name": "b", "size": 2}}"#,
        )
        .expect("write snapshot");

        let err = SnapshotSource::new(path.clone())
            .load()
            .expect_err("mismatched record");
        let message = err.to_string();
        assert!(message.contains("failed to parse snapshot"), "{message}");
        assert!(
            message.contains("catalogue record 'a' names a different package 'b'"),
            "{message}"
        );
        let _ = fs::remove_file(&path);
    }
}
