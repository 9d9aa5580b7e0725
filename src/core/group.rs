use std::collections::BTreeSet;

use regex::Regex;
use serde::Serialize;

use crate::core::package::Catalogue;

/// A set of packages collapsed into a single graph node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Group {
    pub name: String,
    pub size: u64,
    pub packages: BTreeSet<String>,
    pub requires: BTreeSet<String>,
    /// Never contains a name from `packages`.
    pub requires_resolved: BTreeSet<String>,
}

impl Group {
    pub fn aggregate(name: impl Into<String>, members: &Catalogue) -> Self {
        let mut group = Group {
            name: name.into(),
            ..Group::default()
        };

        for package in members {
            group.size = group.size.wrapping_add(package.size);
            group.packages.insert(package.name.clone());
            group.requires.extend(package.requires.iter().cloned());
            group
                .requires_resolved
                .extend(package.requires_resolved.iter().cloned());
        }

        let packages = &group.packages;
        group
            .requires_resolved
            .retain(|dep| !packages.contains(dep));
        group
    }

    /// Aggregates the packages of `catalogue` listed in `names`. Unknown names are skipped.
    pub fn from_names<I, S>(name: impl Into<String>, names: I, catalogue: &Catalogue) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: BTreeSet<String> = names
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        let members = catalogue.filter(|package| wanted.contains(&package.name));
        Self::aggregate(name, &members)
    }

    pub fn matching(name: impl Into<String>, pattern: &Regex, catalogue: &Catalogue) -> Self {
        let members = catalogue.filter(|package| pattern.is_match(&package.name));
        Self::aggregate(name, &members)
    }

    pub fn contains(&self, package: &str) -> bool {
        self.packages.contains(package)
    }
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use crate::core::group::Group;
    use crate::core::package::{Catalogue, Package};

    fn pkg(name: &str, size: u64, requires: &[&str], resolved: &[&str]) -> Package {
        let mut package = Package::new(name, "0", "1.0", "1", "x86_64", size);
        package.requires = requires.iter().map(|s| s.to_string()).collect();
        package.requires_resolved = resolved.iter().map(|s| s.to_string()).collect();
        package
    }

    fn base_catalogue() -> Catalogue {
        vec![
            pkg("glibc", 100, &["libgcc"], &["libgcc", "filesystem"]),
            pkg("libgcc", 20, &["glibc"], &["glibc"]),
            pkg("bash", 30, &["libc.so.6", "/bin/sh"], &["glibc", "bash"]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn aggregate_sums_sizes_and_unions_requirements() {
        let group = Group::aggregate("base", &base_catalogue());

        assert_eq!(group.name, "base");
        assert_eq!(group.size, 150);
        assert_eq!(
            group.packages.iter().cloned().collect::<Vec<_>>(),
            vec!["bash", "glibc", "libgcc"]
        );
        assert_eq!(
            group.requires.iter().cloned().collect::<Vec<_>>(),
            vec!["/bin/sh", "glibc", "libc.so.6", "libgcc"]
        );
    }

    #[test]
    fn aggregate_drops_references_to_own_members() {
        let group = Group::aggregate("base", &base_catalogue());

        assert_eq!(
            group.requires_resolved.iter().cloned().collect::<Vec<_>>(),
            vec!["filesystem"]
        );
        assert!(group.requires_resolved.is_disjoint(&group.packages));
    }

    #[test]
    fn aggregate_of_empty_catalogue_is_empty() {
        let group = Group::aggregate("nothing", &Catalogue::new());
        assert_eq!(group.size, 0);
        assert!(group.packages.is_empty());
        assert!(group.requires.is_empty());
        assert!(group.requires_resolved.is_empty());
    }

    #[test]
    fn aggregate_is_idempotent() {
        let catalogue = base_catalogue();
        assert_eq!(
            Group::aggregate("base", &catalogue),
            Group::aggregate("base", &catalogue)
        );
    }

    #[test]
    fn aggregate_wraps_on_size_overflow() {
        let catalogue: Catalogue = vec![pkg("a", u64::MAX, &[], &[]), pkg("b", 2, &[], &[])]
            .into_iter()
            .collect();
        assert_eq!(Group::aggregate("huge", &catalogue).size, 1);
    }

    #[test]
    fn from_names_skips_unknown_packages() {
        let group = Group::from_names("core", ["glibc", "libgcc", "missing"], &base_catalogue());
        assert_eq!(group.size, 120);
        assert!(group.contains("glibc"));
        assert!(!group.contains("missing"));
        assert_eq!(
            group.requires_resolved.iter().cloned().collect::<Vec<_>>(),
            vec!["filesystem"]
        );
    }

    #[test]
    fn matching_selects_by_pattern() {
        let pattern = Regex::new("^lib").expect("compile pattern");
        let group = Group::matching("libs", &pattern, &base_catalogue());
        assert_eq!(group.packages.len(), 1);
        assert!(group.contains("libgcc"));
        assert_eq!(
            group.requires_resolved.iter().cloned().collect::<Vec<_>>(),
            vec!["glibc"]
        );
    }
}
