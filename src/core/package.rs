use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DepvizError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Package {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub epoch: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub release: String,
    #[serde(default)]
    pub arch: String,
    #[serde(default)]
    pub nevra: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub requires_resolved: Vec<String>,
}

impl Package {
    pub fn new(
        name: impl Into<String>,
        epoch: impl Into<String>,
        version: impl Into<String>,
        release: impl Into<String>,
        arch: impl Into<String>,
        size: u64,
    ) -> Self {
        let name = name.into();
        let epoch = epoch.into();
        let version = version.into();
        let release = release.into();
        let arch = arch.into();
        let nevra = format_nevra(&name, &epoch, &version, &release, &arch);
        Self {
            name,
            epoch,
            version,
            release,
            arch,
            nevra,
            size,
            requires: Vec::new(),
            requires_resolved: Vec::new(),
        }
    }
}

/// `name-[epoch:]version-release.arch`, dropping a zero or empty epoch.
pub fn format_nevra(name: &str, epoch: &str, version: &str, release: &str, arch: &str) -> String {
    let epoch = match epoch {
        "" | "0" => String::new(),
        other => format!("{other}:"),
    };
    format!("{name}-{epoch}{version}-{release}.{arch}")
}

/// Installed packages of one system, keyed by package name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Package>",
    into = "BTreeMap<String, Package>"
)]
pub struct Catalogue {
    packages: BTreeMap<String, Package>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, package: Package) -> Option<Package> {
        self.packages.insert(package.name.clone(), package)
    }

    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    /// Sub-catalogue holding only the packages `keep` accepts.
    pub fn filter<F>(&self, mut keep: F) -> Catalogue
    where
        F: FnMut(&Package) -> bool,
    {
        self.iter()
            .filter(|package| keep(package))
            .cloned()
            .collect()
    }
}

impl TryFrom<BTreeMap<String, Package>> for Catalogue {
    type Error = DepvizError;

    /// Records without a name take their key; a named record must match its key.
    fn try_from(map: BTreeMap<String, Package>) -> Result<Self> {
        let mut packages = BTreeMap::new();
        for (key, mut package) in map {
            if package.name.is_empty() {
                package.name = key.clone();
            } else if package.name != key {
                return Err(DepvizError::CatalogueKeyMismatch {
                    key,
                    name: package.name,
                });
            }
            packages.insert(key, package);
        }
        Ok(Self { packages })
    }
}

impl From<Catalogue> for BTreeMap<String, Package> {
    fn from(catalogue: Catalogue) -> Self {
        catalogue.packages
    }
}

impl FromIterator<Package> for Catalogue {
    fn from_iter<I: IntoIterator<Item = Package>>(iter: I) -> Self {
        let mut catalogue = Catalogue::new();
        for package in iter {
            catalogue.insert(package);
        }
        catalogue
    }
}

impl<'a> IntoIterator for &'a Catalogue {
    type Item = &'a Package;
    type IntoIter = std::collections::btree_map::Values<'a, String, Package>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.values()
    }
}
