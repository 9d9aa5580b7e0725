use std::collections::{BTreeSet, HashMap};

use crate::catalogue::traits::{CatalogueSource, CommandRunner};
use crate::core::{Catalogue, Package};
use crate::error::{DepvizError, Result};
use crate::util::parallel::run_in_parallel;

const HEADER_FORMAT: &str =
    "%{NAME}\\t%{EPOCHNUM}\\t%{VERSION}\\t%{RELEASE}\\t%{ARCH}\\t%{SIZE}\\n";
const REQUIRES_FORMAT: &str = "[%{=NAME}\\t%{REQUIRENEVRS}\\n]";
const PROVIDES_FORMAT: &str = "[%{=NAME}\\t%{PROVIDENAME}\\n]";
const FILES_FORMAT: &str = "[%{=NAME}\\t%{FILENAMES}\\n]";

/// Pseudo-packages holding imported signing keys.
const IGNORED_PACKAGES: &[&str] = &["gpg-pubkey"];

/// Reads installed packages through `rpm` queries and resolves their requirements
/// against the same package set.
pub struct RpmSource<R> {
    runner: R,
    jobs: Option<usize>,
}

impl<R: CommandRunner> RpmSource<R> {
    pub fn new(runner: R) -> Self {
        Self { runner, jobs: None }
    }

    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    fn query(&self, format: &str) -> Result<String> {
        self.runner
            .rpm(&["-qa".to_string(), "--queryformat".to_string(), format.to_string()])
    }
}

impl<R: CommandRunner> CatalogueSource for RpmSource<R> {
    fn describe(&self) -> String {
        self.runner.describe()
    }

    fn load(&self) -> Result<Catalogue> {
        let mut packages = parse_headers(&self.query(HEADER_FORMAT)?)?;

        let mut requires: HashMap<String, Vec<String>> = HashMap::new();
        for (name, requirement) in parse_pairs(&self.query(REQUIRES_FORMAT)?) {
            let entry = requires.entry(name).or_default();
            if !entry.contains(&requirement) {
                entry.push(requirement);
            }
        }

        let mut providers = ProviderIndex::default();
        for (name, capability) in parse_pairs(&self.query(PROVIDES_FORMAT)?) {
            providers.add(capability, name);
        }
        for (name, path) in parse_pairs(&self.query(FILES_FORMAT)?) {
            providers.add(path, name);
        }

        for package in &mut packages {
            package.requires = requires.remove(&package.name).unwrap_or_default();
        }

        let resolved = run_in_parallel(packages, self.jobs, |mut package| {
            package.requires_resolved = providers.resolve(&package.requires);
            package
        });
        Ok(resolved.into_iter().collect())
    }
}

#[derive(Debug, Default)]
struct ProviderIndex {
    providers: HashMap<String, BTreeSet<String>>,
}

impl ProviderIndex {
    fn add(&mut self, capability: String, package: String) {
        self.providers.entry(capability).or_default().insert(package);
    }

    /// Names of every package providing at least one of `requires`, sorted.
    fn resolve(&self, requires: &[String]) -> Vec<String> {
        let mut resolved = BTreeSet::new();
        for requirement in requires {
            if let Some(names) = self.providers.get(capability_name(requirement)) {
                resolved.extend(names.iter().cloned());
            }
        }
        resolved.into_iter().collect()
    }
}

/// Capability part of a requirement such as `bash >= 4.0`.
fn capability_name(requirement: &str) -> &str {
    requirement
        .split_whitespace()
        .next()
        .unwrap_or(requirement)
}

fn parse_headers(stdout: &str) -> Result<Vec<Package>> {
    let mut packages = Vec::new();
    for line in stdout.lines().filter(|line| !line.trim().is_empty()) {
        let fields: Vec<&str> = line.split('\t').collect();
        let [name, epoch, version, release, arch, size] = fields[..] else {
            return Err(DepvizError::collaborator(
                "rpm",
                format!("unexpected package header line '{line}'"),
            ));
        };
        if IGNORED_PACKAGES.contains(&name) {
            continue;
        }
        let size = size.trim().parse::<u64>().map_err(|err| {
            DepvizError::collaborator("rpm", format!("invalid size for {name}: {err}"))
        })?;
        packages.push(Package::new(name, epoch, version, release, arch, size));
    }
    Ok(packages)
}

fn parse_pairs(stdout: &str) -> Vec<(String, String)> {
    stdout
        .lines()
        .filter_map(|line| line.split_once('\t'))
        .filter(|(_, value)| !value.trim().is_empty() && *value != "(none)")
        .map(|(name, value)| (name.to_string(), value.trim().to_string()))
        .collect()
}
