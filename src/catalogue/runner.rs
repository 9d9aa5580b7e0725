use std::path::PathBuf;
use std::time::Duration;

use crate::catalogue::traits::CommandRunner;
use crate::error::Result;
use crate::util::process::run_command;

/// Queries the rpm database below `root` on this machine.
pub struct HostRunner {
    root: PathBuf,
    timeout: Duration,
}

impl HostRunner {
    pub fn new(root: PathBuf, timeout: Duration) -> Self {
        Self { root, timeout }
    }

    fn command_args(&self, args: &[String]) -> Vec<String> {
        let mut full = vec!["--root".to_string(), self.root.display().to_string()];
        full.extend(args.iter().cloned());
        full
    }
}

impl CommandRunner for HostRunner {
    fn describe(&self) -> String {
        format!("rpm database in {}", self.root.display())
    }

    fn rpm(&self, args: &[String]) -> Result<String> {
        run_command("rpm", &self.command_args(args), None, self.timeout)
    }
}

/// Queries the rpm database of a container image through a throwaway container.
pub struct ContainerRunner {
    engine: String,
    image: String,
    timeout: Duration,
}

impl ContainerRunner {
    pub fn new(engine: String, image: String, timeout: Duration) -> Self {
        Self {
            engine,
            image,
            timeout,
        }
    }

    fn command_args(&self, args: &[String]) -> Vec<String> {
        let mut full = vec![
            "run".to_string(),
            "--rm".to_string(),
            "--entrypoint".to_string(),
            "rpm".to_string(),
            self.image.clone(),
        ];
        full.extend(args.iter().cloned());
        full
    }
}

impl CommandRunner for ContainerRunner {
    fn describe(&self) -> String {
        format!("{} image {}", self.engine, self.image)
    }

    fn rpm(&self, args: &[String]) -> Result<String> {
        run_command(&self.engine, &self.command_args(args), None, self.timeout)
    }
}
