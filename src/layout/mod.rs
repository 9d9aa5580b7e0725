use std::time::Duration;

use crate::config::{LayoutSettings, StageEntry};
use crate::error::Result;
use crate::util::output;
use crate::util::process::run_command;

pub trait LayoutEngine: Send + Sync {
    /// Turns DOT text into rendered markup.
    fn render(&self, dot: &str) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutStage {
    pub program: String,
    pub args: Vec<String>,
}

impl From<&StageEntry> for LayoutStage {
    fn from(entry: &StageEntry) -> Self {
        Self {
            program: entry.program.clone(),
            args: entry.args.clone(),
        }
    }
}

/// Graphviz programs chained stdout-to-stdin, e.g. `sfdp | gvmap | neato`.
#[derive(Debug, Clone)]
pub struct GraphvizPipeline {
    stages: Vec<LayoutStage>,
    timeout: Duration,
}

impl GraphvizPipeline {
    pub fn new(stages: Vec<LayoutStage>, timeout: Duration) -> Self {
        Self { stages, timeout }
    }

    pub fn from_settings(settings: &LayoutSettings) -> Self {
        Self::new(
            settings.stages.iter().map(LayoutStage::from).collect(),
            settings.timeout(),
        )
    }

    pub fn stages(&self) -> &[LayoutStage] {
        &self.stages
    }
}

impl LayoutEngine for GraphvizPipeline {
    fn render(&self, dot: &str) -> Result<String> {
        let mut current = dot.to_string();
        for (idx, stage) in self.stages.iter().enumerate() {
            output::debug(&format!(
                "layout stage {}/{}: {}",
                idx + 1,
                self.stages.len(),
                stage.program
            ));
            current = run_command(&stage.program, &stage.args, Some(&current), self.timeout)?;
        }
        Ok(current)
    }
}
