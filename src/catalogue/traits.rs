use crate::core::Catalogue;
use crate::error::Result;

pub trait CatalogueSource: Send + Sync {
    fn describe(&self) -> String;
    fn load(&self) -> Result<Catalogue>;
}

/// Executes `rpm` against one system and returns its stdout.
pub trait CommandRunner: Send + Sync {
    fn describe(&self) -> String;
    fn rpm(&self, args: &[String]) -> Result<String>;
}
