pub mod group;
pub mod package;
pub mod size;

pub use group::Group;
pub use package::{Catalogue, Package};
pub use size::human_size;
