#![forbid(unsafe_code)]

pub mod annotate;
pub mod catalogue;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod graph;
pub mod layout;
pub mod util;
