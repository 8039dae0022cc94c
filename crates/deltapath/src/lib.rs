//! Configuration, orchestration and reporting for the `deltapath` analyzer.

pub mod analysis;
pub mod config;
pub mod report;
