//! Delta kinematics and segmentation analysis shared across deltapath
//! components.
//!
//! This crate intentionally avoids any parsing or I/O; it consumes
//! [`processor::Command`]s and produces statistics.

pub mod accuracy;
pub mod kinematics;
pub mod processor;
pub mod segment;
pub mod stats;
pub mod vector;

pub use processor::{Command, MoveCommand, MoveProcessor, ProcessorConfig, RunContext};
pub use stats::RunStatistics;
pub use vector::Vector;
