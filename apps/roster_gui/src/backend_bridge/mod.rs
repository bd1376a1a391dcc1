//! Backend worker: owns the tokio runtime and the roster controller.

pub mod commands;
pub mod runtime;
