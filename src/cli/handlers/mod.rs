//! CLI command handlers.

pub mod batch;
pub mod info;
pub mod predict;
pub mod sample;
