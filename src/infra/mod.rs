//! Infrastructure: the shipped component engine and process plumbing.

pub mod engine;
pub mod error;
pub mod telemetry;
