// ABOUTME: Library root for simongpt-deploy - exposes the pipeline stages for the binary and tests.
// ABOUTME: The main binary is in main.rs.

pub mod build;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod exec;
pub mod orchestrator;
pub mod output;
pub mod ssh;
pub mod types;
