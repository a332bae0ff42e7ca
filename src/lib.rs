// ABOUTME: Library root for dockership - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod build_context;
pub mod config;
pub mod deploy;
pub mod error;
pub mod events;
pub mod models;
pub mod output;
pub mod runtime;
pub mod types;
