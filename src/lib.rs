// src/lib.rs
pub mod cli;
pub mod config;
pub mod csp;
pub mod domain;
pub mod engine;
pub mod enumerator;
pub mod output;
pub mod session;
pub mod sources;
pub mod types;
pub mod utils;

pub use cli::Args;
pub use engine::CspStalkerEngine;
pub use types::{Config, CspStalkerError, Enumeration, ResultRecord, RunStats, StopReason};

pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);
