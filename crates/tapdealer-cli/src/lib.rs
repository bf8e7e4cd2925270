//! Tapdealer CLI - file-based front-end for trusted-dealer key generation
//!
//! Runs a ceremony with the OS random source, writes the public package and
//! one share file per participant, and checks those files afterwards.

pub mod commands;
pub mod config;

pub use commands::*;
pub use config::{ConfigError, DealerConfig, CONFIG_ENV};
