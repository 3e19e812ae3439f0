//! Configuration module for Bible-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and turning them into the `CrawlerOptions` consumed by the orchestrator.
//!
//! # Example
//!
//! ```no_run
//! use bible_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Pacing at {} requests/sec", config.crawler.requests_per_second);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, CrawlerOptions, OutputConfig, UserAgentConfig, VersionConfig,
    DEFAULT_BASE_URL, DEFAULT_REQUESTS_PER_SECOND,
};

pub use validation::validate_version_code;

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
