//! File-backed configuration.
//!
//! This module handles:
//! - Search path registration and validation
//! - Resolving the files behind a namespace across paths and environments
//! - Parsing TOML or JSON files into mappings

pub mod cascade;
pub mod parser;
pub mod types;

pub use cascade::{SearchPaths, user_config_dir, validate_path};
pub use parser::{Format, Loader, parse_config_file, parse_config_str};
pub use types::Candidate;
