//! overlay-config - layered configuration with environment overlays.
//!
//! This library provides:
//! - A nested value model with a closed set of shapes
//! - Deep merging where mappings merge and everything else is replaced
//! - Dotted-key lookup with default fallback
//! - A layered store: a base layer plus one overlay per environment
//! - Lazy loading of namespaced config files from ordered search paths
//! - A `Config` trait so either store can be handed to the same reader
//!
//! # Example
//!
//! ```no_run
//! use overlay_config::{FileConfig, Value};
//!
//! let mut config = FileConfig::with_paths(["config", "local/config"]).unwrap();
//! config.set_environment("development");
//!
//! // Reads config/person.toml, local/config/person.toml, then the
//! // development/person.toml overlays, and looks up [bike].colour.
//! let fallback = Value::from("black");
//! let colour = config.get_or("person.bike.colour", &fallback).unwrap();
//! println!("bike colour: {:?}", colour.as_str());
//! ```

pub mod config;
pub mod error;
pub mod file_config;
pub mod files;
pub mod merge;
pub mod read;
pub mod store;
pub mod value;

pub use config::Config;
pub use error::{ConfigError, Result};
pub use file_config::FileConfig;
pub use files::{Candidate, Format, Loader};
pub use merge::{merge, merge_all, merge_into};
pub use read::{lookup, read};
pub use store::{DEFAULT_ENVIRONMENT, Layer, LayeredStore, StoreOptions};
pub use value::{Mapping, Scalar, Value};
