use crate::error::{ConfigError, Result};
use crate::value::{Mapping, Value, mapping_from_toml};
use serde::Deserialize;
use std::path::Path;

/// Turns one config file into a mapping.
///
/// Implement this to read formats other than the built-in ones. Files are
/// looked up as `{namespace}.{extension}`.
pub trait Loader {
	/// File extension without the leading dot.
	fn extension(&self) -> &str;

	/// Read and parse the file at `path`. The root must be a mapping.
	fn load(&self, path: &Path) -> Result<Mapping>;
}

/// Built-in file formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
	#[default]
	Toml,
	Json,
}

impl Loader for Format {
	fn extension(&self) -> &str {
		match self {
			Format::Toml => "toml",
			Format::Json => "json",
		}
	}

	fn load(&self, path: &Path) -> Result<Mapping> {
		parse_config_file(path, *self)
	}
}

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path, format: Format) -> Result<Mapping> {
	let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
		path: path.to_path_buf(),
		source,
	})?;

	parse_config_str(&content, format, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, format: Format, path: &Path) -> Result<Mapping> {
	match format {
		Format::Toml => {
			let table: toml::Table =
				toml::from_str(content).map_err(|source| ConfigError::TomlParse {
					path: path.to_path_buf(),
					source,
				})?;
			Ok(mapping_from_toml(table))
		}
		Format::Json => {
			let value: serde_json::Value =
				serde_json::from_str(content).map_err(|source| ConfigError::JsonParse {
					path: path.to_path_buf(),
					source,
				})?;
			Value::from(value)
				.into_mapping()
				.ok_or_else(|| ConfigError::NotAMapping {
					path: path.to_path_buf(),
				})
		}
	}
}
