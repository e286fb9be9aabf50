use std::path::PathBuf;

/// Library-level structured errors for overlay-config.
///
/// Missing namespaces and missing keys are never errors; lookups fall back
/// to the caller's default instead.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("Invalid or unreadable path: {path} ({reason})")]
	InvalidPath { path: PathBuf, reason: String },

	#[error("Failed to read config file: {path}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse TOML config file: {path}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to parse JSON config file: {path}")]
	JsonParse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("Config file does not contain a table at its root: {path}")]
	NotAMapping { path: PathBuf },

	#[error("Failed to resolve the platform config directory")]
	ConfigDirectoryNotFound,
}

/// Result type alias using ConfigError.
pub type Result<T> = std::result::Result<T, ConfigError>;
