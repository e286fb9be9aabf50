use crate::error::{ConfigError, Result};
use crate::files::Format;
use crate::merge::merge_into;
use crate::read;
use crate::value::{Mapping, Value};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Environment used when nothing else selects one.
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Which bucket a piece of configuration belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Layer {
	/// Always applied, underneath any environment overlay.
	Base,
	/// Applied over the base layer while this environment is active.
	Environment(String),
}

impl Layer {
	pub fn environment(name: impl Into<String>) -> Self {
		Layer::Environment(name.into())
	}
}

impl fmt::Display for Layer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Layer::Base => f.write_str("base"),
			Layer::Environment(name) => write!(f, "environment '{name}'"),
		}
	}
}

/// Settings for building a store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StoreOptions {
	/// Active environment when `environment_var` does not pick one.
	pub default_environment: String,

	/// Environment name that means "base tier only" when resolving files.
	/// No `{dir}/{environment}/` overlay is searched while it is active.
	pub base_environment: String,

	/// Process environment variable that, if set and non-empty, selects the
	/// initial active environment. Useful for `APP_ENV` style deployments.
	pub environment_var: Option<String>,

	/// Format of the files the file-backed store reads.
	pub format: Format,
}

impl Default for StoreOptions {
	fn default() -> Self {
		Self {
			default_environment: DEFAULT_ENVIRONMENT.to_string(),
			base_environment: DEFAULT_ENVIRONMENT.to_string(),
			environment_var: None,
			format: Format::default(),
		}
	}
}

impl StoreOptions {
	/// Parse options from a TOML file.
	pub fn from_file(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
			path: path.to_path_buf(),
			source,
		})?;

		Self::from_toml_str(&content, path)
	}

	/// Parse options from a TOML string; `path` is only used in errors.
	pub fn from_toml_str(content: &str, path: &Path) -> Result<Self> {
		toml::from_str(content).map_err(|source| ConfigError::TomlParse {
			path: path.to_path_buf(),
			source,
		})
	}

	/// The environment a new store starts in.
	pub fn initial_environment(&self) -> String {
		self.environment_var
			.as_deref()
			.and_then(|var| std::env::var(var).ok())
			.filter(|value| !value.is_empty())
			.unwrap_or_else(|| self.default_environment.clone())
	}
}

/// Base layer plus environment overlays, read through a cached composed view.
///
/// Reads take `&mut self` because the first read after a mutation rebuilds
/// the composed view. Wrap the store in a single `Mutex` to share it.
#[derive(Debug, Clone)]
pub struct LayeredStore {
	layers: IndexMap<Layer, Mapping>,
	environment: String,
	/// `merge(layers[Base], layers[Environment(environment)])`, or `None`
	/// after any mutation.
	composed: Option<Mapping>,
}

impl Default for LayeredStore {
	fn default() -> Self {
		Self::with_options(&StoreOptions::default())
	}
}

impl LayeredStore {
	/// Create an empty store in the default environment.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a store whose base layer starts as `config`.
	pub fn from_mapping(config: Mapping) -> Self {
		let mut store = Self::new();
		store.add_base(config);
		store
	}

	pub fn with_options(options: &StoreOptions) -> Self {
		let mut layers = IndexMap::new();
		layers.insert(Layer::Base, Mapping::new());

		Self {
			layers,
			environment: options.initial_environment(),
			composed: None,
		}
	}

	/// Switch the active environment. Layers of other environments are kept.
	pub fn set_environment(&mut self, name: impl Into<String>) -> &mut Self {
		let name = name.into();
		tracing::debug!(from = %self.environment, to = %name, "switching environment");
		self.environment = name;
		self.invalidate();
		self
	}

	pub fn environment(&self) -> &str {
		&self.environment
	}

	/// Deep-merge `config` into `layer`, creating the layer if needed.
	pub fn add_config(&mut self, config: Mapping, layer: Layer) -> &mut Self {
		match self.layers.get_mut(&layer) {
			Some(existing) => merge_into(existing, &config),
			None => {
				self.layers.insert(layer, config);
			}
		}
		self.invalidate();
		self
	}

	pub fn add_base(&mut self, config: Mapping) -> &mut Self {
		self.add_config(config, Layer::Base)
	}

	pub fn add_environment_config(
		&mut self,
		environment: impl Into<String>,
		config: Mapping,
	) -> &mut Self {
		self.add_config(config, Layer::environment(environment))
	}

	/// Remove a top-level key from every layer.
	pub fn forget(&mut self, key: &str) -> &mut Self {
		for mapping in self.layers.values_mut() {
			mapping.shift_remove(key);
		}
		self.invalidate();
		self
	}

	pub fn layer(&self, layer: &Layer) -> Option<&Mapping> {
		self.layers.get(layer)
	}

	/// All layers in the order they were first written.
	pub fn layers(&self) -> impl Iterator<Item = (&Layer, &Mapping)> {
		self.layers.iter()
	}

	/// The base layer with the active environment's layer merged over it.
	pub fn composed(&mut self) -> &Mapping {
		let layers = &self.layers;
		let environment = &self.environment;
		self.composed
			.get_or_insert_with(|| compose(layers, environment))
	}

	/// Look up a dotted key in the composed view.
	pub fn get(&mut self, key: &str) -> Option<&Value> {
		read::lookup(self.composed(), key)
	}

	/// Look up a dotted key, falling back to `default`.
	pub fn get_or<'a>(&'a mut self, key: &str, default: &'a Value) -> &'a Value {
		read::read(self.composed(), key, default)
	}

	fn invalidate(&mut self) {
		self.composed = None;
	}
}

fn compose(layers: &IndexMap<Layer, Mapping>, environment: &str) -> Mapping {
	tracing::trace!(environment, "rebuilding composed view");

	let mut built = layers.get(&Layer::Base).cloned().unwrap_or_default();
	if let Some(overlay) = layers.get(&Layer::environment(environment)) {
		merge_into(&mut built, overlay);
	}
	built
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn map(value: serde_json::Value) -> Mapping {
		Value::from(value).into_mapping().unwrap()
	}

	#[test]
	fn test_default_environment_is_production() {
		let store = LayeredStore::new();

		assert_eq!(store.environment(), "production");
	}

	#[test]
	fn test_set_environment_is_fluent() {
		let mut store = LayeredStore::new();
		store
			.set_environment("dev")
			.add_environment_config("dev", map(json!({"debug": true})));

		assert_eq!(store.environment(), "dev");
		assert_eq!(store.get("debug").and_then(Value::as_bool), Some(true));
	}

	#[test]
	fn test_get_from_base() {
		let mut store = LayeredStore::from_mapping(map(json!({
			"person": {"name": "Alex", "bike": {"colour": "orange"}}
		})));

		assert_eq!(store.get("person.name").and_then(Value::as_str), Some("Alex"));
		assert_eq!(
			store.get("person.bike.colour").and_then(Value::as_str),
			Some("orange")
		);
		let mars = Value::from("Mars");
		assert_eq!(store.get_or("person.missing", &mars), &mars);
	}

	#[test]
	fn test_environment_overrides_base() {
		let mut store = LayeredStore::from_mapping(map(json!({"person": {"name": "Alex"}})));
		store.set_environment("dev");
		store.add_environment_config("dev", map(json!({"person": {"name": "Becky"}})));

		assert_eq!(store.get("person.name").and_then(Value::as_str), Some("Becky"));

		store.set_environment("test");
		assert_eq!(store.get("person.name").and_then(Value::as_str), Some("Alex"));
	}

	#[test]
	fn test_environment_switch_is_non_destructive() {
		let mut store = LayeredStore::from_mapping(map(json!({"a": 1, "b": 1})));
		store.add_environment_config("dev", map(json!({"b": 2})));

		store.set_environment("dev");
		assert_eq!(store.get("b").and_then(Value::as_integer), Some(2));

		store.set_environment("other");
		assert_eq!(store.get("b").and_then(Value::as_integer), Some(1));

		store.set_environment("dev");
		assert_eq!(store.get("a").and_then(Value::as_integer), Some(1));
		assert_eq!(store.get("b").and_then(Value::as_integer), Some(2));
	}

	#[test]
	fn test_add_config_merges_into_existing_layer() {
		let mut store = LayeredStore::new();
		store.add_base(map(json!({"db": {"host": "a", "port": 1}})));
		store.add_base(map(json!({"db": {"host": "b"}})));

		assert_eq!(
			store.layer(&Layer::Base),
			Some(&map(json!({"db": {"host": "b", "port": 1}})))
		);
	}

	#[test]
	fn test_mutation_invalidates_composed_view() {
		let mut store = LayeredStore::from_mapping(map(json!({"key": "old"})));
		assert_eq!(store.get("key").and_then(Value::as_str), Some("old"));

		store.add_base(map(json!({"key": "new"})));
		assert_eq!(store.get("key").and_then(Value::as_str), Some("new"));

		store.add_environment_config("production", map(json!({"key": "prod"})));
		assert_eq!(store.get("key").and_then(Value::as_str), Some("prod"));
	}

	#[test]
	fn test_inactive_environment_layer_is_ignored() {
		let mut store = LayeredStore::from_mapping(map(json!({"key": "base"})));
		store.add_environment_config("staging", map(json!({"key": "staging"})));

		assert_eq!(store.get("key").and_then(Value::as_str), Some("base"));
	}

	#[test]
	fn test_composed_view_equals_merge_of_layers() {
		let base = map(json!({"a": {"x": 1, "y": 2}, "list": [1, 2]}));
		let dev = map(json!({"a": {"y": 3}, "list": [9]}));
		let mut store = LayeredStore::from_mapping(base.clone());
		store.add_environment_config("dev", dev.clone());
		store.set_environment("dev");

		assert_eq!(store.composed(), &crate::merge::merge(&base, &dev));
	}

	#[test]
	fn test_forget_removes_key_from_all_layers() {
		let mut store = LayeredStore::from_mapping(map(json!({"person": {"name": "Alex"}, "pet": 1})));
		store.add_environment_config("production", map(json!({"person": {"name": "Becky"}})));
		assert!(store.get("person.name").is_some());

		store.forget("person");

		assert!(store.get("person").is_none());
		assert_eq!(store.get("pet").and_then(Value::as_integer), Some(1));
	}

	#[test]
	fn test_layers_listed_in_write_order() {
		let mut store = LayeredStore::new();
		store.add_environment_config("dev", Mapping::new());
		store.add_environment_config("test", Mapping::new());
		let layers: Vec<_> = store.layers().map(|(layer, _)| layer.to_string()).collect();

		assert_eq!(layers, vec!["base", "environment 'dev'", "environment 'test'"]);
	}

	#[test]
	fn test_options_from_toml() {
		let options = StoreOptions::from_toml_str(
			r#"
default-environment = "staging"
base-environment = "live"
format = "json"
"#,
			Path::new("options.toml"),
		)
		.unwrap();

		assert_eq!(options.default_environment, "staging");
		assert_eq!(options.base_environment, "live");
		assert!(options.environment_var.is_none());
		assert_eq!(options.format, Format::Json);
		assert_eq!(LayeredStore::with_options(&options).environment(), "staging");
	}

	#[test]
	fn test_options_reject_bad_toml() {
		let result = StoreOptions::from_toml_str("default-environment = ", Path::new("bad.toml"));

		match result.unwrap_err() {
			ConfigError::TomlParse { path, .. } => assert_eq!(path, Path::new("bad.toml")),
			other => panic!("Expected TomlParse error, got {other:?}"),
		}
	}

	#[test]
	fn test_initial_environment_from_env_var() {
		let options = StoreOptions {
			environment_var: Some("OVERLAY_CONFIG_TEST_ENV_1".to_string()),
			..StoreOptions::default()
		};

		// SAFETY: no other test touches this variable
		unsafe {
			std::env::set_var("OVERLAY_CONFIG_TEST_ENV_1", "qa");
			assert_eq!(options.initial_environment(), "qa");

			std::env::set_var("OVERLAY_CONFIG_TEST_ENV_1", "");
			assert_eq!(options.initial_environment(), "production");

			std::env::remove_var("OVERLAY_CONFIG_TEST_ENV_1");
			assert_eq!(options.initial_environment(), "production");
		}
	}
}
