use crate::config::Config;
use crate::error::Result;
use crate::files::{Candidate, Format, Loader, SearchPaths, user_config_dir};
use crate::merge::merge_into;
use crate::read::split_namespace;
use crate::store::{Layer, LayeredStore, StoreOptions};
use crate::value::{Mapping, Value};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Configuration read lazily from files on a list of search paths.
///
/// The first segment of every key names a file: `person.bike.colour` reads
/// `bike.colour` from `person.toml`. Each namespace is loaded on first use
/// and reused until a search path is added or the environment changes.
///
/// Mappings passed to [`FileConfig::add_config`] sit underneath the files of
/// the same layer: a file value wins over an in-memory value at the same key.
#[derive(Debug)]
pub struct FileConfig<L = Format> {
	paths: SearchPaths,
	store: LayeredStore,
	loader: L,
	base_environment: String,
	loaded: HashSet<String>,
	/// In-memory additions per layer, replayed whenever a namespace reloads.
	memory: IndexMap<Layer, Mapping>,
}

impl Default for FileConfig<Format> {
	fn default() -> Self {
		Self::with_options(&StoreOptions::default())
	}
}

impl FileConfig<Format> {
	/// Create a TOML-backed config with no search paths.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a TOML-backed config searching `paths` in order.
	pub fn with_paths<I, P>(paths: I) -> Result<Self>
	where
		I: IntoIterator<Item = P>,
		P: AsRef<Path>,
	{
		let mut config = Self::new();
		config.add_paths(paths)?;
		Ok(config)
	}

	pub fn with_options(options: &StoreOptions) -> Self {
		FileConfig::with_loader(options.format, options)
	}
}

impl<L: Loader> FileConfig<L> {
	/// Create a config that reads files through a custom loader.
	pub fn with_loader(loader: L, options: &StoreOptions) -> Self {
		Self {
			paths: SearchPaths::new(),
			store: LayeredStore::with_options(options),
			loader,
			base_environment: options.base_environment.clone(),
			loaded: HashSet::new(),
			memory: IndexMap::new(),
		}
	}

	/// Add a directory to search. Fails if it is not a readable directory.
	pub fn add_path(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
		self.paths.add_path(path)?;
		self.invalidate();
		Ok(self)
	}

	pub fn add_paths<I, P>(&mut self, paths: I) -> Result<&mut Self>
	where
		I: IntoIterator<Item = P>,
		P: AsRef<Path>,
	{
		for path in paths {
			self.add_path(path)?;
		}
		Ok(self)
	}

	/// Add the per-user config directory for `app` if it exists.
	///
	/// Returns whether the directory was added.
	pub fn add_user_path(&mut self, app: &str) -> Result<bool> {
		let dir = user_config_dir(app)?;
		if !dir.is_dir() {
			return Ok(false);
		}
		self.add_path(dir)?;
		Ok(true)
	}

	pub fn paths(&self) -> &[PathBuf] {
		self.paths.paths()
	}

	/// Switch the active environment. Namespaces are reloaded on next read.
	pub fn set_environment(&mut self, name: impl Into<String>) -> &mut Self {
		self.store.set_environment(name);
		self.invalidate();
		self
	}

	pub fn environment(&self) -> &str {
		self.store.environment()
	}

	/// Deep-merge in-memory config into `layer`.
	///
	/// Each top-level key is a namespace; those namespaces reload on next read
	/// so the new data is layered under their files.
	pub fn add_config(&mut self, config: Mapping, layer: Layer) -> &mut Self {
		for namespace in config.keys() {
			self.loaded.remove(namespace);
		}
		match self.memory.get_mut(&layer) {
			Some(existing) => merge_into(existing, &config),
			None => {
				self.memory.insert(layer, config);
			}
		}
		self
	}

	pub fn add_base(&mut self, config: Mapping) -> &mut Self {
		self.add_config(config, Layer::Base)
	}

	/// The files behind `namespace` for the active environment, in the order
	/// they are merged.
	pub fn required_files(&self, namespace: &str) -> Vec<Candidate> {
		let environment = Some(self.store.environment())
			.filter(|environment| *environment != self.base_environment);
		self.paths
			.candidates(namespace, environment, self.loader.extension())
	}

	/// Load `namespace` from disk unless it is already loaded.
	pub fn load(&mut self, namespace: &str) -> Result<()> {
		if self.loaded.contains(namespace) {
			return Ok(());
		}

		let candidates = self.required_files(namespace);
		tracing::debug!(namespace, files = candidates.len(), "loading namespace");

		// Parse everything before touching the store so a bad file leaves
		// the previous data in place.
		let mut parsed = Vec::with_capacity(candidates.len());
		for candidate in candidates {
			let content = self.loader.load(&candidate.path)?;
			tracing::debug!(path = %candidate.path.display(), layer = %candidate.layer, "loaded config file");
			parsed.push((candidate.layer, content));
		}

		self.store.forget(namespace);
		for (layer, mapping) in &self.memory {
			if let Some(value) = mapping.get(namespace) {
				let mut wrapped = Mapping::new();
				wrapped.insert(namespace.to_string(), value.clone());
				self.store.add_config(wrapped, layer.clone());
			}
		}
		for (layer, content) in parsed {
			let mut wrapped = Mapping::new();
			wrapped.insert(namespace.to_string(), Value::Mapping(content));
			self.store.add_config(wrapped, layer);
		}
		self.loaded.insert(namespace.to_string());

		Ok(())
	}

	/// Look up a dotted key, loading its namespace first if needed.
	pub fn get(&mut self, key: &str) -> Result<Option<&Value>> {
		let (namespace, _) = split_namespace(key);
		self.load(namespace)?;
		Ok(self.store.get(key))
	}

	/// Look up a dotted key, falling back to `default`.
	pub fn get_or<'a>(&'a mut self, key: &str, default: &'a Value) -> Result<&'a Value> {
		let (namespace, _) = split_namespace(key);
		self.load(namespace)?;
		Ok(self.store.get_or(key, default))
	}

	/// The in-memory store holding everything loaded so far.
	pub fn store(&self) -> &LayeredStore {
		&self.store
	}

	fn invalidate(&mut self) {
		self.loaded.clear();
	}
}

impl<L: Loader> Config for FileConfig<L> {
	fn set_environment(&mut self, name: &str) {
		FileConfig::set_environment(self, name);
	}

	fn environment(&self) -> &str {
		FileConfig::environment(self)
	}

	fn get(&mut self, key: &str) -> Result<Option<&Value>> {
		FileConfig::get(self, key)
	}

	fn get_or<'a>(&'a mut self, key: &str, default: &'a Value) -> Result<&'a Value> {
		FileConfig::get_or(self, key, default)
	}
}
