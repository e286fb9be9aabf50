use crate::error::{ConfigError, Result};
use crate::files::types::Candidate;
use crate::store::Layer;
use std::path::{Component, Path, PathBuf};

/// Ordered list of directories that config files are searched in.
///
/// Later directories override earlier ones at the same tier. Paths are only
/// ever appended.
#[derive(Debug, Clone, Default)]
pub struct SearchPaths {
	paths: Vec<PathBuf>,
}

impl SearchPaths {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a directory after checking it exists, is a directory, and can
	/// be listed.
	pub fn add_path(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
		let path = path.as_ref();
		validate_path(path)?;
		tracing::debug!(path = %path.display(), "registered search path");
		self.paths.push(path.to_path_buf());
		Ok(self)
	}

	/// Register several directories in order, stopping at the first bad one.
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

	pub fn paths(&self) -> &[PathBuf] {
		&self.paths
	}

	pub fn is_empty(&self) -> bool {
		self.paths.is_empty()
	}

	/// Find the files that make up `namespace`, in the order they apply.
	///
	/// The order is:
	/// 1. `{dir}/{namespace}.{ext}` for every directory, in registration order
	/// 2. `{dir}/{environment}/{namespace}.{ext}` for every directory, in
	///    registration order, when an environment overlay is requested
	///
	/// So with paths `[A, B]` and environment `E` the files apply as `A/N`,
	/// `B/N`, `A/E/N`, `B/E/N`, and every environment file beats every base
	/// file.
	///
	/// `namespace` and `environment` must each be a single plain path
	/// component. An empty, absolute, `.`/`..`, or separator-containing
	/// namespace has no files; such an environment has no overlay files.
	pub fn candidates(
		&self,
		namespace: &str,
		environment: Option<&str>,
		extension: &str,
	) -> Vec<Candidate> {
		let mut candidates = Vec::new();
		if !is_single_component(namespace) {
			tracing::debug!(namespace, "namespace is not a plain file name, no files");
			return candidates;
		}
		let file_name = format!("{namespace}.{extension}");

		for base in &self.paths {
			if let Some(path) = existing_file(base.join(&file_name)) {
				candidates.push(Candidate {
					path,
					layer: Layer::Base,
				});
			}
		}

		if let Some(environment) = environment.filter(|env| is_single_component(env)) {
			for base in &self.paths {
				if let Some(path) = existing_file(base.join(environment).join(&file_name)) {
					candidates.push(Candidate {
						path,
						layer: Layer::environment(environment),
					});
				}
			}
		}

		candidates
	}
}

/// True when `name` is exactly one normal path component, so joining it
/// onto a directory stays inside that directory.
fn is_single_component(name: &str) -> bool {
	let mut components = Path::new(name).components();
	matches!(
		(components.next(), components.next()),
		(Some(Component::Normal(part)), None) if part == name
	)
}

fn existing_file(candidate: PathBuf) -> Option<PathBuf> {
	if !candidate.is_file() {
		return None;
	}
	Some(std::fs::canonicalize(&candidate).unwrap_or(candidate))
}

/// Check that `path` is an existing, readable directory.
pub fn validate_path(path: &Path) -> Result<()> {
	let invalid = |reason: String| ConfigError::InvalidPath {
		path: path.to_path_buf(),
		reason,
	};

	if !path.exists() {
		return Err(invalid("does not exist".to_string()));
	}
	if !path.is_dir() {
		return Err(invalid("not a directory".to_string()));
	}
	std::fs::read_dir(path).map_err(|e| invalid(format!("not readable: {e}")))?;

	Ok(())
}

/// Get the per-user config directory for `app`, e.g. `~/.config/{app}`.
///
/// The directory is not required to exist.
pub fn user_config_dir(app: &str) -> Result<PathBuf> {
	let config_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirectoryNotFound)?;
	Ok(config_dir.join(app))
}
