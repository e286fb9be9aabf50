use crate::store::Layer;
use std::path::PathBuf;

/// A config file found on a search path, with the layer it feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
	/// Canonical path of the file.
	pub path: PathBuf,

	/// `Layer::Base` for `{dir}/{namespace}.{ext}`,
	/// `Layer::Environment` for `{dir}/{environment}/{namespace}.{ext}`.
	pub layer: Layer,
}
