//! The read interface shared by the in-memory and file-backed stores.

use crate::error::Result;
use crate::store::LayeredStore;
use crate::value::Value;

/// Environment selection and dotted-key reads, independent of where the
/// values come from.
///
/// Code that only reads configuration can take `&mut dyn Config` and be
/// handed a [`LayeredStore`] in tests and a [`crate::FileConfig`] in
/// production.
pub trait Config {
	/// Switch the active environment.
	fn set_environment(&mut self, name: &str);

	fn environment(&self) -> &str;

	/// Look up a dotted key. `Ok(None)` when it is not present.
	fn get(&mut self, key: &str) -> Result<Option<&Value>>;

	/// Look up a dotted key, falling back to `default`.
	fn get_or<'a>(&'a mut self, key: &str, default: &'a Value) -> Result<&'a Value>;
}

impl Config for LayeredStore {
	fn set_environment(&mut self, name: &str) {
		LayeredStore::set_environment(self, name);
	}

	fn environment(&self) -> &str {
		LayeredStore::environment(self)
	}

	fn get(&mut self, key: &str) -> Result<Option<&Value>> {
		Ok(LayeredStore::get(self, key))
	}

	fn get_or<'a>(&'a mut self, key: &str, default: &'a Value) -> Result<&'a Value> {
		Ok(LayeredStore::get_or(self, key, default))
	}
}
