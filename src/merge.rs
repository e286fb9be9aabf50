//! Recursive mapping merge.
//!
//! Merge semantics:
//! - Mappings: deep-merge by key (recursive)
//! - Sequences: REPLACE (override wins entirely, never element-wise)
//! - Scalars: override wins
//! - Shape changes (mapping to scalar and back): override wins

use crate::value::{Mapping, Value};

/// Merge `source` into `dest` in place. `source` is only read.
///
/// Keys present only in `dest` are left untouched.
pub fn merge_into(dest: &mut Mapping, source: &Mapping) {
	for (key, incoming) in source {
		match dest.get_mut(key) {
			Some(existing) => match (existing, incoming) {
				(Value::Mapping(existing), Value::Mapping(incoming)) => {
					merge_into(existing, incoming);
				}
				(existing, incoming) => *existing = incoming.clone(),
			},
			None => {
				dest.insert(key.clone(), incoming.clone());
			}
		}
	}
}

/// Merge `overlay` over `base` into a new mapping. Neither input changes.
pub fn merge(base: &Mapping, overlay: &Mapping) -> Mapping {
	let mut merged = base.clone();
	merge_into(&mut merged, overlay);
	merged
}

/// Fold several mappings in order; the last has the highest precedence.
pub fn merge_all<'a, I>(layers: I) -> Mapping
where
	I: IntoIterator<Item = &'a Mapping>,
{
	layers.into_iter().fold(Mapping::new(), |mut acc, layer| {
		merge_into(&mut acc, layer);
		acc
	})
}
