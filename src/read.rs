//! Dotted-key traversal over nested mappings.
//!
//! A key of `person.bike.colour` reads `["person"]["bike"]["colour"]`. There
//! is no escaping, so a key name that itself contains a `.` cannot be reached.

use crate::value::{Mapping, Value};

/// Separator between key segments.
pub const KEY_SEPARATOR: char = '.';

/// Walk `mapping` along the segments of `key`.
///
/// Returns `None` as soon as a segment is missing or the walk would have to
/// descend into a scalar or sequence. The empty key is a single segment.
pub fn lookup<'a>(mapping: &'a Mapping, key: &str) -> Option<&'a Value> {
	let mut segments = key.split(KEY_SEPARATOR);
	// split always yields at least one segment
	let first = segments.next()?;
	let mut current = mapping.get(first)?;

	for segment in segments {
		current = match current {
			Value::Mapping(map) => map.get(segment)?,
			Value::Scalar(_) | Value::Sequence(_) => return None,
		};
	}

	Some(current)
}

/// Read `key` from `mapping`, falling back to `default`.
///
/// The default is handed back by reference, untouched.
pub fn read<'a>(mapping: &'a Mapping, key: &str, default: &'a Value) -> &'a Value {
	lookup(mapping, key).unwrap_or(default)
}

/// Split a key into its first segment and the remainder, if any.
///
/// The first segment is the namespace the file-backed store loads from disk.
pub fn split_namespace(key: &str) -> (&str, Option<&str>) {
	match key.split_once(KEY_SEPARATOR) {
		Some((namespace, rest)) => (namespace, Some(rest)),
		None => (key, None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn person() -> Mapping {
		Value::from(json!({
			"person": {
				"name": "Alex",
				"bike": {"colour": "orange"},
				"pets": ["cat", "dog"]
			},
			"": "blank"
		}))
		.into_mapping()
		.unwrap()
	}

	#[test]
	fn test_read_nested_scalar() {
		let map = person();
		let default = Value::NULL;

		assert_eq!(read(&map, "person.name", &default).as_str(), Some("Alex"));
		assert_eq!(
			read(&map, "person.bike.colour", &default).as_str(),
			Some("orange")
		);
	}

	#[test]
	fn test_read_missing_returns_default() {
		let map = person();
		let default = Value::from("Mars");

		assert!(std::ptr::eq(read(&map, "person.missing", &default), &default));
		assert!(std::ptr::eq(read(&map, "nobody.name", &default), &default));
	}

	#[test]
	fn test_read_subsection_returns_mapping() {
		let map = person();
		let bike = lookup(&map, "person.bike").unwrap();

		assert_eq!(bike, &Value::from(json!({"colour": "orange"})));
	}

	#[test]
	fn test_descending_into_scalar_is_not_found() {
		let map = person();
		let default = Value::from("Doodad");

		assert_eq!(read(&map, "person.name.unknown", &default), &default);
		assert!(lookup(&map, "person.name.unknown.unknown").is_none());
	}

	#[test]
	fn test_descending_into_sequence_is_not_found() {
		let map = person();

		assert!(lookup(&map, "person.pets.0").is_none());
		assert!(lookup(&map, "person.pets").unwrap().as_sequence().is_some());
	}

	#[test]
	fn test_empty_key_is_one_segment() {
		let map = person();

		assert_eq!(lookup(&map, "").and_then(Value::as_str), Some("blank"));
		assert!(lookup(&Mapping::new(), "").is_none());
	}

	#[test]
	fn test_trailing_separator_looks_up_empty_segment() {
		let map = person();

		assert!(lookup(&map, "person.").is_none());
	}

	#[test]
	fn test_split_namespace() {
		assert_eq!(split_namespace("person.bike.colour"), ("person", Some("bike.colour")));
		assert_eq!(split_namespace("person"), ("person", None));
		assert_eq!(split_namespace(""), ("", None));
	}
}
