use indexmap::IndexMap;
use serde::Serialize;

/// One level of configuration: string keys to nested values.
///
/// Insertion order is kept so dumps read in the order files declared them.
/// Merging never depends on it.
pub type Mapping = IndexMap<String, Value>;

/// A configuration value.
///
/// Closed over the three shapes merging and lookup care about, so both can
/// match exhaustively instead of guessing at leaf types.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
	Scalar(Scalar),
	Sequence(Vec<Value>),
	Mapping(Mapping),
}

/// A leaf value. Opaque to merging: a scalar is always replaced wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
	Null,
	Bool(bool),
	Integer(i64),
	Float(f64),
	String(String),
}

impl Value {
	pub const NULL: Value = Value::Scalar(Scalar::Null);

	pub fn is_mapping(&self) -> bool {
		matches!(self, Value::Mapping(_))
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Scalar(Scalar::Null))
	}

	pub fn as_mapping(&self) -> Option<&Mapping> {
		match self {
			Value::Mapping(map) => Some(map),
			_ => None,
		}
	}

	pub fn as_sequence(&self) -> Option<&[Value]> {
		match self {
			Value::Sequence(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Scalar(Scalar::String(s)) => Some(s),
			_ => None,
		}
	}

	pub fn as_integer(&self) -> Option<i64> {
		match self {
			Value::Scalar(Scalar::Integer(i)) => Some(*i),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f64> {
		match self {
			Value::Scalar(Scalar::Float(f)) => Some(*f),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Scalar(Scalar::Bool(b)) => Some(*b),
			_ => None,
		}
	}

	/// Unwrap a mapping value, handing back `None` for leaves.
	pub fn into_mapping(self) -> Option<Mapping> {
		match self {
			Value::Mapping(map) => Some(map),
			_ => None,
		}
	}
}

impl Default for Value {
	fn default() -> Self {
		Value::NULL
	}
}

impl From<Scalar> for Value {
	fn from(scalar: Scalar) -> Self {
		Value::Scalar(scalar)
	}
}

impl From<Mapping> for Value {
	fn from(map: Mapping) -> Self {
		Value::Mapping(map)
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Value::Sequence(items)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::Scalar(Scalar::String(s.to_string()))
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::Scalar(Scalar::String(s))
	}
}

impl From<i64> for Value {
	fn from(i: i64) -> Self {
		Value::Scalar(Scalar::Integer(i))
	}
}

impl From<i32> for Value {
	fn from(i: i32) -> Self {
		Value::Scalar(Scalar::Integer(i64::from(i)))
	}
}

impl From<f64> for Value {
	fn from(f: f64) -> Self {
		Value::Scalar(Scalar::Float(f))
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Scalar(Scalar::Bool(b))
	}
}

impl From<toml::Value> for Value {
	fn from(value: toml::Value) -> Self {
		match value {
			toml::Value::String(s) => Value::Scalar(Scalar::String(s)),
			toml::Value::Integer(i) => Value::Scalar(Scalar::Integer(i)),
			toml::Value::Float(f) => Value::Scalar(Scalar::Float(f)),
			toml::Value::Boolean(b) => Value::Scalar(Scalar::Bool(b)),
			// Kept as written; interpreting dates is the caller's business.
			toml::Value::Datetime(dt) => Value::Scalar(Scalar::String(dt.to_string())),
			toml::Value::Array(items) => {
				Value::Sequence(items.into_iter().map(Value::from).collect())
			}
			toml::Value::Table(table) => Value::Mapping(mapping_from_toml(table)),
		}
	}
}

/// JSON numbers that fit `i64` become integers. Anything else, including
/// unsigned values above `i64::MAX`, becomes an `f64` and may lose precision.
impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Value::NULL,
			serde_json::Value::Bool(b) => Value::Scalar(Scalar::Bool(b)),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => Value::Scalar(Scalar::Integer(i)),
				None => Value::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
			},
			serde_json::Value::String(s) => Value::Scalar(Scalar::String(s)),
			serde_json::Value::Array(items) => {
				Value::Sequence(items.into_iter().map(Value::from).collect())
			}
			serde_json::Value::Object(object) => Value::Mapping(
				object
					.into_iter()
					.map(|(key, value)| (key, Value::from(value)))
					.collect(),
			),
		}
	}
}

/// Convert a parsed TOML table into a mapping.
pub fn mapping_from_toml(table: toml::Table) -> Mapping {
	table
		.into_iter()
		.map(|(key, value)| (key, Value::from(value)))
		.collect()
}
