use serde_json_bytes::ByteString;
use serde_json_bytes::Map;
use serde_json_bytes::Value;

/// A JSON object: the in-memory representation of an entity.
pub type Object = Map<ByteString, Value>;

/// Extensions on raw entity values.
pub trait ValueExt {
    /// Returns the value at a dotted field path (`"a.b.c"`), or `None` if
    /// any intermediate segment is missing or not an object.
    fn get_path(&self, path: &str) -> Option<&Value>;

    /// Returns true if this raw value already carries resolved entities:
    /// a single object, or a list with at least one object in it. Such a
    /// value must never be resolved a second time.
    fn is_materialized(&self) -> bool;
}

impl ValueExt for Value {
    fn get_path(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for segment in path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    fn is_materialized(&self) -> bool {
        match self {
            Value::Object(_) => true,
            Value::Array(values) => values.iter().any(Value::is_object),
            _ => false,
        }
    }
}
