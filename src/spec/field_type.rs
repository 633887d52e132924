use std::collections::HashMap;

use serde_json_bytes::Value;

/// The declared shape of a field's type.
///
/// Primitives are taken from the built-in scalars; everything else is a
/// named type, possibly wrapped in list and non-null markers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Named(String),
    List(Box<FieldType>),
    NonNull(Box<FieldType>),
    String,
    Int,
    Float,
    Id,
    Boolean,
}

impl FieldType {
    /// Returns the name of the type on which selections happen.
    ///
    /// Example: for the field `list: [User!]!`, it will return "User".
    pub fn inner_type_name(&self) -> Option<&str> {
        match self {
            FieldType::Named(name) => Some(name.as_str()),
            FieldType::List(inner) | FieldType::NonNull(inner) => inner.inner_type_name(),
            FieldType::String
            | FieldType::Int
            | FieldType::Float
            | FieldType::Id
            | FieldType::Boolean => None,
        }
    }

    pub fn is_builtin_scalar(&self) -> bool {
        match self {
            FieldType::Named(_) | FieldType::List(_) | FieldType::NonNull(_) => false,
            FieldType::String
            | FieldType::Int
            | FieldType::Float
            | FieldType::Id
            | FieldType::Boolean => true,
        }
    }

    /// List shape, looking through a non-null wrapper.
    pub fn is_list(&self) -> bool {
        match self {
            FieldType::List(_) => true,
            FieldType::NonNull(inner) => inner.is_list(),
            _ => false,
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, FieldType::NonNull(_))
    }
}

/// Type introspection supplied by the schema layer.
///
/// The receiver is scoped to one declared field: `is_list` and
/// `is_nullable` describe that field's return type, and
/// `resolve_enum_literal` maps a literal token supplied for `arg` on the
/// named sub-field of that return type through the argument's enum
/// definition.
pub trait TypeInfo: Send + Sync {
    fn is_list(&self) -> bool;

    fn is_nullable(&self) -> bool;

    fn resolve_enum_literal(&self, field: &str, arg: &str, token: &str) -> Option<Value>;
}

/// A [`TypeInfo`] backed by a declared [`FieldType`] and the enum
/// definitions the embedding schema layer knows about.
#[derive(Debug, Clone, Default)]
pub struct FieldTypeInfo {
    field_type: Option<FieldType>,
    arg_enums: HashMap<(String, String), HashMap<String, Value>>,
}

impl FieldTypeInfo {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type: Some(field_type),
            arg_enums: HashMap::new(),
        }
    }

    /// Registers the enum definition of `arg` on the sub-field `field`,
    /// as pairs of literal token and resolved value.
    pub fn with_arg_enum<K, V>(
        mut self,
        field: impl Into<String>,
        arg: impl Into<String>,
        values: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.arg_enums.insert(
            (field.into(), arg.into()),
            values
                .into_iter()
                .map(|(token, value)| (token.into(), value.into()))
                .collect(),
        );
        self
    }
}

impl TypeInfo for FieldTypeInfo {
    fn is_list(&self) -> bool {
        self.field_type.as_ref().is_some_and(FieldType::is_list)
    }

    fn is_nullable(&self) -> bool {
        !self
            .field_type
            .as_ref()
            .is_some_and(FieldType::is_non_null)
    }

    fn resolve_enum_literal(&self, field: &str, arg: &str, token: &str) -> Option<Value> {
        self.arg_enums
            .get(&(field.to_string(), arg.to_string()))
            .and_then(|values| values.get(token))
            .cloned()
    }
}
