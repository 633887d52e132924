use apollo_parser::ast;
use apollo_parser::ast::AstNode;
use serde_json_bytes::Value;

use crate::json_ext::Object;

/// One node of a declared selection tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Field {
        name: String,
        alias: Option<String>,
        arguments: Object,
        selection_set: Option<Vec<Selection>>,
    },
    InlineFragment {
        // Optional in the spec; absent means "the current type".
        type_condition: Option<String>,
        selection_set: Vec<Selection>,
    },
    FragmentSpread {
        name: String,
    },
}

impl Selection {
    pub(crate) fn from_ast(selection: ast::Selection) -> Option<Self> {
        match selection {
            // Spec: https://spec.graphql.org/draft/#Field
            ast::Selection::Field(field) => {
                let name = field.name()?.text().to_string();
                let alias = field
                    .alias()
                    .and_then(|alias| alias.name())
                    .map(|name| name.text().to_string());

                let arguments = field
                    .arguments()
                    .map(|arguments| {
                        arguments
                            .arguments()
                            .filter_map(|argument| {
                                let name = argument.name()?.text().to_string();
                                let value = argument.value().map(literal_value)?;
                                Some((name.into(), value))
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                let selection_set = field.selection_set().and_then(|selection_set| {
                    selection_set
                        .selections()
                        .map(Selection::from_ast)
                        .collect::<Option<Vec<_>>>()
                });

                Some(Self::Field {
                    name,
                    alias,
                    arguments,
                    selection_set,
                })
            }
            // Spec: https://spec.graphql.org/draft/#InlineFragment
            ast::Selection::InlineFragment(inline_fragment) => {
                let type_condition = inline_fragment
                    .type_condition()
                    .and_then(|condition| condition.named_type())
                    .and_then(|named_type| named_type.name())
                    .map(|name| name.text().to_string());

                let selection_set = inline_fragment
                    .selection_set()?
                    .selections()
                    .map(Selection::from_ast)
                    .collect::<Option<Vec<_>>>()?;

                Some(Self::InlineFragment {
                    type_condition,
                    selection_set,
                })
            }
            // Spec: https://spec.graphql.org/draft/#FragmentSpread
            ast::Selection::FragmentSpread(fragment_spread) => {
                let name = fragment_spread
                    .fragment_name()?
                    .name()?
                    .text()
                    .to_string();

                Some(Self::FragmentSpread { name })
            }
        }
    }

    /// The name this selection responds under, for fields.
    pub fn response_name(&self) -> Option<&str> {
        match self {
            Selection::Field { name, alias, .. } => Some(alias.as_deref().unwrap_or(name)),
            _ => None,
        }
    }

    /// The sub-selections of a field, if any were declared.
    pub fn selection_set(&self) -> Option<&[Selection]> {
        match self {
            Selection::Field { selection_set, .. } => selection_set.as_deref(),
            Selection::InlineFragment { selection_set, .. } => Some(selection_set.as_slice()),
            Selection::FragmentSpread { .. } => None,
        }
    }
}

/// Lowers a literal argument value from the AST.
///
/// Enum tokens become strings. Variables lower to null: a variable cannot
/// be projected before execution, and projection is the only consumer of
/// these values.
fn literal_value(value: ast::Value) -> Value {
    match value {
        ast::Value::Variable(_) | ast::Value::NullValue(_) => Value::Null,
        ast::Value::EnumValue(value) => value
            .name()
            .map(|name| Value::String(name.text().to_string().into()))
            .unwrap_or(Value::Null),
        ast::Value::StringValue(value) => {
            let text = value.syntax().text().to_string();
            Value::String(text.trim().trim_matches('"').to_string().into())
        }
        ast::Value::IntValue(value) => value
            .syntax()
            .text()
            .to_string()
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or(Value::Null),
        ast::Value::FloatValue(value) => value
            .syntax()
            .text()
            .to_string()
            .trim()
            .parse::<f64>()
            .map(Value::from)
            .unwrap_or(Value::Null),
        ast::Value::BooleanValue(value) => {
            Value::Bool(value.syntax().text().to_string().trim() == "true")
        }
        ast::Value::ListValue(list) => {
            Value::Array(list.values().map(literal_value).collect())
        }
        ast::Value::ObjectValue(object) => Value::Object(
            object
                .object_fields()
                .filter_map(|field| {
                    let name = field.name()?.text().to_string();
                    let value = field.value().map(literal_value).unwrap_or(Value::Null);
                    Some((name.into(), value))
                })
                .collect(),
        ),
    }
}
