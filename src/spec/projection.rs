use serde_json_bytes::Value;

use crate::spec::Fragments;
use crate::spec::Selection;
use crate::spec::TypeInfo;

/// The argument naming the target field of an aggregation selection.
pub(crate) const FIELD_ARGUMENT: &str = "field";

/// Collects the `field` argument of every occurrence of `sub_field` in the
/// given selection, in declaration order.
///
/// Fragment spreads are expanded through the named-fragment map and inline
/// fragments in place, but the walk never descends into the selection sets
/// of other fields. Each literal token is resolved through the enum
/// declared for the argument; an occurrence without a usable literal, an
/// unresolvable token, or an unknown fragment contributes nothing. The
/// aggregation target must be known before the underlying query runs, so
/// this is lenient by design rather than a hard error.
#[tracing::instrument(skip_all, level = "trace")]
pub fn projected_field_values(
    selections: &[Selection],
    fragments: &Fragments,
    sub_field: &str,
    type_info: &dyn TypeInfo,
) -> Vec<Value> {
    let mut values = Vec::new();
    collect(selections, fragments, sub_field, type_info, &mut values);
    values
}

fn collect(
    selections: &[Selection],
    fragments: &Fragments,
    sub_field: &str,
    type_info: &dyn TypeInfo,
    values: &mut Vec<Value>,
) {
    for selection in selections {
        match selection {
            Selection::Field {
                name, arguments, ..
            } => {
                if name != sub_field {
                    continue;
                }
                match arguments.get(FIELD_ARGUMENT) {
                    Some(Value::String(token)) => {
                        match type_info.resolve_enum_literal(sub_field, FIELD_ARGUMENT, token.as_str())
                        {
                            Some(value) => values.push(value),
                            None => {
                                failfast_debug!(
                                    "'{}' requested with unresolvable token '{}'",
                                    sub_field,
                                    token.as_str()
                                );
                            }
                        }
                    }
                    _ => {
                        failfast_debug!(
                            "'{}' requested without a literal '{}' argument",
                            sub_field,
                            FIELD_ARGUMENT
                        );
                    }
                }
            }
            Selection::InlineFragment { selection_set, .. } => {
                collect(selection_set, fragments, sub_field, type_info, values);
            }
            Selection::FragmentSpread { name } => match fragments.get(name) {
                Some(fragment) => {
                    collect(
                        &fragment.selection_set,
                        fragments,
                        sub_field,
                        type_info,
                        values,
                    );
                }
                None => {
                    failfast_debug!("unknown fragment '{}'", name);
                }
            },
        }
    }
}
