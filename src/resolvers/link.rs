use serde_json_bytes::Value;

use crate::json_ext::Object;
use crate::json_ext::ValueExt;
use crate::spec::TypeInfo;
use crate::store::NodeQuery;
use crate::store::NodeStore;
use crate::store::QueryResult;
use crate::ResolveError;

pub(crate) const DEFAULT_LINK_KEY: &str = "id";
const EQ_OPERATOR: &str = "eq";
const IN_OPERATOR: &str = "in";

/// Arguments of a foreign-key field resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkArgs {
    /// The field path on the target type to match the raw value against.
    pub by: String,
    /// The source field holding the join key, when it is not the resolved
    /// field itself.
    pub from: Option<String>,
}

impl Default for LinkArgs {
    fn default() -> Self {
        Self {
            by: DEFAULT_LINK_KEY.to_string(),
            from: None,
        }
    }
}

/// Resolves a stored join key on `source` into the entity or entities it
/// references.
///
/// A null key and a key that already carries materialized entities pass
/// through unchanged; the latter guards against resolving twice. Identity
/// keys go through the store's id lookups, one batched call for a list.
/// Any other `by` path becomes a single filtered query, `eq` for a scalar
/// key and `in` for a list, and a list answer is re-aligned to the order
/// of the input keys afterwards.
#[tracing::instrument(skip_all, level = "trace")]
pub async fn link(
    store: &dyn NodeStore,
    type_info: &dyn TypeInfo,
    node_type: &str,
    source: &Value,
    field_name: &str,
    args: &LinkArgs,
) -> Result<Value, ResolveError> {
    let source_field = args.from.as_deref().unwrap_or(field_name);
    let raw = match source.get_path(source_field) {
        Some(value) if !value.is_null() => value,
        _ => return Ok(Value::Null),
    };
    if raw.is_materialized() {
        return Ok(raw.clone());
    }

    if args.by == DEFAULT_LINK_KEY {
        return match raw {
            Value::Array(ids) => {
                let nodes = store.get_nodes_by_ids(ids, node_type).await?;
                Ok(Value::Array(
                    nodes
                        .into_iter()
                        .map(|node| node.unwrap_or(Value::Null))
                        .collect(),
                ))
            }
            id => Ok(store
                .get_node_by_id(id, node_type)
                .await?
                .unwrap_or(Value::Null)),
        };
    }

    let filter = match raw {
        Value::Array(keys) => nested_filter(&args.by, IN_OPERATOR, Value::Array(keys.clone())),
        key => nested_filter(&args.by, EQ_OPERATOR, key.clone()),
    };
    let query = NodeQuery {
        filter: Some(filter),
        ..Default::default()
    };
    let result = store.run_query(query, !type_info.is_list(), node_type).await?;

    match (raw, result) {
        // The store answers in its own storage order; the output must
        // follow the input keys, one entity or null per key.
        (Value::Array(keys), QueryResult::All(nodes)) if type_info.is_list() => {
            let aligned = keys
                .iter()
                .map(|key| {
                    nodes
                        .iter()
                        .find(|node| node.get_path(&args.by) == Some(key))
                        .cloned()
                        .unwrap_or(Value::Null)
                })
                .collect();
            Ok(Value::Array(aligned))
        }
        (_, result) => Ok(result.into_value()),
    }
}

/// Builds the filter for a `by` path: the innermost segment holds the
/// operator, every outer segment wraps it.
fn nested_filter(by: &str, operator: &str, value: Value) -> Value {
    by.rsplit('.')
        .fold(wrap(operator, value), |filter, segment| {
            wrap(segment, filter)
        })
}

fn wrap(key: &str, value: Value) -> Value {
    let mut object = Object::new();
    object.insert(key, value);
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use serde_json_bytes::json;
    use test_log::test;

    use super::*;
    use crate::spec::FieldType;
    use crate::spec::FieldTypeInfo;
    use crate::test_support::TestStore;

    fn single_type_info() -> FieldTypeInfo {
        FieldTypeInfo::new(FieldType::Named("Author".to_string()))
    }

    fn list_type_info() -> FieldTypeInfo {
        FieldTypeInfo::new(FieldType::List(Box::new(FieldType::Named(
            "Author".to_string(),
        ))))
    }

    fn authors() -> Vec<Value> {
        vec![
            json!({ "id": "a-1", "email": "ada@example.com" }),
            json!({ "id": "a-2", "email": "brian@example.com" }),
        ]
    }

    #[test]
    fn filters_nest_to_the_depth_of_the_key_path() {
        assert_eq!(
            nested_filter("a.b.c", IN_OPERATOR, json!(["x"])),
            json!({ "a": { "b": { "c": { "in": ["x"] } } } })
        );
        assert_eq!(
            nested_filter("email", EQ_OPERATOR, json!("ada@example.com")),
            json!({ "email": { "eq": "ada@example.com" } })
        );
    }

    #[test(tokio::test)]
    async fn identity_keys_resolve_through_id_lookup() {
        let store = TestStore::new().with_nodes("Author", authors());
        let source = json!({ "author": "a-2" });

        let resolved = link(
            &store,
            &single_type_info(),
            "Author",
            &source,
            "author",
            &LinkArgs::default(),
        )
        .await
        .expect("resolves");

        assert_eq!(resolved, authors()[1]);
    }

    #[test(tokio::test)]
    async fn identity_lists_resolve_batched_and_in_input_order() {
        let store = TestStore::new().with_nodes("Author", authors());
        let source = json!({ "authors": ["a-2", "a-1", "a-404"] });

        let resolved = link(
            &store,
            &list_type_info(),
            "Author",
            &source,
            "authors",
            &LinkArgs::default(),
        )
        .await
        .expect("resolves");

        assert_eq!(
            resolved,
            json!([authors()[1], authors()[0], null])
        );
        // One batched lookup, not one per key.
        assert_eq!(store.call_count(), 1);
    }

    #[test(tokio::test)]
    async fn materialized_values_pass_through_without_a_store_call() {
        let store = TestStore::new();
        let source = json!({ "author": { "id": "a-1", "email": "ada@example.com" } });

        let resolved = link(
            &store,
            &single_type_info(),
            "Author",
            &source,
            "author",
            &LinkArgs::default(),
        )
        .await
        .expect("resolves");

        assert_eq!(resolved, json!({ "id": "a-1", "email": "ada@example.com" }));
        assert_eq!(store.call_count(), 0);
    }

    #[test(tokio::test)]
    async fn null_and_missing_keys_resolve_to_null() {
        let store = TestStore::new();

        for source in [json!({ "author": null }), json!({})] {
            let resolved = link(
                &store,
                &single_type_info(),
                "Author",
                &source,
                "author",
                &LinkArgs::default(),
            )
            .await
            .expect("resolves");
            assert_eq!(resolved, Value::Null);
        }
        assert_eq!(store.call_count(), 0);
    }

    #[test(tokio::test)]
    async fn the_from_alias_reads_a_different_source_field() {
        let store = TestStore::new().with_nodes("Author", authors());
        let source = json!({ "author___NODE": "a-1" });

        let resolved = link(
            &store,
            &single_type_info(),
            "Author",
            &source,
            "author",
            &LinkArgs {
                from: Some("author___NODE".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("resolves");

        assert_eq!(resolved, authors()[0]);
    }

    #[test(tokio::test)]
    async fn scalar_keys_on_another_field_issue_an_eq_query() {
        let store = TestStore::new().with_nodes("Author", authors());
        let source = json!({ "author": "brian@example.com" });

        let resolved = link(
            &store,
            &single_type_info(),
            "Author",
            &source,
            "author",
            &LinkArgs {
                by: "email".to_string(),
                from: None,
            },
        )
        .await
        .expect("resolves");

        assert_eq!(resolved, authors()[1]);
        assert_eq!(
            store.last_query().expect("a query was issued").filter,
            Some(json!({ "email": { "eq": "brian@example.com" } }))
        );
    }

    #[test(tokio::test)]
    async fn list_keys_issue_one_in_query_and_realign_the_answer() {
        let store = TestStore::new().with_nodes("Author", authors());
        let source = json!({ "authors": ["brian@example.com", "nobody@example.com", "ada@example.com"] });

        let resolved = link(
            &store,
            &list_type_info(),
            "Author",
            &source,
            "authors",
            &LinkArgs {
                by: "email".to_string(),
                from: None,
            },
        )
        .await
        .expect("resolves");

        assert_eq!(
            resolved,
            json!([authors()[1], null, authors()[0]])
        );
        assert_eq!(store.call_count(), 1);
        assert_eq!(
            store.last_query().expect("a query was issued").filter,
            Some(json!({ "email": { "in": [
                "brian@example.com",
                "nobody@example.com",
                "ada@example.com",
            ] } }))
        );
    }

    #[test(tokio::test)]
    async fn store_errors_propagate_unmodified() {
        let store = TestStore::failing(ResolveError::StoreLookup {
            reason: "offline".to_string(),
        });
        let source = json!({ "author": "a-1" });

        let err = link(
            &store,
            &single_type_info(),
            "Author",
            &source,
            "author",
            &LinkArgs::default(),
        )
        .await
        .expect_err("must fail");

        assert_eq!(
            err,
            ResolveError::StoreLookup {
                reason: "offline".to_string(),
            }
        );
    }
}
