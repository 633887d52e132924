//! In-memory node store for resolver tests.

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json_bytes::Value;

use crate::json_ext::ValueExt;
use crate::store::NodeQuery;
use crate::store::NodeStore;
use crate::store::QueryResult;
use crate::ResolveError;

/// A `NodeStore` over fixed fixture data, recording the calls it serves.
///
/// Nodes come back in insertion order, which deliberately differs from
/// whatever order a resolver asks for them in.
#[derive(Debug, Default)]
pub(crate) struct TestStore {
    nodes: Vec<(String, Vec<Value>)>,
    fail: Option<ResolveError>,
    calls: AtomicUsize,
    last_query: Mutex<Option<NodeQuery>>,
}

impl TestStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails with `error`.
    pub(crate) fn failing(error: ResolveError) -> Self {
        Self {
            fail: Some(error),
            ..Self::default()
        }
    }

    pub(crate) fn with_nodes(mut self, node_type: &str, nodes: Vec<Value>) -> Self {
        self.nodes.push((node_type.to_string(), nodes));
        self
    }

    /// How many store calls the resolvers issued.
    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent query passed to `run_query`.
    pub(crate) fn last_query(&self) -> Option<NodeQuery> {
        self.last_query.lock().expect("poisoned").clone()
    }

    /// Fetches a fixture node by id, for building test sources.
    pub(crate) fn node(&self, node_type: &str, id: &str) -> Value {
        self.of_type(node_type)
            .iter()
            .find(|node| node.get_path("id").and_then(Value::as_str) == Some(id))
            .cloned()
            .expect("fixture node exists")
    }

    fn of_type(&self, node_type: &str) -> &[Value] {
        self.nodes
            .iter()
            .find(|(ty, _)| ty == node_type)
            .map(|(_, nodes)| nodes.as_slice())
            .unwrap_or_default()
    }

    fn record_call(&self) -> Result<(), ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NodeStore for TestStore {
    async fn run_query(
        &self,
        query: NodeQuery,
        first_only: bool,
        node_type: &str,
    ) -> Result<QueryResult, ResolveError> {
        self.record_call()?;
        let filter = query.filter.clone();
        *self.last_query.lock().expect("poisoned") = Some(query);

        let mut matches = self
            .of_type(node_type)
            .iter()
            .filter(|node| match &filter {
                Some(filter) => filter_matches(Some(*node), filter),
                None => true,
            })
            .cloned();

        if first_only {
            Ok(QueryResult::First(matches.next()))
        } else {
            Ok(QueryResult::All(matches.collect()))
        }
    }

    async fn get_node_by_id(
        &self,
        id: &Value,
        node_type: &str,
    ) -> Result<Option<Value>, ResolveError> {
        self.record_call()?;
        Ok(self
            .of_type(node_type)
            .iter()
            .find(|node| node.get_path("id") == Some(id))
            .cloned())
    }

    async fn get_nodes_by_ids(
        &self,
        ids: &[Value],
        node_type: &str,
    ) -> Result<Vec<Option<Value>>, ResolveError> {
        self.record_call()?;
        Ok(ids
            .iter()
            .map(|id| {
                self.of_type(node_type)
                    .iter()
                    .find(|node| node.get_path("id") == Some(id))
                    .cloned()
            })
            .collect())
    }

    async fn get_all_nodes(&self, node_type: &str) -> Result<Vec<Value>, ResolveError> {
        self.record_call()?;
        Ok(self.of_type(node_type).to_vec())
    }

    async fn find_root_node_ancestor(
        &self,
        node: &Value,
        predicate: &(dyn for<'a> Fn(&'a Value) -> bool + Send + Sync),
    ) -> Result<Option<Value>, ResolveError> {
        self.record_call()?;
        let mut current = node.clone();
        loop {
            let parent = current
                .get_path("parent")
                .and_then(|parent_id| {
                    self.nodes.iter().flat_map(|(_, nodes)| nodes).find(|node| {
                        node.get_path("id") == Some(parent_id)
                    })
                })
                .cloned();
            match parent {
                Some(parent) => {
                    if predicate(&parent) {
                        return Ok(Some(parent));
                    }
                    current = parent;
                }
                None => return Ok(None),
            }
        }
    }
}

/// Evaluates the nested filter objects the resolvers construct: plain
/// field segments descend, `eq`/`in` segments compare.
fn filter_matches(value: Option<&Value>, filter: &Value) -> bool {
    let Some(conditions) = filter.as_object() else {
        return false;
    };
    conditions.iter().all(|(key, condition)| match key.as_str() {
        "eq" => value == Some(condition),
        "in" => condition
            .as_array()
            .is_some_and(|allowed| value.is_some_and(|value| allowed.contains(value))),
        field => filter_matches(
            value
                .and_then(Value::as_object)
                .and_then(|object| object.get(field)),
            condition,
        ),
    })
}

#[cfg(test)]
mod tests {
    use serde_json_bytes::json;

    use super::*;

    #[test]
    fn nested_filters_descend_and_compare() {
        let node = json!({ "a": { "b": "x" }, "id": "1" });

        assert!(filter_matches(Some(&node), &json!({ "a": { "b": { "eq": "x" } } })));
        assert!(filter_matches(Some(&node), &json!({ "a": { "b": { "in": ["x", "y"] } } })));
        assert!(!filter_matches(Some(&node), &json!({ "a": { "b": { "eq": "y" } } })));
        assert!(!filter_matches(Some(&node), &json!({ "missing": { "eq": "x" } })));
    }
}
