use std::fmt::Debug;

use async_trait::async_trait;
use serde::Serialize;
use serde_json_bytes::Value;

use crate::ResolveError;

/// A typed query against the node store.
///
/// `group` and `distinct` carry the field paths a nested aggregation
/// selection will target. They are folded in *before* the query runs
/// because the store may filter or index on them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeQuery {
    /// The filter expression, a nested object whose innermost segments
    /// hold operators such as `eq` or `in`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,

    /// The requested sort order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Value>,

    /// Field paths a nested `group` selection will bucket on.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub group: Vec<Value>,

    /// Field paths a nested `distinct` selection will deduplicate on.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub distinct: Vec<Value>,
}

/// The result of a node-store query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Single-entity answer to a `first_only` query.
    First(Option<Value>),
    /// The full result set.
    All(Vec<Value>),
}

impl QueryResult {
    /// Flattens the result into a list of entities.
    pub fn into_nodes(self) -> Vec<Value> {
        match self {
            QueryResult::First(node) => node.into_iter().collect(),
            QueryResult::All(nodes) => nodes,
        }
    }

    /// Flattens the result into a raw value: the entity (or null) for a
    /// `first_only` query, the array of entities otherwise.
    pub fn into_value(self) -> Value {
        match self {
            QueryResult::First(node) => node.unwrap_or(Value::Null),
            QueryResult::All(nodes) => Value::Array(nodes),
        }
    }
}

/// The node-query backend this crate resolves against.
///
/// Implementations execute filtered, typed queries over a node store and
/// answer identity lookups. All errors cross this boundary unmodified;
/// the resolvers neither retry nor swallow them. Cancellation is whatever
/// the implementation's futures provide.
#[async_trait]
pub trait NodeStore: Send + Sync + Debug {
    /// Runs a filtered query over all nodes of `node_type`. With
    /// `first_only` the store answers with the first match instead of the
    /// full result set.
    async fn run_query(
        &self,
        query: NodeQuery,
        first_only: bool,
        node_type: &str,
    ) -> Result<QueryResult, ResolveError>;

    /// Looks a single node up by identity.
    async fn get_node_by_id(
        &self,
        id: &Value,
        node_type: &str,
    ) -> Result<Option<Value>, ResolveError>;

    /// Looks a batch of nodes up by identity. The answer is aligned to
    /// `ids`: one entry per requested id, `None` where the id is unknown.
    async fn get_nodes_by_ids(
        &self,
        ids: &[Value],
        node_type: &str,
    ) -> Result<Vec<Option<Value>>, ResolveError>;

    /// Lists every node of `node_type`.
    async fn get_all_nodes(&self, node_type: &str) -> Result<Vec<Value>, ResolveError>;

    /// Walks up the parent chain of `node` and answers with the nearest
    /// ancestor matching `predicate`, if any.
    async fn find_root_node_ancestor(
        &self,
        node: &Value,
        predicate: &(dyn for<'a> Fn(&'a Value) -> bool + Send + Sync),
    ) -> Result<Option<Value>, ResolveError>;
}
