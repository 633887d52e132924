use serde_json_bytes::Value;

use crate::resolvers::paginate;
use crate::resolvers::Page;
use crate::resolvers::PaginationArgs;
use crate::spec::projected_field_values;
use crate::spec::Fragments;
use crate::spec::Selection;
use crate::spec::TypeInfo;
use crate::store::NodeQuery;
use crate::store::NodeStore;
use crate::ResolveError;

/// The caller's declared selection context for the current field.
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    pub selections: &'a [Selection],
    pub fragments: &'a Fragments,
}

pub(crate) const GROUP_FIELD: &str = "group";
pub(crate) const DISTINCT_FIELD: &str = "distinct";

/// Arguments of a top-level "find many" operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryArgs {
    pub filter: Option<Value>,
    pub sort: Option<Value>,
    pub skip: usize,
    pub limit: Option<usize>,
}

/// Runs the base query for a paginated "find many" field and shapes the
/// raw result set into a [`Page`].
///
/// When the caller's selection additionally requests a `group` or
/// `distinct` aggregation, its target field is recovered from the request
/// shape first and folded into the query, since the store must know the
/// field before executing.
#[tracing::instrument(skip_all, level = "trace")]
pub async fn find_many_paginated(
    store: &dyn NodeStore,
    type_info: &dyn TypeInfo,
    node_type: &str,
    args: QueryArgs,
    shape: Option<SelectionContext<'_>>,
) -> Result<Page, ResolveError> {
    let (group, distinct) = match shape {
        Some(shape) => (
            projected_field_values(shape.selections, shape.fragments, GROUP_FIELD, type_info),
            projected_field_values(shape.selections, shape.fragments, DISTINCT_FIELD, type_info),
        ),
        None => (Vec::new(), Vec::new()),
    };

    let query = NodeQuery {
        filter: args.filter,
        sort: args.sort,
        group,
        distinct,
    };
    let result = store.run_query(query, false, node_type).await?;

    Ok(paginate(
        Some(result.into_nodes()),
        &PaginationArgs {
            skip: args.skip,
            limit: args.limit,
        },
    ))
}

/// Runs a "find one" query and answers with the entity, or null when
/// nothing matches.
#[tracing::instrument(skip_all, level = "trace")]
pub async fn find_one(
    store: &dyn NodeStore,
    node_type: &str,
    filter: Option<Value>,
) -> Result<Value, ResolveError> {
    let query = NodeQuery {
        filter,
        ..Default::default()
    };
    let result = store.run_query(query, true, node_type).await?;
    Ok(result.into_value())
}
