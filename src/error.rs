use displaydoc::Display;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Error types for field resolution.
///
/// All variants are raised by [`NodeStore`](crate::NodeStore)
/// implementations; the resolvers in this crate never construct them and
/// propagate them to the caller unmodified, with no retries.
#[derive(Error, Display, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[non_exhaustive]
pub enum ResolveError {
    /// Query against node type '{node_type}' failed: {reason}
    StoreQuery {
        /// The node type the query targeted.
        node_type: String,

        /// The reason the query failed.
        reason: String,
    },

    /// Identity lookup failed: {reason}
    StoreLookup {
        /// The reason the lookup failed.
        reason: String,
    },

    /// Listing nodes of type '{node_type}' failed: {reason}
    StoreListing {
        /// The node type being listed.
        node_type: String,

        /// The reason the listing failed.
        reason: String,
    },

    /// Ancestor traversal failed: {reason}
    StoreTraversal {
        /// The reason the traversal failed.
        reason: String,
    },
}
