//! Relational field resolution and result shaping for node-graph query
//! engines.
//!
//! This crate sits between a declarative, typed request and an abstract
//! node store: it resolves stored join keys into the entities they point
//! at, paginates raw result sets, groups and deduplicates them, and
//! recovers dynamically named aggregation fields from the caller's request
//! shape before the underlying query runs.
#![cfg_attr(feature = "failfast", allow(unreachable_code))]

macro_rules! failfast_debug {
    ($($tokens:tt)+) => {{
        tracing::debug!($($tokens)+);
        #[cfg(feature = "failfast")]
        panic!(
            "failfast triggered. \
            Please remove the feature failfast if you don't want to see these panics"
        );
    }};
}

mod error;
mod json_ext;
mod resolvers;
mod spec;
mod store;
#[cfg(test)]
pub(crate) mod test_support;

pub use error::*;
pub use json_ext::*;
pub use resolvers::*;
pub use spec::*;
pub use store::*;

pub mod prelude {
    // NOTE: only traits can be added here! Everything else should be
    //       imported explicitly from the crate root.
    pub use crate::json_ext::ValueExt;
    pub use crate::spec::TypeInfo;
    pub use crate::store::NodeStore;
}
