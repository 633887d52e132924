mod field_type;
mod fragments;
mod projection;
mod request_shape;
mod selection;

use displaydoc::Display;
pub use field_type::*;
pub use fragments::*;
pub use projection::*;
pub use request_shape::*;
pub use selection::*;
use thiserror::Error;

/// Request parsing errors.
#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpecError {
    /// parsing error: {0}
    ParsingError(String),
}
