mod aggregate;
mod file_path;
mod find;
mod link;
mod paginate;

pub use aggregate::*;
pub use file_path::*;
pub use find::*;
pub use link::*;
pub use paginate::*;
