//! Core types shared by every Strata crate.
//!
//! - [`errors`]: the crate-wide error enum and `Result` alias
//! - [`path`]: parsing and joining of `/`-delimited hierarchy paths

pub mod errors;
pub mod path;

pub use errors::{Result, StrataError};
pub use path::{HierarchyPath, ROOT_PATH, join_child, segments};
