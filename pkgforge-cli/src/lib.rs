//! pkgforge CLI library

#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

pub mod batch;
pub mod observability;
pub mod options;
pub mod session;

pub use batch::{BatchEntry, BatchReader, BatchRecord};
pub use options::ConfigArgs;
pub use session::Session;
