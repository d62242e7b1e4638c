//! selfassess-core: question catalog, result store, and answer collection.
//!
//! This crate defines the data model and the flat-file formats that the
//! report generator and the CLI build on.

pub mod catalog;
pub mod collect;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod traits;
pub mod validate;

pub use error::{AssessError, Result};
