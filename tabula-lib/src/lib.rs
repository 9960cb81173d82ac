//! Tabular data engine
//!
//! In-memory sorting, filtering, pagination, grouping and column statistics for
//! data grids, plus a persisted column layout manager and a selection and keyboard
//! navigation controller. Rendering is left to the caller.

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod model;
pub mod nav;
pub mod rate_limit;
pub mod selection;
pub mod store;

pub use config::GridConfig;
pub use engine::*;
