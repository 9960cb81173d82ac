//! Error types

mod parse;
mod store;

pub use parse::*;
pub use store::*;
