//! Row set operations
//!
//! Every operation here is a synchronous function over a borrowed snapshot
//! of rows. Rows are never cloned or mutated; results hold references into
//! the caller's collection.

mod compare;
mod filter;
mod group;
mod page;
mod sort;
mod stats;
mod view;

pub use compare::*;
pub use filter::*;
pub use group::*;
pub use page::*;
pub use sort::*;
pub use stats::*;
pub use view::*;
