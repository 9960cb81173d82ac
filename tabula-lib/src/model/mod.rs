//! Row and value models

mod accessor;
mod column;
mod record;
mod value;

pub use accessor::*;
pub use column::*;
pub use record::*;
pub use value::*;
