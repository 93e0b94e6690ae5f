//! Error types

mod column;
mod filter;
mod mapping;
mod script;

pub use column::*;
pub use filter::*;
pub use mapping::*;
pub use script::*;
