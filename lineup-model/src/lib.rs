//! Ranking data model
//!
//! Columns, rankings, number filters and the mapping functions that turn raw
//! values into normalized scores.

pub mod column;
pub mod error;
pub mod filter;
pub mod mapping;

mod ranking;

pub use column::COMPRESSED_WIDTH;
pub use column::Column;
pub use column::ColumnId;
pub use column::ColumnKind;
pub use column::DataRow;
pub use filter::NumberFilter;
pub use mapping::MappingFunction;
pub use ranking::*;

/// Identifier of a data row, stable across renders.
pub type RowId = usize;
