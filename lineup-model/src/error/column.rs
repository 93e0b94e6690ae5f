//! Column tree and ranking errors

use crate::column::ColumnId;
use crate::RowId;

/// Error raised by column tree and order mutations on a ranking.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColumnError {
    #[error("unknown column {0}")]
    UnknownColumn(ColumnId),

    #[error("column {0} cannot have children")]
    NotComposite(ColumnId),

    #[error("column {0} is not a number column")]
    NotNumeric(ColumnId),

    #[error("ranking id '{0}' is already in use")]
    DuplicateRanking(String),

    #[error("row {0} appears more than once in the order")]
    DuplicateRow(RowId),

    #[error("row {row} is outside the universe of {universe} rows")]
    RowOutOfRange { row: RowId, universe: usize },

    #[error("order of {len} rows exceeds the universe of {universe} rows")]
    OrderTooLong { len: usize, universe: usize },
}
