use super::FlatColumn;

/// Flattened columns split into a frozen prefix and a scrolling rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrozenSplit {
    /// The first `freeze_cols` columns. Drawn at a horizontal origin that
    /// follows the scroll offset so they stay in view.
    pub frozen: Vec<FlatColumn>,
    pub scrolling: Vec<FlatColumn>,
    /// Right edge of the frozen slice: the largest `shift + width` among
    /// frozen columns, 0 when nothing is frozen.
    pub frozen_width: f64,
}

pub fn split_frozen(mut columns: Vec<FlatColumn>, freeze_cols: usize) -> FrozenSplit {
    let scrolling = columns.split_off(freeze_cols.min(columns.len()));
    let frozen_width = columns
        .iter()
        .map(|c| c.shift + c.width)
        .fold(0.0, f64::max);
    FrozenSplit {
        frozen: columns,
        scrolling,
        frozen_width,
    }
}
