//! Column geometry: flattening column trees into positioned slots.

mod flatten;
mod frozen;

pub use flatten::{count_levels, flatten_column, flatten_ranking, max_levels, FlatColumn, FlattenDepth};
pub use frozen::{split_frozen, FrozenSplit};
