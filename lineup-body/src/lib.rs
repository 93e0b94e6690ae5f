//! Render-layout and diff engine for ranking tables.
//!
//! Turns the rankings of a [`DataProvider`] into frames: positioned
//! columns, the visible window of rows, enter/update/exit diffs for
//! animating reorders, and slope graphs between adjacent rankings. The
//! [`editor`] module holds the interactive mapping editor session.

pub mod body;
pub mod context;
pub mod diff;
pub mod editor;
pub mod error;
pub mod events;
pub mod layout;
pub mod options;
pub mod provider;
pub mod render;
pub mod rows;
pub mod slope;

pub use body::{BodyFrame, BodyRenderer, RankingFrame, RenderReason, RenderedRow, Statistics};
pub use context::{BodyContext, RankingContext, RenderContext};
pub use diff::{diff_positions, Diff, OrderDiff, OrderDiffState, Placement};
pub use editor::{CommitPolicy, DragTarget, EditorOptions, GestureEvent, MappingEditor, MappingPreset};
pub use error::OptionsError;
pub use events::{BodyEvent, EventBus, Subscription};
pub use layout::{flatten_ranking, split_frozen, FlatColumn, FlattenDepth, FrozenSplit};
pub use options::BodyOptions;
pub use provider::{DataProvider, LocalDataProvider, ProviderEvent, RowFuture, RowSelection};
pub use render::{Cell, CellRenderer, RendererRegistry};
pub use rows::{slice_order, AllRows, RowBounds, RowHeightGenerator, RowLayout, Slicer, ViewportSlicer, VisibleRange};
pub use slope::{correlate, Correlation, SlopeGraph, SlopeLine};
