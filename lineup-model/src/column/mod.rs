//! Column tree nodes
//!
//! Columns live in an arena owned by [`Ranking`](crate::Ranking). Composite
//! columns reference their children, and every column references its parent,
//! through [`ColumnId`] indices into that arena.

mod boxplot;
mod value;

pub use boxplot::*;
pub use value::*;

use std::fmt;

use crate::filter::NumberFilter;
use crate::mapping::MappingFunction;

/// Width reported by a compressed column, regardless of its own width or
/// its children.
pub const COMPRESSED_WIDTH: f64 = 16.0;

/// Handle of a column within its ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId(pub(crate) usize);

impl ColumnId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "col#{}", self.0)
    }
}

/// A number column: raw field values pushed through a mapping function.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberColumn {
    pub accessor: String,
    /// Live mapping.
    pub mapping: MappingFunction,
    /// Mapping the column was created with. Editors offer it as the reset
    /// target and widen their raw extent to include it.
    pub original_mapping: MappingFunction,
    pub filter: NumberFilter,
}

impl NumberColumn {
    pub fn new(accessor: impl Into<String>, mapping: MappingFunction) -> Self {
        Self {
            accessor: accessor.into(),
            original_mapping: mapping.clone(),
            mapping,
            filter: NumberFilter::default(),
        }
    }
}

/// What a column shows and how it computes values.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    Number(NumberColumn),
    Categorical {
        accessor: String,
        /// Known categories in display order.
        categories: Vec<String>,
    },
    String {
        accessor: String,
    },
    BoxPlot(BoxPlotColumn),
    /// Weighted sum of its children, laid out side by side.
    Stack { children: Vec<ColumnId> },
    /// Plain multi-level group; sorts by its children in sequence.
    Nested { children: Vec<ColumnId> },
    /// Mean of its children, laid out as a single slot.
    Mean { children: Vec<ColumnId> },
}

impl ColumnKind {
    pub fn children(&self) -> Option<&[ColumnId]> {
        match self {
            ColumnKind::Stack { children }
            | ColumnKind::Nested { children }
            | ColumnKind::Mean { children } => Some(children),
            _ => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<ColumnId>> {
        match self {
            ColumnKind::Stack { children }
            | ColumnKind::Nested { children }
            | ColumnKind::Mean { children } => Some(children),
            _ => None,
        }
    }
}

/// A node in a ranking's column tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub(crate) id: String,
    pub(crate) label: String,
    pub(crate) width: f64,
    pub(crate) hidden: bool,
    pub(crate) compressed: bool,
    pub(crate) collapsed: bool,
    pub(crate) parent: Option<ColumnId>,
    pub(crate) kind: ColumnKind,
}

impl Column {
    /// Creates a column with the default width of 100.
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            width: 100.0,
            hidden: false,
            compressed: false,
            collapsed: false,
            parent: None,
            kind,
        }
    }

    /// Number column reading `accessor` through `mapping`.
    pub fn number(id: impl Into<String>, accessor: impl Into<String>, mapping: MappingFunction) -> Self {
        let id = id.into();
        Self::new(
            id.clone(),
            id,
            ColumnKind::Number(NumberColumn::new(accessor, mapping)),
        )
    }

    pub fn string(id: impl Into<String>, accessor: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(
            id.clone(),
            id,
            ColumnKind::String {
                accessor: accessor.into(),
            },
        )
    }

    pub fn categorical(
        id: impl Into<String>,
        accessor: impl Into<String>,
        categories: Vec<String>,
    ) -> Self {
        let id = id.into();
        Self::new(
            id.clone(),
            id,
            ColumnKind::Categorical {
                accessor: accessor.into(),
                categories,
            },
        )
    }

    pub fn boxplot(id: impl Into<String>, accessor: impl Into<String>, domain: [f64; 2]) -> Self {
        let id = id.into();
        Self::new(
            id.clone(),
            id,
            ColumnKind::BoxPlot(BoxPlotColumn {
                accessor: accessor.into(),
                domain,
                sort: BoxPlotSort::default(),
            }),
        )
    }

    /// Empty stack column. Add children with
    /// [`Ranking::insert_child`](crate::Ranking::insert_child).
    pub fn stack(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(id.clone(), id, ColumnKind::Stack { children: Vec::new() })
    }

    pub fn nested(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(id.clone(), id, ColumnKind::Nested { children: Vec::new() })
    }

    pub fn mean(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(id.clone(), id, ColumnKind::Mean { children: Vec::new() })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.set_width(width);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn with_compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Width the column was given, ignoring compression and children.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Sets the width. Negative and NaN widths become 0.
    pub fn set_width(&mut self, width: f64) {
        self.width = if width.is_nan() { 0.0 } else { width.max(0.0) };
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn parent(&self) -> Option<ColumnId> {
        self.parent
    }

    pub fn kind(&self) -> &ColumnKind {
        &self.kind
    }

    /// Renderer key of this column's type.
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ColumnKind::Number(_) => "number",
            ColumnKind::Categorical { .. } => "categorical",
            ColumnKind::String { .. } => "string",
            ColumnKind::BoxPlot(_) => "boxplot",
            ColumnKind::Stack { .. } => "stack",
            ColumnKind::Nested { .. } => "nested",
            ColumnKind::Mean { .. } => "mean",
        }
    }

    /// Whether the column yields a normalized number per row.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self.kind,
            ColumnKind::Number(_) | ColumnKind::Stack { .. } | ColumnKind::Mean { .. }
        )
    }

    pub fn is_composite(&self) -> bool {
        self.kind.children().is_some()
    }

    /// Composite whose children are laid out in their own header level.
    pub fn is_multi_level(&self) -> bool {
        matches!(self.kind, ColumnKind::Stack { .. } | ColumnKind::Nested { .. })
    }

    /// Multi-level, neither collapsed nor compressed: children are laid out.
    pub fn is_expanded(&self) -> bool {
        self.is_multi_level() && !self.collapsed && !self.compressed
    }

    pub fn as_number(&self) -> Option<&NumberColumn> {
        match &self.kind {
            ColumnKind::Number(number) => Some(number),
            _ => None,
        }
    }

    pub fn as_number_mut(&mut self) -> Option<&mut NumberColumn> {
        match &mut self.kind {
            ColumnKind::Number(number) => Some(number),
            _ => None,
        }
    }
}
