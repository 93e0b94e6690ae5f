//! Geometry and lookup services handed to cell renderers.

use serde_json::Value;

use crate::diff::Placement;
use crate::options::BodyOptions;
use crate::render::{CellRenderer, RendererRegistry};
use crate::rows::{RowLayout, VisibleRange};

/// What a cell renderer may ask about the body it draws into.
///
/// Indices are positions within the rendered slice of an order; index 0 is
/// the first visible row.
pub trait RenderContext {
    fn cell_y(&self, index: usize) -> f64;

    /// Position of the row in the previous frame, for animating moves.
    fn cell_prev_y(&self, index: usize) -> f64;

    /// Drawable height of a row: its height minus the row padding.
    fn row_height(&self, index: usize) -> f64;

    /// Option by (dotted) key, or `default` if unset.
    fn option(&self, key: &str, default: Value) -> Value;

    fn renderer(&self, type_name: &str) -> &dyn CellRenderer;

    fn option_f64(&self, key: &str, default: f64) -> f64 {
        self.option(key, Value::from(default))
            .as_f64()
            .unwrap_or(default)
    }

    fn option_bool(&self, key: &str, default: bool) -> bool {
        self.option(key, Value::Bool(default))
            .as_bool()
            .unwrap_or(default)
    }
}

/// Context over the whole body.
#[derive(Debug, Clone, Copy)]
pub struct BodyContext<'a> {
    rows: &'a RowLayout,
    options: &'a BodyOptions,
    renderers: &'a RendererRegistry,
    from: usize,
}

impl<'a> BodyContext<'a> {
    pub fn new(
        rows: &'a RowLayout,
        options: &'a BodyOptions,
        renderers: &'a RendererRegistry,
        visible: VisibleRange,
    ) -> Self {
        Self {
            rows,
            options,
            renderers,
            from: visible.from,
        }
    }
}

impl RenderContext for BodyContext<'_> {
    fn cell_y(&self, index: usize) -> f64 {
        self.rows.bounds(self.from + index).y
    }

    fn cell_prev_y(&self, index: usize) -> f64 {
        self.cell_y(index)
    }

    fn row_height(&self, index: usize) -> f64 {
        (self.rows.bounds(self.from + index).height - self.options.row_padding).max(0.0)
    }

    fn option(&self, key: &str, default: Value) -> Value {
        self.options.find_option(key).unwrap_or(default)
    }

    fn renderer(&self, type_name: &str) -> &dyn CellRenderer {
        self.renderers.get(type_name)
    }
}

/// Context of one ranking, aware of where its rows were last frame.
#[derive(Debug, Clone, Copy)]
pub struct RankingContext<'a> {
    body: BodyContext<'a>,
    placements: &'a [Placement],
}

impl<'a> RankingContext<'a> {
    pub fn new(body: BodyContext<'a>, placements: &'a [Placement]) -> Self {
        Self { body, placements }
    }
}

impl RenderContext for RankingContext<'_> {
    fn cell_y(&self, index: usize) -> f64 {
        self.body.cell_y(index)
    }

    /// Previous position, or the current one for rows that just entered.
    fn cell_prev_y(&self, index: usize) -> f64 {
        self.placements
            .get(index)
            .and_then(|p| p.prev_y)
            .unwrap_or_else(|| self.cell_y(index))
    }

    fn row_height(&self, index: usize) -> f64 {
        self.body.row_height(index)
    }

    fn option(&self, key: &str, default: Value) -> Value {
        self.body.option(key, default)
    }

    fn renderer(&self, type_name: &str) -> &dyn CellRenderer {
        self.body.renderer(type_name)
    }
}
