use lineup_model::{ColumnId, ColumnKind, DataRow, Ranking};

use super::{Cell, CellRenderer, Segment};
use crate::context::RenderContext;

/// Renders the column's label.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl CellRenderer for TextRenderer {
    fn render(
        &self,
        ranking: &Ranking,
        column: ColumnId,
        row: &DataRow,
        _index: usize,
        _width: f64,
        _ctx: &dyn RenderContext,
    ) -> Cell {
        ranking.label(column, row).map_or(Cell::Empty, Cell::Text)
    }
}

/// Vertical placement of a bar inside its row.
fn bar_band(index: usize, ctx: &dyn RenderContext) -> (f64, f64) {
    let padding = ctx.option_f64("rowBarPadding", 1.0);
    let height = (ctx.row_height(index) - 2.0 * padding).max(0.0);
    (padding, height)
}

/// Renders the normalized value as a bar of proportional width.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarRenderer;

impl CellRenderer for BarRenderer {
    fn render(
        &self,
        ranking: &Ranking,
        column: ColumnId,
        row: &DataRow,
        index: usize,
        width: f64,
        ctx: &dyn RenderContext,
    ) -> Cell {
        let value = ranking.value(column, row);
        if value.is_nan() {
            return Cell::Empty;
        }
        let (y, height) = bar_band(index, ctx);
        Cell::Bar {
            y,
            width: value * width,
            height,
        }
    }
}

/// Renders a stack column as consecutive segments, one per child, each as
/// wide as the child's value share of its width. Falls back to a single bar
/// when the `stacked` option is off.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackRenderer;

impl CellRenderer for StackRenderer {
    fn render(
        &self,
        ranking: &Ranking,
        column: ColumnId,
        row: &DataRow,
        index: usize,
        width: f64,
        ctx: &dyn RenderContext,
    ) -> Cell {
        if !ctx.option_bool("stacked", true) {
            return BarRenderer.render(ranking, column, row, index, width, ctx);
        }
        let children = ranking.children(column);
        let total: f64 = children
            .iter()
            .filter_map(|&c| ranking.column(c))
            .map(|c| c.width())
            .sum();
        let (y, height) = bar_band(index, ctx);

        let mut x = 0.0;
        let mut segments = Vec::with_capacity(children.len());
        for &child in children {
            let value = ranking.value(child, row);
            let share = match ranking.column(child) {
                Some(c) if total > 0.0 => c.width() / total,
                _ => 1.0 / children.len() as f64,
            };
            if value.is_nan() {
                continue;
            }
            let segment_width = value * share * width;
            segments.push(Segment {
                column: child,
                x,
                width: segment_width,
            });
            x += segment_width;
        }
        if segments.is_empty() {
            return Cell::Empty;
        }
        Cell::Segments {
            y,
            height,
            segments,
        }
    }
}

/// Renders the five-number summary scaled into the cell width.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxPlotRenderer;

impl CellRenderer for BoxPlotRenderer {
    fn render(
        &self,
        ranking: &Ranking,
        column: ColumnId,
        row: &DataRow,
        index: usize,
        width: f64,
        ctx: &dyn RenderContext,
    ) -> Cell {
        let Some(ColumnKind::BoxPlot(boxplot)) = ranking.column(column).map(|c| c.kind()) else {
            return Cell::Empty;
        };
        let Some(data) = row.boxplot(&boxplot.accessor) else {
            return Cell::Empty;
        };
        let px = |raw: f64| boxplot.scale(raw) * width;
        let (y, height) = bar_band(index, ctx);
        Cell::BoxPlot {
            min: px(data.min),
            q1: px(data.q1),
            median: px(data.median),
            q3: px(data.q3),
            max: px(data.max),
            y,
            height,
        }
    }
}
