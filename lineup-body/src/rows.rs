//! Row window: vertical row geometry and the visible slice of rows.

use std::sync::{Arc, RwLock};

use lineup_model::RowId;

/// Vertical extent of one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBounds {
    pub y: f64,
    pub height: f64,
}

impl RowBounds {
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Supplies a height per row index for data-driven row heights.
///
/// `order` is the longest order among all rankings; `index` a position in
/// it.
pub trait RowHeightGenerator: Send + Sync {
    fn row_height(&self, order: &[RowId], index: usize) -> f64;
}

impl<F> RowHeightGenerator for F
where
    F: Fn(&[RowId], usize) -> f64 + Send + Sync,
{
    fn row_height(&self, order: &[RowId], index: usize) -> f64 {
        self(order, index)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Heights {
    Uniform { height: f64, rows: usize },
    /// `offsets[i]` is the top of row `i`; one extra entry holds the total.
    Offsets(Vec<f64>),
}

/// Row positions shared by all rankings of a body.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    heights: Heights,
}

impl RowLayout {
    /// Every row `height` tall.
    pub fn uniform(height: f64, rows: usize) -> Self {
        Self {
            heights: Heights::Uniform {
                height: height.max(0.0),
                rows,
            },
        }
    }

    /// Rows with individual heights. Negative heights count as 0.
    pub fn from_heights(heights: impl IntoIterator<Item = f64>) -> Self {
        let heights = heights.into_iter();
        let mut offsets = Vec::with_capacity(heights.size_hint().0 + 1);
        let mut y = 0.0;
        offsets.push(y);
        for height in heights {
            y += height.max(0.0);
            offsets.push(y);
        }
        Self {
            heights: Heights::Offsets(offsets),
        }
    }

    /// Evaluates `generator` once per row of `order`.
    pub fn generated(generator: &dyn RowHeightGenerator, order: &[RowId]) -> Self {
        Self::from_heights((0..order.len()).map(|i| generator.row_height(order, i)))
    }

    pub fn len(&self) -> usize {
        match &self.heights {
            Heights::Uniform { rows, .. } => *rows,
            Heights::Offsets(offsets) => offsets.len() - 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_height(&self) -> f64 {
        match &self.heights {
            Heights::Uniform { height, rows } => height * *rows as f64,
            Heights::Offsets(offsets) => offsets.last().copied().unwrap_or(0.0),
        }
    }

    /// Bounds of row `index`. Indices past the end continue with the last
    /// known height (uniform) or collapse to zero height at the bottom.
    pub fn bounds(&self, index: usize) -> RowBounds {
        match &self.heights {
            Heights::Uniform { height, .. } => RowBounds {
                y: index as f64 * height,
                height: *height,
            },
            Heights::Offsets(offsets) => {
                let last = offsets.len() - 1;
                if index >= last {
                    return RowBounds {
                        y: offsets[last],
                        height: 0.0,
                    };
                }
                RowBounds {
                    y: offsets[index],
                    height: offsets[index + 1] - offsets[index],
                }
            }
        }
    }

    /// Index of the row covering `y`, clamped to the available rows.
    /// Returns 0 for an empty layout.
    pub fn index_at(&self, y: f64) -> usize {
        let len = self.len();
        if len == 0 || y.is_nan() || y <= 0.0 {
            return 0;
        }
        match &self.heights {
            Heights::Uniform { height, .. } => {
                if *height <= 0.0 {
                    return 0;
                }
                ((y / height).floor() as usize).min(len - 1)
            }
            Heights::Offsets(offsets) => {
                let upper = offsets.partition_point(|&top| top <= y);
                upper.saturating_sub(1).min(len - 1)
            }
        }
    }
}

/// Range of row indices to render, `from` inclusive, `to` exclusive.
///
/// `to` may exceed the number of rows; consumers clamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibleRange {
    pub from: usize,
    pub to: usize,
}

impl VisibleRange {
    pub fn new(from: usize, to: usize) -> Self {
        Self {
            from,
            to: to.max(from),
        }
    }

    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.to == self.from
    }

    pub fn contains(&self, index: usize) -> bool {
        self.from <= index && index < self.to
    }
}

/// Strategy choosing which rows are visible.
///
/// `start` is the first index to consider and `length` the total row count.
pub trait Slicer: Send + Sync {
    fn slice(&self, start: usize, length: usize, rows: &RowLayout) -> VisibleRange;
}

impl<F> Slicer for F
where
    F: Fn(usize, usize, &RowLayout) -> VisibleRange + Send + Sync,
{
    fn slice(&self, start: usize, length: usize, rows: &RowLayout) -> VisibleRange {
        self(start, length, rows)
    }
}

/// Shows every row.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllRows;

impl Slicer for AllRows {
    fn slice(&self, start: usize, length: usize, _rows: &RowLayout) -> VisibleRange {
        VisibleRange::new(start, length)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ViewportInner {
    offset_y: f64,
    height: f64,
    overscan: usize,
}

/// Slices to the rows intersecting a scrollable viewport.
///
/// Cloning yields a handle to the same viewport, so a scroll container can
/// keep one clone and the body renderer another.
#[derive(Debug, Clone, Default)]
pub struct ViewportSlicer {
    inner: Arc<RwLock<ViewportInner>>,
}

impl ViewportSlicer {
    pub fn new(height: f64) -> Self {
        let slicer = Self::default();
        slicer.resize(height);
        slicer
    }

    /// Extra rows rendered above and below the viewport.
    pub fn with_overscan(self, overscan: usize) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.overscan = overscan;
        }
        self
    }

    pub fn scroll_to(&self, offset_y: f64) {
        if let Ok(mut guard) = self.inner.write() {
            guard.offset_y = offset_y.max(0.0);
        }
    }

    pub fn resize(&self, height: f64) {
        if let Ok(mut guard) = self.inner.write() {
            guard.height = height.max(0.0);
        }
    }

    pub fn offset_y(&self) -> f64 {
        self.inner
            .read()
            .map(|guard| guard.offset_y)
            .unwrap_or(0.0)
    }

    pub fn height(&self) -> f64 {
        self.inner.read().map(|guard| guard.height).unwrap_or(0.0)
    }
}

impl Slicer for ViewportSlicer {
    fn slice(&self, start: usize, length: usize, rows: &RowLayout) -> VisibleRange {
        let viewport = self
            .inner
            .read()
            .map(|guard| *guard)
            .unwrap_or_default();
        let length = length.min(rows.len());
        if length <= start {
            return VisibleRange::new(start, start);
        }

        let bottom = viewport.offset_y + viewport.height;
        let first = rows.index_at(viewport.offset_y).max(start);
        let mut last = rows.index_at(bottom);
        if rows.bounds(last).y < bottom {
            last += 1;
        }
        let from = first.saturating_sub(viewport.overscan).max(start);
        let to = (last + viewport.overscan).min(length);
        VisibleRange::new(from, to)
    }
}

/// The part of `order` inside `range`.
///
/// Returns `order` itself when the range starts at 0 and covers all of it.
pub fn slice_order(order: &[RowId], range: VisibleRange) -> &[RowId] {
    if range.from == 0 && order.len() <= range.to {
        return order;
    }
    let from = range.from.min(order.len());
    let to = range.to.clamp(from, order.len());
    &order[from..to]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_at_variable_heights() {
        let rows = RowLayout::from_heights([10.0, 30.0, 5.0]);
        assert_eq!(rows.index_at(0.0), 0);
        assert_eq!(rows.index_at(9.9), 0);
        assert_eq!(rows.index_at(10.0), 1);
        assert_eq!(rows.index_at(39.0), 1);
        assert_eq!(rows.index_at(40.0), 2);
        assert_eq!(rows.index_at(1000.0), 2);
    }

    #[test]
    fn test_bounds_past_end() {
        let rows = RowLayout::from_heights([10.0, 10.0]);
        assert_eq!(rows.bounds(5), RowBounds { y: 20.0, height: 0.0 });
        let empty = RowLayout::from_heights([]);
        assert_eq!(empty.len(), 0);
        assert_eq!(empty.total_height(), 0.0);
        assert_eq!(empty.index_at(3.0), 0);
    }
}
