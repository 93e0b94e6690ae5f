//! Body renderer: composes frames of positioned rankings, rows and cells.

use std::collections::{HashMap, HashSet};
use std::fmt;

use futures::future::join_all;
use lineup_model::{ColumnId, RowId};
use serde_json::Value;

use crate::context::{BodyContext, RankingContext, RenderContext};
use crate::diff::{diff_positions, Diff, OrderDiff, OrderDiffState, Placement};
use crate::error::OptionsError;
use crate::events::{BodyEvent, EventBus, Subscription};
use crate::layout::{flatten_ranking, split_frozen, FlatColumn, FlattenDepth};
use crate::options::BodyOptions;
use crate::provider::{DataProvider, ProviderEvent, RowFuture};
use crate::render::{Cell, RendererRegistry};
use crate::rows::{slice_order, RowHeightGenerator, RowLayout, Slicer, VisibleRange};
use crate::slope::SlopeGraph;

/// Why a frame was composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderReason {
    /// Data, orders or options changed.
    Dirty,
    /// Only the viewport moved.
    Scrolled,
}

/// Summary of a numeric column's values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub min: f64,
    pub max: f64,
    /// NaN when no value is present.
    pub mean: f64,
    pub count: usize,
    pub missing: usize,
}

impl Statistics {
    /// NaN values count as missing.
    pub fn compute(values: impl IntoIterator<Item = f64>) -> Self {
        let mut stats = Statistics {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            mean: f64::NAN,
            count: 0,
            missing: 0,
        };
        let mut sum = 0.0;
        for value in values {
            if value.is_nan() {
                stats.missing += 1;
                continue;
            }
            stats.min = stats.min.min(value);
            stats.max = stats.max.max(value);
            sum += value;
            stats.count += 1;
        }
        if stats.count > 0 {
            stats.mean = sum / stats.count as f64;
        }
        stats
    }
}

/// A column placed in a ranking frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSlot {
    pub column: ColumnId,
    /// Renderer key.
    pub type_name: &'static str,
    pub shift: f64,
    pub width: f64,
}

/// Vertical line at the mean of a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanLine {
    pub column: ColumnId,
    pub x: f64,
    pub height: f64,
}

/// Row futures of a ranking frame, taken when the frame is resolved.
#[derive(Default)]
pub struct PendingRows(Vec<RowFuture>);

impl PendingRows {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for PendingRows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PendingRows({})", self.0.len())
    }
}

/// One ranking within a frame.
#[derive(Debug)]
pub struct RankingFrame {
    pub id: String,
    /// Index of the ranking in the provider.
    pub index: usize,
    /// Visible slice of the ranking's order.
    pub order: Vec<RowId>,
    pub shift: f64,
    /// Width including the padding after every column.
    pub width: f64,
    pub frozen: Vec<ColumnSlot>,
    pub frozen_width: f64,
    pub columns: Vec<ColumnSlot>,
    pub diff: OrderDiff,
    /// Rows of `order` with their current and previous positions.
    pub placements: Vec<Placement>,
    pub mean_lines: Vec<MeanLine>,
    pub data: PendingRows,
}

/// Everything needed to draw the body once.
#[derive(Debug)]
pub struct BodyFrame {
    pub reason: RenderReason,
    pub rankings: Vec<RankingFrame>,
    pub slopes: Vec<SlopeGraph>,
    /// Total width, without a slope gap after the last ranking.
    pub width: f64,
    pub height: f64,
    pub visible: VisibleRange,
    pub rows: RowLayout,
    /// Horizontal offset applied to frozen slices.
    pub freeze_left: f64,
    /// Rankings entering, moving or leaving, keyed by id, positioned by shift.
    pub ranking_changes: Diff<String>,
}

/// A resolved row with its rendered cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    pub row: RowId,
    pub y: f64,
    pub prev_y: f64,
    pub height: f64,
    pub selected: bool,
    /// Aligned with [`RankingFrame::frozen`].
    pub frozen: Vec<Cell>,
    /// Aligned with [`RankingFrame::columns`].
    pub cells: Vec<Cell>,
}

/// Lays out the rankings of a [`DataProvider`] and tracks state between
/// frames: previous row positions, hover, freeze offset and column
/// statistics.
pub struct BodyRenderer<P: DataProvider> {
    provider: P,
    provider_events: Subscription<ProviderEvent>,
    options: BodyOptions,
    row_height: Option<Box<dyn RowHeightGenerator>>,
    slicer: Box<dyn Slicer>,
    renderers: RendererRegistry,
    diffs: OrderDiffState,
    previous_shifts: Vec<(String, f64)>,
    statistics: HashMap<String, Statistics>,
    freeze_left: f64,
    hovered: Option<RowId>,
    events: EventBus<BodyEvent>,
}

impl<P: DataProvider> BodyRenderer<P> {
    pub fn new(provider: P, slicer: impl Slicer + 'static, options: BodyOptions) -> Self {
        let provider_events = provider.subscribe();
        Self {
            provider,
            provider_events,
            options,
            row_height: None,
            slicer: Box::new(slicer),
            renderers: RendererRegistry::default(),
            diffs: OrderDiffState::new(),
            previous_shifts: Vec::new(),
            statistics: HashMap::new(),
            freeze_left: 0.0,
            hovered: None,
            events: EventBus::new(),
        }
    }

    pub fn with_renderers(mut self, renderers: RendererRegistry) -> Self {
        self.renderers = renderers;
        self
    }

    /// Switches to data-driven row heights.
    pub fn set_row_height_generator(&mut self, generator: impl RowHeightGenerator + 'static) {
        self.row_height = Some(Box::new(generator));
    }

    /// Back to uniform rows of the `rowHeight` option.
    pub fn clear_row_height_generator(&mut self) {
        self.row_height = None;
    }

    pub fn options(&self) -> &BodyOptions {
        &self.options
    }

    pub fn set_option(&mut self, key: &str, value: Value) -> Result<(), OptionsError> {
        self.options.set_option(key, value)
    }

    pub fn renderers_mut(&mut self) -> &mut RendererRegistry {
        &mut self.renderers
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Replaces the provider, returning the old one. Row positions of the
    /// old provider are forgotten.
    pub fn change_data_storage(&mut self, provider: P) -> P {
        self.provider_events = provider.subscribe();
        self.diffs.clear();
        self.previous_shifts.clear();
        std::mem::replace(&mut self.provider, provider)
    }

    pub fn subscribe(&self) -> Subscription<BodyEvent> {
        self.events.subscribe()
    }

    pub fn set_statistics(&mut self, column: impl Into<String>, statistics: Statistics) {
        self.statistics.insert(column.into(), statistics);
    }

    pub fn statistics(&self, column: &str) -> Option<&Statistics> {
        self.statistics.get(column)
    }

    /// Recomputes statistics of the numeric top-level columns of every
    /// ranking over the full orders.
    pub async fn refresh_statistics(&mut self) {
        let rankings = self.provider.rankings();
        let orders: Vec<&[RowId]> = rankings.iter().map(|r| r.order()).collect();
        let data = self.provider.fetch(&orders);

        let mut computed = HashMap::new();
        for (ranking, rows) in rankings.iter().zip(data) {
            let rows = join_all(rows).await;
            for id in ranking.visible_top_level() {
                let Some(column) = ranking.column(id) else {
                    continue;
                };
                if !column.is_numeric() {
                    continue;
                }
                let stats = Statistics::compute(rows.iter().map(|row| ranking.value(id, row)));
                computed.insert(column.id().to_string(), stats);
            }
        }
        self.statistics.extend(computed);
    }

    fn row_layout(&self, max_rows: usize) -> RowLayout {
        let rankings = self.provider.rankings();
        match &self.row_height {
            None => RowLayout::uniform(self.options.row_height, max_rows),
            Some(generator) => {
                let longest = rankings
                    .iter()
                    .max_by_key(|r| r.order().len())
                    .map(|r| r.order())
                    .unwrap_or(&[]);
                RowLayout::generated(&**generator, longest)
            }
        }
    }

    fn slots(&self, index: usize, columns: Vec<FlatColumn>) -> Vec<ColumnSlot> {
        let ranking = &self.provider.rankings()[index];
        columns
            .into_iter()
            .map(|flat| ColumnSlot {
                column: flat.column,
                type_name: ranking
                    .column(flat.column)
                    .map_or("default", |c| c.type_name()),
                shift: flat.shift,
                width: flat.width,
            })
            .collect()
    }

    fn mean_lines(&self, index: usize, columns: &[ColumnSlot], height: f64) -> Vec<MeanLine> {
        if !self.options.mean_line {
            return Vec::new();
        }
        let ranking = &self.provider.rankings()[index];
        columns
            .iter()
            .filter_map(|slot| {
                let column = ranking.column(slot.column)?;
                if !column.is_numeric() || column.is_compressed() || column.parent().is_some() {
                    return None;
                }
                let stats = self.statistics.get(column.id())?;
                let x = slot.shift + slot.width * stats.mean;
                Some(MeanLine {
                    column: slot.column,
                    x: if x.is_nan() { 0.0 } else { x },
                    height,
                })
            })
            .collect()
    }

    /// Composes a frame of the current provider state.
    pub fn update(&mut self, reason: RenderReason) -> BodyFrame {
        let rankings = self.provider.rankings();
        let max_rows = rankings.iter().map(|r| r.order().len()).max().unwrap_or(0);
        let rows = self.row_layout(max_rows);
        let height = rows.total_height();
        let visible = self.slicer.slice(0, max_rows, &rows);

        let orders: Vec<Vec<RowId>> = rankings
            .iter()
            .map(|r| slice_order(r.order(), visible).to_vec())
            .collect();
        let slices: Vec<&[RowId]> = orders.iter().map(Vec::as_slice).collect();
        let mut data = self.provider.fetch(&slices).into_iter();

        let padding = self.options.column_padding;
        let slope_width = self.options.slope_width;
        let mut total_width = 0.0;
        let mut frames = Vec::with_capacity(rankings.len());
        let mut ids = HashSet::with_capacity(rankings.len());
        for (index, (ranking, order)) in rankings.iter().zip(orders).enumerate() {
            let pending = data.next().unwrap_or_default();
            // diff state and ranking changes are keyed by id
            if !ids.insert(ranking.id()) {
                log::warn!("skipping ranking {} at {}: id already rendered", ranking.id(), index);
                continue;
            }
            let shift = total_width;
            let (width, flat) = flatten_ranking(ranking, 0.0, FlattenDepth::Levels(1), padding);
            total_width += width + slope_width;

            let split = split_frozen(flat, self.options.freeze_cols);
            let frozen = self.slots(index, split.frozen);
            let columns = self.slots(index, split.scrolling);
            let mean_lines = self.mean_lines(index, &columns, height);

            let next: Vec<(RowId, f64)> = order
                .iter()
                .enumerate()
                .map(|(i, &row)| (row, rows.bounds(visible.from + i).y))
                .collect();
            let diff = self.diffs.advance(ranking.id(), next);
            let placements = OrderDiffState::placements(&diff);

            frames.push(RankingFrame {
                id: ranking.id().to_string(),
                index,
                order,
                shift,
                width,
                frozen,
                frozen_width: split.frozen_width,
                columns,
                diff,
                placements,
                mean_lines,
                data: PendingRows(pending),
            });
        }
        if !frames.is_empty() {
            total_width -= slope_width;
        }

        let live: Vec<&str> = rankings.iter().map(|r| r.id()).collect();
        self.diffs.retain(&live);

        let shifts: Vec<(String, f64)> = frames.iter().map(|f| (f.id.clone(), f.shift)).collect();
        let ranking_changes = diff_positions(&self.previous_shifts, &shifts);
        self.previous_shifts = shifts;

        let ctx = BodyContext::new(&rows, &self.options, &self.renderers, visible);
        let slopes = frames
            .windows(2)
            .map(|pair| {
                SlopeGraph::between(
                    pair[0].index,
                    pair[1].index,
                    &pair[0].order,
                    &pair[1].order,
                    &ctx,
                    pair[1].shift,
                    slope_width,
                    height,
                )
            })
            .collect();

        let frame = BodyFrame {
            reason,
            rankings: frames,
            slopes,
            width: total_width.max(0.0),
            height,
            visible,
            rows,
            freeze_left: self.freeze_left,
            ranking_changes,
        };
        log::debug!(
            "render {:?}: {} rankings, rows {}..{} of {}, {}x{}",
            reason,
            frame.rankings.len(),
            visible.from,
            visible.to,
            max_rows,
            frame.width,
            frame.height
        );
        self.events.emit(BodyEvent::RenderFinished {
            reason,
            width: frame.width,
            height: frame.height,
        });
        frame
    }

    pub fn scrolled(&mut self) -> BodyFrame {
        self.update(RenderReason::Scrolled)
    }

    /// Records the horizontal scroll offset frozen columns follow.
    pub fn update_freeze(&mut self, left: f64) {
        self.freeze_left = left;
    }

    pub fn freeze_left(&self) -> f64 {
        self.freeze_left
    }

    /// Toggles the selection of `row` and returns whether it is selected
    /// afterwards.
    pub fn select(&mut self, row: RowId, additional: bool) -> bool {
        self.provider.toggle_selection(row, additional);
        self.events
            .emit(BodyEvent::SelectionChanged(self.provider.selection()));
        self.provider.is_selected(row)
    }

    pub fn mouse_over(&mut self, row: RowId, hover: bool) {
        self.hovered = hover.then_some(row);
        self.events.emit(BodyEvent::HoverChanged(self.hovered));
    }

    /// Hovers `row` as if the pointer entered it.
    pub fn fake_hover(&mut self, row: RowId) {
        self.mouse_over(row, true);
    }

    pub fn hovered(&self) -> Option<RowId> {
        self.hovered
    }

    /// Handles pending provider notifications. Returns a new frame if row
    /// data became dirty.
    pub fn poll(&mut self) -> Option<BodyFrame> {
        let pending = self.provider_events.drain();
        if pending.contains(&ProviderEvent::SelectionChanged) {
            self.events
                .emit(BodyEvent::SelectionChanged(self.provider.selection()));
        }
        if pending.contains(&ProviderEvent::DirtyValues) {
            Some(self.update(RenderReason::Dirty))
        } else {
            None
        }
    }

    /// Waits for the rows of one ranking of `frame` and renders their
    /// cells. The rows are taken from the frame; resolving twice yields no
    /// rows the second time.
    pub async fn resolve_ranking(&self, frame: &mut BodyFrame, index: usize) -> Vec<RenderedRow> {
        let Some(ranking_frame) = frame.rankings.get_mut(index) else {
            return Vec::new();
        };
        let pending = std::mem::take(&mut ranking_frame.data.0);
        let rows = join_all(pending).await;

        let frame = &*frame;
        let ranking_frame = &frame.rankings[index];
        let Some(ranking) = self
            .provider
            .rankings()
            .get(ranking_frame.index)
            .filter(|r| r.id() == ranking_frame.id)
        else {
            log::warn!("ranking {} left before its rows resolved", ranking_frame.id);
            return Vec::new();
        };

        let body = BodyContext::new(&frame.rows, &self.options, &self.renderers, frame.visible);
        let ctx = RankingContext::new(body, &ranking_frame.placements);
        let render = |slots: &[ColumnSlot], i: usize, row: &lineup_model::DataRow| -> Vec<Cell> {
            slots
                .iter()
                .map(|slot| {
                    ctx.renderer(slot.type_name)
                        .render(ranking, slot.column, row, i, slot.width, &ctx)
                })
                .collect()
        };

        rows.iter()
            .enumerate()
            .map(|(i, row)| RenderedRow {
                row: row.id,
                y: ctx.cell_y(i),
                prev_y: ctx.cell_prev_y(i),
                height: ctx.row_height(i),
                selected: self.provider.is_selected(row.id),
                frozen: render(&ranking_frame.frozen, i, row),
                cells: render(&ranking_frame.columns, i, row),
            })
            .collect()
    }

    /// Resolves every ranking of `frame`.
    pub async fn resolve(&self, frame: &mut BodyFrame) -> Vec<Vec<RenderedRow>> {
        let mut resolved = Vec::with_capacity(frame.rankings.len());
        for index in 0..frame.rankings.len() {
            resolved.push(self.resolve_ranking(frame, index).await);
        }
        resolved
    }
}

impl<P: DataProvider + fmt::Debug> fmt::Debug for BodyRenderer<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyRenderer")
            .field("provider", &self.provider)
            .field("options", &self.options)
            .field("freeze_left", &self.freeze_left)
            .field("hovered", &self.hovered)
            .finish_non_exhaustive()
    }
}
