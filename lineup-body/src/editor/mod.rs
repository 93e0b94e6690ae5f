//! Interactive editing of a number column's mapping and filter.
//!
//! A [`MappingEditor`] works on a clone of the column's mapping. Edits go
//! through pixel positions on two horizontal axes of the same width: the
//! normalized axis `[0, 1]` on top and the raw value axis below it, with a
//! band of filter handles under the raw axis. The live column is only
//! touched by [`MappingEditor::commit_to`]; dropping the editor cancels.

mod options;
mod preset;
mod scale;

pub use options::CommitPolicy;
pub use options::EditorOptions;
pub use preset::MappingPreset;
pub use scale::LinearScale;

use std::collections::HashSet;
use std::fmt;
use std::future::Future;

use lineup_model::error::{ColumnError, MappingError};
use lineup_model::{ColumnId, MappingFunction, NumberFilter, Ranking};

/// Listener notified with a fresh clone of the mapping and the filter.
pub type ChangeListener = Box<dyn FnMut(MappingFunction, NumberFilter)>;

/// What a drag gesture grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    /// The line joining both ends of control point `i`.
    Line(usize),
    /// The normalized end of control point `i`.
    Normalized(usize),
    /// The raw end of control point `i`.
    Raw(usize),
    FilterMin,
    FilterMax,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Start(DragTarget),
    /// Pointer at `x`, moved by `dx` since the last event.
    Move { x: f64, dx: f64 },
    End,
}

/// A distinct data value drawn behind the mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleLine {
    pub raw: f64,
    pub x_normalized: f64,
    pub x_raw: f64,
    /// Whether `raw` lies inside the mapping's domain.
    pub visible: bool,
}

/// A control point with the pixel positions of both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingLine {
    pub index: usize,
    pub raw: f64,
    pub normalized: f64,
    pub x_raw: f64,
    pub x_normalized: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Discrete,
    Move,
    GestureEnd,
}

pub struct MappingEditor {
    options: EditorOptions,
    mapping: MappingFunction,
    raw: LinearScale,
    normalized: LinearScale,
    filter_min: f64,
    filter_max: f64,
    filter_missing: bool,
    samples: Vec<f64>,
    gesture: Option<DragTarget>,
    listener: Option<ChangeListener>,
}

impl MappingEditor {
    /// Starts a session on a clone of `current`.
    ///
    /// The raw axis spans both `current` and `original`, so a mapping that
    /// was narrowed can be widened back.
    pub fn new(
        current: &MappingFunction,
        original: &MappingFunction,
        previous_filter: NumberFilter,
        options: EditorOptions,
    ) -> Self {
        let width = options.inner_width();
        let (cur_min, cur_max) = current.domain_extent();
        let (orig_min, orig_max) = original.domain_extent();
        let raw = LinearScale::new([cur_min.min(orig_min), cur_max.max(orig_max)], [0.0, width]);
        let normalized = LinearScale::new([0.0, 1.0], [0.0, width]);
        Self {
            options,
            mapping: current.clone(),
            raw,
            normalized,
            filter_min: previous_filter.min(),
            filter_max: previous_filter.max(),
            filter_missing: previous_filter.filter_missing(),
            samples: Vec::new(),
            gesture: None,
            listener: None,
        }
    }

    /// Sets the listener notified according to the commit policy.
    pub fn on_change(&mut self, listener: impl FnMut(MappingFunction, NumberFilter) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn mapping(&self) -> &MappingFunction {
        &self.mapping
    }

    /// Raw value range covered by the raw axis.
    pub fn raw_extent(&self) -> (f64, f64) {
        let [min, max] = self.raw.domain();
        (min, max)
    }

    pub fn raw_scale(&self) -> &LinearScale {
        &self.raw
    }

    pub fn normalized_scale(&self) -> &LinearScale {
        &self.normalized
    }

    /// Awaits the column's data values and keeps the distinct ones.
    pub async fn load_samples<F>(&mut self, values: F)
    where
        F: Future<Output = Vec<f64>>,
    {
        let values = values.await;
        self.set_samples(values);
    }

    pub fn set_samples(&mut self, values: Vec<f64>) {
        let mut seen = HashSet::new();
        self.samples = values
            .into_iter()
            .filter(|v| !v.is_nan() && seen.insert(v.to_bits()))
            .collect();
        log::debug!("mapping editor loaded {} distinct samples", self.samples.len());
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_lines(&self) -> Vec<SampleLine> {
        let (min, max) = self.mapping.domain_extent();
        self.samples
            .iter()
            .map(|&raw| SampleLine {
                raw,
                x_normalized: self.normalized.apply(self.mapping.apply(raw)),
                x_raw: self.raw.apply(raw),
                visible: min <= raw && raw <= max,
            })
            .collect()
    }

    /// Control points of a scale mapping. Empty for scripts.
    pub fn mapping_lines(&self) -> Vec<MappingLine> {
        let Some(scale) = self.mapping.as_scale() else {
            return Vec::new();
        };
        scale
            .points()
            .enumerate()
            .map(|(index, (raw, normalized))| MappingLine {
                index,
                raw,
                normalized,
                x_raw: self.raw.apply(raw),
                x_normalized: self.normalized.apply(normalized),
            })
            .collect()
    }

    /// Adds a vertical control point at pixel `px`. Returns its index.
    pub fn add_point_at(&mut self, px: f64) -> Option<usize> {
        let px = self.clamp_px(px);
        let raw = self.raw.invert(px);
        let normalized = self.normalized.invert(px);
        let index = self.mapping.as_scale_mut()?.add_control_point(raw, normalized)?;
        self.fire(Edit::Discrete);
        Some(index)
    }

    /// Removes control point `index`; a mapping keeps at least two.
    pub fn remove_point(&mut self, index: usize) -> bool {
        let removed = self
            .mapping
            .as_scale_mut()
            .is_some_and(|scale| scale.remove_control_point(index));
        if removed {
            self.fire(Edit::Discrete);
        }
        removed
    }

    pub fn handle(&mut self, event: GestureEvent) {
        match event {
            GestureEvent::Start(target) => {
                let on_point = matches!(
                    target,
                    DragTarget::Line(_) | DragTarget::Normalized(_) | DragTarget::Raw(_)
                );
                self.gesture = if on_point && self.mapping.as_scale().is_none() {
                    None
                } else {
                    Some(target)
                };
            }
            GestureEvent::Move { x, dx } => {
                let Some(target) = self.gesture else {
                    return;
                };
                if self.drag(target, x, dx) {
                    self.fire(Edit::Move);
                }
            }
            GestureEvent::End => {
                if self.gesture.take().is_some() {
                    self.fire(Edit::GestureEnd);
                }
            }
        }
    }

    fn drag(&mut self, target: DragTarget, x: f64, dx: f64) -> bool {
        match target {
            DragTarget::FilterMin => {
                let px = self.clamp_px(x);
                let value = if px <= 0.0 {
                    f64::NEG_INFINITY
                } else {
                    self.raw.invert(px)
                };
                self.filter_min = value.min(self.filter_max);
                true
            }
            DragTarget::FilterMax => {
                let px = self.clamp_px(x);
                let value = if px >= self.options.inner_width() {
                    f64::INFINITY
                } else {
                    self.raw.invert(px)
                };
                self.filter_max = value.max(self.filter_min);
                true
            }
            DragTarget::Line(i) | DragTarget::Normalized(i) | DragTarget::Raw(i) => {
                let width = self.options.inner_width();
                let (raw_scale, norm_scale) = (self.raw, self.normalized);
                let Some(scale) = self.mapping.as_scale_mut() else {
                    return false;
                };
                let Some((raw, normalized)) = scale.point(i) else {
                    return false;
                };
                let clamp = |px: f64| px.clamp(0.0, width);
                let (raw, normalized) = match target {
                    DragTarget::Line(_) => (
                        raw_scale.invert(clamp(raw_scale.apply(raw) + dx)),
                        norm_scale.invert(clamp(norm_scale.apply(normalized) + dx)),
                    ),
                    DragTarget::Normalized(_) => (raw, norm_scale.invert(clamp(x))),
                    _ => (raw_scale.invert(clamp(x)), normalized),
                };
                let to = scale.move_control_point(i, raw, normalized);
                self.gesture = Some(match target {
                    DragTarget::Line(_) => DragTarget::Line(to),
                    DragTarget::Normalized(_) => DragTarget::Normalized(to),
                    _ => DragTarget::Raw(to),
                });
                true
            }
        }
    }

    /// Moves the lower end of the raw axis and the first control point.
    /// Values above the upper end are clamped to it.
    pub fn set_raw_min(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        let [_, max] = self.raw.domain();
        let value = value.min(max);
        self.raw.set_domain([value, max]);
        self.mapping.set_domain_min(value);
        self.fire(Edit::Discrete);
    }

    /// Moves the upper end of the raw axis and the last control point.
    /// Values below the lower end are clamped to it.
    pub fn set_raw_max(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        let [min, _] = self.raw.domain();
        let value = value.max(min);
        self.raw.set_domain([min, value]);
        self.mapping.set_domain_max(value);
        self.fire(Edit::Discrete);
    }

    pub fn set_filter_missing(&mut self, filter_missing: bool) {
        self.filter_missing = filter_missing;
        self.fire(Edit::Discrete);
    }

    /// Replaces the code of a script mapping. False for scale mappings.
    pub fn set_script_code(&mut self, code: impl Into<String>) -> bool {
        let Some(script) = self.mapping.as_script_mut() else {
            return false;
        };
        script.set_code(code);
        self.fire(Edit::Discrete);
        true
    }

    /// Replaces the mapping with `preset` built over the raw extent.
    pub fn set_preset(&mut self, preset: MappingPreset) -> Result<(), MappingError> {
        let (min, max) = self.raw_extent();
        self.mapping = preset.build(min, max)?;
        log::debug!("mapping editor switched to {}", preset);
        self.fire(Edit::Discrete);
        Ok(())
    }

    pub fn preset(&self) -> Option<MappingPreset> {
        MappingPreset::detect(&self.mapping)
    }

    /// Pixel positions of the filter handles.
    pub fn filter_handles(&self) -> (f64, f64) {
        let width = self.options.inner_width();
        let min = if self.filter_min.is_finite() {
            self.clamp_px(self.raw.apply(self.filter_min))
        } else {
            0.0
        };
        let max = if self.filter_max.is_finite() {
            self.clamp_px(self.raw.apply(self.filter_max))
        } else {
            width
        };
        (min, max)
    }

    pub fn filter(&self) -> NumberFilter {
        let (min, max) = if self.filter_min <= self.filter_max {
            (self.filter_min, self.filter_max)
        } else {
            (self.filter_max, self.filter_min)
        };
        NumberFilter::new(min, max, self.filter_missing)
            .unwrap_or_else(|_| NumberFilter::unbounded().with_filter_missing(self.filter_missing))
    }

    /// Ends the session, handing back the edited mapping and filter.
    pub fn commit(self) -> (MappingFunction, NumberFilter) {
        let filter = self.filter();
        (self.mapping, filter)
    }

    /// Ends the session, writing the result into `column` of `ranking`.
    pub fn commit_to(self, ranking: &mut Ranking, column: ColumnId) -> Result<(), ColumnError> {
        let (mapping, filter) = self.commit();
        ranking.set_mapping(column, mapping)?;
        ranking.set_filter(column, filter)
    }

    fn clamp_px(&self, px: f64) -> f64 {
        if px.is_nan() {
            return 0.0;
        }
        px.clamp(0.0, self.options.inner_width())
    }

    fn fire(&mut self, edit: Edit) {
        let notify = match self.options.commit {
            CommitPolicy::EveryEdit => edit != Edit::GestureEnd,
            CommitPolicy::GestureEnd => edit != Edit::Move,
        };
        if !notify {
            return;
        }
        let filter = self.filter();
        let mapping = self.mapping.clone();
        if let Some(listener) = self.listener.as_mut() {
            listener(mapping, filter);
        }
    }
}

impl fmt::Debug for MappingEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingEditor")
            .field("options", &self.options)
            .field("mapping", &self.mapping)
            .field("raw", &self.raw)
            .field("filter_min", &self.filter_min)
            .field("filter_max", &self.filter_max)
            .field("filter_missing", &self.filter_missing)
            .field("samples", &self.samples.len())
            .field("gesture", &self.gesture)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn editor(mapping: MappingFunction) -> MappingEditor {
        // 100 px wide axes
        let options = EditorOptions::default().size(114.0, 225.0);
        MappingEditor::new(&mapping, &mapping, NumberFilter::unbounded(), options)
    }

    #[test]
    fn test_axes_span_current_and_original() {
        let current = MappingFunction::linear(10.0, 20.0).unwrap();
        let original = MappingFunction::linear(0.0, 15.0).unwrap();
        let editor = MappingEditor::new(&current, &original, NumberFilter::unbounded(), EditorOptions::default());
        assert_eq!(editor.raw_extent(), (0.0, 20.0));
        assert_eq!(editor.options().inner_width(), 356.0);
        assert_eq!(editor.options().inner_height(), 191.0);
    }

    #[test]
    fn test_add_point_at_pixel() {
        let mut editor = editor(MappingFunction::linear(0.0, 100.0).unwrap());
        assert_eq!(editor.add_point_at(25.0), Some(1));
        let lines = editor.mapping_lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].raw, 25.0);
        assert_eq!(lines[1].normalized, 0.25);
        assert_eq!(lines[1].x_raw, 25.0);
    }

    #[test]
    fn test_remove_point_keeps_two() {
        let mut editor = editor(MappingFunction::linear(0.0, 100.0).unwrap());
        assert!(!editor.remove_point(0));
        editor.add_point_at(50.0);
        assert!(editor.remove_point(1));
        assert_eq!(editor.mapping_lines().len(), 2);
    }

    #[test]
    fn test_drag_normalized_end() {
        let mut editor = editor(MappingFunction::linear(0.0, 100.0).unwrap());
        editor.handle(GestureEvent::Start(DragTarget::Normalized(1)));
        editor.handle(GestureEvent::Move { x: 40.0, dx: -60.0 });
        editor.handle(GestureEvent::End);
        let scale = editor.mapping().as_scale().unwrap();
        assert_eq!(scale.point(1), Some((100.0, 0.4)));
    }

    #[test]
    fn test_drag_line_shifts_both_ends() {
        let mut editor = editor(MappingFunction::linear(0.0, 100.0).unwrap());
        editor.add_point_at(50.0);
        editor.handle(GestureEvent::Start(DragTarget::Line(1)));
        editor.handle(GestureEvent::Move { x: 60.0, dx: 10.0 });
        let scale = editor.mapping().as_scale().unwrap();
        assert_eq!(scale.point(1), Some((60.0, 0.6)));
    }

    #[test]
    fn test_drag_clamps_to_axis() {
        let mut editor = editor(MappingFunction::linear(0.0, 100.0).unwrap());
        editor.handle(GestureEvent::Start(DragTarget::Raw(0)));
        editor.handle(GestureEvent::Move { x: -30.0, dx: -30.0 });
        let scale = editor.mapping().as_scale().unwrap();
        assert_eq!(scale.point(0), Some((0.0, 0.0)));
    }

    #[test]
    fn test_filter_handles_at_edges_unbound() {
        let mut editor = editor(MappingFunction::linear(0.0, 100.0).unwrap());
        editor.handle(GestureEvent::Start(DragTarget::FilterMin));
        editor.handle(GestureEvent::Move { x: 20.0, dx: 20.0 });
        editor.handle(GestureEvent::End);
        assert_eq!(editor.filter().min(), 20.0);
        assert_eq!(editor.filter_handles(), (20.0, 100.0));

        editor.handle(GestureEvent::Start(DragTarget::FilterMin));
        editor.handle(GestureEvent::Move { x: -5.0, dx: -25.0 });
        assert_eq!(editor.filter().min(), f64::NEG_INFINITY);

        editor.handle(GestureEvent::Start(DragTarget::FilterMax));
        editor.handle(GestureEvent::Move { x: 70.0, dx: -30.0 });
        assert_eq!(editor.filter().max(), 70.0);
        editor.handle(GestureEvent::Move { x: 150.0, dx: 80.0 });
        assert_eq!(editor.filter().max(), f64::INFINITY);
    }

    #[test]
    fn test_point_gestures_ignored_for_scripts() {
        let mut editor = editor(MappingFunction::linear(0.0, 100.0).unwrap());
        editor.set_preset(MappingPreset::Script).unwrap();
        let before = editor.mapping().clone();
        editor.handle(GestureEvent::Start(DragTarget::Raw(0)));
        editor.handle(GestureEvent::Move { x: 50.0, dx: 50.0 });
        assert_eq!(editor.mapping(), &before);
        assert!(editor.mapping_lines().is_empty());
        assert!(editor.set_script_code("value / value_max"));
    }

    #[test]
    fn test_every_edit_policy_fires_on_moves() {
        let calls = Rc::new(RefCell::new(0));
        let mut editor = editor(MappingFunction::linear(0.0, 100.0).unwrap());
        let counter = Rc::clone(&calls);
        editor.on_change(move |_, _| *counter.borrow_mut() += 1);
        editor.handle(GestureEvent::Start(DragTarget::Raw(1)));
        editor.handle(GestureEvent::Move { x: 90.0, dx: -10.0 });
        editor.handle(GestureEvent::Move { x: 80.0, dx: -10.0 });
        editor.handle(GestureEvent::End);
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn test_gesture_end_policy_fires_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mapping = MappingFunction::linear(0.0, 100.0).unwrap();
        let options = EditorOptions::default()
            .size(114.0, 225.0)
            .commit(CommitPolicy::GestureEnd);
        let mut editor = MappingEditor::new(&mapping, &mapping, NumberFilter::unbounded(), options);
        let sink = Rc::clone(&seen);
        editor.on_change(move |m, f| sink.borrow_mut().push((m, f)));
        editor.handle(GestureEvent::Start(DragTarget::Raw(1)));
        editor.handle(GestureEvent::Move { x: 90.0, dx: -10.0 });
        editor.handle(GestureEvent::Move { x: 80.0, dx: -10.0 });
        assert!(seen.borrow().is_empty());
        editor.handle(GestureEvent::End);
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].0.domain(), &[0.0, 80.0]);

        editor.set_filter_missing(true);
        assert_eq!(seen.borrow().len(), 2);
        assert!(seen.borrow()[1].1.filter_missing());
    }

    #[test]
    fn test_raw_extent_inputs() {
        let mut editor = editor(MappingFunction::linear(0.0, 100.0).unwrap());
        editor.set_raw_max(200.0);
        editor.set_raw_min(f64::NAN);
        assert_eq!(editor.raw_extent(), (0.0, 200.0));
        assert_eq!(editor.mapping().domain(), &[0.0, 200.0]);
    }

    #[test]
    fn test_raw_extent_inputs_cannot_cross() {
        let mut inverted = editor(MappingFunction::linear(0.0, 100.0).unwrap());
        inverted.set_preset(MappingPreset::LinearInvert).unwrap();
        inverted.set_raw_min(150.0);
        assert_eq!(inverted.raw_extent(), (100.0, 100.0));
        assert_eq!(inverted.mapping().domain(), &[100.0, 100.0]);
        assert_eq!(inverted.preset(), Some(MappingPreset::LinearInvert));

        let mut linear = editor(MappingFunction::linear(0.0, 100.0).unwrap());
        linear.set_raw_max(-20.0);
        assert_eq!(linear.raw_extent(), (0.0, 0.0));
        assert_eq!(linear.mapping().domain(), &[0.0, 0.0]);
    }

    #[test]
    fn test_presets_over_raw_extent() {
        let mut editor = editor(MappingFunction::linear(0.0, 100.0).unwrap());
        assert_eq!(editor.preset(), Some(MappingPreset::Linear));
        editor.set_preset(MappingPreset::LinearAbs).unwrap();
        assert_eq!(editor.preset(), Some(MappingPreset::LinearAbs));
        assert_eq!(editor.mapping().domain(), &[0.0, 50.0, 100.0]);
        editor.set_preset(MappingPreset::Pow2).unwrap();
        assert_eq!(editor.preset(), Some(MappingPreset::Pow2));
    }

    #[test]
    fn test_samples_are_distinct() {
        let mut editor = editor(MappingFunction::linear(0.0, 50.0).unwrap());
        futures::executor::block_on(editor.load_samples(async { vec![10.0, 10.0, f64::NAN, 80.0] }));
        let lines = editor.sample_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].x_raw, 20.0);
        assert_eq!(lines[0].x_normalized, 20.0);
        assert!(lines[0].visible);
        assert!(!lines[1].visible);
    }

    #[test]
    fn test_commit_to_ranking() {
        let mut ranking = Ranking::new("r");
        let column = ranking.push(lineup_model::Column::number(
            "score",
            "score",
            MappingFunction::linear(0.0, 10.0).unwrap(),
        ));
        let current = ranking.mapping(column).unwrap().clone();
        let mut editor = MappingEditor::new(&current, &current, NumberFilter::unbounded(), EditorOptions::default());
        editor.set_raw_max(20.0);
        editor.set_filter_missing(true);
        editor.commit_to(&mut ranking, column).unwrap();
        assert_eq!(ranking.mapping(column).unwrap().domain(), &[0.0, 20.0]);
        assert!(ranking.filter(column).unwrap().filter_missing());
    }

    #[test]
    fn test_drop_cancels() {
        let ranking_mapping = MappingFunction::linear(0.0, 10.0).unwrap();
        let mut editor = editor(ranking_mapping.clone());
        editor.set_raw_max(99.0);
        drop(editor);
        assert_eq!(ranking_mapping.domain(), &[0.0, 10.0]);
    }
}
