//! Cell renderers and their registry.

mod cells;

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use lineup_model::{ColumnId, DataRow, Ranking};

use crate::context::RenderContext;

pub use cells::{BarRenderer, BoxPlotRenderer, StackRenderer, TextRenderer};

/// One stacked bar segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub column: ColumnId,
    pub x: f64,
    pub width: f64,
}

/// Drawing instructions for a single cell, in cell-local pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing value.
    Empty,
    Text(String),
    Bar {
        y: f64,
        width: f64,
        height: f64,
    },
    Segments {
        y: f64,
        height: f64,
        segments: Vec<Segment>,
    },
    BoxPlot {
        min: f64,
        q1: f64,
        median: f64,
        q3: f64,
        max: f64,
        y: f64,
        height: f64,
    },
}

/// Turns a row's value in a column into a [`Cell`].
pub trait CellRenderer: Debug + Send + Sync {
    /// `index` is the row's position within the rendered slice.
    fn render(
        &self,
        ranking: &Ranking,
        column: ColumnId,
        row: &DataRow,
        index: usize,
        width: f64,
        ctx: &dyn RenderContext,
    ) -> Cell;
}

/// Key of the renderer used for column types without their own.
pub const DEFAULT_RENDERER: &str = "default";

/// Cell renderers by column type name.
#[derive(Debug, Clone)]
pub struct RendererRegistry {
    renderers: HashMap<String, Arc<dyn CellRenderer>>,
}

impl Default for RendererRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(DEFAULT_RENDERER, TextRenderer);
        registry.register("string", TextRenderer);
        registry.register("categorical", TextRenderer);
        registry.register("number", BarRenderer);
        registry.register("mean", BarRenderer);
        registry.register("stack", StackRenderer);
        registry.register("boxplot", BoxPlotRenderer);
        registry
    }
}

impl RendererRegistry {
    /// Registry with the built-in renderers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry without any renderer; lookups fall back to text.
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Registers `renderer` for a column type, replacing any previous one.
    pub fn register(&mut self, type_name: impl Into<String>, renderer: impl CellRenderer + 'static) {
        self.renderers.insert(type_name.into(), Arc::new(renderer));
    }

    /// Renderer for `type_name`, else the default one.
    pub fn get(&self, type_name: &str) -> &dyn CellRenderer {
        self.renderers
            .get(type_name)
            .or_else(|| self.renderers.get(DEFAULT_RENDERER))
            .map(|renderer| &**renderer)
            .unwrap_or(&TextRenderer)
    }
}
