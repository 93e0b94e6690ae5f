use std::fs::File;

use futures::executor::block_on;
use lineup_body::{
    BodyOptions, BodyRenderer, Cell, DataProvider, EditorOptions, LocalDataProvider, MappingEditor, RenderReason,
    RenderedRow, ViewportSlicer,
};
use lineup_model::{Column, MappingFunction, Ranking};
use simplelog::{Config, LevelFilter, WriteLogger};

fn main() -> std::io::Result<()> {
    // Set up file logging
    let log_file = File::create("body.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let mut provider = LocalDataProvider::new(vec![
        serde_json::json!({"city": "Vienna", "population": 1.9, "area": 415}),
        serde_json::json!({"city": "Graz", "population": 0.29, "area": 127}),
        serde_json::json!({"city": "Linz", "population": 0.21, "area": 96}),
        serde_json::json!({"city": "Salzburg", "population": 0.16, "area": 66}),
        serde_json::json!({"city": "Innsbruck", "population": 0.13, "area": 105}),
    ]);
    provider
        .push_ranking(ranking("by population", "population", 2.0))
        .expect("rows have unique ids");
    provider
        .push_ranking(ranking("by area", "area", 450.0))
        .expect("rows have unique ids");

    let viewport = ViewportSlicer::new(80.0);
    let options = BodyOptions::default().row_height(20.0).slope_width(40.0).freeze_cols(1);
    let mut body = BodyRenderer::new(provider, viewport.clone(), options);

    let mut frame = body.update(RenderReason::Dirty);
    let rows = block_on(body.resolve(&mut frame));
    print_frame(&frame.rankings.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), &rows);
    for slope in &frame.slopes {
        println!("slope {} -> {}: {} lines", slope.left, slope.right, slope.lines.len());
    }

    // Narrow the area mapping to [0, 150] and drop cities without an area.
    let ranking = &body.provider().rankings()[1];
    let area = ranking.find("area").expect("column exists");
    let current = ranking.mapping(area).cloned().unwrap_or_default();
    let filter = ranking.filter(area).copied().unwrap_or_default();
    let mut editor = MappingEditor::new(&current, &current, filter, EditorOptions::default());
    editor.set_raw_max(150.0);
    editor.set_filter_missing(true);
    if let Some(ranking) = body.provider_mut().ranking_mut(1) {
        editor.commit_to(ranking, area).expect("area is a number column");
    }
    body.provider_mut().refresh().expect("rows have unique ids");

    viewport.scroll_to(20.0);
    if let Some(mut frame) = body.poll() {
        let rows = block_on(body.resolve(&mut frame));
        println!();
        print_frame(&frame.rankings.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), &rows);
    }
    Ok(())
}

fn ranking(id: &str, sort_by: &str, max: f64) -> Ranking {
    let mut ranking = Ranking::new(id);
    ranking.push(Column::string("city", "city").with_width(90.0));
    let mapping = MappingFunction::linear(0.0, max).expect("finite domain");
    let score = ranking.push(Column::number(sort_by, sort_by, mapping).with_width(60.0));
    ranking.sort_by(score).expect("column exists");
    ranking
}

fn print_frame(ids: &[&str], rankings: &[Vec<RenderedRow>]) {
    for (id, rows) in ids.iter().zip(rankings) {
        println!("== {}", id);
        for row in rows {
            let cells: Vec<String> = row.frozen.iter().chain(&row.cells).map(describe).collect();
            println!("{:>5.0}  {}", row.y, cells.join(" | "));
        }
    }
}

fn describe(cell: &Cell) -> String {
    match cell {
        Cell::Empty => "-".to_string(),
        Cell::Text(text) => format!("{:<10}", text),
        Cell::Bar { width, .. } => "#".repeat((width / 4.0).round() as usize),
        Cell::Segments { segments, .. } => format!("{} segments", segments.len()),
        Cell::BoxPlot { median, .. } => format!("median at {:.0}", median),
    }
}
