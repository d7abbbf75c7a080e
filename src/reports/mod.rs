use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use keyclimb::layout::Layout;
use keyclimb::optimizer::{EventKind, ProgressSink, SearchEvent};
use keyclimb::scorer::{ProfileWeights, Score, ScoreDetails};
use tracing::{debug, info};

pub fn print_layout_grid(name: &str, layout: &Layout) {
    println!("\nLayout: {}", name);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    for r in 0..layout.rows() {
        let cells: Vec<Cell> = layout
            .row(r)
            .iter()
            .map(|&b| {
                let s = if b == layout.blank() {
                    " ".to_string()
                } else {
                    (b as char).to_string()
                };
                Cell::new(s).set_alignment(CellAlignment::Center)
            })
            .collect();
        table.add_row(cells);
    }
    println!("{}", table);
}

pub fn print_scoring_report(results: &[(String, ScoreDetails)], w: &ProfileWeights) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Layout").add_attribute(Attribute::Bold),
        Cell::new("Total").fg(Color::Cyan),
        Cell::new(format!("Fing\nx{}", w.finger_conflict)),
        Cell::new(format!("Roll\nx{}", w.inward_roll)).fg(Color::Green),
        Cell::new(format!("Str\nx{}", w.strength)),
        Cell::new(format!("Alt\nx{}", w.hand_alternation)).fg(Color::Red),
        Cell::new("Clean"),
        Cell::new("Rolled"),
        Cell::new("Jammed"),
        Cell::new("Alternating"),
    ]);

    for i in 1..=9 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (name, d) in results {
        table.add_row(vec![
            Cell::new(name).add_attribute(Attribute::Bold),
            Cell::new(d.total).fg(Color::Cyan),
            Cell::new(d.finger_conflict),
            Cell::new(d.inward_roll).fg(Color::Green),
            Cell::new(d.strength),
            Cell::new(d.hand_alternation).fg(Color::Red),
            Cell::new(d.clean_ngrams),
            Cell::new(d.rolled_ngrams),
            Cell::new(d.jammed_ngrams),
            Cell::new(d.alternating_ngrams),
        ]);
    }
    println!("\n{}", table);
}

/// Renders search events on the console. Grids are printed only when the
/// outermost level reaches a new best.
pub struct ConsoleSink {
    run: usize,
    shown: std::cell::Cell<Option<Score>>,
}

impl ConsoleSink {
    pub fn new(run: usize) -> Self {
        Self {
            run,
            shown: std::cell::Cell::new(None),
        }
    }
}

impl ProgressSink for ConsoleSink {
    fn on_event(&self, event: &SearchEvent<'_>) {
        match event.kind {
            EventKind::Improved => debug!(
                "[run {}] level {} improved to {} ({} evaluations)",
                self.run, event.level, event.score, event.evaluations
            ),
            EventKind::Reset => debug!(
                "[run {}] back at level {} holding {} ({} failures)",
                self.run, event.level, event.score, event.failures
            ),
        }

        if event.level != 0 {
            return;
        }
        if self.shown.get().is_some_and(|s| event.score <= s) {
            return;
        }
        self.shown.set(Some(event.score));
        info!(
            "[run {}] New best: {} after {} evaluations",
            self.run, event.score, event.evaluations
        );
        print_layout_grid(&format!("run {} best", self.run), event.layout);
    }
}
