use std::collections::BTreeMap;
use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pii_cli::types::{ColumnSummary, ScanResult};

pub fn print_summary(result: &ScanResult) {
    println!("Input: {}", result.source.path.display());
    println!("Rows: {}", result.rows);
    println!(
        "Language: {}  Failure policy: {}",
        result.language, result.failure_policy
    );
    if let Some(path) = &result.profile_report {
        print_path("Profile report", path);
    }
    print_path("Analysis report", &result.analysis_report);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Values"),
        header_cell("Text"),
        header_cell("Flagged"),
        header_cell("Findings"),
        header_cell("Entities"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut totals = Totals::default();
    for column in &result.columns {
        totals.add(column);
        table.add_row(vec![
            column_cell(column),
            Cell::new(column.values),
            Cell::new(column.text_values),
            count_cell(column.values_with_findings, Color::Yellow),
            count_cell(column.findings, Color::Red),
            entities_cell(&column.entities),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(totals.values).add_attribute(Attribute::Bold),
        Cell::new(totals.text_values).add_attribute(Attribute::Bold),
        count_cell(totals.values_with_findings, Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(totals.findings, Color::Red).add_attribute(Attribute::Bold),
        entities_cell(&totals.entities).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    println!(
        "{} of {} columns contain personal data",
        result.flagged_columns(),
        result.columns.len()
    );
}

#[derive(Default)]
struct Totals {
    values: usize,
    text_values: usize,
    values_with_findings: usize,
    findings: usize,
    entities: BTreeMap<String, usize>,
}

impl Totals {
    fn add(&mut self, column: &ColumnSummary) {
        self.values += column.values;
        self.text_values += column.text_values;
        self.values_with_findings += column.values_with_findings;
        self.findings += column.findings;
        for (entity, count) in &column.entities {
            *self.entities.entry(entity.clone()).or_default() += count;
        }
    }
}

fn print_path(label: &str, path: &Path) {
    println!("{label}: {}", path.display());
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn column_cell(column: &ColumnSummary) -> Cell {
    if column.findings > 0 {
        Cell::new(&column.name)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new(&column.name)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn entities_cell(entities: &BTreeMap<String, usize>) -> Cell {
    if entities.is_empty() {
        return dim_cell("-");
    }
    Cell::new(format_entities(entities))
}

/// `EMAIL_ADDRESS (2), PERSON (1)`
fn format_entities(entities: &BTreeMap<String, usize>) -> String {
    entities
        .iter()
        .map(|(entity, count)| format!("{entity} ({count})"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
