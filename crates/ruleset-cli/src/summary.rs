//! Terminal tables for command output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ruleset_core::GenerateReport;

const TABLE_WIDTH: u16 = 120;

pub fn print_summary(report: &GenerateReport) {
    println!("Output: {}", report.output.display());
    if !report.namespace.is_empty() {
        println!("Namespace: {}", report.namespace);
    }
    println!("{}", summary_table(report));
}

/// One row per category reference, in output order, plus a total.
pub fn summary_table(report: &GenerateReport) -> Table {
    let mut table = new_table(&["#", "Category", "Excluded rules"]);
    right_align(&mut table, &[0, 2]);
    for (index, category) in report.categories.iter().enumerate() {
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(&category.reference).fg(Color::Blue),
            count_cell(category.rule_count),
        ]);
    }
    table.add_row(vec![
        dim_cell(""),
        Cell::new("TOTAL").add_attribute(Attribute::Bold),
        Cell::new(report.total_rules()).add_attribute(Attribute::Bold),
    ]);
    table
}

/// A table with a bold cyan header and the shared rounded style.
pub fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(TABLE_WIDTH)
        .set_header(header.iter().map(|label| {
            Cell::new(label)
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold)
        }));
    table
}

pub fn right_align(table: &mut Table, columns: &[usize]) {
    for &index in columns {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn count_cell(count: usize) -> Cell {
    match count {
        0 => dim_cell(count),
        _ => Cell::new(count),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
