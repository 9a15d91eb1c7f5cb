//! Terminal tables.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use feed_model::Catalog;

use crate::export::ExportedFile;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

/// One row per catalog entry.
pub fn catalog_table(catalog: &Catalog) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Source"),
        header_cell("Encoding"),
        header_cell("Delimiters"),
    ]);
    apply_table_style(&mut table);
    for descriptor in catalog.iter() {
        let delimiters = descriptor
            .delimiters
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        table.add_row(vec![
            Cell::new(&descriptor.name),
            Cell::new(&descriptor.location),
            Cell::new(descriptor.encoding.name()),
            Cell::new(delimiters),
        ]);
    }
    table
}

/// The first `limit` rows of a loaded table; nulls render as empty cells.
pub fn preview_table(data: &feed_model::Table, limit: usize) -> Table {
    let mut table = Table::new();
    table.set_header(data.columns().iter().map(|c| header_cell(c)));
    apply_table_style(&mut table);
    for record in data.records().take(limit) {
        table.add_row(record.iter().map(|(_, value)| Cell::new(value.unwrap_or(""))));
    }
    table
}

/// Export summary: written files and failures.
pub fn export_table(outcomes: &[(&str, anyhow::Result<ExportedFile>)]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Output"),
    ]);
    apply_table_style(&mut table);
    for (category, outcome) in outcomes {
        match outcome {
            Ok(file) => table.add_row(vec![
                Cell::new(category),
                Cell::new(file.rows).set_alignment(CellAlignment::Right),
                Cell::new(file.columns).set_alignment(CellAlignment::Right),
                Cell::new(file.path.display()),
            ]),
            Err(error) => table.add_row(vec![
                Cell::new(category),
                Cell::new("-").set_alignment(CellAlignment::Right),
                Cell::new("-").set_alignment(CellAlignment::Right),
                Cell::new(format!("{error:#}")).fg(Color::Red),
            ]),
        };
    }
    table
}
