use crate::format::{HEADERS, cells};
use analytics::SummaryRow;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, ContentArrangement, Table};

/// Renders the summary as a console table, numeric columns right-aligned.
pub fn render_console(rows: &[SummaryRow]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(HEADERS);

    for row in rows {
        table.add_row(cells(row));
    }
    for index in 3..HEADERS.len() {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Sector;

    #[test]
    fn console_table_mentions_every_commodity() {
        let rows = vec![
            SummaryRow::new("Gold", Some(Sector::Metals), Some("GC")),
            SummaryRow::new("Corn", Some(Sector::Agriculture), Some("C-")),
        ];
        let out = render_console(&rows);
        assert!(out.contains("Gold"));
        assert!(out.contains("Corn"));
        assert!(out.contains("Sharpe ratio"));
    }
}
