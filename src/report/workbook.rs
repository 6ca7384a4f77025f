use crate::reconcile::ResultRecord;
use std::path::Path;

pub const SHEET_NAME: &str = "Reporte";
pub const LABEL_COLUMN: &str = "Contenedor - Folio";
pub const SACKS_COLUMN: &str = "Sacos PDF";

const WIDTH_PADDING: usize = 2;

/// Write the report workbook: the synthesized label column first, then the
/// selected master columns (plus the sack column in sacks mode), auto-filter
/// over the occupied range, and column widths sized to the longest
/// stringified cell plus padding.
pub fn write_report(
    path: &Path,
    records: &[ResultRecord],
    columns: &[String],
    include_sacks: bool,
) -> Result<(), String> {
    let grid = build_grid(records, columns, include_sacks);

    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_by_name_mut("Sheet1")
        .ok_or_else(|| "new workbook is missing its default sheet".to_owned())?;
    sheet.set_name(SHEET_NAME);

    for (row_index, row) in grid.iter().enumerate() {
        for (column_index, value) in row.iter().enumerate() {
            sheet
                .get_cell_mut(((column_index + 1) as u32, (row_index + 1) as u32))
                .set_value(value.as_str());
        }
    }

    let column_count = grid.first().map(Vec::len).unwrap_or(0);
    for column_index in 0..column_count {
        let width = grid
            .iter()
            .filter_map(|row| row.get(column_index))
            .map(|value| value.chars().count())
            .max()
            .unwrap_or(0)
            + WIDTH_PADDING;
        let letter = column_letter(column_index + 1);
        sheet
            .get_column_dimension_mut(letter.as_str())
            .set_width(width as f64);
    }

    let filter_range = format!(
        "A1:{}{}",
        column_letter(column_count.max(1)),
        grid.len().max(1)
    );
    sheet.set_auto_filter(filter_range.as_str());

    umya_spreadsheet::writer::xlsx::write(&book, path)
        .map_err(|error| format!("failed writing report '{}': {error}", path.display()))
}

fn build_grid(
    records: &[ResultRecord],
    columns: &[String],
    include_sacks: bool,
) -> Vec<Vec<String>> {
    let mut headers = vec![LABEL_COLUMN.to_owned()];
    if include_sacks {
        headers.push(SACKS_COLUMN.to_owned());
    }
    headers.extend(columns.iter().cloned());

    let mut grid = vec![headers];
    for record in records {
        let mut row = vec![record.label.clone()];
        if include_sacks {
            row.push(record.sacks.unwrap_or(0).to_string());
        }
        for column in columns {
            row.push(record.field(column).unwrap_or("").to_owned());
        }
        grid.push(row);
    }

    grid
}

fn column_letter(column: usize) -> String {
    let mut remaining = column;
    let mut letters = Vec::new();
    while remaining > 0 {
        let modulo = (remaining - 1) % 26;
        letters.push((b'A' + modulo as u8) as char);
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}
