//! Workbook layout parser.
//!
//! Reads one named worksheet with calamine (format sniffed from the bytes, so
//! `.xlsx`, `.xlsm`, `.xlsb`, `.xls` and `.ods` all work) and splits it into
//! the three header rows and the data block. No TTD-specific logic here.

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::Cursor;
use std::path::Path;

use crate::error::{WorkbookError, WorkbookResult};
use crate::models::{CellValue, SheetLayout};

/// Number of header rows above the data block.
pub const HEADER_ROWS: usize = 3;

/// Open workbook bytes of any supported spreadsheet format.
fn open_bytes(bytes: &[u8]) -> WorkbookResult<Sheets<Cursor<&[u8]>>> {
    open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(WorkbookError::Open)
}

/// List the worksheet names of a workbook.
pub fn sheet_names(bytes: &[u8]) -> WorkbookResult<Vec<String>> {
    Ok(open_bytes(bytes)?.sheet_names())
}

/// Convert a calamine cell into a [`CellValue`].
pub fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Float(f) => CellValue::Float(*f),
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) if !dt.is_duration() => CellValue::DateTime(ndt),
            _ => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::String(s.clone())),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(e.to_string()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Read a worksheet as a dense grid anchored at cell A1.
///
/// Every row spans from column A to the last used column; rows run from
/// row 1 to the last used row. An empty worksheet yields an empty grid.
pub fn read_sheet_grid(bytes: &[u8], sheet: &str) -> WorkbookResult<Vec<Vec<CellValue>>> {
    let mut workbook = open_bytes(bytes)?;

    let available = workbook.sheet_names();
    if !available.iter().any(|name| name == sheet) {
        return Err(WorkbookError::SheetNotFound {
            sheet: sheet.to_string(),
            available,
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|source| WorkbookError::SheetRead {
            sheet: sheet.to_string(),
            source,
        })?;

    // calamine ranges start at the first used cell; positions below are absolute.
    let Some((last_row, last_col)) = range.end() else {
        return Ok(Vec::new());
    };

    let grid = (0..=last_row)
        .map(|r| {
            (0..=last_col)
                .map(|c| range.get_value((r, c)).map(convert_cell).unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(grid)
}

/// Parse the three header rows and the data block of `sheet`.
///
/// Row 1 and row 2 are padded with empty cells to the worksheet's maximum
/// column count; row 3 and the data rows cover the same extent.
pub fn parse_layout(bytes: &[u8], sheet: &str) -> WorkbookResult<SheetLayout> {
    let grid = read_sheet_grid(bytes, sheet)?;
    Ok(layout_from_grid(grid))
}

/// Parse the layout of a workbook on disk.
pub fn parse_layout_file<P: AsRef<Path>>(path: P, sheet: &str) -> WorkbookResult<SheetLayout> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_layout(&bytes, sheet)
}

/// Split a dense grid into header rows and data records.
pub fn layout_from_grid(grid: Vec<Vec<CellValue>>) -> SheetLayout {
    let column_count = grid.iter().map(Vec::len).max().unwrap_or(0);

    let mut rows = grid.into_iter();
    let mut header = || {
        let mut row = rows.next().unwrap_or_default();
        row.resize(column_count, CellValue::Empty);
        row
    };
    let row1 = header();
    let row2 = header();
    let row3 = header();

    let data = rows
        .map(|mut record| {
            record.resize(column_count, CellValue::Empty);
            record
        })
        .collect();

    SheetLayout {
        row1,
        row2,
        row3,
        data,
        column_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn workbook_bytes(sheet: &str, rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_parse_layout_pads_header_rows() {
        let bytes = workbook_bytes(
            "Sheet5",
            &[
                &["Category", "Quantity"],
                &["Category"],
                &["Cat", "Qty", "Extra"],
                &["Big Diaries", "2"],
            ],
        );

        let layout = parse_layout(&bytes, "Sheet5").unwrap();
        assert_eq!(layout.column_count, 3);
        assert_eq!(layout.row1, vec!["Category".into(), "Quantity".into(), CellValue::Empty]);
        assert_eq!(layout.row2, vec!["Category".into(), CellValue::Empty, CellValue::Empty]);
        assert_eq!(layout.row3.len(), 3);
        assert_eq!(layout.data.len(), 1);
        assert_eq!(layout.data[0][0], CellValue::from("Big Diaries"));
        assert_eq!(layout.data[0][2], CellValue::Empty);
    }

    #[test]
    fn test_interior_blank_rows_are_kept() {
        let bytes = workbook_bytes(
            "Sheet5",
            &[&["A"], &["A"], &["A"], &["1"], &[""], &["3"]],
        );
        let layout = parse_layout(&bytes, "Sheet5").unwrap();
        assert_eq!(layout.data.len(), 3);
        assert!(layout.data[1][0].is_empty());
    }

    #[test]
    fn test_missing_sheet_is_structural_error() {
        let bytes = workbook_bytes("Data", &[&["A"]]);
        match parse_layout(&bytes, "Sheet5") {
            Err(WorkbookError::SheetNotFound { sheet, available }) => {
                assert_eq!(sheet, "Sheet5");
                assert_eq!(available, vec!["Data".to_string()]);
            }
            other => panic!("expected SheetNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_bytes_fail_to_open() {
        let result = parse_layout(b"this is not a spreadsheet", "Sheet5");
        assert!(matches!(result, Err(WorkbookError::Open(_))));
    }

    #[test]
    fn test_layout_from_short_grid() {
        let layout = layout_from_grid(vec![vec!["Only".into()]]);
        assert_eq!(layout.row1, vec![CellValue::from("Only")]);
        assert_eq!(layout.row2, vec![CellValue::Empty]);
        assert_eq!(layout.row3, vec![CellValue::Empty]);
        assert!(layout.data.is_empty());
    }

    #[test]
    fn test_convert_cell_numbers() {
        assert_eq!(convert_cell(&Data::Float(2.0)), CellValue::Float(2.0));
        assert_eq!(convert_cell(&Data::Int(7)), CellValue::Int(7));
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(
            convert_cell(&Data::DateTimeIso("2024-03-15".into())),
            CellValue::DateTime(
                NaiveDate::from_ymd_opt(2024, 3, 15)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            )
        );
    }
}
