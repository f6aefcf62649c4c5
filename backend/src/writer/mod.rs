//! Output workbook serializer.
//!
//! Writes a single `Sheet1`: the literal row 3 header line, then one row per
//! record with output columns packed from column A in resolution order.

use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet};

use crate::error::WriteResult;
use crate::models::{CellValue, OutputTable};

/// Name of the single output worksheet.
pub const OUTPUT_SHEET: &str = "Sheet1";

/// MIME type of the produced workbook.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Number format applied to date cells so they stay dates.
const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

fn write_cell(
    worksheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    value: &CellValue,
    date_format: &Format,
) -> WriteResult<()> {
    match value {
        // Empty cells are simply not written.
        CellValue::Empty => {}
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::Int(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Float(f) => {
            worksheet.write_number(row, col, *f)?;
        }
        CellValue::String(s) => {
            worksheet.write_string(row, col, s)?;
        }
        CellValue::DateTime(dt) => {
            worksheet.write_datetime_with_format(row, col, dt, date_format)?;
        }
    }
    Ok(())
}

/// Serialize the output table under the literal `header` row.
pub fn write_workbook(header: &[CellValue], table: &OutputTable) -> WriteResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(OUTPUT_SHEET)?;

    for (col, value) in header.iter().enumerate() {
        write_cell(worksheet, 0, col as ColNum, value, &date_format)?;
    }

    for (col, column) in table.columns.iter().enumerate() {
        for (row, value) in column.values.iter().enumerate() {
            write_cell(worksheet, row as RowNum + 1, col as ColNum, value, &date_format)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}
