//! Materializes the output table from a parsed layout.

use crate::api::logs::{log_info, log_info_indent, log_success};
use crate::error::FieldResult;
use crate::models::{CellValue, OutputColumn, OutputTable, SheetLayout};

use super::resolver::{ColumnResolver, ColumnSource, ComputedField, LiteralRule, ResolvedColumn};
use super::weight::WeightRules;

/// Transform a layout into the output table.
///
/// Physical weights are derived for every record up front, so a sheet
/// lacking `Quantity`, `Category` or `Sub Category` fails even when no
/// destination header asks for the weight.
pub fn execute(
    layout: &SheetLayout,
    literal_rules: &[LiteralRule],
    weight_rules: &WeightRules,
) -> FieldResult<OutputTable> {
    let weights = weight_rules.physical_weights(layout)?;

    let resolved = ColumnResolver::new(layout, literal_rules).resolve_all();
    log_info(format!("🗺️  Resolved {} output columns:", resolved.len()));
    for column in &resolved {
        log_info_indent(format!("{} ← {}", column.header, column.source), 1);
    }

    let columns = resolved
        .into_iter()
        .map(|column| materialize(layout, column, &weights))
        .collect();

    let table = OutputTable {
        columns,
        row_count: layout.data.len(),
    };
    log_success(format!("Transformed {} rows", table.row_count));
    Ok(table)
}

/// Fill one output column for every record.
fn materialize(layout: &SheetLayout, column: ResolvedColumn, weights: &[CellValue]) -> OutputColumn {
    let values = match column.source {
        ColumnSource::DirectCopy { index, .. } => layout
            .data
            .iter()
            .map(|record| SheetLayout::cell(record, index).clone())
            .collect(),
        ColumnSource::Constant(value) => vec![value; layout.data.len()],
        ColumnSource::Computed(ComputedField::PhysicalWeightGrams) => weights.to_vec(),
    };

    OutputColumn {
        header: column.header,
        values,
    }
}
