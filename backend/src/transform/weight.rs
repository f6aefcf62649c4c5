//! Per-unit physical weight lookup.
//!
//! Weights come from an explicit [`WeightRules`] table rather than globals so
//! tests (and callers) can substitute their own.

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, FieldResult};
use crate::models::{CellValue, SheetLayout};

/// Column holding the item count.
pub const QUANTITY_COLUMN: &str = "Quantity";
/// Column holding the item category.
pub const CATEGORY_COLUMN: &str = "Category";
/// Column holding the item sub category.
pub const SUB_CATEGORY_COLUMN: &str = "Sub Category";

/// A category substring and its per-unit weight in grams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightRule {
    /// Lowercase substring searched for in the normalized category.
    pub contains: String,
    /// Grams per unit.
    pub grams: i64,
}

impl WeightRule {
    pub fn new(contains: &str, grams: i64) -> Self {
        Self {
            contains: contains.to_lowercase(),
            grams,
        }
    }
}

/// Ordered category rules; the first contained substring wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightRules {
    pub rules: Vec<WeightRule>,
}

impl Default for WeightRules {
    fn default() -> Self {
        Self {
            rules: vec![
                WeightRule::new("small diaries", 300),
                WeightRule::new("big diaries", 600),
                WeightRule::new("table top calendar", 300),
            ],
        }
    }
}

impl WeightRules {
    /// Grams per unit for a category.
    ///
    /// Returns 0 when either value is empty or no rule matches. The sub
    /// category only takes part in the emptiness check.
    pub fn weight(&self, category: &CellValue, sub_category: &CellValue) -> i64 {
        if category.is_empty() || sub_category.is_empty() {
            return 0;
        }
        let category = category.normalized();
        self.rules
            .iter()
            .find(|rule| category.contains(&rule.contains))
            .map(|rule| rule.grams)
            .unwrap_or(0)
    }

    /// Compute `Quantity * weight(Category, Sub Category)` for every record.
    ///
    /// An empty quantity yields an empty cell; text that is not a number is a
    /// [`FieldError::NonNumericQuantity`].
    pub fn physical_weights(&self, layout: &SheetLayout) -> FieldResult<Vec<CellValue>> {
        let column = |name: &str| {
            layout
                .column_index(name)
                .ok_or_else(|| FieldError::MissingColumn(name.to_string()))
        };
        let qty_col = column(QUANTITY_COLUMN)?;
        let cat_col = column(CATEGORY_COLUMN)?;
        let sub_col = column(SUB_CATEGORY_COLUMN)?;

        layout
            .data
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let quantity = SheetLayout::cell(record, qty_col);
                if quantity.is_empty() {
                    return Ok(CellValue::Empty);
                }
                let grams = self.weight(
                    SheetLayout::cell(record, cat_col),
                    SheetLayout::cell(record, sub_col),
                );
                match quantity {
                    CellValue::Int(q) => Ok(CellValue::Int(q * grams)),
                    other => other
                        .as_f64()
                        .map(|q| CellValue::Float(q * grams as f64))
                        .ok_or_else(|| FieldError::NonNumericQuantity {
                            // 1-based sheet row: three header rows precede the data
                            row: i + crate::parser::HEADER_ROWS + 1,
                            value: other.to_string(),
                        }),
                }
            })
            .collect()
    }

    /// Human-readable rule listing.
    pub fn describe(&self) -> String {
        let mut out = String::from("Category weight rules (first match wins, grams per unit):\n");
        for rule in &self.rules {
            out.push_str(&format!("  contains \"{}\" -> {} g\n", rule.contains, rule.grams));
        }
        out.push_str("  anything else -> 0 g\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(category: &str, sub: &str) -> i64 {
        let to_cell = |s: &str| if s.is_empty() { CellValue::Empty } else { s.into() };
        WeightRules::default().weight(&to_cell(category), &to_cell(sub))
    }

    #[test]
    fn test_weight_rules() {
        assert_eq!(w("Small Diaries", "A5"), 300);
        assert_eq!(w("  BIG DIARIES 2025 ", "X"), 600);
        assert_eq!(w("table top calendar", "desk"), 300);
        assert_eq!(w("Wall Calendar", "X"), 0);
    }

    #[test]
    fn test_missing_inputs_weigh_nothing() {
        assert_eq!(w("", "X"), 0);
        assert_eq!(w("Small Diaries", ""), 0);
    }

    #[test]
    fn test_first_rule_wins() {
        assert_eq!(w("small diaries and big diaries", "X"), 300);
    }

    #[test]
    fn test_custom_rules() {
        let rules = WeightRules {
            rules: vec![WeightRule::new("Poster", 50)],
        };
        assert_eq!(rules.weight(&"A2 poster".into(), &"x".into()), 50);
        assert_eq!(rules.weight(&"Small Diaries".into(), &"x".into()), 0);
    }

    fn layout(records: Vec<Vec<CellValue>>) -> SheetLayout {
        SheetLayout {
            row1: vec!["Category".into(), "Sub Category".into(), "Quantity".into()],
            row2: vec![CellValue::Empty; 3],
            row3: vec![CellValue::Empty; 3],
            data: records,
            column_count: 3,
        }
    }

    #[test]
    fn test_physical_weights() {
        let layout = layout(vec![
            vec!["Big Diaries".into(), "X".into(), CellValue::Float(2.0)],
            vec!["Small Diaries".into(), "X".into(), CellValue::Int(3)],
            vec!["Other".into(), "X".into(), CellValue::Float(4.0)],
            vec!["Big Diaries".into(), "X".into(), CellValue::Empty],
            vec!["Big Diaries".into(), "X".into(), "1".into()],
        ]);
        let weights = WeightRules::default().physical_weights(&layout).unwrap();
        assert_eq!(
            weights,
            vec![
                CellValue::Float(1200.0),
                CellValue::Int(900),
                CellValue::Float(0.0),
                CellValue::Empty,
                CellValue::Float(600.0),
            ]
        );
    }

    #[test]
    fn test_non_numeric_quantity_is_field_error() {
        let layout = layout(vec![
            vec!["Big Diaries".into(), "X".into(), CellValue::Float(1.0)],
            vec!["Big Diaries".into(), "X".into(), "two".into()],
        ]);
        match WeightRules::default().physical_weights(&layout) {
            Err(FieldError::NonNumericQuantity { row, value }) => {
                assert_eq!(row, 5);
                assert_eq!(value, "two");
            }
            other => panic!("expected NonNumericQuantity, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_column_is_field_error() {
        let mut layout = layout(vec![]);
        layout.row1[2] = "Qty".into();
        assert!(matches!(
            WeightRules::default().physical_weights(&layout),
            Err(FieldError::MissingColumn(c)) if c == "Quantity"
        ));
    }
}
