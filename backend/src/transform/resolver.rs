//! Destination column resolution.
//!
//! Each non-empty row 3 header resolves once to a [`ColumnSource`]:
//!
//! 1. the ordered [`LiteralRule`] list (first header substring match wins),
//! 2. the row 2 directive at the same index, looked up among row 1 names,
//! 3. otherwise the directive itself, broadcast as a constant.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::models::{CellValue, SheetLayout};

/// Fields computed from other columns rather than read from the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputedField {
    /// `Quantity * weight(Category, Sub Category)`.
    PhysicalWeightGrams,
}

/// Where an output column takes its values from.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSource {
    /// Copy the source column at `index` (named `name` in row 1).
    DirectCopy { index: usize, name: CellValue },
    /// Repeat one value for every record.
    Constant(CellValue),
    /// Use a derived field.
    Computed(ComputedField),
}

impl fmt::Display for ColumnSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSource::DirectCopy { name, .. } => write!(f, "column \"{}\"", name),
            ColumnSource::Constant(value) => write!(f, "constant \"{}\"", value),
            ColumnSource::Computed(ComputedField::PhysicalWeightGrams) => {
                f.write_str("computed physical weight (grams)")
            }
        }
    }
}

/// What a matching literal rule produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleAction {
    /// A derived field.
    Computed { field: ComputedField },
    /// A fixed text value.
    Constant { value: String },
}

/// A header substring and the column source it forces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralRule {
    /// Lowercase substring searched for in the normalized header.
    pub contains: String,
    #[serde(flatten)]
    pub action: RuleAction,
}

impl LiteralRule {
    /// Rule producing a constant.
    pub fn constant(contains: &str, value: &str) -> Self {
        Self {
            contains: contains.to_lowercase(),
            action: RuleAction::Constant {
                value: value.to_string(),
            },
        }
    }

    /// Rule producing a computed field.
    pub fn computed(contains: &str, field: ComputedField) -> Self {
        Self {
            contains: contains.to_lowercase(),
            action: RuleAction::Computed { field },
        }
    }

    /// Whether this rule applies to a normalized header.
    pub fn matches(&self, normalized_header: &str) -> bool {
        normalized_header.contains(&self.contains)
    }

    /// The column source this rule yields.
    pub fn resolve(&self) -> ColumnSource {
        match &self.action {
            RuleAction::Computed { field } => ColumnSource::Computed(*field),
            RuleAction::Constant { value } => ColumnSource::Constant(CellValue::String(value.clone())),
        }
    }
}

/// The shipped literal rules, in priority order.
pub fn default_literal_rules() -> Vec<LiteralRule> {
    vec![
        LiteralRule::computed("physical weight", ComputedField::PhysicalWeightGrams),
        LiteralRule::constant("sender add line 1", "SALES WING OF PUBLICATIONS"),
        LiteralRule::constant("sender add line 2", "TTD PRESS COMPOUND"),
        LiteralRule::constant("sender add line 3", "Tirupati - 517507"),
    ]
}

/// One resolved destination column.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    /// Index of the header in row 3.
    pub position: usize,
    /// The row 3 header value.
    pub header: CellValue,
    pub source: ColumnSource,
}

/// Resolves row 3 headers against a sheet layout.
pub struct ColumnResolver<'a> {
    layout: &'a SheetLayout,
    rules: &'a [LiteralRule],
    /// Normalized row 1 name -> column index (last occurrence wins).
    source_index: HashMap<String, usize>,
}

impl<'a> ColumnResolver<'a> {
    pub fn new(layout: &'a SheetLayout, rules: &'a [LiteralRule]) -> Self {
        let source_index = layout
            .row1
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .map(|(i, name)| (name.normalized(), i))
            .collect();

        Self {
            layout,
            rules,
            source_index,
        }
    }

    /// Resolve the header at `position` in row 3.
    ///
    /// Returns `None` for empty headers, which produce no output column.
    pub fn resolve(&self, position: usize, header: &CellValue) -> Option<ColumnSource> {
        if header.is_empty() {
            return None;
        }

        let normalized = header.normalized();
        if let Some(rule) = self.rules.iter().find(|rule| rule.matches(&normalized)) {
            return Some(rule.resolve());
        }

        let directive = self
            .layout
            .row2
            .get(position)
            .cloned()
            .unwrap_or_default();

        let source = match self.source_index.get(&directive.normalized()) {
            Some(&index) => ColumnSource::DirectCopy {
                index,
                name: self.layout.row1[index].clone(),
            },
            None => ColumnSource::Constant(directive),
        };
        Some(source)
    }

    /// Resolve every non-empty row 3 header, in row 3 order.
    pub fn resolve_all(&self) -> Vec<ResolvedColumn> {
        self.layout
            .row3
            .iter()
            .enumerate()
            .filter_map(|(position, header)| {
                self.resolve(position, header).map(|source| ResolvedColumn {
                    position,
                    header: header.clone(),
                    source,
                })
            })
            .collect()
    }
}

/// Human-readable listing of the literal rules.
pub fn describe_rules(rules: &[LiteralRule]) -> String {
    let mut out = String::from("Destination header rules (case-insensitive, first match wins):\n");
    for (i, rule) in rules.iter().enumerate() {
        out.push_str(&format!(
            "  {}. contains \"{}\" -> {}\n",
            i + 1,
            rule.contains,
            rule.resolve()
        ));
    }
    out.push_str(&format!(
        "  {}. otherwise the row 2 directive at the same index:\n",
        rules.len() + 1
    ));
    out.push_str("     - names a row 1 column (trimmed, case-insensitive) -> copy that column\n");
    out.push_str("     - anything else -> repeat the directive value on every row\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(row1: &[&str], row2: &[&str], row3: &[&str]) -> SheetLayout {
        let cells = |row: &[&str]| -> Vec<CellValue> {
            row.iter()
                .map(|s| if s.is_empty() { CellValue::Empty } else { (*s).into() })
                .collect()
        };
        SheetLayout {
            row1: cells(row1),
            row2: cells(row2),
            row3: cells(row3),
            data: Vec::new(),
            column_count: row1.len(),
        }
    }

    #[test]
    fn test_literal_rules_take_priority() {
        let layout = layout(
            &["Sender Add Line 1", "Weight"],
            &["Sender Add Line 1", "Weight"],
            &["sender ADD line 1 ", "Physical Weight (grams)"],
        );
        let rules = default_literal_rules();
        let resolver = ColumnResolver::new(&layout, &rules);

        assert_eq!(
            resolver.resolve(0, &layout.row3[0]),
            Some(ColumnSource::Constant("SALES WING OF PUBLICATIONS".into()))
        );
        assert_eq!(
            resolver.resolve(1, &layout.row3[1]),
            Some(ColumnSource::Computed(ComputedField::PhysicalWeightGrams))
        );
    }

    #[test]
    fn test_directive_lookup_is_normalized() {
        let layout = layout(&["Customer Name", "Pin"], &["  customer NAME", "PIN "], &["Name", "Pincode"]);
        let rules = default_literal_rules();
        let resolver = ColumnResolver::new(&layout, &rules);

        assert_eq!(
            resolver.resolve(0, &layout.row3[0]),
            Some(ColumnSource::DirectCopy {
                index: 0,
                name: "Customer Name".into()
            })
        );
        assert_eq!(
            resolver.resolve(1, &layout.row3[1]),
            Some(ColumnSource::DirectCopy { index: 1, name: "Pin".into() })
        );
    }

    #[test]
    fn test_unmatched_directive_is_broadcast_verbatim() {
        let layout = layout(&["A", "B"], &["A", "  Unmatched Column Name "], &["X", "Y", "Z"]);
        let rules = default_literal_rules();
        let resolver = ColumnResolver::new(&layout, &rules);

        assert_eq!(
            resolver.resolve(1, &layout.row3[1]),
            Some(ColumnSource::Constant("  Unmatched Column Name ".into()))
        );
        // Beyond row 2 counts as no directive.
        assert_eq!(
            resolver.resolve(2, &layout.row3[2]),
            Some(ColumnSource::Constant(CellValue::Empty))
        );
    }

    #[test]
    fn test_duplicate_source_names_last_wins() {
        let layout = layout(&["Name", "name "], &["NAME", ""], &["Out", ""]);
        let rules = default_literal_rules();
        let resolver = ColumnResolver::new(&layout, &rules);

        assert_eq!(
            resolver.resolve(0, &layout.row3[0]),
            Some(ColumnSource::DirectCopy {
                index: 1,
                name: "name ".into()
            })
        );
    }

    #[test]
    fn test_empty_headers_are_skipped() {
        let layout = layout(&["A", "B", "C"], &["A", "B", "C"], &["First", "", "Third"]);
        let rules = default_literal_rules();
        let resolved = ColumnResolver::new(&layout, &rules).resolve_all();

        let positions: Vec<usize> = resolved.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 2]);
        assert_eq!(resolved[1].source, ColumnSource::DirectCopy { index: 2, name: "C".into() });
    }

    #[test]
    fn test_rules_roundtrip_through_json() {
        let json = serde_json::to_value(default_literal_rules()).unwrap();
        assert_eq!(json[0]["type"], "computed");
        assert_eq!(json[0]["field"], "physical_weight_grams");
        assert_eq!(json[1]["value"], "SALES WING OF PUBLICATIONS");
        let back: Vec<LiteralRule> = serde_json::from_value(json).unwrap();
        assert_eq!(back, default_literal_rules());
    }

    #[test]
    fn test_describe_rules_lists_everything() {
        let text = describe_rules(&default_literal_rules());
        assert!(text.contains("physical weight"));
        assert!(text.contains("Tirupati - 517507"));
        assert!(text.contains("5. otherwise"));
    }
}
