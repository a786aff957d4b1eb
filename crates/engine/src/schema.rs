//! Schema validation — turns a `RawTable` into a typed `NormalizedTable`.
//!
//! All required headers must be present (after trimming) or the whole upload
//! is rejected. Text cells are trimmed, the status is lowercased, and any
//! quantity that is not a finite number becomes `0`.

use orderdesk_config::ColumnConfig;
use orderdesk_core::error::SchemaError;
use orderdesk_core::table::{NormalizedTable, OrderRecord, RawTable};

/// Validates uploads against a fixed set of column headers.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    columns: ColumnConfig,
}

/// Header positions resolved once per table.
struct ColumnPositions {
    customer_id: usize,
    order_type: usize,
    incoterm: usize,
    status_summary: usize,
    ordered_quantity: usize,
    city: usize,
}

impl SchemaValidator {
    pub fn new(columns: ColumnConfig) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &ColumnConfig {
        &self.columns
    }

    /// Check headers and normalize every row.
    pub fn validate(&self, raw: &RawTable) -> Result<NormalizedTable, SchemaError> {
        let positions = self.locate(raw)?;

        let mut coerced = 0usize;
        let records = raw
            .rows
            .iter()
            .map(|row| {
                let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or_default();
                let ordered_quantity = match parse_quantity(cell(positions.ordered_quantity)) {
                    Some(qty) => qty,
                    None => {
                        coerced += 1;
                        0.0
                    }
                };
                OrderRecord {
                    customer_id: cell(positions.customer_id).trim().to_string(),
                    city: cell(positions.city).trim().to_string(),
                    order_type: cell(positions.order_type).trim().to_string(),
                    incoterm: cell(positions.incoterm).trim().to_string(),
                    status_summary: cell(positions.status_summary).trim().to_lowercase(),
                    ordered_quantity,
                }
            })
            .collect::<Vec<_>>();

        if coerced > 0 {
            tracing::warn!(
                rows = coerced,
                column = %self.columns.ordered_quantity,
                "Non-numeric quantities replaced with 0"
            );
        }

        Ok(NormalizedTable {
            records,
            coerced_quantities: coerced,
        })
    }

    fn locate(&self, raw: &RawTable) -> Result<ColumnPositions, SchemaError> {
        let missing: Vec<String> = self
            .columns
            .required()
            .iter()
            .filter(|name| raw.column_index(name.trim()).is_none())
            .map(|name| name.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns { missing });
        }

        let find = |name: &str| raw.column_index(name.trim()).unwrap_or_default();
        Ok(ColumnPositions {
            customer_id: find(&self.columns.customer_id),
            order_type: find(&self.columns.order_type),
            incoterm: find(&self.columns.incoterm),
            status_summary: find(&self.columns.status_summary),
            ordered_quantity: find(&self.columns.ordered_quantity),
            city: find(&self.columns.city),
        })
    }
}

/// Parse a quantity cell. `None` for blanks, junk, NaN and infinities.
pub fn parse_quantity(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|qty| qty.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        ["SOLDTO", "City", "Type", "Incoterm", "Status Summary", "ORDERED_QUANTITY"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn row(cells: [&str; 6]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn normalizes_text_and_status() {
        let raw = RawTable::new(
            headers(),
            vec![row([" ABC123 ", " Chicago", "Domestic ", " FOB ", "  BackLog ", "100"])],
        );

        let table = SchemaValidator::default().validate(&raw).unwrap();
        let record = &table.records[0];
        assert_eq!(record.customer_id, "ABC123");
        assert_eq!(record.city, "Chicago");
        assert_eq!(record.order_type, "Domestic");
        assert_eq!(record.incoterm, "FOB");
        assert_eq!(record.status_summary, "backlog");
        assert_eq!(record.ordered_quantity, 100.0);
        assert_eq!(table.coerced_quantities, 0);
    }

    #[test]
    fn headers_are_trimmed_before_matching() {
        let padded = headers().into_iter().map(|h| format!("  {h}\t")).collect();
        let raw = RawTable::new(padded, vec![row(["A", "X", "T", "I", "backlog", "1"])]);
        assert!(SchemaValidator::default().validate(&raw).is_ok());
    }

    #[test]
    fn header_case_is_ignored() {
        let shouted = vec![
            "soldto".into(),
            "CITY".into(),
            "type".into(),
            "INCOTERM".into(),
            "status summary".into(),
            "Ordered_Quantity".into(),
        ];
        let raw = RawTable::new(shouted, vec![row(["ABC123", "Chicago", "Domestic", "FOB", "Backlog", "5"])]);

        let table = SchemaValidator::default().validate(&raw).unwrap();
        assert_eq!(table.records[0].customer_id, "ABC123");
        assert_eq!(table.records[0].city, "Chicago");
        assert_eq!(table.records[0].ordered_quantity, 5.0);
    }

    #[test]
    fn missing_columns_use_configured_names() {
        let raw = RawTable::new(vec!["soldto".into(), "city".into()], vec![]);
        let err = SchemaValidator::default().validate(&raw).unwrap_err();
        assert_eq!(
            err.missing_columns(),
            &["Type", "Incoterm", "Status Summary", "ORDERED_QUANTITY"]
        );
    }

    #[test]
    fn missing_city_is_reported() {
        let without_city: Vec<String> = headers().into_iter().filter(|h| h != "City").collect();
        let raw = RawTable::new(without_city, vec![]);

        let err = SchemaValidator::default().validate(&raw).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingColumns {
                missing: vec!["City".into()]
            }
        );
    }

    #[test]
    fn every_missing_column_is_listed_in_order() {
        let raw = RawTable::new(vec!["SOLDTO".into(), "Other".into()], vec![]);

        let err = SchemaValidator::default().validate(&raw).unwrap_err();
        assert_eq!(
            err.missing_columns(),
            &["Type", "Incoterm", "Status Summary", "ORDERED_QUANTITY", "City"]
        );
    }

    #[test]
    fn unparsable_quantity_becomes_zero_and_row_is_kept() {
        let raw = RawTable::new(
            headers(),
            vec![
                row(["A", "X", "T", "I", "backlog", "n/a"]),
                row(["A", "X", "T", "I", "backlog", ""]),
                row(["A", "X", "T", "I", "backlog", "1,000"]),
                row(["A", "X", "T", "I", "backlog", " 12.5 "]),
            ],
        );

        let table = SchemaValidator::default().validate(&raw).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.coerced_quantities, 3);
        let quantities: Vec<f64> = table.records.iter().map(|r| r.ordered_quantity).collect();
        assert_eq!(quantities, vec![0.0, 0.0, 0.0, 12.5]);
        assert!(table.records.iter().all(|r| r.customer_id == "A" && r.city == "X"));
    }

    #[test]
    fn other_statuses_are_retained() {
        let raw = RawTable::new(headers(), vec![row(["A", "X", "T", "I", "Cancelled", "3"])]);
        let table = SchemaValidator::default().validate(&raw).unwrap();
        assert_eq!(table.records[0].status_summary, "cancelled");
    }

    #[test]
    fn short_rows_read_as_blank() {
        let raw = RawTable::new(headers(), vec![vec!["A".into(), "X".into()]]);
        let table = SchemaValidator::default().validate(&raw).unwrap();
        assert_eq!(table.records[0].order_type, "");
        assert_eq!(table.coerced_quantities, 1);
    }

    #[test]
    fn custom_headers() {
        let columns = ColumnConfig {
            customer_id: "Customer".into(),
            ..ColumnConfig::default()
        };
        let mut hdrs = headers();
        hdrs[0] = "Customer".into();
        let raw = RawTable::new(hdrs, vec![row(["Z9", "X", "T", "I", "dispatched", "2"])]);

        let table = SchemaValidator::new(columns).validate(&raw).unwrap();
        assert_eq!(table.records[0].customer_id, "Z9");
    }

    #[test]
    fn parse_quantity_rejects_non_finite() {
        assert_eq!(parse_quantity("1e3"), Some(1000.0));
        assert_eq!(parse_quantity("-4"), Some(-4.0));
        assert_eq!(parse_quantity("NaN"), None);
        assert_eq!(parse_quantity("inf"), None);
        assert_eq!(parse_quantity("abc"), None);
    }
}
