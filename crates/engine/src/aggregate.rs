//! Backlog / MTD aggregation.
//!
//! Rows are split by status, summed per `AggregateKey` on each side, and the
//! two subtotals are joined with a full outer union (absent side = 0).
//! Per-key values are summed in sorted order so the result does not depend
//! on the row order of the upload.

use std::collections::BTreeMap;

use orderdesk_config::StatusConfig;
use orderdesk_core::table::{AggregateKey, AggregateRow, AggregateTable, NormalizedTable};

/// Computes aggregate tables for a pair of status labels.
#[derive(Debug, Clone)]
pub struct Aggregator {
    backlog_status: String,
    dispatched_status: String,
}

#[derive(Default)]
struct Subtotals {
    backlog: Vec<f64>,
    dispatched: Vec<f64>,
}

impl Aggregator {
    pub fn new(statuses: &StatusConfig) -> Self {
        Self {
            backlog_status: statuses.backlog_label(),
            dispatched_status: statuses.dispatched_label(),
        }
    }

    pub fn aggregate(&self, table: &NormalizedTable) -> AggregateTable {
        let mut groups: BTreeMap<AggregateKey, Subtotals> = BTreeMap::new();

        for record in &table.records {
            let status = record.status_summary.as_str();
            if status == self.backlog_status {
                groups.entry(record.key()).or_default().backlog.push(record.ordered_quantity);
            } else if status == self.dispatched_status {
                groups
                    .entry(record.key())
                    .or_default()
                    .dispatched
                    .push(record.ordered_quantity);
            }
        }

        let rows = groups
            .into_iter()
            .map(|(key, subtotals)| AggregateRow {
                key,
                backlog: ordered_sum(subtotals.backlog),
                mtd: ordered_sum(subtotals.dispatched),
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            records = table.len(),
            groups = rows.len(),
            "Aggregated backlog and MTD"
        );

        AggregateTable::from_rows(rows)
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(&StatusConfig::default())
    }
}

fn ordered_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.into_iter().fold(0.0, |acc, v| acc + v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderdesk_core::table::OrderRecord;
    use proptest::prelude::*;

    fn record(customer: &str, city: &str, status: &str, qty: f64) -> OrderRecord {
        OrderRecord {
            customer_id: customer.into(),
            city: city.into(),
            order_type: "Domestic".into(),
            incoterm: "FOB".into(),
            status_summary: status.into(),
            ordered_quantity: qty,
        }
    }

    fn table(records: Vec<OrderRecord>) -> NormalizedTable {
        NormalizedTable {
            records,
            coerced_quantities: 0,
        }
    }

    #[test]
    fn backlog_and_dispatched_share_a_row() {
        let result = Aggregator::default().aggregate(&table(vec![
            record("ABC123", "Chicago", "backlog", 100.0),
            record("ABC123", "Chicago", "dispatched", 40.0),
        ]));

        assert_eq!(result.len(), 1);
        let row = &result.rows()[0];
        assert_eq!(row.key.customer_id, "ABC123");
        assert_eq!(row.backlog, 100.0);
        assert_eq!(row.mtd, 40.0);
    }

    #[test]
    fn one_sided_keys_are_zero_filled() {
        let result = Aggregator::default().aggregate(&table(vec![
            record("A", "Austin", "backlog", 5.0),
            record("A", "Boston", "dispatched", 7.0),
        ]));

        assert_eq!(result.len(), 2);
        assert_eq!((result.rows()[0].backlog, result.rows()[0].mtd), (5.0, 0.0));
        assert_eq!((result.rows()[1].backlog, result.rows()[1].mtd), (0.0, 7.0));
    }

    #[test]
    fn other_statuses_are_ignored() {
        let result = Aggregator::default().aggregate(&table(vec![
            record("A", "Austin", "cancelled", 5.0),
            record("B", "Boston", "backlog", 1.0),
        ]));

        assert_eq!(result.len(), 1);
        assert_eq!(result.rows()[0].key.customer_id, "B");
    }

    #[test]
    fn sums_repeated_keys() {
        let result = Aggregator::default().aggregate(&table(vec![
            record("A", "Austin", "backlog", 1.5),
            record("A", "Austin", "backlog", 2.5),
            record("A", "Austin", "dispatched", 3.0),
            record("A", "Austin", "dispatched", 0.0),
        ]));

        assert_eq!(result.len(), 1);
        assert_eq!(result.rows()[0].backlog, 4.0);
        assert_eq!(result.rows()[0].mtd, 3.0);
    }

    #[test]
    fn custom_status_labels() {
        let statuses = StatusConfig {
            backlog: " Open ".into(),
            dispatched: "Shipped".into(),
        };
        let result = Aggregator::new(&statuses).aggregate(&table(vec![
            record("A", "Austin", "open", 2.0),
            record("A", "Austin", "shipped", 1.0),
            record("A", "Austin", "backlog", 9.0),
        ]));

        assert_eq!(result.rows()[0].backlog, 2.0);
        assert_eq!(result.rows()[0].mtd, 1.0);
    }

    #[test]
    fn empty_table_yields_empty_aggregate() {
        assert!(Aggregator::default().aggregate(&table(vec![])).is_empty());
    }

    fn arb_record() -> impl Strategy<Value = OrderRecord> {
        (
            prop::sample::select(vec!["A", "B", "C"]),
            prop::sample::select(vec!["Austin", "Boston"]),
            prop::sample::select(vec!["backlog", "dispatched", "cancelled"]),
            0.0f64..10_000.0,
        )
            .prop_map(|(customer, city, status, qty)| record(customer, city, status, qty))
    }

    proptest! {
        #[test]
        fn conserves_status_totals(records in prop::collection::vec(arb_record(), 0..60)) {
            let input = table(records);
            let result = Aggregator::default().aggregate(&input);

            let expected_backlog = input.quantity_with_status("backlog");
            let expected_mtd = input.quantity_with_status("dispatched");
            let tolerance = 1e-6 * (1.0 + expected_backlog.max(expected_mtd));
            prop_assert!((result.total_backlog() - expected_backlog).abs() <= tolerance);
            prop_assert!((result.total_mtd() - expected_mtd).abs() <= tolerance);
        }

        #[test]
        fn row_order_does_not_matter(
            (records, shuffled) in prop::collection::vec(arb_record(), 0..60)
                .prop_flat_map(|records| (Just(records.clone()), Just(records).prop_shuffle()))
        ) {
            let aggregator = Aggregator::default();
            prop_assert_eq!(
                aggregator.aggregate(&table(records)),
                aggregator.aggregate(&table(shuffled))
            );
        }
    }
}
