//! Query resolution: one customer's breakdown and totals.

use std::collections::BTreeMap;

use orderdesk_core::error::QueryError;
use orderdesk_core::report::{BreakdownRow, QueryResult};
use orderdesk_core::table::{AggregateTable, same_customer};

/// Resolve a customer against the aggregate table.
///
/// The customer match ignores case. Matching rows are regrouped by
/// `(city, type, incoterm)` and returned in that lexicographic order.
pub fn resolve(table: &AggregateTable, customer_id: &str) -> Result<QueryResult, QueryError> {
    let mut groups: BTreeMap<(&str, &str, &str), (f64, f64)> = BTreeMap::new();

    for row in table
        .rows()
        .iter()
        .filter(|row| same_customer(&row.key.customer_id, customer_id))
    {
        let totals = groups
            .entry((
                row.key.city.as_str(),
                row.key.order_type.as_str(),
                row.key.incoterm.as_str(),
            ))
            .or_insert((0.0, 0.0));
        totals.0 += row.backlog;
        totals.1 += row.mtd;
    }

    if groups.is_empty() {
        tracing::debug!(customer = %customer_id, "Customer not found");
        return Err(QueryError::CustomerNotFound {
            customer_id: customer_id.to_string(),
        });
    }

    let breakdown: Vec<BreakdownRow> = groups
        .into_iter()
        .map(|((city, order_type, incoterm), (backlog, mtd))| BreakdownRow {
            city: city.to_string(),
            order_type: order_type.to_string(),
            incoterm: incoterm.to_string(),
            backlog,
            mtd,
        })
        .collect();

    let total_backlog = breakdown.iter().fold(0.0, |acc, row| acc + row.backlog);
    let total_mtd = breakdown.iter().fold(0.0, |acc, row| acc + row.mtd);

    Ok(QueryResult {
        customer_id: customer_id.to_string(),
        breakdown,
        total_backlog,
        total_mtd,
    })
}
