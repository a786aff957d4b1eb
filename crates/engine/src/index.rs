//! Customer index: the sorted, distinct customers of an aggregate table.

use orderdesk_core::table::{AggregateTable, CustomerIndex};

pub fn customer_index(table: &AggregateTable) -> CustomerIndex {
    CustomerIndex::new(
        table
            .rows()
            .iter()
            .map(|row| row.key.customer_id.clone())
            .collect(),
    )
}
