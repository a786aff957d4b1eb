//! Tabular domain types.
//!
//! Data moves through these in one direction:
//! `RawTable` → `NormalizedTable` → `AggregateTable` → `CustomerIndex`.
//! Everything past `RawTable` is an immutable snapshot once produced.

use serde::{Deserialize, Serialize};

/// An undecoded table exactly as the upload collaborator produced it.
///
/// Every cell is text; empty cells are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Position of a header, ignoring case and surrounding whitespace.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.headers
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Customer identifiers compare case-insensitively (Unicode lowercase).
pub fn same_customer(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// One row of the normalized table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub customer_id: String,
    pub city: String,
    pub order_type: String,
    pub incoterm: String,
    /// Trimmed and lowercased.
    pub status_summary: String,
    pub ordered_quantity: f64,
}

impl OrderRecord {
    pub fn key(&self) -> AggregateKey {
        AggregateKey {
            customer_id: self.customer_id.clone(),
            city: self.city.clone(),
            order_type: self.order_type.clone(),
            incoterm: self.incoterm.clone(),
        }
    }
}

/// The validated, whitespace-trimmed, type-coerced version of a `RawTable`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTable {
    pub records: Vec<OrderRecord>,
    /// Rows whose quantity could not be parsed and was replaced with `0`.
    pub coerced_quantities: usize,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of quantities over records carrying the given (normalized) status.
    pub fn quantity_with_status(&self, status: &str) -> f64 {
        self.records
            .iter()
            .filter(|r| r.status_summary == status)
            .map(|r| r.ordered_quantity)
            .sum()
    }
}

/// Identity of one summarized row: (customer, city, type, incoterm).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AggregateKey {
    pub customer_id: String,
    pub city: String,
    pub order_type: String,
    pub incoterm: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub key: AggregateKey,
    pub backlog: f64,
    pub mtd: f64,
}

/// Backlog/MTD totals, one row per distinct `AggregateKey`, sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateTable {
    rows: Vec<AggregateRow>,
}

impl AggregateTable {
    /// Build from rows; they are sorted by key so equal inputs compare equal.
    pub fn from_rows(mut rows: Vec<AggregateRow>) -> Self {
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        Self { rows }
    }

    pub fn rows(&self) -> &[AggregateRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_backlog(&self) -> f64 {
        self.rows.iter().map(|r| r.backlog).sum()
    }

    pub fn total_mtd(&self) -> f64 {
        self.rows.iter().map(|r| r.mtd).sum()
    }
}

/// Sorted, duplicate-free customer identifiers present in an `AggregateTable`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerIndex(Vec<String>);

impl CustomerIndex {
    /// Sorts and deduplicates the given identifiers.
    pub fn new(mut customers: Vec<String>) -> Self {
        customers.sort();
        customers.dedup();
        Self(customers)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Membership under the same case-insensitive rule the resolver uses.
    pub fn contains(&self, customer_id: &str) -> bool {
        let customer_id = customer_id.trim();
        self.0.iter().any(|c| same_customer(c, customer_id))
    }
}
