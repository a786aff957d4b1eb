//! Query-side value objects: which metric was asked for and what was found.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// Which totals and breakdowns a question asks for.
///
/// Selects what is rendered; never changes what is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MetricSet {
    #[serde(rename = "Backlog")]
    Backlog,
    #[serde(rename = "MTD")]
    Mtd,
    #[default]
    #[serde(rename = "Backlog & MTD")]
    BacklogAndMtd,
}

impl MetricSet {
    pub const ALL: [MetricSet; 3] = [MetricSet::Backlog, MetricSet::Mtd, MetricSet::BacklogAndMtd];

    /// The label shown to users, e.g. `Backlog & MTD`.
    pub fn label(&self) -> &'static str {
        match self {
            MetricSet::Backlog => "Backlog",
            MetricSet::Mtd => "MTD",
            MetricSet::BacklogAndMtd => "Backlog & MTD",
        }
    }

    pub fn includes_backlog(&self) -> bool {
        matches!(self, MetricSet::Backlog | MetricSet::BacklogAndMtd)
    }

    pub fn includes_mtd(&self) -> bool {
        matches!(self, MetricSet::Mtd | MetricSet::BacklogAndMtd)
    }
}

impl fmt::Display for MetricSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MetricSet {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        match normalized.as_str() {
            "backlog" => Ok(MetricSet::Backlog),
            "mtd" => Ok(MetricSet::Mtd),
            "backlog & mtd" | "backlog-mtd" | "backlog_mtd" | "both" | "all" => {
                Ok(MetricSet::BacklogAndMtd)
            }
            _ => Err(QueryError::UnknownMetric(s.to_string())),
        }
    }
}

/// One `(city, type, incoterm)` line of a customer breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub city: String,
    pub order_type: String,
    pub incoterm: String,
    pub backlog: f64,
    pub mtd: f64,
}

/// A resolved customer question, ready for formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// The identifier as the caller asked for it.
    pub customer_id: String,
    /// Sorted by `(city, type, incoterm)`.
    pub breakdown: Vec<BreakdownRow>,
    pub total_backlog: f64,
    pub total_mtd: f64,
}
