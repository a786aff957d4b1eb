//! Error types for the OrderDesk domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The literal text shown to the user when a query names an unknown customer.
pub const CUSTOMER_NOT_FOUND_TEXT: &str = "❌ ERROR: Customer not present in dataset.";

/// The literal text shown to the user when asking without a selected customer.
pub const NO_CUSTOMER_SELECTED_TEXT: &str = "Please select a customer.";

/// The top-level error type for all OrderDesk operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Upload validation errors ---
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    // --- Query errors ---
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    // --- Upload / decoding errors ---
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Fatal to the current upload: no normalized or aggregate table is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },
}

impl SchemaError {
    /// The header names that were required but absent, in required-column order.
    pub fn missing_columns(&self) -> &[String] {
        match self {
            SchemaError::MissingColumns { missing } => missing,
        }
    }
}

/// Query-time errors. Local to one question; the session stays usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Customer not present in dataset: {customer_id}")]
    CustomerNotFound { customer_id: String },

    #[error("No customer selected")]
    NoCustomerSelected,

    #[error("No dataset loaded")]
    NoDataset,

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),
}

impl QueryError {
    /// Text rendered to the user in place of a report.
    pub fn user_message(&self) -> String {
        match self {
            QueryError::CustomerNotFound { .. } => CUSTOMER_NOT_FOUND_TEXT.to_string(),
            QueryError::NoCustomerSelected => NO_CUSTOMER_SELECTED_TEXT.to_string(),
            QueryError::NoDataset => "Upload a file to start chatting.".to_string(),
            QueryError::UnknownMetric(label) => {
                format!("Unknown metric '{label}'. Choose Backlog, MTD or Backlog & MTD.")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read upload {name}: {reason}")]
    ReadFailed { name: String, reason: String },

    #[error("Failed to decode table from {name}: {reason}")]
    DecodeFailed { name: String, reason: String },

    #[error("Upload is empty: {0}")]
    EmptyUpload(String),
}
