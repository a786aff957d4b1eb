//! Validation, aggregation and query pipeline for OrderDesk.
//!
//! Leaves first: [`schema`] checks and normalizes a raw table, [`aggregate`]
//! derives Backlog/MTD per (customer, city, type, incoterm), [`index`] lists
//! the customers, [`resolver`] answers one customer, [`format`] renders the
//! answer. [`assistant`] wires them into a session with a memoized dataset.

pub mod aggregate;
pub mod assistant;
pub mod cache;
pub mod format;
pub mod index;
pub mod resolver;
pub mod schema;
pub mod source;

pub use aggregate::Aggregator;
pub use assistant::{Assistant, Dataset, Pipeline};
pub use cache::{CacheStats, UploadCache};
pub use format::{format_quantity, format_report};
pub use index::customer_index;
pub use resolver::resolve;
pub use schema::{SchemaValidator, parse_quantity};
pub use source::{CsvDecoder, FileTableSource, XlsxDecoder, decoder_for};
