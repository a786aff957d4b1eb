//! # OrderDesk Core
//!
//! Domain types, traits, and error definitions for the OrderDesk backlog
//! assistant. This crate holds no pipeline logic: it defines the model that
//! the engine and the CLI are written against.
//!
//! ## Layout
//!
//! - [`table`]: raw, normalized and aggregate tables plus the customer index
//! - [`report`]: metric selection and resolved query results
//! - [`message`] / [`session`]: the per-session chat history and selection
//! - [`upload`]: the seam to whatever supplies uploaded bytes

pub mod error;
pub mod message;
pub mod report;
pub mod session;
pub mod table;
pub mod upload;

// Re-export key types at crate root for ergonomics
pub use error::{Error, IngestError, QueryError, Result, SchemaError};
pub use message::{Conversation, ConversationId, Message, Role};
pub use report::{BreakdownRow, MetricSet, QueryResult};
pub use session::SessionState;
pub use table::{
    AggregateKey, AggregateRow, AggregateTable, CustomerIndex, NormalizedTable, OrderRecord,
    RawTable, same_customer,
};
pub use upload::{TableDecoder, TableSource, Upload, UploadId};
