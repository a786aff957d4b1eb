//! The per-session question/answer loop.
//!
//! An `Assistant` owns everything one session needs: the memoized dataset of
//! the current upload, and the `SessionState` (selection + chat history).
//! Two sessions never share an `Assistant`.
//!
//! ```text
//! upload → validate → aggregate (cached) → index
//! ask    → resolve → format → append prompt + answer
//! ```

use std::sync::Arc;

use orderdesk_config::AppConfig;
use orderdesk_core::error::{Error, QueryError};
use orderdesk_core::report::{MetricSet, QueryResult};
use orderdesk_core::session::SessionState;
use orderdesk_core::table::{AggregateTable, CustomerIndex, NormalizedTable};
use orderdesk_core::upload::{TableDecoder, Upload, UploadId};

use crate::aggregate::Aggregator;
use crate::cache::{CacheStats, UploadCache};
use crate::format::format_report;
use crate::index::customer_index;
use crate::resolver::resolve;
use crate::schema::SchemaValidator;
use crate::source::CsvDecoder;

/// Everything derived from one upload. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub upload_id: UploadId,
    pub source_name: String,
    pub normalized: NormalizedTable,
    pub aggregate: AggregateTable,
    pub customers: CustomerIndex,
}

/// Validates, aggregates and indexes uploads.
pub struct Pipeline {
    decoder: Box<dyn TableDecoder>,
    validator: SchemaValidator,
    aggregator: Aggregator,
}

impl Pipeline {
    pub fn new(decoder: Box<dyn TableDecoder>, config: &AppConfig) -> Self {
        Self {
            decoder,
            validator: SchemaValidator::new(config.columns.clone()),
            aggregator: Aggregator::new(&config.statuses),
        }
    }

    /// Decode → validate → aggregate → index. No partial dataset on failure.
    pub fn build(&self, upload: &Upload) -> Result<Dataset, Error> {
        let raw = self.decoder.decode(upload)?;
        let normalized = self.validator.validate(&raw)?;
        let aggregate = self.aggregator.aggregate(&normalized);
        let customers = customer_index(&aggregate);

        tracing::info!(
            upload = %upload.id().short(),
            rows = normalized.len(),
            groups = aggregate.len(),
            customers = customers.len(),
            "Dataset built"
        );

        Ok(Dataset {
            upload_id: upload.id().clone(),
            source_name: upload.name.clone(),
            normalized,
            aggregate,
            customers,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Box::new(CsvDecoder::new()), &AppConfig::default())
    }
}

pub struct Assistant {
    pipeline: Pipeline,
    cache: UploadCache<Dataset>,
    current: Option<Arc<Dataset>>,
    session: SessionState,
}

impl Assistant {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            cache: UploadCache::new(),
            current: None,
            session: SessionState::new(),
        }
    }

    /// CSV uploads with the given configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(Pipeline::new(Box::new(CsvDecoder::new()), config))
    }

    /// Make `upload` the active dataset.
    ///
    /// Repeat uploads of the same bytes are served from the cache. A failed
    /// upload drops the previous dataset too; questions get `NoDataset`
    /// until a valid file arrives.
    pub fn upload(&mut self, upload: &Upload) -> Result<Arc<Dataset>, Error> {
        let pipeline = &self.pipeline;
        match self
            .cache
            .get_or_try_insert_with(upload.id(), || pipeline.build(upload))
        {
            Ok(dataset) => {
                self.current = Some(Arc::clone(&dataset));
                Ok(dataset)
            }
            Err(err) => {
                if self.current.take().is_some() {
                    tracing::warn!(upload = %upload.id().short(), "Rejected upload replaced the active dataset");
                }
                self.cache.clear();
                Err(err)
            }
        }
    }

    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        self.current.as_ref()
    }

    /// Customers of the active dataset; empty before the first upload.
    pub fn customers(&self) -> &[String] {
        self.current
            .as_deref()
            .map(|dataset| dataset.customers.as_slice())
            .unwrap_or_default()
    }

    /// Whether `customer_id` matches a customer of the active dataset.
    pub fn has_customer(&self, customer_id: &str) -> bool {
        self.current
            .as_deref()
            .is_some_and(|dataset| dataset.customers.contains(customer_id))
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn select_customer(&mut self, customer_id: &str) {
        self.session.select_customer(customer_id.trim());
    }

    /// Clear the selection and the history together.
    pub fn clear_selection(&mut self) {
        self.session.clear_selection();
    }

    /// Clear the history only.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Resolve without touching the conversation.
    pub fn lookup(&self, customer_id: &str) -> Result<QueryResult, QueryError> {
        let dataset = self.current.as_ref().ok_or(QueryError::NoDataset)?;
        resolve(&dataset.aggregate, customer_id)
    }

    /// Answer `metric` for the selected customer and record the exchange.
    ///
    /// Without a dataset or a selection nothing is recorded. An unknown
    /// customer records the prompt and the error text as the answer.
    pub fn ask(&mut self, metric: MetricSet) -> Result<String, QueryError> {
        let customer_id = self
            .session
            .selected_customer()
            .ok_or(QueryError::NoCustomerSelected)?
            .to_string();
        self.ask_question(&customer_id, metric)
    }

    pub fn ask_question(&mut self, customer_id: &str, metric: MetricSet) -> Result<String, QueryError> {
        let customer_id = customer_id.trim();
        if customer_id.is_empty() {
            return Err(QueryError::NoCustomerSelected);
        }
        let dataset = Arc::clone(self.current.as_ref().ok_or(QueryError::NoDataset)?);

        self.session
            .append_user_message(format!("{} for {customer_id}", metric.label()));

        match resolve(&dataset.aggregate, customer_id) {
            Ok(result) => {
                let report = format_report(&result, metric);
                self.session.append_assistant_message(report.clone());
                Ok(report)
            }
            Err(err) => {
                tracing::info!(customer = %customer_id, "Question for unknown customer");
                self.session.append_assistant_message(err.user_message());
                Err(err)
            }
        }
    }
}

impl Default for Assistant {
    fn default() -> Self {
        Self::new(Pipeline::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderdesk_core::error::{CUSTOMER_NOT_FOUND_TEXT, SchemaError};
    use orderdesk_core::message::Role;

    const ORDERS: &str = "\
SOLDTO,City,Type,Incoterm,Status Summary,ORDERED_QUANTITY
ABC123,Chicago,Domestic,FOB,Backlog,100
ABC123,Chicago,Domestic,FOB,Dispatched,40
ZED9,Austin,Export,CIF,backlog,7
";

    fn upload(text: &str) -> Upload {
        Upload::new("orders.csv", text.as_bytes().to_vec())
    }

    fn loaded() -> Assistant {
        let mut assistant = Assistant::default();
        assistant.upload(&upload(ORDERS)).unwrap();
        assistant
    }

    #[test]
    fn upload_builds_customer_index() {
        let assistant = loaded();
        assert_eq!(assistant.customers(), &["ABC123", "ZED9"]);
    }

    #[test]
    fn same_bytes_hit_the_cache() {
        let mut assistant = Assistant::default();
        let first = assistant.upload(&upload(ORDERS)).unwrap();
        let second = assistant
            .upload(&Upload::new("copy.csv", ORDERS.as_bytes().to_vec()))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(assistant.cache_stats().computations, 1);
        assert_eq!(assistant.cache_stats().hits, 1);
    }

    #[test]
    fn failed_upload_drops_previous_dataset() {
        let mut assistant = loaded();
        let err = assistant
            .upload(&upload("SOLDTO,Type,Incoterm,Status Summary,ORDERED_QUANTITY\nA,T,I,backlog,1\n"))
            .unwrap_err();

        match err {
            Error::Schema(SchemaError::MissingColumns { missing }) => {
                assert_eq!(missing, vec!["City"])
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(assistant.dataset().is_none());
        assert!(assistant.customers().is_empty());

        assistant.select_customer("ABC123");
        assert_eq!(assistant.ask(MetricSet::Backlog), Err(QueryError::NoDataset));
        assert!(assistant.session().messages().is_empty());

        // the same good file is computed again, not served from a stale entry
        assistant.upload(&upload(ORDERS)).unwrap();
        assert_eq!(assistant.cache_stats().computations, 2);
        assert!(assistant.ask(MetricSet::Backlog).is_ok());
    }

    #[test]
    fn has_customer_matches_like_the_resolver() {
        let assistant = loaded();
        assert!(assistant.has_customer("abc123"));
        assert!(assistant.has_customer(" zed9 "));
        assert!(!assistant.has_customer("NOPE"));
        assert!(!Assistant::default().has_customer("ABC123"));
    }

    #[test]
    fn ask_without_selection_records_nothing() {
        let mut assistant = loaded();
        assert_eq!(
            assistant.ask(MetricSet::Backlog),
            Err(QueryError::NoCustomerSelected)
        );
        assert!(assistant.session().messages().is_empty());
    }

    #[test]
    fn ask_without_dataset_records_nothing() {
        let mut assistant = Assistant::default();
        assistant.select_customer("ABC123");
        assert_eq!(assistant.ask(MetricSet::Backlog), Err(QueryError::NoDataset));
        assert!(assistant.session().messages().is_empty());
    }

    #[test]
    fn ask_appends_prompt_and_report() {
        let mut assistant = loaded();
        assistant.select_customer("abc123");

        let report = assistant.ask(MetricSet::BacklogAndMtd).unwrap();

        assert!(report.starts_with("## abc123 - Backlog Summary"));
        assert!(report.contains("**Total Backlog:** 100.00"));
        assert!(report.contains("**Total MTD:** 40.00"));

        let messages = assistant.session().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "Backlog & MTD for abc123");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, report);
    }

    #[test]
    fn unknown_customer_answers_with_error_text() {
        let mut assistant = loaded();
        assistant.select_customer("NOPE");

        let err = assistant.ask(MetricSet::Mtd).unwrap_err();

        assert!(matches!(err, QueryError::CustomerNotFound { .. }));
        let messages = assistant.session().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, CUSTOMER_NOT_FOUND_TEXT);

        // the session keeps working
        assistant.select_customer("ZED9");
        assert!(assistant.ask(MetricSet::Backlog).is_ok());
        assert_eq!(assistant.session().messages().len(), 4);
    }

    #[test]
    fn reset_and_clear() {
        let mut assistant = loaded();
        assistant.select_customer("ABC123");
        assistant.ask(MetricSet::Backlog).unwrap();

        assistant.reset();
        assert!(assistant.session().messages().is_empty());
        assert_eq!(assistant.session().selected_customer(), Some("ABC123"));

        assistant.ask(MetricSet::Mtd).unwrap();
        assistant.clear_selection();
        assert!(assistant.session().messages().is_empty());
        assert!(assistant.session().selected_customer().is_none());
    }

    #[test]
    fn lookup_does_not_record() {
        let assistant = loaded();
        let result = assistant.lookup("ZED9").unwrap();
        assert_eq!(result.total_backlog, 7.0);
        assert!(assistant.session().messages().is_empty());
    }
}
