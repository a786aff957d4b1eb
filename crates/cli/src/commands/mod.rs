pub mod ask;
pub mod chat;
pub mod customers;
pub mod onboard;
pub mod status;

use orderdesk_config::AppConfig;
use orderdesk_core::error::Error;
use orderdesk_core::upload::TableSource;
use orderdesk_engine::{Assistant, FileTableSource, Pipeline, decoder_for};
use std::path::Path;

/// Read `file` and make it the assistant's dataset.
///
/// Schema failures are printed with the missing column names before the
/// error is returned.
pub async fn load(config: &AppConfig, file: &Path) -> Result<Assistant, Box<dyn std::error::Error>> {
    let source = FileTableSource::new(file);
    let upload = source.fetch().await?;

    let mut assistant = Assistant::new(Pipeline::new(decoder_for(file), config));
    match assistant.upload(&upload) {
        Ok(dataset) => {
            tracing::debug!(
                upload = %dataset.upload_id.short(),
                customers = dataset.customers.len(),
                "Extract loaded"
            );
            if dataset.normalized.coerced_quantities > 0 {
                eprintln!(
                    "  ⚠️  {} row(s) had a non-numeric {} and were counted as 0",
                    dataset.normalized.coerced_quantities, config.columns.ordered_quantity
                );
            }
            Ok(assistant)
        }
        Err(Error::Schema(schema)) => {
            eprintln!("  ❌ Missing required columns: {:?}", schema.missing_columns());
            Err(schema.into())
        }
        Err(e) => Err(e.into()),
    }
}
