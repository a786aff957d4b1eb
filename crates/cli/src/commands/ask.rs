//! `orderdesk ask` — Answer a single question.

use orderdesk_config::AppConfig;
use orderdesk_core::MetricSet;
use std::path::Path;

pub async fn run(
    config: &AppConfig,
    file: &Path,
    customer: &str,
    metric: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let metric = match metric {
        Some(label) => label.parse::<MetricSet>()?,
        None => config.report.default_metric,
    };

    let mut assistant = super::load(config, file).await?;
    assistant.select_customer(customer);

    match assistant.ask(metric) {
        Ok(report) => println!("{report}"),
        Err(e) => {
            println!("{}", e.user_message());
            return Err(e.into());
        }
    }

    Ok(())
}
