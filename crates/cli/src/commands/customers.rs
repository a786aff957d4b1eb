//! `orderdesk customers` — List customers in an extract.

use orderdesk_config::AppConfig;
use std::path::Path;

pub async fn run(config: &AppConfig, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let assistant = super::load(config, file).await?;
    let customers = assistant.customers();

    if customers.is_empty() {
        println!("  No backlog or dispatched orders found.");
        return Ok(());
    }

    for customer in customers {
        println!("{customer}");
    }
    eprintln!("\n  {} customer(s)", customers.len());

    Ok(())
}
