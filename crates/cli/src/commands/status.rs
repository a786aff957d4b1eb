//! `orderdesk status` — Show effective configuration.

use orderdesk_config::AppConfig;

pub async fn run(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("📦 OrderDesk Status");
    println!("===================");
    println!("  Config dir:     {}", AppConfig::config_dir().display());
    println!("  Log level:      {}", config.log_level);
    println!("  Default metric: {}", config.report.default_metric);
    println!();
    println!("  Columns:");
    println!("    customer:     {}", config.columns.customer_id);
    println!("    city:         {}", config.columns.city);
    println!("    type:         {}", config.columns.order_type);
    println!("    incoterm:     {}", config.columns.incoterm);
    println!("    status:       {}", config.columns.status_summary);
    println!("    quantity:     {}", config.columns.ordered_quantity);
    println!();
    println!("  Statuses:");
    println!("    backlog:      {}", config.statuses.backlog_label());
    println!("    dispatched:   {}", config.statuses.dispatched_label());

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `orderdesk onboard` to create one");
    }

    Ok(())
}
