//! `orderdesk chat` — Interactive session over one extract.

use orderdesk_config::AppConfig;
use orderdesk_core::MetricSet;
use orderdesk_engine::Assistant;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{self, AsyncBufReadExt, BufReader};

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
enum ChatCommand {
    Select(String),
    Clear,
    Reset,
    Ask(Option<MetricSet>),
    Customers,
    History,
    Export(PathBuf),
    Help,
    Exit,
    Unknown(String),
}

impl ChatCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match word.to_lowercase().as_str() {
            "select" if !rest.is_empty() => ChatCommand::Select(rest.to_string()),
            "clear" => ChatCommand::Clear,
            "reset" => ChatCommand::Reset,
            "ask" if rest.is_empty() => ChatCommand::Ask(None),
            "ask" => match rest.parse() {
                Ok(metric) => ChatCommand::Ask(Some(metric)),
                Err(_) => ChatCommand::Unknown(line.to_string()),
            },
            "customers" => ChatCommand::Customers,
            "history" => ChatCommand::History,
            "export" if !rest.is_empty() => ChatCommand::Export(PathBuf::from(rest)),
            "help" | "?" => ChatCommand::Help,
            "exit" | "quit" | "/exit" | "/quit" | ":q" => ChatCommand::Exit,
            _ => ChatCommand::Unknown(line.to_string()),
        }
    }
}

pub async fn run(config: &AppConfig, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut assistant = super::load(config, file).await?;

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║      OrderDesk — Backlog & Dispatch Chat     ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  File:       {}", file.display());
    println!("  Customers:  {}", assistant.customers().len());
    println!("  Metric:     {} (default)", config.report.default_metric);
    println!();
    print_help();

    let mut lines = BufReader::new(io::stdin()).lines();
    prompt(&assistant)?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            prompt(&assistant)?;
            continue;
        }

        match ChatCommand::parse(&line) {
            ChatCommand::Exit => break,
            ChatCommand::Select(customer) => {
                assistant.select_customer(&customer);
                if !assistant.has_customer(&customer) {
                    println!("  ⚠️  {customer} is not in the customer list");
                }
            }
            ChatCommand::Clear => {
                assistant.clear_selection();
                println!("  Selection and history cleared.");
            }
            ChatCommand::Reset => {
                assistant.reset();
                println!("  History cleared.");
            }
            ChatCommand::Ask(metric) => {
                let metric = metric.unwrap_or(config.report.default_metric);
                match assistant.ask(metric) {
                    Ok(report) => print_assistant(&report),
                    Err(e) => print_assistant(&e.user_message()),
                }
            }
            ChatCommand::Customers => {
                for customer in assistant.customers() {
                    println!("  {customer}");
                }
            }
            ChatCommand::History => print_history(&assistant),
            ChatCommand::Export(path) => {
                let json = assistant.session().conversation().to_json()?;
                std::fs::write(&path, json)?;
                println!("  📤 Exported {} messages to {}", assistant.session().messages().len(), path.display());
            }
            ChatCommand::Help => print_help(),
            ChatCommand::Unknown(input) => {
                println!("  Unknown command: {input} (type 'help')");
            }
        }

        prompt(&assistant)?;
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}

fn prompt(assistant: &Assistant) -> std::io::Result<()> {
    let selected = assistant.session().selected_customer().unwrap_or("-");
    print!("  [{selected}] > ");
    std::io::stdout().flush()
}

fn print_assistant(text: &str) {
    println!();
    for line in text.lines() {
        println!("  Assistant > {line}");
    }
    println!();
}

fn print_history(assistant: &Assistant) {
    let messages = assistant.session().messages();
    if messages.is_empty() {
        println!("  (no messages)");
        return;
    }
    for message in messages {
        println!("  [{}] {}", message.role, message.content.lines().next().unwrap_or_default());
    }
}

fn print_help() {
    println!("  Commands:");
    println!("    select <customer>   choose a customer");
    println!("    ask [metric]        Backlog | MTD | Backlog & MTD");
    println!("    customers           list customers");
    println!("    history             show the conversation");
    println!("    export <path>       save the conversation as JSON");
    println!("    reset               clear the conversation");
    println!("    clear               clear the selection and the conversation");
    println!("    exit                quit");
    println!();
}
