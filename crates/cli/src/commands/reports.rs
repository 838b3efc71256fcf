//! Show report views

use anyhow::Result;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use crate::client::{ApiClient, ReportDocument};
use crate::output::{format_usage, OutputFormat};
use crate::WindowArg;

/// Row for the report entry table
#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Container")]
    container: String,
    #[tabled(rename = "Window Start")]
    window_start: String,
    #[tabled(rename = "CPU avg")]
    cpu_avg: String,
    #[tabled(rename = "CPU p95")]
    cpu_p95: String,
    #[tabled(rename = "CPU p99")]
    cpu_p99: String,
    #[tabled(rename = "Mem avg")]
    memory_avg: String,
    #[tabled(rename = "Mem p95")]
    memory_p95: String,
    #[tabled(rename = "Mem p99")]
    memory_p99: String,
}

pub async fn show(
    client: &ApiClient,
    account: &str,
    namespace: &str,
    window: WindowArg,
    format: OutputFormat,
) -> Result<()> {
    let path = format!("reports/{}/{}/{}", account, namespace, window.as_str());
    let document: ReportDocument = client.get(&path).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        OutputFormat::Table => {
            println!(
                "{} {} / {} ({})",
                "Report:".bold(),
                document.account.cyan(),
                document.namespace.cyan(),
                document.window_type
            );

            if document.entries.is_empty() {
                println!("{}", "No entries".yellow());
                return Ok(());
            }

            let rows: Vec<EntryRow> = document
                .entries
                .iter()
                .map(|entry| EntryRow {
                    container: entry.container.clone(),
                    window_start: entry.window_start.clone(),
                    cpu_avg: format_usage(entry.cpu.avg),
                    cpu_p95: format_usage(entry.cpu.p95),
                    cpu_p99: format_usage(entry.cpu.p99),
                    memory_avg: format_usage(entry.memory.avg),
                    memory_p95: format_usage(entry.memory.p95),
                    memory_p99: format_usage(entry.memory.p99),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
    }

    Ok(())
}
