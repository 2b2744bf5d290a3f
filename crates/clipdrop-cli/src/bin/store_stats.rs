use anyhow::Result;
use clap::{Parser, ValueEnum};

use clipdrop_cli::api_client::ApiClient;
use clipdrop_cli::{init_tracing, truncate_label};
use clipdrop_core::{human_size, StoreStats};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "store_stats")]
#[command(about = "Show what the ephemeral store currently holds")]
struct Args {
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let client = ApiClient::from_env()?;
    let stats = client.stats().await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Table => print_stats_table(client.base_url(), &stats),
    }

    Ok(())
}

fn print_stats_table(base_url: &str, stats: &StoreStats) {
    println!("\n=== Ephemeral Store ===\n");
    println!("Server: {}", base_url);
    println!("Entries: {}", stats.count);
    println!(
        "Total Size: {} ({} bytes)",
        human_size(stats.total_bytes),
        stats.total_bytes
    );

    if stats.entries.is_empty() {
        println!("\nNo videos waiting for download.\n");
        return;
    }

    println!(
        "\n{:<14} {:<40} {:>10} {:>8}",
        "TOKEN", "LABEL", "SIZE (MB)", "AGE (s)"
    );
    for entry in &stats.entries {
        println!(
            "{:<14} {:<40} {:>10.2} {:>8}",
            entry.token_prefix,
            truncate_label(&entry.label, 38),
            entry.size_mb,
            entry.age_seconds
        );
    }
    println!();
}
