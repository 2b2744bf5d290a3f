use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use clipdrop_cli::api_client::ApiClient;
use clipdrop_cli::{init_tracing, local_file_name};

#[derive(Parser, Debug)]
#[command(name = "fetch_video")]
#[command(about = "Process a video URL on the server and save the result locally")]
struct Args {
    /// Page URL of the video
    url: String,

    /// Where to write the video (defaults to the server-provided label)
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let client = ApiClient::from_env()?;

    eprintln!("Processing {} ...", args.url);
    let processed = client.process(&args.url).await?;
    eprintln!("Ready: {} ({})", processed.label, processed.size_human);

    let payload = client
        .download(&processed.download_url)
        .await
        .context("Failed to download processed video")?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(local_file_name(&processed.label)));
    tokio::fs::write(&output, &payload)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("{}", output.display());
    Ok(())
}
