use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use launchwatch_client::BrowserTaskClient;
use launchwatch_core::DEFAULT_SEARCH_PROMPT;
use launchwatch_extract::extract_products;

#[cfg(test)]
mod tests;

#[derive(Debug, Parser)]
#[command(name = "launchwatch-cli")]
#[command(about = "LaunchWatch command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a discovery search end to end and print the extracted products.
    Search {
        /// File holding the search prompt; omit to use the built-in prompt.
        #[arg(long)]
        prompt_file: Option<PathBuf>,
        /// Model to run the task with; omit to use the configured default.
        #[arg(long)]
        model: Option<String>,
        /// Overall wait budget in seconds.
        #[arg(long, default_value_t = 600)]
        timeout_secs: u64,
    },
    /// Run extraction over a task payload saved as JSON.
    Extract {
        /// File holding the raw task detail payload.
        file: PathBuf,
    },
    /// Print the built-in search prompt.
    Prompt,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            prompt_file,
            model,
            timeout_secs,
        } => run_search(prompt_file, model, timeout_secs).await,
        Commands::Extract { file } => run_extract(&file),
        Commands::Prompt => {
            println!("{DEFAULT_SEARCH_PROMPT}");
            Ok(())
        }
    }
}

async fn run_search(
    prompt_file: Option<PathBuf>,
    model: Option<String>,
    timeout_secs: u64,
) -> anyhow::Result<()> {
    let config = launchwatch_core::load_app_config()?;
    let settings = launchwatch_core::load_settings(&config.categories_path)?;

    let prompt = match prompt_file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading prompt file {}", path.display()))?,
        None => DEFAULT_SEARCH_PROMPT.to_owned(),
    };
    let model = model.unwrap_or_else(|| config.model.clone());

    let client = BrowserTaskClient::new(
        &config.api_base_url,
        &config.api_key,
        config.client_request_timeout_secs,
        config.client_max_retries,
        config.client_retry_backoff_base_secs,
    )?;

    let created = client.run_task(prompt.trim(), &model).await?;
    tracing::info!(task_id = %created.id, "task created");
    if let Some(live_url) = &created.live_url {
        tracing::info!(live_url = %live_url, "live preview available");
    }

    let detail = tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        client.wait_until_done(&created.id, config.poll_interval_secs),
    )
    .await
    .with_context(|| format!("task {} did not finish within {timeout_secs}s", created.id))??;

    let result = extract_products(&detail, &settings);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn run_extract(file: &PathBuf) -> anyhow::Result<()> {
    let config = launchwatch_core::load_app_config_from_env().ok();
    let settings = match config {
        Some(config) => launchwatch_core::load_settings(&config.categories_path)
            .unwrap_or_default(),
        None => launchwatch_core::ExtractorSettings::default(),
    };

    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("reading payload file {}", file.display()))?;
    let payload: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;

    let result = extract_products(&payload, &settings);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
