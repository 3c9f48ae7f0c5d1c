use anyhow::Result;
use chrono::Local;
use clap::Parser;
use crossterm::style::Stylize;
use std::io;
use std::path::PathBuf;
use tracing::debug;

mod api;
mod config;
mod fetch;
mod logging;
mod models;
mod onboarding;
mod ui;

use api::{ApiClient, ApiError, NamecheapClient, PublicIpResolver};
use config::{default_schema, AppConfig, ConfigStore};
use fetch::DomainFetcher;
use onboarding::Outcome;
use ui::{build_rows, header_row, render_table, MissingFieldPolicy};

#[derive(Parser)]
#[command(name = "ncdomains", version)]
#[command(about = "List the domains in your Namecheap account")]
struct Cli {
    /// Configuration file, created with defaults when missing
    #[arg(short, long, value_name = "FILE", default_value = "./.config.toml")]
    config: PathBuf,

    /// Read the cached response even when it is older than the cache time
    #[arg(long)]
    use_local: bool,

    /// Verbose output
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install().ok(); // Ignore error if already installed

    let cli = Cli::parse();
    let log = logging::init_logging(cli.debug);

    let mut store = ConfigStore::load(&cli.config, &default_schema())?;
    let mut config = AppConfig::from_store(&store)?;
    if config.app.debug && !cli.debug {
        log.enable_debug();
    }
    debug!(
        path = %store.path().display(),
        datetime_format = %config.app.datetime_format,
        "Loaded configuration"
    );

    let client = ApiClient::new()?;
    let public_ip = PublicIpResolver::new(client.clone(), &config.app.ip_service)
        .resolve()
        .await;

    let outcome = {
        let mut input = io::stdin().lock();
        let mut output = io::stdout();
        onboarding::run(&mut input, &mut output, &config, public_ip.as_deref())?
    };
    match outcome {
        Outcome::Unchanged => {}
        Outcome::Confirmed(answers) => {
            answers.apply(&mut store);
            store.save()?;
            config = AppConfig::from_store(&store)?;
        }
        Outcome::Declined => {
            println!("Aborting...");
            return Ok(());
        }
    }

    let registrar = NamecheapClient::new(client);
    let fetcher = DomainFetcher::new(&registrar, &config);
    let force_local = cli.use_local || config.app.use_local;

    println!();
    let domains = match fetcher
        .fetch(&mut store, Local::now().naive_local(), force_local)
        .await
    {
        Ok(domains) => domains,
        Err(e) => {
            eprintln!("{}", describe(&e).red());
            return Ok(());
        }
    };

    let columns = &config.get_domains.col_keys;
    let rows = build_rows(
        &domains,
        columns,
        MissingFieldPolicy::from_skip_flag(config.get_domains.skip_incomplete),
    );
    if let Ok(json) = serde_json::to_string(&rows) {
        debug!(rows = %json, "Report rows");
    }

    if rows.is_empty() {
        println!("Nothing to print\n");
    } else {
        println!("{}\n", render_table(&header_row(columns), &rows));
    }

    Ok(())
}

fn describe(error: &ApiError) -> String {
    match error {
        ApiError::ApiReported(payload) => format!("Response: {}", payload),
        e if e.is_network() => format!("HTTP error occurred: {}", e),
        e => format!("Error loading domain data: {}", e),
    }
}
