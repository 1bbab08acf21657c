//! PageCheck: self-hosted SEO page analyzer
//!
//! Web UI plus a small CLI over the same store and pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pagecheck::{
    config::{Config, LogFormat, LoggingConfig},
    http::HttpServer,
    service::{Analyzer, SubmitOutcome},
    store::UrlStore,
    types::{CheckRecord, UrlSummary},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pagecheck")]
#[command(about = "Store URLs and check them for basic SEO signals")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Data directory override
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web UI server
    Serve {
        /// Listen address override
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Add a URL to the store
    Add {
        /// The URL to add
        url: String,
    },

    /// Run one check against a stored URL
    Check {
        /// URL entry id
        id: u64,

        /// Output format (json, text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List stored URLs with their latest check
    List {
        /// Output format (json, text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Write a default configuration file
    Init {
        /// Output directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    init_logging(&config.logging, cli.verbose);

    match cli.command {
        Commands::Serve { listen } => {
            if let Some(listen) = listen {
                config.server.listen_addr = listen;
            }
            config.validate()?;

            let store = Arc::new(
                UrlStore::open(&config.storage.data_dir)
                    .context("Failed to open the URL store")?,
            );
            let analyzer = Arc::new(Analyzer::new(store, &config.fetch)?);
            HttpServer::new(config.server, analyzer).run().await
        }

        Commands::Add { url } => {
            let store = Arc::new(UrlStore::open(&config.storage.data_dir)?);
            let analyzer = Analyzer::new(store.clone(), &config.fetch)?;
            match analyzer.submit_url(&url)? {
                SubmitOutcome::Created(id) => println!("Added entry {}", id),
                SubmitOutcome::Exists(id) => println!("Already exists as entry {}", id),
                SubmitOutcome::Invalid(e) => anyhow::bail!("Invalid URL: {}", e),
            }
            store.flush()?;
            Ok(())
        }

        Commands::Check { id, format } => {
            let store = Arc::new(UrlStore::open(&config.storage.data_dir)?);
            let analyzer = Analyzer::new(store.clone(), &config.fetch)?;
            let record = analyzer
                .run_check(id)
                .await
                .with_context(|| format!("Check of entry {} failed", id))?;
            store.flush()?;
            print_check(&record, &format)
        }

        Commands::List { format } => {
            let store = Arc::new(UrlStore::open(&config.storage.data_dir)?);
            let analyzer = Analyzer::new(store, &config.fetch)?;
            print_list(&analyzer.list_urls()?, &format)
        }

        Commands::Init { path } => {
            let target = path.join("config.toml");
            if target.exists() {
                anyhow::bail!("{} already exists", target.display());
            }
            std::fs::write(&target, Config::default().to_toml()?)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            println!("Wrote {}", target.display());
            Ok(())
        }
    }
}

fn init_logging(config: &LoggingConfig, verbose: u8) {
    let level = match verbose {
        0 => config.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn print_check(record: &CheckRecord, format: &str) -> Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(record)?),
        _ => {
            println!("Check {} for entry {}", record.id, record.url_id);
            println!("  status:      {}", record.status_code);
            println!("  h1:          {}", record.seo.heading);
            println!("  title:       {}", record.seo.title);
            println!("  description: {}", record.seo.description);
            println!("  created at:  {}", record.created_at.format("%Y-%m-%d %H:%M:%S"));
        }
    }
    Ok(())
}

fn print_list(summaries: &[UrlSummary], format: &str) -> Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(summaries)?),
        _ => {
            for summary in summaries {
                match &summary.last_check {
                    Some(check) => println!(
                        "{:>4}  {}  (last check {} -> {})",
                        summary.entry.id,
                        summary.entry.host,
                        check.created_at.format("%Y-%m-%d %H:%M"),
                        check.status_code,
                    ),
                    None => println!(
                        "{:>4}  {}  (never checked)",
                        summary.entry.id, summary.entry.host
                    ),
                }
            }
        }
    }
    Ok(())
}
