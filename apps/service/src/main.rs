use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::level_filters::LevelFilter;

use inspector_service::monitoring::BatchScheduler;
use inspector_service::{Config, HistoryRecord, Inspector, Observation, StatusRecord, UrlAnalytics};

#[derive(Debug, Parser)]
#[command(name = "inspector", version, about = "Probe URLs and inspect their availability")]
struct Cli {
    /// Configuration file (defaults to ~/.config/url-inspector/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log every probe (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Probe URLs once and record the results
    Check {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Show the most recent observations of one URL
    History { url: String },
    /// Uptime and mean latency over the most recent observations
    Analytics {
        #[arg(required = true, value_delimiter = ',')]
        urls: Vec<String>,
    },
    /// Newest observation of every URL ever checked
    Latest,
    /// Delete every recorded observation
    Purge,
    /// Re-check URLs periodically until interrupted
    Watch {
        /// Seconds between batches (defaults to the configured interval)
        #[arg(short, long)]
        interval: Option<u64>,
        /// URLs to check (defaults to the configured list)
        urls: Vec<String>,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        logger::init_tracing_with_level(LevelFilter::DEBUG);
    } else {
        logger::init_tracing();
    }

    let config = Config::from_config(cli.config.as_ref())?;

    if let Command::Config = cli.command {
        print!("{config}");
        return Ok(());
    }

    let inspector = Inspector::open(&config).await?;
    let outcome = run(&cli, &config, &inspector).await;
    inspector.shutdown();
    outcome
}

async fn run(cli: &Cli, config: &Config, inspector: &Inspector) -> Result<()> {
    match &cli.command {
        Command::Check { urls } => {
            let observations = inspector.check_urls(urls).await?;
            print_statuses(cli.json, observations)
        }
        Command::History { url } => {
            let history = inspector.history(url).await?;
            print_history(cli.json, history)
        }
        Command::Analytics { urls } => {
            let analytics = inspector.analytics(urls).await?;
            print_analytics(cli.json, &analytics)
        }
        Command::Latest => {
            let latest = inspector.latest_statuses().await?;
            print_statuses(cli.json, latest)
        }
        Command::Purge => {
            let deleted = inspector.purge_all().await?;
            if cli.json {
                print_json(&serde_json::json!({ "success": true, "deleted": deleted }))
            } else {
                println!("Deleted {deleted} observations");
                Ok(())
            }
        }
        Command::Watch { interval, urls } => {
            let urls = if urls.is_empty() { config.schedule.urls.clone() } else { urls.clone() };
            if urls.is_empty() {
                bail!("no URLs given and none configured under [schedule]");
            }
            let every = Duration::from_secs(interval.unwrap_or(config.schedule.interval_seconds).max(1));
            watch(cli.json, inspector, urls, every).await
        }
        Command::Config => Ok(()),
    }
}

async fn watch(json: bool, inspector: &Inspector, urls: Vec<String>, every: Duration) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(8);
    let scheduler = BatchScheduler::new(inspector.prober(), tx);
    let handle = scheduler.schedule(urls, every);

    loop {
        tokio::select! {
            batch = rx.recv() => match batch {
                Some(observations) => print_statuses(json, observations)?,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping periodic checks");
                break;
            }
        }
    }

    handle.abort();
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_latency(ms: Option<f64>) -> String {
    ms.map(|ms| format!("{ms:.0} ms")).unwrap_or_else(|| "-".to_string())
}

fn print_statuses(json: bool, observations: Vec<Observation>) -> Result<()> {
    let records: Vec<StatusRecord> = observations.into_iter().map(StatusRecord::from).collect();
    if json {
        return print_json(&records);
    }

    for record in &records {
        println!(
            "{:<5} {:>9}  {}  {}",
            record.status,
            format_latency(record.response_time),
            record.last_checked.to_rfc3339(),
            record.url
        );
    }
    Ok(())
}

fn print_history(json: bool, observations: Vec<Observation>) -> Result<()> {
    let records: Vec<HistoryRecord> = observations.into_iter().map(HistoryRecord::from).collect();
    if json {
        return print_json(&records);
    }

    for record in &records {
        println!(
            "{}  {:<5} {:>9}",
            record.checked_at.to_rfc3339(),
            record.status,
            format_latency(record.response_time)
        );
    }
    Ok(())
}

fn print_analytics(json: bool, analytics: &[UrlAnalytics]) -> Result<()> {
    if json {
        return print_json(analytics);
    }

    for summary in analytics {
        println!(
            "{:>7.2}%  avg {:>9}  {}",
            summary.uptime_percent,
            format_latency(summary.avg_response_time),
            summary.url
        );
    }
    Ok(())
}
