//! CLI entry point for the crew sales leaderboard.
//!
//! Provides subcommands for rendering the leaderboard page once, logging or
//! exporting the rankings, and re-rendering the page on an interval.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crew_leaderboard::{
    cache::{FetchCache, SystemClock},
    config::Settings,
    dashboard::Dashboard,
    fetch::{BasicClient, DefaultSource},
    output::{export_rankings, print_json, print_pretty, print_summary, write_page},
    render::render_page,
};
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "crew_leaderboard")]
#[command(about = "Crew sales leaderboard per carrier", long_about = None)]
struct Cli {
    /// URL or file path of the sales CSV (defaults to LEADERBOARD_CSV_URL)
    #[arg(short, long, global = true, value_name = "FILE_OR_URL")]
    source: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the leaderboard page to an HTML file
    Render {
        /// HTML file to write
        #[arg(short, long, default_value = "leaderboard.html")]
        output: String,

        /// Page heading (defaults to LEADERBOARD_TITLE)
        #[arg(long)]
        title: Option<String>,
    },
    /// Log the leaderboard
    Show {
        /// Log rankings as JSON instead of one line per entry
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write every ranked entry to a CSV file
    Export {
        /// CSV file to write
        #[arg(short, long, default_value = "rankings.csv")]
        output: String,
    },
    /// Re-render the page on an interval, reusing fetches within the cache TTL
    Watch {
        /// HTML file to write
        #[arg(short, long, default_value = "leaderboard.html")]
        output: String,

        /// Seconds between renders
        #[arg(short, long, default_value_t = 60)]
        interval: u64,

        /// Number of renders (0 = until interrupted)
        #[arg(short = 'n', long, default_value_t = 0)]
        iterations: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/crew_leaderboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("crew_leaderboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    let location = cli.source.unwrap_or_else(|| settings.csv_url.clone());

    let source = DefaultSource::new(BasicClient::new().context("building HTTP client")?);
    let mut cache = FetchCache::new(settings.cache_ttl, SystemClock);

    match cli.command {
        Commands::Render { output, title } => {
            let dashboard = Dashboard::load(&mut cache, &source, &location).await;
            let title = title.unwrap_or(settings.title);
            write_page(&output, &render_page(&title, &dashboard))?;
            report(&dashboard);
        }
        Commands::Show { json } => {
            let dashboard = Dashboard::load(&mut cache, &source, &location).await;
            report(&dashboard);
            print_pretty(dashboard.carriers());
            if json {
                print_json(dashboard.carriers())?;
            } else {
                print_summary(dashboard.carriers());
            }
        }
        Commands::Export { output } => {
            let dashboard = Dashboard::load(&mut cache, &source, &location).await;
            report(&dashboard);
            if let Dashboard::Failed { message } = &dashboard {
                anyhow::bail!("cannot export rankings: {message}");
            }
            export_rankings(&output, dashboard.carriers())?;
            info!(path = %output, "Rankings exported");
        }
        Commands::Watch {
            output,
            interval,
            iterations,
        } => {
            watch(
                &mut cache,
                &source,
                &location,
                &output,
                &settings.title,
                interval,
                iterations,
            )
            .await?;
        }
    }

    Ok(())
}

/// Logs the outcome of a load without failing the command.
fn report(dashboard: &Dashboard) {
    match dashboard {
        Dashboard::Failed { message } => error!(error = %message, "Leaderboard unavailable"),
        Dashboard::NoData => warn!("No data available"),
        Dashboard::Ready {
            refreshed,
            carriers,
        } => info!(refreshed = %refreshed, carriers = carriers.len(), "Leaderboard ready"),
    }
}

/// Renders the page every `interval` seconds until `iterations` renders
/// have been written (0 = forever).
#[tracing::instrument(skip(cache, source, title))]
async fn watch(
    cache: &mut FetchCache<SystemClock>,
    source: &DefaultSource<BasicClient>,
    location: &str,
    output: &str,
    title: &str,
    interval: u64,
    iterations: usize,
) -> Result<()> {
    if iterations == 0 {
        info!(interval, "Rendering until interrupted. Press Ctrl+C to stop.");
    }

    let mut rendered = 0;
    loop {
        if iterations > 0 && rendered >= iterations {
            break;
        }
        rendered += 1;

        let dashboard = Dashboard::load(cache, source, location).await;
        report(&dashboard);
        if let Err(e) = write_page(output, &render_page(title, &dashboard)) {
            error!(error = %e, "Failed to write page");
        }

        if iterations == 0 || rendered < iterations {
            info!(interval, "Waiting before next render");
            tokio::time::sleep(Duration::from_secs(interval)).await;
        }
    }

    info!(rendered, "Finished rendering");
    Ok(())
}
