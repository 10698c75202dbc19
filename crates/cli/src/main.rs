use anyhow::Context;
use clap::{Parser, Subcommand};
use earnings_core::config::Settings;
use earnings_core::domain::{SectorFilter, WeekDescriptor};
use earnings_core::gateway::SnapshotGateway;
use earnings_core::{Calendar, CalendarError};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;

#[derive(Debug, Parser)]
#[command(name = "earnings_cli")]
struct Args {
    /// Base URL of the published calendar site. Overrides EARNINGS_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Local copy of the published site. Overrides EARNINGS_DATA_DIR.
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the selectable weeks.
    Weeks,
    /// Autosuggest companies and tickers.
    Suggest { query: String },
    /// Find every scheduled report for a company or ticker.
    Search { query: String },
    /// Show the calendar for a sector over one or more weeks.
    Preview {
        #[command(flatten)]
        range: RangeArgs,
        /// Print the preview document as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Save the spreadsheet for a sector and week range.
    Download {
        #[command(flatten)]
        range: RangeArgs,
        /// Output file. Defaults to the published file name in the current directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Suggest as you type: one query per stdin line.
    Interactive,
}

#[derive(Debug, clap::Args)]
struct RangeArgs {
    /// Sector name, or "All".
    #[arg(long, default_value = "All")]
    sector: String,

    /// First week id (YYYY-MM-DD).
    #[arg(long)]
    start: String,

    /// Last week id. Defaults to the first week.
    #[arg(long)]
    end: Option<String>,
}

impl RangeArgs {
    fn sector(&self) -> SectorFilter {
        SectorFilter::parse(&self.sector)
    }

    fn end(&self) -> &str {
        self.end.as_deref().unwrap_or(&self.start)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut settings = Settings::from_env()?;
    if args.base_url.is_some() {
        settings.base_url = args.base_url.clone();
    }
    if args.data_dir.is_some() {
        settings.data_dir = args.data_dir.clone();
    }
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let res = run(args.command, &settings).await;
    if let Err(err) = &res {
        if err.downcast_ref::<CalendarError>().is_none() {
            sentry_anyhow::capture_anyhow(err);
        }
        tracing::error!(error = %err, "command failed");
    }
    res
}

async fn run(command: Command, settings: &Settings) -> anyhow::Result<()> {
    let gateway = earnings_core::gateway::from_settings(settings)?;
    let weeks = load_weeks(gateway.as_ref()).await;
    let calendar = Calendar::new(gateway, weeks);

    match command {
        Command::Weeks => {
            for week in calendar.weeks() {
                println!("{}  {}", week.id, week.label);
            }
        }
        Command::Suggest { query } => {
            render::print_suggestions(&calendar.suggest(&query).await);
        }
        Command::Search { query } => {
            let matches = calendar.search(&query).await?;
            render::print_search_results(query.trim(), &matches);
        }
        Command::Preview { range, json } => {
            let sector = range.sector();
            let preview = calendar.preview(&sector, &range.start, range.end()).await?;
            if json {
                let doc = preview.into_document();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&doc).context("failed to encode preview")?
                );
            } else {
                render::print_preview(&preview);
            }
        }
        Command::Download { range, out } => {
            let sector = range.sector();
            let preview = calendar.preview(&sector, &range.start, range.end()).await?;
            let file = calendar.download(&preview, &sector).await?;
            let path = out.unwrap_or_else(|| PathBuf::from(&file.filename));
            tokio::fs::write(&path, &file.bytes)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Spreadsheet downloaded: {}", path.display());
        }
        Command::Interactive => interactive(Arc::new(calendar)).await?,
    }

    Ok(())
}

// Falls back to the generated week list when the site has none published.
async fn load_weeks(gateway: &dyn SnapshotGateway) -> Vec<WeekDescriptor> {
    match Calendar::fetch_weeks(gateway).await {
        Ok(weeks) => weeks,
        Err(err) => {
            tracing::warn!(error = %err, "week list unavailable; using generated weeks");
            let today = earnings_core::time::weeks::today_eastern(chrono::Utc::now());
            earnings_core::time::weeks::week_options(
                today,
                earnings_core::time::weeks::DEFAULT_WEEKS_BACK,
                earnings_core::time::weeks::DEFAULT_WEEKS_AHEAD,
            )
        }
    }
}

async fn interactive(calendar: Arc<Calendar>) -> anyhow::Result<()> {
    use tokio::io::AsyncBufReadExt;

    let mut pending = tokio::task::JoinSet::new();
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let ticket = calendar.sequencer().issue();
        let calendar = calendar.clone();
        pending.spawn(async move {
            let suggestions = calendar
                .sequencer()
                .run_latest(ticket, calendar.suggest(&line))
                .await;
            // None: a newer line superseded this one.
            if let Some(suggestions) = suggestions {
                render::print_suggestions(&suggestions);
            }
        });
    }

    while let Some(res) = pending.join_next().await {
        res.context("suggestion task panicked")?;
    }
    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
