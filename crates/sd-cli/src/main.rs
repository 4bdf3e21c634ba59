use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use sd_store::Store;

mod commands;

use commands::{assistant, calendar, finance, Session};

#[derive(Parser)]
#[command(name = "shootdesk")]
#[command(about = "ShootDesk studio CLI (runs against the demo fixtures)", long_about = None)]
struct Cli {
    /// Layered config paths in merge order (repeatable). Defaults apply when omitted.
    #[arg(long = "config", global = true)]
    config_paths: Vec<String>,

    /// Print JSON instead of text where supported.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a calendar view
    Calendar {
        /// month | week | day
        #[arg(value_parser = calendar::parse_view_mode)]
        mode: sd_calendar::ViewMode,

        /// Reference date (YYYY-MM-DD). Defaults to today in the configured zone.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Step one period before rendering: prev | next
        #[arg(long, value_parser = calendar::parse_direction)]
        nav: Option<sd_calendar::Direction>,
    },

    /// Next shoots within the configured window
    Upcoming {
        /// Cap on the number of appointments listed
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Income, expense, balance and ledger
    Finance {
        /// all | income | expense
        #[arg(long, default_value = "all", value_parser = finance::parse_kind)]
        kind: sd_finance::KindFilter,
    },

    /// Generate a photoshoot concept
    Concept {
        /// Free-text description of the shoot
        prompt: String,
    },

    /// Draft an email to a client
    Email {
        #[arg(long)]
        client: String,

        #[arg(long)]
        scenario: String,

        #[arg(long)]
        tone: Option<String>,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> overrides)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Silent if the file does not exist.
    let _ = dotenvy::from_filename(".env.local");

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let now = Utc::now();
    let session = || Session::load(&cli.config_paths, Store::seeded(now), now);

    match cli.cmd {
        Commands::Calendar { mode, date, nav } => {
            calendar::show(&session()?, mode, date, nav, cli.json)?;
        }
        Commands::Upcoming { limit } => {
            calendar::upcoming(&session()?, limit, cli.json)?;
        }
        Commands::Finance { kind } => {
            finance::show(&session()?, kind, cli.json)?;
        }
        Commands::Concept { prompt } => {
            assistant::concept(&session()?, &prompt, cli.json).await?;
        }
        Commands::Email {
            client,
            scenario,
            tone,
        } => {
            assistant::email(&session()?, client, scenario, tone).await?;
        }
        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = sd_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}
