mod commands;
mod render;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use daybook_core::EventStore;
use daybook_core::config::DaybookConfig;
use daybook_core::persist::FileStorage;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "View your month at a glance and manage personal events")]
struct Cli {
    /// Directory holding the event store (overrides data_dir from config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the month grid with event counts per day
    Month {
        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
    /// List the events on a day
    Day {
        /// Day to list (YYYY-MM-DD)
        date: String,
    },
    /// Add an event to a day
    Add {
        /// Day of the event (YYYY-MM-DD)
        date: String,

        /// Event name
        name: String,

        /// Start time (HH:MM, 24-hour)
        #[arg(short, long)]
        start: String,

        /// End time (HH:MM, 24-hour)
        #[arg(short, long)]
        end: String,

        /// Event description
        #[arg(short, long)]
        description: Option<String>,

        /// Display color tag
        #[arg(long)]
        color: Option<String>,
    },
    /// Change fields of an existing event
    Update {
        /// Event id
        id: String,

        #[arg(long)]
        name: Option<String>,

        /// New day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// New start time (HH:MM)
        #[arg(short, long)]
        start: Option<String>,

        /// New end time (HH:MM)
        #[arg(short, long)]
        end: Option<String>,

        /// New description (empty string removes it)
        #[arg(short, long)]
        description: Option<String>,

        /// New color tag (empty string removes it)
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete an event
    Delete {
        /// Event id
        id: String,
    },
    /// Find events whose name or description contains a keyword
    Search { keyword: String },
    /// Delete every event
    Clear,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = DaybookConfig::load().context("Failed to load daybook config")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let storage = config.storage();
    debug!(path = %storage.path().display(), "opening event store");
    let mut store: EventStore<FileStorage> = EventStore::open(storage);

    match cli.command {
        Commands::Month { month } => commands::month::run(&store, month.as_deref(), config.week_start),
        Commands::Day { date } => commands::day::run(&store, &date),
        Commands::Add {
            date,
            name,
            start,
            end,
            description,
            color,
        } => commands::add::run(&mut store, &date, name, start, end, description, color),
        Commands::Update {
            id,
            name,
            date,
            start,
            end,
            description,
            color,
        } => commands::update::run(
            &mut store,
            &id,
            commands::update::Changes {
                name,
                date,
                start,
                end,
                description,
                color,
            },
        ),
        Commands::Delete { id } => commands::delete::run(&mut store, &id),
        Commands::Search { keyword } => commands::search::run(&store, &keyword),
        Commands::Clear => commands::clear::run(&mut store),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DAYBOOK_LOG")
        .unwrap_or_else(|_| EnvFilter::new("daybook=info,daybook_core=warn,warn"));

    let format = env::var("DAYBOOK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}
