mod commands;
mod data_file;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clubcal_core::date_range::DateRange;
use commands::ScopeArgs;

#[derive(Parser)]
#[command(name = "clubcal")]
#[command(about = "Browse district, zone and club events on a month calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month grid
    Month {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Month number 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,

        #[command(flatten)]
        scope: ScopeArgs,

        /// Print the layout as JSON
        #[arg(long)]
        json: bool,
    },
    /// List events day by day
    Agenda {
        /// Show events from this date (YYYY-MM-DD, or "start" for all past events)
        #[arg(long)]
        from: Option<String>,

        /// Show events until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        #[command(flatten)]
        scope: ScopeArgs,

        /// Print the visible events as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how the current selection resolves
    Scope {
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Show or change the saved filter
    Filter {
        #[command(subcommand)]
        action: FilterAction,
    },
    /// Show configuration paths
    Config,
}

#[derive(Subcommand)]
enum FilterAction {
    Show,
    Set {
        #[command(flatten)]
        scope: ScopeArgs,
    },
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Month {
            year,
            month,
            scope,
            json,
        } => commands::month::run(year, month, &scope, json).await,
        Commands::Agenda {
            from,
            to,
            scope,
            json,
        } => {
            let range = DateRange::from_args(from.as_deref(), to.as_deref())
                .map_err(|e| anyhow::anyhow!(e))?;
            commands::agenda::run(range, &scope, json).await
        }
        Commands::Scope { scope } => commands::scope::run(&scope),
        Commands::Filter { action } => match action {
            FilterAction::Show => commands::filter::show(),
            FilterAction::Set { scope } => commands::filter::set(&scope),
            FilterAction::Reset => commands::filter::reset(),
        },
        Commands::Config => commands::config::run(),
    }
}
