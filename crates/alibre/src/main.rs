//! Alibre command-line interface
//!
//! Manages library folders, lists and searches recorded books, and prints
//! text-readable books page by page.

use alibre_logging::{init_logging, LogConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

use cli::context::AppContext;

#[derive(Parser, Debug)]
#[command(name = "alibre", version, about = "Personal e-book library")]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Config file (default: ~/.alibre/config.toml)
    #[arg(long, global = true, env = "ALIBRE_CONFIG")]
    config: Option<PathBuf>,

    /// Library database (overrides database_path from the config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage library folders
    Folder {
        #[command(subcommand)]
        action: cli::folder::FolderAction,
    },

    /// Import a folder, or rescan every library folder
    Scan(cli::scan::ScanArgs),

    /// List, search and remove books
    Books {
        #[command(subcommand)]
        action: cli::books::BooksAction,
    },

    /// Print a page of a book as plain text
    Read(cli::read::ReadArgs),

    /// Show library statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration paths and settings
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn command_wants_json(command: &Commands) -> bool {
    match command {
        Commands::Folder { action } => action.wants_json(),
        Commands::Scan(args) => args.json,
        Commands::Books { action } => action.wants_json(),
        Commands::Read(args) => args.json,
        Commands::Stats { json } | Commands::Config { json } => *json,
    }
}

async fn run_command(command: Commands, ctx: AppContext) -> anyhow::Result<()> {
    match command {
        Commands::Folder { action } => cli::folder::run(action, &ctx).await,
        Commands::Scan(args) => cli::scan::run(args, &ctx).await,
        Commands::Books { action } => cli::books::run(action, &ctx).await,
        Commands::Read(args) => cli::read::run(args, &ctx).await,
        Commands::Stats { json } => cli::stats::run(json, &ctx).await,
        Commands::Config { json } => cli::config::run(json, &ctx),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = AppContext::load(cli.config, cli.db)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(run_command(cli.command, ctx))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_mode = command_wants_json(&cli.command);

    let _log_guard = match init_logging(LogConfig {
        app_name: "alibre",
        verbose: cli.verbose,
    }) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: failed to initialize logging: {:#}", err);
            None
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json_mode {
                cli::error::print_json_error(&err);
            } else if let Some(helpful) = err.downcast_ref::<cli::error::HelpfulError>() {
                eprint!("{}", helpful);
            } else {
                eprintln!("{:?}", err);
            }
            ExitCode::from(1)
        }
    }
}
