use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::eyre;
use std::path::PathBuf;
use watchlist_config::{BackendKind, MissingItemPolicy, PathManager};
use watchlist_core::SortKey;
use watchlist_models::{MediaType, WatchStatus};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "watchlist")]
#[command(about = "Keep track of the movies and series you want to watch")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    ToWatch,
    Watched,
}

impl From<StatusArg> for WatchStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::ToWatch => WatchStatus::ToWatch,
            StatusArg::Watched => WatchStatus::Watched,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TypeArg {
    Movie,
    Tv,
}

impl From<TypeArg> for MediaType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Movie => MediaType::Movie,
            TypeArg::Tv => MediaType::Tv,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BackendArg {
    Document,
    KeyValue,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Document => BackendKind::Document,
            BackendArg::KeyValue => BackendKind::KeyValue,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MissingItemsArg {
    Ignore,
    NotFound,
}

impl From<MissingItemsArg> for MissingItemPolicy {
    fn from(arg: MissingItemsArg) -> Self {
        match arg {
            MissingItemsArg::Ignore => MissingItemPolicy::Ignore,
            MissingItemsArg::NotFound => MissingItemPolicy::NotFound,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show your list
    List {
        /// Only entries with this status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        /// Only movies or only series
        #[arg(long = "type", value_enum)]
        media_type: Option<TypeArg>,

        /// Only titles containing this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,

        /// Sort order: added, title, year or rating
        #[arg(long, default_value = "added")]
        sort: SortKey,
    },
    /// Show list statistics
    Stats,
    /// Search TMDB for movies and series
    #[command(long_about = "Search TMDB for movies and series. Without a query, reads queries from stdin as you type them and shows results once typing settles.")]
    Search {
        /// What to search for
        query: Option<String>,
    },
    /// Search TMDB and add a result to your list
    Add {
        /// What to search for
        query: String,

        /// Pick the Nth result (1-based) instead of choosing interactively
        #[arg(long, value_name = "N")]
        pick: Option<usize>,
    },
    /// Mark an entry as watched
    Watched { id: i64 },
    /// Move an entry back to "to watch"
    Unwatch { id: i64 },
    /// Toggle the favorite flag of an entry
    Favorite { id: i64 },
    /// Give an entry a personal rating from 1 to 5
    Rate { id: i64, rating: u8 },
    /// Remove an entry from your list
    Remove { id: i64 },
    /// View or change configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Run the list API server
    #[command(long_about = "Serve the /api/movies resource that the remote store talks to, backed by either a SQLite document collection or a single JSON blob.")]
    Serve {
        /// Address to bind, e.g. 127.0.0.1:8787
        #[arg(long)]
        bind: Option<String>,

        /// Persistence backend
        #[arg(long, value_enum)]
        backend: Option<BackendArg>,

        /// Log to a daily-rolling file (defaults to the log directory)
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        log_file: Option<Option<PathBuf>>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Configure the remote list API
    Remote {
        /// Resource URL, e.g. http://127.0.0.1:8787/api/movies
        #[arg(long)]
        url: Option<String>,

        /// Enable or disable the remote (disabled means local only)
        #[arg(long)]
        enabled: Option<bool>,
    },
    /// Store the TMDB API key
    Tmdb {
        /// TMDB API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Configure the local fallback store
    Local {
        /// How updates and deletes of unknown ids are answered
        #[arg(long, value_enum)]
        missing_items: MissingItemsArg,
    },
    /// Configure the API server
    Server {
        #[arg(long)]
        bind: Option<String>,

        #[arg(long, value_enum)]
        backend: Option<BackendArg>,

        /// SQLite URL for the document backend, e.g. sqlite:movies.db
        #[arg(long)]
        database_url: Option<String>,

        /// Blob file for the key-value backend
        #[arg(long)]
        kv_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = match &cli.command {
        Commands::Serve { log_file: Some(path), .. } => {
            Some(path.clone().unwrap_or_else(|| PathManager::default().server_log_file()))
        }
        _ => None,
    };
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file.as_deref()).map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::List {
            status,
            media_type,
            search,
            sort,
        } => commands::list::run_list(status, media_type, search, sort, &output).await,
        Commands::Stats => commands::stats::run_stats(&output).await,
        Commands::Search { query } => commands::search::run_search(query, &output).await,
        Commands::Add { query, pick } => commands::add::run_add(&query, pick, &output).await,
        Commands::Watched { id } => commands::item::mark_watched(id, true, &output).await,
        Commands::Unwatch { id } => commands::item::mark_watched(id, false, &output).await,
        Commands::Favorite { id } => commands::item::toggle_favorite(id, &output).await,
        Commands::Rate { id, rating } => commands::item::rate(id, rating, &output).await,
        Commands::Remove { id } => commands::item::remove(id, &output).await,
        Commands::Config { cmd } => commands::config::run_config(cmd, &output).await,
        Commands::Serve { bind, backend, .. } => commands::serve::run_serve(bind, backend, &output).await,
    }
}
