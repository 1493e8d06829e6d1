// Entrypoint for the CLI application.
// - Parses arguments, sets up logging and resolves the API key.
// - Subcommands map one-to-one onto library calls; with no subcommand the
//   interactive menu starts.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use std::path::PathBuf;

use benchling_cli::api::{Benchling, HttpTransport};
use benchling_cli::catalog::{Catalog, MatchMode};
use benchling_cli::config::Config;
use benchling_cli::error::BenchlingError;
use benchling_cli::format::{self, Format};
use benchling_cli::models::{FolderType, NewFolder};
use benchling_cli::resources::SearchQuery;
use benchling_cli::ui::{self, describe_folder, describe_sequence};

#[derive(Debug, Parser)]
#[command(version, about = "Command line client for the Benchling API", long_about = None)]
struct Cli {
    /// API key (defaults to BENCHLING_API_KEY or ~/.benchling/config.json)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// API root URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// More log output (repeat for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List folders and their sequence counts
    Folders,
    /// Show one sequence
    Get { id: String },
    /// Search the cached folder listing with a regular expression
    Search {
        pattern: String,
        /// Field to match against
        #[arg(short, long, default_value = "name")]
        field: String,
        /// Search folders instead of sequences
        #[arg(long)]
        folders: bool,
        /// Compare the whole field instead of a regex search
        #[arg(long)]
        exact: bool,
    },
    /// Server-side text search
    TextSearch {
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Follow pages until the results run out
        #[arg(long)]
        all: bool,
    },
    /// Write a sequence as GenBank or FASTA
    Export {
        id: String,
        /// genbank or fasta
        #[arg(short, long, default_value = "genbank")]
        format: Format,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Resolve a share link to its sequence
    Share { url: String },
    /// Create a folder owned by the API key's user
    CreateFolder {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        /// INVENTORY, NOTEBOOK or ALL
        #[arg(short = 't', long = "type", default_value = "INVENTORY")]
        folder_type: FolderType,
    },
    /// Interactive menu
    Menu,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let command = cli.command.unwrap_or(Command::Menu);
    let config = match Config::resolve(cli.api_key, cli.base_url) {
        Ok(cfg) => cfg,
        Err(BenchlingError::Config(_)) if matches!(command, Command::Menu) => ui::prompt_api_key()?,
        Err(e) => return Err(e).context("Failed to load configuration"),
    };
    let api = Benchling::from_config(&config).context("Failed to build HTTP client")?;
    info!("using {}", api.base_url());

    run(&api, command)
}

fn run(api: &Benchling<HttpTransport>, command: Command) -> Result<()> {
    match command {
        Command::Folders => {
            for folder in api.folders().list()? {
                println!("{}", describe_folder(&folder));
            }
        }
        Command::Get { id } => {
            let seq = api.sequences().get(&id)?;
            println!("{}", describe_sequence(&seq));
        }
        Command::Search {
            pattern,
            field,
            folders,
            exact,
        } => {
            let mode = if exact { MatchMode::Exact } else { MatchMode::Regex };
            let catalog = Catalog::load(api).context("Failed to load folders")?;
            let query = [(field.as_str(), pattern.as_str())];
            if folders {
                for f in catalog.filter_folders(&query, mode)? {
                    println!("{}", describe_folder(f));
                }
            } else {
                for s in catalog.filter_sequences(&query, mode)? {
                    println!("{}\t{}\t{}", s.id, s.name, s.folder.as_deref().unwrap_or("-"));
                }
            }
        }
        Command::TextSearch {
            query,
            limit,
            offset,
            all,
        } => {
            let query = SearchQuery {
                limit,
                offset,
                ..SearchQuery::text(query)
            };
            if all {
                for page in api.search_pages(query)? {
                    for hit in page? {
                        println!("{}", hit);
                    }
                }
            } else {
                for hit in api.search(&query)? {
                    println!("{}", hit);
                }
            }
        }
        Command::Export { id, format: fmt, out } => {
            let seq = api.sequences().get(&id)?;
            match out {
                Some(path) => {
                    format::write_file(&seq, fmt, &path)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("wrote {} as {}", path.display(), fmt);
                }
                None => print!("{}", fmt.render(&seq)),
            }
        }
        Command::Share { url } => {
            let seq = api.sequence_from_share_link(&url)?;
            println!("{}", describe_sequence(&seq));
        }
        Command::CreateFolder {
            name,
            description,
            folder_type,
        } => {
            let folder = api.folders().create(&NewFolder {
                name,
                description,
                owner: None,
                folder_type,
            })?;
            println!("{}", describe_folder(&folder));
        }
        Command::Menu => ui::main_menu(api.clone())?,
    }
    Ok(())
}
