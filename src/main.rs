use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use docsearch::config::{find_config_file, get_config, load_config, Config};
use docsearch::models::{DisplayDocument, Page, ResultEntry};
use docsearch::transport::Framing;
use docsearch::ui::{self, Status};
use docsearch::SearchClient;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// docsearch - Query a document search backend and read the results
#[derive(Parser, Debug)]
#[command(name = "docsearch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query a document search backend and read the results", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend host (overrides config)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Backend port (overrides config)
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Results per page (overrides config)
    #[arg(long, global = true)]
    page_size: Option<usize>,

    /// Response framing (overrides config)
    #[arg(long, value_enum, global = true)]
    framing: Option<FramingArg>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (text if TTY, JSON otherwise)
    Auto,
    /// Human-readable text
    Text,
    /// JSON format (machine-readable)
    Json,
}

/// Response framing
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FramingArg {
    /// Stop at the first short read
    ShortRead,
    /// Read until the backend closes the connection
    UntilClose,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search and print one page of results
    #[command(alias = "s")]
    Search {
        /// Search query string
        query: String,

        /// Page to show (1-based)
        #[arg(long, short, default_value_t = 1)]
        page: usize,
    },

    /// Render a document
    #[command(alias = "o")]
    Open {
        /// Path of the document (as returned by a search)
        path: String,
    },

    /// Search, then page through and open results interactively
    #[command(alias = "b")]
    Browse {
        /// Initial search query
        query: String,
    },

    /// Print the effective configuration
    Config,
}

impl OutputFormat {
    fn is_json(self) -> bool {
        match self {
            OutputFormat::Auto => !ui::is_terminal(),
            OutputFormat::Text => false,
            OutputFormat::Json => true,
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(path) = &cli.config {
        load_config(path).with_context(|| format!("loading {}", path.display()))?
    } else if let Some(path) = find_config_file() {
        load_config(&path).with_context(|| format!("loading {}", path.display()))?
    } else {
        get_config()?
    };

    if let Some(host) = &cli.host {
        config.backend.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.backend.port = port;
    }
    if let Some(page_size) = cli.page_size {
        config.results.page_size = page_size;
    }
    if let Some(framing) = cli.framing {
        config.backend.framing = match framing {
            FramingArg::ShortRead => Framing::ShortRead,
            FramingArg::UntilClose => Framing::UntilClose,
        };
    }

    config.validate()?;
    Ok(config)
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };
    let json = config.logging.format.as_deref() == Some("json");

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("docsearch={}", level)),
        ))
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn output_page(page: &Page, format: OutputFormat) -> Result<()> {
    if format.is_json() {
        println!("{}", serde_json::to_string_pretty(page)?);
    } else {
        ui::print_page(page);
    }
    Ok(())
}

fn output_document(doc: &DisplayDocument, format: OutputFormat) -> Result<()> {
    if format.is_json() {
        println!("{}", serde_json::to_string_pretty(doc)?);
    } else {
        ui::print_document(doc);
    }
    Ok(())
}

/// Run a search on its own task so the caller's loop is never blocked on the
/// network.
async fn spawn_search(client: &Arc<SearchClient>, query: &str) -> Result<Page> {
    let client = Arc::clone(client);
    let query = query.to_string();
    let page = tokio::spawn(async move { client.search(&query).await }).await??;
    Ok(page)
}

async fn browse(client: Arc<SearchClient>, query: String, cli: &Cli) -> Result<()> {
    match spawn_search(&client, &query).await {
        Ok(page) => output_page(&page, cli.output)?,
        Err(e) => ui::print_status(Status::Error, &e.to_string()),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if !cli.quiet {
            eprintln!("[n]ext [p]rev <number> open, s <query> search, [q]uit");
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line {
            "" => continue,
            "q" | "quit" => break,
            "n" | "next" => output_page(&client.next_page(), cli.output)?,
            "p" | "prev" => output_page(&client.prev_page(), cli.output)?,
            _ => {
                if let Some(query) = line.strip_prefix("s ") {
                    if !cli.quiet {
                        ui::print_status(Status::Search, &format!("Searching for {:?}", query));
                    }
                    match spawn_search(&client, query).await {
                        Ok(page) => output_page(&page, cli.output)?,
                        Err(e) => ui::print_status(Status::Error, &e.to_string()),
                    }
                } else if let Ok(number) = line.parse::<usize>() {
                    match client.open_index(number.saturating_sub(1)).await {
                        Ok(doc) => output_document(&doc, cli.output)?,
                        Err(e) => ui::print_status(Status::Error, &e.to_string()),
                    }
                } else {
                    ui::print_status(Status::Warning, &format!("Unknown command: {}", line));
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    init_tracing(&cli, &config);
    tracing::debug!("Backend endpoint: {}", config.backend.address());

    let client = Arc::new(SearchClient::from_config(&config));

    match &cli.command {
        Commands::Search { query, page } => {
            let mut current = spawn_search(&client, query).await?;
            for _ in 1..*page {
                if !current.has_next {
                    break;
                }
                current = client.next_page();
            }
            if !cli.quiet && !cli.output.is_json() {
                ui::print_status(
                    Status::Success,
                    &format!("{} results for {:?}", client.results().len(), query),
                );
            }
            output_page(&current, cli.output)?;
        }

        Commands::Open { path } => {
            let doc = client.open(&ResultEntry::new(path.as_str())).await?;
            output_document(&doc, cli.output)?;
        }

        Commands::Browse { query } => {
            browse(Arc::clone(&client), query.clone(), &cli).await?;
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
