use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use newsdesk::app::{App, AppEvent};
use newsdesk::config::Config;
use newsdesk::listing::ListingController;
use newsdesk::news::{Category, NewsClient};
use newsdesk::proxy::{self, ProxyState, NEWS_ROUTE};
use newsdesk::storage::{BookmarkStore, FileStore, KeyValueStore, ThemeStore};
use newsdesk::theme::terminal_prefers_dark;
use newsdesk::ui;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Get the config directory path (~/.config/newsdesk/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("newsdesk");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(
    name = "newsdesk",
    version,
    about = "Terminal news reader with a key-holding NewsAPI relay"
)]
struct Cli {
    /// Config file (defaults to ~/.config/newsdesk/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Browse headlines in the terminal (default)
    Browse(BrowseArgs),
    /// Run the relay that forwards requests to NewsAPI with the API key
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:8787
        #[arg(long)]
        addr: Option<String>,
        /// NewsAPI base URL
        #[arg(long, value_name = "URL")]
        upstream_url: Option<String>,
    },
    /// Print saved bookmarks and exit
    Bookmarks {
        /// Print as JSON instead of a plain list
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
struct BrowseArgs {
    /// Relay endpoint to fetch articles from
    #[arg(long, value_name = "URL")]
    proxy_url: Option<String>,
    /// Category to open with (all, business, entertainment, health, science, sports, technology)
    #[arg(long)]
    category: Option<Category>,
    /// Start with this search query
    #[arg(long)]
    query: Option<String>,
}

/// Send logs to `log_file` when the terminal belongs to the TUI, stderr otherwise.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newsdesk=info"));
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn open_store(config_dir: &Path) -> Result<Arc<dyn KeyValueStore>> {
    let dir = config_dir.join("storage");
    let store = FileStore::open(&dir)
        .with_context(|| format!("Failed to open storage at '{}'", dir.display()))?;
    Ok(Arc::new(store))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    let created = !config_dir.exists();
    if created {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    let is_tui = matches!(cli.command, None | Some(Command::Browse(_)));
    let log_path = config_dir.join("newsdesk.log");
    init_tracing(is_tui.then_some(log_path.as_path()))?;

    if created {
        tracing::info!(path = %config_dir.display(), "Created config directory");
    }

    // Set directory permissions on Unix (user-only access)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?;
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        None => browse(&config, BrowseArgs::default(), &config_dir).await,
        Some(Command::Browse(args)) => browse(&config, args, &config_dir).await,
        Some(Command::Serve { addr, upstream_url }) => serve(&config, addr, upstream_url).await,
        Some(Command::Bookmarks { json }) => print_bookmarks(&config_dir, json),
    }
}

async fn browse(config: &Config, args: BrowseArgs, config_dir: &Path) -> Result<()> {
    let proxy_url = args.proxy_url.unwrap_or_else(|| config.proxy_url.clone());
    let client = NewsClient::new(&proxy_url)
        .with_context(|| format!("Invalid relay URL '{}'", proxy_url))?
        .with_timeout(config.request_timeout());

    let category = match args.category {
        Some(category) => category,
        None => config.category()?,
    };

    let store = open_store(config_dir)?;
    let bookmarks =
        BookmarkStore::init(Arc::clone(&store)).context("Failed to load bookmarks")?;
    let themes = ThemeStore::init(store, terminal_prefers_dark())
        .context("Failed to load theme preference")?;

    let mut listing = ListingController::new(category);
    if let Some(query) = args.query.filter(|q| !q.trim().is_empty()) {
        // The event loop issues the first fetch for whatever state is set here
        listing.set_search_query(query);
    }

    let mut app = App::new(client, listing, bookmarks, themes);

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // Run the TUI
    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}

async fn serve(config: &Config, addr: Option<String>, upstream_url: Option<String>) -> Result<()> {
    let addr = addr.unwrap_or_else(|| config.listen_addr.clone());
    let upstream_url = upstream_url.unwrap_or_else(|| config.upstream_url.clone());

    let state = ProxyState::new(&upstream_url, config.api_key()).context("Failed to configure relay")?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let local = listener.local_addr().context("Failed to read bound address")?;
    println!("Relay listening on http://{}{}", local, NEWS_ROUTE);

    proxy::serve(listener, Arc::new(state), shutdown_signal())
        .await
        .context("Relay server failed")?;

    println!("Goodbye!");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("Shutdown signal received");
}

fn print_bookmarks(config_dir: &Path, json: bool) -> Result<()> {
    let store = open_store(config_dir)?;
    let bookmarks = BookmarkStore::init(store).context("Failed to load bookmarks")?;

    if json {
        let out = serde_json::to_string_pretty(bookmarks.list())
            .context("Failed to serialize bookmarks")?;
        println!("{}", out);
        return Ok(());
    }

    if bookmarks.is_empty() {
        println!("No bookmarks saved.");
        return Ok(());
    }

    for article in bookmarks.list() {
        println!("{}", article.title);
        let mut meta: Vec<&str> = Vec::new();
        if !article.source_name.is_empty() {
            meta.push(&article.source_name);
        }
        if !article.published_at.is_empty() {
            meta.push(&article.published_at);
        }
        if !meta.is_empty() {
            println!("  {}", meta.join(" | "));
        }
        if !article.url.is_empty() {
            println!("  {}", article.url);
        }
    }
    Ok(())
}
