//! servequery-ui CLI
//!
//! Opens application routes against a live servequery backend and prints the
//! rendered page, or draws a saved dashboard snapshot offline.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use servequery_ui::api::models::{Dashboard, SeriesResponse};
use servequery_ui::config::{generate_default_config, Config, LoggingConfig};
use servequery_ui::{app_router, draw_dashboard, json, ApiClient, Document, Node};

#[derive(Parser)]
#[command(name = "servequery-ui")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Headless dashboard client for servequery")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend URL, overrides the config file
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Navigate to a route and print the rendered page once every panel settled
    Open {
        /// Route href, e.g. /projects/<id>
        href: String,
    },

    /// Draw a dashboard snapshot without contacting the backend
    Draw {
        /// Dashboard definition (extended JSON)
        file: PathBuf,
        /// Panel points keyed by panel id (extended JSON)
        #[arg(long)]
        graphs: Option<PathBuf>,
        /// Element to draw into
        #[arg(long, default_value = "dashboard")]
        mount_id: String,
    },

    /// List the application's route ids
    Routes,

    /// Print a default configuration file
    Config {
        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config.logging);

    match cli.command {
        Commands::Open { href } => open(&config, &href, cli.format).await,
        Commands::Draw {
            file,
            graphs,
            mount_id,
        } => draw(&file, graphs.as_deref(), &mount_id, cli.format),
        Commands::Routes => {
            let router = app_router(ApiClient::from_config(&config.api)?)?;
            for id in router.route_ids() {
                println!("{}", id);
            }
            Ok(())
        }
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Wrote default config to {}", path.display());
                }
                None => print!("{}", content),
            }
            Ok(())
        }
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("servequery_ui={}", logging.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

async fn open(config: &Config, href: &str, format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::from_config(&config.api)?;
    let router = app_router(client)?;

    let Some(navigation) = router.navigate(href).await?.committed() else {
        bail!("navigation to {} was superseded", href);
    };
    let page = router.mount(&navigation)?;

    let budget = Duration::from_secs(config.api.request_timeout_secs);
    if tokio::time::timeout(budget, page.settled()).await.is_err() {
        tracing::warn!(?budget, "Panels still loading, printing partial page");
    }

    print_node(&page.render(), format)
}

fn draw(
    file: &Path,
    graphs: Option<&Path>,
    mount_id: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let dashboard: Dashboard = json::from_str(&read(file)?)
        .with_context(|| format!("decoding dashboard {}", file.display()))?;
    let graphs: BTreeMap<String, SeriesResponse> = match graphs {
        Some(path) => json::from_str(&read(path)?)
            .with_context(|| format!("decoding graphs {}", path.display()))?,
        None => BTreeMap::new(),
    };

    let mut document = Document::new().with_element(mount_id);
    draw_dashboard(&dashboard, &graphs, &mut document, mount_id)?;

    match document.element(mount_id) {
        Some(node) => print_node(node, format),
        None => Ok(()),
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn print_node(node: &Node, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", node),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(node)?),
    }
    Ok(())
}
