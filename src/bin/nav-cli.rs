use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use tokio_util::sync::CancellationToken;

use portfolio_nav::config::{load_config, NavConfig};
use portfolio_nav::fetch::HttpFetcher;
use portfolio_nav::observability::logging;
use portfolio_nav::shell::MemoryShell;
use portfolio_nav::{Navigator, PageInitRegistry};

#[derive(Parser)]
#[command(name = "nav-cli")]
#[command(about = "Inspect a deployed portfolio site the way the navigator sees it", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the site base URL.
    #[arg(short, long)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the title map
    Titles,
    /// Fetch the fragment for a path
    Fetch { path: String },
    /// Show how a path maps to a route, document and title
    Resolve { path: String },
    /// Run a full headless navigation to a path
    Visit { path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => NavConfig::default(),
    };
    if let Some(url) = cli.url {
        config.site.base_url = url;
    }
    config.observability.log_filter = "portfolio_nav=warn".to_string();
    logging::init(&config.observability);

    let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(10))?);
    let shell = Arc::new(MemoryShell::new());
    let navigator = Navigator::new(&config, fetcher.clone(), shell.clone(), PageInitRegistry::new())?;

    match cli.command {
        Commands::Titles => {
            navigator.titles().load(fetcher.as_ref()).await?;
            let titles: Map<String, Value> = navigator
                .titles()
                .entries()
                .into_iter()
                .map(|(path, title)| (path.to_string(), Value::from(title)))
                .collect();
            print_json(&Value::Object(titles))?;
        }
        Commands::Fetch { path } => {
            let html = navigator.fetch_page(&path, &CancellationToken::new()).await?;
            println!("{html}");
        }
        Commands::Resolve { path } => {
            navigator.titles().load(fetcher.as_ref()).await?;
            let paths = navigator.paths();
            let route = paths.normalize(&path);
            print_json(&json!({
                "route": route.as_str(),
                "public_path": paths.public_path(&route),
                "document": paths.content_url(&route)?.as_str(),
                "title": navigator.titles().get(route.as_str()),
            }))?;
        }
        Commands::Visit { path } => {
            let outcome = navigator.start(&path).await?;
            print_json(&json!({
                "outcome": outcome.as_str(),
                "route": navigator.current_route().map(|r| r.to_string()),
                "title": shell.title(),
                "content_bytes": shell.content().len(),
            }))?;
        }
    }

    Ok(())
}

fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
