mod output;

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use fakernet_api::{ConsoleApi, FakerNetClient};
use fakernet_engine::{CatalogueStore, FormBuilder, result_view};
use fakernet_types::InvocationResult;
use fakernet_util::{ConsoleConfig, config_home};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "console.log";

/// Console for a FakerNet server.
#[derive(Parser, Debug)]
#[command(name = "fnconsole", version, about)]
struct Cli {
    /// Server base URL (overrides FAKERNET_URL and the config file)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(long, global = true)]
    insecure: bool,

    /// Path to the console config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive console (default)
    Tui,
    /// List modules, functions and their parameters
    Modules,
    /// Invoke one module function
    Run {
        module: String,
        function: String,
        /// Parameter as name=value; repeatable
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Print one metrics snapshot and the server roster
    Status,
    /// Print the server version
    Version,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim().to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{raw}'")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui);
    init_tracing(matches!(command, Command::Tui))?;

    let mut config = ConsoleConfig::load(cli.config.as_deref()).context("failed to load console config")?;
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    if cli.insecure {
        config.accept_invalid_certs = true;
    }
    let client = FakerNetClient::from_config(&config).context("failed to build the HTTP client")?;
    let api: Arc<dyn ConsoleApi> = Arc::new(client);

    match command {
        Command::Tui => run_tui(api, config).await,
        Command::Modules => {
            let catalogue = load_catalogue(api.as_ref(), &config).await?;
            print!("{}", output::render_catalogue(catalogue.catalogue()));
            Ok(())
        }
        Command::Run { module, function, params } => run_function(api.as_ref(), &config, &module, &function, params).await,
        Command::Status => print_status(api.as_ref()).await,
        Command::Version => {
            let version = api.fetch_version().await.context("failed to fetch the server version")?;
            println!("{version}");
            Ok(())
        }
    }
}

/// Log to a file while the TUI owns the terminal, to stderr otherwise.
fn init_tracing(tui: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if !tui {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
        return Ok(());
    }
    let dir = config_home();
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

async fn load_catalogue(api: &dyn ConsoleApi, config: &ConsoleConfig) -> Result<CatalogueStore> {
    CatalogueStore::load(api)
        .await
        .with_context(|| format!("failed to load the module catalogue from {}", config.base_url))
}

async fn run_tui(api: Arc<dyn ConsoleApi>, config: ConsoleConfig) -> Result<()> {
    let catalogue = load_catalogue(api.as_ref(), &config).await?;
    let version = match api.fetch_version().await {
        Ok(version) => Some(version),
        Err(error) => {
            warn!(error = %error, "server version unavailable");
            None
        }
    };
    fakernet_tui::run(api, config, catalogue, version).await
}

/// Build the invocation exactly as the form would, then call the server once.
async fn run_function(
    api: &dyn ConsoleApi,
    config: &ConsoleConfig,
    module: &str,
    function: &str,
    params: Vec<(String, String)>,
) -> Result<()> {
    let catalogue = load_catalogue(api, config).await?;
    let mut form = FormBuilder::new(Arc::clone(catalogue.catalogue()));
    form.select_module(Some(module))?;
    form.select_function(Some(function))?;
    for (name, value) in params {
        form.set_value(&name, value)?;
    }
    let invocation = form
        .collect()
        .context("module and function must both be selected")?;

    let start = Instant::now();
    let result = api
        .invoke(&invocation)
        .await
        .with_context(|| format!("{module}/{function} did not return a readable response"))?;
    info!(module, function, duration_ms = start.elapsed().as_millis(), "invocation finished");

    match result {
        InvocationResult::Success(payload) => {
            let view = result_view(&payload);
            match view.table {
                Some(table) => print!("{}", output::render_table(&table.columns, &table.rows)),
                None => println!("{}", view.pretty),
            }
            Ok(())
        }
        InvocationResult::Failure(message) => {
            bail!("{module}/{function} failed: {}", fakernet_util::escape_control_chars(&message))
        }
    }
}

async fn print_status(api: &dyn ConsoleApi) -> Result<()> {
    let (metrics, roster) = tokio::join!(api.fetch_system_data(), api.fetch_roster());
    let metrics = metrics.context("failed to fetch system data")?;
    let roster = roster.context("failed to fetch the server roster")?;
    print!("{}", output::render_metrics(&metrics));
    println!();
    print!("{}", output::render_roster(&roster));
    Ok(())
}
