use anyhow::{Context, Result};
use cfprov::config::Config;
use cfprov::framework::resource::{
    CreateRequest, DeleteRequest, ImportStateRequest, ImportStateResponse, ReadRequest,
    UpdateRequest,
};
use cfprov::framework::{Diagnostics, Path, State};
use cfprov::Provider;
use clap::{Parser, Subcommand, ValueEnum};
use std::future::Future;
use std::path::{Path as FsPath, PathBuf};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Cloudflare resource handlers
#[derive(Parser, Debug)]
#[command(name = "cfprov", version, about, long_about = None)]
struct Args {
    /// Account used when a plan does not set account_id
    #[arg(long, global = true)]
    account_id: Option<String>,

    /// API endpoint override
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Give up on the operation after this many seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List supported resource types
    Resources,
    /// Create a resource from a plan file (YAML or JSON)
    Create {
        resource: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Refresh a resource from a state file
    Read {
        resource: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Update a resource from a plan file and its prior state
    Update {
        resource: String,
        #[arg(long)]
        plan: PathBuf,
        #[arg(long)]
        state: PathBuf,
    },
    /// Delete the resource described by a state file
    Delete {
        resource: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Build state for an existing resource from "<account_id>/<resource_id>"
    Import { resource: String, id: String },
    /// Show or change persistent settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the current configuration
    Show,
    /// Remember a default account
    SetAccount { account_id: String },
    /// Remember an API endpoint override
    SetBaseUrl { base_url: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("cfprov started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("cfprov").join("cfprov.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".cfprov").join("cfprov.log");
    }
    PathBuf::from("cfprov.log")
}

/// Load a plan or state object; `.json` files are JSON, anything else YAML
fn load_object(path: &FsPath) -> Result<State> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

    let value: serde_json::Value = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON in {:?}", path))?,
        _ => serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML in {:?}", path))?,
    };

    Ok(State::from_json(value))
}

/// Fill in `account_id` from CLI/config/environment when the object lacks one
fn default_account_id(object: &mut State, account_id: Option<&str>, diagnostics: &mut Diagnostics) {
    let path = Path::root("account_id");
    let current = object.get_attribute::<Option<String>>(&path);
    let Some(current) = diagnostics.capture(current) else {
        return;
    };

    if let (None, Some(account_id)) = (current, account_id) {
        let written = object.set_attribute(&path, account_id);
        diagnostics.capture(written);
    }
}

async fn with_timeout<F: Future>(timeout: Option<u64>, fut: F) -> Result<F::Output> {
    match timeout {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), fut)
            .await
            .with_context(|| format!("Operation timed out after {}s", secs)),
        None => Ok(fut.await),
    }
}

fn report(state: Option<State>, diagnostics: &Diagnostics) -> Result<()> {
    for diag in diagnostics.iter() {
        eprintln!("{}\n", diag);
    }

    if let Some(state) = state {
        println!("{}", serde_json::to_string_pretty(&state.into_json())?);
    }

    if diagnostics.has_error() {
        anyhow::bail!(
            "operation failed with {} error(s)",
            diagnostics.errors().count()
        );
    }
    Ok(())
}

fn run_config(action: &ConfigAction, mut config: Config) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::SetAccount { account_id } => config.set_account_id(account_id)?,
        ConfigAction::SetBaseUrl { base_url } => config.set_base_url(base_url)?,
    }
    Ok(())
}

impl Command {
    fn resource(&self) -> Option<&str> {
        match self {
            Command::Create { resource, .. }
            | Command::Read { resource, .. }
            | Command::Update { resource, .. }
            | Command::Delete { resource, .. }
            | Command::Import { resource, .. } => Some(resource),
            Command::Resources | Command::Config { .. } => None,
        }
    }
}

async fn run_lifecycle(args: &Args, config: &Config, resource_name: &str) -> Result<()> {
    let account_id = config.effective_account_id(args.account_id.as_deref());
    let base_url = config.effective_base_url(args.base_url.as_deref());

    // Import only parses the ID; it never talks to the API.
    let mut provider = Provider::new();
    if !matches!(args.command, Command::Import { .. }) {
        let credentials = config.credentials()?;
        let diagnostics = provider.configure(credentials, &base_url);
        if diagnostics.has_error() {
            return report(None, &diagnostics);
        }
    }

    let resource = match provider.resource(resource_name) {
        Ok(resource) => resource,
        Err(diagnostics) => return report(None, &diagnostics),
    };

    tracing::info!("Running {:?}", args.command);

    match &args.command {
        Command::Create { file, .. } => {
            let mut plan = load_object(file)?;
            let mut diagnostics = Diagnostics::new();
            default_account_id(&mut plan, account_id.as_deref(), &mut diagnostics);
            if diagnostics.has_error() {
                return report(None, &diagnostics);
            }
            let resp = with_timeout(args.timeout, resource.create(CreateRequest { plan })).await?;
            diagnostics.append(resp.diagnostics);
            report(Some(resp.state), &diagnostics)
        }
        Command::Read { file, .. } => {
            let state = load_object(file)?;
            let resp = with_timeout(args.timeout, resource.read(ReadRequest { state })).await?;
            report(Some(resp.state), &resp.diagnostics)
        }
        Command::Update { plan, state, .. } => {
            let mut plan = load_object(plan)?;
            let state = load_object(state)?;
            let mut diagnostics = Diagnostics::new();
            default_account_id(&mut plan, account_id.as_deref(), &mut diagnostics);
            if diagnostics.has_error() {
                return report(None, &diagnostics);
            }
            let resp =
                with_timeout(args.timeout, resource.update(UpdateRequest { plan, state })).await?;
            diagnostics.append(resp.diagnostics);
            report(Some(resp.state), &diagnostics)
        }
        Command::Delete { file, .. } => {
            let state = load_object(file)?;
            let resp = with_timeout(args.timeout, resource.delete(DeleteRequest { state })).await?;
            report(None, &resp.diagnostics)
        }
        Command::Import { id, .. } => {
            let Some(importable) = resource.as_importable() else {
                anyhow::bail!("{} does not support import", resource_name);
            };
            let mut resp = ImportStateResponse::default();
            importable.import_state(&ImportStateRequest { id: id.clone() }, &mut resp);
            let state = (!resp.diagnostics.has_error()).then_some(resp.state);
            report(state, &resp.diagnostics)
        }
        Command::Resources | Command::Config { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let config = Config::load();

    match &args.command {
        Command::Resources => {
            for name in Provider::resource_type_names() {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Config { action } => run_config(action, config),
        command => match command.resource() {
            Some(resource_name) => run_lifecycle(&args, &config, resource_name).await,
            None => Ok(()),
        },
    }
}
