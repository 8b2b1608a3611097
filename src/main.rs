//! feedback-dash - terminal dashboard for employee feedback analysis
//!
//! A CLI client for the feedback backend: manages the aspect catalog,
//! loads an employee's reviews and summaries concurrently, and triggers
//! new analyses.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Failure (bad arguments, config error, or any error reported by the backend)

mod backend;
mod catalog;
mod cli;
mod config;
mod dashboard;
mod directory;
mod error;
mod models;
mod notify;
mod report;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use backend::BackendClient;
use catalog::AspectCatalogClient;
use cli::{Args, AspectAction, Command, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use dashboard::{EmployeeDataOrchestrator, EmployeeSnapshot, LoadOutcome};
use directory::EmployeeDirectory;
use error::DashboardError;
use indicatif::{ProgressBar, ProgressStyle};
use models::EmployeeId;
use notify::{ConsoleSink, NotificationSink};
use report::DashboardView;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(log_level(&args, &config));

    info!("feedback-dash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(&args, &config).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .feedback-dash.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to point at your feedback backend.");
    Ok(())
}

/// Verbose from the config file applies unless --quiet was given.
fn log_level(args: &Args, config: &Config) -> tracing::Level {
    if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    }
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults.
///
/// An explicit `--config` path must exist; a broken default file is an error too.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    Ok(Config::load_default()?.unwrap_or_default())
}

/// Run the selected command. Returns whether it succeeded.
async fn run(args: &Args, config: &Config) -> Result<bool> {
    let settings = config.backend_settings();
    let backend = BackendClient::new(&settings)?;
    let sink: Arc<dyn NotificationSink> = Arc::new(ConsoleSink::new(args.quiet));
    let format = config.general.format;

    info!("Backend: {}", backend.base_url());
    match settings.timeout_seconds {
        Some(secs) => debug!("Request timeout: {}s", secs),
        None => debug!("Request timeout: none"),
    }

    let Some(command) = args.command.clone() else {
        return Ok(false);
    };

    match command {
        Command::Aspects { action } => {
            let mut catalog = AspectCatalogClient::new(backend, sink);
            run_aspects(&mut catalog, action, format).await
        }
        Command::Employee { id } => {
            let mut catalog = AspectCatalogClient::new(backend.clone(), sink.clone());
            let orchestrator = EmployeeDataOrchestrator::new(backend, sink);
            let spinner = start_spinner(orchestrator.subscribe(), args.quiet);

            let (aspects, load) = tokio::join!(catalog.list(), orchestrator.load_employee(id));
            finish_spinner(spinner).await;

            let catalog_ok = aspects.is_ok();
            print_dashboard(&orchestrator, catalog.aspects(), format)?;
            Ok(dashboard_succeeded(catalog_ok, load.outcome()))
        }
        Command::Analyze { id } => {
            let mut catalog = AspectCatalogClient::new(backend.clone(), sink.clone());
            let orchestrator = EmployeeDataOrchestrator::new(backend, sink);
            let spinner = start_spinner(orchestrator.subscribe(), args.quiet);

            let analysis = orchestrator.generate_analysis(id).await;
            finish_spinner(spinner).await;

            // A catalog failure is reported by the sink; the dashboard still renders.
            let catalog_ok = catalog.list().await.is_ok();
            print_dashboard(&orchestrator, catalog.aspects(), format)?;
            if analysis.succeeded() {
                info!("Analysis of employee {} complete", id);
            }
            let load_ok = dashboard_succeeded(catalog_ok, analysis.load.outcome());
            Ok(analysis.trigger.is_ok() && load_ok)
        }
        Command::Employees => {
            let directory = EmployeeDirectory::new(backend, sink);
            let Ok(roster) = directory.list_employees().await else {
                return Ok(false);
            };
            let output = match format {
                OutputFormat::Json => report::generate_json(&roster)?,
                OutputFormat::Markdown => report::generate_markdown_roster(&roster),
            };
            println!("{}", output);
            Ok(true)
        }
        Command::Psychotype { id } => {
            let directory = EmployeeDirectory::new(backend, sink);
            let Ok(profile) = directory.psychotype(id).await else {
                return Ok(false);
            };
            let output = match format {
                OutputFormat::Json => report::generate_json(&profile)?,
                OutputFormat::Markdown => report::generate_markdown_psychotype(id, &profile),
            };
            println!("{}", output);
            Ok(true)
        }
    }
}

async fn run_aspects(
    catalog: &mut AspectCatalogClient,
    action: AspectAction,
    format: OutputFormat,
) -> Result<bool> {
    let result = match action {
        AspectAction::List => catalog.list().await.map(|_| ()),
        AspectAction::Add { text } => {
            catalog.set_draft(text);
            debug!("Submitting aspect '{}'", catalog.draft());
            catalog.submit_draft().await
        }
        AspectAction::Remove { id } => catalog.delete(id).await,
    };

    if let Err(e) = result {
        if let DashboardError::ValidationSkip { reason } = &e {
            eprintln!("⚠️  {}", reason);
        }
        debug!("Aspect command failed ({:?}): {}", e.resource(), e);
        return Ok(false);
    }

    let output = match format {
        OutputFormat::Json => report::generate_json(catalog.aspects())?,
        OutputFormat::Markdown => report::generate_aspects_section(catalog.aspects()),
    };
    println!("{}", output);
    Ok(true)
}

/// Empty resources are warnings, not failures; the catalog must have loaded.
fn dashboard_succeeded(catalog_ok: bool, outcome: LoadOutcome) -> bool {
    catalog_ok && matches!(outcome, LoadOutcome::Loaded | LoadOutcome::PartiallyEmpty)
}

fn print_dashboard(
    orchestrator: &EmployeeDataOrchestrator,
    aspects: &[models::Aspect],
    format: OutputFormat,
) -> Result<()> {
    let snapshot = orchestrator.snapshot();
    let view = DashboardView::new(&snapshot, orchestrator.tabs(), aspects);
    let output = match format {
        OutputFormat::Json => report::generate_json_dashboard(&view)?,
        OutputFormat::Markdown => report::generate_markdown_dashboard(&view),
    };
    println!("{}", output);
    Ok(())
}

/// Show a spinner for as long as the snapshot reports a load in flight.
fn start_spinner(
    mut changes: watch::Receiver<EmployeeSnapshot>,
    quiet: bool,
) -> Option<tokio::task::JoinHandle<()>> {
    if quiet {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Connecting...");

    Some(tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            let (loading, employee) = {
                let snapshot = changes.borrow_and_update();
                (snapshot.loading, snapshot.employee_id)
            };

            if !loading {
                break;
            }
            pb.set_message(loading_message(employee));
        }
        pb.finish_and_clear();
    }))
}

/// Wait for the spinner to observe the released loading flag.
async fn finish_spinner(spinner: Option<tokio::task::JoinHandle<()>>) {
    if let Some(handle) = spinner {
        let _ = handle.await;
    }
}

fn loading_message(employee: Option<EmployeeId>) -> String {
    match employee {
        Some(id) => format!("Loading employee {}...", id),
        None => "Loading...".to_string(),
    }
}
