use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use exportflow_sdk::activity::registry::ActivityRegistry;
use exportflow_sdk::config::{EngineConfig, StoreConfig};
use exportflow_sdk::engine::LocalEngine;
use exportflow_sdk::export::{self, ExportRunStore};
use exportflow_sdk::worker::registry::WorkflowRegistry;
use tracing::warn;

/// Management command for export workflows.
#[derive(Parser)]
#[command(name = "exportflow", about = "Start and inspect export workflows")]
struct Cli {
    /// JSON file holding export runs (overrides EXPORTFLOW_STORE_PATH)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Queue to submit workflows to (overrides EXPORTFLOW_QUEUE)
    #[arg(long, global = true)]
    queue: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a workflow; remaining arguments are parsed by the workflow
    Start {
        /// Registered workflow name (e.g., "backfill-export")
        workflow: String,

        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// List registered workflows
    List,

    /// Print a workflow's input schema
    Describe {
        workflow: String,
    },

    /// List stored export runs
    Runs {
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut engine_config = EngineConfig::from_env()?;
    if let Some(queue) = cli.queue {
        engine_config = EngineConfig::new(queue, engine_config.default_activity_timeout)?;
    }
    let store_config = match cli.store {
        Some(path) => StoreConfig::File(path),
        None => StoreConfig::from_env(),
    };

    let store = store_config.open()?;
    let workflows = Arc::new(WorkflowRegistry::new());
    let activities = Arc::new(ActivityRegistry::new());
    export::register_all(&workflows, &activities, Arc::clone(&store))?;

    match cli.command {
        Commands::Start { workflow, args } => {
            cmd_start(workflows, activities, engine_config, &workflow, &args).await?
        }
        Commands::List => cmd_list(&workflows),
        Commands::Describe { workflow } => cmd_describe(&workflows, &workflow)?,
        Commands::Runs { status } => cmd_runs(store.as_ref(), status.as_deref())?,
    }

    Ok(())
}

async fn cmd_start(
    workflows: Arc<WorkflowRegistry>,
    activities: Arc<ActivityRegistry>,
    config: EngineConfig,
    workflow: &str,
    args: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = LocalEngine::new(Arc::clone(&workflows), activities).with_config(config);
    let options = engine.start_options().with_label("source", "cli");

    let cancellation = engine.cancellation_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling workflow");
            cancellation.request_cancellation();
        }
    });

    match exportflow_sdk::cli::dispatch(&workflows, &engine, workflow, args, options).await {
        Ok(result) => {
            println!("Started workflow: {}", result.workflow_execution_id);
            if let Some(output) = result.output {
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(exportflow_sdk::cli::exit_code(&e));
        }
    }
}

fn cmd_list(workflows: &WorkflowRegistry) {
    let definitions = workflows.definitions();
    if definitions.is_empty() {
        println!("No workflows registered.");
        return;
    }

    println!("{:<24} {:<10} Description", "Name", "Version");
    println!("{}", "-".repeat(70));
    for definition in &definitions {
        println!(
            "{:<24} {:<10} {}",
            definition.name,
            definition.version.to_string(),
            definition.description.as_deref().unwrap_or("")
        );
    }
}

fn cmd_describe(workflows: &WorkflowRegistry, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let workflow = match workflows.resolve(name) {
        Ok(workflow) => workflow,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(exportflow_sdk::cli::EXIT_FAILURE);
        }
    };

    let definition = &workflow.definition;
    println!("Name:    {}", definition.name);
    println!("Version: {}", definition.version);
    if let Some(description) = &definition.description {
        println!("About:   {}", description);
    }
    if !definition.tags.is_empty() {
        println!("Tags:    {}", definition.tags.join(", "));
    }
    if let Some(schema) = &definition.input_schema {
        println!();
        println!("{}", serde_json::to_string_pretty(schema)?);
    }

    Ok(())
}

fn cmd_runs(
    store: &dyn ExportRunStore,
    status_filter: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let runs: Vec<_> = store
        .list()?
        .into_iter()
        .filter(|run| status_filter.map_or(true, |status| run.status == status))
        .collect();

    if runs.is_empty() {
        println!("No export runs found.");
        return Ok(());
    }

    println!(
        "{:<38} {:<8} {:<12} {:<35} Updated",
        "ID", "Team", "Status", "Interval"
    );
    println!("{}", "-".repeat(115));

    for run in &runs {
        let interval = format!(
            "{} .. {}",
            run.data_interval_start.format("%Y-%m-%d %H:%M"),
            run.data_interval_end.format("%Y-%m-%d %H:%M")
        );
        println!(
            "{:<38} {:<8} {:<12} {:<35} {}",
            run.id,
            run.team_id,
            run.status,
            interval,
            run.updated_at.format("%Y-%m-%d %H:%M:%S"),
        );
    }

    println!();
    println!("{} run(s) total", runs.len());

    Ok(())
}
