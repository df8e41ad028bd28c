use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use agent_core::{TaskRequest, TaskResponse, TaskStatus};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use webpilot::app::{build_orchestrator, launch_session};
use webpilot::config::Config;
use webpilot::runtime::{init_logging, load_config};
use webpilot::server::{serve, ServeState};

/// WebPilot - LLM-driven browser agent
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (overrides `logging.level`)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the agent over HTTP
    Serve(ServeArgs),

    /// Run a single goal and print the result
    Run(RunArgs),

    /// Inspect configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address (defaults to `server.host`)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port (defaults to `server.port`)
    #[arg(short, long)]
    port: Option<u16>,

    /// Start without launching a browser
    #[arg(long)]
    no_browser: bool,
}

#[derive(Args)]
struct RunArgs {
    /// Natural-language goal
    #[arg(short, long)]
    goal: String,

    #[arg(long, default_value_t = 10)]
    max_iterations: u32,

    /// Timeout in seconds
    #[arg(long, default_value_t = 300)]
    timeout: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    output: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (API keys redacted)
    Show,

    /// Validate configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = load_config(cli.config.as_deref()).await?;
    let config = loaded.config;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_logging(&level, cli.debug, config.logging.json)?;

    info!("Starting WebPilot v{}", env!("CARGO_PKG_VERSION"));
    if loaded.found {
        info!(path = %loaded.path.display(), "Loaded configuration");
    } else {
        info!(path = %loaded.path.display(), "No configuration file found, using defaults");
    }

    let result = match cli.command {
        Commands::Serve(args) => cmd_serve(args, &config).await,
        Commands::Run(args) => cmd_run(args, &config).await,
        Commands::Config(args) => cmd_config(args, &config),
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Command failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn cmd_serve(args: ServeArgs, config: &Config) -> Result<()> {
    let orchestrator = Arc::new(build_orchestrator(config)?);

    if args.no_browser {
        warn!("Serving without a browser session; tasks will fail until one is attached");
    } else {
        match launch_session(&config.browser).await {
            Ok(session) => orchestrator.attach_session(session).await,
            Err(err) => warn!(error = %format!("{err:#}"), "Continuing without a browser session"),
        }
    }

    let host = match args.host {
        Some(host) => host,
        None => config
            .server
            .host
            .parse()
            .with_context(|| format!("Invalid server.host {}", config.server.host))?,
    };
    let addr = SocketAddr::new(host, args.port.unwrap_or(config.server.port));

    serve(ServeState::new(orchestrator), addr).await
}

async fn cmd_run(args: RunArgs, config: &Config) -> Result<()> {
    let orchestrator = build_orchestrator(config)?;
    let session = launch_session(&config.browser).await?;
    orchestrator.attach_session(session).await;

    let token = CancellationToken::new();
    let ctrl_c = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, stopping after the current step");
                token.cancel();
            }
        })
    };

    let request = TaskRequest::new(args.goal)
        .with_max_iterations(args.max_iterations)
        .with_timeout(args.timeout);
    let response = orchestrator.execute_with_cancel(request, token).await;

    ctrl_c.abort();
    orchestrator.shutdown().await;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Human => print_human(&response),
    }

    if response.status != TaskStatus::Completed {
        std::process::exit(1);
    }
    Ok(())
}

fn print_human(response: &TaskResponse) {
    println!("Task {} ({:?})", response.task_id, response.status);
    println!("Goal: {}", response.goal);
    for step in &response.steps {
        let marker = if step.success { "ok" } else { "failed" };
        println!(
            "  {}. {} [{}] {}",
            step.step_number, step.tool_call.tool_name, marker, step.planning
        );
        if let Some(err) = &step.tool_call.error {
            println!("     error: {err}");
        }
    }
    if let Some(result) = &response.final_result {
        println!("Result: {result}");
    }
    if let Some(err) = &response.error {
        println!("Error: {err}");
    }
    println!("Execution time: {:.2}s", response.execution_time);
}

fn cmd_config(args: ConfigArgs, config: &Config) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let mut shown = config.clone();
            if shown.llm.api_key.is_some() {
                shown.llm.api_key = Some("***".to_string());
            }
            println!("Current Configuration:");
            println!("{}", serde_yaml::to_string(&shown)?);
        }

        ConfigAction::Validate => {
            config.validate()?;
            println!("Configuration is valid");
        }
    }

    Ok(())
}
