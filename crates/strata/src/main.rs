use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use strata_core::kernel::constants;
use strata_core::kernel::{Application, ExecutionMode, KernelSettings};
use strata_core::storage::{ConfigData, LoadStrategy};

// --- Core plugins, registered statically ---
use core_logging::LoggingBootstrap;
use core_vfs::VfsProvider;

/// Strata: lifecycle orchestrator and config cache host
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Print "pong" and exit
    #[arg(long)]
    ping: bool,

    /// Settings file (json, yaml or toml); defaults to ./strata.toml when present
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Run as design-time tooling instead of the live application
    #[arg(long)]
    design_time: bool,

    /// Per-phase deadline in milliseconds; 0 disables it
    #[arg(long, value_name = "MS")]
    phase_timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect or create configs
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// List discovered bootstraps and registered providers
    Bootstraps,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load a config and print it as JSON
    Get {
        /// Logical config path
        path: String,
        /// Load strategy: bundled-resource (res) or virtual-filesystem (vfs)
        #[arg(long, default_value = "bundled-resource")]
        strategy: String,
        /// Always load, refreshing the cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Create a config with default values if it does not exist (design-time)
    Init {
        /// Logical config path
        path: String,
        /// Load strategy: bundled-resource (res) or virtual-filesystem (vfs)
        #[arg(long, default_value = "bundled-resource")]
        strategy: String,
    },
}

fn load_settings(args: &CliArgs) -> strata_core::kernel::Result<KernelSettings> {
    let mut settings = match &args.settings {
        Some(path) => KernelSettings::load(path)?,
        None => KernelSettings::load_or_default(Path::new(constants::DEFAULT_SETTINGS_FILE))?,
    };
    if args.design_time || matches!(args.command, Some(Commands::Config { command: ConfigCommand::Init { .. } })) {
        settings.execution_mode = ExecutionMode::DesignTime;
    }
    if let Some(ms) = args.phase_timeout_ms {
        settings.phase_timeout_ms = ms;
    }
    Ok(settings)
}

fn build_app(settings: KernelSettings) -> Application {
    let vfs_root = settings.project_root.clone();
    Application::builder()
        .settings(settings)
        .bootstrap::<LoggingBootstrap>()
        .provider(Arc::new(VfsProvider::new(vfs_root)))
        .build()
}

async fn run_command(app: &Application, command: Option<Commands>) -> strata_core::kernel::Result<()> {
    match command {
        None => {
            println!("Application running (phase {})", app.phase());
            info!("Application running in {:?} mode", app.settings().execution_mode);
        }
        Some(Commands::Bootstraps) => {
            println!("Bootstraps:");
            for name in app.bootstrap_names() {
                println!("  - {}", name);
            }
            println!("Providers:");
            for name in app.provider_names() {
                println!("  - {}", name);
            }
        }
        Some(Commands::Config { command: ConfigCommand::Get { path, strategy, no_cache } }) => {
            let strategy: LoadStrategy = strategy.parse()?;
            match app.configs().get_config::<ConfigData>(&path, strategy, !no_cache)? {
                Some(config) => {
                    let rendered = serde_json::to_string_pretty(config.as_ref())
                        .map_err(|e| strata_core::KernelError::Other(format!("Failed to render config: {}", e)))?;
                    println!("{}", rendered);
                }
                None => println!("no config at {}", path),
            }
        }
        Some(Commands::Config { command: ConfigCommand::Init { path, strategy } }) => {
            let strategy: LoadStrategy = strategy.parse()?;
            let config = app.configs().create_if_not_exists::<ConfigData>(&path, strategy)?;
            println!("config ready at {} ({} keys)", path, config.keys().len());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if args.ping {
        println!("pong");
        return ExitCode::SUCCESS;
    }

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Installed before start so the banner and discovery lines are not lost
    core_logging::init_logging();

    println!("Initializing application...");
    let mut app = build_app(settings);
    if let Err(e) = app.start().await {
        eprintln!("Startup failed: {}", e);
        return ExitCode::FAILURE;
    }

    let outcome = run_command(&app, args.command).await;

    println!("Shutting down application...");
    let report = app.shutdown().await;
    for failure in &report.failures {
        warn!("{}", failure);
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
