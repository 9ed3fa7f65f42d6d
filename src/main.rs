use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finflow::{ColorScheme, FailurePolicy};
use finflow::cli::commands;
use finflow::cli::{CommandContext, Overrides};

#[derive(Parser)]
#[command(name = "finflow")]
#[command(
    version,
    about = "Extract, reconcile and chart financial line items from filing summaries"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Config file merged after ./finflow.toml")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and reconcile buckets from a summary text file
    Extract {
        #[arg(long, short, help = "Summary text file")]
        input: PathBuf,
        #[arg(long, short, help = "Bucket file (default: <input stem>_buckets.json)")]
        output: Option<PathBuf>,
        #[arg(long, short, help = "Model to use")]
        model: Option<String>,
        #[arg(long, help = "Skip the model and use the pattern table only")]
        offline: bool,
        #[arg(long, help = "When the model is unreachable: abort, fallback")]
        on_failure: Option<FailurePolicy>,
    },

    /// Build the flow chart description from a bucket file
    Visualize {
        #[arg(long, short = 'j', help = "Bucket file")]
        json: PathBuf,
        #[arg(long, short, help = "Chart file (default: <bucket stem>_sankey.json)")]
        output: Option<PathBuf>,
        #[arg(long, short = 'c', help = "Color scheme: standard, professional, high_contrast")]
        color_scheme: Option<ColorScheme>,
    },

    /// Extract, then visualize
    Run {
        #[arg(long, short, help = "Summary text file")]
        input: PathBuf,
        #[arg(long, help = "Bucket file (default: <input stem>_buckets.json)")]
        buckets: Option<PathBuf>,
        #[arg(long, short, help = "Chart file (default: <bucket stem>_sankey.json)")]
        output: Option<PathBuf>,
        #[arg(long, short, help = "Model to use")]
        model: Option<String>,
        #[arg(long, help = "Skip the model and use the pattern table only")]
        offline: bool,
        #[arg(long, help = "When the model is unreachable: abort, fallback")]
        on_failure: Option<FailurePolicy>,
        #[arg(long, short = 'c', help = "Color scheme: standard, professional, high_contrast")]
        color_scheme: Option<ColorScheme>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'f', long, default_value = "toml", help = "Output format: toml, json")]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Write a default configuration file
    Init {
        #[arg(long, short, help = "Write the global config instead of ./finflow.toml")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mfinflow encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Extract {
            input,
            output,
            model,
            offline,
            on_failure,
        } => {
            let overrides = Overrides {
                model,
                offline,
                on_failure,
                ..Default::default()
            };
            let ctx = CommandContext::load(config_path, &overrides)?;
            let rt = Runtime::new()?;
            rt.block_on(commands::extract::run(&ctx, &input, output.as_deref()))?;
        }
        Commands::Visualize {
            json,
            output,
            color_scheme,
        } => {
            let overrides = Overrides {
                offline: true,
                color_scheme,
                ..Default::default()
            };
            let ctx = CommandContext::load(config_path, &overrides)?;
            commands::visualize::run(&ctx.config, &json, output.as_deref())?;
        }
        Commands::Run {
            input,
            buckets,
            output,
            model,
            offline,
            on_failure,
            color_scheme,
        } => {
            let overrides = Overrides {
                model,
                offline,
                on_failure,
                color_scheme,
            };
            let ctx = CommandContext::load(config_path, &overrides)?;
            let rt = Runtime::new()?;
            rt.block_on(commands::run::run(
                &ctx,
                &input,
                buckets.as_deref(),
                output.as_deref(),
            ))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                commands::config::show(config_path, &format)?;
            }
            ConfigAction::Path => {
                commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
