use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stresslens::cli::OutputFormat;
use stresslens::cli::commands::config::ConfigFormat;

#[derive(Parser)]
#[command(name = "stresslens")]
#[command(
    version,
    about = "Stress signal classification and escalation for wellbeing check-ins"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single answer
    Assess {
        #[arg(long, help = "Question shown to the user")]
        question: String,
        #[arg(long, help = "Free-text answer")]
        answer: String,
        #[arg(long, help = "Life domain (work, personal, financial, health, self-worth)")]
        domain: String,
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Process a check-in submission (JSON or YAML list of answers)
    Checkin {
        #[arg(help = "Answers file")]
        file: PathBuf,
        #[arg(long, short, help = "User identifier")]
        user: String,
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        #[arg(long = "no-save", help = "Do not record the check-in in history")]
        no_save: bool,
    },

    /// Show stress trends from stored check-in history
    Trend {
        #[arg(long, short, help = "User identifier")]
        user: String,
        #[arg(long, short, help = "Limit to one domain")]
        domain: Option<String>,
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
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
        #[arg(short = 'f', long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
    /// Show configuration file paths
    Path,
    /// Create .stresslens/config.toml
    Init {
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
        eprintln!("\x1b[31mStressLens encountered an unexpected error:\x1b[0m");
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

    // Logs go to stderr so JSON output on stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Assess {
            question,
            answer,
            domain,
            format,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(stresslens::cli::commands::assess::run(
                &question, &answer, &domain, format,
            ))?;
        }
        Commands::Checkin {
            file,
            user,
            format,
            no_save,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(stresslens::cli::commands::checkin::run(
                &file, &user, format, no_save,
            ))?;
        }
        Commands::Trend {
            user,
            domain,
            format,
        } => {
            stresslens::cli::commands::trend::run(&user, domain.as_deref(), format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                stresslens::cli::commands::config::show(format)?;
            }
            ConfigAction::Path => {
                stresslens::cli::commands::config::path()?;
            }
            ConfigAction::Init { force } => {
                stresslens::cli::commands::config::init(force)?;
            }
        },
    }

    Ok(())
}
