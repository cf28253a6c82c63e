use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use documentor::cli::commands::analyze::ReportFormat;
use documentor::cli::commands::generate::GenerateOptions;
use documentor::config::ConfigFormat;

#[derive(Parser)]
#[command(name = "documentor")]
#[command(
    version,
    about = "AI-assisted documentation and class diagram generator for Java and Python codebases"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (TOML, or JSON by extension); replaces global and project config
    #[arg(long, short, global = true, env = "DOCUMENTOR_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a project and print what was extracted
    Analyze {
        #[arg(help = "Project root (default: current directory)")]
        path: Option<PathBuf>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json, yaml"
        )]
        format: ReportFormat,
    },

    /// Generate documentation, unit tests and diagrams
    Generate {
        #[arg(help = "Project root (default: current directory)")]
        path: Option<PathBuf>,
        #[arg(long, short, help = "Output directory")]
        output: Option<PathBuf>,
        #[arg(long, help = "Generate Mermaid class diagrams")]
        mermaid: bool,
        #[arg(long, help = "Generate PlantUML class diagrams")]
        plantuml: bool,
        #[arg(long, value_name = "DIR", help = "Mermaid diagram directory (implies --mermaid)")]
        mermaid_output: Option<PathBuf>,
        #[arg(long, value_name = "DIR", help = "PlantUML diagram directory (implies --plantuml)")]
        plantuml_output: Option<PathBuf>,
        #[arg(long, help = "Include private members in the analysis")]
        include_private: bool,
        #[arg(long = "no-tests", help = "Skip unit test generation")]
        no_tests: bool,
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
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json, yaml"
        )]
        format: ConfigFormat,
    },
    /// Show configuration file paths
    Path,
    /// Create .documentor/config.toml in the current directory
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
        eprintln!("\x1b[31mdocumentor encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!("\n\x1b[33mRe-run with RUST_BACKTRACE=1 and --verbose for details.\x1b[0m");
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
            eprintln!("\x1b[31mError:\x1b[0m {:#}", e);
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
        Commands::Analyze { path, format } => {
            let config = documentor::cli::load_config(config_path)?;
            let root = documentor::cli::resolve_root(path);
            let rt = Runtime::new()?;
            rt.block_on(documentor::cli::commands::analyze::run(
                &root, &config, format,
            ))?;
        }
        Commands::Generate {
            path,
            output,
            mermaid,
            plantuml,
            mermaid_output,
            plantuml_output,
            include_private,
            no_tests,
        } => {
            let config = documentor::cli::load_config(config_path)?;
            let root = documentor::cli::resolve_root(path);
            let options = GenerateOptions {
                output,
                mermaid,
                plantuml,
                mermaid_output,
                plantuml_output,
                include_private,
                no_tests,
            };
            let rt = Runtime::new()?;
            rt.block_on(documentor::cli::commands::generate::run(
                &root, config, &options,
            ))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                let config = documentor::cli::load_config(config_path)?;
                documentor::cli::commands::config::show(&config, format)?;
            }
            ConfigAction::Path => {
                documentor::cli::commands::config::path()?;
            }
            ConfigAction::Init { force } => {
                let root = std::env::current_dir()?;
                documentor::cli::commands::config::init(&root, force)?;
            }
        },
    }

    Ok(())
}
