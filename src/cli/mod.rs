//! Command-line interface for envcascade
//!
//! Provides `list`, `parse`, `load`, `exec` and `completions` subcommands.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use envcascade::config::OptionOverrides;
use envcascade::ProcessEnv;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod exec;
mod list;
mod load;
mod parse;
mod utils;

/// Load layered .env file cascades
#[derive(Parser)]
#[command(name = "envcascade")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the files the cascade would load, lowest priority first
    List(list::ListArgs),

    /// Print the raw merged contents of env files as JSON
    Parse(parse::ParseArgs),

    /// Resolve the cascade against a copy of the environment and print it
    Load(load::LoadArgs),

    /// Run a command with the cascade loaded into its environment
    Exec(exec::ExecArgs),

    /// Generate a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let env_overrides = OptionOverrides::from_env(&ProcessEnv);

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose || env_overrides.debug_enabled() {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::List(args) => list::run(args, env_overrides),
        Commands::Parse(args) => parse::run(args),
        Commands::Load(args) => load::run(args, env_overrides),
        Commands::Exec(args) => exec::run(args, env_overrides),
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "envcascade", &mut std::io::stdout());
            Ok(())
        }
    }
}
