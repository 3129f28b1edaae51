//! Exec command implementation

use anyhow::{Context, Result};
use clap::Args;
use envcascade::config::OptionOverrides;
use envcascade::{config, ProcessEnv};
use std::process::Command;

use super::utils::CascadeArgs;

#[derive(Args)]
pub struct ExecArgs {
    #[command(flatten)]
    pub cascade: CascadeArgs,

    /// Command to run
    #[arg(value_name = "CMD")]
    pub command: String,

    /// Arguments passed to the command
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

pub fn run(args: ExecArgs, env_overrides: OptionOverrides) -> Result<()> {
    let options = args.cascade.load_options(env_overrides);
    // no other threads are running yet
    config(&options, &mut ProcessEnv).context("Failed to load env cascade")?;

    let status = Command::new(&args.command)
        .args(&args.args)
        .status()
        .with_context(|| format!("Failed to run `{}`", args.command))?;

    match status.code() {
        Some(0) => Ok(()),
        Some(code) => std::process::exit(code),
        None => anyhow::bail!("`{}` was terminated by a signal", args.command),
    }
}
