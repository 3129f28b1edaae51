//! Load command implementation
//!
//! Resolves against an in-memory copy of the process environment, so nothing
//! outside this process is affected.

use anyhow::{Context, Result};
use clap::Args;
use envcascade::config::OptionOverrides;
use envcascade::resolve::render;
use envcascade::{config, MemoryEnv};
use serde_json::Value;

use super::utils::CascadeArgs;

#[derive(Args)]
pub struct LoadArgs {
    #[command(flatten)]
    pub cascade: CascadeArgs,

    /// Print the resolved map as JSON instead of KEY=value lines
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: LoadArgs, env_overrides: OptionOverrides) -> Result<()> {
    let options = args.cascade.load_options(env_overrides);
    let mut store = MemoryEnv::from_process();
    let resolved = config(&options, &mut store).context("Failed to load env cascade")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&Value::Object(resolved))?);
        return Ok(());
    }

    for (key, value) in &resolved {
        println!("{}={}", key, render(value));
    }
    Ok(())
}
