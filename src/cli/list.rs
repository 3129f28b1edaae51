//! List command implementation

use anyhow::Result;
use clap::Args;
use envcascade::cascade::planned_cascade;
use envcascade::config::OptionOverrides;
use envcascade::ProcessEnv;

use super::utils::CascadeArgs;

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub cascade: CascadeArgs,

    /// Print roles and paths as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ListArgs, env_overrides: OptionOverrides) -> Result<()> {
    let options = args.cascade.load_options(env_overrides);
    let files = planned_cascade(&options, &ProcessEnv);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    for file in &files {
        println!("{}", file.path.display());
    }
    Ok(())
}
