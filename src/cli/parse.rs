//! Parse command implementation

use anyhow::{Context, Result};
use clap::Args;
use envcascade::parse::{parse_files, ParseOptions};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Args)]
pub struct ParseArgs {
    /// Env files to parse, later files override earlier ones
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Encoding of the files (default utf-8)
    #[arg(long, value_name = "ENCODING")]
    pub encoding: Option<String>,
}

pub fn run(args: ParseArgs) -> Result<()> {
    let options = ParseOptions { encoding: args.encoding, ..ParseOptions::default() };
    let parsed = parse_files(&args.files, &options).context("Failed to parse env files")?;
    println!("{}", serde_json::to_string_pretty(&Value::Object(parsed))?);
    Ok(())
}
