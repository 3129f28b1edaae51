//! envcascade: load layered `.env` files into the environment
//!
//! Lists, parses and loads cascades, or runs a command with the cascade
//! applied to its environment.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
