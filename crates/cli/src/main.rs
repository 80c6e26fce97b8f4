use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use shopassist_cli::Cli;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let result = runtime.block_on(shopassist_cli::run(cli));

    println!("{}", result.output);
    Ok(ExitCode::from(result.exit_code))
}
