use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    env_logger::init();
    let args = cli::Cli::parse();
    cli::run(args)
}
