use clap::Parser;
use percept_cli::{Cli, logging};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_file)?;
    tracing::info!(command = ?cli.command, "percept starting");
    percept_cli::run(cli)
}
