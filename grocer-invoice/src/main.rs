use clap::Parser;
use grocer_invoice::cli::{self, Cli};
use grocer_invoice::setup_environment;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Environment (dotenv, work dir, logging)
    let config = setup_environment()?;

    // 2. Run the command
    if let Err(e) = cli::run(cli, &config) {
        tracing::error!("Command failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}
