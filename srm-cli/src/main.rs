//! SRM CLI - Command line tool for species range maps from iNaturalist data.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "srm-cli",
    version,
    about = "Species range map toolkit for iNaturalist observations"
)]
struct Cli {
    #[command(subcommand)]
    command: srm_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    srm_cmd::run(cli.command).await
}
