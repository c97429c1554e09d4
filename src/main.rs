use anyhow::Result;
use gapfill::cli::Cli;
use gapfill::telemetry::init_tracing;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.common.verbose);
    cli.execute()
}
