use clap::Parser;
use tracing_subscriber::EnvFilter;

use fasta_validator::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("fasta_validator=debug,info")
    } else {
        EnvFilter::new("fasta_validator=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Validate(args) => {
            cli::validate::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Params(args) => {
            cli::params::run(args, cli.verbose)?;
        }
    }

    Ok(())
}
