use std::path::PathBuf;

use clap::Args;

use crate::core::options::{OptionOverrides, ValidationOptions};

#[derive(Args)]
pub struct ParamsArgs {
    /// Write the template to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute params subcommand
///
/// # Errors
///
/// Returns an error if the template cannot be serialized or written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ParamsArgs, verbose: bool) -> anyhow::Result<()> {
    let template = OptionOverrides::from_options(&ValidationOptions::default());
    let json = serde_json::to_string_pretty(&template)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))?;
            if verbose {
                eprintln!("Wrote parameter template to {}", path.display());
            }
        }
        None => println!("{json}"),
    }

    Ok(())
}
