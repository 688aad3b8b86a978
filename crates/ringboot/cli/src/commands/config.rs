//! Reference configuration printout

use crate::error::CliResult;
use crate::output::OutputFormat;
use ringboot_core::BootConfig;

/// Print the reference configuration.
pub fn execute(format: OutputFormat) -> CliResult<()> {
    let config = BootConfig::default();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Table => print!("{}", toml::to_string_pretty(&config)?),
    }
    Ok(())
}
