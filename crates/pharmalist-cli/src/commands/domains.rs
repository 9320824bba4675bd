//! Domains command implementation.

use crate::error::Result;
use crate::output::Formatter;
use pharmalist_domain::registry;

/// Execute the domains command.
pub async fn execute_domains(formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_domains(registry::all_domains())?);
    Ok(())
}
