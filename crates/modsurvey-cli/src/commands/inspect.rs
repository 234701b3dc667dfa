//! Inspect command implementation.

use crate::cli::InspectArgs;
use crate::error::add_scan_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use modsurvey_core::inspect_archive;

pub fn execute(args: &InspectArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let config = args.to_config();
    let record = add_scan_context(inspect_archive(&args.archive, &config), &args.archive)?;
    formatter.format_record(&args.archive, &record)
}
