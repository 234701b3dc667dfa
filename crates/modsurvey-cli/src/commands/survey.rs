//! Survey command implementation.

use crate::cli::SurveyArgs;
use crate::error::add_scan_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use anyhow::bail;
use log::info;
use modsurvey_core::NoopProgress;
use modsurvey_core::survey_directory;

pub fn execute(args: &SurveyArgs, formatter: &dyn OutputFormatter, quiet: bool) -> Result<()> {
    if !args.input_dir.is_dir() {
        bail!(
            "Input directory '{}' does not exist or is not a directory",
            args.input_dir.display()
        );
    }

    let config = args.to_config();
    match &config.scan.output_root {
        Some(root) => info!("Extracting payloads into {}", root.display()),
        None => info!("Extraction disabled"),
    }

    // Use progress bar if TTY is detected and output is not suppressed
    let outcome = if !quiet && CliProgress::should_show() {
        let mut progress = CliProgress::new("Surveying");
        add_scan_context(
            survey_directory(&args.input_dir, &config, &mut progress),
            &args.input_dir,
        )?
    } else {
        add_scan_context(
            survey_directory(&args.input_dir, &config, &mut NoopProgress),
            &args.input_dir,
        )?
    };

    formatter.format_survey_outcome(&outcome)
}
