//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use modsurvey_core::ClassificationRecord;
use modsurvey_core::SurveyOutcome;
use modsurvey_core::report::ForgeShare;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn forge_share(share: ForgeShare) -> String {
        format!(
            "{} of Forge mods, {} excluding MCreator",
            share.of_platform_b, share.excluding_generator
        )
    }

    const fn yes_no(flag: bool) -> &'static str {
        if flag { "yes" } else { "no" }
    }

    fn header(&self, text: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {text}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(text);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_survey_outcome(&self, outcome: &SurveyOutcome) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let report = &outcome.report;
        let totals = &report.totals;

        self.header("Survey complete");
        let _ = self.term.write_line("");
        let _ = self
            .term
            .write_line(&format!("  Total mods: {}", totals.total));
        let _ = self.term.write_line(&format!(
            "  Total mods using MCreator: {} ({} of Forge mods)",
            totals.generator_tool, report.generator_tool
        ));
        let _ = self.term.write_line(&format!(
            "  Total mods with core mods: {} ({})",
            totals.core_hooks,
            Self::forge_share(report.core_hooks)
        ));
        let _ = self.term.write_line(&format!(
            "  Total mods with access transformers: {} ({})",
            totals.binary_patch_spec,
            Self::forge_share(report.binary_patch_spec)
        ));
        let _ = self.term.write_line(&format!(
            "  Forge mods using Mixins: {} ({})",
            totals.weaving_platform_b,
            Self::forge_share(report.weaving_platform_b)
        ));
        let _ = self.term.write_line(&format!(
            "  Fabric mods using Mixins: {} ({} of Fabric mods)",
            totals.weaving_platform_a, report.weaving_platform_a
        ));
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "  Fabric: {}  Forge: {}  Both: {}  Forge 1.12 or below: {}  Neither: {}",
            totals.platform_a, totals.platform_b, totals.both, totals.legacy, totals.neither
        ));

        if !outcome.skipped.is_empty() {
            let _ = self.term.write_line(&format!(
                "  Skipped (not an archive): {}",
                outcome.skipped.len()
            ));
            if self.verbose {
                for path in &outcome.skipped {
                    let _ = self.term.write_line(&format!("    {}", path.display()));
                }
            }
        }

        for failure in &outcome.failed {
            self.format_warning(&format!(
                "{} was not counted: {}",
                failure.path.display(),
                failure.reason
            ));
        }

        Ok(())
    }

    fn format_record(&self, archive: &Path, record: &ClassificationRecord) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.header(&format!("{}: {}", archive.display(), record.outcome()));
        let _ = self.term.write_line(&format!(
            "  MCreator:            {}",
            Self::yes_no(record.generator_tool())
        ));
        let _ = self.term.write_line(&format!(
            "  Mixins:              {}",
            Self::yes_no(record.bytecode_weaving())
        ));
        let _ = self.term.write_line(&format!(
            "  Core mods:           {}",
            Self::yes_no(record.core_hooks())
        ));
        let _ = self.term.write_line(&format!(
            "  Access transformer:  {}",
            Self::yes_no(record.binary_patch_spec().is_some())
        ));

        if self.verbose
            && let Some(contents) = record.binary_patch_spec()
        {
            let _ = self.term.write_line("");
            for line in contents.lines() {
                let _ = self.term.write_line(&format!("    {line}"));
            }
        }

        for anomaly in record.anomalies() {
            if anomaly.is_warning() {
                self.format_warning(&anomaly.to_string());
            } else if self.verbose {
                let _ = self.term.write_line(&format!("  Note: {anomaly}"));
            }
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("WARNING: {message}"));
        }
    }
}
