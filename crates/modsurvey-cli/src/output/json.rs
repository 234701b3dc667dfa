//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use modsurvey_core::ClassificationRecord;
use modsurvey_core::Percentage;
use modsurvey_core::SurveyOutcome;
use modsurvey_core::report::ForgeShare;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

/// `null` for an undefined share.
fn percent(share: Percentage) -> Option<f64> {
    share.as_f64()
}

#[derive(Serialize)]
struct ShareOutput {
    of_forge: Option<f64>,
    excluding_mcreator: Option<f64>,
}

impl From<ForgeShare> for ShareOutput {
    fn from(share: ForgeShare) -> Self {
        Self {
            of_forge: percent(share.of_platform_b),
            excluding_mcreator: percent(share.excluding_generator),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_survey_outcome(&self, outcome: &SurveyOutcome) -> Result<()> {
        #[derive(Serialize)]
        struct Totals {
            total: u64,
            fabric: u64,
            forge: u64,
            both: u64,
            forge_legacy: u64,
            neither: u64,
            mcreator: u64,
            coremods: u64,
            access_transformers: u64,
            mixins_forge: u64,
            mixins_fabric: u64,
        }

        #[derive(Serialize)]
        struct Percentages {
            mcreator: Option<f64>,
            coremods: ShareOutput,
            access_transformers: ShareOutput,
            mixins_forge: ShareOutput,
            mixins_fabric: Option<f64>,
        }

        #[derive(Serialize)]
        struct Failure {
            path: String,
            reason: String,
        }

        #[derive(Serialize)]
        struct SurveyData {
            totals: Totals,
            percentages: Percentages,
            skipped: Vec<String>,
            failed: Vec<Failure>,
        }

        let report = &outcome.report;
        let totals = &report.totals;
        let data = SurveyData {
            totals: Totals {
                total: totals.total,
                fabric: totals.platform_a,
                forge: totals.platform_b,
                both: totals.both,
                forge_legacy: totals.legacy,
                neither: totals.neither,
                mcreator: totals.generator_tool,
                coremods: totals.core_hooks,
                access_transformers: totals.binary_patch_spec,
                mixins_forge: totals.weaving_platform_b,
                mixins_fabric: totals.weaving_platform_a,
            },
            percentages: Percentages {
                mcreator: percent(report.generator_tool),
                coremods: report.core_hooks.into(),
                access_transformers: report.binary_patch_spec.into(),
                mixins_forge: report.weaving_platform_b.into(),
                mixins_fabric: percent(report.weaving_platform_a),
            },
            skipped: outcome
                .skipped
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            failed: outcome
                .failed
                .iter()
                .map(|f| Failure {
                    path: f.path.display().to_string(),
                    reason: f.reason.clone(),
                })
                .collect(),
        };

        Self::output(&JsonOutput::success("survey", data))
    }

    fn format_record(&self, archive: &Path, record: &ClassificationRecord) -> Result<()> {
        #[derive(Serialize)]
        struct RecordOutput {
            archive: String,
            outcome: String,
            mcreator: bool,
            mixins: bool,
            coremods: bool,
            access_transformer: Option<String>,
            anomalies: Vec<String>,
        }

        let data = RecordOutput {
            archive: archive.display().to_string(),
            outcome: record.outcome().to_string(),
            mcreator: record.generator_tool(),
            mixins: record.bytecode_weaving(),
            coremods: record.core_hooks(),
            access_transformer: record.binary_patch_spec().map(str::to_string),
            anomalies: record
                .anomalies()
                .iter()
                .map(ToString::to_string)
                .collect(),
        };

        Self::output(&JsonOutput::success("inspect", data))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::error("error", format!("{error:?}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}
