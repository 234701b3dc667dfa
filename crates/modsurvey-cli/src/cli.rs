//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use modsurvey_core::ScanConfig;
use modsurvey_core::SurveyConfig;
use modsurvey_core::WalkFailurePolicy;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "modsurvey")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Survey every mod archive in a directory
    Survey(SurveyArgs),
    /// Classify a single mod archive
    Inspect(InspectArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args)]
pub struct SurveyArgs {
    /// Directory holding the mod archives
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory receiving extracted coremods and access transformers
    #[arg(short, long, value_name = "DIR", default_value = "output")]
    pub output: PathBuf,

    /// Classify only, do not extract anything
    #[arg(long, conflicts_with = "output")]
    pub no_extract: bool,

    /// Worker threads (0 = one per CPU)
    #[arg(short, long, default_value = "0")]
    pub threads: usize,

    /// Fail an archive whose full-tree walk breaks instead of leaving the
    /// heuristics unset
    #[arg(long)]
    pub strict_walk: bool,
}

impl SurveyArgs {
    pub fn to_config(&self) -> SurveyConfig {
        let output_root = (!self.no_extract).then(|| self.output.clone());
        SurveyConfig {
            scan: ScanConfig::default()
                .with_output_root(output_root)
                .with_walk_failure(walk_failure(self.strict_walk)),
            threads: self.threads,
        }
    }
}

#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the mod archive
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Extract payloads into this directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Fail if the full-tree walk breaks
    #[arg(long)]
    pub strict_walk: bool,
}

impl InspectArgs {
    pub fn to_config(&self) -> ScanConfig {
        ScanConfig::default()
            .with_output_root(self.output.clone())
            .with_walk_failure(walk_failure(self.strict_walk))
    }
}

const fn walk_failure(strict: bool) -> WalkFailurePolicy {
    if strict {
        WalkFailurePolicy::FailArchive
    } else {
        WalkFailurePolicy::BestEffort
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_survey_defaults() {
        let cli = Cli::parse_from(["modsurvey", "survey", "mods"]);
        let Commands::Survey(args) = cli.command else {
            panic!("expected survey");
        };
        let config = args.to_config();
        assert_eq!(config.scan.output_root, Some(PathBuf::from("output")));
        assert_eq!(config.scan.walk_failure, WalkFailurePolicy::BestEffort);
        assert_eq!(config.threads, 0);
    }

    #[test]
    fn test_survey_no_extract_strict() {
        let cli = Cli::parse_from(["modsurvey", "survey", "mods", "--no-extract", "--strict-walk"]);
        let Commands::Survey(args) = cli.command else {
            panic!("expected survey");
        };
        let config = args.to_config();
        assert_eq!(config.scan.output_root, None);
        assert_eq!(config.scan.walk_failure, WalkFailurePolicy::FailArchive);
    }

    #[test]
    fn test_inspect_does_not_extract_by_default() {
        let cli = Cli::parse_from(["modsurvey", "inspect", "a.jar"]);
        let Commands::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.to_config().output_root, None);
    }
}
