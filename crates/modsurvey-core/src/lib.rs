//! Classification and payload extraction engine for mass mod archive surveys.
//!
//! `modsurvey-core` opens mod archives (JAR/ZIP) as navigable trees, runs a
//! fixed set of marker checks against them, and folds the resulting
//! classification records into batch-wide statistics. Coremod scripts and
//! access transformers found along the way are copied into a per-archive
//! output folder.
//!
//! # Examples
//!
//! ```no_run
//! use modsurvey_core::NoopProgress;
//! use modsurvey_core::SurveyConfig;
//! use modsurvey_core::survey_directory;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SurveyConfig::default();
//! let outcome = survey_directory("mods/", &config, &mut NoopProgress)?;
//! println!("Surveyed {} mods", outcome.report.totals.total);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod report;
pub mod scan;
pub mod survey;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod tree;

// Re-export main API types
pub use aggregate::AggregateTotals;
pub use aggregate::Aggregator;
pub use classify::Anomaly;
pub use classify::ClassificationRecord;
pub use classify::Platform;
pub use classify::PlatformOutcome;
pub use classify::classify;
pub use classify::classify_archive;
pub use config::HeuristicPatterns;
pub use config::MarkerPaths;
pub use config::ScanConfig;
pub use config::WalkFailurePolicy;
pub use error::Result;
pub use error::ScanError;
pub use extract::ExtractedFile;
pub use extract::OutputFolders;
pub use extract::PayloadExtractor;
pub use report::NoopProgress;
pub use report::Percentage;
pub use report::SurveyProgress;
pub use report::SurveyReport;
pub use scan::CoreHooksManifest;
pub use scan::RawSignals;
pub use scan::SignalScanner;
pub use survey::SurveyConfig;
pub use survey::SurveyOutcome;
pub use survey::inspect_archive;
pub use survey::survey_directory;
pub use tree::ArchiveTree;
pub use tree::ZipTree;
