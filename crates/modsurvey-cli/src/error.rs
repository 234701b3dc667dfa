//! Error conversion utilities for CLI.
//!
//! Converts modsurvey-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use modsurvey_core::ScanError;
use std::path::Path;

/// Converts `ScanError` to a user-friendly anyhow error with context
pub fn convert_scan_error(err: ScanError, target: &Path) -> anyhow::Error {
    match err {
        ScanError::ArchiveOpen { path, reason } => {
            anyhow!(
                "Cannot open '{}' as a mod archive: {reason}\n\
                 HINT: Only JAR/ZIP files can be surveyed.",
                path.display()
            )
        }
        ScanError::MalformedManifest { path, reason } => {
            anyhow!(
                "Malformed coremods manifest {path} in '{}': {reason}\n\
                 HINT: The manifest must be a JSON object mapping coremod names to script paths.",
                target.display()
            )
        }
        ScanError::WalkFailure { reason } => {
            anyhow!(
                "Could not walk every entry of '{}': {reason}\n\
                 HINT: Drop --strict-walk to classify the archive without heuristics.",
                target.display()
            )
        }
        ScanError::Extraction { path, reason } => {
            anyhow!(
                "Failed to extract {path} from '{}': {reason}\n\
                 HINT: Check that the output directory is writable.",
                target.display()
            )
        }
        ScanError::Io(io_err) => {
            anyhow!("I/O error while processing '{}': {io_err}", target.display())
        }
        ScanError::NotFound { .. } => anyhow::Error::from(err)
            .context(format!("Error processing '{}'", target.display())),
    }
}

/// Adds context to a core result about the archive or directory involved
pub fn add_scan_context<T>(result: Result<T, ScanError>, target: &Path) -> anyhow::Result<T> {
    result.map_err(|e| convert_scan_error(e, target))
}
