//! Batch driver: surveys every archive in a directory.
//!
//! Archives are independent, so they are processed on a fixed-size worker
//! pool. Each worker owns one archive end to end; the only shared state is
//! the [`Aggregator`] (behind a lock) and the output folder mapping inside
//! the scanner.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::PoisonError;

use log::debug;
use log::error;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::Aggregator;
use crate::ClassificationRecord;
use crate::Result;
use crate::ScanConfig;
use crate::ScanError;
use crate::SignalScanner;
use crate::SurveyProgress;
use crate::SurveyReport;
use crate::classify_archive;
use crate::tree::ArchiveTree;
use crate::tree::ZipTree;

/// Configuration for a batch survey.
#[derive(Debug, Clone, Default)]
pub struct SurveyConfig {
    /// Per-archive scan configuration.
    pub scan: ScanConfig,

    /// Worker count; `0` lets the pool pick one per CPU.
    pub threads: usize,
}

/// An archive that was opened but could not be classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedArchive {
    /// Input file.
    pub path: PathBuf,
    /// Error message.
    pub reason: String,
}

/// Result of a batch survey.
#[derive(Debug, Clone)]
pub struct SurveyOutcome {
    /// Totals and percentages over every classified archive.
    pub report: SurveyReport,

    /// Files that could not be opened as archives. Not counted anywhere.
    pub skipped: Vec<PathBuf>,

    /// Archives whose processing failed. Not counted in the totals.
    pub failed: Vec<FailedArchive>,
}

enum ArchiveStatus {
    Classified,
    Skipped(PathBuf),
    Failed(FailedArchive),
}

/// Surveys every regular file directly inside `input_dir`.
///
/// # Errors
///
/// Returns an error if `input_dir` cannot be listed or the worker pool
/// cannot be built. Individual archives never abort the batch.
pub fn survey_directory<P: AsRef<Path>>(
    input_dir: P,
    config: &SurveyConfig,
    progress: &mut dyn SurveyProgress,
) -> Result<SurveyOutcome> {
    let archives = list_inputs(input_dir.as_ref())?;
    let scanner = SignalScanner::new(config.scan.clone());
    let aggregator = Mutex::new(Aggregator::new());

    progress.on_start(archives.len());
    let progress = Mutex::new(progress);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .map_err(|e| ScanError::Io(std::io::Error::other(e)))?;

    let statuses: Vec<ArchiveStatus> = pool.install(|| {
        archives
            .par_iter()
            .map(|path| {
                lock(&progress).on_archive_start(path);
                let status = survey_one(path, &scanner, &aggregator);
                lock(&progress).on_archive_complete(path);
                status
            })
            .collect()
    });

    let mut skipped = Vec::new();
    let mut failed = Vec::new();
    for status in statuses {
        match status {
            ArchiveStatus::Classified => {}
            ArchiveStatus::Skipped(path) => skipped.push(path),
            ArchiveStatus::Failed(failure) => failed.push(failure),
        }
    }

    let progress = progress.into_inner().unwrap_or_else(PoisonError::into_inner);
    progress.on_complete();

    let report = lock(&aggregator).report();
    Ok(SurveyOutcome {
        report,
        skipped,
        failed,
    })
}

/// Scans and classifies a single archive file.
///
/// # Errors
///
/// Returns [`ScanError::ArchiveOpen`] if the file is not an archive, or any
/// archive-fatal scan error.
pub fn inspect_archive<P: AsRef<Path>>(
    path: P,
    config: &ScanConfig,
) -> Result<ClassificationRecord> {
    let mut tree = ZipTree::open(path)?;
    classify_archive(&mut tree, &SignalScanner::new(config.clone()))
}

fn list_inputs(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            ScanError::Io(std::io::Error::other(format!(
                "cannot list {}: {e}",
                input_dir.display()
            )))
        })?;
        if entry.file_type().is_file() {
            inputs.push(entry.into_path());
        }
    }
    Ok(inputs)
}

fn survey_one(
    path: &Path,
    scanner: &SignalScanner,
    aggregator: &Mutex<Aggregator>,
) -> ArchiveStatus {
    let mut tree = match ZipTree::open(path) {
        Ok(tree) => tree,
        Err(e) => {
            debug!("Skipping {}: {e}", path.display());
            return ArchiveStatus::Skipped(path.to_path_buf());
        }
    };

    match classify_archive(&mut tree, scanner) {
        Ok(record) => {
            lock(aggregator).fold(&record, tree.identity());
            ArchiveStatus::Classified
        }
        Err(e) => {
            error!("Failed to classify {}: {e}", tree.identity());
            ArchiveStatus::Failed(FailedArchive {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
