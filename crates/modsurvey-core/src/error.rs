//! Error types for archive scanning and classification.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ScanError`.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors that can occur while scanning a mod archive.
#[derive(Error, Debug)]
pub enum ScanError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An optional archive entry is absent.
    ///
    /// Every presence check treats this as "signal absent"; it is never
    /// reported as a warning.
    #[error("entry not found: {path}")]
    NotFound {
        /// Archive-relative path that was looked up.
        path: String,
    },

    /// The input file could not be opened as an archive.
    #[error("cannot open {} as an archive: {reason}", path.display())]
    ArchiveOpen {
        /// Path of the input file.
        path: PathBuf,
        /// Reason reported by the archive reader.
        reason: String,
    },

    /// The coremods manifest exists but is not an object of name to path.
    #[error("malformed coremods manifest {path}: {reason}")]
    MalformedManifest {
        /// Archive-relative path of the manifest.
        path: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A single payload could not be copied out of the archive.
    #[error("failed to extract {path}: {reason}")]
    Extraction {
        /// Archive-relative path of the payload.
        path: String,
        /// Underlying cause.
        reason: String,
    },

    /// The full-tree walk could not complete.
    #[error("archive walk failed: {reason}")]
    WalkFailure {
        /// Underlying cause.
        reason: String,
    },
}

impl ScanError {
    /// Returns `true` if this error only signals an absent entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use modsurvey_core::ScanError;
    ///
    /// let err = ScanError::NotFound {
    ///     path: "/META-INF/coremods.json".to_string(),
    /// };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this error aborts processing of the current archive.
    ///
    /// Extraction failures and absent entries are local to one artifact or
    /// one check; everything else stops the archive and keeps it out of the
    /// batch totals.
    ///
    /// # Examples
    ///
    /// ```
    /// use modsurvey_core::ScanError;
    ///
    /// let err = ScanError::MalformedManifest {
    ///     path: "/META-INF/coremods.json".to_string(),
    ///     reason: "expected an object, found an array".to_string(),
    /// };
    /// assert!(err.is_archive_fatal());
    ///
    /// let err = ScanError::Extraction {
    ///     path: "/scripts/foo.js".to_string(),
    ///     reason: "disk full".to_string(),
    /// };
    /// assert!(!err.is_archive_fatal());
    /// ```
    #[must_use]
    pub const fn is_archive_fatal(&self) -> bool {
        !matches!(self, Self::NotFound { .. } | Self::Extraction { .. })
    }
}
