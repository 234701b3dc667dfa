//! Payload extraction into per-archive output folders.
//!
//! Every archive gets one folder, `output_root/<archive identity>`, created on
//! the first extraction request and reused afterwards. File names inside the
//! folder never overwrite a different payload: when a name is taken by other
//! bytes, a `-` is prepended until a free (or byte-identical) name is found.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::PoisonError;

use log::debug;

use crate::ArchiveTree;
use crate::Result;
use crate::ScanError;
use crate::tree::file_name;

/// A payload written to an output folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    /// Destination on disk.
    pub path: PathBuf,

    /// Number of bytes written.
    pub bytes_written: u64,
}

/// Lazily created mapping from archive identity to its output folder.
///
/// Safe to share between workers: two workers asking for the same identity
/// get the same folder, and creation is idempotent.
#[derive(Debug)]
pub struct OutputFolders {
    root: PathBuf,
    folders: Mutex<HashMap<String, PathBuf>>,
}

impl OutputFolders {
    /// Creates an empty mapping rooted at `root`. Nothing is created on disk
    /// until [`folder_for`](Self::folder_for) is called.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            folders: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the output root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves or creates the folder for `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Extraction`] if the folder cannot be created.
    pub fn folder_for(&self, identity: &str) -> Result<PathBuf> {
        let mut folders = self.folders.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(folder) = folders.get(identity) {
            return Ok(folder.clone());
        }

        let folder = self.root.join(identity);
        fs::create_dir_all(&folder).map_err(|e| ScanError::Extraction {
            path: folder.display().to_string(),
            reason: format!("cannot create output folder: {e}"),
        })?;
        debug!("Created output folder {}", folder.display());

        folders.insert(identity.to_string(), folder.clone());
        Ok(folder)
    }
}

/// Copies designated files out of an archive tree.
#[derive(Debug)]
pub struct PayloadExtractor {
    folders: OutputFolders,
}

impl PayloadExtractor {
    /// Creates an extractor writing under `output_root`.
    #[must_use]
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            folders: OutputFolders::new(output_root),
        }
    }

    /// Returns the folder mapping used by this extractor.
    #[must_use]
    pub fn folders(&self) -> &OutputFolders {
        &self.folders
    }

    /// Extracts `source` under its base name, applying the collision policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Extraction`] if the source cannot be read, the
    /// folder cannot be created, or the copy fails.
    pub fn extract<T: ArchiveTree + ?Sized>(
        &self,
        tree: &mut T,
        source: &str,
    ) -> Result<ExtractedFile> {
        let name = file_name(source).ok_or_else(|| extraction_error(source, "no file name"))?;
        let payload = read_payload(tree, source)?;
        let folder = self.folders.folder_for(tree.identity())?;

        let target =
            free_target(&folder, name, &payload).map_err(|e| extraction_error(source, e))?;
        write_payload(source, &target, &payload)
    }

    /// Extracts `source` under the fixed name `target_name`, replacing any
    /// file already there.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Extraction`] on any read, folder or copy failure.
    pub fn extract_as<T: ArchiveTree + ?Sized>(
        &self,
        tree: &mut T,
        source: &str,
        target_name: &str,
    ) -> Result<ExtractedFile> {
        let payload = read_payload(tree, source)?;
        let folder = self.folders.folder_for(tree.identity())?;
        write_payload(source, &folder.join(target_name), &payload)
    }
}

fn read_payload<T: ArchiveTree + ?Sized>(tree: &mut T, source: &str) -> Result<Vec<u8>> {
    tree.read_all(source).map_err(|e| extraction_error(source, e))
}

/// Finds the first name, prepending `-` each round, that is either unused
/// or already holds exactly `payload`.
fn free_target(folder: &Path, file_name: &str, payload: &[u8]) -> io::Result<PathBuf> {
    let mut name = file_name.to_string();
    loop {
        let candidate = folder.join(&name);
        if !candidate.exists() {
            return Ok(candidate);
        }
        if candidate.is_file() && fs::read(&candidate)? == payload {
            return Ok(candidate);
        }

        debug!("{} already exists, trying -{name}", candidate.display());
        name.insert(0, '-');
    }
}

fn write_payload(source: &str, target: &Path, payload: &[u8]) -> Result<ExtractedFile> {
    fs::write(target, payload).map_err(|e| extraction_error(source, e))?;
    Ok(ExtractedFile {
        path: target.to_path_buf(),
        bytes_written: payload.len() as u64,
    })
}

fn extraction_error(source: &str, reason: impl ToString) -> ScanError {
    ScanError::Extraction {
        path: source.to_string(),
        reason: reason.to_string(),
    }
}
