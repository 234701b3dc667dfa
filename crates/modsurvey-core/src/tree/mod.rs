//! Hierarchical view of an opened archive.
//!
//! The scanner only needs four things from an archive: a stable identity,
//! existence checks, whole-entry reads, and a depth-first enumeration of the
//! files under a root. [`ArchiveTree`] captures exactly that so the engine can
//! be driven by real ZIP files or by test doubles.

pub mod zip;

pub use self::zip::ZipTree;

use crate::Result;

/// An opened archive presented as a rooted path namespace.
///
/// Paths are archive-root-relative and written with a leading `/`
/// (`/META-INF/mods.toml`); implementations must also accept them without it.
pub trait ArchiveTree {
    /// Identity of the archive, normally its file name.
    fn identity(&self) -> &str;

    /// Returns `true` if a file or directory exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Reads the whole file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotFound`](crate::ScanError::NotFound) if no file
    /// exists at `path`, or an I/O error if the entry cannot be decoded.
    fn read_all(&mut self, path: &str) -> Result<Vec<u8>>;

    /// Enumerates every file under `root`, yielding `/`-prefixed paths.
    ///
    /// The sequence is finite and not restartable. Visiting order is
    /// unspecified. An `Err` item means the walk cannot continue.
    ///
    /// # Errors
    ///
    /// Returns an error if the walk cannot be started.
    fn walk(&mut self, root: &str) -> Result<Box<dyn Iterator<Item = Result<String>> + '_>>;
}

/// Strips the leading `/` from an archive path.
#[must_use]
pub fn entry_name(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Returns the last component of an archive path, if it has one.
///
/// # Examples
///
/// ```
/// use modsurvey_core::tree::file_name;
///
/// assert_eq!(file_name("/scripts/foo.js"), Some("foo.js"));
/// assert_eq!(file_name("foo.js"), Some("foo.js"));
/// assert_eq!(file_name("/scripts/"), None);
/// ```
#[must_use]
pub fn file_name(path: &str) -> Option<&str> {
    path.rsplit('/').next().filter(|name| !name.is_empty())
}
