//! Test utilities for building mod archives in memory.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::write::ZipWriter;

/// Creates an in-memory ZIP archive from a list of entries.
///
/// Each entry is a tuple of (path, content). Entries are stored uncompressed
/// in the given order.
///
/// # Examples
///
/// ```
/// use modsurvey_core::test_utils::create_test_zip;
///
/// let jar = create_test_zip(&[("META-INF/mods.toml", ""), ("pack.mcmeta", "{}")]);
/// ```
#[must_use]
pub fn create_test_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    entries
        .iter()
        .fold(ZipTestBuilder::new(), |builder, &(path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Writes an in-memory ZIP archive to `path`.
pub fn write_test_zip(path: &Path, entries: &[(&str, &str)]) {
    std::fs::write(path, create_test_zip(entries)).unwrap();
}

/// Builder for ZIP test archives with files and explicit directories.
///
/// # Examples
///
/// ```
/// use modsurvey_core::test_utils::ZipTestBuilder;
///
/// let jar = ZipTestBuilder::new()
///     .add_directory("META-INF/")
///     .add_file("META-INF/mods.toml", "modLoader=\"javafml\"")
///     .build();
/// ```
pub struct ZipTestBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl ZipTestBuilder {
    /// Creates a new ZIP test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored)
                .unix_permissions(0o644),
        }
    }

    /// Adds a regular file.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: impl AsRef<[u8]>) -> Self {
        self.writer.start_file(path, self.options).unwrap();
        self.writer.write_all(data.as_ref()).unwrap();
        self
    }

    /// Adds an explicit directory entry.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        self.writer.add_directory(path, self.options).unwrap();
        self
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.writer.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_zip() {
        let data = create_test_zip(&[("a.txt", "hello")]);
        let archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_builder_with_directory() {
        let data = ZipTestBuilder::new()
            .add_directory("dir/")
            .add_file("dir/file.txt", "x")
            .build();
        let archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 2);
    }
}
