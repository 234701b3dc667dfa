//! ZIP/JAR backed archive tree.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::path::Path;

use zip::result::ZipError;

use super::ArchiveTree;
use super::entry_name;
use crate::Result;
use crate::ScanError;

/// An [`ArchiveTree`] over a ZIP archive (JAR files are ZIP archives).
///
/// Directories need not be stored as explicit entries: a path counts as an
/// existing directory as soon as any entry lives beneath it.
pub struct ZipTree<R> {
    identity: String,
    archive: zip::ZipArchive<R>,
}

impl ZipTree<BufReader<File>> {
    /// Opens the archive at `path`. Its file name becomes the identity.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ArchiveOpen`] if the file cannot be read or is
    /// not a ZIP archive.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let open_error = |reason: String| ScanError::ArchiveOpen {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| open_error(e.to_string()))?;
        let identity = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        Self::new(BufReader::new(file), identity).map_err(|e| match e {
            ScanError::ArchiveOpen { reason, .. } => open_error(reason),
            other => other,
        })
    }
}

impl<R: Read + Seek> ZipTree<R> {
    /// Wraps an already opened reader.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ArchiveOpen`] if the central directory cannot be
    /// read.
    pub fn new(reader: R, identity: impl Into<String>) -> Result<Self> {
        let identity = identity.into();
        let archive = zip::ZipArchive::new(reader).map_err(|e| ScanError::ArchiveOpen {
            path: identity.clone().into(),
            reason: e.to_string(),
        })?;
        Ok(Self { identity, archive })
    }

    /// Number of entries in the central directory, directories included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns `true` if the archive has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }
}

impl<R: Read + Seek> ArchiveTree for ZipTree<R> {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn exists(&self, path: &str) -> bool {
        let name = entry_name(path).trim_end_matches('/');
        if name.is_empty() {
            return true;
        }
        if self.archive.index_for_name(name).is_some() {
            return true;
        }

        let dir = format!("{name}/");
        self.archive.file_names().any(|n| n.starts_with(&dir))
    }

    fn read_all(&mut self, path: &str) -> Result<Vec<u8>> {
        let not_found = || ScanError::NotFound {
            path: path.to_string(),
        };

        let mut file = match self.archive.by_name(entry_name(path)) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Err(not_found()),
            Err(ZipError::Io(e)) => return Err(ScanError::Io(e)),
            Err(e) => {
                return Err(ScanError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    e.to_string(),
                )));
            }
        };

        if file.is_dir() {
            return Err(not_found());
        }

        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn walk(&mut self, root: &str) -> Result<Box<dyn Iterator<Item = Result<String>> + '_>> {
        let root = entry_name(root).trim_end_matches('/');
        let prefix = if root.is_empty() {
            String::new()
        } else {
            format!("{root}/")
        };

        let archive = &mut self.archive;
        let len = archive.len();

        Ok(Box::new((0..len).filter_map(move |index| {
            let entry = match archive.by_index_raw(index) {
                Ok(entry) => entry,
                Err(e) => {
                    return Some(Err(ScanError::WalkFailure {
                        reason: format!("entry #{index}: {e}"),
                    }));
                }
            };

            if entry.is_dir() || !entry.name().starts_with(&prefix) {
                return None;
            }
            Some(Ok(format!("/{}", entry.name())))
        })))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::ZipTestBuilder;
    use crate::test_utils::create_test_zip;
    use std::io::Cursor;

    fn tree(entries: &[(&str, &str)]) -> ZipTree<Cursor<Vec<u8>>> {
        ZipTree::new(Cursor::new(create_test_zip(entries)), "test.jar").unwrap()
    }

    #[test]
    fn test_identity() {
        let tree = tree(&[("a.txt", "a")]);
        assert_eq!(tree.identity(), "test.jar");
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_exists_file_with_and_without_slash() {
        let tree = tree(&[("META-INF/mods.toml", "modLoader=\"javafml\"")]);
        assert!(tree.exists("/META-INF/mods.toml"));
        assert!(tree.exists("META-INF/mods.toml"));
        assert!(!tree.exists("/META-INF/MODS.TOML"));
    }

    #[test]
    fn test_exists_implicit_directory() {
        let tree = tree(&[("net/mcreator/Foo.class", "")]);
        assert!(tree.exists("/net/mcreator"));
        assert!(tree.exists("/net"));
        assert!(!tree.exists("/net/mcreat"));
    }

    #[test]
    fn test_exists_explicit_directory() {
        let data = ZipTestBuilder::new()
            .add_directory("META-INF/services/")
            .build();
        let tree = ZipTree::new(Cursor::new(data), "svc.jar").unwrap();
        assert!(tree.exists("/META-INF/services"));
    }

    #[test]
    fn test_read_all() {
        let mut tree = tree(&[("mcmod.info", "[]")]);
        assert_eq!(tree.read_all("/mcmod.info").unwrap(), b"[]");
    }

    #[test]
    fn test_read_all_missing_is_not_found() {
        let mut tree = tree(&[("mcmod.info", "[]")]);
        let err = tree.read_all("/META-INF/coremods.json").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_walk_skips_directories_and_prefixes_slash() {
        let data = ZipTestBuilder::new()
            .add_directory("assets/")
            .add_file("assets/example/lang/en_us.json", "{}")
            .add_file("pack.mcmeta", "{}")
            .build();
        let mut tree = ZipTree::new(Cursor::new(data), "walk.jar").unwrap();

        let mut paths: Vec<String> = tree.walk("/").unwrap().map(Result::unwrap).collect();
        paths.sort();
        assert_eq!(
            paths,
            vec!["/assets/example/lang/en_us.json", "/pack.mcmeta"]
        );
    }

    #[test]
    fn test_walk_under_root() {
        let mut tree = tree(&[
            ("META-INF/services/a.B", "x"),
            ("META-INF/servicesX", "y"),
            ("META-INF/mods.toml", ""),
        ]);
        let paths: Vec<String> = tree
            .walk("/META-INF/services")
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(paths, vec!["/META-INF/services/a.B"]);
    }

    #[test]
    fn test_not_a_zip() {
        let result = ZipTree::new(Cursor::new(b"definitely not a zip".to_vec()), "x.jar");
        assert!(matches!(result, Err(ScanError::ArchiveOpen { .. })));
    }
}
