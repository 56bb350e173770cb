//! Directory-to-zip archiving.
//!
//! Produces the archive segment of a container from a directory tree. The
//! output only has to be deterministic per call, since the signature covers
//! whatever bytes come out; entries are still visited in file-name order
//! with a fixed timestamp so the same tree always yields the same bytes.

use crate::{Error, Result};
use std::fs::File;
use std::io::{self, Cursor};
use std::path::Path;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// ZIP compression level for the archive segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u32);

impl CompressionLevel {
    /// Store entries without compression.
    pub const NONE: CompressionLevel = CompressionLevel(0);

    /// Balanced deflate level.
    pub const DEFAULT: CompressionLevel = CompressionLevel(6);

    /// Smallest output, slowest to build.
    pub const MAX: CompressionLevel = CompressionLevel(9);

    /// Creates a compression level from 0-9, clamping larger values.
    #[must_use]
    pub fn new(level: u32) -> Self {
        CompressionLevel(level.min(9))
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.0
    }

    fn file_options(&self) -> SimpleFileOptions {
        let options = SimpleFileOptions::default().last_modified_time(DateTime::default());
        if self.0 == 0 {
            options.compression_method(CompressionMethod::Stored)
        } else {
            options
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(i64::from(self.0)))
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for CompressionLevel {
    fn from(level: u32) -> Self {
        CompressionLevel::new(level)
    }
}

/// Options controlling how a directory is archived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Compression applied to every file entry.
    pub compression: CompressionLevel,
}

impl ArchiveOptions {
    pub fn with_compression(mut self, compression: CompressionLevel) -> Self {
        self.compression = compression;
        self
    }
}

/// Zip the regular files below `dir` into an in-memory buffer.
///
/// Entry names are relative to `dir` and always use `/` separators.
/// Symlinks are followed, so a linked file is stored with its target's
/// contents under the link's name.
pub fn build_archive(dir: impl AsRef<Path>, options: &ArchiveOptions) -> Result<Vec<u8>> {
    let dir = dir.as_ref();

    if !dir.exists() {
        return Err(Error::ArchiveBuild(format!(
            "directory not found: {}",
            dir.display()
        )));
    }
    if !dir.is_dir() {
        return Err(Error::ArchiveBuild(format!(
            "not a directory: {}",
            dir.display()
        )));
    }

    let file_options = options.compression.file_options();
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut entries = 0usize;

    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry =
            entry.map_err(|e| Error::ArchiveBuild(format!("failed to walk directory: {e}")))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let name = entry_name(dir, path)?;
        log::trace!("archiving {name}");

        zip.start_file(name.clone(), file_options)
            .map_err(|e| Error::ArchiveBuild(format!("{name}: {e}")))?;
        let mut file = File::open(path)
            .map_err(|e| Error::ArchiveBuild(format!("{}: {e}", path.display())))?;
        io::copy(&mut file, &mut zip)
            .map_err(|e| Error::ArchiveBuild(format!("{}: {e}", path.display())))?;
        entries += 1;
    }

    let bytes = zip
        .finish()
        .map_err(|e| Error::ArchiveBuild(e.to_string()))?
        .into_inner();

    log::debug!(
        "archived {entries} files from {} into {} bytes",
        dir.display(),
        bytes.len()
    );
    Ok(bytes)
}

fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        Error::ArchiveBuild(format!(
            "{} is outside {}",
            path.display(),
            root.display()
        ))
    })?;

    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn create_test_extension(dir: &Path) {
        fs::write(dir.join("manifest.json"), br#"{"name":"t"}"#).unwrap();
        fs::create_dir_all(dir.join("scripts/lib")).unwrap();
        fs::write(dir.join("scripts/background.js"), b"console.log(1);").unwrap();
        fs::write(dir.join("scripts/lib/util.js"), b"export {};").unwrap();
        fs::create_dir_all(dir.join("empty")).unwrap();
    }

    fn entry_names(bytes: &[u8]) -> Vec<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_build_archive_relative_sorted_names() {
        let temp = TempDir::new().unwrap();
        create_test_extension(temp.path());

        let bytes = build_archive(temp.path(), &ArchiveOptions::default()).unwrap();

        assert_eq!(
            entry_names(&bytes),
            vec![
                "manifest.json",
                "scripts/background.js",
                "scripts/lib/util.js",
            ]
        );
    }

    #[test]
    fn test_build_archive_preserves_contents() {
        let temp = TempDir::new().unwrap();
        create_test_extension(temp.path());

        let bytes = build_archive(temp.path(), &ArchiveOptions::default()).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut manifest = String::new();
        archive
            .by_name("manifest.json")
            .unwrap()
            .read_to_string(&mut manifest)
            .unwrap();

        assert_eq!(manifest, r#"{"name":"t"}"#);
    }

    #[test]
    fn test_build_archive_is_deterministic() {
        let temp = TempDir::new().unwrap();
        create_test_extension(temp.path());
        let options = ArchiveOptions::default();

        let first = build_archive(temp.path(), &options).unwrap();
        let second = build_archive(temp.path(), &options).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_build_archive_stored_entries() {
        let temp = TempDir::new().unwrap();
        create_test_extension(temp.path());
        let options = ArchiveOptions::default().with_compression(CompressionLevel::NONE);

        let bytes = build_archive(temp.path(), &options).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        for i in 0..archive.len() {
            assert_eq!(
                archive.by_index(i).unwrap().compression(),
                CompressionMethod::Stored
            );
        }
    }

    #[test]
    fn test_build_archive_empty_directory() {
        let temp = TempDir::new().unwrap();

        let bytes = build_archive(temp.path(), &ArchiveOptions::default()).unwrap();

        assert!(entry_names(&bytes).is_empty());
    }

    #[test]
    fn test_build_archive_not_found() {
        let result = build_archive("/nonexistent/extension", &ArchiveOptions::default());
        assert!(matches!(result, Err(Error::ArchiveBuild(_))));
    }

    #[test]
    fn test_build_archive_not_directory() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("manifest.json");
        fs::write(&file_path, b"{}").unwrap();

        let result = build_archive(&file_path, &ArchiveOptions::default());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_compression_level() {
        assert_eq!(CompressionLevel::NONE.level(), 0);
        assert_eq!(CompressionLevel::DEFAULT.level(), 6);
        assert_eq!(CompressionLevel::MAX.level(), 9);
        assert_eq!(CompressionLevel::new(15).level(), 9);
        assert_eq!(CompressionLevel::from(5).level(), 5);
        assert_eq!(ArchiveOptions::default().compression, CompressionLevel::DEFAULT);
    }

    #[test]
    #[cfg(unix)]
    fn test_build_archive_follows_symlinks() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("shared.js"), b"shared").unwrap();
        fs::write(temp.path().join("manifest.json"), b"{}").unwrap();
        symlink(outside.path().join("shared.js"), temp.path().join("shared.js")).unwrap();

        let bytes = build_archive(temp.path(), &ArchiveOptions::default()).unwrap();

        assert_eq!(entry_names(&bytes), vec!["manifest.json", "shared.js"]);
    }
}
