// src/mirror.rs

//! Single-file copy with destination preparation.

use std::io::{self, Write};
use std::path::Path;

use tracing::debug;

use crate::errors::CopyError;
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::CopyStage;

/// Trait abstracting how one source is mirrored to its destination.
///
/// Production code uses [`FileMirror`]; tests can substitute an
/// implementation that only records what it was asked to copy.
pub trait Mirror: Send {
    /// Copy `source` over `destination`, returning the number of bytes
    /// written.
    fn mirror(&mut self, source: &Path, destination: &Path) -> Result<u64, CopyError>;
}

/// Whole-file copier over a [`FileSystem`].
///
/// Steps, each mapped to a [`CopyStage`] on failure:
/// 1. open the source,
/// 2. remove an existing destination, or create its missing parents,
/// 3. create the destination,
/// 4. stream all bytes across.
///
/// Both handles are dropped on every return path. A failure during the
/// stream step may leave a truncated destination behind.
#[derive(Debug, Clone, Default)]
pub struct FileMirror<F: FileSystem = RealFileSystem> {
    fs: F,
}

impl FileMirror<RealFileSystem> {
    pub fn new() -> Self {
        Self { fs: RealFileSystem }
    }
}

impl<F: FileSystem> FileMirror<F> {
    pub fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    pub fn copy(&self, source: &Path, destination: &Path) -> Result<u64, CopyError> {
        let at = move |stage: CopyStage| {
            move |cause: io::Error| CopyError::new(stage, source, destination, cause)
        };

        let mut reader = self
            .fs
            .open_read(source)
            .map_err(at(CopyStage::OpenSource))?;

        if self.fs.exists(destination) {
            self.fs
                .remove_file(destination)
                .map_err(at(CopyStage::RemoveDest))?;
        } else if let Some(parent) = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            self.fs
                .create_dir_all(parent)
                .map_err(at(CopyStage::Mkdir))?;
        }

        let mut writer = self
            .fs
            .create(destination)
            .map_err(at(CopyStage::CreateDest))?;

        let bytes = io::copy(&mut reader, &mut writer).map_err(at(CopyStage::Copy))?;
        writer.flush().map_err(at(CopyStage::Copy))?;

        debug!(
            source = %source.display(),
            destination = %destination.display(),
            bytes,
            "mirrored file"
        );
        Ok(bytes)
    }
}

impl<F: FileSystem> Mirror for FileMirror<F> {
    fn mirror(&mut self, source: &Path, destination: &Path) -> Result<u64, CopyError> {
        self.copy(source, destination)
    }
}
