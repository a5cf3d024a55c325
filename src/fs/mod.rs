// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

pub mod mock;

/// Abstract filesystem interface.
///
/// Only the operations needed to mirror a file are exposed. Errors stay as
/// raw `io::Error` so callers can attach the stage that failed.
pub trait FileSystem: Send + Sync + Debug {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + Send>>;

    /// True if anything (file, directory or dangling symlink) occupies `path`.
    fn exists(&self, path: &Path) -> bool;

    fn remove_file(&self, path: &Path) -> io::Result<()>;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create (or truncate) `path` for writing. The parent must exist.
    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + Send>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        let file = fs::File::open(path)?;
        Ok(Box::new(file))
    }

    fn exists(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling link at the destination is replaced
        // instead of written through.
        fs::symlink_metadata(path).is_ok()
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        let file = fs::File::create(path)?;
        Ok(Box::new(file))
    }
}
