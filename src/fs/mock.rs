// src/fs/mock.rs

use super::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir,
}

/// Operation on which a failure can be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    Open,
    /// `open_read` succeeds but the first read fails.
    Read,
    Remove,
    CreateDir,
    Create,
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    failures: HashSet<(MockOp, PathBuf)>,
}

/// In-memory filesystem with failure injection.
///
/// Paths are used verbatim; tests are expected to pass absolute paths.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let fs = Self::default();
        fs.state
            .lock()
            .unwrap()
            .entries
            .insert(PathBuf::from("/"), MockEntry::Dir);
        fs
    }

    /// Add a file, creating its parent directories implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut state = self.state.lock().unwrap();
        if let Some(parent) = path.parent() {
            insert_dirs(&mut state.entries, parent);
        }
        state
            .entries
            .insert(path.to_path_buf(), MockEntry::File(content.into()));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        insert_dirs(&mut state.entries, path.as_ref());
    }

    /// Contents of a file, or `None` if it is missing or a directory.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let state = self.state.lock().unwrap();
        match state.entries.get(path.as_ref()) {
            Some(MockEntry::File(bytes)) => Some(bytes.clone()),
            _ => None,
        }
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        let state = self.state.lock().unwrap();
        matches!(state.entries.get(path.as_ref()), Some(MockEntry::Dir))
    }

    /// Make `op` fail on `path` until [`clear_failures`](Self::clear_failures).
    pub fn fail_on(&self, op: MockOp, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.failures.insert((op, path.as_ref().to_path_buf()));
    }

    pub fn clear_failures(&self) {
        self.state.lock().unwrap().failures.clear();
    }

    fn injected(&self, op: MockOp, path: &Path) -> io::Result<()> {
        let state = self.state.lock().unwrap();
        if state.failures.contains(&(op, path.to_path_buf())) {
            return Err(io::Error::other(format!(
                "injected {op:?} failure on {}",
                path.display()
            )));
        }
        Ok(())
    }
}

fn insert_dirs(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            continue;
        }
        entries
            .entry(ancestor.to_path_buf())
            .or_insert(MockEntry::Dir);
    }
}

/// Reader that fails on first use, for mid-transfer errors.
struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("injected read failure"))
    }
}

/// Writer that appends into the shared mock state.
struct MockWriter {
    path: PathBuf,
    state: Arc<Mutex<MockState>>,
}

impl Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap();
        match state.entries.get_mut(&self.path) {
            Some(MockEntry::File(bytes)) => {
                bytes.extend_from_slice(buf);
                Ok(buf.len())
            }
            _ => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} vanished while writing", self.path.display()),
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl FileSystem for MockFileSystem {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        self.injected(MockOp::Open, path)?;
        if self.injected(MockOp::Read, path).is_err() {
            return Ok(Box::new(FailingReader));
        }
        let state = self.state.lock().unwrap();
        match state.entries.get(path) {
            Some(MockEntry::File(content)) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(MockEntry::Dir) => Err(io::Error::other(format!(
                "is a directory: {}",
                path.display()
            ))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.state.lock().unwrap().entries.contains_key(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.injected(MockOp::Remove, path)?;
        let mut state = self.state.lock().unwrap();
        match state.entries.get(path) {
            Some(MockEntry::File(_)) => {
                state.entries.remove(path);
                Ok(())
            }
            Some(MockEntry::Dir) => Err(io::Error::other(format!(
                "is a directory: {}",
                path.display()
            ))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )),
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.injected(MockOp::CreateDir, path)?;
        let mut state = self.state.lock().unwrap();
        if let Some(MockEntry::File(_)) = state.entries.get(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("not a directory: {}", path.display()),
            ));
        }
        insert_dirs(&mut state.entries, path);
        Ok(())
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        self.injected(MockOp::Create, path)?;
        let mut state = self.state.lock().unwrap();

        let parent_is_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                matches!(state.entries.get(parent), Some(MockEntry::Dir))
            }
            _ => true,
        };
        if !parent_is_dir {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("parent directory missing for {}", path.display()),
            ));
        }

        state
            .entries
            .insert(path.to_path_buf(), MockEntry::File(Vec::new()));
        Ok(Box::new(MockWriter {
            path: path.to_path_buf(),
            state: Arc::clone(&self.state),
        }))
    }
}
