// src/registry.rs

//! Source -> destination mapping established once at startup.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::errors::{Result, SyncerError};

/// One watched source and the place it is mirrored to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapping {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Immutable, validated set of [`PathMapping`]s.
///
/// Mappings keep their configuration order (used for startup logging and
/// watch registration); lookups go through a hash index.
#[derive(Debug, Clone)]
pub struct PathRegistry {
    mappings: Vec<PathMapping>,
    index: HashMap<PathBuf, usize>,
}

impl PathRegistry {
    /// Build a registry from `(source, destination)` pairs.
    ///
    /// Rejects:
    /// - an empty list (at least one mapping is required),
    /// - empty or relative paths,
    /// - a source that appears twice,
    /// - a source mapped onto itself,
    /// - a destination that is also a registered source.
    ///
    /// Paths are normalized lexically (`.` and `..` removed) before any of
    /// these checks, and are stored in that form.
    pub fn from_pairs<I, S, D>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, D)>,
        S: Into<PathBuf>,
        D: Into<PathBuf>,
    {
        let mut mappings = Vec::new();
        let mut index = HashMap::new();

        for (source, destination) in pairs {
            let source: PathBuf = source.into();
            let destination: PathBuf = destination.into();
            let source = normalize(check_path("source", &source)?);
            let destination = normalize(check_path("destination", &destination)?);

            if source == destination {
                return Err(SyncerError::ConfigError(format!(
                    "source {} is mapped onto itself",
                    source.display()
                )));
            }

            if index.contains_key(&source) {
                return Err(SyncerError::ConfigError(format!(
                    "source {} appears more than once",
                    source.display()
                )));
            }

            index.insert(source.clone(), mappings.len());
            mappings.push(PathMapping {
                source,
                destination,
            });
        }

        // Mirroring into another watched source would replace that file and
        // silently drop its watch.
        if let Some(m) = mappings.iter().find(|m| index.contains_key(&m.destination)) {
            return Err(SyncerError::ConfigError(format!(
                "destination {} of {} is also a watched source",
                m.destination.display(),
                m.source.display()
            )));
        }

        if mappings.is_empty() {
            return Err(SyncerError::ConfigError(
                "at least one source -> destination mapping is required".to_string(),
            ));
        }

        Ok(Self { mappings, index })
    }

    pub fn destination_for(&self, source: &Path) -> Option<&Path> {
        self.index
            .get(source)
            .map(|&i| self.mappings[i].destination.as_path())
    }

    pub fn contains(&self, source: &Path) -> bool {
        self.index.contains_key(source)
    }

    pub fn sources(&self) -> impl Iterator<Item = &Path> {
        self.mappings.iter().map(|m| m.source.as_path())
    }

    pub fn mappings(&self) -> &[PathMapping] {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

fn check_path<'a>(role: &str, path: &'a Path) -> Result<&'a Path> {
    if path.as_os_str().is_empty() {
        return Err(SyncerError::ConfigError(format!("{role} path is empty")));
    }
    if !path.is_absolute() {
        return Err(SyncerError::ConfigError(format!(
            "{role} path {} is not absolute",
            path.display()
        )));
    }
    Ok(path)
}

/// Lexical normalization; `..` at the root stays at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
