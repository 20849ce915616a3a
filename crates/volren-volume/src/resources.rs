//! Named resource lookup (archives, image slices, preset documents).

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use volren_core::{Result, VolrenError};

/// A source of named binary resources, such as an application bundle.
pub trait ResourceProvider {
    /// Reads the whole resource into memory.
    fn fetch(&self, name: &str) -> Result<Vec<u8>>;
}

impl<R: ResourceProvider + ?Sized> ResourceProvider for &R {
    fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        (**self).fetch(name)
    }
}

impl<R: ResourceProvider + ?Sized> ResourceProvider for Box<R> {
    fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        (**self).fetch(name)
    }
}

/// Resources stored as files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    /// Creates a provider rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_of(&self, name: &str) -> Result<PathBuf> {
        // Names are flat keys; refuse anything that would escape the root.
        if name.is_empty() || name.contains("..") || name.starts_with('/') {
            return Err(VolrenError::ResourceNotFound(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

impl ResourceProvider for DirectoryResources {
    fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path_of(name)?;
        std::fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => VolrenError::ResourceNotFound(name.to_string()),
            _ => VolrenError::Io(e),
        })
    }
}

/// Resources held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryResources {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a resource.
    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> &mut Self {
        self.entries.insert(name.into(), bytes);
        self
    }

    /// Removes a resource.
    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.entries.remove(name)
    }
}

impl ResourceProvider for MemoryResources {
    fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| VolrenError::ResourceNotFound(name.to_string()))
    }
}
