// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Memo document storage.
//!
//! Stores attach an uploaded document and hand back an opaque reference that
//! is saved on the memo. The workflow fetches it again when building a decline
//! notification and removes it if the memo insert fails.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::validate::sanitize_file_name;

/// Directory (and reference prefix) documents are stored under.
pub const DOCUMENT_DIR: &str = "memos";

/// An uploaded document as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Upload {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// Capability for persisting memo documents.
pub trait DocumentStore: Send {
    /// Store the upload and return its reference.
    fn put(&mut self, upload: &Upload) -> Result<String>;

    /// Fetch the bytes previously stored under `reference`.
    fn get(&self, reference: &str) -> Result<Vec<u8>>;

    /// Delete a stored document. Missing documents are not an error.
    fn remove(&mut self, reference: &str) -> Result<()>;
}

/// Build a reference of the form `memos/{hash}-{name}`.
///
/// The hash is the first 12 hex chars of SHA256(content + timestamp), so two
/// uploads of the same file at different instants get distinct references.
pub fn document_ref(upload: &Upload, stored_at: &DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(&upload.bytes);
    hasher.update(stored_at.to_rfc3339().as_bytes());
    let hash = hasher.finalize();
    format!(
        "{}/{}-{}",
        DOCUMENT_DIR,
        hex::encode(&hash[..6]),
        sanitize_file_name(&upload.file_name)
    )
}

/// Documents kept as plain files under a root directory.
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    /// Create a store rooted at `root`, creating the document directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(root.join(DOCUMENT_DIR))
            .map_err(|e| Error::Storage(format!("cannot create {}: {e}", root.display())))?;
        Ok(FsDocumentStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a reference to a path, refusing anything outside the root.
    fn path_for(&self, reference: &str) -> Result<PathBuf> {
        let relative = Path::new(reference);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if reference.is_empty() || escapes {
            return Err(Error::DocumentNotFound(reference.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl DocumentStore for FsDocumentStore {
    fn put(&mut self, upload: &Upload) -> Result<String> {
        let mut reference = document_ref(upload, &Utc::now());
        let mut suffix = 2;
        while self.path_for(&reference)?.exists() {
            reference = format!("{}-{}", document_ref(upload, &Utc::now()), suffix);
            suffix += 1;
        }
        let path = self.path_for(&reference)?;
        std::fs::write(&path, &upload.bytes)
            .map_err(|e| Error::Storage(format!("cannot write {}: {e}", path.display())))?;
        Ok(reference)
    }

    fn get(&self, reference: &str) -> Result<Vec<u8>> {
        let path = self.path_for(reference)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::DocumentNotFound(reference.to_string()))
            }
            Err(e) => Err(Error::Storage(format!("cannot read {}: {e}", path.display()))),
        }
    }

    fn remove(&mut self, reference: &str) -> Result<()> {
        let path = self.path_for(reference)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Storage(format!(
                "cannot remove {}: {e}",
                path.display()
            ))),
        }
    }
}

/// In-process store, used by tests and ephemeral setups.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: HashMap<String, Vec<u8>>,
    fail_writes: bool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` fail with a storage error.
    pub fn failing() -> Self {
        MemoryDocumentStore {
            documents: HashMap::new(),
            fail_writes: true,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn put(&mut self, upload: &Upload) -> Result<String> {
        if self.fail_writes {
            return Err(Error::Storage("document store unavailable".to_string()));
        }
        let mut reference = document_ref(upload, &Utc::now());
        if self.documents.contains_key(&reference) {
            reference = format!("{reference}-{}", self.documents.len() + 1);
        }
        self.documents
            .insert(reference.clone(), upload.bytes.clone());
        Ok(reference)
    }

    fn get(&self, reference: &str) -> Result<Vec<u8>> {
        self.documents
            .get(reference)
            .cloned()
            .ok_or_else(|| Error::DocumentNotFound(reference.to_string()))
    }

    fn remove(&mut self, reference: &str) -> Result<()> {
        self.documents.remove(reference);
        Ok(())
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
