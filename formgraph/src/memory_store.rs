//! In-memory store for testing persistence without a backend.
//!
//! `MemoryStore` keeps every document as serialized JSON, so saving and
//! loading exercises the same wire format a remote store would see.
//!
//! # Example
//!
//! ```rust
//! use formgraph::{Form, FormEditor, FormStore, MemoryStore};
//!
//! let editor = FormEditor::new();
//! let mut store = MemoryStore::new();
//!
//! let form = editor.add_section(&Form::new("Feedback"));
//! store.save(&form).unwrap();
//!
//! assert_eq!(store.load(&form.form_id).unwrap(), form);
//! ```

use std::collections::HashMap;

use crate::{Form, FormId, FormStore};

/// A store that keeps form documents in a map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: HashMap<FormId, String>,
}

/// Error type for MemoryStore.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No form stored with id {0}")]
    Missing(FormId),

    #[error("Stored document could not be encoded or decoded: {0}")]
    Codec(#[from] serde_json::Error),
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
        }
    }

    /// Seed the store with a document, returning the store for chaining.
    pub fn with_form(mut self, form: &Form) -> Result<Self, StoreError> {
        self.save(form)?;
        Ok(self)
    }

    /// Check whether a document with this id is stored.
    pub fn contains(&self, form_id: &FormId) -> bool {
        self.documents.contains_key(form_id)
    }

    /// The raw JSON stored for a document.
    pub fn raw(&self, form_id: &FormId) -> Option<&str> {
        self.documents.get(form_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FormStore for MemoryStore {
    type Error = StoreError;

    fn load(&self, form_id: &FormId) -> Result<Form, Self::Error> {
        let json = self
            .documents
            .get(form_id)
            .ok_or(StoreError::Missing(*form_id))?;
        Ok(serde_json::from_str(json)?)
    }

    fn save(&mut self, form: &Form) -> Result<(), Self::Error> {
        let json = serde_json::to_string(form)?;
        self.documents.insert(form.form_id, json);
        Ok(())
    }

    fn delete(&mut self, form_id: &FormId) -> Result<(), Self::Error> {
        self.documents
            .remove(form_id)
            .map(|_| ())
            .ok_or(StoreError::Missing(*form_id))
    }
}
