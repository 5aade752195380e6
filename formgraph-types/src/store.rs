use crate::{Form, FormId};

/// Trait for the persistence collaborator that stores form documents.
///
/// The editing core never persists anything on its own: after each
/// successful mutation the caller decides whether to hand the new document
/// to a store. Implementations decide where documents live (remote API,
/// browser storage, memory) and must store them verbatim.
pub trait FormStore {
    /// The error type for this store.
    type Error: Into<anyhow::Error>;

    /// Load the document with the given id.
    fn load(&self, form_id: &FormId) -> Result<Form, Self::Error>;

    /// Store a document, replacing any earlier version with the same id.
    fn save(&mut self, form: &Form) -> Result<(), Self::Error>;

    /// Remove a document.
    fn delete(&mut self, form_id: &FormId) -> Result<(), Self::Error>;
}
