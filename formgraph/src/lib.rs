#![doc = include_str!("../README.md")]

// Re-export the document model from formgraph-types
pub use formgraph_types::*;

mod config;
pub use config::{ConfigError, EditorConfig};

// Structural mutators
mod editor;
pub use editor::FormEditor;

pub mod evaluate;
pub mod guard;
pub mod likert;

// In-memory store for testing persistence without a backend
mod memory_store;
pub use memory_store::{MemoryStore, StoreError};
