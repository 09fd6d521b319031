//! Value storage for Fieldkit
//!
//! Field values live in one of three places depending on the context they
//! belong to: post-scoped meta, term-scoped meta, or flat settings options.
//! [`ContextRouter`] picks the backend for a context and turns "nothing
//! stored" into the caller's default on reads.
//!
//! Two backend families are provided: in-memory maps for tests and embedding,
//! and YAML files on disk.

pub mod backend;
pub mod error;
pub mod router;
pub mod yaml;

pub use backend::{MemoryMetaStore, MemoryOptionStore, MetaStore, OptionStore};
pub use error::{Result, StoreError};
pub use router::ContextRouter;
pub use yaml::{YamlMetaStore, YamlOptionStore};
