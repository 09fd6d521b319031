//! Fieldkit
//!
//! Declarative typed fields for content hosts. A host describes its resources
//! and their fields in a [`Document`]; Fieldkit renders the fields as form
//! markup, runs submissions through filters, sanitizers and validators, and
//! persists the clean values under the storage key each field derives for its
//! context.
//!
//! ```no_run
//! use fieldkit::{Context, ContextRouter, Document, FormRenderer, Registry, SavePipeline, Submission};
//! use serde_json::json;
//!
//! # fn main() -> fieldkit::Result<()> {
//! let doc = Document::from_yaml_str(
//!     "cpts:\n  - id: product\n    fields:\n      - { name: price, type: number }\n",
//! )?;
//! let registry = Registry::new();
//! doc.validate(&registry)?;
//!
//! let (_, product) = doc.resource("product")?;
//! let mut router = ContextRouter::in_memory();
//! let context = Context::post(42);
//!
//! let mut submission = Submission::new();
//! submission.insert("price".into(), json!("19.99"));
//! let report = SavePipeline::new(&registry).save(&product.fields, &submission, &context, &mut router)?;
//! assert!(report.is_ok());
//!
//! let form = FormRenderer::new(&registry, &router).render(&product.fields, &context)?;
//! println!("{}", form.html);
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod renderer;

pub use document::{
    Collision, Document, FieldSet, MemoryRegistrar, RegistrationReport, ResourceDecl,
    ResourceKind, ResourceRegistrar, SchemaValidator, ShapeValidator,
};
pub use error::{FieldkitError, Result};
pub use filter::{FieldFilter, FilterOutcome, Filters, GlobalFilter};
pub use pipeline::{FieldError, SavePipeline, SaveReport, Submission};
pub use renderer::{FormRenderer, RenderedForm};

pub use fieldkit_fields::{Context, ContextType, FieldConfig, Registry, StorageKey};
pub use fieldkit_store::ContextRouter;
