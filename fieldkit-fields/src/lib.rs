//! Field types, registry and validation
//!
//! `fieldkit-fields` is the storage-agnostic half of Fieldkit. It knows how to
//! turn a declarative [`FieldConfig`] into a live field, how that field
//! renders, sanitizes and validates a value, and where the value would live in
//! a given [`Context`]. It never reads or writes values itself.
//!
//! # Architecture
//!
//! - **Closed leaf/container split**: [`FieldInstance`] is either a leaf that
//!   owns one value or a container that organizes nested declarations
//! - **Explicit registry**: [`Registry`] maps type tags to constructors and
//!   seeds the built-ins lazily, keeping host registrations made beforehand
//! - **Pre-order expansion**: [`for_each_leaf`] visits nested leaves in
//!   declaration order, skipping broken nested entries

pub mod builtin;
pub mod context;
pub mod error;
pub mod expand;
pub mod field;
pub mod registry;
pub mod sanitize;
pub mod types;
pub mod validation;

pub use context::{option_name, Context, ContextType, StorageKey};
pub use error::{FieldsError, Result};
pub use expand::{expand, expanded, for_each_leaf, leaves, ExpandedLeaf};
pub use field::{
    AssetQueue, Capability, ChildRenderer, ContainerField, Field, FieldInstance, RenderedChild,
    RowBounds,
};
pub use registry::{Constructor, FieldTypeDef, Registry};
pub use types::{FieldConfig, SelectOption, ValidationResult};
pub use validation::{is_empty_value, validate_value, Rule};
