//! Item data model for the tycoon engine.
//!
//! Item data is an opaque `serde_json::Value` as far as the engine is
//! concerned. This crate holds everything that looks inside it:
//! - [`ItemSchema`]: declares the fields an item kind's data must carry
//! - [`DataGuard`]: the validator an item kind registers (schema, serde type, or closure)
//! - [`reconcile`]: additive repair of drifted data against a fresh template

mod guard;
mod reconcile;
mod schema;

pub use guard::DataGuard;
pub use reconcile::reconcile;
pub use schema::{FieldType, ItemSchema, SchemaError, SchemaField};
