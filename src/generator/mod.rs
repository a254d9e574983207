//! # Generator Module
//!
//! Turns resource-schema documents into Go struct declarations.
//!
//! ## Overview
//!
//! ```text
//! Schema document → Parser → Builder ⇄ Type Registry → Emitter → text
//!                                      ↑
//!                                   Seeder
//! ```
//!
//! 1. **Parser** ([`crate::crd`]) - decodes the document and selects a version
//! 2. **Seeder** ([`seed`]) - pre-registers types that already exist in the
//!    target code base and the built-in overrides (timestamps, raw JSON,
//!    int-or-string)
//! 3. **Builder** ([`TypeBuilder`]) - walks the schema and mints types, asking
//!    the registry for a name for every struct and array
//! 4. **Registry** ([`TypeRegistry`]) - deduplicates by structural signature
//!    and synthesizes collision-free names from the ancestor chain
//! 5. **Emitter** ([`Emitter`]) - renders the root declaration and every
//!    struct not declared yet, using the Askama templates in `templates/`
//!
//! ## Usage
//!
//! ```rust
//! use crd_typegen::generator::{generate_str, seeded_registry};
//!
//! let doc = r#"
//! apiVersion: apiextensions.k8s.io/v1
//! kind: CustomResourceDefinition
//! spec:
//!   names: {kind: Widget}
//!   versions:
//!     - name: v1
//!       schema:
//!         openAPIV3Schema:
//!           type: object
//!           properties:
//!             spec:
//!               type: object
//!               required: [name]
//!               properties:
//!                 name: {type: string}
//! "#;
//! let mut registry = seeded_registry(Default::default())?;
//! let out = generate_str(doc, "", &mut registry)?;
//! assert!(out.text.contains("type WidgetSpec struct {\n\tName string `json:\"name\"`\n}"));
//! # Ok::<(), crd_typegen::GenerateError>(())
//! ```
//!
//! ## Naming
//!
//! - Object properties become exported fields, in lexicographic key order
//! - A nested struct is named after its property; on collision the nearest
//!   free ancestor prefix is used (`Spec` → `GroupSpec` → `RootSpec`)
//! - Arrays are named `<Element>List`, maps `<Element>Map`
//! - Structurally equal structs share one declaration

mod build;
mod config;
mod emit;
mod project;
mod registry;
pub mod seed;
mod types;

pub use build::TypeBuilder;
pub use config::*;
pub use emit::{render_struct, wrap_file, Emitter};
pub use project::*;
pub use registry::TypeRegistry;
pub use types::{exported_name, is_exported, Field, ImportBinding, Type, TypeKind};
