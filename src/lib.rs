//! # crd-typegen
//!
//! **crd-typegen** turns CustomResourceDefinition-shaped schema documents into
//! Go struct declarations, deduplicating structurally equal types and giving
//! every generated type a collision-free exported name.
//!
//! ## Architecture
//!
//! - **[`crd`]** - Schema document decoding, version selection, multi-document splitting
//! - **[`generator`]** - Type model, registry, seeding of known types, builder and emitter
//! - **[`error`]** - The [`GenerateError`] taxonomy shared by every stage
//! - **[`logging`]** - `tracing` subscriber setup for the binary
//! - **[`cli`]** - The `crd-typegen` command line
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(crd-typegen)
//!     participant Crd as crd::parse
//!     participant Builder as generator::TypeBuilder
//!     participant Registry as generator::TypeRegistry
//!     participant Emitter as generator::Emitter
//!
//!     CLI->>Registry: seeded_registry(renames)
//!     loop every document
//!         CLI->>Crd: parse + select_version
//!         Crd-->>CLI: VersionedResource
//!         CLI->>Builder: build_root(spec / status)
//!         Builder->>Registry: resolve_field_type(candidate, ancestors)
//!         Registry-->>Builder: canonical Rc<Type>
//!         CLI->>Emitter: emit(kind, spec, status)
//!         Emitter->>Registry: was_generated / mark_generated
//!         Emitter-->>CLI: declarations
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use crd_typegen::generator::{generate_stream, seeded_registry};
//!
//! let input = r#"
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
//!               properties:
//!                 labels:
//!                   type: object
//!                   additionalProperties: {type: string}
//! "#;
//! let mut registry = seeded_registry(Default::default())?;
//! let mut out = Vec::new();
//! let summary = generate_stream(input.as_bytes(), &mut out, "", &mut registry)?;
//! assert_eq!(summary.documents(), 1);
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.contains("Labels map[string]string `json:\"labels,omitempty\"`"));
//! # Ok::<(), crd_typegen::GenerateError>(())
//! ```
//!
//! ## Threading
//!
//! A [`generator::TypeRegistry`] shares types through `Rc` and is owned by
//! one run. Parallel callers build one seeded registry per worker.

pub mod cli;
pub mod crd;
pub mod error;
pub mod generator;
pub mod logging;

pub use error::{GenerateError, Result};
