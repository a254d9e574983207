//! # CRD Module
//!
//! Parsing of CustomResourceDefinition-shaped schema documents into an
//! immutable [`SchemaNode`] tree per declared version.
//!
//! ```rust
//! use crd_typegen::crd::{parse_str, select_version};
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
//!             spec: {type: object, properties: {size: {type: integer}}}
//! "#;
//! let (kind, versions) = parse_str(doc)?;
//! let v1 = select_version(&kind, versions, "")?;
//! assert_eq!(v1.version, "v1");
//! # Ok::<(), crd_typegen::GenerateError>(())
//! ```

mod load;
pub(crate) mod types;

pub use load::*;
pub use types::{AdditionalProperties, SchemaKind, SchemaNode, VersionedResource};
