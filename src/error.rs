//! Error taxonomy for schema parsing, type building and emission.
//!
//! Every variant is terminal for the document being processed. Nothing is
//! retried internally and a failed document aborts the whole stream.

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T, E = GenerateError> = std::result::Result<T, E>;

/// Errors produced while turning a resource-schema document into declarations
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The input is not well-formed structured data (YAML or JSON)
    #[error("failed to decode schema document: {0}")]
    Decode(#[from] serde_yaml::Error),

    /// The document declares no schema versions at all
    #[error("kind {kind} declares no versions")]
    NoVersions {
        /// Resource kind name
        kind: String,
    },

    /// A non-empty version was requested that the document does not declare
    #[error("kind {kind} has no version {requested:?} (declared: {})", .declared.join(", "))]
    VersionNotFound {
        /// Resource kind name
        kind: String,
        /// Version name that was asked for
        requested: String,
        /// Versions the document actually declares, in declaration order
        declared: Vec<String>,
    },

    /// An array schema node has no `items` schema
    #[error("array {field} under {} has no items schema", display_chain(.ancestors))]
    MissingItems {
        /// Candidate name of the array being built
        field: String,
        /// Enclosing type names, root first
        ancestors: Vec<String>,
    },

    /// A schema node kind outside object/array/string/integer/number/boolean
    #[error("unsupported schema type {kind:?} for {field} under {}", display_chain(.ancestors))]
    UnsupportedKind {
        /// The offending `type` value (empty when absent)
        kind: String,
        /// Candidate name of the node being built
        field: String,
        /// Enclosing type names, root first
        ancestors: Vec<String>,
    },

    /// A known shape could not be translated into a type
    #[error("cannot translate known type {name}: unsupported shape {shape}")]
    UnsupportedShape {
        /// Name of the known type (or field) being translated
        name: String,
        /// Description of the shape that was rejected
        shape: String,
    },

    /// No free exported name was found after trying every ancestor prefix
    #[error("no free type name for {field} after trying ancestors {}", display_chain(.ancestors))]
    NameExhausted {
        /// Candidate name of the field type
        field: String,
        /// Enclosing type names, root first
        ancestors: Vec<String>,
    },

    /// Two property keys of one object map to the same exported field name
    #[error(
        "properties {first:?} and {second:?} of {} both map to field {name}",
        display_chain(.ancestors)
    )]
    DuplicateField {
        /// The shared exported field name
        name: String,
        /// Key that claimed the name first (lexicographically smaller)
        first: String,
        /// Key that clashed with it
        second: String,
        /// Enclosing type names, root first, ending with the object itself
        ancestors: Vec<String>,
    },

    /// A type name handed to the registry was not exported (capitalized)
    #[error("type name {0:?} is not exported")]
    UnexportedName(String),

    /// Reading the input stream or writing the output sink failed
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendering a declaration template failed
    #[error("failed to render declaration: {0}")]
    Template(#[from] askama::Error),
}

fn display_chain(ancestors: &[String]) -> String {
    if ancestors.is_empty() {
        "<root>".to_string()
    } else {
        ancestors.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_not_found_names_requested_and_declared() {
        let err = GenerateError::VersionNotFound {
            kind: "AtlasProject".to_string(),
            requested: "v2".to_string(),
            declared: vec!["v1".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("AtlasProject"));
        assert!(msg.contains("\"v2\""));
        assert!(msg.contains("v1"));
    }

    #[test]
    fn duplicate_field_names_both_keys() {
        let err = GenerateError::DuplicateField {
            name: "FooBar".to_string(),
            first: "foo-bar".to_string(),
            second: "fooBar".to_string(),
            ancestors: vec!["Widget".to_string(), "WidgetSpec".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "properties \"foo-bar\" and \"fooBar\" of Widget.WidgetSpec both map to field FooBar"
        );
    }

    #[test]
    fn empty_ancestor_chain_is_shown_as_root() {
        let err = GenerateError::NameExhausted {
            field: "FooSpec".to_string(),
            ancestors: vec![],
        };
        assert_eq!(
            err.to_string(),
            "no free type name for FooSpec after trying ancestors <root>"
        );
    }
}
