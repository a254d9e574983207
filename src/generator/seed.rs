//! Seeding of pre-existing host-language types.
//!
//! A handful of record types already exist in the target code base (a
//! namespaced resource reference, a local reference, a status condition).
//! They are described here as static [`Shape`] tables, translated into
//! [`Type`]s and registered before any schema is processed, so that schema
//! nodes shaped like them bind to the existing type instead of minting a
//! duplicate declaration.
//!
//! Well-known library types (timestamps, raw JSON, int-or-string) are not
//! expanded field by field: the built-in override table maps them straight to
//! opaque types carrying their import binding.

use super::registry::TypeRegistry;
use super::types::{exported_name, Field, ImportBinding, Type};
use crate::error::{GenerateError, Result};
use std::rc::Rc;
use tracing::debug;

pub const METAV1_PATH: &str = "k8s.io/apimachinery/pkg/apis/meta/v1";
pub const APIEXTENSIONS_PATH: &str = "k8s.io/apiextensions-apiserver/pkg/apis/apiextensions/v1";
pub const INTSTR_PATH: &str = "k8s.io/apimachinery/pkg/util/intstr";
pub const API_PATH: &str = "github.com/mongodb/mongodb-atlas-kubernetes/v2/api";

/// Format alias of the timestamp built-in
pub const DATE_TIME: &str = "date-time";
/// Alias of the opaque raw/any built-in
pub const RAW: &str = "raw";
/// Alias of the int-or-string built-in
pub const INT_OR_STRING: &str = "int-or-string";

/// Description of an existing host-language type
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Struct(&'static KnownStruct),
    Slice(&'static Shape),
    String,
    Int,
    Uint,
    Float,
    Bool,
    /// Reference to an entry of the built-in override table, by alias
    Builtin(&'static str),
    /// A construct with no schema counterpart (complex numbers, functions,
    /// channels...). Translating it always fails.
    Other(&'static str),
}

/// A struct declared in an existing package
#[derive(Debug)]
pub struct KnownStruct {
    pub name: &'static str,
    pub package: &'static str,
    pub path: &'static str,
    pub fields: &'static [KnownField],
}

/// One field of a [`KnownStruct`]
#[derive(Debug)]
pub struct KnownField {
    /// Serialization key
    pub key: &'static str,
    pub required: bool,
    pub shape: Shape,
}

/// One entry of the built-in override table
#[derive(Debug)]
pub struct Builtin {
    pub alias: &'static str,
    pub name: &'static str,
    pub package: &'static str,
    pub path: &'static str,
}

/// Well-known library types mapped directly to opaque types
pub static BUILTINS: &[Builtin] = &[
    Builtin {
        alias: DATE_TIME,
        name: "Time",
        package: "metav1",
        path: METAV1_PATH,
    },
    Builtin {
        alias: RAW,
        name: "JSON",
        package: "apiextensionsv1",
        path: APIEXTENSIONS_PATH,
    },
    Builtin {
        alias: INT_OR_STRING,
        name: "IntOrString",
        package: "intstr",
        path: INTSTR_PATH,
    },
];

pub static RESOURCE_REF_NAMESPACED: KnownStruct = KnownStruct {
    name: "ResourceRefNamespaced",
    package: "api",
    path: API_PATH,
    fields: &[
        KnownField {
            key: "name",
            required: true,
            shape: Shape::String,
        },
        KnownField {
            key: "namespace",
            required: false,
            shape: Shape::String,
        },
    ],
};

pub static LOCAL_OBJECT_REFERENCE: KnownStruct = KnownStruct {
    name: "LocalObjectReference",
    package: "api",
    path: API_PATH,
    fields: &[KnownField {
        key: "name",
        required: true,
        shape: Shape::String,
    }],
};

pub static CONDITION: KnownStruct = KnownStruct {
    name: "Condition",
    package: "api",
    path: API_PATH,
    fields: &[
        KnownField {
            key: "type",
            required: true,
            shape: Shape::String,
        },
        KnownField {
            key: "status",
            required: true,
            shape: Shape::String,
        },
        KnownField {
            key: "lastTransitionTime",
            required: false,
            shape: Shape::Builtin(DATE_TIME),
        },
        KnownField {
            key: "reason",
            required: false,
            shape: Shape::String,
        },
        KnownField {
            key: "message",
            required: false,
            shape: Shape::String,
        },
    ],
};

/// Existing record types seeded into every registry
pub static KNOWN_TYPES: &[Shape] = &[
    Shape::Struct(&RESOURCE_REF_NAMESPACED),
    Shape::Struct(&LOCAL_OBJECT_REFERENCE),
    Shape::Struct(&CONDITION),
];

fn builtin_type(builtin: &Builtin) -> Type {
    Type::opaque(
        builtin.name,
        ImportBinding::new(builtin.package, builtin.path),
    )
}

/// Translate an existing type description into a [`Type`].
///
/// Structs and slices recurse; primitives are matched by kind; built-in
/// references resolve through [`BUILTINS`]. Anything else fails with
/// [`GenerateError::UnsupportedShape`].
pub fn type_from_existing(shape: &Shape) -> Result<Type> {
    match shape {
        Shape::Struct(known) => {
            let fields = known
                .fields
                .iter()
                .map(|f| {
                    let ty = type_from_existing(&f.shape).map_err(|e| match e {
                        GenerateError::UnsupportedShape { shape, .. } => {
                            GenerateError::UnsupportedShape {
                                name: format!("{}.{}", known.name, f.key),
                                shape,
                            }
                        }
                        other => other,
                    })?;
                    Ok(Field {
                        exported_name: exported_name(f.key),
                        source_key: f.key.to_string(),
                        required: f.required,
                        comment: None,
                        ty: Rc::new(ty),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Type::structure(known.name, fields)
                .with_import(ImportBinding::new(known.package, known.path)))
        }
        Shape::Slice(element) => {
            let element = type_from_existing(element)?;
            let name = format!("{}List", exported_name(element.name()));
            Ok(Type::array(name, Rc::new(element)))
        }
        Shape::String => Ok(Type::primitive("string")),
        Shape::Int => Ok(Type::primitive("int")),
        Shape::Uint => Ok(Type::primitive("uint")),
        Shape::Float => Ok(Type::primitive("float64")),
        Shape::Bool => Ok(Type::primitive("bool")),
        Shape::Builtin(alias) => BUILTINS
            .iter()
            .find(|b| b.alias == *alias)
            .map(builtin_type)
            .ok_or_else(|| GenerateError::UnsupportedShape {
                name: (*alias).to_string(),
                shape: "unknown built-in".to_string(),
            }),
        Shape::Other(what) => Err(GenerateError::UnsupportedShape {
            name: (*what).to_string(),
            shape: (*what).to_string(),
        }),
    }
}

/// Seed `registry` with the built-in overrides and the given known types.
///
/// Known types are registered and marked generated: they already exist and
/// are never declared again.
pub fn seed_with(registry: &mut TypeRegistry, known: &[Shape]) -> Result<()> {
    for builtin in BUILTINS {
        registry.add_builtin(builtin.alias, builtin_type(builtin));
    }
    for shape in known {
        let ty = type_from_existing(shape)?;
        debug!(name = ty.name(), signature = ty.signature(), "seeding known type");
        let ty = registry.add(ty)?;
        registry.mark_generated(&ty);
    }
    Ok(())
}

/// Seed `registry` with the built-in overrides and [`KNOWN_TYPES`]
pub fn seed(registry: &mut TypeRegistry) -> Result<()> {
    seed_with(registry, KNOWN_TYPES)
}
