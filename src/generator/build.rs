use super::registry::TypeRegistry;
use super::seed::{DATE_TIME, INT_OR_STRING, RAW};
use super::types::{exported_name, Field, ImportBinding, Type};
use crate::crd::{AdditionalProperties, SchemaKind, SchemaNode};
use crate::error::{GenerateError, Result};
use std::collections::HashMap;
use std::rc::Rc;

/// Recursive schema-to-type transformation.
///
/// The builder borrows the run's registry mutably for its whole life: every
/// struct or array it mints goes through the registry's name synthesis
/// before it is attached to a field.
pub struct TypeBuilder<'r> {
    registry: &'r mut TypeRegistry,
}

impl<'r> TypeBuilder<'r> {
    pub fn new(registry: &'r mut TypeRegistry) -> Self {
        TypeBuilder { registry }
    }

    /// Build the type for `node`.
    ///
    /// `candidate` is the exported name the type would get if it is a struct;
    /// `ancestors` is the chain of enclosing type names, root first. The
    /// returned type is not registered yet: the caller decides whether it
    /// goes through name synthesis (fields) or is registered under a fixed
    /// name (roots).
    pub fn build_type(
        &mut self,
        node: &SchemaNode,
        candidate: &str,
        ancestors: &[String],
    ) -> Result<Type> {
        if node.int_or_string {
            return Ok(self.builtin(INT_OR_STRING));
        }
        match &node.kind {
            SchemaKind::Object => self.build_object(node, candidate, ancestors),
            SchemaKind::Array => self.build_array(node, candidate, ancestors),
            SchemaKind::String => Ok(self.primitive(node, "string")),
            SchemaKind::Integer => Ok(self.primitive(node, "int")),
            SchemaKind::Number => Ok(self.primitive(node, "float64")),
            SchemaKind::Boolean => Ok(self.primitive(node, "bool")),
            SchemaKind::Other(kind) => Err(GenerateError::UnsupportedKind {
                kind: kind.clone(),
                field: candidate.to_string(),
                ancestors: ancestors.to_vec(),
            }),
        }
    }

    /// Build a root type (`<Kind>Spec`, `<Kind>Status`) and register it under
    /// exactly `name`, bypassing signature reuse.
    pub fn build_root(
        &mut self,
        node: &SchemaNode,
        name: &str,
        ancestors: &[String],
    ) -> Result<Rc<Type>> {
        let ty = self.build_type(node, name, ancestors)?;
        if ty.is_struct() {
            self.registry.add(ty)
        } else {
            Ok(Rc::new(ty))
        }
    }

    fn build_object(
        &mut self,
        node: &SchemaNode,
        candidate: &str,
        ancestors: &[String],
    ) -> Result<Type> {
        if node.free_form {
            return Ok(self.builtin(RAW));
        }
        if let Some(additional) = &node.additional_properties {
            let element = match additional {
                AdditionalProperties::Any => Rc::new(self.builtin(RAW)),
                AdditionalProperties::Schema(values) => {
                    let element = self.build_type(values, candidate, ancestors)?;
                    self.registry.resolve_field_type(element, ancestors)?
                }
            };
            let name = format!("{}Map", exported_name(element.name()));
            return Ok(Type::map(name, element));
        }

        let mut frame = ancestors.to_vec();
        frame.push(candidate.to_string());

        let mut fields = Vec::with_capacity(node.properties.len());
        let mut claimed: HashMap<String, &str> = HashMap::new();
        // BTreeMap iteration: lexicographic by key
        for (key, property) in &node.properties {
            let exported = exported_name(key);
            if let Some(first) = claimed.insert(exported.clone(), key) {
                return Err(GenerateError::DuplicateField {
                    name: exported,
                    first: first.to_string(),
                    second: key.clone(),
                    ancestors: frame,
                });
            }
            let child = self.build_type(property, &exported, &frame)?;
            let ty = self.registry.resolve_field_type(child, &frame)?;
            fields.push(Field {
                exported_name: exported,
                source_key: key.clone(),
                required: node.is_required(key),
                comment: property.description.clone(),
                ty,
            });
        }
        Ok(Type::structure(candidate, fields))
    }

    fn build_array(
        &mut self,
        node: &SchemaNode,
        candidate: &str,
        ancestors: &[String],
    ) -> Result<Type> {
        let items = node
            .items
            .as_deref()
            .ok_or_else(|| GenerateError::MissingItems {
                field: candidate.to_string(),
                ancestors: ancestors.to_vec(),
            })?;
        let element = self.build_type(items, candidate, ancestors)?;
        let element = self.registry.resolve_field_type(element, ancestors)?;
        let name = format!("{}List", exported_name(element.name()));
        Ok(Type::array(name, element))
    }

    /// Format-aware primitive lookup
    fn primitive(&self, node: &SchemaNode, base: &str) -> Type {
        if let Some(format) = node.format.as_deref() {
            // `raw` and `int-or-string` are internal aliases, not formats
            if format == DATE_TIME {
                return self.builtin(DATE_TIME);
            }
            let sized = match (base, format) {
                ("int", "int32") => Some("int32"),
                ("int", "int64") => Some("int64"),
                ("float64", "float") => Some("float32"),
                ("float64", "double") => Some("float64"),
                _ => None,
            };
            if let Some(name) = sized {
                return Type::primitive(name);
            }
        }
        Type::primitive(base)
    }

    fn builtin(&self, alias: &str) -> Type {
        match self.registry.builtin(alias) {
            Some(ty) => Type::clone(&ty),
            None => fallback_builtin(alias),
        }
    }
}

/// Built-ins used when the registry was not seeded
fn fallback_builtin(alias: &str) -> Type {
    use super::seed::{APIEXTENSIONS_PATH, INTSTR_PATH, METAV1_PATH};
    match alias {
        DATE_TIME => Type::opaque("Time", ImportBinding::new("metav1", METAV1_PATH)),
        INT_OR_STRING => Type::opaque("IntOrString", ImportBinding::new("intstr", INTSTR_PATH)),
        _ => Type::opaque("JSON", ImportBinding::new("apiextensionsv1", APIEXTENSIONS_PATH)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::seed::seed;
    use crate::generator::types::TypeKind;

    fn node(yaml: &str) -> SchemaNode {
        let raw: crate::crd::types::RawSchema = serde_yaml::from_str(yaml).unwrap();
        raw.into_node()
    }

    fn seeded() -> TypeRegistry {
        let mut reg = TypeRegistry::new();
        seed(&mut reg).unwrap();
        reg
    }

    #[test]
    fn object_fields_follow_key_order() {
        let mut reg = seeded();
        let ty = TypeBuilder::new(&mut reg)
            .build_type(
                &node("type: object\nproperties:\n  zeta: {type: string}\n  alpha: {type: boolean}\n"),
                "Thing",
                &[],
            )
            .unwrap();
        let keys: Vec<_> = ty.fields().iter().map(|f| f.source_key.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }

    #[test]
    fn formats_select_builtins_and_sized_primitives() {
        let mut reg = seeded();
        let mut b = TypeBuilder::new(&mut reg);
        let t = b.build_type(&node("type: string\nformat: date-time\n"), "At", &[]).unwrap();
        assert_eq!(t.reference(), "metav1.Time");
        let t = b.build_type(&node("type: integer\nformat: int64\n"), "N", &[]).unwrap();
        assert_eq!(t.reference(), "int64");
        let t = b.build_type(&node("type: number\nformat: float\n"), "N", &[]).unwrap();
        assert_eq!(t.reference(), "float32");
        let t = b.build_type(&node("type: string\nformat: uuid\n"), "N", &[]).unwrap();
        assert_eq!(t.reference(), "string");
    }

    #[test]
    fn internal_builtin_aliases_are_not_formats() {
        let mut reg = seeded();
        let mut b = TypeBuilder::new(&mut reg);
        let t = b.build_type(&node("type: string\nformat: raw\n"), "Blob", &[]).unwrap();
        assert_eq!(t.reference(), "string");
        let t = b
            .build_type(&node("type: string\nformat: int-or-string\n"), "Port", &[])
            .unwrap();
        assert_eq!(t.reference(), "string");
        let t = b.build_type(&node("type: integer\nformat: raw\n"), "N", &[]).unwrap();
        assert_eq!(t.reference(), "int");
    }

    #[test]
    fn int_or_string_uses_builtin() {
        let mut reg = seeded();
        let t = TypeBuilder::new(&mut reg)
            .build_type(&node("x-kubernetes-int-or-string: true\n"), "Port", &[])
            .unwrap();
        assert_eq!(t.reference(), "intstr.IntOrString");
    }

    #[test]
    fn map_of_objects_registers_element_struct() {
        let mut reg = seeded();
        let t = TypeBuilder::new(&mut reg)
            .build_type(
                &node("type: object\nadditionalProperties:\n  type: object\n  properties:\n    size: {type: integer}\n"),
                "Quotas",
                &["Spec".to_string()],
            )
            .unwrap();
        assert!(matches!(t.kind(), TypeKind::Map(_)));
        assert_eq!(t.reference(), "map[string]Quotas");
        assert!(reg.get("Quotas").is_some());
    }

    #[test]
    fn keys_with_the_same_field_name_are_rejected() {
        let mut reg = seeded();
        let err = TypeBuilder::new(&mut reg)
            .build_type(
                &node("type: object\nproperties:\n  fooBar: {type: string}\n  foo-bar: {type: integer}\n"),
                "Thing",
                &["Spec".to_string()],
            )
            .unwrap_err();
        match err {
            GenerateError::DuplicateField {
                name,
                first,
                second,
                ancestors,
            } => {
                assert_eq!(name, "FooBar");
                assert_eq!(first, "foo-bar");
                assert_eq!(second, "fooBar");
                assert_eq!(ancestors, vec!["Spec".to_string(), "Thing".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn map_without_value_schema_is_raw() {
        let mut reg = seeded();
        let t = TypeBuilder::new(&mut reg)
            .build_type(&node("type: object\nadditionalProperties: true\n"), "Extra", &[])
            .unwrap();
        assert_eq!(t.reference(), "map[string]apiextensionsv1.JSON");
    }

    #[test]
    fn arrays_of_primitives() {
        let mut reg = seeded();
        let t = TypeBuilder::new(&mut reg)
            .build_type(&node("type: array\nitems: {type: string}\n"), "Names", &[])
            .unwrap();
        assert_eq!(t.reference(), "[]string");
        assert_eq!(t.name(), "StringList");
    }

    #[test]
    fn unsupported_kind_names_the_kind() {
        let mut reg = seeded();
        let err = TypeBuilder::new(&mut reg)
            .build_type(&node("type: tuple\n"), "Pair", &["Spec".to_string()])
            .unwrap_err();
        match err {
            GenerateError::UnsupportedKind {
                kind,
                field,
                ancestors,
            } => {
                assert_eq!(kind, "tuple");
                assert_eq!(field, "Pair");
                assert_eq!(ancestors, vec!["Spec".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unseeded_registry_still_has_builtins() {
        let mut reg = TypeRegistry::new();
        let t = TypeBuilder::new(&mut reg)
            .build_type(&node("type: object\nx-kubernetes-preserve-unknown-fields: true\n"), "Raw", &[])
            .unwrap();
        assert_eq!(t.reference(), "apiextensionsv1.JSON");
    }
}
