use std::fmt;
use std::rc::Rc;

/// Package a pre-existing type is declared in
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImportBinding {
    /// Qualifier used in references (e.g. `metav1`)
    pub package: String,
    /// Import path of the package
    pub path: String,
}

impl ImportBinding {
    pub fn new(package: impl Into<String>, path: impl Into<String>) -> Self {
        ImportBinding {
            package: package.into(),
            path: path.into(),
        }
    }
}

/// Shape of a [`Type`]
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Struct(Vec<Field>),
    Array(Rc<Type>),
    Map(Rc<Type>),
    /// Fixed host-language primitive (`string`, `int`, `float64`, `bool`, ...)
    Primitive,
    /// Externally declared type referenced by its qualified name only
    Opaque,
}

/// A node of the generated type graph.
///
/// The structural signature is computed once at construction and never
/// includes the name, so renaming a type before it is registered does not
/// change its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    name: String,
    kind: TypeKind,
    import: Option<ImportBinding>,
    signature: String,
}

impl Type {
    pub fn primitive(name: &str) -> Self {
        Type {
            name: name.to_string(),
            kind: TypeKind::Primitive,
            import: None,
            signature: name.to_string(),
        }
    }

    /// An externally declared type, e.g. `metav1.Time`
    pub fn opaque(name: &str, import: ImportBinding) -> Self {
        let signature = format!("{}.{}", import.path, name);
        Type {
            name: name.to_string(),
            kind: TypeKind::Opaque,
            import: Some(import),
            signature,
        }
    }

    pub fn structure(name: impl Into<String>, fields: Vec<Field>) -> Self {
        // keys are part of the shape
        let mut parts: Vec<(&str, &str, &str)> = fields
            .iter()
            .map(|f| (f.exported_name.as_str(), f.source_key.as_str(), f.ty.signature()))
            .collect();
        parts.sort_unstable();
        let body: Vec<String> = parts
            .into_iter()
            .map(|(name, key, sig)| format!("{name}({key}):{sig}"))
            .collect();
        let signature = format!("struct{{{}}}", body.join(";"));
        Type {
            name: name.into(),
            kind: TypeKind::Struct(fields),
            import: None,
            signature,
        }
    }

    pub fn array(name: impl Into<String>, element: Rc<Type>) -> Self {
        let signature = format!("[]{}", element.signature());
        Type {
            name: name.into(),
            kind: TypeKind::Array(element),
            import: None,
            signature,
        }
    }

    pub fn map(name: impl Into<String>, element: Rc<Type>) -> Self {
        let signature = format!("map[string]{}", element.signature());
        Type {
            name: name.into(),
            kind: TypeKind::Map(element),
            import: None,
            signature,
        }
    }

    /// Bind this type to the package that already declares it
    pub fn with_import(mut self, import: ImportBinding) -> Self {
        self.import = Some(import);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename before registration
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn import(&self) -> Option<&ImportBinding> {
        self.import.as_ref()
    }

    /// Name-independent structural fingerprint
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn fields(&self) -> &[Field] {
        match &self.kind {
            TypeKind::Struct(fields) => fields,
            _ => &[],
        }
    }

    pub fn element(&self) -> Option<&Rc<Type>> {
        match &self.kind {
            TypeKind::Array(e) | TypeKind::Map(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_))
    }

    /// Struct and array types take part in name synthesis; everything else
    /// is referenced by a fixed name.
    pub fn is_named(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_) | TypeKind::Array(_))
    }

    /// How a field declaration refers to this type
    pub fn reference(&self) -> String {
        match &self.kind {
            TypeKind::Array(e) => format!("[]{}", e.reference()),
            TypeKind::Map(e) => format!("map[string]{}", e.reference()),
            _ => match &self.import {
                Some(import) => format!("{}.{}", import.package, self.name),
                None => self.name.clone(),
            },
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference())
    }
}

/// A struct field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub exported_name: String,
    /// Original property key, used as the serialization tag
    pub source_key: String,
    pub required: bool,
    pub comment: Option<String>,
    pub ty: Rc<Type>,
}

impl Field {
    /// Serialization tag value: the source key, plus `omitempty` unless required
    pub fn tag(&self) -> String {
        if self.required {
            self.source_key.clone()
        } else {
            format!("{},omitempty", self.source_key)
        }
    }
}

/// Derive an exported identifier from a property key.
///
/// The first letter is upper-cased; characters that cannot appear in an
/// identifier split the key and the following letter is upper-cased too.
/// A leading digit gets an `X` prefix.
pub fn exported_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = true;
    for c in key.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if upper_next {
                out.extend(c.to_uppercase());
                upper_next = false;
            } else {
                out.push(c);
            }
        } else {
            upper_next = true;
        }
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, 'X');
    }
    if out.is_empty() {
        out.push('X');
    }
    out
}

/// Whether `name` starts with an upper-case letter
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, ty: Type, required: bool) -> Field {
        Field {
            exported_name: exported_name(name),
            source_key: name.to_string(),
            required,
            comment: None,
            ty: Rc::new(ty),
        }
    }

    #[test]
    fn test_exported_name() {
        assert_eq!(exported_name("name"), "Name");
        assert_eq!(exported_name("projectRef"), "ProjectRef");
        assert_eq!(exported_name("x-api-key"), "XApiKey");
        assert_eq!(exported_name("2fa"), "X2fa");
        assert_eq!(exported_name("already_Upper"), "Already_Upper");
        assert_eq!(exported_name("-"), "X");
    }

    #[test]
    fn signature_ignores_names_and_field_order() {
        let a = Type::structure(
            "A",
            vec![
                field("name", Type::primitive("string"), true),
                field("namespace", Type::primitive("string"), false),
            ],
        );
        let b = Type::structure(
            "B",
            vec![
                field("namespace", Type::primitive("string"), true),
                field("name", Type::primitive("string"), false),
            ],
        );
        assert_eq!(a.signature(), b.signature());
        assert_eq!(
            a.signature(),
            "struct{Name(name):string;Namespace(namespace):string}"
        );
    }

    #[test]
    fn signature_distinguishes_source_keys() {
        let dashed = Type::structure("A", vec![field("x-api-key", Type::primitive("string"), true)]);
        let camel = Type::structure("A", vec![field("xApiKey", Type::primitive("string"), true)]);
        assert_eq!(dashed.fields()[0].exported_name, camel.fields()[0].exported_name);
        assert_ne!(dashed.signature(), camel.signature());
    }

    #[test]
    fn signature_distinguishes_primitives() {
        let a = Type::structure("A", vec![field("v", Type::primitive("string"), true)]);
        let b = Type::structure("A", vec![field("v", Type::primitive("int"), true)]);
        assert_ne!(a.signature(), b.signature());
    }

    #[test]
    fn references() {
        let elem = Rc::new(Type::structure("Tag", vec![]));
        assert_eq!(Type::array("TagList", Rc::clone(&elem)).reference(), "[]Tag");
        assert_eq!(
            Type::map("TagMap", elem).reference(),
            "map[string]Tag"
        );
        let time = Type::opaque(
            "Time",
            ImportBinding::new("metav1", "k8s.io/apimachinery/pkg/apis/meta/v1"),
        );
        assert_eq!(time.reference(), "metav1.Time");
        assert_eq!(time.to_string(), "metav1.Time");
    }

    #[test]
    fn tag_omits_only_optional_fields() {
        assert_eq!(field("name", Type::primitive("string"), true).tag(), "name");
        assert_eq!(
            field("age", Type::primitive("int"), false).tag(),
            "age,omitempty"
        );
    }
}
