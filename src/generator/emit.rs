use askama::Template;
use std::collections::BTreeSet;
use std::rc::Rc;

use super::registry::TypeRegistry;
use super::seed::METAV1_PATH;
use super::types::{ImportBinding, Type, TypeKind};
use crate::error::Result;

/// Template data for the root declaration of a resource kind
#[derive(Template)]
#[template(path = "root.go.txt", escape = "none")]
pub struct RootTemplateData {
    /// Resource kind name
    pub kind: String,
    /// Reference to the spec type
    pub spec: String,
    /// Reference to the status type
    pub status: String,
}

/// One field line of a struct declaration
#[derive(Debug, Clone)]
pub struct FieldLine {
    /// Exported field name
    pub name: String,
    /// Type reference
    pub ty: String,
    /// Serialization tag value
    pub tag: String,
    /// Description, one entry per line
    pub comment_lines: Vec<String>,
}

/// Template data for a struct declaration
#[derive(Template)]
#[template(path = "struct.go.txt", escape = "none")]
pub struct StructTemplateData {
    /// Declared type name
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldLine>,
}

/// Template data for a complete source file around emitted declarations
#[derive(Template)]
#[template(path = "file.go.txt", escape = "none")]
pub struct FileTemplateData {
    /// Package clause name
    pub package: String,
    /// Import block entries, sorted
    pub imports: Vec<ImportBinding>,
    /// Emitted declarations
    pub body: String,
}

fn comment_lines(comment: Option<&str>) -> Vec<String> {
    comment
        .map(|c| {
            c.trim()
                .lines()
                .map(|l| l.trim_end().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Render the declaration of one struct type
pub fn render_struct(ty: &Type) -> Result<String> {
    let fields = ty
        .fields()
        .iter()
        .map(|f| FieldLine {
            name: f.exported_name.clone(),
            ty: f.ty.reference(),
            tag: f.tag(),
            comment_lines: comment_lines(f.comment.as_deref()),
        })
        .collect();
    let rendered = StructTemplateData {
        name: ty.name().to_string(),
        fields,
    }
    .render()?;
    Ok(rendered.trim_end().to_string())
}

/// Walks a finished type graph and renders declarations.
///
/// Each struct is declared once per registry: the registry's generated set
/// is shared by every document of a run, so a struct reached from several
/// fields, or from several kinds, is only declared the first time.
pub struct Emitter<'r> {
    registry: &'r mut TypeRegistry,
    imports: BTreeSet<ImportBinding>,
}

impl<'r> Emitter<'r> {
    pub fn new(registry: &'r mut TypeRegistry) -> Self {
        Emitter {
            registry,
            imports: BTreeSet::new(),
        }
    }

    /// Emit the root declaration for `kind` followed by every struct
    /// reachable from `spec` and `status` that was not declared yet.
    pub fn emit(&mut self, kind: &str, spec: &Rc<Type>, status: &Rc<Type>) -> Result<String> {
        self.imports
            .insert(ImportBinding::new("metav1", METAV1_PATH));
        let mut declarations = vec![RootTemplateData {
            kind: kind.to_string(),
            spec: spec.reference(),
            status: status.reference(),
        }
        .render()?
        .trim_end()
        .to_string()];

        self.emit_type(spec, &mut declarations)?;
        self.emit_type(status, &mut declarations)?;

        let mut text = declarations.join("\n\n");
        text.push('\n');
        Ok(text)
    }

    fn emit_type(&mut self, ty: &Rc<Type>, out: &mut Vec<String>) -> Result<()> {
        if let Some(import) = ty.import() {
            self.imports.insert(import.clone());
        }
        match ty.kind() {
            TypeKind::Primitive | TypeKind::Opaque => Ok(()),
            TypeKind::Array(element) | TypeKind::Map(element) => self.emit_type(element, out),
            TypeKind::Struct(fields) => {
                if ty.import().is_some() || self.registry.was_generated(ty) {
                    return Ok(());
                }
                out.push(render_struct(ty)?);
                self.registry.mark_generated(ty);
                for field in fields {
                    self.emit_type(&field.ty, out)?;
                }
                Ok(())
            }
        }
    }

    /// Packages referenced by everything emitted so far
    pub fn imports(&self) -> &BTreeSet<ImportBinding> {
        &self.imports
    }

    pub fn into_imports(self) -> BTreeSet<ImportBinding> {
        self.imports
    }
}

/// Wrap emitted declarations into a complete source file: package clause,
/// sorted import block, then the declarations.
pub fn wrap_file(
    package: &str,
    imports: &BTreeSet<ImportBinding>,
    body: &str,
) -> Result<String> {
    let rendered = FileTemplateData {
        package: package.to_string(),
        imports: imports.iter().cloned().collect(),
        body: body.trim_end().to_string(),
    }
    .render()?;
    Ok(format!("{}\n", rendered.trim_end()))
}
