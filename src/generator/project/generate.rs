use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};

use tracing::{debug, info};

use crate::crd::{documents, parse, select_version};
use crate::error::Result;
use crate::generator::build::TypeBuilder;
use crate::generator::emit::Emitter;
use crate::generator::registry::TypeRegistry;
use crate::generator::seed::seed;
use crate::generator::types::ImportBinding;

/// Declarations generated for one schema document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    /// Resource kind name
    pub kind: String,
    /// Version that was selected
    pub version: String,
    /// Root declaration followed by every newly declared struct, `\n`-terminated
    pub text: String,
    /// Packages referenced by the declarations
    pub imports: BTreeSet<ImportBinding>,
}

/// What a stream run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Kinds in input order, one per document
    pub kinds: Vec<String>,
    /// Union of the packages referenced by every document
    pub imports: BTreeSet<ImportBinding>,
}

impl StreamSummary {
    pub fn documents(&self) -> usize {
        self.kinds.len()
    }
}

/// A registry seeded with the built-in overrides and known types
pub fn seeded_registry(renames: BTreeMap<String, String>) -> Result<TypeRegistry> {
    let mut registry = TypeRegistry::with_renames(renames);
    seed(&mut registry)?;
    Ok(registry)
}

/// Generate the declarations for one raw document.
///
/// Parses the document, selects `version` (empty selects the first declared
/// one), builds `<Kind>Spec` and `<Kind>Status` with `[Kind]` as ancestor
/// chain, then emits. Structs already declared through `registry` (seeded
/// ones, or ones emitted for an earlier document) are referenced but not
/// declared again.
pub fn generate(
    document: serde_yaml::Value,
    version: &str,
    registry: &mut TypeRegistry,
) -> Result<GeneratedDocument> {
    let (kind, versions) = parse(document)?;
    let resource = select_version(&kind, versions, version)?;
    debug!(kind = %kind, version = %resource.version, "selected schema version");

    let spec_name = format!("{kind}Spec");
    let status_name = format!("{kind}Status");
    // Nested types are named before the roots are registered.
    registry.reserve(&spec_name)?;
    registry.reserve(&status_name)?;

    let ancestors = vec![kind.clone()];
    let mut builder = TypeBuilder::new(registry);
    let spec = builder.build_root(&resource.spec, &spec_name, &ancestors)?;
    let status = builder.build_root(&resource.status, &status_name, &ancestors)?;

    let mut emitter = Emitter::new(registry);
    let text = emitter.emit(&kind, &spec, &status)?;
    let imports = emitter.into_imports();

    info!(
        kind = %kind,
        version = %resource.version,
        bytes = text.len(),
        registered = registry.len(),
        "generated declarations"
    );
    Ok(GeneratedDocument {
        kind,
        version: resource.version,
        text,
        imports,
    })
}

/// Generate from a single document given as text (YAML or JSON)
pub fn generate_str(
    input: &str,
    version: &str,
    registry: &mut TypeRegistry,
) -> Result<GeneratedDocument> {
    generate(serde_yaml::from_str(input)?, version, registry)
}

/// Generate every document of a multi-document stream, in order.
///
/// All documents share `registry`, so a struct declared for one kind is only
/// referenced by the following ones. Documents are separated by a blank
/// line. The first failure aborts the stream; output is only written per
/// complete document, so the sink never holds a partial declaration.
pub fn generate_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    version: &str,
    registry: &mut TypeRegistry,
) -> Result<StreamSummary> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    let mut summary = StreamSummary::default();
    for (index, document) in documents(&input)?.into_iter().enumerate() {
        let generated = generate(document, version, registry)?;
        if index > 0 {
            writer.write_all(b"\n")?;
        }
        writer.write_all(generated.text.as_bytes())?;
        summary.kinds.push(generated.kind);
        summary.imports.extend(generated.imports);
    }
    writer.flush()?;
    Ok(summary)
}
