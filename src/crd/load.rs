use super::types::{RawDocument, RawSchema, SchemaNode, VersionedResource};
use crate::error::{GenerateError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Kind, group and declared versions of one document, without its schemas
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    /// `metadata.name`, empty when absent
    pub name: String,
    /// `spec.group`, empty when absent
    pub group: String,
    pub kind: String,
    pub versions: Vec<String>,
}

/// Split a multi-document input into individual raw documents.
///
/// Empty documents (a leading or trailing `---`) are dropped. A document
/// that is not well-formed YAML fails the whole split.
pub fn documents(input: &str) -> Result<Vec<serde_yaml::Value>> {
    let mut docs = Vec::new();
    for de in serde_yaml::Deserializer::from_str(input) {
        let value = serde_yaml::Value::deserialize(de)?;
        if !value.is_null() {
            docs.push(value);
        }
    }
    Ok(docs)
}

fn decode(document: serde_yaml::Value) -> Result<RawDocument> {
    let raw: RawDocument = serde_yaml::from_value(document)?;
    debug!(
        api_version = raw.api_version.as_deref().unwrap_or(""),
        document_kind = raw.kind.as_deref().unwrap_or(""),
        kind = %raw.spec.names.kind,
        "decoded schema document"
    );
    Ok(raw)
}

/// Parse one resource-schema document into its kind name and versions.
///
/// Each version's `spec` and `status` properties become the version's
/// schema roots; a missing one is an empty object.
pub fn parse(document: serde_yaml::Value) -> Result<(String, Vec<VersionedResource>)> {
    let raw = decode(document)?;
    let kind = raw.spec.names.kind;
    let versions = raw
        .spec
        .versions
        .into_iter()
        .map(|v| {
            let mut root = v
                .schema
                .map(|s| s.open_api_v3_schema)
                .unwrap_or_default();
            let spec = take_root(&mut root, "spec");
            let status = take_root(&mut root, "status");
            VersionedResource {
                kind: kind.clone(),
                version: v.name,
                spec,
                status,
            }
        })
        .collect();
    Ok((kind, versions))
}

fn take_root(root: &mut RawSchema, key: &str) -> SchemaNode {
    root.properties
        .remove(key)
        .map(RawSchema::into_node)
        .unwrap_or_else(SchemaNode::empty_object)
}

/// Parse a document from text (YAML or JSON)
pub fn parse_str(input: &str) -> Result<(String, Vec<VersionedResource>)> {
    parse(serde_yaml::from_str(input)?)
}

/// Summarise a document without building anything
pub fn summarize(document: serde_yaml::Value) -> Result<DocumentSummary> {
    let raw = decode(document)?;
    Ok(DocumentSummary {
        name: raw.metadata.and_then(|m| m.name).unwrap_or_default(),
        group: raw.spec.group.unwrap_or_default(),
        kind: raw.spec.names.kind,
        versions: raw.spec.versions.into_iter().map(|v| v.name).collect(),
    })
}

/// Pick the version to generate.
///
/// An empty `requested` selects the first declared version.
pub fn select_version(
    kind: &str,
    versions: Vec<VersionedResource>,
    requested: &str,
) -> Result<VersionedResource> {
    if versions.is_empty() {
        return Err(GenerateError::NoVersions {
            kind: kind.to_string(),
        });
    }
    let declared: Vec<String> = versions.iter().map(|v| v.version.clone()).collect();
    let mut versions = versions.into_iter();
    let found = if requested.is_empty() {
        versions.next()
    } else {
        versions.find(|v| v.version == requested)
    };
    found.ok_or_else(|| GenerateError::VersionNotFound {
        kind: kind.to_string(),
        requested: requested.to_string(),
        declared,
    })
}
