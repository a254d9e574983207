use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Kind of a schema node.
///
/// Unknown `type` values are carried in [`SchemaKind::Other`] so that the
/// builder can reject them with a precise error instead of failing the parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaKind {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
    /// Anything else, including an absent `type` that could not be inferred
    Other(String),
}

impl SchemaKind {
    fn from_type_name(name: &str) -> Self {
        match name {
            "object" => SchemaKind::Object,
            "array" => SchemaKind::Array,
            "string" => SchemaKind::String,
            "integer" => SchemaKind::Integer,
            "number" => SchemaKind::Number,
            "boolean" => SchemaKind::Boolean,
            other => SchemaKind::Other(other.to_string()),
        }
    }
}

/// Value schema of a map-like object (`additionalProperties`)
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    /// `additionalProperties: true` - values are unconstrained
    Any,
    /// Values follow the given schema
    Schema(Box<SchemaNode>),
}

/// One node of a parsed object schema.
///
/// Immutable once parsed; the whole tree is owned by the
/// [`VersionedResource`] it was selected into.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    /// Object properties, ordered by key
    pub properties: BTreeMap<String, SchemaNode>,
    pub required: BTreeSet<String>,
    pub items: Option<Box<SchemaNode>>,
    pub additional_properties: Option<AdditionalProperties>,
    /// Opaque content: preserves unknown fields and declares no properties
    pub free_form: bool,
    /// `x-kubernetes-int-or-string`
    pub int_or_string: bool,
    pub format: Option<String>,
    pub description: Option<String>,
}

impl SchemaNode {
    /// An object node with no properties.
    pub fn empty_object() -> Self {
        SchemaNode {
            kind: SchemaKind::Object,
            properties: BTreeMap::new(),
            required: BTreeSet::new(),
            items: None,
            additional_properties: None,
            free_form: false,
            int_or_string: false,
            format: None,
            description: None,
        }
    }

    /// Whether `key` is listed in this node's `required` set
    pub fn is_required(&self, key: &str) -> bool {
        self.required.contains(key)
    }
}

/// A resource kind paired with one selected schema version
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedResource {
    pub kind: String,
    pub version: String,
    pub spec: SchemaNode,
    pub status: SchemaNode,
}

// ---------------------------------------------------------------------------
// Raw document shape, as found on the wire
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawDocument {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub metadata: Option<RawMetadata>,
    pub spec: RawDefinitionSpec,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMetadata {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDefinitionSpec {
    #[serde(default)]
    pub group: Option<String>,
    pub names: RawNames,
    #[serde(default)]
    pub versions: Vec<RawVersion>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawNames {
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawVersion {
    pub name: String,
    #[serde(default)]
    pub schema: Option<RawValidation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawValidation {
    #[serde(rename = "openAPIV3Schema")]
    pub open_api_v3_schema: RawSchema,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawAdditionalProperties {
    Bool(bool),
    Schema(Box<RawSchema>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSchema {
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, RawSchema>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub items: Option<Box<RawSchema>>,
    #[serde(default)]
    pub additional_properties: Option<RawAdditionalProperties>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(
        rename = "x-kubernetes-preserve-unknown-fields",
        alias = "x-preserve-unknown-fields",
        default
    )]
    pub preserve_unknown_fields: Option<bool>,
    #[serde(rename = "x-kubernetes-int-or-string", default)]
    pub int_or_string: Option<bool>,
}

impl RawSchema {
    /// Convert the wire shape into an immutable [`SchemaNode`] tree
    pub(crate) fn into_node(self) -> SchemaNode {
        let preserve = self.preserve_unknown_fields.unwrap_or(false);
        let int_or_string = self.int_or_string.unwrap_or(false);
        let additional_properties = match self.additional_properties {
            Some(RawAdditionalProperties::Bool(true)) => Some(AdditionalProperties::Any),
            Some(RawAdditionalProperties::Bool(false)) | None => None,
            Some(RawAdditionalProperties::Schema(s)) => {
                Some(AdditionalProperties::Schema(Box::new(s.into_node())))
            }
        };

        let kind = match self.type_.as_deref() {
            Some(name) => SchemaKind::from_type_name(name),
            None if !self.properties.is_empty()
                || additional_properties.is_some()
                || preserve =>
            {
                SchemaKind::Object
            }
            None => SchemaKind::Other(String::new()),
        };

        let free_form = preserve && self.properties.is_empty();
        SchemaNode {
            kind,
            properties: self
                .properties
                .into_iter()
                .map(|(k, v)| (k, v.into_node()))
                .collect(),
            required: self.required.into_iter().collect(),
            items: self.items.map(|i| Box::new(i.into_node())),
            additional_properties,
            free_form,
            int_or_string,
            format: self.format,
            description: self.description,
        }
    }
}
