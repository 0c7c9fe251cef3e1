//! Typed view of the OpenAPI 3.0 / 3.1 objects the generator reads.
//!
//! Only the fields that influence generated types are modelled; unknown
//! fields are ignored. The raw `serde_json::Value` is kept next to the typed
//! view so `$ref` pointers can be resolved against the untouched tree.
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::Result;
use crate::path_de;

// ————————————————————————————————————————————————————————————————————————————
// DOCUMENT
// ————————————————————————————————————————————————————————————————————————————

/// A decoded OpenAPI document. Immutable once built.
#[derive(Debug, Clone)]
pub struct Document {
    raw: Value,
    spec: OpenApi,
}

impl Document {
    pub fn from_value(raw: Value) -> Result<Self> {
        let spec = path_de::from_value_with_path::<OpenApi>(raw.clone())?;
        Ok(Self { raw, spec })
    }

    /// The untouched JSON tree, used for pointer resolution.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn spec(&self) -> &OpenApi {
        &self.spec
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApi {
    #[serde(default)]
    pub info: Info,
    #[serde(default)]
    pub servers: Vec<Server>,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default)]
    pub components: Components,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Info {
    #[serde(default, deserialize_with = "deserialize_scalar")]
    pub title: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "deserialize_scalar")]
    pub version: String,
    pub license: Option<License>,
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct License {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default)]
    pub variables: IndexMap<String, ServerVariable>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerVariable {
    #[serde(rename = "enum", default, deserialize_with = "deserialize_scalars")]
    pub enum_: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_scalar")]
    pub default: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,
}

// ————————————————————————————————————————————————————————————————————————————
// PATHS
// ————————————————————————————————————————————————————————————————————————————

/// HTTP methods in the order operations are visited.
pub const METHODS: [Method; 8] = [
    Method::Get,
    Method::Put,
    Method::Post,
    Method::Delete,
    Method::Options,
    Method::Head,
    Method::Patch,
    Method::Trace,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Put => "put",
            Method::Post => "post",
            Method::Delete => "delete",
            Method::Options => "options",
            Method::Head => "head",
            Method::Patch => "patch",
            Method::Trace => "trace",
        }
    }

    pub fn to_uppercase(self) -> String {
        self.as_str().to_ascii_uppercase()
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `None`: method absent. `Some(None)`: key present with a `null` value.
pub type OperationSlot = Option<Option<Operation>>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    pub parameters: Option<Vec<ReferenceOr<Parameter>>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub get: OperationSlot,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub put: OperationSlot,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub post: OperationSlot,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub delete: OperationSlot,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub options: OperationSlot,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub head: OperationSlot,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub patch: OperationSlot,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub trace: OperationSlot,
}

impl PathItem {
    pub fn operation(&self, method: Method) -> &OperationSlot {
        match method {
            Method::Get => &self.get,
            Method::Put => &self.put,
            Method::Post => &self.post,
            Method::Delete => &self.delete,
            Method::Options => &self.options,
            Method::Head => &self.head,
            Method::Patch => &self.patch,
            Method::Trace => &self.trace,
        }
    }

    /// Fields present on `other` replace the ones on `self`.
    pub fn overlay(self, other: PathItem) -> PathItem {
        PathItem {
            reference: None,
            parameters: other.parameters.or(self.parameters),
            get: other.get.or(self.get),
            put: other.put.or(self.put),
            post: other.post.or(self.post),
            delete: other.delete.or(self.delete),
            options: other.options.or(self.options),
            head: other.head.or(self.head),
            patch: other.patch.or(self.patch),
            trace: other.trace.or(self.trace),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub parameters: Vec<ReferenceOr<Parameter>>,
    pub request_body: Option<ReferenceOr<RequestBody>>,
    pub responses: Option<IndexMap<String, ReferenceOr<Response>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub allow_empty_value: bool,
    pub schema: Option<Schema>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    pub schema: Option<Schema>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

// ————————————————————————————————————————————————————————————————————————————
// SCHEMAS
// ————————————————————————————————————————————————————————————————————————————

/// Either a `$ref` pointer or an inline object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReferenceOr<T> {
    Reference {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Item(T),
}

impl<T> ReferenceOr<T> {
    pub fn item(value: T) -> Self {
        ReferenceOr::Item(value)
    }

    pub fn reference(pointer: impl Into<String>) -> Self {
        ReferenceOr::Reference { reference: pointer.into() }
    }

    pub fn as_item(&self) -> Option<&T> {
        match self {
            ReferenceOr::Item(item) => Some(item),
            ReferenceOr::Reference { .. } => None,
        }
    }
}

pub type Schema = ReferenceOr<SchemaObject>;

/// A JSON-Schema-like node. Modifiers are not mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaObject {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<SchemaType>,
    pub nullable: Option<bool>,
    pub not: Option<Box<Schema>>,
    pub additional_properties: Option<AdditionalProperties>,
    pub all_of: Option<Vec<Schema>>,
    pub one_of: Option<Vec<Schema>>,
    pub any_of: Option<Vec<Schema>>,
    #[serde(rename = "enum")]
    pub enum_: Option<Vec<Value>>,
    pub properties: Option<IndexMap<String, Schema>>,
    #[serde(default)]
    pub required: Vec<String>,
    pub items: Option<Box<Schema>>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub example: Option<Value>,
    pub examples: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub default: Option<Value>,
}

/// `type` is a single name in 3.0 and may be a list in 3.1.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Schema>),
}

impl AdditionalProperties {
    pub fn is_truthy(&self) -> bool {
        !matches!(self, AdditionalProperties::Bool(false))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Keeps an explicit `null` distinguishable from an absent key.
fn deserialize_some<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Unquoted YAML scalars (`version: 1.0`, `default: 8443`) arrive as numbers
/// or booleans; read them back as text. Anything else becomes `""`.
fn deserialize_scalar<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(&Value::deserialize(deserializer)?).unwrap_or_default())
}

fn deserialize_scalars<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values.map(|values| values.iter().filter_map(scalar_text).collect()))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
