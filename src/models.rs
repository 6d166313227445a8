// Local data model for APIHub projects
// Collections group endpoints; endpoints carry structured parameter and body schemas

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// HTTP method of an endpoint.
///
/// Parsing is exact: only the upper-case names map to the known variants,
/// anything else is kept verbatim in `Other` so that equality stays plain
/// string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    OPTIONS,
    HEAD,
    Other(String),
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::PATCH => "PATCH",
            Method::OPTIONS => "OPTIONS",
            Method::HEAD => "HEAD",
            Method::Other(raw) => raw,
        }
    }
}

impl From<String> for Method {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "PATCH" => Method::PATCH,
            "OPTIONS" => Method::OPTIONS,
            "HEAD" => Method::HEAD,
            _ => Method::Other(raw),
        }
    }
}

impl From<&str> for Method {
    fn from(raw: &str) -> Self {
        Method::from(raw.to_string())
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value type of a parameter or schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl FieldType {
    /// Map a free-form remote type name onto the local tag set.
    /// Unknown or empty names fall back to `String`.
    pub fn from_remote(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "number" | "integer" | "int" | "float" | "double" | "long" => FieldType::Number,
            "boolean" | "bool" => FieldType::Boolean,
            "object" => FieldType::Object,
            "array" => FieldType::Array,
            _ => FieldType::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
            FieldType::Array => "array",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter location in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Body,
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Body => "body",
        };
        f.write_str(s)
    }
}

/// Content type of a request or response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "form-data")]
    FormData,
    #[serde(rename = "raw")]
    Raw,
    #[serde(rename = "xml")]
    Xml,
}

impl BodyKind {
    pub fn from_remote(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => BodyKind::Json,
            "form" | "form-data" | "multipart" => BodyKind::FormData,
            "xml" => BodyKind::Xml,
            _ => BodyKind::Raw,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            BodyKind::Json => "application/json",
            BodyKind::FormData => "multipart/form-data",
            BodyKind::Raw => "text/plain",
            BodyKind::Xml => "application/xml",
        }
    }
}

/// A parameter in a request or response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiParam {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(rename = "param_type")]
    pub location: ParameterLocation,
    pub required: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default_value: Option<serde_json::Value>,
    /// Nested fields, inferred from JSON samples only
    #[serde(default)]
    pub children: Vec<ApiParam>,
}

impl ApiParam {
    pub fn new(name: impl Into<String>, field_type: FieldType, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            field_type,
            location,
            required: false,
            description: String::new(),
            default_value: None,
            children: Vec::new(),
        }
    }
}

/// Request or response body structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiBody {
    #[serde(rename = "type")]
    pub kind: BodyKind,
    /// object, array, string...
    pub data_type: String,
    #[serde(default)]
    pub schema: Vec<ApiParam>,
    #[serde(default)]
    pub example: Option<serde_json::Value>,
    /// Raw schema text; for inferred bodies this is the sample it came from
    #[serde(default)]
    pub json_schema: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            name: name.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    /// Create an unsaved collection; the store assigns the id.
    pub fn new(project_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            project_id: project_id.into(),
            name: name.into(),
            description: String::new(),
            parent_id: None,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// An API endpoint with detailed field information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: String,
    pub collection_id: String,
    pub name: String,
    pub method: Method,
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub request_params: Vec<ApiParam>,
    #[serde(default)]
    pub request_body: Option<ApiBody>,
    #[serde(default)]
    pub response_params: Vec<ApiParam>,
    #[serde(default)]
    pub response_body: Option<ApiBody>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Endpoint {
    /// Create an endpoint with empty headers, params and bodies
    pub fn new(name: impl Into<String>, method: Method, url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            collection_id: String::new(),
            name: name.into(),
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            description: String::new(),
            sort_order: 0,
            request_params: Vec::new(),
            request_body: None,
            response_params: Vec::new(),
            response_body: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sync identity within a collection.
    pub fn matches(&self, name: &str, method: &Method) -> bool {
        self.name == name && &self.method == method
    }
}

/// Counters produced by one sync pass. Rebuilt every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStats {
    pub created_collections: usize,
    pub updated_collections: usize,
    pub created_endpoints: usize,
    pub updated_endpoints: usize,
    /// Interfaces whose category was not part of the fetched set
    pub skipped_endpoints: usize,
    /// Creates or updates the store rejected
    pub failed_items: usize,
}

impl SyncStats {
    pub fn total_endpoints(&self) -> usize {
        self.created_endpoints + self.updated_endpoints
    }
}

impl fmt::Display for SyncStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "collections: {} created, {} updated; endpoints: {} created, {} updated; {} skipped, {} failed",
            self.created_collections,
            self.updated_collections,
            self.created_endpoints,
            self.updated_endpoints,
            self.skipped_endpoints,
            self.failed_items
        )
    }
}
