//! Rendering-oriented OpenAPI model.
//!
//! Unlike a serde-derived mirror of the OpenAPI object model, this keeps the
//! document's declaration order for paths, methods, and responses, which
//! drives the default endpoint selection and the sidebar layout. The input
//! is expected to be dereferenced already.

use serde_yaml::Value;

/// Path-item keys that are not HTTP methods.
const NON_METHOD_KEYS: [&str; 4] = ["parameters", "servers", "summary", "description"];

#[derive(Debug, Clone, Default)]
pub struct Document {
    pub info: Info,
    pub paths: Vec<PathEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct Info {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PathEntry {
    pub path: String,
    pub operations: Vec<OperationEntry>,
}

#[derive(Debug, Clone)]
pub struct OperationEntry {
    pub method: String,
    pub operation: Operation,
}

#[derive(Debug, Clone, Default)]
pub struct Operation {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    pub responses: Vec<ResponseEntry>,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub location: String,
    pub required: bool,
    pub description: Option<String>,
    pub schema_type: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RequestBody {
    pub description: Option<String>,
    pub required: bool,
    pub content_types: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ResponseEntry {
    pub status: String,
    pub description: Option<String>,
    pub content_types: Vec<String>,
}

/// A path + method pair identifying one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointKey {
    pub path: String,
    pub method: String,
}

impl Document {
    pub fn from_value(root: &Value) -> Self {
        let info = root
            .get("info")
            .map(|info| Info {
                title: str_field(info, "title"),
                version: str_field(info, "version"),
                description: str_field(info, "description"),
            })
            .unwrap_or_default();

        let mut paths = Vec::new();
        if let Some(map) = root.get("paths").and_then(Value::as_mapping) {
            for (key, item) in map {
                let Some(path) = key.as_str() else { continue };
                paths.push(PathEntry {
                    path: path.to_string(),
                    operations: parse_path_item(item),
                });
            }
        }

        Self { info, paths }
    }

    /// First operation in declaration order; the viewer's initial selection.
    pub fn first_endpoint(&self) -> Option<EndpointKey> {
        self.paths.iter().find_map(|entry| {
            entry.operations.first().map(|op| EndpointKey {
                path: entry.path.clone(),
                method: op.method.clone(),
            })
        })
    }

    pub fn operation(&self, path: &str, method: &str) -> Option<&Operation> {
        self.paths
            .iter()
            .find(|entry| entry.path == path)?
            .operations
            .iter()
            .find(|op| op.method == method)
            .map(|op| &op.operation)
    }
}

fn parse_path_item(item: &Value) -> Vec<OperationEntry> {
    let Some(map) = item.as_mapping() else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(key, value)| {
            let method = key.as_str()?;
            if NON_METHOD_KEYS.contains(&method) || method.starts_with("x-") {
                return None;
            }
            Some(OperationEntry {
                method: method.to_string(),
                operation: parse_operation(value),
            })
        })
        .collect()
}

fn parse_operation(value: &Value) -> Operation {
    Operation {
        summary: str_field(value, "summary"),
        description: str_field(value, "description"),
        tags: value
            .get("tags")
            .and_then(Value::as_sequence)
            .map(|seq| {
                seq.iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default(),
        parameters: value
            .get("parameters")
            .and_then(Value::as_sequence)
            .map(|seq| seq.iter().map(parse_parameter).collect())
            .unwrap_or_default(),
        request_body: value.get("requestBody").map(parse_request_body),
        responses: parse_responses(value.get("responses")),
    }
}

fn parse_parameter(value: &Value) -> Parameter {
    Parameter {
        name: str_field(value, "name").unwrap_or_default(),
        location: str_field(value, "in").unwrap_or_default(),
        required: value
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        description: str_field(value, "description"),
        schema_type: value
            .get("schema")
            .and_then(|schema| schema.get("type"))
            .and_then(Value::as_str)
            .map(String::from),
    }
}

fn parse_request_body(value: &Value) -> RequestBody {
    RequestBody {
        description: str_field(value, "description"),
        required: value
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        content_types: content_types(value.get("content")),
    }
}

fn parse_responses(value: Option<&Value>) -> Vec<ResponseEntry> {
    let Some(map) = value.and_then(Value::as_mapping) else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(status, response)| {
            // Status keys may be unquoted in YAML and parse as numbers.
            let status = scalar_to_string(status)?;
            Some(ResponseEntry {
                status,
                description: str_field(response, "description"),
                content_types: content_types(response.get("content")),
            })
        })
        .collect()
}

fn content_types(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_mapping)
        .map(|map| {
            map.iter()
                .filter_map(|(key, _)| key.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

fn str_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(String::from)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
