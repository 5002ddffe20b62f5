//! Untrusted plugin schema validation.
//!
//! Marketplace pages and deep links hand us a JSON document describing the
//! plugin they want installed. Nothing in it is trusted until it has passed
//! validation here; the caller either gets a fully typed descriptor or a
//! rejection, never a best-effort partial.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

/// Why an untrusted schema was rejected.
///
/// Validation rules run in a fixed order and the first failure wins; there is
/// no aggregation of multiple errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema must be a JSON object")]
    NotAnObject,
    #[error("field '{0}' must be a non-empty string")]
    InvalidString(&'static str),
    #[error("field '{field}' must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("connection config must carry a 'type' field")]
    MissingConnectionType,
    #[error("unsupported connection type '{0}'")]
    UnsupportedConnectionType(String),
    #[error("field '{field}' is not a valid URL: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Connection parameters for an installable plugin.
///
/// Closed union: the `type` tag fully determines which fields are legal, and
/// an unrecognized tag never produces a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum McpConnection {
    /// Local server: the host spawns a process and speaks stdio.
    Stdio {
        command: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        args: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        env: Option<HashMap<String, String>>,
    },
    /// Remote server reached over HTTP.
    Http {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        headers: Option<HashMap<String, String>>,
    },
}

impl McpConnection {
    pub fn kind(&self) -> &'static str {
        match self {
            McpConnection::Stdio { .. } => "stdio",
            McpConnection::Http { .. } => "http",
        }
    }
}

/// Validated descriptor of an installable plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpInstallSchema {
    pub identifier: String,
    pub name: String,
    pub author: String,
    pub description: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    pub config: McpConnection,
}

impl McpInstallSchema {
    /// Validate an untrusted JSON value into a typed descriptor.
    pub fn from_value(raw: &Value) -> Result<Self, SchemaError> {
        let object = raw.as_object().ok_or(SchemaError::NotAnObject)?;

        let identifier = require_string(object, "identifier")?;
        let name = require_string(object, "name")?;
        let author = require_string(object, "author")?;
        let description = require_string(object, "description")?;
        let version = require_string(object, "version")?;
        let homepage = optional_string(object, "homepage")?;

        let config = validate_connection(object.get("config"))?;

        // Structural rules first; URL well-formedness last.
        if let Some(homepage) = &homepage {
            parse_url("homepage", homepage)?;
        }

        Ok(Self {
            identifier,
            name,
            author,
            description,
            version,
            homepage,
            config,
        })
    }
}

fn validate_connection(raw: Option<&Value>) -> Result<McpConnection, SchemaError> {
    let object = raw
        .and_then(Value::as_object)
        .ok_or(SchemaError::WrongType {
            field: "config",
            expected: "an object",
        })?;

    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(SchemaError::MissingConnectionType)?;

    match kind {
        "stdio" => {
            let command = require_string(object, "command")?;
            let args = optional_string_array(object, "args")?;
            let env = optional_string_map(object, "env")?;
            Ok(McpConnection::Stdio { command, args, env })
        }
        "http" => {
            let url = require_string(object, "url")?;
            parse_url("url", &url)?;
            let headers = optional_string_map(object, "headers")?;
            Ok(McpConnection::Http { url, headers })
        }
        other => Err(SchemaError::UnsupportedConnectionType(other.to_string())),
    }
}

fn require_string(object: &Map<String, Value>, field: &'static str) -> Result<String, SchemaError> {
    match object.get(field) {
        Some(Value::String(value)) if !value.is_empty() => Ok(value.clone()),
        _ => Err(SchemaError::InvalidString(field)),
    }
}

fn optional_string(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, SchemaError> {
    match object.get(field) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(SchemaError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

fn optional_string_array(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<Vec<String>>, SchemaError> {
    let Some(value) = object.get(field) else {
        return Ok(None);
    };

    let items = value.as_array().ok_or(SchemaError::WrongType {
        field,
        expected: "an array",
    })?;

    Ok(Some(items.iter().map(stringify).collect()))
}

fn optional_string_map(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<HashMap<String, String>>, SchemaError> {
    let Some(value) = object.get(field) else {
        return Ok(None);
    };

    let entries = value.as_object().ok_or(SchemaError::WrongType {
        field,
        expected: "an object",
    })?;

    Ok(Some(
        entries
            .iter()
            .map(|(key, item)| (key.clone(), stringify(item)))
            .collect(),
    ))
}

// Only the container shape is validated; entry values are carried as strings,
// with non-string values keeping their JSON text.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(value) => value.clone(),
        other => other.to_string(),
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<(), SchemaError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|source| SchemaError::InvalidUrl { field, source })
}
