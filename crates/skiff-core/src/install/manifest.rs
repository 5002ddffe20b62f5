//! Registry manifest built from a validated install schema.

use serde::{Deserialize, Serialize};

use super::schema::{McpConnection, McpInstallSchema};

/// Display metadata carried alongside an installed plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMeta {
    pub title: String,
    pub description: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

/// What the plugin registry is asked to persist for a newly installed plugin.
///
/// Connection parameters are forwarded verbatim from the validated schema;
/// the tagged union already limits `headers` to http connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    pub identifier: String,
    pub version: String,
    pub meta: PluginMeta,
    pub connection: McpConnection,
}

impl PluginManifest {
    pub fn from_schema(schema: &McpInstallSchema) -> Self {
        Self {
            identifier: schema.identifier.clone(),
            version: schema.version.clone(),
            meta: PluginMeta {
                title: schema.name.clone(),
                description: schema.description.clone(),
                author: schema.author.clone(),
                homepage: schema.homepage.clone(),
            },
            connection: schema.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn manifest_carries_metadata_and_verbatim_connection() {
        let raw = json!({
            "identifier": "search",
            "name": "Search",
            "author": "Acme",
            "description": "Remote search",
            "version": "0.3.1",
            "config": {
                "type": "http",
                "url": "https://acme.test/mcp",
                "headers": {"x-api-key": "k"}
            }
        });
        let schema = McpInstallSchema::from_value(&raw).unwrap();

        let manifest = PluginManifest::from_schema(&schema);
        assert_eq!(manifest.identifier, "search");
        assert_eq!(manifest.version, "0.3.1");
        assert_eq!(manifest.meta.title, "Search");
        assert_eq!(manifest.meta.author, "Acme");
        assert_eq!(manifest.connection, schema.config);
    }
}
