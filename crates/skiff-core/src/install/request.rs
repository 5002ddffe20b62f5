//! Building the canonical install request from an external trigger.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::schema::{McpInstallSchema, SchemaError};
use super::trust::TrustSource;

/// Why an inbound install trigger was rejected before reaching the user.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The schema parameter did not decode as JSON.
    #[error("install payload is not valid JSON: {0}")]
    MalformedPayload(#[from] serde_json::Error),
    /// The decoded schema violated a structural rule.
    #[error("invalid plugin schema: {0}")]
    InvalidSchema(#[from] SchemaError),
    /// The schema claims a different plugin than the one the request
    /// addresses.
    #[error("schema identifier '{schema_id}' does not match request id '{request_id}'")]
    IdentityMismatch {
        request_id: String,
        schema_id: String,
    },
}

/// The canonical install-request message crossing the process boundary.
///
/// Immutable once built; consumed exactly once by the confirmation flow on
/// the receiving surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallRequest {
    pub plugin_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_id: Option<String>,
    pub schema: McpInstallSchema,
    pub source: TrustSource,
}

impl InstallRequest {
    /// Decode, validate, and seal an install request.
    ///
    /// The schema's own `identifier` must match the id the trigger addressed;
    /// a payload claiming a different plugin than the one it was sent for is
    /// rejected outright.
    pub fn build(
        id: &str,
        raw_schema: &str,
        market_id: Option<&str>,
    ) -> Result<Self, RequestError> {
        let raw: serde_json::Value = serde_json::from_str(raw_schema)?;
        let schema = McpInstallSchema::from_value(&raw)?;

        if schema.identifier != id {
            return Err(RequestError::IdentityMismatch {
                request_id: id.to_string(),
                schema_id: schema.identifier,
            });
        }

        let source = TrustSource::from_market_id(market_id);

        Ok(Self {
            plugin_id: id.to_string(),
            market_id: market_id.map(str::to_string),
            schema,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTTP_SCHEMA: &str = r#"{
        "identifier": "abc",
        "name": "X",
        "author": "A",
        "description": "d",
        "version": "1.0",
        "config": {"type": "http", "url": "https://x.test/mcp"}
    }"#;

    #[test]
    fn builds_request_with_official_source() {
        let request = InstallRequest::build("abc", HTTP_SCHEMA, Some("lobehub")).unwrap();
        assert_eq!(request.plugin_id, "abc");
        assert_eq!(request.market_id.as_deref(), Some("lobehub"));
        assert_eq!(request.source, TrustSource::Official);
        assert_eq!(request.schema.config.kind(), "http");
    }

    #[test]
    fn unknown_market_builds_third_party_request() {
        let request = InstallRequest::build("abc", HTTP_SCHEMA, Some("unknown-market")).unwrap();
        assert_eq!(request.source, TrustSource::ThirdParty);
    }

    #[test]
    fn absent_market_builds_third_party_request() {
        let request = InstallRequest::build("abc", HTTP_SCHEMA, None).unwrap();
        assert_eq!(request.source, TrustSource::ThirdParty);
        assert!(request.market_id.is_none());
    }

    #[test]
    fn rejects_undecodable_payload() {
        let err = InstallRequest::build("abc", "{not json", None).unwrap_err();
        assert!(matches!(err, RequestError::MalformedPayload(_)));
    }

    #[test]
    fn rejects_structurally_invalid_schema() {
        let raw = r#"{"identifier": "abc", "name": "X"}"#;
        let err = InstallRequest::build("abc", raw, None).unwrap_err();
        assert!(matches!(err, RequestError::InvalidSchema(_)));
    }

    #[test]
    fn rejects_identifier_mismatch_even_for_valid_schema() {
        let err = InstallRequest::build("other-id", HTTP_SCHEMA, Some("lobehub")).unwrap_err();
        match err {
            RequestError::IdentityMismatch {
                request_id,
                schema_id,
            } => {
                assert_eq!(request_id, "other-id");
                assert_eq!(schema_id, "abc");
            }
            other => panic!("expected identity mismatch, got {other:?}"),
        }
    }

    #[test]
    fn wire_format_is_camel_case_and_omits_absent_market() {
        let request = InstallRequest::build("abc", HTTP_SCHEMA, None).unwrap();
        let wire = serde_json::to_value(&request).unwrap();

        assert_eq!(wire["pluginId"], "abc");
        assert!(wire.get("marketId").is_none());
        assert_eq!(wire["source"], "third_party");

        let back: InstallRequest = serde_json::from_value(wire).unwrap();
        assert_eq!(back, request);
    }
}
