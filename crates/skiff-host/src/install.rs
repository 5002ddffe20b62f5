//! Sender-side install controller.
//!
//! Validates inbound install triggers and broadcasts the sealed request to
//! the chat surface for confirmation. The returned boolean only says the
//! message left this process; it does not mean the user saw or confirmed
//! anything.

use std::sync::Arc;

use serde::Deserialize;
use skiff_core::install::{InstallRequest, RequestError, INSTALL_CHANNEL, INSTALL_SURFACE};
use tracing::{debug, warn};

use crate::protocol::ProtocolCommand;
use crate::surfaces::SurfaceRegistry;

/// Inbound install trigger payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpInstallParams {
    pub id: String,
    pub market_id: Option<String>,
    pub schema: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Handles `plugin/install` protocol commands.
pub struct McpInstallCtl {
    surfaces: Arc<SurfaceRegistry>,
}

impl McpInstallCtl {
    /// Action name this controller answers to.
    pub const ACTION: &'static str = "install";

    pub fn new(surfaces: Arc<SurfaceRegistry>) -> Self {
        Self { surfaces }
    }

    /// Adapt a parsed protocol command into an install trigger.
    pub fn handle_command(&self, command: &ProtocolCommand) -> bool {
        let params = McpInstallParams {
            id: command.params.get("id").cloned().unwrap_or_default(),
            market_id: command.params.get("marketId").cloned(),
            schema: command.params.get("schema").cloned().unwrap_or_default(),
            kind: command.action.clone(),
        };
        self.handle_install_request(&params)
    }

    /// Validate an install trigger and broadcast it for confirmation.
    ///
    /// Terminal at this side: every rejection returns `false` with nothing
    /// partially processed, and `true` only means the request reached the
    /// surface's channel.
    pub fn handle_install_request(&self, params: &McpInstallParams) -> bool {
        if params.kind != Self::ACTION {
            warn!(kind = %params.kind, "ignoring non-install plugin command");
            return false;
        }

        if params.id.is_empty() || params.schema.is_empty() {
            warn!(
                has_id = !params.id.is_empty(),
                has_schema = !params.schema.is_empty(),
                "install trigger is missing required parameters"
            );
            return false;
        }

        let request =
            match InstallRequest::build(&params.id, &params.schema, params.market_id.as_deref()) {
                Ok(request) => request,
                Err(err) => {
                    log_rejection(&params.id, &err);
                    return false;
                }
            };

        debug!(
            plugin_id = %request.plugin_id,
            plugin_name = %request.schema.name,
            plugin_version = %request.schema.version,
            market_id = request.market_id.as_deref().unwrap_or("-"),
            source = %request.source,
            "install request validated"
        );

        let delivered = self
            .surfaces
            .broadcast_to_surface(INSTALL_SURFACE, INSTALL_CHANNEL, &request);

        if delivered {
            debug!(plugin_id = %request.plugin_id, "install request broadcast to surface");
        }

        delivered
    }
}

fn log_rejection(id: &str, err: &RequestError) {
    match err {
        RequestError::MalformedPayload(cause) => {
            warn!(plugin_id = %id, error = %cause, "install schema is not valid JSON");
        }
        RequestError::InvalidSchema(cause) => {
            warn!(plugin_id = %id, error = %cause, "install schema failed validation");
        }
        RequestError::IdentityMismatch {
            request_id,
            schema_id,
        } => {
            warn!(
                request_id = %request_id,
                schema_id = %schema_id,
                "schema identifier does not match the addressed plugin id"
            );
        }
    }
}
