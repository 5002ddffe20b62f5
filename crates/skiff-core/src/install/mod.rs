//! MCP tool-plugin install-request protocol.
//!
//! An external actor (a marketplace page, a deep link, another process) asks
//! the app to install a tool plugin described by an untrusted schema. This
//! module owns the request side of that flow: validating the schema,
//! classifying where it came from, sealing the canonical install request that
//! crosses the process boundary, and the receiver-side confirmation flow that
//! registers and enables the plugin once the user agrees.

mod confirm;
mod manifest;
mod request;
mod schema;
mod trust;

pub use confirm::{
    CommitError, CommitStep, ConfirmState, InstallConfirmFlow, InstallOutcome, PluginRegistry,
};
pub use manifest::{PluginManifest, PluginMeta};
pub use request::{InstallRequest, RequestError};
pub use schema::{McpConnection, McpInstallSchema, SchemaError};
pub use trust::TrustSource;

/// Channel name install requests are broadcast under. Shared between the
/// privileged sender and the receiving surface.
pub const INSTALL_CHANNEL: &str = "mcpInstallRequest";

/// UI surface addressed by install broadcasts.
pub const INSTALL_SURFACE: &str = "chat";
