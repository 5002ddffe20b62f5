//! Receiver-side confirmation flow for install requests.
//!
//! Holds at most one pending request at a time and drives the two-step
//! commit (register, then enable) once the user confirms.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::manifest::PluginManifest;
use super::request::InstallRequest;

/// Plugin store collaborator. Both calls are awaited external operations
/// treated as black boxes here.
#[async_trait]
pub trait PluginRegistry: Send + Sync {
    /// Persist a newly installed plugin.
    async fn register(&self, manifest: PluginManifest) -> Result<()>;

    /// Enable a registered plugin by identifier.
    async fn enable(&self, identifier: &str) -> Result<()>;
}

#[async_trait]
impl<T: PluginRegistry + ?Sized> PluginRegistry for Arc<T> {
    async fn register(&self, manifest: PluginManifest) -> Result<()> {
        T::register(self, manifest).await
    }

    async fn enable(&self, identifier: &str) -> Result<()> {
        T::enable(self, identifier).await
    }
}

/// Which commit step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStep {
    Register,
    Enable,
}

impl std::fmt::Display for CommitStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitStep::Register => write!(f, "register"),
            CommitStep::Enable => write!(f, "enable"),
        }
    }
}

/// A commit step failed. The flow is back at idle; when the failing step was
/// `enable`, the plugin stays registered but disabled and the user may retry
/// installation manually.
#[derive(Debug, Error)]
#[error("plugin {step} step failed: {cause}")]
pub struct CommitError {
    pub step: CommitStep,
    #[source]
    pub cause: anyhow::Error,
}

/// States of the confirmation flow. Only `Idle` and `PendingConfirmation`
/// are resting states; `Installing` is transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmState {
    Idle,
    PendingConfirmation,
    Installing,
}

/// User-visible result of a confirmed installation.
#[derive(Debug)]
pub enum InstallOutcome {
    Installed { identifier: String, name: String },
    Failed(CommitError),
}

/// Single-slot confirmation state machine.
///
/// One logical owner drives it (`&mut self`), which makes the at-most-one
/// pending request and the no-cancel-mid-commit rules structural: nothing
/// can interleave with an in-flight `confirm`.
pub struct InstallConfirmFlow<R> {
    registry: R,
    pending: Option<InstallRequest>,
    state: ConfirmState,
}

impl<R: PluginRegistry> InstallConfirmFlow<R> {
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            pending: None,
            state: ConfirmState::Idle,
        }
    }

    pub fn state(&self) -> ConfirmState {
        self.state
    }

    /// The request currently awaiting the user's decision.
    pub fn pending(&self) -> Option<&InstallRequest> {
        self.pending.as_ref()
    }

    /// Accept an incoming install request for confirmation.
    ///
    /// A request arriving while another is still pending replaces it: last
    /// writer wins, the superseded request is dropped, never queued.
    pub fn receive(&mut self, request: InstallRequest) {
        if let Some(previous) = self.pending.replace(request) {
            debug!(plugin_id = %previous.plugin_id, "superseding pending install request");
        }
        self.state = ConfirmState::PendingConfirmation;
    }

    /// Discard the pending request without installing anything.
    pub fn cancel(&mut self) {
        if let Some(request) = self.pending.take() {
            debug!(plugin_id = %request.plugin_id, "install request cancelled");
        }
        self.state = ConfirmState::Idle;
    }

    /// Run the two-step commit for the pending request.
    ///
    /// Returns `None` when nothing is pending. Every other path clears the
    /// slot and ends back at idle: commit failures are reported through the
    /// outcome, never propagated, and never retried here.
    pub async fn confirm(&mut self) -> Option<InstallOutcome> {
        let request = self.pending.take()?;
        self.state = ConfirmState::Installing;

        let outcome = self.commit(&request).await;
        self.state = ConfirmState::Idle;

        match &outcome {
            InstallOutcome::Installed { identifier, name } => {
                info!(plugin_id = %identifier, name = %name, "plugin installed and enabled");
            }
            InstallOutcome::Failed(err) => {
                warn!(plugin_id = %request.plugin_id, error = %err, "plugin installation failed");
            }
        }

        Some(outcome)
    }

    async fn commit(&self, request: &InstallRequest) -> InstallOutcome {
        let manifest = PluginManifest::from_schema(&request.schema);

        if let Err(cause) = self.registry.register(manifest).await {
            return InstallOutcome::Failed(CommitError {
                step: CommitStep::Register,
                cause,
            });
        }

        if let Err(cause) = self.registry.enable(&request.schema.identifier).await {
            return InstallOutcome::Failed(CommitError {
                step: CommitStep::Enable,
                cause,
            });
        }

        InstallOutcome::Installed {
            identifier: request.schema.identifier.clone(),
            name: request.schema.name.clone(),
        }
    }
}
