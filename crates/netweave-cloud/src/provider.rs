//! Provisioning engine trait
//!
//! netweave never calls a cloud API itself; an engine implements this
//! trait to reconcile a planned topology against live resources. The
//! provided `plan` body gives every engine the same diff semantics, so
//! implementations only need to answer "what exists" and "apply this".

use async_trait::async_trait;
use netweave_topology::TopologyGraph;
use serde::{Deserialize, Serialize};

use crate::action::{ApplyResult, Plan};
use crate::error::Result;
use crate::state::ProviderState;

/// Contract between a planned topology and a provisioning engine
#[async_trait]
pub trait CloudProvider: Send + Sync {
    /// Returns the provider name (e.g. "aws")
    fn name(&self) -> &str;

    /// Returns the provider display name for UI
    fn display_name(&self) -> &str;

    /// Check if the provider is properly configured and authenticated
    async fn check_auth(&self) -> Result<AuthStatus>;

    /// Get the current state of all resources managed by this provider
    async fn get_state(&self) -> Result<ProviderState>;

    /// Calculate the actions needed to converge on `desired`
    async fn plan(&self, desired: &TopologyGraph) -> Result<Plan> {
        let current = self.get_state().await?;
        Plan::for_topology(desired, &current)
    }

    /// Apply the planned actions
    async fn apply(&self, plan: &Plan) -> Result<ApplyResult>;

    /// Destroy all resources managed by this provider
    async fn destroy_all(&self) -> Result<ApplyResult>;
}

/// Authentication status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    /// Whether authentication is valid
    pub authenticated: bool,

    /// Account/user information if available
    pub account_info: Option<String>,

    /// Error message if not authenticated
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(account_info: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            account_info: Some(account_info.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_info: None,
            error: Some(error.into()),
        }
    }
}
