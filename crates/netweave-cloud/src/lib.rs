//! netweave provisioning boundary
//!
//! This crate is the seam between the pure topology planner and
//! whatever engine turns plans into live cloud resources.
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  netweave CLI                    │
//! │            (netweave plan / outputs)             │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               netweave-cloud                     │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  Action planning (topology diff → Plan)   │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐             │
//! │  │ trait        │  │  State Mgmt  │             │
//! │  │ CloudProvider│  │ (.netweave/) │             │
//! │  └──────┬───────┘  └──────────────┘             │
//! └─────────┼───────────────────────────────────────┘
//!           │
//! ┌─────────▼───────┐
//! │  provisioning   │
//! │  engine (AWS,   │
//! │  out of tree)   │
//! └─────────────────┘
//! ```
//!
//! Plans preserve the topology graph's evaluation order, so an engine
//! replaying actions sequentially already respects the hard orderings
//! (internet gateway before NAT gateways, subnets before their route
//! table associations). Engines that parallelize may do so per zone as
//! long as those edges hold.

pub mod action;
pub mod error;
pub mod provider;
pub mod state;

// Re-exports
pub use action::{Action, ActionResult, ActionType, ApplyResult, Plan, PlanSummary};
pub use error::{CloudError, Result};
pub use provider::{AuthStatus, CloudProvider};
pub use state::{
    GlobalState, ProviderState, PublishedValues, ResourceState, ResourceStatus, StateLock,
    StateManager, published_values,
};
