//! Action planning against recorded provider state
//!
//! A [`Plan`] is the bridge between a desired topology graph and the
//! engine that reconciles it: creates and no-ops in the graph's
//! evaluation order, then deletions for anything the provider still
//! holds that the topology no longer wants.

use std::collections::BTreeMap;

use netweave_topology::{Entity, TopologyGraph};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::{ProviderState, ResourceState};

/// One planned step for one resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Unique identifier for the action
    pub id: String,

    pub action_type: ActionType,

    /// Resource type (e.g. "subnet", "nat-gateway")
    pub resource_type: String,

    /// Plan-time resource name
    pub resource_id: String,

    /// Human-readable description of the step
    pub description: String,

    /// Additional details, including the full entity for creates
    pub details: BTreeMap<String, serde_json::Value>,
}

/// Type of action to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Create a new resource
    Create,
    /// Update an existing resource
    Update,
    /// Delete a resource
    Delete,
    /// No changes needed
    NoOp,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::Delete => write!(f, "delete"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}

impl Action {
    fn create(entity: &Entity) -> Result<Self> {
        Ok(Self {
            id: format!("create-{}", entity.key()),
            action_type: ActionType::Create,
            resource_type: entity.kind().to_string(),
            resource_id: entity.name().to_string(),
            description: describe_create(entity),
            details: BTreeMap::from([("entity".to_string(), serde_json::to_value(entity)?)]),
        })
    }

    fn noop(entity: &Entity) -> Self {
        Self {
            id: format!("noop-{}", entity.key()),
            action_type: ActionType::NoOp,
            resource_type: entity.kind().to_string(),
            resource_id: entity.name().to_string(),
            description: format!("{entity} already exists"),
            details: BTreeMap::new(),
        }
    }

    fn delete(key: &str, state: &ResourceState) -> Self {
        let name = key.split_once(':').map(|(_, name)| name).unwrap_or(key);
        Self {
            id: format!("delete-{key}"),
            action_type: ActionType::Delete,
            resource_type: state.resource_type.clone(),
            resource_id: name.to_string(),
            description: format!("Delete {} {} ({})", state.resource_type, name, state.id),
            details: BTreeMap::new(),
        }
    }
}

fn describe_create(entity: &Entity) -> String {
    match entity {
        Entity::Vpc(v) => format!("Create VPC {} ({})", v.name, v.cidr),
        Entity::Subnet(s) => format!(
            "Create {} subnet {} ({}) in {}",
            s.kind, s.name, s.cidr, s.zone.name
        ),
        Entity::InternetGateway(g) => format!("Create internet gateway {}", g.name),
        Entity::ElasticIp(e) => format!("Allocate Elastic IP {}", e.name),
        Entity::NatGateway(n) => {
            format!("Create NAT gateway {} in subnet {}", n.name, n.public_subnet)
        }
        Entity::RouteTable(t) => format!("Create route table {}", t.name),
        Entity::RouteTableAssociation(a) => {
            format!("Associate subnet {} with route table {}", a.subnet, a.route_table)
        }
    }
}

/// Teardown order for resource kinds, dependents before their targets
fn teardown_rank(kind: &str) -> u8 {
    match kind {
        "route-table-association" => 0,
        "route-table" => 1,
        "nat-gateway" => 2,
        "elastic-ip" => 3,
        "subnet" => 4,
        "internet-gateway" => 5,
        "vpc" => 6,
        _ => 7,
    }
}

/// Plan containing all actions to be applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub actions: Vec<Action>,

    /// Whether the plan has any changes
    pub has_changes: bool,
}

impl Plan {
    pub fn new(actions: Vec<Action>) -> Self {
        let has_changes = actions.iter().any(|a| a.action_type != ActionType::NoOp);
        Self {
            actions,
            has_changes,
        }
    }

    pub fn empty() -> Self {
        Self {
            actions: Vec::new(),
            has_changes: false,
        }
    }

    /// Diff a desired topology against recorded provider state.
    ///
    /// Creates and no-ops come out in the graph's evaluation order, so
    /// an engine replaying the list sequentially never references a
    /// resource before its prerequisites. Deletions for stale state
    /// entries follow, most-dependent kinds first: shrinking the zone
    /// count tears down a zone's associations and route tables before
    /// the gateways and subnets they point at.
    pub fn for_topology(desired: &TopologyGraph, current: &ProviderState) -> Result<Self> {
        let mut actions = Vec::new();

        for id in desired.evaluation_order()? {
            let entity = desired.node(id);
            match current.get(&entity.key()) {
                None => actions.push(Action::create(entity)?),
                Some(_) => actions.push(Action::noop(entity)),
            }
        }

        let mut stale: Vec<(&String, &ResourceState)> = current
            .iter()
            .filter(|(key, _)| desired.get(key.as_str()).is_none())
            .collect();
        stale.sort_by_key(|&(key, state)| (teardown_rank(&state.resource_type), key));
        for (key, state) in stale {
            actions.push(Action::delete(key, state));
        }

        Ok(Plan::new(actions))
    }

    /// Get actions by type
    pub fn actions_by_type(&self, action_type: ActionType) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.action_type == action_type)
            .collect()
    }

    /// Summary of the plan
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            create: self.actions_by_type(ActionType::Create).len(),
            update: self.actions_by_type(ActionType::Update).len(),
            delete: self.actions_by_type(ActionType::Delete).len(),
            no_change: self.actions_by_type(ActionType::NoOp).len(),
        }
    }
}

/// Summary of planned actions
#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub no_change: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to delete, {} unchanged",
            self.create, self.update, self.delete, self.no_change
        )
    }
}

/// Result of applying actions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyResult {
    /// Successfully applied actions
    pub succeeded: Vec<ActionResult>,

    /// Failed actions
    pub failed: Vec<ActionResult>,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl ApplyResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn add_success(&mut self, action_id: String, message: String) {
        self.succeeded.push(ActionResult {
            action_id,
            success: true,
            message,
            error: None,
        });
    }

    pub fn add_failure(&mut self, action_id: String, error: String) {
        self.failed.push(ActionResult {
            action_id,
            success: false,
            message: String::new(),
            error: Some(error),
        });
    }
}

/// Result of a single action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub action_id: String,
    pub success: bool,
    pub message: String,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ResourceStatus;
    use netweave_topology::{NetworkConfig, ZoneCatalog, plan};

    fn topology() -> TopologyGraph {
        let config = NetworkConfig::new("demo").with_zone_count(2);
        let catalog = ZoneCatalog::new(["us-east-1a", "us-east-1b"]);
        plan(&config, &catalog).unwrap()
    }

    #[test]
    fn test_fresh_state_creates_everything() {
        let topology = topology();
        let plan = Plan::for_topology(&topology, &ProviderState::new()).unwrap();

        assert!(plan.has_changes);
        assert_eq!(plan.actions.len(), topology.len());
        assert!(plan.actions.iter().all(|a| a.action_type == ActionType::Create));
        assert_eq!(plan.actions[0].resource_type, "vpc");
    }

    #[test]
    fn test_recorded_state_is_a_noop() {
        let topology = topology();
        let mut state = ProviderState::new();
        for (_, entity) in topology.nodes() {
            state.add(
                entity.key(),
                ResourceState::new(format!("id-{}", entity.name()), entity.kind())
                    .with_status(ResourceStatus::Available),
            );
        }

        let plan = Plan::for_topology(&topology, &state).unwrap();
        assert!(!plan.has_changes);
        assert_eq!(plan.summary().no_change, topology.len());
    }

    #[test]
    fn test_stale_entries_deleted_dependents_first() {
        let topology = topology();
        let mut state = ProviderState::new();
        state.add(
            "subnet:demo-public-3".to_string(),
            ResourceState::new("subnet-123", "subnet"),
        );
        state.add(
            "route-table-association:demo-public-3-rta".to_string(),
            ResourceState::new("rta-123", "route-table-association"),
        );
        state.add(
            "nat-gateway:demo-nat-3".to_string(),
            ResourceState::new("nat-123", "nat-gateway"),
        );

        let plan = Plan::for_topology(&topology, &state).unwrap();
        let deletes: Vec<&str> = plan
            .actions_by_type(ActionType::Delete)
            .iter()
            .map(|a| a.resource_type.as_str())
            .collect();
        assert_eq!(deletes, ["route-table-association", "nat-gateway", "subnet"]);
    }

    #[test]
    fn test_create_order_follows_dependencies() {
        let topology = topology();
        let plan = Plan::for_topology(&topology, &ProviderState::new()).unwrap();
        let position = |resource_type: &str, name: &str| {
            plan.actions
                .iter()
                .position(|a| a.resource_type == resource_type && a.resource_id == name)
                .unwrap()
        };

        assert!(position("internet-gateway", "demo-igw") < position("nat-gateway", "demo-nat-1"));
        assert!(position("subnet", "demo-public-2") < position("nat-gateway", "demo-nat-2"));
        assert!(
            position("nat-gateway", "demo-nat-1") < position("route-table", "demo-private-rt-1")
        );
    }

    #[test]
    fn test_summary_display() {
        let summary = PlanSummary {
            create: 2,
            update: 0,
            delete: 1,
            no_change: 5,
        };
        assert_eq!(
            summary.to_string(),
            "2 to create, 0 to update, 1 to delete, 5 unchanged"
        );
    }
}
