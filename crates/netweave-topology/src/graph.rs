//! Explicit dependency graph over planned entities
//!
//! Provisioning order is encoded as edges rather than inferred by an
//! external engine, so the two hard orderings (internet gateway before
//! any NAT gateway, subnets before their route-table associations) are
//! visible in the data and testable in isolation.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use serde::Serialize;

use crate::entity::{Entity, Subnet, SubnetKind, Vpc};
use crate::error::{Result, TopologyError};

/// Handle to a node in a [`TopologyGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The planned topology: typed nodes plus (prerequisite, dependent) edges
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopologyGraph {
    nodes: Vec<Entity>,
    edges: Vec<(NodeId, NodeId)>,

    #[serde(skip)]
    index: HashMap<String, NodeId>,
}

impl TopologyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity and return its handle.
    ///
    /// Keys must be unique; the planner guarantees this by naming every
    /// entity after its cluster, kind and zone index.
    pub fn add(&mut self, entity: Entity) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.index.insert(entity.key(), id);
        self.nodes.push(entity);
        id
    }

    /// Record that `dependent` must be provisioned after `prerequisite`
    pub fn depends_on(&mut self, dependent: NodeId, prerequisite: NodeId) {
        self.edges.push((prerequisite, dependent));
    }

    pub fn node(&self, id: NodeId) -> &Entity {
        &self.nodes[id.0]
    }

    /// Look up an entity by its `type:id` key
    pub fn get(&self, key: &str) -> Option<&Entity> {
        self.index.get(key).map(|id| &self.nodes[id.0])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Entity)> {
        self.nodes.iter().enumerate().map(|(i, e)| (NodeId(i), e))
    }

    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    /// Dependency-respecting evaluation order.
    ///
    /// Kahn's algorithm with the ready set drained in ascending node id,
    /// so the result is fully determined by the graph contents. The
    /// planner never builds cycles; the error arm guards against future
    /// construction bugs rather than panicking in a consumer.
    pub fn evaluation_order(&self) -> Result<Vec<NodeId>> {
        let mut indegree = vec![0usize; self.nodes.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for (pre, dep) in &self.edges {
            indegree[dep.0] += 1;
            dependents[pre.0].push(dep.0);
        }

        let mut ready: BinaryHeap<Reverse<usize>> = indegree
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(Reverse(i)) = ready.pop() {
            order.push(NodeId(i));
            for &dep in &dependents[i] {
                indegree[dep] -= 1;
                if indegree[dep] == 0 {
                    ready.push(Reverse(dep));
                }
            }
        }

        if order.len() != self.nodes.len() {
            let stuck = indegree
                .iter()
                .position(|&d| d > 0)
                .map(|i| self.nodes[i].key())
                .unwrap_or_default();
            return Err(TopologyError::DependencyCycle(stuck));
        }

        Ok(order)
    }

    pub fn vpc(&self) -> Option<&Vpc> {
        self.nodes.iter().find_map(|e| match e {
            Entity::Vpc(v) => Some(v),
            _ => None,
        })
    }

    /// Subnets of the given kind, ordered by zone index
    pub fn subnets(&self, kind: SubnetKind) -> Vec<&Subnet> {
        let mut subnets: Vec<&Subnet> = self
            .nodes
            .iter()
            .filter_map(|e| match e {
                Entity::Subnet(s) if s.kind == kind => Some(s),
                _ => None,
            })
            .collect();
        subnets.sort_by_key(|s| s.zone.index);
        subnets
    }

    /// Values downstream consumers bind to: the VPC and the ordered
    /// subnet name lists. Identifiers get resolved only after an engine
    /// applies the plan.
    pub fn outputs(&self) -> TopologyOutputs {
        TopologyOutputs {
            vpc: self.vpc().map(|v| v.name.clone()).unwrap_or_default(),
            public_subnets: self
                .subnets(SubnetKind::Public)
                .iter()
                .map(|s| s.name.clone())
                .collect(),
            private_subnets: self
                .subnets(SubnetKind::Private)
                .iter()
                .map(|s| s.name.clone())
                .collect(),
        }
    }
}

/// Plan-time published values, in zone-index order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyOutputs {
    pub vpc: String,
    pub public_subnets: Vec<String>,
    pub private_subnets: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::InternetGateway;

    fn gateway(name: &str) -> Entity {
        Entity::InternetGateway(InternetGateway {
            name: name.to_string(),
        })
    }

    #[test]
    fn test_evaluation_order_respects_edges() {
        let mut graph = TopologyGraph::new();
        let a = graph.add(gateway("a"));
        let b = graph.add(gateway("b"));
        let c = graph.add(gateway("c"));
        graph.depends_on(a, c);
        graph.depends_on(b, a);

        let order = graph.evaluation_order().unwrap();
        let pos = |id: NodeId| order.iter().position(|&o| o == id).unwrap();
        assert!(pos(c) < pos(a));
        assert!(pos(a) < pos(b));
    }

    #[test]
    fn test_evaluation_order_is_deterministic() {
        let build = || {
            let mut graph = TopologyGraph::new();
            let a = graph.add(gateway("a"));
            let b = graph.add(gateway("b"));
            let c = graph.add(gateway("c"));
            graph.depends_on(c, a);
            graph.depends_on(c, b);
            graph
        };
        assert_eq!(
            build().evaluation_order().unwrap(),
            build().evaluation_order().unwrap()
        );
    }

    #[test]
    fn test_cycle_is_an_error() {
        let mut graph = TopologyGraph::new();
        let a = graph.add(gateway("a"));
        let b = graph.add(gateway("b"));
        graph.depends_on(a, b);
        graph.depends_on(b, a);

        assert!(matches!(
            graph.evaluation_order(),
            Err(TopologyError::DependencyCycle(_))
        ));
    }

    #[test]
    fn test_key_lookup() {
        let mut graph = TopologyGraph::new();
        graph.add(gateway("demo-igw"));
        assert!(graph.get("internet-gateway:demo-igw").is_some());
        assert!(graph.get("internet-gateway:other").is_none());
    }
}
