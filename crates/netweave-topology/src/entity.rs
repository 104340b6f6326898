//! Typed entities of a planned topology
//!
//! Entities are immutable plan-time values. Cross-references between
//! them are entity names, never provider identifiers: identifiers exist
//! only once a provisioning engine has applied the plan.

use std::collections::BTreeMap;
use std::fmt;

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

use crate::zone::AvailabilityZone;

/// Subnet visibility class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubnetKind {
    Public,
    Private,
}

impl SubnetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubnetKind::Public => "public",
            SubnetKind::Private => "private",
        }
    }
}

impl fmt::Display for SubnetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The VPC itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vpc {
    pub name: String,
    pub cidr: Ipv4Net,
    pub tags: BTreeMap<String, String>,
}

/// One subnet, bound to a single availability zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    pub name: String,
    pub kind: SubnetKind,
    pub zone: AvailabilityZone,
    pub cidr: Ipv4Net,

    /// Instances launched here get a public address iff the subnet is public
    pub auto_assign_public_ip: bool,

    pub tags: BTreeMap<String, String>,
}

/// The VPC-scoped internet gateway; exactly one per topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternetGateway {
    pub name: String,
}

/// Elastic IP allocated for one zone's NAT gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElasticIp {
    pub name: String,
    pub zone_index: u32,
}

/// Per-zone NAT gateway, hosted in that zone's public subnet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatGateway {
    pub name: String,
    pub zone_index: u32,

    /// Name of the public subnet hosting this gateway
    pub public_subnet: String,

    /// Name of the Elastic IP this gateway egresses through
    pub elastic_ip: String,
}

/// Whether a route table serves public or private subnets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteTableScope {
    Public,
    Private,
}

/// Target of a route, by entity name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteTarget {
    InternetGateway(String),
    NatGateway(String),
}

/// A single routing rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub destination: Ipv4Net,
    pub target: RouteTarget,
}

/// A route table: one shared table for all public subnets, one table
/// per zone for private subnets (their egress paths differ per zone)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    pub name: String,
    pub scope: RouteTableScope,

    /// None for the shared public table, the owning zone otherwise
    pub zone_index: Option<u32>,

    pub routes: Vec<Route>,
}

/// Binds one subnet to exactly one route table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTableAssociation {
    pub name: String,
    pub subnet: String,
    pub route_table: String,
}

/// A typed node in the topology graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Entity {
    Vpc(Vpc),
    Subnet(Subnet),
    InternetGateway(InternetGateway),
    ElasticIp(ElasticIp),
    NatGateway(NatGateway),
    RouteTable(RouteTable),
    RouteTableAssociation(RouteTableAssociation),
}

impl Entity {
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Vpc(_) => "vpc",
            Entity::Subnet(_) => "subnet",
            Entity::InternetGateway(_) => "internet-gateway",
            Entity::ElasticIp(_) => "elastic-ip",
            Entity::NatGateway(_) => "nat-gateway",
            Entity::RouteTable(_) => "route-table",
            Entity::RouteTableAssociation(_) => "route-table-association",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Vpc(v) => &v.name,
            Entity::Subnet(s) => &s.name,
            Entity::InternetGateway(g) => &g.name,
            Entity::ElasticIp(e) => &e.name,
            Entity::NatGateway(n) => &n.name,
            Entity::RouteTable(t) => &t.name,
            Entity::RouteTableAssociation(a) => &a.name,
        }
    }

    /// Stable lookup key in the `type:id` convention
    pub fn key(&self) -> String {
        format!("{}:{}", self.kind(), self.name())
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_key_convention() {
        let igw = Entity::InternetGateway(InternetGateway {
            name: "demo-igw".to_string(),
        });
        assert_eq!(igw.kind(), "internet-gateway");
        assert_eq!(igw.key(), "internet-gateway:demo-igw");
        assert_eq!(igw.to_string(), "internet-gateway demo-igw");
    }
}
