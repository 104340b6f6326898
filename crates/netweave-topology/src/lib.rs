//! Network topology planning for multi-AZ cloud VPCs
//!
//! Given a [`NetworkConfig`] and the environment's availability-zone
//! list, the planner derives the complete entity graph for a VPC:
//! paired public/private subnets per zone, one internet gateway, one
//! NAT gateway per zone (zone loss never takes out another zone's
//! egress), and the route tables and associations binding them. The
//! graph is a pure function of its inputs; turning it into live cloud
//! resources is the job of a provisioning engine (see the
//! `netweave-cloud` crate).
//!
//! # Address layout
//!
//! Public subnet `i` takes the VPC block's third octet `i`, private
//! subnet `i` takes `i + 10`, each as a `/24`:
//!
//! ```text
//! 10.0.0.0/16
//! ├── 10.0.0.0/24   public-1        ├── 10.0.10.0/24  private-1
//! ├── 10.0.1.0/24   public-2        ├── 10.0.11.0/24  private-2
//! └── 10.0.2.0/24   public-3        └── 10.0.12.0/24  private-3
//! ```
//!
//! Route-table fan-out is deliberately asymmetric: every public subnet
//! shares one table (single egress path through the internet gateway)
//! while each private subnet gets its zone's own table (egress paths
//! differ per zone).

pub mod config;
pub mod entity;
pub mod error;
pub mod graph;
pub mod planner;
pub mod zone;

// Re-exports
pub use config::{DEFAULT_VPC_CIDR, DEFAULT_ZONE_COUNT, NetworkConfig};
pub use entity::{
    ElasticIp, Entity, InternetGateway, NatGateway, Route, RouteTable, RouteTableAssociation,
    RouteTableScope, RouteTarget, Subnet, SubnetKind, Vpc,
};
pub use error::{ErrorKind, Result, TopologyError};
pub use graph::{NodeId, TopologyGraph, TopologyOutputs};
pub use planner::plan;
pub use zone::{AvailabilityZone, ZoneCatalog};
