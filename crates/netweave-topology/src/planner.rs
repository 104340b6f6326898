//! Topology derivation
//!
//! A pure, single-pass function from configuration to entity graph. No
//! randomness, no wall clock, no observable map iteration order:
//! re-planning the same inputs yields a graph identical in every field.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use tracing::debug;

use crate::config::{NetworkConfig, PRIVATE_OCTET_OFFSET, SUBNET_PREFIX_LEN};
use crate::entity::{
    ElasticIp, Entity, InternetGateway, NatGateway, Route, RouteTable, RouteTableAssociation,
    RouteTableScope, RouteTarget, Subnet, SubnetKind, Vpc,
};
use crate::error::{Result, TopologyError};
use crate::graph::TopologyGraph;
use crate::zone::ZoneCatalog;

/// Plan the complete network topology for `config`.
///
/// Per zone the plan pairs one public and one private subnet, hosts a
/// NAT gateway in the public subnet, and routes the private subnet's
/// default route through that same zone's NAT gateway. Keeping the
/// private egress path inside its own zone is what preserves zone fault
/// isolation; the public subnets share a single table because they all
/// egress through the one internet gateway.
///
/// Validation runs before the first entity is emitted; a failing
/// configuration never produces a partial graph.
pub fn plan(config: &NetworkConfig, catalog: &ZoneCatalog) -> Result<TopologyGraph> {
    let vpc_cidr = config.validate()?;
    let zones = catalog.select(config.zone_count)?;

    let cluster = config.cluster_name.as_str();
    let mut graph = TopologyGraph::new();

    let vpc_id = graph.add(Entity::Vpc(Vpc {
        name: format!("{cluster}-vpc"),
        cidr: vpc_cidr,
        tags: base_tags(cluster),
    }));

    let igw_name = format!("{cluster}-igw");
    let igw_id = graph.add(Entity::InternetGateway(InternetGateway {
        name: igw_name.clone(),
    }));
    graph.depends_on(igw_id, vpc_id);

    // One table for all public subnets; their egress path is identical.
    let public_rt_name = format!("{cluster}-public-rt");
    let public_rt_id = graph.add(Entity::RouteTable(RouteTable {
        name: public_rt_name.clone(),
        scope: RouteTableScope::Public,
        zone_index: None,
        routes: vec![Route {
            destination: default_destination()?,
            target: RouteTarget::InternetGateway(igw_name),
        }],
    }));
    graph.depends_on(public_rt_id, vpc_id);
    graph.depends_on(public_rt_id, igw_id);

    for zone in &zones {
        let ordinal = zone.index + 1;
        let public_name = format!("{cluster}-public-{ordinal}");
        let private_name = format!("{cluster}-private-{ordinal}");

        let public_id = graph.add(Entity::Subnet(Subnet {
            name: public_name.clone(),
            kind: SubnetKind::Public,
            zone: zone.clone(),
            cidr: subnet_cidr(&vpc_cidr, zone.index)?,
            auto_assign_public_ip: true,
            tags: base_tags(cluster),
        }));
        graph.depends_on(public_id, vpc_id);

        let private_id = graph.add(Entity::Subnet(Subnet {
            name: private_name.clone(),
            kind: SubnetKind::Private,
            zone: zone.clone(),
            cidr: subnet_cidr(&vpc_cidr, zone.index + PRIVATE_OCTET_OFFSET)?,
            auto_assign_public_ip: false,
            tags: base_tags(cluster),
        }));
        graph.depends_on(private_id, vpc_id);

        let eip_name = format!("{cluster}-nat-eip-{ordinal}");
        let eip_id = graph.add(Entity::ElasticIp(ElasticIp {
            name: eip_name.clone(),
            zone_index: zone.index,
        }));
        graph.depends_on(eip_id, vpc_id);

        let nat_name = format!("{cluster}-nat-{ordinal}");
        let nat_id = graph.add(Entity::NatGateway(NatGateway {
            name: nat_name.clone(),
            zone_index: zone.index,
            public_subnet: public_name.clone(),
            elastic_ip: eip_name,
        }));
        graph.depends_on(nat_id, public_id);
        graph.depends_on(nat_id, eip_id);
        // NAT gateways cannot come up before the internet gateway is attached
        graph.depends_on(nat_id, igw_id);

        let private_rt_name = format!("{cluster}-private-rt-{ordinal}");
        let private_rt_id = graph.add(Entity::RouteTable(RouteTable {
            name: private_rt_name.clone(),
            scope: RouteTableScope::Private,
            zone_index: Some(zone.index),
            routes: vec![Route {
                destination: default_destination()?,
                target: RouteTarget::NatGateway(nat_name),
            }],
        }));
        graph.depends_on(private_rt_id, vpc_id);
        graph.depends_on(private_rt_id, nat_id);

        let public_assoc_id = graph.add(Entity::RouteTableAssociation(RouteTableAssociation {
            name: format!("{public_name}-rta"),
            subnet: public_name,
            route_table: public_rt_name.clone(),
        }));
        graph.depends_on(public_assoc_id, public_id);
        graph.depends_on(public_assoc_id, public_rt_id);

        let private_assoc_id = graph.add(Entity::RouteTableAssociation(RouteTableAssociation {
            name: format!("{private_name}-rta"),
            subnet: private_name,
            route_table: private_rt_name,
        }));
        graph.depends_on(private_assoc_id, private_id);
        graph.depends_on(private_assoc_id, private_rt_id);
    }

    debug!(
        "planned {} entities across {} zones for cluster {}",
        graph.len(),
        zones.len(),
        config.cluster_name
    );

    Ok(graph)
}

/// Subnet CIDR for a third-octet slot inside the VPC block
fn subnet_cidr(vpc: &Ipv4Net, octet: u32) -> Result<Ipv4Net> {
    let base = vpc.network().octets();
    net(Ipv4Addr::new(base[0], base[1], octet as u8, 0), SUBNET_PREFIX_LEN)
}

fn default_destination() -> Result<Ipv4Net> {
    net(Ipv4Addr::UNSPECIFIED, 0)
}

fn net(addr: Ipv4Addr, prefix: u8) -> Result<Ipv4Net> {
    Ipv4Net::new(addr, prefix).map_err(|_| TopologyError::InvalidCidr {
        cidr: format!("{addr}/{prefix}"),
        reason: "prefix length out of range".to_string(),
    })
}

fn base_tags(cluster: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Cluster".to_string(), cluster.to_string()),
        ("ManagedBy".to_string(), "netweave".to_string()),
    ])
}
