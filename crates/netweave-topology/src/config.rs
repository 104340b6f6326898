//! Network configuration
//!
//! `NetworkConfig` is the planner's sole input besides the environment's
//! zone list. Fields stay raw strings so that malformed input surfaces
//! as a [`TopologyError`] during validation rather than a deserialize
//! failure at the config-file boundary.

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TopologyError};

/// Default VPC address space
pub const DEFAULT_VPC_CIDR: &str = "10.0.0.0/16";

/// Default number of availability zones to span
pub const DEFAULT_ZONE_COUNT: u32 = 3;

/// Third-octet offset separating private subnet blocks from public ones.
/// Public subnet `i` takes octet `i`, private subnet `i` takes
/// `i + PRIVATE_OCTET_OFFSET`.
pub const PRIVATE_OCTET_OFFSET: u32 = 10;

/// Prefix length of every derived subnet
pub const SUBNET_PREFIX_LEN: u8 = 24;

/// Desired shape of the network, before any validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Cluster name, used as the prefix of every resource name
    pub cluster_name: String,

    /// VPC address space as an IPv4 CIDR block
    #[serde(default = "default_vpc_cidr")]
    pub vpc_cidr: String,

    /// Number of availability zones the topology spans
    #[serde(default = "default_zone_count")]
    pub zone_count: u32,
}

fn default_vpc_cidr() -> String {
    DEFAULT_VPC_CIDR.to_string()
}

fn default_zone_count() -> u32 {
    DEFAULT_ZONE_COUNT
}

impl NetworkConfig {
    /// Create a configuration with the default address space and zone count
    pub fn new(cluster_name: impl Into<String>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            vpc_cidr: default_vpc_cidr(),
            zone_count: DEFAULT_ZONE_COUNT,
        }
    }

    pub fn with_vpc_cidr(mut self, cidr: impl Into<String>) -> Self {
        self.vpc_cidr = cidr.into();
        self
    }

    pub fn with_zone_count(mut self, count: u32) -> Self {
        self.zone_count = count;
        self
    }

    /// Validate the configuration and return the parsed VPC network.
    ///
    /// All checks run before the planner emits a single entity, so a
    /// failing configuration never produces a partial graph. The zone
    /// count is bounded twice: `zone_count + PRIVATE_OCTET_OFFSET` must
    /// fit the third octet, and the public octet range `[0, n-1]` must
    /// not reach into the private range starting at
    /// `PRIVATE_OCTET_OFFSET`.
    pub fn validate(&self) -> Result<Ipv4Net> {
        if self.cluster_name.trim().is_empty() {
            return Err(TopologyError::EmptyClusterName);
        }

        let vpc_cidr: Ipv4Net =
            self.vpc_cidr
                .trim()
                .parse()
                .map_err(|e: ipnet::AddrParseError| TopologyError::InvalidCidr {
                    cidr: self.vpc_cidr.clone(),
                    reason: e.to_string(),
                })?;

        if vpc_cidr.prefix_len() > 16 {
            return Err(TopologyError::CidrPrefixTooLong(vpc_cidr));
        }

        if self.zone_count == 0 || self.zone_count + PRIVATE_OCTET_OFFSET > 256 {
            return Err(TopologyError::ZoneCountOutOfRange(self.zone_count));
        }
        if self.zone_count > PRIVATE_OCTET_OFFSET {
            return Err(TopologyError::SubnetRangesOverlap(self.zone_count));
        }

        Ok(vpc_cidr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NetworkConfig::new("demo");
        assert_eq!(config.vpc_cidr, "10.0.0.0/16");
        assert_eq!(config.zone_count, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = NetworkConfig::new("demo")
            .with_vpc_cidr("172.16.0.0/16")
            .with_zone_count(2);
        let net = config.validate().unwrap();
        assert_eq!(net.to_string(), "172.16.0.0/16");
    }

    #[test]
    fn test_empty_cluster_name() {
        let config = NetworkConfig::new("  ");
        assert!(matches!(
            config.validate(),
            Err(TopologyError::EmptyClusterName)
        ));
    }

    #[test]
    fn test_invalid_cidr_syntax() {
        let config = NetworkConfig::new("demo").with_vpc_cidr("10.0.0.0/xy");
        assert!(matches!(
            config.validate(),
            Err(TopologyError::InvalidCidr { .. })
        ));
    }

    #[test]
    fn test_prefix_too_long() {
        let config = NetworkConfig::new("demo").with_vpc_cidr("10.0.0.0/20");
        assert!(matches!(
            config.validate(),
            Err(TopologyError::CidrPrefixTooLong(_))
        ));
    }

    #[test]
    fn test_wider_prefix_accepted() {
        let config = NetworkConfig::new("demo").with_vpc_cidr("10.0.0.0/8");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zone_count_zero() {
        let config = NetworkConfig::new("demo").with_zone_count(0);
        assert!(matches!(
            config.validate(),
            Err(TopologyError::ZoneCountOutOfRange(0))
        ));
    }

    #[test]
    fn test_zone_count_overlap_boundary() {
        // 10 zones fill octets 0-9 (public) and 10-19 (private): legal.
        assert!(NetworkConfig::new("demo").with_zone_count(10).validate().is_ok());
        // 11 zones would put public subnet 11 and private subnet 1 both
        // on octet 10.
        assert!(matches!(
            NetworkConfig::new("demo").with_zone_count(11).validate(),
            Err(TopologyError::SubnetRangesOverlap(11))
        ));
    }

    #[test]
    fn test_zone_count_octet_boundary() {
        // 246 is the last count whose highest private octet (255) still
        // fits; it fails on the overlap rule, not the range rule.
        assert!(matches!(
            NetworkConfig::new("demo").with_zone_count(246).validate(),
            Err(TopologyError::SubnetRangesOverlap(246))
        ));
        assert!(matches!(
            NetworkConfig::new("demo").with_zone_count(247).validate(),
            Err(TopologyError::ZoneCountOutOfRange(247))
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config: NetworkConfig =
            serde_json::from_str(r#"{"cluster_name": "demo"}"#).unwrap();
        assert_eq!(config.vpc_cidr, DEFAULT_VPC_CIDR);
        assert_eq!(config.zone_count, DEFAULT_ZONE_COUNT);
    }
}
