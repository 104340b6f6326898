//! Topology planner error types

use ipnet::Ipv4Net;
use thiserror::Error;

/// Errors produced while validating or planning a topology
#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("Cluster name must not be empty")]
    EmptyClusterName,

    #[error("Invalid VPC CIDR '{cidr}': {reason}")]
    InvalidCidr { cidr: String, reason: String },

    #[error(
        "VPC CIDR {0} is too narrow: the prefix must be /16 or wider so the third octet is free to vary"
    )]
    CidrPrefixTooLong(Ipv4Net),

    #[error("Zone count {0} is outside the range supported by the subnet derivation scheme")]
    ZoneCountOutOfRange(u32),

    #[error("Zone count {0} would make public and private subnet blocks overlap (maximum is 10)")]
    SubnetRangesOverlap(u32),

    #[error("Requested {requested} availability zones but the environment reports only {available}")]
    NotEnoughZones { requested: u32, available: usize },

    #[error("Dependency cycle in topology graph involving {0}")]
    DependencyCycle(String),
}

/// Broad error classification for callers that report at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configuration itself is invalid
    ConfigValidation,
    /// The environment cannot satisfy an otherwise valid configuration
    Environment,
    /// An internal invariant was broken
    Internal,
}

impl TopologyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyClusterName
            | Self::InvalidCidr { .. }
            | Self::CidrPrefixTooLong(_)
            | Self::ZoneCountOutOfRange(_)
            | Self::SubnetRangesOverlap(_) => ErrorKind::ConfigValidation,
            Self::NotEnoughZones { .. } => ErrorKind::Environment,
            Self::DependencyCycle(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, TopologyError>;
