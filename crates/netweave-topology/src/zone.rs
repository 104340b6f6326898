//! Availability zone selection
//!
//! The zone list comes from the environment (a cloud query or an
//! operator override) and is treated as read-only input. Selection is
//! deterministic: names are sorted lexicographically and the first
//! `zone_count` entries are taken, so the zone at a given index never
//! changes unless the environment's list itself changes.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TopologyError};

/// One availability zone slot in a plan.
///
/// The index is the sole correlation key between a zone's subnet pair,
/// NAT gateway and private route table. Growing or shrinking the zone
/// count appends or removes the highest indices; existing zones are
/// never renumbered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityZone {
    /// Zero-based position in the plan
    pub index: u32,

    /// Provider-reported zone name (e.g. "us-east-1a")
    pub name: String,
}

/// The environment's reported zone names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneCatalog {
    names: Vec<String>,
}

impl ZoneCatalog {
    /// Build a catalog from provider-reported names.
    ///
    /// Names are sorted and deduplicated up front so every later lookup
    /// sees the same ordering.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Take the first `count` zones.
    ///
    /// Fails if the environment reports fewer zones than requested; the
    /// count is never silently truncated.
    pub fn select(&self, count: u32) -> Result<Vec<AvailabilityZone>> {
        if count as usize > self.names.len() {
            return Err(TopologyError::NotEnoughZones {
                requested: count,
                available: self.names.len(),
            });
        }

        Ok(self
            .names
            .iter()
            .take(count as usize)
            .enumerate()
            .map(|(index, name)| AvailabilityZone {
                index: index as u32,
                name: name.clone(),
            })
            .collect())
    }
}
