//! Built-in availability-zone lists
//!
//! Stands in for the cloud environment's zone query when the operator
//! does not pass `--available-zones`. The lists only need to cover the
//! regions we deploy to; anything else must be supplied explicitly.

use netweave_topology::ZoneCatalog;

const REGIONS: &[(&str, &[&str])] = &[
    (
        "us-east-1",
        &[
            "us-east-1a",
            "us-east-1b",
            "us-east-1c",
            "us-east-1d",
            "us-east-1e",
            "us-east-1f",
        ],
    ),
    ("us-east-2", &["us-east-2a", "us-east-2b", "us-east-2c"]),
    (
        "us-west-2",
        &["us-west-2a", "us-west-2b", "us-west-2c", "us-west-2d"],
    ),
    ("eu-west-1", &["eu-west-1a", "eu-west-1b", "eu-west-1c"]),
    (
        "eu-central-1",
        &["eu-central-1a", "eu-central-1b", "eu-central-1c"],
    ),
    (
        "ap-northeast-1",
        &["ap-northeast-1a", "ap-northeast-1c", "ap-northeast-1d"],
    ),
];

/// Zone catalog for a known region
pub fn zone_catalog(region: &str) -> Option<ZoneCatalog> {
    REGIONS
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, zones)| ZoneCatalog::new(zones.iter().copied()))
}

/// Names of all built-in regions, for error messages
pub fn known_regions() -> Vec<&'static str> {
    REGIONS.iter().map(|(name, _)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_region() {
        let catalog = zone_catalog("us-east-1").unwrap();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.names()[0], "us-east-1a");
    }

    #[test]
    fn test_unknown_region() {
        assert!(zone_catalog("mars-north-1").is_none());
        assert!(known_regions().contains(&"eu-west-1"));
    }
}
