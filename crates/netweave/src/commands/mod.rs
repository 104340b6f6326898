pub mod outputs;
pub mod plan;
pub mod validate;

use anyhow::{Context, bail};
use netweave_topology::{NetworkConfig, ZoneCatalog};

use crate::TopologyInput;
use crate::regions;

/// Build the network configuration from a file and/or flags.
///
/// Flags win over file values so a checked-in config can be overridden
/// per invocation.
pub fn resolve_config(input: &TopologyInput) -> anyhow::Result<NetworkConfig> {
    let mut config = match &input.file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            serde_json::from_str::<NetworkConfig>(&content)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => match &input.cluster_name {
            Some(name) => NetworkConfig::new(name),
            None => bail!("either --cluster-name or --file is required"),
        },
    };

    if input.file.is_some() {
        if let Some(name) = &input.cluster_name {
            config.cluster_name = name.clone();
        }
    }
    if let Some(cidr) = &input.vpc_cidr {
        config.vpc_cidr = cidr.clone();
    }
    if let Some(zones) = input.zones {
        config.zone_count = zones;
    }

    Ok(config)
}

/// Resolve the environment's zone list: an explicit override wins,
/// otherwise the built-in table for the requested region.
pub fn resolve_zones(input: &TopologyInput) -> anyhow::Result<ZoneCatalog> {
    if let Some(names) = &input.available_zones {
        let names: Vec<String> = names
            .iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if !names.is_empty() {
            return Ok(ZoneCatalog::new(names));
        }
    }

    regions::zone_catalog(&input.region).with_context(|| {
        format!(
            "unknown region '{}' (built-in regions: {}; use --available-zones to supply zones)",
            input.region,
            regions::known_regions().join(", ")
        )
    })
}
