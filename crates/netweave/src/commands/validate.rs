use colored::Colorize;
use netweave_topology::{ErrorKind, NetworkConfig, ZoneCatalog};

pub async fn handle(config: &NetworkConfig, catalog: &ZoneCatalog) -> anyhow::Result<()> {
    println!("{}", "Validating network configuration...".blue());

    match config.validate() {
        Ok(net) => {
            println!("{}", "✓ Configuration is valid".green().bold());
            println!("  Cluster:    {}", config.cluster_name.cyan());
            println!("  VPC CIDR:   {}", net);
            println!("  Zone count: {}", config.zone_count);
        }
        Err(e) => {
            eprintln!("{}", "✗ Configuration error".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }

    match catalog.select(config.zone_count) {
        Ok(zones) => {
            println!("  Zones:");
            for zone in zones {
                println!("    - {}", zone.name.cyan());
            }
        }
        Err(e) => {
            let label = match e.kind() {
                ErrorKind::Environment => "✗ Environment error",
                _ => "✗ Configuration error",
            };
            eprintln!("{}", label.red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
