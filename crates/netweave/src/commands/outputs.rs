use colored::Colorize;
use netweave_cloud::{StateManager, published_values};
use netweave_topology::{NetworkConfig, ZoneCatalog};

pub async fn handle(config: &NetworkConfig, catalog: &ZoneCatalog) -> anyhow::Result<()> {
    let topology = netweave_topology::plan(config, catalog)?;

    let manager = StateManager::new(std::env::current_dir()?);
    let state = manager.load().await?;

    match published_values(&state, &topology) {
        Ok(values) => {
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
        Err(e) => {
            eprintln!("{}", "✗ Topology is not fully applied".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
