use colored::Colorize;
use netweave_cloud::{Plan, StateManager};
use netweave_topology::{Entity, NetworkConfig, SubnetKind, TopologyGraph, ZoneCatalog};

pub async fn handle(
    config: &NetworkConfig,
    catalog: &ZoneCatalog,
    json: bool,
) -> anyhow::Result<()> {
    let topology = netweave_topology::plan(config, catalog)?;

    let manager = StateManager::new(std::env::current_dir()?);
    let state = manager.load().await?;
    let plan = Plan::for_topology(&topology, &state.as_provider_state())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("Topology for cluster {}", config.cluster_name).bold()
    );
    if let Some(vpc) = topology.vpc() {
        println!("  VPC {} ({})", vpc.name.cyan(), vpc.cidr);
    }

    let publics = topology.subnets(SubnetKind::Public);
    let privates = topology.subnets(SubnetKind::Private);
    for (public, private) in publics.iter().zip(&privates) {
        println!("  {}", public.zone.name.bold());
        println!("    public  {} {}", public.name.cyan(), public.cidr);
        let via = nat_for_zone(&topology, private.zone.index).unwrap_or("-");
        println!(
            "    private {} {} (egress via {})",
            private.name.cyan(),
            private.cidr,
            via
        );
    }

    let outputs = topology.outputs();
    println!();
    println!("Published values:");
    println!("  vpc:             {}", outputs.vpc);
    println!("  public subnets:  {}", outputs.public_subnets.join(", "));
    println!("  private subnets: {}", outputs.private_subnets.join(", "));

    println!();
    println!(
        "{} entities, {}",
        topology.len(),
        plan.summary().to_string().bold()
    );

    Ok(())
}

fn nat_for_zone(topology: &TopologyGraph, zone_index: u32) -> Option<&str> {
    topology.nodes().find_map(|(_, e)| match e {
        Entity::NatGateway(n) if n.zone_index == zone_index => Some(n.name.as_str()),
        _ => None,
    })
}
