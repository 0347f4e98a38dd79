//! OpenStack compute CLI - inspect and manage servers for CTO clusters.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cto_openstack::compute::{
    ComputeClient, CreateServerOpts, ListServersOpts, NetworkAttachment, ServerStatus,
};
use cto_openstack::{CloudsConfig, Scope};

/// OpenStack compute CLI.
#[derive(Parser)]
#[command(name = "openstack-compute")]
#[command(about = "Manage OpenStack servers through the compute API")]
struct Cli {
    /// Cloud name in clouds.yaml (or set `OS_CLOUD` env var).
    #[arg(long, env = "OS_CLOUD", default_value = "openstack")]
    cloud: String,

    /// Path to clouds.yaml (or set `OS_CLIENT_CONFIG_FILE` env var).
    #[arg(long, env = "OS_CLIENT_CONFIG_FILE")]
    clouds_file: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Emit logs as JSON.
    #[arg(long, default_value = "false")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List availability zones.
    Zones,

    /// Resolve a flavor name to its ID.
    Flavor {
        /// Flavor name.
        #[arg(long)]
        name: String,
    },

    /// List servers.
    List {
        /// Name filter (regular expression).
        #[arg(long)]
        name: Option<String>,

        /// Status filter (e.g., ACTIVE, ERROR).
        #[arg(long)]
        status: Option<String>,

        /// Only servers carrying all of these tags (comma-separated).
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Get details of a specific server.
    Get {
        /// Server ID.
        #[arg(long)]
        id: String,
    },

    /// Create a server.
    Create {
        /// Server name.
        #[arg(long)]
        name: String,

        /// Flavor name.
        #[arg(long)]
        flavor: String,

        /// Image ID.
        #[arg(long)]
        image: String,

        /// Availability zone.
        #[arg(long)]
        zone: Option<String>,

        /// Network IDs to attach (comma-separated). Nova picks when empty.
        #[arg(long, value_delimiter = ',')]
        networks: Vec<String>,

        /// Pre-created port IDs to attach (comma-separated).
        #[arg(long, value_delimiter = ',')]
        ports: Vec<String>,

        /// Keypair name.
        #[arg(long)]
        key_name: Option<String>,

        /// Security group names (comma-separated).
        #[arg(long, value_delimiter = ',')]
        security_groups: Vec<String>,

        /// Server tags (comma-separated).
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// File with user data (e.g., cloud-init).
        #[arg(long)]
        user_data_file: Option<PathBuf>,
    },

    /// Delete a server.
    Delete {
        /// Server ID.
        #[arg(long)]
        id: String,
    },

    /// List interfaces attached to a server.
    Interfaces {
        /// Server ID.
        #[arg(long)]
        id: String,
    },

    /// Detach a port from a server.
    Detach {
        /// Server ID.
        #[arg(long)]
        id: String,

        /// Port ID.
        #[arg(long)]
        port: String,
    },
}

fn init_logging(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn parse_status(raw: &str) -> Result<ServerStatus> {
    let status: ServerStatus =
        serde_json::from_value(serde_json::Value::String(raw.to_ascii_uppercase()))?;
    if status == ServerStatus::Unknown {
        anyhow::bail!("unknown server status: {raw}");
    }
    Ok(status)
}

#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    let clouds = match &cli.clouds_file {
        Some(path) => CloudsConfig::load(path),
        None => CloudsConfig::discover(),
    }
    .context("Failed to load clouds.yaml")?;
    let cloud = clouds.cloud(&cli.cloud)?;

    let scope = Scope::from_cloud(cloud, &cli.cloud)
        .await
        .with_context(|| format!("Failed to authenticate to cloud {}", cli.cloud))?;
    let compute = scope
        .compute_client()
        .await
        .context("Failed to create compute client")?;

    match cli.command {
        Commands::Zones => {
            let zones = compute.list_availability_zones().await?;
            println!("\n{:<30} {:<10}", "ZONE", "AVAILABLE");
            println!("{}", "-".repeat(42));
            for zone in zones {
                println!("{:<30} {:<10}", zone.zone_name, zone.zone_state.available);
            }
        }

        Commands::Flavor { name } => {
            let id = compute.get_flavor_id_from_name(&name).await?;
            println!("{id}");
        }

        Commands::List { name, status, tags } => {
            let opts = ListServersOpts {
                name,
                status: status.as_deref().map(parse_status).transpose()?,
                tags,
                ..ListServersOpts::default()
            };
            let servers = compute.list_servers(&opts).await?;
            println!(
                "\n{:<38} {:<30} {:<10} {:<16}",
                "ID", "NAME", "STATUS", "ZONE"
            );
            println!("{}", "-".repeat(96));
            for server in servers {
                println!(
                    "{:<38} {:<30} {:<10} {:<16}",
                    server.server.id,
                    server.server.name,
                    server.server.status,
                    server.availability_zone()
                );
            }
        }

        Commands::Get { id } => {
            let server = compute.get_server(&id).await?;
            println!("\nServer Details:");
            println!("  ID:       {}", server.server.id);
            println!("  Name:     {}", server.server.name);
            println!("  Status:   {}", server.server.status);
            println!("  Zone:     {}", server.availability_zone());
            println!(
                "  Flavor:   {}",
                server.server.flavor.original_name.as_deref().unwrap_or("")
            );
            for (network, addresses) in &server.server.addresses {
                for address in addresses {
                    println!("  Address:  {network} {}", address.addr);
                }
            }
            if !server.server.tags.is_empty() {
                println!("  Tags:     {}", server.server.tags.join(", "));
            }
            if let Some(fault) = &server.server.fault {
                println!("  Fault:    {} {}", fault.code, fault.message);
            }
        }

        Commands::Create {
            name,
            flavor,
            image,
            zone,
            networks,
            ports,
            key_name,
            security_groups,
            tags,
            user_data_file,
        } => {
            let flavor_id = compute.get_flavor_id_from_name(&flavor).await?;
            info!("Creating server: {name} (flavor {flavor} = {flavor_id})");

            let mut opts = CreateServerOpts::new(&name, flavor_id).with_image(image);
            if let Some(zone) = zone {
                opts = opts.with_availability_zone(zone);
            }
            for network in networks {
                opts = opts.with_network(NetworkAttachment::network(network));
            }
            for port in ports {
                opts = opts.with_network(NetworkAttachment::port(port));
            }
            if let Some(key_name) = key_name {
                opts = opts.with_key_name(key_name);
            }
            for group in security_groups {
                opts = opts.with_security_group(group);
            }
            for tag in tags {
                opts = opts.with_tag(tag);
            }
            if let Some(path) = user_data_file {
                let data = std::fs::read(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                opts = opts.with_user_data(data);
            }

            let server = compute.create_server(opts).await?;
            println!("\n✅ Server creation accepted!");
            println!("  ID:       {}", server.server.id);
            println!("  Name:     {name}");
        }

        Commands::Delete { id } => {
            info!("Deleting server: {id}");
            match compute.delete_server(&id).await {
                Ok(()) => println!("\n✅ Server deleted: {id}"),
                Err(e) if e.is_not_found() => println!("\nServer already gone: {id}"),
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Interfaces { id } => {
            let interfaces = compute.list_attached_interfaces(&id).await?;
            println!(
                "\n{:<38} {:<38} {:<18} {:<10} {:<16}",
                "PORT", "NETWORK", "MAC", "STATE", "IPS"
            );
            println!("{}", "-".repeat(124));
            for iface in interfaces {
                let ips = iface
                    .fixed_ips
                    .iter()
                    .map(|ip| ip.ip_address.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                println!(
                    "{:<38} {:<38} {:<18} {:<10} {:<16}",
                    iface.port_id, iface.net_id, iface.mac_addr, iface.port_state, ips
                );
            }
        }

        Commands::Detach { id, port } => {
            info!("Detaching port {port} from server {id}");
            match compute.delete_attached_interface(&id, &port).await {
                Ok(()) => println!("\n✅ Port {port} detached from {id}"),
                Err(e) if e.is_not_found() || e.is_conflict() => {
                    println!("\nPort {port} not attached to {id} (or detach in progress)");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
