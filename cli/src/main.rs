//! CLI entrypoint for consilium
//!
//! Wires the layers together: loads the registry configuration, bootstraps
//! the agent population, and exposes the consultation boundary as
//! subcommands.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use consilium_domain::{ConsultationRequest, Priority};
use consilium_infrastructure::{ConfigLoader, bootstrap};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "consilium", version, about = "In-process consultation registry")]
struct Cli {
    /// Path to a registry config file (defaults to ./consilium.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip config discovery and start with an empty registry
    #[arg(long, global = true)]
    no_config: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum PriorityArg {
    Low,
    Normal,
    High,
    Critical,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Normal => Priority::Normal,
            PriorityArg::High => Priority::High,
            PriorityArg::Critical => Priority::Critical,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Ask the best available agent for guidance
    Consult {
        #[arg(long)]
        domain: String,
        #[arg(long)]
        query: String,
        /// Context entries as key=value pairs
        #[arg(long = "context", value_name = "KEY=VALUE")]
        context: Vec<String>,
        #[arg(long, value_enum, default_value = "normal")]
        priority: PriorityArg,
        #[arg(long, default_value = "cli")]
        requester: String,
    },
    /// Coordinate a consultation across several agents
    Collaborate {
        #[arg(long)]
        domain: String,
        #[arg(long)]
        query: String,
        /// Participant agent ids; defaults to the domain's workflow
        #[arg(long, value_delimiter = ',')]
        participants: Vec<String>,
    },
    /// List registered agents
    Agents {
        /// Show one agent in full detail
        #[arg(long, conflicts_with_all = ["domain", "available"])]
        id: Option<String>,
        /// Restrict to one domain
        #[arg(long)]
        domain: Option<String>,
        /// Only agents currently accepting work
        #[arg(long)]
        available: bool,
    },
    /// Registry-wide health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow::anyhow!(e))
            .context("failed to load registry configuration")?
    };

    let (registry, protocol) = bootstrap(&config).context("failed to bootstrap registry")?;
    info!("Registry ready with {} agents", registry.all_agents().len());

    match cli.command {
        Command::Consult {
            domain,
            query,
            context,
            priority,
            requester,
        } => {
            let mut request = ConsultationRequest::new(domain, query)
                .with_priority(priority.into())
                .with_requester(requester);
            for entry in context {
                let (key, value) = parse_context_entry(&entry)?;
                request = request.with_context_value(key, value);
            }

            let response = registry.consult_best_agent(&request).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Collaborate {
            domain,
            query,
            participants,
        } => {
            let participants = if participants.is_empty() {
                protocol.collaboration_workflow(&domain)
            } else {
                participants
            };
            if participants.is_empty() {
                bail!("no participants given and no workflow configured for domain {domain}");
            }

            let request = ConsultationRequest::new(domain, query);
            let response = protocol.coordinate_consultation(&request, &participants).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Agents {
            id: Some(id),
            ..
        } => {
            let agent = registry
                .get_agent(&id)
                .with_context(|| format!("no agent registered with id {id}"))?;
            let detail = json!({
                "profile": agent.profile(),
                "health": agent.health_status(),
                "metrics": agent.metrics(),
                "available": agent.is_available(),
            });
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
        Command::Agents { domain, available, .. } => {
            let mut agents = match domain {
                Some(domain) => registry.agents_for_domain(&domain),
                None => registry.all_agents(),
            };
            if available {
                agents.retain(|agent| agent.is_available());
            }
            agents.sort_by(|a, b| a.id().cmp(b.id()));

            let listing: Vec<_> = agents
                .iter()
                .map(|agent| {
                    let metrics = agent.metrics();
                    json!({
                        "id": agent.id(),
                        "name": agent.name(),
                        "domain": agent.domain(),
                        "health": agent.health_status().state,
                        "available": agent.is_available(),
                        "active_requests": metrics.active_requests,
                        "total_requests": metrics.total_requests,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Command::Health => {
            let health = registry.health_status();
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
    }

    Ok(())
}

/// Split a `key=value` context argument
fn parse_context_entry(entry: &str) -> Result<(String, String)> {
    match entry.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => bail!("invalid context entry '{entry}', expected key=value"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_context_entry() {
        assert_eq!(
            parse_context_entry("service=inventory").unwrap(),
            ("service".to_string(), "inventory".to_string())
        );
        assert!(parse_context_entry("no-separator").is_err());
        assert!(parse_context_entry("=value").is_err());
    }
}
