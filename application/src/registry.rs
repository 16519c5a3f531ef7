//! Agent registry: population, indexes, selection and failover
//!
//! The registry owns every [`Agent`] handle. Mutation is confined to
//! [`AgentRegistry::register_agent`] and
//! [`AgentRegistry::unregister_agent`]; every other operation reads a
//! snapshot out of the index and releases the lock before any await point,
//! so concurrent consultations never contend with each other.

use crate::error::RegistryError;
use crate::specialized::SpecializedDomain;
use consilium_domain::{
    Agent, AgentMetrics, ConsultationRequest, GuidanceResponse, RegistryHealthStatus,
};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Maximum length of a backup chain
const MAX_BACKUP_AGENTS: usize = 3;

/// Soft ceiling for agent selection; exceeding it is logged, never fatal
const SELECTION_TIME_THRESHOLD: Duration = Duration::from_secs(1);

#[derive(Default)]
struct RegistryIndex {
    agents: HashMap<String, Arc<Agent>>,
    /// domain -> agent ids
    domains: HashMap<String, BTreeSet<String>>,
    /// capability -> agent ids
    capabilities: HashMap<String, BTreeSet<String>>,
    /// cross-cutting classification -> agent ids
    specialized: HashMap<SpecializedDomain, BTreeSet<String>>,
    /// agent id -> ordered backup chain (≤ MAX_BACKUP_AGENTS)
    backups: HashMap<String, Vec<String>>,
}

impl RegistryIndex {
    fn insert(&mut self, agent: Arc<Agent>) {
        let profile = agent.profile().clone();
        let id = profile.id.clone();

        self.domains
            .entry(profile.domain.clone())
            .or_default()
            .insert(id.clone());

        for capability in &profile.capabilities {
            self.capabilities
                .entry(capability.clone())
                .or_default()
                .insert(id.clone());
        }

        for class in SpecializedDomain::classify(&profile) {
            self.specialized
                .entry(class)
                .or_default()
                .insert(id.clone());
        }

        self.agents.insert(id, agent);
        self.rebuild_backup_chains();
    }

    fn remove(&mut self, agent_id: &str) -> Option<Arc<Agent>> {
        let removed = self.agents.remove(agent_id)?;

        self.domains.values_mut().for_each(|ids| {
            ids.remove(agent_id);
        });
        self.domains.retain(|_, ids| !ids.is_empty());

        self.capabilities.values_mut().for_each(|ids| {
            ids.remove(agent_id);
        });
        self.capabilities.retain(|_, ids| !ids.is_empty());

        self.specialized.values_mut().for_each(|ids| {
            ids.remove(agent_id);
        });
        self.specialized.retain(|_, ids| !ids.is_empty());

        self.rebuild_backup_chains();
        Some(removed)
    }

    /// Recompute every backup chain from the current population
    ///
    /// A backup is any other agent in the same domain or with overlapping
    /// capabilities. Chains are ordered lexicographically by id so the
    /// same population always yields the same chains.
    fn rebuild_backup_chains(&mut self) {
        self.backups.clear();

        let mut ids: Vec<&String> = self.agents.keys().collect();
        ids.sort();

        for id in &ids {
            let agent = &self.agents[*id];
            let profile = agent.profile();

            let chain: Vec<String> = ids
                .iter()
                .filter(|other| **other != *id)
                .filter(|other| {
                    let other_profile = self.agents[**other].profile();
                    other_profile.domain == profile.domain
                        || profile.overlaps_capabilities(other_profile)
                })
                .take(MAX_BACKUP_AGENTS)
                .map(|other| (*other).clone())
                .collect();

            if !chain.is_empty() {
                self.backups.insert((*id).clone(), chain);
            }
        }
    }
}

/// In-process directory of agents with load/quality selection, backup
/// failover and aggregate health
///
/// # Example
///
/// ```
/// use consilium_application::AgentRegistry;
///
/// let registry = AgentRegistry::new();
/// assert_eq!(registry.health_status().total_agents, 0);
/// ```
#[derive(Default)]
pub struct AgentRegistry {
    index: RwLock<RegistryIndex>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent
    ///
    /// Fails with [`RegistryError::DuplicateAgent`] when the id is already
    /// taken; re-registration never silently overwrites. Registration
    /// updates the domain, capability and specialized indexes and
    /// recomputes backup chains for the whole population so existing peers
    /// can pick up the newcomer as a backup.
    pub fn register_agent(&self, agent: Arc<Agent>) -> Result<(), RegistryError> {
        agent.profile().validate()?;

        let mut index = self.write_index();
        if index.agents.contains_key(agent.id()) {
            return Err(RegistryError::DuplicateAgent(agent.id().to_string()));
        }

        info!("Registering agent: {} ({})", agent.name(), agent.id());
        index.insert(agent);
        info!("Total agents: {}", index.agents.len());
        Ok(())
    }

    /// Remove an agent and purge it from every index and backup chain
    pub fn unregister_agent(&self, agent_id: &str) -> Option<Arc<Agent>> {
        let removed = self.write_index().remove(agent_id);
        if let Some(agent) = &removed {
            info!("Unregistered agent: {} ({})", agent.name(), agent_id);
        }
        removed
    }

    pub fn get_agent(&self, agent_id: &str) -> Option<Arc<Agent>> {
        self.read_index().agents.get(agent_id).cloned()
    }

    pub fn all_agents(&self) -> Vec<Arc<Agent>> {
        self.read_index().agents.values().cloned().collect()
    }

    pub fn available_agents(&self) -> Vec<Arc<Agent>> {
        self.read_index()
            .agents
            .values()
            .filter(|agent| agent.is_available())
            .cloned()
            .collect()
    }

    /// Agents whose primary domain matches; empty when nothing matches
    pub fn agents_for_domain(&self, domain: &str) -> Vec<Arc<Agent>> {
        let index = self.read_index();
        index
            .domains
            .get(domain)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| index.agents.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Agents sharing at least one of the given capabilities
    pub fn agents_with_capabilities(&self, capabilities: &BTreeSet<String>) -> Vec<Arc<Agent>> {
        let index = self.read_index();
        let mut ids: BTreeSet<&String> = BTreeSet::new();
        for capability in capabilities {
            if let Some(matched) = index.capabilities.get(capability) {
                ids.extend(matched.iter());
            }
        }
        ids.into_iter()
            .filter_map(|id| index.agents.get(id).cloned())
            .collect()
    }

    /// Agents classified under a cross-cutting specialized domain
    pub fn specialized_agents(&self, class: SpecializedDomain) -> Vec<Arc<Agent>> {
        let index = self.read_index();
        index
            .specialized
            .get(&class)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| index.agents.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Pick the best available agent for a request
    ///
    /// The candidate pool is the request's domain; when that is empty,
    /// any agent that can handle the request. Candidates are filtered to
    /// available agents and minimized lexicographically: fewest active
    /// requests, then lowest average response time, then highest accuracy,
    /// with the agent id as a final deterministic tie-break. `None` means
    /// nobody is free, which is an expected condition rather than an error.
    pub fn find_best_agent(&self, request: &ConsultationRequest) -> Option<Arc<Agent>> {
        let start = Instant::now();

        let candidates = {
            let index = self.read_index();
            let domain_pool: Vec<Arc<Agent>> = index
                .domains
                .get(&request.domain)
                .map(|ids| {
                    ids.iter()
                        .filter_map(|id| index.agents.get(id).cloned())
                        .collect()
                })
                .unwrap_or_default();

            if domain_pool.is_empty() {
                index
                    .agents
                    .values()
                    .filter(|agent| agent.can_handle(request))
                    .cloned()
                    .collect()
            } else {
                domain_pool
            }
        };

        let best = candidates
            .into_iter()
            .filter(|agent| agent.is_available())
            .map(|agent| (agent.metrics(), agent))
            .min_by(|a, b| selection_order(&a.0, &b.0))
            .map(|(_, agent)| agent);

        let elapsed = start.elapsed();
        if elapsed > SELECTION_TIME_THRESHOLD {
            warn!("Agent selection took longer than expected: {elapsed:?}");
        }

        match &best {
            Some(agent) => debug!(
                "Selected agent {} for request {} in {elapsed:?}",
                agent.id(),
                request.request_id
            ),
            None => warn!("No available agents found for domain: {}", request.domain),
        }

        best
    }

    /// The precomputed backup chain for an agent, filtered to currently
    /// available agents
    pub fn backup_agents(&self, agent_id: &str) -> Vec<Arc<Agent>> {
        let index = self.read_index();
        index
            .backups
            .get(agent_id)
            .map(|chain| {
                chain
                    .iter()
                    .filter_map(|id| index.agents.get(id).cloned())
                    .filter(|agent| agent.is_available())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Consult the best agent for the request, failing over to its backup
    /// chain when the primary errors
    ///
    /// Exactly one response is returned per request: the primary's answer,
    /// the first backup answer that succeeds, or a single failure response
    /// naming the primary and the exhausted backups.
    pub async fn consult_best_agent(&self, request: &ConsultationRequest) -> GuidanceResponse {
        let start = Instant::now();

        let Some(primary) = self.find_best_agent(request) else {
            return GuidanceResponse::failure(
                &request.request_id,
                "registry",
                format!("No available agents found for domain: {}", request.domain),
                start.elapsed(),
            );
        };

        let primary_error = match primary.provide_guidance(request).await {
            Ok(response) => return response,
            Err(error) => error,
        };

        warn!(
            "Agent {} failed to provide guidance for request {}: {primary_error}",
            primary.id(),
            request.request_id
        );

        let backups = self.backup_agents(primary.id());
        let attempted = backups.len();

        for backup in backups {
            info!(
                "Attempting failover to backup agent {} for request {}",
                backup.id(),
                request.request_id
            );
            match backup.provide_guidance(request).await {
                Ok(response) => return response,
                Err(error) => {
                    warn!("Backup agent {} also failed: {error}", backup.id());
                }
            }
        }

        let message = if attempted == 0 {
            format!(
                "Agent {} failed and no backup agents were available: {primary_error}",
                primary.id()
            )
        } else {
            format!(
                "Agent {} and {attempted} backup agents failed: {primary_error}",
                primary.id()
            )
        };

        GuidanceResponse::failure(&request.request_id, primary.id(), message, start.elapsed())
    }

    /// Aggregate health over the whole population
    pub fn health_status(&self) -> RegistryHealthStatus {
        let index = self.read_index();
        let total = index.agents.len();
        let available = index
            .agents
            .values()
            .filter(|agent| agent.is_available())
            .count();
        let unhealthy = index
            .agents
            .values()
            .filter(|agent| !agent.health_status().state.is_available())
            .count();

        RegistryHealthStatus::new(total, available, unhealthy)
    }

    fn read_index(&self) -> RwLockReadGuard<'_, RegistryIndex> {
        self.index.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_index(&self) -> RwLockWriteGuard<'_, RegistryIndex> {
        self.index.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Lexicographic selection order: fewest active requests, lowest average
/// latency, highest accuracy, then id for determinism
fn selection_order(a: &AgentMetrics, b: &AgentMetrics) -> Ordering {
    a.active_requests
        .cmp(&b.active_requests)
        .then_with(|| a.average_response_time.cmp(&b.average_response_time))
        .then_with(|| b.current_accuracy.total_cmp(&a.current_accuracy))
        .then_with(|| a.agent_id.cmp(&b.agent_id))
}
