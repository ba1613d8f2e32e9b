//! Startup plans
//!
//! A plan is the target set of running servers for one domain, plus the
//! reason each server was selected. Plans are plain values; the reconciler
//! compares them against observed state with [`StartupPlan::delta`].

use chrono::{DateTime, Utc};
use farm_types::{ClusterName, DomainUid, ServerName, StartupControl};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Why a server is part of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionReason {
    /// The domain's administration server
    AdministrationServer,

    /// Named in the explicit server list
    Explicit,

    /// Member of a cluster started in full under `ALL`
    AllServers { cluster: ClusterName },

    /// Non-clustered managed server started under `ALL`
    AllNonClustered,

    /// Within the replica prefix of an overridden cluster
    ClusterOverride { cluster: ClusterName, replicas: u32 },

    /// Within the default replica prefix of a cluster without an override
    ClusterDefault { cluster: ClusterName, replicas: u32 },
}

impl std::fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionReason::AdministrationServer => write!(f, "administration server"),
            SelectionReason::Explicit => write!(f, "explicitly listed"),
            SelectionReason::AllServers { cluster } => write!(f, "all servers ({})", cluster),
            SelectionReason::AllNonClustered => write!(f, "all servers (non-clustered)"),
            SelectionReason::ClusterOverride { cluster, replicas } => {
                write!(f, "cluster override ({}, replicas={})", cluster, replicas)
            }
            SelectionReason::ClusterDefault { cluster, replicas } => {
                write!(f, "cluster default ({}, replicas={})", cluster, replicas)
            }
        }
    }
}

/// Target running-server set for one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupPlan {
    domain_uid: DomainUid,
    policy: StartupControl,
    servers: BTreeMap<ServerName, SelectionReason>,
}

impl StartupPlan {
    pub(crate) fn new(domain_uid: DomainUid, policy: StartupControl) -> Self {
        Self {
            domain_uid,
            policy,
            servers: BTreeMap::new(),
        }
    }

    /// Add a server; a server already selected keeps its first reason
    pub(crate) fn select(&mut self, server: &ServerName, reason: SelectionReason) {
        self.servers.entry(server.clone()).or_insert(reason);
    }

    pub fn domain_uid(&self) -> &DomainUid {
        &self.domain_uid
    }

    pub fn policy(&self) -> StartupControl {
        self.policy
    }

    /// Selected servers in name order
    pub fn servers(&self) -> impl Iterator<Item = &ServerName> {
        self.servers.keys()
    }

    /// Selected servers with the reason each was selected
    pub fn selections(&self) -> impl Iterator<Item = (&ServerName, &SelectionReason)> {
        self.servers.iter()
    }

    pub fn server_set(&self) -> BTreeSet<ServerName> {
        self.servers.keys().cloned().collect()
    }

    pub fn contains(&self, server: &str) -> bool {
        self.servers.contains_key(server)
    }

    pub fn reason(&self, server: &str) -> Option<&SelectionReason> {
        self.servers.get(server)
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// What must change for the running set to match this plan
    pub fn delta<'a, I>(&self, running: I) -> PlanDelta
    where
        I: IntoIterator<Item = &'a ServerName>,
    {
        let running: BTreeSet<&ServerName> = running.into_iter().collect();

        let to_start = self
            .servers
            .keys()
            .filter(|s| !running.contains(s))
            .cloned()
            .collect();
        let to_stop = running
            .into_iter()
            .filter(|s| !self.servers.contains_key(*s))
            .cloned()
            .collect();

        PlanDelta { to_start, to_stop }
    }
}

/// Servers to start and stop to converge on a plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDelta {
    /// Planned but not running, in name order
    pub to_start: Vec<ServerName>,
    /// Running but not planned, in name order
    pub to_stop: Vec<ServerName>,
}

impl PlanDelta {
    /// Is the running set already equal to the plan?
    pub fn is_converged(&self) -> bool {
        self.to_start.is_empty() && self.to_stop.is_empty()
    }
}

/// Audit card for one startup evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupDecisionCard {
    /// Unique identifier for this decision
    pub id: String,

    /// Domain the plan was computed for
    pub domain_uid: DomainUid,

    /// Policy that was applied
    pub policy: StartupControl,

    /// The resulting plan
    pub plan: StartupPlan,

    /// Declared managed servers considered
    pub servers_considered: usize,

    /// When the decision was made
    pub evaluated_at: DateTime<Utc>,
}

impl StartupDecisionCard {
    pub fn new(plan: StartupPlan, servers_considered: usize) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            domain_uid: plan.domain_uid().clone(),
            policy: plan.policy(),
            plan,
            servers_considered,
            evaluated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<ServerName> {
        items.iter().map(|s| ServerName::from(*s)).collect()
    }

    fn plan_with(servers: &[&str]) -> StartupPlan {
        let mut plan = StartupPlan::new(DomainUid::new("d1"), StartupControl::Auto);
        for server in names(servers) {
            plan.select(&server, SelectionReason::Explicit);
        }
        plan
    }

    #[test]
    fn test_first_reason_wins() {
        let mut plan = StartupPlan::new(DomainUid::new("d1"), StartupControl::Specified);
        let s1 = ServerName::from("s1");
        plan.select(&s1, SelectionReason::Explicit);
        plan.select(
            &s1,
            SelectionReason::ClusterOverride {
                cluster: ClusterName::from("c1"),
                replicas: 1,
            },
        );

        assert_eq!(plan.len(), 1);
        assert_eq!(plan.reason("s1"), Some(&SelectionReason::Explicit));
    }

    #[test]
    fn test_delta() {
        let plan = plan_with(&["admin", "s1", "s2"]);
        let running = names(&["admin", "s2", "s3"]);

        let delta = plan.delta(&running);
        assert_eq!(delta.to_start, names(&["s1"]));
        assert_eq!(delta.to_stop, names(&["s3"]));
        assert!(!delta.is_converged());
    }

    #[test]
    fn test_delta_converged() {
        let plan = plan_with(&["admin", "s1"]);
        let running = names(&["s1", "admin"]);
        assert!(plan.delta(&running).is_converged());
    }

    #[test]
    fn test_decision_card() {
        let card = StartupDecisionCard::new(plan_with(&["admin"]), 4);
        assert!(!card.id.is_empty());
        assert_eq!(card.domain_uid.as_str(), "d1");
        assert_eq!(card.policy, StartupControl::Auto);
        assert_eq!(card.servers_considered, 4);
    }

    #[test]
    fn test_plan_serializes_reasons() {
        let mut plan = StartupPlan::new(DomainUid::new("d1"), StartupControl::Auto);
        plan.select(
            &ServerName::from("t1"),
            SelectionReason::ClusterDefault {
                cluster: ClusterName::from("c2"),
                replicas: 1,
            },
        );
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["servers"]["t1"]["kind"], "cluster_default");
        assert_eq!(json["policy"], "AUTO");
    }
}
