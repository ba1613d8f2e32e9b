//! Startup policy evaluator
//!
//! Maps a domain spec, its topology and the optional startup request to the
//! set of servers that should be running. Evaluation is synchronous, performs
//! no I/O and keeps no state between calls, so the reconciler can re-run it
//! on every tick and share one evaluator across domains.

use crate::error::{Result, TopologyReferenceError};
use crate::plan::{SelectionReason, StartupDecisionCard, StartupPlan};
use farm_types::{DomainSpec, DomainTopology, StartupControl, StartupRequest};
use tracing::{debug, info, warn};

/// Startup policy evaluator
#[derive(Debug, Clone)]
pub struct StartupPolicyEvaluator {
    /// Whether to log each resulting plan
    emit_audit_events: bool,
}

impl Default for StartupPolicyEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl StartupPolicyEvaluator {
    pub fn new() -> Self {
        Self {
            emit_audit_events: true,
        }
    }

    /// Set whether to log each resulting plan
    pub fn with_emit_audit_events(mut self, emit: bool) -> Self {
        self.emit_audit_events = emit;
        self
    }

    /// Compute the target running-server set
    ///
    /// Fails closed: if the request or topology references an unknown
    /// entity, no plan is produced.
    pub fn evaluate(
        &self,
        spec: &DomainSpec,
        topology: &DomainTopology,
        request: &StartupRequest,
    ) -> Result<StartupPlan> {
        let policy = spec.startup_control();

        debug!(
            domain_uid = %spec.domain_uid(),
            policy = %policy,
            clusters = topology.clusters().len(),
            overrides = request.overrides().len(),
            explicit_servers = request.servers().len(),
            "Evaluating startup policy"
        );

        if let Err(e) = check_references(spec, topology, request) {
            warn!(
                domain_uid = %spec.domain_uid(),
                policy = %policy,
                error = %e,
                "Startup evaluation rejected"
            );
            return Err(e.into());
        }

        let plan = select_servers(spec, topology, request);

        if self.emit_audit_events {
            info!(
                domain_uid = %plan.domain_uid(),
                policy = %plan.policy(),
                servers = plan.len(),
                "Startup plan computed"
            );
        }

        Ok(plan)
    }

    /// Evaluate and wrap the plan in an audit card
    pub fn evaluate_with_card(
        &self,
        spec: &DomainSpec,
        topology: &DomainTopology,
        request: &StartupRequest,
    ) -> Result<StartupDecisionCard> {
        let plan = self.evaluate(spec, topology, request)?;
        Ok(StartupDecisionCard::new(plan, topology.server_count()))
    }
}

/// Verify every name the inputs rely on resolves in the topology
///
/// `NONE` starts nothing and is never rejected. Overrides and the explicit
/// list are only checked for the policies that read them.
fn check_references(
    spec: &DomainSpec,
    topology: &DomainTopology,
    request: &StartupRequest,
) -> std::result::Result<(), TopologyReferenceError> {
    let policy = spec.startup_control();
    if !policy.starts_admin_server() {
        return Ok(());
    }

    let admin = spec.admin_server_name();
    if let Some(cluster) = topology.cluster_of(admin.as_str()) {
        return Err(TopologyReferenceError::AdminServerClustered {
            server: admin.to_string(),
            cluster: cluster.name().to_string(),
        });
    }

    if !policy.uses_overrides() {
        return Ok(());
    }

    if let Some(unknown) = request
        .overrides()
        .iter()
        .find(|o| topology.cluster(o.cluster().as_str()).is_none())
    {
        return Err(TopologyReferenceError::UnknownCluster {
            cluster: unknown.cluster().to_string(),
        });
    }

    if let Some(unknown) = request
        .servers()
        .iter()
        .find(|s| *s != admin && !topology.contains_server(s.as_str()))
    {
        return Err(TopologyReferenceError::UnknownServer {
            server: unknown.to_string(),
        });
    }

    Ok(())
}

/// Apply the policy table; references have already been checked
///
/// `ALL` starts every declared server, clustered or not.
fn select_servers(
    spec: &DomainSpec,
    topology: &DomainTopology,
    request: &StartupRequest,
) -> StartupPlan {
    let policy = spec.startup_control();
    let mut plan = StartupPlan::new(spec.domain_uid().clone(), policy);

    if policy.starts_admin_server() {
        plan.select(spec.admin_server_name(), SelectionReason::AdministrationServer);
    }

    match policy {
        StartupControl::None | StartupControl::Admin => {}
        StartupControl::All => {
            for cluster in topology.clusters() {
                for member in cluster.members() {
                    plan.select(
                        member,
                        SelectionReason::AllServers {
                            cluster: cluster.name().clone(),
                        },
                    );
                }
            }
            for server in topology.standalone_servers() {
                plan.select(server, SelectionReason::AllNonClustered);
            }
        }
        StartupControl::Specified | StartupControl::Auto => {
            for server in request.servers().iter() {
                plan.select(server, SelectionReason::Explicit);
            }

            for cluster in topology.clusters() {
                let (replicas, reason) = match request.override_for(cluster.name().as_str()) {
                    Some(o) => (
                        o.replicas(),
                        SelectionReason::ClusterOverride {
                            cluster: cluster.name().clone(),
                            replicas: o.replicas(),
                        },
                    ),
                    None if policy == StartupControl::Auto => (
                        topology.default_replicas(),
                        SelectionReason::ClusterDefault {
                            cluster: cluster.name().clone(),
                            replicas: topology.default_replicas(),
                        },
                    ),
                    None => continue,
                };

                for member in cluster.first_members(replicas) {
                    plan.select(member, reason.clone());
                }
            }
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StartupError;
    use farm_types::{
        ClusterOverride, ClusterTopology, ExplicitServerList, SecretReference, ServerName,
    };

    fn spec(policy: StartupControl) -> DomainSpec {
        DomainSpec::builder("d1", "base_domain")
            .with_admin_secret(SecretReference::new("d1-credentials"))
            .with_admin_server("admin", 7001)
            .with_startup_control(policy)
            .build()
            .unwrap()
    }

    fn topology() -> DomainTopology {
        DomainTopology::new(
            vec![
                ClusterTopology::new("C1", ["s1", "s2", "s3"]).unwrap(),
                ClusterTopology::new("C2", ["t1", "t2"]).unwrap(),
            ],
            vec![ServerName::from("lone")],
            1,
        )
        .unwrap()
    }

    fn request(overrides: &[(&str, u32)], servers: &[&str]) -> StartupRequest {
        StartupRequest::new(
            overrides
                .iter()
                .map(|(c, r)| ClusterOverride::new(*c, *r).unwrap())
                .collect(),
            ExplicitServerList::new(servers.iter().copied()).unwrap(),
        )
        .unwrap()
    }

    fn names(plan: &StartupPlan) -> Vec<&str> {
        plan.servers().map(ServerName::as_str).collect()
    }

    fn evaluator() -> StartupPolicyEvaluator {
        StartupPolicyEvaluator::new().with_emit_audit_events(false)
    }

    #[test]
    fn test_none_starts_nothing() {
        let plan = evaluator()
            .evaluate(&spec(StartupControl::None), &topology(), &request(&[("C1", 3)], &["s2"]))
            .unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_admin_starts_only_admin() {
        let plan = evaluator()
            .evaluate(&spec(StartupControl::Admin), &topology(), &request(&[("C1", 3)], &["s2"]))
            .unwrap();
        assert_eq!(names(&plan), ["admin"]);
        assert_eq!(plan.reason("admin"), Some(&SelectionReason::AdministrationServer));
    }

    #[test]
    fn test_all_starts_every_declared_server() {
        let plan = evaluator()
            .evaluate(&spec(StartupControl::All), &topology(), &request(&[("C1", 0)], &[]))
            .unwrap();
        assert_eq!(names(&plan), ["admin", "lone", "s1", "s2", "s3", "t1", "t2"]);
        assert_eq!(plan.reason("lone"), Some(&SelectionReason::AllNonClustered));
    }

    #[test]
    fn test_all_starts_non_clustered_server() {
        let topology = DomainTopology::new(
            vec![ClusterTopology::new("C1", ["s1"]).unwrap()],
            vec![ServerName::from("lone")],
            0,
        )
        .unwrap();
        let plan = evaluator()
            .evaluate(&spec(StartupControl::All), &topology, &StartupRequest::default())
            .unwrap();
        assert_eq!(names(&plan), ["admin", "lone", "s1"]);
    }

    #[test]
    fn test_specified_skips_clusters_without_override() {
        let plan = evaluator()
            .evaluate(&spec(StartupControl::Specified), &topology(), &request(&[("C1", 2)], &[]))
            .unwrap();
        assert_eq!(names(&plan), ["admin", "s1", "s2"]);
    }

    #[test]
    fn test_auto_fills_clusters_without_override() {
        let plan = evaluator()
            .evaluate(&spec(StartupControl::Auto), &topology(), &request(&[("C1", 1)], &[]))
            .unwrap();
        assert_eq!(names(&plan), ["admin", "s1", "t1"]);
        assert!(matches!(
            plan.reason("t1"),
            Some(SelectionReason::ClusterDefault { replicas: 1, .. })
        ));
    }

    #[test]
    fn test_explicit_standalone_server() {
        let plan = evaluator()
            .evaluate(&spec(StartupControl::Specified), &topology(), &request(&[], &["lone", "s2"]))
            .unwrap();
        assert_eq!(names(&plan), ["admin", "lone", "s2"]);
    }

    #[test]
    fn test_explicit_and_cluster_selection_collapse() {
        let plan = evaluator()
            .evaluate(&spec(StartupControl::Specified), &topology(), &request(&[("C1", 2)], &["s1"]))
            .unwrap();
        assert_eq!(names(&plan), ["admin", "s1", "s2"]);
        assert_eq!(plan.reason("s1"), Some(&SelectionReason::Explicit));
    }

    #[test]
    fn test_override_clamps_to_cluster_size() {
        let plan = evaluator()
            .evaluate(&spec(StartupControl::Specified), &topology(), &request(&[("C2", 99)], &[]))
            .unwrap();
        assert_eq!(names(&plan), ["admin", "t1", "t2"]);
    }

    #[test]
    fn test_unknown_cluster_fails_closed() {
        let err = evaluator()
            .evaluate(&spec(StartupControl::Specified), &topology(), &request(&[("C9", 1)], &[]))
            .unwrap_err();
        assert_eq!(
            err,
            StartupError::TopologyReference(TopologyReferenceError::UnknownCluster {
                cluster: "C9".into()
            })
        );
    }

    #[test]
    fn test_unknown_server_fails_closed() {
        let err = evaluator()
            .evaluate(&spec(StartupControl::Auto), &topology(), &request(&[], &["ghost"]))
            .unwrap_err();
        assert_eq!(
            err,
            StartupError::TopologyReference(TopologyReferenceError::UnknownServer {
                server: "ghost".into()
            })
        );
    }

    #[test]
    fn test_admin_in_explicit_list_is_known() {
        let plan = evaluator()
            .evaluate(&spec(StartupControl::Specified), &topology(), &request(&[], &["admin"]))
            .unwrap();
        assert_eq!(names(&plan), ["admin"]);
    }

    #[test]
    fn test_clustered_admin_rejected() {
        let topology = DomainTopology::new(
            vec![ClusterTopology::new("C1", ["admin", "s1"]).unwrap()],
            vec![],
            1,
        )
        .unwrap();
        let err = evaluator()
            .evaluate(&spec(StartupControl::Admin), &topology, &StartupRequest::default())
            .unwrap_err();
        assert!(matches!(
            err,
            StartupError::TopologyReference(TopologyReferenceError::AdminServerClustered { .. })
        ));
    }

    #[test]
    fn test_evaluate_with_card() {
        let card = evaluator()
            .evaluate_with_card(&spec(StartupControl::All), &topology(), &StartupRequest::default())
            .unwrap();
        assert_eq!(card.policy, StartupControl::All);
        assert_eq!(card.servers_considered, 6);
        assert_eq!(card.plan.len(), 7);
    }
}
