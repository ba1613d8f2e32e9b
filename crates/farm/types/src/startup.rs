//! Optional startup inputs: per-cluster replica overrides and explicitly
//! listed servers
//!
//! Both are only consulted by the `SPECIFIED` and `AUTO` policies.

use crate::error::{Result, ValidationError};
use crate::ids::{ClusterName, ServerName};
use serde::Serialize;
use std::collections::HashSet;

/// Explicit replica count for one cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterOverride {
    cluster: ClusterName,
    replicas: u32,
}

impl ClusterOverride {
    pub fn new(cluster: impl Into<String>, replicas: u32) -> Result<Self> {
        let cluster = cluster.into();
        if cluster.is_empty() {
            return Err(ValidationError::EmptyClusterName);
        }
        Ok(Self {
            cluster: ClusterName::new(cluster),
            replicas,
        })
    }

    /// Build from a signed count as found in declared documents
    pub fn from_signed(cluster: impl Into<String>, replicas: i64) -> Result<Self> {
        let cluster = cluster.into();
        let replicas = replica_count(|| format!("cluster '{}'", cluster), replicas)?;
        Self::new(cluster, replicas)
    }

    pub fn cluster(&self) -> &ClusterName {
        &self.cluster
    }

    pub fn replicas(&self) -> u32 {
        self.replicas
    }
}

/// Convert a declared replica count, rejecting only negative values
///
/// Counts beyond `u32::MAX` saturate; selection clamps them to the cluster
/// size anyway.
pub(crate) fn replica_count(scope: impl FnOnce() -> String, replicas: i64) -> Result<u32> {
    if replicas < 0 {
        return Err(ValidationError::NegativeReplicas {
            scope: scope(),
            replicas,
        });
    }
    Ok(u32::try_from(replicas).unwrap_or(u32::MAX))
}

/// Servers to start regardless of cluster membership
///
/// Keeps the order of first appearance; repeated names collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExplicitServerList(Vec<ServerName>);

impl ExplicitServerList {
    pub fn new<I, S>(servers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for server in servers {
            let server = server.into();
            if server.is_empty() {
                return Err(ValidationError::EmptyServerName);
            }
            if seen.insert(server.clone()) {
                ordered.push(ServerName::new(server));
            }
        }
        Ok(Self(ordered))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServerName> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Optional inputs handed to the startup evaluator alongside the spec and
/// topology
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StartupRequest {
    overrides: Vec<ClusterOverride>,
    servers: ExplicitServerList,
}

impl StartupRequest {
    /// Combine overrides and explicit servers; at most one override per cluster
    pub fn new(overrides: Vec<ClusterOverride>, servers: ExplicitServerList) -> Result<Self> {
        let mut seen = HashSet::new();
        for item in &overrides {
            if !seen.insert(item.cluster.as_str()) {
                return Err(ValidationError::DuplicateOverride {
                    name: item.cluster.to_string(),
                });
            }
        }
        Ok(Self { overrides, servers })
    }

    pub fn overrides(&self) -> &[ClusterOverride] {
        &self.overrides
    }

    pub fn servers(&self) -> &ExplicitServerList {
        &self.servers
    }

    /// The override for a cluster, if one was given
    pub fn override_for(&self, cluster: &str) -> Option<&ClusterOverride> {
        self.overrides.iter().find(|o| o.cluster.as_str() == cluster)
    }
}
