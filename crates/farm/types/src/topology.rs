//! Cluster topology of a domain
//!
//! The topology describes declared membership only; it knows nothing about
//! which servers are actually running.

use crate::error::{Result, ValidationError};
use crate::ids::{ClusterName, ServerName};
use serde::Serialize;
use std::collections::HashSet;

/// A named group of interchangeable managed servers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterTopology {
    name: ClusterName,
    /// Members in declared order; replica selection takes a prefix of this list
    members: Vec<ServerName>,
}

impl ClusterTopology {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyClusterName);
        }

        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for member in members {
            let member = member.into();
            if member.is_empty() {
                return Err(ValidationError::EmptyServerName);
            }
            if !seen.insert(member.clone()) {
                return Err(ValidationError::DuplicateServer { name: member });
            }
            ordered.push(ServerName::new(member));
        }

        Ok(Self {
            name: ClusterName::new(name),
            members: ordered,
        })
    }

    pub fn name(&self) -> &ClusterName {
        &self.name
    }

    pub fn members(&self) -> &[ServerName] {
        &self.members
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, server: &str) -> bool {
        self.members.iter().any(|m| m.as_str() == server)
    }

    /// The first `replicas` members in declared order, clamped to the
    /// cluster size
    pub fn first_members(&self, replicas: u32) -> &[ServerName] {
        let count = usize::try_from(replicas)
            .unwrap_or(usize::MAX)
            .min(self.members.len());
        &self.members[..count]
    }
}

/// All clusters and standalone managed servers of one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainTopology {
    clusters: Vec<ClusterTopology>,
    standalone_servers: Vec<ServerName>,
    default_replicas: u32,
}

impl DomainTopology {
    /// Build a topology, checking that cluster names are unique and that
    /// every server is declared exactly once
    pub fn new(
        clusters: Vec<ClusterTopology>,
        standalone_servers: Vec<ServerName>,
        default_replicas: u32,
    ) -> Result<Self> {
        let mut cluster_names = HashSet::new();
        let mut server_names = HashSet::new();

        for cluster in &clusters {
            if !cluster_names.insert(cluster.name.as_str()) {
                return Err(ValidationError::DuplicateCluster {
                    name: cluster.name.to_string(),
                });
            }
            for member in &cluster.members {
                if !server_names.insert(member.as_str()) {
                    return Err(ValidationError::DuplicateServer {
                        name: member.to_string(),
                    });
                }
            }
        }

        for server in &standalone_servers {
            if server.as_str().is_empty() {
                return Err(ValidationError::EmptyServerName);
            }
            if !server_names.insert(server.as_str()) {
                return Err(ValidationError::DuplicateServer {
                    name: server.to_string(),
                });
            }
        }

        Ok(Self {
            clusters,
            standalone_servers,
            default_replicas,
        })
    }

    /// A topology with no clusters and no managed servers
    pub fn empty() -> Self {
        Self {
            clusters: Vec::new(),
            standalone_servers: Vec::new(),
            default_replicas: 0,
        }
    }

    pub fn clusters(&self) -> &[ClusterTopology] {
        &self.clusters
    }

    pub fn standalone_servers(&self) -> &[ServerName] {
        &self.standalone_servers
    }

    /// Replica count for clusters that have no explicit override
    pub fn default_replicas(&self) -> u32 {
        self.default_replicas
    }

    pub fn cluster(&self, name: &str) -> Option<&ClusterTopology> {
        self.clusters.iter().find(|c| c.name.as_str() == name)
    }

    /// The cluster a server belongs to, if it is clustered
    pub fn cluster_of(&self, server: &str) -> Option<&ClusterTopology> {
        self.clusters.iter().find(|c| c.contains(server))
    }

    /// Is the server declared anywhere in this topology?
    pub fn contains_server(&self, server: &str) -> bool {
        self.cluster_of(server).is_some()
            || self.standalone_servers.iter().any(|s| s.as_str() == server)
    }

    /// Every clustered server, cluster by cluster in declared order
    pub fn clustered_servers(&self) -> impl Iterator<Item = &ServerName> {
        self.clusters.iter().flat_map(|c| c.members.iter())
    }

    /// Total number of declared managed servers
    pub fn server_count(&self) -> usize {
        self.clusters.iter().map(ClusterTopology::size).sum::<usize>() + self.standalone_servers.len()
    }
}
