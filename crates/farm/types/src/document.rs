//! Declared configuration documents
//!
//! These are the raw shapes read from the orchestrator's desired-state store.
//! They carry no guarantees; converting them with `TryFrom` (or the
//! `into_*` helpers) yields validated model values.
//!
//! Enumerated fields are kept as strings here so an illegal value surfaces as
//! a [`ValidationError`] rather than a deserialization failure.

use crate::error::{Result, ValidationError};
use crate::ids::ServerName;
use crate::spec::{DomainSpec, SecretReference, SpecDefaults};
use crate::startup::{replica_count, ClusterOverride, ExplicitServerList, StartupRequest};
use crate::topology::{ClusterTopology, DomainTopology};
use serde::{Deserialize, Serialize};

/// Domain specification as declared
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainDocument {
    #[serde(rename = "domainUID", default)]
    pub domain_uid: String,
    #[serde(default)]
    pub domain_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_secret: Option<SecretReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_port: Option<i64>,
    #[serde(rename = "exportT3Channels", default)]
    pub export_t3_channels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_control: Option<String>,
}

impl DomainDocument {
    /// Validate against the given platform defaults
    pub fn into_spec(self, defaults: SpecDefaults) -> Result<DomainSpec> {
        let mut builder = DomainSpec::builder(self.domain_uid, self.domain_name)
            .with_defaults(defaults)
            .with_exported_channels(self.export_t3_channels);

        if let Some(image) = self.image {
            builder = builder.with_image(image);
        }
        if let Some(policy) = self.image_pull_policy {
            builder = builder.with_image_pull_policy(policy.parse()?);
        }
        if let Some(secret) = self.admin_secret {
            builder = builder.with_admin_secret(secret);
        }
        if let Some(control) = self.startup_control {
            builder = builder.with_startup_control(control.parse()?);
        }

        let name = self
            .as_name
            .ok_or(ValidationError::MissingField { field: "asName" })?;
        let port = self
            .as_port
            .ok_or(ValidationError::MissingField { field: "asPort" })?;

        builder.with_admin_server(name, port).build()
    }
}

impl TryFrom<DomainDocument> for DomainSpec {
    type Error = ValidationError;

    fn try_from(document: DomainDocument) -> Result<Self> {
        document.into_spec(SpecDefaults::default())
    }
}

/// One cluster as declared by the topology collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDocument {
    pub cluster_name: String,
    #[serde(default)]
    pub servers: Vec<String>,
}

/// Domain topology as declared
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyDocument {
    /// Domain-level default replica count
    #[serde(default)]
    pub replicas: i64,
    #[serde(default)]
    pub clusters: Vec<ClusterDocument>,
    /// Managed servers that belong to no cluster
    #[serde(default)]
    pub servers: Vec<String>,
}

impl TryFrom<TopologyDocument> for DomainTopology {
    type Error = ValidationError;

    fn try_from(document: TopologyDocument) -> Result<Self> {
        let default_replicas =
            replica_count(|| "domain default".to_string(), document.replicas)?;

        let clusters = document
            .clusters
            .into_iter()
            .map(|c| ClusterTopology::new(c.cluster_name, c.servers))
            .collect::<Result<Vec<_>>>()?;

        let standalone = document
            .servers
            .into_iter()
            .map(ServerName::new)
            .collect();

        DomainTopology::new(clusters, standalone, default_replicas)
    }
}

/// Replica override as declared under `clusterStartup`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStartupDocument {
    pub cluster_name: String,
    pub replicas: i64,
}

/// Explicit server as declared under `serverStartup`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStartupDocument {
    pub server_name: String,
}

/// Startup overrides as declared
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupDocument {
    #[serde(default)]
    pub cluster_startup: Vec<ClusterStartupDocument>,
    #[serde(default)]
    pub server_startup: Vec<ServerStartupDocument>,
}

impl TryFrom<StartupDocument> for StartupRequest {
    type Error = ValidationError;

    fn try_from(document: StartupDocument) -> Result<Self> {
        let overrides = document
            .cluster_startup
            .into_iter()
            .map(|c| ClusterOverride::from_signed(c.cluster_name, c.replicas))
            .collect::<Result<Vec<_>>>()?;

        let servers =
            ExplicitServerList::new(document.server_startup.into_iter().map(|s| s.server_name))?;

        StartupRequest::new(overrides, servers)
    }
}
