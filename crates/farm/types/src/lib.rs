//! Farm Types - Specification and topology model for application-server farms
//!
//! A farm domain is one administration server plus zero or more clusters of
//! interchangeable managed servers. This crate holds the validated,
//! immutable values the startup evaluator consumes.
//!
//! ## Key Concepts
//!
//! - **DomainSpec**: Desired configuration of one domain, built through
//!   [`DomainSpecBuilder`]
//! - **DomainTopology**: Clusters and their declared, ordered membership
//! - **StartupRequest**: Optional cluster overrides and explicit servers
//! - **Documents**: Raw declared shapes, converted with `TryFrom`
//!
//! Every value is validated once at construction; a [`ValidationError`]
//! means the value never existed.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod document;
pub mod error;
pub mod ids;
pub mod spec;
pub mod startup;
pub mod topology;

// Re-export main types
pub use document::{
    ClusterDocument, ClusterStartupDocument, DomainDocument, ServerStartupDocument,
    StartupDocument, TopologyDocument,
};
pub use error::{Result, ValidationError};
pub use ids::{ClusterName, DomainUid, ServerName};
pub use spec::{
    DomainSpec, DomainSpecBuilder, ImagePullPolicy, SecretReference, SpecDefaults,
    StartupControl, DEFAULT_IMAGE,
};
pub use startup::{ClusterOverride, ExplicitServerList, StartupRequest};
pub use topology::{ClusterTopology, DomainTopology};
