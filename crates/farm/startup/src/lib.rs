//! # Farm Startup Control
//!
//! Decides which servers of a domain should be running.
//!
//! ## Overview
//!
//! The [`StartupPolicyEvaluator`] is a pure function of a
//! [`DomainSpec`](farm_types::DomainSpec), its
//! [`DomainTopology`](farm_types::DomainTopology) and an optional
//! [`StartupRequest`](farm_types::StartupRequest). The startup control
//! policy selects the table row:
//!
//! | Policy | Target set |
//! |---|---|
//! | `NONE` | nothing, not even the administration server |
//! | `ADMIN` | the administration server |
//! | `ALL` | the administration server and every managed server, clustered or not |
//! | `SPECIFIED` | the administration server, explicit servers, and the first `replicas` members of each overridden cluster |
//! | `AUTO` | as `SPECIFIED`, plus the first default-replicas members of every other cluster |
//!
//! Members are always taken as a prefix of the declared order, so repeated
//! evaluation of unchanged inputs yields the same plan.
//!
//! ## Example
//!
//! ```rust
//! use farm_startup::StartupPolicyEvaluator;
//! use farm_types::{
//!     ClusterOverride, ClusterTopology, DomainSpec, DomainTopology, ExplicitServerList,
//!     SecretReference, StartupControl, StartupRequest,
//! };
//!
//! let spec = DomainSpec::builder("d1", "base_domain")
//!     .with_admin_secret(SecretReference::new("d1-credentials"))
//!     .with_admin_server("admin", 7001)
//!     .with_startup_control(StartupControl::Auto)
//!     .build()
//!     .unwrap();
//!
//! let topology = DomainTopology::new(
//!     vec![
//!         ClusterTopology::new("C1", ["s1", "s2", "s3"]).unwrap(),
//!         ClusterTopology::new("C2", ["t1", "t2"]).unwrap(),
//!     ],
//!     vec![],
//!     1,
//! )
//! .unwrap();
//!
//! let request = StartupRequest::new(
//!     vec![ClusterOverride::new("C1", 1).unwrap()],
//!     ExplicitServerList::default(),
//! )
//! .unwrap();
//!
//! let plan = StartupPolicyEvaluator::new()
//!     .evaluate(&spec, &topology, &request)
//!     .unwrap();
//!
//! let servers: Vec<&str> = plan.servers().map(|s| s.as_str()).collect();
//! assert_eq!(servers, ["admin", "s1", "t1"]);
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod evaluator;
pub mod plan;

// Re-exports
pub use error::{Result, StartupError, TopologyReferenceError};
pub use evaluator::StartupPolicyEvaluator;
pub use plan::{PlanDelta, SelectionReason, StartupDecisionCard, StartupPlan};
