//! Error types for startup evaluation

use thiserror::Error;

/// A startup input names something the topology does not declare
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyReferenceError {
    /// A cluster override targets a cluster absent from the topology
    #[error("Cluster override references unknown cluster '{cluster}'")]
    UnknownCluster { cluster: String },

    /// The explicit server list names a server absent from the topology
    #[error("Explicit server list references unknown server '{server}'")]
    UnknownServer { server: String },

    /// The administration server is declared as a cluster member
    #[error("Administration server '{server}' is declared as a member of cluster '{cluster}'")]
    AdminServerClustered { server: String, cluster: String },
}

/// Startup evaluation errors
///
/// Evaluation is all-or-nothing: when an error is returned no plan exists.
/// Malformed input never gets this far; it is rejected as a
/// [`ValidationError`](farm_types::ValidationError) while building the model
/// values the evaluator takes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StartupError {
    /// Inputs referenced entities missing from the topology
    #[error(transparent)]
    TopologyReference(#[from] TopologyReferenceError),
}

/// Result type for startup evaluation
pub type Result<T> = std::result::Result<T, StartupError>;
