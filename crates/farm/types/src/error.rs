//! Validation errors raised while constructing model values

use thiserror::Error;

/// Malformed specification, topology or startup input
///
/// Raised at construction time. A value that fails validation never reaches
/// the startup evaluator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was missing or empty
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// Administration port outside 1..=65535
    #[error("Invalid administration port {port}: must be a positive integer no greater than 65535")]
    InvalidPort { port: i64 },

    /// Image pull policy is not Always, Never or IfNotPresent
    #[error("Invalid image pull policy '{value}': legal values are Always, Never and IfNotPresent")]
    InvalidPullPolicy { value: String },

    /// Startup control is not one of the five enumerants
    #[error("Invalid startup control '{value}': legal values are NONE, ADMIN, ALL, SPECIFIED and AUTO")]
    InvalidStartupControl { value: String },

    /// An exported channel name was empty
    #[error("Exported channel names cannot be empty")]
    EmptyChannel,

    /// The same channel was listed twice for export
    #[error("Channel '{name}' is exported more than once")]
    DuplicateChannel { name: String },

    /// A replica count was below zero; counts above the cluster size clamp
    #[error("Replica count for {scope} cannot be negative: {replicas}")]
    NegativeReplicas { scope: String, replicas: i64 },

    /// A cluster name was empty
    #[error("Cluster names cannot be empty")]
    EmptyClusterName,

    /// A server name was empty
    #[error("Server names cannot be empty")]
    EmptyServerName,

    /// Two clusters share a name
    #[error("Cluster '{name}' is declared more than once")]
    DuplicateCluster { name: String },

    /// A server is declared in more than one place
    #[error("Server '{name}' is declared more than once in the topology")]
    DuplicateServer { name: String },

    /// Two overrides target the same cluster
    #[error("Cluster '{name}' has more than one startup override")]
    DuplicateOverride { name: String },
}

/// Result type for model construction
pub type Result<T> = std::result::Result<T, ValidationError>;
