//! Crate-level error aggregation.
//!
//! Each concern defines its own error enum next to its module; this type
//! collects them so the drivers can surface any failure as one diagnostic
//! line and exit non-zero.

use thiserror::Error;

use crate::attributes::AttributeError;
use crate::config::ConfigError;
use crate::estimator::EstimationError;
use crate::graph::GraphError;
use crate::io::{AttributeFileError, NetworkFileError, NodeFileError};
use crate::registry::RegistryError;
use crate::sampler::SamplerError;
use crate::simulator::SimulationError;

/// Any error a driver run can surface.
#[derive(Debug, Error)]
pub enum ErgmError {
    /// Configuration reading or validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The network file was unreadable or malformed.
    #[error(transparent)]
    Network(#[from] NetworkFileError),
    /// An attribute file was unreadable or malformed.
    #[error(transparent)]
    AttributeFile(#[from] AttributeFileError),
    /// A zone or term file was unreadable or malformed.
    #[error(transparent)]
    NodeFile(#[from] NodeFileError),
    /// Attribute columns did not line up with the graph or a name did not
    /// resolve.
    #[error(transparent)]
    Attribute(#[from] AttributeError),
    /// Graph construction or conditional-structure attachment failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// A requested statistic could not be bound.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The sampler configuration cannot drive the graph.
    #[error(transparent)]
    Sampler(#[from] SamplerError),
    /// Estimation failed.
    #[error(transparent)]
    Estimation(#[from] EstimationError),
    /// Simulation failed.
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    /// An output file could not be created or written.
    #[error("output file `{path}`: {source}")]
    Output {
        /// The file being written.
        path: String,
        /// Underlying operating-system error.
        #[source]
        source: std::io::Error,
    },
}

/// Convenient alias for results returned by the driver API.
pub type Result<T> = std::result::Result<T, ErgmError>;
