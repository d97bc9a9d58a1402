//! Estimation and simulation of exponential random graph models (ERGMs).
//!
//! An ERGM places a probability on every graph over a fixed node set,
//! proportional to the exponential of a coefficient vector dotted with a
//! vector of sufficient statistics. This crate implements the engine that
//! makes those models usable at scale: an incrementally maintained graph
//! store with cached two-path counts, a library of change statistics that
//! report how each statistic moves when one tie is toggled, three
//! Metropolis-Hastings samplers over graph space, an
//! equilibrium-expectation estimator for the coefficients, and a simulator
//! that draws graphs from fixed coefficients. File loaders (Pajek networks,
//! attribute tables, snowball zones, citation terms), the configuration
//! parser, and the run drivers used by the `estim` and `sim` binaries sit
//! around that core.

mod attributes;
mod config;
mod error;
mod estimator;
mod graph;
mod io;
mod registry;
mod run;
mod sampler;
mod simulator;
mod stats;

pub use crate::{
    attributes::{AttributeError, Attributes, Column, SetMember},
    config::{Config, ConfigError, KEYWORDS, describe_keywords},
    error::{ErgmError, Result},
    estimator::{
        EstimationError, EstimationOutcome, EstimationSettings, estimate, replay_observed,
    },
    graph::{Graph, GraphError, GraphMode, NodeId, Snowball, Terms, Tie, TwoPathCacheKind},
    io::{
        AttributeFileError, NetworkFileError, NodeFileError, PajekNetwork,
        read_binary_attributes, read_categorical_attributes, read_continuous_attributes,
        read_node_integers, read_pajek, read_set_attributes, write_pajek,
    },
    registry::{
        DEFAULT_EXPONENT, DEFAULT_LAMBDA, DyadicRequest, InteractionRequest, ModelRequests,
        NodalRequest, RegistryError, StructuralRequest, all_names, build_model, structural_names,
    },
    run::{load_config, run_estimation_task, run_simulation, seed_for_task},
    sampler::{
        BatchResult, Conditionality, SamplerError, SamplerKind, SamplerOptions, SamplerState,
        run_batch,
    },
    simulator::{
        SampleInfo, SimulationError, SimulationSettings, erdos_renyi_fill, initial_state,
        simulate, strip_maxterm_ties,
    },
    stats::{
        DyadicFn, InteractionFn, Model, ModelParam, NodalFn, SpecialStat, Statistic,
        StructuralFn, calc_change_stats, pow0,
    },
};
