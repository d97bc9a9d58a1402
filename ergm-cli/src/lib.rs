//! Command-line drivers for ERGM estimation and simulation.
//!
//! The `estim` and `sim` binaries are thin wrappers: parse arguments,
//! initialise logging, load the configuration, and hand off to the
//! `ergm-core` run drivers. Multi-task estimation fans independent chains
//! out across a thread pool.

pub mod cli;
pub mod logging;
