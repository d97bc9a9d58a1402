//! Top-level estimation and simulation drivers.
//!
//! These functions own the full lifecycle of one run: load the inputs named
//! by the configuration, bind the model, seed the chain, drive the
//! estimator or simulator, and write the output files. Each estimation
//! task is fully independent (its own graph, PRNG, and output files), and
//! callers may fan tasks out across threads or processes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;

use crate::attributes::Attributes;
use crate::config::{Config, ConfigError};
use crate::error::{ErgmError, Result};
use crate::estimator::{estimate, replay_observed};
use crate::graph::{Graph, Tie, TwoPathCacheKind};
use crate::io::{
    read_binary_attributes, read_categorical_attributes, read_continuous_attributes,
    read_node_integers, read_pajek, read_set_attributes, write_pajek,
};
use crate::registry::build_model;
use crate::sampler::Conditionality;
use crate::simulator::{SimulationError, initial_state, simulate};
use crate::stats::Model;

/// Seeds a task's PRNG from wall time XOR the task id, so concurrent tasks
/// draw from disjoint streams.
#[must_use]
pub fn seed_for_task(task: u64) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64);
    now ^ task
}

fn load_attributes(config: &Config, n: usize) -> Result<Attributes> {
    let mut attrs = Attributes::empty();
    if let Some(path) = &config.binattr_file {
        read_binary_attributes(path, &mut attrs)?;
    }
    if let Some(path) = &config.catattr_file {
        read_categorical_attributes(path, &mut attrs)?;
    }
    if let Some(path) = &config.contattr_file {
        read_continuous_attributes(path, &mut attrs)?;
    }
    if let Some(path) = &config.setattr_file {
        read_set_attributes(path, &mut attrs)?;
    }
    attrs.validate_row_counts(n)?;
    Ok(attrs)
}

fn attach_conditional_structure(config: &Config, g: &mut Graph) -> Result<()> {
    if let Some(path) = &config.zone_file {
        let zones = read_node_integers(path, "zone")?;
        g.attach_snowball(zones)?;
    }
    if let Some(path) = &config.term_file {
        let terms = read_node_integers(path, "term")?;
        g.attach_terms(terms)?;
    }
    Ok(())
}

fn load_observed_graph(config: &Config) -> Result<(Graph, Vec<Tie>)> {
    let path = config
        .arclist_file
        .as_deref()
        .ok_or(ConfigError::MissingRequired {
            keyword: "arclistFile",
        })?;
    let net = read_pajek(path, config.allow_loops)?;
    let g = match net.mode_a {
        Some(mode_a) => Graph::bipartite(mode_a, net.n - mode_a, TwoPathCacheKind::default())?,
        None if net.directed => {
            Graph::directed(net.n, TwoPathCacheKind::default(), config.allow_loops)
        }
        None => Graph::undirected(net.n, TwoPathCacheKind::default()),
    };
    let ties = net.ties.iter().map(|&(i, j)| Tie::new(i, j)).collect();
    Ok((g, ties))
}

fn create_output(path: &str) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ErgmError::Output {
            path: path.to_owned(),
            source,
        })
}

fn flush_output(mut out: BufWriter<File>, path: &str) -> Result<()> {
    out.flush().map_err(|source| ErgmError::Output {
        path: path.to_owned(),
        source,
    })
}

fn write_observed_stats(path: &str, model: &Model, observed: &[f64]) -> Result<()> {
    let mut out = create_output(path)?;
    let write = |out: &mut BufWriter<File>| -> std::io::Result<()> {
        let labels: Vec<&str> = model.labels().collect();
        writeln!(out, "{}", labels.join(" "))?;
        let values: Vec<String> = observed.iter().map(ToString::to_string).collect();
        writeln!(out, "{}", values.join(" "))
    };
    write(&mut out).map_err(|source| ErgmError::Output {
        path: path.to_owned(),
        source,
    })?;
    flush_output(out, path)
}

/// Runs one estimation task end to end.
///
/// # Errors
/// Any configuration, input, binding, sampling, or output failure.
pub fn run_estimation_task(config: &Config, task: u64) -> Result<()> {
    let suffix = config.output_file_suffix_base + task;
    let (mut g, ties) = load_observed_graph(config)?;
    let attrs = load_attributes(config, g.node_count())?;
    let model = build_model(&g, &attrs, &config.requests)?;
    info!(task, nodes = g.node_count(), ties = ties.len(), params = model.len(),
        "estimation task loaded");

    let observed = replay_observed(&mut g, &attrs, &model, &ties);
    attach_conditional_structure(config, &mut g)?;

    if config.compute_stats {
        let path = format!("{}_{suffix}.txt", config.obs_stats_file_prefix);
        write_observed_stats(&path, &model, &observed)?;
    }

    let theta_path = format!("{}_{suffix}.txt", config.theta_file_prefix);
    let dza_path = format!("{}_{suffix}.txt", config.dza_file_prefix);
    let mut theta_out = create_output(&theta_path)?;
    let mut dza_out = create_output(&dza_path)?;

    let opts = config.sampler_options();
    let mut rng = SmallRng::seed_from_u64(seed_for_task(task));
    let outcome = estimate(
        &mut g,
        &attrs,
        &model,
        &opts,
        &config.estimation,
        &observed,
        &mut rng,
        &mut theta_out,
        &mut dza_out,
    )?;
    flush_output(theta_out, &theta_path)?;
    flush_output(dza_out, &dza_path)?;

    if config.output_simulated_network {
        let path = format!("{}_{suffix}.net", config.sim_net_file_prefix);
        let mut out = create_output(&path)?;
        write_pajek(&g, &mut out).map_err(|source| ErgmError::Output {
            path: path.clone(),
            source,
        })?;
        flush_output(out, &path)?;
    }

    info!(
        task,
        acceptance = outcome.acceptance_rate,
        theta = ?outcome.theta,
        "estimation task finished"
    );
    Ok(())
}

/// Runs one simulation end to end.
///
/// # Errors
/// Any configuration, input, binding, sampling, or output failure.
pub fn run_simulation(config: &Config) -> Result<()> {
    let opts = config.sampler_options();
    let (mut g, attrs) = if opts.conditional == Conditionality::Citation {
        let (mut g, ties) = load_observed_graph(config)?;
        for tie in &ties {
            if !g.is_tie(tie.tail, tie.head) {
                g.insert_updating_list(tie.tail, tie.head);
            }
        }
        let attrs = load_attributes(config, g.node_count())?;
        attach_conditional_structure(config, &mut g)?;
        (g, attrs)
    } else {
        if config.num_nodes == 0 {
            return Err(ConfigError::MissingRequired {
                keyword: "numNodes",
            }
            .into());
        }
        let g = if config.is_directed {
            Graph::directed(config.num_nodes, TwoPathCacheKind::default(), config.allow_loops)
        } else {
            Graph::undirected(config.num_nodes, TwoPathCacheKind::default())
        };
        let attrs = load_attributes(config, g.node_count())?;
        (g, attrs)
    };

    let model = build_model(&g, &attrs, &config.requests)?;
    let theta = model.theta0();
    let stats_path = config
        .stats_file
        .as_deref()
        .ok_or(ConfigError::MissingRequired {
            keyword: "statsFile",
        })?;
    let stats_name = stats_path.display().to_string();
    let mut stats_out = create_output(&stats_name)?;

    let mut rng = SmallRng::seed_from_u64(seed_for_task(0));
    let z0 = initial_state(&mut g, &attrs, &model, &opts, &config.simulation, &mut rng)?;

    let write_networks = config.output_simulated_network;
    let prefix = config.sim_net_file_prefix.clone();
    simulate(
        &mut g,
        &attrs,
        &model,
        &theta,
        &opts,
        &config.simulation,
        &z0,
        &mut rng,
        &mut stats_out,
        |graph, sample| {
            if !write_networks {
                return Ok(());
            }
            let path = format!("{prefix}_{}.net", sample.iteration);
            let file = File::create(&path).map_err(SimulationError::Io)?;
            let mut out = BufWriter::new(file);
            write_pajek(graph, &mut out).map_err(SimulationError::Io)?;
            out.flush().map_err(SimulationError::Io)
        },
    )?;
    flush_output(stats_out, &stats_name)?;
    info!("simulation finished");
    Ok(())
}

/// Loads a configuration file, for the binaries.
///
/// # Errors
/// Returns [`ErgmError::Config`] for unreadable or invalid files.
pub fn load_config(path: &Path) -> Result<Config> {
    Ok(Config::from_file(path)?)
}
