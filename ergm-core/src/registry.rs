//! The parameter registry: configuration names bound to change-statistic
//! kernels.
//!
//! Configuration files request statistics by name, optionally with a decay
//! or exponent override and the attribute columns they read. The registry
//! owns the closed name table, checks mode compatibility, resolves attribute
//! names to column slots, and assembles the bound [`Model`] in the fixed
//! evaluation order: structural, nodal, dyadic covariate, attribute
//! interaction.

use thiserror::Error;

use crate::attributes::{AttributeError, Attributes};
use crate::graph::{Graph, GraphMode};
use crate::stats::{
    DyadicFn, InteractionFn, Model, ModelParam, NodalFn, SpecialStat, Statistic, StructuralFn,
    attribute, bipartite, dyadic, structural, undirected,
};

/// Default geometric decay for the alternating statistics.
pub const DEFAULT_LAMBDA: f64 = 2.0;
/// Default exponent for the homophily statistics that bear one.
pub const DEFAULT_EXPONENT: f64 = 0.5;

/// A structural statistic requested by the configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct StructuralRequest {
    /// Statistic name as written in the configuration file.
    pub name: String,
    /// Optional decay override from the `(lambda)` suffix.
    pub lambda: Option<f64>,
    /// Initial coefficient value.
    pub theta0: f64,
}

/// A nodal attribute statistic requested by the configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct NodalRequest {
    /// Statistic name as written in the configuration file.
    pub name: String,
    /// Attribute column the statistic reads.
    pub attr_name: String,
    /// Optional exponent override for exponent-bearing statistics.
    pub exponent: Option<f64>,
    /// Initial coefficient value.
    pub theta0: f64,
}

/// A dyadic covariate statistic requested by the configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct DyadicRequest {
    /// Statistic name as written in the configuration file.
    pub name: String,
    /// Continuous coordinate columns, in kernel order.
    pub slot_names: Vec<String>,
    /// Initial coefficient value.
    pub theta0: f64,
}

/// An attribute interaction statistic requested by the configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionRequest {
    /// Statistic name as written in the configuration file.
    pub name: String,
    /// First attribute column.
    pub attr_a: String,
    /// Second attribute column.
    pub attr_b: String,
    /// Initial coefficient value.
    pub theta0: f64,
}

/// Everything the configuration requested of the model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelRequests {
    /// `structParams` entries.
    pub structural: Vec<StructuralRequest>,
    /// `attrParams` entries.
    pub nodal: Vec<NodalRequest>,
    /// `dyadicParams` entries.
    pub dyadic: Vec<DyadicRequest>,
    /// `attrInteractionParams` entries.
    pub interaction: Vec<InteractionRequest>,
}

/// Errors raised while binding requested statistics.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The name matches no registered statistic.
    #[error("unknown statistic `{name}`")]
    UnknownStatistic {
        /// The unrecognised name.
        name: String,
    },
    /// The statistic exists but not for the graph's mode.
    #[error("statistic `{name}` is not defined for {mode} graphs")]
    WrongMode {
        /// The requested name.
        name: String,
        /// Human-readable graph mode.
        mode: &'static str,
    },
    /// The statistic takes a different number of attribute arguments.
    #[error("statistic `{name}` takes {expected} attribute(s), got {got}")]
    SlotCount {
        /// The requested name.
        name: String,
        /// Number of attribute arguments required.
        expected: usize,
        /// Number supplied.
        got: usize,
    },
    /// An attribute name did not resolve against the loaded columns.
    #[error(transparent)]
    Attribute(#[from] AttributeError),
}

/// Which attribute family a nodal kernel reads.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Family {
    Binary,
    Categorical,
    Continuous,
    Set,
}

#[derive(Clone, Copy)]
struct ModeSet {
    directed: bool,
    undirected: bool,
    bipartite: bool,
}

const D: ModeSet = ModeSet { directed: true, undirected: false, bipartite: false };
const U: ModeSet = ModeSet { directed: false, undirected: true, bipartite: false };
const B: ModeSet = ModeSet { directed: false, undirected: false, bipartite: true };
const UB: ModeSet = ModeSet { directed: false, undirected: true, bipartite: true };
const DU: ModeSet = ModeSet { directed: true, undirected: true, bipartite: false };
const ALL: ModeSet = ModeSet { directed: true, undirected: true, bipartite: true };

impl ModeSet {
    const fn admits(self, mode: GraphMode) -> bool {
        match mode {
            GraphMode::Directed { .. } => self.directed,
            GraphMode::Undirected => self.undirected,
            GraphMode::Bipartite { .. } => self.bipartite,
        }
    }
}

const fn mode_name(mode: GraphMode) -> &'static str {
    match mode {
        GraphMode::Directed { .. } => "directed",
        GraphMode::Undirected => "undirected",
        GraphMode::Bipartite { .. } => "bipartite",
    }
}

struct StructuralEntry {
    name: &'static str,
    f: StructuralFn,
    modes: ModeSet,
    has_lambda: bool,
    special: SpecialStat,
}

struct NodalEntry {
    name: &'static str,
    f: NodalFn,
    family: Family,
    modes: ModeSet,
    has_exponent: bool,
}

struct DyadicEntry {
    name: &'static str,
    f: DyadicFn,
    slots: usize,
}

struct InteractionEntry {
    name: &'static str,
    f: InteractionFn,
    family: Family,
    modes: ModeSet,
}

#[rustfmt::skip]
const STRUCTURAL: &[StructuralEntry] = &[
    StructuralEntry { name: "Arc", f: structural::change_arc, modes: D, has_lambda: false, special: SpecialStat::Density },
    StructuralEntry { name: "Reciprocity", f: structural::change_reciprocity, modes: D, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "Sink", f: structural::change_sink, modes: D, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "Source", f: structural::change_source, modes: D, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "Isolates", f: structural::change_isolates, modes: D, has_lambda: false, special: SpecialStat::Isolates },
    StructuralEntry { name: "TwoPath", f: structural::change_two_path, modes: D, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "InTwoStars", f: structural::change_in_two_stars, modes: D, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "OutTwoStars", f: structural::change_out_two_stars, modes: D, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "TransitiveTriad", f: structural::change_transitive_triad, modes: D, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "CyclicTriad", f: structural::change_cyclic_triad, modes: D, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "AltInStars", f: structural::change_alt_in_stars, modes: D, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "AltOutStars", f: structural::change_alt_out_stars, modes: D, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "AltKTrianglesT", f: structural::change_alt_k_triangles_t, modes: D, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "AltKTrianglesC", f: structural::change_alt_k_triangles_c, modes: D, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "AltKTrianglesD", f: structural::change_alt_k_triangles_d, modes: D, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "AltKTrianglesU", f: structural::change_alt_k_triangles_u, modes: D, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "AltTwoPathsT", f: structural::change_alt_two_paths_t, modes: D, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "AltTwoPathsD", f: structural::change_alt_two_paths_d, modes: D, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "AltTwoPathsU", f: structural::change_alt_two_paths_u, modes: D, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "AltTwoPathsTD", f: structural::change_alt_two_paths_td, modes: D, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "Loop", f: structural::change_loop, modes: D, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "LoopInteraction", f: structural::change_loop_interaction, modes: D, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "Edge", f: undirected::change_edge, modes: UB, has_lambda: false, special: SpecialStat::Density },
    StructuralEntry { name: "TwoStars", f: undirected::change_two_stars, modes: U, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "ThreeStars", f: undirected::change_three_stars, modes: U, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "AltStars", f: undirected::change_alt_stars, modes: U, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "AltTwoPaths", f: undirected::change_alt_two_paths, modes: U, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "AltKTriangles", f: undirected::change_alt_k_triangles, modes: U, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "FourCycles", f: undirected::change_four_cycles, modes: UB, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "ThreePaths", f: undirected::change_three_paths, modes: U, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "IsolateEdges", f: undirected::change_isolate_edges, modes: U, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "Isolates", f: undirected::change_isolates, modes: U, has_lambda: false, special: SpecialStat::Isolates },
    StructuralEntry { name: "TwoStarsA", f: bipartite::change_two_stars_a, modes: B, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "TwoStarsB", f: bipartite::change_two_stars_b, modes: B, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "ThreeStarsA", f: bipartite::change_three_stars_a, modes: B, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "ThreeStarsB", f: bipartite::change_three_stars_b, modes: B, has_lambda: false, special: SpecialStat::None },
    StructuralEntry { name: "AltStarsA", f: bipartite::change_alt_stars_a, modes: B, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "AltStarsB", f: bipartite::change_alt_stars_b, modes: B, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "AltKCyclesA", f: bipartite::change_alt_k_cycles_a, modes: B, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "AltKCyclesB", f: bipartite::change_alt_k_cycles_b, modes: B, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "AltK4CyclesA", f: bipartite::change_alt_k4_cycles_a, modes: B, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "AltK4CyclesB", f: bipartite::change_alt_k4_cycles_b, modes: B, has_lambda: true, special: SpecialStat::None },
    StructuralEntry { name: "IsolatesA", f: bipartite::change_isolates_a, modes: B, has_lambda: false, special: SpecialStat::IsolatesA },
    StructuralEntry { name: "IsolatesB", f: bipartite::change_isolates_b, modes: B, has_lambda: false, special: SpecialStat::IsolatesB },
];

#[rustfmt::skip]
const NODAL: &[NodalEntry] = &[
    NodalEntry { name: "Sender", f: attribute::change_sender, family: Family::Binary, modes: D, has_exponent: false },
    NodalEntry { name: "Receiver", f: attribute::change_receiver, family: Family::Binary, modes: D, has_exponent: false },
    NodalEntry { name: "Interaction", f: attribute::change_interaction, family: Family::Binary, modes: DU, has_exponent: false },
    NodalEntry { name: "Activity", f: attribute::change_activity, family: Family::Binary, modes: U, has_exponent: false },
    NodalEntry { name: "ActivityA", f: attribute::change_activity_a, family: Family::Binary, modes: B, has_exponent: false },
    NodalEntry { name: "ActivityB", f: attribute::change_activity_b, family: Family::Binary, modes: B, has_exponent: false },
    NodalEntry { name: "Matching", f: attribute::change_matching, family: Family::Categorical, modes: ALL, has_exponent: false },
    NodalEntry { name: "Mismatching", f: attribute::change_mismatching, family: Family::Categorical, modes: ALL, has_exponent: false },
    NodalEntry { name: "MatchingReciprocity", f: attribute::change_matching_reciprocity, family: Family::Categorical, modes: D, has_exponent: false },
    NodalEntry { name: "MismatchingReciprocity", f: attribute::change_mismatching_reciprocity, family: Family::Categorical, modes: D, has_exponent: false },
    NodalEntry { name: "MismatchingTransitiveTriad", f: attribute::change_mismatching_transitive_triad, family: Family::Categorical, modes: D, has_exponent: false },
    NodalEntry { name: "MismatchingTransitiveTies", f: attribute::change_mismatching_transitive_ties, family: Family::Categorical, modes: D, has_exponent: false },
    NodalEntry { name: "TwoPathMatchingA", f: attribute::change_two_path_matching_a, family: Family::Categorical, modes: B, has_exponent: false },
    NodalEntry { name: "TwoPathMatchingB", f: attribute::change_two_path_matching_b, family: Family::Categorical, modes: B, has_exponent: false },
    NodalEntry { name: "TwoPathMismatchingA", f: attribute::change_two_path_mismatching_a, family: Family::Categorical, modes: B, has_exponent: false },
    NodalEntry { name: "TwoPathMismatchingB", f: attribute::change_two_path_mismatching_b, family: Family::Categorical, modes: B, has_exponent: false },
    NodalEntry { name: "NodematchAlphaA", f: attribute::change_nodematch_alpha_a, family: Family::Categorical, modes: B, has_exponent: true },
    NodalEntry { name: "NodematchAlphaB", f: attribute::change_nodematch_alpha_b, family: Family::Categorical, modes: B, has_exponent: true },
    NodalEntry { name: "NodematchBetaA", f: attribute::change_nodematch_beta_a, family: Family::Categorical, modes: B, has_exponent: true },
    NodalEntry { name: "NodematchBetaB", f: attribute::change_nodematch_beta_b, family: Family::Categorical, modes: B, has_exponent: true },
    NodalEntry { name: "ContinuousSender", f: attribute::change_continuous_sender, family: Family::Continuous, modes: D, has_exponent: false },
    NodalEntry { name: "ContinuousReceiver", f: attribute::change_continuous_receiver, family: Family::Continuous, modes: D, has_exponent: false },
    NodalEntry { name: "ContinuousActivity", f: attribute::change_continuous_activity, family: Family::Continuous, modes: UB, has_exponent: false },
    NodalEntry { name: "Diff", f: attribute::change_diff, family: Family::Continuous, modes: ALL, has_exponent: false },
    NodalEntry { name: "Sum", f: attribute::change_sum, family: Family::Continuous, modes: ALL, has_exponent: false },
    NodalEntry { name: "DiffReciprocity", f: attribute::change_diff_reciprocity, family: Family::Continuous, modes: D, has_exponent: false },
    NodalEntry { name: "DiffSign", f: attribute::change_diff_sign, family: Family::Continuous, modes: D, has_exponent: false },
    NodalEntry { name: "DiffDirSR", f: attribute::change_diff_dir_sr, family: Family::Continuous, modes: D, has_exponent: false },
    NodalEntry { name: "DiffDirRS", f: attribute::change_diff_dir_rs, family: Family::Continuous, modes: D, has_exponent: false },
    NodalEntry { name: "TwoPathSumA", f: attribute::change_two_path_sum_a, family: Family::Continuous, modes: B, has_exponent: false },
    NodalEntry { name: "TwoPathSumB", f: attribute::change_two_path_sum_b, family: Family::Continuous, modes: B, has_exponent: false },
    NodalEntry { name: "TwoPathDiffA", f: attribute::change_two_path_diff_a, family: Family::Continuous, modes: B, has_exponent: false },
    NodalEntry { name: "TwoPathDiffB", f: attribute::change_two_path_diff_b, family: Family::Continuous, modes: B, has_exponent: false },
    NodalEntry { name: "JaccardSimilarity", f: attribute::change_jaccard_similarity, family: Family::Set, modes: ALL, has_exponent: false },
];

const DYADIC: &[DyadicEntry] = &[
    DyadicEntry { name: "GeoDistance", f: dyadic::change_geo_distance, slots: 2 },
    DyadicEntry { name: "LogGeoDistance", f: dyadic::change_log_geo_distance, slots: 2 },
    DyadicEntry { name: "EuclideanDistance", f: dyadic::change_euclidean_distance, slots: 3 },
];

#[rustfmt::skip]
const INTERACTION: &[InteractionEntry] = &[
    InteractionEntry { name: "MatchingInteraction", f: attribute::change_matching_interaction, family: Family::Categorical, modes: ALL },
    InteractionEntry { name: "BinaryPairInteraction", f: attribute::change_binary_pair_interaction, family: Family::Binary, modes: B },
];

/// Names of the structural statistics available for `mode`.
pub fn structural_names(mode: GraphMode) -> impl Iterator<Item = &'static str> {
    STRUCTURAL
        .iter()
        .filter(move |e| e.modes.admits(mode))
        .map(|e| e.name)
}

/// Names of every registered statistic, grouped as `(kind, name)` pairs,
/// for the `-h` keyword dump.
pub fn all_names() -> impl Iterator<Item = (&'static str, &'static str)> {
    STRUCTURAL
        .iter()
        .map(|e| ("structParams", e.name))
        .chain(NODAL.iter().map(|e| ("attrParams", e.name)))
        .chain(DYADIC.iter().map(|e| ("dyadicParams", e.name)))
        .chain(INTERACTION.iter().map(|e| ("attrInteractionParams", e.name)))
}

fn resolve_family(
    attrs: &Attributes,
    family: Family,
    name: &str,
) -> Result<usize, RegistryError> {
    let slot = match family {
        Family::Binary => attrs.find_binary(name)?,
        Family::Categorical => attrs.find_categorical(name)?,
        Family::Continuous => attrs.find_continuous(name)?,
        Family::Set => attrs.find_set(name)?,
    };
    Ok(slot)
}

/// Binds every requested statistic against the graph and its attributes.
///
/// # Errors
/// Returns a [`RegistryError`] for unknown names, statistics applied to the
/// wrong graph mode, wrong attribute argument counts, or attribute names
/// that resolve to no loaded column.
pub fn build_model(
    g: &Graph,
    attrs: &Attributes,
    requests: &ModelRequests,
) -> Result<Model, RegistryError> {
    let mode = g.mode();
    let mut params = Vec::new();

    for req in &requests.structural {
        let matches: Vec<&StructuralEntry> = STRUCTURAL
            .iter()
            .filter(|e| e.name.eq_ignore_ascii_case(&req.name))
            .collect();
        if matches.is_empty() {
            return Err(RegistryError::UnknownStatistic {
                name: req.name.clone(),
            });
        }
        let entry = matches
            .iter()
            .find(|e| e.modes.admits(mode))
            .ok_or_else(|| RegistryError::WrongMode {
                name: req.name.clone(),
                mode: mode_name(mode),
            })?;
        let lambda = req.lambda.unwrap_or(DEFAULT_LAMBDA);
        let label = if entry.has_lambda {
            format!("{}({lambda})", entry.name)
        } else {
            entry.name.to_owned()
        };
        params.push(ModelParam {
            label,
            statistic: Statistic::Structural { f: entry.f, lambda },
            theta0: req.theta0,
            special: entry.special,
        });
    }

    for req in &requests.nodal {
        let matches: Vec<&NodalEntry> = NODAL
            .iter()
            .filter(|e| e.name.eq_ignore_ascii_case(&req.name))
            .collect();
        if matches.is_empty() {
            return Err(RegistryError::UnknownStatistic {
                name: req.name.clone(),
            });
        }
        let entry = matches
            .iter()
            .find(|e| e.modes.admits(mode))
            .ok_or_else(|| RegistryError::WrongMode {
                name: req.name.clone(),
                mode: mode_name(mode),
            })?;
        let attr = resolve_family(attrs, entry.family, &req.attr_name)?;
        let exponent = req.exponent.unwrap_or(DEFAULT_EXPONENT);
        let label = if entry.has_exponent {
            format!("{}({},{exponent})", entry.name, req.attr_name)
        } else {
            format!("{}({})", entry.name, req.attr_name)
        };
        params.push(ModelParam {
            label,
            statistic: Statistic::Nodal {
                f: entry.f,
                attr,
                exponent,
            },
            theta0: req.theta0,
            special: SpecialStat::None,
        });
    }

    for req in &requests.dyadic {
        let entry = DYADIC
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(&req.name))
            .ok_or_else(|| RegistryError::UnknownStatistic {
                name: req.name.clone(),
            })?;
        if req.slot_names.len() != entry.slots {
            return Err(RegistryError::SlotCount {
                name: req.name.clone(),
                expected: entry.slots,
                got: req.slot_names.len(),
            });
        }
        let slots = req
            .slot_names
            .iter()
            .map(|n| attrs.find_continuous(n))
            .collect::<Result<Vec<_>, _>>()?;
        params.push(ModelParam {
            label: format!("{}({})", entry.name, req.slot_names.join(",")),
            statistic: Statistic::Dyadic { f: entry.f, slots },
            theta0: req.theta0,
            special: SpecialStat::None,
        });
    }

    for req in &requests.interaction {
        let entry = INTERACTION
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(&req.name))
            .ok_or_else(|| RegistryError::UnknownStatistic {
                name: req.name.clone(),
            })?;
        if !entry.modes.admits(mode) {
            return Err(RegistryError::WrongMode {
                name: req.name.clone(),
                mode: mode_name(mode),
            });
        }
        let attr_a = resolve_family(attrs, entry.family, &req.attr_a)?;
        let attr_b = resolve_family(attrs, entry.family, &req.attr_b)?;
        params.push(ModelParam {
            label: format!("{}({},{})", entry.name, req.attr_a, req.attr_b),
            statistic: Statistic::Interaction {
                f: entry.f,
                attr_a,
                attr_b,
            },
            theta0: req.theta0,
            special: SpecialStat::None,
        });
    }

    Ok(Model::new(params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TwoPathCacheKind;

    fn directed_graph() -> Graph {
        Graph::directed(4, TwoPathCacheKind::Sparse, false)
    }

    fn structural(name: &str) -> ModelRequests {
        ModelRequests {
            structural: vec![StructuralRequest {
                name: name.to_owned(),
                lambda: None,
                theta0: 0.0,
            }],
            ..ModelRequests::default()
        }
    }

    #[test]
    fn binds_by_case_insensitive_name() {
        let g = directed_graph();
        let model = build_model(&g, &Attributes::empty(), &structural("altktrianglest"))
            .expect("statistic exists for directed graphs");
        assert_eq!(model.len(), 1);
        assert_eq!(model.params()[0].label, "AltKTrianglesT(2)");
    }

    #[test]
    fn rejects_unknown_names() {
        let g = directed_graph();
        let err = build_model(&g, &Attributes::empty(), &structural("Banana"))
            .expect_err("no such statistic");
        assert!(matches!(err, RegistryError::UnknownStatistic { .. }));
    }

    #[test]
    fn rejects_wrong_mode() {
        let g = Graph::undirected(4, TwoPathCacheKind::Sparse);
        let err = build_model(&g, &Attributes::empty(), &structural("Reciprocity"))
            .expect_err("reciprocity needs direction");
        assert!(matches!(err, RegistryError::WrongMode { .. }));
    }

    #[test]
    fn isolates_resolves_per_mode() {
        let d = directed_graph();
        let model = build_model(&d, &Attributes::empty(), &structural("Isolates"))
            .expect("directed isolates");
        assert_eq!(model.empty_graph_stats(&d), vec![4.0]);

        let u = Graph::undirected(6, TwoPathCacheKind::Sparse);
        let model = build_model(&u, &Attributes::empty(), &structural("Isolates"))
            .expect("undirected isolates");
        assert_eq!(model.empty_graph_stats(&u), vec![6.0]);
    }

    #[test]
    fn structural_names_filter_by_mode() {
        let directed: Vec<&str> = structural_names(GraphMode::Directed { allow_loops: false })
            .collect();
        assert!(directed.contains(&"Reciprocity"));
        assert!(!directed.contains(&"AltKCyclesA"));

        let bipartite: Vec<&str> = structural_names(GraphMode::Bipartite { mode_a: 3 }).collect();
        assert!(bipartite.contains(&"AltKCyclesA"));
        assert!(bipartite.contains(&"FourCycles"));
        assert!(!bipartite.contains(&"Reciprocity"));
    }

    #[test]
    fn dyadic_requests_check_slot_counts() {
        let g = directed_graph();
        let requests = ModelRequests {
            dyadic: vec![DyadicRequest {
                name: "GeoDistance".to_owned(),
                slot_names: vec!["lat".to_owned()],
                theta0: 0.0,
            }],
            ..ModelRequests::default()
        };
        let err = build_model(&g, &Attributes::empty(), &requests)
            .expect_err("geo distance needs two slots");
        assert!(matches!(
            err,
            RegistryError::SlotCount { expected: 2, got: 1, .. }
        ));
    }
}
