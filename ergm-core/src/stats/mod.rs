//! The change-statistic library.
//!
//! Every statistic is a pure kernel reporting how its count moves when the
//! currently-absent tie `(i, j)` is added. Deletion reuses the same kernels:
//! the caller removes the tie first, evaluates the kernels on the reduced
//! graph, and flips the sign of the inner product. Kernels are grouped by
//! family and bound to their hyper-parameters (decay `lambda`, homophily
//! exponent, attribute slots) when a [`Model`] is built from the parameter
//! registry.
//!
//! With the tie toggled being a self-loop, every kernel except `Loop`,
//! `LoopInteraction`, and `Arc` reports zero.

pub(crate) mod attribute;
pub(crate) mod bipartite;
pub(crate) mod dyadic;
pub(crate) mod structural;
pub(crate) mod undirected;

use crate::attributes::Attributes;
use crate::graph::{Graph, NodeId};

/// Kernel signature for structural statistics: `(graph, i, j, lambda)`.
///
/// Statistics without a decay parameter ignore `lambda`.
pub type StructuralFn = fn(&Graph, NodeId, NodeId, f64) -> f64;

/// Kernel signature for nodal attribute statistics:
/// `(graph, attributes, slot, i, j, exponent, is_delete)`.
///
/// `slot` indexes the column of the family the kernel reads (binary,
/// categorical, continuous, or set). Statistics without an exponent ignore
/// it; `is_delete` reports the direction of the toggle for the few kernels
/// whose bookkeeping depends on it.
pub type NodalFn = fn(&Graph, &Attributes, usize, NodeId, NodeId, f64, bool) -> f64;

/// Kernel signature for dyadic covariate statistics:
/// `(graph, attributes, continuous slots, i, j)`.
pub type DyadicFn = fn(&Graph, &Attributes, &[usize], NodeId, NodeId) -> f64;

/// Kernel signature for attribute interaction statistics:
/// `(graph, attributes, slot_a, slot_b, i, j)`.
pub type InteractionFn = fn(&Graph, &Attributes, usize, usize, NodeId, NodeId) -> f64;

/// A statistic bound to its hyper-parameters and attribute slots.
#[derive(Clone, Debug)]
pub enum Statistic {
    /// Purely structural; `lambda` is the geometric decay where applicable.
    Structural {
        /// The change kernel.
        f: StructuralFn,
        /// Decay hyper-parameter, conventionally greater than one.
        lambda: f64,
    },
    /// Reads one nodal attribute column.
    Nodal {
        /// The change kernel.
        f: NodalFn,
        /// Resolved column slot within the kernel's attribute family.
        attr: usize,
        /// Homophily exponent for the kernels that bear one.
        exponent: f64,
    },
    /// Reads continuous coordinate columns of both endpoints.
    Dyadic {
        /// The change kernel.
        f: DyadicFn,
        /// Resolved continuous column slots, in kernel order.
        slots: Vec<usize>,
    },
    /// Reads one attribute column per interaction operand.
    Interaction {
        /// The change kernel.
        f: InteractionFn,
        /// First resolved slot.
        attr_a: usize,
        /// Second resolved slot.
        attr_b: usize,
    },
}

impl Statistic {
    /// Evaluates the change produced by adding the absent tie `(i, j)`.
    #[must_use]
    pub fn evaluate(
        &self,
        g: &Graph,
        attrs: &Attributes,
        i: NodeId,
        j: NodeId,
        is_delete: bool,
    ) -> f64 {
        match self {
            Self::Structural { f, lambda } => f(g, i, j, *lambda),
            Self::Nodal { f, attr, exponent } => f(g, attrs, *attr, i, j, *exponent, is_delete),
            Self::Dyadic { f, slots } => f(g, attrs, slots, i, j),
            Self::Interaction { f, attr_a, attr_b } => f(g, attrs, *attr_a, *attr_b, i, j),
        }
    }
}

/// Statistics the drivers must be able to recognise structurally.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SpecialStat {
    /// Nothing special.
    #[default]
    None,
    /// The `Arc`/`Edge` density statistic; pinned by the IFD sampler.
    Density,
    /// One-mode isolate count; nonzero on the empty graph.
    Isolates,
    /// Bipartite mode-A isolate count.
    IsolatesA,
    /// Bipartite mode-B isolate count.
    IsolatesB,
}

/// One model parameter: a bound statistic, its display label, and the
/// initial value of its coefficient.
#[derive(Clone, Debug)]
pub struct ModelParam {
    /// Label used in output-file headers, e.g. `AltKTrianglesT(2.0)`.
    pub label: String,
    /// The bound statistic.
    pub statistic: Statistic,
    /// Initial coefficient value.
    pub theta0: f64,
    /// Structural identity for the drivers.
    pub special: SpecialStat,
}

/// The bound model: the ordered parameter vector of one run.
///
/// Parameters keep the registry's fixed family order: structural, then
/// nodal, then dyadic covariate, then attribute interaction.
#[derive(Clone, Debug, Default)]
pub struct Model {
    params: Vec<ModelParam>,
}

impl Model {
    /// Builds a model from bound parameters.
    #[must_use]
    pub fn new(params: Vec<ModelParam>) -> Self {
        Self { params }
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the model has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The bound parameters in evaluation order.
    #[must_use]
    pub fn params(&self) -> &[ModelParam] {
        &self.params
    }

    /// Output-file header labels in evaluation order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.label.as_str())
    }

    /// Initial coefficient vector.
    #[must_use]
    pub fn theta0(&self) -> Vec<f64> {
        self.params.iter().map(|p| p.theta0).collect()
    }

    /// Position of the density (`Arc`/`Edge`) parameter, when present.
    #[must_use]
    pub fn density_index(&self) -> Option<usize> {
        self.params
            .iter()
            .position(|p| p.special == SpecialStat::Density)
    }

    /// Sufficient statistics of the empty graph on `g`'s node set: zero for
    /// everything except the isolate counts.
    #[must_use]
    pub fn empty_graph_stats(&self, g: &Graph) -> Vec<f64> {
        self.params
            .iter()
            .map(|p| match p.special {
                SpecialStat::Isolates => to_f64(g.node_count()),
                SpecialStat::IsolatesA => to_f64(g.mode_a_count()),
                SpecialStat::IsolatesB => to_f64(g.mode_b_count()),
                SpecialStat::None | SpecialStat::Density => 0.0,
            })
            .collect()
    }
}

/// Evaluates every registered statistic for toggling the tie `(i, j)` and
/// returns the log-ratio of unnormalised probabilities for the move.
///
/// The tie must currently be absent from `g`: for a deletion the caller
/// removes it first and passes `is_delete = true`, which flips the sign of
/// the inner product while `changestats` keeps the add-direction deltas.
///
/// # Examples
/// ```
/// use ergm_core::{
///     Attributes, Graph, ModelRequests, StructuralRequest, TwoPathCacheKind, build_model,
///     calc_change_stats,
/// };
///
/// let mut g = Graph::directed(3, TwoPathCacheKind::Dense, false);
/// g.insert_updating_list(0, 1);
/// let requests = ModelRequests {
///     structural: vec![StructuralRequest {
///         name: "Arc".to_owned(),
///         lambda: None,
///         theta0: -1.5,
///     }],
///     ..ModelRequests::default()
/// };
/// let model = build_model(&g, &Attributes::empty(), &requests)?;
/// let mut deltas = vec![0.0; model.len()];
/// let total = calc_change_stats(
///     &g, &Attributes::empty(), &model, &[-1.5], 1, 2, false, &mut deltas,
/// );
/// assert_eq!(deltas, vec![1.0]);
/// assert!((total + 1.5).abs() < 1e-12);
/// # Ok::<(), ergm_core::RegistryError>(())
/// ```
pub fn calc_change_stats(
    g: &Graph,
    attrs: &Attributes,
    model: &Model,
    theta: &[f64],
    i: NodeId,
    j: NodeId,
    is_delete: bool,
    changestats: &mut [f64],
) -> f64 {
    debug_assert!(!g.is_tie(i, j), "change statistics need the tie absent");
    debug_assert_eq!(changestats.len(), model.len());
    let sign = if is_delete { -1.0 } else { 1.0 };
    let mut total = 0.0;
    for (k, param) in model.params().iter().enumerate() {
        let delta = param.statistic.evaluate(g, attrs, i, j, is_delete);
        changestats[k] = delta;
        total += theta[k] * sign * delta;
    }
    total
}

/// `x^y` with the convention `0^0 = 0` used by the homophily statistics.
#[must_use]
pub fn pow0(x: f64, y: f64) -> f64 {
    if x == 0.0 && y == 0.0 { 0.0 } else { x.powf(y) }
}

/// `1.0` when the predicate holds, `0.0` otherwise.
pub(crate) fn indicator(condition: bool) -> f64 {
    if condition { 1.0 } else { 0.0 }
}

/// `(1 - 1/lambda)^count`, the geometric decay weight of the alternating
/// statistics.
pub(crate) fn decay_pow(lambda: f64, count: u32) -> f64 {
    (1.0 - 1.0 / lambda).powi(i32::try_from(count).unwrap_or(i32::MAX))
}

/// `lambda * (1 - (1 - 1/lambda)^degree)`, the alternating-star form.
pub(crate) fn alt_form(lambda: f64, degree: usize) -> f64 {
    lambda * (1.0 - (1.0 - 1.0 / lambda).powi(i32::try_from(degree).unwrap_or(i32::MAX)))
}

/// Lossless for every count this crate produces; node and tie counts stay
/// far below 2^53.
pub(crate) fn to_f64(value: usize) -> f64 {
    value as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pow0_guards_zero_to_the_zero() {
        assert_eq!(pow0(0.0, 0.0), 0.0);
        assert_eq!(pow0(0.0, 2.0), 0.0);
        assert!((pow0(3.0, 0.0) - 1.0).abs() < 1e-12);
        assert!((pow0(2.0, 3.0) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn alt_form_matches_closed_form() {
        // lambda = 2: 2 * (1 - 0.5^d)
        assert!((alt_form(2.0, 0) - 0.0).abs() < 1e-12);
        assert!((alt_form(2.0, 1) - 1.0).abs() < 1e-12);
        assert!((alt_form(2.0, 2) - 1.5).abs() < 1e-12);
    }
}
