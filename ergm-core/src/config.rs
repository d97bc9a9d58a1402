//! Configuration-file parsing.
//!
//! The format is line-oriented `keyword = value` text: `#` starts a
//! comment, blank lines are skipped, keywords match case-insensitively,
//! and the four model-parameter keywords take brace-delimited sets that
//! may span lines. Set entries name a statistic, optionally with
//! parenthesised arguments (a decay override, attribute columns, an
//! exponent) and an initial coefficient after `=`.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::estimator::EstimationSettings;
use crate::registry::{
    self, DyadicRequest, InteractionRequest, ModelRequests, NodalRequest, StructuralRequest,
};
use crate::sampler::{Conditionality, SamplerKind, SamplerOptions};
use crate::simulator::SimulationSettings;

/// Errors raised while reading or validating a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read configuration `{path}`: {source}")]
    Io {
        /// The requested path.
        path: PathBuf,
        /// Underlying operating-system error.
        #[source]
        source: std::io::Error,
    },
    /// A keyword is not recognised.
    #[error("line {line}: unknown keyword `{keyword}`")]
    UnknownKeyword {
        /// 1-based line number.
        line: usize,
        /// The offending keyword.
        keyword: String,
    },
    /// A line is not of `keyword = value` shape.
    #[error("line {line}: expected `keyword = value`")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
    },
    /// A value does not parse for its keyword.
    #[error("line {line}: bad value `{value}` for `{keyword}`")]
    BadValue {
        /// 1-based line number.
        line: usize,
        /// The keyword being set.
        keyword: String,
        /// The raw value text.
        value: String,
    },
    /// A brace-delimited set never closed.
    #[error("unterminated `{{` set for `{keyword}`")]
    UnterminatedSet {
        /// The keyword whose set was left open.
        keyword: String,
    },
    /// A set entry does not parse.
    #[error("bad parameter entry `{entry}` in `{keyword}`")]
    BadEntry {
        /// The keyword whose set holds the entry.
        keyword: String,
        /// The raw entry text.
        entry: String,
    },
    /// A required keyword is missing.
    #[error("required keyword `{keyword}` is missing")]
    MissingRequired {
        /// The missing keyword.
        keyword: &'static str,
    },
    /// Two options that cannot be combined.
    #[error("`{first}` cannot be combined with `{second}`")]
    Incompatible {
        /// One option.
        first: &'static str,
        /// The other.
        second: &'static str,
    },
}

/// Parsed configuration for either binary.
///
/// # Examples
/// ```
/// use ergm_core::Config;
///
/// let config = Config::from_text(
///     "samplerSteps = 500\nstructParams = {Arc = -2.0, AltInStars(3.0)}\n",
/// )?;
/// assert_eq!(config.estimation.sampler_steps, 500);
/// assert_eq!(config.requests.structural[1].lambda, Some(3.0));
/// # Ok::<(), ergm_core::ConfigError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    /// Pajek graph file (estimation input).
    pub arclist_file: Option<PathBuf>,
    /// Binary attribute file.
    pub binattr_file: Option<PathBuf>,
    /// Categorical attribute file.
    pub catattr_file: Option<PathBuf>,
    /// Continuous attribute file.
    pub contattr_file: Option<PathBuf>,
    /// Set-of-category attribute file.
    pub setattr_file: Option<PathBuf>,
    /// Snowball zone file.
    pub zone_file: Option<PathBuf>,
    /// Citation term file.
    pub term_file: Option<PathBuf>,
    /// Prefix of the estimated-coefficient output files.
    pub theta_file_prefix: String,
    /// Prefix of the dzA output files.
    pub dza_file_prefix: String,
    /// Prefix of simulated-network Pajek files.
    pub sim_net_file_prefix: String,
    /// Statistics output file (simulation).
    pub stats_file: Option<PathBuf>,
    /// Prefix of the observed-statistics output file.
    pub obs_stats_file_prefix: String,
    /// Base added to the task id in output-file suffixes.
    pub output_file_suffix_base: u64,
    /// Estimation tunables.
    pub estimation: EstimationSettings,
    /// Simulation tunables.
    pub simulation: SimulationSettings,
    /// Use the IFD sampler.
    pub use_ifd_sampler: bool,
    /// Use the TNT sampler.
    pub use_tnt_sampler: bool,
    /// IFD auxiliary-parameter step constant.
    pub ifd_k: f64,
    /// Snowball-conditional estimation.
    pub use_conditional_estimation: bool,
    /// Reject proposals that would close a mutual dyad.
    pub forbid_reciprocity: bool,
    /// Citation-ERGM estimation.
    pub citation_ergm: bool,
    /// Write the observed statistics file.
    pub compute_stats: bool,
    /// Write the final in-chain network after estimation.
    pub output_simulated_network: bool,
    /// Node count (simulation without a graph file).
    pub num_nodes: usize,
    /// Whether a simulated graph is directed.
    pub is_directed: bool,
    /// Permit self-loops.
    pub allow_loops: bool,
    /// The requested model parameters.
    pub requests: ModelRequests,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arclist_file: None,
            binattr_file: None,
            catattr_file: None,
            contattr_file: None,
            setattr_file: None,
            zone_file: None,
            term_file: None,
            theta_file_prefix: "theta".to_owned(),
            dza_file_prefix: "dzA".to_owned(),
            sim_net_file_prefix: "sim".to_owned(),
            stats_file: None,
            obs_stats_file_prefix: "obs_stats".to_owned(),
            output_file_suffix_base: 0,
            estimation: EstimationSettings::default(),
            simulation: SimulationSettings::default(),
            use_ifd_sampler: false,
            use_tnt_sampler: false,
            ifd_k: 0.1,
            use_conditional_estimation: false,
            forbid_reciprocity: false,
            citation_ergm: false,
            compute_stats: false,
            output_simulated_network: false,
            num_nodes: 0,
            is_directed: true,
            allow_loops: false,
            requests: ModelRequests::default(),
        }
    }
}

/// Scalar keywords recognised in configuration files.
pub const KEYWORDS: &[&str] = &[
    "ACA_S",
    "ACA_EE",
    "compC",
    "samplerSteps",
    "Ssteps",
    "EEsteps",
    "EEinnerSteps",
    "outputAllSteps",
    "useIFDsampler",
    "useTNTsampler",
    "ifd_K",
    "outputSimulatedNetwork",
    "arclistFile",
    "binattrFile",
    "catattrFile",
    "contattrFile",
    "setattrFile",
    "thetaFilePrefix",
    "dzAFilePrefix",
    "simNetFilePrefix",
    "zoneFile",
    "useConditionalEstimation",
    "forbidReciprocity",
    "useBorisenkoUpdate",
    "learningRate",
    "minTheta",
    "computeStats",
    "obsStatsFilePrefix",
    "outputFileSuffixBase",
    "termFile",
    "citationERGM",
    "numNodes",
    "sampleSize",
    "interval",
    "burnin",
    "statsFile",
    "numArcs",
    "allowLoops",
    "isDirected",
    "structParams",
    "attrParams",
    "dyadicParams",
    "attrInteractionParams",
];

/// Renders the recognised keywords and statistic names for the `-h` dump.
#[must_use]
pub fn describe_keywords() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Recognised configuration keywords:");
    for keyword in KEYWORDS {
        let _ = writeln!(out, "  {keyword}");
    }
    let _ = writeln!(out, "Recognised statistics:");
    for (kind, name) in registry::all_names() {
        let _ = writeln!(out, "  {kind}: {name}");
    }
    out
}

impl Config {
    /// Reads and validates a configuration file.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for unreadable files, unknown keywords, bad
    /// values, malformed sets, or incompatible option combinations.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_str_impl(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration text without touching the filesystem.
    ///
    /// # Errors
    /// As [`Config::from_file`], minus the I/O failure case.
    pub fn from_text(text: &str) -> Result<Self, ConfigError> {
        let config = Self::from_str_impl(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Sampler options implied by the configuration.
    #[must_use]
    pub fn sampler_options(&self) -> SamplerOptions {
        let kind = if self.use_ifd_sampler {
            SamplerKind::Ifd
        } else if self.use_tnt_sampler {
            SamplerKind::Tnt
        } else {
            SamplerKind::Basic
        };
        let conditional = if self.use_conditional_estimation {
            Conditionality::Snowball
        } else if self.citation_ergm {
            Conditionality::Citation
        } else {
            Conditionality::Unrestricted
        };
        SamplerOptions {
            kind,
            conditional,
            forbid_reciprocity: self.forbid_reciprocity,
            ifd_k: self.ifd_k,
        }
    }

    fn from_str_impl(text: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let mut lines = text.lines().enumerate().peekable();
        while let Some((idx, raw)) = lines.next() {
            let line_no = idx + 1;
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }
            let Some((keyword, value)) = line.split_once('=') else {
                return Err(ConfigError::MalformedLine { line: line_no });
            };
            let keyword = keyword.trim();
            let mut value = value.trim().to_owned();
            if value.starts_with('{') && !balanced(&value) {
                // The set continues on subsequent lines.
                loop {
                    let Some((_, next_raw)) = lines.next() else {
                        return Err(ConfigError::UnterminatedSet {
                            keyword: keyword.to_owned(),
                        });
                    };
                    value.push(' ');
                    value.push_str(strip_comment(next_raw).trim());
                    if balanced(&value) {
                        break;
                    }
                }
            }
            config.apply(keyword, &value, line_no)?;
        }
        Ok(config)
    }

    fn apply(&mut self, keyword: &str, value: &str, line: usize) -> Result<(), ConfigError> {
        let bad = |kw: &str, v: &str| ConfigError::BadValue {
            line,
            keyword: kw.to_owned(),
            value: v.to_owned(),
        };
        let lower = keyword.to_ascii_lowercase();
        match lower.as_str() {
            "aca_s" => self.estimation.aca_s = parse_f64(value).ok_or_else(|| bad(keyword, value))?,
            "aca_ee" => {
                self.estimation.aca_ee = parse_f64(value).ok_or_else(|| bad(keyword, value))?;
            }
            "compc" => {
                self.estimation.comp_c = parse_f64(value).ok_or_else(|| bad(keyword, value))?;
            }
            "samplersteps" => {
                self.estimation.sampler_steps =
                    parse_u64(value).ok_or_else(|| bad(keyword, value))?;
            }
            "ssteps" => {
                self.estimation.s_steps = parse_u64(value).ok_or_else(|| bad(keyword, value))?;
            }
            "eesteps" => {
                self.estimation.ee_steps = parse_u64(value).ok_or_else(|| bad(keyword, value))?;
            }
            "eeinnersteps" => {
                self.estimation.ee_inner_steps =
                    parse_u64(value).ok_or_else(|| bad(keyword, value))?;
            }
            "outputallsteps" => {
                self.estimation.output_all_steps =
                    parse_bool(value).ok_or_else(|| bad(keyword, value))?;
            }
            "useifdsampler" => {
                self.use_ifd_sampler = parse_bool(value).ok_or_else(|| bad(keyword, value))?;
            }
            "usetntsampler" => {
                self.use_tnt_sampler = parse_bool(value).ok_or_else(|| bad(keyword, value))?;
            }
            "ifd_k" => self.ifd_k = parse_f64(value).ok_or_else(|| bad(keyword, value))?,
            "outputsimulatednetwork" => {
                self.output_simulated_network =
                    parse_bool(value).ok_or_else(|| bad(keyword, value))?;
            }
            "arclistfile" => self.arclist_file = Some(parse_path(value)),
            "binattrfile" => self.binattr_file = Some(parse_path(value)),
            "catattrfile" => self.catattr_file = Some(parse_path(value)),
            "contattrfile" => self.contattr_file = Some(parse_path(value)),
            "setattrfile" => self.setattr_file = Some(parse_path(value)),
            "thetafileprefix" => self.theta_file_prefix = unquote(value).to_owned(),
            "dzafileprefix" => self.dza_file_prefix = unquote(value).to_owned(),
            "simnetfileprefix" => self.sim_net_file_prefix = unquote(value).to_owned(),
            "zonefile" => self.zone_file = Some(parse_path(value)),
            "useconditionalestimation" => {
                self.use_conditional_estimation =
                    parse_bool(value).ok_or_else(|| bad(keyword, value))?;
            }
            "forbidreciprocity" => {
                self.forbid_reciprocity = parse_bool(value).ok_or_else(|| bad(keyword, value))?;
            }
            "useborisenkoupdate" => {
                self.estimation.use_borisenko =
                    parse_bool(value).ok_or_else(|| bad(keyword, value))?;
            }
            "learningrate" => {
                self.estimation.learning_rate =
                    parse_f64(value).ok_or_else(|| bad(keyword, value))?;
            }
            "mintheta" => {
                self.estimation.min_theta = parse_f64(value).ok_or_else(|| bad(keyword, value))?;
            }
            "computestats" => {
                self.compute_stats = parse_bool(value).ok_or_else(|| bad(keyword, value))?;
            }
            "obsstatsfileprefix" => self.obs_stats_file_prefix = unquote(value).to_owned(),
            "outputfilesuffixbase" => {
                self.output_file_suffix_base =
                    parse_u64(value).ok_or_else(|| bad(keyword, value))?;
            }
            "termfile" => self.term_file = Some(parse_path(value)),
            "citationergm" => {
                self.citation_ergm = parse_bool(value).ok_or_else(|| bad(keyword, value))?;
            }
            "numnodes" => {
                self.num_nodes =
                    parse_u64(value).ok_or_else(|| bad(keyword, value))? as usize;
            }
            "samplesize" => {
                self.simulation.sample_size = parse_u64(value).ok_or_else(|| bad(keyword, value))?;
            }
            "interval" => {
                self.simulation.interval = parse_u64(value).ok_or_else(|| bad(keyword, value))?;
            }
            "burnin" => {
                self.simulation.burnin = parse_u64(value).ok_or_else(|| bad(keyword, value))?;
            }
            "statsfile" => self.stats_file = Some(parse_path(value)),
            "numarcs" => {
                self.simulation.num_arcs =
                    parse_u64(value).ok_or_else(|| bad(keyword, value))? as usize;
            }
            "allowloops" => {
                self.allow_loops = parse_bool(value).ok_or_else(|| bad(keyword, value))?;
            }
            "isdirected" => {
                self.is_directed = parse_bool(value).ok_or_else(|| bad(keyword, value))?;
            }
            "structparams" => {
                self.requests.structural = parse_set(keyword, value)?
                    .into_iter()
                    .map(|e| e.into_structural(keyword))
                    .collect::<Result<_, _>>()?;
            }
            "attrparams" => {
                self.requests.nodal = parse_set(keyword, value)?
                    .into_iter()
                    .map(|e| e.into_nodal(keyword))
                    .collect::<Result<_, _>>()?;
            }
            "dyadicparams" => {
                self.requests.dyadic = parse_set(keyword, value)?
                    .into_iter()
                    .map(|e| e.into_dyadic(keyword))
                    .collect::<Result<_, _>>()?;
            }
            "attrinteractionparams" => {
                self.requests.interaction = parse_set(keyword, value)?
                    .into_iter()
                    .map(|e| e.into_interaction(keyword))
                    .collect::<Result<_, _>>()?;
            }
            _ => {
                return Err(ConfigError::UnknownKeyword {
                    line,
                    keyword: keyword.to_owned(),
                });
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.use_ifd_sampler && self.use_tnt_sampler {
            return Err(ConfigError::Incompatible {
                first: "useIFDsampler",
                second: "useTNTsampler",
            });
        }
        if self.use_conditional_estimation && self.citation_ergm {
            return Err(ConfigError::Incompatible {
                first: "useConditionalEstimation",
                second: "citationERGM",
            });
        }
        if self.allow_loops && (self.use_conditional_estimation || self.citation_ergm) {
            return Err(ConfigError::Incompatible {
                first: "allowLoops",
                second: "conditional estimation",
            });
        }
        if self.use_conditional_estimation && self.zone_file.is_none() {
            return Err(ConfigError::MissingRequired { keyword: "zoneFile" });
        }
        if self.citation_ergm && self.term_file.is_none() {
            return Err(ConfigError::MissingRequired { keyword: "termFile" });
        }
        Ok(())
    }
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(before, _)| before)
}

fn balanced(text: &str) -> bool {
    let mut depth = 0i64;
    for c in text.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
    }
    depth <= 0
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_f64(value: &str) -> Option<f64> {
    value.parse().ok()
}

fn parse_u64(value: &str) -> Option<u64> {
    value.parse().ok()
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_path(value: &str) -> PathBuf {
    PathBuf::from(unquote(value))
}

/// One entry of a brace-delimited parameter set, before bucket-specific
/// interpretation.
struct SetEntry {
    name: String,
    args: Vec<String>,
    theta0: f64,
}

impl SetEntry {
    fn bad(self, keyword: &str) -> ConfigError {
        ConfigError::BadEntry {
            keyword: keyword.to_owned(),
            entry: self.name,
        }
    }

    fn into_structural(self, keyword: &str) -> Result<StructuralRequest, ConfigError> {
        let lambda = match self.args.len() {
            0 => None,
            1 => Some(
                self.args[0]
                    .parse()
                    .map_err(|_| self.clone_bad(keyword))?,
            ),
            _ => return Err(self.bad(keyword)),
        };
        Ok(StructuralRequest {
            name: self.name,
            lambda,
            theta0: self.theta0,
        })
    }

    fn into_nodal(self, keyword: &str) -> Result<NodalRequest, ConfigError> {
        match self.args.len() {
            1 => Ok(NodalRequest {
                attr_name: self.args[0].clone(),
                exponent: None,
                name: self.name,
                theta0: self.theta0,
            }),
            2 => {
                let exponent = self.args[1].parse().map_err(|_| self.clone_bad(keyword))?;
                Ok(NodalRequest {
                    attr_name: self.args[0].clone(),
                    exponent: Some(exponent),
                    name: self.name,
                    theta0: self.theta0,
                })
            }
            _ => Err(self.bad(keyword)),
        }
    }

    fn into_dyadic(self, keyword: &str) -> Result<DyadicRequest, ConfigError> {
        if self.args.is_empty() {
            return Err(self.bad(keyword));
        }
        Ok(DyadicRequest {
            slot_names: self.args.clone(),
            name: self.name,
            theta0: self.theta0,
        })
    }

    fn into_interaction(self, keyword: &str) -> Result<InteractionRequest, ConfigError> {
        if self.args.len() != 2 {
            return Err(self.bad(keyword));
        }
        Ok(InteractionRequest {
            attr_a: self.args[0].clone(),
            attr_b: self.args[1].clone(),
            name: self.name,
            theta0: self.theta0,
        })
    }

    fn clone_bad(&self, keyword: &str) -> ConfigError {
        ConfigError::BadEntry {
            keyword: keyword.to_owned(),
            entry: self.name.clone(),
        }
    }
}

fn parse_set(keyword: &str, value: &str) -> Result<Vec<SetEntry>, ConfigError> {
    let bad_entry = |entry: &str| ConfigError::BadEntry {
        keyword: keyword.to_owned(),
        entry: entry.to_owned(),
    };
    let inner = value
        .trim()
        .strip_prefix('{')
        .and_then(|v| v.strip_suffix('}'))
        .ok_or_else(|| bad_entry(value))?;
    let mut entries = Vec::new();
    for piece in split_top_level(inner) {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let (head, theta0) = match piece.split_once('=') {
            Some((head, theta)) => {
                let theta0: f64 = theta.trim().parse().map_err(|_| bad_entry(piece))?;
                (head.trim(), theta0)
            }
            None => (piece, 0.0),
        };
        let (name, args) = match head.split_once('(') {
            Some((name, rest)) => {
                let inside = rest.strip_suffix(')').ok_or_else(|| bad_entry(piece))?;
                let args = inside
                    .split(',')
                    .map(|a| a.trim().to_owned())
                    .filter(|a| !a.is_empty())
                    .collect();
                (name.trim(), args)
            }
            None => (head, Vec::new()),
        };
        if name.is_empty() {
            return Err(bad_entry(piece));
        }
        entries.push(SetEntry {
            name: name.to_owned(),
            args,
            theta0,
        });
    }
    Ok(entries)
}

/// Splits on commas that sit outside parentheses.
fn split_top_level(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut depth = 0u32;
    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                pieces.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    pieces.push(current);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_documented_example() {
        let text = "\
# estimation settings
ACA_S = 0.1
EEsteps = 50   # inline comment
useIFDsampler = True
arclistFile = network.net
structParams = {Arc = -4.0, Reciprocity = 2.1, AltKTrianglesT(2.5) = 0.8}
attrParams = {Sender(gender), Matching(class) = 0.2}
dyadicParams = {GeoDistance(lat, long)}
attrInteractionParams = {MatchingInteraction(class, school)}
";
        let config = Config::from_text(text).expect("example parses");
        assert!(config.use_ifd_sampler);
        assert_eq!(config.estimation.ee_steps, 50);
        assert_eq!(config.requests.structural.len(), 3);
        assert_eq!(config.requests.structural[0].name, "Arc");
        assert!((config.requests.structural[0].theta0 + 4.0).abs() < 1e-12);
        assert_eq!(config.requests.structural[2].lambda, Some(2.5));
        assert_eq!(config.requests.nodal[0].attr_name, "gender");
        assert!((config.requests.nodal[1].theta0 - 0.2).abs() < 1e-12);
        assert_eq!(config.requests.dyadic[0].slot_names, vec!["lat", "long"]);
        assert_eq!(config.requests.interaction[0].attr_b, "school");
    }

    #[test]
    fn sets_may_span_lines() {
        let text = "\
structParams = {Arc = -2.0,
    AltInStars(3.0) = 0.1,
    AltOutStars = 0.2}
";
        let config = Config::from_text(text).expect("multi-line set parses");
        assert_eq!(config.requests.structural.len(), 3);
        assert_eq!(config.requests.structural[1].lambda, Some(3.0));
        assert_eq!(config.requests.structural[2].lambda, None);
    }

    #[test]
    fn keywords_match_case_insensitively() {
        let config = Config::from_text("aca_s = 0.5\nSAMPLERSTEPS = 123\n")
            .expect("case-insensitive keywords parse");
        assert!((config.estimation.aca_s - 0.5).abs() < 1e-12);
        assert_eq!(config.estimation.sampler_steps, 123);
    }

    #[test]
    fn unknown_keywords_are_rejected_with_line_numbers() {
        let err = Config::from_text("ACA_S = 0.1\nbogusKeyword = 3\n")
            .expect_err("unknown keyword rejected");
        assert!(matches!(
            err,
            ConfigError::UnknownKeyword { line: 2, .. }
        ));
    }

    #[test]
    fn incompatible_samplers_are_rejected() {
        let err = Config::from_text("useIFDsampler = True\nuseTNTsampler = True\n")
            .expect_err("two samplers cannot be combined");
        assert!(matches!(err, ConfigError::Incompatible { .. }));
    }

    #[test]
    fn conditional_estimation_requires_a_zone_file() {
        let err = Config::from_text("useConditionalEstimation = True\n")
            .expect_err("zone file required");
        assert!(matches!(
            err,
            ConfigError::MissingRequired { keyword: "zoneFile" }
        ));
    }

    #[test]
    fn exponent_bearing_attr_entries_carry_their_exponent() {
        let text = "attrParams = {NodematchAlphaA(field, 0.75) = 0.3}\n";
        let config = Config::from_text(text).expect("exponent entry parses");
        assert_eq!(config.requests.nodal[0].exponent, Some(0.75));
        assert_eq!(config.requests.nodal[0].attr_name, "field");
    }
}
