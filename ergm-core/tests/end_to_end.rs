#![expect(clippy::expect_used, reason = "tests require contextual panics")]
//! End-to-end driver runs over real files.

use std::fs;

use ergm_test_support::{
    BIPARTITE_FOUR_CYCLE_NET, EMPTY_FIVE_NET, FixtureDir, TRIANGLE_NET, WEALTH_WITH_NA,
};

use ergm_core::{Config, ErgmError, read_pajek, run_estimation_task, run_simulation};

fn estimation_config(dir: &FixtureDir, net_path: &str) -> Config {
    let text = format!(
        "\
arclistFile = {net_path}
samplerSteps = 50
Ssteps = 2
EEsteps = 2
EEinnerSteps = 3
computeStats = True
outputSimulatedNetwork = True
thetaFilePrefix = {theta}
dzAFilePrefix = {dza}
obsStatsFilePrefix = {obs}
simNetFilePrefix = {sim}
structParams = {{Arc = -1.0, Reciprocity}}
",
        theta = dir.join_str("theta"),
        dza = dir.join_str("dzA"),
        obs = dir.join_str("obs"),
        sim = dir.join_str("simnet"),
    );
    Config::from_text(&text).expect("configuration parses")
}

#[test]
fn estimation_task_writes_all_output_files() {
    let dir = FixtureDir::new();
    let net = dir.write("observed.net", TRIANGLE_NET);
    let config = estimation_config(&dir, net.to_str().expect("UTF-8 path"));
    run_estimation_task(&config, 0).expect("estimation succeeds");

    let theta = fs::read_to_string(dir.path().join("theta_0.txt")).expect("theta file");
    let mut lines = theta.lines();
    assert_eq!(lines.next(), Some("t Arc Reciprocity AcceptanceRate"));
    // 2 S rows + 2 EE outer rows
    assert_eq!(lines.clone().count(), 4);
    for line in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(fields.len(), 4);
        for field in fields {
            field.parse::<f64>().expect("numeric field");
        }
    }

    let dza = fs::read_to_string(dir.path().join("dzA_0.txt")).expect("dzA file");
    assert!(dza.starts_with("t Arc Reciprocity AcceptanceRate"));

    let obs = fs::read_to_string(dir.path().join("obs_0.txt")).expect("observed stats file");
    let mut obs_lines = obs.lines();
    assert_eq!(obs_lines.next(), Some("Arc Reciprocity"));
    assert_eq!(obs_lines.next(), Some("2 0"));

    let simulated = dir.path().join("simnet_0.net");
    let net_text = fs::read_to_string(simulated).expect("final network file");
    assert!(net_text.starts_with("*vertices 3"));
}

#[test]
fn suffix_base_offsets_the_task_id() {
    let dir = FixtureDir::new();
    let net = dir.write("observed.net", TRIANGLE_NET);
    let mut config = estimation_config(&dir, net.to_str().expect("UTF-8 path"));
    config.output_file_suffix_base = 10;
    run_estimation_task(&config, 2).expect("estimation succeeds");
    assert!(dir.path().join("theta_12.txt").exists());
    assert!(dir.path().join("dzA_12.txt").exists());
}

#[test]
fn simulation_emits_statistics_rows() {
    let dir = FixtureDir::new();
    let text = format!(
        "\
numNodes = 12
sampleSize = 4
interval = 100
burnin = 200
statsFile = {stats}
useTNTsampler = True
structParams = {{Arc = -2.0}}
",
        stats = dir.join_str("stats_sim.txt"),
    );
    let config = Config::from_text(&text).expect("configuration parses");
    run_simulation(&config).expect("simulation succeeds");

    let stats = fs::read_to_string(dir.path().join("stats_sim.txt")).expect("stats file");
    let mut lines = stats.lines();
    assert_eq!(lines.next(), Some("t Arc AcceptanceRate"));
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 4);
    let first: Vec<&str> = rows[0].split_whitespace().collect();
    assert_eq!(first[0], "300");
}

#[test]
fn bipartite_estimation_reports_per_mode_observed_stats() {
    let dir = FixtureDir::new();
    let net = dir.write("bip.net", BIPARTITE_FOUR_CYCLE_NET);
    let text = format!(
        "\
arclistFile = {net}
samplerSteps = 20
Ssteps = 1
EEsteps = 1
EEinnerSteps = 1
computeStats = True
thetaFilePrefix = {theta}
dzAFilePrefix = {dza}
obsStatsFilePrefix = {obs}
structParams = {{Edge, FourCycles, IsolatesA, IsolatesB}}
",
        net = net.display(),
        theta = dir.join_str("theta"),
        dza = dir.join_str("dzA"),
        obs = dir.join_str("obs"),
    );
    let config = Config::from_text(&text).expect("configuration parses");
    run_estimation_task(&config, 0).expect("bipartite estimation runs");
    let obs = fs::read_to_string(dir.path().join("obs_0.txt")).expect("observed stats");
    let mut lines = obs.lines();
    assert_eq!(lines.next(), Some("Edge FourCycles IsolatesA IsolatesB"));
    // three edges, no closed four-cycle, no isolates in either mode
    assert_eq!(lines.next(), Some("3 0 0 0"));
}

#[test]
fn attribute_row_count_mismatch_is_fatal() {
    let dir = FixtureDir::new();
    let net = dir.write("five.net", EMPTY_FIVE_NET);
    let attr = dir.write("wealth.txt", WEALTH_WITH_NA);
    let text = format!(
        "\
arclistFile = {net}
contattrFile = {attr}
thetaFilePrefix = {theta}
dzAFilePrefix = {dza}
structParams = {{Arc}}
attrParams = {{Diff(wealth)}}
",
        net = net.display(),
        attr = attr.display(),
        theta = dir.join_str("theta"),
        dza = dir.join_str("dzA"),
    );
    let config = Config::from_text(&text).expect("configuration parses");
    let err = run_estimation_task(&config, 0).expect_err("two rows cannot cover five nodes");
    assert!(matches!(err, ErgmError::Attribute(_)));
}

#[test]
fn attribute_families_flow_through_to_observed_statistics() {
    let dir = FixtureDir::new();
    let net = dir.write("undirected.net", "*vertices 4\n1\n2\n3\n4\n*edges\n1 2\n3 4\n");
    let smoker = dir.write("smoker.txt", "smoker\n1\n0\n1\nNA\n");
    let class = dir.write("class.txt", "class\n1\n1\n2\nNA\n");
    let wealth = dir.write("wealth.txt", "wealth\n1.0\n3.5\nNA\n2.0\n");
    let interests = dir.write("interests.txt", "interests\n{0,1}\n{1}\n{}\nNA\n");
    let text = format!(
        "\
arclistFile = {net}
binattrFile = {smoker}
catattrFile = {class}
contattrFile = {wealth}
setattrFile = {interests}
samplerSteps = 20
Ssteps = 1
EEsteps = 1
EEinnerSteps = 1
computeStats = True
thetaFilePrefix = {theta}
dzAFilePrefix = {dza}
obsStatsFilePrefix = {obs}
structParams = {{Edge}}
attrParams = {{Activity(smoker), Matching(class), Diff(wealth), JaccardSimilarity(interests)}}
",
        net = net.display(),
        smoker = smoker.display(),
        class = class.display(),
        wealth = wealth.display(),
        interests = interests.display(),
        theta = dir.join_str("theta"),
        dza = dir.join_str("dzA"),
        obs = dir.join_str("obs"),
    );
    let config = Config::from_text(&text).expect("configuration parses");
    run_estimation_task(&config, 0).expect("estimation runs");

    let obs = fs::read_to_string(dir.path().join("obs_0.txt")).expect("observed stats");
    let mut lines = obs.lines();
    assert_eq!(
        lines.next(),
        Some("Edge Activity(smoker) Matching(class) Diff(wealth) JaccardSimilarity(interests)")
    );
    // edge 0-1: smoker activity 1, class match, |1.0 - 3.5|, Jaccard 1/2;
    // edge 2-3: NA values contribute nothing except the empty-set Jaccard of 1
    assert_eq!(lines.next(), Some("2 2 1 2.5 1.5"));
}

#[test]
fn conditional_estimation_freezes_the_outermost_wave() {
    let dir = FixtureDir::new();
    let net = dir.write(
        "snowball.net",
        "*vertices 6\n1\n2\n3\n4\n5\n6\n*edges\n1 2\n1 3\n2 4\n3 5\n4 6\n",
    );
    let zones = dir.write("zones.txt", "zone\n0\n0\n1\n1\n2\n2\n");
    let text = format!(
        "\
arclistFile = {net}
zoneFile = {zones}
useConditionalEstimation = True
samplerSteps = 200
Ssteps = 2
EEsteps = 2
EEinnerSteps = 2
outputSimulatedNetwork = True
thetaFilePrefix = {theta}
dzAFilePrefix = {dza}
simNetFilePrefix = {sim}
structParams = {{Edge = -0.5}}
",
        net = net.display(),
        zones = zones.display(),
        theta = dir.join_str("theta"),
        dza = dir.join_str("dzA"),
        sim = dir.join_str("cond"),
    );
    let config = Config::from_text(&text).expect("configuration parses");
    run_estimation_task(&config, 0).expect("conditional estimation runs");

    let final_net = fs::read_to_string(dir.path().join("cond_0.net")).expect("final network");
    let parsed = ergm_core::read_pajek(&dir.write("reread.net", &final_net), false)
        .expect("own output parses");
    // ties into the outermost wave (nodes 4 and 5, zone 2) are fixed data
    let ties: Vec<(usize, usize)> = parsed
        .ties
        .iter()
        .map(|&(i, j)| (i.min(j), i.max(j)))
        .collect();
    assert!(ties.contains(&(2, 4)), "tie 3-5 was toggled");
    assert!(ties.contains(&(3, 5)), "tie 4-6 was toggled");
}

#[test]
fn citation_simulation_keeps_older_term_arcs() {
    let dir = FixtureDir::new();
    let net = dir.write("cites.net", "*vertices 5\n1\n2\n3\n4\n5\n*arcs\n1 2\n4 1\n5 2\n");
    let terms = dir.write("terms.txt", "term\n0\n0\n0\n1\n1\n");
    let text = format!(
        "\
arclistFile = {net}
termFile = {terms}
citationERGM = True
numNodes = 5
sampleSize = 1
interval = 50
burnin = 0
statsFile = {stats}
outputSimulatedNetwork = True
simNetFilePrefix = {sim}
structParams = {{Arc = -0.5}}
",
        net = net.display(),
        terms = terms.display(),
        stats = dir.join_str("stats_cergm.txt"),
        sim = dir.join_str("cergm"),
    );
    let config = Config::from_text(&text).expect("configuration parses");
    run_simulation(&config).expect("citation simulation runs");

    let sample = fs::read_to_string(dir.path().join("cergm_50.net")).expect("sample network");
    let parsed = ergm_core::read_pajek(&dir.write("reread.net", &sample), false)
        .expect("own output parses");
    // the arc 1 -> 2 is sent from term 0 and never proposed
    assert!(parsed.ties.contains(&(0, 1)), "older-term arc was toggled");
    for &(i, _) in &parsed.ties {
        assert!(i == 0 || i >= 3, "arc sent by a non-loaded, non-latest sender");
    }
}

#[test]
fn ifd_simulation_holds_the_requested_density() {
    let dir = FixtureDir::new();
    let text = format!(
        "\
numNodes = 10
numArcs = 15
useIFDsampler = True
sampleSize = 5
interval = 200
burnin = 100
statsFile = {stats}
structParams = {{Arc, Reciprocity}}
",
        stats = dir.join_str("stats_ifd.txt"),
    );
    let config = Config::from_text(&text).expect("configuration parses");
    run_simulation(&config).expect("IFD simulation runs");

    let stats = fs::read_to_string(dir.path().join("stats_ifd.txt")).expect("stats file");
    let mut lines = stats.lines();
    assert_eq!(lines.next(), Some("t Arc Reciprocity AcceptanceRate"));
    for row in lines {
        let arc: f64 = row
            .split_whitespace()
            .nth(1)
            .expect("arc column")
            .parse()
            .expect("numeric arc count");
        assert!((arc - 15.0).abs() <= 1.0, "density drifted: {row}");
    }
}

#[test]
fn loading_and_writing_back_preserves_the_arc_set() {
    let dir = FixtureDir::new();
    let input = dir.write("observed.net", TRIANGLE_NET);
    let original = read_pajek(&input, false).expect("fixture parses");

    let mut g = ergm_core::Graph::directed(original.n, ergm_core::TwoPathCacheKind::Sparse, false);
    for &(i, j) in &original.ties {
        g.insert_updating_list(i, j);
    }
    let mut buffer = Vec::new();
    ergm_core::write_pajek(&g, &mut buffer).expect("write succeeds");
    let written = String::from_utf8(buffer).expect("UTF-8 output");
    let reread_path = dir.write("rewritten.net", &written);
    let reread = read_pajek(&reread_path, false).expect("own output parses");

    let mut before = original.ties;
    let mut after = reread.ties;
    before.sort_unstable();
    after.sort_unstable();
    assert_eq!(before, after);
    assert_eq!(original.n, reread.n);
}
