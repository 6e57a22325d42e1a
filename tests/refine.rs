mod common;

use std::sync::Arc;

use communities::{
    generate, generate_and_refine, refine, Communities, CommunityFrame, Config, GenerateConfig, RefineConfig, State,
    Tolerances,
};
use common::{cell, grid, scaled_grid_precincts, votes};
use geoshape::Coordinate;

fn frame(groups: &[&[&str]]) -> CommunityFrame {
    CommunityFrame { communities: groups.iter().map(|g| g.iter().map(|id| id.to_string()).collect()).collect() }
}

/// Only the named objective can ever fire.
fn only(partisan: bool, compactness: bool, population: bool) -> RefineConfig {
    RefineConfig {
        tolerances: Tolerances {
            partisan: if partisan { 0.05 } else { f64::INFINITY },
            compactness: if compactness { 0.5 } else { f64::NEG_INFINITY },
            population: if population { 0.05 } else { f64::INFINITY },
        },
        ..RefineConfig::default()
    }
}

fn compactness_only(tolerance: f64) -> RefineConfig {
    RefineConfig { tolerances: Tolerances { compactness: tolerance, ..only(false, false, false).tolerances }, ..RefineConfig::default() }
}

/// Grid at full coordinate scale, so the equal-area circle is not distorted by snapping.
fn scaled_grid(w: i64, h: i64) -> Arc<State> {
    Arc::new(State::new(scaled_grid_precincts(w, h, Coordinate::SCALE as i64), Vec::new()).unwrap())
}

fn max_population_deviation(communities: &Communities, aim: f64) -> f64 {
    communities.ids().map(|c| (communities.population(c) as f64 - aim).abs()).fold(0.0, f64::max)
}

#[test]
fn population_moves_toward_aim() {
    let state = Arc::new(grid(4, 1));
    let mut communities = Communities::from_frame(state, &frame(&[&["0,0"], &["1,0", "2,0", "3,0"]])).unwrap();

    let report = refine(&mut communities, &only(false, false, true));
    assert_eq!(communities.population(1), 200);
    assert_eq!(communities.population(2), 200);
    assert_eq!(report.changed, [1, 0]);
    assert!(report.converged);
    communities.validate().unwrap();
}

#[test]
fn population_exchanges_never_widen_the_worst_deviation() {
    let state = Arc::new(grid(6, 3));
    let groups: [&[&str]; 3] = [
        &["0,0"],
        &["1,0", "2,0", "0,1", "1,1", "2,1"],
        &["3,0", "4,0", "5,0", "3,1", "4,1", "5,1", "0,2", "1,2", "2,2", "3,2", "4,2", "5,2"],
    ];
    let mut communities = Communities::from_frame(Arc::clone(&state), &frame(&groups)).unwrap();
    let aim = state.total_population() as f64 / 3.0;

    let before = max_population_deviation(&communities, aim);
    refine(&mut communities, &only(false, false, true));
    let after = max_population_deviation(&communities, aim);
    assert!(after < before, "{after} >= {before}");
    communities.validate().unwrap();
}

#[test]
fn partisan_outlier_moves_to_matching_neighbour() {
    let precincts = vec![
        cell("a", 0, 0, 100, votes(80, 20)),
        cell("b", 1, 0, 100, votes(80, 20)),
        cell("c", 2, 0, 100, votes(10, 90)),
        cell("d", 3, 0, 100, votes(10, 90)),
    ];
    let state = Arc::new(State::new(precincts, Vec::new()).unwrap());
    let mut communities = Communities::from_frame(Arc::clone(&state), &frame(&[&["a", "b", "c"], &["d"]])).unwrap();
    let spread = communities.partisan_stdev(1);

    refine(&mut communities, &only(true, false, false));
    assert_eq!(communities.community_of(state.index_of("c").unwrap()), 2);
    assert!(communities.partisan_stdev(1) < spread);
    assert_eq!(communities.partisan_stdev(1), 0.0);
    assert_eq!(communities.partisan_stdev(2), 0.0);
}

#[test]
fn communities_within_tolerance_are_left_alone() {
    let state = Arc::new(grid(4, 2));
    let groups: [&[&str]; 2] = [&["0,0", "1,0", "0,1", "1,1"], &["2,0", "3,0", "2,1", "3,1"]];
    let mut communities = Communities::from_frame(state, &frame(&groups)).unwrap();
    let before = communities.assignments().to_vec();

    let report = refine(&mut communities, &only(false, false, false));
    assert_eq!(report.changed, [0]);
    assert!(report.converged);
    assert_eq!(communities.assignments(), before.as_slice());
}

#[test]
fn refined_communities_stay_valid() {
    for seed in 0..3 {
        let mut communities = generate(grid(6, 5), 5, &GenerateConfig::seeded(seed)).unwrap();
        let report = refine(&mut communities, &RefineConfig::default());
        assert!(report.passes() >= 1);
        assert!(report.passes() <= RefineConfig::default().max_passes);
        communities.validate().unwrap();
        assert_eq!(communities.ids().map(|c| communities.members(c).len()).sum::<usize>(), 30);
    }
}

#[test]
fn generate_and_refine_from_config() {
    let config = Config::from_json(r#"{ "generate": { "seed": 4 }, "refine": { "max_passes": 3 } }"#).unwrap();
    let (communities, report) = generate_and_refine(grid(5, 5), 4, &config).unwrap();
    assert_eq!(communities.len(), 4);
    assert!(report.passes() <= 3);
    communities.validate().unwrap();
}

#[test]
fn capped_community_does_not_block_the_others() {
    // Island X can never trade precincts; island Y holds a movable outlier.
    let mut precincts = vec![
        cell("x0", 0, 0, 100, votes(90, 10)),
        cell("x1", 1, 0, 100, votes(10, 90)),
        cell("x2", 2, 0, 100, votes(90, 10)),
    ];
    precincts.extend([
        cell("y0", 10, 0, 100, votes(80, 20)),
        cell("y1", 11, 0, 100, votes(80, 20)),
        cell("y2", 12, 0, 100, votes(10, 90)),
        cell("y3", 13, 0, 100, votes(10, 90)),
    ]);
    let state = Arc::new(State::new(precincts, Vec::new()).unwrap());
    let mut communities = Communities::from_frame(
        Arc::clone(&state),
        &frame(&[&["x0", "x1", "x2"], &["y0", "y1", "y2"], &["y3"]]),
    ).unwrap();
    assert!(communities.partisan_stdev(1) > communities.partisan_stdev(2));

    let report = refine(&mut communities, &only(true, false, false));
    assert_eq!(communities.community_of(state.index_of("y2").unwrap()), 3);
    assert_eq!(communities.partisan_stdev(2), 0.0);
    assert_eq!(report.changed, [1, 0]);
    communities.validate().unwrap();
}

#[test]
fn compactness_ejects_protruding_precincts() {
    let state = scaled_grid(3, 2);
    // An L of four cells wrapped around a 2x1 block.
    let mut communities = Communities::from_frame(
        Arc::clone(&state),
        &frame(&[&["0,0", "1,0", "2,0", "2,1"], &["0,1", "1,1"]]),
    ).unwrap();
    let before = communities.schwartzberg(1);

    let report = refine(&mut communities, &compactness_only(0.8));
    assert!(communities.schwartzberg(1) > before);
    assert!(communities.schwartzberg(1) >= 0.8);
    assert_eq!(communities.sorted_members(1), [state.index_of("1,0").unwrap(), state.index_of("2,0").unwrap()]);

    // The two ejected precincts sit out the next pass instead of bouncing back.
    assert_eq!(report.changed, [2, 0]);
    assert!(report.converged);
    communities.validate().unwrap();
}

#[test]
fn compactness_reverts_ejections_that_lower_the_score() {
    let state = scaled_grid(6, 3);
    let west = ["0,0", "1,0", "2,0", "0,1", "1,1", "2,1", "0,2", "1,2", "2,2"];
    let east = ["3,0", "4,0", "5,0", "3,1", "4,1", "5,1", "3,2", "4,2", "5,2"];
    let mut communities = Communities::from_frame(Arc::clone(&state), &frame(&[&west, &east])).unwrap();
    let before = communities.assignments().to_vec();
    let score = communities.schwartzberg(1);

    // Squares fall short of 0.9, but trimming a corner only makes them worse.
    let report = refine(&mut communities, &compactness_only(0.9));
    assert_eq!(report.changed, [0]);
    assert_eq!(communities.assignments(), before.as_slice());
    assert_eq!(communities.schwartzberg(1), score);
    assert_eq!(communities.population(1), 900);
}
