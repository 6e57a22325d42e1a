mod common;

use std::sync::Arc;

use communities::{
    district_population, population_from_mask, quantify, quantify_state, votes_from_mask, Communities,
    CommunityFrame, Error, Party, Precinct, State,
};
use common::{grid, grid_precincts, rectangle_district, votes};
use geoshape::Shape;

const EPS: f64 = 1e-9;

/// 4x2 grid split into a western and an eastern half.
fn halves(state: State) -> Communities {
    let frame = CommunityFrame {
        communities: vec![
            vec!["0,0".into(), "1,0".into(), "0,1".into(), "1,1".into()],
            vec!["2,0".into(), "3,0".into(), "2,1".into(), "3,1".into()],
        ],
    };
    Communities::from_frame(Arc::new(state), &frame).unwrap()
}

#[test]
fn fully_covered_community_has_no_residual() {
    let communities = halves(grid(4, 2));
    let score = quantify(&communities, &rectangle_district("west", 0, 0, 2, 2)).unwrap();

    assert_eq!(score.community, 1);
    assert_eq!(score.community_population, 400);
    assert!(score.residual_population.abs() < EPS);
    assert!(score.absolute.abs() < EPS);
    assert!((score.district_population - 400.0).abs() < EPS);
    assert_eq!(score.ratios.len(), 2);
    assert_eq!(score.ratios[&Party::Democrat], 0.5);
    assert_eq!(score.ratios[&Party::Republican], 0.5);
}

#[test]
fn third_party_votes_keep_the_major_party_even_split() {
    let mut precincts = grid_precincts(4, 2);
    precincts[3] = Precinct::new("3,0", Shape::rectangle(3, 0, 4, 1), 100, {
        let mut v = votes(50, 45);
        v.insert(Party::Green, 5);
        v
    });
    let communities = halves(State::new(precincts, Vec::new()).unwrap());
    let score = quantify(&communities, &rectangle_district("west", 0, 0, 2, 2)).unwrap();

    assert!(score.residual_population.abs() < EPS);
    assert_eq!(score.ratios[&Party::Democrat], 0.5);
    assert_eq!(score.ratios[&Party::Republican], 0.5);
    assert_eq!(score.ratios[&Party::Green], 0.0);
    assert!((score.collapsed() - 0.5).abs() < EPS);
}

#[test]
fn partial_district_scores_the_residual() {
    let communities = halves(grid(4, 2));
    let score = quantify(&communities, &rectangle_district("strip", 0, 0, 1, 2)).unwrap();

    assert_eq!(score.community, 1);
    assert!((score.residual_population - 200.0).abs() < EPS);
    assert!((score.absolute - 0.5).abs() < EPS);
    assert!((score.district_population - 200.0).abs() < EPS);

    // The residual is column x = 1: 40 Democratic and 60 Republican votes per precinct.
    assert!((score.ratios[&Party::Democrat] - 0.4).abs() < EPS);
    assert!((score.ratios[&Party::Republican] - 0.6).abs() < EPS);
}

#[test]
fn home_is_the_community_with_most_overlap() {
    let communities = halves(grid(4, 2));
    // Two western precincts against four eastern ones.
    let score = quantify(&communities, &rectangle_district("skew", 1, 0, 4, 2)).unwrap();
    assert_eq!(score.community, 2);
    // Even overlap goes to the lower community id.
    let score = quantify(&communities, &rectangle_district("even", 1, 0, 3, 2)).unwrap();
    assert_eq!(score.community, 1);
    let score = quantify(&communities, &rectangle_district("skew", 1, 0, 4, 1)).unwrap();
    assert_eq!(score.community, 2);
}

#[test]
fn district_outside_every_community_is_an_error() {
    let communities = halves(grid(4, 2));
    let err = quantify(&communities, &rectangle_district("far", 10, 10, 12, 12)).unwrap_err();
    assert!(matches!(err, Error::Quantification { district } if district == "far"));
}

#[test]
fn population_is_apportioned_by_area() {
    let precinct = Precinct::new("wide", Shape::rectangle(0, 0, 2, 2), 100, votes(30, 10));
    let state = State::new(vec![precinct], Vec::new()).unwrap();
    let mask = Shape::rectangle(0, 0, 1, 2);

    assert!((population_from_mask(&state, &[0], &mask) - 50.0).abs() < EPS);
    let votes = votes_from_mask(&state, &[0], &mask);
    assert!((votes[&Party::Democrat] - 15.0).abs() < EPS);
    assert!((votes[&Party::Republican] - 5.0).abs() < EPS);
}

#[test]
fn state_links_districts_to_nearest_communities() {
    let districts = vec![
        rectangle_district("east", 2, 0, 4, 2),
        rectangle_district("west", 0, 0, 2, 2),
    ];
    let state = State::new(grid_precincts(4, 2), districts).unwrap();
    assert!((district_population(&state, &state.districts()[0]) - 400.0).abs() < EPS);

    let communities = halves(state);
    let result = quantify_state(&communities);
    assert_eq!(result.links, [(0, 2), (1, 1)]);
    assert_eq!(result.scores.len(), 2);
    assert_eq!(result.scores[0].district, "east");
    assert!(result.scores.iter().all(|s| s.absolute.abs() < EPS));
}

#[test]
fn extra_districts_stay_unlinked() {
    let districts = vec![
        rectangle_district("a", 0, 0, 2, 2),
        rectangle_district("b", 2, 0, 4, 2),
        rectangle_district("c", 0, 0, 4, 2),
    ];
    let state = State::new(grid_precincts(4, 2), districts).unwrap();
    let result = quantify_state(&halves(state));
    assert_eq!(result.links.len(), 2);
    assert!(result.links.iter().all(|&(d, _)| d < 2));
}
