use std::{sync::Arc, time::Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    config::{Config, RefineConfig},
    error::Result,
    partition::{algorithm::{generate, Compactness, Partisan, Population}, changed_precincts, Communities},
    types::State,
};

/// One refinement objective: how to pick the worst community and how to
/// exchange its boundary precincts.
pub(crate) trait Objective {
    fn name(&self) -> &'static str;

    /// How far community `c` lies outside tolerance, or `None` if it is within.
    fn excess(&self, communities: &Communities, c: usize) -> Option<f64>;

    /// Try boundary exchanges for `community`, returning how many precincts moved.
    /// Precincts flagged in `moved` are left alone and newly moved ones are flagged.
    fn improve(&self, communities: &mut Communities, community: usize, moved: &mut [bool]) -> usize;
}

/// Check if precinct `p` may leave its community: it is not flagged in
/// `moved`, its community keeps at least one precinct, and the community
/// stays connected on `p`'s island.
pub(crate) fn can_leave(communities: &Communities, p: usize, moved: &[bool]) -> bool {
    !moved[p]
        && communities.members(communities.community_of(p)).len() > 1
        && !communities.creates_island(p)
}

/// Check if `p` shares an edge with community `c`.
pub(crate) fn touches(communities: &Communities, p: usize, c: usize) -> bool {
    communities.state().graph().neighbors(p).any(|v| communities.community_of(v) == c)
}

/// Repeatedly improve the community furthest outside tolerance under
/// `objective`. A community is picked at most `max_iterations` times; once it
/// reaches that cap the next worst community is picked instead.
fn run_objective(communities: &mut Communities, objective: &impl Objective, max_iterations: usize, moved: &mut [bool]) -> usize {
    let mut visits = vec![0; communities.len() + 1];
    let mut moves = 0;

    loop {
        let worst = communities.ids()
            .filter(|&c| visits[c] < max_iterations)
            .filter_map(|c| objective.excess(communities, c).map(|excess| (c, excess)))
            .fold(None, |worst: Option<(usize, f64)>, (c, excess)| match worst {
                Some((_, max)) if max >= excess => worst,
                _ => Some((c, excess)),
            });
        let Some((worst, _)) = worst else { break };

        visits[worst] += 1;
        moves += objective.improve(communities, worst, moved);
    }

    debug!(objective = objective.name(), moves, "objective pass finished");
    moves
}

/// Outcome of a refinement run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefineReport {
    /// Precincts that changed community in each full pass.
    pub changed: Vec<usize>,
    /// True if the last pass changed fewer precincts than the tolerance allows.
    pub converged: bool,
}

impl RefineReport {
    #[inline] pub fn passes(&self) -> usize { self.changed.len() }
}

/// Refine communities for partisan homogeneity, then compactness, then
/// population balance, repeating full passes until few precincts change.
///
/// Running out of passes or time is not an error: the communities are left
/// in the best state reached and the report is marked unconverged.
pub fn refine(communities: &mut Communities, config: &RefineConfig) -> RefineReport {
    let start = Instant::now();
    let tolerances = config.tolerances;
    let threshold = config.changed_precinct_tolerance * communities.state().len() as f64;

    let districts = match communities.state().districts().len() {
        0 => communities.len(),
        n => n,
    };
    let aim = communities.state().total_population() as f64 / districts as f64;

    let partisan = Partisan { tolerance: tolerances.partisan };
    let compactness = Compactness { tolerance: tolerances.compactness };
    let population = Population { tolerance: tolerances.population, aim };

    // Precincts that changed community in the previous pass stay put for
    // one pass, so a precinct cannot bounce between two communities.
    let mut recently_moved = vec![false; communities.state().len()];

    let mut report = RefineReport::default();
    for pass in 0..config.max_passes {
        let before = communities.assignments().to_vec();

        run_objective(communities, &partisan, config.max_iterations, &mut recently_moved.clone());
        run_objective(communities, &compactness, config.max_iterations, &mut recently_moved.clone());
        run_objective(communities, &population, config.max_iterations, &mut recently_moved.clone());

        let after = communities.assignments();
        recently_moved.iter_mut().zip(before.iter().zip(after)).for_each(|(m, (a, b))| *m = a != b);
        let changed = changed_precincts(&before, after);
        report.changed.push(changed);
        info!(pass, changed, "refinement pass");

        if (changed as f64) < threshold || changed == 0 {
            report.converged = true;
            break
        }
        if config.time_budget().is_some_and(|budget| start.elapsed() >= budget) { break }
    }

    if !report.converged {
        warn!(passes = report.passes(), "refinement stopped before converging");
    }
    report
}

/// Generate communities and refine them with the given configuration.
pub fn generate_and_refine(state: impl Into<Arc<State>>, num_communities: usize, config: &Config) -> Result<(Communities, RefineReport)> {
    let mut communities = generate(state, num_communities, &config.generate)?;
    let report = refine(&mut communities, &config.refine);
    Ok((communities, report))
}
