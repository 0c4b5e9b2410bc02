//! Vehicle routing fixture.
//!
//! Stops are plain `usize` ids laid out on a line, so the distance between
//! two stops is the absolute difference of their ids. Each vehicle starts and
//! ends at stop 0.

use listforge_core::domain::{ElementRef, ListVariable, PlanningSolution};
use listforge_core::score::SimpleScore;
use listforge_scoring::SimpleScoreDirector;

#[derive(Clone, Debug, PartialEq)]
pub struct Vehicle {
    pub id: usize,
    pub visits: Vec<usize>,
}

#[derive(Clone, Debug)]
pub struct Plan {
    pub vehicles: Vec<Vehicle>,
    /// Every stop of the problem, assigned or not.
    pub stops: Vec<usize>,
    pub score: Option<SimpleScore>,
}

impl PlanningSolution for Plan {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }
}

/// Builds a plan whose vehicles visit the given routes.
///
/// The stop pool is `0..=max_stop` over all routes.
pub fn plan(routes: &[&[usize]]) -> Plan {
    let max_stop = routes
        .iter()
        .flat_map(|route| route.iter().copied())
        .max()
        .unwrap_or(0);
    plan_with_stops(routes, (0..=max_stop).collect())
}

/// Builds a plan with an explicit stop pool, some of which may be unassigned.
pub fn plan_with_stops(routes: &[&[usize]], stops: Vec<usize>) -> Plan {
    Plan {
        vehicles: routes
            .iter()
            .enumerate()
            .map(|(id, route)| Vehicle {
                id,
                visits: route.to_vec(),
            })
            .collect(),
        stops,
        score: None,
    }
}

/// Returns a copy of every vehicle's visits.
pub fn routes(plan: &Plan) -> Vec<Vec<usize>> {
    plan.vehicles.iter().map(|v| v.visits.clone()).collect()
}

pub fn stop_distance(from: &usize, to: &usize) -> f64 {
    from.abs_diff(*to) as f64
}

/// Negated total driving distance, depot included.
pub fn route_cost(plan: &Plan) -> SimpleScore {
    let total: usize = plan
        .vehicles
        .iter()
        .map(|vehicle| {
            let mut previous: usize = 0;
            let mut distance = 0;
            for &stop in &vehicle.visits {
                distance += previous.abs_diff(stop);
                previous = stop;
            }
            distance + previous
        })
        .sum();
    SimpleScore::of(-(total as i64))
}

fn entity_count(plan: &Plan) -> usize {
    plan.vehicles.len()
}

fn list_len(plan: &Plan, entity: usize) -> usize {
    plan.vehicles.get(entity).map_or(0, |v| v.visits.len())
}

fn list_get(plan: &Plan, entity: usize, index: usize) -> Option<usize> {
    plan.vehicles
        .get(entity)
        .and_then(|v| v.visits.get(index))
        .copied()
}

fn list_insert(plan: &mut Plan, entity: usize, index: usize, stop: usize) {
    plan.vehicles[entity].visits.insert(index, stop);
}

fn list_remove(plan: &mut Plan, entity: usize, index: usize) -> Option<usize> {
    plan.vehicles
        .get_mut(entity)
        .filter(|v| index < v.visits.len())
        .map(|v| v.visits.remove(index))
}

fn sublist_remove(plan: &mut Plan, entity: usize, from: usize, to: usize) -> Vec<usize> {
    plan.vehicles[entity].visits.drain(from..to).collect()
}

fn sublist_insert(plan: &mut Plan, entity: usize, index: usize, stops: Vec<usize>) {
    plan.vehicles[entity].visits.splice(index..index, stops);
}

fn stop_position(plan: &Plan, stop: &usize) -> Option<ElementRef> {
    plan.vehicles.iter().enumerate().find_map(|(entity, v)| {
        v.visits
            .iter()
            .position(|s| s == stop)
            .map(|index| ElementRef::new(entity, index))
    })
}

/// The `visits` list variable of [`Plan`].
pub fn list_variable() -> ListVariable<Plan, usize> {
    ListVariable::new(
        entity_count,
        list_len,
        list_get,
        list_insert,
        list_remove,
        sublist_remove,
        sublist_insert,
        "visits",
        0,
    )
    .with_position_lookup(stop_position)
}

pub type PlanDirector = SimpleScoreDirector<Plan, fn(&Plan) -> SimpleScore>;

/// Wraps a plan in a full-recalculation director scored by [`route_cost`].
pub fn create_director(plan: Plan) -> PlanDirector {
    SimpleScoreDirector::new(plan, route_cost as fn(&Plan) -> SimpleScore)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_cost_counts_depot_legs() {
        // 0 -> 2 -> 5 -> 0, and an idle vehicle.
        assert_eq!(route_cost(&plan(&[&[2, 5], &[]])), SimpleScore::of(-10));
        assert_eq!(route_cost(&plan(&[&[5, 2], &[1]])), SimpleScore::of(-12));
    }
}
