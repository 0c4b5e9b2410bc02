//! Tests for the move module.

use super::*;
use listforge_core::domain::{ElementRef, SubList};
use listforge_scoring::{RecordingScoreDirector, ScoreDirector};
use listforge_test::routing::plan_with_stops;
use listforge_test::{
    create_director, list_variable, plan, route_cost, routes, ListEvent, Plan, PlanDirector,
    TrackingScoreDirector,
};

mod assign;
mod random_walk;
mod sublist_swap;

/// Runs `m` through a recording director, checks the resulting routes, and
/// checks that undoing the recorded changes restores the original routes.
fn assert_move_and_undo<M: Move<Plan>>(director: &mut PlanDirector, m: &M, expected: &[&[usize]]) {
    let before = routes(director.working_solution());
    {
        let mut recording = RecordingScoreDirector::new(&mut *director);
        m.do_move(&mut recording);
        let after = routes(recording.working_solution());
        let expected: Vec<Vec<usize>> = expected.iter().map(|r| r.to_vec()).collect();
        assert_eq!(after, expected);
        recording.undo_changes();
    }
    assert_eq!(routes(director.working_solution()), before);
}

/// Runs `m`, then runs its undo move built beforehand, and checks the routes
/// are back where they started.
fn assert_undo_move_restores<M: Move<Plan>>(director: &mut PlanDirector, m: &M) {
    let before = routes(director.working_solution());
    let undo = m.create_undo_move(&*director);
    m.do_move(&mut *director);
    assert!(undo.is_doable(&*director), "undo of {m:?} is not doable");
    undo.do_move(&mut *director);
    assert_eq!(routes(director.working_solution()), before);
}

fn tracking(routes: &[&[usize]]) -> TrackingScoreDirector<Plan> {
    TrackingScoreDirector::new(plan(routes), route_cost)
}
