//! Tests for ListAssignMove and ListUnassignMove.

use super::*;

fn director_with_pool() -> PlanDirector {
    create_director(plan_with_stops(&[&[1, 2], &[3]], vec![1, 2, 3, 4]))
}

#[test]
fn assign_inserts_unassigned_value() {
    let mut director = director_with_pool();
    let m = ListAssignMove::new(4, ElementRef::new(1, 0), list_variable());

    assert!(m.is_doable(&director));
    assert_move_and_undo(&mut director, &m, &[&[1, 2], &[4, 3]]);
}

#[test]
fn assign_of_assigned_value_not_doable() {
    let director = director_with_pool();

    assert!(!ListAssignMove::new(2, ElementRef::new(1, 0), list_variable()).is_doable(&director));
    assert!(!ListAssignMove::new(4, ElementRef::new(1, 2), list_variable()).is_doable(&director));
    assert!(!ListAssignMove::new(4, ElementRef::new(2, 0), list_variable()).is_doable(&director));
}

#[test]
fn assign_undo_is_unassign() {
    let mut director = director_with_pool();
    let m = ListAssignMove::new(4, ElementRef::new(0, 2), list_variable());

    let undo = m.create_undo_move(&director);
    assert_eq!(undo.value(), &4);
    assert_eq!(undo.source(), ElementRef::new(0, 2));

    m.do_move(&mut director);
    assert_eq!(routes(director.working_solution()), vec![vec![1, 2, 4], vec![3]]);
    assert!(undo.is_doable(&director));
    undo.do_move(&mut director);
    assert_eq!(routes(director.working_solution()), vec![vec![1, 2], vec![3]]);
}

#[test]
#[should_panic(expected = "unassign move is itself an undo move")]
fn unassign_cannot_be_undone() {
    let director = director_with_pool();
    let m = ListUnassignMove::new(2, ElementRef::new(0, 1), list_variable());
    let _ = m.create_undo_move(&director);
}

#[test]
fn unassign_checks_value_at_position() {
    let director = director_with_pool();

    assert!(ListUnassignMove::new(2, ElementRef::new(0, 1), list_variable()).is_doable(&director));
    assert!(!ListUnassignMove::new(3, ElementRef::new(0, 1), list_variable()).is_doable(&director));
    assert!(!ListUnassignMove::new(2, ElementRef::new(0, 5), list_variable()).is_doable(&director));
}

#[test]
fn unassign_rebase_follows_the_value() {
    let source = director_with_pool();
    let destination = create_director(plan_with_stops(&[&[3], &[4, 1, 2]], vec![1, 2, 3, 4]));

    let m = ListUnassignMove::new(2, ElementRef::new(0, 1), list_variable());
    assert!(m.is_doable(&source));

    let rebased = m.rebase(&destination);
    assert_eq!(rebased.source(), ElementRef::new(1, 2));
    assert!(rebased.is_doable(&destination));
}

#[test]
fn assign_notifies_element_events() {
    let mut director =
        TrackingScoreDirector::new(plan_with_stops(&[&[1], &[]], vec![1, 2]), route_cost);
    ListAssignMove::new(2, ElementRef::new(1, 0), list_variable()).do_move(&mut director);
    ListUnassignMove::new(1, ElementRef::new(0, 0), list_variable()).do_move(&mut director);

    assert_eq!(
        director.events(),
        &[
            ListEvent::BeforeAssigned { entity: 1, index: 0 },
            ListEvent::AfterAssigned { entity: 1, index: 0 },
            ListEvent::BeforeUnassigned { entity: 0, index: 0 },
            ListEvent::AfterUnassigned { entity: 0, index: 0 },
        ]
    );

    director.undo_all();
    assert_eq!(routes(director.working_solution()), vec![vec![1], vec![]]);
}
