//! Tests for SubListSwapMove.

use super::*;

fn swap(
    left: (usize, usize, usize),
    right: (usize, usize, usize),
    reversing: bool,
) -> SubListSwapMove<Plan, usize> {
    SubListSwapMove::new(
        SubList::new(left.0, left.1, left.2),
        SubList::new(right.0, right.1, right.2),
        reversing,
        list_variable(),
    )
}

#[test]
fn intra_list_swap_of_unequal_runs() {
    let mut director = create_director(plan(&[&[1, 2, 3, 4, 5, 6, 7, 8]]));

    let m = swap((0, 1, 2), (0, 4, 3), false);
    assert!(m.is_doable(&director));
    assert_move_and_undo(&mut director, &m, &[&[1, 5, 6, 7, 4, 2, 3, 8]]);

    let reversed = swap((0, 1, 2), (0, 4, 3), true);
    assert_move_and_undo(&mut director, &reversed, &[&[1, 7, 6, 5, 4, 3, 2, 8]]);
}

#[test]
fn adjacent_runs_are_doable() {
    let mut director = create_director(plan(&[&[1, 2, 3, 4, 5]]));
    let m = swap((0, 1, 2), (0, 3, 2), false);

    assert!(m.is_doable(&director));
    assert_move_and_undo(&mut director, &m, &[&[1, 4, 5, 2, 3]]);
}

#[test]
fn runs_are_normalized_left_first() {
    let m = swap((0, 4, 3), (0, 1, 2), false);
    assert_eq!(m.left(), SubList::new(0, 1, 2));
    assert_eq!(m.right(), SubList::new(0, 4, 3));

    let inter = swap((1, 0, 1), (0, 2, 1), false);
    assert_eq!(inter.left().entity_index, 1);
}

#[test]
fn overlapping_runs_not_doable() {
    let director = create_director(plan(&[&[1, 2, 3, 4, 5]]));

    assert!(!swap((0, 1, 3), (0, 3, 2), false).is_doable(&director));
    assert!(!swap((0, 1, 2), (0, 1, 2), true).is_doable(&director));
    assert!(!swap((0, 0, 0), (0, 2, 1), false).is_doable(&director));
    assert!(!swap((0, 0, 1), (0, 4, 2), false).is_doable(&director));
}

#[test]
fn inter_list_swap() {
    let mut director = create_director(plan(&[&[1, 2, 3], &[7, 8, 9]]));
    let m = swap((0, 0, 1), (1, 1, 2), false);

    assert!(m.is_doable(&director));
    assert_move_and_undo(&mut director, &m, &[&[8, 9, 2, 3], &[7, 1]]);
}

#[test]
fn undo_move_restores_state() {
    let mut director = create_director(plan(&[&[1, 2, 3, 4, 5, 6, 7, 8], &[9, 10]]));

    assert_undo_move_restores(&mut director, &swap((0, 1, 2), (0, 4, 3), false));
    assert_undo_move_restores(&mut director, &swap((0, 0, 3), (0, 5, 1), true));
    assert_undo_move_restores(&mut director, &swap((0, 2, 3), (1, 0, 2), true));
}

#[test]
fn undo_move_targets_swapped_runs() {
    let director = create_director(plan(&[&[1, 2, 3, 4, 5, 6, 7, 8]]));
    let undo = swap((0, 1, 2), (0, 4, 3), false).create_undo_move(&director);

    assert_eq!(undo.left(), SubList::new(0, 1, 3));
    assert_eq!(undo.right(), SubList::new(0, 5, 2));
}

#[test]
fn inter_list_notifications_report_new_lengths() {
    let mut director = tracking(&[&[1, 2, 3], &[7, 8, 9]]);
    swap((0, 0, 1), (1, 1, 2), false).do_move(&mut director);

    assert_eq!(
        director.events(),
        &[
            ListEvent::BeforeChanged { entity: 0, from: 0, to: 1 },
            ListEvent::BeforeChanged { entity: 1, from: 1, to: 3 },
            ListEvent::AfterChanged { entity: 0, from: 0, to: 2 },
            ListEvent::AfterChanged { entity: 1, from: 1, to: 2 },
        ]
    );
}
