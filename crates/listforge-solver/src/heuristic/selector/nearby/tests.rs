//! Tests for nearby selection.

use std::sync::Arc;

use listforge_core::domain::{ElementRef, SubList, SupplyManager};
use listforge_core::ListForgeError;
use listforge_scoring::ScoreDirector;
use listforge_test::{create_director, list_variable, plan, stop_distance, Plan};

use super::*;
use crate::heuristic::selector::destination::DestinationSelector;
use crate::heuristic::selector::element::{ElementSelector, FromListElementSelector};
use crate::heuristic::selector::lifecycle::SelectorLifecycle;
use crate::heuristic::selector::mimic::{
    MimicRecorder, MimicRecordingElementSelector, MimicRecordingSubListSelector,
    MimicReplayingElementSelector, MimicReplayingSubListSelector,
};
use crate::heuristic::selector::random::WorkingRandom;
use crate::heuristic::selector::selection_order::SelectionOrder;
use crate::heuristic::selector::sublist::{FromSolutionSubListSelector, SubListSelector};

/// Entity heads sit at the depot, stop 0.
fn plan_distance(_: &Plan, origin: &usize, destination: &Destination<usize>) -> f64 {
    match destination {
        Destination::Entity(_) => *origin as f64,
        Destination::Value(value) => stop_distance(origin, value),
    }
}

fn meter() -> FnDistanceMeter<Plan, usize> {
    FnDistanceMeter::new("stop distance", plan_distance)
}

fn demand(solution: &Plan, size_cap: usize) -> NearbyMatrixDemand<Plan, usize, FnDistanceMeter<Plan, usize>> {
    NearbyMatrixDemand::new(meter(), list_variable(), true, size_cap, Arc::new(solution.clone()))
}

#[test]
fn matrix_ranks_nearest_first_and_keeps_ties_stable() {
    let destinations = vec![
        Destination::Entity(0),
        Destination::Value(5),
        Destination::Value(2),
        Destination::Value(4),
    ];
    let matrix = NearbyDistanceMatrix::build([3usize], &destinations, usize::MAX, |origin, destination| {
        match destination {
            Destination::Entity(_) => *origin as f64,
            Destination::Value(value) => stop_distance(origin, value),
        }
    });

    assert_eq!(
        matrix.row(&3),
        &[
            Destination::Value(2),
            Destination::Value(4),
            Destination::Value(5),
            Destination::Entity(0),
        ]
    );
    assert_eq!(matrix.destination(&3, 1), Some(&Destination::Value(4)));
    assert!(matrix.row(&7).is_empty());
}

#[test]
fn matrix_rows_are_truncated_to_the_size_cap() {
    let destinations: Vec<Destination<usize>> = (0..10).map(Destination::Value).collect();
    let matrix = NearbyDistanceMatrix::build(0..10usize, &destinations, 3, |origin, destination| {
        match destination {
            Destination::Value(value) => stop_distance(origin, value),
            Destination::Entity(_) => f64::MAX,
        }
    });

    assert_eq!(matrix.origin_count(), 10);
    assert_eq!(matrix.row_len(), 3);
    assert_eq!(matrix.row(&9), &[Destination::Value(9), Destination::Value(8), Destination::Value(7)]);
}

#[test]
fn oversized_matrix_is_a_capacity_error() {
    assert!(check_matrix_capacity(1_000, 1_000).is_ok());
    assert!(matches!(
        check_matrix_capacity(100_000, 100_000),
        Err(ListForgeError::Capacity(_))
    ));
    assert!(check_matrix_capacity(usize::MAX, 2).is_err());
}

#[test]
fn equal_demands_share_one_matrix() {
    let solution = plan(&[&[1, 5, 9], &[2, 20]]);
    let mut supply_manager = SupplyManager::new();

    let first = supply_manager.acquire(&demand(&solution, usize::MAX));
    let second = supply_manager.acquire(&demand(&solution, usize::MAX));
    assert!(Arc::ptr_eq(&first, &second));
    assert!(!first.is_initialized());

    first.read();
    assert!(second.is_initialized());

    let capped = supply_manager.acquire(&demand(&solution, 2));
    assert!(!Arc::ptr_eq(&first, &capped));
}

#[test]
fn released_demand_is_rebuilt_on_next_acquire() {
    let solution = plan(&[&[1, 5, 9], &[2, 20]]);
    let mut supply_manager = SupplyManager::new();

    let first = supply_manager.acquire(&demand(&solution, usize::MAX));
    first.read();
    assert!(supply_manager.release(&demand(&solution, usize::MAX)));
    assert_eq!(supply_manager.active_count(&demand(&solution, usize::MAX)), 0);

    let again = supply_manager.acquire(&demand(&solution, usize::MAX));
    assert!(!Arc::ptr_eq(&first, &again));
    assert!(!again.is_initialized());
    assert_eq!(again.read().origin_count(), 5);
}

type Recording = MimicRecordingElementSelector<Plan, FromListElementSelector<Plan, usize>>;

fn nearby_destinations(order: SelectionOrder) -> (Recording, NearbyDestinationSelector<Plan, usize, FnDistanceMeter<Plan, usize>>) {
    let random = WorkingRandom::seeded(77);
    let recording = MimicRecordingElementSelector::new(
        FromListElementSelector::original(list_variable()),
        MimicRecorder::new("nearby origin"),
    );
    let nearby = NearbyDestinationSelector::new(
        MimicReplayingElementSelector::new(recording.recorder()),
        meter(),
        list_variable(),
        NearbyRandom::default(),
        order,
        random,
    );
    (recording, nearby)
}

#[test]
fn nearby_destinations_walk_the_origin_row() {
    let director = create_director(plan(&[&[1, 5, 9], &[2, 20]]));
    let mut supply_manager = SupplyManager::new();
    let (recording, mut nearby) = nearby_destinations(SelectionOrder::Original);
    nearby.solving_started(&mut supply_manager, &director).unwrap();
    nearby.phase_started(&director).unwrap();

    let mut origins = recording.iter(&director);
    assert_eq!(origins.next(), Some(ElementRef::new(0, 0)));
    // Origin stop 1: itself, both depots and stop 2 at distance <= 1, then 5, 9, 20.
    assert_eq!(
        nearby.iter(&director).collect::<Vec<_>>(),
        vec![
            ElementRef::new(0, 1),
            ElementRef::new(0, 0),
            ElementRef::new(1, 0),
            ElementRef::new(1, 1),
            ElementRef::new(0, 2),
            ElementRef::new(0, 3),
            ElementRef::new(1, 2),
        ]
    );

    assert_eq!(origins.next(), Some(ElementRef::new(0, 1)));
    assert_eq!(nearby.iter(&director).next(), Some(ElementRef::new(0, 2)));

    drop(origins);
    nearby.solving_ended(&mut supply_manager);
    assert!(supply_manager.is_empty());
}

#[test]
fn random_nearby_destinations_favor_close_stops() {
    let director = create_director(plan(&[&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]]));
    let mut supply_manager = SupplyManager::new();
    let (recording, mut nearby) = nearby_destinations(SelectionOrder::Random);
    nearby.solving_started(&mut supply_manager, &director).unwrap();
    nearby.phase_started(&director).unwrap();

    let mut origins = recording.iter(&director);
    origins.next();
    let draws: Vec<ElementRef> = nearby.iter(&director).take(5_000).collect();
    // Origin stop 1; slot 1 follows stop 1 itself, slot 10 follows stop 10.
    let near = draws.iter().filter(|d| d.index <= 2).count();
    let far = draws.iter().filter(|d| d.index >= 9).count();
    assert!(near > far * 3, "near {near}, far {far}");
}

#[test]
fn two_nearby_selectors_share_the_matrix_demand() {
    let director = create_director(plan(&[&[1, 5, 9], &[2, 20]]));
    let mut supply_manager = SupplyManager::new();
    let (_, mut first) = nearby_destinations(SelectionOrder::Original);
    let (_, mut second) = nearby_destinations(SelectionOrder::Original);

    first.solving_started(&mut supply_manager, &director).unwrap();
    second.solving_started(&mut supply_manager, &director).unwrap();
    assert_eq!(supply_manager.len(), 1);
    assert_eq!(
        supply_manager.active_count(&demand(director.working_solution(), usize::MAX)),
        2
    );

    first.solving_ended(&mut supply_manager);
    assert_eq!(supply_manager.len(), 1);
    second.solving_ended(&mut supply_manager);
    assert!(supply_manager.is_empty());
}

#[test]
#[should_panic(expected = "outside its solving lifecycle")]
fn reading_before_solving_started_panics() {
    let director = create_director(plan(&[&[1, 5]]));
    let (recording, nearby) = nearby_destinations(SelectionOrder::Original);
    recording.iter(&director).next();
    let _ = nearby.iter(&director).count();
}

#[test]
fn nearby_sub_lists_start_near_the_origin_head() {
    let director = create_director(plan(&[&[1, 2, 3], &[10, 11, 12, 13]]));
    let mut supply_manager = SupplyManager::new();
    let recording = MimicRecordingSubListSelector::new(
        FromSolutionSubListSelector::new(list_variable(), 2, 2, SelectionOrder::Original, WorkingRandom::seeded(0))
            .unwrap(),
        MimicRecorder::new("nearby sub-list origin"),
    );
    let mut nearby = NearbySubListSelector::new(
        MimicReplayingSubListSelector::replaying(&recording),
        meter(),
        list_variable(),
        2,
        3,
        NearbyRandom::default(),
        SelectionOrder::Original,
        WorkingRandom::seeded(0),
    )
    .unwrap();
    nearby.solving_started(&mut supply_manager, &director).unwrap();
    nearby.phase_started(&director).unwrap();

    let mut origins = SubListSelector::<Plan>::iter(&recording, &director);
    assert_eq!(origins.next(), Some(SubList::new(0, 0, 2)));
    let sub_lists: Vec<SubList> = nearby.iter(&director).collect();
    // Stop 1 ranks 1, 2, 3, 10...; 3 and 13 are too close to their list end.
    assert_eq!(&sub_lists[..3], &[SubList::new(0, 0, 2), SubList::new(0, 0, 3), SubList::new(0, 1, 2)]);
    assert!(sub_lists.iter().all(|s| s.length >= 2 && s.to_index() <= if s.entity_index == 0 { 3 } else { 4 }));
    assert_eq!(sub_lists.len(), 3 + 5);
}

#[test]
fn random_nearby_sub_lists_respect_bounds() {
    let director = create_director(plan(&[&[1, 2, 3], &[10, 11, 12, 13]]));
    let mut supply_manager = SupplyManager::new();
    let random = WorkingRandom::seeded(9);
    let recording = MimicRecordingSubListSelector::new(
        FromSolutionSubListSelector::new(list_variable(), 2, 3, SelectionOrder::Random, random.clone()).unwrap(),
        MimicRecorder::new("nearby sub-list origin"),
    );
    let mut nearby = NearbySubListSelector::new(
        MimicReplayingSubListSelector::replaying(&recording),
        meter(),
        list_variable(),
        2,
        3,
        NearbyRandom::default(),
        SelectionOrder::Random,
        random,
    )
    .unwrap();
    nearby.solving_started(&mut supply_manager, &director).unwrap();
    nearby.phase_started(&director).unwrap();

    let mut origins = SubListSelector::<Plan>::iter(&recording, &director);
    for _ in 0..200 {
        origins.next();
        let sub_list = nearby.iter(&director).next().unwrap();
        let len = if sub_list.entity_index == 0 { 3 } else { 4 };
        assert!((2..=3).contains(&sub_list.length));
        assert!(sub_list.to_index() <= len);
    }
}
