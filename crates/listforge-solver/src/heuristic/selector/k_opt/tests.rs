//! Tests for the k-opt descriptor, generator and selector.

use smallvec::smallvec;

use listforge_config::KOptMoveSelectorConfig;
use listforge_core::ListForgeError;
use listforge_scoring::{RecordingScoreDirector, ScoreDirector};
use listforge_test::{create_director, list_variable, plan, routes};

use super::descriptor::{KOptDescriptor, Ring};
use super::generator::{KOptGenerator, KOptOutcome};
use super::selector::{binomial, KOptListMoveSelector};
use crate::heuristic::r#move::{flip_sublist, FlipSublist, ListMoveImpl, Move};
use crate::heuristic::selector::random::WorkingRandom;
use crate::heuristic::selector::typed_move_selector::MoveSelector;

fn normalized(edge: (usize, usize)) -> (usize, usize) {
    (edge.0.min(edge.1), edge.0.max(edge.1))
}

/// Edges the tour should have once `descriptor` is applied.
fn expected_edges(descriptor: &KOptDescriptor) -> Vec<(usize, usize)> {
    let n = descriptor.ring().size();
    let removed: Vec<_> = descriptor.removed_edges().map(normalized).collect();
    let mut edges: Vec<_> = (0..n)
        .map(|i| normalized((i, (i + 1) % n)))
        .filter(|edge| !removed.contains(edge))
        .chain(descriptor.added_edges().map(normalized))
        .collect();
    edges.sort_unstable();
    edges
}

fn tour_edges(tour: &[usize]) -> Vec<(usize, usize)> {
    let n = tour.len();
    let mut edges: Vec<_> = (0..n)
        .map(|i| normalized((tour[i], tour[(i + 1) % n])))
        .collect();
    edges.sort_unstable();
    edges
}

fn apply(descriptor: &KOptDescriptor) -> Vec<usize> {
    let (flips, shift) = descriptor
        .reversals()
        .unwrap_or_else(|| panic!("{descriptor:?} has no reversal sequence"));
    let mut tour: Vec<usize> = (0..descriptor.ring().size()).collect();
    for flip in &flips {
        flip_sublist(&mut tour, *flip);
    }
    tour.rotate_left(shift);
    tour
}

#[test]
fn ring_neighbours_wrap() {
    let ring = Ring::new(5);
    assert_eq!(ring.successor(4), 0);
    assert_eq!(ring.predecessor(0), 4);
    assert_eq!(ring.predecessor(3), 2);
    assert_eq!(ring.offset(3, 1), 3);
    assert!(ring.is_between(3, 0, 1));
    assert!(!ring.is_between(3, 2, 1));
}

#[test]
fn three_opt_descriptor_is_feasible() {
    let descriptor = KOptDescriptor::sequential(Ring::new(8), &[0, 1, 2, 5, 4, 7, 6]);

    assert_eq!(descriptor.k(), 3);
    assert!(descriptor.is_feasible());
    assert_eq!(descriptor.cycles().count, 1);
    assert_eq!(
        descriptor.added_edges().collect::<Vec<_>>(),
        vec![(1, 6), (2, 5), (4, 7)]
    );
}

#[test]
fn three_opt_descriptor_decomposes_into_flips() {
    let descriptor = KOptDescriptor::sequential(Ring::new(8), &[0, 1, 2, 5, 4, 7, 6]);

    let (flips, shift) = descriptor.reversals().unwrap();
    assert_eq!(flips.as_slice(), &[FlipSublist::new(2, 7), FlipSublist::new(4, 7)]);
    assert_eq!(shift, 0);
    assert_eq!(apply(&descriptor), vec![0, 1, 6, 5, 2, 3, 4, 7]);
}

#[test]
fn two_disjoint_cycles_are_infeasible() {
    // Removing (1,2) and (5,6) and adding (1,6), (2,5) leaves 0-1-6-7 and 2-3-4-5.
    let descriptor = KOptDescriptor::sequential(Ring::new(8), &[0, 1, 2, 5, 6]);

    assert!(!descriptor.is_feasible());
    let info = descriptor.cycles();
    assert_eq!(info.count, 2);
    assert_eq!(info.slot_cycle.as_slice(), &[0, 2, 1, 1, 2]);
    assert_eq!(descriptor.cycle_of(3, &info.slot_cycle), Some(1));
    assert_eq!(descriptor.cycle_of(7, &info.slot_cycle), Some(2));
    assert_eq!(descriptor.shortest_cycle(&info), 1);
    assert!(descriptor.reversals().is_none());
    assert!(descriptor.to_list_move(0, list_variable()).is_empty());
}

#[test]
fn explicit_partner_table_describes_patched_exchange() {
    // The two-cycle exchange above, bridged by removing (2,3) and (7,0)
    // and adding (3,7) and (0,2).
    let descriptor = KOptDescriptor::new(
        Ring::new(8),
        &[0, 1, 2, 5, 6, 2, 3, 7, 0],
        smallvec![0, 4, 3, 2, 1, 8, 7, 6, 5],
    );

    assert_eq!(descriptor.k(), 4);
    assert!(descriptor.is_feasible());
    let tour = apply(&descriptor);
    assert_eq!(tour[0], 0);
    assert_eq!(tour_edges(&tour), expected_edges(&descriptor));
}

#[test]
fn generated_exchanges_rewire_exactly_their_edges() {
    let mut found = 0;
    for seed in 0..60 {
        let random = WorkingRandom::seeded(seed);
        let n = 9 + (seed as usize % 7);
        let k = 3 + (seed as usize % 3);
        let generator = KOptGenerator::new(Ring::new(n), &random, k);

        let Some(descriptor) = generator.pick(k).into_descriptor() else {
            continue;
        };
        found += 1;
        assert!(descriptor.is_feasible(), "{descriptor:?}");
        assert!(descriptor.k() >= k);

        let tour = apply(&descriptor);
        let mut sorted = tour.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..n).collect::<Vec<_>>());
        assert_eq!(tour[0], 0);
        assert_eq!(tour_edges(&tour), expected_edges(&descriptor), "{descriptor:?}");
    }
    assert!(found >= 10, "only {found} of 60 draws produced an exchange");
}

#[test]
fn patching_merges_two_cycles() {
    let descriptor = KOptDescriptor::sequential(Ring::new(8), &[0, 1, 2, 5, 6]);
    let mut patched = 0;
    for seed in 0..50 {
        let random = WorkingRandom::seeded(seed);
        let generator = KOptGenerator::new(Ring::new(8), &random, 3);
        if let Some(result) = generator.patch_cycles(&descriptor) {
            patched += 1;
            assert!(result.is_feasible());
            assert_eq!(result.k(), 4);
            let tour = apply(&result);
            assert_eq!(tour_edges(&tour), expected_edges(&result));
        }
    }
    assert!(patched > 0);
}

#[test]
fn too_many_cycles_are_not_patched() {
    let descriptor = KOptDescriptor::sequential(Ring::new(8), &[0, 1, 2, 5, 6]);
    let random = WorkingRandom::seeded(1);
    let generator = KOptGenerator::new(Ring::new(8), &random, 1);
    assert!(generator.patch_cycles(&descriptor).is_none());
}

#[test]
fn tiny_ring_yields_nothing() {
    let random = WorkingRandom::seeded(3);
    let generator = KOptGenerator::new(Ring::new(3), &random, 3);
    assert_eq!(generator.pick(3), KOptOutcome::NotFound);
}

#[test]
fn binomial_counts_and_saturates() {
    assert_eq!(binomial(5, 2), 10);
    assert_eq!(binomial(5, 0), 1);
    assert_eq!(binomial(3, 4), 0);
    assert_eq!(binomial(usize::MAX, usize::MAX / 2), usize::MAX);
}

#[test]
fn selector_rejects_bad_k() {
    let random = WorkingRandom::seeded(0);
    assert!(matches!(
        KOptListMoveSelector::new(list_variable(), 1, 3, random.clone()),
        Err(ListForgeError::Config(_))
    ));
    assert!(matches!(
        KOptListMoveSelector::new(list_variable(), 4, 3, random.clone()),
        Err(ListForgeError::Config(_))
    ));
    let config = KOptMoveSelectorConfig {
        minimum_k: 3,
        maximum_k: 2,
    };
    assert!(KOptListMoveSelector::from_config(&config, list_variable(), random).is_err());
}

#[test]
fn default_config_yields_two_opt() {
    let director = create_director(plan(&[&[0, 1, 2, 3, 4, 5, 6, 7]]));
    let selector = KOptListMoveSelector::from_config(
        &KOptMoveSelectorConfig::default(),
        list_variable(),
        WorkingRandom::seeded(5),
    )
    .unwrap();

    assert!(selector.is_never_ending());
    assert_eq!(selector.size(&director), 28);
    for m in selector.iter_moves(&director).take(20) {
        let ListMoveImpl::TwoOpt(two_opt) = m else {
            panic!("expected a 2-opt move");
        };
        let (first, second) = two_opt.edges();
        assert!(first < second && second < 8);
    }
}

#[test]
fn k_opt_moves_keep_the_stops_and_undo() {
    let stops: Vec<usize> = (10..22).collect();
    let mut director = create_director(plan(&[&stops[..], &[1, 2]]));
    let selector = KOptListMoveSelector::new(list_variable(), 3, 4, WorkingRandom::seeded(17)).unwrap();

    let moves: Vec<_> = selector.iter_moves(&director).take(40).collect();
    let mut applied = 0;
    for m in &moves {
        if !m.is_doable(&director) {
            continue;
        }
        applied += 1;
        let before = routes(director.working_solution());
        {
            let mut recording = RecordingScoreDirector::new(&mut director);
            m.do_move(&mut recording);
            let after = routes(recording.working_solution());
            assert_eq!(after[0][0], 10);
            let mut sorted = after[0].clone();
            sorted.sort_unstable();
            assert_eq!(sorted, stops);
            assert_ne!(after, before);
            recording.undo_changes();
        }
        assert_eq!(routes(director.working_solution()), before);
    }
    assert!(applied > 0);
}

#[test]
fn short_lists_fall_back_to_two_opt() {
    let director = create_director(plan(&[&[1, 2], &[3]]));
    let selector = KOptListMoveSelector::new(list_variable(), 3, 3, WorkingRandom::seeded(2)).unwrap();

    let m = selector.iter_moves(&director).next().unwrap();
    let ListMoveImpl::TwoOpt(two_opt) = m else {
        panic!("expected a 2-opt move");
    };
    assert_eq!(two_opt.entity_index(), 0);
    assert_eq!(two_opt.edges(), (0, 1));
}

#[test]
fn no_long_list_yields_empty_move() {
    let director = create_director(plan(&[&[1], &[]]));
    let selector = KOptListMoveSelector::new(list_variable(), 2, 3, WorkingRandom::seeded(2)).unwrap();

    let m = selector.iter_moves(&director).next().unwrap();
    let ListMoveImpl::KOpt(kopt) = &m else {
        panic!("expected an empty k-opt move");
    };
    assert!(kopt.is_empty());
    assert!(!m.is_doable(&director));
}

#[test]
fn no_entities_yield_empty_moves() {
    let director = create_director(plan(&[]));
    let selector = KOptListMoveSelector::new(list_variable(), 2, 3, WorkingRandom::seeded(2)).unwrap();

    let moves: Vec<_> = selector.iter_moves(&director).take(3).collect();
    assert_eq!(moves.len(), 3);
    for m in &moves {
        let ListMoveImpl::KOpt(kopt) = m else {
            panic!("expected an empty k-opt move");
        };
        assert!(kopt.is_empty());
        assert!(!m.is_doable(&director));
    }
}

#[test]
fn three_opt_prefers_lists_with_room() {
    let long: Vec<usize> = (10..30).collect();
    let director = create_director(plan(&[&[1, 2, 3], &long[..]]));
    let selector = KOptListMoveSelector::new(list_variable(), 3, 3, WorkingRandom::seeded(4)).unwrap();
    let solution = director.working_solution();

    for _ in 0..50 {
        assert_eq!(selector.pick_entity(solution, 3), Some((1, 3)));
    }
    let found = selector
        .iter_moves(&director)
        .take(20)
        .filter(|m| m.is_doable(&director))
        .count();
    assert!(found > 0);
}

#[test]
fn short_lists_still_qualify_without_roomier_ones() {
    let director = create_director(plan(&[&[1, 2, 3], &[4, 5, 6, 7]]));
    let selector = KOptListMoveSelector::new(list_variable(), 3, 3, WorkingRandom::seeded(4)).unwrap();
    let solution = director.working_solution();

    let picked: Vec<_> = (0..40).filter_map(|_| selector.pick_entity(solution, 3)).collect();
    assert_eq!(picked.len(), 40);
    assert!(picked.iter().all(|&(entity, k)| entity < 2 && k == 3));
    assert!(picked.iter().any(|&(entity, _)| entity == 0));
    assert!(picked.iter().any(|&(entity, _)| entity == 1));
}
