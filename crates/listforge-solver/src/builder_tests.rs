//! Tests for the list move selector builder.

use listforge_config::{
    KOptMoveSelectorConfig, ListChangeMoveConfig, ListForgeConfig, ListSwapMoveConfig,
    MoveSelectorConfig, NearbySelectionConfig, SelectionCacheType, SelectionOrder as ConfiguredOrder,
    SubListChangeMoveConfig, SubListSwapMoveConfig,
};
use listforge_core::domain::SupplyManager;
use listforge_core::ListForgeError;
use listforge_test::{create_director, list_variable, plan, stop_distance, Plan};

use super::*;
use crate::heuristic::r#move::Move;
use crate::heuristic::selector::nearby::Destination;

type Meter = FnDistanceMeter<Plan, usize>;

fn plan_distance(_: &Plan, origin: &usize, destination: &Destination<usize>) -> f64 {
    match destination {
        Destination::Entity(_) => *origin as f64,
        Destination::Value(value) => stop_distance(origin, value),
    }
}

fn meter() -> Meter {
    FnDistanceMeter::new("stop distance", plan_distance)
}

fn build(config: MoveSelectorConfig, meter: Option<Meter>) -> Result<ListMoveSelectorImpl<Plan, usize>> {
    ListMoveSelectorBuilder::build(&config, list_variable(), &WorkingRandom::seeded(11), meter)
}

fn original_change(cache_type: SelectionCacheType) -> MoveSelectorConfig {
    MoveSelectorConfig::ListChangeMoveSelector(ListChangeMoveConfig {
        selection_order: ConfiguredOrder::Original,
        cache_type,
        nearby_selection: None,
    })
}

#[test]
fn builds_exhaustive_list_change() {
    let director = create_director(plan(&[&[1, 2, 3], &[4, 5]]));
    let selector = build(original_change(SelectionCacheType::JustInTime), None).unwrap();

    assert!(matches!(selector, ListMoveSelectorImpl::Change(_)));
    assert!(!selector.is_never_ending());
    let moves: Vec<_> = selector.iter_moves(&director).collect();
    assert_eq!(moves.len(), 25);
    assert!(moves
        .iter()
        .all(|m| matches!(m, ListMoveImpl::Change(_)) && m.is_doable(&director)));
}

#[test]
fn step_cache_is_filled_by_the_lifecycle() {
    let director = create_director(plan(&[&[1, 2, 3], &[4, 5]]));
    let mut selector = build(original_change(SelectionCacheType::Step), None).unwrap();
    let mut supply_manager = SupplyManager::new();

    selector.solving_started(&mut supply_manager, &director).unwrap();
    selector.phase_started(&director).unwrap();
    selector.step_started(&director);
    assert_eq!(selector.iter_moves(&director).count(), 25);
    selector.phase_ended();
    selector.solving_ended(&mut supply_manager);
}

#[test]
fn nearby_change_requires_a_meter() {
    let config = MoveSelectorConfig::ListChangeMoveSelector(ListChangeMoveConfig {
        nearby_selection: Some(NearbySelectionConfig::linear(3)),
        ..ListChangeMoveConfig::default()
    });
    assert!(matches!(build(config, None), Err(ListForgeError::Config(_))));
}

#[test]
fn nearby_change_yields_change_moves() {
    let director = create_director(plan(&[&[1, 5, 9], &[2, 20]]));
    let config = MoveSelectorConfig::ListChangeMoveSelector(ListChangeMoveConfig {
        nearby_selection: Some(NearbySelectionConfig::linear(3)),
        ..ListChangeMoveConfig::default()
    });
    let mut selector = build(config, Some(meter())).unwrap();
    let mut supply_manager = SupplyManager::new();

    assert!(matches!(selector, ListMoveSelectorImpl::NearbyChange(_)));
    selector.solving_started(&mut supply_manager, &director).unwrap();
    selector.phase_started(&director).unwrap();
    selector.step_started(&director);

    let moves: Vec<_> = selector.iter_moves(&director).take(30).collect();
    assert_eq!(moves.len(), 30);
    assert!(moves.iter().all(|m| matches!(m, ListMoveImpl::Change(_))));
    assert!(moves.iter().any(|m| m.is_doable(&director)));

    selector.phase_ended();
    selector.solving_ended(&mut supply_manager);
}

#[test]
fn nearby_sub_list_change_replays_the_sub_list_head() {
    let director = create_director(plan(&[&[1, 5, 9], &[2, 20, 21]]));
    let config = MoveSelectorConfig::SubListChangeMoveSelector(SubListChangeMoveConfig {
        nearby_selection: Some(NearbySelectionConfig::linear(4)),
        ..SubListChangeMoveConfig::default()
    });
    let mut selector = build(config, Some(meter())).unwrap();
    let mut supply_manager = SupplyManager::new();

    assert!(matches!(selector, ListMoveSelectorImpl::NearbySubListChange(_)));
    selector.solving_started(&mut supply_manager, &director).unwrap();
    selector.phase_started(&director).unwrap();

    let moves: Vec<_> = selector.iter_moves(&director).take(20).collect();
    assert_eq!(moves.len(), 20);
    assert!(moves.iter().all(|m| matches!(m, ListMoveImpl::SubListChange(_))));
    selector.solving_ended(&mut supply_manager);
}

#[test]
fn swap_and_sub_list_selectors_map_to_their_moves() {
    let director = create_director(plan(&[&[1, 2, 3], &[4, 5]]));

    let swap = build(
        MoveSelectorConfig::ListSwapMoveSelector(ListSwapMoveConfig {
            selection_order: ConfiguredOrder::Original,
            cache_type: SelectionCacheType::JustInTime,
        }),
        None,
    )
    .unwrap();
    assert!(swap
        .iter_moves(&director)
        .all(|m| matches!(m, ListMoveImpl::Swap(_))));

    let sub_list_swap = build(
        MoveSelectorConfig::SubListSwapMoveSelector(SubListSwapMoveConfig {
            selection_order: ConfiguredOrder::Original,
            ..SubListSwapMoveConfig::default()
        }),
        None,
    )
    .unwrap();
    let moves: Vec<_> = sub_list_swap.iter_moves(&director).collect();
    assert!(!moves.is_empty());
    assert!(moves.iter().all(|m| matches!(m, ListMoveImpl::SubListSwap(_))));

    let sub_list_change = build(
        MoveSelectorConfig::SubListChangeMoveSelector(SubListChangeMoveConfig::default()),
        None,
    )
    .unwrap();
    assert!(sub_list_change.is_never_ending());
    assert!(sub_list_change
        .iter_moves(&director)
        .take(10)
        .all(|m| matches!(m, ListMoveImpl::SubListChange(_))));
}

#[test]
fn invalid_k_range_is_rejected() {
    let config = MoveSelectorConfig::KOptListMoveSelector(KOptMoveSelectorConfig {
        minimum_k: 5,
        maximum_k: 3,
    });
    assert!(matches!(build(config, None), Err(ListForgeError::Config(_))));
}

#[test]
fn just_in_time_cache_builds_a_live_source() {
    let source: ElementSource<Plan, usize> = ElementSource::new(
        list_variable(),
        SelectionCacheType::JustInTime,
        SelectionOrder::Random,
        WorkingRandom::seeded(0),
    )
    .unwrap();
    assert!(matches!(source, ElementSource::JustInTime(_)));
    assert!(source.is_never_ending());
}

#[test]
fn seeded_configs_generate_identical_moves() {
    let director = create_director(plan(&[&[1, 2, 3, 4, 5, 6, 7], &[8, 9]]));
    let config = ListForgeConfig::new()
        .with_random_seed(42)
        .with_move_selector(MoveSelectorConfig::ListChangeMoveSelector(ListChangeMoveConfig::default()))
        .with_move_selector(MoveSelectorConfig::KOptListMoveSelector(KOptMoveSelectorConfig {
            minimum_k: 2,
            maximum_k: 4,
        }));

    let draw = || {
        let selectors =
            ListMoveSelectorBuilder::build_all::<Plan, usize, Meter>(&config, list_variable(), None).unwrap();
        assert_eq!(selectors.len(), 2);
        selectors
            .iter()
            .flat_map(|selector| selector.iter_moves(&director).take(10).collect::<Vec<_>>())
            .map(|m| format!("{m:?}"))
            .collect::<Vec<_>>()
    };
    assert_eq!(draw(), draw());
}
