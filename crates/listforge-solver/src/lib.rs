//! ListForge move generation engine
//!
//! This crate provides the moves and selectors of list-variable local search:
//! - List moves (change, swap, sub-list change/swap, 2-opt, k-opt, assign)
//! - Element, destination and sub-list selectors
//! - Nearby selection backed by shared distance matrices
//! - Randomized k-opt construction with cycle patching
//! - Configuration wiring (builder module)

pub mod builder;
pub mod heuristic;

pub use builder::{ElementSource, ListMoveSelectorBuilder, ListMoveSelectorImpl};
pub use heuristic::{
    // Move types
    KOptListMove,
    ListAssignMove,
    ListChangeMove,
    ListMoveImpl,
    ListRestoreMove,
    ListSwapMove,
    ListUnassignMove,
    Move,
    SubListChangeMove,
    SubListSwapMove,
    TwoOptMove,
    // Selectors
    CachingElementSelector,
    DestinationSelector,
    ElementDestinationSelector,
    ElementSelector,
    EntitySelector,
    FromListElementSelector,
    FromSolutionEntitySelector,
    FromSolutionSubListSelector,
    KOptListMoveSelector,
    ListChangeMoveSelector,
    ListDistanceMeter,
    ListSwapMoveSelector,
    MimicRecorder,
    MimicRecordingElementSelector,
    MimicReplayingElementSelector,
    MoveSelector,
    NearbyDestinationSelector,
    NearbyRandom,
    NearbySubListSelector,
    SelectionOrder,
    SelectorLifecycle,
    SubListChangeMoveSelector,
    SubListSelector,
    SubListSwapMoveSelector,
    ValueSelector,
    WorkingRandom,
};
