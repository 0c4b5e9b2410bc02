//! Heuristic components for list local search
//!
//! This module contains:
//! - Moves: Operations that modify list variables
//! - Selectors: Components that enumerate elements, destinations, and moves

pub mod r#move;
pub mod selector;

// Re-export move types
pub use r#move::{
    KOptListMove, ListAssignMove, ListChangeMove, ListMoveImpl, ListRestoreMove, ListSwapMove,
    ListUnassignMove, Move, SubListChangeMove, SubListSwapMove, TwoOptMove,
};

// Re-export selector types
pub use selector::{
    CachingElementSelector, DestinationSelector, ElementDestinationSelector, ElementSelector,
    EntitySelector, FromListElementSelector, FromSolutionEntitySelector,
    FromSolutionSubListSelector, KOptListMoveSelector, ListChangeMoveSelector,
    ListDistanceMeter, ListSwapMoveSelector, MimicRecorder, MimicRecordingElementSelector,
    MimicReplayingElementSelector, MoveSelector, NearbyDestinationSelector, NearbyRandom,
    NearbySubListSelector, SelectionOrder, SelectorLifecycle, SubListChangeMoveSelector,
    SubListSelector, SubListSwapMoveSelector, ValueSelector, WorkingRandom,
};
