//! Selectors for list elements, destinations, sub-lists and moves.
//!
//! Element-level selectors enumerate what a move touches; move selectors
//! combine them into concrete list moves. Nearby and mimic selectors
//! correlate a destination with the element another selector just picked.

pub mod cached;
pub mod destination;
pub mod element;
pub mod entity;
pub mod k_opt;
pub mod lifecycle;
pub mod list_change;
pub mod list_swap;
pub mod mimic;
pub mod nearby;
pub mod random;
pub(crate) mod selection_order;
pub mod sublist;
pub mod sublist_change;
pub mod sublist_swap;
pub mod triangle;
pub mod typed_move_selector;
pub mod value;

pub use cached::CachingElementSelector;
pub use destination::{DestinationSelector, ElementDestinationSelector};
pub use element::{ElementSelector, FromListElementSelector, ValueElementSelector};
pub use entity::{EntitySelector, FromSolutionEntitySelector};
pub use k_opt::{KOptDescriptor, KOptListMoveSelector, Ring};
pub use lifecycle::SelectorLifecycle;
pub use list_change::ListChangeMoveSelector;
pub use list_swap::ListSwapMoveSelector;
pub use mimic::{
    MimicRecorder, MimicRecordingElementSelector, MimicRecordingSubListSelector,
    MimicReplayingElementSelector, MimicReplayingSubListSelector,
};
pub use nearby::{
    Destination, FnDistanceMeter, ListDistanceMeter, NearbyDestinationSelector,
    NearbyDistanceMatrix, NearbyRandom, NearbySubListSelector,
};
pub use random::WorkingRandom;
pub use selection_order::SelectionOrder;
pub use sublist::{FromSolutionSubListSelector, SubListSelector};
pub use sublist_change::SubListChangeMoveSelector;
pub use sublist_swap::SubListSwapMoveSelector;
pub use triangle::{count_sub_lists, TriangleElement, TriangularSampler};
pub use typed_move_selector::MoveSelector;
pub use value::{AssignedValueSelector, ValueSelector};
