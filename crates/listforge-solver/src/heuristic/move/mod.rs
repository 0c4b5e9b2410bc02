//! Move system for modifying list variables.
//!
//! Moves are the only operations that mutate list variables during search.
//! Every move can tell whether it is doable, apply itself with before/after
//! notifications, build its exact inverse, and rebase itself onto another
//! working state.
//!
//! # Architecture
//!
//! - `ListChangeMove<S, V>` - relocates a single element
//! - `ListSwapMove<S, V>` - swaps two elements
//! - `SubListChangeMove<S, V>` - relocates a contiguous sub-list, optionally reversed
//! - `SubListSwapMove<S, V>` - swaps two contiguous sub-lists, optionally reversed
//! - `ListAssignMove<S, V>` - adds an unassigned value to a list
//! - `ListUnassignMove<S, V>` - removes a value from its list (undo-only)
//! - `TwoOptMove<S, V>` - classic 2-opt edge exchange within one list
//! - `KOptListMove<S, V>` - compound edge exchange expressed as sub-list flips
//! - `ListRestoreMove<S, V>` - overwrites a whole list (k-opt/2-opt undo)
//! - `ListMoveImpl<S, V>` - closed enum over all of the above

mod k_opt;
mod list_assign;
mod list_change;
mod list_move;
mod list_swap;
mod list_unassign;
mod restore;
mod sublist_change;
mod sublist_swap;
mod traits;
mod two_opt;

#[cfg(test)]
mod tests;

pub use k_opt::{flip_sublist, FlipSublist, KOptListMove};
pub use list_assign::ListAssignMove;
pub use list_change::ListChangeMove;
pub use list_move::ListMoveImpl;
pub use list_swap::ListSwapMove;
pub use list_unassign::ListUnassignMove;
pub use restore::ListRestoreMove;
pub use sublist_change::SubListChangeMove;
pub use sublist_swap::SubListSwapMove;
pub use traits::Move;
pub use two_opt::TwoOptMove;
