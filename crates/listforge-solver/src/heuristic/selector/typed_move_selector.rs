//! Typed move selectors.
//!
//! Move selectors combine element, sub-list and destination selectors into
//! concrete moves. They yield move types directly so move generation stays
//! monomorphized.

use std::fmt::Debug;

use listforge_core::domain::PlanningSolution;
use listforge_scoring::ScoreDirector;

use crate::heuristic::r#move::Move;

use super::lifecycle::SelectorLifecycle;

/// A typed move selector that yields moves of type `M` directly.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type
pub trait MoveSelector<S: PlanningSolution, M: Move<S>>: SelectorLifecycle<S> + Send + Debug {
    /// Returns an iterator over typed moves.
    ///
    /// Moves are built against the current working solution and may turn
    /// out not doable; callers check [`Move::is_doable`] before applying.
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
    ) -> impl Iterator<Item = M> + 'a;

    /// Returns the approximate number of moves.
    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize;

    /// Returns true if this selector may return the same move multiple times.
    fn is_never_ending(&self) -> bool {
        false
    }
}
