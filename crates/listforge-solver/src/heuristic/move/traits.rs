//! Move trait definition.

use std::fmt::Debug;

use listforge_core::domain::PlanningSolution;
use listforge_scoring::ScoreDirector;

/// A move that modifies one or more list variables.
///
/// Moves are fully typed; the search loop dispatches through this trait only.
///
/// # Type Parameters
/// * `S` - The planning solution type
///
/// # Implementation Notes
/// - `do_move` brackets every mutation with before/after notifications and
///   registers a typed undo closure, so `RecordingScoreDirector::undo_changes`
///   restores the previous state
/// - `create_undo_move` must be called before `do_move`: the inverse is built
///   from the pre-mutation positions
/// - Methods are generic over D to allow use with both concrete directors and
///   `RecordingScoreDirector`
pub trait Move<S: PlanningSolution>: Send + Sync + Debug {
    /// The move that reverts this one.
    type Undo: Move<S>;

    /// Returns true if this move can be executed in the current state.
    ///
    /// A move is not doable if:
    /// - A referenced position no longer exists in the current lists
    /// - Executing it would not change anything
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool;

    /// Executes this move, modifying the working solution.
    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D);

    /// Returns the exact inverse of this move, for the current state.
    fn create_undo_move<D: ScoreDirector<S>>(&self, score_director: &D) -> Self::Undo;

    /// Re-resolves this move against another, structurally equal working state.
    fn rebase<D: ScoreDirector<S>>(&self, destination: &D) -> Self
    where
        Self: Sized;

    /// Returns the descriptor index of the entity type this move affects.
    fn descriptor_index(&self) -> usize;

    /// Returns the entity indices involved in this move.
    fn entity_indices(&self) -> &[usize];

    /// Returns the variable name this move affects.
    fn variable_name(&self) -> &str;
}
