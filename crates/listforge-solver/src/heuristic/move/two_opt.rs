//! TwoOptMove - classic 2-opt edge exchange within one list.
//!
//! The list is read as a closed tour: position `i` is connected to `i + 1`
//! and the last position back to the first. Removing the edges leaving
//! positions `first` and `second` and reconnecting the tour reverses the
//! run between them. The element at position 0 never moves.

use std::fmt::{self, Debug};

use listforge_core::domain::{ListVariable, PlanningSolution};
use listforge_scoring::ScoreDirector;

use super::{ListRestoreMove, Move};

/// A 2-opt move on one entity's list.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The list element value type
pub struct TwoOptMove<S, V> {
    entity_index: usize,
    list_size: usize,
    first: usize,
    second: usize,
    variable: ListVariable<S, V>,
}

impl<S, V> Clone for TwoOptMove<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for TwoOptMove<S, V> {}

impl<S, V: Debug> Debug for TwoOptMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoOptMove")
            .field("entity_index", &self.entity_index)
            .field("edges", &[(self.first, self.second)])
            .field("variable_name", &self.variable.variable_name())
            .finish()
    }
}

impl<S, V> TwoOptMove<S, V> {
    /// Creates a 2-opt move removing the tour edges that leave `first` and `second`.
    ///
    /// # Arguments
    /// * `entity_index` - Entity whose list is rewired
    /// * `list_size` - Length of the list when the move was generated
    /// * `first`, `second` - Start positions of the two removed edges, in any order
    /// * `variable` - Accessors for the list variable
    pub fn new(
        entity_index: usize,
        list_size: usize,
        first: usize,
        second: usize,
        variable: ListVariable<S, V>,
    ) -> Self {
        Self {
            entity_index,
            list_size,
            first: first.min(second),
            second: first.max(second),
            variable,
        }
    }

    pub fn entity_index(&self) -> usize {
        self.entity_index
    }

    /// Returns the two edge start positions, lowest first.
    pub fn edges(&self) -> (usize, usize) {
        (self.first, self.second)
    }

    fn is_valid_for(&self, list_size: usize) -> bool {
        list_size == self.list_size
            && self.second < list_size
            && self.first + 1 < self.second
            && !(self.first == 0 && self.second + 1 == list_size)
    }

    /// Applies the rewiring to a plain slice holding the list.
    pub fn rearrange<T>(&self, items: &mut [T]) {
        items[self.first + 1..=self.second].reverse();
    }
}

impl<S, V: Clone> TwoOptMove<S, V> {
    pub(crate) fn apply(&self, solution: &mut S) {
        let len = self.variable.list_size(solution, self.entity_index);
        let mut values = self
            .variable
            .remove_range(solution, self.entity_index, 0, len);
        self.rearrange(&mut values);
        self.variable
            .insert_all(solution, self.entity_index, 0, values);
    }
}

impl<S, V> Move<S> for TwoOptMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    type Undo = ListRestoreMove<S, V>;

    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let solution = score_director.working_solution();
        self.entity_index < self.variable.entity_count(solution)
            && self.is_valid_for(self.variable.list_size(solution, self.entity_index))
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        let descriptor = self.variable.descriptor_index();
        let name = self.variable.variable_name();
        let entity = self.entity_index;
        let (from, to) = (self.first + 1, self.second + 1);

        let previous = self
            .variable
            .snapshot(score_director.working_solution(), entity);
        score_director.before_list_variable_changed(descriptor, entity, name, from, to);
        self.apply(score_director.working_solution_mut());
        score_director.after_list_variable_changed(descriptor, entity, name, from, to);

        let undo = ListRestoreMove::new(entity, previous, self.variable);
        score_director.register_undo(Box::new(move |s: &mut S| undo.apply(s)));
    }

    fn create_undo_move<D: ScoreDirector<S>>(&self, score_director: &D) -> Self::Undo {
        let previous = self
            .variable
            .snapshot(score_director.working_solution(), self.entity_index);
        ListRestoreMove::new(self.entity_index, previous, self.variable)
    }

    fn rebase<D: ScoreDirector<S>>(&self, _destination: &D) -> Self {
        *self
    }

    fn descriptor_index(&self) -> usize {
        self.variable.descriptor_index()
    }

    fn entity_indices(&self) -> &[usize] {
        std::slice::from_ref(&self.entity_index)
    }

    fn variable_name(&self) -> &str {
        self.variable.variable_name()
    }
}
