//! ListSwapMove - exchanges two elements of list variables.

use std::fmt::{self, Debug};

use listforge_core::domain::{ElementRef, ListVariable, PlanningSolution};
use listforge_scoring::ScoreDirector;

use super::Move;

/// A move that swaps the elements at two list positions.
///
/// The positions may live in the same list or in two different lists. The
/// move is its own inverse.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The list element value type
pub struct ListSwapMove<S, V> {
    left: ElementRef,
    right: ElementRef,
    variable: ListVariable<S, V>,
    indices: [usize; 2],
}

impl<S, V> Clone for ListSwapMove<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for ListSwapMove<S, V> {}

impl<S, V: Debug> Debug for ListSwapMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListSwapMove")
            .field("left", &self.left)
            .field("right", &self.right)
            .field("variable_name", &self.variable.variable_name())
            .finish()
    }
}

impl<S, V> ListSwapMove<S, V> {
    /// Creates a new list swap move.
    pub fn new(left: ElementRef, right: ElementRef, variable: ListVariable<S, V>) -> Self {
        Self {
            left,
            right,
            variable,
            indices: [left.entity_index, right.entity_index],
        }
    }

    pub fn left(&self) -> ElementRef {
        self.left
    }

    pub fn right(&self) -> ElementRef {
        self.right
    }

    pub fn is_intra_list(&self) -> bool {
        self.left.entity_index == self.right.entity_index
    }

    pub(crate) fn apply(&self, solution: &mut S) {
        let (first, second) = if self.left <= self.right {
            (self.left, self.right)
        } else {
            (self.right, self.left)
        };

        // Remove the later slot first so the earlier index stays valid.
        let Some(second_value) =
            self.variable
                .remove(solution, second.entity_index, second.index)
        else {
            return;
        };
        let Some(first_value) = self
            .variable
            .remove(solution, first.entity_index, first.index)
        else {
            self.variable
                .insert(solution, second.entity_index, second.index, second_value);
            return;
        };
        self.variable
            .insert(solution, first.entity_index, first.index, second_value);
        self.variable
            .insert(solution, second.entity_index, second.index, first_value);
    }
}

impl<S, V> Move<S> for ListSwapMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    type Undo = Self;

    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        if self.left == self.right {
            return false;
        }
        let solution = score_director.working_solution();
        let entity_count = self.variable.entity_count(solution);
        [self.left, self.right].iter().all(|slot| {
            slot.entity_index < entity_count
                && slot.index < self.variable.list_size(solution, slot.entity_index)
        })
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        let descriptor = self.variable.descriptor_index();
        let name = self.variable.variable_name();
        let left = self.left;
        let right = self.right;

        if self.is_intra_list() {
            let from = left.index.min(right.index);
            let to = left.index.max(right.index) + 1;
            score_director.before_list_variable_changed(descriptor, left.entity_index, name, from, to);
            self.apply(score_director.working_solution_mut());
            score_director.after_list_variable_changed(descriptor, left.entity_index, name, from, to);
        } else {
            for slot in [left, right] {
                score_director.before_list_variable_changed(
                    descriptor,
                    slot.entity_index,
                    name,
                    slot.index,
                    slot.index + 1,
                );
            }
            self.apply(score_director.working_solution_mut());
            for slot in [left, right] {
                score_director.after_list_variable_changed(
                    descriptor,
                    slot.entity_index,
                    name,
                    slot.index,
                    slot.index + 1,
                );
            }
        }

        let undo = *self;
        score_director.register_undo(Box::new(move |s: &mut S| undo.apply(s)));
    }

    fn create_undo_move<D: ScoreDirector<S>>(&self, _score_director: &D) -> Self::Undo {
        *self
    }

    fn rebase<D: ScoreDirector<S>>(&self, _destination: &D) -> Self {
        *self
    }

    fn descriptor_index(&self) -> usize {
        self.variable.descriptor_index()
    }

    fn entity_indices(&self) -> &[usize] {
        if self.is_intra_list() {
            &self.indices[..1]
        } else {
            &self.indices
        }
    }

    fn variable_name(&self) -> &str {
        self.variable.variable_name()
    }
}
