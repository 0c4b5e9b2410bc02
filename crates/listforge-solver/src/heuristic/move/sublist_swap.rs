//! SubListSwapMove - exchanges two contiguous runs of elements.
//!
//! When both runs live in the same list they must not overlap; the move
//! keeps the earlier run as `left` so the index arithmetic stays simple.

use std::fmt::{self, Debug};

use listforge_core::domain::{ListVariable, PlanningSolution, SubList};
use listforge_scoring::ScoreDirector;

use super::Move;

/// A move that swaps two sub-lists, optionally reversing both.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The list element value type
pub struct SubListSwapMove<S, V> {
    left: SubList,
    right: SubList,
    reversing: bool,
    variable: ListVariable<S, V>,
    indices: [usize; 2],
}

impl<S, V> Clone for SubListSwapMove<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for SubListSwapMove<S, V> {}

impl<S, V: Debug> Debug for SubListSwapMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubListSwapMove")
            .field("left", &self.left)
            .field("right", &self.right)
            .field("reversing", &self.reversing)
            .field("variable_name", &self.variable.variable_name())
            .finish()
    }
}

impl<S, V> SubListSwapMove<S, V> {
    /// Creates a new sub-list swap move.
    ///
    /// Runs on the same entity are reordered so that `left` starts first.
    pub fn new(
        left: SubList,
        right: SubList,
        reversing: bool,
        variable: ListVariable<S, V>,
    ) -> Self {
        let (left, right) =
            if left.entity_index == right.entity_index && left.from_index > right.from_index {
                (right, left)
            } else {
                (left, right)
            };
        Self {
            left,
            right,
            reversing,
            variable,
            indices: [left.entity_index, right.entity_index],
        }
    }

    pub fn left(&self) -> SubList {
        self.left
    }

    pub fn right(&self) -> SubList {
        self.right
    }

    pub fn is_reversing(&self) -> bool {
        self.reversing
    }

    pub fn is_intra_list(&self) -> bool {
        self.left.entity_index == self.right.entity_index
    }

    fn inverse(&self) -> Self {
        let right_from = if self.is_intra_list() {
            self.right.from_index - self.left.length + self.right.length
        } else {
            self.right.from_index
        };
        Self::new(
            SubList::new(self.left.entity_index, self.left.from_index, self.right.length),
            SubList::new(self.right.entity_index, right_from, self.left.length),
            self.reversing,
            self.variable,
        )
    }

    pub(crate) fn apply(&self, solution: &mut S) {
        let left = self.left;
        let right = self.right;

        if self.is_intra_list() {
            // Cut the later run first so the earlier offsets are unaffected.
            let mut right_values =
                self.variable
                    .remove_range(solution, right.entity_index, right.from_index, right.to_index());
            let mut left_values =
                self.variable
                    .remove_range(solution, left.entity_index, left.from_index, left.to_index());
            if self.reversing {
                left_values.reverse();
                right_values.reverse();
            }
            self.variable
                .insert_all(solution, left.entity_index, left.from_index, right_values);
            let new_right_from = right.from_index - left.length + right.length;
            self.variable
                .insert_all(solution, right.entity_index, new_right_from, left_values);
        } else {
            let mut left_values =
                self.variable
                    .remove_range(solution, left.entity_index, left.from_index, left.to_index());
            let mut right_values =
                self.variable
                    .remove_range(solution, right.entity_index, right.from_index, right.to_index());
            if self.reversing {
                left_values.reverse();
                right_values.reverse();
            }
            self.variable
                .insert_all(solution, left.entity_index, left.from_index, right_values);
            self.variable
                .insert_all(solution, right.entity_index, right.from_index, left_values);
        }
    }
}

impl<S, V> Move<S> for SubListSwapMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    type Undo = Self;

    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        if self.left.length == 0 || self.right.length == 0 {
            return false;
        }
        if self.is_intra_list() && self.right.from_index < self.left.to_index() {
            return false;
        }
        let solution = score_director.working_solution();
        let entity_count = self.variable.entity_count(solution);
        [self.left, self.right].iter().all(|run| {
            run.entity_index < entity_count
                && run.to_index() <= self.variable.list_size(solution, run.entity_index)
        })
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        let descriptor = self.variable.descriptor_index();
        let name = self.variable.variable_name();
        let left = self.left;
        let right = self.right;

        if self.is_intra_list() {
            // Total length is unchanged, so one range covers before and after.
            let from = left.from_index;
            let to = right.to_index();
            score_director.before_list_variable_changed(descriptor, left.entity_index, name, from, to);
            self.apply(score_director.working_solution_mut());
            score_director.after_list_variable_changed(descriptor, left.entity_index, name, from, to);
        } else {
            score_director.before_list_variable_changed(
                descriptor,
                left.entity_index,
                name,
                left.from_index,
                left.to_index(),
            );
            score_director.before_list_variable_changed(
                descriptor,
                right.entity_index,
                name,
                right.from_index,
                right.to_index(),
            );
            self.apply(score_director.working_solution_mut());
            score_director.after_list_variable_changed(
                descriptor,
                left.entity_index,
                name,
                left.from_index,
                left.from_index + right.length,
            );
            score_director.after_list_variable_changed(
                descriptor,
                right.entity_index,
                name,
                right.from_index,
                right.from_index + left.length,
            );
        }

        let undo = self.inverse();
        score_director.register_undo(Box::new(move |s: &mut S| undo.apply(s)));
    }

    fn create_undo_move<D: ScoreDirector<S>>(&self, _score_director: &D) -> Self::Undo {
        self.inverse()
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
