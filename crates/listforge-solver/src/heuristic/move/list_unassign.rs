//! ListUnassignMove - removes a value from the list that holds it.
//!
//! This move only exists as the inverse of `ListAssignMove`. It cannot be
//! undone through `create_undo_move`.

use std::fmt::{self, Debug};

use listforge_core::domain::{ElementPosition, ElementRef, ListVariable, PlanningSolution};
use listforge_scoring::ScoreDirector;

use super::{ListAssignMove, Move};

/// A move that removes `value` from `source`.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The list element value type
pub struct ListUnassignMove<S, V> {
    value: V,
    source: ElementRef,
    variable: ListVariable<S, V>,
}

impl<S, V: Clone> Clone for ListUnassignMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            source: self.source,
            variable: self.variable,
        }
    }
}

impl<S, V: Debug> Debug for ListUnassignMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListUnassignMove")
            .field("value", &self.value)
            .field("source", &self.source)
            .field("variable_name", &self.variable.variable_name())
            .finish()
    }
}

impl<S, V> ListUnassignMove<S, V> {
    pub fn new(value: V, source: ElementRef, variable: ListVariable<S, V>) -> Self {
        Self {
            value,
            source,
            variable,
        }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn source(&self) -> ElementRef {
        self.source
    }

    pub(crate) fn apply(&self, solution: &mut S) {
        self.variable
            .remove(solution, self.source.entity_index, self.source.index);
    }
}

impl<S, V: Clone> ListUnassignMove<S, V> {
    fn reassign(&self) -> ListAssignMove<S, V> {
        ListAssignMove::new(self.value.clone(), self.source, self.variable)
    }
}

impl<S, V> Move<S> for ListUnassignMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    type Undo = ListAssignMove<S, V>;

    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let solution = score_director.working_solution();
        self.source.entity_index < self.variable.entity_count(solution)
            && self
                .variable
                .get(solution, self.source.entity_index, self.source.index)
                .is_some_and(|current| current == self.value)
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        let descriptor = self.variable.descriptor_index();
        let name = self.variable.variable_name();
        let src = self.source;

        score_director.before_list_element_unassigned(descriptor, src.entity_index, name, src.index);
        self.apply(score_director.working_solution_mut());
        score_director.after_list_element_unassigned(descriptor, src.entity_index, name, src.index);

        // Recording directors still need to restore the state they observed.
        let undo = self.reassign();
        score_director.register_undo(Box::new(move |s: &mut S| undo.apply(s)));
    }

    /// # Panics
    ///
    /// Always. An unassign is already the undo of an assign.
    fn create_undo_move<D: ScoreDirector<S>>(&self, _score_director: &D) -> Self::Undo {
        panic!(
            "undo of {:?} is not supported: an unassign move is itself an undo move",
            self
        );
    }

    /// Resolves where the value currently lives in the destination state.
    ///
    /// # Panics
    ///
    /// If the value is not assigned in the destination state.
    fn rebase<D: ScoreDirector<S>>(&self, destination: &D) -> Self {
        match self
            .variable
            .position_of(destination.working_solution(), &self.value)
        {
            ElementPosition::Assigned(source) => Self::new(self.value.clone(), source, self.variable),
            ElementPosition::Unassigned => panic!(
                "cannot rebase {:?}: value {:?} is unassigned in the destination",
                self, self.value
            ),
        }
    }

    fn descriptor_index(&self) -> usize {
        self.variable.descriptor_index()
    }

    fn entity_indices(&self) -> &[usize] {
        std::slice::from_ref(&self.source.entity_index)
    }

    fn variable_name(&self) -> &str {
        self.variable.variable_name()
    }
}
