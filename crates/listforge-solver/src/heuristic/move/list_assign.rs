//! ListAssignMove - adds an unassigned value to an entity's list.

use std::fmt::{self, Debug};

use listforge_core::domain::{ElementPosition, ElementRef, ListVariable, PlanningSolution};
use listforge_scoring::ScoreDirector;

use super::{ListUnassignMove, Move};

/// A move that inserts a currently unassigned value at a list position.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The list element value type
pub struct ListAssignMove<S, V> {
    value: V,
    destination: ElementRef,
    variable: ListVariable<S, V>,
}

impl<S, V: Clone> Clone for ListAssignMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            destination: self.destination,
            variable: self.variable,
        }
    }
}

impl<S, V: Debug> Debug for ListAssignMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListAssignMove")
            .field("value", &self.value)
            .field("destination", &self.destination)
            .field("variable_name", &self.variable.variable_name())
            .finish()
    }
}

impl<S, V> ListAssignMove<S, V> {
    pub fn new(value: V, destination: ElementRef, variable: ListVariable<S, V>) -> Self {
        Self {
            value,
            destination,
            variable,
        }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn destination(&self) -> ElementRef {
        self.destination
    }
}

impl<S, V: Clone> ListAssignMove<S, V> {
    pub(crate) fn apply(&self, solution: &mut S) {
        self.variable.insert(
            solution,
            self.destination.entity_index,
            self.destination.index,
            self.value.clone(),
        );
    }
}

impl<S, V> Move<S> for ListAssignMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    type Undo = ListUnassignMove<S, V>;

    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let solution = score_director.working_solution();
        self.destination.entity_index < self.variable.entity_count(solution)
            && self.destination.index
                <= self
                    .variable
                    .list_size(solution, self.destination.entity_index)
            && self.variable.position_of(solution, &self.value) == ElementPosition::Unassigned
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        let descriptor = self.variable.descriptor_index();
        let name = self.variable.variable_name();
        let dst = self.destination;

        score_director.before_list_element_assigned(descriptor, dst.entity_index, name, dst.index);
        self.apply(score_director.working_solution_mut());
        score_director.after_list_element_assigned(descriptor, dst.entity_index, name, dst.index);

        let undo = ListUnassignMove::new(self.value.clone(), dst, self.variable);
        score_director.register_undo(Box::new(move |s: &mut S| undo.apply(s)));
    }

    fn create_undo_move<D: ScoreDirector<S>>(&self, _score_director: &D) -> Self::Undo {
        ListUnassignMove::new(self.value.clone(), self.destination, self.variable)
    }

    fn rebase<D: ScoreDirector<S>>(&self, _destination: &D) -> Self {
        self.clone()
    }

    fn descriptor_index(&self) -> usize {
        self.variable.descriptor_index()
    }

    fn entity_indices(&self) -> &[usize] {
        std::slice::from_ref(&self.destination.entity_index)
    }

    fn variable_name(&self) -> &str {
        self.variable.variable_name()
    }
}
