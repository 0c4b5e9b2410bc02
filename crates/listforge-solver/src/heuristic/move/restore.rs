//! ListRestoreMove - overwrites one entity's list with a stored snapshot.
//!
//! Used as the undo of the tour-rewriting moves (`TwoOptMove`,
//! `KOptListMove`), whose inverse is easier to express as "put it back".

use std::fmt::{self, Debug};

use listforge_core::domain::{ListVariable, PlanningSolution};
use listforge_scoring::ScoreDirector;

use super::Move;

/// A move that replaces an entity's whole list.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The list element value type
pub struct ListRestoreMove<S, V> {
    entity_index: usize,
    values: Vec<V>,
    variable: ListVariable<S, V>,
}

impl<S, V: Clone> Clone for ListRestoreMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            entity_index: self.entity_index,
            values: self.values.clone(),
            variable: self.variable,
        }
    }
}

impl<S, V: Debug> Debug for ListRestoreMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListRestoreMove")
            .field("entity_index", &self.entity_index)
            .field("values", &self.values)
            .field("variable_name", &self.variable.variable_name())
            .finish()
    }
}

impl<S, V> ListRestoreMove<S, V> {
    pub fn new(entity_index: usize, values: Vec<V>, variable: ListVariable<S, V>) -> Self {
        Self {
            entity_index,
            values,
            variable,
        }
    }

    pub fn entity_index(&self) -> usize {
        self.entity_index
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }
}

impl<S, V: Clone> ListRestoreMove<S, V> {
    pub(crate) fn apply(&self, solution: &mut S) {
        let len = self.variable.list_size(solution, self.entity_index);
        self.variable.remove_range(solution, self.entity_index, 0, len);
        self.variable
            .insert_all(solution, self.entity_index, 0, self.values.clone());
    }
}

impl<S, V> Move<S> for ListRestoreMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    type Undo = Self;

    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let solution = score_director.working_solution();
        self.entity_index < self.variable.entity_count(solution)
            && self.variable.snapshot(solution, self.entity_index) != self.values
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        let descriptor = self.variable.descriptor_index();
        let name = self.variable.variable_name();
        let entity = self.entity_index;

        let previous = self
            .variable
            .snapshot(score_director.working_solution(), entity);
        score_director.before_list_variable_changed(descriptor, entity, name, 0, previous.len());
        self.apply(score_director.working_solution_mut());
        score_director.after_list_variable_changed(descriptor, entity, name, 0, self.values.len());

        let undo = Self::new(entity, previous, self.variable);
        score_director.register_undo(Box::new(move |s: &mut S| undo.apply(s)));
    }

    fn create_undo_move<D: ScoreDirector<S>>(&self, score_director: &D) -> Self::Undo {
        let previous = self
            .variable
            .snapshot(score_director.working_solution(), self.entity_index);
        Self::new(self.entity_index, previous, self.variable)
    }

    fn rebase<D: ScoreDirector<S>>(&self, _destination: &D) -> Self {
        self.clone()
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
