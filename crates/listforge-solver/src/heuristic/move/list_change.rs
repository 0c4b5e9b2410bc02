//! ListChangeMove - relocates an element within or between list variables.
//!
//! This move removes an element from one position and inserts it at another.
//! The destination index is interpreted after the removal, so moving within
//! one list to index `i` leaves the element at index `i` afterwards.

use std::fmt::{self, Debug};

use listforge_core::domain::{ElementRef, ListVariable, PlanningSolution};
use listforge_scoring::ScoreDirector;

use super::Move;

/// A move that relocates an element from one list position to another.
///
/// Supports both intra-list moves (within same entity) and inter-list moves
/// (between different entities).
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The list element value type
///
/// # Example
///
/// ```
/// use listforge_core::ElementRef;
/// use listforge_scoring::ScoreDirector;
/// use listforge_solver::heuristic::r#move::{ListChangeMove, Move};
/// use listforge_test::{create_director, list_variable, plan, routes};
///
/// let mut director = create_director(plan(&[&[1, 2, 3], &[4]]));
/// let m = ListChangeMove::new(ElementRef::new(0, 1), ElementRef::new(1, 0), list_variable());
///
/// assert!(m.is_doable(&director));
/// m.do_move(&mut director);
/// assert_eq!(routes(director.working_solution()), vec![vec![1, 3], vec![2, 4]]);
/// ```
pub struct ListChangeMove<S, V> {
    source: ElementRef,
    destination: ElementRef,
    variable: ListVariable<S, V>,
    indices: [usize; 2],
}

impl<S, V> Clone for ListChangeMove<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for ListChangeMove<S, V> {}

impl<S, V: Debug> Debug for ListChangeMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListChangeMove")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("variable_name", &self.variable.variable_name())
            .finish()
    }
}

impl<S, V> ListChangeMove<S, V> {
    /// Creates a new list change move.
    ///
    /// # Arguments
    /// * `source` - Position of the element to move
    /// * `destination` - Insertion point, indexed after the removal
    /// * `variable` - Accessors for the list variable
    pub fn new(source: ElementRef, destination: ElementRef, variable: ListVariable<S, V>) -> Self {
        Self {
            source,
            destination,
            variable,
            indices: [source.entity_index, destination.entity_index],
        }
    }

    pub fn source(&self) -> ElementRef {
        self.source
    }

    pub fn destination(&self) -> ElementRef {
        self.destination
    }

    /// Returns true if source and destination are the same entity.
    pub fn is_intra_list(&self) -> bool {
        self.source.entity_index == self.destination.entity_index
    }

    fn inverse(&self) -> Self {
        Self::new(self.destination, self.source, self.variable)
    }

    pub(crate) fn apply(&self, solution: &mut S) {
        if let Some(value) =
            self.variable
                .remove(solution, self.source.entity_index, self.source.index)
        {
            self.variable.insert(
                solution,
                self.destination.entity_index,
                self.destination.index,
                value,
            );
        }
    }
}

impl<S, V> Move<S> for ListChangeMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    type Undo = Self;

    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let solution = score_director.working_solution();
        let entity_count = self.variable.entity_count(solution);
        if self.source.entity_index >= entity_count || self.destination.entity_index >= entity_count
        {
            return false;
        }

        let source_len = self.variable.list_size(solution, self.source.entity_index);
        if self.source.index >= source_len {
            return false;
        }

        if self.is_intra_list() {
            // After the removal the list is one shorter, so the last valid
            // insertion point is `source_len - 1`.
            self.destination.index != self.source.index && self.destination.index < source_len
        } else {
            let dest_len = self
                .variable
                .list_size(solution, self.destination.entity_index);
            self.destination.index <= dest_len
        }
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        let descriptor = self.variable.descriptor_index();
        let name = self.variable.variable_name();
        let src = self.source;
        let dst = self.destination;

        if self.is_intra_list() {
            let from = src.index.min(dst.index);
            let to = src.index.max(dst.index) + 1;
            score_director.before_list_variable_changed(descriptor, src.entity_index, name, from, to);
            self.apply(score_director.working_solution_mut());
            score_director.after_list_variable_changed(descriptor, src.entity_index, name, from, to);
        } else {
            score_director.before_list_variable_changed(
                descriptor,
                src.entity_index,
                name,
                src.index,
                src.index + 1,
            );
            score_director.before_list_variable_changed(
                descriptor,
                dst.entity_index,
                name,
                dst.index,
                dst.index,
            );
            self.apply(score_director.working_solution_mut());
            score_director.after_list_variable_changed(
                descriptor,
                src.entity_index,
                name,
                src.index,
                src.index,
            );
            score_director.after_list_variable_changed(
                descriptor,
                dst.entity_index,
                name,
                dst.index,
                dst.index + 1,
            );
        }

        let undo = self.inverse();
        score_director.register_undo(Box::new(move |s: &mut S| undo.apply(s)));
    }

    fn create_undo_move<D: ScoreDirector<S>>(&self, _score_director: &D) -> Self::Undo {
        self.inverse()
    }

    fn rebase<D: ScoreDirector<S>>(&self, _destination: &D) -> Self {
        // Entities are identified by index, which is stable across clones.
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
