//! SubListChangeMove - relocates a contiguous run of elements.
//!
//! The run is cut out of its source list and inserted at the destination,
//! optionally reversed. As with `ListChangeMove`, the destination index is
//! interpreted after the removal.

use std::fmt::{self, Debug};

use listforge_core::domain::{ElementRef, ListVariable, PlanningSolution, SubList};
use listforge_scoring::ScoreDirector;

use super::Move;

/// A move that relocates a sub-list, optionally reversing it.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The list element value type
///
/// # Example
///
/// ```
/// use listforge_core::{ElementRef, SubList};
/// use listforge_scoring::ScoreDirector;
/// use listforge_solver::heuristic::r#move::{Move, SubListChangeMove};
/// use listforge_test::{create_director, list_variable, plan, routes};
///
/// let mut director = create_director(plan(&[&[1, 2, 3, 4], &[5]]));
/// let m = SubListChangeMove::new(
///     SubList::new(0, 1, 2),
///     ElementRef::new(1, 1),
///     true,
///     list_variable(),
/// );
///
/// m.do_move(&mut director);
/// assert_eq!(routes(director.working_solution()), vec![vec![1, 4], vec![5, 3, 2]]);
/// ```
pub struct SubListChangeMove<S, V> {
    source: SubList,
    destination: ElementRef,
    reversing: bool,
    variable: ListVariable<S, V>,
    indices: [usize; 2],
}

impl<S, V> Clone for SubListChangeMove<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for SubListChangeMove<S, V> {}

impl<S, V: Debug> Debug for SubListChangeMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubListChangeMove")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("reversing", &self.reversing)
            .field("variable_name", &self.variable.variable_name())
            .finish()
    }
}

impl<S, V> SubListChangeMove<S, V> {
    /// Creates a new sub-list change move.
    ///
    /// # Arguments
    /// * `source` - The run to move
    /// * `destination` - Insertion point, indexed after the removal
    /// * `reversing` - Whether the run is inserted in reverse order
    /// * `variable` - Accessors for the list variable
    pub fn new(
        source: SubList,
        destination: ElementRef,
        reversing: bool,
        variable: ListVariable<S, V>,
    ) -> Self {
        Self {
            source,
            destination,
            reversing,
            variable,
            indices: [source.entity_index, destination.entity_index],
        }
    }

    pub fn source(&self) -> SubList {
        self.source
    }

    pub fn destination(&self) -> ElementRef {
        self.destination
    }

    pub fn is_reversing(&self) -> bool {
        self.reversing
    }

    pub fn is_intra_list(&self) -> bool {
        self.source.entity_index == self.destination.entity_index
    }

    fn inverse(&self) -> Self {
        Self::new(
            SubList::new(
                self.destination.entity_index,
                self.destination.index,
                self.source.length,
            ),
            self.source.first(),
            self.reversing,
            self.variable,
        )
    }

    pub(crate) fn apply(&self, solution: &mut S) {
        let mut values = self.variable.remove_range(
            solution,
            self.source.entity_index,
            self.source.from_index,
            self.source.to_index(),
        );
        if self.reversing {
            values.reverse();
        }
        self.variable.insert_all(
            solution,
            self.destination.entity_index,
            self.destination.index,
            values,
        );
    }
}

impl<S, V> Move<S> for SubListChangeMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    type Undo = Self;

    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        if self.source.length == 0 {
            return false;
        }
        let solution = score_director.working_solution();
        let entity_count = self.variable.entity_count(solution);
        if self.source.entity_index >= entity_count || self.destination.entity_index >= entity_count
        {
            return false;
        }

        let source_len = self.variable.list_size(solution, self.source.entity_index);
        if self.source.to_index() > source_len {
            return false;
        }

        if self.is_intra_list() {
            if self.destination.index + self.source.length > source_len {
                return false;
            }
            // Putting the run back where it was only changes something when
            // it is reversed, and reversing a single element changes nothing.
            self.destination.index != self.source.from_index
                || (self.reversing && self.source.length > 1)
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
            let from = src.from_index.min(dst.index);
            let to = src.to_index().max(dst.index + src.length);
            score_director.before_list_variable_changed(descriptor, src.entity_index, name, from, to);
            self.apply(score_director.working_solution_mut());
            score_director.after_list_variable_changed(descriptor, src.entity_index, name, from, to);
        } else {
            score_director.before_list_variable_changed(
                descriptor,
                src.entity_index,
                name,
                src.from_index,
                src.to_index(),
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
                src.from_index,
                src.from_index,
            );
            score_director.after_list_variable_changed(
                descriptor,
                dst.entity_index,
                name,
                dst.index,
                dst.index + src.length,
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
