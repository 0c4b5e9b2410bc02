//! KOptListMove - compound edge exchange on one list.
//!
//! A k-opt move is stored as the sequence of cyclic sub-list reversals that
//! turns the current tour into the reconnected one, followed by a left
//! rotation that brings the original first element back to position 0.

use std::fmt::{self, Debug};

use smallvec::SmallVec;

use listforge_core::domain::{ListVariable, PlanningSolution};
use listforge_scoring::ScoreDirector;

use super::{ListRestoreMove, Move};

/// A cyclic reversal of the positions `[from, to)`.
///
/// When `from >= to` the range wraps past the end of the list; `from == to`
/// covers the whole list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlipSublist {
    pub from: usize,
    pub to: usize,
}

impl FlipSublist {
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Number of positions covered in a list of `len` elements.
    pub fn span(&self, len: usize) -> usize {
        if self.from < self.to {
            self.to - self.from
        } else {
            len - self.from + self.to
        }
    }
}

/// Reverses the cyclic range described by `flip` in place.
///
/// # Example
///
/// ```
/// use listforge_solver::heuristic::r#move::{flip_sublist, FlipSublist};
///
/// let mut tour = vec![0, 1, 2, 3, 4, 5];
/// flip_sublist(&mut tour, FlipSublist::new(4, 2));
/// assert_eq!(tour, vec![5, 4, 2, 3, 1, 0]);
/// ```
pub fn flip_sublist<T>(items: &mut [T], flip: FlipSublist) {
    let len = items.len();
    if len == 0 {
        return;
    }
    let span = flip.span(len);
    for offset in 0..span / 2 {
        let left = (flip.from + offset) % len;
        let right = (flip.from + span - 1 - offset) % len;
        items.swap(left, right);
    }
}

/// A k-opt move on one entity's list.
///
/// An empty move (no flips) is never doable; the generator returns one when
/// no entity is long enough for the requested `k`.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The list element value type
pub struct KOptListMove<S, V> {
    entity_index: usize,
    list_size: usize,
    k: usize,
    flips: SmallVec<[FlipSublist; 4]>,
    shift: usize,
    variable: ListVariable<S, V>,
}

impl<S, V> Clone for KOptListMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            entity_index: self.entity_index,
            list_size: self.list_size,
            k: self.k,
            flips: self.flips.clone(),
            shift: self.shift,
            variable: self.variable,
        }
    }
}

impl<S, V: Debug> Debug for KOptListMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KOptListMove")
            .field("entity_index", &self.entity_index)
            .field("k", &self.k)
            .field("flips", &self.flips)
            .field("shift", &self.shift)
            .field("variable_name", &self.variable.variable_name())
            .finish()
    }
}

impl<S, V> KOptListMove<S, V> {
    /// Creates a k-opt move.
    ///
    /// # Arguments
    /// * `entity_index` - Entity whose list is rewired
    /// * `list_size` - Length of the list when the move was generated
    /// * `k` - Number of exchanged edges
    /// * `flips` - Reversals applied in order
    /// * `shift` - Left rotation applied after the reversals
    /// * `variable` - Accessors for the list variable
    pub fn new(
        entity_index: usize,
        list_size: usize,
        k: usize,
        flips: SmallVec<[FlipSublist; 4]>,
        shift: usize,
        variable: ListVariable<S, V>,
    ) -> Self {
        Self {
            entity_index,
            list_size,
            k,
            flips,
            shift,
            variable,
        }
    }

    /// Creates the move that does nothing and is never doable.
    pub fn empty(variable: ListVariable<S, V>) -> Self {
        Self::new(0, 0, 0, SmallVec::new(), 0, variable)
    }

    pub fn entity_index(&self) -> usize {
        self.entity_index
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn flips(&self) -> &[FlipSublist] {
        &self.flips
    }

    pub fn shift(&self) -> usize {
        self.shift
    }

    pub fn is_empty(&self) -> bool {
        self.flips.is_empty()
    }

    /// Applies the flips and rotation to a plain slice holding the list.
    pub fn rearrange<T>(&self, items: &mut [T]) {
        for flip in &self.flips {
            flip_sublist(items, *flip);
        }
        if !items.is_empty() {
            items.rotate_left(self.shift % items.len());
        }
    }
}

impl<S, V: Clone> KOptListMove<S, V> {
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

impl<S, V> Move<S> for KOptListMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    type Undo = ListRestoreMove<S, V>;

    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        if self.flips.is_empty() {
            return false;
        }
        let solution = score_director.working_solution();
        self.entity_index < self.variable.entity_count(solution)
            && self.variable.list_size(solution, self.entity_index) == self.list_size
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        let descriptor = self.variable.descriptor_index();
        let name = self.variable.variable_name();
        let entity = self.entity_index;

        let previous = self
            .variable
            .snapshot(score_director.working_solution(), entity);
        let len = previous.len();
        score_director.before_list_variable_changed(descriptor, entity, name, 0, len);
        self.apply(score_director.working_solution_mut());
        score_director.after_list_variable_changed(descriptor, entity, name, 0, len);

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
