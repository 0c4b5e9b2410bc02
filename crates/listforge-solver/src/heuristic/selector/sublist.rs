//! Sub-list selectors.

use std::fmt::{self, Debug};

use listforge_core::domain::{ListVariable, PlanningSolution, SubList};
use listforge_core::{ListForgeError, Result};
use listforge_scoring::ScoreDirector;
use tracing::debug;

use super::lifecycle::SelectorLifecycle;
use super::random::WorkingRandom;
use super::selection_order::{OrderedIter, SelectionOrder};
use super::triangle::TriangularSampler;
use super::value::nth_assigned_slot;

/// Trait for selecting contiguous runs of list elements.
pub trait SubListSelector<S: PlanningSolution>: SelectorLifecycle<S> + Send + Debug {
    /// Returns an iterator over sub-lists.
    fn iter<'a, D: ScoreDirector<S>>(&'a self, score_director: &'a D) -> impl Iterator<Item = SubList> + 'a;

    /// Returns the number of distinct sub-lists.
    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize;

    /// Returns true if this selector may return the same sub-list multiple times.
    fn is_never_ending(&self) -> bool {
        false
    }

    /// Shortest sub-list this selector produces.
    fn minimum_sub_list_size(&self) -> usize;

    /// Longest sub-list this selector produces.
    fn maximum_sub_list_size(&self) -> usize;
}

/// Selects sub-lists of every entity's list with a length in a bounded range.
///
/// Exhaustive order walks entities, then start positions, then lengths in
/// increasing order. Random order first draws an assigned value uniformly,
/// then a uniform sub-list of that value's list, so longer lists are picked
/// in proportion to their length.
pub struct FromSolutionSubListSelector<S, V> {
    variable: ListVariable<S, V>,
    sampler: TriangularSampler,
    order: SelectionOrder,
    random: WorkingRandom,
}

impl<S, V> FromSolutionSubListSelector<S, V> {
    /// Creates a sub-list selector.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero minimum or `minimum > maximum`.
    pub fn new(
        variable: ListVariable<S, V>,
        minimum_sub_list_size: usize,
        maximum_sub_list_size: usize,
        order: SelectionOrder,
        random: WorkingRandom,
    ) -> Result<Self> {
        Ok(Self {
            variable,
            sampler: TriangularSampler::new(minimum_sub_list_size, maximum_sub_list_size)?,
            order,
            random,
        })
    }

    pub fn variable(&self) -> ListVariable<S, V> {
        self.variable
    }

    pub fn sampler(&self) -> TriangularSampler {
        self.sampler
    }

    fn total_count(&self, solution: &S) -> Result<usize> {
        let mut total: usize = 0;
        for entity_index in 0..self.variable.entity_count(solution) {
            let count = self.sampler.count(self.variable.list_size(solution, entity_index))?;
            total = total
                .checked_add(count)
                .filter(|&total| total <= i32::MAX as usize)
                .ok_or_else(|| {
                    ListForgeError::capacity(format!(
                        "sub-list count for variable {} exceeds {}",
                        self.variable.variable_name(),
                        i32::MAX
                    ))
                })?;
        }
        Ok(total)
    }
}

impl<S, V> Debug for FromSolutionSubListSelector<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromSolutionSubListSelector")
            .field("variable_name", &self.variable.variable_name())
            .field("sampler", &self.sampler)
            .field("order", &self.order)
            .finish()
    }
}

impl<S: PlanningSolution, V> SelectorLifecycle<S> for FromSolutionSubListSelector<S, V> {
    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D) -> Result<()> {
        let total = self.total_count(score_director.working_solution())?;
        debug!(
            variable_name = self.variable.variable_name(),
            minimum = self.sampler.minimum(),
            maximum = self.sampler.maximum(),
            total,
            "Sub-list selector started"
        );
        Ok(())
    }
}

impl<S, V> SubListSelector<S> for FromSolutionSubListSelector<S, V>
where
    S: PlanningSolution,
    V: Send + 'static,
{
    fn iter<'a, D: ScoreDirector<S>>(&'a self, score_director: &'a D) -> impl Iterator<Item = SubList> + 'a {
        let solution = score_director.working_solution();
        let variable = self.variable;
        let sampler = self.sampler;
        match self.order {
            SelectionOrder::Original => {
                OrderedIter::Original((0..variable.entity_count(solution)).flat_map(move |entity| {
                    let len = variable.list_size(solution, entity);
                    (0..len).flat_map(move |from| {
                        let longest = sampler.longest(len - from);
                        (sampler.minimum()..=longest).map(move |length| SubList::new(entity, from, length))
                    })
                }))
            }
            SelectionOrder::Random => {
                let total = variable.assigned_count(solution);
                let eligible = (0..variable.entity_count(solution))
                    .any(|entity| variable.list_size(solution, entity) >= sampler.minimum());
                OrderedIter::Random(std::iter::from_fn(move || {
                    if !eligible {
                        return None;
                    }
                    loop {
                        let slot = nth_assigned_slot(&variable, solution, self.random.next_index(total))?;
                        let len = variable.list_size(solution, slot.entity_index);
                        if let Some((from, length)) = sampler.next_element(len, &self.random) {
                            return Some(SubList::new(slot.entity_index, from, length));
                        }
                    }
                }))
            }
        }
    }

    /// Saturates at `usize::MAX` when a list admits more sub-lists than a
    /// 32-bit count holds; `phase_started` rejects such lists.
    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        let solution = score_director.working_solution();
        (0..self.variable.entity_count(solution))
            .map(|entity| {
                self.sampler
                    .count(self.variable.list_size(solution, entity))
                    .unwrap_or(usize::MAX)
            })
            .fold(0usize, usize::saturating_add)
    }

    fn is_never_ending(&self) -> bool {
        self.order.is_random()
    }

    fn minimum_sub_list_size(&self) -> usize {
        self.sampler.minimum()
    }

    fn maximum_sub_list_size(&self) -> usize {
        self.sampler.maximum()
    }
}
