//! Value selectors for iterating over list elements by value.

use std::fmt::{self, Debug};

use listforge_core::domain::{ElementRef, ListVariable, PlanningSolution};
use listforge_scoring::ScoreDirector;

use super::lifecycle::SelectorLifecycle;
use super::random::WorkingRandom;
use super::selection_order::{OrderedIter, SelectionOrder};

/// Trait for selecting values of a list variable.
pub trait ValueSelector<S: PlanningSolution, V>: SelectorLifecycle<S> + Send + Debug {
    /// Returns an iterator over values.
    fn iter<'a, D: ScoreDirector<S>>(&'a self, score_director: &'a D) -> impl Iterator<Item = V> + 'a;

    /// Returns the number of distinct values.
    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize;

    /// Returns true if this selector may return the same value multiple times.
    fn is_never_ending(&self) -> bool {
        false
    }
}

/// Selects the values currently assigned to any list.
///
/// In random order every assigned value is equally likely, so entities are
/// hit in proportion to their list length.
pub struct AssignedValueSelector<S, V> {
    variable: ListVariable<S, V>,
    order: SelectionOrder,
    random: WorkingRandom,
}

impl<S, V> AssignedValueSelector<S, V> {
    pub fn new(variable: ListVariable<S, V>, order: SelectionOrder, random: WorkingRandom) -> Self {
        Self {
            variable,
            order,
            random,
        }
    }

    pub fn original(variable: ListVariable<S, V>) -> Self {
        Self::new(variable, SelectionOrder::Original, WorkingRandom::default())
    }

    pub fn variable(&self) -> ListVariable<S, V> {
        self.variable
    }
}

impl<S, V> Debug for AssignedValueSelector<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssignedValueSelector")
            .field("variable_name", &self.variable.variable_name())
            .field("order", &self.order)
            .finish()
    }
}

/// Resolves the `ordinal`-th assigned slot, counting entity by entity.
pub(crate) fn nth_assigned_slot<S, V>(
    variable: &ListVariable<S, V>,
    solution: &S,
    mut ordinal: usize,
) -> Option<ElementRef> {
    for entity_index in 0..variable.entity_count(solution) {
        let len = variable.list_size(solution, entity_index);
        if ordinal < len {
            return Some(ElementRef::new(entity_index, ordinal));
        }
        ordinal -= len;
    }
    None
}

impl<S: PlanningSolution, V> SelectorLifecycle<S> for AssignedValueSelector<S, V> {}

impl<S, V> ValueSelector<S, V> for AssignedValueSelector<S, V>
where
    S: PlanningSolution,
    V: Send + 'static,
{
    fn iter<'a, D: ScoreDirector<S>>(&'a self, score_director: &'a D) -> impl Iterator<Item = V> + 'a {
        let solution = score_director.working_solution();
        let variable = self.variable;
        match self.order {
            SelectionOrder::Original => {
                OrderedIter::Original((0..variable.entity_count(solution)).flat_map(move |entity| {
                    (0..variable.list_size(solution, entity))
                        .filter_map(move |index| variable.get(solution, entity, index))
                }))
            }
            SelectionOrder::Random => {
                let total = variable.assigned_count(solution);
                OrderedIter::Random(std::iter::from_fn(move || {
                    if total == 0 {
                        return None;
                    }
                    let slot = nth_assigned_slot(&variable, solution, self.random.next_index(total))?;
                    variable.get(solution, slot.entity_index, slot.index)
                }))
            }
        }
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        self.variable.assigned_count(score_director.working_solution())
    }

    fn is_never_ending(&self) -> bool {
        self.order.is_random()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listforge_test::{create_director, list_variable, plan};

    #[test]
    fn original_order_walks_lists_in_order() {
        let director = create_director(plan(&[&[3, 1], &[], &[2]]));
        let selector = AssignedValueSelector::original(list_variable());

        assert_eq!(selector.iter(&director).collect::<Vec<_>>(), vec![3, 1, 2]);
        assert_eq!(selector.size(&director), 3);
    }

    #[test]
    fn random_order_draws_every_value() {
        let director = create_director(plan(&[&[3, 1], &[], &[2]]));
        let selector = AssignedValueSelector::new(
            list_variable(),
            SelectionOrder::Random,
            WorkingRandom::seeded(17),
        );

        let drawn: Vec<usize> = selector.iter(&director).take(200).collect();
        for value in [1, 2, 3] {
            assert!(drawn.contains(&value));
        }
    }

    #[test]
    fn nth_slot_skips_empty_lists() {
        let solution = plan(&[&[3, 1], &[], &[2]]);
        let variable = list_variable();

        assert_eq!(nth_assigned_slot(&variable, &solution, 2), Some(ElementRef::new(2, 0)));
        assert_eq!(nth_assigned_slot(&variable, &solution, 3), None);
    }
}
