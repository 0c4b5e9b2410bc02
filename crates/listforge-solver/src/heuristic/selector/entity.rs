//! Entity selectors for iterating over the entities owning a list variable.

use std::fmt::{self, Debug};

use listforge_core::domain::{ListVariable, PlanningSolution};
use listforge_scoring::ScoreDirector;

use super::lifecycle::SelectorLifecycle;
use super::random::WorkingRandom;
use super::selection_order::{OrderedIter, SelectionOrder};

/// Trait for selecting entities from a planning solution.
///
/// Entities are identified by their index.
pub trait EntitySelector<S: PlanningSolution>: SelectorLifecycle<S> + Send + Debug {
    /// Returns an iterator over entity indices.
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
    ) -> impl Iterator<Item = usize> + 'a;

    /// Returns the number of distinct entities.
    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize;

    /// Returns true if this selector may return the same entity multiple times.
    fn is_never_ending(&self) -> bool {
        false
    }
}

/// An entity selector over every entity owning the list variable.
pub struct FromSolutionEntitySelector<S, V> {
    variable: ListVariable<S, V>,
    order: SelectionOrder,
    random: WorkingRandom,
}

impl<S, V> FromSolutionEntitySelector<S, V> {
    pub fn new(variable: ListVariable<S, V>, order: SelectionOrder, random: WorkingRandom) -> Self {
        Self {
            variable,
            order,
            random,
        }
    }

    /// Creates a selector returning entities in index order.
    pub fn original(variable: ListVariable<S, V>) -> Self {
        Self::new(variable, SelectionOrder::Original, WorkingRandom::default())
    }
}

impl<S, V> Debug for FromSolutionEntitySelector<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromSolutionEntitySelector")
            .field("variable_name", &self.variable.variable_name())
            .field("order", &self.order)
            .finish()
    }
}

impl<S: PlanningSolution, V> SelectorLifecycle<S> for FromSolutionEntitySelector<S, V> {}

impl<S, V> EntitySelector<S> for FromSolutionEntitySelector<S, V>
where
    S: PlanningSolution,
    V: Send + 'static,
{
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
    ) -> impl Iterator<Item = usize> + 'a {
        let count = self.variable.entity_count(score_director.working_solution());
        match self.order {
            SelectionOrder::Original => OrderedIter::Original(0..count),
            SelectionOrder::Random => OrderedIter::Random(std::iter::from_fn(move || {
                (count > 0).then(|| self.random.next_index(count))
            })),
        }
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        self.variable.entity_count(score_director.working_solution())
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
    fn original_order_lists_every_entity() {
        let director = create_director(plan(&[&[1], &[], &[2, 3]]));
        let selector = FromSolutionEntitySelector::original(list_variable());

        assert_eq!(selector.iter(&director).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(selector.size(&director), 3);
        assert!(!selector.is_never_ending());
    }

    #[test]
    fn random_order_is_endless_and_in_range() {
        let director = create_director(plan(&[&[1], &[], &[2, 3]]));
        let selector = FromSolutionEntitySelector::new(
            list_variable(),
            SelectionOrder::Random,
            WorkingRandom::seeded(5),
        );

        assert!(selector.is_never_ending());
        let drawn: Vec<usize> = selector.iter(&director).take(300).collect();
        assert_eq!(drawn.len(), 300);
        for entity in 0..3 {
            assert!(drawn.contains(&entity));
        }
    }

    #[test]
    fn random_order_without_entities_is_empty() {
        let director = create_director(plan(&[]));
        let selector = FromSolutionEntitySelector::new(
            list_variable(),
            SelectionOrder::Random,
            WorkingRandom::seeded(5),
        );
        assert_eq!(selector.iter(&director).next(), None);
    }
}
