//! Element selectors: positions of assigned values.
//!
//! An element is the slot an assigned value currently occupies. Element
//! selectors feed the source side of change and swap moves.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use listforge_core::domain::{ElementRef, ListVariable, PlanningSolution, SupplyManager};
use listforge_core::Result;
use listforge_scoring::ScoreDirector;

use super::lifecycle::SelectorLifecycle;
use super::random::WorkingRandom;
use super::selection_order::{OrderedIter, SelectionOrder};
use super::value::{nth_assigned_slot, ValueSelector};

/// Trait for selecting occupied list positions.
pub trait ElementSelector<S: PlanningSolution>: SelectorLifecycle<S> + Send + Debug {
    /// Returns an iterator over element positions.
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
    ) -> impl Iterator<Item = ElementRef> + 'a;

    /// Returns the number of distinct elements.
    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize;

    /// Returns true if this selector may return the same element multiple times.
    fn is_never_ending(&self) -> bool {
        false
    }
}

/// Resolves each value drawn from a value selector to its current position.
///
/// The position oracle is queried per draw, so nothing goes stale between
/// moves. Unassigned values are skipped.
pub struct ValueElementSelector<S, V, VS> {
    values: VS,
    variable: ListVariable<S, V>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, V, VS> ValueElementSelector<S, V, VS> {
    pub fn new(values: VS, variable: ListVariable<S, V>) -> Self {
        Self {
            values,
            variable,
            _phantom: PhantomData,
        }
    }
}

impl<S, V, VS: Debug> Debug for ValueElementSelector<S, V, VS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueElementSelector")
            .field("values", &self.values)
            .field("variable_name", &self.variable.variable_name())
            .finish()
    }
}

impl<S, V, VS> SelectorLifecycle<S> for ValueElementSelector<S, V, VS>
where
    S: PlanningSolution,
    VS: SelectorLifecycle<S>,
{
    fn solving_started<D: ScoreDirector<S>>(
        &mut self,
        supply_manager: &mut SupplyManager,
        score_director: &D,
    ) -> Result<()> {
        self.values.solving_started(supply_manager, score_director)
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D) -> Result<()> {
        self.values.phase_started(score_director)
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D) {
        self.values.step_started(score_director);
    }

    fn phase_ended(&mut self) {
        self.values.phase_ended();
    }

    fn solving_ended(&mut self, supply_manager: &mut SupplyManager) {
        self.values.solving_ended(supply_manager);
    }
}

impl<S, V, VS> ElementSelector<S> for ValueElementSelector<S, V, VS>
where
    S: PlanningSolution,
    V: PartialEq + Send + 'static,
    VS: ValueSelector<S, V>,
{
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
    ) -> impl Iterator<Item = ElementRef> + 'a {
        let solution = score_director.working_solution();
        let variable = self.variable;
        self.values
            .iter(score_director)
            .filter_map(move |value| variable.position_of(solution, &value).element_ref())
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        self.values.size(score_director)
    }

    fn is_never_ending(&self) -> bool {
        self.values.is_never_ending()
    }
}

/// Walks the entity lists directly, slot by slot.
///
/// Random draws are uniform over all assigned slots.
pub struct FromListElementSelector<S, V> {
    variable: ListVariable<S, V>,
    order: SelectionOrder,
    random: WorkingRandom,
}

impl<S, V> FromListElementSelector<S, V> {
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
}

impl<S, V> Debug for FromListElementSelector<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromListElementSelector")
            .field("variable_name", &self.variable.variable_name())
            .field("order", &self.order)
            .finish()
    }
}

impl<S: PlanningSolution, V> SelectorLifecycle<S> for FromListElementSelector<S, V> {}

impl<S, V> ElementSelector<S> for FromListElementSelector<S, V>
where
    S: PlanningSolution,
    V: Send + 'static,
{
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
    ) -> impl Iterator<Item = ElementRef> + 'a {
        let solution = score_director.working_solution();
        let variable = self.variable;
        match self.order {
            SelectionOrder::Original => {
                OrderedIter::Original((0..variable.entity_count(solution)).flat_map(move |entity| {
                    (0..variable.list_size(solution, entity))
                        .map(move |index| ElementRef::new(entity, index))
                }))
            }
            SelectionOrder::Random => {
                let total = variable.assigned_count(solution);
                OrderedIter::Random(std::iter::from_fn(move || {
                    if total == 0 {
                        return None;
                    }
                    nth_assigned_slot(&variable, solution, self.random.next_index(total))
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
    use crate::heuristic::selector::value::AssignedValueSelector;
    use listforge_test::routing::plan_with_stops;
    use listforge_test::{create_director, list_variable, plan};

    #[test]
    fn resolves_positions_per_draw() {
        let director = create_director(plan_with_stops(&[&[4, 2], &[7]], vec![2, 4, 7]));
        let selector =
            ValueElementSelector::new(AssignedValueSelector::original(list_variable()), list_variable());

        assert_eq!(
            selector.iter(&director).collect::<Vec<_>>(),
            vec![ElementRef::new(0, 0), ElementRef::new(0, 1), ElementRef::new(1, 0)]
        );
        assert_eq!(selector.size(&director), 3);
    }

    #[test]
    fn list_walk_skips_empty_entities() {
        let director = create_director(plan(&[&[1], &[], &[2, 3]]));
        let selector = FromListElementSelector::original(list_variable());

        assert_eq!(
            selector.iter(&director).collect::<Vec<_>>(),
            vec![ElementRef::new(0, 0), ElementRef::new(2, 0), ElementRef::new(2, 1)]
        );
        assert_eq!(selector.size(&director), 3);
    }

    #[test]
    fn random_list_walk_is_endless_but_stops_on_empty_plans() {
        let random = WorkingRandom::seeded(3);
        let director = create_director(plan(&[&[1], &[2, 3]]));
        let selector = FromListElementSelector::new(list_variable(), SelectionOrder::Random, random.clone());
        assert_eq!(selector.iter(&director).take(50).count(), 50);

        let empty = create_director(plan(&[&[], &[]]));
        let selector = FromListElementSelector::new(list_variable(), SelectionOrder::Random, random);
        assert_eq!(selector.iter(&empty).next(), None);
    }
}
