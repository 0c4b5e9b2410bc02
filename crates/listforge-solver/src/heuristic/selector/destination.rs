//! Destination selectors: insertion points for relocated elements.
//!
//! A destination is either the front of an entity's list, reported as
//! `ElementRef::new(entity, 0)`, or the slot right after an assigned value,
//! reported as `ElementRef::new(owner, index + 1)`. Indices refer to the
//! list as it is before the relocated element is removed.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use listforge_core::domain::{ElementRef, ListVariable, PlanningSolution, SupplyManager};
use listforge_core::Result;
use listforge_scoring::ScoreDirector;

use super::entity::EntitySelector;
use super::lifecycle::SelectorLifecycle;
use super::random::WorkingRandom;
use super::selection_order::{OrderedIter, SelectionOrder};
use super::value::ValueSelector;

/// Trait for selecting insertion points.
pub trait DestinationSelector<S: PlanningSolution>: SelectorLifecycle<S> + Send + Debug {
    /// Returns an iterator over insertion points.
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
    ) -> impl Iterator<Item = ElementRef> + 'a;

    /// Returns the number of distinct insertion points.
    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize;

    /// Returns true if this selector may return the same destination multiple times.
    fn is_never_ending(&self) -> bool {
        false
    }
}

/// Combines an entity selector and a value selector into insertion points.
///
/// In random order an entity destination is produced with probability
/// `E / (E + V)`, where `E` and `V` are the sizes of the two child
/// selectors, so every insertion point is equally likely.
pub struct ElementDestinationSelector<S, V, ES, VS> {
    entities: ES,
    values: VS,
    variable: ListVariable<S, V>,
    order: SelectionOrder,
    random: WorkingRandom,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, V, ES, VS> ElementDestinationSelector<S, V, ES, VS> {
    pub fn new(
        entities: ES,
        values: VS,
        variable: ListVariable<S, V>,
        order: SelectionOrder,
        random: WorkingRandom,
    ) -> Self {
        Self {
            entities,
            values,
            variable,
            order,
            random,
            _phantom: PhantomData,
        }
    }
}

impl<S, V, ES: Debug, VS: Debug> Debug for ElementDestinationSelector<S, V, ES, VS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementDestinationSelector")
            .field("entities", &self.entities)
            .field("values", &self.values)
            .field("variable_name", &self.variable.variable_name())
            .field("order", &self.order)
            .finish()
    }
}

impl<S, V, ES, VS> SelectorLifecycle<S> for ElementDestinationSelector<S, V, ES, VS>
where
    S: PlanningSolution,
    ES: SelectorLifecycle<S>,
    VS: SelectorLifecycle<S>,
{
    fn solving_started<D: ScoreDirector<S>>(
        &mut self,
        supply_manager: &mut SupplyManager,
        score_director: &D,
    ) -> Result<()> {
        self.entities.solving_started(supply_manager, score_director)?;
        self.values.solving_started(supply_manager, score_director)
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D) -> Result<()> {
        self.entities.phase_started(score_director)?;
        self.values.phase_started(score_director)
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D) {
        self.entities.step_started(score_director);
        self.values.step_started(score_director);
    }

    fn phase_ended(&mut self) {
        self.entities.phase_ended();
        self.values.phase_ended();
    }

    fn solving_ended(&mut self, supply_manager: &mut SupplyManager) {
        self.entities.solving_ended(supply_manager);
        self.values.solving_ended(supply_manager);
    }
}

impl<S, V, ES, VS> DestinationSelector<S> for ElementDestinationSelector<S, V, ES, VS>
where
    S: PlanningSolution,
    V: PartialEq + Send + 'static,
    ES: EntitySelector<S>,
    VS: ValueSelector<S, V>,
{
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
    ) -> impl Iterator<Item = ElementRef> + 'a {
        let solution = score_director.working_solution();
        let variable = self.variable;
        let after_value = move |value: V| {
            variable
                .position_of(solution, &value)
                .element_ref()
                .map(|element| ElementRef::new(element.entity_index, element.index + 1))
        };
        match self.order {
            SelectionOrder::Original => {
                let entity_count = self.entities.size(score_director);
                let heads = if entity_count == 0 {
                    None
                } else {
                    Some(
                        self.entities
                            .iter(score_director)
                            .map(|entity| ElementRef::new(entity, 0))
                            .chain(self.values.iter(score_director).filter_map(after_value)),
                    )
                };
                OrderedIter::Original(heads.into_iter().flatten())
            }
            SelectionOrder::Random => {
                let entity_count = self.entities.size(score_director);
                let value_count = self.values.size(score_director);
                let mut entities = self.entities.iter(score_director);
                let mut values = self.values.iter(score_director);
                OrderedIter::Random(std::iter::from_fn(move || {
                    if entity_count == 0 {
                        return None;
                    }
                    loop {
                        if self.random.next_index(entity_count + value_count) < entity_count {
                            return entities.next().map(|entity| ElementRef::new(entity, 0));
                        }
                        // Unassigned values have no slot to insert after; redraw.
                        if let Some(destination) = after_value(values.next()?) {
                            return Some(destination);
                        }
                    }
                }))
            }
        }
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        let entity_count = self.entities.size(score_director);
        if entity_count == 0 {
            0
        } else {
            entity_count + self.values.size(score_director)
        }
    }

    fn is_never_ending(&self) -> bool {
        self.order.is_random()
            || self.entities.is_never_ending()
            || self.values.is_never_ending()
    }
}
