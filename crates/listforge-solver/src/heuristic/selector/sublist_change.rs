//! Sub-list change move selector.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use listforge_core::domain::{ElementRef, ListVariable, PlanningSolution, SubList, SupplyManager};
use listforge_core::Result;
use listforge_scoring::ScoreDirector;

use crate::heuristic::r#move::SubListChangeMove;

use super::destination::DestinationSelector;
use super::lifecycle::SelectorLifecycle;
use super::random::WorkingRandom;
use super::selection_order::OrderedIter;
use super::sublist::SubListSelector;
use super::typed_move_selector::MoveSelector;

/// Where a pre-removal insertion point lands once `source` is cut out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Landing {
    /// The insertion index after removal.
    At(ElementRef),
    /// The insertion point lies strictly inside the removed run.
    Inside,
}

fn landing(source: SubList, destination: ElementRef) -> Landing {
    if destination.entity_index != source.entity_index || destination.index <= source.from_index {
        Landing::At(destination)
    } else if destination.index >= source.to_index() {
        Landing::At(ElementRef::new(
            destination.entity_index,
            destination.index - source.length,
        ))
    } else {
        Landing::Inside
    }
}

/// A move selector that relocates sub-lists, optionally reversing them.
///
/// Exhaustively, every sub-list is combined with every destination outside
/// itself; putting a run back where it was is only emitted as a reversal,
/// once. Randomly, each drawn sub-list gets one fresh destination and, when
/// reversing moves are enabled, a coin flip decides the direction.
pub struct SubListChangeMoveSelector<S, V, SS, DS> {
    sub_lists: SS,
    destinations: DS,
    variable: ListVariable<S, V>,
    select_reversing_move_too: bool,
    random: WorkingRandom,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, V, SS, DS> SubListChangeMoveSelector<S, V, SS, DS> {
    pub fn new(
        sub_lists: SS,
        destinations: DS,
        variable: ListVariable<S, V>,
        select_reversing_move_too: bool,
        random: WorkingRandom,
    ) -> Self {
        Self {
            sub_lists,
            destinations,
            variable,
            select_reversing_move_too,
            random,
            _phantom: PhantomData,
        }
    }
}

impl<S, V, SS: Debug, DS: Debug> Debug for SubListChangeMoveSelector<S, V, SS, DS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubListChangeMoveSelector")
            .field("sub_lists", &self.sub_lists)
            .field("destinations", &self.destinations)
            .field("select_reversing_move_too", &self.select_reversing_move_too)
            .field("variable_name", &self.variable.variable_name())
            .finish()
    }
}

impl<S, V, SS, DS> SelectorLifecycle<S> for SubListChangeMoveSelector<S, V, SS, DS>
where
    S: PlanningSolution,
    SS: SelectorLifecycle<S>,
    DS: SelectorLifecycle<S>,
{
    fn solving_started<D: ScoreDirector<S>>(
        &mut self,
        supply_manager: &mut SupplyManager,
        score_director: &D,
    ) -> Result<()> {
        self.sub_lists.solving_started(supply_manager, score_director)?;
        self.destinations.solving_started(supply_manager, score_director)
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D) -> Result<()> {
        self.sub_lists.phase_started(score_director)?;
        self.destinations.phase_started(score_director)
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D) {
        self.sub_lists.step_started(score_director);
        self.destinations.step_started(score_director);
    }

    fn phase_ended(&mut self) {
        self.sub_lists.phase_ended();
        self.destinations.phase_ended();
    }

    fn solving_ended(&mut self, supply_manager: &mut SupplyManager) {
        self.sub_lists.solving_ended(supply_manager);
        self.destinations.solving_ended(supply_manager);
    }
}

impl<S, V, SS, DS> MoveSelector<S, SubListChangeMove<S, V>> for SubListChangeMoveSelector<S, V, SS, DS>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
    SS: SubListSelector<S>,
    DS: DestinationSelector<S>,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
    ) -> impl Iterator<Item = SubListChangeMove<S, V>> + 'a {
        let variable = self.variable;
        let reversing_too = self.select_reversing_move_too;
        if self.sub_lists.is_never_ending() {
            let mut sub_lists = self.sub_lists.iter(score_director);
            OrderedIter::Random(std::iter::from_fn(move || {
                let source = sub_lists.next()?;
                let destination = match landing(source, self.destinations.iter(score_director).next()?) {
                    Landing::At(destination) => destination,
                    Landing::Inside => source.first(),
                };
                let reversing = reversing_too && self.random.next_bool();
                Some(SubListChangeMove::new(source, destination, reversing, variable))
            }))
        } else {
            OrderedIter::Original(self.sub_lists.iter(score_director).flat_map(move |source| {
                self.destinations
                    .iter(score_director)
                    .filter_map(move |destination| {
                        let in_place = destination == source.first();
                        match landing(source, destination) {
                            Landing::At(landed) if landed != source.first() => Some((landed, false)),
                            // Only the head of the run maps back in place; the tail would repeat it.
                            Landing::At(landed) if in_place => Some((landed, true)),
                            _ => None,
                        }
                    })
                    .flat_map(move |(destination, in_place)| {
                        let forward = (!in_place).then(|| SubListChangeMove::new(source, destination, false, variable));
                        let reversed = (reversing_too && source.length > 1)
                            .then(|| SubListChangeMove::new(source, destination, true, variable));
                        forward.into_iter().chain(reversed)
                    })
            }))
        }
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        let pairs = self.sub_lists.size(score_director) * self.destinations.size(score_director);
        if self.select_reversing_move_too {
            pairs * 2
        } else {
            pairs
        }
    }

    fn is_never_ending(&self) -> bool {
        self.sub_lists.is_never_ending() || self.destinations.is_never_ending()
    }
}
