//! Nearby destination selector.

use std::fmt::{self, Debug};
use std::hash::Hash;

use listforge_core::domain::{ElementRef, ListVariable, PlanningSolution, SupplyManager};
use listforge_core::Result;
use listforge_scoring::ScoreDirector;

use super::distribution::NearbyRandom;
use super::matrix::NearbyMatrixLink;
use super::meter::{Destination, ListDistanceMeter};
use crate::heuristic::selector::destination::DestinationSelector;
use crate::heuristic::selector::lifecycle::SelectorLifecycle;
use crate::heuristic::selector::mimic::MimicReplayingElementSelector;
use crate::heuristic::selector::random::WorkingRandom;
use crate::heuristic::selector::selection_order::{OrderedIter, SelectionOrder};

/// Draws per destination before falling back to the origin's own slot.
const MAX_DRAW_ATTEMPTS: usize = 64;

/// Resolves a ranked destination to an insertion point, before removal.
pub(crate) fn insertion_point<S, V: PartialEq>(
    variable: &ListVariable<S, V>,
    solution: &S,
    destination: &Destination<V>,
) -> Option<ElementRef> {
    match destination {
        Destination::Entity(entity_index) => Some(ElementRef::new(*entity_index, 0)),
        Destination::Value(value) => variable
            .position_of(solution, value)
            .element_ref()
            .map(|element| ElementRef::new(element.entity_index, element.index + 1)),
    }
}

/// Selects insertion points near the element an origin selector is on.
///
/// The origin is replayed from a mimic recorder, so it always reflects the
/// element the paired source selector produced last. Exhaustively, the
/// origin's ranked row is walked nearest first. Randomly, every draw re-reads
/// the origin and picks a rank through [`NearbyRandom`].
pub struct NearbyDestinationSelector<S, V, M> {
    origin: MimicReplayingElementSelector,
    link: NearbyMatrixLink<S, V, M>,
    variable: ListVariable<S, V>,
    nearby_random: NearbyRandom,
    order: SelectionOrder,
    random: WorkingRandom,
}

impl<S, V, M> NearbyDestinationSelector<S, V, M>
where
    S: PlanningSolution,
    V: Clone + Eq + Hash + Send + Sync + Debug + 'static,
    M: ListDistanceMeter<S, V>,
{
    pub fn new(
        origin: MimicReplayingElementSelector,
        meter: M,
        variable: ListVariable<S, V>,
        nearby_random: NearbyRandom,
        order: SelectionOrder,
        random: WorkingRandom,
    ) -> Self {
        let size_cap = if order.is_random() {
            nearby_random.overall_size_maximum()
        } else {
            usize::MAX
        };
        Self {
            origin,
            link: NearbyMatrixLink::new(meter, variable, true, size_cap),
            variable,
            nearby_random,
            order,
            random,
        }
    }

    fn origin_value(&self, solution: &S) -> Option<V> {
        let origin = self.origin.current()?;
        self.variable.get(solution, origin.entity_index, origin.index)
    }
}

impl<S, V, M: Debug> Debug for NearbyDestinationSelector<S, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NearbyDestinationSelector")
            .field("origin", &self.origin)
            .field("link", &self.link)
            .field("variable_name", &self.variable.variable_name())
            .field("nearby_random", &self.nearby_random)
            .field("order", &self.order)
            .finish()
    }
}

impl<S, V, M> SelectorLifecycle<S> for NearbyDestinationSelector<S, V, M>
where
    S: PlanningSolution,
    V: Clone + Eq + Hash + Send + Sync + Debug + 'static,
    M: ListDistanceMeter<S, V>,
{
    fn solving_started<D: ScoreDirector<S>>(
        &mut self,
        supply_manager: &mut SupplyManager,
        score_director: &D,
    ) -> Result<()> {
        self.link
            .acquire(supply_manager, score_director.working_solution())
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, _score_director: &D) -> Result<()> {
        self.link.warm_up();
        Ok(())
    }

    fn solving_ended(&mut self, supply_manager: &mut SupplyManager) {
        self.link.release(supply_manager);
    }
}

impl<S, V, M> DestinationSelector<S> for NearbyDestinationSelector<S, V, M>
where
    S: PlanningSolution,
    V: Clone + Eq + Hash + Send + Sync + Debug + 'static,
    M: ListDistanceMeter<S, V>,
{
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
    ) -> impl Iterator<Item = ElementRef> + 'a {
        let solution = score_director.working_solution();
        let variable = self.variable;
        let matrix = self.link.read();
        match self.order {
            SelectionOrder::Original => {
                let row = self
                    .origin_value(solution)
                    .map(|origin| matrix.row(&origin))
                    .unwrap_or(&[]);
                OrderedIter::Original(
                    row.iter()
                        .filter_map(move |destination| insertion_point(&variable, solution, destination)),
                )
            }
            SelectionOrder::Random => OrderedIter::Random(std::iter::from_fn(move || {
                let origin = self.origin.current()?;
                let origin_value = variable.get(solution, origin.entity_index, origin.index)?;
                let row = matrix.row(&origin_value);
                if row.is_empty() {
                    return None;
                }
                for _ in 0..MAX_DRAW_ATTEMPTS {
                    let rank = self.nearby_random.next_index(&self.random, row.len());
                    if let Some(destination) = insertion_point(&variable, solution, &row[rank]) {
                        return Some(destination);
                    }
                }
                // Every drawn value was unassigned; fall back to the origin's own slot.
                Some(ElementRef::new(origin.entity_index, origin.index + 1))
            })),
        }
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        let solution = score_director.working_solution();
        let entity_count = self.variable.entity_count(solution);
        if entity_count == 0 {
            0
        } else {
            entity_count + self.variable.assigned_count(solution)
        }
    }

    fn is_never_ending(&self) -> bool {
        self.order.is_random()
    }
}
