//! Nearby sub-list selector.

use std::fmt::{self, Debug};
use std::hash::Hash;

use listforge_core::domain::{ListVariable, PlanningSolution, SubList, SupplyManager};
use listforge_core::Result;
use listforge_scoring::ScoreDirector;
use tracing::trace;

use super::distribution::NearbyRandom;
use super::matrix::NearbyMatrixLink;
use super::meter::{Destination, ListDistanceMeter};
use crate::heuristic::selector::lifecycle::SelectorLifecycle;
use crate::heuristic::selector::mimic::MimicReplayingSubListSelector;
use crate::heuristic::selector::random::WorkingRandom;
use crate::heuristic::selector::selection_order::{OrderedIter, SelectionOrder};
use crate::heuristic::selector::sublist::SubListSelector;
use crate::heuristic::selector::triangle::TriangularSampler;

/// Draws per sub-list before giving up on finding a long enough run.
const MAX_DRAW_ATTEMPTS: usize = 64;

/// Selects sub-lists that start at a value near the origin sub-list's head.
///
/// A ranked value only qualifies if at least the minimum sub-list length
/// fits between it and the end of its list. Randomly, ranks are redrawn
/// until one qualifies; after a bounded number of misses the origin itself
/// is returned, which downstream moves reject as not doable.
pub struct NearbySubListSelector<S, V, M> {
    origin: MimicReplayingSubListSelector,
    link: NearbyMatrixLink<S, V, M>,
    variable: ListVariable<S, V>,
    sampler: TriangularSampler,
    nearby_random: NearbyRandom,
    order: SelectionOrder,
    random: WorkingRandom,
}

impl<S, V, M> NearbySubListSelector<S, V, M>
where
    S: PlanningSolution,
    V: Clone + Eq + Hash + Send + Sync + Debug + 'static,
    M: ListDistanceMeter<S, V>,
{
    /// Creates a nearby sub-list selector.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero minimum or `minimum > maximum`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        origin: MimicReplayingSubListSelector,
        meter: M,
        variable: ListVariable<S, V>,
        minimum_sub_list_size: usize,
        maximum_sub_list_size: usize,
        nearby_random: NearbyRandom,
        order: SelectionOrder,
        random: WorkingRandom,
    ) -> Result<Self> {
        let size_cap = if order.is_random() {
            nearby_random.overall_size_maximum()
        } else {
            usize::MAX
        };
        Ok(Self {
            origin,
            link: NearbyMatrixLink::new(meter, variable, false, size_cap),
            variable,
            sampler: TriangularSampler::new(minimum_sub_list_size, maximum_sub_list_size)?,
            nearby_random,
            order,
            random,
        })
    }

    fn origin_value(&self, solution: &S) -> Option<V> {
        let origin = self.origin.current()?;
        self.variable
            .get(solution, origin.entity_index, origin.from_index)
    }

    /// Start slot and room left in its list, for a ranked value.
    fn head(&self, solution: &S, destination: &Destination<V>) -> Option<(usize, usize, usize)> {
        let Destination::Value(value) = destination else {
            return None;
        };
        let element = self.variable.position_of(solution, value).element_ref()?;
        let available = self.variable.list_size(solution, element.entity_index) - element.index;
        (available >= self.sampler.minimum()).then_some((element.entity_index, element.index, available))
    }
}

impl<S, V, M: Debug> Debug for NearbySubListSelector<S, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NearbySubListSelector")
            .field("origin", &self.origin)
            .field("link", &self.link)
            .field("sampler", &self.sampler)
            .field("nearby_random", &self.nearby_random)
            .field("order", &self.order)
            .finish()
    }
}

impl<S, V, M> SelectorLifecycle<S> for NearbySubListSelector<S, V, M>
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

impl<S, V, M> SubListSelector<S> for NearbySubListSelector<S, V, M>
where
    S: PlanningSolution,
    V: Clone + Eq + Hash + Send + Sync + Debug + 'static,
    M: ListDistanceMeter<S, V>,
{
    fn iter<'a, D: ScoreDirector<S>>(&'a self, score_director: &'a D) -> impl Iterator<Item = SubList> + 'a {
        let solution = score_director.working_solution();
        let matrix = self.link.read();
        let minimum = self.sampler.minimum();
        match self.order {
            SelectionOrder::Original => {
                let row = self
                    .origin_value(solution)
                    .map(|origin| matrix.row(&origin))
                    .unwrap_or(&[]);
                OrderedIter::Original(row.iter().filter_map(move |destination| self.head(solution, destination)).flat_map(
                    move |(entity, from, available)| {
                        (minimum..=self.sampler.longest(available))
                            .map(move |length| SubList::new(entity, from, length))
                    },
                ))
            }
            SelectionOrder::Random => OrderedIter::Random(std::iter::from_fn(move || {
                let origin = self.origin.current()?;
                let origin_value = self.origin_value(solution)?;
                let row = matrix.row(&origin_value);
                if row.is_empty() {
                    return None;
                }
                for _ in 0..MAX_DRAW_ATTEMPTS {
                    let rank = self.nearby_random.next_index(&self.random, row.len());
                    if let Some((entity, from, available)) = self.head(solution, &row[rank]) {
                        let length = self
                            .random
                            .next_in_inclusive(minimum, self.sampler.longest(available));
                        return Some(SubList::new(entity, from, length));
                    }
                }
                trace!(?origin, "No nearby sub-list long enough; replaying the origin");
                Some(origin)
            })),
        }
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        let solution = score_director.working_solution();
        (0..self.variable.entity_count(solution))
            .map(|entity| {
                self.sampler
                    .count(self.variable.list_size(solution, entity))
                    .unwrap_or(0)
            })
            .sum()
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
