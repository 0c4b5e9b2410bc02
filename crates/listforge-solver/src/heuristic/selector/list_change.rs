//! List change move selector for element relocation.
//!
//! Pairs source elements with insertion points and turns every pair into a
//! [`ListChangeMove`]. Destination selectors report insertion points against
//! the list before removal; this selector shifts them to the post-removal
//! index the move expects.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use listforge_core::domain::{ElementRef, ListVariable, PlanningSolution, SupplyManager};
use listforge_core::Result;
use listforge_scoring::ScoreDirector;

use crate::heuristic::r#move::ListChangeMove;

use super::destination::DestinationSelector;
use super::element::ElementSelector;
use super::lifecycle::SelectorLifecycle;
use super::selection_order::OrderedIter;
use super::typed_move_selector::MoveSelector;

/// Maps a pre-removal insertion point to the index after `source` is removed.
pub(crate) fn destination_after_removal(source: ElementRef, destination: ElementRef) -> ElementRef {
    if destination.entity_index == source.entity_index && destination.index > source.index {
        ElementRef::new(destination.entity_index, destination.index - 1)
    } else {
        destination
    }
}

/// A move selector that generates list change moves.
///
/// With a finite source every source element is combined with every
/// destination, skipping the insertion points that would leave the element
/// where it is. With a never-ending source each drawn element gets one
/// freshly drawn destination; no pairs are filtered, so the stream never
/// stalls on a list holding a single element.
///
/// # Type Parameters
/// * `S` - The solution type
/// * `V` - The list element type
/// * `ES` - The source element selector
/// * `DS` - The destination selector
pub struct ListChangeMoveSelector<S, V, ES, DS> {
    sources: ES,
    destinations: DS,
    variable: ListVariable<S, V>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, V, ES, DS> ListChangeMoveSelector<S, V, ES, DS> {
    pub fn new(sources: ES, destinations: DS, variable: ListVariable<S, V>) -> Self {
        Self {
            sources,
            destinations,
            variable,
            _phantom: PhantomData,
        }
    }
}

impl<S, V, ES: Debug, DS: Debug> Debug for ListChangeMoveSelector<S, V, ES, DS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListChangeMoveSelector")
            .field("sources", &self.sources)
            .field("destinations", &self.destinations)
            .field("variable_name", &self.variable.variable_name())
            .finish()
    }
}

impl<S, V, ES, DS> SelectorLifecycle<S> for ListChangeMoveSelector<S, V, ES, DS>
where
    S: PlanningSolution,
    ES: SelectorLifecycle<S>,
    DS: SelectorLifecycle<S>,
{
    fn solving_started<D: ScoreDirector<S>>(
        &mut self,
        supply_manager: &mut SupplyManager,
        score_director: &D,
    ) -> Result<()> {
        self.sources.solving_started(supply_manager, score_director)?;
        self.destinations.solving_started(supply_manager, score_director)
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D) -> Result<()> {
        self.sources.phase_started(score_director)?;
        self.destinations.phase_started(score_director)
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D) {
        self.sources.step_started(score_director);
        self.destinations.step_started(score_director);
    }

    fn phase_ended(&mut self) {
        self.sources.phase_ended();
        self.destinations.phase_ended();
    }

    fn solving_ended(&mut self, supply_manager: &mut SupplyManager) {
        self.sources.solving_ended(supply_manager);
        self.destinations.solving_ended(supply_manager);
    }
}

impl<S, V, ES, DS> MoveSelector<S, ListChangeMove<S, V>> for ListChangeMoveSelector<S, V, ES, DS>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
    ES: ElementSelector<S>,
    DS: DestinationSelector<S>,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
    ) -> impl Iterator<Item = ListChangeMove<S, V>> + 'a {
        let variable = self.variable;
        if self.sources.is_never_ending() {
            let mut sources = self.sources.iter(score_director);
            OrderedIter::Random(std::iter::from_fn(move || {
                let source = sources.next()?;
                let destination = self.destinations.iter(score_director).next()?;
                Some(ListChangeMove::new(
                    source,
                    destination_after_removal(source, destination),
                    variable,
                ))
            }))
        } else {
            OrderedIter::Original(self.sources.iter(score_director).flat_map(move |source| {
                self.destinations
                    .iter(score_director)
                    .map(move |destination| destination_after_removal(source, destination))
                    .filter(move |destination| *destination != source)
                    .map(move |destination| ListChangeMove::new(source, destination, variable))
            }))
        }
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        self.sources.size(score_director) * self.destinations.size(score_director)
    }

    fn is_never_ending(&self) -> bool {
        self.sources.is_never_ending() || self.destinations.is_never_ending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::r#move::Move;
    use crate::heuristic::selector::destination::ElementDestinationSelector;
    use crate::heuristic::selector::element::FromListElementSelector;
    use crate::heuristic::selector::entity::FromSolutionEntitySelector;
    use crate::heuristic::selector::random::WorkingRandom;
    use crate::heuristic::selector::selection_order::SelectionOrder;
    use crate::heuristic::selector::value::AssignedValueSelector;
    use listforge_test::{create_director, list_variable, plan, routes, Plan};

    type Destinations = ElementDestinationSelector<
        Plan,
        usize,
        FromSolutionEntitySelector<Plan, usize>,
        AssignedValueSelector<Plan, usize>,
    >;

    fn selector(
        order: SelectionOrder,
        seed: u64,
    ) -> ListChangeMoveSelector<Plan, usize, FromListElementSelector<Plan, usize>, Destinations> {
        let random = WorkingRandom::seeded(seed);
        let destinations = ElementDestinationSelector::new(
            FromSolutionEntitySelector::new(list_variable(), order, random.clone()),
            AssignedValueSelector::new(list_variable(), order, random.clone()),
            list_variable(),
            order,
            random.clone(),
        );
        ListChangeMoveSelector::new(
            FromListElementSelector::new(list_variable(), order, random),
            destinations,
            list_variable(),
        )
    }

    #[test]
    fn removal_shift_applies_only_after_the_source() {
        let source = ElementRef::new(0, 2);
        assert_eq!(destination_after_removal(source, ElementRef::new(0, 1)), ElementRef::new(0, 1));
        assert_eq!(destination_after_removal(source, ElementRef::new(0, 3)), ElementRef::new(0, 2));
        assert_eq!(destination_after_removal(source, ElementRef::new(1, 3)), ElementRef::new(1, 3));
    }

    #[test]
    fn exhaustive_moves_are_all_doable_and_never_no_ops() {
        // Ann = [A, B, C], Bob = [X, Y]
        let director = create_director(plan(&[&[1, 2, 3], &[4, 5]]));
        let before = routes(director.working_solution());
        let selector = selector(SelectionOrder::Original, 0);

        let moves: Vec<_> = selector.iter_moves(&director).collect();
        for m in &moves {
            assert!(m.is_doable(&director), "{m:?}");
            let mut trial = create_director(director.working_solution().clone());
            m.do_move(&mut trial);
            assert_ne!(routes(trial.working_solution()), before, "{m:?}");
        }
        // Same-list targets: len - 1 per source; other-list targets: other len + 1.
        assert_eq!(moves.len(), 3 * (2 + 3) + 2 * (1 + 4));
        assert_eq!(selector.size(&director), 5 * 7);
    }

    #[test]
    fn exhaustive_moves_include_ann_to_end_of_bob() {
        let director = create_director(plan(&[&[1, 2, 3], &[4, 5]]));
        let selector = selector(SelectionOrder::Original, 0);

        let m = selector
            .iter_moves(&director)
            .find(|m| m.source() == ElementRef::new(0, 0) && m.destination() == ElementRef::new(1, 2))
            .unwrap();
        let mut director = director;
        m.do_move(&mut director);
        assert_eq!(routes(director.working_solution()), vec![vec![2, 3], vec![4, 5, 1]]);
    }

    #[test]
    fn random_moves_are_endless_and_in_range() {
        let director = create_director(plan(&[&[1, 2, 3], &[4, 5]]));
        let selector = selector(SelectionOrder::Random, 8);

        assert!(selector.is_never_ending());
        let moves: Vec<_> = selector.iter_moves(&director).take(500).collect();
        assert_eq!(moves.len(), 500);
        for m in moves {
            let destination = m.destination();
            let len = listforge_test::list_variable().list_size(director.working_solution(), destination.entity_index);
            if m.is_intra_list() {
                assert!(destination.index < len);
            } else {
                assert!(destination.index <= len);
            }
        }
    }

    #[test]
    fn random_source_on_single_element_list_does_not_stall() {
        let director = create_director(plan(&[&[1]]));
        let selector = selector(SelectionOrder::Random, 2);

        let moves: Vec<_> = selector.iter_moves(&director).take(10).collect();
        assert_eq!(moves.len(), 10);
        assert!(moves.iter().all(|m| !m.is_doable(&director)));
    }
}
