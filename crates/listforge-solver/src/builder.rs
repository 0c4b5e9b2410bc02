//! Builder module for constructing list move selectors from configuration
//!
//! This module provides the wiring between [`MoveSelectorConfig`] and the
//! selector trees that generate list moves. Every selector built for one
//! [`ListForgeConfig`] draws from the same [`WorkingRandom`].

use std::fmt::{self, Debug};
use std::hash::Hash;

use listforge_config::{
    ListChangeMoveConfig, ListForgeConfig, ListSwapMoveConfig, MoveSelectorConfig,
    NearbySelectionConfig, SelectionCacheType, SubListChangeMoveConfig, SubListSwapMoveConfig,
};
use listforge_core::domain::{ElementRef, ListVariable, PlanningSolution, SupplyManager};
use listforge_core::{ListForgeError, Result};
use listforge_scoring::ScoreDirector;
use tracing::debug;

use crate::heuristic::r#move::ListMoveImpl;
use crate::heuristic::selector::cached::CachingElementSelector;
use crate::heuristic::selector::destination::ElementDestinationSelector;
use crate::heuristic::selector::element::{ElementSelector, FromListElementSelector};
use crate::heuristic::selector::entity::FromSolutionEntitySelector;
use crate::heuristic::selector::k_opt::KOptListMoveSelector;
use crate::heuristic::selector::lifecycle::SelectorLifecycle;
use crate::heuristic::selector::list_change::ListChangeMoveSelector;
use crate::heuristic::selector::list_swap::ListSwapMoveSelector;
use crate::heuristic::selector::mimic::{
    MimicRecorder, MimicRecordingElementSelector, MimicRecordingSubListSelector,
    MimicReplayingElementSelector,
};
use crate::heuristic::selector::nearby::{
    FnDistanceMeter, ListDistanceMeter, NearbyDestinationSelector, NearbyRandom,
};
use crate::heuristic::selector::random::WorkingRandom;
use crate::heuristic::selector::selection_order::{OrderedIter, SelectionOrder};
use crate::heuristic::selector::sublist::FromSolutionSubListSelector;
use crate::heuristic::selector::sublist_change::SubListChangeMoveSelector;
use crate::heuristic::selector::sublist_swap::SubListSwapMoveSelector;
use crate::heuristic::selector::typed_move_selector::MoveSelector;
use crate::heuristic::selector::value::AssignedValueSelector;

/// Source elements of a change or swap selector, cached or looked up live.
pub enum ElementSource<S, V> {
    JustInTime(FromListElementSelector<S, V>),
    Cached(CachingElementSelector<S, FromListElementSelector<S, V>>),
}

impl<S, V> ElementSource<S, V>
where
    S: PlanningSolution,
    V: Send + 'static,
{
    /// Builds the element source a cache type asks for.
    ///
    /// A cached source materializes the slots in list order and applies
    /// `order` when replaying the cache.
    pub fn new(
        variable: ListVariable<S, V>,
        cache_type: SelectionCacheType,
        order: SelectionOrder,
        random: WorkingRandom,
    ) -> Result<Self> {
        match cache_type {
            SelectionCacheType::JustInTime => Ok(ElementSource::JustInTime(FromListElementSelector::new(
                variable, order, random,
            ))),
            SelectionCacheType::Step | SelectionCacheType::Phase => {
                CachingElementSelector::new(FromListElementSelector::original(variable), cache_type, order, random)
                    .map(ElementSource::Cached)
            }
        }
    }
}

impl<S, V> Debug for ElementSource<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementSource::JustInTime(selector) => selector.fmt(f),
            ElementSource::Cached(selector) => selector.fmt(f),
        }
    }
}

impl<S, V> SelectorLifecycle<S> for ElementSource<S, V>
where
    S: PlanningSolution,
    V: Send + 'static,
{
    fn solving_started<D: ScoreDirector<S>>(
        &mut self,
        supply_manager: &mut SupplyManager,
        score_director: &D,
    ) -> Result<()> {
        match self {
            ElementSource::JustInTime(selector) => selector.solving_started(supply_manager, score_director),
            ElementSource::Cached(selector) => selector.solving_started(supply_manager, score_director),
        }
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D) -> Result<()> {
        match self {
            ElementSource::JustInTime(selector) => selector.phase_started(score_director),
            ElementSource::Cached(selector) => selector.phase_started(score_director),
        }
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D) {
        match self {
            ElementSource::JustInTime(selector) => selector.step_started(score_director),
            ElementSource::Cached(selector) => selector.step_started(score_director),
        }
    }

    fn phase_ended(&mut self) {
        match self {
            ElementSource::JustInTime(selector) => SelectorLifecycle::<S>::phase_ended(selector),
            ElementSource::Cached(selector) => selector.phase_ended(),
        }
    }

    fn solving_ended(&mut self, supply_manager: &mut SupplyManager) {
        match self {
            ElementSource::JustInTime(selector) => SelectorLifecycle::<S>::solving_ended(selector, supply_manager),
            ElementSource::Cached(selector) => selector.solving_ended(supply_manager),
        }
    }
}

impl<S, V> ElementSelector<S> for ElementSource<S, V>
where
    S: PlanningSolution,
    V: Send + 'static,
{
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
    ) -> impl Iterator<Item = ElementRef> + 'a {
        // Either-iterator; the variant names do not imply an order here.
        match self {
            ElementSource::JustInTime(selector) => OrderedIter::Original(selector.iter(score_director)),
            ElementSource::Cached(selector) => OrderedIter::Random(selector.iter(score_director)),
        }
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        match self {
            ElementSource::JustInTime(selector) => selector.size(score_director),
            ElementSource::Cached(selector) => selector.size(score_director),
        }
    }

    fn is_never_ending(&self) -> bool {
        match self {
            ElementSource::JustInTime(selector) => ElementSelector::<S>::is_never_ending(selector),
            ElementSource::Cached(selector) => selector.is_never_ending(),
        }
    }
}

/// Insertion points at list heads and after assigned values.
pub type PlainDestinations<S, V> =
    ElementDestinationSelector<S, V, FromSolutionEntitySelector<S, V>, AssignedValueSelector<S, V>>;

/// Sub-list source recorded for a nearby destination selector.
pub type RecordedSubLists<S, V> = MimicRecordingSubListSelector<S, FromSolutionSubListSelector<S, V>>;

/// Any move selector a [`MoveSelectorConfig`] can describe.
///
/// `M` is the distance meter of nearby variants; configurations without
/// nearby selection never use it.
pub enum ListMoveSelectorImpl<S, V, M = FnDistanceMeter<S, V>> {
    Change(ListChangeMoveSelector<S, V, ElementSource<S, V>, PlainDestinations<S, V>>),
    NearbyChange(
        ListChangeMoveSelector<
            S,
            V,
            MimicRecordingElementSelector<S, ElementSource<S, V>>,
            NearbyDestinationSelector<S, V, M>,
        >,
    ),
    Swap(ListSwapMoveSelector<S, V, ElementSource<S, V>, FromListElementSelector<S, V>>),
    SubListChange(
        SubListChangeMoveSelector<S, V, FromSolutionSubListSelector<S, V>, PlainDestinations<S, V>>,
    ),
    NearbySubListChange(
        SubListChangeMoveSelector<S, V, RecordedSubLists<S, V>, NearbyDestinationSelector<S, V, M>>,
    ),
    SubListSwap(
        SubListSwapMoveSelector<S, V, FromSolutionSubListSelector<S, V>, FromSolutionSubListSelector<S, V>>,
    ),
    KOpt(KOptListMoveSelector<S, V>),
}

macro_rules! dispatch {
    ($self:expr, $selector:ident => $body:expr) => {
        match $self {
            ListMoveSelectorImpl::Change($selector) => $body,
            ListMoveSelectorImpl::NearbyChange($selector) => $body,
            ListMoveSelectorImpl::Swap($selector) => $body,
            ListMoveSelectorImpl::SubListChange($selector) => $body,
            ListMoveSelectorImpl::NearbySubListChange($selector) => $body,
            ListMoveSelectorImpl::SubListSwap($selector) => $body,
            ListMoveSelectorImpl::KOpt($selector) => $body,
        }
    };
}

impl<S, V, M: Debug> Debug for ListMoveSelectorImpl<S, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, selector => selector.fmt(f))
    }
}

impl<S, V, M> SelectorLifecycle<S> for ListMoveSelectorImpl<S, V, M>
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
        dispatch!(self, selector => selector.solving_started(supply_manager, score_director))
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D) -> Result<()> {
        dispatch!(self, selector => selector.phase_started(score_director))
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D) {
        dispatch!(self, selector => selector.step_started(score_director))
    }

    fn phase_ended(&mut self) {
        dispatch!(self, selector => SelectorLifecycle::<S>::phase_ended(selector))
    }

    fn solving_ended(&mut self, supply_manager: &mut SupplyManager) {
        dispatch!(self, selector => SelectorLifecycle::<S>::solving_ended(selector, supply_manager))
    }
}

impl<S, V, M> MoveSelector<S, ListMoveImpl<S, V>> for ListMoveSelectorImpl<S, V, M>
where
    S: PlanningSolution,
    V: Clone + Eq + Hash + Send + Sync + Debug + 'static,
    M: ListDistanceMeter<S, V>,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
    ) -> impl Iterator<Item = ListMoveImpl<S, V>> + 'a {
        dispatch!(self, selector => Box::new(
            selector.iter_moves(score_director).map(ListMoveImpl::from)
        ) as Box<dyn Iterator<Item = ListMoveImpl<S, V>> + 'a>)
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        dispatch!(self, selector => selector.size(score_director))
    }

    fn is_never_ending(&self) -> bool {
        dispatch!(self, selector => selector.is_never_ending())
    }
}

/// Builder for constructing list move selectors from configuration.
pub struct ListMoveSelectorBuilder;

impl ListMoveSelectorBuilder {
    /// Builds one move selector.
    ///
    /// `meter` is required when the configuration asks for nearby selection.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid bounds, a just-in-time
    /// cache over a never-ending source, or nearby selection without a meter.
    pub fn build<S, V, M>(
        config: &MoveSelectorConfig,
        variable: ListVariable<S, V>,
        random: &WorkingRandom,
        meter: Option<M>,
    ) -> Result<ListMoveSelectorImpl<S, V, M>>
    where
        S: PlanningSolution,
        V: Clone + Eq + Hash + Send + Sync + Debug + 'static,
        M: ListDistanceMeter<S, V>,
    {
        config
            .validate()
            .map_err(|err| ListForgeError::config(err.to_string()))?;

        let selector = match config {
            MoveSelectorConfig::ListChangeMoveSelector(change) => {
                Self::list_change(change, variable, random, meter)?
            }
            MoveSelectorConfig::ListSwapMoveSelector(swap) => Self::list_swap(swap, variable, random)?,
            MoveSelectorConfig::SubListChangeMoveSelector(change) => {
                Self::sub_list_change(change, variable, random, meter)?
            }
            MoveSelectorConfig::SubListSwapMoveSelector(swap) => {
                Self::sub_list_swap(swap, variable, random)?
            }
            MoveSelectorConfig::KOptListMoveSelector(k_opt) => ListMoveSelectorImpl::KOpt(
                KOptListMoveSelector::from_config(k_opt, variable, random.clone())?,
            ),
        };
        debug!(selector = ?selector, "Built move selector");
        Ok(selector)
    }

    /// Builds every move selector of `config`, sharing one random stream
    /// seeded from `config.random_seed`.
    pub fn build_all<S, V, M>(
        config: &ListForgeConfig,
        variable: ListVariable<S, V>,
        meter: Option<M>,
    ) -> Result<Vec<ListMoveSelectorImpl<S, V, M>>>
    where
        S: PlanningSolution,
        V: Clone + Eq + Hash + Send + Sync + Debug + 'static,
        M: ListDistanceMeter<S, V>,
    {
        let random = WorkingRandom::new(config.random_seed);
        config
            .move_selectors
            .iter()
            .map(|selector| Self::build(selector, variable, &random, meter.clone()))
            .collect()
    }

    fn plain_destinations<S, V>(
        variable: ListVariable<S, V>,
        order: SelectionOrder,
        random: &WorkingRandom,
    ) -> PlainDestinations<S, V> {
        ElementDestinationSelector::new(
            FromSolutionEntitySelector::new(variable, order, random.clone()),
            AssignedValueSelector::new(variable, order, random.clone()),
            variable,
            order,
            random.clone(),
        )
    }

    fn nearby_random<M>(
        config: &NearbySelectionConfig,
        meter: Option<M>,
    ) -> Result<(M, NearbyRandom)> {
        let meter = meter.ok_or_else(|| ListForgeError::config("nearby selection needs a distance meter"))?;
        Ok((meter, NearbyRandom::from_config(config)?))
    }

    fn list_change<S, V, M>(
        config: &ListChangeMoveConfig,
        variable: ListVariable<S, V>,
        random: &WorkingRandom,
        meter: Option<M>,
    ) -> Result<ListMoveSelectorImpl<S, V, M>>
    where
        S: PlanningSolution,
        V: Clone + Eq + Hash + Send + Sync + Debug + 'static,
        M: ListDistanceMeter<S, V>,
    {
        let order = SelectionOrder::from(config.selection_order);
        let sources = ElementSource::new(variable, config.cache_type, order, random.clone())?;

        let Some(nearby) = &config.nearby_selection else {
            let destinations = Self::plain_destinations(variable, order, random);
            return Ok(ListMoveSelectorImpl::Change(ListChangeMoveSelector::new(
                sources,
                destinations,
                variable,
            )));
        };

        let (meter, nearby_random) = Self::nearby_random(nearby, meter)?;
        let recording = MimicRecordingElementSelector::new(sources, MimicRecorder::new("list change origin"));
        let destinations = NearbyDestinationSelector::new(
            MimicReplayingElementSelector::new(recording.recorder()),
            meter,
            variable,
            nearby_random,
            order,
            random.clone(),
        );
        Ok(ListMoveSelectorImpl::NearbyChange(ListChangeMoveSelector::new(
            recording,
            destinations,
            variable,
        )))
    }

    fn list_swap<S, V, M>(
        config: &ListSwapMoveConfig,
        variable: ListVariable<S, V>,
        random: &WorkingRandom,
    ) -> Result<ListMoveSelectorImpl<S, V, M>>
    where
        S: PlanningSolution,
        V: Send + 'static,
    {
        let order = SelectionOrder::from(config.selection_order);
        let left = ElementSource::new(variable, config.cache_type, order, random.clone())?;
        let right = FromListElementSelector::new(variable, order, random.clone());
        Ok(ListMoveSelectorImpl::Swap(ListSwapMoveSelector::new(left, right, variable)))
    }

    fn sub_list_change<S, V, M>(
        config: &SubListChangeMoveConfig,
        variable: ListVariable<S, V>,
        random: &WorkingRandom,
        meter: Option<M>,
    ) -> Result<ListMoveSelectorImpl<S, V, M>>
    where
        S: PlanningSolution,
        V: Clone + Eq + Hash + Send + Sync + Debug + 'static,
        M: ListDistanceMeter<S, V>,
    {
        let order = SelectionOrder::from(config.selection_order);
        let bounds = &config.sub_list_selector;
        let sub_lists = FromSolutionSubListSelector::new(
            variable,
            bounds.minimum_sub_list_size,
            bounds.maximum_sub_list_size,
            order,
            random.clone(),
        )?;

        let Some(nearby) = &config.nearby_selection else {
            let destinations = Self::plain_destinations(variable, order, random);
            return Ok(ListMoveSelectorImpl::SubListChange(SubListChangeMoveSelector::new(
                sub_lists,
                destinations,
                variable,
                config.select_reversing_move_too,
                random.clone(),
            )));
        };

        let (meter, nearby_random) = Self::nearby_random(nearby, meter)?;
        let recording = MimicRecordingSubListSelector::new(sub_lists, MimicRecorder::new("sub-list change origin"));
        let destinations = NearbyDestinationSelector::new(
            MimicReplayingElementSelector::sub_list_head(recording.recorder()),
            meter,
            variable,
            nearby_random,
            order,
            random.clone(),
        );
        Ok(ListMoveSelectorImpl::NearbySubListChange(SubListChangeMoveSelector::new(
            recording,
            destinations,
            variable,
            config.select_reversing_move_too,
            random.clone(),
        )))
    }

    fn sub_list_swap<S, V, M>(
        config: &SubListSwapMoveConfig,
        variable: ListVariable<S, V>,
        random: &WorkingRandom,
    ) -> Result<ListMoveSelectorImpl<S, V, M>> {
        let order = SelectionOrder::from(config.selection_order);
        let bounds = &config.sub_list_selector;
        let side = || {
            FromSolutionSubListSelector::new(
                variable,
                bounds.minimum_sub_list_size,
                bounds.maximum_sub_list_size,
                order,
                random.clone(),
            )
        };
        Ok(ListMoveSelectorImpl::SubListSwap(SubListSwapMoveSelector::new(
            side()?,
            side()?,
            variable,
            config.select_reversing_move_too,
            random.clone(),
        )))
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
