//! Caching decorator for element selectors.
//!
//! Materializes the child's exhaustive sequence once per step (or phase) so
//! repeated scans within that window do not touch the position oracle.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use listforge_config::SelectionCacheType;
use listforge_core::domain::{ElementRef, PlanningSolution, SupplyManager};
use listforge_core::{ListForgeError, Result};
use listforge_scoring::ScoreDirector;
use tracing::trace;

use super::element::ElementSelector;
use super::lifecycle::SelectorLifecycle;
use super::random::WorkingRandom;
use super::selection_order::{OrderedIter, SelectionOrder};

/// Caches the elements of a finite child selector.
///
/// In original order the cache is replayed as is; in random order elements
/// are drawn from the cache with replacement, endlessly.
///
/// # Panics
///
/// Iterating before the cache was filled (outside the step or phase the
/// cache belongs to) is a contract violation.
pub struct CachingElementSelector<S, ES> {
    child: ES,
    cache_type: SelectionCacheType,
    order: SelectionOrder,
    random: WorkingRandom,
    cached: Option<Vec<ElementRef>>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, ES> CachingElementSelector<S, ES>
where
    S: PlanningSolution,
    ES: ElementSelector<S>,
{
    /// Wraps `child`, caching per step or per phase.
    ///
    /// Fails if `cache_type` is just-in-time or the child is never ending.
    pub fn new(
        child: ES,
        cache_type: SelectionCacheType,
        order: SelectionOrder,
        random: WorkingRandom,
    ) -> Result<Self> {
        if cache_type == SelectionCacheType::JustInTime {
            return Err(ListForgeError::config(
                "a caching selector needs a step or phase cache type",
            ));
        }
        if child.is_never_ending() {
            return Err(ListForgeError::config(format!(
                "cannot cache the never-ending selector {child:?}"
            )));
        }
        Ok(Self {
            child,
            cache_type,
            order,
            random,
            cached: None,
            _phantom: PhantomData,
        })
    }

    fn refill<D: ScoreDirector<S>>(&mut self, score_director: &D) {
        let elements: Vec<ElementRef> = self.child.iter(score_director).collect();
        trace!(cache_type = ?self.cache_type, size = elements.len(), "Element cache filled");
        self.cached = Some(elements);
    }

    fn cache(&self) -> &[ElementRef] {
        match &self.cached {
            Some(cached) => cached,
            None => panic!(
                "{:?} read outside its {:?} cache window",
                self, self.cache_type
            ),
        }
    }
}

impl<S, ES: Debug> Debug for CachingElementSelector<S, ES> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingElementSelector")
            .field("child", &self.child)
            .field("cache_type", &self.cache_type)
            .field("order", &self.order)
            .field("cached", &self.cached.as_ref().map(Vec::len))
            .finish()
    }
}

impl<S, ES> SelectorLifecycle<S> for CachingElementSelector<S, ES>
where
    S: PlanningSolution,
    ES: ElementSelector<S>,
{
    fn solving_started<D: ScoreDirector<S>>(
        &mut self,
        supply_manager: &mut SupplyManager,
        score_director: &D,
    ) -> Result<()> {
        self.child.solving_started(supply_manager, score_director)
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D) -> Result<()> {
        self.child.phase_started(score_director)?;
        if self.cache_type == SelectionCacheType::Phase {
            self.refill(score_director);
        }
        Ok(())
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D) {
        self.child.step_started(score_director);
        if self.cache_type == SelectionCacheType::Step {
            self.refill(score_director);
        }
    }

    fn phase_ended(&mut self) {
        self.child.phase_ended();
        self.cached = None;
    }

    fn solving_ended(&mut self, supply_manager: &mut SupplyManager) {
        self.child.solving_ended(supply_manager);
    }
}

impl<S, ES> ElementSelector<S> for CachingElementSelector<S, ES>
where
    S: PlanningSolution,
    ES: ElementSelector<S>,
{
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        _score_director: &'a D,
    ) -> impl Iterator<Item = ElementRef> + 'a {
        let cache = self.cache();
        match self.order {
            SelectionOrder::Original => OrderedIter::Original(cache.iter().copied()),
            SelectionOrder::Random => OrderedIter::Random(std::iter::from_fn(move || {
                (!cache.is_empty()).then(|| cache[self.random.next_index(cache.len())])
            })),
        }
    }

    fn size<D: ScoreDirector<S>>(&self, _score_director: &D) -> usize {
        self.cache().len()
    }

    fn is_never_ending(&self) -> bool {
        self.order.is_random()
    }
}
