//! Supply infrastructure for derived, demand-keyed data.
//!
//! Supplies hold data derived from the working problem that is too expensive
//! to recompute per move, such as nearby distance matrices.
//!
//! # Architecture
//!
//! - [`Supply`]: Marker trait for all supply types
//! - [`SupplyDemand`]: Value-equality key describing the supply it needs
//! - [`SupplyManager`]: Reference-counted registry of active supplies
//! - [`MemoizingSupply`]: Supply that defers its build until the first read
//!
//! Consumers pair every [`SupplyManager::acquire`] with a
//! [`SupplyManager::release`]. Two demands that compare equal share one
//! supply instance; the instance is dropped from the registry when the last
//! consumer releases it.

mod memoized;

pub use memoized::MemoizingSupply;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Marker trait for all supply types.
pub trait Supply: Send + Sync + 'static {}

/// Trait for requesting a specific type of supply.
///
/// The demand itself is the cache key: demands of the same type that compare
/// equal resolve to the same supply instance.
pub trait SupplyDemand: Clone + Eq + Send + Sync + 'static {
    /// The type of supply this demand requests.
    type Output: Supply;

    /// Creates a new supply instance for this demand.
    fn create_supply(&self) -> Self::Output;
}

struct SupplyEntry<D: SupplyDemand> {
    demand: D,
    supply: Arc<D::Output>,
    active_count: usize,
}

/// Manager that holds and provides supplies.
///
/// # Thread Safety
///
/// Supplies are handed out as `Arc`, so a consumer may keep reading its
/// supply after the manager has dropped the entry.
#[derive(Default)]
pub struct SupplyManager {
    /// Entries bucketed by demand type.
    entries: HashMap<TypeId, Vec<Box<dyn Any + Send + Sync>>>,
}

impl SupplyManager {
    /// Creates a new empty supply manager.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Gets or creates the supply for the given demand and counts one more consumer.
    pub fn acquire<D: SupplyDemand>(&mut self, demand: &D) -> Arc<D::Output> {
        let bucket = self.entries.entry(TypeId::of::<D>()).or_default();
        for entry in bucket.iter_mut() {
            if let Some(entry) = entry.downcast_mut::<SupplyEntry<D>>() {
                if entry.demand == *demand {
                    entry.active_count += 1;
                    return Arc::clone(&entry.supply);
                }
            }
        }

        let supply = Arc::new(demand.create_supply());
        bucket.push(Box::new(SupplyEntry {
            demand: demand.clone(),
            supply: Arc::clone(&supply),
            active_count: 1,
        }));
        supply
    }

    /// Releases one consumer of the demand's supply.
    ///
    /// Returns `false` if the demand was never acquired. The supply is dropped
    /// from the registry when its last consumer releases it, so a later
    /// `acquire` builds a fresh one.
    pub fn release<D: SupplyDemand>(&mut self, demand: &D) -> bool {
        let Some(bucket) = self.entries.get_mut(&TypeId::of::<D>()) else {
            return false;
        };
        let Some(position) = bucket.iter().position(|entry| {
            entry
                .downcast_ref::<SupplyEntry<D>>()
                .is_some_and(|entry| entry.demand == *demand)
        }) else {
            return false;
        };

        let exhausted = match bucket[position].downcast_mut::<SupplyEntry<D>>() {
            Some(entry) => {
                entry.active_count -= 1;
                entry.active_count == 0
            }
            None => false,
        };
        if exhausted {
            bucket.swap_remove(position);
            if bucket.is_empty() {
                self.entries.remove(&TypeId::of::<D>());
            }
        }
        true
    }

    /// Gets an existing supply without creating one or counting a consumer.
    pub fn get<D: SupplyDemand>(&self, demand: &D) -> Option<Arc<D::Output>> {
        self.find(demand).map(|entry| Arc::clone(&entry.supply))
    }

    /// Returns how many consumers currently hold the demand's supply.
    pub fn active_count<D: SupplyDemand>(&self, demand: &D) -> usize {
        self.find(demand).map_or(0, |entry| entry.active_count)
    }

    fn find<D: SupplyDemand>(&self, demand: &D) -> Option<&SupplyEntry<D>> {
        self.entries
            .get(&TypeId::of::<D>())?
            .iter()
            .filter_map(|entry| entry.downcast_ref::<SupplyEntry<D>>())
            .find(|entry| entry.demand == *demand)
    }

    /// Clears all supplies from the manager.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of registered supplies.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Returns true if no supplies are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for SupplyManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupplyManager")
            .field("supply_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
