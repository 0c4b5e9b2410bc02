//! Tests for the supply manager.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::*;

#[derive(Debug)]
struct CountSupply {
    value: usize,
}

impl Supply for CountSupply {}

// Equality ignores the build counter.
#[derive(Clone)]
struct CountDemand {
    variable: &'static str,
    builds: Arc<AtomicUsize>,
}

impl PartialEq for CountDemand {
    fn eq(&self, other: &Self) -> bool {
        self.variable == other.variable
    }
}

impl Eq for CountDemand {}

impl CountDemand {
    fn new(variable: &'static str, builds: &Arc<AtomicUsize>) -> Self {
        Self {
            variable,
            builds: Arc::clone(builds),
        }
    }
}

impl SupplyDemand for CountDemand {
    type Output = CountSupply;

    fn create_supply(&self) -> CountSupply {
        CountSupply {
            value: self.builds.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
struct LazyDemand(u32);

impl SupplyDemand for LazyDemand {
    type Output = MemoizingSupply<Vec<u32>>;

    fn create_supply(&self) -> Self::Output {
        let n = self.0;
        MemoizingSupply::new(move || (0..n).collect())
    }
}

#[test]
fn equal_demands_share_one_supply() {
    let builds = Arc::new(AtomicUsize::new(0));
    let mut manager = SupplyManager::new();

    let first = manager.acquire(&CountDemand::new("visits", &builds));
    let second = manager.acquire(&CountDemand::new("visits", &builds));

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert_eq!(manager.active_count(&CountDemand::new("visits", &builds)), 2);
    assert_eq!(manager.len(), 1);
}

#[test]
fn different_demands_get_different_supplies() {
    let builds = Arc::new(AtomicUsize::new(0));
    let mut manager = SupplyManager::new();

    let visits = manager.acquire(&CountDemand::new("visits", &builds));
    let tasks = manager.acquire(&CountDemand::new("tasks", &builds));

    assert!(!Arc::ptr_eq(&visits, &tasks));
    assert_eq!(manager.len(), 2);
}

#[test]
fn release_drops_supply_after_last_consumer() {
    let builds = Arc::new(AtomicUsize::new(0));
    let demand = CountDemand::new("visits", &builds);
    let mut manager = SupplyManager::new();

    let first = manager.acquire(&demand);
    manager.acquire(&demand);

    assert!(manager.release(&demand));
    assert_eq!(manager.active_count(&demand), 1);
    assert!(manager.get(&demand).is_some());

    assert!(manager.release(&demand));
    assert!(manager.get(&demand).is_none());
    assert!(manager.is_empty());

    let fresh = manager.acquire(&demand);
    assert!(!Arc::ptr_eq(&first, &fresh));
    assert_eq!(fresh.value, 2);
}

#[test]
fn release_unknown_demand_is_rejected() {
    let builds = Arc::new(AtomicUsize::new(0));
    let mut manager = SupplyManager::new();

    assert!(!manager.release(&CountDemand::new("visits", &builds)));
    assert!(!manager.release(&LazyDemand(3)));
}

#[test]
fn memoizing_supply_builds_on_first_read() {
    let mut manager = SupplyManager::new();
    let supply = manager.acquire(&LazyDemand(4));

    assert!(!supply.is_initialized());
    assert_eq!(supply.read(), &vec![0, 1, 2, 3]);
    assert!(supply.is_initialized());

    let again = manager.acquire(&LazyDemand(4));
    assert!(again.is_initialized());
    assert!(std::ptr::eq(supply.read(), again.read()));
}

#[test]
fn clear_removes_everything() {
    let mut manager = SupplyManager::new();
    manager.acquire(&LazyDemand(1));
    manager.acquire(&LazyDemand(2));
    assert_eq!(manager.len(), 2);

    manager.clear();
    assert!(manager.is_empty());
}
