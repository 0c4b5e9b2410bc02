//! Distance meters for nearby selection.

use std::fmt::{self, Debug};
use std::hash::Hash;

/// A candidate a nearby origin can be measured against.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Destination<V> {
    /// The front of an entity's list.
    Entity(usize),
    /// The slot right after an assigned value.
    Value(V),
}

/// Measures how far a destination is from an origin value.
///
/// Meters are part of the nearby matrix cache key: two selectors whose
/// meters compare equal share one matrix, so equality must mean "measures
/// the same thing".
///
/// Distances only rank candidates; they may be asymmetric and need not obey
/// the triangle inequality.
///
/// # Example
///
/// ```
/// use listforge_solver::heuristic::selector::nearby::{Destination, ListDistanceMeter};
///
/// #[derive(Clone, Debug, PartialEq, Eq)]
/// struct Stops { coordinates: Vec<i64> }
///
/// #[derive(Clone, Debug, PartialEq, Eq)]
/// struct StopDistance;
///
/// impl ListDistanceMeter<Stops, usize> for StopDistance {
///     fn distance(&self, stops: &Stops, origin: &usize, destination: &Destination<usize>) -> f64 {
///         match destination {
///             Destination::Entity(_) => stops.coordinates[*origin].abs() as f64,
///             Destination::Value(v) => (stops.coordinates[*origin] - stops.coordinates[*v]).abs() as f64,
///         }
///     }
/// }
///
/// let stops = Stops { coordinates: vec![0, 4, 9] };
/// assert_eq!(StopDistance.distance(&stops, &1, &Destination::Value(2)), 5.0);
/// ```
pub trait ListDistanceMeter<S, V>: Clone + Eq + Send + Sync + Debug + 'static {
    fn distance(&self, solution: &S, origin: &V, destination: &Destination<V>) -> f64;
}

/// A distance meter built from a plain function, identified by name.
///
/// Two meters with the same name compare equal regardless of the function
/// pointer, so give distinct metrics distinct names.
pub struct FnDistanceMeter<S, V> {
    name: &'static str,
    distance: fn(&S, &V, &Destination<V>) -> f64,
}

impl<S, V> FnDistanceMeter<S, V> {
    pub fn new(name: &'static str, distance: fn(&S, &V, &Destination<V>) -> f64) -> Self {
        Self { name, distance }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<S, V> Clone for FnDistanceMeter<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for FnDistanceMeter<S, V> {}

impl<S, V> PartialEq for FnDistanceMeter<S, V> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<S, V> Eq for FnDistanceMeter<S, V> {}

impl<S, V> Hash for FnDistanceMeter<S, V> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<S, V> Debug for FnDistanceMeter<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnDistanceMeter").field(&self.name).finish()
    }
}

impl<S: 'static, V: 'static> ListDistanceMeter<S, V> for FnDistanceMeter<S, V> {
    fn distance(&self, solution: &S, origin: &V, destination: &Destination<V>) -> f64 {
        (self.distance)(solution, origin, destination)
    }
}
