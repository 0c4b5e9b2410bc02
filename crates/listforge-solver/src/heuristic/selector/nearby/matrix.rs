//! Nearby distance matrix and its demand-keyed supply.

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::Arc;

use listforge_core::domain::{ListVariable, MemoizingSupply, SupplyDemand, SupplyManager};
use listforge_core::{ListForgeError, Result};
use tracing::debug;

use super::meter::{Destination, ListDistanceMeter};

/// Per origin, the destinations ranked by increasing distance.
///
/// Rows are truncated to a fixed length. Ties keep enumeration order:
/// entities first, then values in list order. The origin itself is a
/// candidate like any other.
pub struct NearbyDistanceMatrix<V> {
    rows: HashMap<V, Vec<Destination<V>>>,
    row_len: usize,
}

impl<V> NearbyDistanceMatrix<V>
where
    V: Clone + Eq + Hash,
{
    /// Ranks `destinations` for every origin.
    pub fn build<F>(
        origins: impl IntoIterator<Item = V>,
        destinations: &[Destination<V>],
        size_cap: usize,
        mut distance: F,
    ) -> Self
    where
        F: FnMut(&V, &Destination<V>) -> f64,
    {
        let row_len = destinations.len().min(size_cap);
        let rows = origins
            .into_iter()
            .map(|origin| {
                let mut ranked: Vec<(f64, &Destination<V>)> = destinations
                    .iter()
                    .map(|destination| (distance(&origin, destination), destination))
                    .collect();
                ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
                let row = ranked
                    .into_iter()
                    .take(row_len)
                    .map(|(_, destination)| destination.clone())
                    .collect();
                (origin, row)
            })
            .collect();
        Self { rows, row_len }
    }

    /// The ranked destinations for `origin`, empty if it is not an origin.
    pub fn row(&self, origin: &V) -> &[Destination<V>] {
        self.rows.get(origin).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The destination at `rank` for `origin`.
    pub fn destination(&self, origin: &V, rank: usize) -> Option<&Destination<V>> {
        self.row(origin).get(rank)
    }

    pub fn origin_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of every row.
    pub fn row_len(&self) -> usize {
        self.row_len
    }
}

impl<V> Debug for NearbyDistanceMatrix<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NearbyDistanceMatrix")
            .field("origin_count", &self.rows.len())
            .field("row_len", &self.row_len)
            .finish()
    }
}

/// Rejects matrices whose cell count overflows a 32-bit count.
pub fn check_matrix_capacity(origin_count: usize, row_len: usize) -> Result<()> {
    match origin_count.checked_mul(row_len) {
        Some(cells) if cells <= i32::MAX as usize => Ok(()),
        _ => Err(ListForgeError::capacity(format!(
            "nearby matrix of {origin_count} origins by {row_len} destinations exceeds {} cells",
            i32::MAX
        ))),
    }
}

/// Requests the nearby matrix of one list variable under one meter.
///
/// Equality covers the meter, the variable identity, whether entity heads
/// are destinations and the row cap; the solution snapshot the matrix is
/// built from is not part of the key.
pub struct NearbyMatrixDemand<S, V, M> {
    meter: M,
    variable: ListVariable<S, V>,
    with_entities: bool,
    size_cap: usize,
    snapshot: Arc<S>,
}

impl<S, V, M> NearbyMatrixDemand<S, V, M> {
    pub fn new(
        meter: M,
        variable: ListVariable<S, V>,
        with_entities: bool,
        size_cap: usize,
        snapshot: Arc<S>,
    ) -> Self {
        Self {
            meter,
            variable,
            with_entities,
            size_cap,
            snapshot,
        }
    }
}

impl<S, V, M: Clone> Clone for NearbyMatrixDemand<S, V, M> {
    fn clone(&self) -> Self {
        Self {
            meter: self.meter.clone(),
            variable: self.variable,
            with_entities: self.with_entities,
            size_cap: self.size_cap,
            snapshot: Arc::clone(&self.snapshot),
        }
    }
}

impl<S, V, M: PartialEq> PartialEq for NearbyMatrixDemand<S, V, M> {
    fn eq(&self, other: &Self) -> bool {
        self.meter == other.meter
            && self.variable.descriptor_index() == other.variable.descriptor_index()
            && self.variable.variable_name() == other.variable.variable_name()
            && self.with_entities == other.with_entities
            && self.size_cap == other.size_cap
    }
}

impl<S, V, M: Eq> Eq for NearbyMatrixDemand<S, V, M> {}

impl<S, V, M: Debug> Debug for NearbyMatrixDemand<S, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NearbyMatrixDemand")
            .field("meter", &self.meter)
            .field("variable_name", &self.variable.variable_name())
            .field("with_entities", &self.with_entities)
            .field("size_cap", &self.size_cap)
            .finish()
    }
}

impl<S, V, M> SupplyDemand for NearbyMatrixDemand<S, V, M>
where
    S: Send + Sync + 'static,
    V: Clone + Eq + Hash + Send + Sync + 'static,
    M: ListDistanceMeter<S, V>,
{
    type Output = MemoizingSupply<NearbyDistanceMatrix<V>>;

    fn create_supply(&self) -> Self::Output {
        let demand = self.clone();
        MemoizingSupply::new(move || {
            let solution = demand.snapshot.as_ref();
            let variable = demand.variable;
            let origins: Vec<V> = (0..variable.entity_count(solution))
                .flat_map(|entity| variable.snapshot(solution, entity))
                .collect();
            let mut destinations: Vec<Destination<V>> = Vec::new();
            if demand.with_entities {
                destinations.extend((0..variable.entity_count(solution)).map(Destination::Entity));
            }
            destinations.extend(origins.iter().cloned().map(Destination::Value));

            let matrix = NearbyDistanceMatrix::build(
                origins,
                &destinations,
                demand.size_cap,
                |origin, destination| demand.meter.distance(solution, origin, destination),
            );
            debug!(
                variable_name = variable.variable_name(),
                meter = ?demand.meter,
                origin_count = matrix.origin_count(),
                row_len = matrix.row_len(),
                "Nearby distance matrix built"
            );
            matrix
        })
    }
}

/// One consumer's hold on a shared nearby matrix.
///
/// `acquire` registers the demand at solving start, `read` forces the build
/// at phase start, `release` hands the demand back at solving end. Reading
/// outside that window is a contract violation.
pub(crate) struct NearbyMatrixLink<S, V, M> {
    meter: M,
    variable: ListVariable<S, V>,
    with_entities: bool,
    size_cap: usize,
    held: Option<(
        NearbyMatrixDemand<S, V, M>,
        Arc<MemoizingSupply<NearbyDistanceMatrix<V>>>,
    )>,
}

impl<S, V, M> NearbyMatrixLink<S, V, M>
where
    S: Clone + Send + Sync + 'static,
    V: Clone + Eq + Hash + Send + Sync + Debug + 'static,
    M: ListDistanceMeter<S, V>,
{
    pub(crate) fn new(meter: M, variable: ListVariable<S, V>, with_entities: bool, size_cap: usize) -> Self {
        Self {
            meter,
            variable,
            with_entities,
            size_cap,
            held: None,
        }
    }

    /// Checks the matrix size and registers the demand.
    pub(crate) fn acquire(&mut self, supply_manager: &mut SupplyManager, solution: &S) -> Result<()> {
        let origin_count = self.variable.assigned_count(solution);
        let entity_heads = if self.with_entities {
            self.variable.entity_count(solution)
        } else {
            0
        };
        check_matrix_capacity(origin_count, (entity_heads + origin_count).min(self.size_cap))?;

        let demand = NearbyMatrixDemand::new(
            self.meter.clone(),
            self.variable,
            self.with_entities,
            self.size_cap,
            Arc::new(solution.clone()),
        );
        let supply = supply_manager.acquire(&demand);
        debug!(
            variable_name = self.variable.variable_name(),
            already_built = supply.is_initialized(),
            "Nearby matrix demand acquired"
        );
        if let Some((previous, _)) = self.held.replace((demand, supply)) {
            supply_manager.release(&previous);
        }
        Ok(())
    }

    /// Builds the matrix now unless another consumer already did.
    pub(crate) fn warm_up(&self) {
        self.read();
    }

    pub(crate) fn read(&self) -> &NearbyDistanceMatrix<V> {
        match &self.held {
            Some((_, supply)) => supply.read(),
            None => panic!(
                "nearby matrix for variable {:?} read outside its solving lifecycle",
                self.variable.variable_name()
            ),
        }
    }

    pub(crate) fn release(&mut self, supply_manager: &mut SupplyManager) {
        if let Some((demand, _)) = self.held.take() {
            supply_manager.release(&demand);
            debug!(
                variable_name = self.variable.variable_name(),
                "Nearby matrix demand released"
            );
        }
    }
}

impl<S, V, M: Debug> Debug for NearbyMatrixLink<S, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NearbyMatrixLink")
            .field("meter", &self.meter)
            .field("with_entities", &self.with_entities)
            .field("size_cap", &self.size_cap)
            .field("held", &self.held.is_some())
            .finish()
    }
}
