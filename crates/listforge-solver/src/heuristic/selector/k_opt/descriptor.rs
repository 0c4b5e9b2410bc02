//! K-opt descriptor: removed edges, added edges and the tour permutation
//! they imply.
//!
//! Nodes are list positions `0..len` of one entity, read as a closed tour.
//! Slot arrays are 1-indexed; slot 0 is unused. Removed edge `j` joins
//! slots `2j - 1` and `2j`.

use std::fmt::{self, Debug};

use smallvec::{smallvec, SmallVec};

use listforge_core::domain::ListVariable;

use crate::heuristic::r#move::{flip_sublist, FlipSublist, KOptListMove};

/// Slot table indexed from 1.
pub type Slots = SmallVec<[usize; 16]>;

/// Positions `0..size` of one list read as a closed tour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ring {
    size: usize,
}

impl Ring {
    /// # Panics
    ///
    /// If `size` is zero.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "a ring needs at least one position");
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn successor(&self, node: usize) -> usize {
        (node + 1) % self.size
    }

    pub fn predecessor(&self, node: usize) -> usize {
        (node + self.size - 1) % self.size
    }

    /// Steps needed to walk from `from` to `to` in successor direction.
    pub fn offset(&self, from: usize, to: usize) -> usize {
        (to + self.size - from) % self.size
    }

    /// True when walking from `start` reaches `middle` no later than `end`.
    pub fn is_between(&self, start: usize, middle: usize, end: usize) -> bool {
        self.offset(start, middle) <= self.offset(start, end)
    }
}

/// Cycle membership of the tour pieces left by a k-opt exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KOptCycleInfo {
    /// Number of disjoint cycles.
    pub count: usize,
    /// Cycle id (`1..=count`) per removed-edge slot.
    pub slot_cycle: Slots,
}

/// One k-opt exchange on a single list.
#[derive(Clone, PartialEq, Eq)]
pub struct KOptDescriptor {
    k: usize,
    ring: Ring,
    removed: Slots,
    tour_order: Slots,
    inverse_tour_order: Slots,
    added: Slots,
}

impl Debug for KOptDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KOptDescriptor")
            .field("k", &self.k)
            .field("removed", &self.removed_edges().collect::<Vec<_>>())
            .field("added", &self.added_edges().collect::<Vec<_>>())
            .finish()
    }
}

impl KOptDescriptor {
    /// Creates a sequential exchange from `removed` (slot 0 ignored).
    ///
    /// Each added edge joins the far end of one removed edge to the near end
    /// of the next; the last one closes back to slot 1.
    ///
    /// # Panics
    ///
    /// If `removed` does not hold an odd number of at least five slots.
    pub fn sequential(ring: Ring, removed: &[usize]) -> Self {
        let last = removed.len() - 1;
        let mut added: Slots = smallvec![0; removed.len()];
        added[1] = last;
        added[last] = 1;
        for slot in (2..last).step_by(2) {
            added[slot] = slot + 1;
            added[slot + 1] = slot;
        }
        Self::new(ring, removed, added)
    }

    /// Creates an exchange with an explicit added-edge partner table.
    ///
    /// `added[slot]` is the slot at the other end of the added edge leaving
    /// `slot`.
    ///
    /// # Panics
    ///
    /// If `removed` does not hold an odd number of at least five slots, or
    /// `added` has a different length.
    pub fn new(ring: Ring, removed: &[usize], added: Slots) -> Self {
        assert!(
            removed.len() >= 5 && removed.len() % 2 == 1,
            "k-opt needs 2k + 1 slots with k >= 2, got {}",
            removed.len()
        );
        assert_eq!(removed.len(), added.len(), "removed and added slot tables differ in length");

        let k = removed.len() / 2;
        let mut tour_order: Slots = smallvec![0; removed.len()];
        for j in 1..=k {
            let slot = 2 * j - 1;
            tour_order[j] = if ring.successor(removed[slot]) == removed[slot + 1] {
                slot
            } else {
                slot + 1
            };
        }

        let origin = removed[tour_order[1]];
        tour_order[2..=k].sort_by_key(|&slot| ring.offset(origin, removed[slot]));

        for j in (2..=2 * k).rev().step_by(2) {
            let slot = tour_order[j / 2];
            tour_order[j - 1] = slot;
            tour_order[j] = if slot % 2 == 1 { slot + 1 } else { slot - 1 };
        }

        let mut inverse_tour_order: Slots = smallvec![0; removed.len()];
        for position in 1..=2 * k {
            inverse_tour_order[tour_order[position]] = position;
        }

        Self {
            k,
            ring,
            removed: removed.iter().copied().collect(),
            tour_order,
            inverse_tour_order,
            added,
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn ring(&self) -> Ring {
        self.ring
    }

    pub(crate) fn removed_slots(&self) -> &[usize] {
        &self.removed
    }

    pub(crate) fn added_slots(&self) -> &[usize] {
        &self.added
    }

    /// Removed edges as node pairs.
    pub fn removed_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (1..=self.k).map(move |j| (self.removed[2 * j - 1], self.removed[2 * j]))
    }

    /// Added edges as node pairs.
    pub fn added_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (1..=2 * self.k)
            .filter(move |&slot| slot < self.added[slot])
            .map(move |slot| (self.removed[slot], self.removed[self.added[slot]]))
    }

    /// Position that closes the tour piece entered at `position`.
    fn segment_end(&self, position: usize) -> usize {
        match position ^ 1 {
            0 => 2 * self.k,
            end if end > 2 * self.k => 1,
            end => end,
        }
    }

    /// Slots bounding the `i`-th kept tour piece (`1..=k`).
    pub(crate) fn segment(&self, i: usize) -> (usize, usize) {
        let start = 2 * i;
        (self.tour_order[start], self.tour_order[self.segment_end(start)])
    }

    /// True when the exchange leaves one cycle through every node.
    pub fn is_feasible(&self) -> bool {
        let mut count = 0;
        let mut position = 2 * self.k;
        while position != 0 {
            count += 1;
            if count > self.k {
                return false;
            }
            position = self.inverse_tour_order[self.added[self.tour_order[position]]] ^ 1;
            if position > 2 * self.k {
                return false;
            }
        }
        count == self.k
    }

    /// Groups the kept tour pieces into the cycles the exchange produces.
    pub fn cycles(&self) -> KOptCycleInfo {
        let mut slot_cycle: Slots = smallvec![0; self.removed.len()];
        let mut count = 0;
        for start in (2..=2 * self.k).step_by(2) {
            if slot_cycle[self.tour_order[start]] != 0 {
                continue;
            }
            count += 1;
            let mut entry = start;
            loop {
                let exit = self.segment_end(entry);
                slot_cycle[self.tour_order[entry]] = count;
                slot_cycle[self.tour_order[exit]] = count;
                entry = self.inverse_tour_order[self.added[self.tour_order[exit]]];
                if slot_cycle[self.tour_order[entry]] != 0 {
                    break;
                }
            }
        }
        KOptCycleInfo { count, slot_cycle }
    }

    /// Cycle of the tour piece holding `node`, per `slot_cycle`.
    pub(crate) fn cycle_of(&self, node: usize, slot_cycle: &[usize]) -> Option<usize> {
        (1..=self.k).find_map(|i| {
            let (start, end) = self.segment(i);
            self.ring
                .is_between(self.removed[start], node, self.removed[end])
                .then_some(slot_cycle[start])
        })
    }

    /// Cycle id with the fewest nodes; ties go to the lowest id.
    pub(crate) fn shortest_cycle(&self, info: &KOptCycleInfo) -> usize {
        let mut sizes: Slots = smallvec![0; info.count + 1];
        for i in 1..=self.k {
            let (start, end) = self.segment(i);
            sizes[info.slot_cycle[start]] += self.ring.offset(self.removed[start], self.removed[end]);
        }
        (1..=info.count).min_by_key(|&cycle| sizes[cycle]).unwrap_or(1)
    }

    /// Decomposes the exchange into list reversals.
    ///
    /// Sorts the signed permutation of tour pieces by reversals, always
    /// taking the oriented reversal that leaves the most oriented pairs and
    /// cutting a hurdle when none is left. Returns the flips and the left
    /// rotation that brings the original first element back to position 0,
    /// or `None` if the exchange is infeasible.
    pub fn reversals(&self) -> Option<(SmallVec<[FlipSublist; 4]>, usize)> {
        if !self.is_feasible() {
            return None;
        }
        let mut order = self.tour_order.clone();
        let mut inverse = self.inverse_tour_order.clone();
        let mut tour: Vec<usize> = (0..self.ring.size()).collect();
        let mut position: Vec<usize> = tour.clone();
        let mut flips = SmallVec::new();

        for _ in 0..=4 * self.k {
            if let Some((first, second)) = self.best_oriented_pair(&mut order, &mut inverse) {
                let (edges, from, to) = if first % 2 == 1 {
                    (
                        [order[first + 1], order[first], order[second], order[second + 1]],
                        first + 1,
                        second,
                    )
                } else {
                    (
                        [order[first - 1], order[first], order[second], order[second - 1]],
                        first,
                        second - 1,
                    )
                };
                flips.push(self.flip_between(&mut tour, &mut position, edges));
                reverse_positions(&mut order, &mut inverse, from, to);
                continue;
            }
            if let Some((first, second)) = self.hurdle(&order, &inverse) {
                let edges = [order[first], order[first + 1], order[second], order[second - 1]];
                flips.push(self.flip_between(&mut tour, &mut position, edges));
                reverse_positions(&mut order, &mut inverse, first + 1, second - 1);
                continue;
            }
            return Some((flips, position[0]));
        }
        None
    }

    /// Builds the list move for `entity_index`; empty when infeasible.
    pub fn to_list_move<S, V>(&self, entity_index: usize, variable: ListVariable<S, V>) -> KOptListMove<S, V> {
        match self.reversals() {
            Some((flips, shift)) => {
                KOptListMove::new(entity_index, self.ring.size(), self.k, flips, shift, variable)
            }
            None => KOptListMove::empty(variable),
        }
    }

    fn partner(&self, order: &[usize], inverse: &[usize], position: usize) -> usize {
        inverse[self.added[order[position]]]
    }

    fn is_oriented(&self, order: &[usize], inverse: &[usize], position: usize) -> Option<usize> {
        let other = self.partner(order, inverse, position);
        (other >= position + 2 && position % 2 == other % 2).then_some(other)
    }

    fn oriented_pair_count(&self, order: &[usize], inverse: &[usize]) -> usize {
        (1..=2 * self.k - 2)
            .filter(|&position| self.is_oriented(order, inverse, position).is_some())
            .count()
    }

    fn best_oriented_pair(&self, order: &mut Slots, inverse: &mut Slots) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize, usize)> = None;
        for first in 1..=2 * self.k - 2 {
            let Some(second) = self.is_oriented(order, inverse, first) else {
                continue;
            };
            let (from, to) = if first % 2 == 1 {
                (first + 1, second)
            } else {
                (first, second - 1)
            };
            reverse_positions(order, inverse, from, to);
            let score = self.oriented_pair_count(order, inverse);
            reverse_positions(order, inverse, from, to);
            if best.map_or(true, |(_, _, best_score)| score > best_score) {
                best = Some((first, second, score));
            }
        }
        best.map(|(first, second, _)| (first, second))
    }

    fn hurdle(&self, order: &[usize], inverse: &[usize]) -> Option<(usize, usize)> {
        (1..2 * self.k).step_by(2).find_map(|first| {
            let second = self.partner(order, inverse, first);
            (second >= first + 2).then_some((first, second))
        })
    }

    /// Reverses the list run between two removed edges given by slots.
    fn flip_between(&self, tour: &mut [usize], position: &mut [usize], slots: [usize; 4]) -> FlipSublist {
        let len = tour.len();
        let [a, b, c, d] = slots.map(|slot| position[self.removed[slot]]);
        let from = if (a + 1) % len == b { b } else { a };
        let to = if (c + 1) % len == d { d } else { c };
        let flip = FlipSublist::new(from, to);
        flip_sublist(tour, flip);
        for (index, &node) in tour.iter().enumerate() {
            position[node] = index;
        }
        flip
    }
}

/// Reverses `order[from..=to]` and keeps `inverse` pointing at it.
fn reverse_positions(order: &mut [usize], inverse: &mut [usize], mut from: usize, mut to: usize) {
    while from < to {
        order.swap(from, to);
        inverse[order[from]] = from;
        inverse[order[to]] = to;
        from += 1;
        to -= 1;
    }
}
