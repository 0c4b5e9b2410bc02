//! Randomized sequential k-opt construction with cycle patching.
//!
//! Picked nodes live in one growable slot array. Each recursion level of the
//! construction is a frame holding its remaining attempts; backtracking pops
//! the frame and the parent overwrites its own slots on the next attempt.

use smallvec::{smallvec, SmallVec};

use super::super::random::WorkingRandom;
use super::descriptor::{KOptDescriptor, Ring, Slots};

/// Result of one construction attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum KOptOutcome {
    /// The sequential exchange was a single cycle as picked.
    Feasible(KOptDescriptor),
    /// Extra edge pairs were added to merge sub-cycles into one.
    Patched(KOptDescriptor),
    /// No feasible exchange was found within the attempt budget.
    NotFound,
}

impl KOptOutcome {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            KOptOutcome::Feasible(_) => "feasible",
            KOptOutcome::Patched(_) => "patched",
            KOptOutcome::NotFound => "empty",
        }
    }

    pub(crate) fn into_descriptor(self) -> Option<KOptDescriptor> {
        match self {
            KOptOutcome::Feasible(descriptor) | KOptOutcome::Patched(descriptor) => Some(descriptor),
            KOptOutcome::NotFound => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    level: usize,
    remaining_attempts: usize,
}

impl Frame {
    fn new(level: usize, k: usize) -> Self {
        Self {
            level,
            remaining_attempts: (k - level + 3) * 2,
        }
    }
}

/// Slots shared by the levels of one patching attempt.
struct PatchArena {
    removed: Slots,
    added: Slots,
    slot_cycle: Slots,
}

/// Builds k-opt exchanges on one list.
pub(crate) struct KOptGenerator<'r> {
    ring: Ring,
    random: &'r WorkingRandom,
    max_patched_cycles: usize,
}

impl<'r> KOptGenerator<'r> {
    /// `max_patched_cycles` bounds how many sub-cycles are worth patching.
    pub(crate) fn new(ring: Ring, random: &'r WorkingRandom, max_patched_cycles: usize) -> Self {
        Self {
            ring,
            random,
            max_patched_cycles,
        }
    }

    /// Draws one k-opt exchange with `k >= 3` removed edges.
    pub(crate) fn pick(&self, k: usize) -> KOptOutcome {
        let mut removed: Slots = smallvec![0; 2 * k + 1];
        removed[1] = self.random.next_index(self.ring.size());
        removed[2] = if self.random.next_bool() {
            self.ring.predecessor(removed[1])
        } else {
            self.ring.successor(removed[1])
        };

        let mut frames: SmallVec<[Frame; 8]> = smallvec![Frame::new(2, k)];
        while let Some(frame) = frames.last_mut() {
            if frame.remaining_attempts == 0 {
                frames.pop();
                continue;
            }
            frame.remaining_attempts -= 1;
            let level = frame.level;

            let Some((t3, t4)) = self.next_removed_edge(&removed, level) else {
                continue;
            };
            removed[2 * level - 1] = t3;
            removed[2 * level] = t4;

            if level < k {
                frames.push(Frame::new(level + 1, k));
                continue;
            }
            if removed[2 * k] == removed[1] {
                continue;
            }
            let descriptor = KOptDescriptor::sequential(self.ring, &removed);
            if descriptor.is_feasible() {
                return KOptOutcome::Feasible(descriptor);
            }
            if let Some(patched) = self.patch_cycles(&descriptor) {
                return KOptOutcome::Patched(patched);
            }
        }
        KOptOutcome::NotFound
    }

    /// Draws the removed edge `(t3, t4)` for `level`, or `None` if the drawn
    /// node is excluded.
    fn next_removed_edge(&self, removed: &[usize], level: usize) -> Option<(usize, usize)> {
        let previous = removed[2 * level - 2];
        let t3 = self.random.next_index(self.ring.size());
        if t3 == previous
            || t3 == self.ring.predecessor(previous)
            || t3 == self.ring.successor(previous)
            || is_sequentially_added(removed, previous, t3, level - 2)
        {
            return None;
        }
        let t4 = self.free_neighbour(removed, t3, level - 1)?;
        Some((t3, t4))
    }

    /// Neighbour of `node` whose edge is not removed yet, chosen at random
    /// when both are free.
    fn free_neighbour(&self, removed: &[usize], node: usize, edge_count: usize) -> Option<usize> {
        let predecessor = self.ring.predecessor(node);
        let successor = self.ring.successor(node);
        match (
            is_removed(removed, node, predecessor, edge_count),
            is_removed(removed, node, successor, edge_count),
        ) {
            (true, true) => None,
            (true, false) => Some(successor),
            (false, true) => Some(predecessor),
            (false, false) => Some(if self.random.next_bool() {
                successor
            } else {
                predecessor
            }),
        }
    }

    /// Merges the sub-cycles of an infeasible exchange into one tour by
    /// bridging the shortest cycle into the others.
    pub(crate) fn patch_cycles(&self, descriptor: &KOptDescriptor) -> Option<KOptDescriptor> {
        let info = descriptor.cycles();
        if info.count == 1 || info.count > self.max_patched_cycles {
            return None;
        }
        let current = descriptor.shortest_cycle(&info);
        let k = descriptor.k();
        let mut arena = PatchArena {
            removed: descriptor.removed_slots().iter().copied().collect(),
            added: descriptor.added_slots().iter().copied().collect(),
            slot_cycle: info.slot_cycle.clone(),
        };

        for i in 1..=k {
            let (start, end) = descriptor.segment(i);
            if info.slot_cycle[start] != current {
                continue;
            }
            let stop = arena.removed[end];
            let mut s1 = arena.removed[start];
            while s1 != stop {
                let s2 = self.ring.successor(s1);
                arena.removed.truncate(2 * k + 1);
                arena.added.truncate(2 * k + 1);
                arena.removed.extend([s1, s2]);
                arena.added.extend([0, 0]);
                if let Some(patched) = self.patch_level(descriptor, &mut arena, current, 2, info.count) {
                    return Some(patched);
                }
                s1 = s2;
            }
        }
        None
    }

    /// Bridges one more cycle into `current`; closes the tour when only two
    /// cycles are left.
    fn patch_level(
        &self,
        original: &KOptDescriptor,
        arena: &mut PatchArena,
        current: usize,
        level: usize,
        cycles_left: usize,
    ) -> Option<KOptDescriptor> {
        let k = original.k();
        let first = 2 * k + 1;
        let bridge = 2 * (k + level) - 2;
        let s1 = arena.removed[first];
        let s2 = arena.removed[bridge];

        for _ in 0..2 * cycles_left {
            let s3 = self.random.next_index(self.ring.size());
            if s3 == s2 || s3 == self.ring.predecessor(s2) || s3 == self.ring.successor(s2) {
                continue;
            }
            let Some(new_cycle) = original.cycle_of(s3, &arena.slot_cycle) else {
                continue;
            };
            if new_cycle == current || is_added(&arena.removed, &arena.added, s2, s3) {
                continue;
            }
            let Some(s4) = self.free_neighbour(&arena.removed, s3, bridge / 2) else {
                continue;
            };

            arena.removed.truncate(bridge + 1);
            arena.added.truncate(bridge + 1);
            arena.removed.extend([s3, s4]);
            arena.added.extend([0, 0]);
            arena.added[bridge] = bridge + 1;
            arena.added[bridge + 1] = bridge;

            if cycles_left > 2 {
                let saved = arena.slot_cycle.clone();
                for cycle in arena.slot_cycle.iter_mut() {
                    if *cycle == new_cycle {
                        *cycle = current;
                    }
                }
                if let Some(patched) = self.patch_level(original, arena, current, level + 1, cycles_left - 1) {
                    return Some(patched);
                }
                arena.slot_cycle = saved;
            } else if s4 != s1 {
                let last = bridge + 2;
                arena.added[first] = last;
                arena.added[last] = first;
                let patched = KOptDescriptor::new(self.ring, &arena.removed, arena.added.clone());
                if patched.is_feasible() {
                    return Some(patched);
                }
                arena.added[first] = 0;
            }
        }
        None
    }
}

/// True when `{a, b}` is one of the first `edge_count` removed edges.
fn is_removed(removed: &[usize], a: usize, b: usize, edge_count: usize) -> bool {
    (1..=edge_count).any(|j| same_edge((removed[2 * j - 1], removed[2 * j]), (a, b)))
}

/// True when `{a, b}` is one of the first `edge_count` sequentially added
/// edges `(t[2j], t[2j + 1])`.
fn is_sequentially_added(removed: &[usize], a: usize, b: usize, edge_count: usize) -> bool {
    (1..=edge_count).any(|j| same_edge((removed[2 * j], removed[2 * j + 1]), (a, b)))
}

/// True when `{a, b}` is an added edge of a partially built partner table.
fn is_added(removed: &[usize], added: &[usize], a: usize, b: usize) -> bool {
    (1..added.len()).any(|slot| {
        let partner = added[slot];
        partner != 0 && partner < removed.len() && same_edge((removed[slot], removed[partner]), (a, b))
    })
}

fn same_edge(edge: (usize, usize), other: (usize, usize)) -> bool {
    edge == other || edge == (other.1, other.0)
}
