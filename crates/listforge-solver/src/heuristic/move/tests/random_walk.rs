//! Seeded random walks checking both undo paths of every list move.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::*;

const DRAWS: usize = 600;

/// Applied moves per shape: `[intra, inter, intra reversed, inter reversed]`.
type Coverage = [usize; 4];

fn start() -> PlanDirector {
    create_director(plan(&[&[1, 2, 3, 4, 5, 6], &[7, 8, 9, 10], &[11], &[]]))
}

fn list_lens(director: &PlanDirector) -> Vec<usize> {
    routes(director.working_solution()).iter().map(Vec::len).collect()
}

/// Checks the stop set survives `m`, that the recorded changes undo it, and
/// that its undo move undoes it.
fn check_both_undos<M: Move<Plan>>(director: &mut PlanDirector, m: &M) {
    let before = routes(director.working_solution());
    let mut stops = before.concat();
    stops.sort_unstable();
    {
        let mut recording = RecordingScoreDirector::new(&mut *director);
        m.do_move(&mut recording);
        let mut after = routes(recording.working_solution()).concat();
        after.sort_unstable();
        assert_eq!(after, stops, "{m:?} lost or duplicated a stop");
        recording.undo_changes();
    }
    assert_eq!(routes(director.working_solution()), before, "recorded undo of {m:?}");
    assert_undo_move_restores(director, m);
}

/// Draws moves with `draw`, checks every doable one, then keeps it applied
/// so the walk visits new arrangements.
fn walk<M, F>(seed: u64, mut draw: F) -> Coverage
where
    M: Move<Plan>,
    F: FnMut(&mut ChaCha8Rng, &[usize]) -> Option<(M, bool, bool)>,
{
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut director = start();
    let mut coverage = [0; 4];
    for _ in 0..DRAWS {
        let lens = list_lens(&director);
        let Some((m, inter, reversing)) = draw(&mut rng, &lens) else {
            continue;
        };
        if !m.is_doable(&director) {
            continue;
        }
        check_both_undos(&mut director, &m);
        m.do_move(&mut director);
        coverage[usize::from(inter) + 2 * usize::from(reversing)] += 1;
    }
    coverage
}

fn random_entity(rng: &mut ChaCha8Rng, lens: &[usize]) -> usize {
    rng.random_range(0..lens.len())
}

fn random_element(rng: &mut ChaCha8Rng, lens: &[usize]) -> Option<ElementRef> {
    let entity = random_entity(rng, lens);
    (lens[entity] > 0).then(|| ElementRef::new(entity, rng.random_range(0..lens[entity])))
}

fn random_sub_list(rng: &mut ChaCha8Rng, lens: &[usize]) -> Option<SubList> {
    let entity = random_entity(rng, lens);
    let len = lens[entity];
    if len == 0 {
        return None;
    }
    let from = rng.random_range(0..len);
    let length = rng.random_range(1..=len - from);
    Some(SubList::new(entity, from, length))
}

#[test]
fn list_change_walk_undoes_cleanly() {
    let coverage = walk(7, |rng, lens| {
        let source = random_element(rng, lens)?;
        let entity = random_entity(rng, lens);
        let destination = ElementRef::new(entity, rng.random_range(0..=lens[entity]));
        let inter = source.entity_index != entity;
        Some((ListChangeMove::new(source, destination, list_variable()), inter, false))
    });
    assert!(coverage[0] > 0 && coverage[1] > 0, "{coverage:?}");
}

#[test]
fn list_swap_walk_undoes_cleanly() {
    let coverage = walk(11, |rng, lens| {
        let left = random_element(rng, lens)?;
        let right = random_element(rng, lens)?;
        let inter = left.entity_index != right.entity_index;
        Some((ListSwapMove::new(left, right, list_variable()), inter, false))
    });
    assert!(coverage[0] > 0 && coverage[1] > 0, "{coverage:?}");
}

#[test]
fn sub_list_change_walk_undoes_cleanly() {
    let coverage = walk(13, |rng, lens| {
        let source = random_sub_list(rng, lens)?;
        let entity = random_entity(rng, lens);
        let room = if entity == source.entity_index {
            lens[entity] - source.length
        } else {
            lens[entity]
        };
        let destination = ElementRef::new(entity, rng.random_range(0..=room));
        let reversing = rng.random_bool(0.5);
        let inter = source.entity_index != entity;
        Some((
            SubListChangeMove::new(source, destination, reversing, list_variable()),
            inter,
            reversing,
        ))
    });
    assert!(coverage.iter().all(|&count| count > 0), "{coverage:?}");
}

#[test]
fn sub_list_swap_walk_undoes_cleanly() {
    let coverage = walk(17, |rng, lens| {
        let left = random_sub_list(rng, lens)?;
        let right = random_sub_list(rng, lens)?;
        let reversing = rng.random_bool(0.5);
        let inter = left.entity_index != right.entity_index;
        Some((
            SubListSwapMove::new(left, right, reversing, list_variable()),
            inter,
            reversing,
        ))
    });
    assert!(coverage.iter().all(|&count| count > 0), "{coverage:?}");
}
