use std::collections::VecDeque;

use tracing::debug;

use super::{ensure_final_states, rejecting, MinimizationError, Observer, TracingObserver};
use crate::{
    math::{BitSet, Map},
    prelude::*,
};

/// Minimizes `dfa` with the atomic construction. See [`minimize_atomic_observed`].
pub fn minimize_atomic(dfa: &Dfa) -> Result<Dfa, MinimizationError> {
    minimize_atomic_observed(dfa, &mut TracingObserver)
}

/// The atomic construction, reporting every computed inverse image to `observer` as a
/// splitter.
///
/// Starting from the set of final states, the construction replicates blocks of states by
/// taking inverse images: for every known block `B` and symbol `a`, the set of states that
/// reach `B` on `a` is a block as well. Blocks are identified by their content, and an edge
/// from the inverse image to `B` on `a` is recorded in a reduced automaton over the blocks.
/// In that automaton the set of final states is the block of final states, and every block
/// that contains an initial state of `dfa` is initial. It accepts the same language as `dfa`,
/// and since its reversal is deterministic, determinizing it yields the minimal DFA.
///
/// Inverse images are replicated whole: a block that only partly overlaps an inverse image
/// is not split. The blocks are therefore exactly the non-empty subsets that the subset
/// construction reaches on the reversal of `dfa`, and the reduced automaton is the reversal of
/// that determinized automaton. The construction matches the first half of Brzozowski's
/// algorithm, and the final determinization is its second half.
///
/// The result only contains states that are reachable from the initial state. If no word is
/// accepted, the result is the DFA with a single rejecting state.
pub fn minimize_atomic_observed<O: Observer>(
    dfa: &Dfa,
    observer: &mut O,
) -> Result<Dfa, MinimizationError> {
    ensure_final_states(dfa)?;
    let states = dfa.state_count();
    let alphabet = dfa.alphabet_size();

    let mut ids: Map<BitSet, usize> = Map::default();
    let mut blocks = vec![dfa.final_states().clone()];
    ids.insert(dfa.final_states().clone(), 0);
    let mut edges: Vec<(usize, Symbol, usize)> = vec![];

    let mut frontier = VecDeque::from([0usize]);
    while let Some(current) = frontier.pop_front() {
        for a in dfa.symbols() {
            let mut delta = BitSet::new(states);
            for q in &blocks[current] {
                delta.union_with(dfa.predecessors(q as StateId, a));
            }
            if delta.is_empty() {
                continue;
            }
            let members = delta.iter().map(|q| q as StateId).collect::<Vec<_>>();
            observer.splitter_chosen(&members, a);

            let id = match ids.get(&delta) {
                Some(id) => *id,
                None => {
                    let id = blocks.len();
                    ids.insert(delta.clone(), id);
                    blocks.push(delta);
                    frontier.push_back(id);
                    id
                }
            };
            edges.push((id, a, current));
        }
    }
    debug!(
        "atomic construction replicated {} blocks from {} states",
        blocks.len(),
        states
    );

    let mut reduced = Nfa::new(alphabet, blocks.len())?;
    reduced.set_final(0, true);
    for (id, block) in blocks.iter().enumerate() {
        if block.intersects(dfa.initial_states()) {
            reduced.set_initial(id as StateId, true);
        }
    }
    for (source, a, target) in edges {
        reduced.set_transition(source as StateId, a, target as StateId, true);
    }

    let minimal = reduced.determinize()?;
    if minimal.state_count() == 0 {
        return Ok(rejecting(alphabet));
    }
    Ok(minimal)
}
