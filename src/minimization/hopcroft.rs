use tracing::debug;

use super::{ensure_final_states, MinimizationError, Observer, TracingObserver};
use crate::{
    math::{BitSet, BlockId, Partition, Split},
    prelude::*,
};

/// The set of splitters that still have to be processed. A splitter is a pair of a block and
/// a symbol, the set is a [`BitSet`] over `block * alphabet + symbol` with a stack that
/// determines the order in which splitters are taken out.
struct Waiting {
    alphabet: usize,
    members: BitSet,
    stack: Vec<(BlockId, Symbol)>,
}

impl Waiting {
    fn new(states: usize, alphabet: usize) -> Self {
        Self {
            alphabet,
            members: BitSet::new(states * alphabet),
            stack: vec![],
        }
    }

    fn key(&self, block: BlockId, symbol: Symbol) -> usize {
        block * self.alphabet + symbol as usize
    }

    fn contains(&self, block: BlockId, symbol: Symbol) -> bool {
        self.members.contains(self.key(block, symbol))
    }

    fn push(&mut self, block: BlockId, symbol: Symbol) {
        if !self.members.test_and_add(self.key(block, symbol)) {
            self.stack.push((block, symbol));
        }
    }

    fn pop(&mut self) -> Option<(BlockId, Symbol)> {
        let (block, symbol) = self.stack.pop()?;
        self.members.remove(self.key(block, symbol));
        Some((block, symbol))
    }
}

/// Computes the Myhill-Nerode equivalence of the states of `dfa` with Hopcroft's partition
/// refinement algorithm. See [`minimize_hopcroft_observed`].
pub fn minimize_hopcroft(dfa: &Dfa) -> Result<Partition, MinimizationError> {
    minimize_hopcroft_observed(dfa, &mut TracingObserver)
}

/// Hopcroft's algorithm, reporting every chosen splitter and every split to `observer`.
///
/// Starting from the partition into final and non-final states, the algorithm keeps a set of
/// splitters `(B, a)`. Taking a splitter out, it computes the set of states that reach `B` on
/// `a` and splits every block that this set cuts in two. For each such split and each symbol
/// `b`, if the original block is still waiting as a splitter for `b` then so is the new one;
/// otherwise it suffices to add the smaller of the two halves. Each state thus enters a
/// splitter at most a logarithmic number of times.
///
/// Every state of `dfa` takes part, including those that cannot be reached from an initial
/// state. Fails with [`MinimizationError::NoFinalStates`] if `dfa` has no final state.
pub fn minimize_hopcroft_observed<O: Observer>(
    dfa: &Dfa,
    observer: &mut O,
) -> Result<Partition, MinimizationError> {
    ensure_final_states(dfa)?;
    let states = dfa.state_count();
    let mut partition = Partition::from_classifier(states, |q| dfa.is_final(q));
    let mut waiting = Waiting::new(states, dfa.alphabet_size());

    if partition.size() == 2 {
        let smaller = if partition.len_of(0) <= partition.len_of(1) {
            0
        } else {
            1
        };
        for a in dfa.symbols() {
            waiting.push(smaller, a);
        }
    }

    let mut predecessors = BitSet::new(states);
    while let Some((splitter, a)) = waiting.pop() {
        observer.splitter_chosen(partition.block(splitter), a);
        predecessors.clear();
        for q in partition.block(splitter) {
            predecessors.union_with(dfa.predecessors(*q, a));
        }
        if predecessors.is_empty() {
            continue;
        }

        for Split { original, created } in partition.split_by(&predecessors) {
            observer.block_split(partition.block(original), partition.block(created));
            let smaller = if partition.len_of(created) <= partition.len_of(original) {
                created
            } else {
                original
            };
            for b in dfa.symbols() {
                if waiting.contains(original, b) {
                    waiting.push(created, b);
                } else {
                    waiting.push(smaller, b);
                }
            }
        }
        debug_assert!(partition.is_consistent());
    }

    debug!(
        "hopcroft reduced {} states to {} classes",
        states,
        partition.size()
    );
    Ok(partition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        splitters: usize,
        splits: Vec<(Vec<StateId>, Vec<StateId>)>,
    }

    impl Observer for Recorder {
        fn splitter_chosen(&mut self, _block: &[StateId], _symbol: Symbol) {
            self.splitters += 1;
        }

        fn block_split(&mut self, kept: &[StateId], split_off: &[StateId]) {
            let mut kept = kept.to_vec();
            let mut split_off = split_off.to_vec();
            kept.sort();
            split_off.sort();
            self.splits.push((kept, split_off));
        }
    }

    #[test_log::test]
    fn separates_by_distance_to_final() {
        // a chain 0 -> 1 -> 2 -> 3 on symbol 0, symbol 1 loops
        let dfa = Dfa::from_parts(
            2,
            4,
            [0],
            [3],
            [
                (0, 0, 1),
                (1, 0, 2),
                (2, 0, 3),
                (3, 0, 3),
                (0, 1, 0),
                (1, 1, 1),
                (2, 1, 2),
                (3, 1, 3),
            ],
        )
        .unwrap();
        let mut recorder = Recorder::default();
        let partition = minimize_hopcroft_observed(&dfa, &mut recorder).unwrap();
        assert_eq!(partition.size(), 4);
        assert!(recorder.splitters >= 2);
        // the first split separates the direct predecessor of the final state
        assert_eq!(recorder.splits[0], (vec![0, 1], vec![2]));
        assert_eq!(recorder.splits.len(), 2);
    }

    #[test]
    fn only_final_states() {
        let dfa = Dfa::from_parts(2, 3, [0], [0, 1, 2], [(0, 0, 1), (1, 1, 2)]).unwrap();
        let partition = minimize_hopcroft(&dfa).unwrap();
        assert_eq!(partition.size(), 1);
    }
}
