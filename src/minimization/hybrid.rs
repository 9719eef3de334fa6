use tracing::debug;

use super::{
    ensure_final_states,
    pairs::{PairKnowledge, PairWalk},
    MinimizationError, Observer, TracingObserver,
};
use crate::{
    math::{BitSet, BlockId, Partition, UnionFind},
    prelude::*,
};

/// The two partitions maintained by the hybrid algorithm. `blocks` is coarser than the
/// Myhill-Nerode equivalence and only ever refined, `merged` is finer and only ever coarsened.
struct Hybrid {
    blocks: Partition,
    merged: UnionFind,
}

impl PairKnowledge for Hybrid {
    fn representative(&mut self, state: StateId) -> StateId {
        self.merged.find(state)
    }

    fn distinguished(&self, p: StateId, q: StateId) -> bool {
        self.blocks.block_of(p) != self.blocks.block_of(q)
    }
}

impl Hybrid {
    /// Splits every block by the set of states that reach `splitter` on `symbol` and returns
    /// the newly created blocks.
    fn split<O: Observer>(
        &mut self,
        dfa: &Dfa,
        splitter: BlockId,
        symbol: Symbol,
        predecessors: &mut BitSet,
        observer: &mut O,
    ) -> Vec<BlockId> {
        observer.splitter_chosen(self.blocks.block(splitter), symbol);
        predecessors.clear();
        for q in self.blocks.block(splitter) {
            predecessors.union_with(dfa.predecessors(*q, symbol));
        }
        let created: Vec<BlockId> = self
            .blocks
            .split_by(predecessors)
            .into_iter()
            .map(|split| {
                observer.block_split(
                    self.blocks.block(split.original),
                    self.blocks.block(split.created),
                );
                split.created
            })
            .collect();
        debug_assert!(self.blocks.is_consistent());
        created
    }
}

/// Computes the Myhill-Nerode equivalence of the states of `dfa` with the hybrid algorithm.
/// See [`minimize_hybrid_observed`].
pub fn minimize_hybrid(dfa: &Dfa) -> Result<Partition, MinimizationError> {
    minimize_hybrid_observed(dfa, &mut TracingObserver)
}

/// The hybrid algorithm, which combines the pairwise equivalence test of the incremental
/// algorithm with explicit partition refinement.
///
/// Blocks of the partition, starting with final and non-final states, are processed from a
/// worklist. Within a block, the first state is tested against every other state with the
/// pair walk, where states in different blocks count as distinguished and states that were
/// merged before count as equal. A successful test merges the visited pairs. A failed test
/// yields a path of pairs that leads to two states in different blocks; going up that path
/// from the deepest pair, every pair whose successors lie in different blocks is separated by
/// splitting all blocks along the inverse image of the smaller successor block. New blocks
/// join the worklist and the current block is scanned again from the start.
pub fn minimize_hybrid_observed<O: Observer>(
    dfa: &Dfa,
    observer: &mut O,
) -> Result<Partition, MinimizationError> {
    ensure_final_states(dfa)?;
    let states = dfa.state_count();
    let mut hybrid = Hybrid {
        blocks: Partition::from_classifier(states, |q| dfa.is_final(q)),
        merged: UnionFind::new(states),
    };
    let mut pending: Vec<BlockId> = (0..hybrid.blocks.size()).collect();
    let mut walk = PairWalk::new(states);
    let mut predecessors = BitSet::new(states);

    while let Some(block) = pending.pop() {
        let mut i = 1;
        while i < hybrid.blocks.len_of(block) {
            let first = hybrid.blocks.block(block)[0];
            let other = hybrid.blocks.block(block)[i];
            let x = hybrid.merged.find(first);
            let y = hybrid.merged.find(other);
            if x == y {
                i += 1;
                continue;
            }

            let equivalent = walk.run(dfa, x, y, &mut hybrid);
            observer.pair_resolved(first, other, equivalent);
            if equivalent {
                for (p, q) in walk.visited() {
                    hybrid.merged.union(*p, *q);
                }
                i += 1;
                continue;
            }

            for frame in walk.path().iter().rev() {
                let a = frame.next - 1;
                let left = hybrid.blocks.block_of(dfa.successor(frame.p, a));
                let right = hybrid.blocks.block_of(dfa.successor(frame.q, a));
                if left == right {
                    continue;
                }
                let splitter = if hybrid.blocks.len_of(left) <= hybrid.blocks.len_of(right) {
                    left
                } else {
                    right
                };
                let created = hybrid.split(dfa, splitter, a, &mut predecessors, observer);
                pending.extend(created);
            }
            debug_assert!(hybrid.distinguished(x, y));
            i = 1;
        }
    }

    debug!(
        "hybrid minimization found {} classes among {} states",
        hybrid.blocks.size(),
        states
    );
    Ok(hybrid.blocks)
}
