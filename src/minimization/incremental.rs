use tracing::debug;

use super::{
    ensure_final_states,
    pairs::{pair_count, pair_index, PairKnowledge, PairWalk},
    MinimizationError, Observer, TracingObserver,
};
use crate::{
    math::{BitSet, Partition, UnionFind},
    prelude::*,
};

struct Incremental {
    classes: UnionFind,
    inequivalent: BitSet,
}

impl PairKnowledge for Incremental {
    fn representative(&mut self, state: StateId) -> StateId {
        self.classes.find(state)
    }

    fn distinguished(&self, p: StateId, q: StateId) -> bool {
        self.inequivalent.contains(pair_index(p, q))
    }
}

/// Computes the Myhill-Nerode equivalence of the states of `dfa` by testing pairs of states
/// for equivalence one after the other. See [`minimize_incremental_observed`].
pub fn minimize_incremental(dfa: &Dfa) -> Result<Partition, MinimizationError> {
    minimize_incremental_observed(dfa, &mut TracingObserver)
}

/// The incremental algorithm, reporting the outcome of every tested pair to `observer`.
///
/// Pairs of states with different finality start out as inequivalent. Every other pair whose
/// classes are not yet merged is tested with a depth-first walk over its successor pairs, in
/// which pairs that are reached a second time count as equivalent. If the walk succeeds,
/// all pairs it visited are merged; if it fails, all pairs on the path that led to the
/// failure are recorded as inequivalent, so no pair is explored again after it has been
/// resolved.
pub fn minimize_incremental_observed<O: Observer>(
    dfa: &Dfa,
    observer: &mut O,
) -> Result<Partition, MinimizationError> {
    ensure_final_states(dfa)?;
    let states = dfa.state_count();
    let mut knowledge = Incremental {
        classes: UnionFind::new(states),
        inequivalent: BitSet::new(pair_count(states)),
    };
    for q in dfa.states() {
        for p in 0..q {
            if dfa.is_final(p) != dfa.is_final(q) {
                knowledge.inequivalent.add(pair_index(p, q));
            }
        }
    }

    let mut walk = PairWalk::new(states);
    for p in dfa.states() {
        for q in p + 1..states as StateId {
            let x = knowledge.classes.find(p);
            let y = knowledge.classes.find(q);
            if x == y || knowledge.distinguished(x, y) {
                continue;
            }
            let equivalent = walk.run(dfa, x, y, &mut knowledge);
            observer.pair_resolved(p, q, equivalent);
            if equivalent {
                for (x, y) in walk.visited() {
                    knowledge.classes.union(*x, *y);
                }
            } else {
                for frame in walk.path() {
                    knowledge.inequivalent.add(pair_index(frame.p, frame.q));
                }
            }
        }
    }

    debug!(
        "incremental minimization found {} classes among {} states",
        knowledge.classes.classes(),
        states
    );
    Ok(Partition::from_representatives(
        &knowledge.classes.compact(),
    ))
}
