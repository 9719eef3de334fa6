use crate::{math::BitSet, prelude::*};

/// Index of the unordered pair `{p, q}` with `p != q` in a triangular enumeration of all
/// such pairs.
#[inline]
pub(crate) fn pair_index(p: StateId, q: StateId) -> usize {
    debug_assert_ne!(p, q);
    let (low, high) = if p < q { (p, q) } else { (q, p) };
    let high = high as usize;
    high * (high - 1) / 2 + low as usize
}

/// The number of unordered pairs of distinct states.
pub(crate) fn pair_count(states: usize) -> usize {
    states * states.saturating_sub(1) / 2
}

/// What a [`PairWalk`] knows about the states of the automaton it explores.
pub(crate) trait PairKnowledge {
    /// The state that stands for the class of `state` among the states already known to be
    /// equivalent.
    fn representative(&mut self, state: StateId) -> StateId;

    /// Returns `true` if `p` and `q` are already known to be inequivalent.
    fn distinguished(&self, p: StateId, q: StateId) -> bool;
}

/// A pair on the current path of a [`PairWalk`]. `next` is the symbol whose successor pair
/// is explored next, so `next - 1` is the symbol that led to the pair above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Frame {
    pub p: StateId,
    pub q: StateId,
    pub next: Symbol,
}

/// Co-inductive equivalence test for pairs of states.
///
/// Starting from a pair, the walk explores the successor pairs depth first with an explicit
/// stack. A pair that was already visited during the same walk is assumed to be equivalent,
/// pairs of states with the same representative are skipped. As soon as a distinguished pair
/// is found, the walk stops and every pair on the current path is distinguished as well.
/// Otherwise all visited pairs are equivalent.
pub(crate) struct PairWalk {
    visited: BitSet,
    seen: Vec<(StateId, StateId)>,
    stack: Vec<Frame>,
}

impl PairWalk {
    pub fn new(states: usize) -> Self {
        Self {
            visited: BitSet::new(pair_count(states)),
            seen: vec![],
            stack: vec![],
        }
    }

    fn reset(&mut self) {
        for (p, q) in self.seen.drain(..) {
            self.visited.remove(pair_index(p, q));
        }
        self.stack.clear();
    }

    fn visit(&mut self, p: StateId, q: StateId) -> bool {
        if self.visited.test_and_add(pair_index(p, q)) {
            return false;
        }
        self.seen.push((p, q));
        self.stack.push(Frame { p, q, next: 0 });
        true
    }

    /// Tests whether `p` and `q` are equivalent. The caller makes sure that the two are
    /// distinct representatives that are not known to be distinguished.
    pub fn run<K: PairKnowledge>(
        &mut self,
        dfa: &Dfa,
        p: StateId,
        q: StateId,
        knowledge: &mut K,
    ) -> bool {
        debug_assert!(!knowledge.distinguished(p, q));
        self.reset();
        self.visit(p, q);

        let alphabet = dfa.alphabet_size() as Symbol;
        while let Some(frame) = self.stack.last_mut() {
            if frame.next == alphabet {
                self.stack.pop();
                continue;
            }
            let a = frame.next;
            frame.next += 1;
            let (p, q) = (frame.p, frame.q);

            let x = knowledge.representative(dfa.successor(p, a));
            let y = knowledge.representative(dfa.successor(q, a));
            if x == y {
                continue;
            }
            if knowledge.distinguished(x, y) {
                return false;
            }
            self.visit(x.min(y), x.max(y));
        }
        true
    }

    /// All pairs visited by the last successful walk.
    pub fn visited(&self) -> &[(StateId, StateId)] {
        &self.seen
    }

    /// The path from the starting pair down to the pair whose successor was distinguished,
    /// after a failed walk.
    pub fn path(&self) -> &[Frame] {
        &self.stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Set;

    #[test]
    fn triangular_indices_are_dense() {
        let n = 7;
        let mut indices = Set::default();
        for q in 0..n {
            for p in 0..q {
                assert_eq!(pair_index(p, q), pair_index(q, p));
                assert!(pair_index(p, q) < pair_count(n as usize));
                indices.insert(pair_index(p, q));
            }
        }
        assert_eq!(indices.len(), pair_count(n as usize));
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
    }

    struct Finality<'a>(&'a Dfa);

    impl PairKnowledge for Finality<'_> {
        fn representative(&mut self, state: StateId) -> StateId {
            state
        }

        fn distinguished(&self, p: StateId, q: StateId) -> bool {
            self.0.is_final(p) != self.0.is_final(q)
        }
    }

    #[test]
    fn walk_reports_path_and_visited_pairs() {
        // 0 and 1 loop into each other, 2 reaches a final state on 1
        let dfa = Dfa::from_parts(
            2,
            5,
            [0],
            [4],
            [(0, 0, 1), (1, 0, 0), (2, 0, 3), (3, 0, 2), (3, 1, 4), (4, 0, 4), (4, 1, 4)],
        )
        .unwrap();
        let mut walk = PairWalk::new(5);

        assert!(walk.run(&dfa, 0, 1, &mut Finality(&dfa)));
        assert_eq!(walk.visited(), &[(0, 1)]);

        assert!(!walk.run(&dfa, 1, 2, &mut Finality(&dfa)));
        // (1, 2) -0-> (0, 3) -1-> (0, 4)
        assert_eq!(
            walk.path(),
            &[
                Frame { p: 1, q: 2, next: 1 },
                Frame { p: 0, q: 3, next: 2 }
            ]
        );

        // visited pairs of the previous walk are forgotten
        assert!(walk.run(&dfa, 0, 1, &mut Finality(&dfa)));
        assert_eq!(walk.visited().len(), 1);
    }
}
