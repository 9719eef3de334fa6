//! The subset construction, which turns an [`Nfa`] into an equivalent [`Dfa`].

use std::collections::VecDeque;

use tracing::debug;

use crate::{
    automaton::table_size,
    math::{BitSet, Map},
    prelude::*,
};

/// Determinizes `nfa` with the subset construction.
///
/// Subsets of NFA states are discovered in breadth-first order starting from the set of
/// initial states, which becomes state 0 of the result. Every discovered subset gets exactly
/// one outgoing transition per symbol, and it is final if it contains a final state of `nfa`.
/// The empty subset is an ordinary state of the result whenever it is reachable.
///
/// If `nfa` has no initial state, the result has no states at all. Fails if the number of
/// subsets exceeds the range of [`StateId`].
pub fn determinize(nfa: &Nfa) -> Result<Dfa, AutomatonError> {
    let alphabet = nfa.alphabet_size();
    let initial = nfa.initial_states();
    if initial.is_empty() {
        debug!("determinizing NFA without initial states");
        return Dfa::new(alphabet, 0);
    }

    let mut ids: Map<BitSet, StateId> = Map::default();
    let mut subsets = vec![initial.clone()];
    let mut edges: Vec<StateId> = vec![];
    ids.insert(initial.clone(), 0);

    let mut queue = VecDeque::from([0usize]);
    while let Some(current) = queue.pop_front() {
        for a in 0..alphabet as Symbol {
            let target = nfa.successors_of_set(&subsets[current], a);
            let id = match ids.get(&target) {
                Some(id) => *id,
                None => {
                    let id = subsets.len();
                    table_size(alphabet, id + 1)?;
                    ids.insert(target.clone(), id as StateId);
                    subsets.push(target);
                    queue.push_back(id);
                    id as StateId
                }
            };
            edges.push(id);
        }
    }

    let mut dfa = Dfa::allocate(alphabet, subsets.len());
    dfa.set_initial(0, true);
    for (q, subset) in subsets.iter().enumerate() {
        let q = q as StateId;
        dfa.set_final(q, subset.intersects(nfa.final_states()));
        for a in 0..alphabet as Symbol {
            dfa.set_transition(q, a, edges[q as usize * alphabet + a as usize]);
        }
    }
    debug!(
        "determinized NFA with {} states into DFA with {} states",
        nfa.state_count(),
        dfa.state_count()
    );
    Ok(dfa)
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn second_to_last_symbol() {
        let nfa = Nfa::from_parts(
            2,
            3,
            [0],
            [2],
            [(0, 0, 0), (0, 1, 0), (0, 1, 1), (1, 0, 2), (1, 1, 2)],
        )
        .unwrap();
        let dfa = determinize(&nfa).unwrap();
        // {0}, {0, 1}, {0, 2}, {0, 1, 2}
        assert_eq!(dfa.state_count(), 4);
        assert_eq!(dfa.initial_states().count(), 1);
        assert!(dfa.is_initial(0));
        assert_eq!(dfa.final_states().count(), 2);
        for word in [vec![], vec![1], vec![1, 0], vec![0, 1, 1], vec![1, 0, 0], vec![1, 1, 1]] {
            assert_eq!(dfa.accepts(word.clone()), nfa.accepts(word));
        }
    }

    #[test]
    fn deterministic_input_is_preserved() {
        let dfa = Dfa::from_parts(
            2,
            3,
            [0],
            [2],
            [(0, 0, 1), (0, 1, 0), (1, 0, 2), (1, 1, 0), (2, 0, 2), (2, 1, 2)],
        )
        .unwrap();
        let determinized = Nfa::from(&dfa).determinize().unwrap();
        assert!(determinized.is_isomorphic_to(&dfa));
        assert!(dfa.is_isomorphic_to(&determinized));
    }

    #[test]
    fn empty_subset_becomes_a_state() {
        let nfa = Nfa::from_parts(2, 2, [0], [1], [(0, 0, 1)]).unwrap();
        let dfa = nfa.determinize().unwrap();
        // {0}, {1} and the empty set
        assert_eq!(dfa.state_count(), 3);
        let dead = dfa.successor(0, 1);
        assert!(!dfa.is_final(dead));
        assert!(dfa.symbols().all(|a| dfa.successor(dead, a) == dead));
        assert!(dfa.accepts([0]));
        assert!(!dfa.accepts([0, 0]));
    }

    #[test]
    fn no_initial_state() {
        let mut nfa = Nfa::new(2, 2).unwrap();
        nfa.set_final(1, true);
        nfa.set_transition(0, 0, 1, true);
        let dfa = determinize(&nfa).unwrap();
        assert_eq!(dfa.state_count(), 0);
        assert_eq!(dfa.alphabet_size(), 2);
        assert!(!dfa.accepts([0]));
    }
}
