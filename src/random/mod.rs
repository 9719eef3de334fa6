use fastrand::Rng;
use tracing::debug;

use crate::{math::BitSet, prelude::*};

/// Uses a sprout-like algorithm to generate a random [`Dfa`] over `symbols` symbols in which
/// every state is reachable from the initial state 0. `probability` determines the
/// probability of a back edge to some state being inserted. The algorithm is as follows:
/// 1. Start with a single state.
/// 2. For each symbol, go through the existing states in order and with probability `probability`
///   add a back edge to that state.
/// 3. If no back edge was added, insert an edge to a new state. Once `max_states` states
///   exist, the edge leads to a uniformly chosen existing state instead.
/// 4. Repeat until all states and symbols have been treated.
///
/// Every state is final with probability one half, and at least one state is final.
pub fn generate_random_dfa(
    rng: &mut Rng,
    symbols: usize,
    max_states: usize,
    probability: f64,
) -> Dfa {
    assert!(max_states > 0, "a DFA needs at least one state");
    let mut edges: Vec<(usize, usize, usize)> = vec![];
    let mut states = 1;
    let mut current = 0;

    while current < states {
        'symbols: for symbol in 0..symbols {
            for target in 0..=current {
                if rng.f64() < probability {
                    edges.push((current, symbol, target));
                    continue 'symbols;
                }
            }
            // no target was found so we create it
            let target = if states < max_states {
                states += 1;
                states - 1
            } else {
                rng.usize(..states)
            };
            edges.push((current, symbol, target));
        }
        current += 1;
    }

    let mut finals = (0..states).filter(|_| rng.bool()).collect::<Vec<_>>();
    if finals.is_empty() {
        finals.push(rng.usize(..states));
    }
    debug!("generated random DFA with {states} states over {symbols} symbols");
    Dfa::from_parts(symbols, states, [0], finals, edges)
        .unwrap_or_else(|e| panic!("generated transitions must be in range: {e}"))
}

fn random_member(rng: &mut Rng, set: &BitSet) -> StateId {
    let members = set.iter().collect::<Vec<_>>();
    members[rng.usize(..members.len())] as StateId
}

/// Generates a random [`Nfa`] with `states` states over `symbols` symbols, of which `initials`
/// are initial and `finals` are final. Every state is reachable from an initial state and can
/// reach a final state. Beyond the edges needed for that, every possible edge is present with
/// probability `density`.
pub fn generate_random_nfa(
    rng: &mut Rng,
    states: usize,
    symbols: usize,
    initials: usize,
    finals: usize,
    density: f64,
) -> Nfa {
    assert!(symbols > 0, "an NFA with edges needs at least one symbol");
    assert!(
        0 < initials && initials <= states && 0 < finals && finals <= states,
        "cannot choose {initials} initial and {finals} final states among {states}"
    );
    let mut nfa = Nfa::new(symbols, states)
        .unwrap_or_else(|e| panic!("cannot generate NFA of this size: {e}"));

    let mut chosen = 0;
    while chosen < initials {
        let q = rng.usize(..states) as StateId;
        if !nfa.is_initial(q) {
            nfa.set_initial(q, true);
            chosen += 1;
        }
    }
    chosen = 0;
    while chosen < finals {
        let q = rng.usize(..states) as StateId;
        if !nfa.is_final(q) {
            nfa.set_final(q, true);
            chosen += 1;
        }
    }

    let mut reached = nfa.initial_states().clone();
    let mut reaching = nfa.final_states().clone();
    for q in nfa.states().collect::<Vec<_>>() {
        if !reached.contains(q as usize) {
            let source = random_member(rng, &reached);
            nfa.set_transition(source, rng.u32(..symbols as Symbol), q, true);
            reached.add(q as usize);
        }
        if !reaching.contains(q as usize) {
            let target = random_member(rng, &reaching);
            nfa.set_transition(q, rng.u32(..symbols as Symbol), target, true);
            reaching.add(q as usize);
        }
    }

    for source in 0..states as StateId {
        for symbol in 0..symbols as Symbol {
            for target in 0..states as StateId {
                if rng.f64() < density {
                    nfa.set_transition(source, symbol, target, true);
                }
            }
        }
    }
    nfa
}

/// Generates a random word over `symbols` symbols whose length is drawn uniformly from
/// `min_len..=max_len`. Over an empty alphabet only the empty word can be generated.
pub fn generate_random_word(
    rng: &mut Rng,
    symbols: usize,
    min_len: usize,
    max_len: usize,
) -> Vec<Symbol> {
    assert!(
        symbols > 0 || max_len == 0,
        "cannot generate words of length up to {max_len} without symbols"
    );
    let length = rng.usize(min_len..=max_len);
    (0..length)
        .map(|_| rng.u32(..symbols as Symbol))
        .collect()
}
