use std::fmt::Debug;

use itertools::Itertools;
use owo_colors::OwoColorize;

use crate::{
    automaton::{check_state, check_symbol, table_size},
    math::BitSet,
    prelude::*,
};

/// A nondeterministic finite automaton without epsilon transitions.
///
/// For every pair of state and symbol, the automaton stores the set of successors as well as
/// the set of predecessors, both as [`BitSet`]s of capacity `state_count()`. Adding or removing
/// an edge with [`Nfa::set_transition`] updates both tables, which makes [`Nfa::invert`] a
/// constant time operation.
#[derive(Clone, PartialEq, Eq)]
pub struct Nfa {
    alphabet: usize,
    states: usize,
    initial: BitSet,
    finals: BitSet,
    successors: Vec<BitSet>,
    predecessors: Vec<BitSet>,
}

impl Nfa {
    /// Creates an NFA with `states` states over `alphabet` symbols and no transitions.
    pub fn new(alphabet: usize, states: usize) -> Result<Self, AutomatonError> {
        let size = table_size(alphabet, states)?;
        Ok(Self {
            alphabet,
            states,
            initial: BitSet::new(states),
            finals: BitSet::new(states),
            successors: vec![BitSet::new(states); size],
            predecessors: vec![BitSet::new(states); size],
        })
    }

    pub(crate) fn from_tables(
        alphabet: usize,
        states: usize,
        initial: BitSet,
        finals: BitSet,
        successors: Vec<BitSet>,
        predecessors: Vec<BitSet>,
    ) -> Self {
        debug_assert_eq!(successors.len(), alphabet * states);
        debug_assert_eq!(predecessors.len(), alphabet * states);
        Self {
            alphabet,
            states,
            initial,
            finals,
            successors,
            predecessors,
        }
    }

    /// Builds an NFA from its components, checking every index.
    pub fn from_parts<I, F, T>(
        alphabet: usize,
        states: usize,
        initial: I,
        finals: F,
        transitions: T,
    ) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = usize>,
        F: IntoIterator<Item = usize>,
        T: IntoIterator<Item = (usize, usize, usize)>,
    {
        let mut nfa = Self::new(alphabet, states)?;
        for q in initial {
            nfa.set_initial(check_state(q, states)?, true);
        }
        for q in finals {
            nfa.set_final(check_state(q, states)?, true);
        }
        for (source, symbol, target) in transitions {
            nfa.set_transition(
                check_state(source, states)?,
                check_symbol(symbol, alphabet)?,
                check_state(target, states)?,
                true,
            );
        }
        Ok(nfa)
    }

    #[inline]
    fn index(&self, state: StateId, symbol: Symbol) -> usize {
        assert!((state as usize) < self.states, "state {state} out of range");
        assert!((symbol as usize) < self.alphabet, "symbol {symbol} out of range");
        state as usize * self.alphabet + symbol as usize
    }

    /// Makes `state` initial (or not).
    pub fn set_initial(&mut self, state: StateId, initial: bool) {
        self.initial.set(state as usize, initial);
    }

    /// Makes `state` final (or not).
    pub fn set_final(&mut self, state: StateId, is_final: bool) {
        self.finals.set(state as usize, is_final);
    }

    /// Adds the edge `source --symbol--> target` if `add` is `true`, removes it otherwise.
    pub fn set_transition(&mut self, source: StateId, symbol: Symbol, target: StateId, add: bool) {
        let forward = self.index(source, symbol);
        let backward = self.index(target, symbol);
        self.successors[forward].set(target as usize, add);
        self.predecessors[backward].set(source as usize, add);
    }

    /// The states reached from `source` on `symbol`.
    #[inline]
    pub fn successors(&self, source: StateId, symbol: Symbol) -> &BitSet {
        &self.successors[self.index(source, symbol)]
    }

    /// The states that reach `target` on `symbol`.
    #[inline]
    pub fn predecessors(&self, target: StateId, symbol: Symbol) -> &BitSet {
        &self.predecessors[self.index(target, symbol)]
    }

    /// Returns `true` if the edge `source --symbol--> target` exists.
    pub fn is_successor(&self, source: StateId, symbol: Symbol, target: StateId) -> bool {
        self.successors(source, symbol).contains(target as usize)
    }

    /// Iterates over all states.
    pub fn states(&self) -> impl Iterator<Item = StateId> + Clone {
        0..self.states as StateId
    }

    /// Iterates over all symbols.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + Clone {
        0..self.alphabet as Symbol
    }

    /// Collects the successors of every state in `states` on `symbol` into a single set.
    pub fn successors_of_set(&self, states: &BitSet, symbol: Symbol) -> BitSet {
        let mut out = BitSet::new(self.states);
        for q in states {
            out.union_with(self.successors(q as StateId, symbol));
        }
        out
    }

    /// Reverses the automaton in place: initial and final states trade places, and so do
    /// successors and predecessors.
    pub fn invert(&mut self) {
        std::mem::swap(&mut self.initial, &mut self.finals);
        std::mem::swap(&mut self.successors, &mut self.predecessors);
    }

    /// Returns the reversal of `self`, see [`Nfa::invert`].
    pub fn reversed(&self) -> Nfa {
        let mut out = self.clone();
        out.invert();
        out
    }

    /// Turns `self` into an equivalent [`Dfa`] with the subset construction, see
    /// [`crate::determinization::determinize`].
    pub fn determinize(&self) -> Result<Dfa, AutomatonError> {
        crate::determinization::determinize(self)
    }
}

impl From<&Dfa> for Nfa {
    fn from(dfa: &Dfa) -> Self {
        let mut predecessors = Vec::with_capacity(dfa.alphabet_size() * dfa.state_count());
        for q in dfa.states() {
            for a in dfa.symbols() {
                predecessors.push(dfa.predecessors(q, a).clone());
            }
        }
        Self::from_tables(
            dfa.alphabet_size(),
            dfa.state_count(),
            dfa.initial_states().clone(),
            dfa.final_states().clone(),
            dfa.successor_sets(),
            predecessors,
        )
    }
}

impl FiniteAutomaton for Nfa {
    fn alphabet_size(&self) -> usize {
        self.alphabet
    }

    fn state_count(&self) -> usize {
        self.states
    }

    fn initial_states(&self) -> &BitSet {
        &self.initial
    }

    fn final_states(&self) -> &BitSet {
        &self.finals
    }

    fn transitions(&self) -> impl Iterator<Item = (StateId, Symbol, StateId)> + '_ {
        self.states()
            .cartesian_product(self.symbols())
            .flat_map(move |(q, a)| {
                self.successors(q, a)
                    .iter()
                    .map(move |r| (q, a, r as StateId))
            })
    }

    fn accepts<W: IntoIterator<Item = Symbol>>(&self, word: W) -> bool {
        word.into_iter()
            .fold(self.initial.clone(), |current, symbol| {
                self.successors_of_set(&current, symbol)
            })
            .intersects(&self.finals)
    }
}

impl Debug for Nfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(self.symbols().map(|a| a.to_string())),
        );
        for q in self.states() {
            let mut label = q.to_string();
            if self.is_initial(q) {
                label = format!("→{label}");
            }
            if self.is_final(q) {
                label = label.green().to_string();
            }
            builder.push_record(std::iter::once(label).chain(self.symbols().map(|a| {
                let targets = self.successors(q, a);
                if targets.is_empty() {
                    "-".to_string()
                } else {
                    targets.iter().join(", ")
                }
            })));
        }
        write!(
            f,
            "NFA\n{}",
            builder
                .build()
                .with(tabled::settings::Style::rounded())
                .to_string()
        )
    }
}
