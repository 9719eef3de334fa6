use std::{collections::VecDeque, fmt::Debug};

use itertools::Itertools;
use owo_colors::OwoColorize;

use crate::{
    automaton::{check_state, check_symbol, table_size},
    math::{BitSet, Bijection},
    prelude::*,
};

/// A deterministic finite automaton over the alphabet `0..alphabet_size()` with the states
/// `0..state_count()`.
///
/// The transition function is stored as a flat table indexed by `state * alphabet + symbol`
/// and is always total: on creation every transition leads to state 0, so an automaton
/// that only sets some of its transitions uses state 0 as a sink. Alongside the successor
/// table, the automaton maintains the inverse function, mapping every pair of target state
/// and symbol to the [`BitSet`] of states that reach the target on that symbol. Both tables
/// are updated together by [`Dfa::set_transition`], so they are always mutual inverses.
///
/// A `Dfa` may have several initial states (for example when it results from reversing an
/// automaton); [`FiniteAutomaton::accepts`] then accepts a word if the run from any of them
/// accepts.
///
/// # Example
/// ```
/// use automata_minimization::prelude::*;
///
/// let mut dfa = Dfa::new(2, 2).unwrap();
/// dfa.set_initial(0, true);
/// dfa.set_final(1, true);
/// dfa.set_transition(0, 1, 1);
/// dfa.set_transition(1, 1, 1);
/// assert!(dfa.accepts([0, 1, 1]));
/// assert!(!dfa.accepts([1, 0]));
/// assert_eq!(dfa.predecessors(1, 1).iter().collect::<Vec<_>>(), vec![0, 1]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Dfa {
    alphabet: usize,
    states: usize,
    initial: BitSet,
    finals: BitSet,
    successors: Vec<StateId>,
    predecessors: Vec<BitSet>,
}

impl Dfa {
    /// Creates a DFA with `states` states over an alphabet of `alphabet` symbols in which every
    /// transition leads to state 0 and no state is initial or final. Fails before allocating
    /// anything if the dimensions cannot be represented.
    pub fn new(alphabet: usize, states: usize) -> Result<Self, AutomatonError> {
        table_size(alphabet, states)?;
        Ok(Self::allocate(alphabet, states))
    }

    /// Like [`Dfa::new`], for dimensions that are already known to be representable.
    pub(crate) fn allocate(alphabet: usize, states: usize) -> Self {
        let mut predecessors = vec![BitSet::new(states); alphabet * states];
        if states > 0 {
            for slot in predecessors.iter_mut().take(alphabet) {
                *slot = BitSet::full(states);
            }
        }
        Self {
            alphabet,
            states,
            initial: BitSet::new(states),
            finals: BitSet::new(states),
            successors: vec![0; alphabet * states],
            predecessors,
        }
    }

    /// Builds a DFA from its components, checking that every index is in range. Transitions
    /// that are not listed lead to state 0; if a transition is listed twice, the later one wins.
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
        let mut dfa = Self::new(alphabet, states)?;
        for q in initial {
            dfa.set_initial(check_state(q, states)?, true);
        }
        for q in finals {
            dfa.set_final(check_state(q, states)?, true);
        }
        for (source, symbol, target) in transitions {
            dfa.set_transition(
                check_state(source, states)?,
                check_symbol(symbol, alphabet)?,
                check_state(target, states)?,
            );
        }
        Ok(dfa)
    }

    #[inline]
    fn index(&self, state: StateId, symbol: Symbol) -> usize {
        assert!((state as usize) < self.states, "state {state} out of range");
        assert!((symbol as usize) < self.alphabet, "symbol {symbol} out of range");
        state as usize * self.alphabet + symbol as usize
    }

    /// Makes `state` initial (or not, if `initial` is `false`).
    pub fn set_initial(&mut self, state: StateId, initial: bool) {
        self.initial.set(state as usize, initial);
    }

    /// Makes `state` final (or not, if `is_final` is `false`).
    pub fn set_final(&mut self, state: StateId, is_final: bool) {
        self.finals.set(state as usize, is_final);
    }

    /// Redirects the transition from `source` on `symbol` to `target`, keeping the
    /// predecessor sets in sync. Runs in constant time.
    pub fn set_transition(&mut self, source: StateId, symbol: Symbol, target: StateId) {
        assert!((target as usize) < self.states, "state {target} out of range");
        let index = self.index(source, symbol);
        let previous = std::mem::replace(&mut self.successors[index], target);
        let previous_index = previous as usize * self.alphabet + symbol as usize;
        self.predecessors[previous_index].remove(source as usize);
        let target_index = target as usize * self.alphabet + symbol as usize;
        self.predecessors[target_index].add(source as usize);
    }

    /// The state reached from `source` on `symbol`.
    #[inline]
    pub fn successor(&self, source: StateId, symbol: Symbol) -> StateId {
        self.successors[self.index(source, symbol)]
    }

    /// The set of states that reach `target` on `symbol`.
    #[inline]
    pub fn predecessors(&self, target: StateId, symbol: Symbol) -> &BitSet {
        &self.predecessors[self.index(target, symbol)]
    }

    /// Returns `true` if `source` reaches `target` on `symbol`.
    pub fn is_successor(&self, source: StateId, symbol: Symbol, target: StateId) -> bool {
        self.successor(source, symbol) == target
    }

    /// Iterates over all states.
    pub fn states(&self) -> impl Iterator<Item = StateId> + Clone {
        0..self.states as StateId
    }

    /// Iterates over all symbols.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + Clone {
        0..self.alphabet as Symbol
    }

    /// The state reached from `source` by reading `word`.
    pub fn run_from<W: IntoIterator<Item = Symbol>>(&self, source: StateId, word: W) -> StateId {
        word.into_iter()
            .fold(source, |state, symbol| self.successor(state, symbol))
    }

    /// Reverses every transition and swaps initial and final states. The result is in
    /// general not deterministic.
    pub fn reversed(&self) -> Nfa {
        Nfa::from_tables(
            self.alphabet,
            self.states,
            self.finals.clone(),
            self.initial.clone(),
            self.predecessors.clone(),
            self.successor_sets(),
        )
    }

    /// The successor table with each target turned into a singleton set.
    pub(crate) fn successor_sets(&self) -> Vec<BitSet> {
        self.successors
            .iter()
            .map(|target| BitSet::from_iter_with_capacity(self.states, [*target as usize]))
            .collect()
    }

    /// The set of states that can be reached from some initial state.
    pub fn reachable_states(&self) -> BitSet {
        let mut seen = self.initial.clone();
        let mut queue: VecDeque<StateId> = seen.iter().map(|q| q as StateId).collect();
        while let Some(q) = queue.pop_front() {
            for a in self.symbols() {
                let p = self.successor(q, a);
                if !seen.test_and_add(p as usize) {
                    queue.push_back(p);
                }
            }
        }
        seen
    }

    /// Removes all states that cannot be reached from an initial state. The remaining states
    /// are renumbered in increasing order of their original index.
    pub fn restrict_to_reachable(&self) -> Dfa {
        let reachable = self.reachable_states();
        let mut renaming = vec![StateId::MAX; self.states];
        for (new, old) in reachable.iter().enumerate() {
            renaming[old] = new as StateId;
        }
        let mut out = Dfa::allocate(self.alphabet, reachable.count());
        for old in reachable.iter() {
            let q = renaming[old];
            out.set_initial(q, self.initial.contains(old));
            out.set_final(q, self.finals.contains(old));
            for a in self.symbols() {
                out.set_transition(q, a, renaming[self.successor(old as StateId, a) as usize]);
            }
        }
        out
    }

    /// Checks whether the parts of `self` and `other` that are reachable from their unique
    /// initial states are equal up to a renaming of states. Automata without exactly one
    /// initial state are only isomorphic if both have no initial state at all.
    pub fn is_isomorphic_to(&self, other: &Dfa) -> bool {
        if self.alphabet != other.alphabet {
            return false;
        }
        let (left, right) = match (self.initial.count(), other.initial.count()) {
            (0, 0) => return true,
            (1, 1) => (
                self.initial.first().unwrap_or_default() as StateId,
                other.initial.first().unwrap_or_default() as StateId,
            ),
            _ => return false,
        };

        let mut bijection = Bijection::new();
        bijection.insert(left, right);
        let mut queue = VecDeque::from([(left, right)]);
        while let Some((p, q)) = queue.pop_front() {
            if self.is_final(p) != other.is_final(q) {
                return false;
            }
            for a in self.symbols() {
                let (sp, sq) = (self.successor(p, a), other.successor(q, a));
                match (bijection.get_by_left(&sp), bijection.get_by_right(&sq)) {
                    (None, None) => {
                        bijection.insert(sp, sq);
                        queue.push_back((sp, sq));
                    }
                    (Some(mapped), _) if *mapped == sq => {}
                    _ => return false,
                }
            }
        }
        true
    }

    /// Converts `self` into an equivalent [`Nfa`].
    pub fn to_nfa(&self) -> Nfa {
        Nfa::from(self)
    }
}

impl FiniteAutomaton for Dfa {
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
            .map(|(q, a)| (q, a, self.successor(q, a)))
    }

    fn accepts<W: IntoIterator<Item = Symbol>>(&self, word: W) -> bool {
        let word = word.into_iter().collect_vec();
        self.initial
            .iter()
            .any(|q| self.is_final(self.run_from(q as StateId, word.iter().copied())))
    }
}

impl Debug for Dfa {
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
            builder.push_record(
                std::iter::once(label)
                    .chain(self.symbols().map(|a| self.successor(q, a).to_string())),
            );
        }
        write!(
            f,
            "DFA\n{}",
            builder
                .build()
                .with(tabled::settings::Style::rounded())
                .to_string()
        )
    }
}
