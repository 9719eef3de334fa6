use thiserror::Error;

use crate::math::BitSet;

mod dfa;
pub use dfa::Dfa;

mod nfa;
pub use nfa::Nfa;

/// The integer type used for indexing states and symbols throughout the crate.
pub type DefaultIdType = u32;
/// States are dense zero-based indices.
pub type StateId = DefaultIdType;
/// Symbols are dense zero-based indices into an alphabet of a given size.
pub type Symbol = DefaultIdType;

/// Errors that occur when constructing automata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AutomatonError {
    /// The requested number of states or symbols does not fit the index type, or the
    /// transition table would be too large to address.
    #[error("cannot allocate automaton with {states} states over {alphabet} symbols")]
    Capacity {
        /// The requested number of states.
        states: usize,
        /// The requested number of symbols.
        alphabet: usize,
    },
    /// A state index is not smaller than the number of states.
    #[error("state {state} does not exist in automaton with {states} states")]
    StateOutOfRange {
        /// The offending state.
        state: usize,
        /// The number of states of the automaton.
        states: usize,
    },
    /// A symbol index is not smaller than the alphabet size.
    #[error("symbol {symbol} does not exist in alphabet of size {alphabet}")]
    SymbolOutOfRange {
        /// The offending symbol.
        symbol: usize,
        /// The size of the alphabet.
        alphabet: usize,
    },
}

/// Checks that an automaton with the given dimensions can be indexed with [`StateId`] and
/// [`Symbol`] and returns the size of its transition table.
pub(crate) fn table_size(alphabet: usize, states: usize) -> Result<usize, AutomatonError> {
    let err = AutomatonError::Capacity { states, alphabet };
    if states > StateId::MAX as usize || alphabet > Symbol::MAX as usize {
        return Err(err);
    }
    alphabet.checked_mul(states).ok_or(err)
}

pub(crate) fn check_state(state: usize, states: usize) -> Result<StateId, AutomatonError> {
    if state < states {
        Ok(state as StateId)
    } else {
        Err(AutomatonError::StateOutOfRange { state, states })
    }
}

pub(crate) fn check_symbol(symbol: usize, alphabet: usize) -> Result<Symbol, AutomatonError> {
    if symbol < alphabet {
        Ok(symbol as Symbol)
    } else {
        Err(AutomatonError::SymbolOutOfRange { symbol, alphabet })
    }
}

/// Functionality shared by [`Dfa`] and [`Nfa`]: an alphabet of `alphabet_size()` symbols,
/// `state_count()` states, sets of initial and final states and a transition relation.
pub trait FiniteAutomaton {
    /// The number of symbols in the alphabet.
    fn alphabet_size(&self) -> usize;

    /// The number of states.
    fn state_count(&self) -> usize;

    /// The set of initial states.
    fn initial_states(&self) -> &BitSet;

    /// The set of final (accepting) states.
    fn final_states(&self) -> &BitSet;

    /// Returns `true` if `state` is initial.
    fn is_initial(&self, state: StateId) -> bool {
        self.initial_states().contains(state as usize)
    }

    /// Returns `true` if `state` is final.
    fn is_final(&self, state: StateId) -> bool {
        self.final_states().contains(state as usize)
    }

    /// Iterates over all transitions as `(source, symbol, target)` triples, ordered by source,
    /// then symbol, then target.
    fn transitions(&self) -> impl Iterator<Item = (StateId, Symbol, StateId)> + '_;

    /// Returns `true` if the automaton accepts `word`, that is, if some run on `word` that
    /// starts in an initial state ends in a final state.
    fn accepts<W: IntoIterator<Item = Symbol>>(&self, word: W) -> bool;
}
