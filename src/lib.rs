//! Library for minimizing deterministic finite automata in Rust.
//!
//! Automata are represented by the types [`Dfa`](automaton::Dfa) and [`Nfa`](automaton::Nfa),
//! whose states and symbols are dense indices starting at 0. Both store their transition
//! relation in both directions, so the set of predecessors of a state on a symbol is always
//! available as a [`BitSet`](math::BitSet). This is what the minimization algorithms build on.
//!
//! The crate provides five minimization algorithms, see the [`minimization`] module:
//! - Hopcroft's partition refinement, which splits blocks of states along inverse images,
//! - Brzozowski's algorithm, which reverses and determinizes twice,
//! - an incremental algorithm that tests pairs of states for equivalence,
//! - a hybrid of the pairwise test and partition refinement,
//! - and the atomic construction, which replicates inverse images of the final states and
//!   determinizes the result.
//!
//! All of them compute the same minimal automaton on inputs in which every state is
//! reachable, which can be checked with [`minimization::cross_validate`]. Besides that, the
//! crate contains the subset construction for determinizing an [`Nfa`](automaton::Nfa), a
//! plain text format for reading and writing automata, an export to graphviz and (behind the
//! `random` feature) generators for random automata and words.
//!
//! ```
//! use automata_minimization::prelude::*;
//!
//! let dfa = Dfa::from_parts(
//!     2,
//!     4,
//!     [0],
//!     [3],
//!     [(0, 0, 1), (0, 1, 2), (1, 0, 3), (1, 1, 1), (2, 0, 3), (2, 1, 2), (3, 0, 3), (3, 1, 3)],
//! )
//! .unwrap();
//! let minimal = dfa.minimize_with(Algorithm::Hybrid).unwrap();
//! assert_eq!(minimal.state_count(), 3);
//! ```
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_minimization::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        automaton::{AutomatonError, Dfa, FiniteAutomaton, Nfa, StateId, Symbol},
        determinization::determinize,
        dot::Dottable,
        math,
        math::{BitSet, Partition},
        minimization::{
            cross_validate, minimize, minimize_atomic, minimize_brzozowski, minimize_hopcroft,
            minimize_hybrid, minimize_incremental, synthesize, Algorithm, MinimizationError,
            Observer, TracingObserver,
        },
        plain_text::{parse_dfa, parse_nfa, read_dfa, read_nfa, to_plain_text, write_automaton},
        Show,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Defines the automaton types and the functionality they share.
pub mod automaton;

pub mod determinization;

pub mod minimization;

pub mod plain_text;

pub mod dot;

/// Implements the generation of random automata and words.
#[cfg(feature = "random")]
pub mod random;

/// Helper trait which can be used to display sets of states, partitions and such.
pub trait Show {
    /// Returns a human readable representation of `self`. This is mainly used for debugging
    /// purposes.
    fn show(&self) -> String;
}

impl<S: Show> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}
