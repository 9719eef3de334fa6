//! A simple line based text format for finite automata.
//!
//! A file consists of five sections, each introduced by a line starting with `#`. The
//! rest of a header line is ignored.
//!
//! ```text
//! # states
//! 3
//! # alphabet
//! 2
//! # initial
//! 0
//! # final
//! 1 2
//! # transitions
//! 0 0 1
//! 0 1 2
//! ```
//!
//! The first two sections contain a single number, the sets of initial and final states are
//! given as whitespace separated lists (which may be empty) and every line of the last
//! section is a transition `source symbol target`. Blank lines are skipped. For a [`Dfa`],
//! unlisted transitions lead to state 0.
//!
//! [`Dfa`]: crate::automaton::Dfa
use thiserror::Error;

use crate::automaton::AutomatonError;

mod input;
pub use input::{parse_dfa, parse_nfa, read_dfa, read_dfa_with, read_nfa, read_nfa_with};

mod output;
pub use output::{to_plain_text, write_automaton};

/// How states and symbols are numbered in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBase {
    /// The first state and symbol are 0.
    #[default]
    Zero,
    /// The first state and symbol are 1, they are shifted down on reading.
    One,
}

/// Configures how the plain text format is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReaderOptions {
    /// The numbering used for states and symbols.
    pub base: IndexBase,
}

impl ReaderOptions {
    /// Options for files in which states and symbols are numbered from 1.
    pub fn one_based() -> Self {
        Self {
            base: IndexBase::One,
        }
    }
}

/// Errors that occur while reading an automaton in the plain text format.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A section header was expected but something else was found.
    #[error("line {line}: expected the `{section}` section header")]
    MissingSection {
        /// The offending line, counted from 1.
        line: usize,
        /// The name of the expected section.
        section: &'static str,
    },
    /// The input ended before the given section was read.
    #[error("unexpected end of input while reading `{section}`")]
    UnexpectedEnd {
        /// The name of the section that is incomplete.
        section: &'static str,
    },
    /// A token could not be parsed as an index.
    #[error("line {line}: `{token}` is not a valid index")]
    InvalidNumber {
        /// The offending line, counted from 1.
        line: usize,
        /// The token that failed to parse.
        token: String,
    },
    /// A transition line does not consist of exactly three numbers.
    #[error("line {line}: expected `source symbol target`, found {found} columns")]
    WrongColumnCount {
        /// The offending line, counted from 1.
        line: usize,
        /// The number of columns on the line.
        found: usize,
    },
    /// The described automaton is invalid.
    #[error(transparent)]
    Automaton(#[from] AutomatonError),
    /// The input could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
