use std::io::BufRead;

use tracing::warn;

use super::{IndexBase, ParseError, ReaderOptions};
use crate::{math::Set, prelude::*};

/// The contents of a file, before they are turned into an automaton.
#[derive(Debug, Default)]
struct Description {
    states: usize,
    alphabet: usize,
    initial: Vec<usize>,
    finals: Vec<usize>,
    transitions: Vec<(usize, usize, usize)>,
}

/// Yields the non-blank lines of the input together with their line number.
struct Lines<R> {
    inner: std::io::Lines<R>,
    number: usize,
    peeked: Option<(usize, String)>,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self {
            inner: reader.lines(),
            number: 0,
            peeked: None,
        }
    }

    fn next_line(&mut self) -> Result<Option<(usize, String)>, ParseError> {
        if let Some(line) = self.peeked.take() {
            return Ok(Some(line));
        }
        for line in self.inner.by_ref() {
            self.number += 1;
            let line = line?;
            if !line.trim().is_empty() {
                return Ok(Some((self.number, line)));
            }
        }
        Ok(None)
    }

    fn peek_is_header(&mut self) -> Result<bool, ParseError> {
        if self.peeked.is_none() {
            self.peeked = self.next_line()?;
        }
        Ok(self
            .peeked
            .as_ref()
            .map_or(true, |(_, line)| is_header(line)))
    }

    fn header(&mut self, section: &'static str) -> Result<(), ParseError> {
        match self.next_line()? {
            Some((_, line)) if is_header(&line) => Ok(()),
            Some((line, _)) => Err(ParseError::MissingSection { line, section }),
            None => Err(ParseError::UnexpectedEnd { section }),
        }
    }

    /// Reads the line following a header, which is empty if the next line is a header.
    fn content(&mut self) -> Result<Option<(usize, String)>, ParseError> {
        if self.peek_is_header()? {
            return Ok(None);
        }
        self.next_line()
    }
}

fn is_header(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn parse_index(token: &str, line: usize, base: IndexBase) -> Result<usize, ParseError> {
    let invalid = || ParseError::InvalidNumber {
        line,
        token: token.to_string(),
    };
    let value: usize = token.parse().map_err(|_| invalid())?;
    match base {
        IndexBase::Zero => Ok(value),
        IndexBase::One => value.checked_sub(1).ok_or_else(invalid),
    }
}

fn parse_list(
    content: Option<(usize, String)>,
    base: IndexBase,
) -> Result<Vec<usize>, ParseError> {
    match content {
        None => Ok(vec![]),
        Some((line, text)) => text
            .split_whitespace()
            .map(|token| parse_index(token, line, base))
            .collect(),
    }
}

fn parse_count(
    content: Option<(usize, String)>,
    section: &'static str,
) -> Result<usize, ParseError> {
    let (line, text) = content.ok_or(ParseError::UnexpectedEnd { section })?;
    let text = text.trim();
    text.parse().map_err(|_| ParseError::InvalidNumber {
        line,
        token: text.to_string(),
    })
}

fn read_description<R: BufRead>(
    reader: R,
    options: ReaderOptions,
) -> Result<Description, ParseError> {
    let base = options.base;
    let mut lines = Lines::new(reader);
    let mut description = Description::default();

    lines.header("states")?;
    description.states = parse_count(lines.content()?, "states")?;
    lines.header("alphabet")?;
    description.alphabet = parse_count(lines.content()?, "alphabet")?;
    lines.header("initial")?;
    description.initial = parse_list(lines.content()?, base)?;
    lines.header("final")?;
    description.finals = parse_list(lines.content()?, base)?;
    lines.header("transitions")?;

    while let Some((line, text)) = lines.next_line()? {
        let columns = text
            .split_whitespace()
            .map(|token| parse_index(token, line, base))
            .collect::<Result<Vec<_>, _>>()?;
        match columns[..] {
            [source, symbol, target] => description.transitions.push((source, symbol, target)),
            _ => {
                return Err(ParseError::WrongColumnCount {
                    line,
                    found: columns.len(),
                })
            }
        }
    }
    Ok(description)
}

/// Reads a [`Dfa`] in the plain text format with zero based indices.
pub fn read_dfa<R: BufRead>(reader: R) -> Result<Dfa, ParseError> {
    read_dfa_with(reader, ReaderOptions::default())
}

/// Reads a [`Dfa`] in the plain text format. If a transition is listed more than once, the
/// last occurrence wins.
pub fn read_dfa_with<R: BufRead>(reader: R, options: ReaderOptions) -> Result<Dfa, ParseError> {
    let description = read_description(reader, options)?;
    let mut defined = Set::default();
    for (source, symbol, _) in &description.transitions {
        if !defined.insert((*source, *symbol)) {
            warn!("transition from state {source} on symbol {symbol} is defined more than once");
        }
    }
    Ok(Dfa::from_parts(
        description.alphabet,
        description.states,
        description.initial,
        description.finals,
        description.transitions,
    )?)
}

/// Reads an [`Nfa`] in the plain text format with zero based indices.
pub fn read_nfa<R: BufRead>(reader: R) -> Result<Nfa, ParseError> {
    read_nfa_with(reader, ReaderOptions::default())
}

/// Reads an [`Nfa`] in the plain text format.
pub fn read_nfa_with<R: BufRead>(reader: R, options: ReaderOptions) -> Result<Nfa, ParseError> {
    let description = read_description(reader, options)?;
    Ok(Nfa::from_parts(
        description.alphabet,
        description.states,
        description.initial,
        description.finals,
        description.transitions,
    )?)
}

/// Parses a [`Dfa`] from a string in the plain text format.
pub fn parse_dfa(text: &str) -> Result<Dfa, ParseError> {
    read_dfa(text.as_bytes())
}

/// Parses an [`Nfa`] from a string in the plain text format.
pub fn parse_nfa(text: &str) -> Result<Nfa, ParseError> {
    read_nfa(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::AutomatonError;

    const ONE_BASED: &str = "# Estados DFA
3
# Simbolos
2
# Iniciales
1
# Finales
3

# Transiciones (qs, c, qt)
1 1 2

2 2 3
3 1 3
3 2 3
";

    #[test]
    fn headers_are_free_text() {
        let dfa = read_dfa_with(ONE_BASED.as_bytes(), ReaderOptions::one_based()).unwrap();
        assert_eq!(dfa.state_count(), 3);
        assert!(dfa.is_initial(0));
        assert!(dfa.is_final(2));
        assert_eq!(dfa.successor(0, 0), 1);
        assert_eq!(dfa.successor(1, 1), 2);
        assert_eq!(dfa.successor(0, 1), 0);
        assert!(dfa.accepts([0, 1, 0, 1]));
    }

    #[test]
    fn empty_sets() {
        let nfa = parse_nfa("# states\n2\n# alphabet\n1\n# initial\n# final\n\n# transitions\n")
            .unwrap();
        assert!(nfa.initial_states().is_empty());
        assert!(nfa.final_states().is_empty());
        assert_eq!(nfa.transitions().count(), 0);
    }

    #[test]
    fn malformed_input() {
        assert!(matches!(
            parse_dfa("3\n# alphabet\n"),
            Err(ParseError::MissingSection {
                line: 1,
                section: "states"
            })
        ));
        assert!(matches!(
            parse_dfa("# states\n2\n# alphabet\n"),
            Err(ParseError::UnexpectedEnd {
                section: "alphabet"
            })
        ));
        assert!(matches!(
            parse_dfa("# states\nmany\n"),
            Err(ParseError::InvalidNumber { line: 2, .. })
        ));
        assert!(matches!(
            parse_dfa("# states\n2\n# alphabet\n1\n# initial\n0\n# final\n1\n# transitions\n0 0\n"),
            Err(ParseError::WrongColumnCount { line: 10, found: 2 })
        ));
        assert!(matches!(
            parse_dfa("# states\n2\n# alphabet\n1\n# initial\n0\n# final\n1\n# transitions\n0 1 1\n"),
            Err(ParseError::Automaton(AutomatonError::SymbolOutOfRange { symbol: 1, .. }))
        ));
        assert!(matches!(
            read_dfa_with(
                "# states\n1\n# alphabet\n1\n# initial\n0\n# final\n\n# transitions\n".as_bytes(),
                ReaderOptions::one_based()
            ),
            Err(ParseError::InvalidNumber { line: 6, .. })
        ));
    }
}
