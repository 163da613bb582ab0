use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use indexmap::IndexSet;

/// Something that happened while matching. Diagnostics are recorded in the
/// order they occur; printing them is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A symbol with no rule and no lexicon entries was referenced.
    UnknownSymbol { symbol: String, position: usize },
    /// No alternative of `symbol` matched at `position`.
    NoMatch { symbol: String, position: usize },
    /// `symbol` was re-entered at `position` without a token being consumed.
    Cycle { symbol: String, position: usize },
    RecursionLimit {
        symbol: String,
        position: usize,
        limit: usize,
    },
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnknownSymbol { symbol, position } => {
                write!(f, "No rule found for: {} (index: {})", symbol, position)
            }
            Diagnostic::NoMatch { symbol, position } => {
                write!(f, "Failed to match rule: '{}' (index: {})", symbol, position)
            }
            Diagnostic::Cycle { symbol, position } => write!(
                f,
                "Recursion limit exceeded: '{}' re-entered without consuming a token (index: {})",
                symbol, position
            ),
            Diagnostic::RecursionLimit {
                symbol,
                position,
                limit,
            } => write!(
                f,
                "Recursion limit {} exceeded at '{}' (index: {})",
                limit, symbol, position
            ),
        }
    }
}

/// The furthest token index any symbol failed at, and which symbols those were.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontier {
    pub position: usize,
    pub expected: IndexSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Trace {
    diagnostics: Vec<Diagnostic>,
    frontier: Frontier,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Unknown symbols are reported at their first reference only.
    pub(crate) fn report_unknown(&mut self, symbol: &str, position: usize) {
        let seen = self.diagnostics.iter().any(|d| {
            matches!(d, Diagnostic::UnknownSymbol { symbol: s, .. } if s == symbol)
        });
        if !seen {
            self.report(Diagnostic::UnknownSymbol {
                symbol: symbol.to_string(),
                position,
            });
        }
    }

    pub(crate) fn expect(&mut self, symbol: &str, position: usize) {
        match position.cmp(&self.frontier.position) {
            Ordering::Less => {}
            Ordering::Equal => {
                self.frontier.expected.insert(symbol.to_string());
            }
            Ordering::Greater => {
                self.frontier.position = position;
                self.frontier.expected.clear();
                self.frontier.expected.insert(symbol.to_string());
            }
        }
    }
}
