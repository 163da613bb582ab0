/// Problems with the grammar or lexicon themselves. These are configuration
/// errors and are reported once, before any sentence is parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("grammar has no rules")]
    Empty,

    #[error("no rule found for start symbol `{0}`")]
    MissingStart(String),

    #[error("malformed rule on line {line}: {reason}")]
    MalformedRule { line: usize, reason: &'static str },

    #[error("malformed lexicon entry on line {line}: {reason}")]
    MalformedEntry { line: usize, reason: &'static str },
}

/// Why a sentence was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("no rule found for `{0}`")]
    UnknownSymbol(String),

    #[error("failed to match rule `{0}`")]
    NoMatch(String),

    #[error("tokens left after a complete match")]
    Incomplete,

    #[error("grammar recursion limit exceeded: `{symbol}` re-entered at index {position} without consuming a token")]
    Cycle { symbol: String, position: usize },

    #[error("grammar recursion limit of {limit} exceeded while matching `{symbol}`")]
    RecursionLimit { symbol: String, limit: usize },
}

/// A rejected sentence.
///
/// `position` is the furthest token index at which matching stopped, and
/// `expected` the symbols that could not be matched there. `consumed` is the
/// number of tokens covered by the top-level match (zero when it failed).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason} (index: {position}, token length: {token_count})")]
pub struct Rejection {
    pub reason: RejectReason,
    pub position: usize,
    pub expected: Vec<String>,
    pub consumed: usize,
    pub token_count: usize,
}

impl Rejection {
    pub fn is_incomplete(&self) -> bool {
        matches!(self.reason, RejectReason::Incomplete)
    }
}
