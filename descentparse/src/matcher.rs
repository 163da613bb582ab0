use fnv::FnvHashSet;

use crate::grammar::Grammar;
use crate::lexicon::Lexicon;
use crate::production::Production;
use crate::trace::{Diagnostic, Trace};
use crate::tree::Tree;

pub(crate) type Matched = Option<(Tree<String>, usize)>;

/// Raised when matching can not terminate normally. Unlike a failed match
/// this is not backtracked over: the whole sentence is abandoned.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LimitExceeded {
    /// `symbol` was entered again at `position` while still being matched
    /// there, so the grammar loops without consuming a token.
    Cycle { symbol: String, position: usize },
    /// The call path grew past `limit` frames.
    Depth { symbol: String, limit: usize },
}

/// Recursive descent over the rule table for a single token sequence.
pub(crate) struct Matcher<'g, 't> {
    grammar: &'g Grammar,
    lexicon: &'g Lexicon,
    tokens: &'t [&'t str],
    limit: usize,
    trace: &'t mut Trace,
    /// (symbol, position) pairs on the current call path.
    active: FnvHashSet<(&'g str, usize)>,
}

impl<'g, 't> Matcher<'g, 't> {
    pub(crate) fn new(
        grammar: &'g Grammar,
        lexicon: &'g Lexicon,
        tokens: &'t [&'t str],
        limit: usize,
        trace: &'t mut Trace,
    ) -> Self {
        Matcher {
            grammar,
            lexicon,
            tokens,
            limit,
            trace,
            active: FnvHashSet::default(),
        }
    }

    /// Matches `symbol` starting at `position`. On success returns the subtree
    /// and the position after the last token it covers; on failure nothing is
    /// consumed.
    pub(crate) fn match_symbol(
        &mut self,
        symbol: &str,
        position: usize,
        depth: usize,
    ) -> Result<Matched, LimitExceeded> {
        let grammar = self.grammar;
        let (name, alternatives) = match grammar.rule(symbol) {
            Some(rule) => rule,
            None => {
                self.trace.report_unknown(symbol, position);
                return Ok(None);
            }
        };

        if self.active.contains(&(name, position)) {
            self.trace.report(Diagnostic::Cycle {
                symbol: name.to_string(),
                position,
            });
            return Err(LimitExceeded::Cycle {
                symbol: name.to_string(),
                position,
            });
        }
        if depth >= self.limit {
            self.trace.report(Diagnostic::RecursionLimit {
                symbol: name.to_string(),
                position,
                limit: self.limit,
            });
            return Err(LimitExceeded::Depth {
                symbol: name.to_string(),
                limit: self.limit,
            });
        }

        self.active.insert((name, position));
        let matched = self.match_alternatives(alternatives, position, depth);
        self.active.remove(&(name, position));

        match matched? {
            Some((children, end)) => Ok(Some((Tree::from_children(name.to_string(), children), end))),
            None => {
                self.trace.report(Diagnostic::NoMatch {
                    symbol: name.to_string(),
                    position,
                });
                Ok(None)
            }
        }
    }

    /// The first alternative, in rule order, that matches at `position`.
    fn match_alternatives(
        &mut self,
        alternatives: &'g [Production],
        position: usize,
        depth: usize,
    ) -> Result<Option<(Vec<Tree<String>>, usize)>, LimitExceeded> {
        for production in alternatives {
            if let Some(matched) = self.match_alternative(production, position, depth)? {
                return Ok(Some(matched));
            }
        }
        Ok(None)
    }

    /// Tries one alternative. Children are collected into a list of their own,
    /// so a failed trial leaves nothing behind.
    fn match_alternative(
        &mut self,
        production: &Production,
        position: usize,
        depth: usize,
    ) -> Result<Option<(Vec<Tree<String>>, usize)>, LimitExceeded> {
        let mut children = Vec::with_capacity(production.len());
        let mut cursor = position;

        for symbol in production.symbols() {
            let token = match self.tokens.get(cursor) {
                Some(token) => *token,
                None => {
                    self.trace.expect(symbol, cursor);
                    return Ok(None);
                }
            };

            if self.lexicon.tag(token) == Some(symbol) {
                children.push(Tree::from_terminal(symbol.to_string(), token.to_string()));
                cursor += 1;
            } else if self.grammar.contains(symbol) {
                match self.match_symbol(symbol, cursor, depth + 1)? {
                    Some((subtree, end)) => {
                        children.push(subtree);
                        cursor = end;
                    }
                    // The failed call has already recorded what it expected.
                    None => return Ok(None),
                }
            } else {
                if !self.lexicon.is_tag(symbol) {
                    self.trace.report_unknown(symbol, cursor);
                }
                self.trace.expect(symbol, cursor);
                return Ok(None);
            }
        }

        Ok(Some((children, cursor)))
    }
}
