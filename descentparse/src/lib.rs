pub mod error;
pub mod grammar;
pub mod lexicon;
mod matcher;
pub mod production;
pub mod trace;
pub mod tree;

pub use crate::error::{GrammarError, RejectReason, Rejection};
pub use crate::grammar::Grammar;
pub use crate::lexicon::{tokenize, Lexicon};
use crate::matcher::{LimitExceeded, Matcher};
pub use crate::production::Production;
pub use crate::trace::{Diagnostic, Frontier, Trace};
pub use crate::tree::Tree;

pub const DEFAULT_START: &str = "S";

/// Deepest call path a parse may build unless another cap is set. Loops are
/// caught before this; it bounds the stack on long right-recursive inputs.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// An accepted sentence: its parse tree and how many tokens it covers, which
/// is always the full sentence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Derivation {
    pub tree: Tree<String>,
    pub consumed: usize,
}

/// Greedy recursive-descent parser. Alternatives are tried in rule order and
/// the first one that matches is kept; there is no search for other splits.
#[derive(Clone, Debug)]
pub struct RecursiveDescentParser<'a> {
    grammar: &'a Grammar,
    lexicon: &'a Lexicon,
    start: String,
    depth_limit: Option<usize>,
}

impl<'a> RecursiveDescentParser<'a> {
    pub fn from_grammar(grammar: &'a Grammar, lexicon: &'a Lexicon) -> Result<Self, GrammarError> {
        RecursiveDescentParser::from_grammar_with_start(grammar, lexicon, DEFAULT_START)
    }

    pub fn from_grammar_with_start(
        grammar: &'a Grammar,
        lexicon: &'a Lexicon,
        start: impl Into<String>,
    ) -> Result<Self, GrammarError> {
        let start = start.into();
        grammar.check_start(&start)?;
        Ok(Self {
            grammar,
            lexicon,
            start,
            depth_limit: None,
        })
    }

    /// Replaces [`DEFAULT_MAX_DEPTH`] as the deepest call path allowed.
    pub fn with_depth_limit(mut self, limit: usize) -> Self {
        self.depth_limit = Some(limit);
        self
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn grammar(&self) -> &'a Grammar {
        self.grammar
    }

    pub fn lexicon(&self) -> &'a Lexicon {
        self.lexicon
    }

    pub fn depth_limit(&self) -> usize {
        self.depth_limit.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    pub fn parse<T: AsRef<str>>(&self, tokens: &[T]) -> Result<Derivation, Rejection> {
        self.parse_traced(tokens, &mut Trace::new())
    }

    /// Tokenizes `sentence` before parsing it.
    pub fn parse_sentence(&self, sentence: &str, trace: &mut Trace) -> Result<Derivation, Rejection> {
        self.parse_traced(&tokenize(sentence), trace)
    }

    pub fn parse_traced<T: AsRef<str>>(
        &self,
        tokens: &[T],
        trace: &mut Trace,
    ) -> Result<Derivation, Rejection> {
        self.parse_from(tokens, &self.start, trace)
    }

    /// Parses `tokens` as a whole `symbol`, which need not be the start symbol.
    pub fn parse_from<T: AsRef<str>>(
        &self,
        tokens: &[T],
        symbol: &str,
        trace: &mut Trace,
    ) -> Result<Derivation, Rejection> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        let token_count = tokens.len();
        let limit = self.depth_limit();

        let matched =
            Matcher::new(self.grammar, self.lexicon, &tokens, limit, trace).match_symbol(symbol, 0, 0);

        let frontier = trace.frontier();
        let reject = |reason: RejectReason, consumed: usize| {
            let position = frontier.position.max(consumed);
            let expected = if frontier.position == position {
                frontier.expected.iter().cloned().collect()
            } else {
                Vec::new()
            };
            Rejection {
                reason,
                position,
                expected,
                consumed,
                token_count,
            }
        };

        match matched {
            Ok(Some((tree, end))) if end == token_count => Ok(Derivation {
                tree,
                consumed: end,
            }),
            Ok(Some((_, end))) => Err(reject(RejectReason::Incomplete, end)),
            Ok(None) if !self.grammar.contains(symbol) => {
                Err(reject(RejectReason::UnknownSymbol(symbol.to_string()), 0))
            }
            Ok(None) => Err(reject(RejectReason::NoMatch(symbol.to_string()), 0)),
            Err(LimitExceeded::Cycle { symbol, position }) => {
                Err(reject(RejectReason::Cycle { symbol, position }, 0))
            }
            Err(LimitExceeded::Depth { symbol, limit }) => {
                Err(reject(RejectReason::RecursionLimit { symbol, limit }, 0))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const RULES: &str = "S -> NP VP\nNP -> det n\nVP -> v NP\n";
    const LEXICON: &str = "det -> the | a\nn -> people | dog\nv -> like | dislike\n";

    fn load() -> (Grammar, Lexicon) {
        (RULES.parse().unwrap(), LEXICON.parse().unwrap())
    }

    #[test]
    fn test_accepts() {
        let (grammar, lexicon) = load();
        let parser = RecursiveDescentParser::from_grammar(&grammar, &lexicon).unwrap();
        let derivation = parser.parse(&tokenize("The people like the dog")).unwrap();
        assert_eq!(derivation.consumed, 5);
        assert_eq!(
            derivation.tree.to_string(),
            "(S (NP (det the) (n people)) (VP (v like) (NP (det the) (n dog))))"
        );
    }

    #[test]
    fn test_rejects_short_sentence() {
        let (grammar, lexicon) = load();
        let parser = RecursiveDescentParser::from_grammar(&grammar, &lexicon).unwrap();
        let rejection = parser.parse(&["the", "people", "like"]).unwrap_err();
        assert_eq!(rejection.reason, RejectReason::NoMatch("S".to_string()));
        assert_eq!(rejection.position, 3);
        assert_eq!(rejection.expected, vec!["NP".to_string()]);
        assert_eq!(rejection.consumed, 0);
        assert_eq!(rejection.token_count, 3);
    }

    #[test]
    fn test_rejects_leftover_tokens() {
        let (grammar, lexicon) = load();
        let parser = RecursiveDescentParser::from_grammar(&grammar, &lexicon).unwrap();
        let rejection = parser
            .parse(&tokenize("the people like the dog the"))
            .unwrap_err();
        assert!(rejection.is_incomplete());
        assert_eq!(rejection.consumed, 5);
        assert_eq!(rejection.position, 5);
        assert_eq!(rejection.token_count, 6);
        assert_eq!(
            rejection.to_string(),
            "tokens left after a complete match (index: 5, token length: 6)"
        );
    }

    #[test]
    fn test_rejects_unknown_word() {
        let (grammar, lexicon) = load();
        let parser = RecursiveDescentParser::from_grammar(&grammar, &lexicon).unwrap();
        let mut trace = Trace::new();
        let rejection = parser
            .parse_sentence("the cat like the dog", &mut trace)
            .unwrap_err();
        assert_eq!(rejection.position, 1);
        assert_eq!(rejection.expected, vec!["n".to_string()]);
        assert_eq!(
            trace.diagnostics(),
            &[
                Diagnostic::NoMatch {
                    symbol: "NP".to_string(),
                    position: 0
                },
                Diagnostic::NoMatch {
                    symbol: "S".to_string(),
                    position: 0
                },
            ]
        );
    }

    #[test]
    fn test_empty_sentence() {
        let (grammar, lexicon) = load();
        let parser = RecursiveDescentParser::from_grammar(&grammar, &lexicon).unwrap();
        let rejection = parser.parse::<&str>(&[]).unwrap_err();
        assert_eq!(rejection.reason, RejectReason::NoMatch("S".to_string()));
        assert_eq!(rejection.position, 0);
        assert_eq!(rejection.token_count, 0);
    }

    #[test]
    fn test_parse_from_other_symbol() {
        let (grammar, lexicon) = load();
        let parser = RecursiveDescentParser::from_grammar(&grammar, &lexicon).unwrap();
        let mut trace = Trace::new();
        let derivation = parser
            .parse_from(&["a", "dog"], "NP", &mut trace)
            .unwrap();
        assert_eq!(derivation.tree.to_string(), "(NP (det a) (n dog))");

        let rejection = parser
            .parse_from(&["a", "dog"], "PP", &mut trace)
            .unwrap_err();
        assert_eq!(rejection.reason, RejectReason::UnknownSymbol("PP".to_string()));
    }

    #[test]
    fn test_missing_start() {
        let (grammar, lexicon) = load();
        assert_eq!(
            RecursiveDescentParser::from_grammar_with_start(&grammar, &lexicon, "ROOT").unwrap_err(),
            GrammarError::MissingStart("ROOT".to_string())
        );
    }

    #[test]
    fn test_left_recursion_rejected() {
        let grammar: Grammar = "S -> NP\nNP -> NP n | n".parse().unwrap();
        let lexicon: Lexicon = "n -> dog".parse().unwrap();
        let parser = RecursiveDescentParser::from_grammar(&grammar, &lexicon).unwrap();
        let rejection = parser.parse(&["dog", "dog"]).unwrap_err();
        assert_eq!(
            rejection.reason,
            RejectReason::Cycle {
                symbol: "NP".to_string(),
                position: 0
            }
        );
        assert_eq!(rejection.consumed, 0);
    }

    #[test]
    fn test_left_recursion_long_sentence() {
        let grammar: Grammar = "S -> NP v\nNP -> NP adj | det n\nVP -> v NP\nPP -> p NP\n\
                                 AP -> adj | adj AP\nX -> S\nY -> X"
            .parse()
            .unwrap();
        let lexicon: Lexicon = "det -> the\nn -> dog\nadj -> old\nv -> barks".parse().unwrap();
        let parser = RecursiveDescentParser::from_grammar(&grammar, &lexicon).unwrap();

        let mut tokens = vec!["the", "dog"];
        tokens.extend(std::iter::repeat("old").take(400));
        tokens.push("barks");
        let rejection = parser.parse(&tokens).unwrap_err();
        assert_eq!(
            rejection.reason,
            RejectReason::Cycle {
                symbol: "NP".to_string(),
                position: 0
            }
        );
        assert_eq!(rejection.token_count, 403);
    }

    #[test]
    fn test_depth_limit_on_long_right_recursion() {
        let grammar: Grammar = "S -> ADJS n\nADJS -> adj ADJS | adj".parse().unwrap();
        let lexicon: Lexicon = "adj -> big\nn -> dog".parse().unwrap();
        let parser = RecursiveDescentParser::from_grammar(&grammar, &lexicon).unwrap();
        assert_eq!(parser.depth_limit(), DEFAULT_MAX_DEPTH);

        let mut tokens = vec!["big"; 2000];
        tokens.push("dog");
        let rejection = parser.parse(&tokens).unwrap_err();
        assert_eq!(
            rejection.reason,
            RejectReason::RecursionLimit {
                symbol: "ADJS".to_string(),
                limit: DEFAULT_MAX_DEPTH
            }
        );

        let mut short = vec!["big"; 100];
        short.push("dog");
        assert_eq!(parser.parse(&short).unwrap().consumed, 101);

        let capped = parser.clone().with_depth_limit(3);
        assert_eq!(capped.depth_limit(), 3);
        assert!(matches!(
            capped.parse(&short).unwrap_err().reason,
            RejectReason::RecursionLimit { limit: 3, .. }
        ));
    }

    #[test]
    fn test_greedy_first_match() {
        // The first NP alternative swallows "dog" and leaves VP nothing to
        // match; no other split is searched.
        let grammar: Grammar = "S -> NP VP\nNP -> n n | n\nVP -> n".parse().unwrap();
        let lexicon: Lexicon = "n -> dog | cat".parse().unwrap();
        let parser = RecursiveDescentParser::from_grammar(&grammar, &lexicon).unwrap();
        assert!(parser.parse(&["dog", "cat"]).is_err());
        let derivation = parser.parse(&["dog", "cat", "dog"]).unwrap();
        assert_eq!(
            derivation.tree.to_string(),
            "(S (NP (n dog) (n cat)) (VP (n dog)))"
        );
    }
}
