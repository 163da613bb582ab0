use std::borrow::Cow;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use descentparse::{Grammar, Lexicon, RecursiveDescentParser};

static RULES: &str = include_str!("../../data/rules.txt");
static LEXICON: &str = include_str!("../../data/lexicon.txt");

/// Where the grammar comes from and how it is applied.
#[derive(Args, Debug, Clone)]
pub struct GrammarOpts {
    /// Rule file, one `LHS -> A B | C` rule per line. Defaults to the bundled grammar.
    #[clap(short, long, parse(from_os_str), global = true)]
    pub rules: Option<PathBuf>,
    /// Lexicon file, one `TAG -> word | word` entry per line. Defaults to the bundled lexicon.
    #[clap(short, long, parse(from_os_str), global = true)]
    pub lexicon: Option<PathBuf>,
    /// Symbol every sentence must be derived from.
    #[clap(short, long, default_value = "S", global = true)]
    pub start: String,
    /// Hard cap on the recursion depth of a single parse (default 512).
    #[clap(long, global = true)]
    pub max_depth: Option<usize>,
}

pub struct Loaded {
    pub grammar: Grammar,
    pub lexicon: Lexicon,
}

fn read_source<'a>(path: Option<&Path>, bundled: &'a str) -> anyhow::Result<Cow<'a, str>> {
    match path {
        None => Ok(Cow::Borrowed(bundled)),
        Some(path) => std::fs::read_to_string(path)
            .map(Cow::Owned)
            .with_context(|| format!("could not read {}", path.display())),
    }
}

impl GrammarOpts {
    pub fn load(&self) -> anyhow::Result<Loaded> {
        let rules = read_source(self.rules.as_deref(), RULES)?;
        let grammar: Grammar = rules.parse().with_context(|| match &self.rules {
            Some(path) => format!("invalid rules in {}", path.display()),
            None => "invalid bundled rules".to_string(),
        })?;

        let words = read_source(self.lexicon.as_deref(), LEXICON)?;
        let lexicon: Lexicon = words.parse().with_context(|| match &self.lexicon {
            Some(path) => format!("invalid lexicon in {}", path.display()),
            None => "invalid bundled lexicon".to_string(),
        })?;

        Ok(Loaded { grammar, lexicon })
    }
}

impl Loaded {
    /// Builds the parser, failing if the start symbol has no rule.
    pub fn parser(&self, opts: &GrammarOpts) -> anyhow::Result<RecursiveDescentParser<'_>> {
        let parser =
            RecursiveDescentParser::from_grammar_with_start(&self.grammar, &self.lexicon, &opts.start)
                .context("grammar cannot be used for parsing")?;
        Ok(match opts.max_depth {
            Some(limit) => parser.with_depth_limit(limit),
            None => parser,
        })
    }

    /// Symbols rules refer to that nothing defines.
    pub fn warnings(&self) -> Vec<String> {
        self.grammar
            .undefined_symbols(&self.lexicon)
            .into_iter()
            .map(|symbol| format!("symbol `{}` has no rule and tags no word", symbol))
            .collect()
    }
}
