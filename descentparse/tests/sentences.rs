use descentparse::{
    tokenize, Diagnostic, Grammar, Lexicon, RecursiveDescentParser, RejectReason, Trace,
};
use rstest::{fixture, rstest};

static RULES: &str = include_str!("../../data/rules.txt");
static LEXICON: &str = include_str!("../../data/lexicon.txt");

struct Loaded {
    grammar: Grammar,
    lexicon: Lexicon,
}

#[fixture]
fn loaded() -> Loaded {
    Loaded {
        grammar: RULES.parse().unwrap(),
        lexicon: LEXICON.parse().unwrap(),
    }
}

#[rstest]
#[case(
    "The people dislike the white dog",
    "(S (NP_PL (det the) (n_pl people)) (VP_PL (v_pl dislike) (NP (NP_SG (det the) (adj white) (n_sg dog)))))"
)]
#[case(
    "A person likes the white dog",
    "(S (NP_SG (det a) (n_sg person)) (VP_SG (v_sg likes) (NP (NP_SG (det the) (adj white) (n_sg dog)))))"
)]
#[case(
    "A dog sees the old people",
    "(S (NP_SG (det a) (n_sg dog)) (VP_SG (v_sg sees) (NP (NP_PL (det the) (adj old) (n_pl people)))))"
)]
#[case(
    "the children SEE a small cat",
    "(S (NP_PL (det the) (n_pl children)) (VP_PL (v_pl see) (NP (NP_SG (det a) (adj small) (n_sg cat)))))"
)]
fn accepted(loaded: Loaded, #[case] sentence: &str, #[case] bracketed: &str) {
    let parser = RecursiveDescentParser::from_grammar(&loaded.grammar, &loaded.lexicon).unwrap();
    let tokens = tokenize(sentence);
    let derivation = parser.parse(&tokens).unwrap();
    assert_eq!(derivation.consumed, tokens.len());
    assert_eq!(derivation.tree.to_string(), bracketed);
}

#[rstest]
#[case("The person like the white dog", 2, &["v_sg"])]
#[case("The people like", 3, &["NP"])]
#[case("The unicorn likes the dog", 1, &["n_sg", "adj", "n_pl"])]
#[case("", 0, &["NP_SG", "NP_PL"])]
fn no_match(loaded: Loaded, #[case] sentence: &str, #[case] position: usize, #[case] expected: &[&str]) {
    let parser = RecursiveDescentParser::from_grammar(&loaded.grammar, &loaded.lexicon).unwrap();
    let mut trace = Trace::new();
    let rejection = parser.parse_sentence(sentence, &mut trace).unwrap_err();
    assert_eq!(rejection.reason, RejectReason::NoMatch("S".to_string()));
    assert_eq!(rejection.position, position);
    assert_eq!(rejection.expected, expected);
    assert_eq!(
        trace.diagnostics().last(),
        Some(&Diagnostic::NoMatch {
            symbol: "S".to_string(),
            position: 0
        })
    );
}

#[rstest]
fn leftover_tokens(loaded: Loaded) {
    let parser = RecursiveDescentParser::from_grammar(&loaded.grammar, &loaded.lexicon).unwrap();
    let rejection = parser
        .parse(&tokenize("The white dog likes the cats the"))
        .unwrap_err();
    assert_eq!(rejection.reason, RejectReason::Incomplete);
    assert_eq!(rejection.consumed, 6);
    assert_eq!(rejection.token_count, 7);
}

#[rstest]
fn batch_continues_after_failures(loaded: Loaded) {
    let parser = RecursiveDescentParser::from_grammar(&loaded.grammar, &loaded.lexicon).unwrap();
    let verdicts: Vec<bool> = [
        "The people like",
        "The people like the dog",
        "The unicorn likes the dog",
        "A person likes the white dog",
    ]
    .iter()
    .map(|sentence| parser.parse(&tokenize(sentence)).is_ok())
    .collect();
    assert_eq!(verdicts, vec![false, true, false, true]);
}

#[rstest]
fn bundled_grammar_is_closed(loaded: Loaded) {
    assert!(loaded.grammar.undefined_symbols(&loaded.lexicon).is_empty());
    assert_eq!(loaded.grammar.first_symbol(), Some("S"));
}
