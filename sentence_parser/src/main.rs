use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use rayon::prelude::*;

use descentparse::{tokenize, RecursiveDescentParser, Trace};

mod config;
mod report;
mod visualization;

use config::GrammarOpts;
use report::{verdict, Format, Summary};
use visualization::tree::{render_tree, tag_color};

fn parse_sentences(
    parser: &RecursiveDescentParser,
    sentences: &[String],
    format: Format,
    verbose: bool,
) -> anyhow::Result<Summary> {
    let mut summary = Summary::default();
    for sentence in sentences {
        let mut trace = Trace::new();
        let outcome = parser.parse_sentence(sentence, &mut trace);
        println!("{}", verdict(sentence, &outcome, &trace, format, verbose)?);
        summary.record(&outcome);
    }
    Ok(summary)
}

fn read_testcases<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("could not read {}", path.as_ref().display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

fn specify_testcases<P: AsRef<Path>>(
    parser: &RecursiveDescentParser,
    path: P,
    format: Format,
    verbose: bool,
) -> anyhow::Result<()> {
    let sentences = read_testcases(path)?;

    let start = std::time::Instant::now();
    let outcomes: Vec<_> = sentences
        .par_iter()
        .map(|sentence| {
            let mut trace = Trace::new();
            let outcome = parser.parse_sentence(sentence, &mut trace);
            (outcome, trace)
        })
        .collect();
    let end = std::time::Instant::now();

    let mut summary = Summary::default();
    for (sentence, (outcome, trace)) in sentences.iter().zip(outcomes.iter()) {
        println!("{}", verdict(sentence, outcome, trace, format, verbose)?);
        summary.record(outcome);
    }
    println!("{}", "=".repeat(80));
    println!("{}", summary);
    println!("      Time elapsed: {}", (end - start).as_secs_f32());
    Ok(())
}

fn render_sentence(
    parser: &RecursiveDescentParser,
    sentence: &str,
    path: &Path,
    open_browser: bool,
) -> anyhow::Result<()> {
    let derivation = match parser.parse(&tokenize(sentence)) {
        Ok(derivation) => derivation,
        Err(rejection) => bail!("Rejected: {}: {}", sentence, rejection),
    };
    render_tree(&derivation.tree, path)
        .with_context(|| format!("could not render {} with graphviz", path.display()))?;
    println!("Wrote parse tree to {}", path.display());
    if open_browser {
        webbrowser::open(&path.to_string_lossy())
            .with_context(|| format!("could not open {}", path.display()))?;
    }
    Ok(())
}

fn print_grammar(parser: &RecursiveDescentParser) {
    println!("Start: {}", parser.start());
    println!("Non-terminals: {}", parser.grammar().nonterminals().join(" "));
    println!("Rules:");
    for production in parser.grammar().productions() {
        println!("  {}", production);
    }
    println!("Lexicon:");
    for (tag, words) in parser.lexicon().by_tag() {
        println!("  {} -> {}", tag, words.iter().join(" | "));
    }
}

fn repl(parser: &RecursiveDescentParser, format: Format, verbose: bool) -> anyhow::Result<()> {
    use pastel::Color;
    let brush = pastel::ansi::Brush::from_environment(pastel::ansi::Stream::Stdout);
    let highlight = Color::from_rgb(0x24, 0xe3, 0xdd);

    println!("Running sentence_parser REPL. Type \"exit\" or \"quit\" to terminate the REPL.");
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!(">>> ");
        std::io::stdout().flush()?;
        let sent = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let sent = sent.trim();
        if ["exit", "quit"].contains(&sent) {
            break;
        }
        if sent.is_empty() {
            continue;
        }

        let tokens = tokenize(sent);
        println!(
            "Tokens: {}",
            tokens
                .iter()
                .map(|token| match parser.lexicon().tag(token) {
                    Some(tag) => {
                        let mut color =
                            pastel::parser::parse_color(tag_color(tag)).unwrap_or_else(Color::black);
                        if color == Color::black() {
                            color = highlight.clone();
                        }
                        brush.paint(token, color)
                    }
                    None => brush.paint(token, Color::white()),
                })
                .join(" ")
        );
        let unknown = parser.lexicon().uncovered(&tokens);
        if !unknown.is_empty() {
            println!(
                "{}",
                brush.paint(
                    format!(
                        "Unknown words: {}",
                        unknown
                            .iter()
                            .map(|(i, word)| format!("{} (index: {})", word, i))
                            .join(", ")
                    ),
                    Color::red()
                )
            );
        }

        let mut trace = Trace::new();
        let outcome = parser.parse_traced(&tokens, &mut trace);
        println!("{}", verdict(sent, &outcome, &trace, format, verbose)?);
    }
    Ok(())
}

#[derive(Parser)]
#[clap(version, about = "Parses sentences against a context-free grammar and lexicon.")]
struct Opts {
    #[clap(flatten)]
    grammar: GrammarOpts,
    /// Print every diagnostic recorded while matching, including failed alternatives.
    #[clap(short, long, global = true)]
    verbose: bool,
    #[clap(subcommand)]
    command: SubCommand,
}

#[derive(Subcommand)]
enum SubCommand {
    /// Parses each sentence, and prints the verdict and parse tree to the terminal.
    Parse {
        #[clap(required = true)]
        sentences: Vec<String>,
        /// How accepted trees are printed.
        #[clap(short, long, arg_enum, default_value = "bracket")]
        format: Format,
    },
    /// Parses the newline separated sentences in the provided file, and prints the results to the terminal.
    Testcases {
        #[clap(short, long, parse(from_os_str), default_value = "data/sentences.txt")]
        path: PathBuf,
        /// How accepted trees are printed.
        #[clap(short, long, arg_enum, default_value = "bracket")]
        format: Format,
    },
    /// Renders the parse tree of a sentence with graphviz.
    Render {
        /// Sentence to parse.
        sentence: String,
        /// Path to write output to. The extension selects the graphviz output format.
        #[clap(short, long, parse(from_os_str), default_value = "images/parse_tree.pdf")]
        path: PathBuf,
        /// Open file in browser
        #[clap(short, long)]
        open_browser: bool,
    },
    /// Prints the loaded rules and lexicon.
    Grammar,
    /// Provides a REPL for parsing sentences repeatedly.
    Repl {
        #[clap(short, long, arg_enum, default_value = "pretty")]
        format: Format,
    },
}

fn main() -> anyhow::Result<()> {
    let opts: Opts = Opts::parse();

    let loaded = opts.grammar.load()?;
    for warning in loaded.warnings() {
        eprintln!("warning: {}", warning);
    }
    let parser = loaded.parser(&opts.grammar)?;

    match opts.command {
        SubCommand::Parse { sentences, format } => {
            let summary = parse_sentences(&parser, &sentences, format, opts.verbose)?;
            if summary.rejected != 0 {
                std::process::exit(1);
            }
        }
        SubCommand::Testcases { path, format } => {
            specify_testcases(&parser, path, format, opts.verbose)?;
        }
        SubCommand::Render {
            sentence,
            path,
            open_browser,
        } => render_sentence(&parser, &sentence, &path, open_browser)?,
        SubCommand::Grammar => print_grammar(&parser),
        SubCommand::Repl { format } => repl(&parser, format, opts.verbose)?,
    }
    Ok(())
}
