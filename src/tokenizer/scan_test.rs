//! Tests for scanning: longest match, tie-breaks, skip tokens, states, and nested input.
use super::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Sym {
    End,
    S1,
    S2,
    Keyword,
    Ident,
    Quote,
    Text,
}

fn text(s: &str) -> String {
    s.to_owned()
}

/// Pull the next token match, failing on anything else.
fn expect_token(tokenizer: &mut Tokenizer<Sym, String>) -> TokenMatch<Sym, String> {
    match tokenizer.next_token() {
        Ok(Scan::Token(m)) => m,
        v => panic!("expected token, got: {v:?}"),
    }
}

fn expect_end(tokenizer: &mut Tokenizer<Sym, String>) {
    match tokenizer.next_token() {
        Ok(Scan::EndOfInput(m)) => {
            assert_eq!(m.symbol, Sym::End);
            assert_eq!(m.match_length, 0);
            assert_eq!(m.token, None);
        }
        v => panic!("expected end of input, got: {v:?}"),
    }
}

#[test]
fn longest_match_then_failure() -> Result<()> {
    let mut builder = TokenizerBuilder::new(Sym::End);
    builder
        .add_token("ab", Some(Sym::S1), [DEFAULT_STATE])?
        .action(text);
    builder
        .add_token("abc", Some(Sym::S2), [DEFAULT_STATE])?
        .action(text);
    let mut tokenizer = builder.finalize()?;
    tokenizer.push_str("abcabd");

    let first = expect_token(&mut tokenizer);
    assert_eq!(
        (first.symbol, first.value.as_str(), first.match_length),
        (Sym::S2, "abc", 3)
    );
    let second = expect_token(&mut tokenizer);
    assert_eq!(
        (second.symbol, second.value.as_str(), second.match_length),
        (Sym::S1, "ab", 2)
    );

    match tokenizer.next_token() {
        Err(Error::NoMatch {
            offset,
            column,
            snippet,
            ..
        }) => {
            assert_eq!(offset, 5);
            assert_eq!(column, 6);
            assert_eq!(snippet, "d");
        }
        v => panic!("expected lexical failure, got: {v:?}"),
    }
    // Failure does not consume input, and is not exhaustion.
    let stream = tokenizer.input().unwrap();
    assert_eq!(stream.remaining(), "d");
    assert!(!stream.is_exhausted());
    Ok(())
}

#[test]
fn earliest_registration_wins_ties() -> Result<()> {
    // Same token set, registered in both orders.
    for keyword_first in [true, false] {
        let mut builder: TokenizerBuilder<Sym, String> = TokenizerBuilder::new(Sym::End);
        let (keyword, ident) = if keyword_first {
            let k = builder.add_token("let", Some(Sym::Keyword), [DEFAULT_STATE])?.id();
            let i = builder.add_token("[a-z]+", Some(Sym::Ident), [DEFAULT_STATE])?.id();
            (k, i)
        } else {
            let i = builder.add_token("[a-z]+", Some(Sym::Ident), [DEFAULT_STATE])?.id();
            let k = builder.add_token("let", Some(Sym::Keyword), [DEFAULT_STATE])?.id();
            (k, i)
        };
        builder.add_token(" +", None, [DEFAULT_STATE])?;
        let mut tokenizer = builder.finalize()?;
        tokenizer.push_str("let letter");

        let first = expect_token(&mut tokenizer);
        if keyword_first {
            assert_eq!(first.symbol, Sym::Keyword);
            assert_eq!(first.token, Some(keyword));
        } else {
            assert_eq!(first.symbol, Sym::Ident);
            assert_eq!(first.token, Some(ident));
        }
        // Longer match beats the keyword regardless of order.
        let second = expect_token(&mut tokenizer);
        assert_eq!(second.symbol, Sym::Ident);
        assert_eq!(second.match_length, 6);
    }
    Ok(())
}

#[test]
fn skip_tokens_are_consumed_silently() -> Result<()> {
    let mut builder = TokenizerBuilder::new(Sym::End);
    builder.add_token("[ \t\n]+", None, [DEFAULT_STATE])?;
    builder.add_token(";[^\n]*", None, [DEFAULT_STATE])?;
    builder
        .add_token("[a-z]+", Some(Sym::Ident), [DEFAULT_STATE])?
        .action(text);
    let mut tokenizer = builder.finalize()?;
    tokenizer.push_str("  alpha ; comment\n\tbeta  ");

    let alpha = expect_token(&mut tokenizer);
    assert_eq!(alpha.value, "alpha");
    assert_eq!((alpha.location.line, alpha.location.column), (1, 3));
    let beta = expect_token(&mut tokenizer);
    assert_eq!(beta.value, "beta");
    assert_eq!((beta.location.line, beta.location.column), (2, 2));
    assert_eq!(beta.location.offset, 19);
    // Trailing whitespace is skipped straight into end of input.
    expect_end(&mut tokenizer);
    Ok(())
}

#[test]
fn transition_applies_to_next_match() -> Result<()> {
    let mut builder = TokenizerBuilder::new(Sym::End);
    builder
        .add_token("\"", Some(Sym::Quote), [DEFAULT_STATE])?
        .transition_to("string");
    builder
        .add_token("[a-z]+", Some(Sym::Ident), [DEFAULT_STATE])?
        .action(text);
    builder
        .add_token("\"", Some(Sym::Quote), ["string"])?
        .transition_to(DEFAULT_STATE);
    builder
        .add_token("[^\"]+", Some(Sym::Text), ["string"])?
        .action(text);
    let mut tokenizer = builder.finalize()?;
    tokenizer.push_str("say\"hi there\"done");

    assert_eq!(expect_token(&mut tokenizer).symbol, Sym::Ident);
    assert_eq!(tokenizer.current_state(), DEFAULT_STATE);
    assert_eq!(expect_token(&mut tokenizer).symbol, Sym::Quote);
    assert_eq!(tokenizer.current_state(), "string");
    // In the string state, the space is text rather than a failure.
    let inner = expect_token(&mut tokenizer);
    assert_eq!((inner.symbol, inner.value.as_str()), (Sym::Text, "hi there"));
    assert_eq!(expect_token(&mut tokenizer).symbol, Sym::Quote);
    assert_eq!(tokenizer.current_state(), DEFAULT_STATE);
    let last = expect_token(&mut tokenizer);
    assert_eq!((last.symbol, last.value.as_str()), (Sym::Ident, "done"));
    expect_end(&mut tokenizer);
    Ok(())
}

#[test]
fn state_is_kept_across_failure() -> Result<()> {
    let mut builder: TokenizerBuilder<Sym, String> = TokenizerBuilder::new(Sym::End);
    builder
        .add_token("<", None, [DEFAULT_STATE])?
        .transition_to("tag");
    builder.add_token("[a-z]+", Some(Sym::Ident), ["tag"])?;
    let mut tokenizer = builder.finalize()?;
    tokenizer.push_str("<1");

    match tokenizer.next_token() {
        Err(Error::NoMatch { state, .. }) => assert_eq!(state, "tag"),
        v => panic!("expected lexical failure, got: {v:?}"),
    }
    assert_eq!(tokenizer.current_state(), "tag");
    Ok(())
}

#[test]
fn exhaustion_then_resumption() -> Result<()> {
    let mut builder = TokenizerBuilder::new(Sym::End);
    builder
        .add_token("[a-z]+", Some(Sym::Ident), [DEFAULT_STATE])?
        .action(text);
    builder.add_token(" ", None, [DEFAULT_STATE])?;
    let mut tokenizer = builder.finalize()?;

    tokenizer.push_input_named("outer", "one two".as_bytes())?;
    assert_eq!(expect_token(&mut tokenizer).value, "one");

    tokenizer.push_input_named("inner", "nested".as_bytes())?;
    assert_eq!(tokenizer.input_depth(), 2);
    assert_eq!(expect_token(&mut tokenizer).value, "nested");
    // End of input repeats until the driver pops.
    expect_end(&mut tokenizer);
    expect_end(&mut tokenizer);
    let inner = tokenizer.pop_input().unwrap();
    assert_eq!(inner.name(), "inner");

    // The outer stream resumes after "one", not from its start.
    let two = expect_token(&mut tokenizer);
    assert_eq!(two.value, "two");
    assert_eq!(two.location.offset, 4);
    expect_end(&mut tokenizer);

    tokenizer.pop_input();
    assert_eq!(tokenizer.next_token()?, Scan::NoInput);
    assert!(tokenizer.pop_input().is_none());
    Ok(())
}

#[test]
fn no_input_before_push() -> Result<()> {
    let builder: TokenizerBuilder<Sym, String> = TokenizerBuilder::new(Sym::End);
    let mut tokenizer = builder.finalize()?;
    assert_eq!(tokenizer.next_token()?, Scan::NoInput);
    Ok(())
}

#[test]
fn empty_stream_is_end_of_input() -> Result<()> {
    let mut builder = TokenizerBuilder::new(Sym::End);
    builder.add_token("x", Some(Sym::S1), [DEFAULT_STATE])?;
    let mut tokenizer = builder.finalize()?;
    tokenizer.push_input(std::io::empty())?;
    expect_end(&mut tokenizer);
    Ok(())
}

#[test]
fn zero_length_match_is_failure() -> Result<()> {
    let mut builder = TokenizerBuilder::new(Sym::End);
    builder.add_token("a*", Some(Sym::S1), [DEFAULT_STATE])?;
    let mut tokenizer = builder.finalize()?;
    tokenizer.push_str("aab");

    let m = expect_token(&mut tokenizer);
    assert_eq!(m.match_length, 2);
    // "a*" matches the empty string before "b", which would loop forever.
    let err = tokenizer.next_token().unwrap_err();
    assert!(err.is_no_match(), "unexpected error: {err}");
    Ok(())
}

#[test]
fn finalize_twice_behaves_the_same() -> Result<()> {
    let mut builder = TokenizerBuilder::new(Sym::End);
    builder
        .add_token("ab", Some(Sym::S1), [DEFAULT_STATE])?
        .action(text);
    builder
        .add_token("abc", Some(Sym::S2), [DEFAULT_STATE])?
        .action(text);

    let run = |mut tokenizer: Tokenizer<Sym, String>| -> Vec<(Sym, String)> {
        tokenizer.push_str("abcababc");
        tokenizer
            .tokens_iter()
            .map(|m| m.map(|m| (m.symbol, m.value)))
            .collect::<Result<Vec<_>>>()
            .unwrap()
    };
    let once = run(builder.finalize()?);
    let twice = run(builder.finalize()?);
    assert_eq!(once, twice);
    assert_eq!(
        once,
        vec![
            (Sym::S2, text("abc")),
            (Sym::S1, text("ab")),
            (Sym::S2, text("abc")),
        ]
    );
    Ok(())
}

#[test]
fn iterator_stops_after_failure() -> Result<()> {
    let mut builder = TokenizerBuilder::new(Sym::End);
    builder.add_token("a", Some(Sym::S1), [DEFAULT_STATE])?;
    let mut tokenizer: Tokenizer<Sym, String> = builder.finalize()?;
    tokenizer.push_str("aa?a");

    let results: Vec<_> = tokenizer.tokens_iter().collect();
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(matches!(results[2], Err(Error::NoMatch { .. })));
    Ok(())
}

#[test]
fn case_insensitive_config() -> Result<()> {
    let config = Config {
        case_insensitive: true,
        ..Default::default()
    };
    let mut builder = TokenizerBuilder::with_config(Sym::End, config);
    builder
        .add_token("select", Some(Sym::Keyword), [DEFAULT_STATE])?
        .action(text);
    let mut tokenizer = builder.finalize()?;
    tokenizer.push_str("SeLeCt");
    let m = expect_token(&mut tokenizer);
    assert_eq!((m.symbol, m.value.as_str()), (Sym::Keyword, "SeLeCt"));
    Ok(())
}

#[test]
fn default_value_without_action() -> Result<()> {
    let mut builder = TokenizerBuilder::new(Sym::End);
    builder.add_token("x", Some(Sym::S1), [DEFAULT_STATE])?;
    let mut tokenizer: Tokenizer<Sym, String> = builder.finalize()?;
    tokenizer.push_str("x");
    let m = expect_token(&mut tokenizer);
    assert_eq!(m.value, "");
    assert_eq!(m.match_length, 1);
    Ok(())
}

struct BrokenSource;

impl Read for BrokenSource {
    fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "source went away"))
    }
}

#[test]
fn failed_push_leaves_stack_alone() -> Result<()> {
    let mut builder = TokenizerBuilder::new(Sym::End);
    builder
        .add_token("[a-z]+", Some(Sym::Ident), [DEFAULT_STATE])?
        .action(text);
    let mut tokenizer = builder.finalize()?;
    tokenizer.push_str("outer");

    match tokenizer.push_input_named("broken", BrokenSource) {
        Err(Error::Io(_)) => (),
        v => panic!("expected read error, got: {v:?}"),
    }
    assert_eq!(tokenizer.input_depth(), 1);
    assert_eq!(expect_token(&mut tokenizer).value, "outer");
    Ok(())
}

#[test]
fn shared_token_matches_in_each_state() -> Result<()> {
    let mut builder = TokenizerBuilder::new(Sym::End);
    let shared = builder
        .add_token("x", Some(Sym::S1), [DEFAULT_STATE, "b"])?
        .action(text)
        .id();
    builder
        .add_token("<", None, [DEFAULT_STATE])?
        .transition_to("b");
    builder
        .add_token("a|ab", Some(Sym::S2), ["b"])?
        .action(text);
    let mut tokenizer = builder.finalize()?;
    tokenizer.push_str("x<xab");

    let first = expect_token(&mut tokenizer);
    assert_eq!(first.token, Some(shared));
    assert_eq!(tokenizer.current_state(), DEFAULT_STATE);

    let second = expect_token(&mut tokenizer);
    assert_eq!(second.token, Some(shared));
    assert_eq!(tokenizer.current_state(), "b");

    // Leftmost-first alternation: "a|ab" matches one byte.
    let third = expect_token(&mut tokenizer);
    assert_eq!((third.symbol, third.value.as_str()), (Sym::S2, "a"));
    assert!(tokenizer.next_token().unwrap_err().is_no_match());
    Ok(())
}
