//! A token set for Lisp s-expressions.
//!
//! This is a small, complete client of the tokenizer:
//! - Whitespace and comments are skip tokens.
//! - Numbers and symbols overlap; registration order makes `-6` an integer rather than a symbol,
//!   while longest-match makes `12abc` a symbol.
//! - Strings use their own lexical state, so a `;` or `(` inside a string is just text.
//!
//! A string that is still open at the end of input leaves the tokenizer in `STRING_STATE`;
//! callers reading interactively can use that to ask for more input.

use crate::error::Result;
use crate::state::DEFAULT_STATE;
use crate::token::TokenMatch;
use crate::tokenizer::{Tokenizer, TokenizerBuilder};

pub const STRING_STATE: &str = "string";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LispSymbol {
    LParen,
    RParen,
    Quote,
    Dot,
    Integer,
    Float,
    Symbol,
    StringStart,
    StringContent,
    StringEnd,
    End,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LispValue {
    #[default]
    None,
    Integer(i64),
    Float(f64),
    Text(String),
}

fn text(s: &str) -> LispValue {
    LispValue::Text(s.to_owned())
}

/// Register the Lisp tokens.
pub fn token_set() -> Result<TokenizerBuilder<LispSymbol, LispValue>> {
    use LispSymbol::*;
    let default = [DEFAULT_STATE];

    let mut builder = TokenizerBuilder::new(End);
    builder.add_token("[[:space:]]+", None, default)?;
    builder.add_token(";[^\n]*", None, default)?;
    builder.add_token("[(]", Some(LParen), default)?;
    builder.add_token("[)]", Some(RParen), default)?;
    builder.add_token("'", Some(Quote), default)?;
    builder.add_token("[.]", Some(Dot), default)?;
    builder
        .add_token("-?[0-9]+", Some(Integer), default)?
        .action(|s| s.parse().map(LispValue::Integer).unwrap_or_else(|_| text(s)));
    builder
        .add_token("-?[0-9]+[.][0-9]*", Some(Float), default)?
        .action(|s| s.parse().map(LispValue::Float).unwrap_or_else(|_| text(s)));
    builder
        .add_token(r#"[^;[:space:]'()."]+"#, Some(Symbol), default)?
        .action(text);

    builder
        .add_token("\"", Some(StringStart), default)?
        .transition_to(STRING_STATE);
    builder
        .add_token(r#"(?s)([\\].|[^\\"])+"#, Some(StringContent), [STRING_STATE])?
        .action(|s| {
            LispValue::Text(s.replace(r#"\\"#, r#"\"#).replace(r#"\""#, r#"""#))
        });
    builder
        .add_token("\"", Some(StringEnd), [STRING_STATE])?
        .transition_to(DEFAULT_STATE);
    Ok(builder)
}

/// A tokenizer for Lisp input; push input streams onto it.
pub fn tokenizer() -> Result<Tokenizer<LispSymbol, LispValue>> {
    token_set()?.finalize()
}

/// Split the input into its constituent tokens.
pub fn tokenize(input: &str) -> Result<Vec<TokenMatch<LispSymbol, LispValue>>> {
    let mut tokenizer = tokenizer()?;
    tokenizer.push_str(input);
    tokenizer.tokens_iter().collect()
}
