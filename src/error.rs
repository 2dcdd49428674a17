//! Errors from building and running a tokenizer.
//!
//! A tokenizer can fail in two very different ways:
//! - The token set itself is wrong (a bad pattern, a transition to a state nobody declared).
//!   These are reported while building, before any input is scanned.
//! - The input does not match anything in the current lexical state.
//!   This is reported by `next_token`, and the driver decides what to do with it.
//!
//! Running out of input is not an error; see `Scan::EndOfInput`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A registered pattern is not a valid regular expression.
    #[error("token {token}: invalid pattern {pattern:?}: {source}")]
    Pattern {
        token: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The patterns of a state could not be compiled together.
    #[error("state {state:?}: could not compile pattern set: {source}")]
    PatternSet {
        state: String,
        #[source]
        source: regex::Error,
    },

    /// A token transitions into a state that has no tokens registered in it.
    #[error("token {token} ({pattern:?}) transitions to unknown state {state:?}")]
    UnknownState {
        token: usize,
        pattern: String,
        state: String,
    },

    /// Nothing in the current state matches the remaining input.
    #[error(
        "in {stream} at line {line} column {column}: no token in state {state:?} matches {snippet:?}"
    )]
    NoMatch {
        state: String,
        stream: String,
        offset: usize,
        line: usize,
        column: usize,
        snippet: String,
    },

    /// Input is not valid UTF-8.
    #[error("in {stream}: input is not UTF-8: {source}")]
    Encoding {
        stream: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("could not read input: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True if this is a lexical failure, rather than a problem with the token set or input source.
    pub fn is_no_match(&self) -> bool {
        matches!(self, Error::NoMatch { .. })
    }
}
