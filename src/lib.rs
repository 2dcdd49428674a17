//! A tokenizer for parser drivers: regular-expression tokens, grouped into lexical states,
//! scanned longest-match-first over a stack of input streams.
//!

mod error;
mod input;
mod state;
mod token;
mod tokenizer;

pub mod lisp;

#[cfg(feature = "render")]
mod render;
#[cfg(feature = "render")]
pub use render::render_states;

pub use error::{Error, Result};
pub use input::{InputStack, InputStream, Location};
pub use state::{LexicalState, StateId, DEFAULT_STATE};
pub use token::{Action, TokenDef, TokenId, TokenMatch};
pub use tokenizer::{Config, Scan, TokenHandle, Tokenizer, TokenizerBuilder, Tokens};
