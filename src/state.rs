//! Lexical states: named groups of tokens, each with one compiled pattern set.
//!
//! States are referred to by name while the token set is being built.
//! Names are interned, and each name maps to a `StateId`: an index into the tokenizer's state table.
//! Transitions are resolved to `StateId`s when the tokenizer is finalized,
//! so scanning never looks up a state by name.

use regex::{RegexSet, RegexSetBuilder, SetMatches};
use string_interner::backend::StringBackend;
use string_interner::{DefaultSymbol, StringInterner, Symbol};

use crate::error::{Error, Result};
use crate::token::{TokenDef, TokenId};
use crate::tokenizer::Config;

/// The initial state, which always exists.
pub const DEFAULT_STATE: &str = "@default";

/// Index of a state in the tokenizer's state table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub(crate) usize);

impl StateId {
    /// The `@default` state is always created first.
    pub const DEFAULT: StateId = StateId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Map from state name to state id.
/// The string backend hands out dense symbols in interning order, so a symbol is its state's index.
#[derive(Debug, Clone, Default)]
pub(crate) struct StateNames {
    interner: StringInterner<StringBackend<DefaultSymbol>>,
}

impl StateNames {
    /// Get the id for a name, assigning the next one if the name is new.
    pub fn get_or_insert(&mut self, name: &str) -> (StateId, bool) {
        let before = self.interner.len();
        let symbol = self.interner.get_or_intern(name);
        (StateId(symbol.to_usize()), self.interner.len() > before)
    }

    pub fn get(&self, name: &str) -> Option<StateId> {
        self.interner.get(name).map(|symbol| StateId(symbol.to_usize()))
    }
}

/// A state that is still accepting tokens.
#[derive(Debug, Clone)]
pub(crate) struct PendingState {
    pub name: String,
    pub tokens: Vec<TokenId>,
}

impl PendingState {
    pub fn new(name: &str) -> Self {
        PendingState {
            name: name.to_owned(),
            tokens: Vec::new(),
        }
    }

    /// Compile the patterns of every token in this state into one set.
    /// The set's pattern indices follow the state's token order.
    pub fn compile<S, V>(&self, defs: &[TokenDef<S, V>], config: &Config) -> Result<LexicalState> {
        let patterns = self.tokens.iter().map(|id| defs[id.0].regex.as_str());
        let mut builder = RegexSetBuilder::new(patterns);
        builder.case_insensitive(config.case_insensitive);
        if let Some(limit) = config.size_limit {
            builder.size_limit(limit);
        }
        let matcher = builder.build().map_err(|source| Error::PatternSet {
            state: self.name.clone(),
            source,
        })?;
        Ok(LexicalState {
            name: self.name.clone(),
            matcher,
            tokens: self.tokens.clone(),
        })
    }
}

/// A finalized lexical state.
#[derive(Debug, Clone)]
pub struct LexicalState {
    name: String,
    matcher: RegexSet,
    tokens: Vec<TokenId>,
}

impl LexicalState {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tokens registered in this state, in registration order.
    pub fn tokens(&self) -> &[TokenId] {
        &self.tokens
    }

    /// Every token whose pattern matches at the start of `input`, in registration order.
    pub(crate) fn candidates<'a>(&'a self, input: &str) -> impl 'a + Iterator<Item = TokenId> {
        let matches: SetMatches = self.matcher.matches(input);
        matches.into_iter().map(|idx| self.tokens[idx])
    }
}
