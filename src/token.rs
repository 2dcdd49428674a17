//! Token definitions and the matches they produce.

use std::fmt;
use std::rc::Rc;

use regex::Regex;

use crate::input::Location;

/// Identifies a registered token.
/// Ids are assigned sequentially, starting from 0, in registration order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(pub(crate) usize);

impl TokenId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What to do with the text of a match.
pub enum Action<V> {
    /// Produce `V::default()`.
    None,
    /// Compute the value from the matched text.
    Apply(Rc<dyn Fn(&str) -> V>),
}

impl<V> Action<V> {
    pub fn new(f: impl Fn(&str) -> V + 'static) -> Self {
        Action::Apply(Rc::new(f))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Action::None)
    }
}

impl<V: Default> Action<V> {
    pub fn perform(&self, text: &str) -> V {
        match self {
            Action::None => V::default(),
            Action::Apply(f) => f(text),
        }
    }
}

// Derived Clone would require V: Clone; we only clone the Rc.
impl<V> Clone for Action<V> {
    fn clone(&self) -> Self {
        match self {
            Action::None => Action::None,
            Action::Apply(f) => Action::Apply(Rc::clone(f)),
        }
    }
}

impl<V> Default for Action<V> {
    fn default() -> Self {
        Action::None
    }
}

impl<V> fmt::Debug for Action<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::None => f.write_str("None"),
            Action::Apply(_) => f.write_str("Apply(..)"),
        }
    }
}

/// A registered token: a pattern, and what to do when it matches.
pub struct TokenDef<S, V> {
    pub(crate) id: TokenId,
    pub(crate) pattern: String,
    /// The pattern, anchored at the start of the input.
    pub(crate) regex: Regex,
    pub(crate) symbol: Option<S>,
    pub(crate) action: Action<V>,
    pub(crate) transition_to_state: Option<String>,
}

impl<S, V> TokenDef<S, V> {
    pub fn id(&self) -> TokenId {
        self.id
    }

    /// The pattern as it was registered (not anchored).
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn symbol(&self) -> Option<&S> {
        self.symbol.as_ref()
    }

    /// A token without a symbol is consumed, but never reported.
    pub fn is_skip(&self) -> bool {
        self.symbol.is_none()
    }

    pub fn action(&self) -> &Action<V> {
        &self.action
    }

    pub fn transition_to_state(&self) -> Option<&str> {
        self.transition_to_state.as_deref()
    }

    /// Length of this token's match at the start of `input`, if it matches there.
    pub(crate) fn match_length(&self, input: &str) -> Option<usize> {
        self.regex.find(input).map(|m| m.end())
    }
}

impl<S: Clone, V> Clone for TokenDef<S, V> {
    fn clone(&self) -> Self {
        TokenDef {
            id: self.id,
            pattern: self.pattern.clone(),
            regex: self.regex.clone(),
            symbol: self.symbol.clone(),
            action: self.action.clone(),
            transition_to_state: self.transition_to_state.clone(),
        }
    }
}

impl<S: fmt::Debug, V> fmt::Debug for TokenDef<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenDef")
            .field("id", &self.id)
            .field("pattern", &self.pattern)
            .field("symbol", &self.symbol)
            .field("action", &self.action)
            .field("transition_to_state", &self.transition_to_state)
            .finish()
    }
}

/// A token recognized in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenMatch<S, V> {
    /// The definition that won the match.
    /// For an end-of-input match, there is no definition; this is `None`.
    pub token: Option<TokenId>,
    pub symbol: S,
    pub value: V,
    /// Length of the match, in bytes.
    pub match_length: usize,
    /// Where the match starts in its stream.
    pub location: Location,
}
