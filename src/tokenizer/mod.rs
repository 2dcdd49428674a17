//! The tokenizer: register tokens into lexical states, finalize, then scan.
//!
//! Building happens in two phases.
//! A `TokenizerBuilder` accepts token registrations; `finalize` compiles each state's
//! patterns into a single `RegexSet` and produces a `Tokenizer`.
//! Only a `Tokenizer` can scan, so there is no way to match against an unfinished state.
//!
//! ## Matching
//!
//! At each step, every pattern of the current state is tried at the start of the
//! remaining input. The longest match wins; among equally-long matches, the token
//! registered first wins. Registration order is part of the contract:
//! register keywords before the identifier pattern that would also match them.
//!
//! Tokens without a symbol are consumed silently (whitespace, comments, ...).
//! A token may switch the tokenizer into another lexical state; the switch applies
//! from the next match onwards.

use std::io::Read;

use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};
use crate::input::{InputStack, InputStream, Location, UNNAMED};
use crate::state::{LexicalState, PendingState, StateId, StateNames, DEFAULT_STATE};
use crate::token::{Action, TokenDef, TokenId, TokenMatch};

#[cfg(test)]
mod scan_test;

/// Options applied to every compiled pattern.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub case_insensitive: bool,
    /// Upper bound on the compiled size of each pattern and pattern set, in bytes.
    /// `None` uses the `regex` crate's default.
    pub size_limit: Option<usize>,
}

impl Config {
    fn compile(&self, pattern: &str) -> std::result::Result<Regex, regex::Error> {
        let mut builder = RegexBuilder::new(pattern);
        builder.case_insensitive(self.case_insensitive);
        if let Some(limit) = self.size_limit {
            builder.size_limit(limit);
        }
        builder.build()
    }
}

/// Registration phase of a tokenizer.
pub struct TokenizerBuilder<S, V> {
    config: Config,
    end_of_input: S,
    tokens: Vec<TokenDef<S, V>>,
    names: StateNames,
    states: Vec<PendingState>,
}

impl<S, V> TokenizerBuilder<S, V> {
    /// Start a token set.
    /// `end_of_input` is reported whenever the active input stream runs out.
    pub fn new(end_of_input: S) -> Self {
        Self::with_config(end_of_input, Config::default())
    }

    pub fn with_config(end_of_input: S, config: Config) -> Self {
        let mut builder = TokenizerBuilder {
            config,
            end_of_input,
            tokens: Vec::new(),
            names: StateNames::default(),
            states: Vec::new(),
        };
        builder.state_mut(DEFAULT_STATE);
        builder
    }

    /// Register a token in each of the given states.
    /// With no states, the token is registered in `@default`.
    ///
    /// A token with no symbol is a skip token: it consumes input, but is never returned.
    pub fn add_token<I>(
        &mut self,
        pattern: &str,
        symbol: Option<S>,
        states: I,
    ) -> Result<TokenHandle<'_, S, V>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let id = TokenId(self.tokens.len());
        let regex = self
            .config
            .compile(&format!(r"\A(?:{pattern})"))
            .map_err(|source| Error::Pattern {
                token: id.0,
                pattern: pattern.to_owned(),
                source,
            })?;

        let mut registered = false;
        for state in states {
            let state = self.state_mut(state.as_ref());
            // Registering twice in the same state is a no-op.
            if state.tokens.last() != Some(&id) {
                state.tokens.push(id);
            }
            registered = true;
        }
        if !registered {
            self.state_mut(DEFAULT_STATE).tokens.push(id);
        }
        tracing::trace!("registered token {} with pattern {:?}", id, pattern);

        self.tokens.push(TokenDef {
            id,
            pattern: pattern.to_owned(),
            regex,
            symbol,
            action: Action::None,
            transition_to_state: None,
        });
        Ok(TokenHandle {
            def: &mut self.tokens[id.0],
        })
    }

    pub fn end_of_input_symbol(&self) -> &S {
        &self.end_of_input
    }

    /// Tokens registered so far, in registration order.
    pub fn tokens(&self) -> &[TokenDef<S, V>] {
        &self.tokens
    }

    fn state_mut(&mut self, name: &str) -> &mut PendingState {
        let (id, created) = self.names.get_or_insert(name);
        if created {
            tracing::trace!("created lexical state {:?}", name);
            self.states.push(PendingState::new(name));
        }
        &mut self.states[id.0]
    }
}

impl<S: Clone, V> TokenizerBuilder<S, V> {
    /// Compile every state and resolve every transition.
    ///
    /// The builder is left untouched: finalizing again gives a tokenizer with the same behavior.
    pub fn finalize(&self) -> Result<Tokenizer<S, V>> {
        let states = self
            .states
            .iter()
            .map(|state| state.compile(&self.tokens, &self.config))
            .collect::<Result<Vec<_>>>()?;

        let transitions = self
            .tokens
            .iter()
            .map(|def| match &def.transition_to_state {
                None => Ok(None),
                Some(name) => self
                    .names
                    .get(name)
                    .map(Some)
                    .ok_or_else(|| Error::UnknownState {
                        token: def.id.0,
                        pattern: def.pattern.clone(),
                        state: name.clone(),
                    }),
            })
            .collect::<Result<Vec<_>>>()?;

        for state in states.iter() {
            tracing::debug!(
                "compiled lexical state {:?} with {} tokens",
                state.name(),
                state.tokens().len()
            );
        }

        Ok(Tokenizer {
            end_of_input: self.end_of_input.clone(),
            tokens: self.tokens.clone(),
            transitions,
            states,
            current: StateId::DEFAULT,
            inputs: InputStack::new(),
        })
    }
}

/// A just-registered token, which can still be given an action and a transition.
pub struct TokenHandle<'a, S, V> {
    def: &'a mut TokenDef<S, V>,
}

impl<S, V> TokenHandle<'_, S, V> {
    pub fn id(&self) -> TokenId {
        self.def.id
    }

    /// Compute the token's value from its matched text.
    pub fn action(self, f: impl Fn(&str) -> V + 'static) -> Self {
        self.def.action = Action::new(f);
        self
    }

    /// Switch to the named state after this token matches.
    /// The name is checked when the tokenizer is finalized.
    pub fn transition_to(self, state: impl Into<String>) -> Self {
        self.def.transition_to_state = Some(state.into());
        self
    }
}

/// The outcome of one `next_token` call.
#[derive(Debug, Clone, PartialEq)]
pub enum Scan<S, V> {
    /// A token with a symbol.
    Token(TokenMatch<S, V>),
    /// The active stream is consumed. The match carries the end-of-input symbol.
    /// This repeats until the stream is popped.
    EndOfInput(TokenMatch<S, V>),
    /// There are no input streams.
    NoInput,
}

/// Scanning phase of a tokenizer.
pub struct Tokenizer<S, V> {
    end_of_input: S,
    tokens: Vec<TokenDef<S, V>>,
    /// Resolved `transition_to_state` of each token, by token id.
    transitions: Vec<Option<StateId>>,
    states: Vec<LexicalState>,
    current: StateId,
    inputs: InputStack,
}

impl<S, V> Tokenizer<S, V> {
    /// Read `source` to completion and make it the active stream.
    pub fn push_input(&mut self, source: impl Read) -> Result<()> {
        self.push_input_named(UNNAMED, source)
    }

    pub fn push_input_named(&mut self, name: impl Into<String>, source: impl Read) -> Result<()> {
        self.inputs.push(InputStream::read(name, source)?);
        Ok(())
    }

    pub fn push_str(&mut self, text: impl Into<String>) {
        self.inputs.push(InputStream::new(UNNAMED, text.into()));
    }

    /// Discard the active stream; the one beneath it resumes where it left off.
    pub fn pop_input(&mut self) -> Option<InputStream> {
        self.inputs.pop()
    }

    pub fn input(&self) -> Option<&InputStream> {
        self.inputs.top()
    }

    pub fn input_depth(&self) -> usize {
        self.inputs.depth()
    }

    /// Name of the current lexical state.
    pub fn current_state(&self) -> &str {
        self.states[self.current.0].name()
    }

    pub fn current_state_id(&self) -> StateId {
        self.current
    }

    pub fn states(&self) -> &[LexicalState] {
        &self.states
    }

    /// # Panics
    ///
    /// If `id` did not come from this tokenizer.
    pub fn state(&self, id: StateId) -> &LexicalState {
        &self.states[id.0]
    }

    /// # Panics
    ///
    /// If `id` was not registered in the builder this tokenizer came from.
    pub fn token(&self, id: TokenId) -> &TokenDef<S, V> {
        &self.tokens[id.0]
    }

    pub fn tokens(&self) -> &[TokenDef<S, V>] {
        &self.tokens
    }

    /// The state a token switches to, if any.
    ///
    /// # Panics
    ///
    /// If `id` was not registered in the builder this tokenizer came from.
    pub fn transition(&self, id: TokenId) -> Option<StateId> {
        self.transitions[id.0]
    }

    pub fn end_of_input_symbol(&self) -> &S {
        &self.end_of_input
    }
}

impl<S: Clone, V: Default> Tokenizer<S, V> {
    /// Get the next token with a symbol from the active stream.
    ///
    /// Returns an error if nothing in the current state matches the remaining input.
    /// The stream is left where it was, so the driver can report it or pop it.
    pub fn next_token(&mut self) -> Result<Scan<S, V>> {
        loop {
            let Some(stream) = self.inputs.top_mut() else {
                return Ok(Scan::NoInput);
            };
            if stream.is_exhausted() {
                return Ok(Scan::EndOfInput(TokenMatch {
                    token: None,
                    symbol: self.end_of_input.clone(),
                    value: V::default(),
                    match_length: 0,
                    location: stream.location(),
                }));
            }

            let state = &self.states[self.current.0];
            let remaining = stream.remaining();
            let mut best: Option<(TokenId, usize)> = None;
            for id in state.candidates(remaining) {
                let length = self.tokens[id.0].match_length(remaining).unwrap_or(0);
                // Strictly longer: ties go to the earlier registration.
                if best.map_or(true, |(_, longest)| length > longest) {
                    best = Some((id, length));
                }
            }
            let (id, length) = match best {
                Some((id, length)) if length > 0 => (id, length),
                // A zero-length match would never consume anything.
                _ => return Err(no_match(state, stream)),
            };

            let def = &self.tokens[id.0];
            if let Some(target) = self.transitions[id.0] {
                if target != self.current {
                    tracing::debug!(
                        "token {} switches state {:?} -> {:?}",
                        id,
                        state.name(),
                        self.states[target.0].name()
                    );
                }
                self.current = target;
            }

            let value = def.action.perform(&remaining[..length]);
            let location = stream.location();
            tracing::trace!(
                "token {} matched {} bytes at line {} column {}",
                id,
                length,
                location.line,
                location.column
            );
            stream.advance(length);

            if let Some(symbol) = &def.symbol {
                return Ok(Scan::Token(TokenMatch {
                    token: Some(id),
                    symbol: symbol.clone(),
                    value,
                    match_length: length,
                    location,
                }));
            }
        }
    }

    /// Iterate over the tokens of the active stream, stopping at its end.
    pub fn tokens_iter(&mut self) -> Tokens<'_, S, V> {
        Tokens {
            tokenizer: self,
            done: false,
        }
    }
}

fn no_match(state: &LexicalState, stream: &InputStream) -> Error {
    let Location {
        offset,
        line,
        column,
    } = stream.location();
    let snippet: String = stream
        .remaining()
        .chars()
        .take_while(|&c| c != '\n')
        .take(16)
        .collect();
    tracing::trace!(
        "no match in state {:?} at offset {} of {:?}",
        state.name(),
        offset,
        stream.name()
    );
    Error::NoMatch {
        state: state.name().to_owned(),
        stream: stream.name().to_owned(),
        offset,
        line,
        column,
        snippet,
    }
}

/// Iterator over the tokens of the active stream.
///
/// Ends at the end of the stream (or if there is no stream).
/// A lexical failure is yielded once, then the iterator ends.
pub struct Tokens<'a, S, V> {
    tokenizer: &'a mut Tokenizer<S, V>,
    done: bool,
}

impl<S: Clone, V: Default> Iterator for Tokens<'_, S, V> {
    type Item = Result<TokenMatch<S, V>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.tokenizer.next_token() {
            Ok(Scan::Token(m)) => Some(Ok(m)),
            Ok(Scan::EndOfInput(_)) | Ok(Scan::NoInput) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
