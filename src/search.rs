// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Searching for the noun and verb that make a program produce a given value
//!
//! The [Driver] ties a [MemorySource] to a target address, and can either run the program once
//! with a known noun and verb, or try every candidate pair from a [SearchSpace] until the target
//! ends up holding the desired value. Each candidate runs on a freshly loaded copy of memory.

use std::fmt::{self, Display};
use std::ops::Range;

use log::{debug, info, warn};
use thiserror::Error;

use crate::loader::{LoadError, MemorySource};
use crate::{Interpreter, InterpreterError, UnknownOpcodePolicy};

/// An error that stopped the [Driver]
#[derive(Debug, Error)]
pub enum SearchError {
    /// The program couldn't be loaded
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The program failed while running with a fixed noun and verb
    #[error(transparent)]
    Interpreter(#[from] InterpreterError),
    /// Every candidate was tried, and none of them worked
    #[error("no (noun, verb) pair leaves {stop_value} at position-{target}")]
    Exhausted {
        /// the value that was searched for
        stop_value: i64,
        /// the address it was expected at
        target: i64,
    },
}

/// The noun and verb were specified inconsistently
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum ModeError {
    /// A noun was given without a verb
    #[error("noun {0} was given without a verb")]
    MissingVerb(i64),
    /// A verb was given without a noun
    #[error("verb {0} was given without a noun")]
    MissingNoun(i64),
    /// Neither a noun and verb nor a value to search for were given
    #[error("either a noun and verb or a value to search for is needed")]
    Unspecified,
}

/// What a [Driver] should do
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Mode {
    /// Run once with a known noun and verb
    Fixed {
        #[allow(missing_docs, reason = "trivial")]
        noun: i64,
        #[allow(missing_docs, reason = "trivial")]
        verb: i64,
    },
    /// Find the noun and verb that leave `stop_value` at the target address
    Search {
        #[allow(missing_docs, reason = "trivial")]
        stop_value: i64,
    },
}

impl Mode {
    /// Pick a mode based on which values were supplied.
    ///
    /// A noun and verb together always mean [`Mode::Fixed`], and any `stop_value` is then unused.
    /// Otherwise, `stop_value` is needed for [`Mode::Search`].
    ///
    /// ```
    /// use intcode::search::{Mode, ModeError};
    /// assert_eq!(Mode::select(Some(12), Some(2), None), Ok(Mode::Fixed { noun: 12, verb: 2 }));
    /// assert_eq!(Mode::select(None, None, Some(3500)), Ok(Mode::Search { stop_value: 3500 }));
    /// assert_eq!(Mode::select(Some(12), None, Some(3500)), Err(ModeError::MissingVerb(12)));
    /// ```
    pub fn select(
        noun: Option<i64>,
        verb: Option<i64>,
        stop_value: Option<i64>,
    ) -> Result<Self, ModeError> {
        match (noun, verb, stop_value) {
            (Some(noun), Some(verb), stop_value) => {
                if let Some(stop_value) = stop_value {
                    warn!("ignoring stop value {stop_value}, as the noun and verb are known");
                }
                Ok(Self::Fixed { noun, verb })
            }
            (Some(noun), None, _) => Err(ModeError::MissingVerb(noun)),
            (None, Some(verb), _) => Err(ModeError::MissingNoun(verb)),
            (None, None, Some(stop_value)) => Ok(Self::Search { stop_value }),
            (None, None, None) => Err(ModeError::Unspecified),
        }
    }
}

/// A noun and verb which produced the value searched for
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Solution {
    #[allow(missing_docs, reason = "trivial")]
    pub noun: i64,
    #[allow(missing_docs, reason = "trivial")]
    pub verb: i64,
}

impl Solution {
    /// `100 * noun + verb`, wrapping on overflow like the interpreter's own arithmetic
    pub fn checksum(&self) -> i64 {
        self.noun.wrapping_mul(100).wrapping_add(self.verb)
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(noun, verb) = ({}, {})", self.noun, self.verb)
    }
}

/// The result of running a [Driver] in some [Mode]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Outcome {
    /// The value left at the target address by [`Mode::Fixed`]
    Value(i64),
    /// The pair found by [`Mode::Search`]
    Found(Solution),
}

/// The candidates a search tries: every ordered pair of distinct values from `range`, with the
/// noun changing slowest.
///
/// ```
/// use intcode::search::SearchSpace;
/// let space = SearchSpace::new(0..3);
/// assert_eq!(
///     space.pairs().collect::<Vec<_>>(),
///     vec![(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)],
/// );
/// assert_eq!(space.len(), 6);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SearchSpace {
    range: Range<i64>,
}

impl Default for SearchSpace {
    /// nouns and verbs from `0` to `99`
    fn default() -> Self {
        Self::new(0..100)
    }
}

impl SearchSpace {
    /// Draw nouns and verbs from `range`
    pub fn new(range: Range<i64>) -> Self {
        Self { range }
    }

    /// The range nouns and verbs are drawn from
    pub fn range(&self) -> Range<i64> {
        self.range.clone()
    }

    /// Iterate over the candidate `(noun, verb)` pairs in the order they're tried
    pub fn pairs(&self) -> impl Iterator<Item = (i64, i64)> + use<> {
        let range = self.range.clone();
        self.range.clone().flat_map(move |noun| {
            range
                .clone()
                .filter(move |&verb| verb != noun)
                .map(move |verb| (noun, verb))
        })
    }

    /// The number of candidate pairs
    pub fn len(&self) -> usize {
        let n = self.range.end.saturating_sub(self.range.start).max(0);
        usize::try_from(n).map_or(usize::MAX, |n| n.saturating_mul(n.saturating_sub(1)))
    }

    /// Whether there are no candidate pairs at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs a program from a [MemorySource], either once or as a search over nouns and verbs
///
/// ```
/// use intcode::prelude::*;
/// let driver = Driver::new(Snapshot::new([1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50]));
/// assert_eq!(driver.run(Mode::Fixed { noun: 9, verb: 10 }).unwrap(), Outcome::Value(3500));
/// ```
#[derive(Debug, Clone)]
pub struct Driver<S> {
    source: S,
    target: i64,
    space: SearchSpace,
    policy: UnknownOpcodePolicy,
}

impl<S: MemorySource> Driver<S> {
    /// Read results from address 0, search the default [SearchSpace], and skip unknown opcodes
    pub fn new(source: S) -> Self {
        Self {
            source,
            target: 0,
            space: SearchSpace::default(),
            policy: UnknownOpcodePolicy::default(),
        }
    }

    /// Read results from `target` instead
    pub fn target(mut self, target: i64) -> Self {
        self.target = target;
        self
    }

    /// Search `space` instead
    pub fn space(mut self, space: SearchSpace) -> Self {
        self.space = space;
        self
    }

    /// Handle unknown opcodes according to `policy`
    pub fn policy(mut self, policy: UnknownOpcodePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build an interpreter around freshly loaded memory
    pub fn interpreter(&self) -> Result<Interpreter, LoadError> {
        Ok(Interpreter::with_policy(self.source.load()?, self.policy))
    }

    /// Run the program once with `noun` and `verb`, returning the value left at the target
    pub fn execute(&self, noun: i64, verb: i64) -> Result<i64, SearchError> {
        Ok(self.interpreter()?.execute(self.target, noun, verb)?)
    }

    /// Try every candidate pair in order, returning the first that leaves `stop_value` at the
    /// target address.
    ///
    /// A candidate whose run fails is skipped. A failure to load the program ends the search, and
    /// so does a target address outside of the loaded memory, as no candidate could ever fix that.
    pub fn search(&self, stop_value: i64) -> Result<Solution, SearchError> {
        let memory = self.source.load()?;
        if memory.get(self.target).is_none() {
            return Err(InterpreterError::InvalidAddress {
                address: self.target,
                len: memory.len(),
            }
            .into());
        }
        let mut preloaded = Some(memory);
        for (noun, verb) in self.space.pairs() {
            let memory = match preloaded.take() {
                Some(memory) => memory,
                None => self.source.load()?,
            };
            let interp = Interpreter::with_policy(memory, self.policy);
            match interp.execute(self.target, noun, verb) {
                Ok(val) if val == stop_value => {
                    info!("({noun}, {verb}) leaves {stop_value} at position-{}", self.target);
                    return Ok(Solution { noun, verb });
                }
                Ok(_) => (),
                Err(e) => debug!("rejecting ({noun}, {verb}): {e}"),
            }
        }
        Err(SearchError::Exhausted {
            stop_value,
            target: self.target,
        })
    }

    /// Do whatever `mode` calls for
    pub fn run(&self, mode: Mode) -> Result<Outcome, SearchError> {
        match mode {
            Mode::Fixed { noun, verb } => self.execute(noun, verb).map(Outcome::Value),
            Mode::Search { stop_value } => self.search(stop_value).map(Outcome::Found),
        }
    }
}
