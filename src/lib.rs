// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD
#![warn(missing_docs)]

//! Library providing a fixed-width Intcode interpreter and a brute-force search for its inputs
//!
//! Only the two arithmetic [Opcodes] from Day 2 are understood, along with `HALT`. Every
//! instruction is exactly 4 ints wide, and every parameter is an address.
//!
//! # Example
//!
//! ```rust
//! use intcode::prelude::*;
//! let mut interpreter = Interpreter::new([1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50]);
//!
//! assert_eq!(interpreter.run().unwrap(), State::Halted);
//! assert_eq!(interpreter[0], 3500);
//! ```
//!
//! Before running, the interpreter can be seeded with a "noun" and a "verb", which are written
//! to addresses 1 and 2. The [search] module inverts that: given the value that should end up at
//! a target address, it finds the seed that produces it.
//!
//! ```rust
//! use intcode::prelude::*;
//! let program = Snapshot::new([1, 0, 0, 0, 99]);
//! let solution = Driver::new(program).search(3).unwrap();
//! assert_eq!(solution, Solution { noun: 0, verb: 2 });
//! assert_eq!(solution.checksum(), 2);
//! ```
//!
//! [Opcodes]: https://esolangs.org/wiki/Intcode#Opcodes

use std::fmt::{self, Display};
use std::ops::Index;

use log::{Level, log_enabled, trace};
use thiserror::Error;

/// A small module that re-exports items needed when working with the Intcode interpreter
pub mod prelude {
    pub use crate::loader::{CodeFormat, FileSource, MemorySource, Snapshot};
    pub use crate::search::{Driver, Mode, Outcome, SearchSpace, Solution};
    pub use crate::{Interpreter, Memory, State, UnknownOpcodePolicy, execute};
}

mod internals;
mod mem;

pub mod loader;
pub mod search;
pub mod trace;

pub use mem::Memory;
use trace::Trace;

/// The width of every instruction, in ints
pub const INSTRUCTION_WIDTH: usize = 4;

/// The state of the intcode system.
///
/// [Running](State::Running) means that there may be more instructions to execute.
///
/// [Halted](State::Halted) means that a `HALT` instruction has been executed, or that the
/// instruction pointer ran too close to the end of memory to read another instruction. Once it's
/// been returned, no more instructions will be executed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    /// Execution can continue
    Running,
    /// Execution has halted
    Halted,
}

/// What to do with an opcode that isn't [Add](OpCode::Add), [Mul](OpCode::Mul), or
/// [Halt](OpCode::Halt)
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum UnknownOpcodePolicy {
    /// Skip over the instruction without touching memory
    #[default]
    Ignore,
    /// Stop with [`InterpreterError::UnrecognizedOpcode`]
    Fail,
}

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
/// An error occured when executing an intcode instruction
pub enum InterpreterError {
    /// Memory is too short to hold the noun and verb
    #[error("memory holds {0} ints, but seeding needs at least 3")]
    MemoryTooShort(usize),
    /// An address outside of memory was read from or written to
    #[error("address {address} is outside of memory of length {len}")]
    InvalidAddress {
        /// the offending address
        address: i64,
        /// the length of memory at the time
        len: usize,
    },
    /// An invalid opcode was encountered while running with [`UnknownOpcodePolicy::Fail`]
    #[error("encountered unrecognized opcode {0}")]
    UnrecognizedOpcode(i64),
    /// The interpreter already returned an error
    #[error("interpreter was poisoned by an earlier error")]
    Poisoned,
}

/// The opcodes understood by the interpreter
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
#[allow(missing_docs, reason = "trivial")]
pub enum OpCode {
    Add = 1,
    Mul = 2,
    Halt = 99,
}

impl TryFrom<i64> for OpCode {
    type Error = i64;
    fn try_from(i: i64) -> Result<Self, Self::Error> {
        match i {
            1 => Ok(Self::Add),
            2 => Ok(Self::Mul),
            99 => Ok(Self::Halt),
            i => Err(i),
        }
    }
}

impl Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "ADD"),
            Self::Mul => write!(f, "MUL"),
            Self::Halt => write!(f, "HALT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// An intcode interpreter, which provides optional tracing of instructions executed.
///
/// It owns its memory outright: construct a new one for every run that needs to start from
/// pristine memory.
pub struct Interpreter {
    index: usize,
    code: Memory,
    state: State,
    policy: UnknownOpcodePolicy,
    poisoned: bool,
    trace: Option<Trace>,
}

impl Index<i64> for Interpreter {
    type Output = i64;

    /// Panics if `i` is outside of memory. Use [`Interpreter::mem_get`] for a checked read.
    fn index(&self, i: i64) -> &Self::Output {
        let i = usize::try_from(i).expect("negative index into intcode memory");
        &self.code[i]
    }
}

impl Interpreter {
    /// Create a new interpreter that ignores unknown opcodes. Collects `code` into its memory.
    pub fn new(code: impl IntoIterator<Item = i64>) -> Self {
        Self::with_policy(code, UnknownOpcodePolicy::default())
    }

    /// Create a new interpreter that handles unknown opcodes according to `policy`.
    pub fn with_policy(code: impl IntoIterator<Item = i64>, policy: UnknownOpcodePolicy) -> Self {
        Self {
            index: 0,
            code: code.into_iter().collect(),
            state: State::Running,
            policy,
            poisoned: false,
            trace: None,
        }
    }

    /// The current position of the instruction pointer
    pub fn index(&self) -> usize {
        self.index
    }

    /// The current [State]
    pub fn state(&self) -> State {
        self.state
    }

    /// The policy for unknown opcodes
    pub fn policy(&self) -> UnknownOpcodePolicy {
        self.policy
    }

    /// Whether an earlier error stopped this interpreter for good
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// View the interpreter's memory
    pub fn memory(&self) -> &Memory {
        &self.code
    }

    /// Consume the interpreter, returning its memory
    pub fn into_memory(self) -> Memory {
        self.code
    }

    /// Get the memory at `address`
    #[doc(alias = "peek")]
    pub fn mem_get(&self, address: i64) -> Result<i64, InterpreterError> {
        self.code.get(address).ok_or(InterpreterError::InvalidAddress {
            address,
            len: self.code.len(),
        })
    }

    /// Manually set a memory location
    #[doc(alias("poke", "write"))]
    pub fn mem_override(&mut self, address: i64, value: i64) -> Result<(), InterpreterError> {
        let len = self.code.len();
        let cell = self
            .code
            .get_mut(address)
            .ok_or(InterpreterError::InvalidAddress { address, len })?;
        *cell = value;
        Ok(())
    }

    /// Write `noun` to address 1 and `verb` to address 2.
    ///
    /// ```rust
    /// use intcode::prelude::*;
    /// let mut interp = Interpreter::new([1, 0, 0, 0, 99]);
    /// interp.seed(12, 2).unwrap();
    /// assert_eq!(interp.memory().as_slice(), &[1, 12, 2, 0, 99]);
    /// ```
    pub fn seed(&mut self, noun: i64, verb: i64) -> Result<(), InterpreterError> {
        if self.code.len() < 3 {
            return Err(InterpreterError::MemoryTooShort(self.code.len()));
        }
        self.mem_override(1, noun)?;
        self.mem_override(2, verb)
    }

    /// Execute a single instruction, returning the [State] afterwards.
    ///
    /// Once [`State::Halted`] is returned, calling this again does nothing, and returns
    /// [`State::Halted`] again. If an error is returned, the interpreter is poisoned, and
    /// every subsequent call returns [`InterpreterError::Poisoned`].
    pub fn exec_instruction(&mut self) -> Result<State, InterpreterError> {
        if self.poisoned {
            return Err(InterpreterError::Poisoned);
        }
        if self.state == State::Halted {
            return Ok(State::Halted);
        }

        // no room for a full instruction, so nothing past here gets read
        if self.code.remaining(self.index) < INSTRUCTION_WIDTH {
            trace!(
                "ip: {:>8} | halting with {} ints remaining",
                self.index,
                self.code.remaining(self.index)
            );
            self.state = State::Halted;
            return Ok(State::Halted);
        }

        let op_int = self.code[self.index];
        match OpCode::try_from(op_int) {
            Ok(OpCode::Halt) => {
                self.record(trace::TracedInstr::halt(self.index));
                self.state = State::Halted;
                return Ok(State::Halted);
            }
            Ok(opcode @ OpCode::Add) => self.op3(opcode, i64::wrapping_add)?,
            Ok(opcode @ OpCode::Mul) => self.op3(opcode, i64::wrapping_mul)?,
            Err(op) => match self.policy {
                UnknownOpcodePolicy::Ignore => self.skip_unknown(op),
                UnknownOpcodePolicy::Fail => {
                    self.poisoned = true;
                    return Err(InterpreterError::UnrecognizedOpcode(op));
                }
            },
        }

        self.index += INSTRUCTION_WIDTH;
        if self.index > self.code.len() {
            self.state = State::Halted;
        }
        Ok(self.state)
    }

    /// Execute until the program halts.
    ///
    /// Returns [`State::Halted`] on success, or the first error encountered.
    pub fn run(&mut self) -> Result<State, InterpreterError> {
        while self.exec_instruction()? == State::Running {}
        Ok(State::Halted)
    }

    /// Seed the interpreter with `noun` and `verb`, run it until it halts, and return the int at
    /// `target`.
    ///
    /// ```rust
    /// use intcode::prelude::*;
    /// let interp = Interpreter::new([1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50]);
    /// assert_eq!(interp.execute(0, 9, 10), Ok(3500));
    /// ```
    pub fn execute(mut self, target: i64, noun: i64, verb: i64) -> Result<i64, InterpreterError> {
        self.seed(noun, verb)?;
        self.run()?;
        self.mem_get(target)
    }

    fn record(&mut self, instr: trace::TracedInstr) {
        if log_enabled!(Level::Trace) {
            trace!("{instr}");
        }
        if let Some(trace) = self.trace.as_mut() {
            trace.push(instr);
        }
    }

    fn tracing(&self) -> bool {
        self.trace.is_some() || log_enabled!(Level::Trace)
    }
}

/// Run `memory` as an intcode program after writing `noun` and `verb` to addresses 1 and 2,
/// returning the int left at `target_offset` once it halts.
///
/// Unknown opcodes are skipped. See [`Interpreter::execute`] to pick another policy.
///
/// ```rust
/// assert_eq!(intcode::execute(vec![2, 0, 0, 0, 99], 0, 0, 0), Ok(4));
/// ```
pub fn execute(
    memory: impl IntoIterator<Item = i64>,
    target_offset: i64,
    noun: i64,
    verb: i64,
) -> Result<i64, InterpreterError> {
    Interpreter::new(memory).execute(target_offset, noun, verb)
}
