// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Optional logs of the instructions an [Interpreter] executes
use std::fmt::{self, Debug, Display};

use super::{Interpreter, OpCode};

#[derive(Clone, Copy, PartialEq)]
enum TracedOp {
    Add((i64, i64), (i64, i64), (i64, i64)),
    Mul((i64, i64), (i64, i64), (i64, i64)),
    Ignored([i64; 3]),
    Halt,
}

#[derive(Clone, PartialEq)]
/// An opaque type containing information about what instruction was executed, which can be queried
/// with its various methods, or converted into a [String] using its [Display] impl.
pub struct TracedInstr {
    op: TracedOp,
    op_int: i64,
    instr_ptr: usize,
}

impl TracedInstr {
    /// Return the instruction pointer's position when the traced instruction was executed
    pub fn instr_ptr(&self) -> usize {
        self.instr_ptr
    }

    /// Return the actual integer of the traced instruction
    pub fn op_int(&self) -> i64 {
        self.op_int
    }

    /// Return the opcode of the traced instruction, or [`None`] if it was skipped as unknown
    pub fn op_code(&self) -> Option<OpCode> {
        match self.op {
            TracedOp::Add(..) => Some(OpCode::Add),
            TracedOp::Mul(..) => Some(OpCode::Mul),
            TracedOp::Ignored(_) => None,
            TracedOp::Halt => Some(OpCode::Halt),
        }
    }

    /// If the instruction stored a value, return that value
    pub fn stored_val(&self) -> Option<i64> {
        match self.op {
            TracedOp::Add(_, _, (_, val)) | TracedOp::Mul(_, _, (_, val)) => Some(val),
            TracedOp::Ignored(_) | TracedOp::Halt => None,
        }
    }

    /// Return the `(address, value)` pairs of the instruction's parameters.
    ///
    /// For the destination, the value is the one that was stored. Skipped instructions report
    /// their raw parameters, paired with themselves, as they were never resolved.
    pub fn params(&self) -> Vec<(i64, i64)> {
        match self.op {
            TracedOp::Add(a, b, dest) | TracedOp::Mul(a, b, dest) => vec![a, b, dest],
            TracedOp::Ignored(raw) => raw.into_iter().map(|p| (p, p)).collect(),
            TracedOp::Halt => Vec::new(),
        }
    }

    pub(super) fn op3(instr_ptr: usize, opcode: OpCode, resolved: [(i64, i64); 3]) -> Self {
        let [a, b, dest] = resolved;
        let op = match opcode {
            OpCode::Add => TracedOp::Add(a, b, dest),
            OpCode::Mul => TracedOp::Mul(a, b, dest),
            OpCode::Halt => unreachable!("HALT takes no parameters"),
        };
        Self {
            op,
            op_int: opcode as i64,
            instr_ptr,
        }
    }

    pub(super) fn ignored(instr_ptr: usize, op_int: i64, raw: [i64; 3]) -> Self {
        Self {
            op: TracedOp::Ignored(raw),
            op_int,
            instr_ptr,
        }
    }

    pub(super) fn halt(instr_ptr: usize) -> Self {
        Self {
            op: TracedOp::Halt,
            op_int: OpCode::Halt as i64,
            instr_ptr,
        }
    }
}

impl Interpreter {
    /// Begin a [Trace] of executed instructions. If a trace is already running, this replaces that
    /// trace and returns in a [`Some`], otherwise, it returns [`None`].
    ///
    /// # Example
    /// ```
    ///# use intcode::prelude::*;
    /// let mut interp = Interpreter::new([1, 0, 0, 0, 99, 0, 0, 0]);
    /// assert!(interp.start_trace().is_none());
    /// interp.run().unwrap();
    /// let trace = interp.end_trace().unwrap();
    /// assert_eq!(trace.0.len(), 2);
    /// assert_eq!(trace.0[0].stored_val(), Some(2));
    /// ```
    pub fn start_trace(&mut self) -> Option<Trace> {
        self.trace.replace(Trace::new())
    }

    /// Stop tracing executed instructions into a [Trace]. If no trace was active, returns [`None`]
    ///
    /// see [Interpreter::start_trace]
    pub fn end_trace(&mut self) -> Option<Trace> {
        self.trace.take()
    }

    /// Get a view of the current trace
    pub fn show_trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
/// A log of instructions that an [Interpreter] has executed since a call to
/// [Interpreter::start_trace]
///
/// see [Interpreter::start_trace]
pub struct Trace(pub Vec<TracedInstr>);

impl Trace {
    pub(crate) fn push(&mut self, instr: TracedInstr) {
        self.0.push(instr)
    }

    pub(crate) fn new() -> Self {
        Self(Vec::new())
    }
}

impl Debug for TracedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        macro_rules! arg {
            ($arg: ident) => {
                format_args!("{} => {}", $arg.0, $arg.1)
            };
        }
        macro_rules! variant {
            ($name: literal, ($($arg: ident),*)) => {
                f.debug_tuple($name)
                $(.field(&arg!($arg) ))*
                .finish()
            }
        }
        match self {
            Self::Add(a0, a1, a2) => variant!("Add", (a0, a1, a2)),
            Self::Mul(a0, a1, a2) => variant!("Mul", (a0, a1, a2)),
            Self::Ignored(raw) => f.debug_tuple("Ignored").field(raw).finish(),
            Self::Halt => write!(f, "Halt"),
        }
    }
}

impl Debug for TracedInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedInstr")
            .field("op", &self.op)
            .field("op_int", &self.op_int)
            .field("instr_ptr", &self.instr_ptr)
            .finish()
    }
}

impl Display for TracedInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ran instruction at {:0>4}: op int {: <5} | ",
            self.instr_ptr, self.op_int
        )?;

        match self.op {
            TracedOp::Add((pa, va), (pb, vb), (dest, val))
            | TracedOp::Mul((pa, va), (pb, vb), (dest, val)) => {
                let opcode = self.op_code().expect("arithmetic ops have an opcode");
                write!(
                    f,
                    "[{opcode} {pa} (resolves to {va}), {pb} (resolves to {vb}), {dest} (stored {val})]"
                )
            }
            TracedOp::Ignored([a, b, c]) => {
                write!(f, "[skipped unknown opcode, params {a}, {b}, {c}]")
            }
            TracedOp::Halt => {
                write!(f, "[HALT]")
            }
        }
    }
}
