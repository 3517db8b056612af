//! Test that examples from the Advent of Code day 2 description behave as described.
// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use either::Either;
use intcode::prelude::*;
use intcode::trace::{Trace, TracedInstr};
use intcode::{InterpreterError, OpCode};
use itertools::Itertools;

// first, some groundwork for common elements of different tests

/// Construct a new interpreter with the given starting code
macro_rules! interp {
    [$($i:expr),*] => {{
        Interpreter::new([$($i),*])
    }}
}

/// Run an interpreter to end, returning its memory afterwards.
/// Borrows the interpreter in case it's trace is useful
fn run_to_end(interp: &mut Interpreter) -> Result<Vec<i64>, Either<InterpreterError, State>> {
    let state = interp.run().map_err(Either::Left)?;
    if state == State::Halted {
        Ok(interp.memory().as_slice().to_vec())
    } else {
        Err(Either::Right(state))
    }
}

/// A struct with the information about expected traced instruction
struct ExpectedOp {
    op_int: i64,
    instr_ptr: usize,
    stored_val: Option<i64>,
}

impl ExpectedOp {
    const fn new(op_int: i64, instr_ptr: usize, stored_val: Option<i64>) -> Self {
        Self {
            op_int,
            instr_ptr,
            stored_val,
        }
    }

    fn validate(self, traced: TracedInstr) {
        assert_eq!(self.op_int, traced.op_int());
        assert_eq!(self.instr_ptr, traced.instr_ptr());
        assert_eq!(self.stored_val, traced.stored_val());
    }
}

fn validate_trace(expected: impl IntoIterator<Item = ExpectedOp>, Trace(trace): Trace) {
    expected
        .into_iter()
        .zip_eq(trace)
        .for_each(|(op, instr)| op.validate(instr))
}

mod part1 {
    use crate::*;

    /// the extended example used to help illustrate the basics
    #[test]
    fn extended_example() {
        let mut interp = interp![1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50];
        interp.start_trace();
        let memory = run_to_end(&mut interp).unwrap();
        assert_eq!(memory, vec![3500, 9, 10, 70, 2, 3, 11, 0, 99, 30, 40, 50]);
        const EXPECTED: [ExpectedOp; 3] = [
            ExpectedOp::new(1, 0, Some(70)),
            ExpectedOp::new(2, 4, Some(3500)),
            ExpectedOp::new(99, 8, None),
        ];
        validate_trace(EXPECTED, interp.end_trace().unwrap());
    }

    /// seeding the extended example with the noun and verb it already has changes nothing
    #[test]
    fn extended_example_seeded() {
        let code = [1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50];
        assert_eq!(execute(code, 0, 9, 10), Ok(3500));
        assert_eq!(
            Driver::new(Snapshot::new(code)).run(Mode::Fixed { noun: 9, verb: 10 }).unwrap(),
            Outcome::Value(3500)
        );
    }

    /// the extra, smaller examples that are listed after the extended example
    #[test]
    fn small_examples() {
        macro_rules! example {
            ($($code: literal),+ becomes $($output: literal),+) => {{
                let mut interp = interp![$($code),*];
                let memory = run_to_end(&mut interp).unwrap();
                assert_eq!(memory, vec![$($output),+]);
            }}
        }
        example!(1,0,0,0,99 becomes 2,0,0,0,99);
        example!(2,3,0,3,99 becomes 2,3,0,6,99);
        example!(2,4,4,5,99,0 becomes 2,4,4,5,99,9801);
        example!(1,1,1,4,99,5,6,0,99 becomes 30,1,1,4,2,5,6,0,99);
    }

    /// the last small example overwrites a `HALT` before reaching it
    #[test]
    fn self_modifying_trace() {
        let mut interp = interp![1, 1, 1, 4, 99, 5, 6, 0, 99];
        interp.start_trace();
        run_to_end(&mut interp).unwrap();
        let Trace(trace) = interp.end_trace().unwrap();
        assert_eq!(
            trace.iter().map(TracedInstr::op_code).collect_vec(),
            vec![Some(OpCode::Add), Some(OpCode::Mul)]
        );
        assert_eq!(trace[1].params(), vec![(5, 5), (6, 6), (0, 30)]);
    }
}

mod halting {
    use crate::*;

    #[test]
    fn halt_at_every_boundary() {
        for len in 3..=12 {
            let code = (0..len).map(|i| if i % 4 == 0 { 99 } else { 0 }).collect_vec();
            let mut interp = Interpreter::new(code.clone());
            interp.start_trace();
            assert_eq!(run_to_end(&mut interp).unwrap(), code);
            let Trace(trace) = interp.end_trace().unwrap();
            // only a complete 4-int window is ever decoded
            assert_eq!(trace.len(), usize::from(len >= 4), "length {len}");
        }
    }

    #[test]
    fn unknown_opcodes_run_to_the_end() {
        let mut interp = interp![5, 0, 0, 0, 6, 0, 0, 0, 1, 0, 0, 0];
        interp.start_trace();
        let memory = run_to_end(&mut interp).unwrap();
        assert_eq!(memory[0], 10);
        assert_eq!(interp.index(), 12);
        let Trace(trace) = interp.end_trace().unwrap();
        assert_eq!(
            trace.iter().map(TracedInstr::op_int).collect_vec(),
            vec![5, 6, 1]
        );
    }

    #[test]
    fn strict_policy_stops_at_the_unknown_opcode() {
        let mut interp = Interpreter::with_policy(
            [1, 0, 0, 0, 42, 0, 0, 0, 99, 0, 0, 0],
            UnknownOpcodePolicy::Fail,
        );
        assert_eq!(
            run_to_end(&mut interp),
            Err(Either::Left(InterpreterError::UnrecognizedOpcode(42)))
        );
        assert_eq!(interp.index(), 4);
        assert_eq!(interp[0], 2);
    }
}
