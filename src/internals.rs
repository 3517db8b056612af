// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use super::*;
use crate::trace::TracedInstr;

impl Interpreter {
    /// Reads the int at `address`.
    /// If `address` is outside of memory, instead marks `self` as poisoned and returns the error
    pub(crate) fn checked_access(&mut self, address: i64) -> Result<i64, InterpreterError> {
        let result = self.mem_get(address);
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    /// Turns the destination parameter into a writable address.
    /// If it's outside of memory, it instead marks `self` as poisoned and returns the error
    pub(crate) fn resolve_dest(&mut self, dest: i64) -> Result<i64, InterpreterError> {
        if self.code.get(dest).is_some() {
            Ok(dest)
        } else {
            self.poisoned = true;
            Err(InterpreterError::InvalidAddress {
                address: dest,
                len: self.code.len(),
            })
        }
    }

    /// common logic of the two instructions that combine two addresses into a third
    pub(crate) fn op3(
        &mut self,
        opcode: OpCode,
        operation: impl Fn(i64, i64) -> i64,
    ) -> Result<(), InterpreterError> {
        let [_, pa, pb, pdest] = self
            .code
            .window(self.index)
            .expect("room for the instruction was checked before decoding it");
        let a = self.checked_access(pa)?;
        let b = self.checked_access(pb)?;
        let dest = self.resolve_dest(pdest)?;
        let val = operation(a, b);
        if self.tracing() {
            self.record(TracedInstr::op3(
                self.index,
                opcode,
                [(pa, a), (pb, b), (dest, val)],
            ));
        }
        if let Some(cell) = self.code.get_mut(dest) {
            *cell = val;
        }
        Ok(())
    }

    /// step over an instruction with an opcode that isn't understood
    pub(crate) fn skip_unknown(&mut self, op_int: i64) {
        if self.tracing() {
            let [_, params @ ..] = self
                .code
                .window(self.index)
                .expect("room for the instruction was checked before decoding it");
            self.record(TracedInstr::ignored(self.index, op_int, params));
        }
    }
}
