// SPDX-FileCopyrightText: 2025 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use itertools::Itertools;
use std::fmt;
use std::ops::Index;

/// A fixed-length, owned buffer of intcode memory.
///
/// The length is set when the buffer is built and never changes afterwards. Every access goes
/// through a signed address, as that's what the ints stored in memory are, and addresses outside
/// of `0..len` are reported as [`None`] rather than wrapping or growing the buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory(Box<[i64]>);

impl Memory {
    /// The number of cells in the buffer
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the buffer holds no cells at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn slot(&self, address: i64) -> Option<usize> {
        usize::try_from(address).ok().filter(|&i| i < self.0.len())
    }

    /// Get the int at `address`, if it's in range
    pub fn get(&self, address: i64) -> Option<i64> {
        self.slot(address).map(|i| self.0[i])
    }

    /// Get a mutable reference to the int at `address`, if it's in range
    pub fn get_mut(&mut self, address: i64) -> Option<&mut i64> {
        self.slot(address).map(|i| &mut self.0[i])
    }

    /// The number of cells from `start` to the end of the buffer, saturating at zero
    pub fn remaining(&self, start: usize) -> usize {
        self.0.len().saturating_sub(start)
    }

    /// The four cells making up the instruction at `start`, if there's room for all of them
    pub fn window(&self, start: usize) -> Option<[i64; 4]> {
        let end = start.checked_add(4)?;
        self.0.get(start..end)?.try_into().ok()
    }

    /// View the whole buffer as a slice
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    /// Consume the buffer, returning its cells
    pub fn into_vec(self) -> Vec<i64> {
        self.0.into_vec()
    }
}

impl From<Vec<i64>> for Memory {
    fn from(v: Vec<i64>) -> Self {
        Self(v.into_boxed_slice())
    }
}

impl From<&[i64]> for Memory {
    fn from(s: &[i64]) -> Self {
        Self(Box::from(s))
    }
}

impl<const N: usize> From<[i64; N]> for Memory {
    fn from(a: [i64; N]) -> Self {
        Self(Box::new(a))
    }
}

impl std::iter::FromIterator<i64> for Memory {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Index<usize> for Memory {
    type Output = i64;
    fn index(&self, i: usize) -> &i64 {
        &self.0[i]
    }
}

impl IntoIterator for Memory {
    type Item = i64;
    type IntoIter = std::vec::IntoIter<i64>;
    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "[{}]", self.0.iter().join(", "))
    }
}

impl fmt::Display for Memory {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}", self.0.iter().join(","))
    }
}
