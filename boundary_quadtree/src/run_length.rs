// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run-length encoded value queue.

use std::collections::VecDeque;

/// FIFO of values stored as `(value, count)` runs.
///
/// Adding a value equal to the last run extends that run. Iterating yields each value
/// once per unit of its run, front to back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunLengthQueue<T> {
    runs: VecDeque<(T, u32)>,
    len: u64,
}

impl<T> Default for RunLengthQueue<T> {
    fn default() -> Self {
        Self {
            runs: VecDeque::new(),
            len: 0,
        }
    }
}

impl<T: Copy + PartialEq> RunLengthQueue<T> {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `count` copies of `value`. A zero count is ignored.
    pub fn add(&mut self, value: T, count: u32) {
        if count == 0 {
            return;
        }
        self.len += u64::from(count);
        if let Some((last, n)) = self.runs.back_mut()
            && *last == value
            && let Some(sum) = n.checked_add(count)
        {
            *n = sum;
            return;
        }
        self.runs.push_back((value, count));
    }

    /// Number of values remaining.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// True if nothing remains.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remaining runs, front to back.
    pub fn runs(&self) -> impl Iterator<Item = (T, u32)> + '_ {
        self.runs.iter().copied()
    }
}

impl<T: Copy + PartialEq> Iterator for RunLengthQueue<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let (value, count) = self.runs.front_mut()?;
        let value = *value;
        *count -= 1;
        if *count == 0 {
            self.runs.pop_front();
        }
        self.len -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.len).unwrap_or(usize::MAX);
        (n, usize::try_from(self.len).ok())
    }
}
