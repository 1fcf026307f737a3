// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for loading and validating trees.

use thiserror::Error;

/// A node array that does not describe a well-formed lookup tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorruptDataError {
    /// No root node.
    #[error("node array is empty")]
    EmptyNodeArray,
    /// A slot whose bits are not a valid node encoding.
    #[error("slot {index} holds invalid node bits {bits:#010x}")]
    InvalidNode {
        /// Slot of the offending node.
        index: usize,
        /// The raw encoding.
        bits: u32,
    },
    /// A branch whose children fall outside the array.
    #[error("branch at slot {index} points to child {child_index}, but only {node_count} nodes exist")]
    ChildIndexOutOfBounds {
        /// Slot of the branch.
        index: usize,
        /// First child slot it names.
        child_index: usize,
        /// Length of the node array.
        node_count: usize,
    },
    /// The tree shape does not agree with the stated height.
    #[error("tree is inconsistent with height {height}: {detail}")]
    HeightInconsistent {
        /// The stated height.
        height: u32,
        /// What went wrong.
        detail: String,
    },
    /// Persisted parameters naming a grid taller than any tree can hold.
    #[error("vertical power {0} exceeds the maximum height")]
    VerticalPowerTooLarge(u32),
}

/// Failure while saving or loading a persisted tree.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The underlying reader or writer failed, including on truncated input.
    #[error("i/o error")]
    Io(#[from] std::io::Error),
    /// The stream does not start with the expected magic bytes.
    #[error("bad magic: expected {expected:?}, found {found:?}")]
    BadMagic {
        /// Magic for the requested kind of file.
        expected: [u8; 4],
        /// What the stream held.
        found: [u8; 4],
    },
    /// The format version is not one this build can read.
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u16),
    /// The payload decoded but does not form a valid tree.
    #[error("corrupt tree data")]
    Corrupt(#[from] CorruptDataError),
}
