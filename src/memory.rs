//! # Memory Bus Abstraction
//!
//! This module provides the `MemoryBus` trait that decouples the machine from a
//! specific working-memory representation. Two implementations are provided:
//!
//! - [`SparseMemory`]: hash map keyed by address (the default)
//! - [`FlatMemory`]: growable vector with lazy zero-fill, spilling far addresses to a map
//!
//! ## Design Principles
//!
//! - Addresses are `u64`; the machine rejects negative addresses before they reach the bus
//! - Reads of never-written addresses return zero
//! - Writes always succeed, at any address, growing storage as needed
//! - Memory is reloaded from the program image on every fresh run

use std::collections::HashMap;

use crate::Program;

/// Working-memory trait for the Intcode machine.
///
/// Implementations must be `Clone` so that a machine can be snapshotted for
/// speculative exploration; a clone must not share storage with the original.
///
/// # Examples
///
/// ```
/// use intcode::{MemoryBus, Program, SparseMemory};
///
/// let program = Program::from(vec![1, 2, 3]);
/// let mut mem = SparseMemory::from_image(&program);
///
/// assert_eq!(mem.read(1), 2);
/// assert_eq!(mem.read(1_000_000), 0);
///
/// mem.write(1_000_000, 42);
/// assert_eq!(mem.read(1_000_000), 42);
/// ```
pub trait MemoryBus: Clone {
    /// Creates memory initialized from a program image.
    fn from_image(program: &Program) -> Self;

    /// Reads the word at `addr`. Never-written addresses read as zero.
    fn read(&self, addr: u64) -> i64;

    /// Writes the word at `addr`, extending storage if necessary.
    fn write(&mut self, addr: u64, value: i64);

    /// Number of words currently backed by storage.
    ///
    /// Useful for diagnostics only; it is not an upper bound on addressable memory.
    fn footprint(&self) -> usize;
}

/// Sparse working memory backed by a hash map.
///
/// Only written (or loaded) addresses occupy storage, so programs that scatter writes
/// far beyond their image cost nothing for the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseMemory {
    cells: HashMap<u64, i64>,
}

impl SparseMemory {
    /// Creates empty memory (every address reads as zero).
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryBus for SparseMemory {
    fn from_image(program: &Program) -> Self {
        Self {
            cells: program.iter().collect(),
        }
    }

    fn read(&self, addr: u64) -> i64 {
        self.cells.get(&addr).copied().unwrap_or(0)
    }

    fn write(&mut self, addr: u64, value: i64) {
        self.cells.insert(addr, value);
    }

    fn footprint(&self) -> usize {
        self.cells.len()
    }
}

/// Highest address (exclusive) that [`FlatMemory`] keeps in its dense vector.
pub const FLAT_DENSE_LIMIT: u64 = 1 << 20;

/// Dense working memory backed by a vector.
///
/// Addresses below [`FLAT_DENSE_LIMIT`] live in a vector that is zero-filled up to the
/// highest written address on demand. Anything above it goes to an overflow map, so a
/// stray write at a huge address costs one entry instead of the whole range below it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatMemory {
    words: Vec<i64>,
    overflow: HashMap<u64, i64>,
}

impl FlatMemory {
    /// Creates empty memory (every address reads as zero).
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryBus for FlatMemory {
    fn from_image(program: &Program) -> Self {
        let mut memory = Self::new();
        for (address, value) in program.iter() {
            memory.write(address, value);
        }
        memory
    }

    fn read(&self, addr: u64) -> i64 {
        if addr >= FLAT_DENSE_LIMIT {
            return self.overflow.get(&addr).copied().unwrap_or(0);
        }
        self.words.get(addr as usize).copied().unwrap_or(0)
    }

    fn write(&mut self, addr: u64, value: i64) {
        if addr >= FLAT_DENSE_LIMIT {
            self.overflow.insert(addr, value);
            return;
        }

        let index = addr as usize;
        if index >= self.words.len() {
            self.words.resize(index + 1, 0);
        }
        self.words[index] = value;
    }

    fn footprint(&self) -> usize {
        self.words.len() + self.overflow.len()
    }
}
