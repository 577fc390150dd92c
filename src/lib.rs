//! # Intcode Virtual Machine
//!
//! A resumable interpreter for the Intcode instruction set: a register-less,
//! memory-addressed machine with three parameter modes, sparse unbounded memory and
//! FIFO input/output channels.
//!
//! ## Quick Start
//!
//! ```rust
//! use intcode::{Machine, RunState};
//!
//! // Reads one value and echoes it back, then halts
//! let mut machine = Machine::parse("3,0,4,0,99").unwrap();
//!
//! // No input queued yet: the machine suspends on the Input instruction
//! assert_eq!(machine.run().unwrap(), RunState::AwaitingInput);
//! assert!(machine.is_running());
//!
//! // Resume with a value
//! machine.push_input(42);
//! assert_eq!(machine.run().unwrap(), RunState::Halted);
//! assert_eq!(machine.pop_output(), Some(42));
//! ```
//!
//! ## Architecture
//!
//! - **Suspend/resume**: `run()` returns at well-defined points (empty input, output
//!   threshold, forwarded packet, halt) and never blocks
//! - **Configuration over copies**: instruction-set version, output pausing and idle
//!   input are independent settings on [`MachineConfig`]
//! - **Trait-based memory**: working memory sits behind the [`MemoryBus`] trait
//! - **Table-driven decoding**: opcode metadata lives in a single [`OPCODE_TABLE`]
//! - **Snapshots by `Clone`**: a cloned machine shares nothing mutable with its origin
//!
//! ## Modules
//!
//! - `machine` - Machine state and the run loop
//! - `memory` - MemoryBus trait and implementations
//! - `program` - Immutable program images
//! - `opcodes` - Opcode metadata table
//! - `addressing` - Parameter modes
//! - `config` - Machine configuration
//! - `network` - Packet outbox and round-robin network scheduler
//! - `pipeline` - Chained amplifier machines
//! - `explore` - Clone-based breadth-first exploration
//! - `ascii` - Text input/output helpers
//! - `disassembler` - Program listings

pub mod addressing;
pub mod ascii;
pub mod config;
pub mod disassembler;
pub mod explore;
pub mod machine;
pub mod memory;
pub mod network;
pub mod opcodes;
pub mod pipeline;
pub mod program;

// Internal instruction implementations (not part of public API)
mod instructions;

pub mod wasm;

// Re-export public API
pub use addressing::ParameterMode;
pub use config::{IdleInput, InstructionSet, MachineConfig};
pub use disassembler::{disassemble, Instruction};
pub use explore::{explore, Exploration, Verdict};
pub use machine::{Machine, RunState};
pub use memory::{FlatMemory, MemoryBus, SparseMemory};
pub use network::{Mailbox, Network, NetworkError, Outbox, Packet, TickReport, NAT_ADDRESS};
pub use opcodes::{Opcode, OpcodeMetadata, OPCODE_TABLE};
pub use pipeline::{Pipeline, PipelineError};
pub use program::{ParseError, Program};

use thiserror::Error;

/// Errors that abort machine execution.
///
/// None of these are recoverable: the machine stops running and the next `run()`
/// starts fresh from the program image. Expected suspensions are not errors; they are
/// reported through [`RunState`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The instruction word does not name a known opcode for the configured
    /// instruction set.
    #[error("invalid opcode {opcode} at address {address}")]
    InvalidOpcode { opcode: i64, address: u64 },

    /// A parameter used by the instruction has an unknown or unsupported mode digit.
    #[error("invalid mode {mode} for parameter {parameter} of instruction at address {address}")]
    InvalidParameterMode {
        mode: i64,
        /// One-based parameter position.
        parameter: u8,
        address: u64,
    },

    /// An operand resolved to a negative memory address or jump target.
    #[error("negative memory address {address}")]
    NegativeAddress { address: i64 },

    /// The machine emitted a packet but the receiving mailbox has been dropped.
    #[error("packet outbox is disconnected")]
    OutboxDisconnected,
}
