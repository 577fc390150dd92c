//! # Machine Configuration
//!
//! Every behavioural variation of the machine is an independent setting on
//! [`MachineConfig`]:
//!
//! - **Instruction set**: basic (opcodes 1-8, 99; modes 0-1) or extended (adds relative
//!   mode and opcode 9)
//! - **Pause after outputs**: suspend `run()` every N outputs
//! - **Idle input**: substitute a sentinel for missing input and suspend only after a
//!   run of consecutive empty reads
//!
//! Packet forwarding is not part of this value because it carries a channel endpoint;
//! see [`Machine::attach_outbox`](crate::Machine::attach_outbox).

use std::num::{NonZeroU32, NonZeroUsize};

/// Instruction-set version understood by a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InstructionSet {
    /// Opcodes 1-8 and 99 with Position and Immediate modes only.
    Basic,

    /// Full instruction set including Relative mode and opcode 9.
    #[default]
    Extended,
}

impl InstructionSet {
    /// Returns true if Relative mode and AdjustRelativeBase are available.
    pub fn is_extended(self) -> bool {
        matches!(self, InstructionSet::Extended)
    }
}

/// Empty-input policy for machines polled in a network.
///
/// When the input channel is empty, the Input instruction stores `sentinel` and
/// execution continues. After `limit` consecutive empty reads within one `run()` call,
/// the call returns [`RunState::Idle`](crate::RunState::Idle).
///
/// # Examples
///
/// ```
/// use intcode::IdleInput;
///
/// let idle = IdleInput::new(-1, 11).unwrap();
/// assert_eq!(idle.sentinel, -1);
/// assert_eq!(idle.limit.get(), 11);
/// assert!(IdleInput::new(-1, 0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdleInput {
    /// Value stored by Input when no input is queued.
    pub sentinel: i64,

    /// Consecutive empty reads after which `run()` returns.
    pub limit: NonZeroU32,
}

impl IdleInput {
    /// Creates an idle-input policy; returns `None` when `limit` is zero.
    pub fn new(sentinel: i64, limit: u32) -> Option<Self> {
        NonZeroU32::new(limit).map(|limit| Self { sentinel, limit })
    }
}

/// Configuration for a [`Machine`](crate::Machine).
///
/// # Examples
///
/// ```
/// use intcode::{InstructionSet, MachineConfig};
///
/// let config = MachineConfig::default()
///     .with_instruction_set(InstructionSet::Basic)
///     .with_pause_after_outputs(3);
///
/// assert_eq!(config.instruction_set, InstructionSet::Basic);
/// assert_eq!(config.pause_after_outputs.map(|n| n.get()), Some(3));
/// assert_eq!(config.idle_input, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MachineConfig {
    /// Which opcodes and parameter modes are accepted.
    pub instruction_set: InstructionSet,

    /// Suspend after every N-th output since the fresh start; `None` never pauses.
    pub pause_after_outputs: Option<NonZeroUsize>,

    /// Sentinel substitution for empty input; `None` suspends on the first empty read.
    pub idle_input: Option<IdleInput>,
}

impl MachineConfig {
    /// Sets the instruction-set version.
    pub fn with_instruction_set(mut self, instruction_set: InstructionSet) -> Self {
        self.instruction_set = instruction_set;
        self
    }

    /// Pauses `run()` after every `count` outputs. Zero disables pausing.
    pub fn with_pause_after_outputs(mut self, count: usize) -> Self {
        self.pause_after_outputs = NonZeroUsize::new(count);
        self
    }

    /// Enables sentinel substitution for empty input.
    pub fn with_idle_input(mut self, idle_input: IdleInput) -> Self {
        self.idle_input = Some(idle_input);
        self
    }
}
