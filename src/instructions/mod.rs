//! # Intcode Instruction Implementations
//!
//! This module decodes instruction words and contains the implementations of all
//! Intcode instructions, organized by category. Each instruction is a standalone
//! function that takes a mutable reference to the machine and the decoded instruction,
//! and is responsible for advancing the instruction pointer.
//!
//! ## Categories
//!
//! - **arithmetic**: Add, Multiply, LessThan, Equals
//! - **control**: JumpIfTrue, JumpIfFalse, AdjustRelativeBase, Halt
//! - **io**: Input, Output

pub mod arithmetic;
pub mod control;
pub mod io;

use crate::machine::RunState;
use crate::{ExecutionError, InstructionSet, Machine, MemoryBus, Opcode, ParameterMode};

/// Largest instruction word: two opcode digits plus three mode digits.
const MAX_INSTRUCTION_WORD: i64 = 99_999;

/// An instruction word split into its opcode and per-parameter modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Decoded {
    /// Address of the instruction word.
    pub address: u64,
    pub opcode: Opcode,
    /// Modes for parameters 1-3. Entries past the opcode's parameter count are
    /// `Position` and carry no meaning.
    pub modes: [ParameterMode; 3],
}

/// What the run loop does after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Suspend(RunState),
}

/// Decodes the instruction word found at `address`.
///
/// Mode digits are only validated for parameters the opcode actually has; leftover
/// digits of a shorter instruction are ignored.
pub(crate) fn decode(
    word: i64,
    address: u64,
    instruction_set: InstructionSet,
) -> Result<Decoded, ExecutionError> {
    if !(0..=MAX_INSTRUCTION_WORD).contains(&word) {
        return Err(ExecutionError::InvalidOpcode {
            opcode: word,
            address,
        });
    }

    let code = word % 100;
    let opcode = Opcode::from_code(code).ok_or(ExecutionError::InvalidOpcode {
        opcode: code,
        address,
    })?;
    let metadata = opcode.metadata();
    if metadata.extended && !instruction_set.is_extended() {
        return Err(ExecutionError::InvalidOpcode {
            opcode: code,
            address,
        });
    }

    let mut modes = [ParameterMode::Position; 3];
    let mut digits = word / 100;
    for (index, slot) in modes
        .iter_mut()
        .enumerate()
        .take(metadata.parameter_count as usize)
    {
        let digit = digits % 10;
        digits /= 10;

        let mode = ParameterMode::from_digit(digit)
            .filter(|mode| *mode != ParameterMode::Relative || instruction_set.is_extended())
            .ok_or(ExecutionError::InvalidParameterMode {
                mode: digit,
                parameter: index as u8 + 1,
                address,
            })?;
        *slot = mode;
    }

    Ok(Decoded {
        address,
        opcode,
        modes,
    })
}

/// Dispatches a decoded instruction to its implementation.
pub(crate) fn execute<M: MemoryBus>(
    machine: &mut Machine<M>,
    instruction: &Decoded,
) -> Result<Flow, ExecutionError> {
    match instruction.opcode {
        Opcode::Add => arithmetic::execute_add(machine, instruction),
        Opcode::Multiply => arithmetic::execute_multiply(machine, instruction),
        Opcode::LessThan => arithmetic::execute_less_than(machine, instruction),
        Opcode::Equals => arithmetic::execute_equals(machine, instruction),
        Opcode::Input => io::execute_input(machine, instruction),
        Opcode::Output => io::execute_output(machine, instruction),
        Opcode::JumpIfTrue => control::execute_jump_if_true(machine, instruction),
        Opcode::JumpIfFalse => control::execute_jump_if_false(machine, instruction),
        Opcode::AdjustRelativeBase => control::execute_adjust_relative_base(machine, instruction),
        Opcode::Halt => control::execute_halt(machine, instruction),
    }
}
