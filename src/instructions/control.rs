//! # Control Flow Instructions
//!
//! This module implements control flow operations:
//! - JNZ: Jump if true (opcode 5)
//! - JZ: Jump if false (opcode 6)
//! - ARB: Adjust relative base (opcode 9)
//! - HALT: Stop the program (opcode 99)
//!
//! A taken jump replaces the instruction pointer instead of advancing it.

use super::{Decoded, Flow};
use crate::machine::{to_address, RunState};
use crate::{ExecutionError, Machine, MemoryBus};

/// Jumps to the second parameter when `taken(first)` holds, else advances.
fn jump_if<M, F>(
    machine: &mut Machine<M>,
    decoded: &Decoded,
    taken: F,
) -> Result<Flow, ExecutionError>
where
    M: MemoryBus,
    F: FnOnce(i64) -> bool,
{
    let condition = machine.read_parameter(decoded, 0)?;
    if taken(condition) {
        let target = machine.read_parameter(decoded, 1)?;
        machine.ip = to_address(target)?;
    } else {
        machine.advance(decoded);
    }
    Ok(Flow::Continue)
}

/// Executes the JNZ instruction.
pub(crate) fn execute_jump_if_true<M: MemoryBus>(
    machine: &mut Machine<M>,
    decoded: &Decoded,
) -> Result<Flow, ExecutionError> {
    jump_if(machine, decoded, |value| value != 0)
}

/// Executes the JZ instruction.
pub(crate) fn execute_jump_if_false<M: MemoryBus>(
    machine: &mut Machine<M>,
    decoded: &Decoded,
) -> Result<Flow, ExecutionError> {
    jump_if(machine, decoded, |value| value == 0)
}

/// Executes the ARB instruction: `relative_base += a`.
pub(crate) fn execute_adjust_relative_base<M: MemoryBus>(
    machine: &mut Machine<M>,
    decoded: &Decoded,
) -> Result<Flow, ExecutionError> {
    let offset = machine.read_parameter(decoded, 0)?;
    machine.relative_base = machine.relative_base.wrapping_add(offset);
    machine.advance(decoded);
    Ok(Flow::Continue)
}

/// Executes the HALT instruction.
///
/// The instruction pointer stays on the Halt word and the machine stops running, so
/// the next `run()` starts fresh.
pub(crate) fn execute_halt<M: MemoryBus>(
    machine: &mut Machine<M>,
    _decoded: &Decoded,
) -> Result<Flow, ExecutionError> {
    machine.running = false;
    Ok(Flow::Suspend(RunState::Halted))
}
