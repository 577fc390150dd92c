//! # Arithmetic and Comparison Instructions
//!
//! This module implements the three-operand instructions that combine two source
//! values and store the result:
//! - ADD: Add (opcode 1)
//! - MUL: Multiply (opcode 2)
//! - LT: Less Than (opcode 7)
//! - EQ: Equals (opcode 8)
//!
//! Arithmetic wraps on 64-bit overflow rather than panicking.

use super::{Decoded, Flow};
use crate::{ExecutionError, Machine, MemoryBus};

/// Reads both sources, stores `op(a, b)` at the destination and advances.
fn store_binary<M, F>(
    machine: &mut Machine<M>,
    decoded: &Decoded,
    op: F,
) -> Result<Flow, ExecutionError>
where
    M: MemoryBus,
    F: FnOnce(i64, i64) -> i64,
{
    let a = machine.read_parameter(decoded, 0)?;
    let b = machine.read_parameter(decoded, 1)?;
    let destination = machine.destination(decoded, 2)?;

    machine.memory.write(destination, op(a, b));
    machine.advance(decoded);

    Ok(Flow::Continue)
}

/// Executes the ADD instruction: `mem[dst] = a + b`.
pub(crate) fn execute_add<M: MemoryBus>(
    machine: &mut Machine<M>,
    decoded: &Decoded,
) -> Result<Flow, ExecutionError> {
    store_binary(machine, decoded, i64::wrapping_add)
}

/// Executes the MUL instruction: `mem[dst] = a * b`.
pub(crate) fn execute_multiply<M: MemoryBus>(
    machine: &mut Machine<M>,
    decoded: &Decoded,
) -> Result<Flow, ExecutionError> {
    store_binary(machine, decoded, i64::wrapping_mul)
}

/// Executes the LT instruction: `mem[dst] = 1` if `a < b`, else 0.
pub(crate) fn execute_less_than<M: MemoryBus>(
    machine: &mut Machine<M>,
    decoded: &Decoded,
) -> Result<Flow, ExecutionError> {
    store_binary(machine, decoded, |a, b| i64::from(a < b))
}

/// Executes the EQ instruction: `mem[dst] = 1` if `a == b`, else 0.
pub(crate) fn execute_equals<M: MemoryBus>(
    machine: &mut Machine<M>,
    decoded: &Decoded,
) -> Result<Flow, ExecutionError> {
    store_binary(machine, decoded, |a, b| i64::from(a == b))
}
