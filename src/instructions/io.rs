//! # Input/Output Instructions
//!
//! This module implements the two instructions that touch the machine's channels:
//! - IN: Input (opcode 3)
//! - OUT: Output (opcode 4)
//!
//! These are the only instructions that can suspend a run:
//!
//! | Condition | Result |
//! |-----------|--------|
//! | IN with empty input, no idle policy | suspend before consuming the instruction |
//! | IN with empty input, idle policy | store sentinel; suspend once the streak hits the limit |
//! | OUT with pause threshold reached | suspend after emitting |
//! | OUT completing a packet (outbox attached) | send packet, suspend |

use super::{Decoded, Flow};
use crate::machine::RunState;
use crate::{ExecutionError, Machine, MemoryBus};

/// Executes the IN instruction.
pub(crate) fn execute_input<M: MemoryBus>(
    machine: &mut Machine<M>,
    decoded: &Decoded,
) -> Result<Flow, ExecutionError> {
    if machine.input.is_empty() && machine.config.idle_input.is_none() {
        return Ok(Flow::Suspend(RunState::AwaitingInput));
    }

    // Resolve first so a bad destination leaves the input queue intact
    let destination = machine.destination(decoded, 0)?;
    let value = match (machine.input.pop_front(), machine.config.idle_input) {
        (Some(value), _) => {
            machine.empty_reads = 0;
            value
        }
        (None, Some(idle)) => {
            machine.empty_reads += 1;
            idle.sentinel
        }
        (None, None) => return Ok(Flow::Suspend(RunState::AwaitingInput)),
    };

    machine.memory.write(destination, value);
    machine.advance(decoded);

    match machine.config.idle_input {
        Some(idle) if machine.empty_reads >= idle.limit.get() => {
            Ok(Flow::Suspend(RunState::Idle))
        }
        _ => Ok(Flow::Continue),
    }
}

/// Executes the OUT instruction.
pub(crate) fn execute_output<M: MemoryBus>(
    machine: &mut Machine<M>,
    decoded: &Decoded,
) -> Result<Flow, ExecutionError> {
    let value = machine.read_parameter(decoded, 0)?;
    machine.advance(decoded);

    if machine.outbox.is_some() {
        return machine.emit_packet_word(value);
    }

    machine.output.push_back(value);
    machine.output_count += 1;

    match machine.config.pause_after_outputs {
        Some(threshold) if machine.output_count % threshold.get() == 0 => {
            Ok(Flow::Suspend(RunState::OutputPaused))
        }
        _ => Ok(Flow::Continue),
    }
}

#[cfg(test)]
mod tests {
    use crate::{ExecutionError, Machine, MachineConfig, Mailbox, Packet, Program, RunState};

    #[test]
    fn test_echo() {
        let mut machine = Machine::parse("3,0,4,0,99").unwrap();
        machine.push_input(-31);
        assert_eq!(machine.run().unwrap(), RunState::Halted);
        assert_eq!(machine.drain_output(), vec![-31]);
    }

    #[test]
    fn test_relative_input_destination() {
        // rb = 100; mem[rb + 3] = input; output mem[103]
        let mut machine = Machine::parse("109,100,203,3,4,103,99").unwrap();
        machine.push_input(17);
        machine.run().unwrap();
        assert_eq!(machine.drain_output(), vec![17]);
    }

    #[test]
    fn test_bad_destination_keeps_input() {
        let mut machine = Machine::parse("3,-1,99").unwrap();
        machine.push_input(5);
        assert_eq!(
            machine.run(),
            Err(ExecutionError::NegativeAddress { address: -1 })
        );
        assert_eq!(machine.input().iter().copied().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_quine() {
        let text = "109,1,204,-1,1001,100,1,100,1008,100,16,101,1006,101,0,99";
        let mut machine = Machine::parse(text).unwrap();
        assert_eq!(machine.run().unwrap(), RunState::Halted);
        assert_eq!(machine.drain_output(), machine.program().to_vec());
    }

    #[test]
    fn test_packet_mode_sends_triples() {
        let (outbox, mailbox) = Mailbox::channel();
        let program = Program::from(vec![104, 3, 104, 10, 104, 20, 104, 4, 99]);
        let mut machine: Machine = Machine::with_config(program, MachineConfig::default());
        machine.attach_outbox(outbox);

        assert_eq!(machine.run().unwrap(), RunState::PacketSent);
        assert_eq!(
            mailbox.drain(),
            vec![Packet {
                destination: 3,
                x: 10,
                y: 20
            }]
        );
        assert!(machine.output().is_empty());

        // The fourth word stays buffered until two more arrive
        assert_eq!(machine.run().unwrap(), RunState::Halted);
        assert!(mailbox.drain().is_empty());
    }

    #[test]
    fn test_packet_survives_suspension() {
        let (outbox, mailbox) = Mailbox::channel();
        // out 1; in; out mem[30]; out 7
        let program = Program::from(vec![104, 1, 3, 30, 4, 30, 104, 7, 99]);
        let mut machine: Machine = Machine::with_config(program, MachineConfig::default());
        machine.attach_outbox(outbox);

        assert_eq!(machine.run().unwrap(), RunState::AwaitingInput);
        machine.push_input(5);
        assert_eq!(machine.run().unwrap(), RunState::PacketSent);
        assert_eq!(
            mailbox.drain(),
            vec![Packet {
                destination: 1,
                x: 5,
                y: 7
            }]
        );
    }
}
