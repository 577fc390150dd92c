//! # ASCII Text I/O
//!
//! Helpers for programs that talk in text: input lines are pushed as character codes
//! terminated by newline (10), and output codes in the ASCII range are collected back
//! into a string.

use crate::{ExecutionError, Machine, MemoryBus, RunState};

/// Output drained from a text-speaking machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    /// Every output value in the ASCII range, as text.
    pub text: String,

    /// The first output value outside the ASCII range, typically a numeric answer.
    pub value: Option<i64>,
}

/// Queues `line` as character codes followed by a newline.
pub fn push_line<M: MemoryBus>(machine: &mut Machine<M>, line: &str) {
    machine.extend_input(line.bytes().map(i64::from));
    machine.push_input(i64::from(b'\n'));
}

/// Drains the output channel into a [`Transcript`].
///
/// Values in `0..=127` become characters. Of the values outside that range only the
/// first is kept.
///
/// # Examples
///
/// ```
/// use intcode::ascii::drain_text;
/// use intcode::Machine;
///
/// let mut machine = Machine::parse("104,72,104,105,104,10,104,1234,99").unwrap();
/// machine.run().unwrap();
///
/// let transcript = drain_text(&mut machine);
/// assert_eq!(transcript.text, "Hi\n");
/// assert_eq!(transcript.value, Some(1234));
/// ```
pub fn drain_text<M: MemoryBus>(machine: &mut Machine<M>) -> Transcript {
    let mut transcript = Transcript::default();
    for value in machine.drain_output() {
        match u8::try_from(value) {
            Ok(byte) if byte.is_ascii() => transcript.text.push(char::from(byte)),
            _ => {
                transcript.value.get_or_insert(value);
            }
        }
    }
    transcript
}

/// Sends one line of text, runs, and drains the response.
pub fn send_line<M: MemoryBus>(
    machine: &mut Machine<M>,
    line: &str,
) -> Result<(RunState, Transcript), ExecutionError> {
    push_line(machine, line);
    let state = machine.run()?;
    Ok((state, drain_text(machine)))
}
