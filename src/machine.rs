//! # Machine State and Execution
//!
//! This module contains the [`Machine`] struct representing an Intcode computer and
//! its fetch-decode-execute loop.
//!
//! ## Machine State
//!
//! The machine maintains:
//! - **Program image**: immutable, shared with clones
//! - **Working memory**: reloaded from the image on every fresh run
//! - **Instruction pointer** and **relative base**
//! - **Input and output channels**: FIFO queues owned by the machine
//! - **Running flag**: distinguishes "suspended, can resume" from "halted / not started"
//!
//! ## Execution Model
//!
//! - `run()`: start fresh (if not running) or resume, until a suspend point or halt
//! - `run_for()`: the same, bounded by an instruction budget
//!
//! A call never blocks: when input is missing the machine suspends and the caller
//! decides when to resume.

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, trace};

use crate::instructions::{self, Decoded, Flow};
use crate::network::{Outbox, Packet};
use crate::{
    ExecutionError, MachineConfig, MemoryBus, ParameterMode, ParseError, Program, SparseMemory,
};

/// Why a call to [`Machine::run`] returned.
///
/// Every variant except `Halted` leaves the machine running; calling `run()` again
/// resumes exactly where execution stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// The Halt instruction executed. The next `run()` starts fresh.
    Halted,

    /// An Input instruction found the input channel empty. The instruction has not
    /// been consumed.
    AwaitingInput,

    /// The idle-input limit was reached (only with [`IdleInput`](crate::IdleInput)
    /// configured).
    Idle,

    /// The configured output-count threshold was reached.
    OutputPaused,

    /// A complete packet was sent to the attached outbox.
    PacketSent,

    /// The instruction budget given to [`Machine::run_for`] ran out.
    StepLimit,
}

impl RunState {
    /// Returns true if the program has halted.
    pub fn is_halted(self) -> bool {
        matches!(self, RunState::Halted)
    }

    /// Short lowercase name, used by the command-line runner and WASM bindings.
    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Halted => "halted",
            RunState::AwaitingInput => "awaiting-input",
            RunState::Idle => "idle",
            RunState::OutputPaused => "output-paused",
            RunState::PacketSent => "packet-sent",
            RunState::StepLimit => "step-limit",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intcode machine state and execution context.
///
/// The machine is generic over its working-memory implementation via the
/// [`MemoryBus`] trait and defaults to [`SparseMemory`].
///
/// # Examples
///
/// ```
/// use intcode::{Machine, RunState};
///
/// let mut machine = Machine::parse("1,9,10,3,2,3,11,0,99,30,40,50").unwrap();
/// assert_eq!(machine.run().unwrap(), RunState::Halted);
/// assert_eq!(machine.peek(0), 3500);
/// assert!(!machine.is_running());
/// ```
#[derive(Debug, Clone)]
pub struct Machine<M: MemoryBus = SparseMemory> {
    /// Factory-reset image
    program: Program,

    /// Working memory
    pub(crate) memory: M,

    /// Address of the next instruction
    pub(crate) ip: u64,

    /// Offset for Relative-mode parameters
    pub(crate) relative_base: i64,

    pub(crate) input: VecDeque<i64>,
    pub(crate) output: VecDeque<i64>,

    /// True between a fresh start and the next halt
    pub(crate) running: bool,

    /// Outputs emitted since the fresh start
    pub(crate) output_count: usize,

    /// Consecutive empty reads within the current `run()` call
    pub(crate) empty_reads: u32,

    /// Words of a packet still being assembled
    pub(crate) packet: Vec<i64>,

    /// Destination for completed packets; enables packet mode
    pub(crate) outbox: Option<Outbox>,

    pub(crate) config: MachineConfig,
}

impl Machine {
    /// Creates a machine with sparse memory and the default configuration.
    pub fn new(program: Program) -> Self {
        Self::with_config(program, MachineConfig::default())
    }

    /// Parses comma-separated program text and creates a machine for it.
    ///
    /// # Examples
    ///
    /// ```
    /// use intcode::Machine;
    ///
    /// let machine = Machine::parse("99").unwrap();
    /// assert!(!machine.is_running());
    /// assert!(Machine::parse("1,two,3").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Program::parse(text).map(Self::new)
    }
}

impl<M: MemoryBus> Machine<M> {
    /// Creates a machine with an explicit configuration and memory backend.
    ///
    /// Construction does not start execution; memory is loaded from the image so it
    /// can be inspected, and is reloaded again on the first `run()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use intcode::{FlatMemory, Machine, MachineConfig, Program};
    ///
    /// let program = Program::from(vec![1102, 34915192, 34915192, 7, 4, 7, 99, 0]);
    /// let mut machine = Machine::<FlatMemory>::with_config(program, MachineConfig::default());
    /// machine.run().unwrap();
    /// assert_eq!(machine.pop_output(), Some(1219070632396864));
    /// ```
    pub fn with_config(program: Program, config: MachineConfig) -> Self {
        let memory = M::from_image(&program);
        Self {
            program,
            memory,
            ip: 0,
            relative_base: 0,
            input: VecDeque::new(),
            output: VecDeque::new(),
            running: false,
            output_count: 0,
            empty_reads: 0,
            packet: Vec::new(),
            outbox: None,
            config,
        }
    }

    /// Runs until the program halts or suspends.
    ///
    /// If the machine is not running (never started, halted, reset or failed), it first
    /// starts fresh: memory is reloaded from the image, the instruction pointer and
    /// relative base are zeroed, and the output channel, output counter and packet
    /// buffer are cleared. The input channel is left as is.
    ///
    /// # Returns
    ///
    /// - `Ok(RunState::Halted)` when the Halt instruction executes
    /// - `Ok(..)` with a suspension reason otherwise; see [`RunState`]
    /// - `Err(ExecutionError)` on a fatal error, after which the machine is not running
    ///
    /// # Examples
    ///
    /// ```
    /// use intcode::{Machine, RunState};
    ///
    /// // Two sequential inputs, summed and printed
    /// let mut machine = Machine::parse("3,11,3,12,1,11,12,13,4,13,99").unwrap();
    ///
    /// assert_eq!(machine.run().unwrap(), RunState::AwaitingInput);
    /// machine.push_input(20);
    /// assert_eq!(machine.run().unwrap(), RunState::AwaitingInput);
    /// machine.push_input(22);
    /// assert_eq!(machine.run().unwrap(), RunState::Halted);
    /// assert_eq!(machine.drain_output(), vec![42]);
    /// ```
    pub fn run(&mut self) -> Result<RunState, ExecutionError> {
        self.execute(None)
    }

    /// Runs like [`run`](Self::run), but returns [`RunState::StepLimit`] after
    /// `max_instructions` instructions have executed without another stop condition.
    ///
    /// The machine stays resumable after hitting the limit.
    ///
    /// # Examples
    ///
    /// ```
    /// use intcode::{Machine, RunState};
    ///
    /// // Jumps to itself forever
    /// let mut machine = Machine::parse("1105,1,0").unwrap();
    /// assert_eq!(machine.run_for(1000).unwrap(), RunState::StepLimit);
    /// assert!(machine.is_running());
    /// ```
    pub fn run_for(&mut self, max_instructions: u64) -> Result<RunState, ExecutionError> {
        self.execute(Some(max_instructions))
    }

    /// Queues `inputs` and runs.
    pub fn run_with_inputs<I>(&mut self, inputs: I) -> Result<RunState, ExecutionError>
    where
        I: IntoIterator<Item = i64>,
    {
        self.extend_input(inputs);
        self.run()
    }

    /// Forces the next `run()` to start fresh, even if the machine is suspended.
    pub fn reset(&mut self) {
        self.running = false;
    }

    fn start(&mut self) {
        self.memory = M::from_image(&self.program);
        self.ip = 0;
        self.relative_base = 0;
        self.output.clear();
        self.output_count = 0;
        self.packet.clear();
        self.running = true;
        debug!(image_len = self.program.len(), "fresh start");
    }

    fn execute(&mut self, budget: Option<u64>) -> Result<RunState, ExecutionError> {
        if !self.running {
            self.start();
        }
        self.empty_reads = 0;

        let mut executed: u64 = 0;
        loop {
            if budget.is_some_and(|max| executed >= max) {
                debug!(ip = self.ip, executed, "instruction budget exhausted");
                return Ok(RunState::StepLimit);
            }

            match self.step() {
                Ok(Flow::Continue) => executed += 1,
                Ok(Flow::Suspend(state)) => {
                    debug!(ip = self.ip, relative_base = self.relative_base, %state, "run returned");
                    return Ok(state);
                }
                Err(error) => {
                    self.running = false;
                    debug!(ip = self.ip, %error, "execution aborted");
                    return Err(error);
                }
            }
        }
    }

    /// Fetches, decodes and executes one instruction.
    fn step(&mut self) -> Result<Flow, ExecutionError> {
        let word = self.memory.read(self.ip);
        let decoded = instructions::decode(word, self.ip, self.config.instruction_set)?;
        trace!(
            address = decoded.address,
            mnemonic = decoded.opcode.metadata().mnemonic,
            "execute"
        );
        instructions::execute(self, &decoded)
    }

    // ========== Operand Resolution ==========

    /// Raw operand word for parameter `index` (0-based) of the current instruction.
    fn operand_word(&self, decoded: &Decoded, index: usize) -> i64 {
        self.memory
            .read(decoded.address.wrapping_add(1 + index as u64))
    }

    /// Resolves source parameter `index` to a value.
    pub(crate) fn read_parameter(
        &self,
        decoded: &Decoded,
        index: usize,
    ) -> Result<i64, ExecutionError> {
        let raw = self.operand_word(decoded, index);
        match decoded.modes[index] {
            ParameterMode::Position => Ok(self.memory.read(to_address(raw)?)),
            ParameterMode::Immediate => Ok(raw),
            ParameterMode::Relative => {
                let address = to_address(self.relative_base.wrapping_add(raw))?;
                Ok(self.memory.read(address))
            }
        }
    }

    /// Resolves destination parameter `index` to an address.
    pub(crate) fn destination(
        &self,
        decoded: &Decoded,
        index: usize,
    ) -> Result<u64, ExecutionError> {
        let raw = self.operand_word(decoded, index);
        match decoded.modes[index] {
            ParameterMode::Position | ParameterMode::Immediate => to_address(raw),
            ParameterMode::Relative => to_address(self.relative_base.wrapping_add(raw)),
        }
    }

    /// Moves the instruction pointer past the current instruction.
    pub(crate) fn advance(&mut self, decoded: &Decoded) {
        self.ip = decoded
            .address
            .wrapping_add(decoded.opcode.metadata().size());
    }

    // ========== Channels ==========

    /// Appends a value to the input channel.
    pub fn push_input(&mut self, value: i64) {
        self.input.push_back(value);
    }

    /// Appends several values to the input channel, in order.
    pub fn extend_input<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = i64>,
    {
        self.input.extend(values);
    }

    /// Removes and returns the oldest output value.
    pub fn pop_output(&mut self) -> Option<i64> {
        self.output.pop_front()
    }

    /// Removes and returns all pending output values.
    pub fn drain_output(&mut self) -> Vec<i64> {
        self.output.drain(..).collect()
    }

    /// Pending input values.
    pub fn input(&self) -> &VecDeque<i64> {
        &self.input
    }

    /// Mutable access to the input channel.
    pub fn input_mut(&mut self) -> &mut VecDeque<i64> {
        &mut self.input
    }

    /// Output values not yet taken by the caller.
    pub fn output(&self) -> &VecDeque<i64> {
        &self.output
    }

    /// Mutable access to the output channel.
    pub fn output_mut(&mut self) -> &mut VecDeque<i64> {
        &mut self.output
    }

    // ========== Packet Mode ==========

    /// Attaches an outbox and switches the machine to packet mode.
    ///
    /// In packet mode outputs are grouped into `(destination, x, y)` triples and sent
    /// to the outbox instead of the output channel; `run()` returns
    /// [`RunState::PacketSent`] after each packet.
    pub fn attach_outbox(&mut self, outbox: Outbox) {
        self.outbox = Some(outbox);
    }

    /// Detaches the outbox, returning the machine to ordinary output.
    pub fn detach_outbox(&mut self) -> Option<Outbox> {
        self.outbox.take()
    }

    pub(crate) fn emit_packet_word(&mut self, value: i64) -> Result<Flow, ExecutionError> {
        let Some(outbox) = &self.outbox else {
            return Ok(Flow::Continue);
        };

        self.packet.push(value);
        if self.packet.len() < 3 {
            return Ok(Flow::Continue);
        }

        let packet = Packet {
            destination: self.packet[0],
            x: self.packet[1],
            y: self.packet[2],
        };
        self.packet.clear();
        outbox.send(packet)?;
        Ok(Flow::Suspend(RunState::PacketSent))
    }

    // ========== State Getters ==========

    /// Returns true between a fresh start and the next halt (or error or reset).
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Address of the next instruction to decode.
    pub fn instruction_pointer(&self) -> u64 {
        self.ip
    }

    /// Current relative base.
    pub fn relative_base(&self) -> i64 {
        self.relative_base
    }

    /// Outputs emitted since the last fresh start.
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// The immutable program image.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Working memory.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Reads working memory at `address`.
    pub fn peek(&self, address: u64) -> i64 {
        self.memory.read(address)
    }

    /// Writes working memory at `address`.
    ///
    /// The write is lost on the next fresh start; patch the [`Program`] instead to
    /// change what every run sees.
    pub fn poke(&mut self, address: u64, value: i64) {
        self.memory.write(address, value);
    }

    /// The active configuration.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Changes the output-pause threshold. Zero disables pausing.
    pub fn set_pause_after_outputs(&mut self, count: usize) {
        self.config = self.config.with_pause_after_outputs(count);
    }
}

/// Converts a resolved operand into a memory address.
pub(crate) fn to_address(value: i64) -> Result<u64, ExecutionError> {
    u64::try_from(value).map_err(|_| ExecutionError::NegativeAddress { address: value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FlatMemory, IdleInput, InstructionSet};

    fn run_to_halt(text: &str) -> Machine {
        let mut machine = Machine::parse(text).unwrap();
        assert_eq!(machine.run().unwrap(), RunState::Halted);
        machine
    }

    #[test]
    fn test_machine_initialization() {
        let machine = Machine::parse("1,0,0,0,99").unwrap();

        assert!(!machine.is_running());
        assert_eq!(machine.instruction_pointer(), 0);
        assert_eq!(machine.relative_base(), 0);
        assert_eq!(machine.output_count(), 0);
        assert!(machine.input().is_empty());
        assert!(machine.output().is_empty());
        assert_eq!(machine.peek(4), 99);
    }

    #[test]
    fn test_add_multiply_evaluator() {
        assert_eq!(run_to_halt("1,0,0,0,99").peek(0), 2);
        assert_eq!(run_to_halt("2,3,0,3,99").peek(3), 6);
        assert_eq!(run_to_halt("2,4,4,5,99,0").peek(5), 9801);
        let machine = run_to_halt("1,1,1,4,99,5,6,0,99");
        assert_eq!(machine.peek(0), 30);
        assert_eq!(machine.peek(4), 2);
    }

    #[test]
    fn test_immediate_multiply() {
        assert_eq!(run_to_halt("1002,4,3,4,33").peek(4), 99);
    }

    #[test]
    fn test_negative_immediate() {
        assert_eq!(run_to_halt("1101,100,-1,4,0").peek(4), 99);
    }

    #[test]
    fn test_halt_leaves_pointer_on_halt() {
        let machine = run_to_halt("1101,1,1,5,99,0");
        assert_eq!(machine.instruction_pointer(), 4);
    }

    #[test]
    fn test_fresh_start_after_halt_reloads_memory() {
        let mut machine = Machine::parse("1,0,0,0,99").unwrap();
        machine.run().unwrap();
        assert_eq!(machine.peek(0), 2);

        // Running again starts from the image, not from the mutated memory
        machine.run().unwrap();
        assert_eq!(machine.peek(0), 2);
    }

    #[test]
    fn test_fresh_start_clears_output_but_not_input() {
        let mut machine = Machine::parse("104,7,99").unwrap();
        machine.run().unwrap();
        machine.push_input(5);
        machine.run().unwrap();

        assert_eq!(machine.drain_output(), vec![7]);
        assert_eq!(machine.input().len(), 1);
    }

    #[test]
    fn test_suspend_keeps_pointer_on_input() {
        let mut machine = Machine::parse("1101,2,3,9,3,10,4,10,99").unwrap();
        assert_eq!(machine.run().unwrap(), RunState::AwaitingInput);
        assert_eq!(machine.instruction_pointer(), 4);
        assert_eq!(machine.peek(9), 5);

        machine.push_input(-8);
        assert_eq!(machine.run().unwrap(), RunState::Halted);
        assert_eq!(machine.drain_output(), vec![-8]);
    }

    #[test]
    fn test_reset_forces_fresh_start() {
        let mut machine = Machine::parse("104,1,3,0,104,2,99").unwrap();
        assert_eq!(machine.run().unwrap(), RunState::AwaitingInput);
        assert_eq!(machine.output().len(), 1);

        machine.reset();
        assert!(!machine.is_running());
        assert_eq!(machine.run().unwrap(), RunState::AwaitingInput);
        // Output was cleared by the fresh start, then refilled
        assert_eq!(machine.drain_output(), vec![1]);
    }

    #[test]
    fn test_relative_base_writes_beyond_image() {
        // rb = 2000; mem[rb + 5] = 11; output mem[2005]
        let mut machine = Machine::parse("109,2000,21101,5,6,5,204,5,99").unwrap();
        assert_eq!(machine.run().unwrap(), RunState::Halted);
        assert_eq!(machine.relative_base(), 2000);
        assert_eq!(machine.peek(2005), 11);
        assert_eq!(machine.drain_output(), vec![11]);
    }

    #[test]
    fn test_unread_addresses_default_to_zero() {
        let mut machine = Machine::parse("4,1000,99").unwrap();
        machine.run().unwrap();
        assert_eq!(machine.drain_output(), vec![0]);
    }

    #[test]
    fn test_negative_address_is_fatal() {
        let mut machine = Machine::parse("4,-1,99").unwrap();
        assert_eq!(
            machine.run(),
            Err(ExecutionError::NegativeAddress { address: -1 })
        );
        assert!(!machine.is_running());
    }

    #[test]
    fn test_negative_relative_destination_is_fatal() {
        let mut machine = Machine::parse("109,-5,21101,1,1,0,99").unwrap();
        assert_eq!(
            machine.run(),
            Err(ExecutionError::NegativeAddress { address: -5 })
        );
    }

    #[test]
    fn test_unknown_opcode_is_fatal() {
        let mut machine = Machine::parse("1101,1,1,5,77").unwrap();
        assert_eq!(
            machine.run(),
            Err(ExecutionError::InvalidOpcode {
                opcode: 77,
                address: 4
            })
        );
    }

    #[test]
    fn test_basic_instruction_set_rejects_opcode_nine() {
        let config = MachineConfig::default().with_instruction_set(InstructionSet::Basic);
        let mut machine: Machine = Machine::with_config(Program::from(vec![109, 1, 99]), config);
        assert_eq!(
            machine.run(),
            Err(ExecutionError::InvalidOpcode {
                opcode: 9,
                address: 0
            })
        );
    }

    #[test]
    fn test_output_threshold() {
        let program = Program::from(vec![104, 1, 104, 2, 104, 3, 104, 4, 104, 5, 99]);
        let config = MachineConfig::default().with_pause_after_outputs(2);
        let mut machine: Machine = Machine::with_config(program, config);

        assert_eq!(machine.run().unwrap(), RunState::OutputPaused);
        assert_eq!(machine.drain_output(), vec![1, 2]);
        assert_eq!(machine.run().unwrap(), RunState::OutputPaused);
        assert_eq!(machine.drain_output(), vec![3, 4]);
        assert_eq!(machine.run().unwrap(), RunState::Halted);
        assert_eq!(machine.drain_output(), vec![5]);
        assert_eq!(machine.output_count(), 5);
    }

    #[test]
    fn test_idle_input_substitutes_sentinel() {
        // Read twice into 20 and 21, output both
        let program = Program::parse("3,20,3,21,4,20,4,21,99").unwrap();
        let idle = IdleInput::new(-1, 3).unwrap();
        let mut machine: Machine =
            Machine::with_config(program, MachineConfig::default().with_idle_input(idle));

        machine.push_input(9);
        assert_eq!(machine.run().unwrap(), RunState::Halted);
        assert_eq!(machine.drain_output(), vec![9, -1]);
    }

    #[test]
    fn test_idle_input_suspends_after_limit() {
        // Read forever into 20
        let program = Program::parse("3,20,1105,1,0").unwrap();
        let idle = IdleInput::new(-1, 4).unwrap();
        let mut machine: Machine =
            Machine::with_config(program, MachineConfig::default().with_idle_input(idle));

        assert_eq!(machine.run().unwrap(), RunState::Idle);
        assert_eq!(machine.peek(20), -1);
        // The fourth empty read was consumed; the pointer moved past it
        assert_eq!(machine.instruction_pointer(), 2);

        // A queued value resets the streak
        machine.push_input(6);
        assert_eq!(machine.run().unwrap(), RunState::Idle);
        assert_eq!(machine.peek(20), -1);
    }

    #[test]
    fn test_step_limit_is_resumable() {
        let mut machine = Machine::parse("1101,1,1,20,1101,2,2,21,99").unwrap();
        assert_eq!(machine.run_for(1).unwrap(), RunState::StepLimit);
        assert_eq!(machine.instruction_pointer(), 4);
        assert_eq!(machine.peek(20), 2);
        assert_eq!(machine.peek(21), 0);

        assert_eq!(machine.run().unwrap(), RunState::Halted);
        assert_eq!(machine.peek(21), 4);
    }

    #[test]
    fn test_flat_memory_backend() {
        let program = Program::parse("109,50,21101,3,4,0,204,0,99").unwrap();
        let mut machine = Machine::<FlatMemory>::with_config(program, MachineConfig::default());
        machine.run().unwrap();
        assert_eq!(machine.drain_output(), vec![7]);
        assert!(machine.memory().footprint() >= 51);
    }

    #[test]
    fn test_run_state_names() {
        assert_eq!(RunState::AwaitingInput.to_string(), "awaiting-input");
        assert!(RunState::Halted.is_halted());
        assert!(!RunState::Idle.is_halted());
    }
}
