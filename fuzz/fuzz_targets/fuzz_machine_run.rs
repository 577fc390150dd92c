//! Fuzz target for bounded machine execution.
//!
//! This target builds arbitrary program images and input queues, then runs the
//! machine under an instruction budget to find panics in decoding, addressing and
//! the suspend/resume bookkeeping.

#![no_main]

use arbitrary::Arbitrary;
use intcode::{InstructionSet, Machine, MachineConfig, Program, RunState};
use libfuzzer_sys::fuzz_target;

/// Instruction budget per run call
const MAX_STEPS: u64 = 10_000;

/// Machine configuration for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzConfig {
    /// Use the basic instruction set
    basic: bool,
    /// Output pause threshold (0 disables)
    pause_after: u8,
}

/// Complete fuzz input
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    /// Program image, starting at address 0
    words: Vec<i64>,
    /// Values queued before the first run
    inputs: Vec<i64>,
    /// Number of resume attempts
    resumes: u8,
    config: FuzzConfig,
}

fuzz_target!(|input: FuzzInput| {
    // Limit input size to keep each iteration fast
    if input.words.len() > 4096 || input.inputs.len() > 256 {
        return;
    }

    let instruction_set = if input.config.basic {
        InstructionSet::Basic
    } else {
        InstructionSet::Extended
    };
    let config = MachineConfig::default()
        .with_instruction_set(instruction_set)
        .with_pause_after_outputs(input.config.pause_after as usize);

    let mut machine: Machine = Machine::with_config(Program::from(input.words), config);
    machine.extend_input(input.inputs);

    for _ in 0..=input.resumes {
        match machine.run_for(MAX_STEPS) {
            // Errors and halts both leave the machine stopped
            Ok(RunState::Halted) | Err(_) => {
                assert!(!machine.is_running());
                break;
            }
            Ok(_) => assert!(machine.is_running()),
        }

        // A snapshot must behave exactly like its origin
        let mut snapshot = machine.clone();
        assert_eq!(snapshot.instruction_pointer(), machine.instruction_pointer());
        let _ = snapshot.run_for(16);
    }
});
