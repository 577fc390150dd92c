//! Fuzz target for the disassembler.
//!
//! This target feeds arbitrary word sequences to the disassembler
//! to find edge cases and crashes in instruction decoding.

#![no_main]

use intcode::disassembler::formatter::format_instruction;
use intcode::{disassemble, Program};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|words: Vec<i64>| {
    // Limit input size to prevent OOM
    if words.len() > 65536 {
        return;
    }

    let program = Program::from(words);
    let instructions = disassemble(&program);

    // Verify invariants
    let mut expected_address = 0;
    for instr in &instructions {
        // Entries tile the image without gaps
        assert_eq!(instr.address, expected_address);

        // Size should be 1-4 words
        assert!((1..=4).contains(&instr.size));
        assert_eq!(instr.operands.len() as u64 + 1, instr.size);

        assert!(!format_instruction(instr).is_empty());
        expected_address += instr.size;
    }

    // Total size should equal the image length
    assert_eq!(expected_address, program.len());
});
