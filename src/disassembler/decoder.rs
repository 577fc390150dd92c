//! Instruction decoder for the Intcode disassembler

use crate::disassembler::Instruction;
use crate::instructions;
use crate::{InstructionSet, Program};

/// Decode a single instruction from a program image
///
/// # Arguments
///
/// * `program` - The image to read from
/// * `address` - The address of the instruction word
///
/// # Returns
///
/// Some(Instruction) if the word decodes under the extended instruction set and all of
/// its operands lie inside the image, None otherwise
pub fn decode_instruction(program: &Program, address: u64) -> Option<Instruction> {
    let word = program.get(address);
    let decoded = instructions::decode(word, address, InstructionSet::Extended).ok()?;
    let metadata = decoded.opcode.metadata();

    // Check that the whole instruction fits in the image
    if address.checked_add(metadata.size())? > program.len() {
        return None;
    }

    let count = metadata.parameter_count as usize;
    let operands = (1..=count as u64)
        .map(|offset| program.get(address + offset))
        .collect();

    Some(Instruction {
        address,
        word,
        opcode: Some(decoded.opcode),
        mnemonic: metadata.mnemonic,
        modes: decoded.modes[..count].to_vec(),
        operands,
        destination: metadata.destination,
        size: metadata.size(),
    })
}
