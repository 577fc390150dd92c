//! Intcode Disassembler Module
//!
//! Converts a program image into a listing of decoded instructions.
//!
//! Intcode freely mixes code and data, so the sweep is linear from address 0: a word
//! that does not decode (or an instruction cut off by the end of the image) becomes a
//! one-word `DATA` entry and decoding resumes at the next word.

pub mod decoder;
pub mod formatter;

use crate::{Opcode, ParameterMode, Program};

/// Mnemonic used for words that do not decode as instructions.
pub const DATA_MNEMONIC: &str = "DATA";

/// A single disassembled instruction with full metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Address of the instruction word
    pub address: u64,

    /// The raw instruction word
    pub word: i64,

    /// Decoded operation, `None` for data words
    pub opcode: Option<Opcode>,

    /// Instruction mnemonic (e.g., "ADD", "JNZ", "DATA")
    pub mnemonic: &'static str,

    /// Mode of each operand, in order
    pub modes: Vec<ParameterMode>,

    /// Raw operand words
    pub operands: Vec<i64>,

    /// Index of the destination operand, for instructions that write memory
    pub destination: Option<u8>,

    /// Total size in words (instruction word plus operands)
    pub size: u64,
}

impl Instruction {
    /// Builds a one-word data entry.
    pub fn data(address: u64, word: i64) -> Self {
        Self {
            address,
            word,
            opcode: None,
            mnemonic: DATA_MNEMONIC,
            modes: Vec::new(),
            operands: Vec::new(),
            destination: None,
            size: 1,
        }
    }

    /// Returns true for entries that did not decode as instructions.
    pub fn is_data(&self) -> bool {
        self.opcode.is_none()
    }
}

/// Disassemble a program image into a vector of instructions
///
/// Every address below `program.len()` is covered by exactly one entry.
///
/// # Examples
///
/// ```
/// use intcode::{disassemble, Program};
///
/// let program = Program::parse("1002,4,3,4,33").unwrap();
/// let listing = disassemble(&program);
///
/// assert_eq!(listing.len(), 2);
/// assert_eq!(listing[0].mnemonic, "MUL");
/// assert!(listing[1].is_data());
/// ```
pub fn disassemble(program: &Program) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    let mut address = 0;

    while address < program.len() {
        let instruction = decoder::decode_instruction(program, address)
            .unwrap_or_else(|| Instruction::data(address, program.get(address)));
        address = address.saturating_add(instruction.size);
        instructions.push(instruction);
    }

    instructions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disassemble_empty() {
        let instructions = disassemble(&Program::default());
        assert_eq!(instructions.len(), 0);
    }

    #[test]
    fn test_truncated_instruction_becomes_data() {
        let program = Program::from(vec![99, 1, 2]);
        let instructions = disassemble(&program);

        assert_eq!(instructions.len(), 3);
        assert_eq!(instructions[0].opcode, Some(Opcode::Halt));
        assert!(instructions[1].is_data());
        assert_eq!(instructions[1].word, 1);
        assert_eq!(instructions[2].address, 2);
    }

    #[test]
    fn test_gaps_in_sparse_image_read_as_zero() {
        let program = Program::from_sparse([(0, 99), (3, 7)]).unwrap();
        let instructions = disassemble(&program);

        assert_eq!(instructions.len(), 4);
        assert_eq!(instructions[1].word, 0);
        assert!(instructions[1].is_data());
    }
}
