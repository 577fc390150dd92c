//! # Opcode Metadata Table
//!
//! This module contains the opcode metadata table that serves as the single source of
//! truth for Intcode instruction information: mnemonic, operand count, which operand (if
//! any) is a write destination, and whether the opcode belongs to the extended
//! instruction set.
//!
//! The opcode is the low two decimal digits of an instruction word. Only ten values are
//! defined; every other value is an invalid opcode.

/// Intcode operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Add,
    Multiply,
    Input,
    Output,
    JumpIfTrue,
    JumpIfFalse,
    LessThan,
    Equals,
    AdjustRelativeBase,
    Halt,
}

/// Metadata for a single Intcode opcode.
///
/// # Fields
///
/// - `opcode`: The operation this entry describes
/// - `code`: Numeric opcode as it appears in the low two digits of the instruction word
/// - `mnemonic`: Short instruction name used by the disassembler (e.g. "ADD", "JNZ")
/// - `parameter_count`: Number of operand words following the instruction word
/// - `destination`: Index of the operand that names a write destination, if any
/// - `extended`: Whether the opcode is only available in the extended instruction set
///
/// # Examples
///
/// ```
/// use intcode::{Opcode, OPCODE_TABLE};
///
/// let add = Opcode::Add.metadata();
/// assert_eq!(add.mnemonic, "ADD");
/// assert_eq!(add.parameter_count, 3);
/// assert_eq!(add.destination, Some(2));
/// assert_eq!(add.size(), 4);
/// assert_eq!(OPCODE_TABLE.len(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// Operation described by this entry.
    pub opcode: Opcode,

    /// Numeric opcode (1-9 or 99).
    pub code: i64,

    /// Instruction mnemonic.
    pub mnemonic: &'static str,

    /// Number of operand words (0-3).
    pub parameter_count: u8,

    /// Index of the destination operand, for instructions that write memory.
    pub destination: Option<u8>,

    /// True for opcodes outside the basic instruction set.
    pub extended: bool,
}

impl OpcodeMetadata {
    /// Total instruction size in words (instruction word plus operands).
    pub const fn size(&self) -> u64 {
        self.parameter_count as u64 + 1
    }
}

/// Complete opcode metadata table, ordered by numeric opcode.
pub const OPCODE_TABLE: [OpcodeMetadata; 10] = [
    OpcodeMetadata {
        opcode: Opcode::Add,
        code: 1,
        mnemonic: "ADD",
        parameter_count: 3,
        destination: Some(2),
        extended: false,
    },
    OpcodeMetadata {
        opcode: Opcode::Multiply,
        code: 2,
        mnemonic: "MUL",
        parameter_count: 3,
        destination: Some(2),
        extended: false,
    },
    OpcodeMetadata {
        opcode: Opcode::Input,
        code: 3,
        mnemonic: "IN",
        parameter_count: 1,
        destination: Some(0),
        extended: false,
    },
    OpcodeMetadata {
        opcode: Opcode::Output,
        code: 4,
        mnemonic: "OUT",
        parameter_count: 1,
        destination: None,
        extended: false,
    },
    OpcodeMetadata {
        opcode: Opcode::JumpIfTrue,
        code: 5,
        mnemonic: "JNZ",
        parameter_count: 2,
        destination: None,
        extended: false,
    },
    OpcodeMetadata {
        opcode: Opcode::JumpIfFalse,
        code: 6,
        mnemonic: "JZ",
        parameter_count: 2,
        destination: None,
        extended: false,
    },
    OpcodeMetadata {
        opcode: Opcode::LessThan,
        code: 7,
        mnemonic: "LT",
        parameter_count: 3,
        destination: Some(2),
        extended: false,
    },
    OpcodeMetadata {
        opcode: Opcode::Equals,
        code: 8,
        mnemonic: "EQ",
        parameter_count: 3,
        destination: Some(2),
        extended: false,
    },
    OpcodeMetadata {
        opcode: Opcode::AdjustRelativeBase,
        code: 9,
        mnemonic: "ARB",
        parameter_count: 1,
        destination: None,
        extended: true,
    },
    OpcodeMetadata {
        opcode: Opcode::Halt,
        code: 99,
        mnemonic: "HALT",
        parameter_count: 0,
        destination: None,
        extended: false,
    },
];

impl Opcode {
    /// Looks up an opcode by its numeric value.
    ///
    /// # Examples
    ///
    /// ```
    /// use intcode::Opcode;
    ///
    /// assert_eq!(Opcode::from_code(9), Some(Opcode::AdjustRelativeBase));
    /// assert_eq!(Opcode::from_code(99), Some(Opcode::Halt));
    /// assert_eq!(Opcode::from_code(42), None);
    /// ```
    pub fn from_code(code: i64) -> Option<Self> {
        OPCODE_TABLE
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.opcode)
    }

    /// Returns the table entry for this opcode.
    pub fn metadata(self) -> &'static OpcodeMetadata {
        let index = match self {
            Opcode::Add => 0,
            Opcode::Multiply => 1,
            Opcode::Input => 2,
            Opcode::Output => 3,
            Opcode::JumpIfTrue => 4,
            Opcode::JumpIfFalse => 5,
            Opcode::LessThan => 6,
            Opcode::Equals => 7,
            Opcode::AdjustRelativeBase => 8,
            Opcode::Halt => 9,
        };
        &OPCODE_TABLE[index]
    }
}
