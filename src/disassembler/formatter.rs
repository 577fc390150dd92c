//! Formatting functions for disassembled instructions
//!
//! Operand syntax:
//!
//! | Mode | Rendering |
//! |------|-----------|
//! | Position | `[9]` |
//! | Immediate | `#3` |
//! | Relative | `[rb+4]`, `[rb-1]` |
//!
//! A destination operand is separated from the sources by `->`.

use crate::disassembler::Instruction;
use crate::ParameterMode;

/// Format a single instruction as assembly text
///
/// # Examples
///
/// ```
/// use intcode::disassembler::formatter::format_instruction;
/// use intcode::{disassemble, Program};
///
/// let program = Program::parse("21001,9,3,4").unwrap();
/// let listing = disassemble(&program);
/// assert_eq!(format_instruction(&listing[0]), "ADD [9], #3 -> [rb+4]");
/// ```
pub fn format_instruction(instr: &Instruction) -> String {
    if instr.is_data() {
        return format!("{} {}", instr.mnemonic, instr.word);
    }

    let mut sources = Vec::new();
    let mut destination = None;
    for (index, (&mode, &raw)) in instr.modes.iter().zip(&instr.operands).enumerate() {
        let operand = format_operand(mode, raw);
        if instr.destination == Some(index as u8) {
            destination = Some(operand);
        } else {
            sources.push(operand);
        }
    }

    let mut text = instr.mnemonic.to_string();
    if !sources.is_empty() {
        text.push(' ');
        text.push_str(&sources.join(", "));
    }
    if let Some(destination) = destination {
        text.push_str(" -> ");
        text.push_str(&destination);
    }
    text
}

/// Format one operand according to its mode
fn format_operand(mode: ParameterMode, raw: i64) -> String {
    match mode {
        ParameterMode::Position => format!("[{}]", raw),
        ParameterMode::Immediate => format!("#{}", raw),
        ParameterMode::Relative if raw < 0 => format!("[rb-{}]", raw.unsigned_abs()),
        ParameterMode::Relative => format!("[rb+{}]", raw),
    }
}

/// Format a whole listing, one instruction per line with a four-digit address
pub fn format_listing(instructions: &[Instruction]) -> String {
    let mut listing = String::new();
    for instr in instructions {
        listing.push_str(&format!("{:04}  {}\n", instr.address, format_instruction(instr)));
    }
    listing
}
