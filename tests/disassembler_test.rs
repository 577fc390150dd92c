//! Integration tests for the Intcode disassembler

use intcode::disassembler::formatter::{format_instruction, format_listing};
use intcode::{disassemble, Opcode, ParameterMode, Program};

#[test]
fn test_single_instruction_disassembly() {
    let program = Program::parse("21101,-7,3,2").unwrap();
    let instructions = disassemble(&program);

    assert_eq!(instructions.len(), 1);

    let instr = &instructions[0];
    assert_eq!(instr.address, 0);
    assert_eq!(instr.opcode, Some(Opcode::Add));
    assert_eq!(
        instr.modes,
        vec![
            ParameterMode::Immediate,
            ParameterMode::Immediate,
            ParameterMode::Relative
        ]
    );
    assert_eq!(instr.operands, vec![-7, 3, 2]);
    assert_eq!(format_instruction(instr), "ADD #-7, #3 -> [rb+2]");
}

#[test]
fn test_quine_listing() {
    let program = Program::parse("109,1,204,-1,1001,100,1,100,1008,100,16,101,1006,101,0,99")
        .unwrap();
    let listing = format_listing(&disassemble(&program));

    assert_eq!(
        listing,
        "0000  ARB #1\n\
         0002  OUT [rb-1]\n\
         0004  ADD [100], #1 -> [100]\n\
         0008  EQ [100], #16 -> [101]\n\
         0012  JZ [101], #0\n\
         0015  HALT\n"
    );
}

#[test]
fn test_data_words_between_code() {
    // Two instructions followed by their operand storage
    let program = Program::parse("1,9,10,3,2,3,11,0,99,30,40,50").unwrap();
    let instructions = disassemble(&program);
    let mnemonics: Vec<_> = instructions.iter().map(|i| i.mnemonic).collect();

    assert_eq!(mnemonics, vec!["ADD", "MUL", "HALT", "DATA", "DATA", "DATA"]);
    assert_eq!(format_instruction(&instructions[3]), "DATA 30");
}

#[test]
fn test_listing_covers_every_word() {
    let program = Program::parse("3,0,4,0,99,7,-3,1101").unwrap();
    let total: u64 = disassemble(&program).iter().map(|i| i.size).sum();
    assert_eq!(total, program.len());
}
