//! Opcode table consistency tests

use intcode::{Opcode, OPCODE_TABLE};
use std::collections::HashSet;

#[test]
fn test_codes_round_trip_through_table() {
    for metadata in OPCODE_TABLE.iter() {
        let opcode = Opcode::from_code(metadata.code).unwrap();
        assert_eq!(opcode, metadata.opcode);
        assert_eq!(opcode.metadata(), metadata);
    }
}

#[test]
fn test_mnemonics_are_unique() {
    let mnemonics: HashSet<_> = OPCODE_TABLE.iter().map(|m| m.mnemonic).collect();
    assert_eq!(mnemonics.len(), OPCODE_TABLE.len());
}

#[test]
fn test_destination_is_last_operand() {
    for metadata in OPCODE_TABLE.iter() {
        if let Some(index) = metadata.destination {
            assert_eq!(index + 1, metadata.parameter_count, "{}", metadata.mnemonic);
        }
    }
}

#[test]
fn test_undefined_codes() {
    for code in [0, 10, 11, 42, 98, 100, -1] {
        assert_eq!(Opcode::from_code(code), None, "code {}", code);
    }
}

#[test]
fn test_only_relative_base_is_extended() {
    let extended: Vec<_> = OPCODE_TABLE
        .iter()
        .filter(|m| m.extended)
        .map(|m| m.opcode)
        .collect();
    assert_eq!(extended, vec![Opcode::AdjustRelativeBase]);
}
