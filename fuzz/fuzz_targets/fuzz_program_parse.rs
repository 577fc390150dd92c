//! Fuzz target for program text parsing.
//!
//! This target feeds arbitrary strings to the parser. Accepted text must round-trip
//! through its comma-separated rendering.

#![no_main]

use intcode::Program;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|text: &str| {
    let Ok(program) = Program::parse(text) else {
        return;
    };

    let rendered = program
        .to_vec()
        .iter()
        .map(|word| word.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let reparsed = Program::parse(&rendered).expect("rendered program must parse");
    assert_eq!(reparsed, program);
});
