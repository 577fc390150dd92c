//! WASM API for the Intcode machine.
//!
//! Provides JavaScript-callable interfaces for loading and running programs, feeding
//! input, collecting output, and disassembly.
//!
//! Intcode values are 64-bit and cross the boundary as `BigInt`; addresses use `f64`.

use crate::ascii::{drain_text, push_line};
use crate::disassembler::formatter::format_instruction;
use crate::{disassemble, Machine};
use wasm_bindgen::prelude::*;

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

/// One line of a program listing
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct DisassemblyLine {
    address: f64,
    words: Vec<i64>,
    text: String,
}

#[wasm_bindgen]
impl DisassemblyLine {
    #[wasm_bindgen(getter)]
    pub fn address(&self) -> f64 {
        self.address
    }

    #[wasm_bindgen(getter)]
    pub fn words(&self) -> Vec<i64> {
        self.words.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.text.clone()
    }
}

/// Main machine interface for JavaScript
#[wasm_bindgen]
pub struct WasmMachine {
    machine: Machine,
}

#[wasm_bindgen]
impl WasmMachine {
    /// Create a machine from comma-separated program text
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str) -> Result<WasmMachine, JsError> {
        Machine::parse(text)
            .map(|machine| WasmMachine { machine })
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Queue one input value
    pub fn push_input(&mut self, value: i64) {
        self.machine.push_input(value);
    }

    /// Queue a line of text as character codes followed by a newline
    pub fn push_line(&mut self, line: &str) {
        push_line(&mut self.machine, line);
    }

    /// Run until halt or suspension; returns the reason as a string
    pub fn run(&mut self) -> Result<String, JsError> {
        self.machine
            .run()
            .map(|state| state.as_str().to_string())
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Run at most `max_instructions` instructions
    pub fn run_for(&mut self, max_instructions: u32) -> Result<String, JsError> {
        self.machine
            .run_for(u64::from(max_instructions))
            .map(|state| state.as_str().to_string())
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Force the next run to start fresh
    pub fn reset(&mut self) {
        self.machine.reset();
    }

    /// Remove and return all pending output values
    pub fn take_output(&mut self) -> Vec<i64> {
        self.machine.drain_output()
    }

    /// Remove all pending output and return its ASCII part as text
    pub fn take_text(&mut self) -> String {
        drain_text(&mut self.machine).text
    }

    #[wasm_bindgen(getter)]
    pub fn is_running(&self) -> bool {
        self.machine.is_running()
    }

    #[wasm_bindgen(getter)]
    pub fn instruction_pointer(&self) -> f64 {
        self.machine.instruction_pointer() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn relative_base(&self) -> i64 {
        self.machine.relative_base()
    }

    // Memory access methods

    /// Read one word of working memory
    pub fn read_memory(&self, address: f64) -> i64 {
        self.machine.peek(address as u64)
    }

    /// Write one word of working memory
    pub fn write_memory(&mut self, address: f64, value: i64) {
        self.machine.poke(address as u64, value);
    }

    /// Disassemble the program image
    pub fn disassemble(&self, num_instructions: u32) -> Vec<JsValue> {
        let program = self.machine.program();
        disassemble(program)
            .iter()
            .take(num_instructions as usize)
            .map(|instr| {
                let line = DisassemblyLine {
                    address: instr.address as f64,
                    words: (0..instr.size)
                        .map(|offset| program.get(instr.address + offset))
                        .collect(),
                    text: format_instruction(instr),
                };
                JsValue::from(line)
            })
            .collect()
    }
}
