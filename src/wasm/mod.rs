//! WebAssembly bindings for the Intcode machine.
//!
//! This module provides JavaScript-callable interfaces to the machine, enabling
//! browser-based execution of Intcode programs.

#[cfg(feature = "wasm")]
pub mod api;

#[cfg(feature = "wasm")]
pub use api::WasmMachine;
