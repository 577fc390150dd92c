//! Command-line runner for Intcode programs.
//!
//! # Usage
//! ```text
//! intcode <PROGRAM_FILE> [OPTIONS]
//! ```
//!
//! # Examples
//! ```text
//! intcode day09.txt --input 1
//! intcode day25.txt --ascii < commands.txt
//! intcode day05.txt --disassemble
//! RUST_LOG=debug intcode day02.txt --max-steps 10000
//! ```

use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use intcode::ascii::{drain_text, push_line};
use intcode::disassembler::formatter::format_listing;
use intcode::{disassemble, InstructionSet, Machine, MachineConfig, Program, RunState};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run or disassemble an Intcode program", long_about = None)]
struct Args {
    /// File containing comma-separated program text
    program: PathBuf,

    /// Value to queue as input; repeat for several values
    #[arg(short, long = "input", allow_negative_numbers = true)]
    inputs: Vec<i64>,

    /// Read stdin lines as ASCII input and print output as text
    #[arg(long)]
    ascii: bool,

    /// Print a listing instead of running
    #[arg(short, long)]
    disassemble: bool,

    /// Stop after this many instructions
    #[arg(long)]
    max_steps: Option<u64>,

    /// Reject relative mode and opcode 9
    #[arg(long)]
    basic: bool,
}

/// Installs a stderr subscriber filtered by `RUST_LOG`.
fn setup_logger() {
    tracing_subscriber::fmt::Subscriber::builder()
        .without_time()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .finish()
        .init();
}

fn main() -> Result<()> {
    setup_logger();
    let args = Args::parse();

    let text = fs::read_to_string(&args.program)
        .with_context(|| format!("failed to read {}", args.program.display()))?;
    let program = Program::parse(&text)
        .with_context(|| format!("failed to parse {}", args.program.display()))?;

    if args.disassemble {
        print!("{}", format_listing(&disassemble(&program)));
        return Ok(());
    }

    let instruction_set = if args.basic {
        InstructionSet::Basic
    } else {
        InstructionSet::Extended
    };
    let config = MachineConfig::default().with_instruction_set(instruction_set);
    let mut machine: Machine = Machine::with_config(program, config);

    machine.extend_input(args.inputs.iter().copied());
    if args.ascii {
        for line in io::stdin().lock().lines() {
            push_line(&mut machine, &line.context("failed to read stdin")?);
        }
    }

    let state = match args.max_steps {
        Some(max) => machine.run_for(max)?,
        None => machine.run()?,
    };
    info!(%state, ip = machine.instruction_pointer(), "machine stopped");

    if args.ascii {
        let transcript = drain_text(&mut machine);
        print!("{}", transcript.text);
        if let Some(value) = transcript.value {
            println!("{}", value);
        }
    } else {
        for value in machine.drain_output() {
            println!("{}", value);
        }
    }

    if state != RunState::Halted {
        eprintln!("machine stopped: {}", state);
    }
    Ok(())
}
