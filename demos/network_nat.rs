//! Packet network example
//!
//! Boots a small network of relay nodes and reports the first packet that
//! reaches the NAT, then the first value the NAT delivers twice in a row.
//! Run with: `RUST_LOG=debug cargo run --example network_nat`

use intcode::{Network, Program};
use tracing_subscriber::EnvFilter;

/// Node 0 sends (1, 5, 6); every node forwards what it receives to the NAT as
/// (255, x, y + own address).
const RELAY: &str = "3,100,1008,100,0,101,1006,101,18,104,1,104,5,104,6,1105,1,18,\
                     3,102,1008,102,-1,103,1005,103,18,3,104,104,255,1,104,100,106,\
                     4,102,4,106,1105,1,18";

fn main() {
    tracing_subscriber::fmt()
        .without_time()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Intcode Packet Network Example ===\n");

    let program = Program::parse(RELAY).expect("valid program");

    let mut network = Network::new(program.clone(), 4);
    match network.run_until_nat_packet() {
        Ok(packet) => println!("First NAT packet: x={} y={}", packet.x, packet.y),
        Err(e) => println!("Network failed: {}", e),
    }

    let mut network = Network::new(program, 4);
    match network.run_until_repeated_wake() {
        Ok(y) => println!("First repeated wake value: {}", y),
        Err(e) => println!("Network failed: {}", e),
    }
}
