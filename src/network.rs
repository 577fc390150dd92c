//! # Packet Network
//!
//! Machines in packet mode emit `(destination, x, y)` triples through an [`Outbox`]
//! instead of their output channel. The matching [`Mailbox`] is owned by whoever
//! schedules the machines and is drained after every run, so ownership of in-flight
//! packets is always explicit.
//!
//! [`Network`] is the round-robin scheduler built on top of this: a fixed pool of
//! nodes polled in index order, with packets for the reserved [`NAT_ADDRESS`] held
//! aside and re-injected into node 0 whenever a full pass routes nothing.

use std::num::NonZeroU32;
use std::sync::mpsc::{self, Receiver, Sender};

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    ExecutionError, IdleInput, Machine, MachineConfig, MemoryBus, Program, SparseMemory,
};

/// Reserved destination whose packets are captured instead of delivered.
pub const NAT_ADDRESS: i64 = 255;

/// Value a node reads when its input is empty.
const IDLE_SENTINEL: i64 = -1;

/// Consecutive empty reads after which a node yields to the scheduler.
const IDLE_READ_LIMIT: NonZeroU32 = match NonZeroU32::new(11) {
    Some(limit) => limit,
    None => unreachable!(),
};

/// A three-word network message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Packet {
    /// Destination node address, or [`NAT_ADDRESS`].
    pub destination: i64,
    pub x: i64,
    pub y: i64,
}

/// Sending half of a packet channel, held by machines in packet mode.
#[derive(Debug, Clone)]
pub struct Outbox {
    sender: Sender<Packet>,
}

impl Outbox {
    /// Sends a packet; fails only if the mailbox has been dropped.
    pub fn send(&self, packet: Packet) -> Result<(), ExecutionError> {
        self.sender
            .send(packet)
            .map_err(|_| ExecutionError::OutboxDisconnected)
    }
}

/// Receiving half of a packet channel, held by the scheduler.
///
/// # Examples
///
/// ```
/// use intcode::{Mailbox, Packet};
///
/// let (outbox, mailbox) = Mailbox::channel();
/// outbox.send(Packet { destination: 1, x: 2, y: 3 }).unwrap();
///
/// assert_eq!(mailbox.drain(), vec![Packet { destination: 1, x: 2, y: 3 }]);
/// assert!(mailbox.drain().is_empty());
/// ```
#[derive(Debug)]
pub struct Mailbox {
    receiver: Receiver<Packet>,
}

impl Mailbox {
    /// Creates a connected outbox/mailbox pair.
    pub fn channel() -> (Outbox, Mailbox) {
        let (sender, receiver) = mpsc::channel();
        (Outbox { sender }, Mailbox { receiver })
    }

    /// Removes and returns all packets sent so far, in send order.
    pub fn drain(&self) -> Vec<Packet> {
        self.receiver.try_iter().collect()
    }
}

/// Errors raised by the network scheduler.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// A node's machine failed.
    #[error("node {node} failed")]
    Machine {
        node: usize,
        #[source]
        source: ExecutionError,
    },

    /// A packet named an address that is neither a node nor the NAT.
    #[error("packet addressed to unknown node {destination}")]
    UnknownDestination { destination: i64 },

    /// The network went idle before any packet reached the NAT.
    #[error("network is idle and the NAT holds no packet")]
    IdleWithoutNat,

    /// Every node has halted; the network can make no further progress.
    #[error("every node has halted")]
    AllHalted,
}

/// Outcome of one scheduling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Packets delivered to nodes or captured by the NAT during the pass.
    pub packets_routed: usize,

    /// True when the pass routed nothing.
    pub idle: bool,
}

/// Round-robin scheduler for a pool of networked machines.
///
/// Node `i` receives its address `i` as first input and runs in packet mode with an
/// idle-input policy, so it yields either after sending a packet or after a run of
/// empty reads.
pub struct Network<M: MemoryBus = SparseMemory> {
    nodes: Vec<Machine<M>>,
    halted: Vec<bool>,
    mailbox: Mailbox,
    nat: Option<Packet>,
    first_nat: Option<Packet>,
    last_wake_y: Option<i64>,
}

impl Network {
    /// Builds `size` nodes with sparse memory, all running `program`.
    pub fn new(program: Program, size: usize) -> Self {
        Self::from_program(program, size)
    }
}

impl<M: MemoryBus> Network<M> {
    /// Builds `size` nodes with the chosen memory backend, all running `program`.
    pub fn from_program(program: Program, size: usize) -> Self {
        let (outbox, mailbox) = Mailbox::channel();
        let config = MachineConfig::default().with_idle_input(IdleInput {
            sentinel: IDLE_SENTINEL,
            limit: IDLE_READ_LIMIT,
        });

        let nodes = (0..size)
            .map(|address| {
                let mut node = Machine::<M>::with_config(program.clone(), config);
                node.attach_outbox(outbox.clone());
                node.push_input(address as i64);
                node
            })
            .collect();

        Self {
            nodes,
            halted: vec![false; size],
            mailbox,
            nat: None,
            first_nat: None,
            last_wake_y: None,
        }
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the node at `address`.
    pub fn node(&self, address: usize) -> Option<&Machine<M>> {
        self.nodes.get(address)
    }

    /// Returns the node at `address` mutably.
    pub fn node_mut(&mut self, address: usize) -> Option<&mut Machine<M>> {
        self.nodes.get_mut(address)
    }

    /// The most recent packet captured by the NAT.
    pub fn nat(&self) -> Option<Packet> {
        self.nat
    }

    /// Runs every live node once, in index order, routing packets after each node.
    pub fn tick(&mut self) -> Result<TickReport, NetworkError> {
        let mut routed = 0;

        for index in 0..self.nodes.len() {
            if self.halted[index] {
                continue;
            }

            let state = self.nodes[index]
                .run()
                .map_err(|source| NetworkError::Machine {
                    node: index,
                    source,
                })?;
            if state.is_halted() {
                debug!(node = index, "node halted");
                self.halted[index] = true;
            }

            routed += self.route()?;
        }

        if routed == 0 && self.halted.iter().all(|&halted| halted) {
            return Err(NetworkError::AllHalted);
        }

        Ok(TickReport {
            packets_routed: routed,
            idle: routed == 0,
        })
    }

    /// Delivers every pending packet; returns how many were routed.
    fn route(&mut self) -> Result<usize, NetworkError> {
        let packets = self.mailbox.drain();
        for packet in &packets {
            if packet.destination == NAT_ADDRESS {
                debug!(x = packet.x, y = packet.y, "packet captured by NAT");
                self.nat = Some(*packet);
                self.first_nat.get_or_insert(*packet);
                continue;
            }

            let node = usize::try_from(packet.destination)
                .ok()
                .and_then(|address| self.nodes.get_mut(address))
                .ok_or(NetworkError::UnknownDestination {
                    destination: packet.destination,
                })?;
            debug!(
                destination = packet.destination,
                x = packet.x,
                y = packet.y,
                "packet routed"
            );
            node.extend_input([packet.x, packet.y]);
        }
        Ok(packets.len())
    }

    /// Injects the NAT's packet into node 0 and returns it.
    pub fn wake(&mut self) -> Result<Packet, NetworkError> {
        let packet = self.nat.ok_or(NetworkError::IdleWithoutNat)?;
        info!(x = packet.x, y = packet.y, "network idle, waking node 0");
        if let Some(node) = self.nodes.first_mut() {
            node.extend_input([packet.x, packet.y]);
        }
        Ok(packet)
    }

    /// Ticks until the first packet reaches the NAT and returns it.
    pub fn run_until_nat_packet(&mut self) -> Result<Packet, NetworkError> {
        loop {
            if let Some(packet) = self.first_nat {
                return Ok(packet);
            }
            self.tick()?;
        }
    }

    /// Ticks, waking node 0 after every idle pass, until two consecutive wakes carry
    /// the same `y`; returns that value.
    pub fn run_until_repeated_wake(&mut self) -> Result<i64, NetworkError> {
        loop {
            let report = self.tick()?;
            if !report.idle {
                continue;
            }

            let packet = self.wake()?;
            if self.last_wake_y == Some(packet.y) {
                return Ok(packet.y);
            }
            self.last_wake_y = Some(packet.y);
        }
    }
}
