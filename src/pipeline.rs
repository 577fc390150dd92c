//! # Amplifier Pipeline
//!
//! A fixed chain of machines running the same program. Each stage is primed with its
//! phase setting as first input; the values one stage emits become the next stage's
//! input.
//!
//! Two schedules are supported:
//! - **Single pass** ([`Pipeline::run_once`]): every stage runs once, in order
//! - **Feedback** ([`Pipeline::run_feedback`]): the last stage feeds the first, and the
//!   chain is polled until the last stage halts

use thiserror::Error;
use tracing::debug;

use crate::{ExecutionError, Machine, MachineConfig, MemoryBus, Program, SparseMemory};

/// Errors raised while driving a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The pipeline has no stages, or the last stage never emitted a value.
    #[error("pipeline produced no output")]
    NoOutput,

    /// A full feedback round moved no values and the last stage has not halted.
    #[error("pipeline stalled: no stage produced output")]
    Stalled,

    /// A stage's machine failed.
    #[error("stage {stage} failed")]
    Machine {
        stage: usize,
        #[source]
        source: ExecutionError,
    },
}

/// A chain of machines connected output-to-input.
///
/// # Examples
///
/// ```
/// use intcode::{Pipeline, Program};
///
/// let program: Program = "3,15,3,16,1002,16,10,16,1,16,15,15,4,15,99,0,0".parse().unwrap();
/// let mut pipeline = Pipeline::new(program, &[4, 3, 2, 1, 0]);
/// assert_eq!(pipeline.run_once(0).unwrap(), 43210);
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline<M: MemoryBus = SparseMemory> {
    stages: Vec<Machine<M>>,
    phases: Vec<i64>,
}

impl Pipeline {
    /// Builds one sparse-memory stage per phase setting.
    pub fn new(program: Program, phases: &[i64]) -> Self {
        Self::with_config(program, phases, MachineConfig::default())
    }
}

impl<M: MemoryBus> Pipeline<M> {
    /// Builds one stage per phase setting with the given configuration.
    pub fn with_config(program: Program, phases: &[i64], config: MachineConfig) -> Self {
        let stages = phases
            .iter()
            .map(|_| Machine::with_config(program.clone(), config))
            .collect();
        Self {
            stages,
            phases: phases.to_vec(),
        }
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns the stage at `index`.
    pub fn stage(&self, index: usize) -> Option<&Machine<M>> {
        self.stages.get(index)
    }

    /// Restarts every stage and queues its phase setting.
    fn prime(&mut self) {
        for (stage, &phase) in self.stages.iter_mut().zip(&self.phases) {
            stage.reset();
            stage.input_mut().clear();
            stage.push_input(phase);
        }
    }

    /// Runs every stage once, in order, starting with `signal`; returns the last value
    /// emitted by the final stage.
    pub fn run_once(&mut self, signal: i64) -> Result<i64, PipelineError> {
        self.prime();

        let mut carry = vec![signal];
        for (index, stage) in self.stages.iter_mut().enumerate() {
            stage.extend_input(carry);
            stage
                .run()
                .map_err(|source| PipelineError::Machine {
                    stage: index,
                    source,
                })?;
            carry = stage.drain_output();
        }

        if self.stages.is_empty() {
            return Err(PipelineError::NoOutput);
        }
        carry.last().copied().ok_or(PipelineError::NoOutput)
    }

    /// Runs the stages as a loop, feeding the final stage's outputs back into the first,
    /// until the final stage halts; returns the last value it emitted.
    ///
    /// A stage that halts is never run again. If an earlier stage halts before the final
    /// one, the chain is broken and the loop ends with the final stage's last value.
    pub fn run_feedback(&mut self, signal: i64) -> Result<i64, PipelineError> {
        if self.stages.is_empty() {
            return Err(PipelineError::NoOutput);
        }
        self.prime();

        let final_index = self.stages.len() - 1;
        let mut carry = vec![signal];
        let mut last = None;
        let mut halted = vec![false; self.stages.len()];
        let mut rounds = 0usize;

        loop {
            let mut moved = 0;
            let mut finished = false;

            for (index, stage) in self.stages.iter_mut().enumerate() {
                if halted[index] {
                    debug!(stage = index, rounds, "feedback chain broken by halted stage");
                    return last.ok_or(PipelineError::NoOutput);
                }

                stage.extend_input(carry);
                let state = stage
                    .run()
                    .map_err(|source| PipelineError::Machine {
                        stage: index,
                        source,
                    })?;
                carry = stage.drain_output();
                moved += carry.len();
                halted[index] = state.is_halted();

                if index == final_index {
                    if let Some(&value) = carry.last() {
                        last = Some(value);
                    }
                    finished = state.is_halted();
                }
            }

            rounds += 1;
            if finished {
                debug!(rounds, "feedback loop finished");
                return last.ok_or(PipelineError::NoOutput);
            }
            if moved == 0 {
                return Err(PipelineError::Stalled);
            }
        }
    }
}
