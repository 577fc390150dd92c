//! # Clone-Based Exploration
//!
//! Breadth-first search over a program's reachable states. Every explored state owns a
//! snapshot of the machine; trying a move clones that snapshot, feeds the move's inputs
//! and runs the clone, so failed moves never need to be undone.
//!
//! The frontier is an explicit queue, so search depth is bounded only by memory.

use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

use tracing::debug;

use crate::{ExecutionError, Machine, MemoryBus, SparseMemory};

/// Classifier decision for a machine that has just tried a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The move reached a new state; explore onward from it.
    Keep,

    /// The move is blocked; drop the clone.
    Discard,

    /// The move reached a goal; keep it and stop the search.
    Finish,
}

/// Result of an exploration.
#[derive(Debug, Clone)]
pub struct Exploration<S, M: MemoryBus = SparseMemory> {
    depths: HashMap<S, usize>,
    goal: Option<(S, Machine<M>)>,
}

impl<S: Eq + Hash, M: MemoryBus> Exploration<S, M> {
    /// Breadth-first depth of `state`, if it was reached.
    pub fn depth(&self, state: &S) -> Option<usize> {
        self.depths.get(state).copied()
    }

    /// Returns true if `state` was reached.
    pub fn contains(&self, state: &S) -> bool {
        self.depths.contains_key(state)
    }

    /// All reached states with their depths, including the start state.
    pub fn depths(&self) -> &HashMap<S, usize> {
        &self.depths
    }

    /// Number of reached states.
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    /// Returns true if nothing was reached (never the case after [`explore`]).
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Largest depth reached.
    pub fn max_depth(&self) -> usize {
        self.depths.values().copied().max().unwrap_or(0)
    }

    /// The state that ended the search, with its machine snapshot.
    pub fn goal(&self) -> Option<(&S, &Machine<M>)> {
        self.goal.as_ref().map(|(state, machine)| (state, machine))
    }

    /// Consumes the exploration and returns the goal, if any.
    pub fn into_goal(self) -> Option<(S, Machine<M>)> {
        self.goal
    }
}

/// Explores breadth-first from `root`, which is left untouched.
///
/// `moves` lists, for a state, the candidate successor states and the inputs that
/// attempt each one. For every successor not yet seen, the current state's machine is
/// cloned, given the inputs and run; `classify` then inspects the drained output and
/// decides whether the successor is reachable.
///
/// Verdicts belong to states, not to moves: a state discarded when reached from one
/// parent is never attempted from any other. Fold whatever matters about the parent
/// into `S` when reachability depends on it.
///
/// # Examples
///
/// ```
/// use intcode::{explore, Machine, Verdict};
///
/// // Reads n, emits n < 3, repeats
/// let root = Machine::parse("3,20,1007,20,3,21,4,21,1105,1,0").unwrap();
///
/// let result = explore(
///     &root,
///     0i64,
///     |&n| [(n + 1, vec![n + 1])],
///     |_, output| if output == [1] { Verdict::Keep } else { Verdict::Discard },
/// )
/// .unwrap();
///
/// assert_eq!(result.len(), 3);
/// assert_eq!(result.depth(&2), Some(2));
/// assert!(!root.is_running());
/// ```
pub fn explore<S, M, C, I, F>(
    root: &Machine<M>,
    start: S,
    mut moves: C,
    mut classify: F,
) -> Result<Exploration<S, M>, ExecutionError>
where
    S: Clone + Eq + Hash,
    M: MemoryBus,
    C: FnMut(&S) -> I,
    I: IntoIterator<Item = (S, Vec<i64>)>,
    F: FnMut(&S, &[i64]) -> Verdict,
{
    let mut depths = HashMap::new();
    let mut blocked = HashSet::new();
    let mut frontier = VecDeque::new();

    depths.insert(start.clone(), 0);
    frontier.push_back((start, root.clone(), 0usize));

    while let Some((state, machine, depth)) = frontier.pop_front() {
        for (next, inputs) in moves(&state) {
            if depths.contains_key(&next) || blocked.contains(&next) {
                continue;
            }

            let mut attempt = machine.clone();
            attempt.run_with_inputs(inputs)?;
            let output = attempt.drain_output();

            match classify(&next, &output) {
                Verdict::Keep => {
                    depths.insert(next.clone(), depth + 1);
                    frontier.push_back((next, attempt, depth + 1));
                }
                Verdict::Discard => {
                    blocked.insert(next);
                }
                Verdict::Finish => {
                    depths.insert(next.clone(), depth + 1);
                    debug!(depth = depth + 1, visited = depths.len(), "goal reached");
                    return Ok(Exploration {
                        depths,
                        goal: Some((next, attempt)),
                    });
                }
            }
        }
    }

    debug!(visited = depths.len(), "exploration exhausted");
    Ok(Exploration { depths, goal: None })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reads n, emits 1 if n < 3 else 0, and waits for the next value.
    const BELOW_THREE: &str = "3,20,1007,20,3,21,4,21,1105,1,0";

    fn accept_ones(_: &i64, output: &[i64]) -> Verdict {
        if output == [1] {
            Verdict::Keep
        } else {
            Verdict::Discard
        }
    }

    #[test]
    fn test_visits_accepted_states() {
        let root = Machine::parse(BELOW_THREE).unwrap();
        let result = explore(&root, 0i64, |&n| [(n + 1, vec![n + 1])], accept_ones).unwrap();

        let mut states: Vec<_> = result.depths().keys().copied().collect();
        states.sort_unstable();
        assert_eq!(states, vec![0, 1, 2]);
        assert_eq!(result.max_depth(), 2);
        assert!(result.goal().is_none());
    }

    #[test]
    fn test_root_is_never_mutated() {
        let mut root = Machine::parse(BELOW_THREE).unwrap();
        root.run().unwrap();
        let ip = root.instruction_pointer();

        explore(&root, 0i64, |&n| [(n + 1, vec![n + 1])], accept_ones).unwrap();

        assert_eq!(root.instruction_pointer(), ip);
        assert!(root.input().is_empty());
        assert!(root.output().is_empty());
    }

    #[test]
    fn test_states_are_not_revisited() {
        let root = Machine::parse(BELOW_THREE).unwrap();
        let mut attempts = 0;
        let result = explore(
            &root,
            0i64,
            |&n| [(n - 1, vec![n - 1]), (n + 1, vec![n + 1])],
            |&n, output| {
                attempts += 1;
                if n >= 0 && output == [1] {
                    Verdict::Keep
                } else {
                    Verdict::Discard
                }
            },
        )
        .unwrap();

        assert_eq!(result.len(), 3);
        // -1 and 3 are each tried once, 1 and 2 once each
        assert_eq!(attempts, 4);
    }

    #[test]
    fn test_discarded_state_is_not_retried_from_another_parent() {
        let root = Machine::parse(BELOW_THREE).unwrap();
        let mut tried = Vec::new();
        // 0 -> {1, 2}, 1 -> {2}; 2 is rejected when first reached from 0
        let result = explore(
            &root,
            0i64,
            |&n| match n {
                0 => vec![(1, vec![1]), (2, vec![5])],
                1 => vec![(2, vec![2])],
                _ => Vec::new(),
            },
            |&n, output| {
                tried.push(n);
                accept_ones(&n, output)
            },
        )
        .unwrap();

        assert!(!result.contains(&2));
        assert_eq!(tried, vec![1, 2]);
    }

    #[test]
    fn test_finish_returns_goal_machine() {
        let root = Machine::parse(BELOW_THREE).unwrap();
        let result = explore(
            &root,
            0i64,
            |&n| [(n + 1, vec![n + 1])],
            |&n, _| {
                if n == 2 {
                    Verdict::Finish
                } else {
                    Verdict::Keep
                }
            },
        )
        .unwrap();

        assert_eq!(result.depth(&2), Some(2));
        let (state, machine) = result.into_goal().unwrap();
        assert_eq!(state, 2);
        assert!(machine.is_running());
        assert_eq!(machine.peek(20), 2);
    }

    #[test]
    fn test_machine_errors_propagate() {
        let root = Machine::parse("3,0,4,-1,99").unwrap();
        let result = explore(&root, 0i64, |&n| [(n + 1, vec![n])], |_, _| Verdict::Keep);
        assert_eq!(
            result.err(),
            Some(ExecutionError::NegativeAddress { address: -1 })
        );
    }
}
