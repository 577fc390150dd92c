//! Exploration tests
//!
//! The program is a droid on a track of cells 0..=5. It reads a direction
//! (1 = left, 2 = right), moves if the target cell is on the track, and reports
//! 1 for a move or 0 for a wall. Its position lives in memory cell 100, so every
//! snapshot carries its own position.

use intcode::{explore, Machine, Verdict};

const TRACK: &str = "3,101,1002,101,2,103,1001,103,-3,103,1,100,103,104,\
                     1007,104,0,105,1005,105,37,1007,104,6,105,1006,105,37,\
                     1001,104,0,100,104,1,1105,1,0,104,0,1105,1,0";

fn moves(&position: &i64) -> [(i64, Vec<i64>); 2] {
    [(position - 1, vec![1]), (position + 1, vec![2])]
}

fn moved(_: &i64, output: &[i64]) -> Verdict {
    match output {
        [1] => Verdict::Keep,
        _ => Verdict::Discard,
    }
}

#[test]
fn test_explores_whole_track() {
    let root = Machine::parse(TRACK).unwrap();
    let result = explore(&root, 0i64, moves, moved).unwrap();

    assert_eq!(result.len(), 6);
    for position in 0..=5 {
        assert_eq!(result.depth(&position), Some(position as usize));
    }
    assert!(!result.contains(&-1));
    assert!(!result.contains(&6));
    assert_eq!(result.max_depth(), 5);
}

#[test]
fn test_goal_snapshot_carries_position() {
    let root = Machine::parse(TRACK).unwrap();
    let result = explore(&root, 0i64, moves, |&position, output| {
        if position == 4 {
            Verdict::Finish
        } else {
            moved(&position, output)
        }
    })
    .unwrap();

    let (position, droid) = result.goal().unwrap();
    assert_eq!(*position, 4);
    assert_eq!(droid.peek(100), 4);
    assert!(droid.is_running());
}

#[test]
fn test_exploration_continues_from_goal() {
    let root = Machine::parse(TRACK).unwrap();
    let first = explore(&root, 0i64, moves, |&position, output| {
        if position == 3 {
            Verdict::Finish
        } else {
            moved(&position, output)
        }
    })
    .unwrap();
    let (start, droid) = first.into_goal().unwrap();

    // Searching again from the goal snapshot measures distances from cell 3
    let second = explore(&droid, start, moves, moved).unwrap();
    assert_eq!(second.depth(&0), Some(3));
    assert_eq!(second.depth(&5), Some(2));
    assert_eq!(second.max_depth(), 3);
}
