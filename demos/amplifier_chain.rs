//! Amplifier chain example
//!
//! Finds the phase settings that maximize the signal of a five-stage amplifier
//! pipeline, once as a single pass and once as a feedback loop.
//! Run with: `cargo run --example amplifier_chain`

use intcode::{Pipeline, Program};

const SINGLE_PASS: &str = "3,31,3,32,1002,32,10,32,1001,31,-2,31,1007,31,0,33,\
                           1002,33,7,33,1,33,31,31,1,32,31,31,4,31,99,0,0,0";

const FEEDBACK: &str = "3,52,1001,52,-5,52,3,53,1,52,56,54,1007,54,5,55,1005,55,26,1001,54,\
                        -5,54,1105,1,12,1,53,54,53,1008,54,0,55,1001,55,1,55,2,53,55,53,4,\
                        53,1001,56,-1,56,1005,56,6,99,0,0,0,0,10";

/// All orderings of `values`.
fn permutations(values: &[i64]) -> Vec<Vec<i64>> {
    if values.len() <= 1 {
        return vec![values.to_vec()];
    }
    let mut result = Vec::new();
    for (index, &first) in values.iter().enumerate() {
        let mut rest = values.to_vec();
        rest.remove(index);
        for mut tail in permutations(&rest) {
            tail.insert(0, first);
            result.push(tail);
        }
    }
    result
}

fn best_signal(program: &Program, phases: &[i64], feedback: bool) -> (i64, Vec<i64>) {
    permutations(phases)
        .into_iter()
        .filter_map(|order| {
            let mut pipeline = Pipeline::new(program.clone(), &order);
            let signal = if feedback {
                pipeline.run_feedback(0)
            } else {
                pipeline.run_once(0)
            };
            signal.ok().map(|signal| (signal, order))
        })
        .max_by_key(|(signal, _)| *signal)
        .unwrap_or((0, Vec::new()))
}

fn main() {
    println!("=== Intcode Amplifier Chain Example ===\n");

    let program = Program::parse(SINGLE_PASS).expect("valid program");
    let (signal, order) = best_signal(&program, &[0, 1, 2, 3, 4], false);
    println!("Single pass: signal {} from phases {:?}", signal, order);

    let program = Program::parse(FEEDBACK).expect("valid program");
    let (signal, order) = best_signal(&program, &[5, 6, 7, 8, 9], true);
    println!("Feedback:    signal {} from phases {:?}", signal, order);
}
