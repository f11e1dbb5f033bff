//! End-to-end run on one recorded detection set.
//!
//! Purpose
//! - Show the whole pipeline on a real detector output: a fraction, a small
//!   exponent and a fraction over a raised variable.
//! - Print the record the Python service would store, plus a timing.
//!
//! References
//! - Code: crates/slqe/src/pipeline.rs::process_default

use std::time::Instant;

use slqe::api::{process_default, process_expression, DefaultLatex, Detection, SolverCfg};

fn main() {
    let detections: Vec<Detection> = [
        ("1", (0.065308, 0.124321, 0.031348, 0.094463)),
        ("-", (0.073145, 0.179696, 0.060606, 0.016287)),
        ("2", (0.073406, 0.228556, 0.04023, 0.066232)),
        ("x", (0.144462, 0.185125, 0.046499, 0.066232)),
        ("2", (0.189655, 0.143865, 0.036573, 0.064061)),
        ("-", (0.238245, 0.193811, 0.034483, 0.040174)),
        ("1", (0.297806, 0.190554, 0.020899, 0.094463)),
        ("+", (0.348746, 0.192182, 0.049634, 0.089034)),
        ("x", (0.428945, 0.12215, 0.045977, 0.051031)),
        ("-", (0.437827, 0.173724, 0.107628, 0.032573)),
        ("3", (0.437565, 0.247557, 0.048589, 0.102063)),
        ("2", (0.467085, 0.096091, 0.036573, 0.051031)),
    ]
    .into_iter()
    .map(|(label, bbox)| Detection::new(label, 0.9, bbox))
    .collect();

    let start = Instant::now();
    let out = process_default(&detections);
    let elapsed_us = start.elapsed().as_secs_f64() * 1e6;
    println!("{}", serde_json::to_string_pretty(&out).expect("serializable"));
    println!("process_default: {elapsed_us:.1} µs");

    let typed = process_expression("x^5-6x^4+4=0", &SolverCfg::default(), &DefaultLatex);
    println!("{} -> {:?}", typed.expression, typed.roots);
}
