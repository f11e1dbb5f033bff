//! PyO3 bindings for the `slqe` pipeline.
//!
//! Notes
//! - Results mirror the `(valid, message, expression, latex, roots)` tuple the
//!   Python service stores; `roots` mixes floats and sentinel strings.
//! - Detections arrive as `(label, confidence, (center_x, center_y, width, height))`.

use pyo3::prelude::*;
use slqe::api::{
    process, process_expression, DefaultLatex, Detection, GeometryCfg, ReferenceGlyphs, RootEntry,
    SolveOutput, SolverCfg,
};

type PyDetection = (String, f64, (f64, f64, f64, f64));
type PyResultTuple = (bool, String, String, String, Vec<PyObject>);

fn solver_cfg(epsilon: f64) -> PyResult<SolverCfg> {
    if !(epsilon > 0.0 && epsilon < 1.0) {
        return Err(pyo3::exceptions::PyValueError::new_err(format!(
            "epsilon must lie in (0, 1), got {epsilon}"
        )));
    }
    Ok(SolverCfg {
        epsilon,
        ..SolverCfg::default()
    })
}

fn to_tuple(py: Python<'_>, out: SolveOutput) -> PyResultTuple {
    let roots = out
        .roots
        .into_iter()
        .map(|r| match r {
            RootEntry::Number(x) => x.into_py(py),
            RootEntry::Text(s) => s.into_py(py),
        })
        .collect();
    (out.valid, out.message, out.expression, out.latex, roots)
}

/// Assemble detections into an equation and solve it.
#[pyfunction]
#[pyo3(signature = (detections, epsilon = 1e-5))]
fn process_detections(py: Python<'_>, detections: Vec<PyDetection>, epsilon: f64) -> PyResult<PyResultTuple> {
    let cfg = solver_cfg(epsilon)?;
    let detections: Vec<Detection> = detections
        .into_iter()
        .map(|(label, confidence, bbox)| Detection::new(label, confidence, bbox))
        .collect();
    let out = py.allow_threads(|| {
        process(
            &detections,
            &GeometryCfg::default(),
            &cfg,
            &ReferenceGlyphs,
            &DefaultLatex,
        )
    });
    Ok(to_tuple(py, out))
}

/// Normalize and solve a typed infix expression.
#[pyfunction]
#[pyo3(signature = (expression, epsilon = 1e-5))]
fn solve_expression(py: Python<'_>, expression: &str, epsilon: f64) -> PyResult<PyResultTuple> {
    let cfg = solver_cfg(epsilon)?;
    let out = py.allow_threads(|| process_expression(expression, &cfg, &DefaultLatex));
    Ok(to_tuple(py, out))
}

#[pymodule]
fn slqe_native(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add("__version__", slqe::VERSION)?;
    m.add_function(wrap_pyfunction!(process_detections, m)?)?;
    m.add_function(wrap_pyfunction!(solve_expression, m)?)?;
    Ok(())
}
