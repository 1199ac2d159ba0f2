//! Pipeline execution engine and matrix fan-out

pub mod engine;
pub mod matrix;

pub use engine::{build_report, EventHandler, ExecutionEngine, RunEvent, RunReport, StepReport};
pub use matrix::{run_matrix, MatrixReport};
