//! Window calculation, message selection and the run pipeline.

pub mod boundary;
pub mod filter;
pub mod message;
pub mod pipeline;
pub mod window;

pub use pipeline::{Pipeline, RunOutcome};
pub use window::{TimeWindow, WindowHours, WindowResult, compute_window};
