//! Full render runs.

/// Options, run report and the render loop.
pub mod run;
