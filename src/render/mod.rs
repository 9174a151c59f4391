//! Renderer seam and the Manim subprocess adapter.
//!
//! The pipeline only needs two capabilities from a renderer: list the scenes a source file
//! declares, and turn one scene into a video plus optional sections. Everything else here is
//! placement of the produced files and ownership of the temporary media directory.

/// Renderer trait and job/result types.
pub mod backend;
/// Manim subprocess renderer.
pub mod manim;
/// Section naming and output placement.
pub mod segments;
/// Per-run temporary media directory.
pub mod workspace;
