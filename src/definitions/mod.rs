//! Definition catalog, a smaller sibling of the proof manifest.

/// Loading and bundling definition files.
pub mod catalog;
