//! Taxonomy metadata (subjects, chapter, numbering).

/// Tag normalization.
pub mod tags;
