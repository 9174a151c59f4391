//! Manifest document model, entry construction, claim-link merging and persistence.

/// Build one entry's proof view from a payload and its matched claim.
pub mod entry;
/// Theorem grouping and claim-link attachment.
pub mod merge;
/// Serialized manifest types.
pub mod model;
/// Text-only refresh of an existing manifest.
pub mod refresh;
/// Manifest reading and writing.
pub mod store;
