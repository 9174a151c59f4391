//! Shared error taxonomy and path helpers.

/// Error taxonomy and result alias.
pub mod error;
/// Relative-path and public-URL helpers.
pub mod paths;
