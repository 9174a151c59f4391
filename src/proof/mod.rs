//! Proof-description payloads, their claims, and the scene/claim matcher.

/// Claim normalization.
pub mod claim;
/// Scene-to-claim matching policy.
pub mod matcher;
/// Proof-description file discovery and parsing.
pub mod payload;
