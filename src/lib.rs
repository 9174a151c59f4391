//! Proofreel turns a folder of Manim proof scripts into a manifest a presentation front end
//! can consume.
//!
//! # Pipeline overview
//!
//! 1. **Discover**: every `*.py` source file is asked for the scenes it declares
//! 2. **Load**: the file's `<stem>.proof.json` (if any) is parsed once into a [`ProofPayload`]
//! 3. **Match**: each scene is paired with the [`Claim`] it visualizes ([`pick_claim`])
//! 4. **Render**: a [`SceneRenderer`] produces the video and its sections
//! 5. **Merge**: entries sharing a theorem get one reconciled claim list ([`attach_claim_links`])
//! 6. **Write**: `{generatedAt, items}` lands in the manifest file
//!
//! A text-only refresh ([`refresh_text_only`]) re-runs steps 2, 3, 5 and 6 against an existing
//! manifest and never invokes the renderer.
//!
//! A smaller sibling pipeline ([`build_definitions`]) bundles definition JSON files into their
//! own manifest.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod definitions;
mod foundation;
mod manifest;
mod pipeline;
mod proof;
mod render;
mod taxonomy;

pub use definitions::catalog::{
    DefinitionsManifest, DefinitionsOpts, build_definitions, load_definitions_from_file,
};
pub use foundation::error::{CatalogError, CatalogResult};
pub use foundation::paths::{posix_relative, public_url};
pub use manifest::entry::{SceneProof, entry_id, resolve_scene_proof};
pub use manifest::merge::{MAIN_CLAIM_ID, attach_claim_links};
pub use manifest::model::{
    Artifact, ClaimRef, Manifest, ManifestEntry, ManifestItem, ProofView, Section,
};
pub use manifest::refresh::{ArtifactSnapshot, RefreshOutcome, refresh_entries, refresh_text_only};
pub use manifest::store::{read_manifest, write_manifest};
pub use pipeline::run::{PipelineOpts, RunReport, SceneFailure, run_pipeline};
pub use proof::claim::{Claim, normalize_claims};
pub use proof::matcher::pick_claim;
pub use proof::payload::{
    Fragment, ProofPayload, legacy_fragment_candidates, load_proof_payload, load_scene_fragment,
    proof_path_for, read_proof_payload,
};
pub use render::backend::{Quality, RawSegment, RenderJob, RenderedScene, SceneRenderer};
pub use render::manim::{ManimOpts, ManimRenderer, discover_scene_classes};
pub use render::segments::{humanize_section, place_rendered_scene};
pub use render::workspace::MediaWorkspace;
pub use taxonomy::tags::{Tags, normalize_tags};
