use std::collections::BTreeMap;
use std::path::Path;

use crate::foundation::error::CatalogResult;
use crate::foundation::paths::{display_relative, resolve_source};
use crate::manifest::entry::resolve_scene_proof;
use crate::manifest::merge::attach_claim_links;
use crate::manifest::model::{Artifact, ManifestEntry, ManifestItem};
use crate::manifest::store::{read_manifest, write_manifest};
use crate::pipeline::run::PipelineOpts;
use crate::proof::payload::{file_stem, load_proof_payload, load_scene_fragment};

/// Read-only view of the artifacts an earlier run produced, keyed by entry id.
#[derive(Clone, Debug, Default)]
pub struct ArtifactSnapshot {
    by_id: BTreeMap<String, Artifact>,
}

impl ArtifactSnapshot {
    /// Capture the artifacts of `items`. For duplicate ids the first entry wins.
    pub fn from_items(items: &[ManifestEntry]) -> Self {
        let mut by_id = BTreeMap::new();
        for item in items {
            by_id
                .entry(item.id.clone())
                .or_insert_with(|| item.artifact.clone());
        }
        Self { by_id }
    }

    /// Artifact previously rendered for `id`.
    pub fn get(&self, id: &str) -> Option<&Artifact> {
        self.by_id.get(id)
    }

    /// Number of captured artifacts.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// True when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Result of [`refresh_text_only`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No manifest existed, nothing was written.
    Skipped,
    /// The manifest was rewritten.
    Refreshed {
        /// Items written.
        items: usize,
        /// Source groups whose script no longer exists (passed through unchanged).
        missing_sources: usize,
    },
}

/// Re-derive proof text and claim links for an existing manifest without rendering.
///
/// Video references are reused from the manifest as-is. Structural manifest corruption is the
/// only fatal condition; missing scripts or proof files degrade per group. Items that do not
/// fit the entry shape are written back unchanged after the refreshed entries.
#[tracing::instrument(skip_all)]
pub fn refresh_text_only(opts: &PipelineOpts) -> CatalogResult<RefreshOutcome> {
    let manifest_path = opts.manifest_path();
    if !manifest_path.exists() {
        tracing::info!("text-only refresh skipped: manifest not found");
        return Ok(RefreshOutcome::Skipped);
    }

    let mut entries = Vec::new();
    let mut unmodelled = Vec::new();
    for item in read_manifest(&manifest_path)? {
        match item {
            ManifestItem::Entry(entry) => entries.push(entry),
            raw @ ManifestItem::Raw(_) => unmodelled.push(raw),
        }
    }

    let snapshot = ArtifactSnapshot::from_items(&entries);
    let (mut entries, missing_sources) = refresh_entries(entries, &snapshot, &opts.project_root);
    attach_claim_links(&mut entries);

    let items = entries
        .into_iter()
        .map(ManifestItem::from)
        .chain(unmodelled)
        .collect();
    let manifest = write_manifest(&manifest_path, items)?;
    Ok(RefreshOutcome::Refreshed {
        items: manifest.items.len(),
        missing_sources,
    })
}

/// Rebuild the proof part of `items` from the proof files currently on disk.
///
/// Items are regrouped by `source` (first appearance order); a scene's position is its index
/// within that group. Returns the rebuilt items and the number of groups whose script was
/// missing. Claim links are not attached here.
pub fn refresh_entries(
    items: Vec<ManifestEntry>,
    snapshot: &ArtifactSnapshot,
    project_root: &Path,
) -> (Vec<ManifestEntry>, usize) {
    let mut order = Vec::<String>::new();
    let mut grouped = BTreeMap::<String, Vec<ManifestEntry>>::new();
    for item in items {
        let key = item.source.clone();
        if !grouped.contains_key(&key) {
            order.push(key.clone());
        }
        grouped.entry(key).or_default().push(item);
    }

    let mut updated = Vec::new();
    let mut missing_sources = 0usize;
    for source_rel in order {
        let Some(group) = grouped.remove(&source_rel) else {
            continue;
        };
        if source_rel.is_empty() {
            updated.extend(group);
            continue;
        }

        let source_path = resolve_source(project_root, &source_rel);
        if !source_path.is_file() {
            tracing::warn!(source = %source_path.display(), "source file missing; keeping items");
            missing_sources += 1;
            updated.extend(group);
            continue;
        }

        let stem = file_stem(&source_path);
        let payload = load_proof_payload(&source_path);
        let theorem_id = payload
            .as_ref()
            .map_or_else(|| stem.clone(), |p| p.theorem_id(&stem));

        for (position, item) in group.into_iter().enumerate() {
            let scene = item.scene.clone();
            let from_payload = payload.as_ref().and_then(|p| p.fragment_for(&scene));
            let legacy = match from_payload {
                Some(_) => None,
                None => load_scene_fragment(&source_path, &scene),
            };
            let fragment = from_payload.or(legacy.as_ref().map(|(f, _)| f));

            let resolved =
                resolve_scene_proof(payload.as_ref(), fragment, &scene, position, &theorem_id);
            let proof_source = payload
                .as_ref()
                .map(|p| p.path.as_path())
                .or(legacy.as_ref().map(|(_, path)| path.as_path()))
                .map(|p| display_relative(p, project_root))
                .or(item.proof_source);

            updated.push(ManifestEntry {
                artifact: reuse_artifact(item.artifact, snapshot.get(&item.id)),
                proof: resolved.proof,
                theorem_id: theorem_id.clone(),
                proof_source,
                tags: resolved.tags,
                id: item.id,
                scene,
                source: item.source,
                extra: item.extra,
            });
        }
    }
    (updated, missing_sources)
}

/// The item's own artifact, or the snapshot's when the item carries no video reference.
fn reuse_artifact(own: Artifact, snapshot: Option<&Artifact>) -> Artifact {
    if !own.file.is_empty() || !own.url.is_empty() {
        return own;
    }
    snapshot.cloned().unwrap_or(own)
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/refresh.rs"]
mod tests;
