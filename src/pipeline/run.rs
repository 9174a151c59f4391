use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{CatalogError, CatalogResult};
use crate::foundation::paths::{display_relative, files_with_extension};
use crate::manifest::entry::{entry_id, resolve_scene_proof};
use crate::manifest::merge::attach_claim_links;
use crate::manifest::model::{ManifestEntry, ManifestItem};
use crate::manifest::store::write_manifest;
use crate::proof::payload::{ProofPayload, file_stem, load_proof_payload};
use crate::render::backend::{Quality, RenderJob, SceneRenderer};
use crate::render::segments::place_rendered_scene;
use crate::render::workspace::MediaWorkspace;

/// Options shared by full runs and text-only refreshes.
#[derive(Clone, Debug)]
pub struct PipelineOpts {
    /// Base for the `source`/`proofSource` paths written into the manifest.
    pub project_root: PathBuf,
    /// Folder holding the `*.py` scene scripts and their proof files.
    pub src_dir: PathBuf,
    /// Folder rendered videos are moved into.
    pub out_dir: PathBuf,
    /// Manifest location; `<out_dir>/manifest.json` when unset.
    pub manifest_path: Option<PathBuf>,
    /// Prefix stripped from output paths to form public URLs; the parent of `out_dir` when
    /// unset.
    pub public_root: Option<PathBuf>,
    /// Render quality tier.
    pub quality: Quality,
}

impl PipelineOpts {
    /// Options for `src_dir -> out_dir` rooted at the current directory.
    pub fn new(src_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            src_dir: src_dir.into(),
            out_dir: out_dir.into(),
            manifest_path: None,
            public_root: None,
            quality: Quality::default(),
        }
    }

    /// Set the project root.
    pub fn with_project_root(mut self, project_root: impl Into<PathBuf>) -> Self {
        self.project_root = project_root.into();
        self
    }

    /// Effective manifest path.
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest_path
            .clone()
            .unwrap_or_else(|| self.out_dir.join("manifest.json"))
    }

    /// Effective public root.
    pub fn public_root(&self) -> PathBuf {
        self.public_root.clone().unwrap_or_else(|| {
            self.out_dir
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.out_dir.clone())
        })
    }

    /// Reject options no run can work with.
    pub fn validate(&self) -> CatalogResult<()> {
        if self.out_dir.as_os_str().is_empty() {
            return Err(CatalogError::validation("output directory must be non-empty"));
        }
        Ok(())
    }
}

/// One scene (or whole file, when discovery failed) that did not make it into the manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneFailure {
    /// Script path.
    pub source: PathBuf,
    /// Scene name; `None` when the file's scenes could not be discovered.
    pub scene: Option<String>,
    /// Error text.
    pub message: String,
}

/// Summary of a full run.
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    /// Manifest items written.
    pub rendered: usize,
    /// Per-scene failures, in processing order.
    pub failures: Vec<SceneFailure>,
    /// Where the manifest was written.
    pub manifest_path: PathBuf,
}

impl RunReport {
    /// True when no scene failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Process exit code: `0` on full success, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }
}

/// Render every scene under `opts.src_dir` and write the manifest.
///
/// Scripts are processed in path order, scenes in declaration order, one render at a time. A
/// failing scene is logged and recorded in the report; the manifest always lists every scene
/// that did render. Errors returned from this function are run-level: unusable options, an
/// unavailable renderer, or a manifest that could not be written.
pub fn run_pipeline(
    opts: &PipelineOpts,
    renderer: &mut dyn SceneRenderer,
) -> CatalogResult<RunReport> {
    opts.validate()?;
    let manifest_path = opts.manifest_path();
    let mut report = RunReport {
        manifest_path: manifest_path.clone(),
        ..RunReport::default()
    };

    if !opts.src_dir.is_dir() {
        tracing::info!(src = %opts.src_dir.display(), "skipping render: missing source folder");
        write_manifest(&manifest_path, Vec::new())?;
        return Ok(report);
    }

    let sources = files_with_extension(&opts.src_dir, "py");
    if sources.is_empty() {
        tracing::info!(src = %opts.src_dir.display(), "no .py files found, nothing to render");
        write_manifest(&manifest_path, Vec::new())?;
        return Ok(report);
    }

    if !renderer.is_available() {
        return Err(CatalogError::render(
            "renderer is not available (install manim with `pip install manim`)",
        ));
    }

    std::fs::create_dir_all(&opts.out_dir)
        .with_context(|| format!("create output dir '{}'", opts.out_dir.display()))?;
    let workspace = MediaWorkspace::create(&opts.out_dir)?;

    let mut items = Vec::new();
    for source in &sources {
        render_source(opts, renderer, &workspace, source, &mut items, &mut report.failures);
    }

    attach_claim_links(&mut items);

    if items.is_empty() {
        tracing::info!("completed without rendered videos");
    } else {
        tracing::info!(count = items.len(), "rendered videos");
    }

    let items = items.into_iter().map(ManifestItem::from).collect();
    let manifest = write_manifest(&manifest_path, items)?;
    report.rendered = manifest.items.len();
    workspace.finish(!report.is_success());
    Ok(report)
}

#[tracing::instrument(skip_all, fields(source = %source.display()))]
fn render_source(
    opts: &PipelineOpts,
    renderer: &mut dyn SceneRenderer,
    workspace: &MediaWorkspace,
    source: &Path,
    items: &mut Vec<ManifestEntry>,
    failures: &mut Vec<SceneFailure>,
) {
    let scenes = match renderer.discover(source) {
        Ok(scenes) => scenes,
        Err(e) => {
            tracing::error!(error = %e, "scene discovery failed");
            failures.push(SceneFailure {
                source: source.to_path_buf(),
                scene: None,
                message: e.to_string(),
            });
            return;
        }
    };
    if scenes.is_empty() {
        tracing::info!("no scenes discovered, skipping");
        return;
    }

    let stem = file_stem(source);
    let payload = load_proof_payload(source);
    let theorem_id = payload
        .as_ref()
        .map_or_else(|| stem.clone(), |p| p.theorem_id(&stem));

    for (position, scene) in scenes.iter().enumerate() {
        match render_scene(opts, renderer, workspace, source, payload.as_ref(), &theorem_id, scene, position) {
            Ok(entry) => items.push(entry),
            Err(e) => {
                tracing::error!(scene = %scene, error = %e, "failed to render scene");
                failures.push(SceneFailure {
                    source: source.to_path_buf(),
                    scene: Some(scene.clone()),
                    message: e.to_string(),
                });
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn render_scene(
    opts: &PipelineOpts,
    renderer: &mut dyn SceneRenderer,
    workspace: &MediaWorkspace,
    source: &Path,
    payload: Option<&ProofPayload>,
    theorem_id: &str,
    scene: &str,
    position: usize,
) -> CatalogResult<ManifestEntry> {
    let id = entry_id(&file_stem(source), scene);
    let job = RenderJob {
        source: source.to_path_buf(),
        scene: scene.to_string(),
        output_name: id.clone(),
        media_dir: workspace.job_dir(&id)?,
        quality: opts.quality,
    };
    let rendered = renderer.render(&job)?;
    let (dest, artifact) = place_rendered_scene(
        &rendered,
        &opts.out_dir,
        &opts.public_root(),
        &id,
        opts.quality,
    )?;
    tracing::info!(scene = %scene, video = %dest.display(), "rendered");

    let fragment = payload.and_then(|p| p.fragment_for(scene));
    let resolved = resolve_scene_proof(payload, fragment, scene, position, theorem_id);
    Ok(ManifestEntry {
        id,
        scene: scene.to_string(),
        source: display_relative(source, &opts.project_root),
        artifact,
        proof: resolved.proof,
        theorem_id: theorem_id.to_string(),
        proof_source: payload.map(|p| display_relative(&p.path, &opts.project_root)),
        tags: resolved.tags,
        extra: Default::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/run.rs"]
mod tests;
