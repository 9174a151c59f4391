use super::*;
use crate::render::backend::{RawSegment, RenderedScene};
use serde_json::json;
use std::collections::BTreeSet;

/// Renderer that fakes Manim by writing placeholder files into the job's media dir.
#[derive(Default)]
struct FakeRenderer {
    fail_scenes: BTreeSet<String>,
    fail_discovery: bool,
    unavailable: bool,
    rendered: Vec<String>,
}

impl SceneRenderer for FakeRenderer {
    fn discover(&mut self, source: &Path) -> CatalogResult<Vec<String>> {
        if self.fail_discovery {
            return Err(CatalogError::render("cannot parse script"));
        }
        let text = std::fs::read_to_string(source).unwrap();
        Ok(crate::render::manim::discover_scene_classes(&text))
    }

    fn render(&mut self, job: &RenderJob) -> CatalogResult<RenderedScene> {
        self.rendered.push(job.scene.clone());
        if self.fail_scenes.contains(&job.scene) {
            return Err(CatalogError::render(format!("boom in {}", job.scene)));
        }
        let video = job.media_dir.join(format!("{}.mp4", job.output_name));
        std::fs::write(&video, b"video").unwrap();
        let seg = job.media_dir.join("sections").join("step_one.mp4");
        std::fs::create_dir_all(seg.parent().unwrap()).unwrap();
        std::fs::write(&seg, b"seg").unwrap();
        Ok(RenderedScene {
            video,
            segments: vec![RawSegment {
                label: "step_one".into(),
                path: seg,
            }],
        })
    }

    fn is_available(&self) -> bool {
        !self.unavailable
    }
}

fn project() -> (tempfile::TempDir, PipelineOpts) {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("proofs");
    std::fs::create_dir_all(&src).unwrap();
    let opts = PipelineOpts::new(&src, dir.path().join("public").join("proofs"))
        .with_project_root(dir.path());
    (dir, opts)
}

fn manifest_json(opts: &PipelineOpts) -> serde_json::Value {
    let text = std::fs::read_to_string(opts.manifest_path()).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn opts_defaults_derive_from_out_dir() {
    let opts = PipelineOpts::new("src", "public/proofs");
    assert_eq!(opts.manifest_path(), Path::new("public/proofs/manifest.json"));
    assert_eq!(opts.public_root(), Path::new("public"));
    assert_eq!(opts.quality, Quality::Medium);
}

#[test]
fn empty_out_dir_is_rejected() {
    let opts = PipelineOpts::new("src", "");
    assert!(matches!(opts.validate(), Err(CatalogError::Validation(_))));
}

#[test]
fn missing_source_folder_writes_empty_manifest() {
    let (_dir, mut opts) = project();
    opts.src_dir = opts.src_dir.join("nope");
    let mut renderer = FakeRenderer {
        unavailable: true,
        ..Default::default()
    };
    let report = run_pipeline(&opts, &mut renderer).unwrap();
    assert_eq!(report.exit_code(), 0);
    assert_eq!(manifest_json(&opts)["items"], json!([]));
}

#[test]
fn unavailable_renderer_is_a_run_error() {
    let (_dir, opts) = project();
    std::fs::write(opts.src_dir.join("a.py"), "class A(Scene): pass\n").unwrap();
    let mut renderer = FakeRenderer {
        unavailable: true,
        ..Default::default()
    };
    let err = run_pipeline(&opts, &mut renderer).unwrap_err();
    assert!(matches!(err, CatalogError::Render(_)));
}

#[test]
fn renders_scenes_with_matched_claims() {
    let (dir, opts) = project();
    std::fs::write(
        opts.src_dir.join("demorgan.py"),
        "class Part1(Scene): pass\nclass Part2(Scene): pass\n",
    )
    .unwrap();
    std::fs::write(
        opts.src_dir.join("demorgan.proof.json"),
        json!({
            "title": "De Morgan",
            "claims": [
                { "id": "a", "scene": "Part1", "statement": "law1" },
                { "id": "b", "scene": "Part2", "statement": "law2" }
            ]
        })
        .to_string(),
    )
    .unwrap();

    let mut renderer = FakeRenderer::default();
    let report = run_pipeline(&opts, &mut renderer).unwrap();
    assert!(report.is_success());
    assert_eq!(report.rendered, 2);
    assert_eq!(renderer.rendered, vec!["Part1", "Part2"]);

    let manifest = manifest_json(&opts);
    let items = manifest["items"].as_array().unwrap();
    assert_eq!(items[0]["id"], "demorgan__Part1");
    assert_eq!(items[0]["source"], "proofs/demorgan.py");
    assert_eq!(items[0]["proofSource"], "proofs/demorgan.proof.json");
    assert_eq!(items[0]["file"], "proofs/demorgan__Part1.mp4");
    assert_eq!(items[0]["url"], "/proofs/demorgan__Part1.mp4");
    assert_eq!(items[0]["quality"], "m");
    assert_eq!(items[0]["sections"][0]["name"], "Step One");
    assert_eq!(items[0]["proof"]["activeClaimId"], "a");
    assert_eq!(items[1]["proof"]["activeClaimId"], "b");
    assert_eq!(items[0]["proof"]["claims"], items[1]["proof"]["claims"]);
    assert_eq!(
        items[0]["proof"]["claims"][0]["animationId"],
        "demorgan__Part1"
    );
    assert_eq!(items[0]["theoremId"], "demorgan");

    assert!(dir.path().join("public/proofs/demorgan__Part1.mp4").is_file());
    assert!(
        dir.path()
            .join("public/proofs/sections/demorgan__Part1__step_one.mp4")
            .is_file()
    );
    assert!(!opts.out_dir.join(MediaWorkspace::DIR_NAME).exists());
}

#[test]
fn scene_failure_is_isolated_and_keeps_temp_media() {
    let (_dir, opts) = project();
    std::fs::write(
        opts.src_dir.join("pair.py"),
        "class Good(Scene): pass\nclass Bad(Scene): pass\n",
    )
    .unwrap();

    let mut renderer = FakeRenderer {
        fail_scenes: BTreeSet::from(["Bad".to_string()]),
        ..Default::default()
    };
    let report = run_pipeline(&opts, &mut renderer).unwrap();
    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.rendered, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].scene.as_deref(), Some("Bad"));

    let manifest = manifest_json(&opts);
    assert_eq!(manifest["items"].as_array().unwrap().len(), 1);
    assert_eq!(manifest["items"][0]["proof"]["activeClaimId"], "main");
    assert!(opts.out_dir.join(MediaWorkspace::DIR_NAME).exists());
}

#[test]
fn discovery_failure_counts_as_failure() {
    let (_dir, opts) = project();
    std::fs::write(opts.src_dir.join("x.py"), "class X(Scene): pass\n").unwrap();
    let mut renderer = FakeRenderer {
        fail_discovery: true,
        ..Default::default()
    };
    let report = run_pipeline(&opts, &mut renderer).unwrap();
    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.failures[0].scene, None);
    assert_eq!(manifest_json(&opts)["items"], json!([]));
}

#[test]
fn sources_are_processed_in_path_order() {
    let (_dir, opts) = project();
    std::fs::write(opts.src_dir.join("b.py"), "class B(Scene): pass\n").unwrap();
    std::fs::write(opts.src_dir.join("a.py"), "class A(Scene): pass\n").unwrap();
    std::fs::write(opts.src_dir.join("notes.txt"), "class N(Scene): pass\n").unwrap();

    let mut renderer = FakeRenderer::default();
    run_pipeline(&opts, &mut renderer).unwrap();
    assert_eq!(renderer.rendered, vec!["A", "B"]);
}
