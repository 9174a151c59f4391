use std::collections::BTreeSet;
use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use regex::Regex;

use crate::foundation::error::{CatalogError, CatalogResult};
use crate::proof::payload::file_stem;
use crate::render::backend::{RawSegment, RenderJob, RenderedScene, SceneRenderer};

static CLASS_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^class\s+([A-Za-z_]\w*)\s*\(([^)]*)\)\s*:").expect("class pattern is valid")
});

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Options for [`ManimRenderer`].
#[derive(Clone, Debug)]
pub struct ManimOpts {
    /// Python interpreter that has `manim` installed.
    pub program: PathBuf,
    /// Upper bound for a single scene render; the child is killed past it.
    pub timeout: Duration,
    /// Extra arguments appended to every `manim` invocation.
    pub extra_args: Vec<String>,
}

impl ManimOpts {
    /// Options that run `<program> -m manim` with a 30 minute per-scene timeout.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: Duration::from_secs(30 * 60),
            extra_args: Vec::new(),
        }
    }
}

impl Default for ManimOpts {
    fn default() -> Self {
        Self::new("python3")
    }
}

/// [`SceneRenderer`] backed by the `manim` command line.
#[derive(Clone, Debug, Default)]
pub struct ManimRenderer {
    opts: ManimOpts,
}

impl ManimRenderer {
    /// Create a renderer with the given options.
    pub fn new(opts: ManimOpts) -> Self {
        Self { opts }
    }

    fn command(&self, job: &RenderJob) -> Command {
        let mut cmd = Command::new(&self.opts.program);
        cmd.args(["-m", "manim"])
            .arg(&job.source)
            .arg(&job.scene)
            .arg(format!("-q{}", job.quality.flag()))
            .arg("--disable_caching")
            .arg("--media_dir")
            .arg(&job.media_dir)
            .args(["--output_file", job.output_name.as_str()])
            .args(["--format", "mp4", "--save_sections"])
            .args(&self.opts.extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl SceneRenderer for ManimRenderer {
    fn discover(&mut self, source: &Path) -> CatalogResult<Vec<String>> {
        let text = std::fs::read_to_string(source)
            .with_context(|| format!("read scene script '{}'", source.display()))?;
        Ok(discover_scene_classes(&text))
    }

    fn render(&mut self, job: &RenderJob) -> CatalogResult<RenderedScene> {
        // Manim expects the sections folder to exist before it writes into it.
        let sections_dir = job
            .media_dir
            .join("videos")
            .join(file_stem(&job.source))
            .join(job.quality.folder())
            .join("sections");
        std::fs::create_dir_all(&sections_dir)
            .with_context(|| format!("create sections dir '{}'", sections_dir.display()))?;

        tracing::info!(source = %job.source.display(), scene = %job.scene, "rendering");

        let mut child = self.command(job).spawn().map_err(|e| {
            CatalogError::render(format!(
                "failed to spawn '{} -m manim' (is manim installed?): {e}",
                self.opts.program.display()
            ))
        })?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| CatalogError::render("failed to open manim stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok::<_, std::io::Error>(bytes)
        });

        let status = wait_with_timeout(&mut child, self.opts.timeout)?;
        let stderr_bytes = stderr_drain
            .join()
            .ok()
            .and_then(Result::ok)
            .unwrap_or_default();

        let Some(status) = status else {
            return Err(CatalogError::render(format!(
                "manim timed out after {}s rendering {}; temp media at {}",
                self.opts.timeout.as_secs(),
                job.scene,
                job.media_dir.display()
            )));
        };
        if !status.success() {
            return Err(CatalogError::render(format!(
                "manim exited with status {status}: {}; temp media at {}",
                stderr_tail(&stderr_bytes),
                job.media_dir.display()
            )));
        }

        collect_outputs(&job.media_dir, &job.output_name).ok_or_else(|| {
            CatalogError::render(format!("could not locate rendered video for {}", job.scene))
        })
    }

    /// True when `<program> -m manim --version` succeeds.
    fn is_available(&self) -> bool {
        Command::new(&self.opts.program)
            .args(["-m", "manim", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

/// Scene classes declared in a Manim script, in declaration order.
///
/// A class counts when one of its bases ends in `Scene` (`Scene`, `MovingCameraScene`,
/// `manim.ThreeDScene`, ...) or is a scene class declared earlier in the same file.
pub fn discover_scene_classes(text: &str) -> Vec<String> {
    let mut scenes = Vec::<String>::new();
    let mut seen = BTreeSet::<String>::new();
    for cap in CLASS_DECL.captures_iter(text) {
        let name = &cap[1];
        if name == "Scene" || seen.contains(name) {
            continue;
        }
        let is_scene = cap[2].split(',').any(|base| {
            let base = base.trim();
            let short = base.rsplit('.').next().unwrap_or(base);
            short.ends_with("Scene") || seen.contains(short)
        });
        if is_scene {
            seen.insert(name.to_string());
            scenes.push(name.to_string());
        }
    }
    scenes
}

/// Poll `child` until it exits or `timeout` elapses. `Ok(None)` means it was killed.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> CatalogResult<Option<ExitStatus>> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait().context("wait for manim")? {
            return Ok(Some(status));
        }
        if started.elapsed() >= timeout {
            // The child may exit between try_wait and kill; either way it gets reaped.
            let _ = child.kill();
            child.wait().context("reap timed out manim")?;
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Locate the produced video and its sections inside a job's media dir.
fn collect_outputs(media_dir: &Path, output_name: &str) -> Option<RenderedScene> {
    let mut video = None;
    let mut segments = Vec::new();
    for entry in walkdir::WalkDir::new(media_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("mp4")
        {
            continue;
        }
        let stem = file_stem(path);
        if stem == output_name {
            video = Some(path.to_path_buf());
        } else if path.components().any(|c| c.as_os_str() == "sections")
            || stem.to_lowercase().contains("section")
        {
            segments.push(RawSegment {
                label: stem,
                path: path.to_path_buf(),
            });
        }
    }
    segments.sort_by(|a, b| a.path.cmp(&b.path));
    Some(RenderedScene {
        video: video?,
        segments,
    })
}

fn stderr_tail(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text.trim().lines().collect();
    let start = lines.len().saturating_sub(20);
    lines[start..].join("\n")
}

#[cfg(test)]
#[path = "../../tests/unit/render/manim.rs"]
mod tests;
