use std::path::{Path, PathBuf};

use crate::foundation::error::CatalogResult;

/// Render quality tier, mapped onto Manim's `-q<flag>` presets.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize,
)]
pub enum Quality {
    /// 480p at 15 fps.
    #[value(name = "l")]
    #[serde(rename = "l")]
    Low,
    /// 720p at 30 fps.
    #[default]
    #[value(name = "m")]
    #[serde(rename = "m")]
    Medium,
    /// 1080p at 60 fps.
    #[value(name = "h")]
    #[serde(rename = "h")]
    High,
    /// 2160p at 60 fps.
    #[value(name = "k")]
    #[serde(rename = "k")]
    Ultra,
}

impl Quality {
    /// Single-letter flag (`l`, `m`, `h`, `k`).
    pub fn flag(self) -> &'static str {
        match self {
            Self::Low => "l",
            Self::Medium => "m",
            Self::High => "h",
            Self::Ultra => "k",
        }
    }

    /// Folder Manim writes this quality's videos into.
    pub fn folder(self) -> &'static str {
        match self {
            Self::Low => "480p15",
            Self::Medium => "720p30",
            Self::High => "1080p60",
            Self::Ultra => "2160p60",
        }
    }
}

/// One render request.
#[derive(Clone, Debug)]
pub struct RenderJob {
    /// Scene script.
    pub source: PathBuf,
    /// Scene (class) name inside the script.
    pub scene: String,
    /// Stem the produced video must carry; doubles as the manifest entry id.
    pub output_name: String,
    /// Directory exclusively owned by this render for intermediate media.
    pub media_dir: PathBuf,
    /// Quality tier.
    pub quality: Quality,
}

/// A named sub-portion of a rendered video, as produced by the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawSegment {
    /// Raw label, typically the file stem (`section_0`, `Krok 1`, ...).
    pub label: String,
    /// Location of the segment video.
    pub path: PathBuf,
}

/// What a successful render produced, still inside the job's media dir.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedScene {
    /// Main video.
    pub video: PathBuf,
    /// Segments in playback order.
    pub segments: Vec<RawSegment>,
}

/// External animation renderer.
///
/// Implementations are invoked sequentially, one scene at a time.
pub trait SceneRenderer {
    /// Scene identifiers declared in `source`, in declaration order.
    fn discover(&mut self, source: &Path) -> CatalogResult<Vec<String>>;

    /// Render one scene. Failure is scoped to this scene only.
    fn render(&mut self, job: &RenderJob) -> CatalogResult<RenderedScene>;

    /// Probe run once before any scene is rendered.
    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
