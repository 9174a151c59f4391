use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Context as _;
use regex::Regex;

use crate::foundation::error::CatalogResult;
use crate::foundation::paths::{display_relative, public_url};
use crate::manifest::model::{Artifact, Section};
use crate::render::backend::{Quality, RenderedScene};

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_\\-]+").expect("separator pattern is valid"));

/// Display name for a raw section label.
///
/// `section_base_case` becomes `Base Case`; labels that clean up to nothing become
/// `Section <index + 1>`.
pub fn humanize_section(label: &str, index: usize) -> String {
    let cleaned = label.replace(['/', '\\'], " ");
    let cleaned = cleaned.strip_prefix("section_").unwrap_or(&cleaned);
    let cleaned = SEPARATORS.replace_all(cleaned, " ");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return format!("Section {}", index + 1);
    }
    title_case(cleaned)
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Move a render's outputs into `out_dir` and describe them for the manifest.
///
/// The main video lands at `<out_dir>/<output_name>.mp4`, sections at
/// `<out_dir>/sections/<output_name>__<label>.mp4`. Manifest paths are relative to
/// `public_root`.
pub fn place_rendered_scene(
    rendered: &RenderedScene,
    out_dir: &Path,
    public_root: &Path,
    output_name: &str,
    quality: Quality,
) -> CatalogResult<(PathBuf, Artifact)> {
    let dest = out_dir.join(format!("{output_name}.mp4"));
    move_file(&rendered.video, &dest)?;
    let file = display_relative(&dest, public_root);

    let mut segments = rendered.segments.clone();
    segments.sort_by(|a, b| a.path.cmp(&b.path));

    let mut sections = Vec::with_capacity(segments.len());
    for (index, seg) in segments.iter().enumerate() {
        let id = format!("{output_name}__{}", seg.label);
        let seg_dest = out_dir.join("sections").join(format!("{id}.mp4"));
        move_file(&seg.path, &seg_dest)?;

        let name = humanize_section(&seg.label, index);
        let seg_file = display_relative(&seg_dest, public_root);
        sections.push(Section {
            index,
            id,
            description: name.clone(),
            name,
            url: public_url(&seg_file),
            file: seg_file,
            extra: Default::default(),
        });
    }

    Ok((
        dest,
        Artifact {
            url: public_url(&file),
            file,
            quality: quality.flag().to_string(),
            sections,
        },
    ))
}

/// Rename, falling back to copy + delete across filesystems.
fn move_file(from: &Path, to: &Path) -> CatalogResult<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to)
        .with_context(|| format!("copy '{}' to '{}'", from.display(), to.display()))?;
    std::fs::remove_file(from).with_context(|| format!("remove '{}'", from.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/segments.rs"]
mod tests;
