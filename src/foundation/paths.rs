use std::path::{Component, Path, PathBuf};

/// Render `path` relative to `base` with forward slashes.
///
/// Returns `None` when `path` does not live under `base`.
pub fn posix_relative(path: &Path, base: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Public URL for a file path relative to the served root: always a single leading `/`.
pub fn public_url(rel_file: &str) -> String {
    let s = rel_file.replace('\\', "/");
    format!("/{}", s.trim_start_matches('/'))
}

/// Forward-slash rendering of an arbitrary path, used when no base applies.
pub(crate) fn to_posix(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Manifest-facing path: relative to `base` when possible, otherwise the full path.
pub(crate) fn display_relative(path: &Path, base: &Path) -> String {
    posix_relative(path, base).unwrap_or_else(|| to_posix(path))
}

/// Resolve a manifest `source` field back to a filesystem path.
///
/// Relative values are joined onto `project_root`; `.` segments are dropped and `..` pops one
/// level so the result does not depend on the current directory.
pub(crate) fn resolve_source(project_root: &Path, source: &str) -> PathBuf {
    let s = source.replace('\\', "/");
    let raw = Path::new(&s);
    if raw.is_absolute() {
        return raw.to_path_buf();
    }

    let mut out = project_root.to_path_buf();
    for part in s.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            p => out.push(p),
        }
    }
    out
}

/// Files directly inside `dir` with extension `ext`, sorted by file name.
///
/// Unreadable entries are logged and skipped.
pub(crate) fn files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(ext) {
            files.push(path.to_path_buf());
        }
    }
    files
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/paths.rs"]
mod tests;
