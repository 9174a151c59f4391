use std::path::Path;

use anyhow::Context as _;
use serde_json::Value;

use crate::foundation::error::{CatalogError, CatalogResult};
use crate::manifest::model::{Manifest, ManifestItem};

/// Write `{generatedAt, items}` to `path`, creating parent directories.
pub fn write_manifest(path: &Path, items: Vec<ManifestItem>) -> CatalogResult<Manifest> {
    let manifest = Manifest {
        generated_at: chrono::Local::now().to_rfc3339(),
        items,
    };
    write_json(path, &manifest)?;
    tracing::info!(path = %path.display(), items = manifest.items.len(), "wrote manifest");
    Ok(manifest)
}

/// Read the items of an existing manifest.
///
/// A document without an `items` key reads as empty. Items that are not objects are dropped
/// with a warning; objects that do not fit the entry shape come back as
/// [`ManifestItem::Raw`]. An unreadable file, invalid JSON, a document that is not an object
/// or a non-array `items` is a [`CatalogError::Manifest`].
pub fn read_manifest(path: &Path) -> CatalogResult<Vec<ManifestItem>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CatalogError::manifest(format!("could not read '{}': {e}", path.display()))
    })?;
    let doc: Value = serde_json::from_str(&text).map_err(|e| {
        CatalogError::manifest(format!("could not parse '{}': {e}", path.display()))
    })?;
    let Value::Object(mut doc) = doc else {
        return Err(CatalogError::manifest(format!(
            "'{}': document is not an object",
            path.display()
        )));
    };

    let raw_items = match doc.remove("items") {
        None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(CatalogError::manifest(format!(
                "'{}': items is not a list",
                path.display()
            )));
        }
    };

    let mut items = Vec::with_capacity(raw_items.len());
    for (idx, raw) in raw_items.into_iter().enumerate() {
        let Value::Object(raw) = raw else {
            tracing::warn!(index = idx, "dropping non-object manifest item");
            continue;
        };
        let item = ManifestItem::from_object(raw);
        if matches!(item, ManifestItem::Raw(_)) {
            tracing::warn!(index = idx, "keeping manifest item that does not fit the entry shape");
        }
        items.push(item);
    }
    Ok(items)
}

/// Pretty-print `value` as JSON into `path`.
pub(crate) fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> CatalogResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create manifest dir '{}'", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CatalogError::manifest(format!("serialize manifest: {e}")))?;
    std::fs::write(path, text).with_context(|| format!("write manifest '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/store.rs"]
mod tests;
