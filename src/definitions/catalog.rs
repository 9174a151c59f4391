use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::foundation::error::CatalogResult;
use crate::foundation::paths::files_with_extension;
use crate::manifest::store::write_json;
use crate::proof::payload::file_stem;
use crate::taxonomy::tags::normalize_tags;

/// Options for [`build_definitions`].
#[derive(Clone, Debug)]
pub struct DefinitionsOpts {
    /// Folder holding `*.json` definition files.
    pub src_dir: PathBuf,
    /// Output folder; the manifest defaults to `<out_dir>/manifest.json`.
    pub out_dir: PathBuf,
    /// Explicit manifest location.
    pub manifest_path: Option<PathBuf>,
}

impl DefinitionsOpts {
    /// Options for `src_dir -> out_dir`.
    pub fn new(src_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            src_dir: src_dir.into(),
            out_dir: out_dir.into(),
            manifest_path: None,
        }
    }

    /// Effective manifest path.
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest_path
            .clone()
            .unwrap_or_else(|| self.out_dir.join("manifest.json"))
    }
}

/// Definitions manifest as written to disk.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionsManifest {
    /// Local time of the run, RFC 3339.
    pub generated_at: String,
    /// Normalized definition objects.
    pub items: Vec<Value>,
}

/// Normalized definitions held by one file.
///
/// A file holds a single object, an array of objects, or `{ "items": [...] }`. Unreadable or
/// malformed files are logged and contribute nothing.
pub fn load_definitions_from_file(path: &Path) -> Vec<Value> {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str::<Value>(&text).map_err(|e| e.to_string()));
    let value = match parsed {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable definition file");
            return Vec::new();
        }
    };

    let raw = match value {
        Value::Array(list) => list,
        Value::Object(mut obj) => match obj.remove("items") {
            Some(Value::Array(list)) => list,
            Some(other) => {
                obj.insert("items".into(), other);
                vec![Value::Object(obj)]
            }
            None => vec![Value::Object(obj)],
        },
        _ => Vec::new(),
    };

    let stem = file_stem(path);
    raw.into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match item {
            Value::Object(obj) => Some(normalize_definition(obj, &stem, idx)),
            _ => None,
        })
        .collect()
}

fn normalize_definition(mut def: Map<String, Value>, stem: &str, idx: usize) -> Value {
    if is_blank(def.get("id")) {
        def.insert("id".into(), Value::String(format!("{stem}__{idx}")));
    }
    if is_blank(def.get("term")) {
        let term = def
            .get("title")
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Definition")
            .to_string();
        def.insert("term".into(), Value::String(term));
    }
    if let Some(Value::Object(animation)) = def.get_mut("animation") {
        fill_url(animation);
        if let Some(Value::Array(sections)) = animation.get_mut("sections") {
            for section in sections.iter_mut().filter_map(Value::as_object_mut) {
                fill_url(section);
            }
        }
    }

    let tags = normalize_tags(&Value::Object(def.clone()));
    if !tags.is_empty()
        && let Ok(tags) = serde_json::to_value(&tags)
    {
        def.insert("tags".into(), tags);
    }
    Value::Object(def)
}

/// `url = "/" + file` when only `file` is present.
fn fill_url(obj: &mut Map<String, Value>) {
    if !is_blank(obj.get("url")) {
        return;
    }
    if let Some(file) = obj.get("file").and_then(Value::as_str).filter(|f| !f.is_empty()) {
        let url = format!("/{}", file.trim_start_matches('/'));
        obj.insert("url".into(), Value::String(url));
    }
}

fn is_blank(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

/// Bundle every `*.json` file under `opts.src_dir` into one definitions manifest.
///
/// A missing source folder yields an empty manifest.
#[tracing::instrument(skip_all, fields(src = %opts.src_dir.display()))]
pub fn build_definitions(opts: &DefinitionsOpts) -> CatalogResult<DefinitionsManifest> {
    let files = if opts.src_dir.is_dir() {
        files_with_extension(&opts.src_dir, "json")
    } else {
        tracing::info!("definitions folder missing, writing empty manifest");
        Vec::new()
    };

    let items: Vec<Value> = files
        .iter()
        .flat_map(|path| load_definitions_from_file(path))
        .collect();

    let manifest = DefinitionsManifest {
        generated_at: chrono::Local::now().to_rfc3339(),
        items,
    };
    let path = opts.manifest_path();
    write_json(&path, &manifest)?;
    tracing::info!(count = manifest.items.len(), path = %path.display(), "wrote definitions manifest");
    Ok(manifest)
}

#[cfg(test)]
#[path = "../../tests/unit/definitions/catalog.rs"]
mod tests;
