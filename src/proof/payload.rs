use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde_json::{Map, Value};

use crate::foundation::error::{CatalogError, CatalogResult};
use crate::proof::claim::{Claim, normalize_claims};
use crate::taxonomy::tags::{Tags, normalize_tags};

/// Proof content resolved for one scene: header text plus ordered steps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fragment {
    /// Fragment title.
    pub title: Option<String>,
    /// Fragment description.
    pub description: Option<String>,
    /// Fragment statement.
    pub statement: Option<String>,
    /// Ordered proof steps (opaque).
    pub steps: Vec<Value>,
    /// Taxonomy declared on the fragment itself.
    pub tags: Tags,
}

impl Fragment {
    fn from_steps(steps: Vec<Value>) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            title: text_field(obj, "title"),
            description: text_field(obj, "description"),
            statement: text_field(obj, "statement"),
            steps: obj
                .get("steps")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            tags: normalize_tags(&Value::Object(obj.clone())),
        }
    }

    /// Resolve any accepted fragment shape (bare step array or object).
    fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::Array(steps) => Some(Self::from_steps(steps.clone())),
            Value::Object(obj) => Some(Self::from_object(obj)),
            _ => None,
        }
    }
}

/// A parsed proof-description file.
///
/// All accepted JSON shapes are resolved here once:
///
/// - a bare array of steps becomes [`ProofPayload::root`]
/// - an object with a `steps` array is itself the root fragment
/// - an object with a `scenes` map contributes one [`Fragment`] per scene name
/// - an object with a `claims` array contributes [`ProofPayload::claims`]
///
/// The last three may coexist in one object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProofPayload {
    /// File the payload was read from.
    pub path: PathBuf,
    /// Explicit theorem id.
    pub id: Option<String>,
    /// Root title.
    pub title: Option<String>,
    /// Root description.
    pub description: Option<String>,
    /// Root statement.
    pub statement: Option<String>,
    /// Taxonomy normalized from the root object.
    pub tags: Tags,
    /// Claims in authored order.
    pub claims: Vec<Claim>,
    /// Legacy per-scene content keyed by scene name.
    pub scenes: BTreeMap<String, Fragment>,
    /// Whole-payload fragment, present when the root carries steps.
    pub root: Option<Fragment>,
}

impl ProofPayload {
    /// Resolve a decoded JSON document into a payload.
    pub fn from_value(path: impl Into<PathBuf>, value: &Value) -> CatalogResult<Self> {
        let path = path.into();
        match value {
            Value::Array(steps) => Ok(Self {
                path,
                root: Some(Fragment::from_steps(steps.clone())),
                ..Self::default()
            }),
            Value::Object(obj) => {
                let scenes = obj
                    .get("scenes")
                    .and_then(Value::as_object)
                    .map(|m| {
                        m.iter()
                            .filter_map(|(name, v)| Some((name.clone(), Fragment::from_value(v)?)))
                            .collect()
                    })
                    .unwrap_or_default();
                let root = obj
                    .get("steps")
                    .is_some_and(Value::is_array)
                    .then(|| Fragment::from_object(obj));

                Ok(Self {
                    id: obj.get("id").and_then(id_text),
                    title: text_field(obj, "title"),
                    description: text_field(obj, "description"),
                    statement: text_field(obj, "statement"),
                    tags: normalize_tags(value),
                    claims: normalize_claims(value),
                    scenes,
                    root,
                    path,
                })
            }
            _ => Err(CatalogError::payload(format!(
                "'{}' must hold a JSON object or array",
                path.display()
            ))),
        }
    }

    /// Proof fragment for `scene`: its `scenes` entry, else the whole-payload fragment.
    pub fn fragment_for(&self, scene: &str) -> Option<&Fragment> {
        self.scenes.get(scene).or(self.root.as_ref())
    }

    /// Theorem group key: explicit `id`, else the normalized number, else `fallback_stem`.
    ///
    /// The number is the output of [`normalize_tags`], so a root-level `number`, `numbering`
    /// or `label` also groups the file's scenes when `tags.number` is absent.
    pub fn theorem_id(&self, fallback_stem: &str) -> String {
        self.id
            .clone()
            .or_else(|| self.tags.number.clone())
            .unwrap_or_else(|| fallback_stem.to_string())
    }
}

/// `<dir>/<stem>.proof.json` beside a source file.
pub fn proof_path_for(source: &Path) -> PathBuf {
    source.with_file_name(format!("{}.proof.json", file_stem(source)))
}

/// Legacy per-scene files consulted by a text-only refresh, in lookup order:
/// `<stem>__<scene>.proof.json`, then `<scene>.proof.json`.
pub fn legacy_fragment_candidates(source: &Path, scene: &str) -> Vec<PathBuf> {
    vec![
        source.with_file_name(format!("{}__{scene}.proof.json", file_stem(source))),
        source.with_file_name(format!("{scene}.proof.json")),
    ]
}

/// Read and resolve one proof-description file.
pub fn read_proof_payload(path: &Path) -> CatalogResult<ProofPayload> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read proof file '{}'", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| CatalogError::payload(format!("'{}': {e}", path.display())))?;
    ProofPayload::from_value(path, &value)
}

/// Load the proof payload that belongs to `source`.
///
/// A missing file yields `None`. A malformed one is logged and also yields `None`: proof text
/// is optional and never aborts a run.
pub fn load_proof_payload(source: &Path) -> Option<ProofPayload> {
    let candidate = proof_path_for(source);
    if !candidate.is_file() {
        return None;
    }
    match read_proof_payload(&candidate) {
        Ok(payload) => Some(payload),
        Err(e) => {
            tracing::warn!(path = %candidate.display(), error = %e, "failed to read proof file");
            None
        }
    }
}

/// First legacy per-scene file that yields a fragment for `scene`.
pub fn load_scene_fragment(source: &Path, scene: &str) -> Option<(Fragment, PathBuf)> {
    for candidate in legacy_fragment_candidates(source, scene) {
        if !candidate.is_file() {
            continue;
        }
        match read_proof_payload(&candidate) {
            Ok(payload) => {
                if let Some(fragment) = payload.fragment_for(scene) {
                    return Some((fragment.clone(), candidate));
                }
            }
            Err(e) => {
                tracing::warn!(path = %candidate.display(), error = %e, "skipped proof file");
            }
        }
    }
    None
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn id_text(v: &Value) -> Option<String> {
    let raw = match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/proof/payload.rs"]
mod tests;
