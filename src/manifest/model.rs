use serde::Deserialize as _;
use serde_json::{Map, Value};

use crate::taxonomy::tags::Tags;

/// The manifest document consumed by the front end.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// ISO-8601 timestamp of the run that wrote the file.
    pub generated_at: String,
    /// Entries in run order.
    pub items: Vec<ManifestItem>,
}

/// One item of a manifest file.
///
/// Objects that do not fit [`ManifestEntry`] (wrong field types written by another tool) are
/// kept as [`ManifestItem::Raw`] and written back unchanged.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ManifestItem {
    /// An item that fits the entry model.
    Entry(ManifestEntry),
    /// An object this version cannot model.
    Raw(Map<String, Value>),
}

impl ManifestItem {
    /// Model `raw` as an entry when possible, else keep it as is.
    pub fn from_object(raw: Map<String, Value>) -> Self {
        match serde_json::from_value::<ManifestEntry>(Value::Object(raw.clone())) {
            Ok(entry) => Self::Entry(entry),
            Err(_) => Self::Raw(raw),
        }
    }
}

impl From<ManifestEntry> for ManifestItem {
    fn from(entry: ManifestEntry) -> Self {
        Self::Entry(entry)
    }
}

impl<'de> serde::Deserialize<'de> for ManifestItem {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(d)?;
        Ok(Self::from_object(raw))
    }
}

/// `null` reads as the field's default, like a missing key.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// One rendered (or previously rendered) scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// `<sourceStem>__<sceneName>`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Scene name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub scene: String,
    /// Project-relative path of the originating script; empty when unknown.
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    /// Rendered video reference.
    #[serde(flatten)]
    pub artifact: Artifact,
    /// Proof content resolved for this entry.
    #[serde(default, deserialize_with = "null_as_default")]
    pub proof: ProofView,
    /// Theorem group key.
    #[serde(default, deserialize_with = "null_as_default")]
    pub theorem_id: String,
    /// Project-relative path of the proof-description file that fed this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_source: Option<String>,
    /// Normalized taxonomy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    /// Fields this version does not know about, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ManifestEntry {
    /// Group key used when merging: `theoremId`, then `proof.theoremId`, then `id`.
    pub fn group_key(&self) -> &str {
        [self.theorem_id.as_str(), self.proof.theorem_id.as_str()]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or(&self.id)
    }
}

/// Video reference of a manifest entry.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Artifact {
    /// Video path relative to the public root.
    #[serde(default, deserialize_with = "null_as_default")]
    pub file: String,
    /// Public URL of the video.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    /// Quality flag the video was rendered at.
    #[serde(default, deserialize_with = "null_as_default")]
    pub quality: String,
    /// Named sections in playback order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<Section>,
}

/// A named sub-portion of a rendered video.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Section {
    /// Zero-based playback index.
    #[serde(default, deserialize_with = "null_as_default")]
    pub index: usize,
    /// `<entryId>__<rawLabel>`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Humanized label.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Same text as `name`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Path relative to the public root.
    #[serde(default, deserialize_with = "null_as_default")]
    pub file: String,
    /// Public URL.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    /// Unknown fields, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Proof content attached to a manifest entry.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofView {
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Statement; empty when the source has none.
    #[serde(default, deserialize_with = "null_as_default")]
    pub statement: String,
    /// Steps for the claim this entry renders.
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<Value>,
    /// The theorem group's reconciled claim list.
    #[serde(default, deserialize_with = "null_as_default")]
    pub claims: Vec<ClaimRef>,
    /// Id of the claim this entry renders.
    #[serde(default, deserialize_with = "null_as_default")]
    pub active_claim_id: String,
    /// Theorem group key.
    #[serde(default, deserialize_with = "null_as_default")]
    pub theorem_id: String,
}

/// Claim summary as listed in every entry of a theorem group.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRef {
    /// Claim id.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Display label.
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    /// Scene the author pinned to this claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<String>,
    /// Claim statement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement: Option<String>,
    /// Id of the manifest entry that renders this claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_id: Option<String>,
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/model.rs"]
mod tests;
