use super::*;
use crate::manifest::model::ManifestEntry;
use serde_json::json;

#[test]
fn written_manifest_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("manifest.json");
    let item: ManifestEntry =
        serde_json::from_value(json!({ "id": "a__S", "scene": "S", "theoremId": "a" })).unwrap();

    let written = write_manifest(&path, vec![item.clone().into()]).unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(&written.generated_at).is_ok());

    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(doc["generatedAt"].is_string());
    assert_eq!(doc["items"][0]["id"], json!("a__S"));

    assert_eq!(read_manifest(&path).unwrap(), vec![ManifestItem::Entry(item)]);
}

#[test]
fn empty_manifest_has_an_items_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.json");
    write_manifest(&path, Vec::new()).unwrap();
    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["items"], json!([]));
}

#[test]
fn structural_corruption_is_a_manifest_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.json");

    std::fs::write(&path, "{ nope").unwrap();
    assert!(matches!(read_manifest(&path), Err(CatalogError::Manifest(_))));

    std::fs::write(&path, r#"{"items": {"a": 1}}"#).unwrap();
    let err = read_manifest(&path).unwrap_err();
    assert!(err.to_string().contains("items is not a list"));

    assert!(matches!(
        read_manifest(&dir.path().join("missing.json")),
        Err(CatalogError::Manifest(_))
    ));
}

#[test]
fn non_object_items_are_dropped_and_odd_objects_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.json");
    std::fs::write(
        &path,
        r#"{"items": [1, "x", {"id": "ok"}, {"id": "bad", "sections": "nope"}]}"#,
    )
    .unwrap();
    let items = read_manifest(&path).unwrap();
    assert_eq!(items.len(), 2);
    assert!(matches!(&items[0], ManifestItem::Entry(e) if e.id == "ok"));
    let ManifestItem::Raw(raw) = &items[1] else {
        panic!("expected a raw item, got {:?}", items[1]);
    };
    assert_eq!(raw["sections"], json!("nope"));
}

#[test]
fn null_fields_read_as_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.json");
    std::fs::write(
        &path,
        json!({ "items": [{
            "id": "x__A", "scene": null, "source": "", "proof": null,
            "sections": null, "quality": null, "theoremId": null
        }] })
        .to_string(),
    )
    .unwrap();
    let items = read_manifest(&path).unwrap();
    let [ManifestItem::Entry(entry)] = items.as_slice() else {
        panic!("expected one entry, got {items:?}");
    };
    assert_eq!(entry.id, "x__A");
    assert!(entry.scene.is_empty());
    assert!(entry.artifact.sections.is_empty());
    assert_eq!(entry.proof, Default::default());
}

#[test]
fn non_object_document_is_a_manifest_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.json");
    std::fs::write(&path, r#"[{"id": "x__A", "source": "x.py"}]"#).unwrap();
    let err = read_manifest(&path).unwrap_err();
    assert!(matches!(err, CatalogError::Manifest(_)));
    assert!(err.to_string().contains("not an object"));
}

#[test]
fn missing_items_key_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.json");
    std::fs::write(&path, r#"{"generatedAt": "x"}"#).unwrap();
    assert!(read_manifest(&path).unwrap().is_empty());
}
