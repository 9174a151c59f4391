use super::*;
use serde_json::json;

fn sample() -> Value {
    json!({
        "id": "demorgan__Part1",
        "scene": "Part1",
        "source": "data/proofs/demorgan.py",
        "file": "proofs/demorgan__Part1.mp4",
        "url": "/proofs/demorgan__Part1.mp4",
        "quality": "m",
        "sections": [{
            "index": 0,
            "id": "demorgan__Part1__Krok 1",
            "name": "Krok 1",
            "description": "Krok 1",
            "file": "proofs/sections/demorgan__Part1__Krok 1.mp4",
            "url": "/proofs/sections/demorgan__Part1__Krok 1.mp4",
            "durationHint": 3.5
        }],
        "proof": {
            "title": "De Morgan",
            "description": null,
            "statement": "",
            "steps": [],
            "claims": [{ "id": "a", "label": "(a)", "animationId": "demorgan__Part1" }],
            "activeClaimId": "a",
            "theoremId": "demorgan"
        },
        "theoremId": "demorgan",
        "thumbnail": "/proofs/demorgan.png"
    })
}

#[test]
fn entry_fields_map_onto_the_wire_format() {
    let entry: ManifestEntry = serde_json::from_value(sample()).unwrap();
    assert_eq!(entry.artifact.file, "proofs/demorgan__Part1.mp4");
    assert_eq!(entry.artifact.sections[0].name, "Krok 1");
    assert_eq!(entry.proof.active_claim_id, "a");
    assert_eq!(
        entry.proof.claims[0].animation_id.as_deref(),
        Some("demorgan__Part1")
    );
    assert_eq!(entry.extra.get("thumbnail"), Some(&json!("/proofs/demorgan.png")));
    assert!(!entry.extra.contains_key("file"));
}

#[test]
fn unknown_fields_survive_a_round_trip() {
    let entry: ManifestEntry = serde_json::from_value(sample()).unwrap();
    let back = serde_json::to_value(&entry).unwrap();
    assert_eq!(back["thumbnail"], json!("/proofs/demorgan.png"));
    assert_eq!(back["sections"][0]["durationHint"], json!(3.5));
    assert!(back.get("tags").is_none());
    assert!(back.get("proofSource").is_none());
    assert!(back["proof"]["claims"][0].get("scene").is_none());
}

#[test]
fn group_key_prefers_theorem_id_then_proof_then_id() {
    let mut entry: ManifestEntry = serde_json::from_value(sample()).unwrap();
    assert_eq!(entry.group_key(), "demorgan");
    entry.theorem_id.clear();
    entry.proof.theorem_id = "from-proof".to_string();
    assert_eq!(entry.group_key(), "from-proof");
    entry.proof.theorem_id.clear();
    assert_eq!(entry.group_key(), "demorgan__Part1");
}

#[test]
fn sparse_items_deserialize_with_defaults() {
    let entry: ManifestEntry = serde_json::from_value(json!({ "id": "x" })).unwrap();
    assert!(entry.source.is_empty());
    assert!(entry.artifact.sections.is_empty());
    assert!(entry.proof.claims.is_empty());
}

#[test]
fn null_fields_fall_back_to_defaults() {
    let entry: ManifestEntry = serde_json::from_value(json!({
        "id": "x",
        "scene": null,
        "quality": null,
        "sections": [{ "index": null, "name": "S" }],
        "proof": { "statement": null, "claims": [{ "id": "a", "label": null }] },
        "theoremId": null
    }))
    .unwrap();
    assert!(entry.scene.is_empty());
    assert!(entry.artifact.quality.is_empty());
    assert_eq!(entry.artifact.sections[0].index, 0);
    assert!(entry.proof.statement.is_empty());
    assert!(entry.proof.claims[0].label.is_empty());
    assert!(entry.theorem_id.is_empty());
}

#[test]
fn items_that_do_not_fit_stay_raw() {
    let raw = json!({ "id": "x", "sections": 5, "keep": true });
    let item: ManifestItem = serde_json::from_value(raw.clone()).unwrap();
    assert!(matches!(item, ManifestItem::Raw(_)));
    assert_eq!(serde_json::to_value(&item).unwrap(), raw);

    let entry: ManifestItem = serde_json::from_value(json!({ "id": "y" })).unwrap();
    assert!(matches!(entry, ManifestItem::Entry(ref e) if e.id == "y"));
}
