use std::collections::BTreeMap;

use crate::manifest::model::{ClaimRef, ManifestEntry};

/// Claim id used when a proof declares no claims.
pub const MAIN_CLAIM_ID: &str = "main";

/// Give every entry of a theorem group the same claim list, linked back to the entries that
/// render each claim.
///
/// Entries are grouped by [`ManifestEntry::group_key`]. Within a group:
///
/// - claims contributed by all entries are unioned by id; per field (`label`, `statement`,
///   `scene`) the first non-empty value wins
/// - an entry without claims contributes its active claim
/// - each entry stamps its own id as `animationId` on its active claim; if two entries render
///   the same claim, the later one wins
/// - the resulting list, sorted by id, replaces `proof.claims` on every entry of the group
///
/// Links carried by the input are discarded and rebuilt, so re-running this is stable.
pub fn attach_claim_links(items: &mut [ManifestEntry]) {
    let mut groups = BTreeMap::<String, Vec<usize>>::new();
    for (idx, item) in items.iter().enumerate() {
        groups
            .entry(item.group_key().to_string())
            .or_default()
            .push(idx);
    }

    for members in groups.values() {
        let claims = reconcile_group(items, members);
        for &idx in members {
            items[idx].proof.claims = claims.clone();
        }
    }
}

fn reconcile_group(items: &[ManifestEntry], members: &[usize]) -> Vec<ClaimRef> {
    let mut claim_map = BTreeMap::<String, ClaimRef>::new();

    for &idx in members {
        let proof = &items[idx].proof;
        let synthesized;
        let contributed = if proof.claims.is_empty() {
            let active = active_id(&proof.active_claim_id);
            synthesized = [ClaimRef {
                id: active.to_string(),
                label: active.to_string(),
                ..ClaimRef::default()
            }];
            &synthesized[..]
        } else {
            &proof.claims[..]
        };

        for claim in contributed {
            let cid = active_id(&claim.id);
            let stored = claim_map.entry(cid.to_string()).or_insert_with(|| ClaimRef {
                id: cid.to_string(),
                ..ClaimRef::default()
            });
            if stored.label.is_empty() && !claim.label.is_empty() {
                stored.label = claim.label.clone();
            }
            fill_empty(&mut stored.statement, &claim.statement);
            fill_empty(&mut stored.scene, &claim.scene);
        }
    }

    for &idx in members {
        let item = &items[idx];
        let active = active_id(&item.proof.active_claim_id);
        let stored = claim_map.entry(active.to_string()).or_insert_with(|| ClaimRef {
            id: active.to_string(),
            ..ClaimRef::default()
        });
        if stored.label.is_empty() {
            stored.label = format!("({active})");
        }
        stored.animation_id = Some(item.id.clone());
    }

    claim_map.into_values().collect()
}

fn active_id(raw: &str) -> &str {
    if raw.is_empty() { MAIN_CLAIM_ID } else { raw }
}

fn fill_empty(slot: &mut Option<String>, candidate: &Option<String>) {
    let empty = slot.as_deref().is_none_or(str::is_empty);
    if empty && let Some(v) = candidate.as_deref().filter(|v| !v.is_empty()) {
        *slot = Some(v.to_string());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/merge.rs"]
mod tests;
