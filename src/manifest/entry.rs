use crate::manifest::merge::MAIN_CLAIM_ID;
use crate::manifest::model::{ClaimRef, ProofView};
use crate::proof::claim::Claim;
use crate::proof::matcher::pick_claim;
use crate::proof::payload::{Fragment, ProofPayload};
use crate::taxonomy::tags::Tags;

/// Manifest entry id for a scene of a source file.
pub fn entry_id(source_stem: &str, scene: &str) -> String {
    format!("{source_stem}__{scene}")
}

/// Proof text and taxonomy resolved for one scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneProof {
    /// Proof view before claim links are attached.
    pub proof: ProofView,
    /// Entry taxonomy, if any was declared.
    pub tags: Option<Tags>,
}

/// Resolve what one scene shows.
///
/// `fragment` is the scene's proof fragment as chosen by the caller (usually
/// [`ProofPayload::fragment_for`]). Header fields prefer the fragment over the payload root.
/// Steps come from the matched claim, then from the fragment. Without claims the entry renders
/// the synthetic `main` claim.
pub fn resolve_scene_proof(
    payload: Option<&ProofPayload>,
    fragment: Option<&Fragment>,
    scene: &str,
    position: usize,
    theorem_id: &str,
) -> SceneProof {
    let claims: &[Claim] = payload.map(|p| p.claims.as_slice()).unwrap_or_default();
    let selected = pick_claim(claims, scene, position);

    let header = |from_fragment: Option<&String>, from_root: Option<&String>| {
        from_fragment.or(from_root).cloned()
    };

    let steps = match selected {
        Some(claim) if !claim.steps.is_empty() => claim.steps.clone(),
        _ => fragment.map(|f| f.steps.clone()).unwrap_or_default(),
    };

    let claim_refs = if claims.is_empty() {
        vec![main_claim()]
    } else {
        claims.iter().map(claim_ref).collect()
    };

    let proof = ProofView {
        title: header(
            fragment.and_then(|f| f.title.as_ref()),
            payload.and_then(|p| p.title.as_ref()),
        ),
        description: header(
            fragment.and_then(|f| f.description.as_ref()),
            payload.and_then(|p| p.description.as_ref()),
        ),
        statement: header(
            fragment.and_then(|f| f.statement.as_ref()),
            payload.and_then(|p| p.statement.as_ref()),
        )
        .unwrap_or_default(),
        steps,
        claims: claim_refs,
        active_claim_id: selected.map_or_else(|| MAIN_CLAIM_ID.to_string(), |c| c.id.clone()),
        theorem_id: theorem_id.to_string(),
    };

    let tags = [
        fragment.map(|f| &f.tags),
        payload.map(|p| &p.tags),
    ]
    .into_iter()
    .flatten()
    .find(|t| !t.is_empty())
    .cloned();

    SceneProof { proof, tags }
}

fn claim_ref(claim: &Claim) -> ClaimRef {
    ClaimRef {
        id: claim.id.clone(),
        label: claim.label.clone(),
        scene: claim.scene.clone(),
        statement: (!claim.statement.is_empty()).then(|| claim.statement.clone()),
        animation_id: None,
    }
}

pub(crate) fn main_claim() -> ClaimRef {
    ClaimRef {
        id: MAIN_CLAIM_ID.to_string(),
        label: MAIN_CLAIM_ID.to_string(),
        ..ClaimRef::default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/entry.rs"]
mod tests;
