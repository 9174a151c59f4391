use crate::proof::claim::Claim;

/// Choose the claim that `scene` visualizes.
///
/// Rules are tried in order and the first hit wins:
///
/// 1. a claim whose `scene` equals the scene name
/// 2. a claim whose `id` equals the scene name
/// 3. the claim at `position` (the scene's index among scenes of the same file)
/// 4. the first claim
///
/// `None` only for an empty claim list; callers then render the synthetic `main` claim.
pub fn pick_claim<'a>(claims: &'a [Claim], scene: &str, position: usize) -> Option<&'a Claim> {
    claims
        .iter()
        .find(|c| c.scene.as_deref().map(str::trim) == Some(scene))
        .or_else(|| claims.iter().find(|c| c.id.trim() == scene))
        .or_else(|| claims.get(position))
        .or_else(|| claims.first())
}

#[cfg(test)]
#[path = "../../tests/unit/proof/matcher.rs"]
mod tests;
