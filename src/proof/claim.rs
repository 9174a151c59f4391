use serde_json::Value;

/// One logical sub-statement of a theorem, as authored in a proof-description file.
#[derive(Clone, Debug, PartialEq)]
pub struct Claim {
    /// Stable identifier, unique within its payload.
    pub id: String,
    /// Display label, `"(<id>)"` unless authored.
    pub label: String,
    /// Scene that visualizes this claim, if the author pinned one.
    pub scene: Option<String>,
    /// Claim statement text.
    pub statement: String,
    /// Ordered proof steps (opaque to the pipeline).
    pub steps: Vec<Value>,
}

/// Extract the ordered claim list from a payload's `claims` array.
///
/// Non-object entries are skipped but still consume a position, so positional ids stay aligned
/// with the authored array. A payload without a `claims` array has no claims.
pub fn normalize_claims(payload: &Value) -> Vec<Claim> {
    let Some(raw) = payload.get("claims").and_then(Value::as_array) else {
        return Vec::new();
    };

    raw.iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            let obj = entry.as_object()?;
            let id = first_text(&[obj.get("id"), obj.get("label")])
                .unwrap_or_else(|| positional_id(idx));
            let label = first_text(&[obj.get("label")]).unwrap_or_else(|| format!("({id})"));
            Some(Claim {
                label,
                scene: first_text(&[obj.get("scene"), obj.get("animation"), obj.get("variant")]),
                statement: obj
                    .get("statement")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                steps: obj
                    .get("steps")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default(),
                id,
            })
        })
        .collect()
}

/// `a`, `b`, ..., `z`, `aa`, `ab`, ...
pub(crate) fn positional_id(idx: usize) -> String {
    let mut n = idx + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// First candidate that renders to non-blank text, trimmed.
fn first_text(candidates: &[Option<&Value>]) -> Option<String> {
    candidates.iter().flatten().find_map(|v| {
        let raw = match v {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

#[cfg(test)]
#[path = "../../tests/unit/proof/claim.rs"]
mod tests;
