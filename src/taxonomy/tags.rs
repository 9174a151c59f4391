use serde_json::{Map, Value};

/// Canonical taxonomy attached to proofs, definitions and manifest entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Tags {
    /// Deduplicated subjects in first-seen order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
    /// Chapter name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    /// Display numbering such as `"2.14"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

impl Tags {
    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty() && self.chapter.is_none() && self.number.is_none()
    }
}

/// Fold the optional taxonomy fields of `entry` into [`Tags`].
///
/// Lookup order (first present, non-empty value wins):
///
/// - subjects: `tags.subjects`, `tags.subject`, `subjects`, `subject`
/// - chapter: `tags.chapter`, `chapter`
/// - number: `tags.number`, `tags.numbering`, `number`, `numbering`, `label`
///
/// Anything that is not an object yields empty tags.
pub fn normalize_tags(entry: &Value) -> Tags {
    let Some(root) = entry.as_object() else {
        return Tags::default();
    };
    let nested = root.get("tags").and_then(Value::as_object);
    let mut subjects = Vec::<String>::new();
    for s in first_truthy(root, nested, &["subjects", "subject"], &["subjects", "subject"])
        .map(as_string_list)
        .unwrap_or_default()
    {
        if !subjects.contains(&s) {
            subjects.push(s);
        }
    }

    Tags {
        subjects,
        chapter: first_truthy(root, nested, &["chapter"], &["chapter"]).and_then(scalar_text),
        number: first_truthy(
            root,
            nested,
            &["number", "numbering"],
            &["number", "numbering", "label"],
        )
        .and_then(scalar_text),
    }
}

fn first_truthy<'a>(
    root: &'a Map<String, Value>,
    nested: Option<&'a Map<String, Value>>,
    tag_keys: &[&str],
    root_keys: &[&str],
) -> Option<&'a Value> {
    if let Some(tags) = nested {
        for key in tag_keys {
            if let Some(v) = tags.get(*key).filter(|v| truthy(v)) {
                return Some(v);
            }
        }
    }
    root_keys
        .iter()
        .filter_map(|key| root.get(*key))
        .find(|v| truthy(v))
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn scalar_text(v: &Value) -> Option<String> {
    let raw = match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn as_string_list(v: &Value) -> Vec<String> {
    match v {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/taxonomy/tags.rs"]
mod tests;
