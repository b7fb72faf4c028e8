//! Small JSON side files: color price modifiers and the featured ordering.
//!
//! Both are optional. A missing or malformed file never fails a request.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::normalize::normalize_model;

/// Used when the color-modifier file is missing or malformed.
#[must_use]
pub fn fallback_color_mods() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("gold".to_string(), 0.08),
        ("default".to_string(), 0.05),
        ("black".to_string(), 0.0),
    ])
}

/// Reads a `{ "color": multiplier }` object. Keys are lower-cased; values
/// may be numbers or numeric strings, anything else is skipped.
#[must_use]
pub fn load_color_mods(path: &Path) -> BTreeMap<String, f64> {
    let Some(value) = read_json(path, "color modifiers") else {
        return fallback_color_mods();
    };

    let Value::Object(map) = value else {
        tracing::warn!(
            path = %path.display(),
            "color modifiers file is not an object; using fallback"
        );
        return fallback_color_mods();
    };

    map.into_iter()
        .filter_map(|(color, modifier)| {
            let modifier = match modifier {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }?;
            Some((color.trim().to_lowercase(), modifier))
        })
        .collect()
}

/// Reads a JSON array of model names. Names are normalized, blanks and
/// case-insensitive repeats dropped. Missing or malformed files yield an empty list.
#[must_use]
pub fn load_preferred_models(path: &Path) -> Vec<String> {
    let Some(value) = read_json(path, "featured ordering") else {
        return Vec::new();
    };

    let Value::Array(entries) = value else {
        tracing::warn!(path = %path.display(), "featured ordering file is not an array; ignoring");
        return Vec::new();
    };

    let mut models: Vec<String> = Vec::new();
    for entry in entries {
        let Value::String(raw) = entry else {
            continue;
        };
        let model = normalize_model(&raw);
        if !model.is_empty() && !models.iter().any(|m| m.eq_ignore_ascii_case(&model)) {
            models.push(model);
        }
    }
    models
}

fn read_json(path: &Path, what: &str) -> Option<Value> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), what, "optional file not found");
            return None;
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                what,
                error = %e,
                "failed to read optional file"
            );
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), what, error = %e, "malformed optional file");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).expect("write fixture");
        path
    }

    #[test]
    fn color_mods_fallback_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mods = load_color_mods(&dir.path().join("color_mods.json"));
        assert_eq!(mods, fallback_color_mods());
        assert_eq!(mods.get("gold"), Some(&0.08));
    }

    #[test]
    fn color_mods_fallback_when_malformed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(&dir, "color_mods.json", "{ not json");
        assert_eq!(load_color_mods(&path), fallback_color_mods());

        let path = write(&dir, "array.json", "[1, 2]");
        assert_eq!(load_color_mods(&path), fallback_color_mods());
    }

    #[test]
    fn color_mods_read_numbers_and_numeric_strings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            &dir,
            "color_mods.json",
            r#"{"Gold": 0.1, "blue": "0.03", "pink": true}"#,
        );
        let mods = load_color_mods(&path);
        assert_eq!(mods.len(), 2);
        assert_eq!(mods.get("gold"), Some(&0.1));
        assert_eq!(mods.get("blue"), Some(&0.03));
    }

    #[test]
    fn preferred_models_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_preferred_models(&dir.path().join("featured.json")).is_empty());
    }

    #[test]
    fn preferred_models_are_normalized_and_deduplicated() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            &dir,
            "featured.json",
            r#"["iphone 15 pro", "iPhone  15 Pro", "", 42, "MacBook Air"]"#,
        );
        assert_eq!(
            load_preferred_models(&path),
            vec!["iPhone 15 pro".to_string(), "MacBook Air".to_string()]
        );
    }

    #[test]
    fn preferred_models_non_array_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(&dir, "featured.json", r#"{"models": ["iPhone 15"]}"#);
        assert!(load_preferred_models(&path).is_empty());
    }
}
