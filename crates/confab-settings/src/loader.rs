//! Settings loading: file deep-merge and environment overrides.

use std::path::Path;

use serde_json::Value;
use tracing::warn;

use crate::errors::Result;
use crate::types::ConfabSettings;

/// Load settings from an optional file path with env overrides applied.
///
/// Missing file → defaults plus env overrides. A present-but-invalid
/// file is an error: silently ignoring a broken config hides operator
/// mistakes.
pub fn load_settings(path: Option<&Path>) -> Result<ConfabSettings> {
    let mut settings = match path {
        Some(p) if p.exists() => load_settings_from_path(p)?,
        Some(p) => {
            warn!(path = %p.display(), "settings file not found, using defaults");
            ConfabSettings::default()
        }
        None => ConfabSettings::default(),
    };
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Load settings from a JSON file, deep-merged over compiled defaults.
pub fn load_settings_from_path(path: &Path) -> Result<ConfabSettings> {
    let raw = std::fs::read_to_string(path)?;
    let file_value: Value = serde_json::from_str(&raw)?;
    let defaults = serde_json::to_value(ConfabSettings::default())?;
    let merged = deep_merge(defaults, file_value);
    Ok(serde_json::from_value(merged)?)
}

/// Recursively merge `overlay` onto `base`.
///
/// Objects merge key-by-key; any other overlay value replaces the base
/// value wholesale (arrays are not concatenated).
#[must_use]
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                let _ = base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Apply `CONFAB_*` environment overrides in place.
fn apply_env_overrides(settings: &mut ConfabSettings) {
    if let Ok(host) = std::env::var("CONFAB_HOST") {
        settings.server.host = host;
    }
    if let Ok(port) = std::env::var("CONFAB_PORT") {
        match port.parse() {
            Ok(p) => settings.server.port = p,
            Err(_) => warn!(value = %port, "ignoring non-numeric CONFAB_PORT"),
        }
    }
    if let Ok(model) = std::env::var("CONFAB_MODEL") {
        settings.provider.model = model;
    }
    if let Ok(base_url) = std::env::var("CONFAB_BASE_URL") {
        settings.provider.base_url = base_url;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deep_merge_disjoint_keys() {
        let merged = deep_merge(json!({"a": 1}), json!({"b": 2}));
        assert_eq!(merged, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn deep_merge_overlay_wins() {
        let merged = deep_merge(json!({"a": 1}), json!({"a": 2}));
        assert_eq!(merged, json!({"a": 2}));
    }

    #[test]
    fn deep_merge_nested_objects() {
        let merged = deep_merge(
            json!({"server": {"host": "0.0.0.0", "port": 8000}}),
            json!({"server": {"port": 9000}}),
        );
        assert_eq!(
            merged,
            json!({"server": {"host": "0.0.0.0", "port": 9000}})
        );
    }

    #[test]
    fn deep_merge_arrays_replace() {
        let merged = deep_merge(json!({"xs": [1, 2, 3]}), json!({"xs": [9]}));
        assert_eq!(merged, json!({"xs": [9]}));
    }

    #[test]
    fn deep_merge_type_mismatch_overlay_wins() {
        let merged = deep_merge(json!({"a": {"b": 1}}), json!({"a": 7}));
        assert_eq!(merged, json!({"a": 7}));
    }

    #[test]
    fn load_from_file_merges_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"provider": {"model": "gpt-4.1"}, "chat": {"easterEggTriggers": ["xyzzy"]}}"#,
        )
        .unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.provider.model, "gpt-4.1");
        assert_eq!(settings.chat.easter_egg_triggers, vec!["xyzzy".to_string()]);
        // Untouched defaults preserved by the deep merge
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.provider.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn load_from_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load_settings_from_path(&path).is_err());
    }

    #[test]
    fn load_missing_file_falls_back_to_defaults() {
        let settings = load_settings(Some(Path::new("/nonexistent/settings.json"))).unwrap();
        assert_eq!(settings.server.port, 8000);
    }

    #[test]
    fn load_no_path_uses_defaults() {
        let settings = load_settings(None).unwrap();
        assert_eq!(settings.provider.model, "gpt-4o-mini");
    }
}
