use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Platform style applied when the persisted one is missing or unknown.
pub const DEFAULT_THEME: &str = "fusion";

/// Persisted shell state, written to `<config dir>/crest/state.json`.
///
/// The `#[serde(default)]` on the struct ensures that any fields missing
/// from an existing state file are filled in with their `Default` values,
/// making it safe to add new fields without breaking old files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct State {
    // ── Window ───────────────────────────────────────────────────────────
    /// Last non-maximized position; `None` until first saved.
    pub window_pos: Option<(i32, i32)>,
    /// Last non-maximized size; `None` until first saved.
    pub window_size: Option<(i32, i32)>,
    pub window_maximized: bool,
    /// Opaque base64 dock/toolbar layout, restored verbatim.
    pub window_layout: String,

    // ── View ─────────────────────────────────────────────────────────────
    pub theme: String,
    pub show_status_bar: bool,

    // ── Tools ────────────────────────────────────────────────────────────
    pub loaded_tools: Vec<String>,
}

impl Default for State {
    fn default() -> Self {
        State {
            window_pos: None,
            window_size: None,
            window_maximized: false,
            window_layout: String::new(),
            theme: DEFAULT_THEME.to_string(),
            show_status_bar: true,
            loaded_tools: Vec::new(),
        }
    }
}

pub fn default_state_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    base.join("crest").join("state.json")
}

pub fn load() -> State {
    load_from(&default_state_path())
}

pub fn load_from(path: &Path) -> State {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("malformed state file {}: {}", path.display(), e);
                State::default()
            }
        },
        Err(_) => State::default(),
    }
}

pub fn save(state: &State) {
    save_to(state, &default_state_path());
}

pub fn save_to(state: &State, path: &Path) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match serde_json::to_string_pretty(state) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                log::warn!("could not write state file {}: {}", path.display(), e);
            }
        }
        Err(e) => log::warn!("could not serialize state: {}", e),
    }
}

/// Encode a raw layout blob for persistence.
pub fn encode_layout(raw: &[u8]) -> String {
    STANDARD.encode(raw)
}

/// Decode a persisted layout blob. Returns `None` for empty or corrupt
/// input; the caller keeps its current layout in that case.
pub fn decode_layout(encoded: &str) -> Option<Vec<u8>> {
    if encoded.is_empty() {
        return None;
    }
    match STANDARD.decode(encoded.trim()) {
        Ok(raw) => Some(raw),
        Err(e) => {
            log::warn!("discarding corrupt window layout: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_has_no_geometry() {
        let s = State::default();
        assert!(s.window_pos.is_none());
        assert!(s.window_size.is_none());
        assert!(!s.window_maximized);
        assert_eq!(s.theme, DEFAULT_THEME);
        assert!(s.show_status_bar);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut s = State::default();
        s.window_pos = Some((40, 25));
        s.window_size = Some((1280, 900));
        s.window_maximized = true;
        s.loaded_tools = vec!["source-structure".into(), "workspace".into()];
        s.window_layout = encode_layout(b"dock-arrangement");
        save_to(&s, &path);

        let loaded = load_from(&path);
        assert_eq!(loaded.window_pos, Some((40, 25)));
        assert_eq!(loaded.window_size, Some((1280, 900)));
        assert!(loaded.window_maximized);
        assert_eq!(loaded.loaded_tools, s.loaded_tools);
        assert_eq!(
            decode_layout(&loaded.window_layout).unwrap(),
            b"dock-arrangement"
        );
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_from(&dir.path().join("nope.json"));
        assert!(s.window_pos.is_none());
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();
        let s = load_from(&path);
        assert_eq!(s.theme, DEFAULT_THEME);
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"window_maximized": true}"#).unwrap();
        let s = load_from(&path);
        assert!(s.window_maximized);
        assert_eq!(s.theme, DEFAULT_THEME);
        assert!(s.loaded_tools.is_empty());
    }

    #[test]
    fn corrupt_layout_blob_is_discarded() {
        assert!(decode_layout("").is_none());
        assert!(decode_layout("!!!not-base64!!!").is_none());
        assert_eq!(decode_layout(&encode_layout(b"x")).unwrap(), b"x");
    }
}
