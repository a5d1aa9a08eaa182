/// Widget styles the shell knows how to apply. `DEFAULT_THEME` must always
/// be a member so the fallback path cannot itself fail.
pub const THEMES: &[&str] = &["fusion", "breeze", "oxygen", "plastique"];

/// Apply a widget style by name. Returns `false` for unknown names, in
/// which case the caller reverts the persisted preference to
/// `DEFAULT_THEME` instead of failing startup.
pub fn apply(name: &str) -> bool {
    if !THEMES.contains(&name) {
        return false;
    }
    log::info!("applying theme '{}'", name);
    true
}
