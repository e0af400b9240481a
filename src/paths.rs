use std::path::PathBuf;
use std::sync::OnceLock;

static HEARTH_HOME: OnceLock<PathBuf> = OnceLock::new();

/// Returns the Hearth home directory (`~/.hearth/`).
/// Supports `$HEARTH_HOME` env override. Cached via `OnceLock`.
pub fn hearth_home() -> &'static PathBuf {
    HEARTH_HOME.get_or_init(|| {
        if let Ok(val) = std::env::var("HEARTH_HOME") {
            let p = PathBuf::from(val);
            if !p.as_os_str().is_empty() {
                return p;
            }
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".hearth")
    })
}

/// `~/.hearth/logs/`
pub fn logs_dir() -> PathBuf {
    hearth_home().join("logs")
}

/// `~/.hearth/history.json` — the persisted conversation.
pub fn history_file() -> PathBuf {
    hearth_home().join("history.json")
}
