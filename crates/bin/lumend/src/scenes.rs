//! Scene snapshot loading — TOML file of scene definitions.
//!
//! The file is optional; a missing file means an empty snapshot and the
//! engine stays idle until scenes arrive over the API. Format:
//!
//! ```toml
//! [[scenes]]
//! name = "daylight"
//! priority = 0
//!
//! [scenes.entities."light.living_room"]
//! brightness = [
//!     { at = "06:00", value = 10.0 },
//!     { at = "18:00", value = 200.0 },
//! ]
//! power = [{ at = "06:00", value = "on" }]
//! ```

use serde::Deserialize;

use lumen_domain::scene::SceneDefinition;

/// Top-level structure of the scenes file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScenesFile {
    scenes: Vec<SceneDefinition>,
}

/// Load scene definitions from `path`.
///
/// A missing file yields an empty snapshot.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load(path: &str) -> Result<Vec<SceneDefinition>, ScenesError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let file: ScenesFile = toml::from_str(&content).map_err(ScenesError::Parse)?;
            Ok(file.scenes)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path, "no scenes file, starting with an empty snapshot");
            Ok(Vec::new())
        }
        Err(err) => Err(ScenesError::Io(err)),
    }
}

/// Scene file errors.
#[derive(Debug, thiserror::Error)]
pub enum ScenesError {
    /// TOML parse failure.
    #[error("failed to parse scenes file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read scenes file")]
    Io(#[from] std::io::Error),
}
