mod schema;

pub use schema::ProfileFile;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/profile-match/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("profile-match"))
}

/// Get the default profile path (~/.config/profile-match/profile.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("profile.yaml"))
}

/// Load a profile from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to the profile. If None, uses the default path
///   (~/.config/profile-match/profile.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist
/// - The file cannot be read
/// - The YAML cannot be parsed
///
/// Settings are not validated here; run
/// [`validate_scoring`](crate::scoring::validate_scoring) and
/// [`validate_profile`](crate::scoring::validate_profile) to collect problems.
pub fn load_config(path: Option<PathBuf>) -> Result<ProfileFile> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        anyhow::bail!(
            "Profile file not found at {}. Create it or pass --config",
            config_path.display()
        );
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read profile file at {}", config_path.display()))?;

    let profile: ProfileFile = serde_saphyr::from_str(&content).with_context(|| {
        format!(
            "Failed to parse profile: invalid YAML in {}",
            config_path.display()
        )
    })?;

    Ok(profile)
}
