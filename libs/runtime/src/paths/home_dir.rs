use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

/// Resolve the application home directory.
///
/// - `Some(path)`: `~` / `~/...` is expanded against the user's home, relative
///   paths are made absolute against the current working directory.
/// - `None`: platform default, `%APPDATA%/<subdir>` on Windows and
///   `$HOME/<subdir>` elsewhere.
///
/// When `create` is set the directory is created if missing.
pub fn resolve_home_dir(user_path: Option<String>, subdir: &str, create: bool) -> Result<PathBuf> {
    let resolved = match user_path {
        Some(raw) => expand_user_path(raw.trim())?,
        None => platform_base_dir()?.join(subdir),
    };

    let absolute = if resolved.is_absolute() {
        resolved
    } else {
        std::env::current_dir()
            .context("cannot determine current directory")?
            .join(resolved)
    };

    if create {
        std::fs::create_dir_all(&absolute)
            .with_context(|| format!("cannot create home dir {}", absolute.display()))?;
    }

    Ok(absolute)
}

fn expand_user_path(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return platform_user_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_user_home()?.join(rest));
    }
    Ok(Path::new(raw).to_path_buf())
}

fn platform_user_home() -> Result<PathBuf> {
    let var = if cfg!(target_os = "windows") {
        "USERPROFILE"
    } else {
        "HOME"
    };
    std::env::var_os(var)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("{var} is not set"))
}

fn platform_base_dir() -> Result<PathBuf> {
    if cfg!(target_os = "windows") {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("APPDATA is not set"))
    } else {
        platform_user_home()
    }
}
