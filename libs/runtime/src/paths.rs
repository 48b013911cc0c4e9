use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

/// Resolve the server home directory.
///
/// - `None` or empty → `$HOME/<default_subdir>` (`%APPDATA%` on Windows).
/// - A leading `~` is expanded against the user's home directory.
/// - When `create` is set the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let raw = configured.filter(|s| !s.trim().is_empty());

    let resolved = match raw {
        None => user_base_dir()?.join(default_subdir),
        Some(p) if p == "~" => user_base_dir()?,
        Some(p) => {
            if let Some(rest) = p.strip_prefix("~/") {
                user_base_dir()?.join(rest)
            } else {
                let pb = PathBuf::from(&p);
                if pb.is_relative() {
                    std::env::current_dir()
                        .context("cannot resolve current dir")?
                        .join(pb)
                } else {
                    pb
                }
            }
        }
    };

    if create {
        std::fs::create_dir_all(&resolved)
            .with_context(|| format!("cannot create home dir {}", resolved.display()))?;
    }

    Ok(resolved)
}

fn user_base_dir() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = "APPDATA";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";

    std::env::var_os(var)
        .map(PathBuf::from)
        .filter(|p| p.is_absolute() || !p.as_os_str().is_empty())
        .ok_or_else(|| anyhow!("environment variable {var} is not set"))
}

/// Resolve a log file path against `base_dir`.
/// Absolute paths are kept as-is; relative paths are joined with `base_dir`.
pub fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}
