//! Flag-file configuration.
//!
//! Defaults live in a global config file with a local `.draftpadrc`
//! override; both hold plain CLI flags, one or more per line. Effective
//! settings are the union of global, local, and command-line flags, with
//! the command line winning for valued options.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub watch: bool,
    pub anonymous: bool,
    pub store: Option<PathBuf>,
    pub user: Option<String>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: booleans union, valued options from
    /// `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            watch: self.watch || other.watch,
            anonymous: self.anonymous || other.anonymous,
            store: other.store.clone().or_else(|| self.store.clone()),
            user: other.user.clone().or_else(|| self.user.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("draftpad").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("draftpad")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("draftpad").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("draftpad").join("config");
        }
    }

    PathBuf::from(".draftpadrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".draftpadrc")
}

/// Where the local document store lives unless `--store` overrides it.
pub fn default_store_path() -> PathBuf {
    global_config_path().with_file_name("store.json")
}

/// Load flags from a config file; a missing file means no flags.
///
/// # Errors
/// Returns an error if an existing file cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Persist `flags` as the saved defaults at `path`.
///
/// # Errors
/// Returns an error if the config directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# draftpad defaults (saved with --save)".to_string());
    if flags.watch {
        lines.push("--watch".to_string());
    }
    if flags.anonymous {
        lines.push("--anonymous".to_string());
    }
    if let Some(store) = &flags.store {
        lines.push(format!("--store {}", store.display()));
    }
    if let Some(user) = &flags.user {
        lines.push(format!("--user {user}"));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove saved defaults at `path`.
///
/// # Errors
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--watch" {
            flags.watch = true;
        } else if token == "--anonymous" {
            flags.anonymous = true;
        } else if token == "--store" {
            if let Some(next) = tokens.get(i + 1) {
                flags.store = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--store=") {
            flags.store = Some(PathBuf::from(value));
        } else if token == "--user" {
            if let Some(next) = tokens.get(i + 1) {
                flags.user = Some(next.clone());
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--user=") {
            flags.user = Some(value.to_string());
        }
        i += 1;
    }
    flags
}
