// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./hearth.toml` > `~/.config/hearth/hearth.toml` > `/etc/hearth/hearth.toml`
//! with environment variable overrides via `HEARTH_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::HearthConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/hearth/hearth.toml` (system-wide)
/// 3. `~/.config/hearth/hearth.toml` (user XDG config)
/// 4. `./hearth.toml` (local directory)
/// 5. `HEARTH_*` environment variables
pub fn load_config() -> Result<HearthConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<HearthConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HearthConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HearthConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HearthConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// TOML files searched by [`load_config`], lowest precedence first.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/hearth/hearth.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("hearth/hearth.toml"));
    }
    paths.push(PathBuf::from("hearth.toml"));
    paths
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    config_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(HearthConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `HEARTH_EMAIL_SMTP_HOST` must map to `email.smtp_host`,
/// not `email.smtp.host`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("HEARTH_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Top-level sections of `hearth.toml`, in file order.
pub const SECTIONS: [&str; 8] = [
    "service",
    "anthropic",
    "assessment",
    "storage",
    "gateway",
    "pdf",
    "email",
    "next_steps",
];

/// Map a lowercased, prefix-stripped env var name to its dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

/// The environment variable that overrides `section.key`.
pub fn env_var_for(section: &str, key: &str) -> String {
    format!("HEARTH_{section}_{key}").to_ascii_uppercase()
}
