// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Hearth assessment service.
//!
//! `hearth.toml` is layered from `/etc/hearth`, the user config dir and the
//! working directory, then overridden by `HEARTH_<SECTION>_<KEY>` variables.
//! Every section rejects unknown keys; load failures come back as miette
//! diagnostics and validation failures are collected rather than stopping at
//! the first.
//!
//! ```no_run
//! let config = hearth_config::load_and_validate().expect("config errors");
//! println!("gateway on {}:{}", config.gateway.host, config.gateway.port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::HearthConfig;
pub use validation::resolve_anthropic_api_key;

/// Loads the layered configuration and validates it.
pub fn load_and_validate() -> Result<HearthConfig, Vec<ConfigError>> {
    checked(loader::load_config(), || {
        loader::config_paths()
            .iter()
            .filter_map(|path| read_source(path))
            .collect()
    })
}

/// Loads one file plus environment overrides and validates it.
pub fn load_and_validate_path(path: &Path) -> Result<HearthConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Loads a TOML string (no files, no environment) and validates it.
pub fn load_and_validate_str(toml_content: &str) -> Result<HearthConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Turns a figment failure into diagnostics, reading sources only then.
fn checked(
    loaded: Result<HearthConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<HearthConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::figment_to_config_errors(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// `(absolute path, content)` for a readable config file.
fn read_source(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    Some((absolute.display().to_string(), content))
}
