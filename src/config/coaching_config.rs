// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runtime configuration for context gathering and cycle deadlines.
//!
//! Classification thresholds live in [`crate::constants`] and are not
//! configurable.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::constants::env_config;

/// Main coaching configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CoachingConfig {
    #[serde(default)]
    pub context: ContextConfig,
}

/// Bounds on the collaborator fan-out of a cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Timeout applied to each collaborator call
    pub collaborator_timeout_ms: u64,
    /// Overall deadline for gathering context in one cycle
    pub cycle_deadline_ms: u64,
    pub insight_limit: usize,
    pub similar_run_limit: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            collaborator_timeout_ms: 800,
            cycle_deadline_ms: 1500,
            insight_limit: 3,
            similar_run_limit: 3,
        }
    }
}

impl ContextConfig {
    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_millis(self.collaborator_timeout_ms)
    }

    pub fn cycle_deadline(&self) -> Duration {
        Duration::from_millis(self.cycle_deadline_ms)
    }
}

impl CoachingConfig {
    /// Load configuration from an explicit file, the user config directory, or defaults.
    ///
    /// Environment overrides are applied last in every case.
    pub fn load(path: Option<String>) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = if let Some(config_path) = path {
            Self::load_from_file(&config_path)?
        } else {
            match Self::default_path() {
                Some(default_path) if default_path.exists() => Self::load_from_file(&default_path)?,
                _ => Self::default(),
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read coaching config file: {}", path.display()))?;

        let config: CoachingConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse coaching config file: {}", path.display()))?;

        debug!(path = %path.display(), "Loaded coaching config");
        Ok(config)
    }

    /// `<config_dir>/running-coach-engine/coaching.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("running-coach-engine").join("coaching.toml"))
    }

    fn apply_env_overrides(&mut self) {
        if let Some(ms) = env_config::context_timeout_ms() {
            self.context.collaborator_timeout_ms = ms;
        }
        if let Some(ms) = env_config::cycle_deadline_ms() {
            self.context.cycle_deadline_ms = ms;
        }
    }
}
