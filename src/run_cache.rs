// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Run-scoped cache of preferences and identity
//!
//! While a run is active the cached values win over whatever a cycle passes
//! in. Callers must end a run before beginning the next one; beginning over
//! an unfinished run replaces it without flushing anything.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::RunnerPreferences;

/// Per-cycle run context, either passed in or resolved from the cache
#[derive(Debug, Clone, PartialEq)]
pub struct RunContext {
    pub preferences: RunnerPreferences,
    pub runner_name: Option<String>,
    pub user_id: Option<String>,
    pub run_started_at: DateTime<Utc>,
}

/// Values stored for the active run
#[derive(Debug, Clone, Default)]
pub struct RunCache {
    preferences: Option<RunnerPreferences>,
    runner_name: Option<String>,
    user_id: Option<String>,
    run_started_at: Option<DateTime<Utc>>,
    run_id: Option<Uuid>,
    active: bool,
}

impl RunCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store run values and mark the cache active, starting now
    pub fn begin_run(
        &mut self,
        preferences: RunnerPreferences,
        runner_name: Option<String>,
        user_id: Option<String>,
    ) -> Uuid {
        self.begin_run_at(preferences, runner_name, user_id, Utc::now())
    }

    /// Same as [`RunCache::begin_run`] with an explicit start time
    pub fn begin_run_at(
        &mut self,
        preferences: RunnerPreferences,
        runner_name: Option<String>,
        user_id: Option<String>,
        started_at: DateTime<Utc>,
    ) -> Uuid {
        if self.active {
            warn!(
                run.id = %self.run_id.map(|id| id.to_string()).unwrap_or_default(),
                "Beginning a run over an unfinished run; previous run values are discarded"
            );
        }

        let run_id = Uuid::new_v4();
        self.preferences = Some(preferences);
        self.runner_name = runner_name;
        self.user_id = user_id;
        self.run_started_at = Some(started_at);
        self.run_id = Some(run_id);
        self.active = true;

        info!(run.id = %run_id, run.started_at = %started_at, "Run cache active");
        run_id
    }

    /// Clear every field
    pub fn end_run(&mut self) {
        if let Some(run_id) = self.run_id {
            info!(run.id = %run_id, "Run cache cleared");
        }
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn run_id(&self) -> Option<Uuid> {
        self.run_id
    }

    pub fn preferences(&self) -> Option<&RunnerPreferences> {
        self.preferences.as_ref()
    }

    pub fn runner_name(&self) -> Option<&str> {
        self.runner_name.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn run_started_at(&self) -> Option<DateTime<Utc>> {
        self.run_started_at
    }

    /// Resolve the context for one cycle.
    ///
    /// When active, every cached value replaces the passed one, including
    /// identity fields the cache holds as absent. When inactive the passed
    /// context is returned unchanged.
    pub fn resolve(&self, passed: RunContext) -> RunContext {
        if !self.active {
            return passed;
        }

        RunContext {
            preferences: self.preferences.clone().unwrap_or(passed.preferences),
            runner_name: self.runner_name.clone(),
            user_id: self.user_id.clone(),
            run_started_at: self.run_started_at.unwrap_or(passed.run_started_at),
        }
    }
}
