// Copyright (C) 2025 Category Labs, Inc.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Records captured by the profiler, as handed to the exporter.

use crate::error::ExportError;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub type ThreadId = usize;
/// Index of a job in [`Profile::jobs`].
pub type JobId = usize;
pub type TimerId = u32;
pub type LinkKey = i64;

/// One job execution. Jobs of the same `kind` share a color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub kind: String,
    pub start_time: f64,
    pub stop_time: f64,
}

impl Job {
    pub fn new(kind: impl Into<String>, start_time: f64, stop_time: f64) -> Self {
        Self {
            kind: kind.into(),
            start_time,
            stop_time,
        }
    }
}

/// A task run by one thread, optionally on behalf of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub thread_id: ThreadId,
    #[serde(default)]
    pub task_id: i64,
    #[serde(default)]
    pub job_id: Option<JobId>,
    pub start_time: f64,
    pub stop_time: f64,
}

impl Task {
    pub fn new(thread_id: ThreadId, task_id: i64, start_time: f64, stop_time: f64) -> Self {
        Self {
            thread_id,
            task_id,
            job_id: None,
            start_time,
            stop_time,
        }
    }

    pub fn with_job(mut self, job_id: JobId) -> Self {
        self.job_id = Some(job_id);
        self
    }
}

/// Start or stop of a named timer. Timer events nest like a call stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerEvent {
    pub timer_id: TimerId,
    pub is_start: bool,
    pub time: f64,
}

impl TimerEvent {
    pub fn start(timer_id: TimerId, time: f64) -> Self {
        Self {
            timer_id,
            is_start: true,
            time,
        }
    }

    pub fn stop(timer_id: TimerId, time: f64) -> Self {
        Self {
            timer_id,
            is_start: false,
            time,
        }
    }
}

/// One side of a cross-thread handoff. A start and an end with the same
/// key on different threads form a link.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreadLink {
    pub thread_id: ThreadId,
    pub key: LinkKey,
    pub is_start: bool,
    pub time: f64,
}

impl ThreadLink {
    pub fn start(thread_id: ThreadId, key: LinkKey, time: f64) -> Self {
        Self {
            thread_id,
            key,
            is_start: true,
            time,
        }
    }

    pub fn end(thread_id: ThreadId, key: LinkKey, time: f64) -> Self {
        Self {
            thread_id,
            key,
            is_start: false,
            time,
        }
    }
}

/// Everything recorded during one profiling run.
///
/// `tasks` and `links` hold one sequence per thread. Each link sequence must
/// be sorted by time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Builder)]
pub struct Profile {
    pub nthreads: usize,
    #[serde(default)]
    #[builder(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    #[builder(default)]
    pub tasks: Vec<Vec<Task>>,
    #[serde(default)]
    #[builder(default)]
    pub timer_events: Vec<TimerEvent>,
    #[serde(default)]
    #[builder(default)]
    pub timer_names: BTreeMap<TimerId, String>,
    #[serde(default)]
    #[builder(default)]
    pub links: Vec<Vec<ThreadLink>>,
}

impl Profile {
    /// Reads a profile dumped as json.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let content = std::fs::read_to_string(path)?;
        let profile = serde_json::from_str(&content)?;
        Ok(profile)
    }

    pub fn timer_name(&self, timer_id: TimerId) -> String {
        self.timer_names
            .get(&timer_id)
            .cloned()
            .unwrap_or_else(|| format!("timer {timer_id}"))
    }

    pub fn task_count(&self) -> usize {
        self.tasks.iter().map(Vec::len).sum()
    }

    pub fn link_count(&self) -> usize {
        self.links.iter().map(Vec::len).sum()
    }
}
