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

use crate::error::ExportError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default)]
    pub labels: Labels,
}

/// Names given to the lanes and types of the trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub root_type: String,
    pub root_container: String,
    pub thread_type: String,
    /// Thread lanes are named `<thread_prefix> <index>`.
    pub thread_prefix: String,
    pub timer_type: String,
    /// Timer lanes are named `<timer_prefix> <depth>`.
    pub timer_prefix: String,
    pub jobs_type: String,
    pub jobs_container: String,
    pub job_state: String,
    pub task_state: String,
    pub timer_state: String,
    pub active_threads: String,
    pub link_type: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            root_type: "Task Manager".to_string(),
            root_container: "The task manager".to_string(),
            thread_type: "Thread".to_string(),
            thread_prefix: "Thread".to_string(),
            timer_type: "Timers".to_string(),
            timer_prefix: "Timer level".to_string(),
            jobs_type: "Jobs".to_string(),
            jobs_container: "Jobs".to_string(),
            job_state: "Job".to_string(),
            task_state: "Task".to_string(),
            timer_state: "Timer state".to_string(),
            active_threads: "Active threads".to_string(),
            link_type: "links".to_string(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            labels: Labels::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").expect("parse");
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.labels, Labels::default());
    }

    #[test]
    fn partial_labels_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
log_filter = "debug"

[labels]
thread_prefix = "Worker"
"#,
        )
        .expect("parse");
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.labels.thread_prefix, "Worker");
        assert_eq!(config.labels.root_type, "Task Manager");
    }
}
