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

use crate::profile::{JobId, ThreadId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse profile: {0}")]
    Profile(#[from] serde_json::Error),

    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("thread {thread_id} out of range, profile has {nthreads} threads")]
    UnknownThread { thread_id: ThreadId, nthreads: usize },

    #[error("task references job {job_id}, profile has {njobs} jobs")]
    UnknownJob { job_id: JobId, njobs: usize },
}
