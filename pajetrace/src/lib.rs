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

//! Converts task profiles into Paje traces for viewers such as ViTE.
//!
//! A [`Profile`] lists jobs, per-thread tasks, nested timers and
//! cross-thread link events. [`TraceExporter`] lays them out as one lane per
//! thread, one lane per timer nesting level and a jobs lane carrying the
//! number of active threads, then writes the trace with
//! [`paje_format::PajeWriter`].

pub mod config;
pub mod error;
pub mod exporter;
pub mod links;
pub mod profile;

pub use config::{Config, Labels};
pub use error::ExportError;
pub use exporter::{ExportSummary, TraceExporter};
pub use profile::{Job, Profile, Task, ThreadLink, TimerEvent};
