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

//! Writes a [`Profile`] as a Paje trace.

use crate::config::Labels;
use crate::error::ExportError;
use crate::links::correlate;
use crate::profile::{JobId, Profile, ThreadId};
use paje_format::{Alias, BufferedEvent, EventBuffer, PajeWriter, StateValue};
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Figures about a finished export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Data lines written, header excluded.
    pub lines_written: u64,
    pub buffered_events: usize,
    pub links: usize,
    pub unmatched_links: usize,
    /// Deepest timer nesting, also the number of timer lanes.
    pub timer_depth: usize,
}

/// Exports one profile. Holds no state besides its inputs, so the same
/// exporter can write several files.
pub struct TraceExporter<'p> {
    profile: &'p Profile,
    labels: Labels,
}

impl<'p> TraceExporter<'p> {
    pub fn new(profile: &'p Profile) -> Self {
        Self {
            profile,
            labels: Labels::default(),
        }
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn export_to_path(&self, path: impl AsRef<Path>) -> Result<ExportSummary, ExportError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let summary = self.export(BufWriter::new(file))?;
        tracing::info!(
            output = %path.display(),
            lines = summary.lines_written,
            "paje trace written"
        );
        Ok(summary)
    }

    pub fn export<W: Write>(&self, out: W) -> Result<ExportSummary, ExportError> {
        tracing::info!(
            jobs = self.profile.jobs.len(),
            threads = self.profile.nthreads,
            tasks = self.profile.task_count(),
            links = self.profile.link_count(),
            "writing paje trace"
        );
        let mut session = Session::start(self.profile, &self.labels, out)?;
        session.define_job_values()?;
        session.push_jobs();
        let timer_depth = session.push_timers()?;
        session.push_tasks()?;
        let buffered_events = session.flush_buffer()?;
        let (links, unmatched_links) = session.write_links()?;
        let lines_written = session.finish()?;

        Ok(ExportSummary {
            lines_written,
            buffered_events,
            links,
            unmatched_links,
            timer_depth,
        })
    }
}

/// Aliases of the types declared at the top of every trace.
struct Types {
    thread: Alias,
    timer: Alias,
    job_state: Alias,
    task_state: Alias,
    timer_state: Alias,
    active_threads: Alias,
    link: Alias,
}

/// State of one export in progress.
struct Session<'p, 'l, W: Write> {
    profile: &'p Profile,
    labels: &'l Labels,
    writer: PajeWriter<W>,
    buffer: EventBuffer,
    types: Types,
    task_manager: Alias,
    jobs: Alias,
    threads: Vec<Alias>,
    /// Job state value and task state value for each job kind.
    kinds: HashMap<&'p str, (Alias, Alias)>,
}

impl<'p, 'l, W: Write> Session<'p, 'l, W> {
    /// Writes the header, every type and the fixed containers.
    fn start(profile: &'p Profile, labels: &'l Labels, out: W) -> Result<Self, ExportError> {
        let mut writer = PajeWriter::new(out)?;

        let root = writer.define_container_type(None, &labels.root_type)?;
        let thread = writer.define_container_type(Some(root), &labels.thread_type)?;
        let timer = writer.define_container_type(Some(root), &labels.timer_type)?;
        let jobs_type = writer.define_container_type(Some(root), &labels.jobs_type)?;

        let types = Types {
            thread,
            timer,
            job_state: writer.define_state_type(jobs_type, &labels.job_state)?,
            task_state: writer.define_state_type(thread, &labels.task_state)?,
            timer_state: writer.define_state_type(timer, &labels.timer_state)?,
            active_threads: writer.define_variable_type(jobs_type, &labels.active_threads)?,
            link: writer.define_link_type(root, thread, thread, &labels.link_type)?,
        };

        let task_manager = writer.create_container(root, None, &labels.root_container)?;
        let jobs = writer.create_container(jobs_type, Some(task_manager), &labels.jobs_container)?;

        let mut buffer = EventBuffer::new();
        buffer.set_variable(0.0, types.active_threads, jobs, 0.0);

        let threads = (0..profile.nthreads)
            .map(|i| {
                writer.create_container(
                    types.thread,
                    Some(task_manager),
                    &format!("{} {}", labels.thread_prefix, i),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            profile,
            labels,
            writer,
            buffer,
            types,
            task_manager,
            jobs,
            threads,
            kinds: HashMap::new(),
        })
    }

    fn thread(&self, thread_id: ThreadId) -> Result<Alias, ExportError> {
        self.threads
            .get(thread_id)
            .copied()
            .ok_or(ExportError::UnknownThread {
                thread_id,
                nthreads: self.profile.nthreads,
            })
    }

    /// One value per job kind on both the job and the task state, in order
    /// of first appearance.
    fn define_job_values(&mut self) -> Result<(), ExportError> {
        let profile = self.profile;
        for job in &profile.jobs {
            if self.kinds.contains_key(job.kind.as_str()) {
                continue;
            }
            let job_value = self
                .writer
                .define_entity_value(self.types.job_state, &job.kind, None)?;
            let task_value = self
                .writer
                .define_entity_value(self.types.task_state, &job.kind, None)?;
            self.kinds.insert(&job.kind, (job_value, task_value));
        }
        tracing::debug!(kinds = self.kinds.len(), "defined job kinds");
        Ok(())
    }

    fn push_jobs(&mut self) {
        let profile = self.profile;
        for job in &profile.jobs {
            let (job_value, _) = self.kinds[job.kind.as_str()];
            self.buffer
                .push_state(job.start_time, self.types.job_state, self.jobs, job_value);
            self.buffer
                .pop_state(job.stop_time, self.types.job_state, self.jobs);
        }
    }

    /// Creates one lane per nesting level and pushes each timer onto the
    /// lane of its depth. Returns the deepest nesting.
    fn push_timers(&mut self) -> Result<usize, ExportError> {
        let profile = self.profile;
        let mut events = profile.timer_events.clone();
        events.sort_by(|a, b| a.time.total_cmp(&b.time));

        let timer_ids: BTreeSet<_> = events.iter().map(|event| event.timer_id).collect();
        let mut values = HashMap::new();
        for timer_id in timer_ids {
            let name = profile.timer_name(timer_id);
            let value = self
                .writer
                .define_entity_value(self.types.timer_state, &name, None)?;
            values.insert(timer_id, value);
        }

        let max_depth = max_timer_depth(events.iter().map(|event| event.is_start));
        let lanes = (0..max_depth)
            .map(|depth| {
                self.writer.create_container(
                    self.types.timer,
                    Some(self.task_manager),
                    &format!("{} {}", self.labels.timer_prefix, depth),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(depth = max_depth, timers = values.len(), "created timer lanes");

        let mut depth = 0usize;
        for event in &events {
            if event.is_start {
                self.buffer.push_state(
                    event.time,
                    self.types.timer_state,
                    lanes[depth],
                    values[&event.timer_id],
                );
                depth += 1;
            } else if let Some(lower) = depth.checked_sub(1) {
                depth = lower;
                self.buffer
                    .pop_state(event.time, self.types.timer_state, lanes[depth]);
            } else {
                tracing::warn!(
                    timer_id = event.timer_id,
                    time = event.time,
                    "timer stop without start"
                );
            }
        }
        Ok(max_depth)
    }

    fn task_value(&self, job_id: Option<JobId>, task_id: i64) -> Result<StateValue, ExportError> {
        let Some(job_id) = job_id else {
            return Ok(StateValue::Literal(task_id));
        };
        let job = self
            .profile
            .jobs
            .get(job_id)
            .ok_or(ExportError::UnknownJob {
                job_id,
                njobs: self.profile.jobs.len(),
            })?;
        let (_, task_value) = self.kinds[job.kind.as_str()];
        Ok(StateValue::Alias(task_value))
    }

    fn push_tasks(&mut self) -> Result<(), ExportError> {
        let profile = self.profile;
        for task in profile.tasks.iter().flatten() {
            let thread = self.thread(task.thread_id)?;
            let value = self.task_value(task.job_id, task.task_id)?;
            let (task_state, active) = (self.types.task_state, self.types.active_threads);

            self.buffer
                .push_state(task.start_time, task_state, thread, value);
            self.buffer.pop_state(task.stop_time, task_state, thread);
            self.buffer
                .add_variable(task.start_time, active, self.jobs, 1.0);
            self.buffer
                .sub_variable(task.stop_time, active, self.jobs, 1.0);
        }
        Ok(())
    }

    fn flush_buffer(&mut self) -> Result<usize, ExportError> {
        let buffer = std::mem::take(&mut self.buffer);
        Ok(buffer.flush(&mut self.writer)?)
    }

    /// Writes matched links directly, after the buffered events.
    fn write_links(&mut self) -> Result<(usize, usize), ExportError> {
        let correlation = correlate(&self.profile.links);
        for link in &correlation.matched {
            let start_container = self.thread(link.start_thread)?;
            let end_container = self.thread(link.end_thread)?;
            self.writer.write_event(&BufferedEvent::StartLink {
                time: link.start_time,
                link_type: self.types.link,
                container: self.task_manager,
                value: link.key,
                start_container,
                key: link.key,
            })?;
            self.writer.write_event(&BufferedEvent::EndLink {
                time: link.end_time,
                link_type: self.types.link,
                container: self.task_manager,
                value: link.key,
                end_container,
                key: link.key,
            })?;
        }
        tracing::debug!(
            links = correlation.matched.len(),
            same_thread = correlation.same_thread,
            unmatched = correlation.unmatched,
            "wrote links"
        );
        Ok((correlation.matched.len(), correlation.unmatched))
    }

    fn finish(mut self) -> Result<u64, ExportError> {
        self.writer.flush()?;
        tracing::debug!(aliases = self.writer.aliases_issued(), "trace complete");
        Ok(self.writer.lines_written())
    }
}

/// Deepest nesting reached by a sequence of starts (`true`) and stops.
pub fn max_timer_depth(events: impl IntoIterator<Item = bool>) -> usize {
    let mut depth = 0usize;
    let mut max_depth = 0usize;
    for is_start in events {
        if is_start {
            depth += 1;
            max_depth = max_depth.max(depth);
        } else {
            depth = depth.saturating_sub(1);
        }
    }
    max_depth
}
