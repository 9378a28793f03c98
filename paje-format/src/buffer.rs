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

use crate::alias::Alias;
use crate::writer::PajeWriter;
use std::io::{self, Write};

/// Value pushed onto a state lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateValue {
    /// A declared entity value.
    Alias(Alias),
    /// A bare number, written without the alias prefix.
    Literal(i64),
}

impl From<Alias> for StateValue {
    fn from(alias: Alias) -> Self {
        StateValue::Alias(alias)
    }
}

/// A timed event whose rendering is deferred until the buffer is flushed.
#[derive(Debug, Clone, PartialEq)]
pub enum BufferedEvent {
    SetVariable {
        time: f64,
        variable_type: Alias,
        container: Alias,
        value: f64,
    },
    AddVariable {
        time: f64,
        variable_type: Alias,
        container: Alias,
        value: f64,
    },
    SubVariable {
        time: f64,
        variable_type: Alias,
        container: Alias,
        value: f64,
    },
    PushState {
        time: f64,
        state_type: Alias,
        container: Alias,
        value: StateValue,
    },
    PopState {
        time: f64,
        state_type: Alias,
        container: Alias,
    },
    StartLink {
        time: f64,
        link_type: Alias,
        container: Alias,
        value: i64,
        start_container: Alias,
        key: i64,
    },
    EndLink {
        time: f64,
        link_type: Alias,
        container: Alias,
        value: i64,
        end_container: Alias,
        key: i64,
    },
}

impl BufferedEvent {
    pub fn time(&self) -> f64 {
        match self {
            BufferedEvent::SetVariable { time, .. }
            | BufferedEvent::AddVariable { time, .. }
            | BufferedEvent::SubVariable { time, .. }
            | BufferedEvent::PushState { time, .. }
            | BufferedEvent::PopState { time, .. }
            | BufferedEvent::StartLink { time, .. }
            | BufferedEvent::EndLink { time, .. } => *time,
        }
    }
}

/// Collects timed events produced out of chronological order.
///
/// [`EventBuffer::flush`] consumes the buffer, so nothing can be added once
/// the events have been written.
#[derive(Debug, Default)]
pub struct EventBuffer {
    events: Vec<BufferedEvent>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn push(&mut self, event: BufferedEvent) {
        self.events.push(event);
    }

    pub fn set_variable(&mut self, time: f64, variable_type: Alias, container: Alias, value: f64) {
        self.push(BufferedEvent::SetVariable {
            time,
            variable_type,
            container,
            value,
        });
    }

    pub fn add_variable(&mut self, time: f64, variable_type: Alias, container: Alias, value: f64) {
        self.push(BufferedEvent::AddVariable {
            time,
            variable_type,
            container,
            value,
        });
    }

    pub fn sub_variable(&mut self, time: f64, variable_type: Alias, container: Alias, value: f64) {
        self.push(BufferedEvent::SubVariable {
            time,
            variable_type,
            container,
            value,
        });
    }

    pub fn push_state(
        &mut self,
        time: f64,
        state_type: Alias,
        container: Alias,
        value: impl Into<StateValue>,
    ) {
        self.push(BufferedEvent::PushState {
            time,
            state_type,
            container,
            value: value.into(),
        });
    }

    pub fn pop_state(&mut self, time: f64, state_type: Alias, container: Alias) {
        self.push(BufferedEvent::PopState {
            time,
            state_type,
            container,
        });
    }

    /// Events in the order they will be written.
    pub fn into_sorted(mut self) -> Vec<BufferedEvent> {
        // stable: equal timestamps keep insertion order
        self.events.sort_by(|a, b| a.time().total_cmp(&b.time()));
        self.events
    }

    /// Sorts by time and writes every event once. Returns the number of
    /// events written.
    pub fn flush<W: Write>(self, writer: &mut PajeWriter<W>) -> io::Result<usize> {
        let events = self.into_sorted();
        for event in &events {
            writer.write_event(event)?;
        }
        tracing::debug!(events = events.len(), "flushed buffered events");
        Ok(events.len())
    }
}
