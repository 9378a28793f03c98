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

use crate::alias::{Alias, AliasRegistry};
use crate::buffer::{BufferedEvent, StateValue};
use crate::color::Color;
use crate::event::{EventKind, HEADER};
use crate::number::format_double;
use std::io::{self, Write};

/// Source timestamps are seconds, the trace stores milliseconds.
pub const TIME_SCALE: f64 = 1000.0;

/// One tab separated data line under construction.
struct Line {
    buf: String,
}

impl Line {
    fn new(kind: EventKind) -> Self {
        Self {
            buf: kind.code().to_string(),
        }
    }

    fn field(mut self, value: &str) -> Self {
        self.buf.push('\t');
        self.buf.push_str(value);
        self
    }

    fn alias(self, alias: Alias) -> Self {
        self.field(&alias.to_string())
    }

    /// A missing parent is written as the literal `0`.
    fn parent(self, parent: Option<Alias>) -> Self {
        match parent {
            Some(alias) => self.alias(alias),
            None => self.int(0),
        }
    }

    fn int(self, value: i64) -> Self {
        self.field(&value.to_string())
    }

    fn double(self, value: f64) -> Self {
        self.field(&format_double(value))
    }

    fn time(self, seconds: f64) -> Self {
        self.double(TIME_SCALE * seconds)
    }

    fn string(self, value: &str) -> Self {
        self.field(&format!("\"{value}\""))
    }

    fn color(self, color: Color) -> Self {
        self.field(&format!(
            "\"{} {} {}\"",
            format_double(color.r),
            format_double(color.g),
            format_double(color.b)
        ))
    }

    fn finish(mut self) -> String {
        self.buf.push('\n');
        self.buf
    }
}

/// Streams a Paje trace into `W`.
///
/// The header is written on construction. Definitions are written as soon
/// as they are declared and return the alias they were given; timed events
/// go through [`PajeWriter::write_event`], usually from a sorted
/// [`EventBuffer`](crate::EventBuffer).
pub struct PajeWriter<W: Write> {
    writer: W,
    aliases: AliasRegistry,
    lines_written: u64,
}

impl<W: Write> PajeWriter<W> {
    pub fn new(mut writer: W) -> Result<Self, io::Error> {
        writer.write_all(HEADER.as_bytes())?;
        Ok(Self {
            writer,
            aliases: AliasRegistry::new(),
            lines_written: 0,
        })
    }

    fn write_line(&mut self, line: Line) -> Result<(), io::Error> {
        self.writer.write_all(line.finish().as_bytes())?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn define_container_type(
        &mut self,
        parent_type: Option<Alias>,
        name: &str,
    ) -> Result<Alias, io::Error> {
        let alias = self.aliases.next_alias();
        self.write_line(
            Line::new(EventKind::DefineContainerType)
                .alias(alias)
                .parent(parent_type)
                .string(name),
        )?;
        Ok(alias)
    }

    pub fn define_variable_type(
        &mut self,
        container_type: Alias,
        name: &str,
    ) -> Result<Alias, io::Error> {
        let alias = self.aliases.next_alias();
        self.write_line(
            Line::new(EventKind::DefineVariableType)
                .alias(alias)
                .alias(container_type)
                .string(name)
                .color(Color::WHITE),
        )?;
        Ok(alias)
    }

    pub fn define_state_type(
        &mut self,
        container_type: Alias,
        name: &str,
    ) -> Result<Alias, io::Error> {
        let alias = self.aliases.next_alias();
        self.write_line(
            Line::new(EventKind::DefineStateType)
                .alias(alias)
                .alias(container_type)
                .string(name),
        )?;
        Ok(alias)
    }

    pub fn define_link_type(
        &mut self,
        parent_type: Alias,
        start_container_type: Alias,
        end_container_type: Alias,
        name: &str,
    ) -> Result<Alias, io::Error> {
        let alias = self.aliases.next_alias();
        self.write_line(
            Line::new(EventKind::DefineLinkType)
                .alias(alias)
                .alias(parent_type)
                .alias(start_container_type)
                .alias(end_container_type)
                .string(name),
        )?;
        Ok(alias)
    }

    /// Declares a value of `value_type`. Without an explicit color the color
    /// is derived from `name`.
    pub fn define_entity_value(
        &mut self,
        value_type: Alias,
        name: &str,
        color: Option<Color>,
    ) -> Result<Alias, io::Error> {
        let alias = self.aliases.next_alias();
        let color = color.unwrap_or_else(|| Color::for_name(name));
        self.write_line(
            Line::new(EventKind::DefineEntityValue)
                .alias(alias)
                .alias(value_type)
                .string(name)
                .color(color),
        )?;
        Ok(alias)
    }

    /// Creates a container at time zero.
    pub fn create_container(
        &mut self,
        container_type: Alias,
        parent: Option<Alias>,
        name: &str,
    ) -> Result<Alias, io::Error> {
        let alias = self.aliases.next_alias();
        self.write_line(
            Line::new(EventKind::CreateContainer)
                .double(0.0)
                .alias(alias)
                .alias(container_type)
                .parent(parent)
                .string(name),
        )?;
        Ok(alias)
    }

    pub fn write_event(&mut self, event: &BufferedEvent) -> Result<(), io::Error> {
        let line = match *event {
            BufferedEvent::SetVariable {
                time,
                variable_type,
                container,
                value,
            } => variable_line(EventKind::SetVariable, time, variable_type, container, value),
            BufferedEvent::AddVariable {
                time,
                variable_type,
                container,
                value,
            } => variable_line(EventKind::AddVariable, time, variable_type, container, value),
            BufferedEvent::SubVariable {
                time,
                variable_type,
                container,
                value,
            } => variable_line(EventKind::SubVariable, time, variable_type, container, value),
            BufferedEvent::PushState {
                time,
                state_type,
                container,
                value,
            } => {
                let line = Line::new(EventKind::PushState)
                    .time(time)
                    .alias(state_type)
                    .alias(container);
                match value {
                    StateValue::Alias(alias) => line.alias(alias),
                    StateValue::Literal(value) => line.int(value),
                }
            }
            BufferedEvent::PopState {
                time,
                state_type,
                container,
            } => Line::new(EventKind::PopState)
                .time(time)
                .alias(state_type)
                .alias(container),
            BufferedEvent::StartLink {
                time,
                link_type,
                container,
                value,
                start_container,
                key,
            } => Line::new(EventKind::StartLink)
                .time(time)
                .alias(link_type)
                .alias(container)
                .int(value)
                .alias(start_container)
                .int(key),
            BufferedEvent::EndLink {
                time,
                link_type,
                container,
                value,
                end_container,
                key,
            } => Line::new(EventKind::EndLink)
                .time(time)
                .alias(link_type)
                .alias(container)
                .int(value)
                .alias(end_container)
                .int(key),
        };
        self.write_line(line)
    }

    /// Data lines written so far, header excluded.
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn aliases_issued(&self) -> u32 {
        self.aliases.issued()
    }

    pub fn flush(&mut self) -> Result<(), io::Error> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn variable_line(
    kind: EventKind,
    time: f64,
    variable_type: Alias,
    container: Alias,
    value: f64,
) -> Line {
    Line::new(kind)
        .time(time)
        .alias(variable_type)
        .alias(container)
        .double(value)
}
