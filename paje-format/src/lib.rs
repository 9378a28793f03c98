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

//! # Paje Format
//!
//! Writer for the Paje trace file format, the line oriented format read by
//! Paje-family trace viewers such as ViTE.
//!
//! A trace starts with a header declaring the schema of every event type
//! (`%EventDef ... %EndEventDef`). Each following line starts with the numeric
//! code of an event type, followed by its fields separated by tabs:
//!
//! - strings are double quoted,
//! - references to declared entities are written `a<N>`, with `0` standing
//!   for "no parent",
//! - `date` fields hold milliseconds,
//! - colors are a quoted `"r g b"` triple,
//! - numbers use 15 significant digits.
//!
//! Type, value and container declarations are written immediately by
//! [`PajeWriter`]. Timed events are collected in an [`EventBuffer`] and written
//! in time order when the buffer is flushed.

pub mod alias;
pub mod buffer;
pub mod color;
pub mod event;
pub mod number;
pub mod writer;

pub use alias::{Alias, AliasRegistry};
pub use buffer::{BufferedEvent, EventBuffer, StateValue};
pub use color::{hue_for_name, Color};
pub use event::{EventKind, HEADER};
pub use number::format_double;
pub use writer::{PajeWriter, TIME_SCALE};
