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

//! Event codes and the file header that declares their schemas.

/// Every event type declared in [`HEADER`], with its numeric code.
///
/// `DefineEventType`, `DestroyContainer`, `SetState`, `ResetState` and
/// `NewEvent` are declared for completeness of the header. The writer never
/// emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventKind {
    DefineContainerType = 0,
    DefineVariableType = 1,
    DefineStateType = 2,
    DefineEventType = 3,
    DefineLinkType = 4,
    DefineEntityValue = 5,
    CreateContainer = 6,
    DestroyContainer = 7,
    SetVariable = 8,
    AddVariable = 9,
    SubVariable = 10,
    SetState = 11,
    PushState = 12,
    PopState = 13,
    ResetState = 14,
    StartLink = 15,
    EndLink = 16,
    NewEvent = 17,
}

impl EventKind {
    pub const ALL: [EventKind; 18] = [
        EventKind::DefineContainerType,
        EventKind::DefineVariableType,
        EventKind::DefineStateType,
        EventKind::DefineEventType,
        EventKind::DefineLinkType,
        EventKind::DefineEntityValue,
        EventKind::CreateContainer,
        EventKind::DestroyContainer,
        EventKind::SetVariable,
        EventKind::AddVariable,
        EventKind::SubVariable,
        EventKind::SetState,
        EventKind::PushState,
        EventKind::PopState,
        EventKind::ResetState,
        EventKind::StartLink,
        EventKind::EndLink,
        EventKind::NewEvent,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Name used in the `%EventDef` line.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::DefineContainerType => "PajeDefineContainerType",
            EventKind::DefineVariableType => "PajeDefineVariableType",
            EventKind::DefineStateType => "PajeDefineStateType",
            EventKind::DefineEventType => "PajeDefineEventType",
            EventKind::DefineLinkType => "PajeDefineLinkType",
            EventKind::DefineEntityValue => "PajeDefineEntityValue",
            EventKind::CreateContainer => "PajeCreateContainer",
            EventKind::DestroyContainer => "PajeDestroyContainer",
            EventKind::SetVariable => "PajeSetVariable",
            EventKind::AddVariable => "PajeAddVariable",
            EventKind::SubVariable => "PajeSubVariable",
            EventKind::SetState => "PajeSetState",
            EventKind::PushState => "PajePushState",
            EventKind::PopState => "PajePopState",
            EventKind::ResetState => "PajeResetState",
            EventKind::StartLink => "PajeStartLink",
            EventKind::EndLink => "PajeEndLink",
            EventKind::NewEvent => "PajeNewEvent",
        }
    }

    /// Number of fields a data line of this kind carries after the code.
    pub fn field_count(self) -> usize {
        match self {
            EventKind::DefineContainerType
            | EventKind::DefineStateType
            | EventKind::DestroyContainer
            | EventKind::PopState
            | EventKind::ResetState => 3,
            EventKind::DefineVariableType
            | EventKind::DefineEventType
            | EventKind::DefineEntityValue
            | EventKind::SetVariable
            | EventKind::AddVariable
            | EventKind::SubVariable
            | EventKind::SetState
            | EventKind::PushState
            | EventKind::NewEvent => 4,
            EventKind::DefineLinkType | EventKind::CreateContainer => 5,
            EventKind::StartLink | EventKind::EndLink => 6,
        }
    }
}

/// Schema declarations written once at the top of every trace.
pub const HEADER: &str = concat!(
    "%EventDef PajeDefineContainerType 0 \n",
    "%       Alias string \n",
    "%       Type string \n",
    "%       Name string \n",
    "%EndEventDef \n",
    "%EventDef PajeDefineVariableType 1 \n",
    "%       Alias string \n",
    "%       Type string \n",
    "%       Name string \n",
    "%       Color color \n",
    "%EndEventDef \n",
    "%EventDef PajeDefineStateType 2 \n",
    "%       Alias string \n",
    "%       Type string \n",
    "%       Name string \n",
    "%EndEventDef \n",
    "%EventDef PajeDefineEventType 3 \n",
    "%       Alias string \n",
    "%       Type string \n",
    "%       Name string \n",
    "%       Color color \n",
    "%EndEventDef \n",
    "%EventDef PajeDefineLinkType 4 \n",
    "%       Alias string \n",
    "%       Type string \n",
    "%       StartContainerType string \n",
    "%       EndContainerType string \n",
    "%       Name string \n",
    "%EndEventDef \n",
    "%EventDef PajeDefineEntityValue 5 \n",
    "%       Alias string \n",
    "%       Type string \n",
    "%       Name string \n",
    "%       Color color \n",
    "%EndEventDef \n",
    "%EventDef PajeCreateContainer 6 \n",
    "%       Time date \n",
    "%       Alias string \n",
    "%       Type string \n",
    "%       Container string \n",
    "%       Name string \n",
    "%EndEventDef \n",
    "%EventDef PajeDestroyContainer 7 \n",
    "%       Time date \n",
    "%       Type string \n",
    "%       Name string \n",
    "%EndEventDef \n",
    "%EventDef PajeSetVariable 8 \n",
    "%       Time date \n",
    "%       Type string \n",
    "%       Container string \n",
    "%       Value double \n",
    "%EndEventDef\n",
    "%EventDef PajeAddVariable 9 \n",
    "%       Time date \n",
    "%       Type string \n",
    "%       Container string \n",
    "%       Value double \n",
    "%EndEventDef\n",
    "%EventDef PajeSubVariable 10 \n",
    "%       Time date \n",
    "%       Type string \n",
    "%       Container string \n",
    "%       Value double \n",
    "%EndEventDef\n",
    "%EventDef PajeSetState 11 \n",
    "%       Time date \n",
    "%       Type string \n",
    "%       Container string \n",
    "%       Value string \n",
    "%EndEventDef\n",
    "%EventDef PajePushState 12 \n",
    "%       Time date \n",
    "%       Type string \n",
    "%       Container string \n",
    "%       Value string \n",
    "%EndEventDef\n",
    "%EventDef PajePopState 13 \n",
    "%       Time date \n",
    "%       Type string \n",
    "%       Container string \n",
    "%EndEventDef\n",
    "%EventDef PajeResetState 14 \n",
    "%       Time date \n",
    "%       Type string \n",
    "%       Container string \n",
    "%EndEventDef\n",
    "%EventDef PajeStartLink 15 \n",
    "%       Time date \n",
    "%       Type string \n",
    "%       Container string \n",
    "%       Value string \n",
    "%       StartContainer string \n",
    "%       Key string \n",
    "%EndEventDef\n",
    "%EventDef PajeEndLink 16 \n",
    "%       Time date \n",
    "%       Type string \n",
    "%       Container string \n",
    "%       Value string \n",
    "%       EndContainer string \n",
    "%       Key string \n",
    "%EndEventDef\n",
    "%EventDef PajeNewEvent 17 \n",
    "%       Time date \n",
    "%       Type string \n",
    "%       Container string \n",
    "%       Value string \n",
    "%EndEventDef\n",
);
