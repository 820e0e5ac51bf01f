// domstream - DOM streams and binary wire codec
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Navigation commands.
//!
//! A [`Command`] is a short-lived value handed to
//! [`DomWriter::emit`](crate::DomWriter::emit) or
//! [`DomReader::apply`](crate::DomReader::apply). The convenience methods on
//! the streams (`open`, `close`, ...) build commands internally.

use crate::tree::{Cursor, NodeFlags, NodeId, UserData};
use std::borrow::Cow;
use std::fmt;

/// Kind of a navigation command. Also recorded on nodes as the kind they
/// were created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CommandKind {
    Root = 0,
    Open = 1,
    Attribute = 2,
    Close = 3,
    Reopen = 4,
    Cancel = 5,
    UserData = 6,
}

impl CommandKind {
    /// True for the two kinds that descend into a child.
    pub fn is_descent(self) -> bool {
        matches!(self, Self::Open | Self::Attribute)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Root => "root",
            Self::Open => "open",
            Self::Attribute => "attribute",
            Self::Close => "close",
            Self::Reopen => "reopen",
            Self::Cancel => "cancel",
            Self::UserData => "user-data",
        };
        f.write_str(s)
    }
}

/// Where a reader looks for the child named by an open command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// Search from the first child.
    #[default]
    First,
    /// Search from a cursor returned by an earlier lookup.
    From(Cursor),
    /// Open an already resolved child.
    At(NodeId),
}

/// A navigation command.
#[derive(Debug, Clone)]
pub struct Command<'a> {
    kind: CommandKind,
    flags: NodeFlags,
    name: Option<Cow<'a, str>>,
    index: Option<String>,
    user_data: Option<UserData>,
    target: Target,
}

impl<'a> Command<'a> {
    fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            flags: NodeFlags::NORMAL,
            name: None,
            index: None,
            user_data: None,
            target: Target::First,
        }
    }

    fn named(kind: CommandKind, name: impl Into<Cow<'a, str>>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(kind)
        }
    }

    pub fn open(name: impl Into<Cow<'a, str>>) -> Self {
        Self::named(CommandKind::Open, name)
    }

    pub fn attribute(name: impl Into<Cow<'a, str>>) -> Self {
        Self::named(CommandKind::Attribute, name)
    }

    /// Open the next child named `name` at or after `cursor`.
    pub fn open_from(name: impl Into<Cow<'a, str>>, cursor: Cursor) -> Self {
        Self {
            target: Target::From(cursor),
            ..Self::open(name)
        }
    }

    pub fn attribute_from(name: impl Into<Cow<'a, str>>, cursor: Cursor) -> Self {
        Self {
            target: Target::From(cursor),
            ..Self::attribute(name)
        }
    }

    /// Open a child that was already resolved.
    pub fn open_at(child: NodeId) -> Self {
        Self {
            target: Target::At(child),
            ..Self::new(CommandKind::Open)
        }
    }

    pub fn attribute_at(child: NodeId) -> Self {
        Self {
            target: Target::At(child),
            ..Self::new(CommandKind::Attribute)
        }
    }

    pub fn close() -> Self {
        Self::new(CommandKind::Close)
    }

    pub fn reopen() -> Self {
        Self::new(CommandKind::Reopen)
    }

    pub fn cancel() -> Self {
        Self::new(CommandKind::Cancel)
    }

    /// Attach `data` to the current node.
    pub fn user_data(data: UserData) -> Self {
        Self {
            user_data: Some(data),
            ..Self::new(CommandKind::UserData)
        }
    }

    /// Mark the node this command creates as hidden.
    pub fn hidden(mut self) -> Self {
        self.flags.insert(NodeFlags::HIDDEN);
        self
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Give the created node an index suffix (`name#index`).
    pub fn with_index(mut self, index: impl fmt::Display) -> Self {
        self.index = Some(index.to_string());
        self
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn data(&self) -> Option<&UserData> {
        self.user_data.as_ref()
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub(crate) fn take_index(&mut self) -> Option<String> {
        self.index.take()
    }

    pub(crate) fn take_data(&mut self) -> Option<UserData> {
        self.user_data.take()
    }

    pub(crate) fn into_name(self) -> String {
        self.name.map(Cow::into_owned).unwrap_or_default()
    }
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(name) = &self.name {
            write!(f, " '{}'", name)?;
        }
        if let Some(index) = &self.index {
            write!(f, "#{}", index)?;
        }
        Ok(())
    }
}
