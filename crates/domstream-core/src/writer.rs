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

//! Output stream automaton that builds a tree from commands.
//!
//! # Example
//!
//! ```rust
//! use domstream_core::DomWriter;
//!
//! let mut w = DomWriter::new();
//! w.open("config");
//! w.attribute("version").write(2u16);
//! w.open("name").write_str("demo").close();
//! w.close();
//!
//! let tree = w.into_tree();
//! assert_eq!(tree.to_string(), "config\n  version = 2\n  name = demo\n");
//! ```
//!
//! Opening a node while an attribute is open closes the attribute first, so
//! attributes never need an explicit close.

use crate::command::{Command, CommandKind};
use crate::serialize::DomWrite;
use crate::stream::{DomStream, State};
use crate::tree::{NodeFlags, NodeId, Tree};
use crate::value::{Scalar, Value};
use tracing::trace;

/// Behaviour switches of a [`DomWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    /// Keep cancelled nodes, flagged `MISSING` with an empty value,
    /// instead of deleting them.
    pub show_missing: bool,
    /// Store the payload of `USER_DATA` commands. When false the slot is
    /// cleared instead.
    pub store_user_data: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            show_missing: false,
            store_user_data: true,
        }
    }
}

/// Builds a tree from navigation commands and values.
#[derive(Debug, Clone, Default)]
pub struct DomWriter {
    stream: DomStream,
    options: WriterOptions,
    /// Cancelled nodes waiting for their close, innermost last.
    pending_cancel: Vec<NodeId>,
}

impl DomWriter {
    /// Create a writer over an empty tree with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer over an empty tree.
    pub fn with_options(options: WriterOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Continue writing below the root of an existing tree.
    pub fn from_tree(tree: Tree) -> Self {
        Self {
            stream: DomStream::new(tree),
            ..Self::default()
        }
    }

    /// Current options.
    pub fn options(&self) -> WriterOptions {
        self.options
    }

    /// True if cancelled nodes are kept and flagged `MISSING`.
    pub fn show_missing(&self) -> bool {
        self.options.show_missing
    }

    /// Returns the previous setting.
    pub fn set_show_missing(&mut self, show: bool) -> bool {
        std::mem::replace(&mut self.options.show_missing, show)
    }

    /// True if `USER_DATA` payloads are stored on nodes.
    pub fn store_user_data(&self) -> bool {
        self.options.store_user_data
    }

    /// Returns the previous setting.
    pub fn set_store_user_data(&mut self, store: bool) -> bool {
        std::mem::replace(&mut self.options.store_user_data, store)
    }

    /// The tree built so far.
    pub fn tree(&self) -> &Tree {
        &self.stream.tree
    }

    /// Mutable access to the tree, for edits outside the command protocol.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.stream.tree
    }

    /// Node the next value or child goes to.
    pub fn current(&self) -> NodeId {
        self.stream.current
    }

    /// Navigation state.
    pub fn state(&self) -> State {
        self.stream.state
    }

    /// Process one command.
    ///
    /// # Panics
    ///
    /// On protocol misuse: closing past the root, reopening without a child
    /// or inside an attribute, cancelling the root, emitting `ROOT`, or an
    /// open without a name.
    pub fn emit(&mut self, mut command: Command<'_>) -> &mut Self {
        match command.kind() {
            CommandKind::Open | CommandKind::Attribute => {
                if self.is_attr() {
                    self.close_node();
                }
                self.new_node(command);
            }
            CommandKind::Close => {
                if self.is_attr() {
                    self.close_node();
                }
                self.close_node();
            }
            CommandKind::Reopen => {
                assert!(!self.is_attr(), "reopen inside an attribute");
                self.reopen_node();
            }
            CommandKind::Cancel => self.cancel_node(),
            CommandKind::UserData => {
                let data = if self.options.store_user_data {
                    command.take_data()
                } else {
                    None
                };
                let current = self.stream.current;
                self.stream.tree.node_mut(current).set_user_data(data);
            }
            CommandKind::Root => panic!("ROOT is not a navigation command"),
        }
        self
    }

    /// Append an element named `name` and descend into it.
    pub fn open(&mut self, name: &str) -> &mut Self {
        self.emit(Command::open(name))
    }

    /// Append an attribute named `name` and descend into it.
    ///
    /// Opening a sibling or closing the parent ends the attribute implicitly.
    pub fn attribute(&mut self, name: &str) -> &mut Self {
        self.emit(Command::attribute(name))
    }

    /// Return to the parent, closing an open attribute first.
    ///
    /// A cancelled node is removed here.
    pub fn close(&mut self) -> &mut Self {
        self.emit(Command::close())
    }

    /// Descend into the last child of the current node again.
    ///
    /// # Panics
    ///
    /// If the current node has no children.
    pub fn reopen(&mut self) -> &mut Self {
        self.emit(Command::reopen())
    }

    /// Cancel the current node.
    ///
    /// It is removed on close, or kept and flagged `MISSING` when
    /// [`show_missing`](Self::show_missing) is set.
    ///
    /// ```rust
    /// use domstream_core::DomWriter;
    ///
    /// let mut w = DomWriter::new();
    /// w.open("config");
    /// w.open("port").cancel().close();
    /// w.open("name").write_str("demo").close();
    /// w.close();
    /// assert_eq!(w.tree().to_string(), "config\n  name = demo\n");
    /// ```
    ///
    /// # Panics
    ///
    /// At the root node.
    pub fn cancel(&mut self) -> &mut Self {
        self.emit(Command::cancel())
    }

    /// Store a scalar on the open node, replacing any previous value.
    pub fn write<T: Scalar>(&mut self, value: T) -> &mut Self {
        self.write_value(value.into_value())
    }

    /// Store a string value.
    pub fn write_str(&mut self, value: &str) -> &mut Self {
        self.write_value(Value::String(value.to_owned()))
    }

    /// Store a raw binary buffer.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_value(Value::Bytes(bytes.to_vec()))
    }

    /// Store a [`Value`] on the open node.
    ///
    /// # Panics
    ///
    /// If no node is open.
    pub fn write_value(&mut self, value: Value) -> &mut Self {
        self.stream.check_open();
        let current = self.stream.current;
        self.stream.tree.set_raw(current, value);
        self
    }

    /// Write any [`DomWrite`] value at the current position.
    pub fn put<T: DomWrite + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.write_dom(self);
        self
    }

    /// `None` cancels the open node.
    pub fn write_optional<T: DomWrite>(&mut self, value: Option<&T>) -> &mut Self {
        match value {
            Some(value) => self.put(value),
            None => self.cancel(),
        }
    }

    /// Write a sequence as a run of same-named siblings.
    ///
    /// The first item goes into the open node. Each further item closes it
    /// and opens a new sibling with the same name and flags. An empty
    /// sequence cancels the open node, so an empty sequence and an absent one
    /// produce the same tree.
    pub fn write_seq<'i, T, I>(&mut self, items: I) -> &mut Self
    where
        T: DomWrite + ?Sized + 'i,
        I: IntoIterator<Item = &'i T>,
    {
        self.stream.check_open();
        let node = self.stream.tree.node(self.stream.current);
        let name = node.name().to_owned();
        let flags = node.flags();
        let attribute = node.is_attribute();

        let mut items = items.into_iter();
        let Some(first) = items.next() else {
            return self.cancel();
        };
        first.write_dom(self);
        for item in items {
            if attribute {
                self.emit(Command::attribute(name.as_str()).with_flags(flags));
            } else {
                self.close();
                self.emit(Command::open(name.as_str()).with_flags(flags));
            }
            item.write_dom(self);
        }
        self
    }

    /// Detach the built tree and restart with an empty one.
    pub fn take_tree(&mut self) -> Tree {
        self.pending_cancel.clear();
        self.stream.take_tree()
    }

    /// Consume the writer and return the tree.
    pub fn into_tree(self) -> Tree {
        self.stream.tree
    }

    fn is_attr(&self) -> bool {
        self.stream.tree.node(self.stream.current).is_attribute()
    }

    fn new_node(&mut self, mut command: Command<'_>) {
        assert!(command.name().is_some(), "{} without a node name", command.kind());
        let state = match command.kind() {
            CommandKind::Attribute => State::Attribute,
            _ => State::Open,
        };
        let kind = command.kind();
        let flags = command.flags();
        let index = command.take_index();
        let data = if self.options.store_user_data {
            command.take_data()
        } else {
            None
        };
        let name = command.into_name();

        let parent = self.stream.current;
        trace!(parent = %self.stream.tree.path(parent), name = %name, "new node");
        let id = self.stream.tree.create(kind, name, flags, data);
        self.stream.tree.node_mut(id).set_index(index);
        self.stream.tree.append_child(parent, id);
        self.stream.descend(id, state);
    }

    fn close_node(&mut self) {
        let closed = self.stream.current;
        if self.pending_cancel.last() == Some(&closed) {
            self.pending_cancel.pop();
            trace!(path = %self.stream.tree.path(closed), "drop cancelled node");
            self.stream.close_node();
            let parent = self.stream.current;
            self.stream.tree.remove_child(parent, closed);
        } else {
            self.stream.close_node();
        }
    }

    fn reopen_node(&mut self) {
        let current = self.stream.current;
        let Some(last) = self.stream.tree.last_child(current) else {
            panic!("reopen of '{}' without children", self.stream.tree.path(current));
        };
        trace!(path = %self.stream.tree.path(last), "reopen node");
        let state = if self.stream.tree.node(last).is_attribute() {
            State::Attribute
        } else {
            State::Open
        };
        self.stream.descend(last, state);
    }

    fn cancel_node(&mut self) {
        let current = self.stream.current;
        assert!(current != self.stream.tree.root(), "cancel at the root node");
        trace!(path = %self.stream.tree.path(current), show_missing = self.options.show_missing, "cancel node");
        if self.options.show_missing {
            let tree = &mut self.stream.tree;
            tree.node_mut(current).flags_mut().insert(NodeFlags::MISSING);
            if tree.node(current).has_children() {
                tree.clear_value(current);
            } else {
                tree.set_raw(current, Value::String(String::new()));
            }
        } else {
            if self.pending_cancel.last() != Some(&current) {
                self.pending_cancel.push(current);
            }
            self.stream.state = State::Cancel;
        }
    }
}
