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

//! Input stream automaton that replays commands against an existing tree.
//!
//! Opening a child that does not exist is not an error. The reader records
//! the open on a stack of missing nodes and behaves as if the node were
//! there: values read as their type default, nested opens are missing too,
//! and each close pops one missing entry. This lets the same command
//! sequence read both complete and partial trees.
//!
//! ```rust
//! use domstream_core::{DomReader, DomWriter, Navigation};
//!
//! let mut w = DomWriter::new();
//! w.open("port").write(8080u16).close();
//!
//! let mut r = DomReader::new(w.into_tree());
//! assert!(matches!(r.open("port"), Navigation::Found { .. }));
//! assert_eq!(r.read::<u16>().unwrap(), 8080);
//! r.close();
//!
//! assert_eq!(r.open("timeout"), Navigation::Missing);
//! assert_eq!(r.read::<u32>().unwrap(), 0);
//! r.close();
//! assert!(!r.missing());
//! ```

use crate::command::{Command, CommandKind, Target};
use crate::error::{DomError, DomResult};
use crate::serialize::DomRead;
use crate::stream::{DomStream, State};
use crate::tree::{Cursor, NodeId, Tree, UserData};
use crate::value::{Scalar, Value};
use tracing::trace;

/// Outcome of a navigation command on a [`DomReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The child exists and is now current. `next` resumes a scan for
    /// further siblings of the same name.
    Found { node: NodeId, next: Cursor },
    /// The child does not exist; the reader is now inside a placeholder.
    Missing,
    /// A non-opening command was applied.
    Moved,
}

impl Navigation {
    pub fn is_found(self) -> bool {
        matches!(self, Navigation::Found { .. })
    }

    pub fn node(self) -> Option<NodeId> {
        match self {
            Navigation::Found { node, .. } => Some(node),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct MissingOpen {
    kind: CommandKind,
    name: String,
}

/// Navigates a tree with the same commands a [`DomWriter`](crate::DomWriter)
/// used to build it.
#[derive(Debug, Clone, Default)]
pub struct DomReader {
    stream: DomStream,
    missing: Vec<MissingOpen>,
}

impl DomReader {
    pub fn new(tree: Tree) -> Self {
        Self {
            stream: DomStream::new(tree),
            missing: Vec::new(),
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.stream.tree
    }

    pub fn current(&self) -> NodeId {
        self.stream.current
    }

    pub fn state(&self) -> State {
        self.stream.state
    }

    /// True while inside at least one missing node.
    pub fn missing(&self) -> bool {
        !self.missing.is_empty()
    }

    /// Depth of the missing-node stack.
    pub fn missing_depth(&self) -> usize {
        self.missing.len()
    }

    /// Return to the root and forget all missing nodes.
    pub fn rewind(&mut self) {
        self.missing.clear();
        self.stream.rewind();
    }

    /// Replace the tree being read and rewind.
    pub fn replace_tree(&mut self, tree: Tree) -> Tree {
        let old = std::mem::replace(&mut self.stream.tree, tree);
        self.rewind();
        old
    }

    /// Detach the tree and restart with an empty one.
    pub fn take_tree(&mut self) -> Tree {
        self.missing.clear();
        self.stream.take_tree()
    }

    pub fn into_tree(self) -> Tree {
        self.stream.tree
    }

    /// Process one command.
    ///
    /// # Panics
    ///
    /// On `ROOT` or `REOPEN` commands, an open without a name or target, an
    /// [`Target::At`] node that is not a child of the current node, or a
    /// close past the root.
    pub fn apply(&mut self, mut command: Command<'_>) -> Navigation {
        match command.kind() {
            CommandKind::Open | CommandKind::Attribute => {
                if self.is_attr() {
                    self.close_node();
                }
                self.open_node(&command)
            }
            CommandKind::Close => {
                if self.is_attr() {
                    self.close_node();
                }
                self.close_node();
                Navigation::Moved
            }
            CommandKind::Cancel => {
                self.close_node();
                Navigation::Moved
            }
            CommandKind::UserData => {
                if !self.missing() {
                    let current = self.stream.current;
                    let data = command.take_data();
                    self.stream.tree.node_mut(current).set_user_data(data);
                }
                Navigation::Moved
            }
            CommandKind::Reopen | CommandKind::Root => {
                panic!("{} is not supported on an input stream", command.kind())
            }
        }
    }

    /// Open the first child named `name`.
    pub fn open(&mut self, name: &str) -> Navigation {
        self.apply(Command::open(name))
    }

    pub fn attribute(&mut self, name: &str) -> Navigation {
        self.apply(Command::attribute(name))
    }

    /// Open the next child named `name` at or after `cursor`.
    pub fn open_from(&mut self, name: &str, cursor: Cursor) -> Navigation {
        self.apply(Command::open_from(name, cursor))
    }

    pub fn attribute_from(&mut self, name: &str, cursor: Cursor) -> Navigation {
        self.apply(Command::attribute_from(name, cursor))
    }

    /// Open a child resolved earlier, for instance with
    /// [`next_named`](Self::next_named).
    pub fn open_at(&mut self, child: NodeId) -> Navigation {
        self.apply(Command::open_at(child))
    }

    pub fn close(&mut self) -> &mut Self {
        self.apply(Command::close());
        self
    }

    /// Leave the current node, real or missing.
    pub fn cancel(&mut self) -> &mut Self {
        self.apply(Command::cancel());
        self
    }

    /// Open a child that must exist.
    ///
    /// Fails with [`DomError::NodeNotFound`] instead of entering a missing
    /// node. An open attribute is closed first, as with any open; otherwise
    /// the position is unchanged on failure.
    pub fn require(&mut self, name: &str) -> DomResult<NodeId> {
        if self.is_attr() {
            self.close_node();
        }
        match self.next_named(name, Cursor::START) {
            Some((node, _)) => {
                self.open_at(node);
                Ok(node)
            }
            None => Err(DomError::node_not_found(self.pending_path(name))),
        }
    }

    /// Look up the next child named `name` without moving.
    pub fn next_named(&self, name: &str, cursor: Cursor) -> Option<(NodeId, Cursor)> {
        if self.missing() {
            return None;
        }
        self.stream.tree.find_child(self.stream.current, name, cursor)
    }

    /// True if the current node has a child named `name`.
    pub fn exists(&self, name: &str) -> bool {
        self.next_named(name, Cursor::START).is_some()
    }

    /// User data of the current node.
    pub fn user_data(&self) -> Option<&UserData> {
        if self.missing() {
            return None;
        }
        self.stream.tree.node(self.stream.current).user_data()
    }

    /// Raw value of the current node, `None` when absent or missing.
    pub fn value(&self) -> Option<&Value> {
        self.stream.check_open();
        if self.missing() {
            return None;
        }
        self.stream.tree.value(self.stream.current)
    }

    /// Read the current value as `T`. Missing nodes read as the default.
    pub fn read<T: Scalar>(&self) -> DomResult<T> {
        self.stream.check_open();
        if self.missing() {
            return Ok(T::default());
        }
        self.stream.tree.get(self.stream.current)
    }

    pub fn read_string(&self) -> DomResult<String> {
        self.read()
    }

    /// Payload bytes of the current node as they would go on the wire.
    pub fn read_bytes(&self) -> DomResult<Vec<u8>> {
        self.read()
    }

    /// Read any [`DomRead`] value at the current position.
    pub fn load<T: DomRead + Default>(&mut self) -> DomResult<T> {
        let mut value = T::default();
        value.read_dom(self)?;
        Ok(value)
    }

    /// `None` when the current node is missing.
    pub fn read_optional<T: DomRead + Default>(&mut self) -> DomResult<Option<T>> {
        if self.missing() {
            return Ok(None);
        }
        self.load().map(Some)
    }

    /// Read the run of siblings sharing the current node's name.
    ///
    /// Every child of the parent with that name yields one element, in
    /// order. The reader is left on the last match, so the caller's close
    /// returns to the parent as usual. A missing node yields an empty
    /// sequence.
    ///
    /// # Panics
    ///
    /// When called at the root.
    pub fn read_seq<T: DomRead + Default>(&mut self) -> DomResult<Vec<T>> {
        self.stream.check_open();
        if self.missing() {
            return Ok(Vec::new());
        }
        let current = self.stream.current;
        let tree = &self.stream.tree;
        let Some(parent) = tree.parent(current) else {
            panic!("sequence read at the root node");
        };
        let name = tree.node(current).name();
        let matches: Vec<NodeId> = tree
            .children(parent)
            .iter()
            .copied()
            .filter(|&c| tree.node(c).name() == name)
            .collect();

        let state = self.stream.state;
        let mut items = Vec::with_capacity(matches.len());
        for node in matches {
            self.stream.descend(node, state);
            items.push(self.load()?);
        }
        Ok(items)
    }

    fn is_attr(&self) -> bool {
        self.stream.state == State::Attribute
    }

    fn open_node(&mut self, command: &Command<'_>) -> Navigation {
        let state = match command.kind() {
            CommandKind::Attribute => State::Attribute,
            _ => State::Open,
        };
        let current = self.stream.current;

        let found = if self.missing() {
            None
        } else {
            match (command.target(), command.name()) {
                (Target::At(child), _) => {
                    let tree = &self.stream.tree;
                    let position = tree.children(current).iter().position(|&c| c == child);
                    match position {
                        Some(i) => Some((child, Cursor::at(i + 1))),
                        None => panic!("node {:?} is not a child of the current node", child),
                    }
                }
                (Target::First, Some(name)) => {
                    self.stream.tree.find_child(current, name, Cursor::START)
                }
                (Target::From(cursor), Some(name)) => {
                    self.stream.tree.find_child(current, name, cursor)
                }
                (_, None) => panic!("{} without a node name", command.kind()),
            }
        };

        match found {
            Some((node, next)) => {
                trace!(path = %self.stream.tree.path(node), "open node");
                self.stream.descend(node, state);
                Navigation::Found { node, next }
            }
            None => {
                let name = command.name().unwrap_or_default().to_string();
                trace!(path = %self.pending_path(&name), "fake open node");
                self.missing.push(MissingOpen {
                    kind: command.kind(),
                    name,
                });
                self.stream.state = state;
                Navigation::Missing
            }
        }
    }

    fn close_node(&mut self) {
        match self.missing.pop() {
            Some(entry) => {
                trace!(
                    path = %self.stream.tree.path(self.stream.current),
                    name = %entry.name,
                    kind = %entry.kind,
                    "fake close node"
                );
                self.stream.state = State::Open;
            }
            None => {
                self.stream.close_node();
            }
        }
    }

    /// Path of `name` below the current position, missing nodes included.
    fn pending_path(&self, name: &str) -> String {
        let mut path = self.stream.tree.path(self.stream.current);
        for entry in self.missing.iter().map(|e| e.name.as_str()).chain([name]) {
            if !path.ends_with('/') {
                path.push('/');
            }
            path.push_str(entry);
        }
        path
    }
}
