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

//! State shared by the writer and reader automata.

use crate::tree::{NodeId, Tree};
use tracing::trace;

/// Navigation state of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Nothing opened yet.
    #[default]
    Root,
    /// Inside an element.
    Open,
    /// Inside an attribute.
    Attribute,
    /// A close went past the root.
    Close,
    /// The current node is marked for deletion on the next close.
    Cancel,
}

impl State {
    /// Values may be written or read in this state.
    pub fn accepts_value(self) -> bool {
        matches!(self, State::Open | State::Attribute)
    }
}

/// Tree, current position and state.
#[derive(Debug, Clone)]
pub(crate) struct DomStream {
    pub(crate) tree: Tree,
    pub(crate) current: NodeId,
    pub(crate) state: State,
}

impl Default for DomStream {
    fn default() -> Self {
        DomStream::new(Tree::new())
    }
}

impl DomStream {
    pub(crate) fn new(tree: Tree) -> Self {
        let current = tree.root();
        Self {
            tree,
            current,
            state: State::Root,
        }
    }

    pub(crate) fn descend(&mut self, id: NodeId, state: State) {
        self.current = id;
        self.state = state;
    }

    /// Move to the parent of the current node.
    ///
    /// # Panics
    ///
    /// At the root: there is one close too many.
    pub(crate) fn close_node(&mut self) -> NodeId {
        let closed = self.current;
        match self.tree.parent(closed) {
            Some(parent) => {
                trace!(path = %self.tree.path(closed), "close node");
                self.current = parent;
                self.state = State::Open;
                closed
            }
            None => {
                self.state = State::Close;
                panic!("close past the root node");
            }
        }
    }

    pub(crate) fn check_open(&self) {
        assert!(
            self.state.accepts_value(),
            "value outside of an open node (state {:?})",
            self.state
        );
    }

    pub(crate) fn rewind(&mut self) {
        self.current = self.tree.root();
        self.state = State::Root;
    }

    /// Hand the tree out and restart with an empty one.
    pub(crate) fn take_tree(&mut self) -> Tree {
        let tree = std::mem::take(&mut self.tree);
        self.rewind();
        tree
    }
}
