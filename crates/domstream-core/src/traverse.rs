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
//! Tree traversal for renderers and other collaborators.
//!
//! The visitor pattern separates the walk from what is done with each node.
//! Renderers (XML, pretty printers, ...) implement [`TreeVisitor`] and let
//! [`traverse`] handle the recursion, flag filtering and strict checks.
//!
//! # Example
//!
//! ```rust
//! use domstream_core::traverse::{traverse, StatsCollector, TraverseConfig};
//! use domstream_core::DomWriter;
//!
//! let mut w = DomWriter::new();
//! w.open("a").open("b").write(1u8).close().close();
//!
//! let mut stats = StatsCollector::default();
//! traverse(w.tree(), &TraverseConfig::default(), &mut stats).unwrap();
//! assert_eq!(stats.node_count, 2);
//! assert_eq!(stats.value_count, 1);
//! ```

use crate::error::DomError;
use crate::tree::{Node, NodeId, Tree};
use crate::value::Value;

/// Traversal options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraverseConfig {
    /// Visit nodes flagged `HIDDEN` or `MISSING`.
    pub include_hidden: bool,
    /// Reject nodes carrying a value and children at once.
    pub strict: bool,
}

impl Default for TraverseConfig {
    fn default() -> Self {
        Self {
            include_hidden: false,
            strict: true,
        }
    }
}

/// Context provided to visitors during traversal.
#[derive(Debug, Clone)]
pub struct VisitorContext<'a> {
    /// Nesting depth, 1 for children of the root.
    pub depth: usize,
    /// Names from the root to the current node.
    pub path: Vec<&'a str>,
    /// The tree being traversed.
    pub tree: &'a Tree,
}

impl<'a> VisitorContext<'a> {
    /// Context at the root.
    pub fn new(tree: &'a Tree) -> Self {
        Self {
            depth: 0,
            path: Vec::new(),
            tree,
        }
    }

    /// Create a child context with incremented depth.
    pub fn child(&self, name: &'a str) -> Self {
        let mut path = self.path.clone();
        path.push(name);
        Self {
            depth: self.depth + 1,
            path,
            tree: self.tree,
        }
    }

    /// Current path as a string (for error messages).
    pub fn path_string(&self) -> String {
        format!("/{}", self.path.join("/"))
    }
}

/// Callbacks for a depth-first walk over a [`Tree`].
///
/// All methods default to doing nothing.
pub trait TreeVisitor {
    /// Error type returned by visitor methods.
    type Error: From<DomError>;

    /// Called before the value and children of a node.
    fn begin_node(&mut self, _id: NodeId, _node: &Node, _ctx: &VisitorContext) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called for a node carrying a value, after `begin_node`.
    fn visit_value(
        &mut self,
        _id: NodeId,
        _value: &Value,
        _ctx: &VisitorContext,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called after all children of a node.
    fn end_node(&mut self, _id: NodeId, _node: &Node, _ctx: &VisitorContext) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Walk `tree` depth-first. The root itself is not visited.
pub fn traverse<V: TreeVisitor>(tree: &Tree, config: &TraverseConfig, visitor: &mut V) -> Result<(), V::Error> {
    let ctx = VisitorContext::new(tree);
    for &child in tree.children(tree.root()) {
        traverse_node(tree, child, config, visitor, &ctx)?;
    }
    Ok(())
}

fn traverse_node<'a, V: TreeVisitor>(
    tree: &'a Tree,
    id: NodeId,
    config: &TraverseConfig,
    visitor: &mut V,
    parent: &VisitorContext<'a>,
) -> Result<(), V::Error> {
    let node = tree.node(id);
    if !config.include_hidden && (node.is_hidden() || node.is_missing()) {
        return Ok(());
    }
    if config.strict {
        tree.check_exclusive(id)?;
    }

    let ctx = parent.child(node.name());
    visitor.begin_node(id, node, &ctx)?;
    if let Some(value) = node.value() {
        visitor.visit_value(id, value, &ctx)?;
    }
    for &child in node.children() {
        traverse_node(tree, child, config, visitor, &ctx)?;
    }
    visitor.end_node(id, node, &ctx)?;
    Ok(())
}

/// Statistics collector visitor for testing and analysis.
#[derive(Debug, Default)]
pub struct StatsCollector {
    /// Number of nodes visited.
    pub node_count: usize,
    /// Number of values visited.
    pub value_count: usize,
    /// Number of visited nodes flagged `MISSING`.
    pub missing_count: usize,
    /// Maximum depth reached.
    pub max_depth: usize,
}

impl TreeVisitor for StatsCollector {
    type Error = DomError;

    fn begin_node(&mut self, _id: NodeId, node: &Node, ctx: &VisitorContext) -> Result<(), Self::Error> {
        self.node_count += 1;
        if node.is_missing() {
            self.missing_count += 1;
        }
        self.max_depth = self.max_depth.max(ctx.depth);
        Ok(())
    }

    fn visit_value(&mut self, _id: NodeId, _value: &Value, _ctx: &VisitorContext) -> Result<(), Self::Error> {
        self.value_count += 1;
        Ok(())
    }
}
