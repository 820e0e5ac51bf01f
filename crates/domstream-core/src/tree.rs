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

//! Arena-backed node tree.
//!
//! Nodes live in a slot vector owned by [`Tree`] and are addressed by
//! [`NodeId`]. Each non-root node has exactly one parent, stored as an index
//! back-link; removing a node frees its whole subtree. Freed slots are
//! recycled, so a `NodeId` must not be used after the node was removed.

use crate::command::CommandKind;
use crate::error::{DomError, DomResult};
use crate::value::{Scalar, Value};
use bitflags::bitflags;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque data attached to a node by a `USER_DATA` command.
pub type UserData = Arc<dyn Any + Send + Sync>;

/// Handle of a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw slot index, useful as a map key in external tables.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Resume position inside a child list.
///
/// Returned by [`Tree::find_child`] positioned just after the match, so a run
/// of same-named siblings is scanned once in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cursor(usize);

impl Cursor {
    /// Cursor at the first child.
    pub const START: Cursor = Cursor(0);

    pub(crate) fn at(position: usize) -> Cursor {
        Cursor(position)
    }

    /// Position of the next child to be examined.
    pub fn position(self) -> usize {
        self.0
    }
}

bitflags! {
    /// Visibility flags of a node. [`NodeFlags::NORMAL`] is the empty set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct NodeFlags: u8 {
        /// Node is skipped by renderers.
        const HIDDEN = 1;
        /// Node stands for a cancelled, absent value.
        const MISSING = 1 << 1;
    }
}

impl NodeFlags {
    /// No flag set.
    pub const NORMAL: NodeFlags = NodeFlags::empty();

    /// True if no flag is set.
    pub fn is_normal(self) -> bool {
        self.is_empty()
    }
}

/// A single tree node.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    index: Option<String>,
    kind: CommandKind,
    flags: NodeFlags,
    value: Option<Value>,
    user_data: Option<UserData>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: CommandKind, name: String, flags: NodeFlags, user_data: Option<UserData>) -> Self {
        Self {
            name,
            index: None,
            kind,
            flags,
            value: None,
            user_data,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Node name, without the index suffix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index suffix of an indexed node.
    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    /// Set or clear the index suffix.
    pub fn set_index(&mut self, index: Option<String>) {
        self.index = index;
    }

    /// `name#index` for indexed nodes, the bare name otherwise.
    pub fn display_name(&self) -> String {
        match &self.index {
            Some(index) => format!("{}#{}", self.name, index),
            None => self.name.clone(),
        }
    }

    /// The command kind the node was created with.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Visibility flags.
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Mutable access to the visibility flags.
    pub fn flags_mut(&mut self) -> &mut NodeFlags {
        &mut self.flags
    }

    /// True for the unnamed root node of a tree.
    pub fn is_root(&self) -> bool {
        self.kind == CommandKind::Root
    }

    /// True if the node was created by an attribute command.
    pub fn is_attribute(&self) -> bool {
        self.kind == CommandKind::Attribute
    }

    /// True if the node carries [`NodeFlags::HIDDEN`].
    pub fn is_hidden(&self) -> bool {
        self.flags.contains(NodeFlags::HIDDEN)
    }

    /// True if the node was cancelled and kept as a placeholder.
    pub fn is_missing(&self) -> bool {
        self.flags.contains(NodeFlags::MISSING)
    }

    /// Stored value, `None` for containers and unwritten nodes.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Data attached by a `USER_DATA` command.
    pub fn user_data(&self) -> Option<&UserData> {
        self.user_data.as_ref()
    }

    /// Replace or clear the attached user data.
    pub fn set_user_data(&mut self, data: Option<UserData>) {
        self.user_data = data;
    }

    /// Parent node, `None` for the root and for detached nodes.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// True if the node has at least one child.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Owner of all nodes of one DOM.
#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree holding only an unnamed root node.
    pub fn new() -> Self {
        let root = Node::new(CommandKind::Root, String::new(), NodeFlags::NORMAL, None);
        Self {
            slots: vec![Some(root)],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    /// Id of the root node, which lives as long as the tree.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// True if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.try_node(id).is_some()
    }

    /// Borrow a node, `None` if it was removed.
    pub fn try_node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Borrow a node. Panics on a removed id.
    pub fn node(&self, id: NodeId) -> &Node {
        match self.try_node(id) {
            Some(node) => node,
            None => panic!("stale node id {:?}", id),
        }
    }

    /// Mutably borrow a node. Panics on a removed id.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.slots.get_mut(id.0).and_then(Option::as_mut) {
            Some(node) => node,
            None => panic!("stale node id {:?}", id),
        }
    }

    /// Create a detached node.
    pub fn create(
        &mut self,
        kind: CommandKind,
        name: impl Into<String>,
        flags: NodeFlags,
        user_data: Option<UserData>,
    ) -> NodeId {
        let node = Node::new(kind, name.into(), flags, user_data);
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Append a detached node as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// If `child` already has a parent or is the root.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        assert!(child != self.root, "the root cannot become a child");
        assert!(
            self.node(child).parent.is_none(),
            "node {:?} is already attached",
            child
        );
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Detach `child` from `parent` and destroy its subtree.
    ///
    /// # Panics
    ///
    /// If `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let position = self
            .node(parent)
            .children
            .iter()
            .position(|&c| c == child);
        let Some(position) = position else {
            panic!("node {:?} is not a child of {:?}", child, parent);
        };
        self.node_mut(parent).children.remove(position);

        let mut pending = vec![child];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.slots[id.0].take() {
                pending.extend(node.children);
                self.free.push(id.0);
            }
        }
    }

    /// Remove every child of `parent`.
    pub fn clear_children(&mut self, parent: NodeId) {
        while let Some(&last) = self.node(parent).children.last() {
            self.remove_child(parent, last);
        }
    }

    /// Parent of `id`, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Children of `id` in insertion order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Most recently appended child of `id`.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.last().copied()
    }

    /// Next child of `parent` named `name`, searching from `cursor`.
    ///
    /// Returns the child and a cursor positioned after it.
    pub fn find_child(&self, parent: NodeId, name: &str, cursor: Cursor) -> Option<(NodeId, Cursor)> {
        let children = &self.node(parent).children;
        children
            .iter()
            .enumerate()
            .skip(cursor.0)
            .find(|&(_, &id)| self.node(id).name == name)
            .map(|(i, &id)| (id, Cursor(i + 1)))
    }

    /// True if `parent` has a child named `name`.
    pub fn exists(&self, parent: NodeId, name: &str) -> bool {
        self.find_child(parent, name, Cursor::START).is_some()
    }

    /// Number of attribute children of `id`.
    pub fn attribute_count(&self, id: NodeId) -> usize {
        self.children(id)
            .iter()
            .filter(|&&c| self.node(c).is_attribute())
            .count()
    }

    /// True if every child of `id` is an attribute.
    pub fn has_only_attributes(&self, id: NodeId) -> bool {
        self.children(id).iter().all(|&c| self.node(c).is_attribute())
    }

    /// Slash-joined display names from the root, `/` for the root itself.
    pub fn path(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node(current);
            if node.parent.is_some() {
                names.push(node.display_name());
            }
            cursor = node.parent;
        }
        if names.is_empty() {
            return "/".to_string();
        }
        names.reverse();
        let mut path = String::new();
        for name in names {
            path.push('/');
            path.push_str(&name);
        }
        path
    }

    /// Path `name` would have as a child of `parent`.
    pub fn child_path(&self, parent: NodeId, name: &str) -> String {
        let base = self.path(parent);
        if base == "/" {
            format!("/{}", name)
        } else {
            format!("{}/{}", base, name)
        }
    }

    /// Store a typed value, replacing any previous one.
    pub fn set_value<T: Scalar>(&mut self, id: NodeId, value: T) {
        self.node_mut(id).value = Some(value.into_value());
    }

    /// Store an already built [`Value`], replacing any previous one.
    pub fn set_raw(&mut self, id: NodeId, value: Value) {
        self.node_mut(id).value = Some(value);
    }

    /// Remove the value of `id`.
    pub fn clear_value(&mut self, id: NodeId) {
        self.node_mut(id).value = None;
    }

    /// Raw value of `id`, if any.
    pub fn value(&self, id: NodeId) -> Option<&Value> {
        self.node(id).value.as_ref()
    }

    /// Read the value of `id` as `T`. A node without value reads as default.
    pub fn get<T: Scalar>(&self, id: NodeId) -> DomResult<T> {
        match self.value(id) {
            Some(value) => T::from_value(value).map_err(|e| e.at(self.path(id))),
            None => Ok(T::default()),
        }
    }

    /// Pre-order iterator over the descendants of `id`, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    /// Require that `id` does not hold a value and children at once.
    pub fn check_exclusive(&self, id: NodeId) -> DomResult<()> {
        let node = self.node(id);
        if node.value.is_some() && node.has_children() {
            return Err(DomError::ValueWithChildren { path: self.path(id) });
        }
        Ok(())
    }
}

/// Iterator returned by [`Tree::descendants`].
pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

impl fmt::Display for Tree {
    /// Indented outline, one node per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn walk(tree: &Tree, id: NodeId, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let node = tree.node(id);
            write!(f, "{:indent$}{}", "", node.display_name(), indent = depth * 2)?;
            if let Some(value) = &node.value {
                write!(f, " = {}", value)?;
            }
            if node.is_missing() {
                write!(f, " (missing)")?;
            }
            writeln!(f)?;
            for &child in &node.children {
                walk(tree, child, depth + 1, f)?;
            }
            Ok(())
        }

        for &child in self.children(self.root) {
            walk(self, child, 0, f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attach(tree: &mut Tree, parent: NodeId, name: &str) -> NodeId {
        let id = tree.create(CommandKind::Open, name, NodeFlags::NORMAL, None);
        tree.append_child(parent, id);
        id
    }

    #[test]
    fn test_new_tree_has_root_only() {
        let tree = Tree::new();
        assert_eq!(tree.node_count(), 1);
        assert!(tree.node(tree.root()).is_root());
        assert_eq!(tree.path(tree.root()), "/");
    }

    #[test]
    fn test_append_preserves_order() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = attach(&mut tree, root, "a");
        let b = attach(&mut tree, root, "b");
        let c = attach(&mut tree, root, "c");
        assert_eq!(tree.children(root), &[a, b, c]);
        assert_eq!(tree.parent(b), Some(root));
        assert_eq!(tree.last_child(root), Some(c));
    }

    #[test]
    #[should_panic(expected = "already attached")]
    fn test_append_attached_node_panics() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = attach(&mut tree, root, "a");
        let b = attach(&mut tree, root, "b");
        tree.append_child(b, a);
    }

    #[test]
    fn test_remove_child_destroys_subtree() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = attach(&mut tree, root, "a");
        let inner = attach(&mut tree, a, "inner");
        attach(&mut tree, inner, "leaf");
        let b = attach(&mut tree, root, "b");
        assert_eq!(tree.node_count(), 5);

        tree.remove_child(root, a);
        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.children(root), &[b]);
        assert!(!tree.contains(inner));
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = attach(&mut tree, root, "a");
        tree.remove_child(root, a);
        let b = attach(&mut tree, root, "b");
        assert_eq!(a, b);
        assert_eq!(tree.node(b).name(), "b");
    }

    #[test]
    fn test_find_child_cursor_walks_same_named_run() {
        let mut tree = Tree::new();
        let root = tree.root();
        let x1 = attach(&mut tree, root, "x");
        attach(&mut tree, root, "y");
        let x2 = attach(&mut tree, root, "x");

        let (first, cursor) = tree.find_child(root, "x", Cursor::START).unwrap();
        assert_eq!(first, x1);
        assert_eq!(cursor.position(), 1);
        let (second, cursor) = tree.find_child(root, "x", cursor).unwrap();
        assert_eq!(second, x2);
        assert!(tree.find_child(root, "x", cursor).is_none());
    }

    #[test]
    fn test_path_uses_display_names() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = attach(&mut tree, root, "a");
        let b = attach(&mut tree, a, "b");
        tree.node_mut(b).set_index(Some("3".to_string()));
        assert_eq!(tree.path(b), "/a/b#3");
        assert_eq!(tree.child_path(root, "z"), "/z");
        assert_eq!(tree.child_path(a, "z"), "/a/z");
    }

    #[test]
    fn test_get_value_defaults_when_absent() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = attach(&mut tree, root, "a");
        assert_eq!(tree.get::<i32>(a), Ok(0));
        tree.set_value(a, 17i32);
        assert_eq!(tree.get::<i32>(a), Ok(17));
        tree.set_value(a, "later".to_string());
        assert_eq!(tree.get::<String>(a).unwrap(), "later");
    }

    #[test]
    fn test_get_width_error_carries_path() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = attach(&mut tree, root, "a");
        tree.set_raw(a, Value::Bytes(vec![1, 2, 3]));
        let err = tree.get::<u32>(a).unwrap_err();
        assert_eq!(err.path(), "/a");
        assert!(matches!(err, DomError::ValueWidth { expected: 4, actual: 3, .. }));
    }

    #[test]
    fn test_attribute_queries() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = attach(&mut tree, root, "a");
        let attr = tree.create(CommandKind::Attribute, "id", NodeFlags::NORMAL, None);
        tree.append_child(a, attr);
        assert_eq!(tree.attribute_count(a), 1);
        assert!(tree.has_only_attributes(a));
        attach(&mut tree, a, "child");
        assert!(!tree.has_only_attributes(a));
        assert!(tree.exists(a, "child"));
        assert!(!tree.exists(a, "nope"));
    }

    #[test]
    fn test_descendants_preorder() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = attach(&mut tree, root, "a");
        let a1 = attach(&mut tree, a, "a1");
        let b = attach(&mut tree, root, "b");
        let order: Vec<_> = tree.descendants(root).collect();
        assert_eq!(order, vec![a, a1, b]);
    }

    #[test]
    fn test_check_exclusive() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = attach(&mut tree, root, "a");
        tree.set_value(a, 1u8);
        assert!(tree.check_exclusive(a).is_ok());
        attach(&mut tree, a, "b");
        assert_eq!(
            tree.check_exclusive(a),
            Err(DomError::ValueWithChildren { path: "/a".into() })
        );
    }

    #[test]
    fn test_flags() {
        let mut flags = NodeFlags::HIDDEN | NodeFlags::MISSING;
        assert!(flags.contains(NodeFlags::HIDDEN));
        flags.remove(NodeFlags::HIDDEN);
        assert!(!flags.contains(NodeFlags::HIDDEN));
        assert!(flags.contains(NodeFlags::MISSING));
        assert!(NodeFlags::NORMAL.is_normal());
        assert!(!flags.is_normal());
        assert_eq!(flags.bits(), 2);
        flags |= NodeFlags::HIDDEN;
        assert_eq!(flags, NodeFlags::all());
    }

    #[test]
    fn test_try_node_and_typed_get_coexist() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = attach(&mut tree, root, "a");
        tree.set_value(a, 3u16);
        assert_eq!(tree.try_node(a).map(Node::name), Some("a"));
        assert_eq!(tree.get::<u16>(a), Ok(3));

        tree.remove_child(root, a);
        assert!(tree.try_node(a).is_none());
        assert!(!tree.contains(a));
    }

    #[test]
    fn test_display_outline() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = attach(&mut tree, root, "a");
        let b = attach(&mut tree, a, "b");
        tree.set_value(b, 5i16);
        assert_eq!(tree.to_string(), "a\n  b = 5\n");
    }
}
