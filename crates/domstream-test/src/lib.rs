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
//! Shared test fixtures and utilities for domstream crates.
//!
//! # Quick Start
//!
//! ```rust
//! use domstream_test::{fixtures, wire_outline};
//!
//! let tree = fixtures::nested();
//! let index = fixtures::schema::<u16>();
//! assert!(index.try_name_to_id("outer").is_some());
//!
//! for (name, fixture) in fixtures::all() {
//!     assert!(!wire_outline(&fixture()).is_empty(), "{}", name);
//! }
//! ```

pub mod fixtures;

use domstream_core::{NodeId, Tree};
use std::fmt::Write;

/// Type alias for a list of fixture functions (name, generator).
pub type FixtureList = Vec<(&'static str, fn() -> Tree)>;

/// Number of nodes below the root.
pub fn count_nodes(tree: &Tree) -> usize {
    tree.descendants(tree.root()).count()
}

/// Number of nodes carrying a value.
pub fn count_values(tree: &Tree) -> usize {
    tree.descendants(tree.root())
        .filter(|&id| tree.value(id).is_some())
        .count()
}

/// Outline of names and payload wire bytes, one node per line.
///
/// A tree built by a writer and the same tree after a binary round trip
/// produce identical outlines, since decoded values are raw bytes.
pub fn wire_outline(tree: &Tree) -> String {
    fn walk(tree: &Tree, id: NodeId, depth: usize, out: &mut String) {
        let node = tree.node(id);
        let _ = write!(out, "{:indent$}{}", "", node.name(), indent = depth * 2);
        if let Some(value) = node.value().filter(|_| !node.has_children()) {
            out.push_str(" =");
            for byte in value.wire_bytes().iter() {
                let _ = write!(out, " {:02x}", byte);
            }
        }
        out.push('\n');
        for &child in node.children() {
            walk(tree, child, depth + 1, out);
        }
    }

    let mut out = String::new();
    for &child in tree.children(tree.root()) {
        walk(tree, child, 0, &mut out);
    }
    out
}
