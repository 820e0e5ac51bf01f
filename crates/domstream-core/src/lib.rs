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
//! Node tree, navigation commands and DOM stream automata.
//!
//! This crate provides the format-independent half of domstream: a tree of
//! named nodes, a small command protocol to build and navigate it, and the
//! two stream automata that interpret those commands.
//!
//! - [`DomWriter`] builds a tree from `open` / `attribute` / `close` /
//!   `cancel` / `reopen` commands and values.
//! - [`DomReader`] replays the same commands against an existing tree and
//!   tolerates absent nodes, reading them as defaults.
//! - [`DomWrite`] / [`DomRead`] let types describe themselves once for
//!   both directions.
//! - [`traverse`](traverse::traverse) exposes the tree to renderers.
//!
//! Wire formats live in separate crates (see `domstream-bin`).
//!
//! # Errors
//!
//! Data errors are returned as [`DomError`]. Misuse of the command protocol
//! (closing past the root, writing outside a node, ...) panics.

mod command;
mod error;
mod reader;
mod serialize;
pub mod seq;
mod stream;
pub mod traverse;
mod tree;
mod value;
mod writer;

pub use command::{Command, CommandKind, Target};
pub use error::{DomError, DomResult};
pub use reader::{DomReader, Navigation};
pub use serialize::{DomRead, DomWrite};
pub use stream::State;
pub use traverse::{traverse, StatsCollector, TraverseConfig, TreeVisitor, VisitorContext};
pub use tree::{Cursor, Descendants, Node, NodeFlags, NodeId, Tree, UserData};
pub use value::{Scalar, Value, ValueError};
pub use writer::{DomWriter, WriterOptions};
