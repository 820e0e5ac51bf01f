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
//! Binary encoder.
//!
//! Each node becomes one frame: `id` (top bit set for containers), `size`
//! and `size` payload bytes. A node without children that carries a value is
//! a leaf and its payload is the value's wire bytes. Every other node is a
//! container whose payload is the concatenation of its children's frames.
//!
//! Sizes are measured in a full pass over the tree before the first byte is
//! written, so an overflow of the size type fails without output.

use crate::error::{BinError, BinResult};
use crate::index::BinIndex;
use crate::wire::{header_len, WireInt};
use domstream_core::{DomWriter, NodeId, Tree, WriterOptions};
use std::collections::HashMap;
use std::io::Write;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use tracing::debug;

/// A [`DomWriter`] that encodes its tree with a [`BinIndex`].
///
/// Dereferences to the inner writer, so all navigation and value methods
/// are available directly.
///
/// # Examples
///
/// ```rust
/// use domstream_bin::{Bin32Writer, BinIndex};
///
/// let index = BinIndex::<u32>::new().with(0, "myroot").with(1, "myitem");
/// let mut w = Bin32Writer::new(&index);
/// w.open("myroot");
/// w.attribute("myitem").write(1i32);
/// w.close();
///
/// let bytes = w.encode().unwrap();
/// assert_eq!(
///     bytes,
///     [0x80, 0, 0, 0, 0, 0, 0, 12, 0, 0, 0, 1, 0, 0, 0, 4, 0, 0, 0, 1]
/// );
/// ```
#[derive(Debug)]
pub struct BinWriter<'a, I: WireInt, S: WireInt> {
    writer: DomWriter,
    index: &'a BinIndex<I>,
    _size: PhantomData<S>,
}

/// Writer with 8-bit ids and sizes.
pub type Bin8Writer<'a> = BinWriter<'a, u8, u8>;
/// Writer with 16-bit ids and sizes.
pub type Bin16Writer<'a> = BinWriter<'a, u16, u16>;
/// Writer with 32-bit ids and sizes.
pub type Bin32Writer<'a> = BinWriter<'a, u32, u32>;

impl<'a, I: WireInt, S: WireInt> BinWriter<'a, I, S> {
    pub fn new(index: &'a BinIndex<I>) -> Self {
        Self::with_options(index, WriterOptions::default())
    }

    pub fn with_options(index: &'a BinIndex<I>, options: WriterOptions) -> Self {
        Self {
            writer: DomWriter::with_options(options),
            index,
            _size: PhantomData,
        }
    }

    pub fn index(&self) -> &'a BinIndex<I> {
        self.index
    }

    /// Encode the current tree. Sizes are recomputed on every call.
    ///
    /// # Panics
    ///
    /// If a node name is not registered in the index.
    pub fn encode(&self) -> BinResult<Vec<u8>> {
        encode_tree::<I, S>(self.writer.tree(), self.index)
    }

    /// Encode the current tree into `out`; returns the number of bytes.
    ///
    /// Nothing is written when encoding fails.
    pub fn write_to<W: Write>(&self, out: &mut W) -> BinResult<usize> {
        let bytes = self.encode()?;
        out.write_all(&bytes)?;
        Ok(bytes.len())
    }

    pub fn into_inner(self) -> DomWriter {
        self.writer
    }
}

impl<I: WireInt, S: WireInt> Deref for BinWriter<'_, I, S> {
    type Target = DomWriter;

    fn deref(&self) -> &DomWriter {
        &self.writer
    }
}

impl<I: WireInt, S: WireInt> DerefMut for BinWriter<'_, I, S> {
    fn deref_mut(&mut self) -> &mut DomWriter {
        &mut self.writer
    }
}

/// Encode every child of the root of `tree` as a top-level frame.
///
/// # Panics
///
/// If a node name is not registered in `index`.
pub fn encode_tree<I: WireInt, S: WireInt>(tree: &Tree, index: &BinIndex<I>) -> BinResult<Vec<u8>> {
    let mut sizes = HashMap::new();
    let mut total = 0u64;
    for &child in tree.children(tree.root()) {
        total = total.saturating_add(measure::<I, S>(tree, child, &mut sizes)?);
    }

    let mut out = Vec::with_capacity(usize::try_from(total).unwrap_or(0));
    for &child in tree.children(tree.root()) {
        emit::<I, S>(tree, child, index, &sizes, &mut out);
    }
    debug!(frames = sizes.len(), bytes = out.len(), "encoded tree");
    Ok(out)
}

/// Record the payload size of `id` and its descendants; returns the length
/// of the whole frame.
fn measure<I: WireInt, S: WireInt>(
    tree: &Tree,
    id: NodeId,
    sizes: &mut HashMap<NodeId, S>,
) -> BinResult<u64> {
    let node = tree.node(id);
    let header = header_len::<I, S>() as u64;

    if !node.has_children() {
        if let Some(value) = node.value() {
            let len = value.wire_len() as u64;
            let size = S::from_u64(len).ok_or_else(|| BinError::PayloadExceedsSizeType {
                path: tree.path(id),
                size: len,
                max: S::MAX.to_u64(),
            })?;
            sizes.insert(id, size);
            return Ok(header.saturating_add(len));
        }
    }
    debug_assert!(
        node.value().is_none(),
        "node '{}' carries a value and children",
        tree.path(id)
    );

    let mut payload = 0u64;
    for &child in node.children() {
        payload = payload.saturating_add(measure::<I, S>(tree, child, sizes)?);
    }
    let size = S::from_u64(payload).ok_or_else(|| BinError::ChildrenSizeExceedsSizeType {
        path: tree.path(id),
        size: payload,
        max: S::MAX.to_u64(),
    })?;
    sizes.insert(id, size);
    Ok(header.saturating_add(payload))
}

fn emit<I: WireInt, S: WireInt>(
    tree: &Tree,
    id: NodeId,
    index: &BinIndex<I>,
    sizes: &HashMap<NodeId, S>,
    out: &mut Vec<u8>,
) {
    let node = tree.node(id);
    let frame_id = index.name_to_id(node.name());
    let size = sizes[&id];

    match node.value().filter(|_| !node.has_children()) {
        Some(value) => {
            frame_id.put_be(out);
            size.put_be(out);
            out.extend_from_slice(&value.wire_bytes());
        }
        None => {
            frame_id.with_container_bit().put_be(out);
            size.put_be(out);
            for &child in node.children() {
                emit::<I, S>(tree, child, index, sizes, out);
            }
        }
    }
}
