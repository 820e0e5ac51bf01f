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
//! Binary decoder.
//!
//! Input is untrusted. Every declared size is checked against
//! [`DecodeLimits::max_object_size`] before it is used, and against the
//! bytes actually remaining in the enclosing scope. Decoding builds a fresh
//! tree and only swaps it into the reader on success.

use crate::error::{BinError, BinResult};
use crate::index::BinIndex;
use crate::limits::DecodeLimits;
use crate::wire::{header_len, WireInt};
use domstream_core::{CommandKind, DomReader, NodeFlags, NodeId, Tree, Value};
use std::io::Read;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use tracing::{debug, warn};

/// A [`DomReader`] fed from binary frames.
///
/// Dereferences to the inner reader, so navigation and typed reads are
/// available directly once [`decode`](Self::decode) succeeded.
///
/// # Examples
///
/// ```rust
/// use domstream_bin::{Bin32Reader, BinIndex};
///
/// let index = BinIndex::<u32>::new().with(0, "myroot").with(1, "myitem");
/// let bytes = [0x80, 0, 0, 0, 0, 0, 0, 12, 0, 0, 0, 1, 0, 0, 0, 4, 0, 0, 0, 1];
///
/// let mut r = Bin32Reader::new(&index);
/// r.decode(&bytes).unwrap();
/// r.open("myroot");
/// r.attribute("myitem");
/// assert_eq!(r.read::<i32>().unwrap(), 1);
/// r.close();
/// ```
#[derive(Debug)]
pub struct BinReader<'a, I: WireInt, S: WireInt> {
    reader: DomReader,
    index: &'a BinIndex<I>,
    limits: DecodeLimits,
    _size: PhantomData<S>,
}

/// Reader with 8-bit ids and sizes.
pub type Bin8Reader<'a> = BinReader<'a, u8, u8>;
/// Reader with 16-bit ids and sizes.
pub type Bin16Reader<'a> = BinReader<'a, u16, u16>;
/// Reader with 32-bit ids and sizes.
pub type Bin32Reader<'a> = BinReader<'a, u32, u32>;

impl<'a, I: WireInt, S: WireInt> BinReader<'a, I, S> {
    pub fn new(index: &'a BinIndex<I>) -> Self {
        Self::with_limits(index, DecodeLimits::default())
    }

    pub fn with_limits(index: &'a BinIndex<I>, limits: DecodeLimits) -> Self {
        Self {
            reader: DomReader::default(),
            index,
            limits,
            _size: PhantomData,
        }
    }

    pub fn index(&self) -> &'a BinIndex<I> {
        self.index
    }

    pub fn limits(&self) -> DecodeLimits {
        self.limits
    }

    /// Bytes taken by one frame header.
    pub fn header_len() -> usize {
        header_len::<I, S>()
    }

    /// Parse a frame header from the start of `bytes`.
    ///
    /// Returns the raw id (container bit included) and the declared size, or
    /// `None` if fewer than [`header_len`](Self::header_len) bytes are
    /// available. Useful to frame messages on a byte stream.
    pub fn read_header(bytes: &[u8]) -> Option<(I, S)> {
        if bytes.len() < Self::header_len() {
            return None;
        }
        let id = I::from_be_slice(&bytes[..I::WIDTH]);
        let size = S::from_be_slice(&bytes[I::WIDTH..Self::header_len()]);
        Some((id, size))
    }

    /// Decode `bytes` and rewind to the root of the new tree.
    ///
    /// On failure the previously decoded tree is kept untouched.
    pub fn decode(&mut self, bytes: &[u8]) -> BinResult<()> {
        let tree = decode_tree::<I, S>(bytes, self.index, &self.limits)?;
        self.reader.replace_tree(tree);
        Ok(())
    }

    /// Read `input` to its end and decode it.
    pub fn read_from<R: Read>(&mut self, input: &mut R) -> BinResult<()> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        self.decode(&bytes)
    }

    pub fn into_inner(self) -> DomReader {
        self.reader
    }
}

impl<I: WireInt, S: WireInt> Deref for BinReader<'_, I, S> {
    type Target = DomReader;

    fn deref(&self) -> &DomReader {
        &self.reader
    }
}

impl<I: WireInt, S: WireInt> DerefMut for BinReader<'_, I, S> {
    fn deref_mut(&mut self) -> &mut DomReader {
        &mut self.reader
    }
}

/// Decode a sequence of top-level frames into a new tree.
///
/// Leaves hold their payload as [`Value::Bytes`]; typed reads reinterpret
/// it. All nodes are created with kind [`CommandKind::Open`].
pub fn decode_tree<I: WireInt, S: WireInt>(
    bytes: &[u8],
    index: &BinIndex<I>,
    limits: &DecodeLimits,
) -> BinResult<Tree> {
    let mut decoder = Decoder::<I, S> {
        bytes,
        index,
        limits,
        tree: Tree::new(),
        frames: 0,
        _size: PhantomData,
    };
    match decoder.run() {
        Ok(()) => {
            debug!(frames = decoder.frames, bytes = bytes.len(), "decoded tree");
            Ok(decoder.tree)
        }
        Err(err) => {
            warn!(error = %err, "rejected binary input");
            Err(err)
        }
    }
}

struct Decoder<'b, 'i, I: WireInt, S: WireInt> {
    bytes: &'b [u8],
    index: &'i BinIndex<I>,
    limits: &'i DecodeLimits,
    tree: Tree,
    frames: usize,
    _size: PhantomData<S>,
}

/// A byte range whose frames become children of `parent`.
struct Scope {
    parent: NodeId,
    pos: usize,
    end: usize,
    /// Nesting depth of the frames in this range; the top level is 1.
    depth: usize,
}

impl<I: WireInt, S: WireInt> Decoder<'_, '_, I, S> {
    /// Decode the whole input. Open containers live on an explicit stack,
    /// so nesting depth costs heap, not call stack.
    fn run(&mut self) -> BinResult<()> {
        let header = header_len::<I, S>();
        let mut scopes = vec![Scope {
            parent: self.tree.root(),
            pos: 0,
            end: self.bytes.len(),
            depth: 1,
        }];

        while let Some(scope) = scopes.last_mut() {
            if scope.pos >= scope.end {
                scopes.pop();
                continue;
            }
            let Scope {
                parent,
                pos,
                end,
                depth,
            } = *scope;
            let top_level = depth == 1;

            if depth > self.limits.max_depth {
                return Err(BinError::DepthLimitExceeded {
                    offset: pos,
                    max: self.limits.max_depth,
                });
            }

            let remaining = end - pos;
            if remaining < header {
                return Err(if top_level {
                    BinError::Truncated {
                        offset: pos,
                        needed: header as u64,
                        available: remaining as u64,
                    }
                } else {
                    BinError::SizeMismatch {
                        offset: pos,
                        expected: header as u64,
                        actual: remaining as u64,
                    }
                });
            }

            let raw_id = I::from_be_slice(&self.bytes[pos..pos + I::WIDTH]);
            let size = S::from_be_slice(&self.bytes[pos + I::WIDTH..pos + header]).to_u64();
            if size > self.limits.max_object_size {
                return Err(BinError::ObjectTooLarge {
                    offset: pos,
                    size,
                    max: self.limits.max_object_size,
                });
            }

            let id = raw_id.without_container_bit();
            let index = self.index;
            let name = index.id_to_name(id).ok_or(BinError::UnknownNodeId {
                id: id.to_u64(),
                offset: pos,
            })?;

            let body = pos + header;
            let available = (end - body) as u64;
            if size > available {
                return Err(if top_level && !raw_id.is_container() {
                    BinError::Truncated {
                        offset: pos,
                        needed: size,
                        available,
                    }
                } else {
                    BinError::SizeMismatch {
                        offset: pos,
                        expected: size,
                        actual: available,
                    }
                });
            }
            // size <= available, so it fits in usize.
            let body_end = body + size as usize;
            scope.pos = body_end;

            let node = self
                .tree
                .create(CommandKind::Open, name, NodeFlags::NORMAL, None);
            self.tree.append_child(parent, node);
            self.frames += 1;

            if raw_id.is_container() {
                scopes.push(Scope {
                    parent: node,
                    pos: body,
                    end: body_end,
                    depth: depth + 1,
                });
            } else {
                self.tree
                    .set_raw(node, Value::Bytes(self.bytes[body..body_end].to_vec()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> BinIndex<u8> {
        BinIndex::new().with(1, "a").with(2, "b")
    }

    #[test]
    fn test_decode_leaf() {
        let index = index();
        let mut r = Bin8Reader::new(&index);
        r.decode(&[1, 2, 0x01, 0x02]).unwrap();
        r.open("a");
        assert_eq!(r.read::<u16>().unwrap(), 0x0102);
        assert_eq!(r.read_bytes().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_decode_empty_container() {
        let index = index();
        let tree = decode_tree::<u8, u8>(&[0x81, 0], &index, &DecodeLimits::default()).unwrap();
        let a = tree.children(tree.root())[0];
        assert!(!tree.node(a).has_children());
        assert!(tree.value(a).is_none());
    }

    #[test]
    fn test_decode_empty_input() {
        let index = index();
        let tree = decode_tree::<u8, u8>(&[], &index, &DecodeLimits::default()).unwrap();
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_read_header() {
        assert_eq!(Bin8Reader::read_header(&[0x81, 9, 2]), Some((0x81, 9)));
        assert_eq!(Bin32Reader::read_header(&[0, 0, 0]), None);
        assert_eq!(Bin16Reader::header_len(), 4);
    }

    #[test]
    fn test_truncated_top_level_header() {
        let index = index();
        let err = decode_tree::<u8, u8>(&[1], &index, &DecodeLimits::default()).unwrap_err();
        assert!(matches!(
            err,
            BinError::Truncated { offset: 0, needed: 2, available: 1 }
        ));
    }

    #[test]
    fn test_truncated_top_level_leaf() {
        let index = index();
        let err = decode_tree::<u8, u8>(&[1, 4, 0], &index, &DecodeLimits::default()).unwrap_err();
        assert!(matches!(
            err,
            BinError::Truncated { offset: 0, needed: 4, available: 1 }
        ));
    }

    #[test]
    fn test_child_overrunning_container() {
        let index = index();
        // Container of 3 bytes holding a leaf that declares 2 payload bytes.
        let err = decode_tree::<u8, u8>(&[0x81, 3, 2, 2, 9], &index, &DecodeLimits::default())
            .unwrap_err();
        assert!(matches!(
            err,
            BinError::SizeMismatch { offset: 2, expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn test_depth_limit() {
        let index = index();
        let limits = DecodeLimits::default().with_max_depth(1);
        let err = decode_tree::<u8, u8>(&[0x81, 3, 2, 1, 0], &index, &limits).unwrap_err();
        assert!(matches!(err, BinError::DepthLimitExceeded { offset: 2, max: 1 }));
    }

    #[test]
    fn test_unknown_id_reported_before_size() {
        let index = index();
        let err = decode_tree::<u8, u8>(&[9, 5, 0], &index, &DecodeLimits::default()).unwrap_err();
        assert!(matches!(err, BinError::UnknownNodeId { id: 9, offset: 0 }));

        let err = decode_tree::<u8, u8>(&[0x81, 3, 0x89, 7, 0], &index, &DecodeLimits::default())
            .unwrap_err();
        assert!(matches!(err, BinError::UnknownNodeId { id: 9, offset: 2 }));
    }

    #[test]
    fn test_deep_nesting_uses_no_call_stack() {
        let index = BinIndex::<u32>::new().with(1, "a");
        let levels = 200_000u32;
        let mut bytes = Vec::with_capacity(levels as usize * 8);
        for level in 0..levels {
            1u32.with_container_bit().put_be(&mut bytes);
            ((levels - 1 - level) * 8).put_be(&mut bytes);
        }

        let tree = decode_tree::<u32, u32>(&bytes, &index, &DecodeLimits::unlimited()).unwrap();
        assert_eq!(tree.node_count(), levels as usize + 1);

        let err = decode_tree::<u32, u32>(&bytes, &index, &DecodeLimits::default()).unwrap_err();
        assert!(matches!(
            err,
            BinError::DepthLimitExceeded { offset: 8192, max: 1024 }
        ));
    }

    #[test]
    fn test_failed_decode_keeps_previous_tree() {
        let index = index();
        let mut r = Bin8Reader::new(&index);
        r.decode(&[2, 1, 5]).unwrap();
        assert!(r.decode(&[9, 0]).is_err());
        r.open("b");
        assert_eq!(r.read::<u8>().unwrap(), 5);
    }

    #[test]
    fn test_read_from_reader() {
        let index = index();
        let mut r = Bin8Reader::new(&index);
        let mut input = std::io::Cursor::new(vec![2u8, 1, 1]);
        r.read_from(&mut input).unwrap();
        r.open("b");
        assert!(r.read::<bool>().unwrap());
    }
}
