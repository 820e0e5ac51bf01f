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
//! Error types for the binary codec.
//!
//! Decode errors carry the byte offset of the offending frame header, encode
//! errors the path of the offending node.
//!
//! # Examples
//!
//! ```rust
//! use domstream_bin::{BinError, BinIndex, Bin32Reader};
//!
//! let index = BinIndex::<u32>::new().with(0, "a");
//! let mut reader = Bin32Reader::new(&index);
//!
//! // Leaf frame with id 9, which the index does not know.
//! let bytes = [0, 0, 0, 9, 0, 0, 0, 0];
//! match reader.decode(&bytes) {
//!     Err(BinError::UnknownNodeId { id, offset }) => {
//!         assert_eq!(id, 9);
//!         assert_eq!(offset, 0);
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use domstream_core::DomError;
use std::io;
use thiserror::Error;

/// Errors produced by the binary encoder and decoder.
#[derive(Error, Debug)]
pub enum BinError {
    /// A frame id is not registered in the index.
    #[error("unknown node id {id} at offset {offset}")]
    UnknownNodeId { id: u64, offset: usize },

    /// Nested frames do not add up to the size declared by their container.
    #[error("size mismatch at offset {offset}: declared {expected} bytes, found {actual}")]
    SizeMismatch {
        offset: usize,
        expected: u64,
        actual: u64,
    },

    /// A frame declares more bytes than the configured limit.
    #[error("object of {size} bytes at offset {offset} exceeds limit of {max}")]
    ObjectTooLarge { offset: usize, size: u64, max: u64 },

    /// The input ends inside a top-level frame.
    #[error("truncated input at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: u64,
        available: u64,
    },

    /// Containers are nested deeper than the configured limit.
    #[error("nesting depth exceeds limit of {max} at offset {offset}")]
    DepthLimitExceeded { offset: usize, max: usize },

    /// The children of a node do not fit into the size type.
    #[error("children of '{path}' take {size} bytes, size type holds at most {max}")]
    ChildrenSizeExceedsSizeType { path: String, size: u64, max: u64 },

    /// A leaf payload does not fit into the size type.
    #[error("payload of '{path}' has {size} bytes, size type holds at most {max}")]
    PayloadExceedsSizeType { path: String, size: u64, max: u64 },

    /// Tree access failed.
    #[error(transparent)]
    Dom(#[from] DomError),

    /// Reading or writing the underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl BinError {
    /// Byte offset for decode errors.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::UnknownNodeId { offset, .. }
            | Self::SizeMismatch { offset, .. }
            | Self::ObjectTooLarge { offset, .. }
            | Self::Truncated { offset, .. }
            | Self::DepthLimitExceeded { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// Node path for encode and tree errors.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::ChildrenSizeExceedsSizeType { path, .. }
            | Self::PayloadExceedsSizeType { path, .. } => Some(path),
            Self::Dom(err) => Some(err.path()),
            _ => None,
        }
    }

    /// True for errors caused by malformed input bytes.
    pub fn is_malformed_input(&self) -> bool {
        self.offset().is_some()
    }
}

/// Result type for binary codec operations.
pub type BinResult<T> = Result<T, BinError>;
