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
//! Compact binary wire codec for domstream trees.
//!
//! Each node is encoded as a frame:
//!
//! ```text
//! +---------------+-----------------+------------------+
//! | id (I, BE)    | size (S, BE)    | payload (size B) |
//! +---------------+-----------------+------------------+
//! ```
//!
//! The top bit of `id` marks a container, whose payload is the exact
//! concatenation of its children's frames. Leaf payloads are the raw value
//! bytes, integers big-endian. There is no header, magic or version. Names
//! are mapped to ids by a [`BinIndex`] that both sides share.
//!
//! The id type `I` and size type `S` are chosen per stream; the aliases
//! cover the common symmetric widths:
//!
//! | Writer | Reader | id / size |
//! |--------|--------|-----------|
//! | [`Bin8Writer`] | [`Bin8Reader`] | `u8` / `u8` |
//! | [`Bin16Writer`] | [`Bin16Reader`] | `u16` / `u16` |
//! | [`Bin32Writer`] | [`Bin32Reader`] | `u32` / `u32` |
//!
//! # Security
//!
//! Decoding never trusts a declared size: [`DecodeLimits`] bounds frame
//! sizes and nesting depth, and every size is checked against the bytes
//! actually present before it is used.

mod decode;
mod encode;
mod error;
mod index;
mod limits;
pub mod wire;

pub use decode::{decode_tree, Bin16Reader, Bin32Reader, Bin8Reader, BinReader};
pub use encode::{encode_tree, Bin16Writer, Bin32Writer, Bin8Writer, BinWriter};
pub use error::{BinError, BinResult};
pub use index::BinIndex;
pub use limits::DecodeLimits;
pub use wire::WireInt;
