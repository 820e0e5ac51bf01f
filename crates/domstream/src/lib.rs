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

//! # domstream - DOM streams and binary wire codec
//!
//! domstream builds and walks a tree of named nodes through a small command
//! protocol (`open`, `attribute`, `close`, `cancel`, `reopen`) and encodes
//! that tree as compact length-prefixed binary frames. The same command
//! sequence that writes a structure also reads it back, and nodes absent from
//! the input read as defaults instead of failing.
//!
//! ## Quick Start
//!
//! ```rust
//! use domstream::{Bin32Reader, Bin32Writer, BinIndex};
//!
//! let index: BinIndex<u32> = BinIndex::new().with(0, "myroot").with(1, "myitem");
//!
//! let mut writer = Bin32Writer::new(&index);
//! writer.open("myroot").attribute("myitem").write(1i32).close();
//! let bytes = writer.encode().expect("encode");
//! assert_eq!(
//!     bytes,
//!     [0x80, 0, 0, 0, 0, 0, 0, 12, 0, 0, 0, 1, 0, 0, 0, 4, 0, 0, 0, 1]
//! );
//!
//! let mut reader = Bin32Reader::new(&index);
//! reader.decode(&bytes).expect("decode");
//! reader.open("myroot");
//! reader.attribute("myitem");
//! assert_eq!(reader.read::<i32>().unwrap(), 1);
//! reader.attribute("absent");
//! assert_eq!(reader.read::<i32>().unwrap(), 0);
//! reader.close();
//! ```
//!
//! ## Features
//!
//! - **Missing tolerance**: opening an absent child enters a virtual node;
//!   reads return defaults and the matching close pops exactly one level
//! - **Cancellation**: drop a node on close, or keep it flagged as missing
//! - **Sequences**: a run of same-named siblings maps to `Vec<T>`
//! - **Schema**: names map to small integer ids through a [`BinIndex`]
//! - **Width-generic wire**: 8, 16 or 32 bit ids and sizes, big-endian
//! - **Bounded decoding**: [`DecodeLimits`] caps frame sizes and depth
//!
//! ## Modules
//!
//! - [`dom`]: tree, commands and stream automata
//! - [`bin`]: binary wire codec
//! - [`traverse`]: read-only tree walking for renderers

pub use domstream_core::{
    // Commands
    Command,
    CommandKind,
    // Errors
    DomError,
    DomResult,
    // Streams
    DomRead,
    DomReader,
    DomWrite,
    DomWriter,
    Navigation,
    State,
    Target,
    WriterOptions,
    // Tree
    Cursor,
    Node,
    NodeFlags,
    NodeId,
    Tree,
    UserData,
    // Values
    Scalar,
    Value,
};

pub use domstream_bin::{
    Bin16Reader, Bin16Writer, Bin32Reader, Bin32Writer, Bin8Reader, Bin8Writer, BinError,
    BinIndex, BinReader, BinResult, BinWriter, DecodeLimits, WireInt,
};

mod error;
pub use error::{Error, Result, ResultExt};

pub mod dom {
    //! Tree, commands and stream automata
    pub use domstream_core::*;
}

pub mod bin {
    //! Binary wire codec
    pub use domstream_bin::wire::header_len;
    pub use domstream_bin::*;
}

pub mod traverse {
    //! Tree walking
    pub use domstream_core::traverse::{
        traverse, StatsCollector, TraverseConfig, TreeVisitor, VisitorContext,
    };
}

/// Encode `value` under a top-level node called `name`.
///
/// # Panics
///
/// If a node name is not registered in `index`.
pub fn to_bytes<I, S, T>(name: &str, value: &T, index: &BinIndex<I>) -> Result<Vec<u8>>
where
    I: WireInt,
    S: WireInt,
    T: DomWrite + ?Sized,
{
    let mut writer = BinWriter::<I, S>::new(index);
    writer.open(name).put(value).close();
    Ok(writer.encode()?)
}

/// Decode `bytes` and read the top-level node `name` as `T`.
///
/// An absent top-level node reads like any other missing node: the value is
/// `T::default()`. This is how an empty sequence or `None` comes back, since
/// [`to_bytes`] encodes both as zero bytes.
pub fn from_bytes<I, S, T>(bytes: &[u8], name: &str, index: &BinIndex<I>) -> Result<T>
where
    I: WireInt,
    S: WireInt,
    T: DomRead + Default,
{
    from_bytes_with_limits::<I, S, T>(bytes, name, index, DecodeLimits::default())
}

/// [`from_bytes`] with explicit decode limits.
pub fn from_bytes_with_limits<I, S, T>(
    bytes: &[u8],
    name: &str,
    index: &BinIndex<I>,
    limits: DecodeLimits,
) -> Result<T>
where
    I: WireInt,
    S: WireInt,
    T: DomRead + Default,
{
    let mut reader = BinReader::<I, S>::with_limits(index, limits);
    reader.decode(bytes)?;
    reader.open(name);
    let value = reader.load()?;
    reader.close();
    Ok(value)
}

/// Like [`from_bytes`], but the top-level node must be present.
///
/// Fails with [`DomError::NodeNotFound`] when it is not, which also rejects
/// an encoded empty sequence or `None`.
pub fn from_bytes_strict<I, S, T>(bytes: &[u8], name: &str, index: &BinIndex<I>) -> Result<T>
where
    I: WireInt,
    S: WireInt,
    T: DomRead + Default,
{
    let mut reader = BinReader::<I, S>::new(index);
    reader.decode(bytes)?;
    reader.require(name)?;
    let value = reader.load()?;
    reader.close();
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> BinIndex<u16> {
        BinIndex::new().with(1, "port").with(2, "hosts")
    }

    #[test]
    fn test_scalar_to_and_from_bytes() {
        let index = index();
        let bytes = to_bytes::<u16, u16, _>("port", &8080u16, &index).unwrap();
        assert_eq!(bytes, [0, 1, 0, 2, 0x1f, 0x90]);
        let port: u16 = from_bytes::<u16, u16, _>(&bytes, "port", &index).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_missing_top_level_node_reads_default() {
        let index = index();
        let bytes = to_bytes::<u16, u16, _>("port", &1u16, &index).unwrap();
        let hosts: u16 = from_bytes::<u16, u16, _>(&bytes, "hosts", &index).unwrap();
        assert_eq!(hosts, 0);
    }

    #[test]
    fn test_empty_sequence_round_trip() {
        let index = index();
        let bytes = to_bytes::<u16, u16, _>("hosts", &Vec::<u16>::new(), &index).unwrap();
        assert!(bytes.is_empty());
        let hosts: Vec<u16> = from_bytes::<u16, u16, _>(&bytes, "hosts", &index).unwrap();
        assert!(hosts.is_empty());
    }

    #[test]
    fn test_none_round_trip() {
        let index = index();
        let bytes = to_bytes::<u16, u16, _>("port", &Option::<u16>::None, &index).unwrap();
        assert!(bytes.is_empty());
        let port: Option<u16> = from_bytes::<u16, u16, _>(&bytes, "port", &index).unwrap();
        assert_eq!(port, None);

        let bytes = to_bytes::<u16, u16, _>("port", &Some(7u16), &index).unwrap();
        let port: Option<u16> = from_bytes::<u16, u16, _>(&bytes, "port", &index).unwrap();
        assert_eq!(port, Some(7));
    }

    #[test]
    fn test_strict_read_requires_top_level_node() {
        let index = index();
        let bytes = to_bytes::<u16, u16, _>("hosts", &Vec::<u16>::new(), &index).unwrap();
        let err = from_bytes_strict::<u16, u16, Vec<u16>>(&bytes, "hosts", &index).unwrap_err();
        assert!(matches!(err, Error::Dom(DomError::NodeNotFound { .. })));
        assert_eq!(err.path(), Some("/hosts"));

        let bytes = to_bytes::<u16, u16, _>("hosts", &vec![1u16, 2], &index).unwrap();
        let hosts: Vec<u16> = from_bytes_strict::<u16, u16, _>(&bytes, "hosts", &index).unwrap();
        assert_eq!(hosts, vec![1, 2]);
    }

    #[test]
    fn test_limits_are_applied() {
        let index = index();
        let bytes = to_bytes::<u16, u16, _>("port", &1u16, &index).unwrap();
        let limits = DecodeLimits::default().with_max_object_size(1);
        let err = from_bytes_with_limits::<u16, u16, u16>(&bytes, "port", &index, limits)
            .unwrap_err();
        assert!(matches!(err, Error::Bin(BinError::ObjectTooLarge { .. })));
        assert!(err.is_malformed_input());
    }
}
