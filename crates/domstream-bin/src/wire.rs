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
//! Fixed-width unsigned integers used for frame ids and sizes.
//!
//! Every integer goes on the wire big-endian. The top bit of an id marks a
//! container frame.

use std::fmt::{Debug, Display};
use std::hash::Hash;

mod sealed {
    pub trait Sealed {}
}

/// An unsigned integer type usable as frame id or frame size.
///
/// Implemented for `u8`, `u16`, `u32` and `u64`.
pub trait WireInt:
    Copy + Eq + Ord + Hash + Debug + Display + Send + Sync + 'static + sealed::Sealed
{
    /// Encoded width in bytes.
    const WIDTH: usize;
    /// Largest representable value.
    const MAX: Self;
    /// The top bit, set on container ids.
    const CONTAINER_BIT: Self;

    fn to_u64(self) -> u64;

    /// `None` if `value` does not fit.
    fn from_u64(value: u64) -> Option<Self>;

    /// Append the big-endian bytes to `out`.
    fn put_be(self, out: &mut Vec<u8>);

    /// Decode from exactly `WIDTH` big-endian bytes.
    ///
    /// # Panics
    ///
    /// If `bytes.len() != WIDTH`.
    fn from_be_slice(bytes: &[u8]) -> Self;

    fn is_container(self) -> bool;

    fn with_container_bit(self) -> Self;

    fn without_container_bit(self) -> Self;
}

macro_rules! impl_wire_int {
    ($($ty:ty),*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl WireInt for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();
                const MAX: Self = <$ty>::MAX;
                const CONTAINER_BIT: Self = 1 << (<$ty>::BITS - 1);

                #[inline]
                fn to_u64(self) -> u64 {
                    u64::from(self)
                }

                #[inline]
                fn from_u64(value: u64) -> Option<Self> {
                    <$ty>::try_from(value).ok()
                }

                #[inline]
                fn put_be(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_be_bytes());
                }

                #[inline]
                fn from_be_slice(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_be_bytes(raw)
                }

                #[inline]
                fn is_container(self) -> bool {
                    self & Self::CONTAINER_BIT != 0
                }

                #[inline]
                fn with_container_bit(self) -> Self {
                    self | Self::CONTAINER_BIT
                }

                #[inline]
                fn without_container_bit(self) -> Self {
                    self & !Self::CONTAINER_BIT
                }
            }
        )*
    };
}

impl_wire_int!(u8, u16, u32, u64);

/// Bytes taken by one frame header with id type `I` and size type `S`.
pub const fn header_len<I: WireInt, S: WireInt>() -> usize {
    I::WIDTH + S::WIDTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_bit_is_top_bit() {
        assert_eq!(u8::CONTAINER_BIT, 0x80);
        assert_eq!(u16::CONTAINER_BIT, 0x8000);
        assert_eq!(u32::CONTAINER_BIT, 0x8000_0000);
        assert_eq!(u64::CONTAINER_BIT, 1 << 63);
    }

    #[test]
    fn test_container_bit_helpers() {
        let id = 5u16.with_container_bit();
        assert!(id.is_container());
        assert_eq!(id.without_container_bit(), 5);
        assert!(!5u16.is_container());
    }

    #[test]
    fn test_big_endian_round_trip() {
        let mut out = Vec::new();
        0x0102_0304u32.put_be(&mut out);
        assert_eq!(out, vec![1, 2, 3, 4]);
        assert_eq!(u32::from_be_slice(&out), 0x0102_0304);
    }

    #[test]
    fn test_from_u64_range() {
        assert_eq!(u8::from_u64(255), Some(255));
        assert_eq!(u8::from_u64(256), None);
        assert_eq!(u64::from_u64(u64::MAX), Some(u64::MAX));
    }

    #[test]
    fn test_header_len() {
        assert_eq!(header_len::<u8, u8>(), 2);
        assert_eq!(header_len::<u16, u32>(), 6);
        assert_eq!(header_len::<u32, u32>(), 8);
    }
}
