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

//! Scalar values stored in tree nodes.
//!
//! A node payload is a [`Value`]. Values written through a stream keep their
//! Rust type (`I32`, `F64`, `String`, ...). Values decoded from a binary
//! stream arrive as [`Value::Bytes`] and are reinterpreted on demand when a
//! typed read asks for them, so the same tree can be read with any scalar
//! type whose width matches.
//!
//! The [`Scalar`] trait bridges Rust primitives and `Value`:
//!
//! - same variant: returned directly
//! - `Bytes`: big-endian reinterpretation of exactly the type's width
//! - anything else: textual parse of the rendered value
//!
//! Empty payloads (an empty string or zero bytes) read as the type default.

use crate::error::DomError;
use std::borrow::Cow;
use std::fmt;

/// A scalar payload of a tree node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Boolean, one byte on the wire.
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    /// UTF-8 text.
    String(String),
    /// Raw bytes, as produced by the binary decoder.
    Bytes(Vec<u8>),
}

impl Value {
    /// Bytes of this value as they appear inside a binary leaf frame.
    ///
    /// Numbers are big-endian in their natural width, booleans are a
    /// single `0`/`1` byte, strings are UTF-8.
    pub fn wire_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            Self::Bool(b) => Cow::Owned(vec![u8::from(*b)]),
            Self::I8(n) => Cow::Owned(n.to_be_bytes().to_vec()),
            Self::I16(n) => Cow::Owned(n.to_be_bytes().to_vec()),
            Self::I32(n) => Cow::Owned(n.to_be_bytes().to_vec()),
            Self::I64(n) => Cow::Owned(n.to_be_bytes().to_vec()),
            Self::U8(n) => Cow::Owned(vec![*n]),
            Self::U16(n) => Cow::Owned(n.to_be_bytes().to_vec()),
            Self::U32(n) => Cow::Owned(n.to_be_bytes().to_vec()),
            Self::U64(n) => Cow::Owned(n.to_be_bytes().to_vec()),
            Self::F32(n) => Cow::Owned(n.to_be_bytes().to_vec()),
            Self::F64(n) => Cow::Owned(n.to_be_bytes().to_vec()),
            Self::String(s) => Cow::Borrowed(s.as_bytes()),
            Self::Bytes(b) => Cow::Borrowed(b),
        }
    }

    /// Length of [`wire_bytes`](Self::wire_bytes) without materializing it.
    pub fn wire_len(&self) -> usize {
        match self {
            Self::Bool(_) | Self::I8(_) | Self::U8(_) => 1,
            Self::I16(_) | Self::U16(_) => 2,
            Self::I32(_) | Self::U32(_) | Self::F32(_) => 4,
            Self::I64(_) | Self::U64(_) | Self::F64(_) => 8,
            Self::String(s) => s.len(),
            Self::Bytes(b) => b.len(),
        }
    }

    /// Returns true for an empty string or an empty byte buffer.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::String(s) => s.is_empty(),
            Self::Bytes(b) => b.is_empty(),
            _ => false,
        }
    }

    /// Try to get the value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as raw bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Textual rendering, as used by text-based renderers.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", if *b { "1" } else { "0" }),
            Self::I8(n) => write!(f, "{}", n),
            Self::I16(n) => write!(f, "{}", n),
            Self::I32(n) => write!(f, "{}", n),
            Self::I64(n) => write!(f, "{}", n),
            Self::U8(n) => write!(f, "{}", n),
            Self::U16(n) => write!(f, "{}", n),
            Self::U32(n) => write!(f, "{}", n),
            Self::U64(n) => write!(f, "{}", n),
            Self::F32(n) => write!(f, "{}", n),
            Self::F64(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
            Self::Bytes(b) => {
                for byte in b {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}

/// Why a [`Value`] could not be converted to a scalar.
///
/// Converted into a [`DomError`] once the path of the node is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Raw payload of the wrong width.
    Width {
        type_name: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Text that does not parse as the requested type.
    Parse { message: String },
}

impl ValueError {
    /// Attach the node path and turn this into a [`DomError`].
    pub fn at(self, path: impl Into<String>) -> DomError {
        match self {
            Self::Width {
                type_name,
                expected,
                actual,
            } => DomError::ValueWidth {
                path: path.into(),
                type_name,
                expected,
                actual,
            },
            Self::Parse { message } => DomError::invalid_value(path, message),
        }
    }
}

/// Conversion between a Rust type and a node [`Value`].
pub trait Scalar: Sized + Default {
    /// Wrap this value in the matching [`Value`] variant.
    fn into_value(self) -> Value;

    /// Convert a stored value back.
    fn from_value(value: &Value) -> Result<Self, ValueError>;
}

fn parse_text<T>(text: &str, type_name: &'static str) -> Result<T, ValueError>
where
    T: std::str::FromStr + Default,
    T::Err: fmt::Display,
{
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(T::default());
    }
    trimmed.parse::<T>().map_err(|e| ValueError::Parse {
        message: format!("'{}' is not a valid {}: {}", trimmed, type_name, e),
    })
}

macro_rules! impl_numeric_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: &Value) -> Result<Self, ValueError> {
                    const WIDTH: usize = std::mem::size_of::<$ty>();
                    match value {
                        Value::$variant(n) => Ok(*n),
                        Value::Bytes(bytes) if bytes.is_empty() => Ok(Self::default()),
                        Value::Bytes(bytes) => {
                            let raw: [u8; WIDTH] =
                                bytes.as_slice().try_into().map_err(|_| ValueError::Width {
                                    type_name: stringify!($ty),
                                    expected: WIDTH,
                                    actual: bytes.len(),
                                })?;
                            Ok(<$ty>::from_be_bytes(raw))
                        }
                        Value::String(text) => parse_text(text, stringify!($ty)),
                        other => parse_text(&other.render(), stringify!($ty)),
                    }
                }
            }
        )*
    };
}

impl_numeric_scalar!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
);

impl Scalar for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Bytes(bytes) => match bytes.as_slice() {
                [] => Ok(false),
                [byte] => Ok(*byte != 0),
                _ => Err(ValueError::Width {
                    type_name: "bool",
                    expected: 1,
                    actual: bytes.len(),
                }),
            },
            other => {
                let text = other.render();
                match text.trim() {
                    "" | "0" | "false" => Ok(false),
                    "1" | "true" => Ok(true),
                    trimmed => parse_text::<i64>(trimmed, "bool").map(|n| n != 0),
                }
            }
        }
    }
}

impl Scalar for String {
    fn into_value(self) -> Value {
        Value::String(self)
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Bytes(bytes) => String::from_utf8(bytes.clone()).map_err(|e| ValueError::Parse {
                message: format!("payload is not UTF-8: {}", e),
            }),
            other => Ok(other.render()),
        }
    }
}

impl Scalar for Vec<u8> {
    fn into_value(self) -> Value {
        Value::Bytes(self)
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        Ok(value.wire_bytes().into_owned())
    }
}
