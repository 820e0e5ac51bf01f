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

//! Error types for tree navigation and value access.
//!
//! Only data errors live here: conditions caused by the content of a tree
//! (which may have been decoded from untrusted bytes). Misuse of the command
//! protocol, such as closing past the root or writing a value while no node
//! is open, is a bug in the calling code and panics instead.
//!
//! Every variant carries the path of the node involved, formatted the same
//! way as [`Tree::path`](crate::Tree::path).

use thiserror::Error;

/// Errors that can occur while navigating or reading a DOM tree.
///
/// # Examples
///
/// ```rust
/// use domstream_core::DomError;
///
/// let err = DomError::node_not_found("/config/port");
/// assert_eq!(err.path(), "/config/port");
/// assert!(err.to_string().contains("/config/port"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// A required child was not present.
    #[error("node '{path}' expected")]
    NodeNotFound { path: String },

    /// A raw payload does not have the width of the requested scalar.
    #[error("value of '{path}' has {actual} bytes, {type_name} needs {expected}")]
    ValueWidth {
        path: String,
        type_name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A textual payload could not be converted to the requested scalar.
    #[error("invalid value at '{path}': {message}")]
    InvalidValue { path: String, message: String },

    /// A node carries a value and children at the same time.
    #[error("node '{path}' carries both a value and children")]
    ValueWithChildren { path: String },
}

impl DomError {
    /// Create a node-not-found error.
    #[inline]
    pub fn node_not_found(path: impl Into<String>) -> Self {
        Self::NodeNotFound { path: path.into() }
    }

    /// Create an invalid-value error.
    #[inline]
    pub fn invalid_value(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Path of the node the error refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::NodeNotFound { path }
            | Self::ValueWidth { path, .. }
            | Self::InvalidValue { path, .. }
            | Self::ValueWithChildren { path } => path,
        }
    }
}

/// Result type for DOM operations.
pub type DomResult<T> = Result<T, DomError>;
