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

//! Unified error type and context helpers.
//!
//! [`DomError`] and [`BinError`] both convert into [`Error`], so a function
//! that navigates a decoded tree can use `?` on either. Context is layered on
//! with [`ResultExt`]:
//!
//! ```rust
//! use domstream::{Bin16Reader, BinIndex, ResultExt};
//!
//! let index: BinIndex<u16> = BinIndex::new().with(1, "config");
//! let mut reader = Bin16Reader::new(&index);
//! let err = reader
//!     .decode(&[0x80, 0x01, 0x00])
//!     .context("loading config.bin")
//!     .unwrap_err();
//! assert!(err.to_string().starts_with("loading config.bin: "));
//! assert!(err.is_malformed_input());
//! ```

use domstream_bin::BinError;
use domstream_core::DomError;
use std::fmt;
use thiserror::Error;

/// Any error produced by domstream.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Bin(#[from] BinError),

    /// An error annotated by a caller.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// The innermost error, with all context layers removed.
    pub fn root_cause(&self) -> &Error {
        let mut err = self;
        while let Error::Context { source, .. } = err {
            err = source;
        }
        err
    }

    /// Path of the node the error refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self.root_cause() {
            Error::Dom(e) => Some(e.path()),
            Error::Bin(e) => e.path(),
            Error::Context { .. } => None,
        }
    }

    /// True when the error comes from untrusted input rather than from the
    /// caller's own data.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self.root_cause(), Error::Bin(e) if e.is_malformed_input())
    }

    fn wrap(self, context: String) -> Self {
        Error::Context {
            context,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Adds context to any result whose error converts into [`Error`].
pub trait ResultExt<T> {
    fn context<C: fmt::Display>(self, context: C) -> Result<T>;

    /// Like [`context`](ResultExt::context), evaluated only on error.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.map_err(|e| e.into().wrap(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.into().wrap(f().to_string()))
    }
}
