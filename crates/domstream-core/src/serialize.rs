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
//! Traits for types that stream themselves through a writer or reader.
//!
//! A type implementing [`DomWrite`] emits its value (and, for composite
//! types, its own child nodes) at the writer's current position. The matching
//! [`DomRead`] implementation replays the same commands on a reader.
//!
//! ```rust
//! use domstream_core::{DomRead, DomReader, DomResult, DomWrite, DomWriter};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Endpoint {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl DomWrite for Endpoint {
//!     fn write_dom(&self, w: &mut DomWriter) {
//!         w.attribute("host").put(&self.host);
//!         w.attribute("port").put(&self.port);
//!     }
//! }
//!
//! impl DomRead for Endpoint {
//!     fn read_dom(&mut self, r: &mut DomReader) -> DomResult<()> {
//!         r.attribute("host");
//!         self.host.read_dom(r)?;
//!         r.attribute("port");
//!         self.port.read_dom(r)?;
//!         Ok(())
//!     }
//! }
//!
//! let mut w = DomWriter::new();
//! w.open("endpoint").put(&Endpoint { host: "db".into(), port: 5432 }).close();
//!
//! let mut r = DomReader::new(w.into_tree());
//! r.open("endpoint");
//! let endpoint: Endpoint = r.load().unwrap();
//! assert_eq!(endpoint.port, 5432);
//! ```

use crate::error::DomResult;
use crate::reader::DomReader;
use crate::writer::DomWriter;

/// A value that can be written through a [`DomWriter`].
pub trait DomWrite {
    fn write_dom(&self, w: &mut DomWriter);
}

/// A value that can be read back through a [`DomReader`].
pub trait DomRead {
    fn read_dom(&mut self, r: &mut DomReader) -> DomResult<()>;
}

impl<T: DomWrite + ?Sized> DomWrite for &T {
    fn write_dom(&self, w: &mut DomWriter) {
        (**self).write_dom(w);
    }
}

impl<T: DomWrite + ?Sized> DomWrite for Box<T> {
    fn write_dom(&self, w: &mut DomWriter) {
        (**self).write_dom(w);
    }
}

impl<T: DomRead + ?Sized> DomRead for Box<T> {
    fn read_dom(&mut self, r: &mut DomReader) -> DomResult<()> {
        (**self).read_dom(r)
    }
}

macro_rules! impl_scalar_dom {
    ($($ty:ty),* $(,)?) => {
        $(
            impl DomWrite for $ty {
                fn write_dom(&self, w: &mut DomWriter) {
                    w.write(*self);
                }
            }

            impl DomRead for $ty {
                fn read_dom(&mut self, r: &mut DomReader) -> DomResult<()> {
                    *self = r.read()?;
                    Ok(())
                }
            }
        )*
    };
}

impl_scalar_dom!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl DomWrite for str {
    fn write_dom(&self, w: &mut DomWriter) {
        w.write_str(self);
    }
}

impl DomWrite for String {
    fn write_dom(&self, w: &mut DomWriter) {
        w.write_str(self);
    }
}

impl DomRead for String {
    fn read_dom(&mut self, r: &mut DomReader) -> DomResult<()> {
        *self = r.read_string()?;
        Ok(())
    }
}
