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
//! Sequence and optional support.
//!
//! Sequences are written as a run of same-named siblings, and an empty
//! sequence cancels its node. An empty sequence therefore cannot be told
//! apart from an absent one: both read back as empty.

use crate::error::DomResult;
use crate::reader::DomReader;
use crate::serialize::{DomRead, DomWrite};
use crate::writer::DomWriter;
use std::collections::VecDeque;

impl<T: DomWrite> DomWrite for [T] {
    fn write_dom(&self, w: &mut DomWriter) {
        w.write_seq(self.iter());
    }
}

impl<T: DomWrite> DomWrite for Vec<T> {
    fn write_dom(&self, w: &mut DomWriter) {
        w.write_seq(self.iter());
    }
}

impl<T: DomWrite> DomWrite for VecDeque<T> {
    fn write_dom(&self, w: &mut DomWriter) {
        w.write_seq(self.iter());
    }
}

impl<T: DomRead + Default> DomRead for Vec<T> {
    fn read_dom(&mut self, r: &mut DomReader) -> DomResult<()> {
        *self = r.read_seq()?;
        Ok(())
    }
}

impl<T: DomRead + Default> DomRead for VecDeque<T> {
    fn read_dom(&mut self, r: &mut DomReader) -> DomResult<()> {
        *self = r.read_seq::<T>()?.into();
        Ok(())
    }
}

impl<T: DomWrite> DomWrite for Option<T> {
    fn write_dom(&self, w: &mut DomWriter) {
        w.write_optional(self.as_ref());
    }
}

impl<T: DomRead + Default> DomRead for Option<T> {
    fn read_dom(&mut self, r: &mut DomReader) -> DomResult<()> {
        *self = r.read_optional()?;
        Ok(())
    }
}

/// Join two sequences into a new vector.
pub fn concat<T: Clone>(first: &[T], second: &[T]) -> Vec<T> {
    let mut joined = Vec::with_capacity(first.len() + second.len());
    joined.extend_from_slice(first);
    joined.extend_from_slice(second);
    joined
}
