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
use domstream_bin::{BinIndex, WireInt};

/// Names used by the fixture trees, in id order starting at 0.
pub const NAMES: &[&str] = &[
    "myroot", "myitem", "scalars", "flag", "i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64",
    "f32", "f64", "text", "outer", "inner", "leaf", "config", "id", "version", "port", "list",
    "item", "empty", "blob",
];

/// Index over [`NAMES`] for any id width.
pub fn schema<I: WireInt>() -> BinIndex<I> {
    NAMES
        .iter()
        .enumerate()
        .map(|(i, &name)| match I::from_u64(i as u64) {
            Some(id) => (id, name),
            None => panic!("fixture id {} does not fit", i),
        })
        .collect()
}
