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
//! Canonical trees, schemas and malformed inputs.
//!
//! - **schema**: the name/id index every fixture tree fits
//! - **trees**: trees built through `DomWriter`
//! - **errors**: malformed binary inputs

pub mod errors;
mod schema;
mod trees;

pub use schema::*;
pub use trees::*;

use crate::FixtureList;

/// Returns all tree fixtures for iteration.
pub fn all() -> FixtureList {
    vec![
        ("single_item", single_item),
        ("scalars", scalars),
        ("nested", nested),
        ("attributes", attributes),
        ("sequence_of_three", sequence_of_three),
        ("empty_container", empty_container),
        ("binary_blob", binary_blob),
        ("deep_nest", deep_nest),
    ]
}
