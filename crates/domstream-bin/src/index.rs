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
//! Name to id schema shared by encoder and decoder.

use crate::wire::WireInt;
use std::collections::{BTreeMap, HashMap};

/// Bidirectional map between node names and frame ids.
///
/// Built once before encoding or decoding and then shared immutably. Ids may
/// not carry the container bit, and neither ids nor names may repeat.
///
/// # Examples
///
/// ```rust
/// use domstream_bin::BinIndex;
///
/// let index = BinIndex::<u32>::new().with(0, "myroot").with(1, "myitem");
/// assert_eq!(index.name_to_id("myitem"), 1);
/// assert_eq!(index.id_to_name(0), Some("myroot"));
/// assert_eq!(index.id_to_name(7), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BinIndex<I: WireInt> {
    by_id: BTreeMap<I, String>,
    by_name: HashMap<String, I>,
}

impl<I: WireInt> BinIndex<I> {
    pub fn new() -> Self {
        Self {
            by_id: BTreeMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Register `name` under `id`.
    ///
    /// # Panics
    ///
    /// If `id` carries the container bit, or if `id` or `name` is already
    /// registered.
    pub fn register(&mut self, id: I, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        assert!(
            !id.is_container(),
            "id {} of '{}' collides with the container bit",
            id,
            name
        );
        assert!(
            !self.by_id.contains_key(&id),
            "id {} registered twice ('{}')",
            id,
            name
        );
        assert!(
            !self.by_name.contains_key(&name),
            "name '{}' registered twice",
            name
        );
        self.by_name.insert(name.clone(), id);
        self.by_id.insert(id, name);
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, id: I, name: impl Into<String>) -> Self {
        self.register(id, name);
        self
    }

    /// Id of a registered name.
    ///
    /// # Panics
    ///
    /// If `name` is unknown. Names come from the program, so an unknown
    /// name is a schema bug.
    pub fn name_to_id(&self, name: &str) -> I {
        match self.by_name.get(name) {
            Some(&id) => id,
            None => panic!("node name '{}' is not registered", name),
        }
    }

    pub fn try_name_to_id(&self, name: &str) -> Option<I> {
        self.by_name.get(name).copied()
    }

    /// Name of an id read from the wire.
    pub fn id_to_name(&self, id: I) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &str)> + '_ {
        self.by_id.iter().map(|(&id, name)| (id, name.as_str()))
    }
}

impl<'a, I: WireInt> FromIterator<(I, &'a str)> for BinIndex<I> {
    fn from_iter<T: IntoIterator<Item = (I, &'a str)>>(iter: T) -> Self {
        let mut index = Self::new();
        for (id, name) in iter {
            index.register(id, name);
        }
        index
    }
}
