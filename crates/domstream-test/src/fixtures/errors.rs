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
//! Malformed inputs for the `u32`/`u32` codec with [`schema`](super::schema).

/// Expected failure of a malformed sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    UnknownNodeId,
    SizeMismatch,
    Truncated,
}

/// `(name, bytes, expected error)` triples.
pub fn malformed_u32_samples() -> Vec<(&'static str, Vec<u8>, Expected)> {
    vec![
        (
            "unknown_leaf_id",
            vec![0, 0, 0, 99, 0, 0, 0, 0],
            Expected::UnknownNodeId,
        ),
        (
            "unknown_container_id",
            vec![0x80, 0, 0, 99, 0, 0, 0, 0],
            Expected::UnknownNodeId,
        ),
        (
            "container_cut_short",
            vec![0x80, 0, 0, 0, 0, 0, 0, 12, 0, 0, 0, 1, 0, 0, 0, 4, 0, 0],
            Expected::SizeMismatch,
        ),
        (
            "children_overrun_container",
            vec![0x80, 0, 0, 0, 0, 0, 0, 10, 0, 0, 0, 1, 0, 0, 0, 4, 0, 0, 0, 1],
            Expected::SizeMismatch,
        ),
        (
            "dangling_bytes_in_container",
            vec![0x80, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0],
            Expected::SizeMismatch,
        ),
        ("header_cut_short", vec![0, 0, 0, 1, 0], Expected::Truncated),
        (
            "leaf_cut_short",
            vec![0, 0, 0, 1, 0, 0, 0, 4, 0, 0],
            Expected::Truncated,
        ),
    ]
}
