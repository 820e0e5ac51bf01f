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
use domstream_core::{DomWriter, Tree};

/// `myroot` holding the attribute `myitem = 1i32`.
pub fn single_item() -> Tree {
    let mut w = DomWriter::new();
    w.open("myroot");
    w.attribute("myitem").write(1i32);
    w.close();
    w.into_tree()
}

/// One leaf per scalar type.
pub fn scalars() -> Tree {
    let mut w = DomWriter::new();
    w.open("scalars");
    w.open("flag").write(true).close();
    w.open("i8").write(-8i8).close();
    w.open("i16").write(-1600i16).close();
    w.open("i32").write(-320_000i32).close();
    w.open("i64").write(-6_400_000_000i64).close();
    w.open("u8").write(200u8).close();
    w.open("u16").write(60_000u16).close();
    w.open("u32").write(4_000_000_000u32).close();
    w.open("u64").write(u64::MAX).close();
    w.open("f32").write(1.5f32).close();
    w.open("f64").write(-2.25f64).close();
    w.open("text").write_str("héllo").close();
    w.close();
    w.into_tree()
}

/// Three levels of containers.
pub fn nested() -> Tree {
    let mut w = DomWriter::new();
    w.open("outer");
    w.open("inner");
    w.open("leaf").write(1u16).close();
    w.open("leaf").write(2u16).close();
    w.close();
    w.open("inner");
    w.open("leaf").write(3u16).close();
    w.close();
    w.close();
    w.into_tree()
}

/// Element with attributes followed by a child element.
pub fn attributes() -> Tree {
    let mut w = DomWriter::new();
    w.open("config");
    w.attribute("id").write(7u32);
    w.attribute("version").write_str("1.2");
    w.open("port").write(8080u16).close();
    w.close();
    w.into_tree()
}

/// `list` holding three `item` siblings.
pub fn sequence_of_three() -> Tree {
    let mut w = DomWriter::new();
    w.open("list");
    w.open("item").write_seq(&[10i32, 20, 30]).close();
    w.close();
    w.into_tree()
}

/// A childless node without value.
pub fn empty_container() -> Tree {
    let mut w = DomWriter::new();
    w.open("outer");
    w.open("empty").close();
    w.close();
    w.into_tree()
}

/// Raw binary payload.
pub fn binary_blob() -> Tree {
    let bytes: Vec<u8> = (0..=255).collect();
    let mut w = DomWriter::new();
    w.open("blob").write_bytes(&bytes).close();
    w.into_tree()
}

/// Twenty nested `inner` containers around one leaf.
pub fn deep_nest() -> Tree {
    let mut w = DomWriter::new();
    for _ in 0..20 {
        w.open("inner");
    }
    w.open("leaf").write(0xabu8).close();
    for _ in 0..20 {
        w.close();
    }
    w.into_tree()
}

/// A flat list of `n` items, for benchmarks.
pub fn wide_list(n: usize) -> Tree {
    let items: Vec<u32> = (0..n as u32).collect();
    let mut w = DomWriter::new();
    w.open("list");
    w.open("item").write_seq(&items).close();
    w.close();
    w.into_tree()
}
