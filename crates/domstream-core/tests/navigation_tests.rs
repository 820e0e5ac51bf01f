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
//! End-to-end tests for writing a tree and navigating it back.

use domstream_core::{
    Command, Cursor, DomRead, DomReader, DomResult, DomWrite, DomWriter, Navigation, Tree,
    WriterOptions,
};
use proptest::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing for tests.
fn init_tracing() {
    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Server {
    name: String,
    port: u16,
    tags: Vec<String>,
    timeout: Option<u32>,
    limits: Limits,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Limits {
    connections: u32,
    ratio: f64,
}

impl DomWrite for Limits {
    fn write_dom(&self, w: &mut DomWriter) {
        w.attribute("connections").put(&self.connections);
        w.open("ratio").put(&self.ratio).close();
    }
}

impl DomRead for Limits {
    fn read_dom(&mut self, r: &mut DomReader) -> DomResult<()> {
        r.attribute("connections");
        self.connections.read_dom(r)?;
        r.open("ratio");
        self.ratio.read_dom(r)?;
        r.close();
        Ok(())
    }
}

impl DomWrite for Server {
    fn write_dom(&self, w: &mut DomWriter) {
        w.attribute("name").put(&self.name);
        w.open("port").put(&self.port).close();
        w.open("tag").put(&self.tags).close();
        w.open("timeout").put(&self.timeout).close();
        w.open("limits").put(&self.limits).close();
    }
}

impl DomRead for Server {
    fn read_dom(&mut self, r: &mut DomReader) -> DomResult<()> {
        r.attribute("name");
        self.name.read_dom(r)?;
        r.open("port");
        self.port.read_dom(r)?;
        r.close();
        r.open("tag");
        self.tags.read_dom(r)?;
        r.close();
        r.open("timeout");
        self.timeout.read_dom(r)?;
        r.close();
        r.open("limits");
        self.limits.read_dom(r)?;
        r.close();
        Ok(())
    }
}

fn sample_server() -> Server {
    Server {
        name: "primary".to_string(),
        port: 443,
        tags: vec!["edge".to_string(), "tls".to_string(), "eu".to_string()],
        timeout: Some(30),
        limits: Limits {
            connections: 512,
            ratio: 0.75,
        },
    }
}

fn write_server(server: &Server) -> Tree {
    let mut w = DomWriter::new();
    w.open("server").put(server).close();
    w.into_tree()
}

fn read_server(tree: Tree) -> Server {
    let mut r = DomReader::new(tree);
    r.open("server");
    let server = r.load().unwrap();
    r.close();
    assert!(!r.missing());
    assert_eq!(r.current(), r.tree().root());
    server
}

// ==================== Structured round trip tests ====================

#[test]
fn test_struct_round_trip() {
    init_tracing();
    let server = sample_server();
    assert_eq!(read_server(write_server(&server)), server);
}

#[test]
fn test_struct_with_absent_fields_reads_defaults() {
    init_tracing();
    let server = Server {
        tags: Vec::new(),
        timeout: None,
        ..sample_server()
    };
    let tree = write_server(&server);
    let root = tree.children(tree.root())[0];
    assert!(!tree.exists(root, "tag"));
    assert!(!tree.exists(root, "timeout"));
    assert_eq!(read_server(tree), server);
}

#[test]
fn test_reading_an_older_layout() {
    // A tree written before "limits" and "tag" existed.
    let mut w = DomWriter::new();
    w.open("server");
    w.attribute("name").write_str("legacy");
    w.open("port").write(80u16).close();
    w.close();

    let server = read_server(w.into_tree());
    assert_eq!(server.name, "legacy");
    assert_eq!(server.port, 80);
    assert!(server.tags.is_empty());
    assert_eq!(server.limits, Limits::default());
}

// ==================== Missing node tests ====================

#[test]
fn test_two_nested_absent_opens() {
    init_tracing();
    let mut w = DomWriter::new();
    w.open("a").open("present").write(1i32).close().close();
    let mut r = DomReader::new(w.into_tree());

    r.open("a");
    let a = r.current();
    assert_eq!(r.open("x"), Navigation::Missing);
    assert_eq!(r.open("present"), Navigation::Missing);
    assert_eq!(r.read::<i32>(), Ok(0));
    r.close();
    r.close();
    assert_eq!(r.current(), a);
    assert!(r.open("present").is_found());
    assert_eq!(r.read::<i32>(), Ok(1));
}

#[test]
fn test_missing_attribute_inside_missing_element() {
    let mut r = DomReader::new(Tree::new());
    r.open("absent");
    r.attribute("id");
    assert_eq!(r.missing_depth(), 2);
    r.attribute("other");
    assert_eq!(r.missing_depth(), 2);
    r.close();
    assert!(!r.missing());
}

// ==================== Cancel tests ====================

#[test]
fn test_cancel_modes() {
    init_tracing();
    let build = |show_missing: bool| {
        let mut w = DomWriter::with_options(WriterOptions {
            show_missing,
            ..WriterOptions::default()
        });
        w.open("doc");
        w.open("optional").write(5i32).cancel().close();
        w.open("kept").write(6i32).close();
        w.close();
        w.into_tree()
    };

    let dropped = build(false);
    assert_eq!(dropped.to_string(), "doc\n  kept = 6\n");

    let shown = build(true);
    assert_eq!(shown.to_string(), "doc\n  optional =  (missing)\n  kept = 6\n");

    let mut r = DomReader::new(shown);
    r.open("doc");
    r.open("optional");
    assert_eq!(r.read::<i32>(), Ok(0));
}

// ==================== Cursor scan tests ====================

#[test]
fn test_cursor_scan_over_interleaved_siblings() {
    let mut w = DomWriter::new();
    w.open("list");
    for (i, name) in ["item", "note", "item", "item", "note"].iter().enumerate() {
        w.open(name).write(i as u32).close();
    }
    w.close();

    let mut r = DomReader::new(w.into_tree());
    r.open("list");
    let mut cursor = Cursor::START;
    let mut items = Vec::new();
    while let Some((node, next)) = r.next_named("item", cursor) {
        r.open_at(node);
        items.push(r.read::<u32>().unwrap());
        r.close();
        cursor = next;
    }
    assert_eq!(items, vec![0, 2, 3]);
    assert_eq!(cursor.position(), 4);
}

#[test]
fn test_reopen_extends_closed_node() {
    let mut w = DomWriter::new();
    w.open("a").open("x").write(1u8).close().close();
    w.reopen();
    w.open("y").write(2u8).close();
    w.close();
    assert_eq!(w.tree().to_string(), "a\n  x = 1\n  y = 2\n");
}

#[test]
fn test_user_data_survives_in_tree() {
    let mut w = DomWriter::new();
    w.emit(Command::open("a").hidden());
    w.emit(Command::user_data(std::sync::Arc::new(String::from("meta"))));
    w.close();

    let mut r = DomReader::new(w.into_tree());
    r.open("a");
    let data = r.user_data().unwrap();
    assert_eq!(data.downcast_ref::<String>().unwrap(), "meta");
}

// ==================== Property tests ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_optional_fields_round_trip(fields in prop::collection::vec(prop::option::of(any::<i32>()), 0..12)) {
        let mut w = DomWriter::new();
        w.open("record");
        for (i, field) in fields.iter().enumerate() {
            w.open(&format!("f{}", i)).put(field).close();
        }
        w.close();

        let mut r = DomReader::new(w.into_tree());
        r.open("record");
        for (i, field) in fields.iter().enumerate() {
            r.open(&format!("f{}", i));
            let read: Option<i32> = r.load().unwrap();
            prop_assert_eq!(&read, field);
            r.close();
        }
        r.close();
        prop_assert!(!r.missing());
    }

    #[test]
    fn prop_sequences_round_trip(items in prop::collection::vec("[a-z]{0,8}", 0..10)) {
        let mut w = DomWriter::new();
        w.open("seq");
        w.open("s").put(&items).close();
        w.close();

        let mut r = DomReader::new(w.into_tree());
        r.open("seq");
        r.open("s");
        let read: Vec<String> = r.load().unwrap();
        prop_assert_eq!(read, items);
    }
}
