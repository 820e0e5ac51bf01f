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

//! End-to-end tests for the domstream facade crate.
//!
//! Covers the re-exported stream and codec types together:
//! - Writing typed structures and decoding them back
//! - Missing-node tolerance on decoded input
//! - Error conversion and context
//! - Tree walking through the `traverse` module

use domstream::traverse::{traverse, StatsCollector, TraverseConfig};
use domstream::{
    from_bytes, from_bytes_strict, to_bytes, Bin32Reader, Bin32Writer, BinIndex, DomRead,
    DomReader, DomResult, DomWrite, DomWriter, Error, NodeFlags, ResultExt,
};
use domstream_test::fixtures;
use proptest::prelude::*;

#[derive(Debug, Clone, Default, PartialEq)]
struct Service {
    name: String,
    port: u16,
    hosts: Vec<String>,
    weight: Option<f64>,
}

impl DomWrite for Service {
    fn write_dom(&self, w: &mut DomWriter) {
        w.attribute("name").put(&self.name);
        w.attribute("port").put(&self.port);
        w.open("host").put(&self.hosts).close();
        w.open("weight").put(&self.weight).close();
    }
}

impl DomRead for Service {
    fn read_dom(&mut self, r: &mut DomReader) -> DomResult<()> {
        r.attribute("name");
        self.name.read_dom(r)?;
        r.attribute("port");
        self.port.read_dom(r)?;
        r.open("host");
        self.hosts.read_dom(r)?;
        r.close();
        r.open("weight");
        self.weight.read_dom(r)?;
        r.close();
        Ok(())
    }
}

fn service_index() -> BinIndex<u16> {
    BinIndex::new()
        .with(1, "service")
        .with(2, "name")
        .with(3, "port")
        .with(4, "host")
        .with(5, "weight")
}

fn sample() -> Service {
    Service {
        name: "gateway".into(),
        port: 443,
        hosts: vec!["a.example".into(), "b.example".into()],
        weight: Some(0.5),
    }
}

// ==================== Quick start tests ====================

#[test]
fn test_concrete_frame() {
    let index: BinIndex<u32> = BinIndex::new().with(0, "myroot").with(1, "myitem");
    let mut writer = Bin32Writer::new(&index);
    writer.open("myroot").attribute("myitem").write(1i32).close();
    let bytes = writer.encode().unwrap();
    assert_eq!(
        bytes,
        [
            0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0c, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00,
            0x00, 0x04, 0x00, 0x00, 0x00, 0x01
        ]
    );

    let mut reader = Bin32Reader::new(&index);
    reader.decode(&bytes).unwrap();
    reader.open("myroot");
    reader.attribute("myitem");
    assert_eq!(reader.read::<i32>().unwrap(), 1);
    reader.close();
    assert!(!reader.missing());
}

// ==================== Typed round trip tests ====================

#[test]
fn test_service_round_trip() {
    let index = service_index();
    let bytes = to_bytes::<u16, u16, _>("service", &sample(), &index).unwrap();
    let back: Service = from_bytes::<u16, u16, _>(&bytes, "service", &index).unwrap();
    assert_eq!(back, sample());
}

#[test]
fn test_empty_fields_read_as_defaults() {
    let index = service_index();
    let empty = Service {
        name: "solo".into(),
        ..Service::default()
    };
    let bytes = to_bytes::<u16, u16, _>("service", &empty, &index).unwrap();
    let back: Service = from_bytes::<u16, u16, _>(&bytes, "service", &index).unwrap();
    assert_eq!(back, empty);
}

#[test]
fn test_older_writer_without_weight() {
    let index = service_index();
    let mut writer = domstream::Bin16Writer::new(&index);
    writer.open("service");
    writer.attribute("name").write_str("legacy");
    writer.attribute("port").write(80u16);
    writer.close();
    let bytes = writer.encode().unwrap();

    let back: Service = from_bytes::<u16, u16, _>(&bytes, "service", &index).unwrap();
    assert_eq!(back.name, "legacy");
    assert_eq!(back.port, 80);
    assert!(back.hosts.is_empty());
    assert_eq!(back.weight, None);
}

// ==================== Error tests ====================

#[test]
fn test_truncated_input_with_context() {
    let index = service_index();
    let bytes = to_bytes::<u16, u16, _>("service", &sample(), &index).unwrap();
    let err = from_bytes::<u16, u16, Service>(&bytes[..bytes.len() - 1], "service", &index)
        .context("loading service.bin")
        .unwrap_err();
    assert!(err.is_malformed_input());
    assert!(matches!(err.root_cause(), Error::Bin(_)));
    assert!(err.to_string().starts_with("loading service.bin: "));
}

#[test]
fn test_wrong_top_level_name() {
    let index = service_index();
    let bytes = to_bytes::<u16, u16, _>("service", &sample(), &index).unwrap();
    let err = from_bytes_strict::<u16, u16, Service>(&bytes, "host", &index).unwrap_err();
    assert_eq!(err.path(), Some("/host"));
    assert!(!err.is_malformed_input());

    let lenient: Service = from_bytes::<u16, u16, _>(&bytes, "host", &index).unwrap();
    assert_eq!(lenient, Service::default());
}

#[test]
fn test_empty_service_list_round_trip() {
    let index = service_index();
    let bytes = to_bytes::<u16, u16, _>("service", &Vec::<Service>::new(), &index).unwrap();
    assert!(bytes.is_empty());
    let back: Vec<Service> = from_bytes::<u16, u16, _>(&bytes, "service", &index).unwrap();
    assert!(back.is_empty());

    let two = vec![sample(), Service::default()];
    let bytes = to_bytes::<u16, u16, _>("service", &two, &index).unwrap();
    let back: Vec<Service> = from_bytes::<u16, u16, _>(&bytes, "service", &index).unwrap();
    assert_eq!(back, two);
}

// ==================== Traversal tests ====================

#[test]
fn test_stats_over_decoded_fixtures() {
    let index = fixtures::schema::<u32>();
    for (name, fixture) in fixtures::all() {
        let tree = fixture();
        let bytes = domstream::bin::encode_tree::<u32, u32>(&tree, &index).unwrap();
        let decoded =
            domstream::bin::decode_tree::<u32, u32>(&bytes, &index, &Default::default()).unwrap();

        let mut before = StatsCollector::default();
        traverse(&tree, &TraverseConfig::default(), &mut before).unwrap();
        let mut after = StatsCollector::default();
        traverse(&decoded, &TraverseConfig::default(), &mut after).unwrap();
        assert_eq!(before.node_count, after.node_count, "{}", name);
        assert_eq!(before.value_count, after.value_count, "{}", name);
        assert_eq!(before.max_depth, after.max_depth, "{}", name);
    }
}

#[test]
fn test_missing_nodes_are_skipped_by_default() {
    let mut w = DomWriter::new();
    w.set_show_missing(true);
    w.open("doc");
    w.open("gone").cancel().close();
    w.open("kept").write(1u8).close();
    w.close();
    let tree = w.into_tree();

    let gone = tree
        .descendants(tree.root())
        .find(|&id| tree.node(id).name() == "gone")
        .unwrap();
    assert!(tree.node(gone).flags().contains(NodeFlags::MISSING));

    let mut stats = StatsCollector::default();
    traverse(&tree, &TraverseConfig::default(), &mut stats).unwrap();
    assert_eq!(stats.node_count, 2);

    let mut all = StatsCollector::default();
    let config = TraverseConfig {
        include_hidden: true,
        ..TraverseConfig::default()
    };
    traverse(&tree, &config, &mut all).unwrap();
    assert_eq!(all.node_count, 3);
    assert_eq!(all.missing_count, 1);
}

// ==================== Serde tests ====================

#[cfg(feature = "serde")]
#[test]
fn test_limits_serde() {
    let limits = domstream::DecodeLimits::default().with_max_depth(8);
    let json = serde_json::to_string(&limits).unwrap();
    let back: domstream::DecodeLimits = serde_json::from_str(&json).unwrap();
    assert_eq!(back, limits);
}

// ==================== Property tests ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_service_round_trip(
        name in "[a-z]{0,12}",
        port in any::<u16>(),
        hosts in prop::collection::vec("[a-z.]{1,16}", 0..6),
        weight in prop::option::of(-1.0e6f64..1.0e6),
    ) {
        let index = service_index();
        let service = Service { name, port, hosts, weight };
        let bytes = to_bytes::<u16, u16, _>("service", &service, &index).unwrap();
        let back: Service = from_bytes::<u16, u16, _>(&bytes, "service", &index).unwrap();
        prop_assert_eq!(back, service);
    }
}
