use application::scene::{DiscoveryScene, SceneFlattener, SceneMerger};
use domain::scene::{AuxDefinition, Parent};
use domain::{DomainError, Fixture, NetworkDevice, SceneDocument, SceneStore, SceneTag};
use infrastructure::MvrSceneStore;
use std::net::{IpAddr, Ipv4Addr};

fn device(last: u8, name: &str) -> NetworkDevice {
    NetworkDevice::new(
        Ipv4Addr::new(10, 0, 0, last),
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last)),
        name.to_string(),
        String::new(),
    )
}

/// Venue with one layer holding a group of two fixtures.
fn venue() -> SceneDocument {
    let mut doc = SceneDocument::new();
    doc.aux.classes.push(AuxDefinition::new("C-SPOT", "Spot"));
    let layer = doc.add_layer("L1", "Truss");
    let group = doc.add_group(Parent::Layer(layer), "G1", "Front").unwrap();
    doc.add_fixture(Parent::Group(group), Fixture::new("U1", "Spot 1").with_class("C-SPOT"))
        .unwrap();
    doc.add_fixture(Parent::Group(group), Fixture::new("U2", "Spot 2").with_class("C-MISSING"))
        .unwrap();
    doc
}

#[test]
fn test_group_fixtures_flatten_into_layer() {
    let flat = SceneFlattener::flatten(&venue());

    assert_eq!(flat.layers.len(), 1);
    assert_eq!(flat.layers[0].layer, SceneTag::new("L1", "Truss"));
    assert_eq!(flat.layers[0].fixtures.len(), 2);
    assert_eq!(flat.tags.classes, vec![SceneTag::new("C-SPOT", "Spot")]);
    assert_eq!(flat.tags.layers, vec![SceneTag::new("L1", "Truss")]);
}

#[test]
fn test_class_tags_dedupe_by_uuid() {
    let mut doc = SceneDocument::new();
    doc.aux.classes.push(AuxDefinition::new("C1", "Spot"));
    doc.aux.classes.push(AuxDefinition::new("C2", "Spot"));
    let a = doc.add_layer("L1", "Truss");
    let b = doc.add_layer("L2", "Floor");
    doc.add_fixture(Parent::Layer(a), Fixture::new("U1", "A").with_class("C1"))
        .unwrap();
    doc.add_fixture(Parent::Layer(b), Fixture::new("U2", "B").with_class("C1"))
        .unwrap();
    doc.add_fixture(Parent::Layer(b), Fixture::new("U3", "C").with_class("C2"))
        .unwrap();

    let flat = SceneFlattener::flatten(&doc);

    // Same name under two uuids stays two tags
    let uuids: Vec<&str> = flat.tags.classes.iter().map(|t| t.uuid.as_str()).collect();
    assert_eq!(uuids, vec!["C1", "C2"]);
    assert_eq!(flat.fixture_count(), 3);
}

#[test]
fn test_deep_nesting_flattens() {
    let mut doc = SceneDocument::new();
    let layer = doc.add_layer("L1", "Deep");
    let mut parent = Parent::Layer(layer);
    for depth in 0..20_000 {
        let group = doc
            .add_group(parent, format!("G{depth}"), format!("Group {depth}"))
            .unwrap();
        parent = Parent::Group(group);
    }
    doc.add_fixture(parent, Fixture::new("U-DEEP", "Bottom")).unwrap();

    let flat = SceneFlattener::flatten(&doc);

    assert_eq!(flat.layers[0].fixtures.len(), 1);
    assert_eq!(flat.layers[0].fixtures[0].uuid, "U-DEEP");
}

#[test]
fn test_merge_copies_addresses_by_position() {
    let source = DiscoveryScene::build(&[device(6, "Node B"), device(5, "Node A")]).unwrap();
    let outcome = SceneMerger::merge(&source, &venue()).unwrap();
    let merged = &outcome.document;

    let by_uuid = |uuid: &str| {
        merged
            .fixtures()
            .iter()
            .find(|f| f.uuid == uuid)
            .and_then(|f| f.first_ipv4())
    };
    assert_eq!(by_uuid("U1"), Some(Ipv4Addr::new(10, 0, 0, 5)));
    assert_eq!(by_uuid("U2"), Some(Ipv4Addr::new(10, 0, 0, 6)));
    // Identity and metadata of the target survive
    assert_eq!(merged.fixtures()[0].class_ref.as_deref(), Some("C-SPOT"));
    assert_eq!(merged.layers[0].name, "Truss");

    let renamed: Vec<(&str, &str)> = outcome
        .name_mismatches
        .iter()
        .map(|m| (m.source.as_str(), m.target.as_str()))
        .collect();
    assert_eq!(renamed, vec![("Node A", "Spot 1"), ("Node B", "Spot 2")]);
}

#[test]
fn test_merge_rejects_length_mismatch() {
    let source = DiscoveryScene::build(&[device(5, "Node A")]).unwrap();
    let result = SceneMerger::merge(&source, &venue());
    assert!(matches!(result, Err(DomainError::Correspondence(_))));
}

#[test]
fn test_merge_rejects_source_without_address() {
    let mut source = SceneDocument::new();
    let layer = source.add_layer("D", "Network discovery");
    source
        .add_fixture(Parent::Layer(layer), Fixture::new("D1", "Node A").with_ipv4(Ipv4Addr::new(10, 0, 0, 5)))
        .unwrap();
    source
        .add_fixture(Parent::Layer(layer), Fixture::new("D2", "Node B"))
        .unwrap();

    let result = SceneMerger::merge(&source, &venue());
    assert!(matches!(result, Err(DomainError::Correspondence(msg)) if msg.contains("Node B")));
}

#[test]
fn test_merge_files_through_archives() {
    let dir = tempfile::tempdir().unwrap();
    let store = MvrSceneStore::new();
    let source_path = dir.path().join("discovered_devices.mvr");
    let target_path = dir.path().join("venue.mvr");
    let output_path = dir.path().join("merged_devices.mvr");

    store
        .save(
            &DiscoveryScene::build(&[device(5, "Node A"), device(6, "Node B")]).unwrap(),
            &source_path,
        )
        .unwrap();
    store.save(&venue(), &target_path).unwrap();

    let summary =
        SceneMerger::merge_files(&store, &source_path, &target_path, &output_path).unwrap();
    assert_eq!(summary.fixtures, 2);

    let merged = SceneFlattener::flatten(&store.load(&output_path).unwrap());
    let addresses: Vec<_> = merged.fixtures().map(|(_, f)| f.first_ipv4()).collect();
    assert_eq!(
        addresses,
        vec![Some(Ipv4Addr::new(10, 0, 0, 5)), Some(Ipv4Addr::new(10, 0, 0, 6))]
    );
    assert_eq!(merged.tags.classes.len(), 1);
}
