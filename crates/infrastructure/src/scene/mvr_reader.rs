use domain::scene::{AuxDefinition, Parent, SceneDocument};
use domain::{DmxAddress, DomainError, Fixture, NetworkAddress};
use roxmltree::{Document, Node};
use std::net::Ipv4Addr;
use tracing::warn;

pub const ROOT_ELEMENT: &str = "GeneralSceneDescription";

/// Parse the `GeneralSceneDescription.xml` payload of a scene file.
///
/// Only layers, child lists (fixtures and group objects) and the class and
/// position tables are read; other elements are ignored.
pub fn parse_scene_xml(xml: &str) -> Result<SceneDocument, DomainError> {
    let xml_doc = Document::parse(xml).map_err(|e| DomainError::DocumentParse(e.to_string()))?;

    let root = xml_doc.root_element();
    if root.tag_name().name() != ROOT_ELEMENT {
        return Err(DomainError::DocumentParse(format!(
            "Unexpected root element <{}>",
            root.tag_name().name()
        )));
    }

    let mut scene = SceneDocument::new();
    let Some(scene_node) = child(root, "Scene") else {
        return Ok(scene);
    };

    if let Some(aux) = child(scene_node, "AUXData") {
        for entry in elements(aux) {
            let definition = || {
                AuxDefinition::new(
                    entry.attribute("uuid").unwrap_or_default(),
                    entry.attribute("name").unwrap_or_default(),
                )
            };
            match entry.tag_name().name() {
                "Class" => scene.aux.classes.push(definition()),
                "Position" => scene.aux.positions.push(definition()),
                _ => {}
            }
        }
    }

    let Some(layers) = child(scene_node, "Layers") else {
        return Ok(scene);
    };

    // (ChildList node, owner) pairs still to be read
    let mut pending: Vec<(Node, Parent)> = Vec::new();

    for layer in elements(layers).filter(|n| n.has_tag_name("Layer")) {
        let uuid = layer.attribute("uuid").unwrap_or_default();
        let name = layer.attribute("name").unwrap_or_default();
        match child(layer, "ChildList") {
            Some(list) => {
                let idx = scene.add_layer(uuid, name);
                pending.push((list, Parent::Layer(idx)));
            }
            None => {
                scene.add_empty_layer(uuid, name);
            }
        }
    }

    while let Some((list, parent)) = pending.pop() {
        for node in elements(list) {
            match node.tag_name().name() {
                "Fixture" => {
                    scene.add_fixture(parent, parse_fixture(node)?)?;
                }
                "GroupObject" => {
                    let group = scene.add_group(
                        parent,
                        node.attribute("uuid").unwrap_or_default(),
                        node.attribute("name").unwrap_or_default(),
                    )?;
                    if let Some(inner) = child(node, "ChildList") {
                        pending.push((inner, Parent::Group(group)));
                    }
                }
                _ => {}
            }
        }
    }

    Ok(scene)
}

fn parse_fixture(node: Node) -> Result<Fixture, DomainError> {
    let uuid = node
        .attribute("uuid")
        .filter(|u| !u.is_empty())
        .ok_or_else(|| DomainError::DocumentParse("Fixture without uuid".to_string()))?;
    let mut fixture = Fixture::new(uuid, node.attribute("name").unwrap_or_default());

    for element in elements(node) {
        match element.tag_name().name() {
            "Classing" => fixture.class_ref = text(element),
            "Position" => fixture.position_ref = text(element),
            "GDTFSpec" => fixture.gdtf_spec = text(element),
            "GDTFMode" => fixture.gdtf_mode = text(element),
            "FixtureID" => fixture.fixture_id = text(element),
            "Addresses" => parse_addresses(element, &mut fixture)?,
            _ => {}
        }
    }

    Ok(fixture)
}

fn parse_addresses(node: Node, fixture: &mut Fixture) -> Result<(), DomainError> {
    for entry in elements(node) {
        match entry.tag_name().name() {
            "Address" => {
                let dmx_break = entry
                    .attribute("break")
                    .and_then(|b| b.trim().parse().ok())
                    .unwrap_or(0);
                if let Some(value) = text(entry) {
                    fixture.dmx.push(DmxAddress::parse(&value, dmx_break)?);
                }
            }
            "Network" => fixture.network.push(NetworkAddress {
                geometry: attr(entry, "geometry"),
                ipv4: ipv4_attr(entry, "ipv4", &fixture.uuid),
                subnet_mask: ipv4_attr(entry, "subnetmask", &fixture.uuid),
                hostname: attr(entry, "hostname"),
            }),
            _ => {}
        }
    }
    Ok(())
}

fn ipv4_attr(node: Node, name: &str, fixture_uuid: &str) -> Option<Ipv4Addr> {
    let raw = attr(node, name)?;
    match raw.parse() {
        Ok(ip) => Some(ip),
        Err(_) => {
            warn!(fixture_uuid = %fixture_uuid, value = %raw, "Ignoring invalid {} attribute", name);
            None
        }
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

fn text(node: Node) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn attr(node: Node, name: &str) -> Option<String> {
    node.attribute(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
