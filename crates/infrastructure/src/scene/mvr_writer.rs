use domain::Fixture;
use domain::scene::{ChildList, GroupIdx, SceneDocument};
use std::fmt::Write;

use super::mvr_reader::ROOT_ELEMENT;

enum Step<'a> {
    List(&'a ChildList, usize),
    Group(GroupIdx, usize),
    Close(&'static str, usize),
}

/// Serialize a scene document to `GeneralSceneDescription.xml` text.
pub fn write_scene_xml(scene: &SceneDocument) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\" ?>\n");
    let _ = writeln!(
        out,
        "<{ROOT_ELEMENT} verMajor=\"1\" verMinor=\"6\" provider=\"fixture-sync\" providerVersion=\"{}\">",
        env!("CARGO_PKG_VERSION")
    );
    out.push_str("  <UserData/>\n");
    out.push_str("  <Scene>\n");

    out.push_str("    <AUXData>\n");
    for class in &scene.aux.classes {
        let _ = writeln!(
            out,
            "      <Class uuid=\"{}\" name=\"{}\"/>",
            escape(&class.uuid),
            escape(&class.name)
        );
    }
    for position in &scene.aux.positions {
        let _ = writeln!(
            out,
            "      <Position uuid=\"{}\" name=\"{}\"/>",
            escape(&position.uuid),
            escape(&position.name)
        );
    }
    out.push_str("    </AUXData>\n");

    out.push_str("    <Layers>\n");
    for layer in &scene.layers {
        let open = format!(
            "uuid=\"{}\" name=\"{}\"",
            escape(&layer.uuid),
            escape(&layer.name)
        );
        match &layer.child_list {
            Some(list) => {
                let _ = writeln!(out, "      <Layer {open}>");
                write_child_list(&mut out, scene, list, 4);
                out.push_str("      </Layer>\n");
            }
            None => {
                let _ = writeln!(out, "      <Layer {open}/>");
            }
        }
    }
    out.push_str("    </Layers>\n");

    out.push_str("  </Scene>\n");
    let _ = writeln!(out, "</{ROOT_ELEMENT}>");
    out
}

fn write_child_list(out: &mut String, scene: &SceneDocument, root: &ChildList, depth: usize) {
    let mut steps = vec![Step::List(root, depth)];

    while let Some(step) = steps.pop() {
        match step {
            Step::List(list, depth) => {
                let _ = writeln!(out, "{}<ChildList>", indent(depth));
                steps.push(Step::Close("ChildList", depth));
                for group in list.groups.iter().rev() {
                    steps.push(Step::Group(*group, depth + 1));
                }
                for idx in &list.fixtures {
                    if let Some(fixture) = scene.fixture(*idx) {
                        write_fixture(out, fixture, depth + 1);
                    }
                }
            }
            Step::Group(idx, depth) => {
                let Some(group) = scene.group(idx) else {
                    continue;
                };
                let _ = write!(
                    out,
                    "{}<GroupObject uuid=\"{}\" name=\"{}\"",
                    indent(depth),
                    escape(&group.uuid),
                    escape(&group.name)
                );
                match &group.child_list {
                    Some(list) => {
                        out.push_str(">\n");
                        steps.push(Step::Close("GroupObject", depth));
                        steps.push(Step::List(list, depth + 1));
                    }
                    None => out.push_str("/>\n"),
                }
            }
            Step::Close(tag, depth) => {
                let _ = writeln!(out, "{}</{tag}>", indent(depth));
            }
        }
    }
}

fn write_fixture(out: &mut String, fixture: &Fixture, depth: usize) {
    let pad = indent(depth);
    let inner = indent(depth + 1);
    let _ = writeln!(
        out,
        "{pad}<Fixture uuid=\"{}\" name=\"{}\">",
        escape(&fixture.uuid),
        escape(&fixture.name)
    );
    let _ = writeln!(
        out,
        "{inner}<GDTFSpec>{}</GDTFSpec>",
        escape(fixture.gdtf_spec.as_deref().unwrap_or_default())
    );
    let _ = writeln!(
        out,
        "{inner}<GDTFMode>{}</GDTFMode>",
        escape(fixture.gdtf_mode.as_deref().unwrap_or_default())
    );
    if let Some(class) = &fixture.class_ref {
        let _ = writeln!(out, "{inner}<Classing>{}</Classing>", escape(class));
    }
    if let Some(position) = &fixture.position_ref {
        let _ = writeln!(out, "{inner}<Position>{}</Position>", escape(position));
    }
    if let Some(id) = &fixture.fixture_id {
        let _ = writeln!(out, "{inner}<FixtureID>{}</FixtureID>", escape(id));
    }

    if !fixture.dmx.is_empty() || !fixture.network.is_empty() {
        let _ = writeln!(out, "{inner}<Addresses>");
        let entry = indent(depth + 2);
        for dmx in &fixture.dmx {
            let text = match dmx.absolute() {
                Some(absolute) => absolute.to_string(),
                None => dmx.to_string(),
            };
            let _ = writeln!(
                out,
                "{entry}<Address break=\"{}\">{text}</Address>",
                dmx.dmx_break
            );
        }
        for net in &fixture.network {
            let mut attrs = String::new();
            if let Some(geometry) = &net.geometry {
                let _ = write!(attrs, " geometry=\"{}\"", escape(geometry));
            }
            if let Some(ip) = net.ipv4 {
                let _ = write!(attrs, " ipv4=\"{ip}\"");
            }
            if let Some(mask) = net.subnet_mask {
                let _ = write!(attrs, " subnetmask=\"{mask}\"");
            }
            if let Some(hostname) = &net.hostname {
                let _ = write!(attrs, " hostname=\"{}\"", escape(hostname));
            }
            let _ = writeln!(out, "{entry}<Network{attrs}/>");
        }
        let _ = writeln!(out, "{inner}</Addresses>");
    }

    let _ = writeln!(out, "{pad}</Fixture>");
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
