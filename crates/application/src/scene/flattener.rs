use domain::scene::AuxDefinition;
use domain::{Fixture, SceneDocument, SceneTag, TagAxis, TagSet};
use serde::Serialize;
use tracing::debug;

/// Fixtures reachable from one layer, group boundaries removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureLayer {
    pub layer: SceneTag,
    pub fixtures: Vec<Fixture>,
}

/// A scene document reduced to layers of fixtures plus the tags they carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlattenedScene {
    pub layers: Vec<FixtureLayer>,
    pub tags: TagSet,
}

impl FlattenedScene {
    pub fn fixture_count(&self) -> usize {
        self.layers.iter().map(|l| l.fixtures.len()).sum()
    }

    /// Every fixture with the layer it was found under, in traversal order.
    pub fn fixtures(&self) -> impl Iterator<Item = (&SceneTag, &Fixture)> {
        self.layers
            .iter()
            .flat_map(|l| l.fixtures.iter().map(move |f| (&l.layer, f)))
    }

    /// Local tag of `fixture` on `axis`, if that axis produced one.
    pub fn tag_for(&self, axis: TagAxis, layer: &SceneTag, fixture: &Fixture) -> Option<&SceneTag> {
        let uuid = match axis {
            TagAxis::Layer => Some(layer.uuid.as_str()),
            TagAxis::Class => fixture.class_ref.as_deref(),
            TagAxis::Position => fixture.position_ref.as_deref(),
        }?;
        self.tags.find(axis, uuid)
    }
}

/// Reduces nested scene documents to [`FlattenedScene`]s.
pub struct SceneFlattener;

impl SceneFlattener {
    pub fn flatten(document: &SceneDocument) -> FlattenedScene {
        let mut tags = TagSet::default();
        let mut layers = Vec::new();

        for entry in document.layer_fixture_indices() {
            let Some(layer) = document.layers.get(entry.layer) else {
                continue;
            };
            let layer_tag = SceneTag::new(&layer.uuid, &layer.name);
            if !layer_tag.name.is_empty() {
                tags.insert(TagAxis::Layer, layer_tag.clone());
            }

            let mut fixtures = Vec::with_capacity(entry.fixtures.len());
            for idx in entry.fixtures {
                let Some(fixture) = document.fixture(idx) else {
                    continue;
                };

                if let Some(class) = fixture
                    .class_ref
                    .as_deref()
                    .and_then(|uuid| document.aux.class(uuid))
                {
                    add_named(&mut tags, TagAxis::Class, class);
                }
                if let Some(position) = fixture
                    .position_ref
                    .as_deref()
                    .and_then(|uuid| document.aux.position(uuid))
                {
                    add_named(&mut tags, TagAxis::Position, position);
                }

                fixtures.push(fixture.clone());
            }

            debug!(layer = %layer.name, fixtures = fixtures.len(), "Layer flattened");
            layers.push(FixtureLayer {
                layer: layer_tag,
                fixtures,
            });
        }

        FlattenedScene { layers, tags }
    }
}

fn add_named(tags: &mut TagSet, axis: TagAxis, definition: &AuxDefinition) {
    if definition.name.is_empty() {
        return;
    }
    tags.insert(axis, SceneTag::new(&definition.uuid, &definition.name));
}
