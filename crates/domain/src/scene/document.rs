use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::fixture::Fixture;

/// Index of a fixture in the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixtureIdx(pub usize);

/// Index of a group object in the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupIdx(pub usize);

/// Children of a layer or group. Fixtures are visited before nested groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildList {
    pub fixtures: Vec<FixtureIdx>,
    pub groups: Vec<GroupIdx>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupObject {
    pub uuid: String,
    pub name: String,
    pub child_list: Option<ChildList>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneLayer {
    pub uuid: String,
    pub name: String,
    pub child_list: Option<ChildList>,
}

/// Entry of the auxiliary class or position tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxDefinition {
    pub uuid: String,
    pub name: String,
}

impl AuxDefinition {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxData {
    pub classes: Vec<AuxDefinition>,
    pub positions: Vec<AuxDefinition>,
}

impl AuxData {
    pub fn class(&self, uuid: &str) -> Option<&AuxDefinition> {
        self.classes.iter().find(|c| c.uuid == uuid)
    }

    pub fn position(&self, uuid: &str) -> Option<&AuxDefinition> {
        self.positions.iter().find(|p| p.uuid == uuid)
    }
}

/// Where a new fixture or group is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    Layer(usize),
    Group(GroupIdx),
}

/// Fixture indices reachable from one layer, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerFixtures {
    pub layer: usize,
    pub fixtures: Vec<FixtureIdx>,
}

/// A venue description: layers of nested groups and fixtures plus the
/// auxiliary class/position tables they reference.
///
/// Fixtures and groups live in flat arenas and child lists refer to them
/// by index, so arbitrarily deep nesting never needs recursion to walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub layers: Vec<SceneLayer>,
    pub aux: AuxData,
    fixtures: Vec<Fixture>,
    groups: Vec<GroupObject>,
}

impl SceneDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer with an empty child list and return its index.
    pub fn add_layer(&mut self, uuid: impl Into<String>, name: impl Into<String>) -> usize {
        self.layers.push(SceneLayer {
            uuid: uuid.into(),
            name: name.into(),
            child_list: Some(ChildList::default()),
        });
        self.layers.len() - 1
    }

    /// Append a layer that carries no child list at all.
    pub fn add_empty_layer(&mut self, uuid: impl Into<String>, name: impl Into<String>) -> usize {
        self.layers.push(SceneLayer {
            uuid: uuid.into(),
            name: name.into(),
            child_list: None,
        });
        self.layers.len() - 1
    }

    pub fn add_fixture(&mut self, parent: Parent, fixture: Fixture) -> Result<FixtureIdx> {
        let idx = FixtureIdx(self.fixtures.len());
        self.child_list_mut(parent)?.fixtures.push(idx);
        self.fixtures.push(fixture);
        Ok(idx)
    }

    pub fn add_group(
        &mut self,
        parent: Parent,
        uuid: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<GroupIdx> {
        let idx = GroupIdx(self.groups.len());
        self.child_list_mut(parent)?.groups.push(idx);
        self.groups.push(GroupObject {
            uuid: uuid.into(),
            name: name.into(),
            child_list: Some(ChildList::default()),
        });
        Ok(idx)
    }

    fn child_list_mut(&mut self, parent: Parent) -> Result<&mut ChildList> {
        let slot = match parent {
            Parent::Layer(i) => self
                .layers
                .get_mut(i)
                .map(|l| &mut l.child_list)
                .ok_or_else(|| DomainError::DocumentParse(format!("Unknown layer index {i}")))?,
            Parent::Group(g) => self
                .groups
                .get_mut(g.0)
                .map(|grp| &mut grp.child_list)
                .ok_or_else(|| DomainError::DocumentParse(format!("Unknown group index {}", g.0)))?,
        };
        Ok(slot.get_or_insert_with(ChildList::default))
    }

    pub fn fixture(&self, idx: FixtureIdx) -> Option<&Fixture> {
        self.fixtures.get(idx.0)
    }

    pub fn fixture_mut(&mut self, idx: FixtureIdx) -> Option<&mut Fixture> {
        self.fixtures.get_mut(idx.0)
    }

    pub fn group(&self, idx: GroupIdx) -> Option<&GroupObject> {
        self.groups.get(idx.0)
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn groups(&self) -> &[GroupObject] {
        &self.groups
    }

    /// Walk every layer that owns a child list and collect the fixtures
    /// beneath it regardless of group depth.
    ///
    /// Order is depth-first: a child list's own fixtures, then each nested
    /// group in document order. A group reachable twice is visited once.
    pub fn layer_fixture_indices(&self) -> Vec<LayerFixtures> {
        let mut visited = vec![false; self.groups.len()];
        let mut result = Vec::new();

        for (layer_idx, layer) in self.layers.iter().enumerate() {
            let Some(root) = &layer.child_list else {
                continue;
            };

            let mut fixtures = Vec::new();
            let mut stack: Vec<&ChildList> = vec![root];

            while let Some(list) = stack.pop() {
                fixtures.extend(list.fixtures.iter().copied());

                // Reverse push keeps document order when popping
                for group_idx in list.groups.iter().rev() {
                    let Some(seen) = visited.get_mut(group_idx.0) else {
                        continue;
                    };
                    if *seen {
                        continue;
                    }
                    *seen = true;
                    if let Some(child) = self.groups[group_idx.0].child_list.as_ref() {
                        stack.push(child);
                    }
                }
            }

            result.push(LayerFixtures {
                layer: layer_idx,
                fixtures,
            });
        }

        result
    }

    /// All reachable fixtures across layers, in traversal order.
    pub fn flattened_fixture_indices(&self) -> Vec<FixtureIdx> {
        self.layer_fixture_indices()
            .into_iter()
            .flat_map(|l| l.fixtures)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(doc: &SceneDocument, indices: &[FixtureIdx]) -> Vec<String> {
        indices
            .iter()
            .map(|i| doc.fixture(*i).unwrap().name.clone())
            .collect()
    }

    #[test]
    fn test_traversal_visits_fixtures_before_groups() {
        let mut doc = SceneDocument::new();
        let layer = doc.add_layer("L1", "Stage");
        let group = doc.add_group(Parent::Layer(layer), "G1", "Truss").unwrap();
        doc.add_fixture(Parent::Group(group), Fixture::new("F2", "in group"))
            .unwrap();
        doc.add_fixture(Parent::Layer(layer), Fixture::new("F1", "direct"))
            .unwrap();

        let layers = doc.layer_fixture_indices();
        assert_eq!(layers.len(), 1);
        assert_eq!(names(&doc, &layers[0].fixtures), vec!["direct", "in group"]);
    }

    #[test]
    fn test_sibling_groups_keep_document_order() {
        let mut doc = SceneDocument::new();
        let layer = doc.add_layer("L1", "Stage");
        let a = doc.add_group(Parent::Layer(layer), "GA", "A").unwrap();
        let b = doc.add_group(Parent::Layer(layer), "GB", "B").unwrap();
        let a_inner = doc.add_group(Parent::Group(a), "GA1", "A1").unwrap();
        doc.add_fixture(Parent::Group(b), Fixture::new("F3", "b")).unwrap();
        doc.add_fixture(Parent::Group(a_inner), Fixture::new("F2", "a1"))
            .unwrap();
        doc.add_fixture(Parent::Group(a), Fixture::new("F1", "a")).unwrap();

        let order = doc.flattened_fixture_indices();
        assert_eq!(names(&doc, &order), vec!["a", "a1", "b"]);
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let mut doc = SceneDocument::new();
        let layer = doc.add_layer("L1", "Deep");
        let mut parent = Parent::Layer(layer);
        for depth in 0..50_000 {
            let group = doc
                .add_group(parent, format!("G{depth}"), "nested")
                .unwrap();
            parent = Parent::Group(group);
        }
        doc.add_fixture(parent, Fixture::new("LEAF", "leaf")).unwrap();

        let order = doc.flattened_fixture_indices();
        assert_eq!(names(&doc, &order), vec!["leaf"]);
    }

    #[test]
    fn test_layer_without_child_list_is_skipped() {
        let mut doc = SceneDocument::new();
        doc.add_empty_layer("L0", "Empty");
        let layer = doc.add_layer("L1", "Stage");
        doc.add_fixture(Parent::Layer(layer), Fixture::new("F1", "spot"))
            .unwrap();

        let layers = doc.layer_fixture_indices();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].layer, 1);
    }

    #[test]
    fn test_unknown_parent_is_rejected() {
        let mut doc = SceneDocument::new();
        let result = doc.add_fixture(Parent::Layer(3), Fixture::new("F1", "spot"));
        assert!(matches!(result, Err(DomainError::DocumentParse(_))));
    }

    #[test]
    fn test_aux_lookup_by_uuid() {
        let mut doc = SceneDocument::new();
        doc.aux.classes.push(AuxDefinition::new("C1", "Spot"));
        doc.aux.positions.push(AuxDefinition::new("P1", "FOH"));

        assert_eq!(doc.aux.class("C1").unwrap().name, "Spot");
        assert!(doc.aux.class("P1").is_none());
        assert_eq!(doc.aux.position("P1").unwrap().name, "FOH");
    }
}
