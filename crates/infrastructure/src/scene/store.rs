use domain::{DomainError, SceneDocument, SceneStore};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;
use zip::ZipArchive;
use zip::write::{FileOptions, ZipWriter};

use super::mvr_reader::parse_scene_xml;
use super::mvr_writer::write_scene_xml;

pub const SCENE_ENTRY: &str = "GeneralSceneDescription.xml";

/// Scene documents stored as MVR archives (zip holding the scene XML).
/// Paths ending in `.xml` are read and written as bare scene XML.
#[derive(Debug, Clone, Default)]
pub struct MvrSceneStore;

impl MvrSceneStore {
    pub fn new() -> Self {
        Self
    }

    fn is_bare_xml(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("xml"))
    }

    fn read_archive(path: &Path) -> Result<String, DomainError> {
        let file = File::open(path)
            .map_err(|e| DomainError::Io(format!("open {}: {}", path.display(), e)))?;
        let mut archive = ZipArchive::new(file).map_err(|e| {
            DomainError::DocumentParse(format!("{} is not a scene archive: {}", path.display(), e))
        })?;
        let mut entry = archive.by_name(SCENE_ENTRY).map_err(|e| {
            DomainError::DocumentParse(format!("{}: missing {}: {}", path.display(), SCENE_ENTRY, e))
        })?;

        let mut xml = String::new();
        entry
            .read_to_string(&mut xml)
            .map_err(|e| DomainError::DocumentParse(format!("{}: {}", path.display(), e)))?;
        Ok(xml)
    }

    fn write_archive(path: &Path, xml: &str) -> Result<(), DomainError> {
        let file = File::create(path)
            .map_err(|e| DomainError::Io(format!("create {}: {}", path.display(), e)))?;
        let mut zip = ZipWriter::new(file);
        let zip_err = |e: zip::result::ZipError| DomainError::Io(format!("{}: {}", path.display(), e));

        zip.start_file(SCENE_ENTRY, FileOptions::default())
            .map_err(zip_err)?;
        zip.write_all(xml.as_bytes())?;
        zip.finish().map_err(zip_err)?;
        Ok(())
    }
}

impl SceneStore for MvrSceneStore {
    fn load(&self, path: &Path) -> Result<SceneDocument, DomainError> {
        let xml = if Self::is_bare_xml(path) {
            std::fs::read_to_string(path)
                .map_err(|e| DomainError::Io(format!("read {}: {}", path.display(), e)))?
        } else {
            Self::read_archive(path)?
        };

        let scene = parse_scene_xml(&xml)?;
        info!(
            path = %path.display(),
            layers = scene.layers.len(),
            fixtures = scene.fixtures().len(),
            "Scene document loaded"
        );
        Ok(scene)
    }

    fn save(&self, document: &SceneDocument, path: &Path) -> Result<(), DomainError> {
        let xml = write_scene_xml(document);
        if Self::is_bare_xml(path) {
            std::fs::write(path, xml)?;
        } else {
            Self::write_archive(path, &xml)?;
        }
        info!(path = %path.display(), "Scene document written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Fixture;
    use domain::scene::Parent;
    use std::net::Ipv4Addr;

    fn sample() -> SceneDocument {
        let mut scene = SceneDocument::new();
        let layer = scene.add_layer("L1", "Network discovery");
        scene
            .add_fixture(
                Parent::Layer(layer),
                Fixture::new("F1", "Node").with_ipv4(Ipv4Addr::new(2, 0, 0, 1)),
            )
            .unwrap();
        scene
    }

    #[test]
    fn test_archive_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.mvr");
        let store = MvrSceneStore::new();

        store.save(&sample(), &path).unwrap();
        let read = store.load(&path).unwrap();

        assert_eq!(read.fixtures().len(), 1);
        assert_eq!(read.fixtures()[0].first_ipv4(), Some(Ipv4Addr::new(2, 0, 0, 1)));
    }

    #[test]
    fn test_bare_xml_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("GeneralSceneDescription.xml");
        let store = MvrSceneStore::new();

        store.save(&sample(), &path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("<?xml"));
        assert_eq!(store.load(&path).unwrap().layers[0].name, "Network discovery");
    }

    #[test]
    fn test_non_archive_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.mvr");
        std::fs::write(&path, b"definitely not a zip").unwrap();

        let result = MvrSceneStore::new().load(&path);
        assert!(matches!(result, Err(DomainError::DocumentParse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = MvrSceneStore::new().load(Path::new("/nonexistent/scene.mvr"));
        assert!(matches!(result, Err(DomainError::Io(_))));
    }
}
