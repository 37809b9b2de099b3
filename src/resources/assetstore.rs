//! Texture and model provider.
//!
//! Entities receive an [`AssetSource`] in their `load` step and ask it for
//! what they need by name. A `None` answer for a required resource is a
//! [`LoadError`] for that entity.
//!
//! [`AssetStore`] is the file-backed implementation used by the binary:
//!
//! ```text
//! <root>/textures/tank-body.png
//! <root>/textures/tank-turret.png
//! <root>/textures/wall.png
//! <root>/textures/g1.png .. g8.png   (ground variants)
//! <root>/models/tank.json            (model descriptor)
//! ```
//!
//! Textures are only resolved to handles; decoding them belongs to the
//! presentation layer. A model descriptor lists named parts with their local
//! bounds and offset:
//!
//! ```json
//! { "parts": [ { "name": "Body", "min": [-0.4, -0.5, 0.0], "max": [0.4, 0.5, 0.3] } ] }
//! ```

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use glam::Vec3;
use log::{debug, info};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::components::collider::Aabb;
use crate::components::mesh::{Geometry, Mesh, Texture};
use crate::error::LoadError;

/// Boxed future used at the async seams (asset and entity loading).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

const NAMED_TEXTURES: &[(&str, &str)] = &[
    ("tank-body", "textures/tank-body.png"),
    ("tank-turret", "textures/tank-turret.png"),
    ("wall", "textures/wall.png"),
];

const GROUND_TEXTURES: &[&str] = &[
    "g1.png", "g2.png", "g3.png", "g4.png", "g5.png", "g6.png", "g7.png", "g8.png",
];

const MODELS: &[(&str, &str)] = &[("tank", "models/tank.json")];

/// Named collection of meshes loaded from one model file.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    pub parts: Vec<Mesh>,
}

impl Model {
    pub fn part(&self, name: &str) -> Option<&Mesh> {
        self.parts.iter().find(|p| p.name == name)
    }
}

/// Resource-loading collaborator handed to every entity load.
pub trait AssetSource {
    /// Load everything any entity may ask for. Calling it again is a no-op.
    fn load(&mut self) -> BoxFuture<'_, Result<(), LoadError>>;

    fn texture(&self, name: &str) -> Option<Texture>;

    fn model(&self, name: &str) -> Option<Model>;

    /// One of the ground variants, picked at random.
    fn random_ground_texture(&self) -> BoxFuture<'_, Option<Texture>>;
}

#[derive(Debug, Deserialize)]
struct ModelDescriptor {
    parts: Vec<PartDescriptor>,
}

#[derive(Debug, Deserialize)]
struct PartDescriptor {
    name: String,
    min: [f32; 3],
    max: [f32; 3],
    #[serde(default)]
    offset: [f32; 3],
}

/// Asset store backed by a directory, or purely in memory.
#[derive(Debug, Default)]
pub struct AssetStore {
    root: Option<PathBuf>,
    loaded: bool,
    textures: FxHashMap<String, Texture>,
    ground_textures: Vec<Texture>,
    models: FxHashMap<String, Model>,
}

impl AssetStore {
    /// Store that reads its assets from `root` on [`AssetSource::load`].
    pub fn from_dir(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::default()
        }
    }

    /// Store whose contents are inserted by hand; `load` reads nothing.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn insert_texture(&mut self, texture: Texture) {
        self.textures.insert(texture.name.clone(), texture);
    }

    pub fn insert_ground_texture(&mut self, texture: Texture) {
        self.ground_textures.push(texture);
    }

    pub fn insert_model(&mut self, model: Model) {
        self.models.insert(model.name.clone(), model);
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn load_from_dir(&mut self, root: &Path) -> Result<(), LoadError> {
        for file in GROUND_TEXTURES {
            let texture = locate_texture(root, file, &format!("textures/{file}"))?;
            self.ground_textures.push(texture);
        }
        for (name, rel) in NAMED_TEXTURES {
            let texture = locate_texture(root, name, rel)?;
            self.insert_texture(texture);
        }
        for (name, rel) in MODELS {
            let model = read_model(name, &root.join(rel))?;
            self.insert_model(model);
        }
        info!(
            "Loaded assets from {:?}: {} textures, {} ground variants, {} models",
            root,
            self.textures.len(),
            self.ground_textures.len(),
            self.models.len()
        );
        Ok(())
    }
}

fn locate_texture(root: &Path, name: &str, rel: &str) -> Result<Texture, LoadError> {
    let path = root.join(rel);
    std::fs::metadata(&path).map_err(|source| LoadError::Asset {
        path: path.clone(),
        source,
    })?;
    debug!("texture {name} -> {path:?}");
    Ok(Texture {
        name: name.to_string(),
        path,
    })
}

fn read_model(name: &str, path: &Path) -> Result<Model, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Asset {
        path: path.to_path_buf(),
        source,
    })?;
    let descriptor: ModelDescriptor =
        serde_json::from_str(&text).map_err(|source| LoadError::ModelFormat {
            path: path.to_path_buf(),
            source,
        })?;
    let parts = descriptor
        .parts
        .into_iter()
        .map(|part| Mesh {
            name: part.name,
            geometry: Some(Geometry::Imported {
                bounds: Aabb::new(Vec3::from_array(part.min), Vec3::from_array(part.max)),
            }),
            ..Mesh::group().at(Vec3::from_array(part.offset))
        })
        .collect();
    Ok(Model {
        name: name.to_string(),
        parts,
    })
}

impl AssetSource for AssetStore {
    fn load(&mut self) -> BoxFuture<'_, Result<(), LoadError>> {
        Box::pin(async move {
            if self.loaded {
                return Ok(());
            }
            if let Some(root) = self.root.clone() {
                self.load_from_dir(&root)?;
            }
            self.loaded = true;
            Ok(())
        })
    }

    fn texture(&self, name: &str) -> Option<Texture> {
        self.textures.get(name).cloned()
    }

    fn model(&self, name: &str) -> Option<Model> {
        self.models.get(name).cloned()
    }

    fn random_ground_texture(&self) -> BoxFuture<'_, Option<Texture>> {
        Box::pin(async move {
            if self.ground_textures.is_empty() {
                return None;
            }
            let index = fastrand::usize(..self.ground_textures.len());
            Some(self.ground_textures[index].clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_assets(root: &Path, skip: Option<&str>) {
        std::fs::create_dir_all(root.join("textures")).unwrap();
        std::fs::create_dir_all(root.join("models")).unwrap();
        let files = GROUND_TEXTURES
            .iter()
            .map(|f| format!("textures/{f}"))
            .chain(NAMED_TEXTURES.iter().map(|(_, rel)| rel.to_string()));
        for rel in files {
            if Some(rel.as_str()) != skip {
                std::fs::write(root.join(rel), b"png").unwrap();
            }
        }
        std::fs::write(
            root.join("models/tank.json"),
            r#"{ "parts": [
                { "name": "Body", "min": [-0.4, -0.5, 0.0], "max": [0.4, 0.5, 0.3] },
                { "name": "Turret", "min": [-0.2, -0.2, 0.0], "max": [0.2, 0.2, 0.2], "offset": [0.0, 0.0, 0.3] }
            ] }"#,
        )
        .unwrap();
    }

    #[test]
    fn loads_textures_and_models_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path(), None);

        let mut store = AssetStore::from_dir(dir.path());
        pollster::block_on(store.load()).unwrap();

        assert!(store.is_loaded());
        assert!(store.texture("wall").is_some());
        assert!(store.texture("tank-turret").is_some());
        let model = store.model("tank").unwrap();
        assert_eq!(model.parts.len(), 2);
        let turret = model.part("Turret").unwrap();
        assert_eq!(turret.position(), Vec3::new(0.0, 0.0, 0.3));
        assert!(pollster::block_on(store.random_ground_texture()).is_some());
    }

    #[test]
    fn missing_texture_file_is_an_asset_error() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path(), Some("textures/wall.png"));

        let mut store = AssetStore::from_dir(dir.path());
        let err = pollster::block_on(store.load()).unwrap_err();
        assert!(matches!(err, LoadError::Asset { .. }));
        assert!(!store.is_loaded());
    }

    #[test]
    fn malformed_model_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path(), None);
        std::fs::write(dir.path().join("models/tank.json"), "{ not json").unwrap();

        let mut store = AssetStore::from_dir(dir.path());
        let err = pollster::block_on(store.load()).unwrap_err();
        assert!(matches!(err, LoadError::ModelFormat { .. }));
    }

    #[test]
    fn in_memory_store_has_no_ground_textures_by_default() {
        let mut store = AssetStore::in_memory();
        pollster::block_on(store.load()).unwrap();
        assert!(store.texture("wall").is_none());
        assert!(pollster::block_on(store.random_ground_texture()).is_none());
    }
}
