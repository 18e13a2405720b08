//! Resource pack loading and parsing.
//!
//! A resource pack is a ZIP archive addressed through logical resource
//! locations. Entries are decoded lazily: the first request for a name
//! locates the entry by the deterministic path template
//! `<namespace>/<kind>/<name>.<ext>`, decodes it and caches the result.
//! The session is single-threaded, so the cache also guarantees at most one
//! decode per logical resource name.

pub mod blockstate;
pub mod model;
pub mod texture;

pub use blockstate::{ApplyValue, BlockstateDefinition, ModelVariant, MultipartCase, MultipartCondition};
pub use model::{BlockModel, ModelElement, ModelFace};
pub use texture::TextureData;

use crate::error::{Result, SceneError};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;
use std::rc::Rc;
use zip::ZipArchive;

/// The kinds of resources a pack serves, with their directory and extension.
#[derive(Debug, Clone, Copy)]
enum ResourceKind {
    Blockstate,
    Model,
    Texture,
}

impl ResourceKind {
    fn directory(self) -> &'static str {
        match self {
            ResourceKind::Blockstate => "blockstates",
            ResourceKind::Model => "models",
            ResourceKind::Texture => "textures",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            ResourceKind::Blockstate => "json",
            ResourceKind::Model => "json",
            ResourceKind::Texture => "png",
        }
    }
}

/// Split a resource location into namespace and path,
/// defaulting the namespace to "minecraft".
/// "minecraft:block/stone" -> ("minecraft", "block/stone")
/// "block/stone" -> ("minecraft", "block/stone")
pub fn split_resource_location(location: &str) -> (&str, &str) {
    location.split_once(':').unwrap_or(("minecraft", location))
}

/// Normalize a resource location to include its namespace.
pub fn normalize_location(location: &str) -> String {
    if location.contains(':') {
        location.to_string()
    } else {
        format!("minecraft:{}", location)
    }
}

fn resource_path(location: &str, kind: ResourceKind) -> String {
    let (namespace, name) = split_resource_location(location);
    format!("{}/{}/{}.{}", namespace, kind.directory(), name, kind.extension())
}

/// A loaded resource pack session.
///
/// Owns the archive handle and every decode cache; dropping the pack (or
/// calling [`close`](ResourcePack::close)) releases them together. Decoded
/// values are shared read-only via `Rc`.
pub struct ResourcePack {
    archive: RefCell<ZipArchive<Cursor<Vec<u8>>>>,
    entries: HashMap<String, usize>,
    blockstates: RefCell<HashMap<String, Rc<BlockstateDefinition>>>,
    models: RefCell<HashMap<String, Rc<BlockModel>>>,
    textures: RefCell<HashMap<String, Rc<TextureData>>>,
}

impl ResourcePack {
    /// Open a resource pack from ZIP bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;

        // Index entries by logical path. Packs distributed with an
        // `assets/` root are normalized to the bare template.
        let mut entries = HashMap::with_capacity(archive.len());
        for index in 0..archive.len() {
            let entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().strip_prefix("assets/").unwrap_or(entry.name());
            entries.insert(name.to_string(), index);
        }

        Ok(Self {
            archive: RefCell::new(archive),
            entries,
            blockstates: RefCell::new(HashMap::new()),
            models: RefCell::new(HashMap::new()),
            textures: RefCell::new(HashMap::new()),
        })
    }

    /// Open a resource pack from a ZIP file on disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_bytes(std::fs::read(path)?)
    }

    /// Release the archive handle and every cache.
    pub fn close(self) {}

    /// Number of indexed archive entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Get a blockstate definition by resource location (e.g. "minecraft:stone").
    pub fn get_blockstate(&self, location: &str) -> Result<Rc<BlockstateDefinition>> {
        if let Some(cached) = self.blockstates.borrow().get(location) {
            return Ok(cached.clone());
        }
        let decoded = Rc::new(self.read_json::<BlockstateDefinition>(location, ResourceKind::Blockstate)?);
        self.blockstates
            .borrow_mut()
            .insert(location.to_string(), decoded.clone());
        Ok(decoded)
    }

    /// Get a block model by resource location (e.g. "minecraft:block/stone").
    pub fn get_model(&self, location: &str) -> Result<Rc<BlockModel>> {
        if let Some(cached) = self.models.borrow().get(location) {
            return Ok(cached.clone());
        }
        let decoded = Rc::new(self.read_json::<BlockModel>(location, ResourceKind::Model)?);
        self.models
            .borrow_mut()
            .insert(location.to_string(), decoded.clone());
        Ok(decoded)
    }

    /// Get a decoded texture by resource location (e.g. "minecraft:block/stone").
    pub fn get_texture(&self, location: &str) -> Result<Rc<TextureData>> {
        let normalized = normalize_location(location);
        if let Some(cached) = self.textures.borrow().get(&normalized) {
            return Ok(cached.clone());
        }
        let bytes = self.read_entry(&resource_path(&normalized, ResourceKind::Texture))?;
        let decoded = Rc::new(texture::load_texture_from_bytes(&bytes, &normalized)?);
        self.textures
            .borrow_mut()
            .insert(normalized, decoded.clone());
        Ok(decoded)
    }

    fn read_json<T: DeserializeOwned>(&self, location: &str, kind: ResourceKind) -> Result<T> {
        let path = resource_path(location, kind);
        let bytes = self.read_entry(&path)?;
        serde_json::from_slice(&bytes).map_err(|e| SceneError::Schema {
            name: path,
            reason: e.to_string(),
        })
    }

    fn read_entry(&self, path: &str) -> Result<Vec<u8>> {
        let index = *self
            .entries
            .get(path)
            .ok_or_else(|| SceneError::NotFound(path.to_string()))?;

        let mut archive = self.archive.borrow_mut();
        let mut entry = archive.by_index(index)?;
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        Ok(data)
    }
}

impl std::fmt::Debug for ResourcePack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcePack")
            .field("entries", &self.entries.len())
            .field("blockstates", &self.blockstates.borrow().len())
            .field("models", &self.models.borrow().len())
            .field("textures", &self.textures.borrow().len())
            .finish()
    }
}
