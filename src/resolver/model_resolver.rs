//! Model inheritance resolution.

use crate::error::{Result, SceneError};
use crate::resource_pack::{normalize_location, BlockModel, ResourcePack};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Resolves model inheritance chains.
///
/// Walks a model's parent chain, merging texture maps (child wins per key)
/// and taking the nearest declared element list wholesale. The visited set
/// turns a self-referential pack into an explicit error instead of a hang.
pub struct ModelResolver<'a> {
    pack: &'a ResourcePack,
    cache: RefCell<HashMap<String, Rc<BlockModel>>>,
}

impl<'a> ModelResolver<'a> {
    pub fn new(pack: &'a ResourcePack) -> Self {
        Self {
            pack,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Resolve a model with all inherited properties merged in.
    /// The returned model has `parents` listing every visited ancestor,
    /// nearest first.
    pub fn resolve(&self, location: &str) -> Result<Rc<BlockModel>> {
        if let Some(cached) = self.cache.borrow().get(location) {
            return Ok(cached.clone());
        }

        let normalized = normalize_location(location);
        let mut merged = (*self.pack.get_model(&normalized)?).clone();
        let mut visited: HashSet<String> = HashSet::from([normalized]);

        while let Some(parent) = merged.parent.take() {
            // Builtin parents (builtin/generated etc.) have no document to
            // fetch; the chain ends there.
            if parent.starts_with("builtin/") {
                break;
            }

            let parent_location = normalize_location(&parent);
            if !visited.insert(parent_location.clone()) {
                return Err(SceneError::Format(format!(
                    "circular model inheritance through {} while resolving {}",
                    parent_location, location
                )));
            }

            let parent_model = self.pack.get_model(&parent_location)?;
            merged.parents.push(parent);
            merged.parent = parent_model.parent.clone();

            if merged.elements.is_empty() {
                merged.elements = parent_model.elements.clone();
            }

            let mut textures = parent_model.textures.clone();
            textures.extend(merged.textures.drain());
            merged.textures = textures;
        }

        let merged = Rc::new(merged);
        self.cache
            .borrow_mut()
            .insert(location.to_string(), merged.clone());
        Ok(merged)
    }
}

/// Follow a `#name` reference chain through a model's merged texture map to
/// a concrete, namespaced texture location. The hop bound turns reference
/// cycles into an error.
pub fn dereference_texture(
    reference: &str,
    textures: &HashMap<String, String>,
) -> Result<String> {
    let mut current = reference;
    let mut hops = 0;

    while let Some(key) = current.strip_prefix('#') {
        if hops > textures.len() {
            return Err(SceneError::Format(format!(
                "texture reference cycle through #{}",
                key
            )));
        }
        current = textures
            .get(key)
            .ok_or_else(|| SceneError::NotFound(format!("texture reference #{}", key)))?;
        hops += 1;
    }

    Ok(normalize_location(current))
}
