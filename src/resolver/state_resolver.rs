//! Block state to model variant resolution.

use crate::error::{Result, SceneError};
use crate::resource_pack::{BlockstateDefinition, ModelVariant, MultipartCase, ResourcePack};
use crate::types::BlockState;
use std::collections::HashMap;
use std::collections::HashSet;

/// Selects the model variants that render a block's property combination.
pub struct StateResolver<'a> {
    pack: &'a ResourcePack,
}

impl<'a> StateResolver<'a> {
    pub fn new(pack: &'a ResourcePack) -> Self {
        Self { pack }
    }

    /// Resolve a block state to the list of model variants to render.
    pub fn resolve(&self, state: &BlockState) -> Result<Vec<ModelVariant>> {
        let definition = self.pack.get_blockstate(&state.name)?;

        match &*definition {
            BlockstateDefinition::Variants(variants) => resolve_variants(variants, state),
            BlockstateDefinition::Multipart(cases) => resolve_multipart(cases, state),
        }
    }
}

/// Variants form: keys constrain a subset of the block's properties, so the
/// lookup string is built from exactly the property names the document
/// declares (a furnace's `waterlogged` never appears in its variant keys).
/// An array value is a randomized variant list collapsed to its first entry
/// for deterministic output.
fn resolve_variants(
    variants: &HashMap<String, Vec<ModelVariant>>,
    state: &BlockState,
) -> Result<Vec<ModelVariant>> {
    let declared: HashSet<&str> = variants
        .keys()
        .flat_map(|key| key.split(','))
        .filter_map(|pair| pair.split_once('=').map(|(name, _)| name))
        .collect();

    let lookup = state.property_string(Some(&declared));

    let selected = variants
        .get(&lookup)
        .and_then(|list| list.first())
        .ok_or_else(|| {
            SceneError::Lookup(format!(
                "no variant \"{}\" for {} with properties {:?}",
                lookup, state.name, state.properties
            ))
        })?;

    Ok(vec![selected.clone()])
}

/// Multipart form: every case whose condition matches contributes its
/// models; unconditional cases always apply. Compound visuals (fences,
/// redstone wire) come from several cases matching at once.
fn resolve_multipart(cases: &[MultipartCase], state: &BlockState) -> Result<Vec<ModelVariant>> {
    let mut selected = Vec::new();

    for case in cases {
        let applies = match &case.when {
            Some(condition) => condition.matches(&state.properties),
            None => true,
        };

        if applies {
            selected.extend(case.apply.variants().into_iter().cloned());
        }
    }

    if selected.is_empty() {
        return Err(SceneError::Lookup(format!(
            "no multipart case matched for {} with properties {:?}",
            state.name, state.properties
        )));
    }

    Ok(selected)
}
