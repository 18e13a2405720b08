//! Blockstate definition parsing.
//!
//! Blockstates define how block properties map to model variants.
//! There are two formats: "variants" and "multipart".

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A blockstate definition from blockstates/*.json.
#[derive(Debug, Clone)]
pub enum BlockstateDefinition {
    /// Simple variants: property combinations map to models.
    Variants(HashMap<String, Vec<ModelVariant>>),
    /// Multipart: conditional model application.
    Multipart(Vec<MultipartCase>),
}

impl<'de> Deserialize<'de> for BlockstateDefinition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawBlockstate {
            variants: Option<HashMap<String, VariantValue>>,
            multipart: Option<Vec<MultipartCase>>,
        }

        let raw = RawBlockstate::deserialize(deserializer)?;

        if let Some(variants) = raw.variants {
            let parsed = variants
                .into_iter()
                .map(|(key, value)| (key, value.into_vec()))
                .collect();
            Ok(BlockstateDefinition::Variants(parsed))
        } else if let Some(multipart) = raw.multipart {
            Ok(BlockstateDefinition::Multipart(multipart))
        } else {
            Err(serde::de::Error::custom(
                "blockstate declares neither variants nor multipart",
            ))
        }
    }
}

/// A variant value can be a single model or an array of weighted models.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum VariantValue {
    Single(ModelVariant),
    Multiple(Vec<ModelVariant>),
}

impl VariantValue {
    fn into_vec(self) -> Vec<ModelVariant> {
        match self {
            VariantValue::Single(variant) => vec![variant],
            VariantValue::Multiple(variants) => variants,
        }
    }
}

/// A model variant reference with optional rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelVariant {
    /// Model resource location (e.g., "block/stone" or "minecraft:block/stone").
    pub model: String,
    /// X rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub x: i32,
    /// Y rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub y: i32,
}

impl ModelVariant {
    /// Get the full resource location for the model.
    pub fn model_location(&self) -> String {
        super::normalize_location(&self.model)
    }
}

/// A multipart case with optional condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipartCase {
    /// Condition for when this case applies. A case with no condition
    /// always applies.
    #[serde(default)]
    pub when: Option<MultipartCondition>,
    /// Model(s) to apply when the condition is met.
    pub apply: ApplyValue,
}

/// The apply value can be a single model or an array.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ApplyValue {
    Single(ModelVariant),
    Multiple(Vec<ModelVariant>),
}

impl ApplyValue {
    pub fn variants(&self) -> Vec<&ModelVariant> {
        match self {
            ApplyValue::Single(variant) => vec![variant],
            ApplyValue::Multiple(variants) => variants.iter().collect(),
        }
    }
}

/// Multipart condition for when a case applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MultipartCondition {
    /// OR condition: any of the sub-conditions must match.
    Or {
        #[serde(rename = "OR")]
        or: Vec<HashMap<String, String>>,
    },
    /// AND condition: all of the sub-conditions must match.
    And {
        #[serde(rename = "AND")]
        and: Vec<HashMap<String, String>>,
    },
    /// Simple condition: all listed properties must match.
    Simple(HashMap<String, String>),
}

impl MultipartCondition {
    /// Check if the condition matches the given block properties.
    pub fn matches(&self, properties: &HashMap<String, String>) -> bool {
        match self {
            MultipartCondition::Or { or } => {
                or.iter().any(|cond| Self::matches_simple(cond, properties))
            }
            MultipartCondition::And { and } => {
                and.iter().all(|cond| Self::matches_simple(cond, properties))
            }
            MultipartCondition::Simple(cond) => Self::matches_simple(cond, properties),
        }
    }

    /// Check a property map condition. Values accept `|`-delimited
    /// alternatives; a property absent from the block never matches.
    fn matches_simple(
        condition: &HashMap<String, String>,
        properties: &HashMap<String, String>,
    ) -> bool {
        condition.iter().all(|(key, expected)| {
            properties
                .get(key)
                .map(|value| expected.split('|').any(|alt| alt == value))
                .unwrap_or(false)
        })
    }
}
