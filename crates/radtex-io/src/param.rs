//! Raw filter parameter blocks
//!
//! A [`ParamBlock`] is the JSON object configured for one filter variant.
//! Keys are kept exactly as written (`KernelSize`, `Sigma_mm`, ...); the
//! texture crate turns a block into a typed filter description.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the voxel size in mm
pub const VOXEL_SIZE_KEY: &str = "VoxelSize_mm";

/// Key holding the padding descriptor
pub const PADDING_KEY: &str = "Padding";

/// One filter parameter block, in document key order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamBlock(Map<String, Value>);

impl ParamBlock {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Value stored under `key`, if any
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert or overwrite `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ParamBlock {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_param_block_insert_and_order() {
        let block = ParamBlock::new()
            .with("KernelSize", json!([3, 3, 3]))
            .with("Absolute", "yes");
        assert_eq!(block.len(), 2);
        assert!(block.contains("KernelSize"));
        assert_eq!(block.get("Absolute"), Some(&json!("yes")));
        let keys: Vec<_> = block.keys().collect();
        assert_eq!(keys, vec!["KernelSize", "Absolute"]);
    }

    #[test]
    fn test_param_block_overwrite() {
        let mut block = ParamBlock::new().with(VOXEL_SIZE_KEY, json!([1.0, 1.0, 1.0]));
        let old = block.insert(VOXEL_SIZE_KEY, json!([2.0, 2.0, 2.0]));
        assert_eq!(old, Some(json!([1.0, 1.0, 1.0])));
        assert_eq!(block.get(VOXEL_SIZE_KEY), Some(&json!([2.0, 2.0, 2.0])));
    }
}
