//! Settings documents
//!
//! A settings document is a JSON object with two sections:
//!
//! ```json
//! {
//!   "imageType": {
//!     "mean": [{"KernelSize": [3, 3, 3]}, {"KernelSize": [5, 5, 5]}],
//!     "LoG":  {"Sigma_mm": [1, 1, 1], "CutOff_mm": [4, 4, 4]}
//!   },
//!   "settings": {
//!     "padding": [{"method": "expand", "size": [2, 2, 2]}]
//!   }
//! }
//! ```
//!
//! `imageType` maps a filter-type name to one parameter block or a list of
//! blocks; each block is run independently. Filter names are not checked
//! here, only when a filter is dispatched.

use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{IoError, IoResult};
use crate::param::{ParamBlock, VOXEL_SIZE_KEY};

/// Padding method meaning "no padding"
pub const PADDING_NONE: &str = "none";

/// The `settings.padding` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddingSettings {
    /// Method name as written, e.g. `expand`, `padzeros`, `none`
    pub method: String,
    /// Padding per axis `(rows, cols, slices)`
    pub size: [usize; 3],
}

impl Default for PaddingSettings {
    fn default() -> Self {
        Self {
            method: PADDING_NONE.to_string(),
            size: [0; 3],
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSize {
    Scalar(usize),
    Vector(Vec<usize>),
}

#[derive(Deserialize)]
struct RawPadding {
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    size: Option<RawSize>,
}

impl PaddingSettings {
    fn from_value(value: Value) -> IoResult<Self> {
        let raw: RawPadding = serde_json::from_value(value)
            .map_err(|e| IoError::ConfigFormat(format!("settings.padding is malformed: {e}")))?;
        Ok(Self {
            method: raw.method.unwrap_or_else(|| PADDING_NONE.to_string()),
            size: padding_size(raw.size)?,
        })
    }
}

fn padding_size(size: Option<RawSize>) -> IoResult<[usize; 3]> {
    match size {
        None => Ok([0; 3]),
        Some(RawSize::Scalar(n)) => Ok([n; 3]),
        Some(RawSize::Vector(v)) => match v[..] {
            [rows, cols, slices] => Ok([rows, cols, slices]),
            _ => Err(IoError::ConfigFormat(format!(
                "settings.padding.size needs 3 entries, got {}",
                v.len()
            ))),
        },
    }
}

/// All parameter blocks configured for one filter type
#[derive(Debug, Clone, PartialEq)]
pub struct FilterEntry {
    /// Filter-type name as written in the document
    pub name: String,
    /// Parameter blocks in document order
    pub variants: Vec<ParamBlock>,
}

/// Parsed settings document
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDocument {
    filters: Vec<FilterEntry>,
    padding: Option<PaddingSettings>,
    extra: Map<String, Value>,
}

impl SettingsDocument {
    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `IoError::ConfigFormat` for invalid JSON and when
    /// `imageType` is missing or malformed.
    pub fn from_json_str(text: &str) -> IoResult<Self> {
        let root: Value = serde_json::from_str(text)
            .map_err(|e| IoError::ConfigFormat(format!("malformed JSON: {e}")))?;
        Self::from_value(root)
    }

    /// Build a document from an already parsed JSON value.
    pub fn from_value(root: Value) -> IoResult<Self> {
        let Value::Object(mut root) = root else {
            return Err(IoError::ConfigFormat("top level must be a JSON object".into()));
        };

        let image_type = root
            .remove("imageType")
            .ok_or_else(|| IoError::ConfigFormat("missing 'imageType' section".into()))?;
        let Value::Object(image_type) = image_type else {
            return Err(IoError::ConfigFormat("'imageType' must be an object".into()));
        };

        let mut filters = Vec::with_capacity(image_type.len());
        for (name, entry) in image_type {
            let variants = parse_variants(&name, entry)?;
            if variants.is_empty() {
                warn!("filter '{name}' has an empty parameter list and will not run");
            }
            filters.push(FilterEntry { name, variants });
        }

        let (padding, extra) = match root.remove("settings") {
            None => (None, Map::new()),
            Some(Value::Object(mut settings)) => {
                let padding = match settings.remove("padding") {
                    None => None,
                    Some(value) => first_padding(value)?,
                };
                (padding, settings)
            }
            Some(_) => {
                return Err(IoError::ConfigFormat("'settings' must be an object".into()));
            }
        };

        debug!(
            "parsed settings: {} filter types, padding {:?}",
            filters.len(),
            padding
        );
        Ok(Self {
            filters,
            padding,
            extra,
        })
    }

    /// Filter-type names in document order
    pub fn filter_types(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.name.clone()).collect()
    }

    /// Filter entries in document order
    pub fn filters(&self) -> &[FilterEntry] {
        &self.filters
    }

    /// The first `settings.padding` entry, if configured
    pub fn padding(&self) -> Option<&PaddingSettings> {
        self.padding.as_ref()
    }

    /// `settings` keys other than `padding`
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Set `VoxelSize_mm` on every parameter block.
    pub fn inject_voxel_size(&mut self, voxel_size_mm: [f64; 3]) {
        for filter in &mut self.filters {
            for block in &mut filter.variants {
                block.insert(VOXEL_SIZE_KEY, voxel_size_mm.to_vec());
            }
        }
    }
}

fn parse_variants(name: &str, entry: Value) -> IoResult<Vec<ParamBlock>> {
    match entry {
        Value::Object(map) => Ok(vec![ParamBlock::from(map)]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(ParamBlock::from(map)),
                _ => Err(IoError::ConfigFormat(format!("imageType.{name}[{i}] must be an object"))),
            })
            .collect(),
        _ => Err(IoError::ConfigFormat(format!(
            "imageType.{name} must be an object or a list of objects"
        ))),
    }
}

fn first_padding(value: Value) -> IoResult<Option<PaddingSettings>> {
    match value {
        Value::Array(items) => {
            if items.len() > 1 {
                warn!(
                    "settings.padding has {} entries; only the first is used",
                    items.len()
                );
            }
            items
                .into_iter()
                .next()
                .map(PaddingSettings::from_value)
                .transpose()
        }
        Value::Object(_) => PaddingSettings::from_value(value).map(Some),
        _ => Err(IoError::ConfigFormat(
            "settings.padding must be an object or a list of objects".into(),
        )),
    }
}

/// Load a settings document from a JSON file.
///
/// # Arguments
///
/// * `path` - JSON settings file
/// * `scan_spacing` - Optional scan spacing in cm; when given, every
///   parameter block gets `VoxelSize_mm = scan_spacing * 10`
///
/// # Returns
///
/// The document and its filter-type names in document order.
pub fn load_settings(
    path: impl AsRef<Path>,
    scan_spacing: Option<[f64; 3]>,
) -> IoResult<(SettingsDocument, Vec<String>)> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let mut doc = SettingsDocument::from_json_str(&text)?;
    if let Some(spacing) = scan_spacing {
        doc.inject_voxel_size(spacing.map(|d| d * 10.0));
    }
    let names = doc.filter_types();
    Ok((doc, names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_single_and_list() {
        let doc = SettingsDocument::from_value(json!({
            "imageType": {
                "mean": [{"KernelSize": [3, 3, 3]}, {"KernelSize": [5, 5, 5]}],
                "Sobel": {}
            }
        }))
        .unwrap();
        assert_eq!(doc.filter_types(), vec!["mean", "Sobel"]);
        assert_eq!(doc.filters()[0].variants.len(), 2);
        assert_eq!(doc.filters()[1].variants.len(), 1);
        assert!(doc.padding().is_none());
    }

    #[test]
    fn test_document_order_is_kept() {
        let doc = SettingsDocument::from_json_str(
            r#"{"imageType": {"sobel": {}, "mean": {"KernelSize": 3}, "laws": {}}}"#,
        )
        .unwrap();
        assert_eq!(doc.filter_types(), vec!["sobel", "mean", "laws"]);
    }

    #[test]
    fn test_missing_image_type() {
        let err = SettingsDocument::from_value(json!({"settings": {}})).unwrap_err();
        assert!(matches!(err, IoError::ConfigFormat(_)));
        let err = SettingsDocument::from_value(json!({"imageType": 3})).unwrap_err();
        assert!(matches!(err, IoError::ConfigFormat(_)));
        let err = SettingsDocument::from_value(json!({"imageType": {"mean": [1]}})).unwrap_err();
        assert!(matches!(err, IoError::ConfigFormat(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = SettingsDocument::from_json_str("{\"imageType\": ").unwrap_err();
        assert!(matches!(err, IoError::ConfigFormat(ref m) if m.contains("malformed JSON")));
        let err = SettingsDocument::from_json_str("imageType = 3").unwrap_err();
        assert!(matches!(err, IoError::ConfigFormat(_)));
    }

    #[test]
    fn test_padding_forms() {
        let doc = SettingsDocument::from_value(json!({
            "imageType": {},
            "settings": {
                "padding": [{"method": "expand", "size": [2, 3, 1]}, {"method": "none"}],
                "resample": {"resolutionXCm": 0.1}
            }
        }))
        .unwrap();
        let p = doc.padding().unwrap();
        assert_eq!(p.method, "expand");
        assert_eq!(p.size, [2, 3, 1]);
        assert!(doc.extra().contains_key("resample"));

        let doc = SettingsDocument::from_value(json!({
            "imageType": {},
            "settings": {"padding": {"method": "mirror", "size": 4}}
        }))
        .unwrap();
        assert_eq!(doc.padding().unwrap().size, [4, 4, 4]);

        let err = SettingsDocument::from_value(json!({
            "imageType": {},
            "settings": {"padding": {"method": "mirror", "size": [1, 2]}}
        }))
        .unwrap_err();
        assert!(matches!(err, IoError::ConfigFormat(_)));
    }

    #[test]
    fn test_inject_voxel_size() {
        let mut doc = SettingsDocument::from_value(json!({
            "imageType": {"mean": [{"KernelSize": 3}, {"KernelSize": 5}]}
        }))
        .unwrap();
        doc.inject_voxel_size([1.0, 1.0, 2.5]);
        for block in &doc.filters()[0].variants {
            assert_eq!(block.get(VOXEL_SIZE_KEY), Some(&json!([1.0, 1.0, 2.5])));
        }
    }
}
