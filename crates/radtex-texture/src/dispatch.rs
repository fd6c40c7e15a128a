//! Filter dispatch
//!
//! | filter type | outputs |
//! |---|---|
//! | `original` | `original` |
//! | `mean` | `mean` |
//! | `sobel` | `SobelMag`, `SobelDir` |
//! | `log` | `LoG` |
//! | `gabor`, `gabor3d` | one map per orientation or aggregation |
//! | `laws` | one map per kernel combination, named by type |
//! | `rotationinvariantlaws` | `<Type>` |
//! | `lawsenergy` | `<Type>_Energy` per kernel combination |
//! | `rotationinvariantlawsenergy` | `<Type>_Energy` |

use radtex_core::{Mask, Volume};
use radtex_filter::{LawsParams, LawsType, NamedVolumes, TextureKernels};
use radtex_io::ParamBlock;

use crate::error::{TextureError, TextureResult};
use crate::params::FilterSpec;

/// Apply filter type `filter_type` configured by `params`.
///
/// The filter type name is matched case-insensitively and the image is
/// converted to `f64` first. `mask` must have the image's shape.
///
/// # Errors
///
/// Parameter errors from [`FilterSpec::parse`], a geometry error for a
/// mismatched mask, and kernel failures.
pub fn apply<T, K>(
    filter_type: &str,
    image: &Volume<T>,
    mask: &Mask,
    params: &ParamBlock,
    kernels: &K,
) -> TextureResult<NamedVolumes>
where
    T: Copy + Into<f64>,
    K: TextureKernels + ?Sized,
{
    let spec = FilterSpec::parse(filter_type, params)?;
    if mask.shape() != image.shape() {
        return Err(TextureError::Geometry(format!(
            "mask is {} but the image is {}",
            mask.shape(),
            image.shape()
        )));
    }
    apply_spec(&spec, &image.to_f64(), kernels)
}

/// Apply an already parsed filter.
pub fn apply_spec<K>(
    spec: &FilterSpec,
    image: &Volume<f64>,
    kernels: &K,
) -> TextureResult<NamedVolumes>
where
    K: TextureKernels + ?Sized,
{
    let outputs = match spec {
        FilterSpec::Original => vec![("original".to_string(), image.clone())],
        FilterSpec::Mean(p) => vec![("mean".to_string(), kernels.mean(image, p)?)],
        FilterSpec::Sobel => {
            let sobel = kernels.sobel(image)?;
            vec![
                ("SobelMag".to_string(), sobel.magnitude),
                ("SobelDir".to_string(), sobel.direction),
            ]
        }
        FilterSpec::Log(p) => vec![("LoG".to_string(), kernels.log(image, p)?)],
        FilterSpec::Gabor(p) => kernels.gabor(image, p)?,
        FilterSpec::Gabor3d(p) => kernels.gabor3d(image, p)?,
        FilterSpec::Laws(p) => kernels.laws(image, p)?,
        FilterSpec::RotationInvariantLaws { laws, rotation } => {
            let out = kernels.rotation_invariant_laws(image, laws, rotation)?;
            vec![(type_name(laws), out)]
        }
        FilterSpec::LawsEnergy { laws, energy } => kernels.laws_energy(image, laws, energy)?,
        FilterSpec::RotationInvariantLawsEnergy {
            laws,
            energy,
            rotation,
        } => {
            let out = kernels.rotation_invariant_laws_energy(image, laws, energy, rotation)?;
            vec![(format!("{}_Energy", type_name(laws)), out)]
        }
    };
    Ok(outputs)
}

fn type_name(laws: &LawsParams) -> String {
    match &laws.kind {
        LawsType::Named(combo) => combo.name(),
        LawsType::All => "all".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radtex_core::Shape;
    use radtex_filter::StandardKernels;
    use serde_json::json;

    fn image() -> Volume<f64> {
        let shape = Shape::new(6, 7, 5);
        Volume::from_fn(shape, |r, c, s| ((r * 3 + c * 5 + s * 7) % 11) as f64).unwrap()
    }

    fn block(v: serde_json::Value) -> ParamBlock {
        match v {
            serde_json::Value::Object(map) => ParamBlock::from(map),
            _ => panic!("not an object"),
        }
    }

    /// Dispatch with the standard kernels.
    fn run<T: Copy + Into<f64>>(
        name: &str,
        image: &Volume<T>,
        mask: &Mask,
        params: &ParamBlock,
    ) -> TextureResult<NamedVolumes> {
        apply(name, image, mask, params, &StandardKernels::default())
    }

    #[test]
    fn test_original_is_identity() {
        let img = image();
        let mask = Mask::new(6, 7, 5).unwrap();
        let out = run("Original", &img, &mask, &ParamBlock::new()).unwrap();
        assert_eq!(out, vec![("original".to_string(), img)]);
    }

    #[test]
    fn test_integer_images_are_converted() {
        let img = Volume::from_fn(Shape::new(3, 3, 3), |r, _, _| r as u16).unwrap();
        let mask = Mask::new(3, 3, 3).unwrap();
        let params = block(json!({"KernelSize": [1, 1, 1]}));
        let out = run("mean", &img, &mask, &params).unwrap();
        assert_eq!(out[0].1.get(2, 0, 0).unwrap(), 2.0);
    }

    #[test]
    fn test_unknown_and_mismatched() {
        let img = image();
        let mask = Mask::new(6, 7, 5).unwrap();
        let err = run("wavelets", &img, &mask, &ParamBlock::new()).unwrap_err();
        assert!(matches!(err, TextureError::UnknownFilter(_)));

        let small = Mask::new(6, 7, 4).unwrap();
        let err = run("sobel", &img, &small, &ParamBlock::new()).unwrap_err();
        assert!(matches!(err, TextureError::Geometry(_)));
    }

    #[test]
    fn test_rotation_invariant_names() {
        let img = image();
        let mask = Mask::new(6, 7, 5).unwrap();
        let params = block(json!({
            "Direction": "2D",
            "Type": "e3l3",
            "RotationInvariance": {"Dim": "2D", "AggregationMethod": "average"},
            "EnergyKernelSize": [3, 3, 1],
            "EnergyPadSize": [1, 1, 0],
            "EnergyPadMethod": "mirror"
        }));
        let out = run("RotationInvariantLaws", &img, &mask, &params).unwrap();
        assert_eq!(out[0].0, "E3L3");
        let out = run("RotationInvariantLawsEnergy", &img, &mask, &params).unwrap();
        assert_eq!(out[0].0, "E3L3_Energy");
    }
}
