//! Filter parameter normalization
//!
//! Turns a raw [`ParamBlock`] into a typed [`FilterSpec`]. Keys are matched
//! exactly as they appear in settings files (`KernelSize`, `Sigma_mm`,
//! `Wavlength_mm`, ...). Physical lengths are converted to voxels here, not
//! in the kernels.

use std::fmt;

use radtex_core::BorderMode;
use radtex_filter::{
    Aggregation, EnergyParams, Gabor3dParams, GaborParams, LawsDirection, LawsParams, LogParams,
    MeanParams, RotationInvariance,
};
use radtex_io::{PADDING_KEY, ParamBlock, VOXEL_SIZE_KEY};
use serde_json::Value;

use crate::error::{TextureError, TextureResult};

/// Supported filter types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Original,
    Mean,
    Sobel,
    Log,
    Gabor,
    Gabor3d,
    Laws,
    RotationInvariantLaws,
    LawsEnergy,
    RotationInvariantLawsEnergy,
}

impl FilterKind {
    pub const ALL: [FilterKind; 10] = [
        FilterKind::Original,
        FilterKind::Mean,
        FilterKind::Sobel,
        FilterKind::Log,
        FilterKind::Gabor,
        FilterKind::Gabor3d,
        FilterKind::Laws,
        FilterKind::RotationInvariantLaws,
        FilterKind::LawsEnergy,
        FilterKind::RotationInvariantLawsEnergy,
    ];

    /// Normalized (lowercase) name
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Original => "original",
            FilterKind::Mean => "mean",
            FilterKind::Sobel => "sobel",
            FilterKind::Log => "log",
            FilterKind::Gabor => "gabor",
            FilterKind::Gabor3d => "gabor3d",
            FilterKind::Laws => "laws",
            FilterKind::RotationInvariantLaws => "rotationinvariantlaws",
            FilterKind::LawsEnergy => "lawsenergy",
            FilterKind::RotationInvariantLawsEnergy => "rotationinvariantlawsenergy",
        }
    }

    /// Look up a filter type; surrounding whitespace and case are ignored.
    ///
    /// # Errors
    ///
    /// Returns `TextureError::UnknownFilter` for names not in the table.
    pub fn from_name(name: &str) -> TextureResult<Self> {
        let normalized = name.trim().to_lowercase();
        FilterKind::ALL
            .into_iter()
            .find(|k| k.name() == normalized)
            .ok_or(TextureError::UnknownFilter(normalized))
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated filter configuration
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    /// Identity copy of the image
    Original,
    Mean(MeanParams),
    Sobel,
    Log(LogParams),
    Gabor(GaborParams),
    Gabor3d(Gabor3dParams),
    Laws(LawsParams),
    RotationInvariantLaws {
        laws: LawsParams,
        rotation: RotationInvariance,
    },
    LawsEnergy {
        laws: LawsParams,
        energy: EnergyParams,
    },
    RotationInvariantLawsEnergy {
        laws: LawsParams,
        energy: EnergyParams,
        rotation: RotationInvariance,
    },
}

impl FilterSpec {
    /// Parse the parameter block of filter type `name`.
    ///
    /// # Errors
    ///
    /// * `UnknownFilter` - `name` is not a supported filter type
    /// * `MissingParameter` - a required key is absent
    /// * `Parameter` - a key has the wrong type or an invalid value
    pub fn parse(name: &str, block: &ParamBlock) -> TextureResult<Self> {
        let kind = FilterKind::from_name(name)?;
        let p = Params { kind, block };
        let spec = match kind {
            FilterKind::Original => FilterSpec::Original,
            FilterKind::Sobel => FilterSpec::Sobel,
            FilterKind::Mean => FilterSpec::Mean(MeanParams {
                kernel_size: p.usize3("KernelSize")?,
                absolute: p.flag("Absolute")?.unwrap_or(false),
                border: p.border()?,
            }),
            FilterKind::Log => FilterSpec::Log(LogParams {
                sigma_mm: p.f64x3("Sigma_mm")?,
                cutoff_mm: p.f64x3("CutOff_mm")?,
                voxel_size_mm: p.f64x3(VOXEL_SIZE_KEY)?,
                border: p.border()?,
            }),
            FilterKind::Gabor => FilterSpec::Gabor(p.gabor()?),
            FilterKind::Gabor3d => FilterSpec::Gabor3d(Gabor3dParams {
                gabor: p.gabor()?,
                plane_aggregation: p.aggregation("PlaneAggregation")?,
            }),
            FilterKind::Laws => FilterSpec::Laws(p.laws()?),
            FilterKind::RotationInvariantLaws => FilterSpec::RotationInvariantLaws {
                laws: p.laws()?,
                rotation: p.rotation()?,
            },
            FilterKind::LawsEnergy => FilterSpec::LawsEnergy {
                laws: p.laws()?,
                energy: p.energy()?,
            },
            FilterKind::RotationInvariantLawsEnergy => FilterSpec::RotationInvariantLawsEnergy {
                laws: p.laws()?,
                energy: p.energy()?,
                rotation: p.rotation()?,
            },
        };
        Ok(spec)
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            FilterSpec::Original => FilterKind::Original,
            FilterSpec::Mean(_) => FilterKind::Mean,
            FilterSpec::Sobel => FilterKind::Sobel,
            FilterSpec::Log(_) => FilterKind::Log,
            FilterSpec::Gabor(_) => FilterKind::Gabor,
            FilterSpec::Gabor3d(_) => FilterKind::Gabor3d,
            FilterSpec::Laws(_) => FilterKind::Laws,
            FilterSpec::RotationInvariantLaws { .. } => FilterKind::RotationInvariantLaws,
            FilterSpec::LawsEnergy { .. } => FilterKind::LawsEnergy,
            FilterSpec::RotationInvariantLawsEnergy { .. } => {
                FilterKind::RotationInvariantLawsEnergy
            }
        }
    }
}

/// Typed accessors over one parameter block
struct Params<'a> {
    kind: FilterKind,
    block: &'a ParamBlock,
}

impl Params<'_> {
    fn missing(&self, key: &str) -> TextureError {
        TextureError::MissingParameter {
            filter: self.kind.name().to_string(),
            key: key.to_string(),
        }
    }

    fn invalid(&self, key: &str, reason: impl fmt::Display) -> TextureError {
        TextureError::Parameter {
            filter: self.kind.name().to_string(),
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    fn required(&self, key: &str) -> TextureResult<&Value> {
        self.block.get(key).ok_or_else(|| self.missing(key))
    }

    fn number(&self, key: &str, v: &Value) -> TextureResult<f64> {
        v.as_f64()
            .ok_or_else(|| self.invalid(key, format!("expected a number, got {v}")))
    }

    fn scalar(&self, key: &str) -> TextureResult<f64> {
        self.number(key, self.required(key)?)
    }

    /// A number or a list of numbers
    fn f64_list(&self, key: &str) -> TextureResult<Vec<f64>> {
        match self.required(key)? {
            Value::Array(items) => items.iter().map(|v| self.number(key, v)).collect(),
            v => Ok(vec![self.number(key, v)?]),
        }
    }

    /// Three numbers, or one number used for all three axes
    fn f64x3(&self, key: &str) -> TextureResult<[f64; 3]> {
        let values = self.f64_list(key)?;
        match values.as_slice() {
            [v] => Ok([*v; 3]),
            [a, b, c] => Ok([*a, *b, *c]),
            _ => Err(self.invalid(key, format!("expected 3 values, got {}", values.len()))),
        }
    }

    fn usize3(&self, key: &str) -> TextureResult<[usize; 3]> {
        let values = self.f64x3(key)?;
        let mut out = [0usize; 3];
        for (o, v) in out.iter_mut().zip(values) {
            if v < 0.0 || v.fract() != 0.0 {
                return Err(self.invalid(key, format!("expected non-negative integers, got {v}")));
            }
            *o = v as usize;
        }
        Ok(out)
    }

    fn string(&self, key: &str) -> TextureResult<&str> {
        let v = self.required(key)?;
        v.as_str()
            .ok_or_else(|| self.invalid(key, format!("expected a string, got {v}")))
    }

    /// Optional flag given as a boolean, `"yes"`/`"no"`, `"true"`/`"false"`
    /// or `0`/`1`.
    fn flag(&self, key: &str) -> TextureResult<Option<bool>> {
        let Some(v) = self.block.get(key) else {
            return Ok(None);
        };
        let flag = match v {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "yes" | "true" => Some(true),
                "no" | "false" => Some(false),
                _ => None,
            },
            Value::Number(n) => n.as_f64().map(|x| x != 0.0),
            _ => None,
        };
        flag.map(Some)
            .ok_or_else(|| self.invalid(key, format!("expected yes/no, got {v}")))
    }

    fn aggregation(&self, key: &str) -> TextureResult<Aggregation> {
        self.string(key)?
            .parse()
            .map_err(|e| self.invalid(key, e))
    }

    fn optional_aggregation(&self, key: &str) -> TextureResult<Option<Aggregation>> {
        if self.block.contains(key) {
            self.aggregation(key).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Boundary rule taken from the injected `Padding` descriptor.
    ///
    /// A fixed padding method is used as the kernel's border rule; a bare
    /// size vector, `expand`, `none` or an absent descriptor mean replicate.
    fn border(&self) -> TextureResult<BorderMode> {
        let Some(v) = self.block.get(PADDING_KEY) else {
            return Ok(BorderMode::Replicate);
        };
        match v {
            Value::Object(map) => {
                let enabled = map.get("Flag").and_then(Value::as_bool).unwrap_or(true);
                match map.get("Method") {
                    Some(Value::String(method)) if enabled => {
                        match method.trim().to_lowercase().as_str() {
                            "none" | "expand" => Ok(BorderMode::Replicate),
                            other => other.parse().map_err(|e| self.invalid(PADDING_KEY, e)),
                        }
                    }
                    Some(Value::String(_)) | None => Ok(BorderMode::Replicate),
                    Some(other) => Err(self.invalid(
                        PADDING_KEY,
                        format!("expected a method name, got {other}"),
                    )),
                }
            }
            Value::Array(_) | Value::Number(_) => Ok(BorderMode::Replicate),
            other => Err(self.invalid(
                PADDING_KEY,
                format!("expected a padding descriptor, got {other}"),
            )),
        }
    }

    fn gabor(&self) -> TextureResult<GaborParams> {
        let voxel = self.f64x3(VOXEL_SIZE_KEY)?;
        if !voxel.iter().all(|v| v.is_finite() && *v > 0.0) {
            return Err(self.invalid(VOXEL_SIZE_KEY, "voxel size must be positive"));
        }
        let radius = match self.block.get("Radius_mm") {
            None => None,
            Some(_) => {
                let r = self.f64_list("Radius_mm")?;
                let [ry, rx] = match r.as_slice() {
                    [v] => [*v, *v],
                    [a, b] => [*a, *b],
                    _ => {
                        return Err(self.invalid(
                            "Radius_mm",
                            format!("expected 1 or 2 values, got {}", r.len()),
                        ));
                    }
                };
                if ry < 0.0 || rx < 0.0 {
                    return Err(self.invalid("Radius_mm", "radius must not be negative"));
                }
                Some([
                    (ry / voxel[0]).round() as usize,
                    (rx / voxel[1]).round() as usize,
                ])
            }
        };
        Ok(GaborParams {
            sigma: self.scalar("Sigma_mm")? / voxel[0],
            wavelength: self.scalar("Wavlength_mm")? / voxel[0],
            gamma: self.scalar("SpatialAspectRatio")?,
            orientations: self.f64_list("Orientation")?,
            orientation_aggregation: self.optional_aggregation("OrientationAggregation")?,
            radius,
            border: self.border()?,
        })
    }

    fn laws(&self) -> TextureResult<LawsParams> {
        Ok(LawsParams {
            direction: self
                .string("Direction")?
                .parse()
                .map_err(|e| self.invalid("Direction", e))?,
            kind: self
                .string("Type")?
                .parse()
                .map_err(|e| self.invalid("Type", e))?,
            normalize: self.flag("Normalize")?.unwrap_or(false),
            border: self.border()?,
        })
    }

    /// `RotationInvariance: {"Dim": "2D" | "3D", "AggregationMethod": "max" | "average"}`
    fn rotation(&self) -> TextureResult<RotationInvariance> {
        const KEY: &str = "RotationInvariance";
        let Value::Object(map) = self.required(KEY)? else {
            return Err(self.invalid(KEY, "expected an object"));
        };
        let field = |name: &str| {
            map.get(name)
                .and_then(Value::as_str)
                .ok_or_else(|| self.invalid(KEY, format!("missing string field '{name}'")))
        };
        let dim: LawsDirection = field("Dim")?.parse().map_err(|e| self.invalid(KEY, e))?;
        if dim == LawsDirection::All {
            return Err(self.invalid(KEY, "Dim must be 2D or 3D"));
        }
        let aggregation = field("AggregationMethod")?
            .parse()
            .map_err(|e| self.invalid(KEY, e))?;
        Ok(RotationInvariance { dim, aggregation })
    }

    fn energy(&self) -> TextureResult<EnergyParams> {
        Ok(EnergyParams {
            kernel_size: self.usize3("EnergyKernelSize")?,
            pad_size: self.usize3("EnergyPadSize")?,
            pad_method: self
                .string("EnergyPadMethod")?
                .parse()
                .map_err(|e| self.invalid("EnergyPadMethod", e))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radtex_filter::LawsType;
    use serde_json::json;

    fn block(v: Value) -> ParamBlock {
        match v {
            Value::Object(map) => ParamBlock::from(map),
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_filter_names() {
        assert_eq!(FilterKind::from_name(" LoG ").unwrap(), FilterKind::Log);
        assert_eq!(
            FilterKind::from_name("RotationInvariantLawsEnergy").unwrap(),
            FilterKind::RotationInvariantLawsEnergy
        );
        let err = FilterKind::from_name("wavelets").unwrap_err();
        assert!(matches!(err, TextureError::UnknownFilter(n) if n == "wavelets"));
    }

    #[test]
    fn test_mean_params() {
        let spec = FilterSpec::parse(
            "Mean",
            &block(json!({"KernelSize": [3, 5, 1], "Absolute": "yes"})),
        )
        .unwrap();
        let FilterSpec::Mean(p) = spec else {
            panic!("expected mean");
        };
        assert_eq!(p.kernel_size, [3, 5, 1]);
        assert!(p.absolute);

        let spec = FilterSpec::parse("mean", &block(json!({"KernelSize": 3}))).unwrap();
        assert_eq!(
            spec,
            FilterSpec::Mean(MeanParams {
                kernel_size: [3, 3, 3],
                absolute: false,
                border: BorderMode::Replicate,
            })
        );

        let err = FilterSpec::parse("mean", &block(json!({}))).unwrap_err();
        assert!(matches!(
            err,
            TextureError::MissingParameter { ref filter, ref key }
                if filter == "mean" && key == "KernelSize"
        ));
        let err =
            FilterSpec::parse("mean", &block(json!({"KernelSize": [3, 3]}))).unwrap_err();
        assert!(matches!(err, TextureError::Parameter { .. }));
    }

    #[test]
    fn test_gabor_unit_conversion() {
        let spec = FilterSpec::parse(
            "gabor",
            &block(json!({
                "Sigma_mm": 4.0,
                "Wavlength_mm": 8.0,
                "SpatialAspectRatio": 0.5,
                "Orientation": [0, 90],
                "Radius_mm": 6.0,
                "VoxelSize_mm": [2.0, 3.0, 5.0],
                "OrientationAggregation": "max"
            })),
        )
        .unwrap();
        let FilterSpec::Gabor(p) = spec else {
            panic!("expected gabor");
        };
        assert_eq!(p.sigma, 2.0);
        assert_eq!(p.wavelength, 4.0);
        assert_eq!(p.orientations, vec![0.0, 90.0]);
        assert_eq!(p.radius, Some([3, 2]));
        assert_eq!(p.orientation_aggregation, Some(Aggregation::Max));

        let err = FilterSpec::parse(
            "gabor3d",
            &block(json!({
                "Sigma_mm": 4.0,
                "Wavlength_mm": 8.0,
                "SpatialAspectRatio": 0.5,
                "Orientation": 45,
                "VoxelSize_mm": [1.0, 1.0, 1.0]
            })),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TextureError::MissingParameter { ref key, .. } if key == "PlaneAggregation"
        ));
    }

    #[test]
    fn test_laws_params() {
        let spec = FilterSpec::parse(
            "RotationInvariantLaws",
            &block(json!({
                "Direction": "3D",
                "Type": "L5E5E5",
                "Normalize": "no",
                "RotationInvariance": {"Dim": "3D", "AggregationMethod": "max"}
            })),
        )
        .unwrap();
        let FilterSpec::RotationInvariantLaws { laws, rotation } = spec else {
            panic!("expected rotation-invariant laws");
        };
        assert!(!laws.normalize);
        assert!(matches!(laws.kind, LawsType::Named(ref c) if c.name() == "L5E5E5"));
        assert_eq!(rotation.aggregation, Aggregation::Max);

        let params = block(json!({"Direction": "4D", "Type": "L5E5E5"}));
        let err = FilterSpec::parse("laws", &params).unwrap_err();
        assert!(matches!(err, TextureError::Parameter { ref key, .. } if key == "Direction"));
    }

    #[test]
    fn test_padding_border() {
        let base = json!({"KernelSize": 3});
        let with = |padding: Value| {
            let mut b = block(base.clone());
            b.insert(PADDING_KEY, padding);
            match FilterSpec::parse("mean", &b).unwrap() {
                FilterSpec::Mean(p) => p.border,
                _ => unreachable!(),
            }
        };
        assert_eq!(
            with(json!({"Size": [2, 2, 2], "Method": "mirror", "Flag": true})),
            BorderMode::Mirror
        );
        assert_eq!(
            with(json!({"Size": [2, 2, 2], "Method": "padzeros", "Flag": false})),
            BorderMode::Replicate
        );
        assert_eq!(
            with(json!({"Size": [2, 2, 2], "Method": "expand", "Flag": true})),
            BorderMode::Replicate
        );
        assert_eq!(with(json!([2, 2, 2])), BorderMode::Replicate);
    }
}
