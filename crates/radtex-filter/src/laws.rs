//! Laws texture filters
//!
//! A Laws filter is a separable product of short 1D kernels (`L3`, `E5`,
//! ...). A type string such as `E5L5S5` lists one kernel per axis, in the
//! order x (columns), y (rows), z (slices). Two-kernel types are applied in
//! the axial plane only.
//!
//! Rotation-invariant variants filter with every right-angle rotation of the
//! kernel and aggregate the responses. Energy variants replace a response by
//! the local mean of its absolute value.

use std::fmt;
use std::str::FromStr;

use log::debug;
use radtex_core::{Axis, BorderMode, Volume};

use crate::aggregate::Aggregation;
use crate::block_conv::blockconv;
use crate::convolve::convolve_separable;
use crate::kernel::Kernel1d;
use crate::{FilterError, FilterResult};

/// Axis filtered by the n-th kernel of a type string
const TYPE_AXES: [Axis; 3] = [Axis::Column, Axis::Row, Axis::Slice];

/// A single Laws 1D kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LawsKernel {
    L3,
    E3,
    S3,
    L5,
    E5,
    S5,
    R5,
    W5,
}

impl LawsKernel {
    pub const LENGTH_3: [LawsKernel; 3] = [LawsKernel::L3, LawsKernel::E3, LawsKernel::S3];
    pub const LENGTH_5: [LawsKernel; 5] = [
        LawsKernel::L5,
        LawsKernel::E5,
        LawsKernel::S5,
        LawsKernel::R5,
        LawsKernel::W5,
    ];

    /// Kernel taps
    pub fn taps(self) -> &'static [f64] {
        match self {
            LawsKernel::L3 => &[1.0, 2.0, 1.0],
            LawsKernel::E3 => &[-1.0, 0.0, 1.0],
            LawsKernel::S3 => &[-1.0, 2.0, -1.0],
            LawsKernel::L5 => &[1.0, 4.0, 6.0, 4.0, 1.0],
            LawsKernel::E5 => &[-1.0, -2.0, 0.0, 2.0, 1.0],
            LawsKernel::S5 => &[-1.0, 0.0, 2.0, 0.0, -1.0],
            LawsKernel::R5 => &[1.0, -4.0, 6.0, -4.0, 1.0],
            LawsKernel::W5 => &[-1.0, 2.0, 0.0, -2.0, 1.0],
        }
    }

    fn kernel(self, normalize: bool) -> FilterResult<Kernel1d> {
        let mut k = Kernel1d::from_slice(self.taps())?;
        if normalize {
            k.normalize_l2();
        }
        Ok(k)
    }
}

impl fmt::Display for LawsKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl FromStr for LawsKernel {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "L3" => Ok(LawsKernel::L3),
            "E3" => Ok(LawsKernel::E3),
            "S3" => Ok(LawsKernel::S3),
            "L5" => Ok(LawsKernel::L5),
            "E5" => Ok(LawsKernel::E5),
            "S5" => Ok(LawsKernel::S5),
            "R5" => Ok(LawsKernel::R5),
            "W5" => Ok(LawsKernel::W5),
            other => Err(FilterError::InvalidParameters(format!("unknown Laws kernel '{other}'"))),
        }
    }
}

/// Kernels per axis of one Laws filter, x first
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LawsCombination(Vec<LawsKernel>);

impl LawsCombination {
    /// # Errors
    ///
    /// Fails unless there are two or three kernels.
    pub fn new(kernels: Vec<LawsKernel>) -> FilterResult<Self> {
        if !(2..=3).contains(&kernels.len()) {
            return Err(FilterError::InvalidParameters(format!(
                "a Laws type needs 2 or 3 kernels, got {}",
                kernels.len()
            )));
        }
        Ok(Self(kernels))
    }

    pub fn kernels(&self) -> &[LawsKernel] {
        &self.0
    }

    /// 2 for in-plane filters, 3 for volumetric ones
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// Type string, e.g. `E5L5S5`
    pub fn name(&self) -> String {
        self.0.iter().map(LawsKernel::to_string).collect()
    }
}

impl FromStr for LawsCombination {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        let s = s.trim();
        if !s.is_ascii() || s.len() % 2 != 0 {
            return Err(FilterError::InvalidParameters(format!("malformed Laws type '{s}'")));
        }
        let kernels = (0..s.len())
            .step_by(2)
            .map(|i| s[i..i + 2].parse())
            .collect::<FilterResult<Vec<_>>>()?;
        Self::new(kernels)
    }
}

/// Which filters a Laws type covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LawsDirection {
    TwoD,
    ThreeD,
    All,
}

impl LawsDirection {
    fn accepts(self, dim: usize) -> bool {
        match self {
            LawsDirection::TwoD => dim == 2,
            LawsDirection::ThreeD => dim == 3,
            LawsDirection::All => true,
        }
    }

    fn dims(self) -> &'static [usize] {
        match self {
            LawsDirection::TwoD => &[2],
            LawsDirection::ThreeD => &[3],
            LawsDirection::All => &[2, 3],
        }
    }
}

impl FromStr for LawsDirection {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "2d" => Ok(LawsDirection::TwoD),
            "3d" => Ok(LawsDirection::ThreeD),
            "all" => Ok(LawsDirection::All),
            other => Err(FilterError::InvalidParameters(format!(
                "unknown Laws direction '{other}'"
            ))),
        }
    }
}

/// A single Laws type or every type of the direction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LawsType {
    Named(LawsCombination),
    All,
}

impl FromStr for LawsType {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(LawsType::All)
        } else {
            s.parse().map(LawsType::Named)
        }
    }
}

/// Parameters shared by all Laws filters
#[derive(Debug, Clone, PartialEq)]
pub struct LawsParams {
    pub direction: LawsDirection,
    pub kind: LawsType,
    /// Scale every 1D kernel to unit L2 norm
    pub normalize: bool,
    pub border: BorderMode,
}

impl LawsParams {
    /// Kernel combinations to run, in a fixed order.
    ///
    /// `All` expands to every combination of length-3 kernels and every
    /// combination of length-5 kernels for each dimension of the direction.
    pub fn combinations(&self) -> FilterResult<Vec<LawsCombination>> {
        match &self.kind {
            LawsType::Named(combo) => {
                if !self.direction.accepts(combo.dim()) {
                    return Err(FilterError::InvalidParameters(format!(
                        "Laws type {} does not match direction {:?}",
                        combo.name(),
                        self.direction
                    )));
                }
                Ok(vec![combo.clone()])
            }
            LawsType::All => {
                let mut out = Vec::new();
                for &dim in self.direction.dims() {
                    for family in [&LawsKernel::LENGTH_3[..], &LawsKernel::LENGTH_5[..]] {
                        product(family, dim, &mut Vec::new(), &mut out);
                    }
                }
                Ok(out)
            }
        }
    }

    fn named(&self) -> FilterResult<&LawsCombination> {
        match &self.kind {
            LawsType::Named(combo) => Ok(combo),
            LawsType::All => Err(FilterError::InvalidParameters(
                "rotation invariance needs a single Laws type".into(),
            )),
        }
    }
}

fn product(
    family: &[LawsKernel],
    dim: usize,
    prefix: &mut Vec<LawsKernel>,
    out: &mut Vec<LawsCombination>,
) {
    if prefix.len() == dim {
        out.push(LawsCombination(prefix.clone()));
        return;
    }
    for &k in family {
        prefix.push(k);
        product(family, dim, prefix, out);
        prefix.pop();
    }
}

/// Rotation invariance settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotationInvariance {
    /// `TwoD` rotates in the axial plane, `ThreeD` over the whole volume
    pub dim: LawsDirection,
    pub aggregation: Aggregation,
}

/// Local energy settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyParams {
    /// Averaging neighbourhood `(rows, cols, slices)`, each odd
    pub kernel_size: [usize; 3],
    /// Border added before averaging
    pub pad_size: [usize; 3],
    pub pad_method: BorderMode,
}

/// A right-angle rotation: the n-th kernel moves to type axis `perm[n]`,
/// reversed when `flip[n]` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rotation {
    perm: [usize; 3],
    flip: [bool; 3],
}

impl Rotation {
    const IDENTITY: Rotation = Rotation {
        perm: [0, 1, 2],
        flip: [false; 3],
    };

    /// Proper rotations mapping the axis set onto itself: 4 in the plane,
    /// 24 in the volume.
    fn all(dim: LawsDirection) -> FilterResult<Vec<Rotation>> {
        const PERMS: [([usize; 3], bool); 6] = [
            ([0, 1, 2], true),
            ([1, 0, 2], false),
            ([0, 2, 1], false),
            ([2, 1, 0], false),
            ([1, 2, 0], true),
            ([2, 0, 1], true),
        ];
        let planar = match dim {
            LawsDirection::TwoD => true,
            LawsDirection::ThreeD => false,
            LawsDirection::All => {
                return Err(FilterError::InvalidParameters(
                    "rotation invariance dimension must be 2D or 3D".into(),
                ));
            }
        };
        let mut out = Vec::new();
        for (perm, even) in PERMS {
            if planar && perm[2] != 2 {
                continue;
            }
            for bits in 0..8u8 {
                let flip = [bits & 1 != 0, bits & 2 != 0, bits & 4 != 0];
                if planar && flip[2] {
                    continue;
                }
                let flips = flip.iter().filter(|&&f| f).count();
                if (flips % 2 == 0) == even {
                    out.push(Rotation { perm, flip });
                }
            }
        }
        Ok(out)
    }
}

fn apply_combination(
    image: &Volume<f64>,
    combo: &LawsCombination,
    rotation: Rotation,
    normalize: bool,
    border: BorderMode,
) -> FilterResult<Volume<f64>> {
    let mut kernels: [Option<Kernel1d>; 3] = [None, None, None];
    for (n, &kind) in combo.kernels().iter().enumerate() {
        let mut k = kind.kernel(normalize)?;
        if rotation.flip[n] {
            k = k.reversed();
        }
        kernels[TYPE_AXES[rotation.perm[n]].index()] = Some(k);
    }
    Ok(convolve_separable(
        image,
        [
            kernels[0].as_ref(),
            kernels[1].as_ref(),
            kernels[2].as_ref(),
        ],
        border,
    ))
}

/// Apply every Laws filter selected by `params`.
///
/// # Returns
///
/// One response per kernel combination, named by its type string.
pub fn laws_filter(
    image: &Volume<f64>,
    params: &LawsParams,
) -> FilterResult<Vec<(String, Volume<f64>)>> {
    let combos = params.combinations()?;
    debug!("laws: {} kernel combinations", combos.len());
    combos
        .iter()
        .map(|combo| {
            let r = apply_combination(
                image,
                combo,
                Rotation::IDENTITY,
                params.normalize,
                params.border,
            )?;
            Ok((combo.name(), r))
        })
        .collect()
}

/// Aggregate a single Laws filter over all right-angle rotations.
///
/// # Errors
///
/// Fails for the `all` type and for a 3D rotation of an in-plane type.
pub fn rotation_invariant_laws(
    image: &Volume<f64>,
    params: &LawsParams,
    rotation: &RotationInvariance,
) -> FilterResult<Volume<f64>> {
    let combo = params.named()?;
    params.combinations()?;
    if rotation.dim == LawsDirection::ThreeD && combo.dim() == 2 {
        return Err(FilterError::InvalidParameters(format!(
            "cannot rotate in-plane Laws type {} in 3D",
            combo.name()
        )));
    }
    let rotations = Rotation::all(rotation.dim)?;
    debug!(
        "rotation-invariant laws {}: {} rotations, {}",
        combo.name(),
        rotations.len(),
        rotation.aggregation
    );
    let responses = rotations
        .into_iter()
        .map(|rot| apply_combination(image, combo, rot, params.normalize, params.border))
        .collect::<FilterResult<Vec<_>>>()?;
    rotation.aggregation.combine(responses)
}

/// Local mean of `|response|`.
///
/// The absolute response is padded by `pad_size` with `pad_method`, averaged
/// over `kernel_size` and the padding is removed again.
pub fn energy_map(response: &Volume<f64>, energy: &EnergyParams) -> FilterResult<Volume<f64>> {
    let [kr, kc, ks] = energy.kernel_size;
    let kernels = [
        Kernel1d::box_kernel(kr)?,
        Kernel1d::box_kernel(kc)?,
        Kernel1d::box_kernel(ks)?,
    ];
    let padded = response
        .abs()
        .add_border(energy.pad_size, energy.pad_method)?;
    let mean = blockconv(&padded, &kernels, BorderMode::Zero);
    Ok(mean.remove_border(energy.pad_size)?)
}

/// Laws energy maps, named `<type>_Energy`.
pub fn laws_energy(
    image: &Volume<f64>,
    params: &LawsParams,
    energy: &EnergyParams,
) -> FilterResult<Vec<(String, Volume<f64>)>> {
    laws_filter(image, params)?
        .into_iter()
        .map(|(name, r)| Ok((format!("{name}_Energy"), energy_map(&r, energy)?)))
        .collect()
}

/// Energy map of the rotation-invariant Laws response.
pub fn rotation_invariant_laws_energy(
    image: &Volume<f64>,
    params: &LawsParams,
    energy: &EnergyParams,
    rotation: &RotationInvariance,
) -> FilterResult<Volume<f64>> {
    let r = rotation_invariant_laws(image, params, rotation)?;
    energy_map(&r, energy)
}
