//! Aggregation of several responses into one map

use std::fmt;
use std::str::FromStr;

use radtex_core::Volume;

use crate::{FilterError, FilterResult};

/// How responses over orientations, planes or rotations are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregation {
    /// Voxel-wise mean
    Average,
    /// Voxel-wise maximum
    Max,
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Average => write!(f, "avg"),
            Aggregation::Max => write!(f, "max"),
        }
    }
}

impl FromStr for Aggregation {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "average" | "avg" | "mean" => Ok(Aggregation::Average),
            "max" | "maximum" => Ok(Aggregation::Max),
            other => Err(FilterError::InvalidParameters(format!(
                "unknown aggregation method '{other}'"
            ))),
        }
    }
}

impl Aggregation {
    /// Combine `responses` voxel by voxel.
    ///
    /// # Errors
    ///
    /// Fails on an empty input or on responses of different shapes.
    pub fn combine<I>(self, responses: I) -> FilterResult<Volume<f64>>
    where
        I: IntoIterator<Item = Volume<f64>>,
    {
        let mut iter = responses.into_iter();
        let Some(mut acc) = iter.next() else {
            return Err(FilterError::InvalidParameters("nothing to aggregate".into()));
        };
        let mut n = 1usize;
        for vol in iter {
            match self {
                Aggregation::Average => acc.add_assign(&vol)?,
                Aggregation::Max => acc.max_assign(&vol)?,
            }
            n += 1;
        }
        if self == Aggregation::Average {
            acc.mul_constant(1.0 / n as f64);
        }
        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            "Average".parse::<Aggregation>().unwrap(),
            Aggregation::Average
        );
        assert_eq!(" max ".parse::<Aggregation>().unwrap(), Aggregation::Max);
        assert!("median".parse::<Aggregation>().is_err());
    }

    #[test]
    fn test_combine() {
        let a = Volume::from_data(1, 2, 1, vec![1.0, 4.0]).unwrap();
        let b = Volume::from_data(1, 2, 1, vec![3.0, 2.0]).unwrap();
        let avg = Aggregation::Average
            .combine([a.clone(), b.clone()])
            .unwrap();
        assert_eq!(avg.data(), &[2.0, 3.0]);
        let max = Aggregation::Max.combine([a, b]).unwrap();
        assert_eq!(max.data(), &[3.0, 4.0]);
        assert!(Aggregation::Max.combine(Vec::new()).is_err());
    }
}
