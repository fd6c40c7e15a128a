//! Scan storage
//!
//! [`ScanStore`] is what the texture mapper needs from the container that
//! holds scans and structures: look up a structure's scan, read scan voxels
//! and coordinates, rasterize a structure, and register derived maps.
//! [`MemoryStore`] keeps everything in memory.

use log::info;
use radtex_core::{Grid, Mask, Shape, Volume};

use crate::error::{TextureError, TextureResult};

/// A run of structure voxels along one row: columns
/// `col_start..=col_end` of `row` in `slice`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterSegment {
    pub slice: usize,
    pub row: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl RasterSegment {
    pub fn new(slice: usize, row: usize, col_start: usize, col_end: usize) -> Self {
        Self {
            slice,
            row,
            col_start,
            col_end,
        }
    }
}

/// A texture map registered as a new scan
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedScan {
    /// Filter type that produced the map
    pub label: String,
    /// Output name of the filter (`mean`, `SobelMag`, ...)
    pub output: String,
    /// Scan the map was computed from
    pub source_scan: usize,
    pub volume: Volume<f64>,
    pub grid: Grid,
    /// Slices of the cropped mask with foreground voxels
    pub foreground_slices: Vec<usize>,
}

/// Container of scans and structures
pub trait ScanStore {
    /// Scan a structure was delineated on
    fn structure_scan(&self, structure: usize) -> TextureResult<usize>;

    fn scan_image(&self, scan: usize) -> TextureResult<&Volume<f64>>;

    fn scan_grid(&self, scan: usize) -> TextureResult<&Grid>;

    fn structure_segments(&self, structure: usize) -> TextureResult<&[RasterSegment]>;

    /// Append a derived map, returning its index. Existing entries are never
    /// modified.
    fn import_derived(&mut self, derived: DerivedScan) -> TextureResult<usize>;
}

/// Build a mask of `shape` from raster segments.
///
/// # Returns
///
/// The mask and the sorted, de-duplicated slices covered by the segments.
///
/// # Errors
///
/// Returns `TextureError::Geometry` for a segment outside `shape` or with
/// `col_start > col_end`.
pub fn rasterize(segments: &[RasterSegment], shape: Shape) -> TextureResult<(Mask, Vec<usize>)> {
    let mut mask = Mask::new(shape.rows, shape.cols, shape.slices)?;
    let mut slices = Vec::new();
    for seg in segments {
        if seg.slice >= shape.slices
            || seg.row >= shape.rows
            || seg.col_end >= shape.cols
            || seg.col_start > seg.col_end
        {
            return Err(TextureError::Geometry(format!(
                "raster segment {seg:?} does not fit a {shape} scan"
            )));
        }
        for col in seg.col_start..=seg.col_end {
            mask.set_unchecked(seg.row, col, seg.slice, true);
        }
        slices.push(seg.slice);
    }
    slices.sort_unstable();
    slices.dedup();
    Ok((mask, slices))
}

#[derive(Debug, Clone, PartialEq)]
struct StoredScan {
    image: Volume<f64>,
    grid: Grid,
}

#[derive(Debug, Clone, PartialEq)]
struct StoredStructure {
    name: String,
    scan: usize,
    segments: Vec<RasterSegment>,
}

/// In-memory [`ScanStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scans: Vec<StoredScan>,
    structures: Vec<StoredStructure>,
    derived: Vec<DerivedScan>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scan and return its index.
    ///
    /// # Errors
    ///
    /// Returns `TextureError::Geometry` if the grid does not match the
    /// image shape.
    pub fn add_scan(&mut self, image: Volume<f64>, grid: Grid) -> TextureResult<usize> {
        grid.check_shape(image.shape())
            .map_err(|e| TextureError::Geometry(e.to_string()))?;
        self.scans.push(StoredScan { image, grid });
        Ok(self.scans.len() - 1)
    }

    /// Add a structure on `scan` and return its index.
    pub fn add_structure(
        &mut self,
        name: impl Into<String>,
        scan: usize,
        segments: Vec<RasterSegment>,
    ) -> TextureResult<usize> {
        let shape = self.scan_image(scan)?.shape();
        rasterize(&segments, shape)?;
        self.structures.push(StoredStructure {
            name: name.into(),
            scan,
            segments,
        });
        Ok(self.structures.len() - 1)
    }

    /// Index of the first structure called `name`
    pub fn find_structure(&self, name: &str) -> Option<usize> {
        self.structures.iter().position(|s| s.name == name)
    }

    pub fn scan_count(&self) -> usize {
        self.scans.len()
    }

    /// Derived maps in registration order
    pub fn derived(&self) -> &[DerivedScan] {
        &self.derived
    }

    fn structure(&self, structure: usize) -> TextureResult<&StoredStructure> {
        self.structures
            .get(structure)
            .ok_or_else(|| TextureError::Store(format!("no structure with index {structure}")))
    }

    fn scan(&self, scan: usize) -> TextureResult<&StoredScan> {
        self.scans
            .get(scan)
            .ok_or_else(|| TextureError::Store(format!("no scan with index {scan}")))
    }
}

impl ScanStore for MemoryStore {
    fn structure_scan(&self, structure: usize) -> TextureResult<usize> {
        Ok(self.structure(structure)?.scan)
    }

    fn scan_image(&self, scan: usize) -> TextureResult<&Volume<f64>> {
        Ok(&self.scan(scan)?.image)
    }

    fn scan_grid(&self, scan: usize) -> TextureResult<&Grid> {
        Ok(&self.scan(scan)?.grid)
    }

    fn structure_segments(&self, structure: usize) -> TextureResult<&[RasterSegment]> {
        Ok(&self.structure(structure)?.segments)
    }

    fn import_derived(&mut self, derived: DerivedScan) -> TextureResult<usize> {
        self.scan(derived.source_scan)?;
        derived
            .grid
            .check_shape(derived.volume.shape())
            .map_err(|e| TextureError::Geometry(e.to_string()))?;
        info!(
            "registered '{}' ({}) from scan {}: {}",
            derived.label,
            derived.output,
            derived.source_scan,
            derived.volume.shape()
        );
        self.derived.push(derived);
        Ok(self.derived.len() - 1)
    }
}
