//! Pipeline failure-mode regression test
//!
//! Geometry mismatches abort the run, parameter problems surface as typed
//! errors, and a region that vanishes after crop-back is still registered.

use radtex_core::{BorderMode, Grid, Mask, Shape, Volume};
use radtex_filter::{
    EnergyParams, FilterResult, Gabor3dParams, GaborParams, LawsParams, LogParams, MeanParams,
    NamedVolumes, RotationInvariance, SobelResponse, StandardKernels, TextureKernels,
};
use radtex_io::SettingsDocument;
use radtex_test::{RegParams, phantom};
use radtex_texture::{
    CropPadPreprocessor, MemoryStore, Preprocessed, Preprocessor, RasterSegment, Region,
    TextureError, TextureMapper, TextureResult,
};

/// Standard kernels, except that the mean map comes back one voxel too wide
struct OversizedMean(StandardKernels);

impl TextureKernels for OversizedMean {
    fn mean(&self, image: &Volume<f64>, params: &MeanParams) -> FilterResult<Volume<f64>> {
        let out = self.0.mean(image, params)?;
        Ok(out.add_border([0, 1, 0], BorderMode::Zero)?)
    }

    fn sobel(&self, image: &Volume<f64>) -> FilterResult<SobelResponse> {
        self.0.sobel(image)
    }

    fn log(&self, image: &Volume<f64>, params: &LogParams) -> FilterResult<Volume<f64>> {
        self.0.log(image, params)
    }

    fn gabor(&self, image: &Volume<f64>, params: &GaborParams) -> FilterResult<NamedVolumes> {
        self.0.gabor(image, params)
    }

    fn gabor3d(&self, image: &Volume<f64>, params: &Gabor3dParams) -> FilterResult<NamedVolumes> {
        self.0.gabor3d(image, params)
    }

    fn laws(&self, image: &Volume<f64>, params: &LawsParams) -> FilterResult<NamedVolumes> {
        self.0.laws(image, params)
    }

    fn rotation_invariant_laws(
        &self,
        image: &Volume<f64>,
        params: &LawsParams,
        rotation: &RotationInvariance,
    ) -> FilterResult<Volume<f64>> {
        self.0.rotation_invariant_laws(image, params, rotation)
    }

    fn laws_energy(
        &self,
        image: &Volume<f64>,
        params: &LawsParams,
        energy: &EnergyParams,
    ) -> FilterResult<NamedVolumes> {
        self.0.laws_energy(image, params, energy)
    }

    fn rotation_invariant_laws_energy(
        &self,
        image: &Volume<f64>,
        params: &LawsParams,
        energy: &EnergyParams,
        rotation: &RotationInvariance,
    ) -> FilterResult<Volume<f64>> {
        self.0
            .rotation_invariant_laws_energy(image, params, energy, rotation)
    }
}

/// Leaves the scan untouched and keeps only the corner voxel of the mask
struct CornerOnly;

impl Preprocessor for CornerOnly {
    fn preprocess(
        &self,
        image: &Volume<f64>,
        _mask: &Mask,
        grid: &Grid,
        _settings: &SettingsDocument,
    ) -> TextureResult<Preprocessed> {
        let shape = image.shape();
        let mut mask = Mask::new(shape.rows, shape.cols, shape.slices)?;
        mask.set_unchecked(0, 0, 0, true);
        Ok(Preprocessed {
            image: image.clone(),
            morph_mask: mask.clone(),
            mask,
            grid: grid.clone(),
        })
    }
}

fn store(shape: Shape) -> (MemoryStore, usize) {
    let mut store = MemoryStore::new();
    let scan = store
        .add_scan(
            phantom::texture(shape).expect("texture phantom"),
            phantom::grid(shape).expect("grid"),
        )
        .expect("add scan");
    let gtv = store
        .add_structure(
            "GTV",
            scan,
            vec![
                RasterSegment::new(2, 3, 2, 5),
                RasterSegment::new(3, 4, 3, 4),
            ],
        )
        .expect("add structure");
    (store, gtv)
}

fn settings(text: &str) -> SettingsDocument {
    SettingsDocument::from_json_str(text).expect("settings")
}

#[test]
fn pipeline_errors_reg() {
    let mut rp = RegParams::new("pipeline_errors");
    let shape = Shape::new(8, 8, 6);

    // --- Test 1: a misshapen filter output aborts before registration ---
    let (mut st, gtv) = store(shape);
    let doc = settings(
        r#"{"imageType": {"original": {}, "mean": {"KernelSize": 3}},
            "settings": {"padding": {"method": "expand", "size": 1}}}"#,
    );
    let mapper =
        TextureMapper::with_parts(OversizedMean(StandardKernels::default()), CropPadPreprocessor);
    let err = mapper
        .generate_with_settings(&mut st, Region::Structure(gtv), &doc)
        .unwrap_err();
    rp.compare_true(matches!(err, TextureError::Geometry(_)));
    // the original map ran first and stays registered
    rp.compare_values(1.0, st.derived().len() as f64, 0.0);
    rp.compare_true(st.derived()[0].output == "original");

    // --- Test 2: a region lost to crop-back is still registered ---
    let (mut st, gtv) = store(shape);
    let doc = settings(
        r#"{"imageType": {"mean": {"KernelSize": [3, 3, 1]}},
            "settings": {"padding": [{"method": "padzeros", "size": [1, 1, 1]}]}}"#,
    );
    let mapper = TextureMapper::with_parts(StandardKernels::default(), CornerOnly);
    let maps = mapper
        .generate_with_settings(&mut st, Region::Structure(gtv), &doc)
        .expect("generate");
    rp.compare_values(1.0, maps.len() as f64, 0.0);
    let derived = &st.derived()[0];
    rp.compare_shapes(Shape::new(6, 6, 4), derived.volume.shape());
    rp.compare_true(derived.foreground_slices.is_empty());
    rp.compare_true(derived.grid.check_shape(derived.volume.shape()).is_ok());

    // --- Test 3: parameter problems are typed ---
    let (mut st, gtv) = store(shape);
    let doc = settings(r#"{"imageType": {"mean": {"Absolute": true}}}"#);
    let err = TextureMapper::new()
        .generate_with_settings(&mut st, Region::Structure(gtv), &doc)
        .unwrap_err();
    rp.compare_true(matches!(
        err,
        TextureError::MissingParameter { ref filter, ref key }
            if filter == "mean" && key == "KernelSize"
    ));

    let doc = settings(r#"{"imageType": {"wavelets": {}}}"#);
    let err = TextureMapper::new()
        .generate_with_settings(&mut st, Region::Structure(gtv), &doc)
        .unwrap_err();
    rp.compare_true(matches!(err, TextureError::UnknownFilter(ref n) if n == "wavelets"));

    let doc = settings(
        r#"{"imageType": {"mean": {"KernelSize": 3}},
            "settings": {"padding": {"method": "bicubic", "size": 2}}}"#,
    );
    let err = TextureMapper::new()
        .generate_with_settings(&mut st, Region::Structure(gtv), &doc)
        .unwrap_err();
    rp.compare_true(matches!(err, TextureError::ConfigFormat(_)));
    rp.compare_values(0.0, st.derived().len() as f64, 0.0);

    // --- Test 4: region problems ---
    let small = Mask::new_with_value(8, 8, 5, true).expect("mask");
    let region = Region::Mask {
        scan: 0,
        mask: small,
    };
    let err = TextureMapper::new()
        .generate_with_settings(&mut st, region, &doc)
        .unwrap_err();
    rp.compare_true(matches!(err, TextureError::Geometry(_)));
    let err = TextureMapper::new()
        .generate_with_settings(&mut st, Region::Structure(9), &doc)
        .unwrap_err();
    rp.compare_true(matches!(err, TextureError::Store(_)));

    assert!(rp.cleanup(), "pipeline_errors regression test failed");
}
