//! Volume geometry regression test
//!
//! Exercises bounding boxes, border padding and crop windows together:
//! padding a region and then removing the padding must give back the region,
//! and coordinate vectors must follow the voxels.

use radtex_core::{Axis, BorderMode, BoundingBox, CropWindow, Mask, Shape};
use radtex_test::{RegParams, phantom};

#[test]
fn volume_reg() {
    let mut rp = RegParams::new("volume");
    let shape = Shape::new(8, 9, 5);
    let ramp = phantom::ramp(shape).expect("ramp phantom");
    let bbox = BoundingBox::new((2, 5), (3, 6), (1, 3)).expect("bbox");

    // --- Test 1: bounding box of a mask and its margins ---
    let mask = phantom::box_mask(shape, bbox).expect("box mask");
    rp.compare_true(BoundingBox::of_mask(&mask) == Some(bbox));
    rp.compare_true(BoundingBox::of_mask(&Mask::new(8, 9, 5).expect("mask")).is_none());
    rp.compare_true(bbox.margins(Axis::Row, shape).ok() == Some((2, 2)));
    rp.compare_true(bbox.margins(Axis::Column, shape).ok() == Some((3, 2)));
    rp.compare_true(bbox.margins(Axis::Slice, shape).ok() == Some((1, 1)));
    rp.compare_true(mask.foreground_slices() == vec![1, 2, 3]);

    // --- Test 2: expand then clamped removal gives back the region ---
    let grown = bbox.expand_within([1, 2, 1], shape);
    rp.compare_true(grown.as_array() == [1, 6, 1, 8, 0, 4]);
    let region = ramp.extract(&bbox).expect("extract");
    let padded = ramp.extract(&grown).expect("extract");
    let inner = BoundingBox::of_mask(&mask.extract(&grown).expect("extract")).expect("inner");
    let window = CropWindow::clamped([1, 2, 1], &inner, padded.shape()).expect("window");
    rp.compare_true(window.to_vector() == [1, 1, 2, 2, 1, 1]);
    rp.compare_volumes(&region, &padded.crop(&window).expect("crop"), 0.0);

    // growth is clamped at the far column and the low slice, and so is removal
    let grown = bbox.expand_within([3, 3, 3], shape);
    rp.compare_shapes(shape, grown.shape());
    let inner = BoundingBox::of_mask(&mask).expect("inner");
    let window = CropWindow::clamped([3, 3, 3], &inner, shape).expect("window");
    rp.compare_true(window.to_vector() == [2, 2, 3, 2, 1, 1]);
    rp.compare_volumes(&region, &ramp.crop(&window).expect("crop"), 0.0);

    // --- Test 3: border rules ---
    let pad = [1, 2, 1];
    let sample = |mode: BorderMode| -> f64 {
        let p = region.add_border(pad, mode).expect("add border");
        // row 3, column -2, slice 2 of the region
        p.get(1 + 3, 0, 1 + 2).expect("voxel")
    };
    let base = region.get(3, 0, 2).expect("voxel");
    rp.compare_values(0.0, sample(BorderMode::Zero), 0.0);
    rp.compare_values(base, sample(BorderMode::Replicate), 0.0);
    let mirrored = region.get(3, 1, 2).expect("voxel");
    let wrapped = region.get(3, 2, 2).expect("voxel");
    rp.compare_values(mirrored, sample(BorderMode::Mirror), 0.0);
    rp.compare_values(wrapped, sample(BorderMode::Circular), 0.0);
    for mode in [
        BorderMode::Zero,
        BorderMode::Replicate,
        BorderMode::Mirror,
        BorderMode::Circular,
    ] {
        let p = region.add_border(pad, mode).expect("add border");
        rp.compare_shapes(Shape::new(6, 8, 5), p.shape());
        rp.compare_volumes(&region, &p.remove_border(pad).expect("remove border"), 0.0);
        let window = CropWindow::fixed(pad);
        rp.compare_volumes(&region, &p.crop(&window).expect("crop"), 0.0);
    }
    rp.compare_true("padzeros".parse::<BorderMode>().ok() == Some(BorderMode::Zero));
    rp.compare_true("spline".parse::<BorderMode>().is_err());

    // --- Test 4: coordinates follow the crop ---
    let grid = phantom::grid(shape).expect("grid");
    let window = CropWindow::from_vector([2, 2, 3, 2, 1, 1]);
    let cropped = grid.crop(&window).expect("grid crop");
    rp.compare_true(cropped.check_shape(region.shape()).is_ok());
    rp.compare_true(cropped.x() == &grid.x()[3..=6]);
    rp.compare_true(cropped.y() == &grid.y()[2..=5]);
    rp.compare_true(cropped.z() == &grid.z()[1..=3]);
    rp.compare_true(grid.voxel_size_mm() == [1.0, 1.0, 2.0]);

    // --- Test 5: impossible windows are rejected ---
    rp.compare_true(ramp.crop(&CropWindow::fixed([0, 5, 0])).is_err());
    rp.compare_true(grid.crop(&CropWindow::fixed([4, 0, 0])).is_err());
    rp.compare_true(window.cropped_shape(Shape::new(4, 4, 2)).is_err());

    assert!(rp.cleanup(), "volume regression test failed");
}
