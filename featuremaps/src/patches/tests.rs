use ndarray::{Array, Array2, ArrayD, IxDyn};

use super::*;

fn ramp(shape: &[usize]) -> ArrayD<usize> {
    let len = shape.iter().product();
    Array::from_shape_vec(IxDyn(shape), (0..len).collect()).unwrap()
}

#[test]
fn test_patch_count_matches_grid() {
    for (shape, window) in [
        (vec![10, 10], vec![3, 3]),
        (vec![6, 9], vec![1, 4]),
        (vec![5, 5], vec![5, 5]),
        (vec![4, 6, 5], vec![2, 3, 5]),
    ] {
        let image = ramp(&shape);
        let patches = extract_patches(image.view(), &window).unwrap();
        let expected: usize = shape
            .iter()
            .zip(&window)
            .map(|(s, w)| s - w + 1)
            .product();
        assert_eq!(patches.len(), expected, "shape {shape:?} window {window:?}");
        assert!(patches.iter().all(|p| p.shape() == window.as_slice()));
    }
}

#[test]
fn test_patches_are_row_major_by_anchor() {
    // 4x5 image, 2x2 window -> 3x4 grid
    let image = ramp(&[4, 5]);
    let grid = PatchGrid::new(image.view(), &[2, 2]).unwrap();
    assert_eq!(grid.grid_shape(), &[3, 4]);

    let patches = grid.patches();
    for (k, patch) in patches.iter().enumerate() {
        let (y, x) = (k / 4, k % 4);
        assert_eq!(grid.anchor(k), vec![y, x]);
        assert_eq!(patch[[0, 0]], y * 5 + x);
        assert_eq!(patch[[1, 1]], (y + 1) * 5 + x + 1);
    }
}

#[test]
fn test_patch_contents_match_image() {
    let image: Array2<i32> = Array2::from_shape_fn((6, 7), |(y, x)| (y * 31 + x * 7) as i32 % 11);
    let dyn_image = image.clone().into_dyn();
    let grid = PatchGrid::new(dyn_image.view(), &[3, 2]).unwrap();
    for k in 0..grid.len() {
        let anchor = grid.anchor(k);
        let patch = grid.patch_at(&anchor);
        for dy in 0..3 {
            for dx in 0..2 {
                assert_eq!(patch[[dy, dx]], image[[anchor[0] + dy, anchor[1] + dx]]);
            }
        }
    }
}

#[test]
fn test_volumetric_anchor_order() {
    let image = ramp(&[3, 4, 4]);
    let grid = PatchGrid::new(image.view(), &[2, 3, 3]).unwrap();
    assert_eq!(grid.grid_shape(), &[2, 2, 2]);
    let anchors: Vec<Vec<usize>> = (0..grid.len()).map(|k| grid.anchor(k)).collect();
    assert_eq!(
        anchors,
        vec![
            vec![0, 0, 0],
            vec![0, 0, 1],
            vec![0, 1, 0],
            vec![0, 1, 1],
            vec![1, 0, 0],
            vec![1, 0, 1],
            vec![1, 1, 0],
            vec![1, 1, 1],
        ]
    );
}

#[test]
fn test_window_equal_to_image_gives_single_patch() {
    let image = ramp(&[3, 3]);
    let patches = extract_patches(image.view(), &[3, 3]).unwrap();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0], image.view());
}

#[test]
fn test_rank_mismatch_is_rejected() {
    let image = ramp(&[5, 5]);
    assert!(matches!(
        extract_patches(image.view(), &[3, 3, 3]),
        Err(Error::ShapeMismatch { .. })
    ));
}

#[test]
fn test_oversized_or_zero_window_is_rejected() {
    let image = ramp(&[5, 6]);
    for window in [[6, 3], [3, 7], [0, 2]] {
        assert!(matches!(
            extract_patches(image.view(), &window),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}

#[test]
fn test_random_shapes_patch_anchors_reassemble_into_image() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::assemble::assemble_feature_map;

    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..20 {
        let ndim = rng.random_range(2..=3);
        let shape: Vec<usize> = (0..ndim).map(|_| rng.random_range(1..=9)).collect();
        let window: Vec<usize> = shape.iter().map(|&s| rng.random_range(1..=s)).collect();
        let len = shape.iter().product();
        let values: Vec<f64> = (0..len).map(|_| rng.random_range(-50.0..50.0)).collect();
        let image = ArrayD::from_shape_vec(IxDyn(&shape), values).unwrap();

        let grid = PatchGrid::new(image.view(), &window).unwrap();
        let patches = grid.patches();
        for (k, patch) in patches.iter().enumerate() {
            let anchor = grid.anchor(k);
            assert_eq!(patch[IxDyn(&vec![0; ndim])], image[IxDyn(&anchor)]);
        }

        // Each patch reduced to its anchor sample must reproduce the
        // top-left grid-shaped block of the image.
        let results: Vec<Array2<f64>> = patches
            .iter()
            .map(|p| Array2::from_elem((1, 1), p[IxDyn(&vec![0; ndim])]))
            .collect();
        let map = assemble_feature_map(&results, grid.grid_shape()).unwrap();
        let expected = image.slice_each_axis(|desc| {
            ndarray::Slice::from(0..grid.grid_shape()[desc.axis.index()])
        });
        let cells = map.index_axis(ndarray::Axis(0), 0);
        let cells = cells.index_axis(ndarray::Axis(0), 0);
        assert_eq!(cells, expected, "shape {shape:?} window {window:?}");
    }
}
