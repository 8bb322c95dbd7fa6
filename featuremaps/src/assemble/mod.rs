//! Reassembly of ordered per-patch feature arrays into dense feature maps.
//!
//! Results arrive in patch order (row-major over the patch grid). Assembly
//! runs in two explicit steps:
//!
//! 1. Pack: result `k` goes to the spatial cell obtained by unravelling `k`
//!    row-major over `map_shape`, giving `(map..., orientations, statistics)`.
//! 2. Reorder: feature axes move in front of the spatial axes, giving
//!    `(orientations, statistics, map...)`. For 2D maps this is exactly
//!    swapping axes 0 and 2, then axes 1 and 3.


use ndarray::{Array2, ArrayD, Axis, IxDyn};

use crate::error::{Error, Result};

/// Dense feature map with feature axes first and spatial axes last.
pub type FeatureMap = ArrayD<f64>;

/// Builds a `(orientations, statistics, map...)` map from `results`.
///
/// `results` must hold exactly `prod(map_shape)` arrays of identical shape.
pub fn assemble_feature_map(results: &[Array2<f64>], map_shape: &[usize]) -> Result<FeatureMap> {
    let expected: usize = map_shape.iter().product();
    if results.len() != expected {
        return Err(Error::ResultCountMismatch {
            map_shape: map_shape.to_vec(),
            expected,
            actual: results.len(),
        });
    }

    let feature_shape: [usize; 2] = results
        .first()
        .map_or([0, 0], |first| first.dim().into());
    if let Some((index, bad)) = results
        .iter()
        .enumerate()
        .find(|(_, r)| <[usize; 2]>::from(r.dim()) != feature_shape)
    {
        return Err(Error::FeatureShapeMismatch {
            index,
            expected: feature_shape.to_vec(),
            actual: bad.shape().to_vec(),
        });
    }

    let packed = pack_row_major(results, map_shape, feature_shape);
    Ok(feature_axes_first(packed, map_shape.len()))
}

/// Step 1: `(map..., orientations, statistics)`.
fn pack_row_major(
    results: &[Array2<f64>],
    map_shape: &[usize],
    feature_shape: [usize; 2],
) -> ArrayD<f64> {
    let mut packed_shape = map_shape.to_vec();
    packed_shape.extend_from_slice(&feature_shape);
    let mut packed = ArrayD::zeros(IxDyn(&packed_shape));

    let mut cell_index = vec![0usize; map_shape.len()];
    for (k, result) in results.iter().enumerate() {
        unravel_row_major(k, map_shape, &mut cell_index);
        let mut cell = packed.view_mut();
        for &i in &cell_index {
            cell = cell.index_axis_move(Axis(0), i);
        }
        cell.assign(result);
    }
    packed
}

/// Step 2: moves the two trailing feature axes to the front.
fn feature_axes_first(mut packed: ArrayD<f64>, spatial_rank: usize) -> ArrayD<f64> {
    if spatial_rank == 2 {
        packed.swap_axes(0, 2);
        packed.swap_axes(1, 3);
    } else {
        let order: Vec<usize> = (spatial_rank..spatial_rank + 2)
            .chain(0..spatial_rank)
            .collect();
        packed = packed.permuted_axes(IxDyn(&order));
    }
    packed.as_standard_layout().into_owned()
}

#[inline]
fn unravel_row_major(mut k: usize, shape: &[usize], out: &mut [usize]) {
    for (axis, &n) in shape.iter().enumerate().rev() {
        out[axis] = k % n;
        k /= n;
    }
}
