use ndarray::{Array2, ArrayViewD, Axis, Slice, Zip};

/// Co-occurrence directions for 2D patches, as `(dy, dx)`.
pub const DIRECTIONS_2D: &[&[isize]] = &[&[0, 1], &[1, 1], &[1, 0], &[1, -1]];

/// Co-occurrence directions for 3D patches, as `(dz, dy, dx)`.
pub const DIRECTIONS_3D: &[&[isize]] = &[
    &[1, 0, 0],
    &[1, 1, 0],
    &[0, 1, 0],
    &[1, -1, 0],
    &[0, 0, 1],
    &[1, 0, 1],
    &[0, 1, 1],
    &[1, 1, 1],
    &[1, -1, 1],
    &[1, 0, -1],
    &[0, 1, -1],
    &[1, 1, -1],
    &[1, -1, -1],
];

/// Symmetric pair counts of `patch` along `direction * distance`.
///
/// Every pair `(a, b)` adds one to both `[a, b]` and `[b, a]`, so diagonal
/// entries count twice. Levels must lie in `0..n_levels`.
pub(super) fn symmetric_counts(
    patch: &ArrayViewD<'_, i64>,
    direction: &[isize],
    distance: usize,
    n_levels: usize,
) -> Array2<f64> {
    let mut counts = Array2::zeros((n_levels, n_levels));

    let mut first = patch.view();
    let mut second = patch.view();
    for (axis, &step) in direction.iter().enumerate() {
        let offset = step * distance as isize;
        let len = patch.len_of(Axis(axis)) as isize;
        if offset.abs() >= len {
            return counts;
        }
        let first_range = (-offset).max(0)..len - offset.max(0);
        let second_range = offset.max(0)..len + offset.min(0);
        first.slice_axis_inplace(Axis(axis), Slice::from(first_range));
        second.slice_axis_inplace(Axis(axis), Slice::from(second_range));
    }

    Zip::from(&first).and(&second).for_each(|&a, &b| {
        let (a, b) = (a as usize, b as usize);
        counts[[a, b]] += 1.0;
        counts[[b, a]] += 1.0;
    });
    counts
}
