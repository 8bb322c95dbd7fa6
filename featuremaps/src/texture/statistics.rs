//! Haralick statistics of one co-occurrence matrix.

use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayViewMut1, Axis};

/// Shannon entropy in bits; zero-probability cells contribute nothing.
fn entropy<'a>(probabilities: impl IntoIterator<Item = &'a f64>) -> f64 {
    -probabilities
        .into_iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| p * p.log2())
        .sum::<f64>()
}

/// Writes the statistics of `counts` into `out`. Leaves `out` untouched when
/// the matrix holds no pairs.
pub(super) fn haralick_row(
    counts: &Array2<f64>,
    with_mcc: bool,
    mut out: ArrayViewMut1<'_, f64>,
) {
    let total = counts.sum();
    if total <= 0.0 {
        return;
    }
    let p = counts / total;
    let n = p.nrows();

    let levels = Array1::from_shape_fn(n, |i| i as f64);
    let px = p.sum_axis(Axis(0));
    let py = p.sum_axis(Axis(1));

    let ux = px.dot(&levels);
    let uy = py.dot(&levels);
    let vx = px.dot(&levels.mapv(|k| k * k)) - ux * ux;
    let vy = py.dot(&levels.mapv(|k| k * k)) - uy * uy;
    let (sx, sy) = (vx.max(0.0).sqrt(), vy.max(0.0).sqrt());

    let mut p_sum = Array1::<f64>::zeros(2 * n);
    let mut p_diff = Array1::<f64>::zeros(n);
    let mut asm = 0.0;
    let mut ij_moment = 0.0;
    let mut idm = 0.0;
    for ((i, j), &pij) in p.indexed_iter() {
        p_sum[i + j] += pij;
        p_diff[i.abs_diff(j)] += pij;
        asm += pij * pij;
        ij_moment += (i * j) as f64 * pij;
        idm += pij / (1.0 + ((i as f64) - (j as f64)).powi(2));
    }

    let contrast: f64 = p_diff
        .iter()
        .enumerate()
        .map(|(k, &pk)| (k * k) as f64 * pk)
        .sum();
    let correlation = if sx == 0.0 || sy == 0.0 {
        1.0
    } else {
        (ij_moment - ux * uy) / (sx * sy)
    };

    let sum_average: f64 = p_sum.iter().enumerate().map(|(k, &pk)| k as f64 * pk).sum();
    let sum_variance: f64 = p_sum
        .iter()
        .enumerate()
        .map(|(k, &pk)| (k * k) as f64 * pk)
        .sum::<f64>()
        - sum_average * sum_average;
    let sum_entropy = entropy(&p_sum);
    let hxy = entropy(&p);

    let diff_mean: f64 = p_diff.iter().enumerate().map(|(k, &pk)| k as f64 * pk).sum();
    let difference_variance = contrast - diff_mean * diff_mean;
    let difference_entropy = entropy(&p_diff);

    let hx = entropy(&px);
    let hy = entropy(&py);
    let mut hxy1 = 0.0;
    let mut hxy2 = 0.0;
    for ((i, j), &pij) in p.indexed_iter() {
        let product = px[i] * py[j];
        if product > 0.0 {
            hxy1 -= pij * product.log2();
            hxy2 -= product * product.log2();
        }
    }
    let h_max = hx.max(hy);
    let imc1 = if h_max == 0.0 {
        hxy - hxy1
    } else {
        (hxy - hxy1) / h_max
    };
    let imc2 = (1.0 - (-2.0 * (hxy2 - hxy)).exp()).max(0.0).sqrt();

    let values = [
        asm,
        contrast,
        correlation,
        vx,
        idm,
        sum_average,
        sum_variance,
        sum_entropy,
        hxy,
        difference_variance,
        difference_entropy,
        imc1,
        imc2,
    ];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = value;
    }
    if with_mcc {
        out[values.len()] = maximal_correlation_coefficient(&p, &px, &py);
    }
}

/// Square root of the second largest eigenvalue of
/// `Q[i, j] = Σ_k p[i, k] p[j, k] / (p_row[i] p_col[k])`.
///
/// `Q` is similar to the symmetric `A Aᵀ` with
/// `A[i, k] = p[i, k] / sqrt(p_row[i] p_col[k])`, so the symmetric solver
/// applies. Rows and columns with zero marginal drop out.
fn maximal_correlation_coefficient(
    p: &Array2<f64>,
    p_col: &Array1<f64>,
    p_row: &Array1<f64>,
) -> f64 {
    let n = p.nrows();
    if n < 2 {
        return 0.0;
    }

    let a = DMatrix::from_fn(n, n, |i, k| {
        let denom = p_row[i] * p_col[k];
        if denom > 0.0 {
            p[[i, k]] / denom.sqrt()
        } else {
            0.0
        }
    });
    let q = &a * a.transpose();

    let mut eigenvalues: Vec<f64> = q.symmetric_eigenvalues().iter().copied().collect();
    eigenvalues.sort_by(|a, b| b.total_cmp(a));
    eigenvalues[1].max(0.0).sqrt()
}
