//! Local least-squares curve fitting.

use crate::types::{GeoError, GeoResult};

/// Fit r(t) = c0 + c1*t + c2*t^2 to the samples by normal-equations least
/// squares and return [c0, c1, c2].
///
/// Fails with [`GeoError::DegenerateFit`] when fewer than three samples are
/// supplied or the normal matrix is singular (all abscissas identical).
pub fn fit_quadratic(t: &[f64], r: &[f64]) -> GeoResult<[f64; 3]> {
    if t.len() != r.len() {
        return Err(GeoError::InvalidParameter(format!(
            "sample count mismatch: {} abscissas, {} ordinates",
            t.len(),
            r.len()
        )));
    }
    if t.len() < 3 {
        return Err(GeoError::DegenerateFit(format!(
            "quadratic fit needs at least 3 samples, got {}",
            t.len()
        )));
    }

    // power sums s_k = sum t^k and moments b_k = sum r*t^k
    let mut s = [0.0f64; 5];
    let mut b = [0.0f64; 3];
    for (&ti, &ri) in t.iter().zip(r.iter()) {
        let mut tk = 1.0;
        for k in 0..5 {
            s[k] += tk;
            if k < 3 {
                b[k] += ri * tk;
            }
            tk *= ti;
        }
    }

    let mut a = [
        [s[0], s[1], s[2], b[0]],
        [s[1], s[2], s[3], b[1]],
        [s[2], s[3], s[4], b[2]],
    ];

    solve3(&mut a).ok_or_else(|| {
        GeoError::DegenerateFit("singular normal matrix in quadratic fit".to_string())
    })
}

/// Gaussian elimination with partial pivoting on a 3x4 augmented system.
fn solve3(a: &mut [[f64; 4]; 3]) -> Option<[f64; 3]> {
    // singularity threshold relative to the matrix scale
    let scale = a
        .iter()
        .flat_map(|row| row[..3].iter())
        .fold(0.0f64, |m, &v| m.max(v.abs()));
    let tiny = 1e-12 * scale.max(1.0);

    for col in 0..3 {
        let pivot_row = (col..3)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap();
        if a[pivot_row][col].abs() < tiny {
            return None;
        }
        a.swap(col, pivot_row);

        for row in 0..3 {
            if row != col {
                let factor = a[row][col] / a[col][col];
                for k in col..4 {
                    a[row][k] -= factor * a[col][k];
                }
            }
        }
    }

    Some([a[0][3] / a[0][0], a[1][3] / a[1][1], a[2][3] / a[2][2]])
}
