// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Dense linear algebra helpers for least squares.

use ndarray::{Array1, Array2};

use crate::errors::ModelError;

const MAX_SWEEPS: usize = 100;

/// Eigenvalues below `RCOND * max_eigenvalue` are treated as zero.
pub const RCOND: f64 = 1e-10;

/// Eigen-decomposes a symmetric matrix with cyclic Jacobi rotations.
///
/// # Returns
/// `(eigenvalues, eigenvectors)` where column `k` of `eigenvectors` belongs to
/// `eigenvalues[k]`. Eigenvalues are not sorted.
pub fn symmetric_eigen(a: &Array2<f64>) -> Result<(Array1<f64>, Array2<f64>), ModelError> {
    let (values, vectors, _) = jacobi_eigen(a)?;
    Ok((values, vectors))
}

/// [`symmetric_eigen`], also returning the number of sweeps that rotated.
///
/// Off-diagonal entries no larger than `EPSILON * ‖a‖_F` are left alone, and
/// iteration stops at the first sweep that has nothing left to rotate.
pub(crate) fn jacobi_eigen(
    a: &Array2<f64>,
) -> Result<(Array1<f64>, Array2<f64>, usize), ModelError> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(ModelError::DimensionMismatch { expected: n, actual: a.ncols() });
    }
    if a.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::InvalidNumericValue);
    }

    let mut a = a.to_owned();
    let mut v = Array2::<f64>::eye(n);
    let negligible = f64::EPSILON * a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mut sweeps = 0;

    while sweeps < MAX_SWEEPS {
        let mut rotated = false;
        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq.abs() <= negligible {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[[k, p]];
                    let akq = a[[k, q]];
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[[p, k]];
                    let aqk = a[[q, k]];
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
                // exact in real arithmetic; drop the rounding residue
                a[[p, q]] = 0.0;
                a[[q, p]] = 0.0;
                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
                rotated = true;
            }
        }
        if !rotated {
            break;
        }
        sweeps += 1;
    }

    Ok((a.diag().to_owned(), v, sweeps))
}

/// Solves `a · x = b` for symmetric positive semi-definite `a` through its
/// pseudo-inverse.
///
/// Directions whose eigenvalue falls under [`RCOND`] times the largest one are
/// dropped, which yields the minimum-norm solution when `a` is singular.
pub fn pinv_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, ModelError> {
    if a.nrows() != b.len() {
        return Err(ModelError::DimensionMismatch { expected: a.nrows(), actual: b.len() });
    }
    let (eigenvalues, eigenvectors) = symmetric_eigen(a)?;
    let max_eigenvalue = eigenvalues.iter().fold(0.0_f64, |acc, &l| acc.max(l));
    let cutoff = RCOND * max_eigenvalue;

    // x = V · diag(1/λ) · Vᵀ · b
    let projected = eigenvectors.t().dot(b);
    let scaled = Array1::from_iter(
        projected
            .iter()
            .zip(eigenvalues.iter())
            .map(|(&p, &l)| if l > cutoff && l > 0.0 { p / l } else { 0.0 }),
    );
    let x = eigenvectors.dot(&scaled);

    if x.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::NumericalInstability);
    }
    Ok(x)
}
