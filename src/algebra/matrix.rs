//! Dense matrix helpers shared by the algebraic records.
//!
//! Storage is `ndarray::Array2<f64>`; decompositions (SVD rank, Schur
//! eigenvalues, QR) go through `nalgebra::DMatrix`.

use nalgebra::{Complex, DMatrix, Schur};
use ndarray::{s, Array2};

use crate::error::{Error, Result};

/// Schur iteration cap before giving up on an eigenvalue problem
const SCHUR_MAX_ITER: usize = 10_000;

pub fn to_dmatrix(m: &Array2<f64>) -> DMatrix<f64> {
    let (rows, cols) = m.dim();
    DMatrix::from_fn(rows, cols, |i, j| m[[i, j]])
}

/// Kronecker product A ⊗ B
pub fn kron(a: &Array2<f64>, b: &Array2<f64>) -> Array2<f64> {
    let (ar, ac) = a.dim();
    let (br, bc) = b.dim();
    let mut out = Array2::zeros((ar * br, ac * bc));
    for ((i, j), &aij) in a.indexed_iter() {
        if aij == 0.0 {
            continue;
        }
        out.slice_mut(s![i * br..(i + 1) * br, j * bc..(j + 1) * bc])
            .assign(&(b * aij));
    }
    out
}

/// Block-diagonal composition diag(A, B) with zero off-diagonal blocks
pub fn block_diag(a: &Array2<f64>, b: &Array2<f64>) -> Array2<f64> {
    let (ar, ac) = a.dim();
    let (br, bc) = b.dim();
    let mut out = Array2::zeros((ar + br, ac + bc));
    out.slice_mut(s![..ar, ..ac]).assign(a);
    out.slice_mut(s![ar.., ac..]).assign(b);
    out
}

/// Numerical rank: singular values above σ_max · max(m, n) · ε
pub fn rank(m: &Array2<f64>) -> Result<usize> {
    let (rows, cols) = m.dim();
    if rows == 0 || cols == 0 {
        return Ok(0);
    }
    if m.iter().any(|v| !v.is_finite()) {
        return Err(Error::non_finite("matrix rank input"));
    }

    let singular = to_dmatrix(m).svd(false, false).singular_values;
    let sigma_max = singular.iter().copied().fold(0.0, f64::max);
    let tol = sigma_max * rows.max(cols) as f64 * f64::EPSILON;
    Ok(singular.iter().filter(|&&sv| sv > tol).count())
}

/// Dimension of the kernel: cols − rank
pub fn nullity(m: &Array2<f64>) -> Result<usize> {
    Ok(m.ncols() - rank(m)?)
}

/// Complex eigenvalues of a square matrix via the real Schur form
pub fn eigenvalues(m: &Array2<f64>) -> Result<Vec<Complex<f64>>> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(Error::NonSquare { rows, cols });
    }
    if m.iter().any(|v| !v.is_finite()) {
        return Err(Error::non_finite("eigenvalue input"));
    }

    let schur = Schur::try_new(to_dmatrix(m), f64::EPSILON, SCHUR_MAX_ITER)
        .ok_or_else(|| Error::Unsupported(format!("Schur decomposition of {rows}x{cols} did not converge")))?;
    Ok(schur.complex_eigenvalues().iter().copied().collect())
}

/// Zero-pad `m` on the bottom/right to `rows × cols`
pub fn pad_to(m: &Array2<f64>, rows: usize, cols: usize) -> Array2<f64> {
    let mut out = Array2::zeros((rows.max(m.nrows()), cols.max(m.ncols())));
    out.slice_mut(s![..m.nrows(), ..m.ncols()]).assign(m);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_kron_shape_and_values() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        let b = Array2::<f64>::eye(3);
        let k = kron(&a, &b);
        assert_eq!(k.dim(), (6, 6));
        assert_eq!(k[[0, 3]], 2.0);
        assert_eq!(k[[4, 1]], 3.0);
        assert_eq!(k[[5, 5]], 4.0);
        assert_eq!(k[[0, 1]], 0.0);
    }

    #[test]
    fn test_block_diag_zero_off_blocks() {
        let a = Array2::<f64>::ones((2, 2));
        let b = Array2::<f64>::ones((3, 3)) * 2.0;
        let d = block_diag(&a, &b);
        assert_eq!(d.dim(), (5, 5));
        assert!(d.slice(s![..2, 2..]).iter().all(|v| *v == 0.0));
        assert!(d.slice(s![2.., ..2]).iter().all(|v| *v == 0.0));
        assert_eq!(d[[4, 4]], 2.0);
    }

    #[test]
    fn test_rank_and_nullity() {
        assert_eq!(rank(&Array2::eye(4)).unwrap(), 4);
        assert_eq!(rank(&Array2::zeros((3, 3))).unwrap(), 0);
        let singular = array![[1.0, 2.0], [2.0, 4.0]];
        assert_eq!(rank(&singular).unwrap(), 1);
        assert_eq!(nullity(&singular).unwrap(), 1);
        assert_eq!(nullity(&Array2::zeros((2, 5))).unwrap(), 5);
    }

    #[test]
    fn test_eigenvalues_rotation() {
        let rot = array![[0.0, -1.0], [1.0, 0.0]];
        let mut eig = eigenvalues(&rot).unwrap();
        eig.sort_by(|a, b| a.im.total_cmp(&b.im));
        assert_abs_diff_eq!(eig[0].re, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(eig[0].im, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(eig[1].im, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_eigenvalues_rejects_rectangular() {
        assert!(matches!(
            eigenvalues(&Array2::zeros((2, 3))),
            Err(Error::NonSquare { rows: 2, cols: 3 })
        ));
    }

    #[test]
    fn test_pad() {
        let p = pad_to(&array![[1.0]], 2, 3);
        assert_eq!(p, array![[1.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
    }
}
