//! Point clouds: row-major samples of fixed ambient dimension.

use ndarray::{concatenate, Array1, Array2, ArrayView2, Axis};

use crate::error::{Error, Result};

/// An ordered set of points in ℝᵈ, one point per row.
///
/// Every row has the same length by construction; clouds are produced
/// once by a generator and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    points: Array2<f64>,
}

impl PointCloud {
    pub fn new(points: Array2<f64>) -> Self {
        Self { points }
    }

    /// Build from nested rows, rejecting rows of unequal length
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let dim = rows.first().map(Vec::len).unwrap_or(0);
        let mut flat = Vec::with_capacity(rows.len() * dim);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != dim {
                return Err(Error::RaggedRows {
                    row,
                    expected: dim,
                    found: values.len(),
                });
            }
            flat.extend_from_slice(values);
        }
        let points = Array2::from_shape_vec((rows.len(), dim), flat)
            .map_err(|e| Error::invalid("rows", e.to_string()))?;
        Ok(Self { points })
    }

    /// Stack blocks vertically; all blocks must share the column count
    pub fn stack(blocks: &[Array2<f64>]) -> Result<Self> {
        let Some(first) = blocks.first() else {
            return Err(Error::EmptyPointCloud);
        };
        for block in &blocks[1..] {
            if block.ncols() != first.ncols() {
                return Err(Error::ShapeMismatch {
                    operation: "stack",
                    left: first.dim(),
                    right: block.dim(),
                });
            }
        }
        let views: Vec<ArrayView2<f64>> = blocks.iter().map(|b| b.view()).collect();
        let points = concatenate(Axis(0), &views)
            .map_err(|e| Error::invalid("blocks", e.to_string()))?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &Array2<f64> {
        &self.points
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.points
    }

    pub fn n_points(&self) -> usize {
        self.points.nrows()
    }

    pub fn dimension(&self) -> usize {
        self.points.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|v| v.is_finite())
    }

    /// Per-coordinate mean
    pub fn column_means(&self) -> Array1<f64> {
        self.points
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(self.dimension()))
    }

    /// Per-coordinate population variance
    pub fn column_variances(&self) -> Array1<f64> {
        if self.is_empty() {
            return Array1::zeros(self.dimension());
        }
        self.points.var_axis(Axis(0), 0.0)
    }

    /// Zero mean and unit population variance per coordinate.
    ///
    /// Constant columns are centred and left unscaled, so they stay at
    /// zero instead of dividing by a vanishing spread.
    pub fn standardized(&self) -> Self {
        let means = self.column_means();
        let scales = self.column_variances().mapv(|v| {
            let s = v.sqrt();
            if s < 10.0 * f64::EPSILON {
                1.0
            } else {
                s
            }
        });
        let points = (&self.points - &means) / &scales;
        Self { points }
    }
}

/// Cyclic shift of the columns by `shift` (same as `np.roll(x, k, axis=1)`)
pub(crate) fn roll_columns(x: &Array2<f64>, shift: usize) -> Array2<f64> {
    let (rows, cols) = x.dim();
    if cols == 0 {
        return x.clone();
    }
    Array2::from_shape_fn((rows, cols), |(r, c)| x[[r, (c + cols - shift % cols) % cols]])
}

/// Cyclic shift of the rows by `shift` (same as `np.roll(x, k, axis=0)`)
pub(crate) fn roll_rows(x: &Array2<f64>, shift: usize) -> Array2<f64> {
    let (rows, cols) = x.dim();
    if rows == 0 {
        return x.clone();
    }
    Array2::from_shape_fn((rows, cols), |(r, c)| x[[(r + rows - shift % rows) % rows, c]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        match PointCloud::from_rows(&rows) {
            Err(Error::RaggedRows { row, expected, found }) => {
                assert_eq!((row, expected, found), (1, 2, 1));
            }
            other => panic!("expected RaggedRows, got {other:?}"),
        }
    }

    #[test]
    fn test_standardized_moments() {
        let cloud = PointCloud::new(array![[1.0, 10.0], [2.0, 20.0], [3.0, 60.0]]);
        let z = cloud.standardized();
        for m in z.column_means() {
            assert_abs_diff_eq!(m, 0.0, epsilon = 1e-12);
        }
        for v in z.column_variances() {
            assert_abs_diff_eq!(v, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_constant_column_stays_zero() {
        let cloud = PointCloud::new(array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]]);
        let z = cloud.standardized();
        assert!(z.points().column(1).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_roll_matches_numpy() {
        let x = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        assert_eq!(roll_columns(&x, 1), array![[3.0, 1.0, 2.0], [6.0, 4.0, 5.0]]);
        assert_eq!(roll_rows(&x, 1), array![[4.0, 5.0, 6.0], [1.0, 2.0, 3.0]]);
    }

    #[test]
    fn test_stack_checks_columns() {
        let a = Array2::<f64>::zeros((2, 3));
        let b = Array2::<f64>::zeros((2, 2));
        assert!(PointCloud::stack(&[a.clone(), b]).is_err());
        assert_eq!(PointCloud::stack(&[a.clone(), a]).unwrap().n_points(), 4);
    }
}
